//! Services the studio talks to: code generation and project storage.

pub mod ai_backend;
pub mod project_backend;
