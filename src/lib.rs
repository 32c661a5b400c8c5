//! Sketch Studio library
//!
//! The change annotator lives in [`annotator`]; the rest is the desktop
//! studio around it.

pub mod annotator;
pub mod app;
pub mod backend;
pub mod config;
pub mod constant;
pub mod docs;
pub mod messages;
pub mod share;
pub mod style;
pub mod ui;
