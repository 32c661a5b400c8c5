//! Share links: a sketch's name and code packed into one URL-safe token.

use crate::backend::project_backend::Project;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Share code is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Share code is not valid text: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Share code does not contain a sketch: {0}")]
    Json(#[from] serde_json::Error),
}

/// The part of a project that travels in a share link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSketch {
    pub name: String,
    pub code: String,
}

impl From<&Project> for SharedSketch {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            code: project.current_code.clone(),
        }
    }
}

pub fn encode(project: &Project) -> Result<String, ShareError> {
    encode_sketch(&SharedSketch::from(project))
}

pub fn encode_sketch(sketch: &SharedSketch) -> Result<String, ShareError> {
    let json = serde_json::to_vec(sketch)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn decode(code: &str) -> Result<SharedSketch, ShareError> {
    let bytes = URL_SAFE_NO_PAD.decode(code.trim())?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}
