use crate::config::Config;
use crate::constant::DEFAULT_PROJECT_NAME;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

const PROJECTS_DIR: &str = "projects";
const EXPORTS_DIR: &str = "exports";
const CURRENT_PROJECT_FILE: &str = "current_project";

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Invalid project id: {0}")]
    InvalidId(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One chat bubble. Assistant messages carry the code they produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            code: None,
        }
    }

    pub fn assistant(content: impl Into<String>, code: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            content: content.into(),
            code,
        }
    }
}

/// A `{role, content}` pair as sent to the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub current_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: DEFAULT_PROJECT_NAME.to_string(),
            messages: Vec::new(),
            current_code: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether there is anything worth saving yet
    pub fn has_content(&self) -> bool {
        !self.messages.is_empty() || !self.current_code.is_empty()
    }

    /// Conversation so far, with the code of assistant turns inlined
    pub fn conversation_history(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .map(|m| {
                let content = match (&m.role, &m.code) {
                    (Role::Assistant, Some(code)) => format!("{}\n\nCODE:\n{}", m.content, code),
                    _ => m.content.clone(),
                };
                ChatTurn {
                    role: m.role,
                    content,
                }
            })
            .collect()
    }
}

/// One JSON file per project under the app data directory
#[derive(Clone)]
pub struct ProjectBackend {
    projects_dir: PathBuf,
    exports_dir: PathBuf,
}

impl ProjectBackend {
    pub fn new() -> Result<Self, ProjectError> {
        let config = Config::default();
        Self::with_data_dir(&config.data_dir())
    }

    pub fn with_data_dir(data_dir: &Path) -> Result<Self, ProjectError> {
        let projects_dir = data_dir.join(PROJECTS_DIR);
        let exports_dir = data_dir.join(EXPORTS_DIR);

        fs::create_dir_all(&projects_dir)?;
        fs::create_dir_all(&exports_dir)?;

        Ok(Self {
            projects_dir,
            exports_dir,
        })
    }

    fn project_path(&self, id: &str) -> Result<PathBuf, ProjectError> {
        validate_id(id)?;
        Ok(self.projects_dir.join(format!("{}.json", id)))
    }

    /// Write the project, stamping `updated_at`
    pub fn save(&self, project: &mut Project) -> Result<(), ProjectError> {
        let path = self.project_path(&project.id)?;
        project.updated_at = Utc::now();
        let content = serde_json::to_string_pretty(project)?;
        fs::write(path, content)?;
        tracing::debug!("Saved project {}", project.id);
        Ok(())
    }

    pub fn load(&self, id: &str) -> Result<Project, ProjectError> {
        let path = self.project_path(id)?;
        if !path.exists() {
            return Err(ProjectError::NotFound(id.to_string()));
        }

        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// All readable projects, most recently updated first
    pub fn list(&self) -> Result<Vec<Project>, ProjectError> {
        let mut projects = Vec::new();

        for entry in fs::read_dir(&self.projects_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            match fs::read_to_string(&path)
                .map_err(ProjectError::from)
                .and_then(|content| Ok(serde_json::from_str::<Project>(&content)?))
            {
                Ok(project) => projects.push(project),
                Err(e) => tracing::warn!("Skipping unreadable project {:?}: {}", path, e),
            }
        }

        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(projects)
    }

    /// Remove a project. Deleting a missing project is not an error.
    pub fn delete(&self, id: &str) -> Result<(), ProjectError> {
        let path = self.project_path(id)?;
        if path.exists() {
            fs::remove_file(path)?;
        }

        if self.current_id()?.as_deref() == Some(id) {
            let _ = fs::remove_file(self.projects_dir.join(CURRENT_PROJECT_FILE));
        }
        Ok(())
    }

    pub fn set_current(&self, id: &str) -> Result<(), ProjectError> {
        validate_id(id)?;
        fs::write(self.projects_dir.join(CURRENT_PROJECT_FILE), id)?;
        Ok(())
    }

    pub fn current_id(&self) -> Result<Option<String>, ProjectError> {
        let path = self.projects_dir.join(CURRENT_PROJECT_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let id = fs::read_to_string(path)?.trim().to_string();
        Ok((!id.is_empty()).then_some(id))
    }

    /// Write a standalone page that runs the sketch in a browser
    pub fn export_html(&self, project: &Project) -> Result<PathBuf, ProjectError> {
        validate_id(&project.id)?;
        let dir = self.exports_dir.join(&project.id);
        fs::create_dir_all(&dir)?;

        let path = dir.join("index.html");
        fs::write(&path, sketch_html(&project.name, &project.current_code))?;
        tracing::info!("Exported {:?} to {:?}", project.name, path);
        Ok(path)
    }
}

fn validate_id(id: &str) -> Result<(), ProjectError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ProjectError::InvalidId(id.to_string()))
    }
}

fn sketch_html(name: &str, code: &str) -> String {
    let title = name
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    // A literal `</script>` in the sketch would end the script element early.
    let code = code.replace("</script", "<\\/script");
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <script src=\"https://cdn.jsdelivr.net/npm/p5@1.9.0/lib/p5.min.js\"></script>\n\
         <style>body {{ margin: 0; display: flex; justify-content: center; align-items: center; \
         min-height: 100vh; background: #1e1e1e; }}</style>\n</head>\n<body>\n<script>\n{code}\n\
         </script>\n</body>\n</html>\n"
    )
}
