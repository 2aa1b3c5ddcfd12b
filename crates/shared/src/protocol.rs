use serde::{Deserialize, Serialize};

use crate::domain::{ProjectId, ProjectStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Reply to register/login. A reply without a token is a rejected attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub idea_description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProjectResponse {
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStatusReport {
    pub status: ProjectStatus,
    #[serde(default)]
    pub current_agent: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ProjectStatusReport {
    pub fn new(status: ProjectStatus) -> Self {
        Self {
            status,
            current_agent: None,
            repo_url: None,
            error: None,
        }
    }
}
