use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{Project, ProjectId},
    protocol::{AuthResponse, CreateProjectResponse, Credentials, ProjectStatusReport},
};

/// Backend operations the controller consumes. Rejections the backend
/// expresses in-band (`{"error": ...}` on auth and project creation) come back
/// as `Ok` values; transport and decode failures come back as `Err`.
#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn register(&self, credentials: &Credentials) -> Result<AuthResponse>;
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse>;
    /// Installs (or clears) the bearer credential used by later calls.
    async fn set_token(&self, token: Option<String>);
    async fn get_projects(&self) -> Result<Vec<Project>>;
    async fn create_project(&self, idea: &str) -> Result<CreateProjectResponse>;
    async fn get_project_status(&self, project_id: ProjectId) -> Result<ProjectStatusReport>;
}

pub struct MissingProjectApi;

#[async_trait]
impl ProjectApi for MissingProjectApi {
    async fn register(&self, _credentials: &Credentials) -> Result<AuthResponse> {
        Err(anyhow!("project backend is unavailable"))
    }

    async fn login(&self, _credentials: &Credentials) -> Result<AuthResponse> {
        Err(anyhow!("project backend is unavailable"))
    }

    async fn set_token(&self, _token: Option<String>) {}

    async fn get_projects(&self) -> Result<Vec<Project>> {
        Err(anyhow!("project backend is unavailable"))
    }

    async fn create_project(&self, _idea: &str) -> Result<CreateProjectResponse> {
        Err(anyhow!("project backend is unavailable"))
    }

    async fn get_project_status(&self, project_id: ProjectId) -> Result<ProjectStatusReport> {
        Err(anyhow!(
            "project backend is unavailable for project {}",
            project_id.0
        ))
    }
}
