//! reqwest-backed [`ProjectApi`] talking to the project backend's REST surface.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Project, ProjectId},
    error::ApiError,
    protocol::{
        AuthResponse, CreateProjectRequest, CreateProjectResponse, Credentials,
        ProjectStatusReport,
    },
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    api::ProjectApi,
    config::{parse_server_url, ClientSettings},
};

pub struct HttpProjectApi {
    http: Client,
    server_url: String,
    token: RwLock<Option<String>>,
}

impl HttpProjectApi {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_client(server_url, Client::new())
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;
        Self::with_client(&settings.server_url, http)
    }

    fn with_client(server_url: &str, http: Client) -> Result<Self> {
        let url = parse_server_url(server_url)?;
        Ok(Self {
            http,
            server_url: url.as_str().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn post_auth(&self, path: &str, credentials: &Credentials) -> Result<AuthResponse> {
        let res = self
            .http
            .post(format!("{}{path}", self.server_url))
            .json(credentials)
            .send()
            .await?;
        read_in_band(res).await
    }
}

/// Reads a reply whose rejections may arrive in-band: a non-2xx status whose
/// body still matches `T` is returned as a value, anything else is an error.
async fn read_in_band<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    let body = res.text().await.context("failed to read response body")?;
    match serde_json::from_str::<T>(&body) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(ApiError::from_body(status.as_u16(), &body).into()),
        Err(err) => Err(err).context("failed to decode response body"),
    }
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T> {
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(ApiError::from_body(status.as_u16(), &body).into());
    }
    res.json().await.context("failed to decode response body")
}

#[async_trait]
impl ProjectApi for HttpProjectApi {
    async fn register(&self, credentials: &Credentials) -> Result<AuthResponse> {
        debug!(username = %credentials.username, "register");
        self.post_auth("/api/auth/register", credentials).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        debug!(username = %credentials.username, "login");
        self.post_auth("/api/auth/login", credentials).await
    }

    async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    async fn get_projects(&self) -> Result<Vec<Project>> {
        let request = self.http.get(format!("{}/api/projects", self.server_url));
        let res = self.authorized(request).await.send().await?;
        let projects: Option<Vec<Project>> = read_json(res).await?;
        Ok(projects.unwrap_or_default())
    }

    async fn create_project(&self, idea: &str) -> Result<CreateProjectResponse> {
        let request = self
            .http
            .post(format!("{}/api/projects", self.server_url))
            .json(&CreateProjectRequest {
                idea_description: idea.to_string(),
            });
        let res = self.authorized(request).await.send().await?;
        read_in_band(res).await
    }

    async fn get_project_status(&self, project_id: ProjectId) -> Result<ProjectStatusReport> {
        let request = self.http.get(format!(
            "{}/api/projects/{}/status",
            self.server_url, project_id.0
        ));
        let res = self.authorized(request).await.send().await?;
        read_json(res).await
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
