//! View-port seam: the controller describes region updates, the view layer draws them.

use chrono::{DateTime, Utc};
use shared::domain::Project;

use crate::{error::ControllerError, state::AuthMode};

pub const NO_PROJECTS_PLACEHOLDER: &str = "You have no projects yet. Create one below!";
pub const PROJECTS_UNAVAILABLE_PLACEHOLDER: &str = "Could not load projects.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    App,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFormView {
    pub title: &'static str,
    pub toggle_prompt: &'static str,
    pub toggle_label: &'static str,
    pub username_visible: bool,
}

impl AuthFormView {
    pub fn for_mode(mode: AuthMode) -> Self {
        match mode {
            AuthMode::Login => Self {
                title: "Login",
                toggle_prompt: "Don't have an account?",
                toggle_label: "Register",
                username_visible: true,
            },
            AuthMode::Register => Self {
                title: "Register",
                toggle_prompt: "Already have an account?",
                toggle_label: "Login",
                username_visible: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectCard {
    pub name: String,
    pub description: String,
    pub status: String,
}

impl From<&Project> for ProjectCard {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            status: project.status.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectListView {
    Empty,
    Cards(Vec<ProjectCard>),
    Unavailable,
}

impl ProjectListView {
    pub fn from_projects(projects: &[Project]) -> Self {
        if projects.is_empty() {
            Self::Empty
        } else {
            Self::Cards(projects.iter().map(ProjectCard::from).collect())
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::Empty => Some(NO_PROJECTS_PLACEHOLDER),
            Self::Unavailable => Some(PROJECTS_UNAVAILABLE_PLACEHOLDER),
            Self::Cards(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub at: DateTime<Utc>,
    pub text: String,
}

impl StatusLine {
    pub fn now(text: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            text: text.into(),
        }
    }
}

/// One update to a named mount point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    Screen(Screen),
    AuthForm(AuthFormView),
    AuthFormReset,
    ProjectList(ProjectListView),
    /// Shows the status section, clears prior lines and hides the final output.
    StatusLogReset,
    StatusLine(StatusLine),
    /// Shows the repository link. Hidden again by the next `StatusLogReset`.
    FinalOutput(String),
    Alert(ControllerError),
}

pub trait ViewPort: Send + Sync {
    fn render(&self, update: ViewUpdate);
}
