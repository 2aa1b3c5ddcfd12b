use shared::domain::{Project, ProjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }
}

/// Controller-owned session state. The project list is a read-only cache,
/// replaced wholesale on each successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub logged_in: bool,
    pub auth_mode: AuthMode,
    pub token: Option<String>,
    pub projects: Vec<Project>,
    pub polling: Option<ProjectId>,
}
