use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(ProjectId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    /// Any status string the backend reports that this client does not know.
    #[serde(other)]
    Unknown,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }

    /// `completed` and `failed` end a poll session; everything else keeps it going.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(rename = "project_name")]
    pub name: String,
    #[serde(rename = "idea_description")]
    pub description: String,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_reads_backend_field_names() {
        let project: Project = serde_json::from_str(
            r#"{"id":4,"project_name":"todo","idea_description":"a todo app","status":"in_progress"}"#,
        )
        .expect("project");
        assert_eq!(project.id, ProjectId(4));
        assert_eq!(project.name, "todo");
        assert_eq!(project.description, "a todo app");
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.repo_url, None);
    }

    #[test]
    fn unrecognized_status_is_unknown_and_not_terminal() {
        let status: ProjectStatus = serde_json::from_str(r#""queued""#).expect("status");
        assert_eq!(status, ProjectStatus::Unknown);
        assert!(!status.is_terminal());
        assert!(ProjectStatus::Completed.is_terminal());
        assert!(ProjectStatus::Failed.is_terminal());
        assert!(!ProjectStatus::Pending.is_terminal());
    }
}
