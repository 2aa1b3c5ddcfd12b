use shared::domain::ProjectId;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::ControllerError;

/// How a poll session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Completed { repo_url: Option<String> },
    /// The backend reported `failed`.
    Failed(ControllerError),
    /// A status check itself failed.
    Errored(ControllerError),
    Cancelled,
}

impl PollOutcome {
    pub fn error(&self) -> Option<&ControllerError> {
        match self {
            Self::Failed(err) | Self::Errored(err) => Some(err),
            Self::Completed { .. } | Self::Cancelled => None,
        }
    }
}

/// Handle to one running poll session. Dropping the handle does not stop the
/// session; call [`PollHandle::cancel`] for that.
pub struct PollHandle {
    project_id: ProjectId,
    cancel: CancellationToken,
    task: JoinHandle<PollOutcome>,
}

impl PollHandle {
    pub(crate) fn new(
        project_id: ProjectId,
        cancel: CancellationToken,
        task: JoinHandle<PollOutcome>,
    ) -> Self {
        Self {
            project_id,
            cancel,
            task,
        }
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A token that cancels this session, usable while the handle is being awaited.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn wait(self) -> PollOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_cancelled() => PollOutcome::Cancelled,
            Err(err) => {
                PollOutcome::Errored(ControllerError::Poll(format!("poll task panicked: {err}")))
            }
        }
    }
}
