//! Session controller: auth flow, project listing, project submission and
//! status polling, all rendered through a [`ViewPort`].

use std::{sync::Arc, time::Duration};

use shared::{
    domain::{ProjectId, ProjectStatus},
    protocol::{AuthResponse, CreateProjectResponse, Credentials},
};
use tokio::{
    sync::Mutex,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    api::ProjectApi,
    config::ClientSettings,
    error::{describe_failure, ControllerError},
    poll::{PollHandle, PollOutcome},
    state::{AuthMode, SessionState},
    view::{AuthFormView, ProjectListView, Screen, StatusLine, ViewPort, ViewUpdate},
};

const AUTH_FAILED: &str = "Authentication failed.";
const SUBMISSION_FAILED: &str = "Could not start project.";
const GENERATION_FAILED: &str = "Project generation failed.";
const SESSION_ENDED: &str = "Signed out before the request finished.";
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

struct ActivePoll {
    generation: u64,
    project_id: ProjectId,
    cancel: CancellationToken,
}

struct ControllerState {
    session: SessionState,
    active_poll: Option<ActivePoll>,
    poll_generation: u64,
    /// Bumped on logout; work that started under an older value is discarded.
    session_generation: u64,
}

pub struct SessionController {
    api: Arc<dyn ProjectApi>,
    view: Arc<dyn ViewPort>,
    poll_interval: Duration,
    inner: Mutex<ControllerState>,
}

impl SessionController {
    pub fn new(
        api: Arc<dyn ProjectApi>,
        view: Arc<dyn ViewPort>,
        settings: &ClientSettings,
    ) -> Arc<Self> {
        Arc::new(Self {
            api,
            view,
            poll_interval: settings.poll_interval.max(MIN_POLL_INTERVAL),
            inner: Mutex::new(ControllerState {
                session: SessionState::default(),
                active_poll: None,
                poll_generation: 0,
                session_generation: 0,
            }),
        })
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.lock().await.session.clone()
    }

    /// Renders the initial view for the current (normally logged-out) session.
    pub async fn start(&self) {
        let mode = self.inner.lock().await.session.auth_mode;
        self.view
            .render(ViewUpdate::AuthForm(AuthFormView::for_mode(mode)));
        self.update_view().await;
    }

    async fn update_view(&self) {
        let logged_in = self.inner.lock().await.session.logged_in;
        if logged_in {
            self.view.render(ViewUpdate::Screen(Screen::App));
            // A failed fetch is already rendered inline.
            let _ = self.refresh_projects().await;
        } else {
            self.view.render(ViewUpdate::Screen(Screen::Auth));
        }
    }

    pub async fn toggle_auth_mode(&self) -> AuthMode {
        let mode = {
            let mut guard = self.inner.lock().await;
            guard.session.auth_mode = guard.session.auth_mode.toggled();
            guard.session.auth_mode
        };
        self.view
            .render(ViewUpdate::AuthForm(AuthFormView::for_mode(mode)));
        mode
    }

    /// Registers or logs in depending on the current auth mode. On failure the
    /// session is left untouched and an alert is rendered.
    pub async fn submit_auth(&self, credentials: &Credentials) -> Result<(), ControllerError> {
        let mode = self.inner.lock().await.session.auth_mode;
        let response = match mode {
            AuthMode::Register => self.api.register(credentials).await,
            AuthMode::Login => self.api.login(credentials).await,
        };

        let token = match response {
            Ok(AuthResponse {
                token: Some(token), ..
            }) if !token.is_empty() => token,
            Ok(AuthResponse { error, .. }) => {
                warn!(username = %credentials.username, ?mode, "authentication rejected");
                return Err(self.alert(ControllerError::Auth(
                    error.unwrap_or_else(|| AUTH_FAILED.to_string()),
                )));
            }
            Err(err) => {
                warn!(username = %credentials.username, ?mode, "authentication request failed: {err:#}");
                return Err(self.alert(ControllerError::Auth(format!(
                    "An error occurred: {}",
                    describe_failure(&err)
                ))));
            }
        };

        {
            let mut guard = self.inner.lock().await;
            guard.session.token = Some(token.clone());
            guard.session.logged_in = true;
        }
        self.api.set_token(Some(token)).await;
        info!(username = %credentials.username, ?mode, "signed in");

        self.update_view().await;
        Ok(())
    }

    /// Fetches the full project list and replaces the cache. On failure the
    /// cache is kept but the list region shows the unavailable placeholder.
    pub async fn refresh_projects(&self) -> Result<usize, ControllerError> {
        let session = self.inner.lock().await.session_generation;
        let fetched = self.api.get_projects().await;

        let mut guard = self.inner.lock().await;
        if guard.session_generation != session {
            debug!("discarding project list fetched for an ended session");
            return Err(ControllerError::Fetch(SESSION_ENDED.to_string()));
        }

        match fetched {
            Ok(projects) => {
                let count = projects.len();
                let list = ProjectListView::from_projects(&projects);
                guard.session.projects = projects;
                drop(guard);
                self.view.render(ViewUpdate::ProjectList(list));
                debug!(count, "project list refreshed");
                Ok(count)
            }
            Err(err) => {
                drop(guard);
                warn!("failed to fetch projects: {err:#}");
                self.view
                    .render(ViewUpdate::ProjectList(ProjectListView::Unavailable));
                Err(ControllerError::Fetch(describe_failure(&err)))
            }
        }
    }

    /// Submits a project idea and, once the backend accepts it, starts polling
    /// its status. Any poll session still running is cancelled first.
    pub async fn submit_idea(self: &Arc<Self>, idea: &str) -> Result<PollHandle, ControllerError> {
        let (logged_in, session) = {
            let guard = self.inner.lock().await;
            (guard.session.logged_in, guard.session_generation)
        };
        let idea = idea.trim();

        self.cancel_active_poll().await;
        self.view.render(ViewUpdate::StatusLogReset);

        if !logged_in {
            return Err(self.submission_error("Sign in before submitting an idea.".to_string()));
        }
        if idea.is_empty() {
            return Err(self.submission_error("Idea description must not be empty.".to_string()));
        }

        self.status_line("Submitting your idea...");

        match self.api.create_project(idea).await {
            Ok(CreateProjectResponse {
                project_id: Some(project_id),
                ..
            }) => {
                info!(project_id = %project_id, "project submitted");
                self.start_poll(project_id, session).await
            }
            Ok(CreateProjectResponse { error, .. }) => {
                let message = error.unwrap_or_else(|| SUBMISSION_FAILED.to_string());
                warn!("project submission rejected: {message}");
                Err(self.submission_error(message))
            }
            Err(err) => {
                warn!("project submission failed: {err:#}");
                let message = describe_failure(&err);
                self.status_line(format!("An error occurred: {message}"));
                Err(ControllerError::Submission(message))
            }
        }
    }

    /// Starts a poll session for `project_id`, replacing (and cancelling) any
    /// session already running. Requires a signed-in session.
    pub async fn poll_project_status(
        self: &Arc<Self>,
        project_id: ProjectId,
    ) -> Result<PollHandle, ControllerError> {
        let session = self.inner.lock().await.session_generation;
        self.start_poll(project_id, session).await
    }

    async fn start_poll(
        self: &Arc<Self>,
        project_id: ProjectId,
        session: u64,
    ) -> Result<PollHandle, ControllerError> {
        let cancel = CancellationToken::new();
        let generation = {
            let mut guard = self.inner.lock().await;
            if !guard.session.logged_in || guard.session_generation != session {
                debug!(project_id = %project_id, "session ended before polling could start");
                return Err(ControllerError::Submission(SESSION_ENDED.to_string()));
            }
            guard.poll_generation += 1;
            let generation = guard.poll_generation;
            let previous = guard.active_poll.replace(ActivePoll {
                generation,
                project_id,
                cancel: cancel.clone(),
            });
            if let Some(previous) = previous {
                debug!(project_id = %previous.project_id, "cancelling superseded poll session");
                previous.cancel.cancel();
            }
            guard.session.polling = Some(project_id);
            generation
        };

        let controller = Arc::clone(self);
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let outcome = controller.run_poll(project_id, &token).await;
            controller.finish_poll(generation).await;
            outcome
        });

        Ok(PollHandle::new(project_id, cancel, task))
    }

    async fn run_poll(&self, project_id: ProjectId, cancel: &CancellationToken) -> PollOutcome {
        let period = self.poll_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.cancelled(project_id),
                _ = ticker.tick() => {}
            }

            let report = tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.cancelled(project_id),
                report = self.api.get_project_status(project_id) => report,
            };

            let report = match report {
                Ok(report) => report,
                Err(err) => {
                    warn!(project_id = %project_id, "status check failed: {err:#}");
                    let message = describe_failure(&err);
                    self.status_line(format!("Error polling status: {message}"));
                    return PollOutcome::Errored(ControllerError::Poll(message));
                }
            };

            self.status_line(format!(
                "Current Status: {}",
                report.current_agent.as_deref().unwrap_or("Processing...")
            ));

            if !report.status.is_terminal() {
                debug!(project_id = %project_id, status = %report.status, "project still running");
                continue;
            }

            if report.status == ProjectStatus::Completed {
                info!(project_id = %project_id, "project generation complete");
                self.status_line("Project generation complete!");
                if let Some(url) = &report.repo_url {
                    self.view.render(ViewUpdate::FinalOutput(url.clone()));
                }
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => debug!(project_id = %project_id, "skipping refresh for cancelled poll session"),
                    _ = self.refresh_projects() => {}
                }
                return PollOutcome::Completed {
                    repo_url: report.repo_url,
                };
            }

            let message = report
                .error
                .unwrap_or_else(|| GENERATION_FAILED.to_string());
            warn!(project_id = %project_id, "project generation failed: {message}");
            self.status_line(format!("Error: {message}"));
            return PollOutcome::Failed(ControllerError::Poll(message));
        }
    }

    fn cancelled(&self, project_id: ProjectId) -> PollOutcome {
        debug!(project_id = %project_id, "poll session cancelled");
        PollOutcome::Cancelled
    }

    async fn finish_poll(&self, generation: u64) {
        let mut guard = self.inner.lock().await;
        let is_current = guard
            .active_poll
            .as_ref()
            .is_some_and(|active| active.generation == generation);
        if is_current {
            guard.active_poll = None;
            guard.session.polling = None;
        }
    }

    async fn cancel_active_poll(&self) {
        let active = {
            let mut guard = self.inner.lock().await;
            guard.session.polling = None;
            guard.active_poll.take()
        };
        if let Some(active) = active {
            debug!(project_id = %active.project_id, "cancelling active poll session");
            active.cancel.cancel();
        }
    }

    /// Clears the session and returns to the auth view. The token is not
    /// invalidated server-side.
    pub async fn logout(&self) {
        let active = {
            let mut guard = self.inner.lock().await;
            guard.session_generation += 1;
            guard.session = SessionState {
                auth_mode: guard.session.auth_mode,
                ..SessionState::default()
            };
            guard.active_poll.take()
        };
        if let Some(active) = active {
            debug!(project_id = %active.project_id, "cancelling poll session on sign-out");
            active.cancel.cancel();
        }
        self.api.set_token(None).await;
        info!("signed out");

        self.view.render(ViewUpdate::AuthFormReset);
        self.update_view().await;
    }

    fn status_line(&self, text: impl Into<String>) {
        self.view
            .render(ViewUpdate::StatusLine(StatusLine::now(text)));
    }

    fn submission_error(&self, message: String) -> ControllerError {
        self.status_line(format!("Error: {message}"));
        ControllerError::Submission(message)
    }

    fn alert(&self, err: ControllerError) -> ControllerError {
        self.view.render(ViewUpdate::Alert(err.clone()));
        err
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
