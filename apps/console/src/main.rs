use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use client_core::{
    config::normalize_server_url, load_settings, load_settings_from, HttpProjectApi,
    PollOutcome, SessionController,
};
use shared::protocol::Credentials;
use tracing::info;

mod view;

use view::ConsoleView;

#[derive(Parser, Debug)]
struct Args {
    /// Settings file (flat TOML string table); defaults to ./client.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    username: String,
    #[arg(long)]
    password: String,
    /// Create the account instead of signing in.
    #[arg(long)]
    register: bool,
    /// Submit this idea and follow its status until it finishes.
    #[arg(long)]
    idea: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_settings_from(path),
        None => load_settings(),
    };
    if let Some(url) = &args.server_url {
        settings.server_url = normalize_server_url(url);
    }
    info!(server_url = %settings.server_url, "starting console client");

    let api = Arc::new(HttpProjectApi::from_settings(&settings)?);
    let controller = SessionController::new(api, Arc::new(ConsoleView), &settings);
    controller.start().await;

    if args.register {
        controller.toggle_auth_mode().await;
    }
    controller
        .submit_auth(&Credentials::new(args.username, args.password))
        .await
        .map_err(|err| anyhow!("authentication failed: {err}"))?;

    let outcome = match args.idea {
        Some(idea) => Some(follow_idea(&controller, &idea).await?),
        None => None,
    };

    controller.logout().await;

    match outcome.as_ref().and_then(PollOutcome::error) {
        Some(err) => bail!("project did not finish: {err}"),
        None => Ok(()),
    }
}

async fn follow_idea(controller: &Arc<SessionController>, idea: &str) -> Result<PollOutcome> {
    let handle = controller
        .submit_idea(idea)
        .await
        .map_err(|err| anyhow!("project submission failed: {err}"))?;
    let project_id = handle.project_id();
    let cancel = handle.cancellation_token();

    let wait = handle.wait();
    tokio::pin!(wait);
    tokio::select! {
        outcome = &mut wait => return Ok(outcome),
        _ = tokio::signal::ctrl_c() => {
            info!(project_id = %project_id, "interrupted; cancelling poll session");
            cancel.cancel();
        }
    }

    Ok(wait.await)
}
