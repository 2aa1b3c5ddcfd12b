//! Client-side session controller for the SwiftMaq project backend.
//!
//! [`SessionController`] owns the session state and drives the view through a
//! [`ViewPort`]; all network I/O goes through a [`ProjectApi`].

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod http;
pub mod poll;
pub mod state;
pub mod view;

pub use api::{MissingProjectApi, ProjectApi};
pub use config::{load_settings, load_settings_from, ClientSettings};
pub use controller::SessionController;
pub use error::{ControllerError, ErrorCategory};
pub use http::HttpProjectApi;
pub use poll::{PollHandle, PollOutcome};
pub use state::{AuthMode, SessionState};
pub use view::{ViewPort, ViewUpdate};
