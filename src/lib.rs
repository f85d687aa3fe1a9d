//! deploy-hook: an HTTP-triggered deployment launcher.
//!
//! Exposes `GET /health` and `POST /webhook`. A webhook call starts the
//! configured deployment script as a detached child process and answers
//! `202 Accepted` without waiting for it to finish.

pub mod config;
pub mod error;
pub mod http;
pub mod launcher;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::AppError;
pub use launcher::{LaunchError, Launcher, OsProcessHost, ProcessHost};
pub use routes::create_router;
pub use state::AppState;
