//! HTTP server module.
//!
//! The server speaks plain HTTP/1.1 and includes:
//! - Graceful shutdown on SIGTERM/SIGINT with a bounded drain period
//!
//! Deployment scripts already launched keep running through shutdown.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
