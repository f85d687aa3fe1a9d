//! Deployment script launcher.
//!
//! A launch is three ordered steps, each of which short-circuits on failure:
//! 1. The script must exist at the configured path
//! 2. The execute bits are added to the script
//! 3. The script is started as a detached child process
//!
//! The caller never waits for the child. Operating system access goes through
//! the [`ProcessHost`] trait so the steps can be observed in tests.

mod os;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use os::OsProcessHost;

/// Operating system facilities needed to launch a script.
pub trait ProcessHost: Send + Sync {
    /// Add the execute permission bits to `path`.
    fn make_executable(&self, path: &Path) -> io::Result<()>;

    /// Start `path` as a child process without waiting for it.
    fn spawn_detached(&self, path: &Path) -> io::Result<()>;
}

/// Why a launch did not start a process.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("{name} script not found")]
    ScriptNotFound { name: String },

    #[error("Failed to make script executable: {0}")]
    Permission(#[source] io::Error),

    #[error("An error occurred: {0}")]
    Spawn(#[source] io::Error),
}

/// Launches the configured deployment script on demand.
///
/// Cloning is cheap; clones share the same [`ProcessHost`].
#[derive(Clone)]
pub struct Launcher {
    script: PathBuf,
    host: Arc<dyn ProcessHost>,
}

impl Launcher {
    pub fn new(script: PathBuf, host: Arc<dyn ProcessHost>) -> Self {
        Self { script, host }
    }

    /// Launcher backed by the real operating system.
    pub fn with_os(script: PathBuf) -> Self {
        Self::new(script, Arc::new(OsProcessHost))
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    /// Run the existence, permission, and spawn steps in order.
    ///
    /// Returns as soon as the child has been started. Concurrent calls are not
    /// serialized and each one starts its own process.
    pub fn launch(&self) -> Result<(), LaunchError> {
        if !self.script.exists() {
            return Err(LaunchError::ScriptNotFound {
                name: self.script_name(),
            });
        }

        self.host
            .make_executable(&self.script)
            .map_err(LaunchError::Permission)?;

        self.host
            .spawn_detached(&self.script)
            .map_err(LaunchError::Spawn)?;

        tracing::info!(script = %self.script.display(), "Deployment script started");
        Ok(())
    }

    fn script_name(&self) -> String {
        self.script
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.script.display().to_string())
    }
}

impl std::fmt::Debug for Launcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Launcher")
            .field("script", &self.script)
            .finish_non_exhaustive()
    }
}
