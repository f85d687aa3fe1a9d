//! Real process host backed by the filesystem and `tokio::process`.

use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

use super::ProcessHost;

/// Launches scripts through the operating system.
///
/// `spawn_detached` must be called from within a Tokio runtime: the child is
/// handed to a background task that reaps it and logs its exit status.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProcessHost;

impl ProcessHost for OsProcessHost {
    #[cfg(unix)]
    fn make_executable(&self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let mut permissions = std::fs::metadata(path)?.permissions();
        let mode = permissions.mode();
        if mode & 0o111 == 0o111 {
            return Ok(());
        }
        permissions.set_mode(mode | 0o111);
        std::fs::set_permissions(path, permissions)
    }

    #[cfg(not(unix))]
    fn make_executable(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn spawn_detached(&self, path: &Path) -> io::Result<()> {
        let mut child = Command::new(path)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(false)
            .spawn()?;

        let pid = child.id();
        let script = path.display().to_string();
        tracing::debug!(?pid, %script, "Spawned deployment script");

        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => {
                    tracing::info!(?pid, %script, "Deployment script exited successfully");
                }
                Ok(status) => {
                    tracing::warn!(?pid, %script, code = ?status.code(), "Deployment script exited with failure");
                }
                Err(e) => {
                    tracing::error!(?pid, %script, error = %e, "Failed to wait for deployment script");
                }
            }
        });

        Ok(())
    }
}
