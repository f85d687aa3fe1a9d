//! Shared application state for request handlers.

use crate::launcher::Launcher;

/// Shared application state, cloneable across handlers.
///
/// Holds no mutable data: the launcher only carries the resolved script
/// path and its process host.
#[derive(Clone, Debug)]
pub struct AppState {
    pub launcher: Launcher,
}

impl AppState {
    /// Creates a new application state around the given launcher.
    pub fn new(launcher: Launcher) -> Self {
        Self { launcher }
    }
}
