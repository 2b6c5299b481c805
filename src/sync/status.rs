//! Sync status line.
//!
//! One process-wide current value, no history. Components overwrite it at
//! each meaningful transition and a UI timer polls it; nothing ever blocks
//! on it. Every update is mirrored to the tracing log.

use std::sync::{Arc, RwLock};

use tracing::info;

/// Cloneable handle to the current status line
#[derive(Debug, Clone)]
pub struct StatusReporter {
    current: Arc<RwLock<String>>,
}

impl StatusReporter {
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new("Idle.".to_string())),
        }
    }

    /// Overwrite the current status.
    pub fn set(&self, message: impl Into<String>) {
        let message = message.into();
        info!(status = %message);
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = message;
    }

    /// Current status, for the polling UI.
    pub fn get(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for StatusReporter {
    fn default() -> Self {
        Self::new()
    }
}
