//! Host capability surface.
//!
//! The core runs embedded in a mod manager that owns the UI and the staging
//! directory. Everything it needs from the host goes through [`HostApi`]:
//! a blocking dialog, fire-and-forget notifications, and a single-file read
//! used by the INI probe and the REDmod `info.json` loader. Logging goes
//! through `tracing` directly and is not part of the trait.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

/// Severity of a blocking dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogSeverity {
    Info,
    Warning,
    Error,
}

/// Kind of a non-blocking notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
}

/// What the installer may ask of the embedding mod manager.
pub trait HostApi {
    /// Shows a blocking dialog and returns the chosen action string.
    fn show_dialog(
        &self,
        severity: DialogSeverity,
        title: &str,
        body: &str,
        actions: &[&str],
    ) -> Result<String>;

    /// Sends a non-blocking notification.
    fn send_notification(&self, kind: NotificationKind, title: &str, message: &str);

    /// Reads one staged file. `path` is absolute, under the staging dir.
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Host implementation for headless use (the CLI): reads the real staging
/// directory, logs notifications, and answers every dialog with its first
/// (default) action.
#[derive(Debug, Default)]
pub struct StagingHost;

impl HostApi for StagingHost {
    fn show_dialog(
        &self,
        severity: DialogSeverity,
        title: &str,
        body: &str,
        actions: &[&str],
    ) -> Result<String> {
        let default = actions.first().copied().unwrap_or("Ok");
        warn!(?severity, title, %body, default, "dialog auto-answered");
        Ok(default.to_string())
    }

    fn send_notification(&self, kind: NotificationKind, title: &str, message: &str) {
        match kind {
            NotificationKind::Info => info!(title, "{message}"),
            NotificationKind::Warning => warn!(title, "{message}"),
        }
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// Scripted host for tests: serves canned file bytes, records every dialog
/// and notification, and answers dialogs with a preset action.
#[cfg(test)]
pub struct MockHost {
    files: std::collections::HashMap<std::path::PathBuf, Vec<u8>>,
    dialog_answer: Option<String>,
    pub dialogs: std::cell::RefCell<Vec<String>>,
    pub notifications: std::cell::RefCell<Vec<(NotificationKind, String)>>,
}

#[cfg(test)]
impl MockHost {
    pub fn new() -> Self {
        Self {
            files: std::collections::HashMap::new(),
            dialog_answer: None,
            dialogs: std::cell::RefCell::new(Vec::new()),
            notifications: std::cell::RefCell::new(Vec::new()),
        }
    }

    /// Registers canned bytes for a staged file path.
    pub fn with_file(mut self, path: impl Into<std::path::PathBuf>, bytes: &[u8]) -> Self {
        self.files.insert(path.into(), bytes.to_vec());
        self
    }

    /// Pins the action every dialog returns (default: first offered).
    pub fn with_dialog_answer(mut self, answer: &str) -> Self {
        self.dialog_answer = Some(answer.to_string());
        self
    }

    pub fn dialog_count(&self) -> usize {
        self.dialogs.borrow().len()
    }

    pub fn notification_count(&self) -> usize {
        self.notifications.borrow().len()
    }
}

#[cfg(test)]
impl HostApi for MockHost {
    fn show_dialog(
        &self,
        _severity: DialogSeverity,
        title: &str,
        _body: &str,
        actions: &[&str],
    ) -> Result<String> {
        self.dialogs.borrow_mut().push(title.to_string());
        Ok(self
            .dialog_answer
            .clone()
            .unwrap_or_else(|| actions.first().copied().unwrap_or("Ok").to_string()))
    }

    fn send_notification(&self, kind: NotificationKind, _title: &str, message: &str) {
        self.notifications
            .borrow_mut()
            .push((kind, message.to_string()));
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no staged file at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_host_dialog_defaults_to_first_action() {
        let host = StagingHost;
        let choice = host
            .show_dialog(DialogSeverity::Warning, "t", "b", &["Use fallback", "Cancel"])
            .unwrap();
        assert_eq!(choice, "Use fallback");
    }

    #[test]
    fn test_mock_host_serves_files_and_records() {
        let host = MockHost::new()
            .with_file("/staging/info.json", b"{}")
            .with_dialog_answer("Cancel");
        assert_eq!(host.read_file(Path::new("/staging/info.json")).unwrap(), b"{}");
        assert!(host.read_file(Path::new("/staging/missing")).is_err());
        let choice = host
            .show_dialog(DialogSeverity::Error, "bad", "b", &["Ok", "Cancel"])
            .unwrap();
        assert_eq!(choice, "Cancel");
        assert_eq!(host.dialog_count(), 1);
    }
}
