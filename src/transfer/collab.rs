//! Collaborator interfaces the orchestrator drives.
//!
//! File dialogs, file access, user notifications and the progress indicator
//! all live outside the import/export engine. The CLI provides console
//! implementations; tests provide recording fakes.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::codec::FileFilter;

/// Chooses files to import from and export to.
///
/// `None` means the user cancelled.
pub trait FilePicker: Send + Sync {
    /// Pick an existing file to read.
    fn open(&self, filters: &[FileFilter]) -> impl Future<Output = Option<PathBuf>> + Send;

    /// Pick a destination, proposing `default_name`.
    fn save(
        &self,
        default_name: &str,
        filters: &[FileFilter],
    ) -> impl Future<Output = Option<PathBuf>> + Send;
}

/// Whole-file reads and writes.
pub trait FileIo: Send + Sync {
    /// Read a file fully.
    fn read(&self, path: &Path) -> impl Future<Output = io::Result<Vec<u8>>> + Send;

    /// Create or truncate a file with `bytes`.
    fn write(&self, path: &Path, bytes: &[u8]) -> impl Future<Output = io::Result<()>> + Send;
}

/// Local filesystem access through `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl FileIo for LocalFiles {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::write(path, bytes).await
    }
}

/// Action attached to a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationAction {
    /// Clicking the notification copies this text.
    CopyToClipboard(String),
}

/// A transient user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    /// How long to show it; `None` uses the presenter's default.
    pub duration: Option<Duration>,
    pub action: Option<NotificationAction>,
}

impl Notification {
    /// A plain message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            duration: None,
            action: None,
        }
    }

    /// A message whose click copies `text`.
    pub fn copyable(message: impl Into<String>, text: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            duration: Some(duration),
            action: Some(NotificationAction::CopyToClipboard(text.into())),
        }
    }
}

/// Presents notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// The progress indicator shown during subscription resolution.
pub trait Progress: Send + Sync {
    fn set_visible(&self, visible: bool);

    /// Percentage in `0..=100`.
    fn set_percentage(&self, percentage: u8);
}

/// Notifier and progress sink that discard everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn notify(&self, _notification: Notification) {}
}

impl Progress for Silent {
    fn set_visible(&self, _visible: bool) {}
    fn set_percentage(&self, _percentage: u8) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copyable_notification() {
        let n = Notification::copyable("Local API Error (Click to copy): x", "x", Duration::from_secs(10));
        assert_eq!(n.duration, Some(Duration::from_secs(10)));
        assert_eq!(n.action, Some(NotificationAction::CopyToClipboard("x".into())));
        assert!(Notification::message("hi").action.is_none());
    }

    #[tokio::test]
    async fn test_local_files_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        LocalFiles.write(&path, b"{}").await.unwrap();
        assert_eq!(LocalFiles.read(&path).await.unwrap(), b"{}".to_vec());
        assert!(LocalFiles.read(&dir.path().join("missing")).await.is_err());
    }
}
