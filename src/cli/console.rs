//! Terminal implementations of the transfer collaborators.

use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;

use crate::codec::FileFilter;
use crate::transfer::{FilePicker, Notification, NotificationAction, Notifier, Progress};

/// Prints notifications to stderr.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if self.quiet {
            return;
        }
        match notification.action {
            // Clipboard text is the error itself; the message already shows it.
            Some(NotificationAction::CopyToClipboard(_)) => {
                eprintln!("{}", notification.message.red());
            }
            None => eprintln!("{}", notification.message),
        }
    }
}

/// Single-line percentage indicator on stderr. Silent unless stderr is a
/// terminal.
#[derive(Debug)]
pub struct ConsoleProgress {
    enabled: bool,
    visible: AtomicBool,
}

impl ConsoleProgress {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            enabled: !quiet && std::io::stderr().is_terminal(),
            visible: AtomicBool::new(false),
        }
    }
}

impl Progress for ConsoleProgress {
    fn set_visible(&self, visible: bool) {
        let was = self.visible.swap(visible, Ordering::Relaxed);
        if self.enabled && was && !visible {
            eprintln!();
        }
    }

    fn set_percentage(&self, percentage: u8) {
        if self.enabled && self.visible.load(Ordering::Relaxed) {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "\rResolving channels... {:>3}%", percentage.min(100));
            let _ = stderr.flush();
        }
    }
}

/// Answers file dialogs from command-line arguments.
///
/// `open` returns the input path given on the command line. `save` returns
/// `--output` if given, else the proposed name inside `dir`.
#[derive(Debug, Clone, Default)]
pub struct PathPicker {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    dir: PathBuf,
}

impl PathPicker {
    /// Picker for an import of `file`.
    #[must_use]
    pub fn input(file: PathBuf) -> Self {
        Self {
            input: Some(file),
            ..Self::default()
        }
    }

    /// Picker for an export to `output`, or to a default name in `dir`.
    #[must_use]
    pub fn output(output: Option<PathBuf>, dir: PathBuf) -> Self {
        Self {
            input: None,
            output,
            dir,
        }
    }
}

fn check_filters(path: &Path, filters: &[FileFilter]) {
    if !filters.is_empty() && !filters.iter().any(|f| f.matches(path)) {
        let expected: Vec<&str> = filters.iter().flat_map(|f| f.extensions.iter().copied()).collect();
        tracing::warn!(
            path = %path.display(),
            expected = %expected.join(", "),
            "File extension does not match the expected format"
        );
    }
}

impl FilePicker for PathPicker {
    async fn open(&self, filters: &[FileFilter]) -> Option<PathBuf> {
        let path = self.input.clone()?;
        check_filters(&path, filters);
        Some(path)
    }

    async fn save(&self, default_name: &str, filters: &[FileFilter]) -> Option<PathBuf> {
        let path = self
            .output
            .clone()
            .unwrap_or_else(|| self.dir.join(default_name));
        check_filters(&path, filters);
        Some(path)
    }
}
