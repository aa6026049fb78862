//! Recording fakes for orchestrator tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::codec::FileFilter;
use crate::error::{Error, Result};
use crate::model::{ChannelDetails, Thumbnail};
use crate::resolver::{BackendKind, BoxedBackend, ChannelBackend, Resolver};
use crate::store::MemoryStore;

use super::collab::{FileIo, FilePicker, Notification, Notifier, Progress};
use super::{Orchestrator, TransferOptions};

/// Captures formatted `warn` and above log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        let buffer = self.clone();
        tracing_subscriber::fmt()
            .with_writer(move || buffer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .without_time()
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Picker that answers every dialog with fixed paths.
#[derive(Clone, Default)]
pub struct FakePicker {
    pub open: Option<PathBuf>,
    pub save: Option<PathBuf>,
    pub proposed: Arc<Mutex<Vec<String>>>,
    pub filters: Arc<Mutex<Vec<Vec<FileFilter>>>>,
}

impl FakePicker {
    pub fn opening(path: &str) -> Self {
        Self {
            open: Some(PathBuf::from(path)),
            ..Self::default()
        }
    }

    pub fn saving(path: &str) -> Self {
        Self {
            save: Some(PathBuf::from(path)),
            ..Self::default()
        }
    }

    pub fn cancelling() -> Self {
        Self::default()
    }
}

impl FilePicker for FakePicker {
    async fn open(&self, filters: &[FileFilter]) -> Option<PathBuf> {
        self.filters.lock().unwrap().push(filters.to_vec());
        self.open.clone()
    }

    async fn save(&self, default_name: &str, filters: &[FileFilter]) -> Option<PathBuf> {
        self.proposed.lock().unwrap().push(default_name.to_string());
        self.filters.lock().unwrap().push(filters.to_vec());
        self.save.clone()
    }
}

/// In-memory files that count reads and writes.
#[derive(Clone, Default)]
pub struct MemFiles {
    files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    pub reads: Arc<AtomicUsize>,
    pub writes: Arc<AtomicUsize>,
    pub fail_writes: bool,
}

impl MemFiles {
    pub fn with(path: &str, bytes: &[u8]) -> Self {
        let files = Self::default();
        files.put(path, bytes);
        files
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn put(&self, path: &str, bytes: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), bytes.to_vec());
    }

    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl FileIo for MemFiles {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier(Mutex<Vec<Notification>>);

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.0.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.all().into_iter().map(|n| n.message).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.0.lock().unwrap().push(notification);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Visible(bool),
    Percent(u8),
}

#[derive(Default)]
pub struct RecordingProgress(Mutex<Vec<ProgressEvent>>);

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl Progress for RecordingProgress {
    fn set_visible(&self, visible: bool) {
        self.0.lock().unwrap().push(ProgressEvent::Visible(visible));
    }

    fn set_percentage(&self, percentage: u8) {
        self.0.lock().unwrap().push(ProgressEvent::Percent(percentage));
    }
}

/// Backend that names channels `"{Label} {id}"`, or fails.
pub struct FakeBackend {
    pub kind: BackendKind,
    pub ok: bool,
    pub calls: Arc<AtomicUsize>,
}

impl ChannelBackend for FakeBackend {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn channel_info(&self, channel_id: &str) -> Result<ChannelDetails> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Vary completion order.
        if channel_id.ends_with('1') {
            tokio::task::yield_now().await;
        }
        if self.ok {
            Ok(ChannelDetails {
                author: format!("{} {channel_id}", self.kind.label()),
                author_thumbnails: vec![
                    Thumbnail { url: format!("https://t/{channel_id}/s") },
                    Thumbnail { url: format!("https://t/{channel_id}/m") },
                ],
            })
        } else {
            Err(Error::Resolution(format!("{} is down", self.kind.label())))
        }
    }
}

/// Resolver over two fakes, with their call counters.
pub struct FakeResolver {
    pub resolver: Resolver,
    pub local_calls: Arc<AtomicUsize>,
    pub invidious_calls: Arc<AtomicUsize>,
}

pub fn fake_resolver(preference: BackendKind, fallback: bool, local_ok: bool, invidious_ok: bool) -> FakeResolver {
    let local_calls = Arc::new(AtomicUsize::new(0));
    let invidious_calls = Arc::new(AtomicUsize::new(0));
    let resolver = Resolver::new(
        vec![
            BoxedBackend::new(FakeBackend {
                kind: BackendKind::Local,
                ok: local_ok,
                calls: Arc::clone(&local_calls),
            }),
            BoxedBackend::new(FakeBackend {
                kind: BackendKind::Invidious,
                ok: invidious_ok,
                calls: Arc::clone(&invidious_calls),
            }),
        ],
        preference,
        fallback,
    );
    FakeResolver {
        resolver,
        local_calls,
        invidious_calls,
    }
}

pub struct Harness {
    pub orchestrator: Orchestrator<MemoryStore, FakePicker, MemFiles>,
    pub notifier: Arc<RecordingNotifier>,
    pub progress: Arc<RecordingProgress>,
    pub files: MemFiles,
}

pub fn harness(store: MemoryStore, picker: FakePicker, files: MemFiles, resolver: Resolver) -> Harness {
    let notifier = Arc::new(RecordingNotifier::default());
    let progress = Arc::new(RecordingProgress::default());
    let orchestrator = Orchestrator::new(store, picker, files.clone(), resolver)
        .with_notifier(notifier.clone())
        .with_progress(progress.clone())
        .with_options(TransferOptions {
            resolve_concurrency: 4,
            date: NaiveDate::from_ymd_opt(2021, 3, 7),
        });
    Harness {
        orchestrator,
        notifier,
        progress,
        files,
    }
}

pub const PROFILE_LINE: &str = r##"{"_id":"allChannels","name":"All Channels","bgColor":"#000000","textColor":"#FFFFFF","subscriptions":[{"id":"UC0","name":"Zero","thumbnail":"t0"}]}"##;

pub fn history_line(video: &str, extra: &str) -> String {
    format!(
        r#"{{"_id":"{video}","author":"A","authorId":"UC1","description":"d","isLive":false,"lengthSeconds":60,"paid":false,"published":1600000000000,"timeWatched":1610000000000,"title":"T","type":"video","videoId":"{video}","viewCount":10,"watchProgress":5{extra}}}"#
    )
}
