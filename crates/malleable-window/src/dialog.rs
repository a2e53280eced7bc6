//! Native folder picker that never blocks the event loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use tracing::debug;

type Picker = Arc<dyn Fn() -> Option<PathBuf> + Send + Sync>;

/// Result emitted once a folder dialog completes. `path` is `None` when the
/// user cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderDialogResult {
    pub request_id: u64,
    pub path: Option<PathBuf>,
}

struct PendingDialog {
    request_id: u64,
    receiver: Receiver<Option<PathBuf>>,
    join: Option<JoinHandle<()>>,
}

impl PendingDialog {
    fn finish(mut self, path: Option<PathBuf>) -> FolderDialogResult {
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
        FolderDialogResult {
            request_id: self.request_id,
            path,
        }
    }
}

/// Runs each dialog on its own thread; results are collected with [`poll`](Self::poll).
pub struct FolderDialogService {
    pending: Vec<PendingDialog>,
    picker: Picker,
}

impl Default for FolderDialogService {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderDialogService {
    pub fn new() -> Self {
        Self::with_picker(|| rfd::FileDialog::new().pick_folder())
    }

    /// Use a custom picker instead of the native dialog.
    pub fn with_picker(picker: impl Fn() -> Option<PathBuf> + Send + Sync + 'static) -> Self {
        Self {
            pending: Vec::new(),
            picker: Arc::new(picker),
        }
    }

    pub fn request(&mut self, request_id: u64) {
        let (tx, rx) = mpsc::channel();
        let picker = Arc::clone(&self.picker);
        let join = thread::spawn(move || {
            let _ = tx.send(picker());
        });
        debug!(request_id, "folder dialog opened");
        self.pending.push(PendingDialog {
            request_id,
            receiver: rx,
            join: Some(join),
        });
    }

    /// Return every dialog that has completed since the last poll.
    pub fn poll(&mut self) -> Vec<FolderDialogResult> {
        let mut ready = Vec::new();
        let mut still_pending = Vec::new();

        for dialog in self.pending.drain(..) {
            match dialog.receiver.try_recv() {
                Ok(path) => ready.push(dialog.finish(path)),
                Err(TryRecvError::Empty) => still_pending.push(dialog),
                Err(TryRecvError::Disconnected) => ready.push(dialog.finish(None)),
            }
        }

        self.pending = still_pending;
        ready
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
