//! Working-directory indicator shown under the chat panel.

use std::path::{Path, PathBuf};

use malleable_session::DirectoryPick;

/// `path` with the home directory replaced by `~`.
pub fn shorten_home(path: &Path, home: Option<&Path>) -> String {
    match home.and_then(|home| path.strip_prefix(home).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CwdIndicator {
    path: PathBuf,
    display: String,
}

impl CwdIndicator {
    pub fn new(path: PathBuf) -> Self {
        let home = dirs::home_dir();
        Self::with_home(path, home.as_deref())
    }

    pub fn with_home(path: PathBuf, home: Option<&Path>) -> Self {
        let display = shorten_home(&path, home);
        Self { path, display }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Label text. The full path goes in the tooltip.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Apply a picker result. Returns `true` if the indicator changed.
    pub fn apply(&mut self, pick: &DirectoryPick) -> bool {
        match pick {
            DirectoryPick::Canceled => false,
            DirectoryPick::Picked(path) => {
                *self = Self::new(path.clone());
                true
            }
        }
    }
}
