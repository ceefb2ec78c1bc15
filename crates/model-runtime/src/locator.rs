//! Model Artifact Locator

use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Directories probed for model artifacts, in order
pub const DEFAULT_SEARCH_DIRS: [&str; 4] = ["models", "assets/models", ".", "/content/models"];

/// Probes a list of candidate directories for artifact files
#[derive(Debug, Clone)]
pub struct ModelLocator {
    search_dirs: Vec<PathBuf>,
}

impl ModelLocator {
    /// Create a locator over the given directories
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            search_dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Return the first existing `<dir>/<file_name>`
    pub fn locate(&self, file_name: &str) -> Option<PathBuf> {
        let found = self
            .search_dirs
            .iter()
            .map(|dir| dir.join(file_name))
            .inspect(|candidate| trace!("Probing {}", candidate.display()))
            .find(|candidate| candidate.is_file());

        match &found {
            Some(path) => debug!("Found {} at {}", file_name, path.display()),
            None => debug!("{} not found in {} directories", file_name, self.search_dirs.len()),
        }
        found
    }

    /// Try `<stem>.<ext>` for each extension in order
    pub fn locate_any(&self, stem: &str, extensions: &[&str]) -> Option<PathBuf> {
        extensions
            .iter()
            .find_map(|ext| self.locate(&format!("{}.{}", stem, ext)))
    }

    /// Configured directories
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Extension of a located artifact, lowercased
    pub fn extension(path: &Path) -> Option<String> {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

impl Default for ModelLocator {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DIRS)
    }
}
