//! Opening finished downloads

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DownloadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpenKind {
    /// Open with the default application
    File,
    /// Reveal in the file manager
    Folder,
}

impl std::str::FromStr for OpenKind {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(OpenKind::File),
            "folder" => Ok(OpenKind::Folder),
            _ => Err(DownloadError::UnknownOpenKind(s.to_string())),
        }
    }
}

/// Platform shell integration provided by the embedding layer
pub trait PathOpener: Send + Sync {
    fn open_file(&self, path: &Path);
    fn show_in_folder(&self, path: &Path);
}

/// Hand a download result to the opener. Empty paths are ignored.
pub fn open_path(opener: &dyn PathOpener, path: &str, kind: OpenKind) -> bool {
    if path.trim().is_empty() {
        return false;
    }

    let path = Path::new(path);
    match kind {
        OpenKind::File => opener.open_file(path),
        OpenKind::Folder => opener.show_in_folder(path),
    }
    tracing::debug!(path = %path.display(), kind = ?kind, "Opened download result");
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::path::PathBuf;

    #[derive(Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<(OpenKind, PathBuf)>>,
    }

    impl PathOpener for RecordingOpener {
        fn open_file(&self, path: &Path) {
            self.opened.lock().push((OpenKind::File, path.to_path_buf()));
        }

        fn show_in_folder(&self, path: &Path) {
            self.opened.lock().push((OpenKind::Folder, path.to_path_buf()));
        }
    }

    #[test]
    fn test_open_path() {
        let opener = RecordingOpener::default();

        assert!(open_path(&opener, "/downloads/a.pdf", OpenKind::File));
        assert!(open_path(&opener, "/downloads/a.pdf", "folder".parse().unwrap()));
        assert!(!open_path(&opener, "", OpenKind::File));

        let opened = opener.opened.lock();
        assert_eq!(opened.len(), 2);
        assert_eq!(opened[0], (OpenKind::File, PathBuf::from("/downloads/a.pdf")));
        assert_eq!(opened[1].0, OpenKind::Folder);
    }

    #[test]
    fn test_unknown_kind() {
        assert!("window".parse::<OpenKind>().is_err());
    }
}
