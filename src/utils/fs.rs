//! Local file system helpers
//!
//! Path resolution for configured locations and ordered directory listings
//! for the upload walk.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument};

/// Utility struct for file system operations
#[derive(Debug, Default)]
pub struct FileSystemUtils;

impl FileSystemUtils {
    /// Create a new file system utilities instance
    pub fn new() -> Self {
        Self
    }

    /// Directory containing the running executable.
    ///
    /// Falls back to the current directory when the executable path cannot be
    /// determined.
    pub fn install_dir(&self) -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Resolve `path` against `base` when relative and normalize it lexically.
    ///
    /// `.` components are dropped and `..` pops the previous component; no
    /// symlinks are followed and the path does not need to exist.
    pub fn resolve_path<P: AsRef<Path>, B: AsRef<Path>>(&self, path: P, base: B) -> PathBuf {
        let path = path.as_ref();
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.as_ref().join(path)
        };
        let absolute = std::path::absolute(&joined).unwrap_or(joined);
        normalize(&absolute)
    }

    /// List a directory's entries sorted by file name
    #[instrument(skip(self))]
    pub fn sorted_entries<P: AsRef<Path> + std::fmt::Debug>(
        &self,
        dir: P,
    ) -> io::Result<Vec<fs::DirEntry>> {
        let dir = dir.as_ref();
        let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
        entries.sort_by_key(fs::DirEntry::file_name);
        debug!("{} entries in {}", entries.len(), dir.display());
        Ok(entries)
    }

    /// Read file contents as string
    #[instrument(skip(self))]
    pub fn read_file_to_string<P: AsRef<Path> + std::fmt::Debug>(
        &self,
        path: P,
    ) -> io::Result<String> {
        let path = path.as_ref();
        debug!("Reading file: {}", path.display());
        fs::read_to_string(path)
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_relative_path() {
        let fs_utils = FileSystemUtils::new();
        let resolved = fs_utils.resolve_path("munki_repo", "/opt/runner");
        assert_eq!(resolved, PathBuf::from("/opt/runner/munki_repo"));
    }

    #[test]
    fn test_resolve_normalizes_dot_components() {
        let fs_utils = FileSystemUtils::new();
        let resolved = fs_utils.resolve_path("../shared/./repo", "/opt/runner");
        assert_eq!(resolved, PathBuf::from("/opt/shared/repo"));
    }

    #[test]
    fn test_absolute_path_ignores_base() {
        let fs_utils = FileSystemUtils::new();
        let resolved = fs_utils.resolve_path("/srv/munki", "/opt/runner");
        assert_eq!(resolved, PathBuf::from("/srv/munki"));
    }

    #[test]
    fn test_sorted_entries() {
        let temp_dir = TempDir::new().unwrap();
        let fs_utils = FileSystemUtils::new();

        fs::write(temp_dir.path().join("b.txt"), "b").unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(temp_dir.path().join("c")).unwrap();

        let names: Vec<_> = fs_utils
            .sorted_entries(temp_dir.path())
            .unwrap()
            .into_iter()
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.txt", "b.txt", "c"]);
    }

    #[test]
    fn test_install_dir_is_absolute() {
        let fs_utils = FileSystemUtils::new();
        assert!(fs_utils.install_dir().is_absolute());
    }
}
