//! Remote filesystem operations used by the mirror

use crate::error::Result;
use std::path::Path;

/// The subset of SFTP the mirror needs. Paths are `/`-separated remote paths.
pub trait RemoteFs {
    /// `Ok(false)` only when the server reports the path as absent
    fn exists(&self, path: &str) -> Result<bool>;

    /// Create a single directory; the parent must already exist
    fn mkdir(&self, path: &str) -> Result<()>;

    /// Write the whole local file to `remote`, replacing any existing file.
    /// Returns the number of bytes sent.
    fn put(&self, local: &Path, remote: &str) -> Result<u64>;
}

/// Append `name` to a remote directory path
pub fn join_remote(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}
