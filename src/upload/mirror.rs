//! Recursive directory mirroring
//!
//! Walks the local tree depth-first. A remote directory is made to exist
//! before anything inside it is uploaded, and every file is uploaded in full
//! on every run. The first failed upload aborts the walk; files already sent
//! stay on the server.

use crate::{
    error::{Result, RunnerError},
    upload::remote::{RemoteFs, join_remote},
    utils::fs::FileSystemUtils,
};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Counters for one mirror run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MirrorStats {
    pub directories_created: usize,
    pub files_uploaded: usize,
    pub bytes_uploaded: u64,
}

/// Mirrors a local directory tree onto a [`RemoteFs`]
pub struct Mirror<'a, R: RemoteFs + ?Sized> {
    remote: &'a R,
    fs_utils: FileSystemUtils,
    stats: MirrorStats,
}

impl<'a, R: RemoteFs + ?Sized> Mirror<'a, R> {
    pub fn new(remote: &'a R) -> Self {
        Self {
            remote,
            fs_utils: FileSystemUtils::new(),
            stats: MirrorStats::default(),
        }
    }

    /// Upload everything under `local_dir` to `remote_dir`
    pub fn run(mut self, local_dir: &Path, remote_dir: &str) -> Result<MirrorStats> {
        self.upload_directory(local_dir, remote_dir)?;
        Ok(self.stats)
    }

    #[instrument(skip(self))]
    fn upload_directory(&mut self, local_dir: &Path, remote_dir: &str) -> Result<()> {
        info!("Uploading {} -> {}", local_dir.display(), remote_dir);

        self.ensure_remote_directory(remote_dir)?;

        let entries = self
            .fs_utils
            .sorted_entries(local_dir)
            .map_err(|e| RunnerError::file_system("read_dir", local_dir, e))?;

        for entry in entries {
            let local_path = entry.path();
            let name = entry.file_name();
            let remote_path = join_remote(remote_dir, &name.to_string_lossy());

            if local_path.is_dir() {
                self.upload_directory(&local_path, &remote_path)?;
            } else {
                debug!(
                    "Uploading file: {} -> {}",
                    local_path.display(),
                    remote_path
                );
                let bytes = self.remote.put(&local_path, &remote_path)?;
                self.stats.files_uploaded += 1;
                self.stats.bytes_uploaded += bytes;
                debug!("Uploaded: {} ({} bytes)", name.to_string_lossy(), bytes);
            }
        }

        Ok(())
    }

    /// Make `remote_dir` and any missing ancestors exist.
    ///
    /// A failed mkdir is only logged: another runner may have created the
    /// directory in the meantime, and a directory that really is missing
    /// surfaces as a failed upload right after.
    fn ensure_remote_directory(&mut self, remote_dir: &str) -> Result<()> {
        if self.remote.exists(remote_dir)? {
            return Ok(());
        }

        let mut current = String::new();
        if remote_dir.starts_with('/') {
            current.push('/');
        }

        for part in remote_dir.split('/').filter(|p| !p.is_empty()) {
            if !current.is_empty() && !current.ends_with('/') {
                current.push('/');
            }
            current.push_str(part);

            if self.remote.exists(&current)? {
                continue;
            }

            match self.remote.mkdir(&current) {
                Ok(()) => {
                    self.stats.directories_created += 1;
                    debug!("Created remote directory: {}", current);
                }
                Err(e) => debug!("Directory may already exist or mkdir failed: {}", e),
            }
        }

        Ok(())
    }
}

/// Mirror `local_dir` onto `remote_dir` through `remote`
pub fn mirror_directory<R: RemoteFs + ?Sized>(
    remote: &R,
    local_dir: &Path,
    remote_dir: &str,
) -> Result<MirrorStats> {
    Mirror::new(remote).run(local_dir, remote_dir)
}
