//! Munki repository upload
//!
//! Mirrors the local repository onto an SFTP server. Settings and the local
//! path are validated before any network connection is made.

pub mod mirror;
pub mod remote;
pub mod sftp;

pub use mirror::{Mirror, MirrorStats, mirror_directory};
pub use remote::RemoteFs;
pub use sftp::SftpSession;

use crate::{
    config::{Config, SftpSettings},
    error::{Result, RunnerError},
};
use std::path::PathBuf;
use tracing::{info, instrument};

/// Connection settings and local root for an upload that passed validation
#[derive(Debug, Clone)]
pub struct UploadPlan {
    pub settings: SftpSettings,
    pub local_root: PathBuf,
}

/// Check credentials and the local repository path
pub fn plan_upload(config: &Config) -> Result<UploadPlan> {
    let settings = config.sftp_settings()?;

    let local_root = config
        .resolved_repo_path()
        .ok_or(RunnerError::MissingRepoPath)?;
    if !local_root.exists() {
        return Err(RunnerError::path_not_found(local_root));
    }

    Ok(UploadPlan {
        settings,
        local_root,
    })
}

/// Upload the configured repository over SFTP
#[instrument(skip(config))]
pub fn upload_repository(config: &Config) -> Result<MirrorStats> {
    let plan = plan_upload(config)?;

    let session = SftpSession::connect(&plan.settings)?;
    let stats = mirror_directory(&session, &plan.local_root, &plan.settings.remote_root)?;
    drop(session);

    info!(
        "Repository upload completed successfully: {} file(s), {} bytes, {} director(ies) created",
        stats.files_uploaded, stats.bytes_uploaded, stats.directories_created
    );
    Ok(stats)
}
