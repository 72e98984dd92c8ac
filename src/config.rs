//! Configuration loading for the runner
//!
//! Reads `config.yaml` once per run. Only presence of the file and YAML syntax
//! are validated here; each component checks the keys it needs when it runs.

use crate::{
    error::{Result, RunnerError},
    utils::fs::FileSystemUtils,
};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Default file name looked up beside the executable
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Default SSH port for uploads
pub const DEFAULT_SFTP_PORT: u16 = 22;

/// Runner configuration as read from YAML
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Munki repository location, relative to the install directory if not absolute
    pub repo_path: Option<PathBuf>,
    /// AutoPkg recipe repositories to register
    pub repos: Vec<RepoEntry>,
    /// Recipe identifiers to run, in order
    pub recipes: Vec<Option<String>>,
    pub sftp_host: Option<String>,
    pub sftp_port: u16,
    pub sftp_user: Option<String>,
    pub sftp_password: Option<String>,
    /// Remote directory that receives the repository contents
    pub sftp_remote_root: String,
    /// Directory relative `repo_path` values are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// A recipe repository entry. Both fields are needed to register it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RepoEntry {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Validated connection settings for an upload
#[derive(Clone, PartialEq, Eq)]
pub struct SftpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub remote_root: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo_path: None,
            repos: Vec::new(),
            recipes: Vec::new(),
            sftp_host: None,
            sftp_port: DEFAULT_SFTP_PORT,
            sftp_user: None,
            sftp_password: None,
            sftp_remote_root: "/".to_string(),
            base_dir: PathBuf::new(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, resolving relative paths against `base_dir`
    #[instrument(skip(base_dir))]
    pub fn load(path: &Path, base_dir: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RunnerError::config_not_found(path));
        }

        let contents = FileSystemUtils::new()
            .read_file_to_string(path)
            .map_err(|e| RunnerError::config_parse("Error loading config", path, e))?;

        let mut config = Self::from_yaml(&contents, path)?;
        config.base_dir = base_dir.to_path_buf();

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a YAML document. An empty document yields the default configuration.
    pub fn from_yaml(contents: &str, origin: &Path) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml_ng::from_str(contents)
            .map_err(|e| RunnerError::config_parse(e.to_string(), origin, e))
    }

    /// Absolute, normalized repository path, if one is configured
    pub fn resolved_repo_path(&self) -> Option<PathBuf> {
        let raw = self.repo_path.as_ref()?;
        if raw.as_os_str().is_empty() {
            return None;
        }
        Some(FileSystemUtils::new().resolve_path(raw, &self.base_dir))
    }

    /// Non-empty recipe identifiers in configured order
    pub fn recipe_names(&self) -> impl Iterator<Item = &str> {
        self.recipes
            .iter()
            .filter_map(|r| r.as_deref())
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }

    /// Validate and collect the SFTP settings needed for an upload
    pub fn sftp_settings(&self) -> Result<SftpSettings> {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.is_empty())
        }

        let host = present(&self.sftp_host);
        let user = present(&self.sftp_user);
        let password = present(&self.sftp_password);

        match (host, user, password) {
            (Some(host), Some(user), Some(password)) => Ok(SftpSettings {
                host: host.to_string(),
                port: self.sftp_port,
                user: user.to_string(),
                password: password.to_string(),
                remote_root: self.sftp_remote_root.clone(),
            }),
            _ => {
                let missing = [
                    ("sftp_host", host.is_none()),
                    ("sftp_user", user.is_none()),
                    ("sftp_password", password.is_none()),
                ]
                .into_iter()
                .filter_map(|(key, absent)| absent.then_some(key))
                .collect();
                Err(RunnerError::missing_credentials(missing))
            }
        }
    }
}

impl RepoEntry {
    /// `(name, url)` when both are set and non-empty
    pub fn valid(&self) -> Option<(&str, &str)> {
        let name = self.name.as_deref().filter(|n| !n.is_empty())?;
        let url = self.url.as_deref().filter(|u| !u.is_empty())?;
        Some((name, url))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("repo_path", &self.repo_path)
            .field("repos", &self.repos)
            .field("recipes", &self.recipes)
            .field("sftp_host", &self.sftp_host)
            .field("sftp_port", &self.sftp_port)
            .field("sftp_user", &self.sftp_user)
            .field("sftp_password", &self.sftp_password.as_ref().map(|_| "<redacted>"))
            .field("sftp_remote_root", &self.sftp_remote_root)
            .field("base_dir", &self.base_dir)
            .finish()
    }
}

impl fmt::Debug for SftpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SftpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("remote_root", &self.remote_root)
            .finish()
    }
}
