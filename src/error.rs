//! Error types for the AutoPkg runner
//!
//! Every variant here is fatal when it escapes to the CLI layer. Per-item
//! failures (a single repository or recipe) are logged by the component that
//! owns them and never surface as a `RunnerError`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the runner
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Configuration file does not exist
    #[error("Config file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Configuration file exists but could not be read or parsed
    #[error("Error parsing YAML config {}: {message}", path.display())]
    ConfigParse {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Upload requested without the full set of SFTP settings
    #[error("Missing SFTP configuration: {} required", missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    /// Upload requested without `repo_path` in the config
    #[error("No repo_path specified in config")]
    MissingRepoPath,

    /// A required local path is absent from disk
    #[error("Repository path does not exist: {}", path.display())]
    PathNotFound { path: PathBuf },

    /// The SSH server rejected the supplied username/password
    #[error("SFTP authentication failed for {user}@{host}")]
    AuthenticationFailed {
        user: String,
        host: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Transport-level failure (TCP connect, SSH handshake, channel setup)
    #[error("SFTP connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A remote operation failed while mirroring the tree
    #[error("SFTP {operation} failed on {path}")]
    Transfer {
        operation: String,
        path: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Process execution errors
    #[error("Process error: {command} failed")]
    Process {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The external program could not be found on PATH
    #[error("Command not found: {command}")]
    CommandNotFound { command: String },

    /// File system operation errors
    #[error("File system error: {operation} failed on {}", path.display())]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RunnerError {
    /// Create a new config-not-found error
    pub fn config_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create a new config parse error wrapping the underlying cause
    pub fn config_parse<P: Into<PathBuf>>(
        message: impl Into<String>,
        path: P,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigParse {
            message: message.into(),
            path: path.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new missing-credentials error
    pub fn missing_credentials(missing: Vec<&'static str>) -> Self {
        Self::MissingCredentials { missing }
    }

    /// Create a new path-not-found error
    pub fn path_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    /// Create a new authentication error
    pub fn authentication_failed(
        user: impl Into<String>,
        host: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::AuthenticationFailed {
            user: user.into(),
            host: host.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new connection error
    pub fn connection(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new transfer error
    pub fn transfer(
        operation: impl Into<String>,
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transfer {
            operation: operation.into(),
            path: path.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new process error
    pub fn process(
        command: impl Into<String>,
        exit_code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Process {
            command: command.into(),
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a new command-not-found error
    pub fn command_not_found(command: impl Into<String>) -> Self {
        Self::CommandNotFound {
            command: command.into(),
        }
    }

    /// Create a new file system error
    pub fn file_system<P: Into<PathBuf>>(
        operation: impl Into<String>,
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, RunnerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_lists_keys() {
        let err = RunnerError::missing_credentials(vec!["sftp_host", "sftp_password"]);
        assert_eq!(
            err.to_string(),
            "Missing SFTP configuration: sftp_host, sftp_password required"
        );
    }

    #[test]
    fn test_transfer_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = RunnerError::transfer("put", "/repo/pkgs/a.dmg", io);
        assert_eq!(err.to_string(), "SFTP put failed on /repo/pkgs/a.dmg");
        assert!(std::error::Error::source(&err).is_some());
    }
}
