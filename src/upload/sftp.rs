//! SFTP session over `ssh2`
//!
//! Password authentication only. The SFTP channel and the SSH transport are
//! closed when the session is dropped, whatever state the upload ended in.

use crate::{
    config::SftpSettings,
    error::{Result, RunnerError},
    upload::remote::RemoteFs,
};
use ssh2::{ErrorCode, Session, Sftp};
use std::fs::File;
use std::io;
use std::net::TcpStream;
use std::path::Path;
use tracing::{debug, info, instrument};

/// SFTP status code for a missing path (`SSH_FX_NO_SUCH_FILE`)
const SFTP_NO_SUCH_FILE: i32 = 2;

/// libssh2 session code for rejected credentials (`LIBSSH2_ERROR_AUTHENTICATION_FAILED`)
const SESSION_AUTHENTICATION_FAILED: i32 = -18;

/// Authenticated SFTP connection
pub struct SftpSession {
    session: Session,
    sftp: Sftp,
}

impl SftpSession {
    /// Connect, authenticate with username/password and open the SFTP channel
    #[instrument(skip(settings), fields(host = %settings.host, port = settings.port, user = %settings.user))]
    pub fn connect(settings: &SftpSettings) -> Result<Self> {
        let addr = format!("{}:{}", settings.host, settings.port);
        info!(
            "Connecting to SFTP server: {}@{}",
            settings.user, addr
        );

        let tcp = TcpStream::connect((settings.host.as_str(), settings.port))
            .map_err(|e| RunnerError::connection(format!("TCP connection to {addr} failed"), e))?;

        let mut session = Session::new()
            .map_err(|e| RunnerError::connection("Failed to create SSH session", e))?;
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| RunnerError::connection(format!("SSH handshake with {addr} failed"), e))?;

        info!("Authenticating with username/password from config file");
        session
            .userauth_password(&settings.user, &settings.password)
            .map_err(|e| password_auth_error(settings, e))?;
        if !session.authenticated() {
            return Err(RunnerError::AuthenticationFailed {
                user: settings.user.clone(),
                host: settings.host.clone(),
                source: None,
            });
        }

        let sftp = session
            .sftp()
            .map_err(|e| RunnerError::connection("Failed to open SFTP channel", e))?;

        info!("SFTP connection established");
        Ok(Self { session, sftp })
    }
}

impl RemoteFs for SftpSession {
    fn exists(&self, path: &str) -> Result<bool> {
        match self.sftp.stat(Path::new(path)) {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.code(), ErrorCode::SFTP(SFTP_NO_SUCH_FILE)) => Ok(false),
            Err(e) => Err(RunnerError::transfer("stat", path, e)),
        }
    }

    fn mkdir(&self, path: &str) -> Result<()> {
        self.sftp
            .mkdir(Path::new(path), 0o755)
            .map_err(|e| RunnerError::transfer("mkdir", path, e))
    }

    fn put(&self, local: &Path, remote: &str) -> Result<u64> {
        let mut source =
            File::open(local).map_err(|e| RunnerError::file_system("open", local, e))?;
        let mut target = self
            .sftp
            .create(Path::new(remote))
            .map_err(|e| RunnerError::transfer("open", remote, e))?;

        let copied =
            io::copy(&mut source, &mut target).map_err(|e| RunnerError::transfer("put", remote, e))?;
        finish_put(remote, copied, target.close())
    }
}

/// Only a rejection of the credentials is an authentication failure; anything
/// else during userauth means the transport went away.
fn password_auth_error(settings: &SftpSettings, err: ssh2::Error) -> RunnerError {
    match err.code() {
        ErrorCode::Session(SESSION_AUTHENTICATION_FAILED) => {
            RunnerError::authentication_failed(&settings.user, &settings.host, err)
        }
        _ => RunnerError::connection("SSH connection lost during authentication", err),
    }
}

/// The server may still reject a file when its handle is closed
fn finish_put(
    remote: &str,
    copied: u64,
    closed: std::result::Result<(), ssh2::Error>,
) -> Result<u64> {
    closed.map_err(|e| RunnerError::transfer("close", remote, e))?;
    Ok(copied)
}

impl Drop for SftpSession {
    fn drop(&mut self) {
        if let Err(e) = self.sftp.shutdown() {
            debug!("Ignoring error while closing SFTP channel: {}", e);
        }
        if let Err(e) = self.session.disconnect(None, "upload finished", None) {
            debug!("Ignoring error while closing SSH transport: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::net::TcpListener;

    fn settings(port: u16) -> SftpSettings {
        SftpSettings {
            host: "127.0.0.1".to_string(),
            port,
            user: "munki".to_string(),
            password: "secret".to_string(),
            remote_root: "/".to_string(),
        }
    }

    #[test]
    #[serial]
    fn test_refused_connection_is_connection_error() {
        // Bind then drop to get a port nothing listens on
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let result = SftpSession::connect(&settings(port));
        assert!(matches!(result, Err(RunnerError::Connection { .. })));
    }

    #[test]
    fn test_rejected_password_is_authentication_failure() {
        let err = ssh2::Error::new(
            ErrorCode::Session(SESSION_AUTHENTICATION_FAILED),
            "Authentication failed (username/password)",
        );

        match password_auth_error(&settings(22), err) {
            RunnerError::AuthenticationFailed { user, host, .. } => {
                assert_eq!(user, "munki");
                assert_eq!(host, "127.0.0.1");
            }
            other => panic!("Expected AuthenticationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_socket_loss_during_auth_is_connection_error() {
        // LIBSSH2_ERROR_SOCKET_DISCONNECT
        let err = ssh2::Error::new(ErrorCode::Session(-13), "socket disconnect");
        let result = password_auth_error(&settings(22), err);
        assert!(matches!(result, RunnerError::Connection { .. }));
    }

    #[test]
    fn test_close_failure_fails_the_upload() {
        // SSH_FX_FAILURE
        let err = ssh2::Error::new(ErrorCode::SFTP(4), "failure");
        match finish_put("/repo/catalogs/all", 12, Err(err)) {
            Err(RunnerError::Transfer { operation, path, .. }) => {
                assert_eq!(operation, "close");
                assert_eq!(path, "/repo/catalogs/all");
            }
            other => panic!("Expected Transfer error, got {other:?}"),
        }

        assert_eq!(finish_put("/repo/catalogs/all", 12, Ok(())).unwrap(), 12);
    }

    #[test]
    #[serial]
    fn test_non_ssh_peer_fails_handshake() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = std::thread::spawn(move || {
            // Accept and close immediately
            let (stream, _) = listener.accept().unwrap();
            drop(stream);
        });

        let result = SftpSession::connect(&settings(port));
        assert!(matches!(result, Err(RunnerError::Connection { .. })));
        server.join().unwrap();
    }
}
