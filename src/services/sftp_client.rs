use crate::config::SftpCredentials;
use ssh2::Session;
use std::fs::File;
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(thiserror::Error, Debug)]
pub(crate) enum SftpClientError {
    #[error("Unable to connect to {address}: {source}")]
    Connect {
        address: String,
        source: std::io::Error,
    },
    #[error("Authentication failed for user {0}")]
    AuthenticationFailed(String),
    #[error("Not a file: {0}")]
    InvalidPath(String),
    #[error(transparent)]
    SshError(#[from] ssh2::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}

pub(crate) type SftpClientResult<T> = Result<T, SftpClientError>;

/// Blocking SFTP uploader. Opens a new session per upload.
pub(crate) struct SftpClient {
    host: String,
    port: u16,
    username: String,
    password: String,
    target_dir: String,
}

impl SftpClient {
    pub(crate) fn create(credentials: &SftpCredentials, port: u16) -> Self {
        Self {
            host: credentials.host.clone(),
            port,
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            target_dir: credentials.target_dir.clone(),
        }
    }

    pub(crate) fn upload(&self, file_path: &Path) -> SftpClientResult<PathBuf> {
        let file_name = file_path
            .file_name()
            .ok_or_else(|| SftpClientError::InvalidPath(file_path.display().to_string()))?;

        let address = format!("{}:{}", self.host, self.port);
        let tcp = TcpStream::connect(&address).map_err(|source| SftpClientError::Connect {
            address: address.clone(),
            source,
        })?;

        let mut session = Session::new()?;
        session.set_tcp_stream(tcp);
        session.handshake()?;
        session.userauth_password(&self.username, &self.password)?;

        if !session.authenticated() {
            return Err(SftpClientError::AuthenticationFailed(self.username.clone()));
        }

        debug!(%address, "SFTP session established");

        let sftp = session.sftp()?;
        let target_dir = Path::new(&self.target_dir);
        let remote_path = match sftp.stat(target_dir) {
            Ok(_) => target_dir.join(file_name),
            Err(error) => {
                warn!(
                    ?error,
                    target_dir = %self.target_dir,
                    "Target directory might not exist. Uploading into the login directory."
                );
                PathBuf::from(file_name)
            }
        };

        let mut local_file = File::open(file_path)?;
        let mut remote_file = sftp.create(&remote_path)?;
        let bytes = std::io::copy(&mut local_file, &mut remote_file)?;

        remote_file.close()?;
        drop(remote_file);
        drop(sftp);
        disconnect(&session);

        info!(
            remote_path = %remote_path.display(),
            bytes,
            "File uploaded"
        );

        Ok(remote_path)
    }
}

/// Errors are only logged, the upload is complete by the time this runs.
fn disconnect(session: &Session) {
    if let Err(error) = session.disconnect(None, "Upload finished", None) {
        warn!(?error, "Unable to close SFTP session");
    }
}
