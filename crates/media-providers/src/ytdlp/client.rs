use crate::ytdlp::parser::{parse_downloaded_path, parse_search_results, ParseError};
use crate::ytdlp::types::VideoEntry;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info};

const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";
const AUDIO_FORMAT: &str = "mp3";
const AUDIO_QUALITY: &str = "320K";

#[derive(Debug, thiserror::Error)]
pub enum YtDlpError {
    #[error("Unable to run {binary}: {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },
    #[error("{stderr}")]
    Failed { status: ExitStatus, stderr: String },
    #[error(transparent)]
    ParseError(#[from] ParseError),
    #[error("yt-dlp did not report the downloaded file")]
    MissingOutput,
}

/// Thin wrapper around the `yt-dlp` command line tool.
///
/// All calls block until the child process exits.
pub struct YtDlpClient {
    binary: String,
    proxy_url: Option<String>,
}

impl YtDlpClient {
    pub fn create(binary: impl Into<String>, proxy_url: Option<String>) -> Self {
        Self {
            binary: binary.into(),
            proxy_url,
        }
    }

    /// Downloads the best audio stream into `output_dir` and converts it to mp3.
    ///
    /// Returns the path of the converted file.
    pub fn download_audio(&self, url: &str, output_dir: &Path) -> Result<PathBuf, YtDlpError> {
        let mut command = self.command();
        command
            .args(["-f", "bestaudio/best", "-x"])
            .args(["--audio-format", AUDIO_FORMAT])
            .args(["--audio-quality", AUDIO_QUALITY])
            .arg("-o")
            .arg(output_dir.join(OUTPUT_TEMPLATE))
            .args(["--no-simulate", "--print", "after_move:filepath"])
            .arg("--")
            .arg(url);

        debug!(url, output_dir = %output_dir.display(), "Downloading audio...");

        let stdout = self.run(command)?;
        let path = parse_downloaded_path(&stdout).ok_or(YtDlpError::MissingOutput)?;

        info!(url, path = %path.display(), "Audio downloaded");

        Ok(path)
    }

    /// Looks up to `limit` videos without downloading anything.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<VideoEntry>, YtDlpError> {
        let mut command = self.command();
        command
            .args(["--flat-playlist", "-J"])
            .arg("--")
            .arg(format!("ytsearch{}:{}", limit, query));

        debug!(query, limit, "Searching videos...");

        let stdout = self.run(command)?;

        Ok(parse_search_results(&stdout)?)
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command.args(["--quiet", "--no-warnings", "--no-progress"]);

        if let Some(proxy_url) = &self.proxy_url {
            command.arg("--proxy").arg(proxy_url);
        }

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        command
    }

    fn run(&self, mut command: Command) -> Result<String, YtDlpError> {
        let output = command.output().map_err(|source| YtDlpError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

            return Err(YtDlpError::Failed {
                status: output.status,
                stderr: if stderr.is_empty() {
                    format!("yt-dlp exited with {}", output.status)
                } else {
                    stderr
                },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
