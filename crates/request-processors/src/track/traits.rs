use crate::track::{FetchedTrack, MediaLocator, MetadataEntry};
use std::path::{Path, PathBuf};

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FetchError(BoxedError);

impl FetchError {
    pub fn new(error: impl Into<BoxedError>) -> Self {
        Self(error.into())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct SearchMetadataError(BoxedError);

impl SearchMetadataError {
    pub fn new(error: impl Into<BoxedError>) -> Self {
        Self(error.into())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct PublishError(BoxedError);

impl PublishError {
    pub fn new(error: impl Into<BoxedError>) -> Self {
        Self(error.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    #[error("Unable to remove local file {}: {source}", path.display())]
    RemoveArtifact {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Unable to remove staging directory {}: {source}", path.display())]
    RemoveStagingDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolves, downloads and transcodes media.
///
/// Calls are blocking and may take minutes. Callers are expected to run them
/// off the interactive event loop.
pub trait Fetcher: Send + Sync {
    /// Downloads the resource into `staging_dir` and converts it to audio.
    fn fetch_audio(
        &self,
        locator: &MediaLocator,
        staging_dir: &Path,
    ) -> Result<FetchedTrack, FetchError>;

    /// Metadata-only lookup, nothing gets downloaded.
    fn search_metadata(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MetadataEntry>, SearchMetadataError>;
}

/// Writes a local file to the remote storage.
pub trait Publisher: Send + Sync {
    fn publish(&self, artifact_path: &Path) -> Result<(), PublishError>;
}

/// Accepts human-readable status updates of a running task.
pub trait ProgressSink {
    fn report(&self, status: &str);
}
