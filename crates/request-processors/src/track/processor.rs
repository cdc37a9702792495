use crate::track::{
    CleanupError, DownloadTask, FailureStage, FetchedTrack, Fetcher, MediaLocator,
    PipelineOutcome, ProgressSink, Publisher, ValidationError,
};
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Runs fetch, publish and cleanup of a single track as one unit of work.
///
/// Every call is blocking: dispatch it to a worker thread when invoked from
/// an event loop.
pub struct TrackPipeline {
    fetcher: Arc<dyn Fetcher>,
    publisher: Arc<dyn Publisher>,
    download_directory: PathBuf,
}

impl TrackPipeline {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        publisher: Arc<dyn Publisher>,
        download_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fetcher,
            publisher,
            download_directory: download_directory.into(),
        }
    }

    /// Validates the raw locator and runs the pipeline on it.
    ///
    /// A malformed locator is rejected before any capability is called.
    pub fn process_request(
        &self,
        raw_locator: &str,
        progress: &dyn ProgressSink,
    ) -> Result<PipelineOutcome, ValidationError> {
        let locator = MediaLocator::parse(raw_locator)?;

        Ok(self.run(locator, progress))
    }

    pub fn run(&self, locator: MediaLocator, progress: &dyn ProgressSink) -> PipelineOutcome {
        let task = DownloadTask::new(locator);

        info!(task_id = %task.id, locator = %task.locator, "Track processing started");

        let outcome = self.process_task(&task, progress);

        match &outcome {
            PipelineOutcome::Success { display_name } => {
                info!(task_id = %task.id, %display_name, "Track processing finished");
            }
            PipelineOutcome::Failure { stage, message } => {
                error!(task_id = %task.id, %stage, %message, "Track processing failed");
            }
        }

        outcome
    }

    fn process_task(&self, task: &DownloadTask, progress: &dyn ProgressSink) -> PipelineOutcome {
        let track = match self.fetch(task) {
            Ok(track) => track,
            Err(message) => return PipelineOutcome::failure(FailureStage::Fetch, message),
        };

        progress.report(&format!(
            "✅ Fetched: {}\n⏳ Uploading...",
            track.display_name
        ));

        if let Err(message) = self.publish(task, &track) {
            warn!(
                task_id = %task.id,
                path = %track.path.display(),
                "Local file is kept for manual recovery"
            );
            return PipelineOutcome::failure(FailureStage::Publish, message);
        }

        progress.report(&format!("✅ Done! {} uploaded.", track.display_name));

        for error in self.cleanup(task, &track) {
            error!(task_id = %task.id, stage = %FailureStage::Cleanup, %error, "Cleanup failed");
        }

        PipelineOutcome::Success {
            display_name: track.display_name,
        }
    }

    fn staging_directory(&self, task: &DownloadTask) -> PathBuf {
        self.download_directory.join(task.id.to_string())
    }

    fn fetch(&self, task: &DownloadTask) -> Result<FetchedTrack, String> {
        let staging_dir = self.staging_directory(task);

        fs::create_dir_all(&staging_dir).map_err(|error| {
            format!(
                "Unable to create directory {}: {}",
                staging_dir.display(),
                error
            )
        })?;

        debug!(task_id = %task.id, staging_dir = %staging_dir.display(), "Fetching audio...");

        let result = guarded(|| self.fetcher.fetch_audio(&task.locator, &staging_dir));

        if result.is_err() {
            if let Err(error) = fs::remove_dir_all(&staging_dir) {
                warn!(task_id = %task.id, %error, "Unable to remove staging directory");
            }
        }

        result
    }

    fn publish(&self, task: &DownloadTask, track: &FetchedTrack) -> Result<(), String> {
        debug!(task_id = %task.id, path = %track.path.display(), "Publishing audio...");

        guarded(|| self.publisher.publish(&track.path))
    }

    /// Removes the local file and its staging directory.
    ///
    /// Both removals are attempted, every failure is returned.
    fn cleanup(&self, task: &DownloadTask, track: &FetchedTrack) -> Vec<CleanupError> {
        let mut errors = vec![];

        match fs::remove_file(&track.path) {
            Ok(()) => {
                info!(task_id = %task.id, path = %track.path.display(), "Removed local file");
            }
            Err(source) => errors.push(CleanupError::RemoveArtifact {
                path: track.path.clone(),
                source,
            }),
        }

        let staging_dir = self.staging_directory(task);

        if track.path.parent() == Some(staging_dir.as_path()) {
            if let Err(source) = fs::remove_dir(&staging_dir) {
                errors.push(CleanupError::RemoveStagingDirectory {
                    path: staging_dir,
                    source,
                });
            }
        }

        errors
    }
}

/// Calls a capability, turning both its error and a panic into a message.
fn guarded<T, E: std::fmt::Display>(call: impl FnOnce() -> Result<T, E>) -> Result<T, String> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result.map_err(|error| error.to_string()),
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unexpected panic".to_string()
    }
}
