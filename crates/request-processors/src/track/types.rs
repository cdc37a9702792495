use crate::{StableId, TaskId};
use std::ops::Deref;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Locator is empty")]
    EmptyLocator,
    #[error("Locator does not look like a link: {0}")]
    MissingScheme(String),
    #[error("Search query is empty")]
    EmptyQuery,
}

// MediaLocator
#[derive(Eq, PartialEq, Clone, Hash, Debug)]
pub struct MediaLocator(String);

impl MediaLocator {
    /// Validates user input. The locator must start with a `scheme://` prefix.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let locator = raw.trim();

        if locator.is_empty() {
            return Err(ValidationError::EmptyLocator);
        }

        let has_scheme = match locator.split_once("://") {
            Some((scheme, rest)) => is_valid_scheme(scheme) && !rest.is_empty(),
            None => false,
        };

        if !has_scheme {
            return Err(ValidationError::MissingScheme(locator.to_string()));
        }

        Ok(MediaLocator(locator.to_string()))
    }

    pub fn from_stable_id(stable_id: &StableId) -> Self {
        MediaLocator(format!("{}{}", WATCH_URL_PREFIX, stable_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();

    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl Deref for MediaLocator {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for MediaLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct DownloadTask {
    pub id: TaskId,
    pub locator: MediaLocator,
}

impl DownloadTask {
    pub(crate) fn new(locator: MediaLocator) -> Self {
        Self {
            id: TaskId::generate(),
            locator,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct FetchedTrack {
    pub path: PathBuf,
    pub display_name: String,
}

impl FetchedTrack {
    pub fn new(path: PathBuf) -> Self {
        let display_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self { path, display_name }
    }
}

/// Raw search entry as returned by the provider.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct MetadataEntry {
    pub id: Option<String>,
    pub title: Option<String>,
    /// Seconds.
    pub duration: Option<f64>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct SearchResult {
    pub title: String,
    pub stable_id: StableId,
    pub duration: Option<Duration>,
}

impl SearchResult {
    pub(crate) fn from_entry(entry: MetadataEntry) -> Option<Self> {
        let stable_id = match entry.id.as_deref().and_then(StableId::new) {
            Some(stable_id) => stable_id,
            None => {
                debug!(title = ?entry.title, "Skipping search entry without an id");
                return None;
            }
        };

        let title = entry
            .title
            .filter(|title| !title.trim().is_empty())
            .unwrap_or_else(|| stable_id.to_string());
        let duration = entry
            .duration
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok());

        Some(Self {
            title,
            stable_id,
            duration,
        })
    }

    pub fn locator(&self) -> MediaLocator {
        MediaLocator::from_stable_id(&self.stable_id)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FailureStage {
    Fetch,
    Publish,
    Cleanup,
}

impl std::fmt::Display for FailureStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stage = match self {
            FailureStage::Fetch => "fetch",
            FailureStage::Publish => "publish",
            FailureStage::Cleanup => "cleanup",
        };

        write!(f, "{}", stage)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum PipelineOutcome {
    Success { display_name: String },
    Failure { stage: FailureStage, message: String },
}

impl PipelineOutcome {
    pub(crate) fn failure(stage: FailureStage, message: String) -> Self {
        PipelineOutcome::Failure { stage, message }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PipelineOutcome::Success { .. })
    }
}
