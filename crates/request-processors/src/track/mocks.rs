use crate::track::{
    FetchError, FetchedTrack, Fetcher, MediaLocator, MetadataEntry, ProgressSink, PublishError,
    Publisher, SearchMetadataError,
};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub(crate) enum FetchBehavior {
    /// Writes a file with the given name into the staging directory.
    Write(&'static str),
    /// Writes a partial file and then fails.
    FailAfterPartialWrite(&'static str),
    Fail(&'static str),
    Panic(&'static str),
}

pub(crate) struct FetcherMock {
    behavior: FetchBehavior,
    search_entries: Vec<MetadataEntry>,
    fetch_calls: Mutex<Vec<MediaLocator>>,
    search_calls: Mutex<Vec<(String, usize)>>,
    fetched_paths: Mutex<Vec<PathBuf>>,
}

impl FetcherMock {
    pub(crate) fn new(behavior: FetchBehavior) -> Self {
        Self {
            behavior,
            search_entries: vec![],
            fetch_calls: Mutex::new(vec![]),
            search_calls: Mutex::new(vec![]),
            fetched_paths: Mutex::new(vec![]),
        }
    }

    pub(crate) fn with_search_entries(entries: Vec<MetadataEntry>) -> Self {
        Self {
            search_entries: entries,
            ..Self::new(FetchBehavior::Fail("fetch is not expected"))
        }
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetch_calls.lock().unwrap().len()
    }

    pub(crate) fn search_calls(&self) -> Vec<(String, usize)> {
        self.search_calls.lock().unwrap().clone()
    }

    pub(crate) fn fetched_path(&self) -> PathBuf {
        self.fetched_paths
            .lock()
            .unwrap()
            .first()
            .cloned()
            .expect("Fetcher should have produced a file")
    }
}

impl Fetcher for FetcherMock {
    fn fetch_audio(
        &self,
        locator: &MediaLocator,
        staging_dir: &Path,
    ) -> Result<FetchedTrack, FetchError> {
        self.fetch_calls.lock().unwrap().push(locator.clone());

        match self.behavior {
            FetchBehavior::Write(file_name) => {
                let path = staging_dir.join(file_name);
                std::fs::write(&path, b"ID3").unwrap();
                self.fetched_paths.lock().unwrap().push(path.clone());
                Ok(FetchedTrack::new(path))
            }
            FetchBehavior::FailAfterPartialWrite(file_name) => {
                let path = staging_dir.join(file_name);
                std::fs::write(&path, b"partial").unwrap();
                self.fetched_paths.lock().unwrap().push(path);
                Err(FetchError::new("transcoding failed"))
            }
            FetchBehavior::Fail(reason) => Err(FetchError::new(reason)),
            FetchBehavior::Panic(message) => panic!("{}", message),
        }
    }

    fn search_metadata(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MetadataEntry>, SearchMetadataError> {
        self.search_calls
            .lock()
            .unwrap()
            .push((query.to_string(), limit));

        match query {
            "broken" => Err(SearchMetadataError::new("provider is unreachable")),
            _ => Ok(self.search_entries.clone()),
        }
    }
}

pub(crate) struct PublisherMock {
    failure: Option<&'static str>,
    delete_artifact: bool,
    published: Mutex<Vec<(PathBuf, bool)>>,
}

impl PublisherMock {
    pub(crate) fn succeeding() -> Self {
        Self {
            failure: None,
            delete_artifact: false,
            published: Mutex::new(vec![]),
        }
    }

    /// Succeeds but removes the local file, as if something else cleaned it up.
    pub(crate) fn deleting() -> Self {
        Self {
            delete_artifact: true,
            ..Self::succeeding()
        }
    }

    pub(crate) fn failing(reason: &'static str) -> Self {
        Self {
            failure: Some(reason),
            delete_artifact: false,
            published: Mutex::new(vec![]),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.published.lock().unwrap().len()
    }

    /// Paths passed to the publisher along with whether the file existed at that moment.
    pub(crate) fn published(&self) -> Vec<(PathBuf, bool)> {
        self.published.lock().unwrap().clone()
    }
}

impl Publisher for PublisherMock {
    fn publish(&self, artifact_path: &Path) -> Result<(), PublishError> {
        self.published
            .lock()
            .unwrap()
            .push((artifact_path.to_path_buf(), artifact_path.exists()));

        if self.delete_artifact {
            std::fs::remove_file(artifact_path).unwrap();
        }

        match self.failure {
            Some(reason) => Err(PublishError::new(reason)),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn report(&self, status: &str) {
        self.events.lock().unwrap().push(status.to_string());
    }
}
