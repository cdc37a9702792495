use super::mocks::{FetchBehavior, FetcherMock, PublisherMock, RecordingSink};
use super::{
    FailureStage, FetchError, FetchedTrack, Fetcher, MediaLocator, MetadataEntry,
    PipelineOutcome, Publisher, SearchMetadataError, TrackPipeline, ValidationError,
};
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

struct Fixture {
    fetcher: Arc<FetcherMock>,
    publisher: Arc<PublisherMock>,
    pipeline: TrackPipeline,
    download_directory: TempDir,
}

fn fixture(fetch: FetchBehavior, publisher: PublisherMock) -> Fixture {
    let download_directory = TempDir::new().unwrap();
    let fetcher = Arc::new(FetcherMock::new(fetch));
    let publisher = Arc::new(publisher);
    let pipeline = TrackPipeline::new(
        Arc::clone(&fetcher) as Arc<dyn Fetcher>,
        Arc::clone(&publisher) as Arc<dyn Publisher>,
        download_directory.path(),
    );

    Fixture {
        fetcher,
        publisher,
        pipeline,
        download_directory,
    }
}

fn count_entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

#[test]
fn test_malformed_locators_are_rejected_before_fetching() {
    let fx = fixture(FetchBehavior::Write("song.mp3"), PublisherMock::succeeding());
    let sink = RecordingSink::default();

    for raw in ["", "   ", "not-a-url", "://missing-scheme", "1http://x", "http://"] {
        assert!(fx.pipeline.process_request(raw, &sink).is_err(), "{}", raw);
    }

    assert_eq!(
        fx.pipeline.process_request("not-a-url", &sink),
        Err(ValidationError::MissingScheme("not-a-url".into()))
    );
    assert_eq!(
        fx.pipeline.process_request("", &sink),
        Err(ValidationError::EmptyLocator)
    );
    assert_eq!(fx.fetcher.fetch_calls(), 0);
    assert_eq!(fx.publisher.calls(), 0);
    assert!(sink.events().is_empty());
}

#[test]
fn test_successful_run_publishes_and_removes_local_file() {
    let fx = fixture(FetchBehavior::Write("song.mp3"), PublisherMock::succeeding());
    let sink = RecordingSink::default();

    let outcome = fx
        .pipeline
        .process_request("https://www.youtube.com/watch?v=abc", &sink)
        .unwrap();

    assert_eq!(
        outcome,
        PipelineOutcome::Success {
            display_name: "song.mp3".into()
        }
    );

    let fetched_path = fx.fetcher.fetched_path();
    assert_eq!(fx.fetcher.fetch_calls(), 1);
    assert_eq!(fx.publisher.published(), vec![(fetched_path.clone(), true)]);
    assert!(!fetched_path.exists());
    assert_eq!(count_entries(fx.download_directory.path()), 0);
    assert_eq!(
        sink.events(),
        vec![
            "✅ Fetched: song.mp3\n⏳ Uploading...".to_string(),
            "✅ Done! song.mp3 uploaded.".to_string(),
        ]
    );
}

#[test]
fn test_publish_failure_keeps_local_file() {
    let fx = fixture(
        FetchBehavior::Write("song.mp3"),
        PublisherMock::failing("auth failed"),
    );
    let sink = RecordingSink::default();

    let outcome = fx
        .pipeline
        .process_request("https://www.youtube.com/watch?v=abc", &sink)
        .unwrap();

    assert_eq!(
        outcome,
        PipelineOutcome::Failure {
            stage: FailureStage::Publish,
            message: "auth failed".into()
        }
    );
    assert!(fx.fetcher.fetched_path().exists());
    assert_eq!(fx.publisher.calls(), 1);
    assert_eq!(
        sink.events(),
        vec!["✅ Fetched: song.mp3\n⏳ Uploading...".to_string()]
    );
}

#[test]
fn test_fetch_failure_skips_publishing() {
    let fx = fixture(
        FetchBehavior::Fail("Video unavailable"),
        PublisherMock::succeeding(),
    );
    let sink = RecordingSink::default();

    let outcome = fx
        .pipeline
        .process_request("https://www.youtube.com/watch?v=abc", &sink)
        .unwrap();

    assert_eq!(
        outcome,
        PipelineOutcome::Failure {
            stage: FailureStage::Fetch,
            message: "Video unavailable".into()
        }
    );
    assert_eq!(fx.fetcher.fetch_calls(), 1);
    assert_eq!(fx.publisher.calls(), 0);
    assert!(sink.events().is_empty());
}

#[test]
fn test_fetch_failure_removes_partial_files() {
    let fx = fixture(
        FetchBehavior::FailAfterPartialWrite("song.webm.part"),
        PublisherMock::succeeding(),
    );
    let sink = RecordingSink::default();

    let outcome = fx
        .pipeline
        .process_request("https://www.youtube.com/watch?v=abc", &sink)
        .unwrap();

    assert!(!outcome.is_success());
    assert!(!fx.fetcher.fetched_path().exists());
    assert_eq!(count_entries(fx.download_directory.path()), 0);
}

#[test]
fn test_fetcher_panic_is_reported_as_fetch_failure() {
    let fx = fixture(
        FetchBehavior::Panic("extractor crashed"),
        PublisherMock::succeeding(),
    );
    let sink = RecordingSink::default();

    let outcome = fx
        .pipeline
        .process_request("https://www.youtube.com/watch?v=abc", &sink)
        .unwrap();

    assert_eq!(
        outcome,
        PipelineOutcome::Failure {
            stage: FailureStage::Fetch,
            message: "extractor crashed".into()
        }
    );
    assert_eq!(fx.publisher.calls(), 0);
}

#[test]
fn test_repeated_tasks_use_separate_staging_directories() {
    let fx = fixture(FetchBehavior::Write("song.mp3"), PublisherMock::failing("offline"));
    let sink = RecordingSink::default();

    for _ in 0..2 {
        fx.pipeline
            .process_request("https://www.youtube.com/watch?v=abc", &sink)
            .unwrap();
    }

    let published = fx.publisher.published();
    assert_eq!(published.len(), 2);
    assert_ne!(published[0].0, published[1].0);
    assert!(published.iter().all(|(path, _)| path.exists()));
    assert_eq!(count_entries(fx.download_directory.path()), 2);
}

#[test]
fn test_cleanup_failure_keeps_success() {
    let fx = fixture(FetchBehavior::Write("song.mp3"), PublisherMock::deleting());
    let sink = RecordingSink::default();

    let outcome = fx
        .pipeline
        .process_request("https://www.youtube.com/watch?v=abc", &sink)
        .unwrap();

    assert_eq!(
        outcome,
        PipelineOutcome::Success {
            display_name: "song.mp3".into()
        }
    );
    assert_eq!(
        sink.events(),
        vec![
            "✅ Fetched: song.mp3\n⏳ Uploading...".to_string(),
            "✅ Done! song.mp3 uploaded.".to_string(),
        ]
    );
    // The staging directory goes away even though the file removal failed.
    assert_eq!(count_entries(fx.download_directory.path()), 0);
}

/// Holds every fetch until two of them are in flight.
struct BarrierFetcher {
    barrier: Barrier,
}

impl Fetcher for BarrierFetcher {
    fn fetch_audio(
        &self,
        _locator: &MediaLocator,
        staging_dir: &Path,
    ) -> Result<FetchedTrack, FetchError> {
        self.barrier.wait();

        let path = staging_dir.join("same.mp3");
        std::fs::write(&path, b"ID3").map_err(FetchError::new)?;
        Ok(FetchedTrack::new(path))
    }

    fn search_metadata(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<MetadataEntry>, SearchMetadataError> {
        Ok(vec![])
    }
}

#[test]
fn test_concurrent_tasks_with_identical_titles() {
    let download_directory = TempDir::new().unwrap();
    let publisher = Arc::new(PublisherMock::succeeding());
    let pipeline = TrackPipeline::new(
        Arc::new(BarrierFetcher {
            barrier: Barrier::new(2),
        }) as Arc<dyn Fetcher>,
        Arc::clone(&publisher) as Arc<dyn Publisher>,
        download_directory.path(),
    );

    let outcomes = thread::scope(|scope| {
        let handles = (0..2)
            .map(|_| {
                scope.spawn(|| {
                    let sink = RecordingSink::default();
                    pipeline
                        .process_request("https://www.youtube.com/watch?v=abc", &sink)
                        .unwrap()
                })
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });

    let expected = PipelineOutcome::Success {
        display_name: "same.mp3".into(),
    };
    assert_eq!(outcomes, vec![expected.clone(), expected]);

    let published = publisher.published();
    assert_eq!(published.len(), 2);
    assert_ne!(published[0].0, published[1].0);
    assert!(published.iter().all(|(_, existed)| *existed));
    assert_eq!(count_entries(download_directory.path()), 0);
}
