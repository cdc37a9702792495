use actix_rt::task::{spawn_blocking, JoinError};
use request_processors::{
    MediaLocator, PipelineOutcome, ProgressSink, SearchResult, SearchService, SearchServiceError,
    TrackPipeline,
};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub(crate) enum DispatchError {
    #[error(transparent)]
    SearchError(#[from] SearchServiceError),
    #[error("Worker thread failed: {0}")]
    WorkerError(#[from] JoinError),
}

/// Runs blocking pipeline and search calls on the blocking thread pool, so
/// the event loop stays responsive to other commands.
pub(crate) struct TaskDispatcher {
    track_pipeline: Arc<TrackPipeline>,
    search_service: Arc<SearchService>,
    in_flight: Arc<AtomicUsize>,
}

impl TaskDispatcher {
    pub(crate) fn new(
        track_pipeline: Arc<TrackPipeline>,
        search_service: Arc<SearchService>,
    ) -> Self {
        Self {
            track_pipeline,
            search_service,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of tasks currently running on worker threads.
    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Starts the pipeline right away. The returned future resolves with its outcome.
    ///
    /// The progress sink is dropped as soon as the pipeline returns.
    pub(crate) fn run_track(
        &self,
        locator: MediaLocator,
        progress: impl ProgressSink + Send + 'static,
    ) -> impl Future<Output = Result<PipelineOutcome, DispatchError>> {
        let track_pipeline = Arc::clone(&self.track_pipeline);
        let guard = InFlightGuard::acquire(&self.in_flight);

        let handle = spawn_blocking(move || {
            let _guard = guard;
            track_pipeline.run(locator, &progress)
        });

        async move {
            let outcome = handle.await?;
            Ok::<_, DispatchError>(outcome)
        }
    }

    pub(crate) fn search(
        &self,
        query: String,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<SearchResult>, DispatchError>> {
        let search_service = Arc::clone(&self.search_service);
        let guard = InFlightGuard::acquire(&self.in_flight);

        let handle = spawn_blocking(move || {
            let _guard = guard;
            search_service.search(&query, limit)
        });

        async move {
            let results = handle.await??;
            Ok::<_, DispatchError>(results)
        }
    }
}

struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn acquire(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
