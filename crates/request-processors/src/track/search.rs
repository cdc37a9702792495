use crate::track::{Fetcher, SearchMetadataError, SearchResult, ValidationError};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_SEARCH_LIMIT: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum SearchServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Provider(#[from] SearchMetadataError),
}

pub struct SearchService {
    fetcher: Arc<dyn Fetcher>,
}

impl SearchService {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Returns at most `limit` results in provider order.
    ///
    /// Entries without an id are dropped, so the result may be shorter than
    /// `limit` or empty. Only a provider failure is reported as an error.
    pub fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, SearchServiceError> {
        let query = query.trim();

        if query.is_empty() {
            return Err(ValidationError::EmptyQuery.into());
        }

        if limit == 0 {
            return Ok(vec![]);
        }

        let entries = self.fetcher.search_metadata(query, limit)?;
        let total = entries.len();

        let results: Vec<_> = entries
            .into_iter()
            .filter_map(SearchResult::from_entry)
            .take(limit)
            .collect();

        debug!(query, total, usable = results.len(), "Search finished");

        Ok(results)
    }
}
