use media_providers::{VideoEntry, YtDlpClient};
use request_processors::{
    FetchError, FetchedTrack, Fetcher, MediaLocator, MetadataEntry, SearchMetadataError,
};
use std::path::Path;

pub(crate) struct YtDlpFetcher(pub(crate) YtDlpClient);

impl Fetcher for YtDlpFetcher {
    fn fetch_audio(
        &self,
        locator: &MediaLocator,
        staging_dir: &Path,
    ) -> Result<FetchedTrack, FetchError> {
        let path = self
            .0
            .download_audio(locator.as_str(), staging_dir)
            .map_err(FetchError::new)?;

        Ok(FetchedTrack::new(path))
    }

    fn search_metadata(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MetadataEntry>, SearchMetadataError> {
        let entries = self
            .0
            .search(query, limit)
            .map_err(SearchMetadataError::new)?;

        Ok(entries
            .into_iter()
            .map(|VideoEntry { id, title, duration }| MetadataEntry {
                id,
                title,
                duration,
            })
            .collect())
    }
}
