use crate::ytdlp::types::{SearchListing, VideoEntry};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Unable to parse yt-dlp output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Parses the `-J --flat-playlist` dump of a `ytsearchN:` query.
pub(crate) fn parse_search_results(raw_json: &str) -> Result<Vec<VideoEntry>, ParseError> {
    let listing: SearchListing = serde_json::from_str(raw_json)?;

    Ok(listing.entries.into_iter().flatten().collect())
}

/// Extracts the final file path printed by `--print after_move:filepath`.
pub(crate) fn parse_downloaded_path(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(PathBuf::from)
}
