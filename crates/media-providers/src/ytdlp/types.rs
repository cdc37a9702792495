use serde::Deserialize;

/// Single entry of a flat search listing.
#[derive(Debug, PartialEq, Clone, Deserialize)]
pub struct VideoEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Seconds, yt-dlp reports fractional values for some extractors.
    #[serde(default)]
    pub duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchListing {
    #[serde(default)]
    pub(crate) entries: Vec<Option<VideoEntry>>,
}
