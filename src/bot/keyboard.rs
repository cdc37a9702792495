use request_processors::{SearchResult, StableId};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::warn;

const DOWNLOAD_PREFIX: &str = "download:";
/// Telegram rejects callback data longer than this, in bytes.
const CALLBACK_DATA_LIMIT: usize = 64;
const MAX_TITLE_CHARS: usize = 50;

pub(crate) fn download_callback_data(stable_id: &StableId) -> Option<String> {
    let data = format!("{}{}", DOWNLOAD_PREFIX, stable_id);

    if data.len() > CALLBACK_DATA_LIMIT {
        return None;
    }

    Some(data)
}

pub(crate) fn parse_download_callback(data: &str) -> Option<StableId> {
    data.strip_prefix(DOWNLOAD_PREFIX).and_then(StableId::new)
}

/// One button per result, numbered from 1.
pub(crate) fn search_results_keyboard(results: &[SearchResult]) -> InlineKeyboardMarkup {
    let rows = results
        .iter()
        .enumerate()
        .filter_map(|(index, result)| {
            let Some(data) = download_callback_data(&result.stable_id) else {
                warn!(stable_id = %result.stable_id, "Id does not fit into callback data");
                return None;
            };
            let label = format!("{}. {}", index + 1, truncate_title(&result.title));

            Some(vec![InlineKeyboardButton::callback(label, data)])
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(rows)
}

fn truncate_title(title: &str) -> String {
    title.chars().take(MAX_TITLE_CHARS).collect()
}
