use super::keyboard::{parse_download_callback, search_results_keyboard};
use super::progress::{progress_channel, relay_progress, TelegramStatusMessage};
use super::{BotState, Command};
use crate::services::{AccessGate, DispatchError};
use crate::types::UserId;
use request_processors::{MediaLocator, SearchResult, DEFAULT_SEARCH_LIMIT};
use std::sync::Arc;
use teloxide::payloads::{AnswerCallbackQuerySetters, EditMessageTextSetters};
use teloxide::prelude::*;
use tracing::{debug, info, warn};

const ACCESS_DENIED: &str = "You do not have access to this bot.";
const USAGE: &str = "Send me a link or a title and I will put the track on the radio.\n\n\
    /add_track <link> - download audio by link\n\
    /search <title> - find a track and download it";
const ADD_TRACK_USAGE: &str = "Usage: /add_track <link>";
const SEARCH_USAGE: &str = "Usage: /search <title>";
const NOT_A_LINK: &str = "This does not look like a link. Try /search to find a track by title.";
const DOWNLOAD_STARTED: &str = "⏳ Starting audio download...";
const NOTHING_FOUND: &str = "Nothing found.";
const REQUEST_ACCEPTED: &str = "Request accepted, starting download...";

pub(crate) async fn handle_command(
    bot: Bot,
    msg: Message,
    command: Command,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    if let Err(reply) = check_access(&state.access_gate, UserId::from(user.id)) {
        bot.send_message(msg.chat.id, reply).await?;
        return Ok(());
    }

    match command {
        Command::Start | Command::Help => {
            bot.send_message(msg.chat.id, USAGE).await?;
        }
        Command::AddTrack(link) => match add_track_locator(&link) {
            Ok(locator) => start_download(bot, msg.chat.id, locator, &state).await?,
            Err(reply) => {
                bot.send_message(msg.chat.id, reply).await?;
            }
        },
        Command::Search(query) => match search_query(&query) {
            Ok(query) => search(bot, msg.chat.id, query, &state).await?,
            Err(reply) => {
                bot.send_message(msg.chat.id, reply).await?;
            }
        },
    }

    Ok(())
}

pub(crate) async fn handle_callback(
    bot: Bot,
    query: CallbackQuery,
    state: Arc<BotState>,
) -> ResponseResult<()> {
    if let Err(reply) = check_access(&state.access_gate, UserId::from(query.from.id)) {
        bot.answer_callback_query(&query.id)
            .text(reply)
            .show_alert(true)
            .await?;
        return Ok(());
    }

    let Some(locator) = callback_locator(query.data.as_deref()) else {
        bot.answer_callback_query(&query.id).await?;
        return Ok(());
    };

    bot.answer_callback_query(&query.id)
        .text(REQUEST_ACCEPTED)
        .await?;

    let Some(chat_id) = query.message.as_ref().map(|message| message.chat().id) else {
        warn!(%locator, "Callback has no message to reply to");
        return Ok(());
    };

    start_download(bot, chat_id, locator, &state).await
}

fn check_access(access_gate: &AccessGate, user_id: UserId) -> Result<(), &'static str> {
    if access_gate.is_allowed(&user_id) {
        return Ok(());
    }

    warn!(%user_id, "Access denied");

    Err(ACCESS_DENIED)
}

/// Locator for `/add_track`, or the reply explaining why there is none.
fn add_track_locator(link: &str) -> Result<MediaLocator, &'static str> {
    if link.trim().is_empty() {
        return Err(ADD_TRACK_USAGE);
    }

    MediaLocator::parse(link).map_err(|error| {
        debug!(?error, link, "Rejected link");
        NOT_A_LINK
    })
}

fn search_query(query: &str) -> Result<String, &'static str> {
    match query.trim() {
        "" => Err(SEARCH_USAGE),
        query => Ok(query.to_string()),
    }
}

fn callback_locator(data: Option<&str>) -> Option<MediaLocator> {
    let stable_id = data.and_then(parse_download_callback);

    if stable_id.is_none() {
        debug!(?data, "Ignoring unknown callback");
    }

    stable_id.map(|stable_id| MediaLocator::from_stable_id(&stable_id))
}

fn search_status_text(query: &str, results: &Result<Vec<SearchResult>, DispatchError>) -> String {
    match results {
        Ok(results) if results.is_empty() => NOTHING_FOUND.to_string(),
        Ok(_) => format!("Search results for '{}':", query),
        Err(error) => format!("❌ Search error: {}", error),
    }
}

async fn start_download(
    bot: Bot,
    chat_id: ChatId,
    locator: MediaLocator,
    state: &BotState,
) -> ResponseResult<()> {
    let status = bot.send_message(chat_id, DOWNLOAD_STARTED).await?;

    info!(%chat_id, %locator, "Download requested");

    let (sink, receiver) = progress_channel();
    let task = state.dispatcher.run_track(locator, sink);
    let status = TelegramStatusMessage::new(bot, chat_id, status.id);

    tokio::spawn(async move {
        relay_progress(&status, receiver, task).await;
    });

    Ok(())
}

async fn search(bot: Bot, chat_id: ChatId, query: String, state: &BotState) -> ResponseResult<()> {
    let status = bot
        .send_message(chat_id, format!("🔎 Searching: {}...", query))
        .await?;
    let results = state.dispatcher.search(query.clone(), DEFAULT_SEARCH_LIMIT);

    tokio::spawn(async move {
        let results = results.await;
        let text = search_status_text(&query, &results);

        if let Err(error) = &results {
            warn!(?error, %query, "Search failed");
        }

        let request = bot.edit_message_text(chat_id, status.id, text);
        let edit_result = match &results {
            Ok(results) if !results.is_empty() => {
                request.reply_markup(search_results_keyboard(results)).await
            }
            _ => request.await,
        };

        if let Err(error) = edit_result {
            warn!(?error, "Unable to update search status");
        }
    });

    Ok(())
}
