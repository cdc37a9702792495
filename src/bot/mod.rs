use crate::services::{AccessGate, TaskDispatcher};
use std::sync::Arc;
use std::time::Duration;
use teloxide::dispatching::{DefaultKey, UpdateHandler};
use teloxide::prelude::*;
use teloxide::RequestError;
use teloxide::utils::command::BotCommands;
use tracing::{debug, warn};

mod handlers;
mod keyboard;
mod progress;

/// Longer than the long-polling timeout.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case", description = "These commands are supported:")]
pub(crate) enum Command {
    #[command(description = "show usage")]
    Start,
    #[command(description = "show usage")]
    Help,
    #[command(description = "download audio by link")]
    AddTrack(String),
    #[command(description = "find a track and download it")]
    Search(String),
}

pub(crate) struct BotState {
    pub(crate) access_gate: AccessGate,
    pub(crate) dispatcher: Arc<TaskDispatcher>,
}

pub(crate) fn create_bot(token: &str) -> Result<Bot, reqwest::Error> {
    let client = teloxide::net::default_reqwest_settings()
        .timeout(CLIENT_TIMEOUT)
        .build()?;

    Ok(Bot::with_client(token, client))
}

pub(crate) async fn register_commands(bot: &Bot) {
    if let Err(error) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(?error, "Unable to register bot commands");
    }
}

pub(crate) fn build_dispatcher(
    bot: Bot,
    state: Arc<BotState>,
) -> Dispatcher<Bot, RequestError, DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .default_handler(|update| async move {
            debug!(update_id = ?update.id, "Unhandled update");
        })
        .build()
}

fn schema() -> UpdateHandler<RequestError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handlers::handle_command),
        )
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
}
