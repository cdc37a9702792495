use crate::services::DispatchError;
use async_trait::async_trait;
use request_processors::{PipelineOutcome, ProgressSink};
use std::future::Future;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, warn};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct StatusMessageError(Box<dyn std::error::Error + Send + Sync>);

impl StatusMessageError {
    pub(crate) fn new(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(error.into())
    }
}

/// A chat message that is edited in place as a task advances.
#[async_trait]
pub(crate) trait StatusMessage: Send + Sync {
    async fn edit(&self, text: &str) -> Result<(), StatusMessageError>;
}

pub(crate) struct TelegramStatusMessage {
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
}

impl TelegramStatusMessage {
    pub(crate) fn new(bot: Bot, chat_id: ChatId, message_id: MessageId) -> Self {
        Self {
            bot,
            chat_id,
            message_id,
        }
    }
}

#[async_trait]
impl StatusMessage for TelegramStatusMessage {
    async fn edit(&self, text: &str) -> Result<(), StatusMessageError> {
        self.bot
            .edit_message_text(self.chat_id, self.message_id, text)
            .await
            .map_err(StatusMessageError::new)?;

        Ok(())
    }
}

/// Forwards progress from a worker thread to the event loop.
pub(crate) struct ChannelProgressSink(UnboundedSender<String>);

impl ProgressSink for ChannelProgressSink {
    fn report(&self, status: &str) {
        if self.0.send(status.to_string()).is_err() {
            debug!(status, "Progress receiver is gone");
        }
    }
}

pub(crate) fn progress_channel() -> (ChannelProgressSink, UnboundedReceiver<String>) {
    let (sender, receiver) = unbounded_channel();

    (ChannelProgressSink(sender), receiver)
}

/// Applies every progress update to the status message, then renders the outcome.
///
/// The receiver closes once the pipeline drops its sink, so all updates land
/// before the outcome is rendered.
pub(crate) async fn relay_progress<S, F>(
    status: &S,
    mut receiver: UnboundedReceiver<String>,
    task: F,
) where
    S: StatusMessage + ?Sized,
    F: Future<Output = Result<PipelineOutcome, DispatchError>>,
{
    while let Some(text) = receiver.recv().await {
        edit_or_log(status, &text).await;
    }

    match task.await {
        Ok(PipelineOutcome::Success { .. }) => (),
        Ok(PipelineOutcome::Failure { stage, message }) => {
            debug!(%stage, "Rendering pipeline failure");
            edit_or_log(status, &format!("❌ An error occurred: {}", message)).await;
        }
        Err(error) => {
            error!(?error, "Pipeline task did not finish");
            edit_or_log(status, &format!("❌ An error occurred: {}", error)).await;
        }
    }
}

async fn edit_or_log<S: StatusMessage + ?Sized>(status: &S, text: &str) {
    if let Err(error) = status.edit(text).await {
        warn!(?error, "Unable to update status message");
    }
}
