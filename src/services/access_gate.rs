use crate::types::UserId;
use tracing::warn;

/// Decides whether a user may talk to the bot.
pub(crate) struct AccessGate {
    allowed_user_id: Option<String>,
}

impl AccessGate {
    pub(crate) fn new(allowed_user_id: Option<String>) -> Self {
        let allowed_user_id = allowed_user_id
            .map(|user_id| user_id.trim().to_string())
            .filter(|user_id| !user_id.is_empty());

        if allowed_user_id.is_none() {
            warn!("ALLOWED_USER_ID is not set. The bot is available to everyone.");
        }

        Self { allowed_user_id }
    }

    pub(crate) fn is_allowed(&self, user_id: &UserId) -> bool {
        match &self.allowed_user_id {
            Some(allowed_user_id) => user_id.to_string() == *allowed_user_id,
            None => true,
        }
    }
}
