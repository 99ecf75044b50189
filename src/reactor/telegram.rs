//! Telegram client using teloxide.

use teloxide::prelude::*;
use teloxide::types::ChatAction;
use tracing::{info, warn};

use crate::reactor::mentions::RosterEntry;

/// Thin wrapper over the Bot API. Methods return `Err(String)` with a
/// logged description on transport failure; callers decide whether to
/// apologize or stay silent.
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Send a plain-text message (no parse mode, so markup in names stays
    /// literal). Returns the sent message id.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64, String> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map(|msg| msg.id.0 as i64)
            .map_err(|e| {
                let msg = format!("Failed to send: {e}");
                warn!("{}", msg);
                msg
            })
    }

    /// Show a "typing…" chat action while a roster fetch is in flight.
    pub async fn send_typing(&self, chat_id: i64) -> Result<(), String> {
        self.bot
            .send_chat_action(ChatId(chat_id), ChatAction::Typing)
            .await
            .map(|_| ())
            .map_err(|e| format!("Failed to send chat action: {e}"))
    }

    /// Fetch the chat's administrator roster.
    ///
    /// Fails when the bot lacks permission or is not a group member.
    pub async fn get_chat_admins(&self, chat_id: i64) -> Result<Vec<RosterEntry>, String> {
        info!("👥 Getting admins for chat {}", chat_id);

        let admins = self
            .bot
            .get_chat_administrators(ChatId(chat_id))
            .await
            .map_err(|e| {
                let msg = format!("Failed to get chat admins: {e}");
                warn!("{}", msg);
                msg
            })?;

        Ok(admins
            .into_iter()
            .map(|member| RosterEntry {
                user_id: member.user.id.0 as i64,
                username: member.user.username,
                first_name: member.user.first_name,
                last_name: member.user.last_name,
            })
            .collect())
    }
}
