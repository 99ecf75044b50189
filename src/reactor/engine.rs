//! Action execution: the side-effectful half of the reactor.

use std::sync::Arc;

use tracing::{info, warn};

use crate::reactor::mentions::{MentionMode, format_mentions};
use crate::reactor::message::InboundMessage;
use crate::reactor::reminders::Scheduler;
use crate::reactor::router::{Action, Router};
use crate::reactor::telegram::TelegramClient;

/// Reply sent when the roster fetch fails.
const ROSTER_FETCH_FAILED_TEXT: &str =
    "Sorry, I couldn't retrieve the member list for this group. Make sure I have the necessary permissions.";

/// Routes messages and executes the resulting actions.
pub struct ReactorEngine {
    router: Router,
    scheduler: Scheduler,
    telegram: Arc<TelegramClient>,
    mention_mode: MentionMode,
}

impl ReactorEngine {
    pub fn new(router: Router, telegram: Arc<TelegramClient>, mention_mode: MentionMode) -> Self {
        let scheduler = {
            let telegram = telegram.clone();
            Scheduler::new(move |chat_id, text| {
                let telegram = telegram.clone();
                tokio::spawn(async move {
                    if let Err(e) = telegram.send_message(chat_id, &text).await {
                        warn!("Failed to deliver reminder to chat {chat_id}: {e}");
                    }
                });
            })
        };

        Self { router, scheduler, telegram, mention_mode }
    }

    /// Handle one inbound message end to end.
    ///
    /// Never raises: a roster-fetch failure becomes a fixed apology reply,
    /// and delivery failures are logged and swallowed. No retries.
    pub async fn handle_message(&self, msg: InboundMessage) {
        let Some(action) = self.router.route(&msg) else {
            return;
        };

        match action {
            Action::ScheduleReminder(request) => {
                let id = self
                    .scheduler
                    .schedule(msg.chat_id, msg.user_id, request.delay_ms, request.message.clone())
                    .await;
                info!(
                    "⏰ Scheduled reminder {id} in chat {} ({} ms)",
                    msg.chat_id, request.delay_ms
                );
                let ack = format!("⏰ Reminder set! I'll remind you about: \"{}\"", request.message);
                self.deliver(msg.chat_id, &ack).await;
            }
            Action::SendContact { display_name, phone_number } => {
                info!("📒 Contact request in chat {}: {display_name}", msg.chat_id);
                let reply = format!("take their number - call them {display_name}: {phone_number}");
                self.deliver(msg.chat_id, &reply).await;
            }
            Action::TagEveryone => {
                info!("👥 Tag request in chat {}", msg.chat_id);
                self.telegram.send_typing(msg.chat_id).await.ok();

                let reply = match self.telegram.get_chat_admins(msg.chat_id).await {
                    Ok(roster) => format_mentions(&roster, self.mention_mode),
                    Err(e) => {
                        warn!("Roster fetch failed for chat {}: {e}", msg.chat_id);
                        ROSTER_FETCH_FAILED_TEXT.to_string()
                    }
                };
                self.deliver(msg.chat_id, &reply).await;
            }
            Action::ShowHelp => {
                let text = help_text(self.router.trigger_phrases());
                self.deliver(msg.chat_id, &text).await;
            }
        }
    }

    async fn deliver(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.telegram.send_message(chat_id, text).await {
            warn!("Failed to send reply to chat {chat_id}: {e}");
        }
    }
}

/// Command overview for /help and /start, generated from the configured
/// trigger list so it cannot drift from the config.
fn help_text(triggers: &[String]) -> String {
    let mut out = String::from("🤖 Tag Bot Help\n\nAvailable commands:\n");
    for phrase in triggers {
        out.push_str("• ");
        out.push_str(phrase);
        out.push_str(" - tag group administrators\n");
    }
    out.push_str("• remind me in <n> <seconds|minutes|hours|days> <text> - set a reminder\n");
    out.push_str("• call <name> number - look up a contact\n");
    out.push_str(
        "\nNote: due to Telegram's privacy settings, only group administrators can be tagged.",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_text_lists_configured_triggers() {
        let text = help_text(&["tag all".into(), "@all".into()]);
        assert!(text.contains("• tag all - tag group administrators"));
        assert!(text.contains("• @all - tag group administrators"));
        assert!(text.contains("remind me in"));
        assert!(text.contains("call <name> number"));
    }
}
