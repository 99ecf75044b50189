//! Message classification and dispatch priority.

use crate::reactor::directory::Directory;
use crate::reactor::message::InboundMessage;
use crate::reactor::reminders::{self, ReminderRequest};

/// The single outbound action a message can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Schedule a reminder, then acknowledge in the chat.
    ScheduleReminder(ReminderRequest),
    /// Reply with a contact card from the directory.
    SendContact { display_name: String, phone_number: String },
    /// Fetch the admin roster and post a mention list.
    TagEveryone,
    /// Reply with the command overview.
    ShowHelp,
}

/// Classifies inbound messages. Pure: all side effects live in the engine.
///
/// One configurable router with feature toggles replaces the parallel
/// near-duplicate dispatch paths the bot grew over time.
pub struct Router {
    directory: Directory,
    /// Trigger phrases, pre-lowered. Matched as substrings, not whole
    /// words, so a phrase inside a longer word still triggers.
    triggers: Vec<String>,
    enable_reminders: bool,
    enable_directory: bool,
}

impl Router {
    pub fn new(
        directory: Directory,
        triggers: &[String],
        enable_reminders: bool,
        enable_directory: bool,
    ) -> Self {
        Self {
            directory,
            triggers: triggers.iter().map(|t| t.to_lowercase()).collect(),
            enable_reminders,
            enable_directory,
        }
    }

    /// Classify one message. At most one action is produced even when
    /// several families would match; the order below is the priority.
    pub fn route(&self, msg: &InboundMessage) -> Option<Action> {
        if !msg.kind.is_multiparty() {
            return None;
        }

        let lower = msg.text.to_lowercase();

        if lower == "/help" || lower == "/start" {
            return Some(Action::ShowHelp);
        }

        if self.enable_reminders
            && let Some(request) = reminders::parse_reminder(&msg.text)
        {
            return Some(Action::ScheduleReminder(request));
        }

        if self.enable_directory
            && let Some(hit) = self.directory.lookup(&msg.text)
        {
            return Some(Action::SendContact {
                display_name: hit.display_name,
                phone_number: hit.phone_number,
            });
        }

        if self.triggers.iter().any(|t| lower.contains(t.as_str())) {
            return Some(Action::TagEveryone);
        }

        None
    }

    pub fn trigger_phrases(&self) -> &[String] {
        &self.triggers
    }
}
