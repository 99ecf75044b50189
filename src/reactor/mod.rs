//! Group-chat reactor - classifies inbound messages and emits replies.

pub mod directory;
pub mod engine;
pub mod mentions;
pub mod message;
pub mod reminders;
pub mod router;
pub mod telegram;

pub use engine::ReactorEngine;
pub use message::{ChatKind, InboundMessage};
pub use router::{Action, Router};
pub use telegram::TelegramClient;
