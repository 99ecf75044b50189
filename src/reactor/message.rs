//! Inbound message model shared by the router and engine.

/// What kind of chat a message arrived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

impl ChatKind {
    /// Group and supergroup chats are the only chats the reactor responds
    /// in; one-to-one chats and channels are ignored entirely.
    pub fn is_multiparty(self) -> bool {
        matches!(self, ChatKind::Group | ChatKind::Supergroup)
    }
}

/// A message as seen by the reactor, stripped of transport detail.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub user_id: i64,
    pub text: String,
    pub kind: ChatKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiparty_kinds() {
        assert!(ChatKind::Group.is_multiparty());
        assert!(ChatKind::Supergroup.is_multiparty());
        assert!(!ChatKind::Private.is_multiparty());
        assert!(!ChatKind::Channel.is_multiparty());
    }
}
