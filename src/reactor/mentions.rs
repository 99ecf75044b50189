//! Mention-list formatting for tag-everyone replies.

use serde::Deserialize;

/// One member of a group's administrator roster. Fetched fresh per tag
/// request, never cached.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
}

/// How the mention list is rendered. A config decision, fixed per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionMode {
    /// `@username` tokens only, unnamed entries omitted, trailing phrase.
    #[default]
    Compact,
    /// Banner line, name fallback for unnamed entries, five per line.
    Verbose,
}

/// Fixed apology for an empty roster.
pub const EMPTY_ROSTER_TEXT: &str = "Sorry, I couldn't get the member list for this group.";

const COMPACT_TRAILER: &str = "Hiiii listen";
const VERBOSE_BANNER: &str = "📢 Calling all members!";
const VERBOSE_PER_LINE: usize = 5;

/// Render the roster as one outgoing message.
///
/// Display names are not sanitized for Telegram markup; replies are sent
/// without a parse mode so the text stays literal.
pub fn format_mentions(roster: &[RosterEntry], mode: MentionMode) -> String {
    if roster.is_empty() {
        return EMPTY_ROSTER_TEXT.to_string();
    }

    match mode {
        MentionMode::Compact => {
            let mentions: Vec<String> = roster
                .iter()
                .filter_map(|entry| entry.username.as_ref().map(|u| format!("@{u}")))
                .collect();
            format!("{} {}", mentions.join(" "), COMPACT_TRAILER)
        }
        MentionMode::Verbose => {
            let mut out = String::from(VERBOSE_BANNER);
            out.push('\n');
            for (i, entry) in roster.iter().enumerate() {
                match &entry.username {
                    Some(username) => {
                        out.push('@');
                        out.push_str(username);
                    }
                    None => {
                        out.push_str(&entry.first_name);
                        if let Some(last) = &entry.last_name {
                            out.push(' ');
                            out.push_str(last);
                        }
                    }
                }
                if i + 1 < roster.len() {
                    out.push(if (i + 1) % VERBOSE_PER_LINE == 0 { '\n' } else { ' ' });
                }
            }
            out
        }
    }
}
