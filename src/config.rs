use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::reactor::directory::Contact;
use crate::reactor::mentions::MentionMode;

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read config file '{}': {}", path.display(), source)
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse config file '{}': {}", path.display(), source)
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

#[derive(Deserialize)]
struct ConfigFile {
    telegram_bot_token: String,
    /// Contact table for directory lookups; declaration order decides
    /// tie-breaks between matching names.
    #[serde(default)]
    contacts: Vec<Contact>,
    /// Phrases that request a tag-everyone reply (substring match).
    #[serde(default)]
    trigger_phrases: Vec<String>,
    #[serde(default)]
    mention_mode: MentionMode,
    #[serde(default = "default_true")]
    enable_reminders: bool,
    #[serde(default = "default_true")]
    enable_directory: bool,
    /// Directory for log files. Defaults to current directory.
    data_dir: Option<String>,
}

fn default_true() -> bool {
    true
}

pub struct Config {
    pub telegram_bot_token: String,
    pub contacts: Vec<Contact>,
    pub trigger_phrases: Vec<String>,
    pub mention_mode: MentionMode,
    pub enable_reminders: bool,
    pub enable_directory: bool,
    /// Directory for log files.
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::ReadFile { path: config_path.clone(), source: e })?;
        let file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseJson { path: config_path.clone(), source: e })?;

        // Validate required fields
        if file.telegram_bot_token.is_empty() {
            return Err(ConfigError::Validation("telegram_bot_token is required".into()));
        }
        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = file.telegram_bot_token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(
                "telegram_bot_token appears invalid (expected format: 123456789:ABCdefGHI...)".into()
            ));
        }

        // An empty phrase would match every message.
        if file.trigger_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "trigger_phrases must not contain empty phrases".into(),
            ));
        }
        if file.contacts.iter().any(|c| c.name.trim().is_empty() || c.phone_number.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "contacts must have a non-empty name and phone_number".into(),
            ));
        }

        let contacts = if file.contacts.is_empty() {
            default_contacts()
        } else {
            file.contacts
        };

        let trigger_phrases = if file.trigger_phrases.is_empty() {
            default_trigger_phrases()
        } else {
            file.trigger_phrases
        };

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            telegram_bot_token: file.telegram_bot_token,
            contacts,
            trigger_phrases,
            mention_mode: file.mention_mode,
            enable_reminders: file.enable_reminders,
            enable_directory: file.enable_directory,
            data_dir,
        })
    }
}

fn default_contacts() -> Vec<Contact> {
    [
        ("pink", "09029061353"),
        ("precious", "08160764370"),
        ("izzac", "07035658853"),
        ("david", "09160114833"),
        ("charlie", "08148736067"),
        ("sarah", "09110179180"),
    ]
    .into_iter()
    .map(|(name, phone_number)| Contact {
        name: name.to_string(),
        phone_number: phone_number.to_string(),
    })
    .collect()
}

fn default_trigger_phrases() -> Vec<String> {
    [
        "tag all",
        "@all",
        "is everyone here?",
        "tag everybody",
        "tag everyone",
        "call everyone",
        "summon all",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}
