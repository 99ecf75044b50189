mod config;
mod reactor;

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ChatKind as TgChatKind, PublicChatKind};
use tracing::info;
use tracing_subscriber::prelude::*;

use config::Config;
use reactor::directory::Directory;
use reactor::{ChatKind, InboundMessage, ReactorEngine, Router, TelegramClient};

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tagmate.json".to_string());
    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    // Setup logging
    let log_dir = config.data_dir.join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("tagmate.log"))
        .expect("Failed to open log file");
    let (non_blocking, _guard) = tracing_appender::non_blocking(log_file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                ),
        )
        .init();

    info!("🚀 Starting tagmate...");
    info!("Loaded config from {config_path}");
    info!("📝 Trigger phrases:");
    for phrase in &config.trigger_phrases {
        info!("   - \"{phrase}\"");
    }
    info!("📒 {} contact(s) in the directory", config.contacts.len());
    if !config.enable_reminders {
        info!("Reminders disabled");
    }
    if !config.enable_directory {
        info!("Directory lookups disabled");
    }

    let bot = Bot::new(&config.telegram_bot_token);
    let telegram = Arc::new(TelegramClient::new(bot.clone()));
    let router = Router::new(
        Directory::new(config.contacts.clone()),
        &config.trigger_phrases,
        config.enable_reminders,
        config.enable_directory,
    );
    let engine = Arc::new(ReactorEngine::new(router, telegram, config.mention_mode));

    info!("✅ Bot is now running and listening for messages...");

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handle_new_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![engine])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_new_message(msg: Message, engine: Arc<ReactorEngine>) -> ResponseResult<()> {
    let Some(inbound) = to_inbound(&msg) else {
        return Ok(());
    };
    engine.handle_message(inbound).await;
    Ok(())
}

/// Convert a Telegram update into the reactor's message model.
/// Non-text messages and senderless updates are dropped here.
fn to_inbound(msg: &Message) -> Option<InboundMessage> {
    let text = msg.text()?;
    let user = msg.from.as_ref()?;

    let kind = match &msg.chat.kind {
        TgChatKind::Private(_) => ChatKind::Private,
        TgChatKind::Public(public) => match &public.kind {
            PublicChatKind::Group => ChatKind::Group,
            PublicChatKind::Supergroup(_) => ChatKind::Supergroup,
            PublicChatKind::Channel(_) => ChatKind::Channel,
        },
    };

    Some(InboundMessage {
        chat_id: msg.chat.id.0,
        user_id: user.id.0 as i64,
        text: text.to_string(),
        kind,
    })
}
