//! # Weather Tracker Command
//!
//! Handles `.weather start` and `.weather stop`.

use crate::application::registry::TrackerRegistry;
use crate::domain::traits::ChatProvider;
use crate::domain::types::TrackerKind;
use crate::strings::messages;
use anyhow::Result;

pub async fn handle_weather<C>(registry: &TrackerRegistry, chat: &C, args: &str) -> Result<()>
where
    C: ChatProvider + Clone + Send + Sync + 'static,
{
    match args.split_whitespace().next() {
        Some("start") => match registry.start_weather(chat).await {
            Ok(active_events) => {
                notify(chat, &messages::weather_started(active_events)).await;
            }
            Err(e) => notify(chat, &messages::tracker_rejected(&e.to_string())).await,
        },
        Some("stop") => match registry.stop(chat, TrackerKind::Weather).await {
            Ok(()) => notify(chat, messages::WEATHER_STOPPED).await,
            Err(e) => notify(chat, &messages::tracker_rejected(&e.to_string())).await,
        },
        _ => notify(chat, messages::WEATHER_USAGE).await,
    }
    Ok(())
}

async fn notify(chat: &impl ChatProvider, content: &str) {
    if let Err(e) = chat.send_notification(content).await {
        tracing::error!("Failed to send reply: {}", e);
    }
}
