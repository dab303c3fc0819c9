//! # Stock Tracker Command
//!
//! Handles `.stock start <shop>` and `.stock stop`. Lifecycle errors come
//! back from the registry and are surfaced as a reply to the invoking user.

use crate::application::registry::TrackerRegistry;
use crate::domain::traits::ChatProvider;
use crate::domain::types::{Shop, TrackerKind};
use crate::strings::messages;
use anyhow::Result;

pub async fn handle_stock<C>(registry: &TrackerRegistry, chat: &C, args: &str) -> Result<()>
where
    C: ChatProvider + Clone + Send + Sync + 'static,
{
    let mut parts = args.split_whitespace();
    match parts.next() {
        Some("start") => {
            let Some(shop_key) = parts.next() else {
                notify(chat, messages::STOCK_USAGE).await;
                return Ok(());
            };
            let shop: Shop = match shop_key.parse() {
                Ok(shop) => shop,
                Err(_) => {
                    let known = Shop::ALL.map(|shop| shop.key()).join(", ");
                    notify(chat, &messages::unknown_shop(shop_key, &known)).await;
                    return Ok(());
                }
            };

            match registry.start_stock(chat, shop).await {
                Ok(item_count) => {
                    notify(chat, &messages::stock_started(shop.title(), item_count)).await;
                }
                Err(e) => {
                    notify(chat, &messages::tracker_rejected(&e.to_string())).await;
                }
            }
        }
        Some("stop") => match registry.stop(chat, TrackerKind::Stock).await {
            Ok(()) => notify(chat, messages::STOCK_STOPPED).await,
            Err(e) => notify(chat, &messages::tracker_rejected(&e.to_string())).await,
        },
        _ => notify(chat, messages::STOCK_USAGE).await,
    }
    Ok(())
}

async fn notify(chat: &impl ChatProvider, content: &str) {
    if let Err(e) = chat.send_notification(content).await {
        tracing::error!("Failed to send reply: {}", e);
    }
}
