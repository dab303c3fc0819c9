//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes error messages, status updates, and notification templates.

pub const AUTH_DENIED: &str = "🚫 **Authorization Denied**.";
pub const UNKNOWN_COMMAND: &str = "❓ Unknown command.";

pub const STOCK_USAGE: &str = "Usage: `.stock start <shop>` or `.stock stop`";
pub const WEATHER_USAGE: &str = "Usage: `.weather start` or `.weather stop`";

pub fn unknown_shop(key: &str, known: &str) -> String {
    format!("❌ Unknown shop `{key}`. Known shops: {known}")
}

pub fn tracker_rejected(err: &str) -> String {
    format!("❌ {err}")
}

pub fn stock_started(shop: &str, item_count: usize) -> String {
    format!("✅ Started auto-updating {shop} tracker! Tracking {item_count} items.")
}

pub const STOCK_STOPPED: &str = "✅ Stopped stock tracker in this room.";

pub fn weather_started(active_events: usize) -> String {
    format!("✅ Started auto-updating weather tracker! Currently {active_events} active weather events.")
}

pub const WEATHER_STOPPED: &str = "✅ Stopped weather tracker in this room.";

pub fn restock_alert(name: &str, mention: &str) -> String {
    format!("🎉 **{name}** is back in stock! {mention}")
}

pub fn weather_alert(emoji: &str, name: &str, mention: &str) -> String {
    format!("⚠️ {emoji} **{name}** has started! {mention}")
}

pub const NOTHING_TO_PURGE: &str = "No messages from me found to delete.";

pub fn purged(count: usize) -> String {
    format!("🧹 Deleted {count} of my messages in this room.")
}

pub fn purge_failed(err: &str) -> String {
    format!("Failed to delete messages: {err}")
}
