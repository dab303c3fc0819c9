//! # Snapshot Renderer
//!
//! Formats snapshots into the markdown payload shown as the tracked room
//! message. Pure functions of the snapshot: re-rendering the same state
//! yields identical output, so consecutive edits diff cleanly for a human
//! reader.

use crate::domain::types::{StockSnapshot, WeatherSnapshot};
use chrono::{Local, TimeZone};

pub fn render_stock(snapshot: &StockSnapshot) -> String {
    let mut content = format!("**🛒 {} (auto-updating)**\n\n", snapshot.shop.title());

    if snapshot.items.is_empty() {
        content.push_str("_No stock data._\n");
        return content;
    }

    for item in &snapshot.items {
        content.push_str(&format!("• **{}**: {}\n", item.name, item.quantity));
    }
    content.push_str(&format!("\n**Total items available**: {}\n", snapshot.total()));
    content
}

pub fn render_weather(snapshot: &WeatherSnapshot) -> String {
    let mut content = String::from("**⛅ Weather events (auto-updating)**\n\n");

    if snapshot.events.is_empty() {
        content.push_str("_No weather events found._\n");
        return content;
    }

    for event in &snapshot.events {
        let emoji = weather_emoji(&event.name);
        let status = if event.active {
            format!("✅ active ({}s)", event.duration)
        } else {
            "❌ inactive".to_string()
        };
        content.push_str(&format!("{} **{}**: {}", emoji, event.name, status));
        if let Some(ts) = event.starts_at {
            content.push_str(&format!(" | started {}", local_time(ts)));
        }
        if let Some(ts) = event.ends_at {
            content.push_str(&format!(" | ends {}", local_time(ts)));
        }
        content.push('\n');
    }

    content.push_str(&format!(
        "\n**{} active weather events** · next update in 1 minute\n",
        snapshot.active_count()
    ));
    content
}

pub fn weather_emoji(name: &str) -> &'static str {
    match name {
        "Rain" => "🌧️",
        "Frost" => "❄️",
        "Thunderstorm" => "⛈️",
        "NightEvent" => "🩸",
        "MeteorShower" => "☄️",
        "BeeSwarm" => "🐝",
        "Disco" => "🌈",
        "JandelStorm" => "🌀",
        "Blackhole" => "⚫",
        "DJJhai" => "🎵",
        "SunGod" => "☀️",
        "JandelFloat" => "🎈",
        _ => "⛈️",
    }
}

fn local_time(ts: i64) -> String {
    match Local.timestamp_opt(ts, 0).single() {
        Some(time) => time.format("%H:%M").to_string(),
        None => format!("@{ts}"),
    }
}
