//! # Domain Traits
//!
//! Abstract interfaces for core system components (Chat, Status API).
//! Allows for pluggable implementations in the Infrastructure layer.

use crate::domain::errors::FetchError;
use crate::domain::types::{Shop, StockSnapshot, WeatherSnapshot};
use async_trait::async_trait;

/// Abstract interface for a Chat Provider (e.g., Matrix, Slack, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room, returning its event id
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Edit a message in the room
    async fn edit_message(&self, message_id: &str, content: &str) -> Result<(), String>;

    /// Delete a message from the room
    async fn delete_message(&self, message_id: &str) -> Result<(), String>;

    /// Send a notification (not tracked/editable)
    async fn send_notification(&self, content: &str) -> Result<(), String>;

    /// Send an alert carrying `mention` in its intentional-mentions list,
    /// returning its event id
    async fn send_alert(&self, content: &str, mention: &str) -> Result<String, String>;

    /// Event ids of the bot's own recent messages, newest first
    async fn recent_own_messages(&self, limit: u32) -> Result<Vec<String>, String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// Abstract interface for the game-status API
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Current inventory of one shop, duplicates merged, sorted by name
    async fn stock(&self, shop: Shop) -> Result<StockSnapshot, FetchError>;

    /// Current weather events in source order
    async fn weather(&self) -> Result<WeatherSnapshot, FetchError>;
}
