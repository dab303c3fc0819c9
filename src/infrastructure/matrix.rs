//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` trait for the Matrix protocol using the `matrix_sdk`.
//! This module acts as the bridge between the generic `ChatProvider` interface used by the bot's core logic
//! and the specific implementation details of the Matrix SDK.

use crate::domain::traits::ChatProvider;
use anyhow::Result;
use async_trait::async_trait;
use matrix_sdk::room::{MessagesOptions, Room};
use matrix_sdk::ruma::events::relation::Replacement;
use matrix_sdk::ruma::events::room::message::{
    Relation, RoomMessageEventContent, RoomMessageEventContentWithoutRelation,
};
use matrix_sdk::ruma::events::Mentions;
use matrix_sdk::ruma::{EventId, UserId};
use std::convert::TryFrom;

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }

    /// Helper to send markdown edits
    async fn internal_edit(&self, event_id: &str, new_content: &str) -> Result<()> {
        let event_id = <&EventId>::try_from(event_id)?;
        let mut content = RoomMessageEventContent::text_markdown(new_content);
        let replacement_content = RoomMessageEventContentWithoutRelation::from(content.clone());

        content.relates_to = Some(Relation::Replacement(Replacement::new(
            event_id.to_owned(),
            replacement_content,
        )));

        self.room.send(content).await?;
        Ok(())
    }

    async fn internal_delete(&self, event_id: &str) -> Result<()> {
        let event_id = <&EventId>::try_from(event_id)?;
        self.room.redact(event_id, None, None).await?;
        Ok(())
    }

    async fn internal_alert(&self, content: &str, mention: &str) -> Result<String> {
        let mut event = RoomMessageEventContent::text_markdown(content);
        // An unparseable target still goes out as plain text, just unpilled.
        if let Ok(user_id) = UserId::parse(mention) {
            event = event.add_mentions(Mentions::with_user_ids([user_id]));
        }
        let resp = self.room.send(event).await?;
        Ok(resp.event_id.to_string())
    }

    async fn internal_recent_own(&self, limit: u32) -> Result<Vec<String>> {
        let mut options = MessagesOptions::backward();
        options.limit = limit.into();

        let own_id = self.room.own_user_id();
        let messages = self.room.messages(options).await?;

        let mut ids = Vec::new();
        for event in messages.chunk {
            if let Ok(deserialized) = event.raw().deserialize() {
                if deserialized.sender() == own_id {
                    ids.push(deserialized.event_id().to_string());
                }
            }
        }
        Ok(ids)
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<String, String> {
        tracing::info!("Bot sending message to {}: {}", self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|resp| resp.event_id.to_string())
            .map_err(|e| e.to_string())
    }

    async fn edit_message(&self, message_id: &str, content: &str) -> Result<(), String> {
        self.internal_edit(message_id, content)
            .await
            .map_err(|e| e.to_string())
    }

    async fn delete_message(&self, message_id: &str) -> Result<(), String> {
        self.internal_delete(message_id)
            .await
            .map_err(|e| e.to_string())
    }

    async fn send_notification(&self, content: &str) -> Result<(), String> {
        // Notifications are also markdown messages for now
        self.send_message(content).await.map(|_| ())
    }

    async fn send_alert(&self, content: &str, mention: &str) -> Result<String, String> {
        tracing::info!("Bot sending alert to {}: {}", self.room_id(), content);
        self.internal_alert(content, mention)
            .await
            .map_err(|e| e.to_string())
    }

    async fn recent_own_messages(&self, limit: u32) -> Result<Vec<String>, String> {
        self.internal_recent_own(limit)
            .await
            .map_err(|e| e.to_string())
    }
}
