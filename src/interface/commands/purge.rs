//! # Purge Command
//!
//! Handles `.purge`: bulk-deletes the bot's own recent messages in the
//! room. A tracker left running keeps editing a deleted message; those
//! edits fail and are logged, which is tolerated.

use crate::domain::traits::ChatProvider;
use crate::strings::messages;
use anyhow::Result;

const HISTORY_LIMIT: u32 = 100;

pub async fn handle_purge(chat: &impl ChatProvider) -> Result<()> {
    let ids = match chat.recent_own_messages(HISTORY_LIMIT).await {
        Ok(ids) => ids,
        Err(e) => {
            let _ = chat.send_notification(&messages::purge_failed(&e)).await;
            return Ok(());
        }
    };

    if ids.is_empty() {
        let _ = chat.send_notification(messages::NOTHING_TO_PURGE).await;
        return Ok(());
    }

    let mut deleted = 0usize;
    for id in &ids {
        match chat.delete_message(id).await {
            Ok(()) => deleted += 1,
            Err(e) => tracing::warn!("Failed to delete message {}: {}", id, e),
        }
    }

    let _ = chat.send_notification(&messages::purged(deleted)).await;
    Ok(())
}
