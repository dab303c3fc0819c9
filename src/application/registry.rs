//! # Tracker Registry
//!
//! Owns every live tracker. A tracker is a spawned task polling the status
//! source at a fixed period, editing its room message in place and raising
//! alerts for qualifying transitions. The registry enforces the lifecycle:
//! at most one tracker per (room, kind), started atomically, stopped by
//! aborting the task so no tick runs after `stop` returns.

use crate::application::{diff, render};
use crate::application::notify::Notifier;
use crate::domain::errors::TrackerError;
use crate::domain::traits::{ChatProvider, StatusSource};
use crate::domain::types::{Shop, TrackerKind};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

/// A room holds at most one tracker of each kind.
type TrackerKey = (String, TrackerKind);

struct ActiveTracker {
    task: JoinHandle<()>,
    message_id: String,
}

pub struct TrackerRegistry {
    source: Arc<dyn StatusSource>,
    notifier: Arc<Notifier>,
    period: Duration,
    trackers: Mutex<HashMap<TrackerKey, ActiveTracker>>,
}

impl TrackerRegistry {
    pub fn new(source: Arc<dyn StatusSource>, notifier: Arc<Notifier>, period: Duration) -> Self {
        Self {
            source,
            notifier,
            period,
            trackers: Mutex::new(HashMap::new()),
        }
    }

    /// Starts a stock tracker in the chat's room. Returns the number of
    /// distinct items being tracked. Nothing is created if the initial
    /// fetch or the message post fails.
    pub async fn start_stock<C>(&self, chat: &C, shop: Shop) -> Result<usize, TrackerError>
    where
        C: ChatProvider + Clone + Send + Sync + 'static,
    {
        let key = (chat.room_id(), TrackerKind::Stock);
        if self.trackers.lock().await.contains_key(&key) {
            return Err(TrackerError::AlreadyActive(TrackerKind::Stock.label()));
        }

        let snapshot = self
            .source
            .stock(shop)
            .await
            .map_err(|e| TrackerError::Fetch(e, TrackerKind::Stock.label()))?;

        let message_id = chat
            .send_message(&render::render_stock(&snapshot))
            .await
            .map_err(TrackerError::Chat)?;

        let item_count = snapshot.items.len();
        let task =
            self.spawn_stock_loop(chat.clone(), shop, message_id.clone(), snapshot.quantities());

        self.register(chat, key, task, message_id).await?;
        Ok(item_count)
    }

    /// Starts a weather tracker in the chat's room. Returns the number of
    /// currently active events.
    pub async fn start_weather<C>(&self, chat: &C) -> Result<usize, TrackerError>
    where
        C: ChatProvider + Clone + Send + Sync + 'static,
    {
        let key = (chat.room_id(), TrackerKind::Weather);
        if self.trackers.lock().await.contains_key(&key) {
            return Err(TrackerError::AlreadyActive(TrackerKind::Weather.label()));
        }

        let snapshot = self
            .source
            .weather()
            .await
            .map_err(|e| TrackerError::Fetch(e, TrackerKind::Weather.label()))?;

        let message_id = chat
            .send_message(&render::render_weather(&snapshot))
            .await
            .map_err(TrackerError::Chat)?;

        let active_events = snapshot.active_count();
        let task = self.spawn_weather_loop(chat.clone(), message_id.clone(), snapshot.flags());

        self.register(chat, key, task, message_id).await?;
        Ok(active_events)
    }

    /// Stops the tracker of `kind` in the chat's room: aborts its task (no
    /// tick runs past this point) and best-effort deletes the tracked
    /// message.
    pub async fn stop<C>(&self, chat: &C, kind: TrackerKind) -> Result<(), TrackerError>
    where
        C: ChatProvider,
    {
        let key = (chat.room_id(), kind);
        let tracker = self
            .trackers
            .lock()
            .await
            .remove(&key)
            .ok_or(TrackerError::NotActive(kind.label()))?;

        tracker.task.abort();
        if let Err(e) = chat.delete_message(&tracker.message_id).await {
            tracing::warn!(
                "Failed to delete tracker message in {}: {}",
                chat.room_id(),
                e
            );
        }
        Ok(())
    }

    /// Aborts every tracker task. Tracked messages are left in place; the
    /// `.purge` command exists to clear them out later.
    pub async fn shutdown(&self) {
        let mut trackers = self.trackers.lock().await;
        for (_, tracker) in trackers.drain() {
            tracker.task.abort();
        }
    }

    /// Claims the registry slot for a freshly spawned tracker. A concurrent
    /// start may have won while the initial fetch was in flight; the loser
    /// cleans up after itself.
    async fn register<C>(
        &self,
        chat: &C,
        key: TrackerKey,
        task: JoinHandle<()>,
        message_id: String,
    ) -> Result<(), TrackerError>
    where
        C: ChatProvider,
    {
        let kind = key.1;
        let mut trackers = self.trackers.lock().await;
        match trackers.entry(key) {
            Entry::Occupied(_) => {
                task.abort();
                if let Err(e) = chat.delete_message(&message_id).await {
                    tracing::warn!("Failed to delete duplicate tracker message: {}", e);
                }
                Err(TrackerError::AlreadyActive(kind.label()))
            }
            Entry::Vacant(slot) => {
                slot.insert(ActiveTracker { task, message_id });
                Ok(())
            }
        }
    }

    fn spawn_stock_loop<C>(
        &self,
        chat: C,
        shop: Shop,
        message_id: String,
        seed: HashMap<String, u64>,
    ) -> JoinHandle<()>
    where
        C: ChatProvider + Clone + Send + Sync + 'static,
    {
        let source = Arc::clone(&self.source);
        let notifier = Arc::clone(&self.notifier);
        let period = self.period;

        tokio::spawn(async move {
            let mut previous = seed;
            let mut ticker = interval(period);
            // Ticks are sequential within this task; a tick outlasting the
            // period skips the missed firing instead of queueing it.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first firing is immediate and the start already fetched.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let snapshot = match source.stock(shop).await {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        tracing::warn!("Stock tick failed in {}: {}", chat.room_id(), e);
                        continue;
                    }
                };

                if let Err(e) = chat
                    .edit_message(&message_id, &render::render_stock(&snapshot))
                    .await
                {
                    tracing::warn!("Failed to refresh stock tracker in {}: {}", chat.room_id(), e);
                }

                let transitions = diff::stock_transitions(&previous, &snapshot);
                notifier.dispatch(&chat, Some(shop), &transitions).await;
                previous = snapshot.quantities();
            }
        })
    }

    fn spawn_weather_loop<C>(
        &self,
        chat: C,
        message_id: String,
        seed: HashMap<String, bool>,
    ) -> JoinHandle<()>
    where
        C: ChatProvider + Clone + Send + Sync + 'static,
    {
        let source = Arc::clone(&self.source);
        let notifier = Arc::clone(&self.notifier);
        let period = self.period;

        tokio::spawn(async move {
            let mut previous = seed;
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let snapshot = match source.weather().await {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        tracing::warn!("Weather tick failed in {}: {}", chat.room_id(), e);
                        continue;
                    }
                };

                if let Err(e) = chat
                    .edit_message(&message_id, &render::render_weather(&snapshot))
                    .await
                {
                    tracing::warn!(
                        "Failed to refresh weather tracker in {}: {}",
                        chat.room_id(),
                        e
                    );
                }

                let transitions = diff::weather_transitions(&previous, &snapshot);
                notifier.dispatch(&chat, None, &transitions).await;
                previous = snapshot.flags();
            }
        })
    }
}
