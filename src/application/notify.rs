//! # Notifier
//!
//! Posts the transient mention alerts raised by tracker transitions and
//! schedules each one's deletion. Pending deletions are tracked as
//! abortable tasks so process shutdown does not leak timers.

use crate::application::render::weather_emoji;
use crate::domain::config::AlertsConfig;
use crate::domain::traits::ChatProvider;
use crate::domain::types::{Shop, Transition};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

type PendingDeletions = Arc<Mutex<HashMap<u64, JoinHandle<()>>>>;

pub struct Notifier {
    alerts: AlertsConfig,
    ttl: Duration,
    pending: PendingDeletions,
    next_id: AtomicU64,
}

impl Notifier {
    pub fn new(alerts: AlertsConfig, ttl: Duration) -> Self {
        Self {
            alerts,
            ttl,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Posts one alert per transition that has a mention mapping; unmapped
    /// names are skipped silently. A failed post is logged and does not
    /// block the remaining transitions.
    pub async fn dispatch<C>(&self, chat: &C, shop: Option<Shop>, transitions: &[Transition])
    where
        C: ChatProvider + Clone + Send + Sync + 'static,
    {
        for transition in transitions {
            let mention = match transition {
                Transition::Restocked { name, .. } => {
                    shop.and_then(|shop| self.alerts.stock_mention(shop, name))
                }
                Transition::EventStarted { name } => self.alerts.weather_mention(name),
            };
            let Some(mention) = mention else { continue };

            let content = match transition {
                Transition::Restocked { name, .. } => {
                    crate::strings::messages::restock_alert(name, mention)
                }
                Transition::EventStarted { name } => {
                    crate::strings::messages::weather_alert(weather_emoji(name), name, mention)
                }
            };

            match chat.send_alert(&content, mention).await {
                Ok(event_id) => self.schedule_delete(chat.clone(), event_id).await,
                Err(e) => {
                    tracing::warn!("Failed to post alert for {}: {}", transition.name(), e);
                }
            }
        }
    }

    /// Arms the self-deletion timer for one alert message.
    async fn schedule_delete<C>(&self, chat: C, event_id: String)
    where
        C: ChatProvider + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let ttl = self.ttl;
        let pending = Arc::clone(&self.pending);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Err(e) = chat.delete_message(&event_id).await {
                tracing::warn!("Failed to delete alert {}: {}", event_id, e);
            }
            pending.lock().await.remove(&id);
        });
        self.pending.lock().await.insert(id, handle);
    }

    /// Aborts every pending alert deletion. Called on process shutdown.
    pub async fn shutdown(&self) {
        let mut pending = self.pending.lock().await;
        for (_, handle) in pending.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    #[derive(Clone, Default)]
    struct AlertChat {
        alerts: Arc<StdMutex<Vec<(String, String)>>>,
        deletions: Arc<StdMutex<Vec<String>>>,
        fail_posts: bool,
    }

    #[async_trait]
    impl ChatProvider for AlertChat {
        async fn send_message(&self, _content: &str) -> Result<String, String> {
            Ok("$msg".into())
        }

        async fn edit_message(&self, _message_id: &str, _content: &str) -> Result<(), String> {
            Ok(())
        }

        async fn delete_message(&self, message_id: &str) -> Result<(), String> {
            self.deletions.lock().unwrap().push(message_id.to_string());
            Ok(())
        }

        async fn send_notification(&self, _content: &str) -> Result<(), String> {
            Ok(())
        }

        async fn send_alert(&self, content: &str, mention: &str) -> Result<String, String> {
            if self.fail_posts {
                return Err("boom".into());
            }
            let mut alerts = self.alerts.lock().unwrap();
            alerts.push((content.to_string(), mention.to_string()));
            Ok(format!("$alert-{}", alerts.len()))
        }

        async fn recent_own_messages(&self, _limit: u32) -> Result<Vec<String>, String> {
            Ok(Vec::new())
        }

        fn room_id(&self) -> String {
            "!room:test".to_string()
        }
    }

    fn alerts_config() -> AlertsConfig {
        serde_yaml::from_str(
            r#"
stock:
  seed_stock:
    Grape: "@grape-fans:test"
weather:
  Rain: "@rain-fans:test"
"#,
        )
        .unwrap()
    }

    fn restock(name: &str) -> Transition {
        Transition::Restocked { name: name.to_string(), quantity: 1 }
    }

    #[tokio::test(start_paused = true)]
    async fn mapped_transitions_alert_and_self_delete() {
        let notifier = Notifier::new(alerts_config(), Duration::from_secs(120));
        let chat = AlertChat::default();

        notifier
            .dispatch(
                &chat,
                Some(Shop::Seed),
                &[restock("Grape"), Transition::EventStarted { name: "Rain".into() }],
            )
            .await;

        let alerts = chat.alerts.lock().unwrap().clone();
        assert_eq!(alerts.len(), 2);
        assert!(alerts[0].0.contains("back in stock"));
        assert_eq!(alerts[0].1, "@grape-fans:test");
        assert!(alerts[1].0.contains("has started"));

        tokio::time::sleep(Duration::from_secs(121)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        let deletions = chat.deletions.lock().unwrap().clone();
        assert_eq!(deletions.len(), 2);
        assert!(notifier.pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn unmapped_transitions_are_suppressed() {
        let notifier = Notifier::new(alerts_config(), Duration::from_secs(120));
        let chat = AlertChat::default();

        // Cacao has no mapping; Grape is mapped to the wrong shop here.
        notifier.dispatch(&chat, Some(Shop::Gear), &[restock("Cacao"), restock("Grape")]).await;
        notifier
            .dispatch(&chat, None, &[Transition::EventStarted { name: "Frost".into() }])
            .await;

        assert!(chat.alerts.lock().unwrap().is_empty());
        assert!(notifier.pending.lock().await.is_empty());
    }

    #[tokio::test]
    async fn one_failed_post_does_not_block_the_rest() {
        let notifier = Notifier::new(alerts_config(), Duration::from_secs(120));
        let chat = AlertChat { fail_posts: true, ..AlertChat::default() };

        // Both posts fail; dispatch still walks the whole list and tracks
        // nothing for deletion.
        notifier
            .dispatch(
                &chat,
                Some(Shop::Seed),
                &[restock("Grape"), Transition::EventStarted { name: "Rain".into() }],
            )
            .await;
        assert!(notifier.pending.lock().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_aborts_pending_deletions() {
        let notifier = Notifier::new(alerts_config(), Duration::from_secs(120));
        let chat = AlertChat::default();

        notifier.dispatch(&chat, Some(Shop::Seed), &[restock("Grape")]).await;
        assert_eq!(notifier.pending.lock().await.len(), 1);

        notifier.shutdown().await;
        tokio::time::sleep(Duration::from_secs(121)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(chat.deletions.lock().unwrap().is_empty());
    }
}
