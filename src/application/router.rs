//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in `interface/commands`).
//! It parses the command string (e.g., `.stock`) and dispatches it with the necessary context.

use anyhow::Result;
use std::sync::Arc;

use crate::application::registry::TrackerRegistry;
use crate::domain::config::AppConfig;
use crate::domain::traits::ChatProvider;
use crate::interface::commands;

pub struct CommandRouter {
    config: AppConfig,
    registry: Arc<TrackerRegistry>,
}

impl CommandRouter {
    pub fn new(config: AppConfig, registry: Arc<TrackerRegistry>) -> Self {
        Self { config, registry }
    }

    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider + Clone + Send + Sync + 'static,
    {
        let msg = message.trim();
        if !msg.starts_with('.') {
            return Ok(());
        }

        let (cmd, args) = if let Some(idx) = msg.find(' ') {
            (&msg[..idx], msg[idx + 1..].trim())
        } else {
            (msg, "")
        };
        tracing::info!(
            "Router dispatching cmd='{}' args='{}' sender='{}'",
            cmd,
            args,
            sender
        );

        if cmd == ".help" {
            return commands::help::handle_help(chat).await;
        }

        // Everything else moves state: operator only, rejected with no side
        // effects otherwise.
        let is_operator = self
            .config
            .system
            .operators
            .iter()
            .any(|operator| operator.eq_ignore_ascii_case(sender));
        if !is_operator {
            let _ = chat
                .send_notification(crate::strings::messages::AUTH_DENIED)
                .await;
            return Ok(());
        }

        match cmd {
            ".stock" => commands::stock::handle_stock(&self.registry, chat, args).await,
            ".weather" => commands::weather::handle_weather(&self.registry, chat, args).await,
            ".purge" => commands::purge::handle_purge(chat).await,
            _ => {
                let _ = chat
                    .send_message(crate::strings::messages::UNKNOWN_COMMAND)
                    .await;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::notify::Notifier;
    use crate::domain::config::AlertsConfig;
    use crate::domain::errors::FetchError;
    use crate::domain::traits::StatusSource;
    use crate::domain::types::{Shop, StockSnapshot, WeatherSnapshot};
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    struct DownSource;

    #[async_trait]
    impl StatusSource for DownSource {
        async fn stock(&self, _shop: Shop) -> Result<StockSnapshot, FetchError> {
            Err(FetchError::Shape("down".into()))
        }

        async fn weather(&self) -> Result<WeatherSnapshot, FetchError> {
            Err(FetchError::Shape("down".into()))
        }
    }

    #[derive(Clone)]
    struct SilentChat {
        notifications: Arc<StdMutex<Vec<String>>>,
    }

    #[async_trait]
    impl ChatProvider for SilentChat {
        async fn send_message(&self, _content: &str) -> Result<String, String> {
            Ok("$evt".into())
        }

        async fn edit_message(&self, _message_id: &str, _content: &str) -> Result<(), String> {
            Ok(())
        }

        async fn delete_message(&self, _message_id: &str) -> Result<(), String> {
            Ok(())
        }

        async fn send_notification(&self, content: &str) -> Result<(), String> {
            self.notifications.lock().unwrap().push(content.to_string());
            Ok(())
        }

        async fn send_alert(&self, _content: &str, _mention: &str) -> Result<String, String> {
            Ok("$alert".into())
        }

        async fn recent_own_messages(&self, _limit: u32) -> Result<Vec<String>, String> {
            Ok(Vec::new())
        }

        fn room_id(&self) -> String {
            "!room:test".to_string()
        }
    }

    fn router() -> CommandRouter {
        let yaml = r#"
services:
  matrix:
    username: "@bot:example.org"
    homeserver: "https://example.org"
system:
  operators:
    - "@gardener:example.org"
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        let notifier = Arc::new(Notifier::new(AlertsConfig::default(), Duration::from_secs(120)));
        let registry = Arc::new(TrackerRegistry::new(
            Arc::new(DownSource),
            notifier,
            Duration::from_secs(60),
        ));
        CommandRouter::new(config, registry)
    }

    #[tokio::test]
    async fn non_operator_is_rejected() {
        let router = router();
        let chat = SilentChat { notifications: Arc::new(StdMutex::new(Vec::new())) };

        router
            .route(&chat, ".stock start seed_stock", "@stranger:example.org")
            .await
            .unwrap();

        let notifications = chat.notifications.lock().unwrap().clone();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].contains("Authorization"));
    }

    #[tokio::test]
    async fn non_command_messages_are_ignored() {
        let router = router();
        let chat = SilentChat { notifications: Arc::new(StdMutex::new(Vec::new())) };

        router.route(&chat, "hello there", "@gardener:example.org").await.unwrap();
        assert!(chat.notifications.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn operator_start_surfaces_fetch_failure() {
        let router = router();
        let chat = SilentChat { notifications: Arc::new(StdMutex::new(Vec::new())) };

        router
            .route(&chat, ".stock start seed_stock", "@gardener:example.org")
            .await
            .unwrap();

        let notifications = chat.notifications.lock().unwrap().clone();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].contains("error fetching stock"));
    }
}
