//! # Main Entry Point
//!
//! Initializes the application:
//! - Domain: Configuration and Types
//! - Infrastructure: Matrix, Status API, Liveness endpoint
//! - Application: Router, Tracker Registry, Notifier
//! - Interface: Command Handlers

#![recursion_limit = "256"]

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use matrix_sdk::{
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::SyncRoomMessageEvent,
    },
    Client,
};
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use crate::application::notify::Notifier;
use crate::application::registry::TrackerRegistry;
use crate::application::router::CommandRouter;
use crate::domain::config::AppConfig;
use crate::infrastructure::api::GardenApi;
use crate::infrastructure::matrix::MatrixService;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Configuration
    let config_content =
        fs::read_to_string("data/config.yaml").context(strings::logs::CONFIG_READ_ERROR)?;
    let config: AppConfig =
        serde_yaml::from_str(&config_content).context(strings::logs::CONFIG_PARSE_ERROR)?;

    // 2. Logging Setup
    if !std::path::Path::new("data").exists() {
        fs::create_dir("data").context("Failed to create data directory")?;
    }

    // Clear previous session log
    let log_path = std::path::Path::new("data/session.log");
    if log_path.exists() {
        let _ = fs::remove_file(log_path);
    }

    let file_appender = tracing_appender::rolling::never("data", "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn",
        )
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Starting Gardenwatch...");

    // 3. Initialize Application Components
    let source = Arc::new(GardenApi::new(&config.api));
    let notifier = Arc::new(Notifier::new(
        config.alerts.clone(),
        Duration::from_secs(config.tracker.alert_ttl_secs),
    ));
    let registry = Arc::new(TrackerRegistry::new(
        source,
        notifier.clone(),
        Duration::from_secs(config.tracker.period_secs),
    ));

    // 4. Liveness Endpoint
    let health_port = config.system.health_port;
    tokio::spawn(async move {
        if let Err(e) = infrastructure::health::serve(health_port).await {
            tracing::error!("Liveness endpoint failed: {}", e);
        }
    });

    // 5. Matrix Setup
    let client = Client::builder()
        .homeserver_url(&config.services.matrix.homeserver)
        .build()
        .await?;

    let password = std::env::var("MATRIX_PASSWORD")
        .unwrap_or_else(|_| config.services.matrix.password.clone());

    client
        .matrix_auth()
        .login_username(&config.services.matrix.username, &password)
        .send()
        .await?;

    tracing::info!("Logged in as {}", config.services.matrix.username);
    tracing::info!("{}", strings::logs::LOGIN_SUCCESS);

    if let Some(name) = &config.services.matrix.display_name {
        tracing::info!("{}", strings::logs::setting_display_name(name));
        if let Err(e) = client.account().set_display_name(Some(name.as_str())).await {
            tracing::warn!("{}", strings::logs::set_display_name_fail(&e.to_string()));
        }
    }

    // 6. Event Handlers
    let start_time = std::time::SystemTime::now();
    let loop_config = config.clone();
    let loop_registry = registry.clone();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let config = loop_config.clone();
        let registry = loop_registry.clone();

        async move {
            if let Some(original_msg) = ev.as_original() {
                // Ignore events older than start_time
                let ts = ev.origin_server_ts();
                let event_time =
                    std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
                if event_time < start_time {
                    return;
                }

                if let matrix_sdk::ruma::events::room::message::MessageType::Text(text_content) =
                    &original_msg.content.msgtype
                {
                    let body = &text_content.body;
                    if original_msg.sender == room.own_user_id() {
                        return;
                    }
                    tracing::info!("Received message from {}: \n{}", original_msg.sender, body);

                    let chat = MatrixService::new(room);
                    let router = CommandRouter::new(config, registry);

                    if let Err(e) = router.route(&chat, body, original_msg.sender.as_str()).await {
                        tracing::error!("Failed to route message: {}", e);
                    }
                }
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            tracing::info!("{}", strings::logs::invite_received(room.room_id().as_str()));
            if let Err(e) = room.join().await {
                tracing::warn!("{}", strings::logs::join_invite_fail(&e.to_string()));
            }
        }
    });

    // 7. Sync until shutdown
    tracing::info!("{}", strings::logs::SYNC_LOOP_START);
    let sync_client = client.clone();
    let sync_handle = tokio::spawn(async move { sync_client.sync(SyncSettings::default()).await });

    tokio::select! {
        result = sync_handle => {
            match result {
                Ok(Err(e)) => tracing::error!("{}", strings::logs::sync_loop_fail(&e.to_string())),
                Err(e) => tracing::error!("Matrix Sync Panic: {}", e),
                Ok(Ok(())) => {}
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("{}", strings::logs::SHUTDOWN);
        }
    }

    // Tear down timers so nothing fires into a dead client.
    registry.shutdown().await;
    notifier.shutdown().await;

    Ok(())
}
