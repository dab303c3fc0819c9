//! # Log Strings
//!
//! Messages written to the tracing log rather than to chat.

pub const LOGIN_SUCCESS: &str = "Logged in successfully!";

pub fn setting_display_name(name: &str) -> String {
    format!("Setting display name to: {name}")
}

pub fn set_display_name_fail(err: &str) -> String {
    format!("Failed to set display name: {err}")
}

pub const SYNC_LOOP_START: &str = "Starting sync loop...";

pub fn sync_loop_fail(err: &str) -> String {
    format!("Sync loop failed: {err}")
}

pub const SHUTDOWN: &str = "Shutting down...";

pub fn invite_received(room_id: &str) -> String {
    format!("💌 Received invite for room {room_id:?}")
}

pub fn join_invite_fail(err: &str) -> String {
    format!("Failed to join room after invite: {err}")
}

pub const CONFIG_READ_ERROR: &str = "Failed to read data/config.yaml";
pub const CONFIG_PARSE_ERROR: &str = "Failed to parse YAML";
