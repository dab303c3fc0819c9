//! # Error Taxonomy
//!
//! Typed errors for the fetch and tracker-lifecycle paths. Everything else
//! (command handlers, startup) stays on `anyhow`.

use thiserror::Error;

/// A status fetch that did not produce a usable snapshot. Recoverable: tick
/// callers log and retry on the next firing.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("api returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("unexpected payload: {0}")]
    Shape(String),
}

/// Tracker lifecycle failures surfaced to the invoking user.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("there is already an active {0} tracker in this room")]
    AlreadyActive(&'static str),
    #[error("there is no active {0} tracker in this room")]
    NotActive(&'static str),
    #[error("error fetching {1}: {0}")]
    Fetch(#[source] FetchError, &'static str),
    #[error("could not post tracker message: {0}")]
    Chat(String),
}
