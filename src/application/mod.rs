//! # Application Layer
//!
//! Contains the core business logic and orchestration of the bot.
//! This includes the tracker registry, diff engine, renderer, notifier and command routing.

pub mod diff;
pub mod notify;
pub mod registry;
pub mod render;
pub mod router;
