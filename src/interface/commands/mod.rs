//! # Command Handlers
//!
//! Contains specific handler functions for each supported command (e.g., .stock, .weather).
//! These handlers are invoked by the Router.

pub mod help;
pub mod purge;
pub mod stock;
pub mod weather;
