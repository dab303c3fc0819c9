//! # Interface Layer
//!
//! User-facing entry points: the command handlers invoked by the Router.

pub mod commands;
