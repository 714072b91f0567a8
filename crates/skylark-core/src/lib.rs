//! Command-processing and subscription-orchestration core for a feed-relay
//! chat bot.
//!
//! This crate is intentionally transport-agnostic. The chat platform, the
//! feed provider, the subscription store, and the stream manager live behind
//! ports (traits) implemented in adapter crates.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod lookup;
pub mod outcome;
pub mod parser;
pub mod ports;
pub mod subscriptions;
pub mod timeline;

#[cfg(test)]
pub(crate) mod testutil;

pub use errors::{Error, Result};
pub use outcome::{Outcome, TrCode, Translated};
