#![doc(test(attr(deny(warnings))))]

//! Stash Core keeps the local state of a personal organizer: a finance
//! tracker with derived metrics and snapshot history, plus snippet and
//! secret collections, each persisted as a JSON document in a key-value
//! store.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use crate::core::stash_manager::StashManager;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Stash Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
