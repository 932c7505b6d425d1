//! Library crate for quiz-display, exposing modules for the binary and integration tests.

/// Remote session authority access.
pub mod api;
/// Runtime configuration.
pub mod config;
/// Error taxonomy.
pub mod error;
/// Sync loop, command dispatch, and celebration timing.
pub mod services;
/// View model normalization and the display store.
pub mod state;
/// Terminal presentation.
pub mod ui;

#[cfg(test)]
mod test_support;
