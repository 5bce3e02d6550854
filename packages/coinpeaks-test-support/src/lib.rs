//! Coin Peaks test support utilities
//!
//! Shared helpers for the integration test binaries: a single, idempotent
//! logging bootstrap.

pub mod logging;
