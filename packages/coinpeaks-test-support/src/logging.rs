//! Logging for test binaries.
//!
//! Every test binary calls [`init`] from a `ctor` hook, so the subscriber is
//! installed once per process no matter how many tests run.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

/// Runtime crate at `info`, everything else quiet.
pub const DEFAULT_DIRECTIVES: &str = "warn,coinpeaks=info";

static INSTALLED: OnceCell<bool> = OnceCell::new();

/// Filter directives from `COINPEAKS_TEST_LOG`, then `RUST_LOG`, then
/// [`DEFAULT_DIRECTIVES`]. Blank values are skipped.
pub fn directives<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ["COINPEAKS_TEST_LOG", "RUST_LOG"]
        .into_iter()
        .filter_map(&lookup)
        .map(|raw| raw.trim().to_string())
        .find(|raw| !raw.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_string())
}

/// Install the test subscriber. Output goes through the test writer so it is
/// captured per test; timestamps and module targets are left out. Returns
/// whether this call's subscriber is the one in effect.
pub fn init() -> bool {
    *INSTALLED.get_or_init(|| {
        let raw = directives(|key| std::env::var(key).ok());
        let filter =
            EnvFilter::try_new(&raw).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .with_target(false)
            .try_init()
            .is_ok()
    })
}
