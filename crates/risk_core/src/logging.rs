//! Logging front-end for the native layer.
//!
//! Everything goes through the `log` facade. The three macros mirror the
//! platform log levels the game has always used:
//!
//!   - `logi!` -- informational, always on
//!   - `loge!` -- errors, always on
//!   - `logw!` -- verbose tracing, only in debug builds
//!
//! All three log under [`LOG_TARGET`] so a host can filter the native layer
//! with `RUST_LOG=threaded_app=...`.

use std::time::{Duration, Instant};

pub const LOG_TARGET: &str = "threaded_app";

/// Install `env_logger` with an `info` default filter. Safe to call twice.
pub fn init() {
    init_with_default_filter("info");
}

pub fn init_with_default_filter(filter: &str) {
    let env = env_logger::Env::default().default_filter_or(filter);
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!(target: LOG_TARGET, "Logger already initialized");
    }
}

#[macro_export]
macro_rules! logi {
    ($($arg:tt)+) => {
        $crate::log::info!(target: $crate::logging::LOG_TARGET, $($arg)+)
    };
}

#[macro_export]
macro_rules! loge {
    ($($arg:tt)+) => {
        $crate::log::error!(target: $crate::logging::LOG_TARGET, $($arg)+)
    };
}

#[macro_export]
macro_rules! logw {
    ($($arg:tt)+) => {
        if cfg!(debug_assertions) {
            $crate::log::trace!(target: $crate::logging::LOG_TARGET, $($arg)+)
        }
    };
}

/// Scoped timer. Logs how long the named scope took when it is dropped.
#[must_use = "a Profile measures until it is dropped"]
pub struct Profile {
    name: &'static str,
    start: Instant,
}

impl Profile {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Profile {
    fn drop(&mut self) {
        log::debug!(
            target: LOG_TARGET,
            "{} took {:.3}ms",
            self.name,
            self.elapsed().as_secs_f64() * 1000.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_does_not_panic() {
        init();
        init_with_default_filter("debug");
    }

    #[test]
    fn profile_reports_name_and_monotonic_elapsed() {
        let profile = Profile::new("Loading font atlas");
        let first = profile.elapsed();
        std::thread::sleep(Duration::from_millis(2));
        let second = profile.elapsed();
        assert_eq!(profile.name(), "Loading font atlas");
        assert!(second >= first);
        assert!(second >= Duration::from_millis(2));
    }

    #[test]
    fn macros_accept_format_arguments() {
        let count = 3;
        logi!("loaded {} fonts", count);
        loge!("failed: {}", "reason");
        logw!("verbose {count}");
    }
}
