//! Tracing subscriber setup.
//!
//! Operational logs go to stderr through a `fmt` layer. `RUST_LOG` takes
//! precedence; otherwise the level follows the quiet/verbose preference.
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

use crate::Verbosity;

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Default => "warn",
        Verbosity::Verbose => "debug",
    }
}

/// Installs the global subscriber. A second call is a no-op.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_follows_verbosity() {
        assert_eq!(default_directive(Verbosity::Quiet), "error");
        assert_eq!(default_directive(Verbosity::Default), "warn");
        assert_eq!(default_directive(Verbosity::Verbose), "debug");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(Verbosity::Quiet);
        init(Verbosity::Verbose);
    }
}
