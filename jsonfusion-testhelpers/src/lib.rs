#![warn(missing_docs)]
#![forbid(unsafe_code)]
//! Test setup helpers shared by the JsonFusion workspace's own test suites.
//!
//! A `setup()` call spliced in by a re-exported `#[test]` attribute, plus
//! an `IPanic` error type, built on `tracing`/`tracing-subscriber` for
//! structured logging and a manual `backtrace`+`owo-colors` panic hook for
//! styled test failures.

pub use jsonfusion_testhelpers_macros::test;

use std::sync::Once;

use owo_colors::OwoColorize;

static INIT: Once = Once::new();

/// Install a `tracing` subscriber and a panic hook that prints a styled
/// backtrace, then run the test body. Idempotent across the process's
/// lifetime: safe to call once per test via the `#[test]` attribute this
/// crate re-exports, even when the test binary runs many tests in one
/// process.
pub fn setup() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(true)
            .try_init();
        install_panic_hook();
    });
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_hook(info);
        eprintln!("{}", "--- backtrace ---".red().bold());
        eprintln!("{:?}", backtrace::Backtrace::new());
    }));
}

/// An error type that panics when it's built (such as when you use `?`
/// to coerce to it)
#[derive(Debug)]
pub struct IPanic;

impl<E> From<E> for IPanic
where
    E: core::error::Error + Send + Sync,
{
    #[track_caller]
    fn from(value: E) -> Self {
        panic!("from: {}: {value}", core::panic::Location::caller())
    }
}
