#![deny(missing_docs)]
//! Shared logging utilities for the Medicare Max client workspace.
//!
//! This crate provides the `medmax_*` logging macros used by the router,
//! the HTTP client and the runtime, together with a per-thread dispatch
//! counter so log lines can be correlated with the message that caused them.

use std::cell::Cell;

thread_local! {
    /// Sequence number of the message currently being dispatched on this thread.
    static DISPATCH_SEQ: Cell<u64> = const { Cell::new(0) };
}

/// Records the sequence number of the message the runtime is about to dispatch.
pub fn set_dispatch_seq(seq: u64) {
    DISPATCH_SEQ.with(|v| v.set(seq));
}

/// Sequence number of the message currently being dispatched.
/// Returns 0 outside of a dispatch (for example in unit tests).
pub fn dispatch_seq() -> u64 {
    DISPATCH_SEQ.with(|v| v.get())
}

/// Logs a trace-level message prefixed with the dispatch sequence.
#[macro_export]
macro_rules! medmax_trace {
    ($($arg:tt)*) => {{
        log::trace!("[#{}] {}", $crate::dispatch_seq(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message prefixed with the dispatch sequence.
#[macro_export]
macro_rules! medmax_info {
    ($($arg:tt)*) => {{
        log::info!("[#{}] {}", $crate::dispatch_seq(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message prefixed with the dispatch sequence.
#[macro_export]
macro_rules! medmax_debug {
    ($($arg:tt)*) => {{
        log::debug!("[#{}] {}", $crate::dispatch_seq(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message prefixed with the dispatch sequence.
#[macro_export]
macro_rules! medmax_warn {
    ($($arg:tt)*) => {{
        log::warn!("[#{}] {}", $crate::dispatch_seq(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message prefixed with the dispatch sequence.
#[macro_export]
macro_rules! medmax_error {
    ($($arg:tt)*) => {{
        log::error!("[#{}] {}", $crate::dispatch_seq(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test in the same binary may have won the race.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_seq_is_thread_local() {
        set_dispatch_seq(42);
        assert_eq!(dispatch_seq(), 42);
        let other = std::thread::spawn(dispatch_seq).join().unwrap();
        assert_eq!(other, 0);
    }
}
