#![deny(missing_docs)]
//! Shared logging utilities for the crawler workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! a per-thread worker tag that the macros prepend to every line, and a
//! minimal test initializer for the global logger.

use std::cell::Cell;

thread_local! {
    /// Worker index of the current thread, if it belongs to a crawl pool.
    static WORKER_ID: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Tags the current thread as crawl worker `id`.
/// Called once by each worker thread before it starts draining the frontier.
pub fn set_worker_id(id: usize) {
    WORKER_ID.with(|v| v.set(Some(id)));
}

/// Returns the worker index of the current thread, or `None` outside a pool.
pub fn worker_id() -> Option<usize> {
    WORKER_ID.with(|v| v.get())
}

/// Formats the current thread tag, e.g. `worker#3` or `main`.
pub fn thread_tag() -> String {
    match worker_id() {
        Some(id) => format!("worker#{id}"),
        None => std::thread::current()
            .name()
            .unwrap_or("unnamed")
            .to_string(),
    }
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!("[{}] {}", $crate::thread_tag(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!("[{}] {}", $crate::thread_tag(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!("[{}] {}", $crate::thread_tag(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!("[{}] {}", $crate::thread_tag(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!("[{}] {}", $crate::thread_tag(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
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
    fn worker_id_is_thread_local() {
        set_worker_id(4);
        assert_eq!(worker_id(), Some(4));
        assert_eq!(thread_tag(), "worker#4");

        let other = std::thread::spawn(worker_id).join().unwrap();
        assert_eq!(other, None);
    }
}
