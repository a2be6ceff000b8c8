/// Conditional logging module for development builds
///
/// The `debug_log!` macro provides informational logging that is compiled out
/// in production (release) builds by default. Data-quality warnings should
/// continue using `log::warn!` directly so they always reach the installed logger.
///
/// Logging is enabled when either:
/// - Building in debug mode (`cfg(debug_assertions)`)
/// - The `console_logging` feature is explicitly enabled
///
/// # Examples
///
/// ```rust
/// use orts_route_graph::debug_log;
///
/// let found = 12;
/// debug_log!("Built {} signal objects", found);
/// ```
/// Conditionally log at debug level in development builds
///
/// This macro expands to `log::debug!()` in debug builds or when the
/// `console_logging` feature is enabled. In production release builds,
/// it compiles to nothing (zero overhead).
#[macro_export]
macro_rules! debug_log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            ::log::debug!($($arg),+);
        }
    };
}

pub use debug_log;

/// Install `env_logger` for unit tests; repeated calls are ignored.
#[cfg(test)]
pub(crate) fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
