//! Status macros on top of `tracing`.
//!
//! The terminal formatter in the CLI keys its glyphs off the event level, except for
//! [`SUCCESS_TARGET`] events (rendered as successes) and [`PRINT_TARGET`] events
//! (rendered verbatim, without any glyph).

/// Target of events emitted by [`success!`](crate::success).
pub const SUCCESS_TARGET: &str = "ibpdc::success";

/// Target of raw console lines. The message lives in the `raw_msg` field.
pub const PRINT_TARGET: &str = "ibpdc::print";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "ibpdc::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}
