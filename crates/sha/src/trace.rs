//! Logging macros with fixed `sha::*` targets.
//!
//! With the `tracing` feature disabled every macro expands to nothing, so
//! the hashing paths carry no logging cost. Round functions never log.

/// Emit a padding setup event (once per variant).
#[cfg(feature = "tracing")]
macro_rules! trace_padding {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "sha::padding", $($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_padding {
    ($($arg:tt)*) => {};
}

/// Emit a Merkle event. `trace;` selects the per-level verbosity.
#[cfg(feature = "tracing")]
macro_rules! trace_merkle {
    (trace; $($arg:tt)*) => {
        ::tracing::trace!(target: "sha::merkle", $($arg)*)
    };
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "sha::merkle", $($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_merkle {
    ($($arg:tt)*) => {};
}

/// Emit a vector batch dispatch event.
#[cfg(feature = "tracing")]
macro_rules! trace_dispatch {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "sha::dispatch", $($arg)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_dispatch {
    ($($arg:tt)*) => {};
}

pub(crate) use {trace_dispatch, trace_merkle, trace_padding};
