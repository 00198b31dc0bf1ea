//! Shared geometry, pixel and error types.

/// Viewport, device sizing and premultiplied pixels.
pub mod core;
/// Error type used across the crate.
pub mod error;
pub(crate) mod math;
