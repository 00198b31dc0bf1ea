//! Export encoding and surface consumers.
//!
//! Every successful render is handed to the registered adapters in generation order.

/// PNG export of the premultiplied surface.
pub mod png;
/// Surface adapter trait and built-in adapters.
pub mod sink;
