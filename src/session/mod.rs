//! Session-oriented preview API.

/// Preview options loaded from JSON and environment.
pub mod config;
/// The live preview session.
pub mod preview_session;
