//! Render scheduling.

/// Debounce and trigger state machine.
pub mod scheduler;
