//! User-editable garment design.

/// Design parameters and their lenient interpretation.
pub mod params;
