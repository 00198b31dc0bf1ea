//! Hex colors and readability rules.

/// Luminance-based outline selection and width-based font scaling.
pub mod contrast;
/// `#RRGGBB` parsing and formatting.
pub mod hex;
