//! Placement of the base photo on the surface.

/// Aspect-preserving cover fit.
pub mod fit;
