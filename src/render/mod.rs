//! CPU compositing of the export surface.

/// Layer compositor: base, tint, text and placeholder.
pub mod compositor;
pub(crate) mod kernels;
/// Frame buffers and `vello_cpu` glue.
pub mod surface;
/// Name/number text placement and drawing.
pub mod text;
