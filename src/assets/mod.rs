//! Asset fetching, decoding and load tracking.
//!
//! Loads are queued by reference and completed by [`loader::AssetLoader::pump`]; the compositor
//! only ever sees settled [`loader::LoadedAssets`].

/// Raster decode and SVG parse/rasterize into premultiplied RGBA8.
pub mod decode;
/// Font discovery, fallback resolution and line layout.
pub mod fonts;
/// Base/mask load slots with stale-result protection.
pub mod loader;
/// Mask catalog and built-in silhouettes.
pub mod masks;
/// Byte sources for asset references.
pub mod source;
