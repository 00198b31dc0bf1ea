//! kitcanvas composes live garment customization previews.
//!
//! A base photograph is cover-fitted onto a surface, tinted with the chosen color (inside a mask
//! silhouette when one is available), and overlaid with a name and number whose outline is picked
//! for contrast. The public API is session-oriented:
//!
//! - Describe the design with [`DesignParameters`]
//! - Create a [`PreviewSession`] over an [`AssetSource`]
//! - Feed edits with [`PreviewSession::set_params`], drive [`PreviewSession::tick`] and
//!   [`PreviewSession::pump_assets`], and read pixels from the export surface or a
//!   [`SurfaceAdapter`]
//! - Export with [`PreviewSession::export_png`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Asset fetching, decoding and load tracking.
pub mod assets;
/// Hex colors and contrast rules.
pub mod color;
/// User-editable design parameters.
pub mod design;
/// PNG export and surface adapters.
pub mod encode;
mod foundation;
/// Cover-fit placement.
pub mod layout;
/// CPU compositor.
pub mod render;
/// Debounce scheduler.
pub mod schedule;
/// Preview session and configuration.
pub mod session;

pub use crate::assets::fonts::FontBook;
pub use crate::assets::loader::{LoadEvent, LoadStatus, LoadedAssets};
pub use crate::assets::masks::MaskCatalog;
pub use crate::assets::source::{AssetSource, FsAssetSource, MemoryAssetSource};
pub use crate::color::contrast::{contrast_color, contrast_color_hex, font_scale, luminance};
pub use crate::color::hex::Rgb8;
pub use crate::design::params::{CollarMode, DesignParameters, SilhouetteMode, Tint};
pub use crate::encode::png::encode_png;
pub use crate::encode::sink::{RecordingSurface, SurfaceAdapter, TextureSlot};
pub use crate::foundation::core::{
    Affine, BezPath, DeviceSize, Point, Rect, Rgba8Premul, Vec2, Viewport,
};
pub use crate::foundation::error::{KitError, KitResult};
pub use crate::layout::fit::{DrawRect, cover_fit};
pub use crate::render::compositor::{ComposedFrame, Compositor, FrameContent, TintMode};
pub use crate::render::surface::FrameRGBA;
pub use crate::render::text::TextPlan;
pub use crate::schedule::scheduler::{RenderScheduler, RenderTrigger, SchedulerState};
pub use crate::session::config::PreviewConfig;
pub use crate::session::preview_session::{
    AssetUpdate, PreviewSession, PreviewSessionOpts, RenderOutcome, RenderSummary, SurfaceMode,
};
