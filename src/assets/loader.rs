use std::collections::VecDeque;
use std::sync::Arc;

use crate::assets::decode::{
    PreparedImage, PreparedSvg, decode_image, looks_like_svg, parse_svg,
};
use crate::assets::masks::builtin_mask_bytes;
use crate::assets::source::AssetSource;
use crate::foundation::error::{KitError, KitResult};

/// Load state of the asset currently shown in a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Nothing has finished loading yet.
    Pending,
    /// The asset (or "no asset", for masks) is usable.
    Ready,
    /// Fetch or decode failed.
    Failed,
}

/// Which slot a load request fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    /// Base product photograph.
    Base,
    /// Silhouette mask.
    Mask,
}

/// Decoded silhouette mask.
#[derive(Clone, Debug)]
pub enum PreparedMask {
    /// Raster mask; alpha-less rasters are read as luminance.
    Raster(PreparedImage),
    /// Vector mask, rasterized at draw size.
    Svg(PreparedSvg),
}

impl PreparedMask {
    /// Intrinsic size in pixels.
    pub fn intrinsic_size(&self) -> (u32, u32) {
        match self {
            Self::Raster(img) => (img.width, img.height),
            Self::Svg(svg) => svg.intrinsic_size(),
        }
    }
}

/// One asset slot: what is shown now, plus the load that may replace it.
#[derive(Clone, Debug)]
pub struct AssetSlot<T> {
    reference: Option<String>,
    status: LoadStatus,
    asset: Option<Arc<T>>,
    error: Option<String>,
    pending: Option<(String, u64)>,
}

impl<T> AssetSlot<T> {
    fn with_status(status: LoadStatus) -> Self {
        Self {
            reference: None,
            status,
            asset: None,
            error: None,
            pending: None,
        }
    }

    /// Status of the shown asset.
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Shown asset, if any.
    pub fn asset(&self) -> Option<&Arc<T>> {
        self.asset.as_ref()
    }

    /// Reference of the shown asset.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Reference still loading, if any.
    pub fn pending_reference(&self) -> Option<&str> {
        self.pending.as_ref().map(|(r, _)| r.as_str())
    }

    /// Failure message of the shown state.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `Ready` with an asset present.
    pub fn ready_asset(&self) -> Option<&Arc<T>> {
        match self.status {
            LoadStatus::Ready => self.asset.as_ref(),
            LoadStatus::Pending | LoadStatus::Failed => None,
        }
    }

    fn wants(&self, reference: &str) -> bool {
        match &self.pending {
            Some((r, _)) => r != reference,
            None => self.reference.as_deref() != Some(reference),
        }
    }

    fn settle(&mut self, reference: String, result: KitResult<T>) -> LoadStatus {
        self.pending = None;
        self.reference = Some(reference);
        match result {
            Ok(asset) => {
                self.status = LoadStatus::Ready;
                self.asset = Some(Arc::new(asset));
                self.error = None;
            }
            Err(e) => {
                self.status = LoadStatus::Failed;
                self.asset = None;
                self.error = Some(e.to_string());
            }
        }
        self.status
    }
}

/// Assets the compositor draws from.
#[derive(Clone, Debug)]
pub struct LoadedAssets {
    /// Base photograph. Starts `Pending`.
    pub base: AssetSlot<PreparedImage>,
    /// Silhouette mask. Starts `Ready` with no mask.
    pub mask: AssetSlot<PreparedMask>,
}

impl Default for LoadedAssets {
    fn default() -> Self {
        Self {
            base: AssetSlot::with_status(LoadStatus::Pending),
            mask: AssetSlot::with_status(LoadStatus::Ready),
        }
    }
}

impl LoadedAssets {
    /// Assets with an already decoded base image and optional mask.
    pub fn ready(base: PreparedImage, mask: Option<PreparedMask>) -> Self {
        let mut out = Self::default();
        out.base.settle("inline:base".to_owned(), Ok(base));
        if let Some(mask) = mask {
            out.mask.settle("inline:mask".to_owned(), Ok(mask));
        }
        out
    }

    /// Assets whose mask failed to load.
    pub fn with_failed_mask(mut self, reference: &str) -> Self {
        self.mask.settle(
            reference.to_owned(),
            Err(KitError::asset_load("mask marked as failed")),
        );
        self
    }
}

/// Completion notice for a load that reached `Ready` or `Failed`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadEvent {
    /// Slot that changed.
    pub slot: SlotKind,
    /// Reference that finished.
    pub reference: String,
    /// Terminal status.
    pub status: LoadStatus,
}

#[derive(Clone, Debug)]
struct LoadRequest {
    slot: SlotKind,
    reference: String,
    generation: u64,
}

/// Deferred asset loading.
///
/// `request_*` only records intent; [`AssetLoader::pump`] performs fetch and decode. A request
/// superseded before it is pumped is dropped, so only the newest reference per slot lands.
pub struct AssetLoader {
    source: Arc<dyn AssetSource>,
    fontdb: Arc<usvg::fontdb::Database>,
    assets: LoadedAssets,
    queue: VecDeque<LoadRequest>,
    next_generation: u64,
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("assets", &self.assets)
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl AssetLoader {
    /// Loader reading from `source`; SVG text resolves against `fontdb`.
    pub fn new(source: Arc<dyn AssetSource>, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            source,
            fontdb,
            assets: LoadedAssets::default(),
            queue: VecDeque::new(),
            next_generation: 0,
        }
    }

    /// Currently shown assets.
    pub fn assets(&self) -> &LoadedAssets {
        &self.assets
    }

    /// `true` while requests are waiting for [`AssetLoader::pump`].
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Ask for `reference` as the base image. Returns `false` when it is already shown or loading.
    pub fn request_base(&mut self, reference: &str) -> bool {
        if !self.assets.base.wants(reference) {
            return false;
        }
        let generation = self.bump();
        self.assets.base.pending = Some((reference.to_owned(), generation));
        self.queue.push_back(LoadRequest {
            slot: SlotKind::Base,
            reference: reference.to_owned(),
            generation,
        });
        tracing::debug!(reference, generation, "base image requested");
        true
    }

    /// Ask for `reference` as the mask; `None` switches to "no mask" immediately.
    ///
    /// Returns `true` when the mask selection changed.
    pub fn request_mask(&mut self, reference: Option<&str>) -> bool {
        let Some(reference) = reference else {
            let slot = &mut self.assets.mask;
            let changed = slot.pending.is_some()
                || slot.reference.is_some()
                || slot.status != LoadStatus::Ready;
            if changed {
                *slot = AssetSlot::with_status(LoadStatus::Ready);
                tracing::debug!("mask cleared");
            }
            return changed;
        };
        if !self.assets.mask.wants(reference) {
            return false;
        }
        let generation = self.bump();
        self.assets.mask.pending = Some((reference.to_owned(), generation));
        self.queue.push_back(LoadRequest {
            slot: SlotKind::Mask,
            reference: reference.to_owned(),
            generation,
        });
        tracing::debug!(reference, generation, "mask requested");
        true
    }

    fn bump(&mut self) -> u64 {
        self.next_generation = self.next_generation.wrapping_add(1);
        self.next_generation
    }

    /// Run every queued load to completion and report the ones that landed.
    pub fn pump(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Some(req) = self.queue.pop_front() {
            let current = match req.slot {
                SlotKind::Base => &self.assets.base.pending,
                SlotKind::Mask => &self.assets.mask.pending,
            };
            if current.as_ref().map(|(_, g)| *g) != Some(req.generation) {
                tracing::debug!(reference = %req.reference, "dropping superseded load");
                continue;
            }

            let status = match req.slot {
                SlotKind::Base => {
                    let result = self.load_base(&req.reference);
                    log_failure(req.slot, &req.reference, &result);
                    self.assets.base.settle(req.reference.clone(), result)
                }
                SlotKind::Mask => {
                    let result = self.load_mask(&req.reference);
                    log_failure(req.slot, &req.reference, &result);
                    self.assets.mask.settle(req.reference.clone(), result)
                }
            };
            events.push(LoadEvent {
                slot: req.slot,
                reference: req.reference,
                status,
            });
        }
        events
    }

    fn load_base(&self, reference: &str) -> KitResult<PreparedImage> {
        if reference.trim().is_empty() {
            return Err(KitError::asset_load("no base image reference provided"));
        }
        let bytes = self.source.fetch(reference).map_err(as_load_failure)?;
        decode_image(&bytes).map_err(as_load_failure)
    }

    fn load_mask(&self, reference: &str) -> KitResult<PreparedMask> {
        let bytes = match builtin_mask_bytes(reference) {
            Some(b) => b.to_vec(),
            None => self.source.fetch(reference).map_err(as_load_failure)?,
        };
        if looks_like_svg(reference, &bytes) {
            parse_svg(&bytes, self.fontdb.clone())
                .map(PreparedMask::Svg)
                .map_err(as_load_failure)
        } else {
            decode_image(&bytes)
                .map(PreparedMask::Raster)
                .map_err(as_load_failure)
        }
    }
}

fn as_load_failure(e: KitError) -> KitError {
    match e {
        KitError::AssetLoad(_) => e,
        other => KitError::asset_load(format!("{other:#}")),
    }
}

fn log_failure<T>(slot: SlotKind, reference: &str, result: &KitResult<T>) {
    if let Err(e) = result {
        tracing::warn!(?slot, reference, error = %e, "asset load failed");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
