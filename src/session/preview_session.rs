use std::sync::Arc;
use std::time::Instant;

use crate::assets::fonts::FontBook;
use crate::assets::loader::{AssetLoader, LoadEvent, LoadStatus, LoadedAssets};
use crate::assets::masks::MaskCatalog;
use crate::assets::source::AssetSource;
use crate::design::params::DesignParameters;
use crate::encode::png::encode_png;
use crate::encode::sink::{SurfaceAdapter, TextureSlot};
use crate::foundation::core::Viewport;
use crate::foundation::error::{KitError, KitResult};
use crate::layout::fit::DrawRect;
use crate::render::compositor::{Compositor, FrameContent, TintMode};
use crate::render::surface::FrameRGBA;
use crate::schedule::scheduler::{RenderScheduler, RenderTicket, RenderTrigger, SchedulerState};
use crate::session::config::PreviewConfig;

/// Which consumer the session's surface is sized for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SurfaceMode {
    /// Flat preview sized to the viewport.
    #[default]
    Display,
    /// Square `texture_size` surface feeding a 3D mesh; only the device pixel ratio follows
    /// resizes.
    Texture,
}

/// Options for [`PreviewSession::new`].
#[derive(Debug, Default)]
pub struct PreviewSessionOpts {
    /// Scheduling, sizing and placeholder options.
    pub config: PreviewConfig,
    /// Font book; `None` loads one from `config`.
    pub fonts: Option<FontBook>,
    /// Mask catalog.
    pub masks: MaskCatalog,
    /// Surface consumer.
    pub mode: SurfaceMode,
}

/// Summary of a successful render pass.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderSummary {
    /// Monotonic frame generation.
    pub generation: u64,
    /// What started the pass.
    pub trigger: RenderTrigger,
    /// Composed or placeholder.
    pub content: FrameContent,
    /// Draw rect (logical px), when a base image was drawn.
    pub draw_rect: Option<DrawRect>,
    /// Device surface width.
    pub width: u32,
    /// Device surface height.
    pub height: u32,
    /// Tint path taken.
    pub tint: TintMode,
    /// Whether text was drawn.
    pub text_drawn: bool,
}

/// Result of one scheduled render.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutcome {
    /// New pixels were published.
    Rendered(RenderSummary),
    /// Nothing to draw (zero-sized surface); the last frame is kept.
    Skipped {
        /// What started the pass.
        trigger: RenderTrigger,
        /// Why it was skipped.
        reason: String,
    },
    /// The pass failed; the session stays usable and the next trigger retries.
    Failed {
        /// What started the pass.
        trigger: RenderTrigger,
        /// Error message.
        error: String,
    },
}

/// Asset completions handled by [`PreviewSession::pump_assets`].
#[derive(Clone, Debug, PartialEq)]
pub struct AssetUpdate {
    /// Loads that reached `Ready` or `Failed`.
    pub events: Vec<LoadEvent>,
    /// The re-render they triggered, if parameters were known.
    pub outcome: Option<RenderOutcome>,
}

/// Live customization preview: owns the export surface and drives every render.
///
/// Single-threaded and cooperative. The embedding loop calls [`PreviewSession::set_params`] on
/// user edits, [`PreviewSession::pump_assets`] when loads may have progressed and
/// [`PreviewSession::tick`] when [`PreviewSession::next_wakeup`] is reached.
pub struct PreviewSession {
    config: PreviewConfig,
    mode: SurfaceMode,
    viewport: Viewport,
    masks: MaskCatalog,
    loader: AssetLoader,
    scheduler: RenderScheduler,
    compositor: Compositor,
    export_surface: Option<FrameRGBA>,
    display_surface: Option<FrameRGBA>,
    texture: Option<TextureSlot>,
    adapters: Vec<Box<dyn SurfaceAdapter>>,
    generation: u64,
    last_summary: Option<RenderSummary>,
}

impl std::fmt::Debug for PreviewSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewSession")
            .field("mode", &self.mode)
            .field("viewport", &self.viewport)
            .field("state", &self.scheduler.state())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl PreviewSession {
    /// Create a session reading assets from `source`.
    ///
    /// In texture mode only `viewport.device_pixel_ratio` is used.
    pub fn new(
        source: Arc<dyn AssetSource>,
        viewport: Viewport,
        opts: PreviewSessionOpts,
    ) -> KitResult<Self> {
        let PreviewSessionOpts {
            config,
            fonts,
            masks,
            mode,
        } = opts;
        config.validate()?;
        let fonts = match fonts {
            Some(f) => f,
            None => FontBook::load(config.load_system_fonts, config.font_dirs.as_slice()),
        };
        let loader = AssetLoader::new(source, fonts.database());
        let scheduler = RenderScheduler::new(config.debounce());
        let compositor = Compositor::new(fonts, &config);
        let viewport = Self::surface_viewport(&config, mode, viewport)?;
        let texture = (mode == SurfaceMode::Texture).then(TextureSlot::new);
        Ok(Self {
            config,
            mode,
            viewport,
            masks,
            loader,
            scheduler,
            compositor,
            export_surface: None,
            display_surface: None,
            texture,
            adapters: Vec::new(),
            generation: 0,
            last_summary: None,
        })
    }

    fn surface_viewport(
        config: &PreviewConfig,
        mode: SurfaceMode,
        requested: Viewport,
    ) -> KitResult<Viewport> {
        match mode {
            SurfaceMode::Display => Ok(requested),
            SurfaceMode::Texture => Viewport::square(
                f64::from(config.texture_size),
                requested.device_pixel_ratio,
            ),
        }
    }

    /// Register a consumer notified after every successful render.
    pub fn add_adapter(&mut self, adapter: Box<dyn SurfaceAdapter>) {
        self.adapters.push(adapter);
    }

    /// Surface mode.
    pub fn mode(&self) -> SurfaceMode {
        self.mode
    }

    /// Effective logical viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Configuration in use.
    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Scheduler state.
    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Shown assets.
    pub fn assets(&self) -> &LoadedAssets {
        self.loader.assets()
    }

    /// `true` while asset loads are waiting for [`PreviewSession::pump_assets`].
    pub fn has_pending_assets(&self) -> bool {
        self.loader.has_pending()
    }

    /// When [`PreviewSession::tick`] should next be called.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Authoritative pixels of the last successful render.
    pub fn export_surface(&self) -> Option<&FrameRGBA> {
        self.export_surface.as_ref()
    }

    /// On-screen copy of the export surface.
    pub fn display_surface(&self) -> Option<&FrameRGBA> {
        self.display_surface.as_ref()
    }

    /// Texture slot (texture mode only).
    pub fn texture(&self) -> Option<&TextureSlot> {
        self.texture.as_ref()
    }

    /// Mutable texture slot, for consumers that mark uploads.
    pub fn texture_mut(&mut self) -> Option<&mut TextureSlot> {
        self.texture.as_mut()
    }

    /// Summary of the last successful render.
    pub fn last_render(&self) -> Option<&RenderSummary> {
        self.last_summary.as_ref()
    }

    /// Apply a user edit: select assets and arm the debounced render.
    pub fn set_params(&mut self, params: DesignParameters, now: Instant) -> KitResult<()> {
        params.validate()?;
        self.loader.request_base(&params.base_image);
        let mask = self.masks.select(&params).map(str::to_owned);
        self.loader.request_mask(mask.as_deref());
        self.scheduler.params_changed(params, now);
        Ok(())
    }

    /// Fire the debounced render if it is due.
    pub fn tick(&mut self, now: Instant) -> Option<RenderOutcome> {
        match self.scheduler.begin_due(now) {
            Ok(Some(ticket)) => Some(self.run(ticket)),
            Ok(None) => None,
            Err(e) => Some(RenderOutcome::Failed {
                trigger: RenderTrigger::Debounce,
                error: e.to_string(),
            }),
        }
    }

    /// Finish queued asset loads; any completion re-renders with the newest parameters.
    pub fn pump_assets(&mut self) -> AssetUpdate {
        let events = self.loader.pump();
        if events.is_empty() || self.scheduler.latest().is_none() {
            return AssetUpdate {
                events,
                outcome: None,
            };
        }
        let outcome = Some(self.render_now(RenderTrigger::AssetLoaded));
        AssetUpdate { events, outcome }
    }

    /// Change the surface size and re-render immediately.
    pub fn resize(&mut self, viewport: Viewport) -> KitResult<Option<RenderOutcome>> {
        self.viewport = Self::surface_viewport(&self.config, self.mode, viewport)?;
        if self.scheduler.latest().is_none() {
            return Ok(None);
        }
        Ok(Some(self.render_now(RenderTrigger::Resize)))
    }

    /// Render synchronously with the newest parameters and return the export surface pixels.
    ///
    /// Settles queued asset loads first, so the frame never pairs new parameters with a previous
    /// base image or mask. Cancels a pending debounced render. Fails with `AssetLoad` while the
    /// base image is not ready, since the export would otherwise be a placeholder.
    pub fn export_frame(&mut self) -> KitResult<FrameRGBA> {
        let settled = self.loader.pump();
        let status = self.loader.assets().base.status();
        if status != LoadStatus::Ready {
            if !settled.is_empty() && self.scheduler.latest().is_some() {
                // Show the placeholder for the load that just failed.
                self.render_now(RenderTrigger::AssetLoaded);
            }
            return Err(KitError::asset_load(format!(
                "base image is {status:?}; nothing to export"
            )));
        }
        if !settled.is_empty() {
            tracing::debug!(loads = settled.len(), "asset loads settled before export");
        }
        let ticket = self.scheduler.begin_immediate(RenderTrigger::Export)?;
        self.render_ticket(ticket)?;
        self.export_surface
            .clone()
            .ok_or_else(|| KitError::surface_unavailable("export surface missing after render"))
    }

    /// [`PreviewSession::export_frame`] encoded as PNG.
    pub fn export_png(&mut self) -> KitResult<Vec<u8>> {
        let frame = self.export_frame()?;
        encode_png(&frame)
    }

    fn render_now(&mut self, trigger: RenderTrigger) -> RenderOutcome {
        match self.scheduler.begin_immediate(trigger) {
            Ok(ticket) => self.run(ticket),
            Err(e) => RenderOutcome::Failed {
                trigger,
                error: e.to_string(),
            },
        }
    }

    fn run(&mut self, ticket: RenderTicket) -> RenderOutcome {
        let trigger = ticket.trigger;
        match self.render_ticket(ticket) {
            Ok(summary) => RenderOutcome::Rendered(summary),
            Err(KitError::InvalidDimensions(reason)) => {
                tracing::debug!(?trigger, %reason, "render skipped; keeping last frame");
                RenderOutcome::Skipped { trigger, reason }
            }
            Err(e) => {
                tracing::warn!(?trigger, error = %e, "render failed");
                RenderOutcome::Failed {
                    trigger,
                    error: e.to_string(),
                }
            }
        }
    }

    fn render_ticket(&mut self, ticket: RenderTicket) -> KitResult<RenderSummary> {
        let trigger = ticket.trigger;
        let result = self.compositor.compose(
            self.loader.assets(),
            &ticket.params,
            self.viewport,
            self.config.max_surface_dim,
        );
        self.scheduler.finish(ticket);
        let composed = result?;

        self.generation += 1;
        let generation = self.generation;
        let summary = RenderSummary {
            generation,
            trigger,
            content: composed.content,
            draw_rect: composed.draw_rect,
            width: composed.frame.width,
            height: composed.frame.height,
            tint: composed.tint,
            text_drawn: composed.text_drawn,
        };

        let export = self.export_surface.insert(composed.frame);
        match &mut self.display_surface {
            Some(display) => display.clone_from(export),
            None => self.display_surface = Some(export.clone()),
        }
        if let Some(texture) = &mut self.texture {
            texture.present(generation, export)?;
        }
        for adapter in &mut self.adapters {
            if let Err(e) = adapter.present(generation, export) {
                tracing::warn!(generation, error = %e, "surface adapter rejected frame");
            }
        }

        tracing::debug!(generation, ?trigger, content = ?summary.content, "render published");
        self.last_summary = Some(summary.clone());
        Ok(summary)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/preview_session.rs"]
mod tests;
