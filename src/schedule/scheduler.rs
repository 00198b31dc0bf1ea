use std::time::{Duration, Instant};

use crate::design::params::DesignParameters;
use crate::foundation::error::{KitError, KitResult};

/// Why a render pass runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderTrigger {
    /// The debounce timer fired.
    Debounce,
    /// Synchronous export.
    Export,
    /// Surface dimensions changed.
    Resize,
    /// A base or mask load reached `Ready` or `Failed`.
    AssetLoaded,
}

/// Observable scheduler state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing pending, nothing running.
    Idle,
    /// A debounced render will fire at `deadline`.
    PendingDebounced {
        /// Earliest time the pending render may run.
        deadline: Instant,
    },
    /// A render pass is running.
    Rendering {
        /// What started it.
        trigger: RenderTrigger,
    },
}

/// Permission to run one render pass; hand it back through [`RenderScheduler::finish`].
#[derive(Debug)]
#[must_use = "a ticket must be returned with RenderScheduler::finish"]
pub struct RenderTicket {
    /// Parameters to render.
    pub params: DesignParameters,
    /// What started the pass.
    pub trigger: RenderTrigger,
}

/// Debounce state machine.
///
/// At most one debounced request exists; a newer parameter set replaces it and re-arms the
/// timer. Export and resize cancel it and run with the newest parameters at once. Passes never
/// overlap: starting one while another runs fails with [`KitError::Busy`]. Time is passed in
/// explicitly, so callers own the clock.
#[derive(Debug)]
pub struct RenderScheduler {
    debounce: Duration,
    latest: Option<DesignParameters>,
    pending: Option<(DesignParameters, Instant)>,
    rendering: Option<RenderTrigger>,
}

impl RenderScheduler {
    /// Scheduler with the given idle delay.
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            latest: None,
            pending: None,
            rendering: None,
        }
    }

    /// Idle delay.
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        if let Some(trigger) = self.rendering {
            return SchedulerState::Rendering { trigger };
        }
        match &self.pending {
            Some((_, deadline)) => SchedulerState::PendingDebounced {
                deadline: *deadline,
            },
            None => SchedulerState::Idle,
        }
    }

    /// Most recently supplied parameters.
    pub fn latest(&self) -> Option<&DesignParameters> {
        self.latest.as_ref()
    }

    /// When the pending debounced render becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, d)| *d)
    }

    /// Record a parameter change: replace any pending request and re-arm the timer.
    ///
    /// Returns `true` when a not-yet-fired request was cancelled.
    pub fn params_changed(&mut self, params: DesignParameters, now: Instant) -> bool {
        let deadline = now + self.debounce;
        self.latest = Some(params.clone());
        let cancelled = self.pending.replace((params, deadline)).is_some();
        tracing::trace!(cancelled, "debounced render armed");
        cancelled
    }

    /// Start the debounced render if its deadline has passed.
    pub fn begin_due(&mut self, now: Instant) -> KitResult<Option<RenderTicket>> {
        match &self.pending {
            Some((_, deadline)) if *deadline <= now => {}
            _ => return Ok(None),
        }
        self.ensure_not_rendering(RenderTrigger::Debounce)?;
        let Some((params, _)) = self.pending.take() else {
            return Ok(None);
        };
        self.rendering = Some(RenderTrigger::Debounce);
        Ok(Some(RenderTicket {
            params,
            trigger: RenderTrigger::Debounce,
        }))
    }

    /// Start an immediate render with the newest parameters.
    ///
    /// `Export` and `Resize` cancel the pending debounced request; `AssetLoaded` leaves it armed.
    pub fn begin_immediate(&mut self, trigger: RenderTrigger) -> KitResult<RenderTicket> {
        self.ensure_not_rendering(trigger)?;
        let params = self
            .latest
            .clone()
            .ok_or_else(|| KitError::validation("no design parameters have been set"))?;
        match trigger {
            RenderTrigger::Export | RenderTrigger::Resize => {
                if self.pending.take().is_some() {
                    tracing::debug!(?trigger, "pending debounced render cancelled");
                }
            }
            RenderTrigger::Debounce | RenderTrigger::AssetLoaded => {}
        }
        self.rendering = Some(trigger);
        Ok(RenderTicket { params, trigger })
    }

    /// Mark the pass started by `ticket` as complete.
    pub fn finish(&mut self, ticket: RenderTicket) {
        debug_assert_eq!(self.rendering, Some(ticket.trigger));
        self.rendering = None;
    }

    fn ensure_not_rendering(&self, requested: RenderTrigger) -> KitResult<()> {
        match self.rendering {
            Some(running) => Err(KitError::busy(format!(
                "{requested:?} requested while a {running:?} render is running"
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/scheduler.rs"]
mod tests;
