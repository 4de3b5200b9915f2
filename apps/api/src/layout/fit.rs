//! Fit check: does the whole rendered document fit on one page.
//!
//! The preview renders the entire document and reports its measured height. This check
//! compares that height with one page's content box; it does not reuse chunk boundaries.
//!
//! Evaluations are triggered by the first render, content and style mutations and viewport
//! resizes. `FitMonitor` stamps each one with a generation so a stale measurement that
//! lands late can never overwrite a newer result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::layout::geometry::PageGeometry;

/// CSS class that switches the preview to natural multi-page flow.
pub const ALLOW_PAGINATION_CLASS: &str = "allow-pagination";

// ────────────────────────────────────────────────────────────────────────────
// Measurement adapter
// ────────────────────────────────────────────────────────────────────────────

/// Something that has been laid out and can report its rendered height.
pub trait RenderedSurface {
    fn rendered_height_px(&self) -> f64;
}

/// A height already measured by the client's renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasuredHeight(pub f64);

impl RenderedSurface for MeasuredHeight {
    fn rendered_height_px(&self) -> f64 {
        self.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Verdict
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewMode {
    /// Content is clipped to one page.
    SinglePage,
    /// Overflow flows naturally across pages.
    Paginated,
}

impl PreviewMode {
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            PreviewMode::SinglePage => None,
            PreviewMode::Paginated => Some(ALLOW_PAGINATION_CLASS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitVerdict {
    pub fits: bool,
    pub mode: PreviewMode,
    pub css_class: Option<String>,
    pub measured_height_px: f64,
    pub budget_px: f64,
    /// The measurement was zero or not a number, most likely taken before layout settled.
    pub degenerate: bool,
    pub generation: Option<u64>,
}

/// Compares the surface's rendered height with one page's content box. Inclusive.
///
/// A degenerate measurement reports "fits"; the next render or resize corrects it.
pub fn check_fits_one_page(surface: &dyn RenderedSurface, geometry: &PageGeometry) -> FitVerdict {
    let height = surface.rendered_height_px();
    let budget = geometry.content_height_px();
    let degenerate = !height.is_finite() || height <= 0.0;

    let fits = degenerate || height <= budget;
    let mode = if fits {
        PreviewMode::SinglePage
    } else {
        PreviewMode::Paginated
    };

    FitVerdict {
        fits,
        mode,
        css_class: mode.css_class().map(str::to_string),
        measured_height_px: if height.is_finite() { height } else { 0.0 },
        budget_px: budget,
        degenerate,
        generation: None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationTrigger {
    InitialRender,
    ContentChanged,
    StyleChanged,
    Resize,
}

/// Handed out when an evaluation starts; presented again with its measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationTicket {
    pub generation: u64,
    pub trigger: EvaluationTrigger,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("evaluation {ticket} superseded by generation {latest}")]
    Stale { ticket: u64, latest: u64 },

    #[error("evaluation {ticket} was never started (latest is {latest})")]
    Unknown { ticket: u64, latest: u64 },
}

#[derive(Debug, Default)]
struct MonitorState {
    latest: Option<FitVerdict>,
}

/// Per-preview fit state. Last started evaluation wins.
#[derive(Debug)]
pub struct FitMonitor {
    geometry: PageGeometry,
    generation: AtomicU64,
    state: Mutex<MonitorState>,
}

impl FitMonitor {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            generation: AtomicU64::new(0),
            state: Mutex::new(MonitorState::default()),
        }
    }

    /// Starts an evaluation and invalidates every earlier one still in flight.
    pub fn begin(&self, trigger: EvaluationTrigger) -> EvaluationTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, ?trigger, "Fit: evaluation started");
        EvaluationTicket {
            generation,
            trigger,
            started_at: Utc::now(),
        }
    }

    /// Completes evaluation `generation` with its measurement if no newer one has started.
    pub fn complete(
        &self,
        generation: u64,
        surface: &dyn RenderedSurface,
    ) -> Result<FitVerdict, EvaluationError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let latest = self.generation.load(Ordering::SeqCst);

        if generation > latest || generation == 0 {
            return Err(EvaluationError::Unknown {
                ticket: generation,
                latest,
            });
        }
        if generation < latest {
            debug!(generation, latest, "Fit: discarding stale evaluation");
            return Err(EvaluationError::Stale {
                ticket: generation,
                latest,
            });
        }

        let mut verdict = check_fits_one_page(surface, &self.geometry);
        verdict.generation = Some(generation);
        state.latest = Some(verdict.clone());
        Ok(verdict)
    }

    /// The result of the most recent completed evaluation, if any.
    pub fn latest(&self) -> Option<FitVerdict> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .latest
            .clone()
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl Default for FitMonitor {
    fn default() -> Self {
        Self::new(PageGeometry::default())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
