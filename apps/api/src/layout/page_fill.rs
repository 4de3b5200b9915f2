//! Page Fill Analysis — how well each planned page is used.
//!
//! The planner breaks unconditionally after a multi-chunk section's first chunk, which can
//! leave a mostly empty page behind. This module makes that whitespace visible per page.
//!
//! # Page fill rules
//! - Used cost > capacity               → Overflow (only a lone oversized block can do this)
//! - Whitespace > 50% on a non-final page → Underfilled
//! - Otherwise                          → Acceptable

use serde::{Deserialize, Serialize};

use crate::layout::planner::PageModel;

/// Whitespace fraction above which a non-final page counts as underfilled.
const UNDERFILL_THRESHOLD: f64 = 0.5;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFillVerdict {
    Acceptable,
    /// More than half the page left blank before a forced break.
    Underfilled,
    /// An oversized block pushes the page past capacity.
    Overflow,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFillAnalysis {
    pub page_number: usize,
    pub used: f64,
    pub capacity: f64,
    pub fill_ratio: f64,
    pub whitespace_fraction: f64,
    pub overflow_fraction: f64,
    pub verdict: PageFillVerdict,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Analyzes the fill of every page in `model` against `capacity`.
pub fn analyze_page_fill(model: &PageModel, capacity: f64) -> Vec<PageFillAnalysis> {
    let last = model.page_count();

    model
        .pages
        .iter()
        .map(|page| {
            let used = page.chunk_cost();
            let fill_ratio = if capacity > 0.0 { used / capacity } else { 0.0 };
            let whitespace_fraction = (1.0 - fill_ratio).max(0.0);
            let overflow_fraction = (fill_ratio - 1.0).max(0.0);

            let verdict = if overflow_fraction > 1e-9 {
                PageFillVerdict::Overflow
            } else if page.number != last && whitespace_fraction > UNDERFILL_THRESHOLD {
                PageFillVerdict::Underfilled
            } else {
                PageFillVerdict::Acceptable
            };

            PageFillAnalysis {
                page_number: page.number,
                used,
                capacity,
                fill_ratio,
                whitespace_fraction,
                overflow_fraction,
                verdict,
            }
        })
        .collect()
}

/// Total whitespace, in cost units, left on pages that were closed by a forced break.
pub fn wasted_capacity(analysis: &[PageFillAnalysis]) -> f64 {
    analysis
        .iter()
        .take(analysis.len().saturating_sub(1))
        .map(|a| (a.capacity - a.used).max(0.0))
        .sum()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
