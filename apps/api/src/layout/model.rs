//! Shared layout model with pluggable height back ends.
//!
//! The print path estimates heights from costs while the preview measures real pixels.
//! Both are expressed here as a `HeightBackend` over the same flattened sequence of
//! layout units, so their page counts can be compared for the same document.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::layout::estimator::CostModel;
use crate::layout::geometry::PageGeometry;
use crate::layout::planner::plan_with;
use crate::layout::style::LayoutBudget;
use crate::models::resume::{RepeatableBlock, ResumeDocument, SectionKind};

// ────────────────────────────────────────────────────────────────────────────
// Units
// ────────────────────────────────────────────────────────────────────────────

/// Stable key of a layout unit, used by measured back ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum UnitKey {
    Personal,
    Summary,
    SectionHeader { section: SectionKind },
    /// `index` is the block's position in display order.
    Block { section: SectionKind, index: usize },
}

/// One atomic piece of content in flow order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutUnit {
    pub key: UnitKey,
    /// Present for repeatable blocks only.
    pub block: Option<RepeatableBlock>,
}

impl LayoutUnit {
    fn new(key: UnitKey, block: Option<RepeatableBlock>) -> Self {
        Self { key, block }
    }
}

/// Supplies unit heights and the page height in one consistent unit.
pub trait HeightBackend {
    fn unit_height(&self, unit: &LayoutUnit) -> f64;
    fn page_height(&self) -> f64;
}

// ────────────────────────────────────────────────────────────────────────────
// Back ends
// ────────────────────────────────────────────────────────────────────────────

/// Heights from the cost estimator, in cost units. Page height is the budget capacity.
///
/// Singletons and headers are free, matching the print planner.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedHeights {
    pub model: CostModel,
    pub capacity: f64,
}

impl EstimatedHeights {
    pub fn new(budget: &LayoutBudget, model: CostModel) -> Self {
        Self {
            model,
            capacity: budget.capacity,
        }
    }
}

impl HeightBackend for EstimatedHeights {
    fn unit_height(&self, unit: &LayoutUnit) -> f64 {
        unit.block
            .as_ref()
            .map(|b| self.model.estimate(b))
            .unwrap_or(0.0)
    }

    fn page_height(&self) -> f64 {
        self.capacity
    }
}

/// Pixel heights reported by the preview renderer, keyed by unit.
///
/// Units the client did not report count as zero height.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasuredHeights {
    pub units: Vec<MeasuredUnit>,
    #[serde(skip)]
    page_px: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasuredUnit {
    pub key: UnitKey,
    pub height_px: f64,
}

impl MeasuredHeights {
    pub fn new(units: Vec<MeasuredUnit>) -> Self {
        Self {
            units,
            page_px: None,
        }
    }

    /// Uses `geometry`'s content box as the page height.
    pub fn with_geometry(mut self, geometry: &PageGeometry) -> Self {
        self.page_px = Some(geometry.content_height_px());
        self
    }

    fn reported_keys(&self) -> HashSet<UnitKey> {
        self.units.iter().map(|u| u.key).collect()
    }
}

impl HeightBackend for MeasuredHeights {
    fn unit_height(&self, unit: &LayoutUnit) -> f64 {
        self.units
            .iter()
            .find(|u| u.key == unit.key)
            .map(|u| u.height_px)
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(0.0)
    }

    fn page_height(&self) -> f64 {
        self.page_px
            .unwrap_or_else(|| PageGeometry::default().content_height_px())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout model
// ────────────────────────────────────────────────────────────────────────────

/// The active content of a document flattened into flow order.
#[derive(Debug, Clone)]
pub struct LayoutModel {
    pub units: Vec<LayoutUnit>,
}

impl LayoutModel {
    pub fn from_document(document: &ResumeDocument) -> Self {
        let mut units = Vec::new();

        for &kind in &document.active_sections {
            match kind {
                SectionKind::Personal => units.push(LayoutUnit::new(UnitKey::Personal, None)),
                SectionKind::Summary => {
                    if !document.summary.trim().is_empty() {
                        units.push(LayoutUnit::new(
                            UnitKey::SectionHeader { section: kind },
                            None,
                        ));
                        units.push(LayoutUnit::new(UnitKey::Summary, None));
                    }
                }
                SectionKind::Work | SectionKind::Education | SectionKind::Projects => {
                    let blocks = document.blocks(kind);
                    if blocks.is_empty() {
                        continue;
                    }
                    units.push(LayoutUnit::new(
                        UnitKey::SectionHeader { section: kind },
                        None,
                    ));
                    for (index, block) in blocks.into_iter().enumerate() {
                        units.push(LayoutUnit::new(
                            UnitKey::Block {
                                section: kind,
                                index,
                            },
                            Some(block),
                        ));
                    }
                }
            }
        }

        Self { units }
    }

    pub fn total_height(&self, backend: &dyn HeightBackend) -> f64 {
        self.units.iter().map(|u| backend.unit_height(u)).sum()
    }

    /// Whole-document check: does everything fit in one page height. Inclusive.
    pub fn fits_one_page(&self, backend: &dyn HeightBackend) -> bool {
        self.total_height(backend) <= backend.page_height()
    }

    /// Pages needed when units flow naturally, never splitting one. At least one page.
    pub fn page_count(&self, backend: &dyn HeightBackend) -> usize {
        let page = backend.page_height();
        if !page.is_finite() || page <= 0.0 {
            return self.units.len().max(1);
        }

        let mut pages = 1;
        let mut used = 0.0;
        for unit in &self.units {
            let h = backend.unit_height(unit);
            if used > 0.0 && used + h > page + 1e-9 {
                pages += 1;
                used = 0.0;
            }
            used += h;
        }
        pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Consistency
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    /// Pages in the print planner's model.
    pub planned_pages: usize,
    /// Pages when estimated heights flow naturally.
    pub estimated_pages: usize,
    /// Pages when the preview's measured heights flow naturally.
    pub measured_pages: usize,
    pub estimated_fits_one_page: bool,
    pub measured_fits_one_page: bool,
    pub tolerance: usize,
    pub consistent: bool,
}

/// Compares print-side and preview-side page counts for the same document.
///
/// Consistent when the planner and the measured flow differ by at most `tolerance`
/// pages. The forced-break rule can make the planner exceed natural flow.
pub fn check_consistency(
    document: &ResumeDocument,
    budget: &LayoutBudget,
    measured: &MeasuredHeights,
    tolerance: usize,
) -> ConsistencyReport {
    let cost_model = CostModel::default();
    let planned_pages = plan_with(document, budget, &cost_model).page_count();

    let layout = LayoutModel::from_document(document);
    let estimated = EstimatedHeights::new(budget, cost_model);
    let measured = measured.clone().with_geometry(&budget.geometry);

    let reported = measured.reported_keys();
    let missing = layout
        .units
        .iter()
        .filter(|u| !reported.contains(&u.key))
        .count();
    if missing > 0 {
        debug!(missing, "Consistency: units without a measurement count as zero height");
    }

    let estimated_pages = layout.page_count(&estimated);
    let measured_pages = layout.page_count(&measured);
    let consistent = planned_pages.abs_diff(measured_pages) <= tolerance;

    if !consistent {
        warn!(
            planned_pages,
            measured_pages, tolerance, "Consistency: print and preview disagree on page count"
        );
    }

    ConsistencyReport {
        planned_pages,
        estimated_pages,
        measured_pages,
        estimated_fits_one_page: layout.fits_one_page(&estimated),
        measured_fits_one_page: layout.fits_one_page(&measured),
        tolerance,
        consistent,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
