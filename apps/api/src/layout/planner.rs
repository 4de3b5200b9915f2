//! Page planner — turns a `ResumeDocument` into the `PageModel` the print exporter consumes.
//!
//! # Rules
//! - Sections are visited in `activeSections` order.
//! - Personal and summary content land on the current page and never break it.
//! - A repeatable section is chunked; its first chunk joins the current page with the
//!   section header, every later chunk opens a new page without the header.
//!
//! The break after a multi-chunk section's first chunk is unconditional, even when a
//! following section would fit in the room left on that page.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::layout::chunker::{chunk, Chunk};
use crate::layout::estimator::CostModel;
use crate::layout::style::LayoutBudget;
use crate::models::resume::{PersonalBlock, ResumeDocument, SectionKind};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// What a page entry paints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageContent {
    Personal(PersonalBlock),
    Summary { text: String },
    Chunk(Chunk),
}

/// One (header?, content) pair on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEntry {
    pub section: SectionKind,
    /// True only on the first page that carries content of `section`.
    pub show_header: bool,
    pub content: PageContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub entries: Vec<PageEntry>,
}

impl Page {
    fn new(number: usize) -> Self {
        Self {
            number,
            entries: Vec::new(),
        }
    }

    /// Estimated cost of the chunks on this page. Singletons are free on the print path.
    pub fn chunk_cost(&self) -> f64 {
        self.entries
            .iter()
            .filter_map(|e| match &e.content {
                PageContent::Chunk(c) => Some(c.cost),
                _ => None,
            })
            .sum()
    }
}

/// Ordered page assignment of a whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageModel {
    pub pages: Vec<Page>,
}

impl PageModel {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Planner
// ────────────────────────────────────────────────────────────────────────────

/// Plans `document` with the capacity its own style implies and the default cost model.
pub fn plan(document: &ResumeDocument) -> PageModel {
    plan_with(
        document,
        &LayoutBudget::from_style(&document.style),
        &CostModel::default(),
    )
}

/// Plans `document` against an explicit budget and cost model.
///
/// Pure: equal inputs give structurally equal models. Always returns at least one page.
pub fn plan_with(document: &ResumeDocument, budget: &LayoutBudget, model: &CostModel) -> PageModel {
    let mut pages = vec![Page::new(1)];

    for &kind in &document.active_sections {
        match kind {
            SectionKind::Personal => {
                current(&mut pages).entries.push(PageEntry {
                    section: kind,
                    show_header: false,
                    content: PageContent::Personal(document.personal.clone()),
                });
            }

            SectionKind::Summary => {
                let text = document.summary.trim();
                if text.is_empty() {
                    continue;
                }
                current(&mut pages).entries.push(PageEntry {
                    section: kind,
                    show_header: true,
                    content: PageContent::Summary {
                        text: text.to_string(),
                    },
                });
            }

            SectionKind::Work | SectionKind::Education | SectionKind::Projects => {
                let blocks = document.blocks(kind);
                let chunks = chunk(&blocks, budget.capacity, model);

                for (i, c) in chunks.into_iter().enumerate() {
                    if c.is_oversized(budget.capacity) {
                        warn!(
                            section = kind.as_str(),
                            cost = c.cost,
                            capacity = budget.capacity,
                            "Layout: single block exceeds page capacity, allowing overflow"
                        );
                    }
                    if i > 0 {
                        let number = pages.len() + 1;
                        pages.push(Page::new(number));
                    }
                    current(&mut pages).entries.push(PageEntry {
                        section: kind,
                        show_header: i == 0,
                        content: PageContent::Chunk(c),
                    });
                }
            }
        }
    }

    debug!(
        pages = pages.len(),
        capacity = budget.capacity,
        sections = document.active_sections.len(),
        "Layout: planned page model"
    );

    PageModel { pages }
}

fn current(pages: &mut [Page]) -> &mut Page {
    let last = pages.len() - 1;
    &mut pages[last]
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
