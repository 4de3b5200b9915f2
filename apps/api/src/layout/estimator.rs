//! Size estimation. Maps a repeatable block to an abstract cost.
//!
//! There are no glyph metrics at document-build time, so print pagination works from a
//! calibrated heuristic instead of measured height. The constants assume a page holds
//! `BASE_CAPACITY` units at the reference style (see `layout::style`).

use serde::{Deserialize, Serialize};

use crate::models::resume::RepeatableBlock;

/// Per-item cost weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostModel {
    /// Every entry pays this (title, subtitle and date lines).
    pub base: f64,
    /// Added when a non-blank free-text description is present.
    pub description: f64,
    /// Added per bullet point.
    pub per_point: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            base: 0.5,
            description: 0.2,
            per_point: 0.15,
        }
    }
}

impl CostModel {
    /// Estimated cost of one block. Pure; the same block always costs the same.
    pub fn estimate(&self, block: &RepeatableBlock) -> f64 {
        let has_description = block
            .description()
            .is_some_and(|d| !d.trim().is_empty());

        let mut cost = self.base;
        if has_description {
            cost += self.description;
        }
        cost + self.per_point * block.points().len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationItem, ProjectItem, WorkItem};

    fn estimate(block: &RepeatableBlock) -> f64 {
        CostModel::default().estimate(block)
    }

    fn work_with(points: usize, description: Option<&str>) -> RepeatableBlock {
        RepeatableBlock::Work(WorkItem {
            company: "Acme".to_string(),
            description: description.map(str::to_string),
            points: (0..points).map(|i| format!("point {i}")).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_bare_item_costs_base() {
        assert_eq!(estimate(&work_with(0, None)), 0.5);
    }

    #[test]
    fn test_description_adds_cost() {
        let cost = estimate(&work_with(0, Some("Led the platform team")));
        assert!((cost - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_blank_description_is_ignored() {
        assert_eq!(estimate(&work_with(0, Some("   "))), 0.5);
    }

    #[test]
    fn test_points_add_cost() {
        assert!((estimate(&work_with(3, None)) - 0.95).abs() < 1e-9);
        assert!((estimate(&work_with(20, None)) - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_same_weights_for_every_kind() {
        let edu = RepeatableBlock::Education(EducationItem {
            description: Some("Thesis".to_string()),
            points: vec!["a".to_string()],
            ..Default::default()
        });
        let project = RepeatableBlock::Project(ProjectItem {
            description: Some("Tool".to_string()),
            points: vec!["b".to_string()],
            ..Default::default()
        });
        assert_eq!(estimate(&edu), estimate(&project));
        assert!((estimate(&edu) - 0.85).abs() < 1e-9);
    }
}
