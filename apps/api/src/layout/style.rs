//! Style configuration and its resolution into preview and print styles.
//!
//! One canonical `StyleConfig` feeds the DOM custom properties of the preview, the print
//! stylesheet object and the chunker's capacity. Visual parameters therefore cannot drift
//! between the two renderers even though their pagination decisions can.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::geometry::{a4, PageGeometry};

// ────────────────────────────────────────────────────────────────────────────
// Bounds and calibration
// ────────────────────────────────────────────────────────────────────────────

pub const FONT_SIZE_MIN: f64 = 10.0;
pub const FONT_SIZE_MAX: f64 = 13.0;
pub const LINE_HEIGHT_MIN: f64 = 1.0;
pub const LINE_HEIGHT_MAX: f64 = 2.0;
pub const SECTION_SPACING_MIN: f64 = 4.0;
pub const SECTION_SPACING_MAX: f64 = 32.0;

/// Cost units one print page holds at the reference font size and line height.
pub const BASE_CAPACITY: f64 = 5.0;
/// Font size (pt) the cost heuristics were calibrated at.
pub const REFERENCE_FONT_SIZE: f64 = 11.0;
/// Line height the cost heuristics were calibrated at.
pub const REFERENCE_LINE_HEIGHT: f64 = 1.5;

const PX_TO_PT: f64 = 0.75;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Résumé template. Selects the font stack; layout rules are shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    #[default]
    Classic,
    Modern,
    Minimal,
}

impl TemplateId {
    pub fn font_family(&self) -> &'static str {
        match self {
            TemplateId::Classic => "Georgia, 'Times New Roman', serif",
            TemplateId::Modern => "Inter, 'Helvetica Neue', Arial, sans-serif",
            TemplateId::Minimal => "Lato, 'Segoe UI', sans-serif",
        }
    }

    /// Built-in PDF font used when the exporter cannot embed the family.
    pub fn fallback_font(&self) -> &'static str {
        match self {
            TemplateId::Classic => "Times-Roman",
            TemplateId::Modern | TemplateId::Minimal => "Helvetica",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_css(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Visual parameters that affect both measurement and paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    /// Body font size in points (10–13).
    pub font_size: f64,
    /// Unitless line height multiplier (1.0–2.0).
    pub line_height: f64,
    /// Vertical gap between sections in CSS pixels (4–32).
    pub section_spacing: f64,
    pub accent_color: String,
    pub header_alignment: Alignment,
    pub show_divider: bool,
    pub template: TemplateId,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size: REFERENCE_FONT_SIZE,
            line_height: REFERENCE_LINE_HEIGHT,
            section_spacing: 16.0,
            accent_color: "#2563eb".to_string(),
            header_alignment: Alignment::Left,
            show_divider: true,
            template: TemplateId::Classic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("accentColor must be a hex color like #1a2b3c, got {0:?}")]
    InvalidColor(String),
}

impl StyleConfig {
    /// Reports the first field outside its bounds.
    pub fn validate(&self) -> Result<(), StyleError> {
        check_range("fontSize", self.font_size, FONT_SIZE_MIN, FONT_SIZE_MAX)?;
        check_range(
            "lineHeight",
            self.line_height,
            LINE_HEIGHT_MIN,
            LINE_HEIGHT_MAX,
        )?;
        check_range(
            "sectionSpacing",
            self.section_spacing,
            SECTION_SPACING_MIN,
            SECTION_SPACING_MAX,
        )?;
        if !is_hex_color(&self.accent_color) {
            return Err(StyleError::InvalidColor(self.accent_color.clone()));
        }
        Ok(())
    }

    /// Copy with every numeric field pulled into bounds and a usable accent color.
    ///
    /// Non-finite numbers fall back to the defaults.
    pub fn clamped(&self) -> StyleConfig {
        let defaults = StyleConfig::default();
        StyleConfig {
            font_size: clamp_or(self.font_size, FONT_SIZE_MIN, FONT_SIZE_MAX, defaults.font_size),
            line_height: clamp_or(
                self.line_height,
                LINE_HEIGHT_MIN,
                LINE_HEIGHT_MAX,
                defaults.line_height,
            ),
            section_spacing: clamp_or(
                self.section_spacing,
                SECTION_SPACING_MIN,
                SECTION_SPACING_MAX,
                defaults.section_spacing,
            ),
            accent_color: if is_hex_color(&self.accent_color) {
                self.accent_color.to_lowercase()
            } else {
                defaults.accent_color
            },
            header_alignment: self.header_alignment,
            show_divider: self.show_divider,
            template: self.template,
        }
    }
}

/// Print-side stylesheet object, in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintStyles {
    /// Same stack the preview gets in `--resume-font-family`.
    pub font_family: String,
    pub fallback_font: String,
    pub font_size_pt: f64,
    pub line_height_pt: f64,
    pub section_spacing_pt: f64,
    pub accent_color: String,
    pub header_alignment: Alignment,
    pub show_divider: bool,
    pub page_width_pt: f64,
    pub page_height_pt: f64,
    pub margin_pt: f64,
}

/// Output of `resolve`: one source, two renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub dom_vars: BTreeMap<String, String>,
    pub print_styles: PrintStyles,
}

/// Capacity of one print page in estimator cost units, derived from style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBudget {
    pub capacity: f64,
    pub geometry: PageGeometry,
}

impl Default for LayoutBudget {
    fn default() -> Self {
        Self {
            capacity: BASE_CAPACITY,
            geometry: a4(),
        }
    }
}

impl LayoutBudget {
    /// Larger type or looser leading fits fewer cost units on a page.
    pub fn from_style(style: &StyleConfig) -> Self {
        let style = style.clamped();
        let capacity = BASE_CAPACITY
            * (REFERENCE_FONT_SIZE / style.font_size)
            * (REFERENCE_LINE_HEIGHT / style.line_height);
        Self {
            capacity,
            geometry: a4(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolver
// ────────────────────────────────────────────────────────────────────────────

/// Translates a style config into DOM custom properties and a print stylesheet.
pub fn resolve(style: &StyleConfig) -> ResolvedStyle {
    let style = style.clamped();
    let geometry = a4();

    let mut dom_vars = BTreeMap::new();
    dom_vars.insert(
        "--resume-font-family".to_string(),
        style.template.font_family().to_string(),
    );
    dom_vars.insert(
        "--resume-font-size".to_string(),
        format!("{}pt", style.font_size),
    );
    dom_vars.insert(
        "--resume-line-height".to_string(),
        style.line_height.to_string(),
    );
    dom_vars.insert(
        "--resume-section-spacing".to_string(),
        format!("{}px", style.section_spacing),
    );
    dom_vars.insert("--resume-accent-color".to_string(), style.accent_color.clone());
    dom_vars.insert(
        "--resume-header-align".to_string(),
        style.header_alignment.as_css().to_string(),
    );
    dom_vars.insert(
        "--resume-divider-display".to_string(),
        if style.show_divider { "block" } else { "none" }.to_string(),
    );
    dom_vars.insert(
        "--resume-page-width".to_string(),
        format!("{}mm", geometry.width_mm),
    );
    dom_vars.insert(
        "--resume-page-height".to_string(),
        format!("{}mm", geometry.height_mm),
    );
    dom_vars.insert(
        "--resume-page-margin".to_string(),
        format!("{}mm", geometry.margin_mm),
    );
    dom_vars.insert(
        "--resume-content-width".to_string(),
        format!("{}px", geometry.content_width_px()),
    );

    let print_styles = PrintStyles {
        font_family: style.template.font_family().to_string(),
        fallback_font: style.template.fallback_font().to_string(),
        font_size_pt: style.font_size,
        line_height_pt: style.font_size * style.line_height,
        section_spacing_pt: style.section_spacing * PX_TO_PT,
        accent_color: style.accent_color.clone(),
        header_alignment: style.header_alignment,
        show_divider: style.show_divider,
        page_width_pt: geometry.width_pt(),
        page_height_pt: geometry.height_pt(),
        margin_pt: geometry.margin_pt(),
    };

    ResolvedStyle {
        dom_vars,
        print_styles,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), StyleError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(StyleError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}

fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
