//! Page geometry shared by the preview fit check and the print stylesheet.
//!
//! Both paths read these constants from here so their page boxes cannot drift apart.

use serde::{Deserialize, Serialize};

/// A4 width in millimetres.
pub const PAGE_WIDTH_MM: f64 = 210.0;
/// A4 height in millimetres.
pub const PAGE_HEIGHT_MM: f64 = 297.0;
/// Margin applied on every side.
pub const PAGE_MARGIN_MM: f64 = 15.0;
/// Millimetre to CSS pixel ratio used for preview measurement.
pub const PX_PER_MM: f64 = 3.78;
/// Millimetre to PostScript point ratio used by the print stylesheet.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Physical page box and its content area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        a4()
    }
}

/// The single page format the engine lays out.
pub const fn a4() -> PageGeometry {
    PageGeometry {
        width_mm: PAGE_WIDTH_MM,
        height_mm: PAGE_HEIGHT_MM,
        margin_mm: PAGE_MARGIN_MM,
    }
}

impl PageGeometry {
    pub fn content_width_mm(&self) -> f64 {
        self.width_mm - 2.0 * self.margin_mm
    }

    pub fn content_height_mm(&self) -> f64 {
        self.height_mm - 2.0 * self.margin_mm
    }

    /// Pixel height of one page's content box; the preview's single-page budget.
    pub fn content_height_px(&self) -> f64 {
        self.content_height_mm() * PX_PER_MM
    }

    pub fn content_width_px(&self) -> f64 {
        self.content_width_mm() * PX_PER_MM
    }

    pub fn width_pt(&self) -> f64 {
        self.width_mm * PT_PER_MM
    }

    pub fn height_pt(&self) -> f64 {
        self.height_mm * PT_PER_MM
    }

    pub fn margin_pt(&self) -> f64 {
        self.margin_mm * PT_PER_MM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_content_box() {
        let g = a4();
        assert_eq!(g.content_width_mm(), 180.0);
        assert_eq!(g.content_height_mm(), 267.0);
        assert!((g.content_height_px() - 1009.26).abs() < 1e-9);
        assert!((g.content_width_px() - 680.4).abs() < 1e-9);
    }

    #[test]
    fn test_point_conversion() {
        let g = a4();
        assert!((g.width_pt() - 595.2755905511812).abs() < 1e-6);
        assert!((g.height_pt() - 841.8897637795276).abs() < 1e-6);
        assert!((g.margin_pt() - 42.51968503937008).abs() < 1e-6);
    }
}
