//! Drop indicator placement
//!
//! The indicator is a fixed-size box centred on the smoothed cursor. Its
//! canvas is drawn `padding` pixels larger so the dashed stroke fits.

use crate::config::IndicatorConfig;
use crate::processing::CursorPosition;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorPlacement {
    /// Left edge of the box in client pixels
    pub left: f64,
    /// Top edge of the box in client pixels
    pub top: f64,
    pub width: u32,
    pub height: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorGeometry {
    width: u32,
    height: u32,
    padding: u32,
}

impl IndicatorGeometry {
    pub fn new(config: &IndicatorConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            padding: config.padding,
        }
    }

    pub fn placement(&self, cursor: CursorPosition) -> IndicatorPlacement {
        IndicatorPlacement {
            left: cursor.x - f64::from(self.width) / 2.0,
            top: cursor.y - f64::from(self.height) / 2.0,
            width: self.width,
            height: self.height,
            canvas_width: self.width + self.padding,
            canvas_height: self.height + self.padding,
        }
    }

    /// CSS transform for a box anchored at the viewport origin
    pub fn css_transform(&self, cursor: CursorPosition) -> String {
        format!(
            "translate(-50%, -50%) translate({}px, {}px)",
            cursor.x, cursor.y
        )
    }
}

impl Default for IndicatorGeometry {
    fn default() -> Self {
        Self::new(&IndicatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_is_centred() {
        let geometry = IndicatorGeometry::default();
        let placement = geometry.placement(CursorPosition::new(400.0, 300.0));

        assert_eq!(placement.left, 325.0);
        assert_eq!(placement.top, 225.0);
        assert_eq!(placement.width, 150);
        assert_eq!(placement.canvas_width, 154);
        assert_eq!(placement.canvas_height, 154);
    }

    #[test]
    fn test_css_transform() {
        let geometry = IndicatorGeometry::default();
        assert_eq!(
            geometry.css_transform(CursorPosition::new(12.5, 40.0)),
            "translate(-50%, -50%) translate(12.5px, 40px)"
        );
    }
}
