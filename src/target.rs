use serde::{Deserialize, Serialize};

use crate::angular::MAX_ANGULAR_INCREMENT;
use crate::config::PageConfig;
use crate::error::{Result, TargetError};

/// Points per inch. All page coordinates are in points.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Everything a single render needs to know about the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSpec {
    /// Shooting distance in yards.
    pub distance: f64,
    /// Grid spacing in minutes of angle.
    pub angular_increment: f64,
    /// Stroke width of the crosshair diagonals, in inches.
    pub diagonal_thickness: f64,
    pub show_quadrant_overlay: bool,
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    /// Explicit document name, bypassing the naming policy.
    #[serde(default)]
    pub name: Option<String>,
}

impl Default for TargetSpec {
    fn default() -> Self {
        let page = PageConfig::default();
        Self {
            distance: 100.0,
            angular_increment: 0.25,
            diagonal_thickness: 0.125,
            show_quadrant_overlay: true,
            page_width: page.width,
            page_height: page.height,
            margin: page.margin,
            name: None,
        }
    }
}

impl TargetSpec {
    pub fn new(distance: f64, angular_increment: f64) -> Self {
        Self {
            distance,
            angular_increment,
            ..Self::default()
        }
    }

    pub fn with_page(mut self, page: &PageConfig) -> Self {
        self.page_width = page.width;
        self.page_height = page.height;
        self.margin = page.margin;
        self
    }

    /// Rejects every value the renderer cannot draw from. Runs before any
    /// canvas call so a bad request never produces a document.
    pub fn validate(&self) -> Result<()> {
        positive("distance", self.distance)?;
        positive("angular increment", self.angular_increment)?;
        if self.angular_increment >= MAX_ANGULAR_INCREMENT {
            return Err(TargetError::invalid(
                "angular increment",
                self.angular_increment,
                "half-angle must stay below 90 degrees",
            ));
        }
        if !self.diagonal_thickness.is_finite() || self.diagonal_thickness < 0.0 {
            return Err(TargetError::invalid(
                "diagonal thickness",
                self.diagonal_thickness,
                "must be a finite, non-negative number",
            ));
        }
        validate_page(self.page_width, self.page_height, self.margin)
    }
}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TargetError::invalid(
            name,
            value,
            "must be a finite, positive number",
        ))
    }
}

pub(crate) fn validate_page(width: f64, height: f64, margin: f64) -> Result<()> {
    positive("page width", width)?;
    positive("page height", height)?;
    if !margin.is_finite() || margin < 0.0 {
        return Err(TargetError::invalid(
            "margin",
            margin,
            "must be a finite, non-negative number",
        ));
    }
    if 2.0 * margin >= width.min(height) {
        return Err(TargetError::invalid(
            "margin",
            margin,
            "must be less than half the smaller page dimension",
        ));
    }
    Ok(())
}
