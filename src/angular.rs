use serde::{Deserialize, Serialize};

use crate::error::{Result, TargetError};
use crate::target::positive;

pub const MINUTES_PER_DEGREE: f64 = 60.0;
pub const INCHES_PER_YARD: f64 = 36.0;

/// Increments at or past this many MOA put the half-angle at 90 degrees.
pub const MAX_ANGULAR_INCREMENT: f64 = 180.0 * MINUTES_PER_DEGREE;

/// How an angular increment is turned into a linear cell size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum CellFormula {
    /// Chord subtended by the angle: `2 * d * tan(a / 2)`.
    #[default]
    Exact,
    /// Small-angle approximation `2 * d * (a / 2)`, matching older targets.
    Linear,
}

/// Linear size in inches of one `angular_increment` MOA cell at `distance`
/// yards.
pub fn cell_size(distance: f64, angular_increment: f64) -> Result<f64> {
    cell_size_with(distance, angular_increment, CellFormula::Exact)
}

pub fn cell_size_with(distance: f64, angular_increment: f64, formula: CellFormula) -> Result<f64> {
    positive("distance", distance)?;
    positive("angular increment", angular_increment)?;
    if angular_increment >= MAX_ANGULAR_INCREMENT {
        return Err(TargetError::invalid(
            "angular increment",
            angular_increment,
            "half-angle must stay below 90 degrees",
        ));
    }

    let inches = distance * INCHES_PER_YARD;
    let half_angle = (angular_increment / MINUTES_PER_DEGREE / 2.0).to_radians();
    let size = match formula {
        CellFormula::Exact => 2.0 * inches * half_angle.tan(),
        CellFormula::Linear => 2.0 * inches * half_angle,
    };
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_moa_at_hundred_yards_is_about_an_inch() {
        let size = cell_size(100.0, 1.0).unwrap();
        assert!((size - 1.0472).abs() < 1e-3, "got {size}");
    }

    #[test]
    fn quarter_moa_at_hundred_yards() {
        let size = cell_size(100.0, 0.25).unwrap();
        assert!((size - 0.2618).abs() < 1e-4, "got {size}");
    }

    #[test]
    fn linear_form_is_slightly_smaller() {
        let exact = cell_size_with(100.0, 60.0, CellFormula::Exact).unwrap();
        let linear = cell_size_with(100.0, 60.0, CellFormula::Linear).unwrap();
        assert!(linear < exact);
        assert!((exact - linear) / exact < 1e-4);
    }

    #[test]
    fn strictly_increasing_in_both_arguments() {
        let distances = [1.0, 25.0, 100.0, 300.0, 1000.0];
        let increments = [0.1, 0.25, 0.5, 1.0, 5.0, 60.0];
        for formula in [CellFormula::Exact, CellFormula::Linear] {
            for pair in distances.windows(2) {
                for &moa in &increments {
                    let a = cell_size_with(pair[0], moa, formula).unwrap();
                    let b = cell_size_with(pair[1], moa, formula).unwrap();
                    assert!(b > a, "{formula:?}: distance {} -> {}", pair[0], pair[1]);
                }
            }
            for pair in increments.windows(2) {
                for &distance in &distances {
                    let a = cell_size_with(distance, pair[0], formula).unwrap();
                    let b = cell_size_with(distance, pair[1], formula).unwrap();
                    assert!(b > a, "{formula:?}: moa {} -> {}", pair[0], pair[1]);
                }
            }
        }
    }

    #[test]
    fn rejects_non_positive_inputs() {
        assert!(cell_size(0.0, 0.25).unwrap_err().is_invalid_parameter());
        assert!(cell_size(100.0, 0.0).unwrap_err().is_invalid_parameter());
        assert!(cell_size(-5.0, 0.25).is_err());
        assert!(cell_size(100.0, MAX_ANGULAR_INCREMENT).is_err());
    }
}
