//! Deterministic document names.
//!
//! Names embed both inputs with `.` swapped for `-`, so `100` yards at `0.25`
//! MOA becomes `100_yards_0-25_moa.pdf`. Tools that split on the first dot
//! still see the whole stem.

use crate::OutputFormat;

pub fn document_stem(distance: f64, angular_increment: f64) -> String {
    format!(
        "{}_yards_{}_moa",
        filesystem_number(distance),
        filesystem_number(angular_increment)
    )
}

pub fn derive_name(distance: f64, angular_increment: f64) -> String {
    name_for_format(distance, angular_increment, OutputFormat::Pdf)
}

pub fn name_for_format(distance: f64, angular_increment: f64, format: OutputFormat) -> String {
    format!(
        "{}.{}",
        document_stem(distance, angular_increment),
        format.extension()
    )
}

/// Appends the format's extension to a caller-chosen name unless it already
/// carries one.
pub fn with_extension(name: &str, format: OutputFormat) -> String {
    let suffix = format!(".{}", format.extension());
    if name.to_ascii_lowercase().ends_with(&suffix) {
        name.to_string()
    } else {
        format!("{name}{suffix}")
    }
}

fn filesystem_number(value: f64) -> String {
    value.to_string().replace('.', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_target_name() {
        assert_eq!(derive_name(100.0, 0.25), "100_yards_0-25_moa.pdf");
    }

    #[test]
    fn fractional_distance() {
        assert_eq!(derive_name(62.5, 1.0), "62-5_yards_1_moa.pdf");
    }

    #[test]
    fn deterministic() {
        assert_eq!(derive_name(300.0, 0.1), derive_name(300.0, 0.1));
    }

    #[test]
    fn distinct_inputs_get_distinct_names() {
        let pairs = [
            (100.0, 0.25),
            (100.0, 0.5),
            (25.0, 0.25),
            (1.5, 5.0),
            (15.0, 5.0),
            (1.0, 55.0),
        ];
        let mut names: Vec<String> = pairs.iter().map(|(d, m)| derive_name(*d, *m)).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), pairs.len());
    }

    #[test]
    fn format_changes_only_the_extension() {
        assert_eq!(
            name_for_format(100.0, 0.25, OutputFormat::Svg),
            "100_yards_0-25_moa.svg"
        );
        assert_eq!(with_extension("zero", OutputFormat::Png), "zero.png");
        assert_eq!(with_extension("zero.PDF", OutputFormat::Pdf), "zero.PDF");
    }
}
