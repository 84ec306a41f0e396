//! Drawing surfaces the renderer writes to.
//!
//! Coordinates are points with the origin at the bottom-left of the page.

mod pdf;
#[cfg(feature = "png")]
mod png;
mod record;
mod svg;

pub use pdf::PdfCanvas;
#[cfg(feature = "png")]
pub use png::PngCanvas;
pub use record::{DrawCommand, RecordingCanvas};
pub use svg::SvgCanvas;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{Result, TargetError};
use crate::layout::Point;
use crate::text_metrics::TextMeasure;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb`, `#rgb` or one of a few named colors.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "black" => return Some(Self::BLACK),
            "gray" | "grey" => return Some(Self::GRAY),
            "white" => return Some(Self::WHITE),
            _ => {}
        }
        let hex = value.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            6 => Some(Self::rgb(
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            )),
            3 => {
                let digit = |idx: usize| u8::from_str_radix(&hex[idx..idx + 1], 16).ok();
                Some(Self::rgb(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub(crate) fn unit_rgb(self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

impl LineCap {
    pub fn svg_name(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Pdf,
    Svg,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

/// A page-sized vector drawing session.
///
/// Stroke and fill state persists across calls until changed. `finish` ends
/// the session and persists the document; nothing may be drawn afterwards.
pub trait VectorCanvas: TextMeasure {
    fn set_page_size(&mut self, width: f64, height: f64);
    fn set_title(&mut self, title: &str);
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn line(&mut self, from: Point, to: Point);
    fn set_fill_color(&mut self, color: Color);
    fn set_font(&mut self, font_family: &str, font_size: f64);
    /// Draws `text` with its baseline starting at `origin`.
    fn draw_text(&mut self, origin: Point, text: &str);
    fn finish(&mut self) -> Result<()>;
}

/// Writes `bytes` to a uniquely named temp file next to `path` and renames it
/// into place, so readers see either the old file or a complete new one.
/// Concurrent writers to the same path never share a temp file; the last
/// rename wins.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let persistence = |source| TargetError::Persistence {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(persistence)?;
            parent
        }
        None => Path::new("."),
    };
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "target".to_string());

    // dropping the temp file on any error path removes it
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".partial")
        .tempfile_in(parent)
        .map_err(persistence)?;
    temp.write_all(bytes).map_err(persistence)?;
    temp.as_file().sync_all().map_err(persistence)?;
    temp.persist(path).map_err(|err| persistence(err.error))?;

    crate::log::debug!(path = %path.display(), bytes = bytes.len(), "document written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colors() {
        assert_eq!(Color::parse("#808080"), Some(Color::GRAY));
        assert_eq!(Color::parse("black"), Some(Color::BLACK));
        assert_eq!(Color::parse("#fff"), Some(Color::WHITE));
        assert_eq!(Color::parse("  #FF0000 "), Some(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("808080"), None);
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::GRAY.to_hex(), "#808080");
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn atomic_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.pdf");
        write_atomic(&path, b"%PDF").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"%PDF");
        assert_eq!(entries(&dir.path().join("nested")), ["out.pdf"]);
    }

    #[test]
    fn atomic_write_reports_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        // a directory squatting on the target name makes the rename fail
        let path = dir.path().join("taken.pdf");
        fs::create_dir_all(path.join("inner")).unwrap();
        let err = write_atomic(&path, b"%PDF").unwrap_err();
        assert!(matches!(err, TargetError::Persistence { .. }));
        assert_eq!(entries(dir.path()), ["taken.pdf"]);
    }

    #[test]
    fn concurrent_writers_to_one_path_both_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.pdf");
        let a = vec![b'A'; 1 << 20];
        let b = vec![b'B'; 1 << 20];

        for _ in 0..20 {
            let (first, second) = std::thread::scope(|scope| {
                let first = scope.spawn(|| write_atomic(&path, &a));
                let second = scope.spawn(|| write_atomic(&path, &b));
                (first.join().unwrap(), second.join().unwrap())
            });
            first.unwrap();
            second.unwrap();

            let written = fs::read(&path).unwrap();
            assert!(written == a || written == b, "torn write");
            assert_eq!(entries(dir.path()), ["shared.pdf"]);
        }
    }
}
