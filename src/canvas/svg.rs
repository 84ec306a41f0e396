use std::fmt::Write as _;
use std::path::PathBuf;

use super::{Color, LineCap, VectorCanvas, write_atomic};
use crate::error::Result;
use crate::layout::Point;
use crate::text_metrics::{SystemFontMeasure, TextMeasure};

/// Builds an SVG document. Page points map one-to-one onto SVG user units
/// with the y axis flipped.
#[derive(Debug)]
pub struct SvgCanvas {
    path: Option<PathBuf>,
    background: Color,
    width: f64,
    height: f64,
    title: Option<String>,
    stroke: Color,
    line_width: f64,
    line_cap: LineCap,
    fill: Color,
    font_family: String,
    font_size: f64,
    body: String,
    output: Option<String>,
}

impl SvgCanvas {
    /// A canvas that keeps the finished document in memory.
    pub fn new(background: Color) -> Self {
        Self {
            path: None,
            background,
            width: 0.0,
            height: 0.0,
            title: None,
            stroke: Color::BLACK,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            fill: Color::BLACK,
            font_family: "Helvetica".to_string(),
            font_size: 12.0,
            body: String::new(),
            output: None,
        }
    }

    /// A canvas that also writes the finished document to `path`.
    pub fn to_file(path: impl Into<PathBuf>, background: Color) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new(background)
        }
    }

    /// The finished document, once `finish` has run.
    pub fn svg(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn into_svg(self) -> Option<String> {
        self.output
    }

    pub(crate) fn page_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn flip(&self, y: f64) -> f64 {
        self.height - y
    }

    fn build(&self) -> String {
        let (width, height) = (self.width, self.height);
        let mut svg = String::with_capacity(self.body.len() + 512);
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}pt\" height=\"{height}pt\" viewBox=\"0 0 {width} {height}\">",
        ));
        if let Some(title) = &self.title {
            svg.push_str(&format!("<title>{}</title>", escape_xml(title)));
        }
        svg.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            self.background.to_hex()
        ));
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }
}

impl TextMeasure for SvgCanvas {
    fn measure_width(&self, text: &str, font_family: &str, font_size: f64) -> f64 {
        SystemFontMeasure.measure_width(text, font_family, font_size)
    }
}

impl VectorCanvas for SvgCanvas {
    fn set_page_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    fn line(&mut self, from: Point, to: Point) {
        let _ = write!(
            self.body,
            "<line x1=\"{:.3}\" y1=\"{:.3}\" x2=\"{:.3}\" y2=\"{:.3}\" stroke=\"{}\" stroke-width=\"{:.3}\" stroke-linecap=\"{}\"/>",
            from.x,
            self.flip(from.y),
            to.x,
            self.flip(to.y),
            self.stroke.to_hex(),
            self.line_width,
            self.line_cap.svg_name()
        );
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_font(&mut self, font_family: &str, font_size: f64) {
        self.font_family = font_family.to_string();
        self.font_size = font_size;
    }

    fn draw_text(&mut self, origin: Point, text: &str) {
        let _ = write!(
            self.body,
            "<text x=\"{:.3}\" y=\"{:.3}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            origin.x,
            self.flip(origin.y),
            escape_xml(&self.font_family),
            self.font_size,
            self.fill.to_hex(),
            escape_xml(text)
        );
    }

    fn finish(&mut self) -> Result<()> {
        let svg = self.build();
        if let Some(path) = &self.path {
            write_atomic(path, svg.as_bytes())?;
        }
        self.output = Some(svg);
        Ok(())
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
