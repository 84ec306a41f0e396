use super::{Color, LineCap, VectorCanvas};
use crate::error::Result;
use crate::layout::Point;
use crate::text_metrics::{TextMeasure, helvetica_width};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    PageSize { width: f64, height: f64 },
    Title(String),
    StrokeColor(Color),
    LineWidth(f64),
    LineCap(LineCap),
    Line { from: Point, to: Point },
    FillColor(Color),
    Font { family: String, size: f64 },
    Text { origin: Point, text: String },
    Finish,
}

/// Keeps every call instead of producing a document. Text is measured with
/// Helvetica metrics so recordings are identical on every machine.
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Line { from, to } => Some((*from, *to)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (Point, &str)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { origin, text } => Some((*origin, text.as_str())),
            _ => None,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.commands.iter().find_map(|cmd| match cmd {
            DrawCommand::Title(title) => Some(title.as_str()),
            _ => None,
        })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.commands.last(), Some(DrawCommand::Finish))
    }
}

impl TextMeasure for RecordingCanvas {
    fn measure_width(&self, text: &str, _font_family: &str, font_size: f64) -> f64 {
        helvetica_width(text, font_size)
    }
}

impl VectorCanvas for RecordingCanvas {
    fn set_page_size(&mut self, width: f64, height: f64) {
        self.commands.push(DrawCommand::PageSize { width, height });
    }

    fn set_title(&mut self, title: &str) {
        self.commands.push(DrawCommand::Title(title.to_string()));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::StrokeColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.commands.push(DrawCommand::LineCap(cap));
    }

    fn line(&mut self, from: Point, to: Point) {
        self.commands.push(DrawCommand::Line { from, to });
    }

    fn set_fill_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::FillColor(color));
    }

    fn set_font(&mut self, font_family: &str, font_size: f64) {
        self.commands.push(DrawCommand::Font {
            family: font_family.to_string(),
            size: font_size,
        });
    }

    fn draw_text(&mut self, origin: Point, text: &str) {
        self.commands.push(DrawCommand::Text {
            origin,
            text: text.to_string(),
        });
    }

    fn finish(&mut self) -> Result<()> {
        self.commands.push(DrawCommand::Finish);
        Ok(())
    }
}
