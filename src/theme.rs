use serde::{Deserialize, Serialize};

use crate::canvas::LineCap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub caption_font_size: f64,
    pub label_font_size: f64,
    pub line_color: String,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub text_color: String,
    pub overlay_color: String,
    pub overlay_width: f64,
    pub label_color: String,
    pub background: String,
}

impl Theme {
    /// Black grid, heavy gray quadrant lines and 72 pt corner labels.
    pub fn classic() -> Self {
        Self {
            font_family: "Helvetica".to_string(),
            caption_font_size: 12.0,
            label_font_size: 72.0,
            line_color: "#000000".to_string(),
            line_width: 1.0,
            line_cap: LineCap::Round,
            text_color: "#000000".to_string(),
            overlay_color: "#808080".to_string(),
            overlay_width: 5.0,
            label_color: "#808080".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    /// Hairline grid and a pale overlay, for printers low on toner.
    pub fn light() -> Self {
        Self {
            line_color: "#404040".to_string(),
            line_width: 0.5,
            overlay_color: "#C8C8C8".to_string(),
            overlay_width: 3.0,
            label_color: "#C8C8C8".to_string(),
            ..Self::classic()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
