use crate::angular::CellFormula;
use crate::canvas::LineCap;
use crate::target::POINTS_PER_INCH;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: 8.5 * POINTS_PER_INCH,
            height: 11.0 * POINTS_PER_INCH,
            margin: 0.5 * POINTS_PER_INCH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub cell_formula: CellFormula,
    /// Height of the caption's center above the page bottom. Defaults to the
    /// margin when unset.
    pub caption_y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Pixels per point for PNG output.
    pub png_scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { png_scale: 2.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub theme: Theme,
    pub page: PageConfig,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeFile {
    font_family: Option<String>,
    caption_font_size: Option<f64>,
    label_font_size: Option<f64>,
    line_color: Option<String>,
    line_width: Option<f64>,
    line_cap: Option<LineCap>,
    text_color: Option<String>,
    overlay_color: Option<String>,
    overlay_width: Option<f64>,
    label_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageFile {
    width: Option<f64>,
    height: Option<f64>,
    margin: Option<f64>,
    /// Lengths in inches instead of points.
    #[serde(default)]
    inches: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeFile>,
    page: Option<PageFile>,
    cell_formula: Option<CellFormula>,
    caption_y: Option<f64>,
    png_scale: Option<f32>,
}

/// Loads a JSON config file, merging whatever it sets onto the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "classic" | "default" => config.theme = Theme::classic(),
            "light" => config.theme = Theme::light(),
            other => anyhow::bail!("unknown theme {other:?} (expected \"classic\" or \"light\")"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.caption_font_size {
            config.theme.caption_font_size = v;
        }
        if let Some(v) = vars.label_font_size {
            config.theme.label_font_size = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.line_width {
            config.theme.line_width = v;
        }
        if let Some(v) = vars.line_cap {
            config.theme.line_cap = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.overlay_color {
            config.theme.overlay_color = v;
        }
        if let Some(v) = vars.overlay_width {
            config.theme.overlay_width = v;
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(page) = parsed.page {
        let unit = if page.inches { POINTS_PER_INCH } else { 1.0 };
        if let Some(v) = page.width {
            config.page.width = v * unit;
        }
        if let Some(v) = page.height {
            config.page.height = v * unit;
        }
        if let Some(v) = page.margin {
            config.page.margin = v * unit;
        }
    }

    if let Some(v) = parsed.cell_formula {
        config.layout.cell_formula = v;
    }
    if parsed.caption_y.is_some() {
        config.layout.caption_y = parsed.caption_y;
    }
    if let Some(v) = parsed.png_scale {
        config.render.png_scale = v;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_keeps_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn merges_theme_variables_over_preset() {
        let config = parse_config(
            r##"{"theme": "light", "themeVariables": {"labelFontSize": 48, "lineCap": "square"}}"##,
        )
        .unwrap();
        assert_eq!(config.theme.label_font_size, 48.0);
        assert_eq!(config.theme.line_cap, LineCap::Square);
        assert_eq!(config.theme.overlay_color, Theme::light().overlay_color);
    }

    #[test]
    fn page_in_inches() {
        let config =
            parse_config(r#"{"page": {"width": 8.27, "height": 11.69, "margin": 0.25, "inches": true}}"#).unwrap();
        assert!((config.page.width - 595.44).abs() < 1e-9);
        assert_eq!(config.page.margin, 18.0);
    }

    #[test]
    fn legacy_formula() {
        let config = parse_config(r#"{"cellFormula": "linear"}"#).unwrap();
        assert_eq!(config.layout.cell_formula, CellFormula::Linear);
    }

    #[test]
    fn rejects_unknown_theme() {
        assert!(parse_config(r#"{"theme": "neon"}"#).is_err());
    }

    #[test]
    fn background_comes_from_theme() {
        let config = parse_config(r##"{"themeVariables": {"background": "#FFFFF0"}}"##).unwrap();
        assert_eq!(config.theme.background, "#FFFFF0");
    }
}
