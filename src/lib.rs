//! Printable MOA reference grid targets.
//!
//! A [`TargetSpec`] describes the distance, grid spacing and page; the
//! renderer turns it into drawing calls on any [`VectorCanvas`]:
//!
//! ```
//! use moa_target::{Config, OutputFormat, RecordingCanvas, TargetSpec, render_target};
//!
//! let mut canvas = RecordingCanvas::new();
//! let spec = TargetSpec::new(100.0, 0.25);
//! let output = render_target(&spec, &Config::default(), OutputFormat::Pdf, &mut canvas).unwrap();
//! assert_eq!(output.name, "100_yards_0-25_moa.pdf");
//! ```

pub mod angular;
pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod layout_dump;
pub mod log;
pub mod naming;
pub mod render;
pub mod target;
pub mod text_metrics;
pub mod theme;

pub use angular::{CellFormula, cell_size, cell_size_with};
pub use canvas::{Color, DrawCommand, LineCap, OutputFormat, PdfCanvas, RecordingCanvas, SvgCanvas, VectorCanvas};
#[cfg(feature = "png")]
pub use canvas::PngCanvas;
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, PageConfig, RenderConfig, load_config};
pub use error::{Result, TargetError};
pub use layout::{GridGeometry, Point, compute_layout};
pub use naming::derive_name;
pub use render::{RenderOutput, render_pdf, render_svg, render_target, render_to_file};
pub use target::TargetSpec;
pub use text_metrics::{TextMeasure, centered_origin};
pub use theme::Theme;
