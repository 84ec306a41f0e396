use crate::angular::CellFormula;
use crate::canvas::OutputFormat;
use crate::config::load_config;
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::naming::{name_for_format, with_extension};
use crate::render::{render_svg, render_to_file};
use crate::target::TargetSpec;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "moa-target", version, about = "Printable MOA grid targets")]
pub struct Args {
    /// Shooting distance in yards
    #[arg(short = 'd', long = "distance", default_value_t = 100.0)]
    pub distance: f64,

    /// Grid spacing in minutes of angle
    #[arg(short = 'm', long = "moa", default_value_t = 0.25)]
    pub moa: f64,

    /// Width of the diagonal crosshair lines in inches
    #[arg(short = 't', long = "diagonal-thickness", default_value_t = 0.125)]
    pub diagonal_thickness: f64,

    /// Leave out the quadrant lines and scope adjustment labels
    #[arg(long = "no-quadrants")]
    pub no_quadrants: bool,

    /// Document name (defaults to one derived from distance and MOA)
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Output file, or '-' to print SVG to stdout. Overrides --output-dir.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Directory the derived document name is placed in
    #[arg(long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "pdf")]
    pub output_format: OutputFormat,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Cell size formula; 'linear' reproduces older targets
    #[arg(long = "formula", value_enum)]
    pub formula: Option<CellFormula>,

    /// Write the computed grid layout as JSON
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    init_tracing();
    run_with(Args::parse())
}

/// Renders and writes the target described by already-parsed arguments.
pub fn run_with(args: Args) -> Result<()> {
    let mut config = load_config(args.config.as_deref())
        .with_context(|| format!("loading config {:?}", args.config))?;
    if let Some(formula) = args.formula {
        config.layout.cell_formula = formula;
    }

    let spec = TargetSpec {
        distance: args.distance,
        angular_increment: args.moa,
        diagonal_thickness: args.diagonal_thickness,
        show_quadrant_overlay: !args.no_quadrants,
        name: args.name.clone(),
        ..TargetSpec::default()
    }
    .with_page(&config.page);

    let output = if is_stdout(args.output.as_deref()) {
        if !matches!(args.output_format, OutputFormat::Svg) {
            anyhow::bail!("only SVG output can be written to stdout");
        }
        let (output, svg) = render_svg(&spec, &config)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(svg.as_bytes())?;
        stdout.flush()?;
        output
    } else {
        let path = resolve_output(&args);
        let output = render_to_file(&spec, &config, args.output_format, &path)?;
        eprintln!("wrote {}", path.display());
        output
    };

    if let Some(dump_path) = &args.dump_layout {
        let dump = LayoutDump::from_output(&output, &spec, config.layout.cell_formula);
        write_layout_dump(dump_path, &dump)
            .with_context(|| format!("writing layout dump {}", dump_path.display()))?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn is_stdout(output: Option<&Path>) -> bool {
    output == Some(Path::new("-"))
}

fn resolve_output(args: &Args) -> PathBuf {
    if let Some(path) = &args.output {
        return path.clone();
    }
    let name = match &args.name {
        Some(name) => with_extension(name, args.output_format),
        None => name_for_format(args.distance, args.moa, args.output_format),
    };
    args.output_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn defaults_match_the_classic_target() {
        let args = Args::parse_from(["moa-target"]);
        assert_eq!(args.distance, 100.0);
        assert_eq!(args.moa, 0.25);
        assert_eq!(args.diagonal_thickness, 0.125);
        assert!(!args.no_quadrants);
        assert_eq!(resolve_output(&args), PathBuf::from("./100_yards_0-25_moa.pdf"));
    }

    #[test]
    fn leading_dot_decimals_parse() {
        let args = Args::parse_from(["moa-target", "--moa", ".5", "-t", ".0625"]);
        assert_eq!(args.moa, 0.5);
        assert_eq!(args.diagonal_thickness, 0.0625);
    }

    #[test]
    fn explicit_name_and_directory() {
        let args = Args::parse_from([
            "moa-target",
            "--name",
            "zeroing",
            "--output-dir",
            "static",
            "-e",
            "svg",
        ]);
        assert_eq!(resolve_output(&args), PathBuf::from("static/zeroing.svg"));
    }

    #[test]
    fn writes_document_and_layout_dump() {
        let dir = tempfile::tempdir().unwrap();
        let dump = dir.path().join("layout.json");
        let args = Args::parse_from([
            OsStr::new("moa-target"),
            OsStr::new("--output-dir"),
            dir.path().as_os_str(),
            OsStr::new("--dump-layout"),
            dump.as_os_str(),
        ]);
        run_with(args).unwrap();

        let pdf = std::fs::read(dir.path().join("100_yards_0-25_moa.pdf")).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&dump).unwrap()).unwrap();
        assert_eq!(json["rows"], 28);
        assert_eq!(json["name"], "100_yards_0-25_moa.pdf");
    }

    #[test]
    fn invalid_distance_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let args = Args::parse_from([
            OsStr::new("moa-target"),
            OsStr::new("-d"),
            OsStr::new("0"),
            OsStr::new("--output-dir"),
            dir.path().as_os_str(),
        ]);
        assert!(run_with(args).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn output_path_wins() {
        let args = Args::parse_from(["moa-target", "-o", "out/t.pdf", "--output-dir", "ignored"]);
        assert_eq!(resolve_output(&args), PathBuf::from("out/t.pdf"));
        assert!(is_stdout(Some(Path::new("-"))));
    }
}
