use moa_target::{
    Config, DrawCommand, OutputFormat, RecordingCanvas, TargetError, TargetSpec, derive_name,
    render_target, render_to_file,
};

fn record(spec: &TargetSpec) -> RecordingCanvas {
    let mut canvas = RecordingCanvas::new();
    render_target(spec, &Config::default(), OutputFormat::Pdf, &mut canvas).expect("render failed");
    canvas
}

#[test]
fn hundred_yard_quarter_moa_letter_page() {
    let spec = TargetSpec {
        distance: 100.0,
        angular_increment: 0.25,
        diagonal_thickness: 0.125,
        show_quadrant_overlay: true,
        page_width: 612.0,
        page_height: 792.0,
        margin: 36.0,
        name: None,
    };
    let mut canvas = RecordingCanvas::new();
    let output = render_target(&spec, &Config::default(), OutputFormat::Pdf, &mut canvas).unwrap();

    assert!((output.cell_size_inches - 0.2618).abs() < 1e-4);
    let g = &output.geometry;
    assert_eq!(g.row_count, g.col_count);
    assert!(g.row_count > 0 && g.row_count % 2 == 0);
    assert!(output.name.contains("100"));
    assert!(output.name.contains("0-25"));

    let far = g.far_corner();
    assert!(g.origin.x >= 36.0 && g.origin.y >= 36.0);
    assert!(far.x <= 576.0 && far.y <= 756.0);
}

#[test]
fn oversized_cell_renders_caption_only() {
    // 1 degree half-angle at 10 yards: a 12.6 in cell on a 7.5 in wide area
    let spec = TargetSpec::new(10.0, 120.0);
    let mut canvas = RecordingCanvas::new();
    let output = render_target(&spec, &Config::default(), OutputFormat::Pdf, &mut canvas).unwrap();

    assert!(output.geometry.is_degenerate());
    assert_eq!(output.geometry.row_count, 0);
    assert_eq!(output.geometry.col_count, 0);
    assert_eq!(canvas.lines().count(), 0);
    let caption = canvas.texts().next().map(|(_, text)| text.to_string());
    assert_eq!(caption.as_deref(), Some("120 MOA grid (12.568 in) at 10 yards"));
    assert!(canvas.is_finished());
}

#[test]
fn zero_distance_produces_no_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never.pdf");
    let err = render_to_file(
        &TargetSpec::new(0.0, 0.25),
        &Config::default(),
        OutputFormat::Pdf,
        &path,
    )
    .unwrap_err();
    assert!(matches!(err, TargetError::InvalidParameter { name: "distance", .. }));
    assert!(!path.exists());
}

#[test]
fn identical_specs_draw_identically() {
    let spec = TargetSpec::new(50.0, 0.5);
    assert_eq!(record(&spec).commands, record(&spec).commands);
}

#[test]
fn grid_lines_are_one_cell_apart() {
    let canvas = record(&TargetSpec::new(100.0, 1.0));
    let cell = moa_target::cell_size(100.0, 1.0).unwrap() * 72.0;
    let horizontal: Vec<f64> = canvas
        .lines()
        .filter(|(from, to)| from.y == to.y && from.x != to.x)
        .map(|(from, _)| from.y)
        .collect();
    // the quadrant line is horizontal too; grid lines follow it
    for pair in horizontal[1..].windows(2) {
        assert!((pair[1] - pair[0] - cell).abs() < 1e-6);
    }
}

#[test]
fn diagonal_width_is_converted_to_points() {
    let spec = TargetSpec {
        diagonal_thickness: 0.25,
        ..TargetSpec::default()
    };
    let canvas = record(&spec);
    assert!(canvas.commands.contains(&DrawCommand::LineWidth(18.0)));
}

#[test]
fn writes_pdf_and_svg_files() {
    let dir = tempfile::tempdir().unwrap();
    let spec = TargetSpec::default();

    let pdf_path = dir.path().join(derive_name(spec.distance, spec.angular_increment));
    let output = render_to_file(&spec, &Config::default(), OutputFormat::Pdf, &pdf_path).unwrap();
    assert_eq!(output.name, "100_yards_0-25_moa.pdf");
    assert!(std::fs::read(&pdf_path).unwrap().starts_with(b"%PDF-"));

    let svg_path = dir.path().join("target.svg");
    render_to_file(&spec, &Config::default(), OutputFormat::Svg, &svg_path).unwrap();
    let svg = std::fs::read_to_string(&svg_path).unwrap();
    assert!(svg.contains("<svg") && svg.ends_with("</svg>"));
}

#[test]
fn unwritable_destination_is_a_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("occupied.pdf");
    std::fs::create_dir_all(path.join("child")).unwrap();
    let err = render_to_file(&TargetSpec::default(), &Config::default(), OutputFormat::Pdf, &path)
        .unwrap_err();
    assert!(matches!(err, TargetError::Persistence { .. }));
    assert!(err.to_string().contains("occupied.pdf"));
}

#[cfg(feature = "png")]
#[test]
fn writes_png_at_configured_scale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("target.png");
    let config = Config::default();
    let output = render_to_file(&TargetSpec::default(), &config, OutputFormat::Png, &path).unwrap();
    assert_eq!(output.name, "100_yards_0-25_moa.png");

    let png = std::fs::read(&path).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    // IHDR is the first chunk: width and height are big-endian at bytes 16..24
    assert_eq!(&png[12..16], b"IHDR");
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    let scale = f64::from(config.render.png_scale);
    assert_eq!(width, (612.0 * scale).ceil() as u32);
    assert_eq!(height, (792.0 * scale).ceil() as u32);
}
