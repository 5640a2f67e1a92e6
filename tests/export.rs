//! SVG export of figures drawn through the public entry points.

use colorline::export::{export_figure, export_svg};
use colorline::{cline, cline_with_colorbar, Arg, AxesId, Figure, RenderConfig, MATCH_MARKER_FACE};
use std::fs;

fn spiral(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let t: Vec<f64> = (0..n).map(|i| i as f64 * 0.2).collect();
    let x = t.iter().map(|t| t * t.cos()).collect();
    let y = t.iter().map(|t| t * t.sin()).collect();
    (x, y, t)
}

#[test]
fn two_d_line_with_colorbar_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spiral.svg");
    let (x, y, t) = spiral(50);

    let mut fig = Figure::new();
    let (drawn, _) = cline_with_colorbar(
        &mut fig,
        &[Arg::from(x), Arg::from(y), Arg::from("viridis"), Arg::from(t), Arg::from(":")],
    )
    .unwrap();
    let config = RenderConfig {
        title: Some("spiral".to_string()),
        ..RenderConfig::default()
    };
    export_svg(&fig, drawn.axes, &config, &path).unwrap();

    let svg = fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("spiral"));
}

#[test]
fn three_d_markers_export_into_nested_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/nested/helix.svg");
    let (x, y, t) = spiral(20);

    let mut fig = Figure::new();
    let drawn = cline(
        &mut fig,
        &[
            Arg::from(x),
            Arg::from(y),
            Arg::from(t),
            Arg::from("jet"),
            Arg::from("^"),
            Arg::from(MATCH_MARKER_FACE),
        ],
    )
    .unwrap();
    export_figure(&fig, drawn.axes, &RenderConfig::default(), &path).unwrap();
    assert!(fs::read_to_string(&path).unwrap().starts_with("<svg"));
}

#[test]
fn non_finite_points_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gaps.svg");

    let mut fig = Figure::new();
    let drawn = cline(
        &mut fig,
        &[
            Arg::from([0.0, 1.0, f64::NAN, 3.0]),
            Arg::from([1.0, 2.0, 3.0, 4.0]),
            Arg::from("hot"),
        ],
    )
    .unwrap();
    export_svg(&fig, drawn.axes, &RenderConfig::default(), &path).unwrap();
    assert!(path.exists());
}

#[test]
fn unknown_axes_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let fig = Figure::new();
    let err = export_svg(&fig, AxesId(3), &RenderConfig::default(), dir.path().join("x.svg"))
        .unwrap_err();
    assert!(err.to_string().contains("#3"));
}
