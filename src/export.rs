//! SVG export of recorded axes.

use crate::args::AxesId;
use crate::config::RenderConfig;
use crate::figure::{Axes, Colorbar, Figure, Primitive};
use crate::palette::Rgb;
use crate::resolve::Point3;
use crate::style::{LineStyle, MarkerKind, ResolvedStyle};
use crate::surface::{Appearance, View};
use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

type Px = (f64, f64);

/// Write the axes `axes` of `figure` to an SVG file.
pub fn export_svg<P: AsRef<Path>>(
    figure: &Figure,
    axes: AxesId,
    config: &RenderConfig,
    path: P,
) -> Result<()> {
    let ax = figure
        .axes(axes)
        .with_context(|| format!("Figure has no axes {axes}"))?;
    let view = ax.view();
    let three_d = view != View::TOP;
    let (x_range, y_range) = projected_bounds(ax, view);

    let root = SVGBackend::new(path.as_ref(), (config.width, config.height)).into_drawing_area();
    let (r, g, b) = config.background_rgb();
    root.fill(&RGBColor(r, g, b))?;

    let colorbar = ax.colorbar().filter(|c| c.visible && c.palette.is_some());
    let bar_width = if colorbar.is_some() { config.colorbar_width } else { 0 };
    let split_at = config.width.saturating_sub(bar_width) as i32;
    let (plot_area, bar_area) = root.split_horizontally(split_at);

    let mut builder = ChartBuilder::on(&plot_area);
    builder.margin(10).x_label_area_size(40).y_label_area_size(60);
    if let Some(title) = &config.title {
        builder.caption(title, ("sans-serif", 30));
    }
    let mut chart = builder.build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;

    if three_d {
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(format!("az {:.1}°, el {:.1}°", view.azimuth, view.elevation))
            .draw()?;
    } else {
        chart.configure_mesh().x_desc("x").y_desc("y").draw()?;
    }

    let to_px = |p: Point3| -> Option<Px> {
        let (x, y) = project(p, view);
        if !(x.is_finite() && y.is_finite()) {
            return None;
        }
        let (px, py) = chart.backend_coord(&(x, y));
        Some((px as f64, py as f64))
    };

    for item in ax.items() {
        match &item.primitive {
            Primitive::Line { from, to } => {
                let (Some(a), Some(b)) = (to_px(*from), to_px(*to)) else {
                    continue;
                };
                draw_line(&root, a, b, &item.appearance)?;
                if item.appearance.style.marker != MarkerKind::None {
                    draw_marker(&root, a, &item.appearance)?;
                    draw_marker(&root, b, &item.appearance)?;
                }
            }
            Primitive::Point { at } => {
                if let Some(p) = to_px(*at) {
                    draw_marker(&root, p, &item.appearance)?;
                }
            }
        }
    }

    if let Some(bar) = colorbar {
        draw_colorbar(&bar_area, bar)?;
    }

    root.present()
        .with_context(|| format!("Failed to write SVG: {}", path.as_ref().display()))?;
    debug!(path = %path.as_ref().display(), items = ax.items().len(), "exported svg");
    Ok(())
}

/// Orthographic projection onto the screen plane for a view angle, in the
/// azimuth/elevation convention where azimuth 0, elevation 90 looks down z.
pub fn project(p: Point3, view: View) -> (f64, f64) {
    let az = view.azimuth.to_radians();
    let el = view.elevation.to_radians();
    let sx = az.cos() * p.x + az.sin() * p.y;
    let sy = -el.sin() * az.sin() * p.x + el.sin() * az.cos() * p.y + el.cos() * p.z;
    (sx, sy)
}

fn projected_bounds(ax: &Axes, view: View) -> ((f64, f64), (f64, f64)) {
    let mut lo = (f64::INFINITY, f64::INFINITY);
    let mut hi = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    let points = ax.items().iter().flat_map(|item| match item.primitive {
        Primitive::Line { from, to } => vec![from, to],
        Primitive::Point { at } => vec![at],
    });
    for p in points {
        let (x, y) = project(p, view);
        if x.is_finite() && y.is_finite() {
            lo = (lo.0.min(x), lo.1.min(y));
            hi = (hi.0.max(x), hi.1.max(y));
        }
    }
    (padded(lo.0, hi.0), padded(lo.1, hi.1))
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let span = hi - lo;
    if span <= f64::EPSILON * lo.abs().max(1.0) {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = span * 0.05;
    (lo - pad, hi + pad)
}

fn rgb(c: Rgb) -> RGBColor {
    let (r, g, b) = c.to_u8();
    RGBColor(r, g, b)
}

fn stroke_px(style: &ResolvedStyle) -> u32 {
    style.line_width.round().max(1.0) as u32
}

/// Dash pattern in multiples of the line width, alternating on and off.
fn dash_pattern(style: LineStyle) -> Option<&'static [f64]> {
    match style {
        LineStyle::Solid | LineStyle::None => None,
        LineStyle::Dashed => Some(&[6.0, 4.0]),
        LineStyle::Dotted => Some(&[1.0, 3.0]),
        LineStyle::DashDot => Some(&[6.0, 3.0, 1.0, 3.0]),
    }
}

/// Visible pieces of the segment `a`-`b` under a dash pattern given in
/// pixels. The pattern restarts at `a`.
fn dash_pieces(a: Px, b: Px, pattern: &[f64]) -> Vec<(Px, Px)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = dx.hypot(dy);
    let cycle: f64 = pattern.iter().sum();
    if len == 0.0 || pattern.is_empty() || cycle <= 0.0 {
        return vec![(a, b)];
    }
    let at = |t: f64| (a.0 + dx * t / len, a.1 + dy * t / len);
    let mut pieces = Vec::new();
    let mut t = 0.0;
    let mut k = 0;
    while t < len {
        let end = (t + pattern[k % pattern.len()]).min(len);
        if k % 2 == 0 && end > t {
            pieces.push((at(t), at(end)));
        }
        t = end;
        k += 1;
    }
    pieces
}

fn px(p: Px) -> (i32, i32) {
    (p.0.round() as i32, p.1.round() as i32)
}

fn draw_line(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    a: Px,
    b: Px,
    appearance: &Appearance,
) -> Result<()> {
    let style = &appearance.style;
    if style.line_style == LineStyle::None {
        return Ok(());
    }
    let width = stroke_px(style);
    let stroke = rgb(appearance.color).stroke_width(width);
    let pieces = match dash_pattern(style.line_style) {
        Some(pattern) => {
            let scaled: Vec<f64> = pattern.iter().map(|p| p * width as f64).collect();
            dash_pieces(a, b, &scaled)
        }
        None => vec![(a, b)],
    };
    for (p, q) in pieces {
        root.draw(&PathElement::new(vec![px(p), px(q)], stroke))?;
    }
    Ok(())
}

fn draw_marker(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    at: Px,
    appearance: &Appearance,
) -> Result<()> {
    let (x, y) = px(at);
    let s = (appearance.style.marker_size / 2.0).round().max(1.0) as i32;
    let edge = rgb(appearance.color).stroke_width(1);
    let face = appearance.marker_face_color().map(|c| rgb(c).filled());

    match appearance.style.marker {
        MarkerKind::None => {}
        MarkerKind::Point => {
            root.draw(&Circle::new((x, y), (s / 3).max(1), rgb(appearance.color).filled()))?;
        }
        MarkerKind::Circle | MarkerKind::Pentagram | MarkerKind::Hexagram => {
            if let Some(face) = face {
                root.draw(&Circle::new((x, y), s, face))?;
            }
            root.draw(&Circle::new((x, y), s, edge))?;
        }
        MarkerKind::Square => {
            let corners = [(x - s, y - s), (x + s, y + s)];
            if let Some(face) = face {
                root.draw(&Rectangle::new(corners, face))?;
            }
            root.draw(&Rectangle::new(corners, edge))?;
        }
        MarkerKind::Diamond
        | MarkerKind::TriangleUp
        | MarkerKind::TriangleDown
        | MarkerKind::TriangleLeft
        | MarkerKind::TriangleRight => {
            let outline = polygon(appearance.style.marker, x, y, s);
            if let Some(face) = face {
                root.draw(&Polygon::new(outline.clone(), face))?;
            }
            let mut closed = outline;
            closed.push(closed[0]);
            root.draw(&PathElement::new(closed, edge))?;
        }
        MarkerKind::Plus | MarkerKind::Cross | MarkerKind::Star => {
            let kind = appearance.style.marker;
            if matches!(kind, MarkerKind::Plus | MarkerKind::Star) {
                root.draw(&PathElement::new(vec![(x - s, y), (x + s, y)], edge))?;
                root.draw(&PathElement::new(vec![(x, y - s), (x, y + s)], edge))?;
            }
            if matches!(kind, MarkerKind::Cross | MarkerKind::Star) {
                root.draw(&PathElement::new(vec![(x - s, y - s), (x + s, y + s)], edge))?;
                root.draw(&PathElement::new(vec![(x - s, y + s), (x + s, y - s)], edge))?;
            }
        }
    }
    Ok(())
}

fn polygon(kind: MarkerKind, x: i32, y: i32, s: i32) -> Vec<(i32, i32)> {
    match kind {
        MarkerKind::TriangleUp => vec![(x, y - s), (x + s, y + s), (x - s, y + s)],
        MarkerKind::TriangleDown => vec![(x, y + s), (x + s, y - s), (x - s, y - s)],
        MarkerKind::TriangleLeft => vec![(x - s, y), (x + s, y - s), (x + s, y + s)],
        MarkerKind::TriangleRight => vec![(x + s, y), (x - s, y - s), (x - s, y + s)],
        _ => vec![(x, y - s), (x + s, y), (x, y + s), (x - s, y)],
    }
}

fn draw_colorbar(area: &DrawingArea<SVGBackend<'_>, Shift>, bar: &Colorbar) -> Result<()> {
    let Some(palette) = &bar.palette else {
        return Ok(());
    };
    let (w, h) = area.dim_in_pixel();
    let (top, bottom) = (40_i32, h as i32 - 50);
    let (left, right) = (10_i32, (w as i32 / 2).max(20));
    let rows = palette.len() as i32;
    let span = (bottom - top).max(rows);

    // row 1 at the bottom, row N at the top
    for (i, color) in palette.colors().iter().enumerate() {
        let i = i as i32;
        let y1 = bottom - span * i / rows;
        let y0 = bottom - span * (i + 1) / rows;
        area.draw(&Rectangle::new([(left, y0), (right, y1)], rgb(*color).filled()))?;
    }
    area.draw(&Rectangle::new([(left, top), (right, bottom)], BLACK.stroke_width(1)))?;

    let font = TextStyle::from(("sans-serif", 14.0).into_font());
    let (lo, hi) = bar.range;
    area.draw(&Text::new(format!("{hi:.3}"), (right + 4, top - 7), font.clone()))?;
    area.draw(&Text::new(format!("{lo:.3}"), (right + 4, bottom - 7), font))?;
    Ok(())
}

/// Export an existing figure's current content, creating parent directories.
pub fn export_figure<P: AsRef<Path>>(
    figure: &Figure,
    axes: AxesId,
    config: &RenderConfig,
    path: P,
) -> Result<()> {
    if let Some(dir) = path.as_ref().parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }
    export_svg(figure, axes, config, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_view_is_identity() {
        let p = Point3 { x: 3.0, y: -2.0, z: 7.0 };
        let (x, y) = project(p, View::TOP);
        assert!((x - 3.0).abs() < 1e-12);
        assert!((y - -2.0).abs() < 1e-9 + 7.0 * 1e-15);
    }

    #[test]
    fn default_view_lifts_z() {
        let up = project(Point3 { x: 0.0, y: 0.0, z: 1.0 }, View::DEFAULT_3D);
        assert!(up.0.abs() < 1e-12);
        assert!((up.1 - 30f64.to_radians().cos()).abs() < 1e-12);
    }

    #[test]
    fn dashes_cover_only_the_on_phases() {
        let pieces = dash_pieces((0.0, 0.0), (10.0, 0.0), &[3.0, 2.0]);
        assert_eq!(
            pieces,
            vec![
                ((0.0, 0.0), (3.0, 0.0)),
                ((5.0, 0.0), (8.0, 0.0)),
            ]
        );
    }

    #[test]
    fn zero_length_segment_is_kept_whole() {
        let pieces = dash_pieces((1.0, 1.0), (1.0, 1.0), &[3.0, 2.0]);
        assert_eq!(pieces.len(), 1);
    }

    #[test]
    fn degenerate_bounds_are_widened() {
        assert_eq!(padded(2.0, 2.0), (1.5, 2.5));
        assert_eq!(padded(f64::INFINITY, f64::NEG_INFINITY), (0.0, 1.0));
        let (lo, hi) = padded(0.0, 10.0);
        assert!((lo + 0.5).abs() < 1e-12 && (hi - 10.5).abs() < 1e-12);
    }
}
