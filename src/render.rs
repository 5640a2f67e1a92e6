//! Drawing a resolved request.
//!
//! Two strategies exist and exactly one runs per call. The segment strategy
//! draws `L - 1` lines, each in the color of its starting point, in ascending
//! order so later segments occlude earlier ones. When the resolved style asks
//! for markers with no connecting line, segments would miss or double up
//! points, so the point strategy draws all `L` points individually instead.

use crate::args::AxesId;
use crate::normalize::{value_range, ColorIndexMap};
use crate::palette::Palette;
use crate::resolve::{Dimension, PlotRequest};
use crate::style::{needs_marker_correction, ResolvedStyle};
use crate::surface::{Appearance, ColorbarWidget, DrawingSurface, View};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

/// How the drawables of a call were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strategy {
    /// One line per consecutive pair of points.
    Segments,
    /// One marker per point.
    Points,
}

/// Handles produced by one call, in drawing order. Owned by the caller.
#[derive(Debug, Clone)]
pub struct DrawableSet<H> {
    pub axes: AxesId,
    pub strategy: Strategy,
    handles: Vec<H>,
}

impl<H> DrawableSet<H> {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handles(&self) -> &[H] {
        &self.handles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, H> {
        self.handles.iter()
    }

    pub fn into_handles(self) -> Vec<H> {
        self.handles
    }
}

impl<H> IntoIterator for DrawableSet<H> {
    type Item = H;
    type IntoIter = std::vec::IntoIter<H>;

    fn into_iter(self) -> Self::IntoIter {
        self.handles.into_iter()
    }
}

/// Pick the drawing strategy for a resolved style.
pub fn choose_strategy(style: &ResolvedStyle) -> Strategy {
    if needs_marker_correction(style) {
        Strategy::Points
    } else {
        Strategy::Segments
    }
}

/// Draw `request` on `surface`, coloring by the request's own values.
///
/// Surface errors come back unchanged. If one happens part-way, whatever this
/// call already drew is deleted first.
pub fn render<S: DrawingSurface>(
    surface: &mut S,
    request: &PlotRequest,
) -> Result<DrawableSet<S::Handle>, S::Error> {
    let indices = request.color_indices();
    let axes = request.axes().unwrap_or_else(|| surface.current_axes());
    let style = request.style().resolve(&surface.default_style(axes));
    let strategy = choose_strategy(&style);
    match strategy {
        Strategy::Points => info!(
            points = request.len(),
            "markers without a connecting line, drawing one marker per point"
        ),
        Strategy::Segments => debug!(
            segments = request.len().saturating_sub(1),
            "drawing segments"
        ),
    }

    let handles = with_hold(surface, axes, |surface| {
        let handles = match strategy {
            Strategy::Segments => draw_segments(surface, axes, request, &indices, &style)?,
            Strategy::Points => draw_points(surface, axes, request, &indices, &style)?,
        };
        if request.dimension() == Dimension::Three {
            if let Err(err) = surface.set_view(axes, View::DEFAULT_3D) {
                discard(surface, axes, &handles);
                return Err(err);
            }
        }
        Ok(handles)
    })?;

    Ok(DrawableSet {
        axes,
        strategy,
        handles,
    })
}

/// Render, then attach a colorbar showing `palette` over the value range.
/// If the colorbar cannot be attached, both it and the line are removed.
pub fn render_with_colorbar<S: ColorbarWidget>(
    surface: &mut S,
    request: &PlotRequest,
) -> Result<(DrawableSet<S::Handle>, S::ColorbarHandle), S::Error> {
    let drawn = render(surface, request)?;
    match attach_colorbar(surface, drawn.axes, request.palette(), request.values()) {
        Ok(colorbar) => Ok((drawn, colorbar)),
        Err(err) => {
            if let Err(reset) = surface.remove_colorbar(drawn.axes) {
                warn!(error = %reset, "failed to reset colorbar");
            }
            discard(surface, drawn.axes, drawn.handles());
            Err(err)
        }
    }
}

/// Hand the palette and value range to the colorbar widget and show it.
pub fn attach_colorbar<S: ColorbarWidget>(
    surface: &mut S,
    axes: AxesId,
    palette: &Palette,
    values: &[f64],
) -> Result<S::ColorbarHandle, S::Error> {
    let (lo, hi) = value_range(values).unwrap_or((0.0, 1.0));
    surface.set_palette(axes, palette)?;
    surface.set_color_range(axes, lo, hi)?;
    surface.show_colorbar(axes)
}

/// Run `f` with hold switched on, restoring the previous hold state on
/// every path. When hold was off the axes are cleared first, since the new
/// line replaces what was there.
fn with_hold<S, T, F>(surface: &mut S, axes: AxesId, f: F) -> Result<T, S::Error>
where
    S: DrawingSurface,
    F: FnOnce(&mut S) -> Result<T, S::Error>,
{
    let was_held = surface.hold(axes);
    surface.set_hold(axes, true);
    let result = if was_held {
        f(surface)
    } else {
        surface.clear(axes).and_then(|()| f(surface))
    };
    surface.set_hold(axes, was_held);
    result
}

fn draw_segments<S: DrawingSurface>(
    surface: &mut S,
    axes: AxesId,
    request: &PlotRequest,
    indices: &ColorIndexMap,
    style: &ResolvedStyle,
) -> Result<Vec<S::Handle>, S::Error> {
    let coords = request.coordinates();
    draw_each(surface, axes, request.len().saturating_sub(1), |surface, i| {
        let color = request.palette().color(indices.get(i));
        let appearance = Appearance::new(color, style, request.match_marker_face());
        surface.draw_line(axes, coords.point(i), coords.point(i + 1), &appearance)
    })
}

fn draw_points<S: DrawingSurface>(
    surface: &mut S,
    axes: AxesId,
    request: &PlotRequest,
    indices: &ColorIndexMap,
    style: &ResolvedStyle,
) -> Result<Vec<S::Handle>, S::Error> {
    let coords = request.coordinates();
    draw_each(surface, axes, request.len(), |surface, i| {
        let color = request.palette().color(indices.get(i));
        let appearance = Appearance::new(color, style, request.match_marker_face());
        surface.draw_point(axes, coords.point(i), &appearance)
    })
}

fn draw_each<S, F>(
    surface: &mut S,
    axes: AxesId,
    count: usize,
    mut draw_one: F,
) -> Result<Vec<S::Handle>, S::Error>
where
    S: DrawingSurface,
    F: FnMut(&mut S, usize) -> Result<S::Handle, S::Error>,
{
    let mut handles = Vec::with_capacity(count);
    for i in 0..count {
        match draw_one(surface, i) {
            Ok(handle) => {
                trace!(i, ?handle, "drew");
                handles.push(handle);
            }
            Err(err) => {
                discard(surface, axes, &handles);
                return Err(err);
            }
        }
    }
    Ok(handles)
}

fn discard<S: DrawingSurface>(surface: &mut S, axes: AxesId, handles: &[S::Handle]) {
    if handles.is_empty() {
        return;
    }
    if let Err(err) = surface.delete_drawables(axes, handles) {
        warn!(error = %err, count = handles.len(), "failed to remove partially drawn line");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{Arg, Matrix};
    use crate::figure::Figure;
    use crate::resolve::resolve_args;

    fn two_colors() -> Arg {
        Arg::Matrix(Matrix::from_rows(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap())
    }

    #[test]
    fn colors_come_from_the_request_values() {
        let args = vec![
            Arg::from([0.0, 1.0, 2.0]),
            Arg::from([4.0, 5.0, 6.0]),
            two_colors(),
            Arg::from([9.0, 1.0, 1.0]),
        ];
        let request = resolve_args(&args).unwrap();
        assert_eq!(request.color_indices().len(), request.len());

        let mut fig = Figure::new();
        let drawn = render(&mut fig, &request).unwrap();
        let colors: Vec<_> = fig
            .axes(drawn.axes)
            .unwrap()
            .items()
            .iter()
            .map(|item| item.appearance.color)
            .collect();
        assert_eq!(colors, vec![request.palette().color(2), request.palette().color(1)]);
    }

    #[test]
    fn marker_only_style_picks_points() {
        let style = ResolvedStyle {
            line_style: crate::style::LineStyle::None,
            marker: crate::style::MarkerKind::Square,
            ..ResolvedStyle::default()
        };
        assert_eq!(choose_strategy(&style), Strategy::Points);
        assert_eq!(choose_strategy(&ResolvedStyle::default()), Strategy::Segments);
    }

    #[test]
    fn colorbar_range_falls_back_when_nothing_is_finite() {
        let mut fig = Figure::new();
        let ax = fig.add_axes();
        let palette = crate::palette::validate_palette(
            &Matrix::from_rows(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap(),
        )
        .unwrap();
        attach_colorbar(&mut fig, ax, &palette, &[f64::NAN, f64::NAN]).unwrap();
        assert_eq!(fig.axes(ax).unwrap().colorbar().unwrap().range, (0.0, 1.0));
    }
}
