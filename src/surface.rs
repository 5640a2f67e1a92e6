//! Capabilities the core draws through.
//!
//! The core never looks up a surface from global state: the caller hands one
//! in, and every drawable is created with its final color and style in a
//! single call.

use crate::args::AxesId;
use crate::palette::{Palette, Rgb};
use crate::resolve::Point3;
use crate::style::{MarkerFace, ResolvedStyle};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete, immutable look of one drawable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub color: Rgb,
    pub style: ResolvedStyle,
}

impl Appearance {
    /// `style` painted in `color`, with the marker face matched to it on request.
    pub fn new(color: Rgb, style: &ResolvedStyle, match_marker_face: bool) -> Self {
        let mut style = style.clone();
        if match_marker_face {
            style.marker_face = MarkerFace::Color(color);
        }
        Self { color, style }
    }

    /// Marker fill, if the marker is filled with an explicit color.
    pub fn marker_face_color(&self) -> Option<Rgb> {
        match self.style.marker_face {
            MarkerFace::Color(c) => Some(c),
            MarkerFace::None | MarkerFace::Auto => None,
        }
    }
}

/// Camera angles for 3-D axes, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub azimuth: f64,
    pub elevation: f64,
}

impl View {
    /// Standard 3-D view.
    pub const DEFAULT_3D: View = View {
        azimuth: -37.5,
        elevation: 30.0,
    };

    /// Looking straight down the z axis.
    pub const TOP: View = View {
        azimuth: 0.0,
        elevation: 90.0,
    };
}

impl Default for View {
    fn default() -> Self {
        Self::TOP
    }
}

/// Something lines and points can be drawn on.
pub trait DrawingSurface {
    type Handle: Clone + fmt::Debug;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Axes used when the call names none.
    fn current_axes(&mut self) -> AxesId;

    /// Style a drawable gets for anything the caller left unset.
    fn default_style(&self, axes: AxesId) -> ResolvedStyle;

    fn draw_line(
        &mut self,
        axes: AxesId,
        from: Point3,
        to: Point3,
        appearance: &Appearance,
    ) -> Result<Self::Handle, Self::Error>;

    fn draw_point(
        &mut self,
        axes: AxesId,
        at: Point3,
        appearance: &Appearance,
    ) -> Result<Self::Handle, Self::Error>;

    /// Whether new drawables are added to the axes (`true`) or replace them.
    fn hold(&self, axes: AxesId) -> bool;

    fn set_hold(&mut self, axes: AxesId, hold: bool);

    /// Remove everything drawn on `axes`.
    fn clear(&mut self, axes: AxesId) -> Result<(), Self::Error>;

    fn delete_drawables(
        &mut self,
        axes: AxesId,
        handles: &[Self::Handle],
    ) -> Result<(), Self::Error>;

    fn set_view(&mut self, axes: AxesId, view: View) -> Result<(), Self::Error>;
}

/// Colorbar attached to a set of axes.
pub trait ColorbarWidget: DrawingSurface {
    type ColorbarHandle: Clone + fmt::Debug;

    fn set_palette(&mut self, axes: AxesId, palette: &Palette) -> Result<(), Self::Error>;

    fn set_color_range(&mut self, axes: AxesId, min: f64, max: f64) -> Result<(), Self::Error>;

    fn show_colorbar(&mut self, axes: AxesId) -> Result<Self::ColorbarHandle, Self::Error>;

    /// Drop any colorbar state on `axes`, shown or not.
    fn remove_colorbar(&mut self, axes: AxesId) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matched_face_takes_the_drawable_color() {
        let red = Rgb::new(1.0, 0.0, 0.0);
        let a = Appearance::new(red, &ResolvedStyle::default(), true);
        assert_eq!(a.marker_face_color(), Some(red));
        assert_eq!(a.color, red);
    }

    #[test]
    fn unmatched_face_keeps_the_style() {
        let style = ResolvedStyle {
            marker_face: MarkerFace::Auto,
            ..ResolvedStyle::default()
        };
        let a = Appearance::new(Rgb::new(0.0, 0.0, 1.0), &style, false);
        assert_eq!(a.marker_face_color(), None);
        assert_eq!(a.style, style);
    }
}
