//! Polylines colored along their length by a per-point value array mapped
//! through a color palette.
//!
//! A call is a flat list of [`Arg`] tokens in the familiar
//! `cline([axes,] [x,] y[, z], palette[, values][, style...])` shape. It is
//! resolved into a [`PlotRequest`], the values are mapped onto palette rows,
//! and the line is drawn onto a caller-supplied [`DrawingSurface`].
//!
//! ```no_run
//! use colorline::{cline, Arg, Figure};
//!
//! let mut figure = Figure::new();
//! let drawn = cline(
//!     &mut figure,
//!     &[
//!         Arg::from([0.0, 1.0, 2.0, 3.0]),
//!         Arg::from([0.0, 1.0, 0.0, 1.0]),
//!         Arg::from("jet"),
//!         Arg::from([10.0, 20.0, 30.0, 40.0]),
//!     ],
//! )?;
//! assert_eq!(drawn.len(), 3);
//! # Ok::<(), colorline::ClineError>(())
//! ```

pub mod args;
pub mod config;
pub mod error;
pub mod export;
pub mod figure;
pub mod normalize;
pub mod palette;
pub mod render;
pub mod resolve;
pub mod style;
pub mod surface;

pub use args::{Arg, AxesId, Matrix};
pub use config::RenderConfig;
pub use error::{ClineError, Result};
pub use figure::Figure;
pub use normalize::{normalize, ColorIndexMap};
pub use palette::{BuiltinPalettes, Palette, PaletteRegistry, Rgb};
pub use render::{DrawableSet, Strategy};
pub use resolve::{ArgumentResolver, PlotRequest, MATCH_MARKER_FACE};
pub use style::{LineStyle, MarkerFace, MarkerKind, ResolvedStyle};
pub use surface::{Appearance, ColorbarWidget, DrawingSurface, View};

/// Draw a value-colored line using the built-in named palettes.
pub fn cline<S: DrawingSurface>(surface: &mut S, args: &[Arg]) -> Result<DrawableSet<S::Handle>> {
    cline_with_registry(surface, args, &BuiltinPalettes::default())
}

/// Draw a value-colored line, looking palette names up in `registry`.
pub fn cline_with_registry<S: DrawingSurface>(
    surface: &mut S,
    args: &[Arg],
    registry: &dyn PaletteRegistry,
) -> Result<DrawableSet<S::Handle>> {
    let request = ArgumentResolver::new(registry).resolve(args)?;
    render::render(surface, &request).map_err(ClineError::surface)
}

/// Like [`cline`], then attach a colorbar spanning the value range.
pub fn cline_with_colorbar<S: ColorbarWidget>(
    surface: &mut S,
    args: &[Arg],
) -> Result<(DrawableSet<S::Handle>, S::ColorbarHandle)> {
    let request = ArgumentResolver::new(&BuiltinPalettes::default()).resolve(args)?;
    render::render_with_colorbar(surface, &request).map_err(ClineError::surface)
}
