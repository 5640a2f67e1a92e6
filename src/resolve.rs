//! Turns the positional call into a validated [`PlotRequest`].
//!
//! Grammar, applied in order:
//!
//! ```text
//! call     := [axes] coords palette [values] style* [matchMarkerFace]
//! coords   := y | x y | x y z
//! ```
//!
//! The palette is the first token after the optional axes that is not a
//! one-dimensional numeric sequence; its position fixes how many coordinate
//! vectors precede it. A palette with a single row is indistinguishable from
//! a length-3 vector and is therefore not supported.

use crate::args::{Arg, AxesId};
use crate::error::{ClineError, Result};
use crate::normalize::{normalize, ColorIndexMap};
use crate::palette::{palette_from_arg, BuiltinPalettes, Palette, PaletteRegistry};
use crate::style::{parse_style_args, StyleOptions};
use serde::Serialize;
use tracing::debug;

/// Trailing flag asking for marker faces filled with the drawable's color.
pub const MATCH_MARKER_FACE: &str = "matchMarkerFace";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dimension {
    Two,
    Three,
}

/// A point on the path. `z` is zero for 2-D paths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Equal-length coordinate sequences with at least two points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coordinates {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Option<Vec<f64>>,
}

impl Coordinates {
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn z(&self) -> Option<&[f64]> {
        self.z.as_deref()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn point(&self, i: usize) -> Point3 {
        Point3 {
            x: self.x[i],
            y: self.y[i],
            z: self.z.as_ref().map_or(0.0, |z| z[i]),
        }
    }
}

/// Validated description of one call. Only [`ArgumentResolver`] builds
/// one, so every request has at least two points and one value per point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotRequest {
    axes: Option<AxesId>,
    dimension: Dimension,
    coordinates: Coordinates,
    palette: Palette,
    values: Vec<f64>,
    values_supplied: bool,
    style: StyleOptions,
    match_marker_face: bool,
}

impl PlotRequest {
    /// Target axes; `None` means the surface's current axes.
    pub fn axes(&self) -> Option<AxesId> {
        self.axes
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// One value per point; `0..L-1` when the caller gave none.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_supplied(&self) -> bool {
        self.values_supplied
    }

    pub fn style(&self) -> &StyleOptions {
        &self.style
    }

    pub fn match_marker_face(&self) -> bool {
        self.match_marker_face
    }

    /// Palette row for every point.
    pub fn color_indices(&self) -> ColorIndexMap {
        normalize(&self.values, self.palette.len())
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Resolves calls against a palette registry.
pub struct ArgumentResolver<'a> {
    registry: &'a dyn PaletteRegistry,
}

impl<'a> ArgumentResolver<'a> {
    pub fn new(registry: &'a dyn PaletteRegistry) -> Self {
        Self { registry }
    }

    pub fn resolve(&self, args: &[Arg]) -> Result<PlotRequest> {
        let (axes, rest) = match args.first() {
            Some(Arg::Axes(id)) => (Some(*id), &args[1..]),
            Some(_) => (None, args),
            None => {
                return Err(ClineError::InsufficientArguments(
                    "no arguments given".to_string(),
                ))
            }
        };
        if rest.len() < 2 {
            return Err(ClineError::InsufficientArguments(format!(
                "got {} argument(s) after the axes, need at least y and a palette",
                rest.len()
            )));
        }

        let palette_at = rest
            .iter()
            .position(|a| !a.is_vector())
            .ok_or(ClineError::MissingPalette)?;

        let names: &[&str] = match palette_at {
            1 => &["y"],
            2 => &["x", "y"],
            3 => &["x", "y", "z"],
            // position counts from 1 after the axes
            n => return Err(ClineError::TooManyLeadingArguments { position: n + 1 }),
        };
        let coordinates = coordinates(names, &rest[..palette_at])?;
        let dimension = if coordinates.z.is_some() {
            Dimension::Three
        } else {
            Dimension::Two
        };
        let len = coordinates.len();

        let palette = palette_from_arg(&rest[palette_at], self.registry)?;

        let mut trailing = &rest[palette_at + 1..];
        let match_marker_face = trailing.last().and_then(Arg::as_text) == Some(MATCH_MARKER_FACE);
        if match_marker_face {
            trailing = &trailing[..trailing.len() - 1];
        }

        let (values, values_supplied) = match trailing.first().and_then(Arg::as_vector) {
            Some(v) if v.len() == len => {
                trailing = &trailing[1..];
                (v, true)
            }
            Some(v) => {
                return Err(ClineError::ValueLengthMismatch {
                    expected: len,
                    got: v.len(),
                })
            }
            None => ((0..len).map(|i| i as f64).collect(), false),
        };

        let style = parse_style_args(trailing)?;

        debug!(
            ?axes,
            ?dimension,
            points = len,
            palette_rows = palette.len(),
            values_supplied,
            match_marker_face,
            "resolved colored-line call"
        );

        Ok(PlotRequest {
            axes,
            dimension,
            coordinates,
            palette,
            values,
            values_supplied,
            style,
            match_marker_face,
        })
    }
}

/// Resolve against the built-in named palettes.
pub fn resolve_args(args: &[Arg]) -> Result<PlotRequest> {
    ArgumentResolver::new(&BuiltinPalettes::default()).resolve(args)
}

fn coordinates(names: &[&str], tokens: &[Arg]) -> Result<Coordinates> {
    let mut vectors = Vec::with_capacity(tokens.len());
    for (name, token) in names.iter().zip(tokens) {
        let v = token.as_vector().ok_or_else(|| {
            ClineError::CoordinateMismatch(format!(
                "{name} must be a numeric vector, got {}",
                token.describe()
            ))
        })?;
        vectors.push((*name, v));
    }

    let (first_name, first) = (vectors[0].0, vectors[0].1.len());
    let disagreeing: Vec<String> = vectors
        .iter()
        .filter(|(_, v)| v.len() != first)
        .map(|(n, v)| format!("{n} has {}", v.len()))
        .collect();
    if !disagreeing.is_empty() {
        return Err(ClineError::CoordinateMismatch(format!(
            "{first_name} has {first} points but {}",
            disagreeing.join(", ")
        )));
    }
    if first < 2 {
        return Err(ClineError::CoordinateMismatch(format!(
            "a line needs at least 2 points, {first_name} has {first}"
        )));
    }

    let mut vectors = vectors.into_iter().map(|(_, v)| v);
    Ok(match names.len() {
        1 => Coordinates {
            x: (0..first).map(|i| i as f64).collect(),
            y: vectors.next().unwrap_or_default(),
            z: None,
        },
        _ => Coordinates {
            x: vectors.next().unwrap_or_default(),
            y: vectors.next().unwrap_or_default(),
            z: vectors.next(),
        },
    })
}
