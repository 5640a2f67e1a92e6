//! Style options carried through to the drawing surface.
//!
//! The trailing arguments of a call are an optional style string (`"o"`,
//! `"--"`, `":s"`, ...) followed by name/value pairs. Color options are
//! accepted but never reach the surface: the palette decides every color.

use crate::args::Arg;
use crate::error::{ClineError, Result};
use crate::palette::Rgb;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
    DashDot,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    None,
    Circle,
    Plus,
    Star,
    Point,
    Cross,
    Square,
    Diamond,
    TriangleUp,
    TriangleDown,
    TriangleLeft,
    TriangleRight,
    Pentagram,
    Hexagram,
}

/// Fill of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerFace {
    /// Hollow marker.
    None,
    /// Surface decides.
    Auto,
    Color(Rgb),
}

/// The complete style a drawable is created with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStyle {
    pub line_style: LineStyle,
    pub marker: MarkerKind,
    pub line_width: f64,
    pub marker_size: f64,
    pub marker_face: MarkerFace,
    pub label: Option<String>,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            line_style: LineStyle::Solid,
            marker: MarkerKind::None,
            line_width: 0.5,
            marker_size: 6.0,
            marker_face: MarkerFace::None,
            label: None,
        }
    }
}

impl ResolvedStyle {
    pub fn draws_line(&self) -> bool {
        self.line_style != LineStyle::None
    }

    pub fn draws_marker(&self) -> bool {
        self.marker != MarkerKind::None
    }
}

/// Markers requested with no connecting line: the path has to be drawn one
/// point at a time instead of one segment at a time.
pub fn needs_marker_correction(style: &ResolvedStyle) -> bool {
    !style.draws_line() && style.draws_marker()
}

/// Style options given by the caller. Unset fields fall back to the
/// surface's defaults when resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleOptions {
    pub line_style: Option<LineStyle>,
    pub marker: Option<MarkerKind>,
    pub line_width: Option<f64>,
    pub marker_size: Option<f64>,
    pub marker_face: Option<MarkerFace>,
    pub label: Option<String>,
}

impl StyleOptions {
    fn merge(&mut self, other: StyleOptions) {
        if other.line_style.is_some() {
            self.line_style = other.line_style;
        }
        if other.marker.is_some() {
            self.marker = other.marker;
        }
        if other.line_width.is_some() {
            self.line_width = other.line_width;
        }
        if other.marker_size.is_some() {
            self.marker_size = other.marker_size;
        }
        if other.marker_face.is_some() {
            self.marker_face = other.marker_face;
        }
        if other.label.is_some() {
            self.label = other.label;
        }
    }

    /// Overlay these options on the surface defaults.
    pub fn resolve(&self, defaults: &ResolvedStyle) -> ResolvedStyle {
        ResolvedStyle {
            line_style: self.line_style.unwrap_or(defaults.line_style),
            marker: self.marker.unwrap_or(defaults.marker),
            line_width: self.line_width.unwrap_or(defaults.line_width),
            marker_size: self.marker_size.unwrap_or(defaults.marker_size),
            marker_face: self.marker_face.unwrap_or(defaults.marker_face),
            label: self.label.clone().or_else(|| defaults.label.clone()),
        }
    }
}

/// Parse trailing style arguments.
pub fn parse_style_args(rest: &[Arg]) -> Result<StyleOptions> {
    let mut options = StyleOptions::default();
    if rest.is_empty() {
        return Ok(options);
    }

    let mut idx = 0;
    if let Some(token) = rest[0].as_text() {
        // an odd-length tail starts with a style string, not an option name
        if rest.len() % 2 == 1 {
            options.merge(parse_style_string(token)?);
            idx = 1;
        }
    }

    let pairs = &rest[idx..];
    if pairs.len() % 2 != 0 {
        return Err(ClineError::InvalidStyle(
            "name-value arguments must come in pairs".to_string(),
        ));
    }
    for pair in pairs.chunks_exact(2) {
        let name = pair[0].as_text().ok_or_else(|| {
            ClineError::InvalidStyle(format!(
                "option names must be text, got {}",
                pair[0].describe()
            ))
        })?;
        options.merge(parse_name_value(name, &pair[1])?);
    }
    Ok(options)
}

fn parse_style_string(token: &str) -> Result<StyleOptions> {
    let mut options = StyleOptions::default();
    let mut chars = token.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '-' => match chars.peek() {
                Some('-') => {
                    chars.next();
                    options.line_style = Some(LineStyle::Dashed);
                }
                Some('.') => {
                    chars.next();
                    options.line_style = Some(LineStyle::DashDot);
                }
                _ => options.line_style = Some(LineStyle::Solid),
            },
            ':' => options.line_style = Some(LineStyle::Dotted),
            c if marker_from_char(c).is_some() => options.marker = marker_from_char(c),
            c if color_from_char(c).is_some() => {
                warn!(token, "color in style string is ignored; colors come from the palette");
            }
            _ => {
                return Err(ClineError::InvalidStyle(format!(
                    "unrecognised style token `{ch}` in '{token}'"
                )))
            }
        }
    }
    // a marker with no line spec means markers only
    if options.marker.is_some() && options.line_style.is_none() {
        options.line_style = Some(LineStyle::None);
    }
    Ok(options)
}

fn parse_name_value(name: &str, value: &Arg) -> Result<StyleOptions> {
    let mut options = StyleOptions::default();
    match name.trim().to_ascii_lowercase().as_str() {
        "linestyle" => {
            let text = value
                .as_text()
                .ok_or_else(|| ClineError::InvalidStyle("LineStyle must be text".to_string()))?;
            options.line_style = Some(parse_line_style_name(text)?);
        }
        "marker" => {
            let text = value
                .as_text()
                .ok_or_else(|| ClineError::InvalidStyle("Marker must be text".to_string()))?;
            options.marker = Some(parse_marker_name(text)?);
        }
        "linewidth" => options.line_width = Some(positive(name, value)?),
        "markersize" => options.marker_size = Some(positive(name, value)?),
        "markerfacecolor" => options.marker_face = Some(parse_marker_face(value)?),
        "color" | "markeredgecolor" => {
            parse_color(value)?;
            warn!(option = name, "color option is overridden by the palette");
        }
        "displayname" => {
            let text = value
                .as_text()
                .ok_or_else(|| ClineError::InvalidStyle("DisplayName must be text".to_string()))?;
            options.label = Some(text.to_string());
        }
        other => {
            return Err(ClineError::InvalidStyle(format!(
                "unsupported option `{other}`"
            )))
        }
    }
    Ok(options)
}

fn positive(name: &str, value: &Arg) -> Result<f64> {
    match value.as_f64() {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ClineError::InvalidStyle(format!(
            "{name} must be a positive number"
        ))),
    }
}

fn parse_line_style_name(text: &str) -> Result<LineStyle> {
    match text.trim() {
        "-" => Ok(LineStyle::Solid),
        "--" => Ok(LineStyle::Dashed),
        ":" => Ok(LineStyle::Dotted),
        "-." => Ok(LineStyle::DashDot),
        t if t.eq_ignore_ascii_case("none") => Ok(LineStyle::None),
        other => Err(ClineError::InvalidStyle(format!(
            "unsupported LineStyle `{other}`"
        ))),
    }
}

fn parse_marker_name(text: &str) -> Result<MarkerKind> {
    let t = text.trim();
    let kind = match t.to_ascii_lowercase().as_str() {
        "none" => Some(MarkerKind::None),
        "circle" => Some(MarkerKind::Circle),
        "square" => Some(MarkerKind::Square),
        "diamond" => Some(MarkerKind::Diamond),
        "pentagram" => Some(MarkerKind::Pentagram),
        "hexagram" => Some(MarkerKind::Hexagram),
        _ if t.chars().count() == 1 => t.chars().next().and_then(marker_from_char),
        _ => None,
    };
    kind.ok_or_else(|| ClineError::InvalidStyle(format!("unsupported Marker `{text}`")))
}

fn marker_from_char(c: char) -> Option<MarkerKind> {
    match c {
        'o' => Some(MarkerKind::Circle),
        '+' => Some(MarkerKind::Plus),
        '*' => Some(MarkerKind::Star),
        '.' => Some(MarkerKind::Point),
        'x' => Some(MarkerKind::Cross),
        's' => Some(MarkerKind::Square),
        'd' => Some(MarkerKind::Diamond),
        '^' => Some(MarkerKind::TriangleUp),
        'v' => Some(MarkerKind::TriangleDown),
        '<' => Some(MarkerKind::TriangleLeft),
        '>' => Some(MarkerKind::TriangleRight),
        'p' => Some(MarkerKind::Pentagram),
        'h' => Some(MarkerKind::Hexagram),
        _ => None,
    }
}

fn color_from_char(c: char) -> Option<Rgb> {
    match c {
        'r' => Some(Rgb::new(1.0, 0.0, 0.0)),
        'g' => Some(Rgb::new(0.0, 1.0, 0.0)),
        'b' => Some(Rgb::new(0.0, 0.0, 1.0)),
        'c' => Some(Rgb::new(0.0, 1.0, 1.0)),
        'm' => Some(Rgb::new(1.0, 0.0, 1.0)),
        'y' => Some(Rgb::new(1.0, 1.0, 0.0)),
        'k' => Some(Rgb::new(0.0, 0.0, 0.0)),
        'w' => Some(Rgb::new(1.0, 1.0, 1.0)),
        _ => None,
    }
}

fn parse_color(value: &Arg) -> Result<Rgb> {
    if let Some(text) = value.as_text() {
        let lower = text.trim().to_ascii_lowercase();
        let named = match lower.as_str() {
            "red" => Some('r'),
            "green" => Some('g'),
            "blue" => Some('b'),
            "cyan" => Some('c'),
            "magenta" => Some('m'),
            "yellow" => Some('y'),
            "black" => Some('k'),
            "white" => Some('w'),
            s if s.chars().count() == 1 => s.chars().next(),
            _ => None,
        };
        return named
            .and_then(color_from_char)
            .ok_or_else(|| ClineError::InvalidStyle(format!("unknown color '{text}'")));
    }
    match value.as_vector() {
        Some(v) if v.len() == 3 && v.iter().all(|c| (0.0..=1.0).contains(c)) => {
            Ok(Rgb::new(v[0], v[1], v[2]))
        }
        _ => Err(ClineError::InvalidStyle(format!(
            "colors must be a name or an RGB triple in [0, 1], got {}",
            value.describe()
        ))),
    }
}

fn parse_marker_face(value: &Arg) -> Result<MarkerFace> {
    if let Some(text) = value.as_text() {
        match text.trim().to_ascii_lowercase().as_str() {
            "none" => return Ok(MarkerFace::None),
            "auto" => return Ok(MarkerFace::Auto),
            _ => {}
        }
    }
    parse_color(value).map(MarkerFace::Color)
}
