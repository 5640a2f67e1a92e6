//! Color tables: validation of explicit N-by-3 tables and lookup of named ones.

use crate::args::{Arg, Matrix};
use crate::error::{ClineError, Result};
use serde::{Deserialize, Serialize};

/// Rows sampled for a named palette.
pub const DEFAULT_PALETTE_ROWS: usize = 64;

/// RGB triple with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub [f64; 3]);

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self([r, g, b])
    }

    pub fn r(&self) -> f64 {
        self.0[0]
    }

    pub fn g(&self) -> f64 {
        self.0[1]
    }

    pub fn b(&self) -> f64 {
        self.0[2]
    }

    /// 8-bit channels, rounded.
    pub fn to_u8(self) -> (u8, u8, u8) {
        let c = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (c(self.0[0]), c(self.0[1]), c(self.0[2]))
    }
}

/// Ordered, non-empty color table looked up by 1-based index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for a 1-based palette index. Out-of-range indices are clamped.
    pub fn color(&self, index: usize) -> Rgb {
        let i = index.clamp(1, self.colors.len()) - 1;
        self.colors[i]
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Sample `f(t)` for `t` evenly spaced over `[0, 1]`.
    fn sampled(rows: usize, f: impl Fn(f64) -> [f64; 3]) -> Self {
        let rows = rows.max(1);
        let colors = (0..rows)
            .map(|i| {
                let t = if rows == 1 {
                    0.0
                } else {
                    i as f64 / (rows - 1) as f64
                };
                let [r, g, b] = f(t);
                Rgb::new(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
            })
            .collect();
        Self { colors }
    }
}

/// Check that `table` is a proper color table: two-dimensional, exactly three
/// columns, at least one row, every component finite and within `[0, 1]`.
pub fn validate_palette(table: &Matrix) -> Result<Palette> {
    if table.cols() != 3 {
        return Err(ClineError::InvalidPalette(format!(
            "table has {} columns",
            table.cols()
        )));
    }
    if table.rows() == 0 {
        return Err(ClineError::InvalidPalette("table has no rows".to_string()));
    }
    let mut colors = Vec::with_capacity(table.rows());
    for i in 0..table.rows() {
        let row = table.row(i);
        if let Some(bad) = row.iter().find(|c| !c.is_finite() || !(0.0..=1.0).contains(*c)) {
            return Err(ClineError::InvalidPalette(format!(
                "row {} has component {bad} outside [0, 1]",
                i + 1
            )));
        }
        colors.push(Rgb::new(row[0], row[1], row[2]));
    }
    Ok(Palette { colors })
}

/// Resolve the palette token of a call: names go through `registry`, tables
/// are validated directly.
pub fn palette_from_arg(arg: &Arg, registry: &dyn PaletteRegistry) -> Result<Palette> {
    let table = match arg {
        Arg::Text(name) => registry.resolve(name).ok_or_else(|| {
            ClineError::InvalidPalette(format!("unknown palette name '{name}'"))
        })?,
        Arg::Matrix(m) => return validate_palette(m),
        other => {
            return Err(ClineError::InvalidPalette(format!(
                "got {}",
                other.describe()
            )))
        }
    };
    // registry output is validated like any caller-supplied table
    let rows: Vec<[f64; 3]> = table.colors.iter().map(|c| c.0).collect();
    let matrix = Matrix::from_rows(&rows)
        .ok_or_else(|| ClineError::InvalidPalette("registry returned a ragged table".into()))?;
    validate_palette(&matrix)
}

/// Lookup of well-known palettes by name.
pub trait PaletteRegistry {
    fn resolve(&self, name: &str) -> Option<Palette>;
}

/// MATLAB-compatible named palettes, sampled at a fixed number of rows.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinPalettes {
    rows: usize,
}

impl Default for BuiltinPalettes {
    fn default() -> Self {
        Self {
            rows: DEFAULT_PALETTE_ROWS,
        }
    }
}

impl BuiltinPalettes {
    pub fn with_rows(rows: usize) -> Self {
        Self { rows: rows.max(1) }
    }

    pub const NAMES: &'static [&'static str] = &[
        "jet", "hot", "cool", "spring", "summer", "autumn", "winter", "gray", "copper", "viridis",
    ];
}

impl PaletteRegistry for BuiltinPalettes {
    fn resolve(&self, name: &str) -> Option<Palette> {
        let n = self.rows;
        let palette = match name.trim().to_ascii_lowercase().as_str() {
            "jet" => Palette::sampled(n, |t| {
                [
                    1.5 - 4.0 * (t - 0.75).abs(),
                    1.5 - 4.0 * (t - 0.5).abs(),
                    1.5 - 4.0 * (t - 0.25).abs(),
                ]
            }),
            "hot" => Palette::sampled(n, |t| {
                [3.0 * t, 3.0 * t - 1.0, 3.0 * t - 2.0]
            }),
            "cool" => Palette::sampled(n, |t| [t, 1.0 - t, 1.0]),
            "spring" => Palette::sampled(n, |t| [1.0, t, 1.0 - t]),
            "summer" => Palette::sampled(n, |t| [t, 0.5 + 0.5 * t, 0.4]),
            "autumn" => Palette::sampled(n, |t| [1.0, t, 0.0]),
            "winter" => Palette::sampled(n, |t| [0.0, t, 1.0 - 0.5 * t]),
            "gray" | "grey" => Palette::sampled(n, |t| [t, t, t]),
            "copper" => Palette::sampled(n, |t| [1.25 * t, 0.7812 * t, 0.4975 * t]),
            "viridis" => Palette::sampled(n, viridis),
            _ => return None,
        };
        Some(palette)
    }
}

const VIRIDIS_STOPS: [[f64; 3]; 5] = [
    [0.267, 0.005, 0.329],
    [0.229, 0.322, 0.546],
    [0.128, 0.567, 0.551],
    [0.369, 0.789, 0.383],
    [0.993, 0.906, 0.144],
];

fn viridis(t: f64) -> [f64; 3] {
    let span = (VIRIDIS_STOPS.len() - 1) as f64;
    let pos = t * span;
    let lo = (pos.floor() as usize).min(VIRIDIS_STOPS.len() - 2);
    let frac = pos - lo as f64;
    let (a, b) = (VIRIDIS_STOPS[lo], VIRIDIS_STOPS[lo + 1]);
    [
        a[0] + (b[0] - a[0]) * frac,
        a[1] + (b[1] - a[1]) * frac,
        a[2] + (b[2] - a[2]) * frac,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[[f64; 3]]) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn accepts_n_by_3() {
        let p = validate_palette(&table(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]])).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.color(1), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(p.color(2), Rgb::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn rejects_wrong_column_count() {
        let m = Matrix::from_rows(&[[1.0, 0.0], [0.0, 1.0]]).unwrap();
        let err = validate_palette(&m).unwrap_err();
        assert!(matches!(err, ClineError::InvalidPalette(ref msg) if msg.contains("2 columns")));
    }

    #[test]
    fn rejects_out_of_range_components() {
        let err = validate_palette(&table(&[[0.0, 0.0, 0.0], [0.0, 2.0, 0.0]])).unwrap_err();
        assert!(matches!(err, ClineError::InvalidPalette(ref msg) if msg.contains("row 2")));
        assert!(validate_palette(&table(&[[f64::NAN, 0.0, 0.0]])).is_err());
    }

    #[test]
    fn rejects_empty_table() {
        let m = Matrix::new(0, 3, vec![]).unwrap();
        assert!(validate_palette(&m).is_err());
    }

    #[test]
    fn named_palettes_resolve_case_insensitively() {
        let reg = BuiltinPalettes::default();
        for name in BuiltinPalettes::NAMES {
            let p = reg.resolve(&name.to_uppercase()).unwrap();
            assert_eq!(p.len(), DEFAULT_PALETTE_ROWS, "{name}");
        }
        assert!(reg.resolve("nope").is_none());
    }

    #[test]
    fn gray_runs_black_to_white() {
        let p = BuiltinPalettes::with_rows(3).resolve("gray").unwrap();
        assert_eq!(p.color(1), Rgb::new(0.0, 0.0, 0.0));
        assert_eq!(p.color(2), Rgb::new(0.5, 0.5, 0.5));
        assert_eq!(p.color(3), Rgb::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn palette_from_arg_reports_unknown_names() {
        let reg = BuiltinPalettes::default();
        let err = palette_from_arg(&Arg::from("rainbowz"), &reg).unwrap_err();
        assert!(err.to_string().contains("rainbowz"));
        let err = palette_from_arg(&Arg::Bool(true), &reg).unwrap_err();
        assert!(matches!(err, ClineError::InvalidPalette(_)));
    }

    #[test]
    fn color_index_is_clamped() {
        let p = BuiltinPalettes::with_rows(4).resolve("autumn").unwrap();
        assert_eq!(p.color(0), p.color(1));
        assert_eq!(p.color(99), p.color(4));
    }
}
