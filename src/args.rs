//! Positional call tokens.
//!
//! A call is a flat, ordered list of [`Arg`]s. The resolver only ever asks a
//! token two structural questions: is it a drawing surface, and is it a
//! one-dimensional numeric sequence.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle naming one set of axes on a drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxesId(pub u32);

impl fmt::Display for AxesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Row-major 2-D numeric table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from row-major data. Returns `None` when `data` does not
    /// hold exactly `rows * cols` entries.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Option<Self> {
        (rows.checked_mul(cols)? == data.len()).then_some(Self { rows, cols, data })
    }

    /// Build a matrix from rows, which must all have the same length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Option<Self> {
        let cols = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            let row = row.as_ref();
            if row.len() != cols {
                return None;
            }
            data.extend_from_slice(row);
        }
        Some(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// A single row or single column is structurally a vector.
    pub fn is_vector(&self) -> bool {
        self.rows == 1 || self.cols == 1
    }
}

/// One positional argument of a colored-line call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Arg {
    Axes(AxesId),
    Num(f64),
    Vector(Vec<f64>),
    Matrix(Matrix),
    Text(String),
    Bool(bool),
}

impl Arg {
    /// True when the token can serve as the target drawing surface.
    pub fn is_surface(&self) -> bool {
        matches!(self, Arg::Axes(_))
    }

    /// True for one-dimensional numeric sequences. Scalars count, as do
    /// single-row and single-column matrices.
    pub fn is_vector(&self) -> bool {
        match self {
            Arg::Num(_) | Arg::Vector(_) => true,
            Arg::Matrix(m) => m.is_vector(),
            _ => false,
        }
    }

    /// The numeric contents of a vector-shaped token.
    pub fn as_vector(&self) -> Option<Vec<f64>> {
        match self {
            Arg::Num(v) => Some(vec![*v]),
            Arg::Vector(v) => Some(v.clone()),
            Arg::Matrix(m) if m.is_vector() => Some(m.data().to_vec()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Arg::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Arg::Num(v) => Some(*v),
            Arg::Vector(v) if v.len() == 1 => Some(v[0]),
            Arg::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Short shape description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Arg::Axes(id) => format!("axes #{}", id.0),
            Arg::Num(_) => "scalar".to_string(),
            Arg::Vector(v) => format!("vector of length {}", v.len()),
            Arg::Matrix(m) => format!("{}x{} matrix", m.rows(), m.cols()),
            Arg::Text(s) => format!("text '{s}'"),
            Arg::Bool(_) => "logical".to_string(),
        }
    }
}

impl From<f64> for Arg {
    fn from(v: f64) -> Self {
        Arg::Num(v)
    }
}

impl From<Vec<f64>> for Arg {
    fn from(v: Vec<f64>) -> Self {
        Arg::Vector(v)
    }
}

impl From<&[f64]> for Arg {
    fn from(v: &[f64]) -> Self {
        Arg::Vector(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Arg {
    fn from(v: [f64; N]) -> Self {
        Arg::Vector(v.to_vec())
    }
}

impl From<Matrix> for Arg {
    fn from(m: Matrix) -> Self {
        Arg::Matrix(m)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Text(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Text(s)
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Bool(b)
    }
}

impl From<AxesId> for Arg {
    fn from(id: AxesId) -> Self {
        Arg::Axes(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_shape_checks() {
        assert!(Matrix::new(2, 3, vec![0.0; 5]).is_none());
        let m = Matrix::from_rows(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.row(1), &[0.0, 1.0, 0.0]);
        assert!(!m.is_vector());
        assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_none());
    }

    #[test]
    fn single_row_table_reads_as_vector() {
        let one_row = Matrix::from_rows(&[[0.2, 0.4, 0.6]]).unwrap();
        let arg = Arg::Matrix(one_row);
        assert!(arg.is_vector());
        assert_eq!(arg.as_vector(), Some(vec![0.2, 0.4, 0.6]));
    }

    #[test]
    fn only_numeric_tokens_are_vectors() {
        assert!(Arg::Num(1.0).is_vector());
        assert!(Arg::from([1.0, 2.0]).is_vector());
        assert!(!Arg::from("jet").is_vector());
        assert!(!Arg::Axes(AxesId(0)).is_vector());
        assert!(Arg::Axes(AxesId(0)).is_surface());
    }
}
