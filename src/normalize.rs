//! Value to palette-index mapping.

use serde::Serialize;

/// For each point, the 1-based palette row it is drawn with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorIndexMap(Vec<usize>);

impl ColorIndexMap {
    pub fn get(&self, i: usize) -> usize {
        self.0[i]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

/// Finite minimum and maximum of `values`, or `None` if none are finite.
pub fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Map `values` onto rows `1..=palette_len`.
///
/// `frac = (v - min) / (max - min)` and `index = clamp(round(frac * (N - 1)) + 1, 1, N)`.
/// A constant sequence has no spread, so every point gets fraction 0 and index
/// 1. Non-finite values take no part in the range and also map to 1.
pub fn normalize(values: &[f64], palette_len: usize) -> ColorIndexMap {
    let n = palette_len.max(1);
    let top = (n - 1) as f64;
    let range = value_range(values).filter(|(lo, hi)| hi > lo);
    let indices = values
        .iter()
        .map(|&v| {
            let frac = match range {
                Some((lo, hi)) if v.is_finite() => fraction(v, lo, hi),
                _ => 0.0,
            };
            let idx = (frac * top).round() as usize + 1;
            idx.clamp(1, n)
        })
        .collect();
    ColorIndexMap(indices)
}

/// `(v - lo) / (hi - lo)` for finite `lo < hi`, halving first when the
/// spread itself overflows.
fn fraction(v: f64, lo: f64, hi: f64) -> f64 {
    let span = hi - lo;
    if span.is_finite() {
        (v - lo) / span
    } else {
        (v / 2.0 - lo / 2.0) / (hi / 2.0 - lo / 2.0)
    }
}
