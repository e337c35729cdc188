//! Interior-corner lattices and the 9x9 full-grid extrapolation.
//!
//! An 8x8 board exposes only its 7x7 interior grid-line intersections to a
//! corner detector. The outer boundary intersections are synthesized here by
//! linear extrapolation along the *local* edge vector of each row/column, so
//! perspective curvature of the lattice survives instead of being flattened
//! by a board-wide average.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Dimensions of the interior corner pattern (7x7 for a standard 8x8 board).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSize {
    /// Interior corner rows.
    pub rows: usize,
    /// Interior corner columns.
    pub cols: usize,
}

impl Default for PatternSize {
    fn default() -> Self {
        Self { rows: 7, cols: 7 }
    }
}

impl PatternSize {
    pub fn point_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Board square rows (`rows + 1`).
    pub fn square_rows(&self) -> usize {
        self.rows + 1
    }

    /// Board square columns (`cols + 1`).
    pub fn square_cols(&self) -> usize {
        self.cols + 1
    }
}

/// Errors from lattice construction. A wrong point count is a caller bug
/// (mismatched pattern size), not a recoverable detection outcome.
#[derive(Error, Debug)]
pub enum LatticeError {
    #[error("interior lattice has {got} points, expected {expected} for a {rows}x{cols} pattern")]
    DimensionMismatch {
        expected: usize,
        got: usize,
        rows: usize,
        cols: usize,
    },
    #[error("pattern {rows}x{cols} is too small to extrapolate (need at least 2x2)")]
    PatternTooSmall { rows: usize, cols: usize },
}

/// Row-major grid of detected interior corners.
///
/// Invariant: exactly `pattern.point_count()` points, row 0 topmost in image
/// space, columns left to right.
#[derive(Clone, Debug)]
pub struct InteriorLattice {
    pattern: PatternSize,
    points: Vec<Point2<f32>>,
}

impl InteriorLattice {
    pub fn from_points(
        pattern: PatternSize,
        points: Vec<Point2<f32>>,
    ) -> Result<Self, LatticeError> {
        if pattern.rows < 2 || pattern.cols < 2 {
            return Err(LatticeError::PatternTooSmall {
                rows: pattern.rows,
                cols: pattern.cols,
            });
        }
        if points.len() != pattern.point_count() {
            return Err(LatticeError::DimensionMismatch {
                expected: pattern.point_count(),
                got: points.len(),
                rows: pattern.rows,
                cols: pattern.cols,
            });
        }
        Ok(Self { pattern, points })
    }

    /// Regular lattice with uniform spacing, mostly useful in tests and for
    /// synthetic pipelines.
    pub fn regular(pattern: PatternSize, origin: Point2<f32>, spacing: f32) -> Self {
        let mut points = Vec::with_capacity(pattern.point_count());
        for r in 0..pattern.rows {
            for c in 0..pattern.cols {
                points.push(Point2::new(
                    origin.x + c as f32 * spacing,
                    origin.y + r as f32 * spacing,
                ));
            }
        }
        Self { pattern, points }
    }

    pub fn pattern(&self) -> PatternSize {
        self.pattern
    }

    #[inline]
    pub fn point(&self, row: usize, col: usize) -> Point2<f32> {
        self.points[row * self.pattern.cols + col]
    }

    pub fn points(&self) -> &[Point2<f32>] {
        &self.points
    }
}

/// Full `(rows+2) x (cols+2)` lattice of grid-line intersections.
///
/// Only ever derived from an [`InteriorLattice`]; the interior block is
/// preserved verbatim at offset `(1, 1)`.
#[derive(Clone, Debug)]
pub struct FullLattice {
    rows: usize,
    cols: usize,
    points: Vec<Point2<f32>>,
}

/// Extend a line of points by one step at both ends using the local edge
/// vector (`p0 + (p0 - p1)` and `pn + (pn - p(n-1))`).
fn extend_line(line: &[Point2<f32>]) -> Vec<Point2<f32>> {
    let n = line.len();
    let first = line[0] + (line[0] - line[1]);
    let last = line[n - 1] + (line[n - 1] - line[n - 2]);

    let mut out = Vec::with_capacity(n + 2);
    out.push(first);
    out.extend_from_slice(line);
    out.push(last);
    out
}

impl FullLattice {
    /// Extrapolate the interior lattice into the full boundary lattice.
    ///
    /// Rows are extended first (each interior row gains one point per end),
    /// then every column of the widened grid is extended the same way to
    /// synthesize the top and bottom rows.
    pub fn extrapolate(interior: &InteriorLattice) -> Self {
        let pattern = interior.pattern();
        let wide_cols = pattern.cols + 2;

        // rows x (cols + 2)
        let mut wide_rows: Vec<Vec<Point2<f32>>> = Vec::with_capacity(pattern.rows);
        for r in 0..pattern.rows {
            let row: Vec<Point2<f32>> =
                (0..pattern.cols).map(|c| interior.point(r, c)).collect();
            wide_rows.push(extend_line(&row));
        }

        // (rows + 2) x (cols + 2)
        let mut columns: Vec<Vec<Point2<f32>>> = Vec::with_capacity(wide_cols);
        for c in 0..wide_cols {
            let col: Vec<Point2<f32>> = wide_rows.iter().map(|row| row[c]).collect();
            columns.push(extend_line(&col));
        }

        let rows = pattern.rows + 2;
        let mut points = Vec::with_capacity(rows * wide_cols);
        for r in 0..rows {
            for column in &columns {
                points.push(column[r]);
            }
        }

        Self {
            rows,
            cols: wide_cols,
            points,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn point(&self, row: usize, col: usize) -> Point2<f32> {
        self.points[row * self.cols + col]
    }
}
