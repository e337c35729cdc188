//! Mapping the full lattice onto labeled board squares.
//!
//! Orientation contract: lattice row 0 is the "far" row in the fixed camera
//! orientation, so grid row 0 maps to rank 8 and grid column 0 to file 'a'.
//! Square `(row 0, col 0)` is therefore `a8` and `(row 7, col 7)` is `h1`.
//! Consumers assuming any other orientation will silently mislabel pieces.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::lattice::FullLattice;

/// Identity of one board square. `rank` and `file` are zero-based, so
/// `rank 0, file 0` is `a1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SquareId {
    pub rank: u8,
    pub file: u8,
}

impl SquareId {
    /// Build from lattice grid indices (`row 0` = rank 8).
    pub fn from_grid(row: usize, col: usize, board_rows: usize) -> Self {
        Self {
            rank: (board_rows - 1 - row) as u8,
            file: col as u8,
        }
    }

    /// Algebraic label, e.g. `"e2"`.
    pub fn label(&self) -> String {
        format!("{}{}", (b'a' + self.file) as char, self.rank + 1)
    }

    /// Parse an algebraic label (`"a1"`..`"h8"`).
    pub fn from_label(label: &str) -> Option<Self> {
        let mut chars = label.chars();
        let file_ch = chars.next()?;
        let rank_ch = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        let file = (file_ch as u32).checked_sub('a' as u32)?;
        let rank = rank_ch.to_digit(10)?.checked_sub(1)?;
        if file > 7 || rank > 7 {
            return None;
        }
        Some(Self {
            rank: rank as u8,
            file: file as u8,
        })
    }

    /// Flat index into 64-slot board arrays.
    pub fn index(&self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }
}

impl std::fmt::Display for SquareId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Axis-aligned pixel rectangle, already clamped to the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn area(&self) -> u32 {
        self.w * self.h
    }
}

/// One board square: identity, the four lattice corners in winding order
/// `(i,j), (i,j+1), (i+1,j+1), (i+1,j)`, and the clamped pixel bounds.
#[derive(Clone, Debug)]
pub struct Square {
    pub id: SquareId,
    pub corners: [Point2<f32>; 4],
    pub bounds: PixelRect,
}

impl Square {
    pub fn centroid(&self) -> Point2<f32> {
        let sum = self
            .corners
            .iter()
            .fold(Point2::origin(), |acc: Point2<f32>, p| acc + p.coords);
        Point2::new(sum.x / 4.0, sum.y / 4.0)
    }
}

fn clamped_bounds(corners: &[Point2<f32>; 4], width: usize, height: usize) -> PixelRect {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for p in corners {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().max(0.0) as u32).min(width as u32);
    let y1 = (max_y.ceil().max(0.0) as u32).min(height as u32);

    // A square fully outside the frame collapses to zero area; downstream
    // treats that as unoccupied rather than an error.
    PixelRect {
        x: x0.min(x1),
        y: y0.min(y1),
        w: x1.saturating_sub(x0),
        h: y1.saturating_sub(y0),
    }
}

/// Derive all board squares from a full lattice, clamping bounds to the
/// `width x height` source frame.
pub fn map_squares(grid: &FullLattice, width: usize, height: usize) -> Vec<Square> {
    let square_rows = grid.rows() - 1;
    let square_cols = grid.cols() - 1;
    let mut squares = Vec::with_capacity(square_rows * square_cols);

    for i in 0..square_rows {
        for j in 0..square_cols {
            let corners = [
                grid.point(i, j),
                grid.point(i, j + 1),
                grid.point(i + 1, j + 1),
                grid.point(i + 1, j),
            ];
            squares.push(Square {
                id: SquareId::from_grid(i, j, square_rows),
                bounds: clamped_bounds(&corners, width, height),
                corners,
            });
        }
    }

    squares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::{FullLattice, InteriorLattice, PatternSize};

    fn regular_grid(origin_x: f32, origin_y: f32, spacing: f32) -> FullLattice {
        let interior = InteriorLattice::regular(
            PatternSize::default(),
            Point2::new(origin_x, origin_y),
            spacing,
        );
        FullLattice::extrapolate(&interior)
    }

    #[test]
    fn orientation_contract_a8_h1() {
        let grid = regular_grid(50.0, 50.0, 10.0);
        let squares = map_squares(&grid, 640, 480);
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0].id.label(), "a8");
        assert_eq!(squares[63].id.label(), "h1");
        // Row-major: second square of the first row is b8.
        assert_eq!(squares[1].id.label(), "b8");
    }

    #[test]
    fn label_round_trip() {
        for label in ["a1", "e2", "h8"] {
            let id = SquareId::from_label(label).unwrap();
            assert_eq!(id.label(), label);
        }
        assert!(SquareId::from_label("i1").is_none());
        assert!(SquareId::from_label("a9").is_none());
        assert!(SquareId::from_label("a10").is_none());
    }

    #[test]
    fn winding_order_matches_lattice_indices() {
        let grid = regular_grid(40.0, 40.0, 10.0);
        let squares = map_squares(&grid, 640, 480);
        let sq = &squares[0];
        assert_eq!(sq.corners[0], grid.point(0, 0));
        assert_eq!(sq.corners[1], grid.point(0, 1));
        assert_eq!(sq.corners[2], grid.point(1, 1));
        assert_eq!(sq.corners[3], grid.point(1, 0));
    }

    #[test]
    fn bounds_are_clamped_to_frame() {
        // Lattice starts near the origin so the extrapolated border squares
        // spill outside the frame on the top-left.
        let grid = regular_grid(5.0, 5.0, 10.0);
        let squares = map_squares(&grid, 60, 60);
        for sq in &squares {
            assert!(sq.bounds.x + sq.bounds.w <= 60);
            assert!(sq.bounds.y + sq.bounds.h <= 60);
        }
    }

    #[test]
    fn fully_off_frame_square_collapses_to_zero_area() {
        let grid = regular_grid(500.0, 500.0, 10.0);
        let squares = map_squares(&grid, 100, 100);
        assert!(squares.iter().all(|sq| sq.bounds.is_empty()));
    }

    #[test]
    fn centroid_is_square_center() {
        let grid = regular_grid(50.0, 50.0, 10.0);
        let squares = map_squares(&grid, 640, 480);
        let c = squares[0].centroid();
        // First square spans the extrapolated corner [40,50]x[40,50].
        assert!((c.x - 45.0).abs() < 1e-4);
        assert!((c.y - 45.0).abs() < 1e-4);
    }
}
