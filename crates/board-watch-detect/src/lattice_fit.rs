//! Turning a graph component into an ordered, complete interior lattice.
//!
//! The finder only succeeds when some connected component fills the expected
//! pattern exactly: `rows * cols` nodes, every cell occupied once. BFS cell
//! coordinates come out with arbitrary origin, handedness and axis order, so
//! the grid is normalized afterwards: columns must advance along image x,
//! rows along image y (row 0 topmost).

use nalgebra::{Point2, Vector2};

use board_watch_core::PatternSize;

use crate::corner::RawCorner;
use crate::gridgraph::GridGraph;

/// Search the graph for a component forming a complete `pattern` grid and
/// return its points in row-major order, or `None` if no component fits.
pub fn fit_complete_grid(
    corners: &[RawCorner],
    graph: &GridGraph,
    pattern: PatternSize,
) -> Option<Vec<Point2<f32>>> {
    let mut components = graph.components();
    components.sort_by_key(|c| std::cmp::Reverse(c.len()));

    for component in &components {
        if component.len() != pattern.point_count() {
            continue;
        }
        if let Some(points) = arrange_component(corners, graph, component, pattern) {
            return Some(points);
        }
    }
    None
}

fn arrange_component(
    corners: &[RawCorner],
    graph: &GridGraph,
    component: &[usize],
    pattern: PatternSize,
) -> Option<Vec<Point2<f32>>> {
    let coords = graph.integer_coords(component);
    if coords.len() != component.len() {
        return None;
    }

    let min_col = coords.iter().map(|&(_, c, _)| c).min()?;
    let max_col = coords.iter().map(|&(_, c, _)| c).max()?;
    let min_row = coords.iter().map(|&(_, _, r)| r).min()?;
    let max_row = coords.iter().map(|&(_, _, r)| r).max()?;

    let width = (max_col - min_col + 1) as usize;
    let height = (max_row - min_row + 1) as usize;
    if width * height != component.len() {
        return None;
    }

    // Place every node into its cell; collisions mean the component is not
    // a clean grid (e.g. two boards merged by a spurious edge).
    let mut cells: Vec<Option<usize>> = vec![None; width * height];
    for &(node, col, row) in &coords {
        let cell = (row - min_row) as usize * width + (col - min_col) as usize;
        if cells[cell].is_some() {
            return None;
        }
        cells[cell] = Some(node);
    }

    let mut grid: Vec<Vec<Point2<f32>>> = Vec::with_capacity(height);
    for r in 0..height {
        let mut row = Vec::with_capacity(width);
        for c in 0..width {
            row.push(corners[cells[r * width + c]?].position);
        }
        grid.push(row);
    }

    normalize_orientation(&mut grid);

    if grid.len() != pattern.rows || grid[0].len() != pattern.cols {
        return None;
    }

    Some(grid.into_iter().flatten().collect())
}

/// Mean step along columns and rows of the grid.
fn axis_vectors(grid: &[Vec<Point2<f32>>]) -> (Vector2<f32>, Vector2<f32>) {
    let mut v_col = Vector2::zeros();
    let mut v_row = Vector2::zeros();
    let mut n_col = 0usize;
    let mut n_row = 0usize;

    for r in 0..grid.len() {
        for c in 0..grid[r].len() {
            if c + 1 < grid[r].len() {
                v_col += grid[r][c + 1] - grid[r][c];
                n_col += 1;
            }
            if r + 1 < grid.len() {
                v_row += grid[r + 1][c] - grid[r][c];
                n_row += 1;
            }
        }
    }

    (v_col / n_col.max(1) as f32, v_row / n_row.max(1) as f32)
}

fn transpose(grid: &mut Vec<Vec<Point2<f32>>>) {
    let cols = grid[0].len();
    let mut out = vec![Vec::with_capacity(grid.len()); cols];
    for row in grid.iter() {
        for (c, &p) in row.iter().enumerate() {
            out[c].push(p);
        }
    }
    *grid = out;
}

/// Rearrange the grid so columns advance along +x and rows along +y.
fn normalize_orientation(grid: &mut Vec<Vec<Point2<f32>>>) {
    let (v_col, _) = axis_vectors(grid);
    if v_col.x.abs() < v_col.y.abs() {
        transpose(grid);
    }

    let (v_col, v_row) = axis_vectors(grid);
    if v_col.x < 0.0 {
        for row in grid.iter_mut() {
            row.reverse();
        }
    }
    if v_row.y < 0.0 {
        grid.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::GridGraphParams;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_4;

    fn checker_cloud(cols: usize, rows: usize, spacing: f32, x0: f32, y0: f32) -> Vec<RawCorner> {
        let mut corners = Vec::new();
        for j in 0..rows {
            for i in 0..cols {
                let orientation = if (i + j) % 2 == 0 {
                    FRAC_PI_4
                } else {
                    3.0 * FRAC_PI_4
                };
                corners.push(RawCorner::new(
                    x0 + i as f32 * spacing,
                    y0 + j as f32 * spacing,
                    orientation,
                    1.0,
                ));
            }
        }
        corners
    }

    fn graph_params() -> GridGraphParams {
        GridGraphParams {
            min_spacing_pix: 5.0,
            max_spacing_pix: 30.0,
            ..Default::default()
        }
    }

    #[test]
    fn recovers_row_major_order_from_regular_cloud() {
        let pattern = PatternSize { rows: 7, cols: 7 };
        let spacing = 20.0;
        let corners = checker_cloud(7, 7, spacing, 100.0, 50.0);
        let graph = GridGraph::build(&corners, &graph_params());

        let points = fit_complete_grid(&corners, &graph, pattern).unwrap();
        assert_eq!(points.len(), 49);
        for r in 0..7 {
            for c in 0..7 {
                let p = points[r * 7 + c];
                assert_relative_eq!(p.x, 100.0 + c as f32 * spacing, epsilon = 1e-3);
                assert_relative_eq!(p.y, 50.0 + r as f32 * spacing, epsilon = 1e-3);
            }
        }
    }

    #[test]
    fn ordering_is_independent_of_input_order() {
        let pattern = PatternSize { rows: 7, cols: 7 };
        let mut corners = checker_cloud(7, 7, 20.0, 100.0, 50.0);
        corners.reverse();
        let graph = GridGraph::build(&corners, &graph_params());

        let points = fit_complete_grid(&corners, &graph, pattern).unwrap();
        // Topmost-leftmost first regardless of how the cloud was ordered.
        assert!((points[0].x - 100.0).abs() < 1e-3);
        assert!((points[0].y - 50.0).abs() < 1e-3);
        assert!((points[48].x - 220.0).abs() < 1e-3);
        assert!((points[48].y - 170.0).abs() < 1e-3);
    }

    #[test]
    fn ignores_stray_corners_outside_the_board() {
        let pattern = PatternSize { rows: 7, cols: 7 };
        let mut corners = checker_cloud(7, 7, 20.0, 100.0, 50.0);
        corners.push(RawCorner::new(900.0, 900.0, FRAC_PI_4, 1.0));
        corners.push(RawCorner::new(940.0, 900.0, 3.0 * FRAC_PI_4, 1.0));
        let graph = GridGraph::build(&corners, &graph_params());

        let points = fit_complete_grid(&corners, &graph, pattern).unwrap();
        assert_eq!(points.len(), 49);
        assert!(points.iter().all(|p| p.x < 300.0));
    }

    #[test]
    fn incomplete_board_is_rejected() {
        let pattern = PatternSize { rows: 7, cols: 7 };
        let mut corners = checker_cloud(7, 7, 20.0, 100.0, 50.0);
        corners.remove(24); // knock out one interior corner
        let graph = GridGraph::build(&corners, &graph_params());
        assert!(fit_complete_grid(&corners, &graph, pattern).is_none());
    }

    #[test]
    fn smaller_grid_than_pattern_is_rejected() {
        let pattern = PatternSize { rows: 7, cols: 7 };
        let corners = checker_cloud(5, 5, 20.0, 100.0, 50.0);
        let graph = GridGraph::build(&corners, &graph_params());
        assert!(fit_complete_grid(&corners, &graph, pattern).is_none());
    }
}
