//! 4-connected neighbor graph over a corner cloud.
//!
//! Each corner gets at most one neighbor per image-space direction
//! (right/left/up/down), chosen among its k nearest neighbors by an
//! orientation relation: on a checkerboard the dark/light diagonals of
//! adjacent corners are orthogonal, and the edge between them runs at ~45
//! degrees to both diagonals. Connected components of this graph are
//! candidate boards; BFS assigns integer cell coordinates within one.

use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::Vector2;

use crate::corner::RawCorner;
use crate::geom::{angle_diff_abs, axis_vec_diff, is_orthogonal};
use crate::params::GridGraphParams;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridDirection {
    Right,
    Left,
    Up,
    Down,
}

impl GridDirection {
    fn slot(self) -> usize {
        match self {
            GridDirection::Right => 0,
            GridDirection::Left => 1,
            GridDirection::Up => 2,
            GridDirection::Down => 3,
        }
    }

    /// Step in `(col, row)` cell coordinates (image y grows downward).
    fn step(self) -> (i32, i32) {
        match self {
            GridDirection::Right => (1, 0),
            GridDirection::Left => (-1, 0),
            GridDirection::Up => (0, -1),
            GridDirection::Down => (0, 1),
        }
    }
}

/// One accepted neighbor relation.
#[derive(Clone, Copy, Debug)]
pub struct GridEdge {
    pub direction: GridDirection,
    pub index: usize,
    pub distance: f32,
    pub score: f32,
}

fn direction_quadrant(v: &Vector2<f32>) -> GridDirection {
    if v.x.abs() > v.y.abs() {
        if v.x >= 0.0 {
            GridDirection::Right
        } else {
            GridDirection::Left
        }
    } else if v.y >= 0.0 {
        GridDirection::Down
    } else {
        GridDirection::Up
    }
}

/// Validate a candidate neighbor relation and score it (lower is better).
fn accept_edge(
    corner: &RawCorner,
    neighbor: &RawCorner,
    neighbor_index: usize,
    params: &GridGraphParams,
) -> Option<GridEdge> {
    let tol = params.orientation_tolerance_deg.to_radians();

    // Diagonals of adjacent checkerboard corners are orthogonal.
    if !is_orthogonal(corner.orientation, neighbor.orientation, tol) {
        return None;
    }

    let to_neighbor = neighbor.position - corner.position;
    let distance = to_neighbor.norm();
    if distance < params.min_spacing_pix || distance > params.max_spacing_pix {
        return None;
    }

    // The connecting edge runs along a grid axis, i.e. at ~45 degrees to
    // the diagonal of each endpoint.
    let edge_angle = to_neighbor.y.atan2(to_neighbor.x);
    let expected = std::f32::consts::FRAC_PI_4;
    let dev_corner = (axis_vec_diff(corner.orientation, edge_angle) - expected).abs();
    let dev_neighbor = (axis_vec_diff(neighbor.orientation, edge_angle) - expected).abs();
    if dev_corner > tol || dev_neighbor > tol {
        return None;
    }

    let dev_orthogonality = (std::f32::consts::FRAC_PI_2
        - angle_diff_abs(corner.orientation, neighbor.orientation))
    .abs();

    Some(GridEdge {
        direction: direction_quadrant(&to_neighbor),
        index: neighbor_index,
        distance,
        score: dev_corner + dev_neighbor + dev_orthogonality,
    })
}

/// Keep at most one edge per direction, preferring the lowest score.
fn best_per_direction(candidates: Vec<GridEdge>) -> Vec<GridEdge> {
    let mut best: [Option<GridEdge>; 4] = [None; 4];

    for candidate in candidates {
        let slot = &mut best[candidate.direction.slot()];
        let replace = match slot {
            None => true,
            Some(current) => {
                candidate.score < current.score
                    || (candidate.score == current.score && candidate.distance < current.distance)
            }
        };
        if replace {
            *slot = Some(candidate);
        }
    }

    best.into_iter().flatten().collect()
}

pub struct GridGraph {
    /// Accepted edges per corner, at most one per direction.
    pub edges: Vec<Vec<GridEdge>>,
}

impl GridGraph {
    pub fn build(corners: &[RawCorner], params: &GridGraphParams) -> Self {
        let coords = corners
            .iter()
            .map(|c| [c.position.x, c.position.y])
            .collect::<Vec<_>>();
        let tree: KdTree<f32, 2> = (&coords).into();

        let mut edges = Vec::with_capacity(corners.len());
        for (i, corner) in corners.iter().enumerate() {
            let query = [corner.position.x, corner.position.y];
            // +1 because the query point itself comes back as a neighbor.
            let nearest = tree.nearest_n::<SquaredEuclidean>(&query, params.k_neighbors + 1);

            let mut candidates = Vec::new();
            for nn in nearest {
                let j = nn.item as usize;
                if j == i {
                    continue;
                }
                if let Some(edge) = accept_edge(corner, &corners[j], j, params) {
                    candidates.push(edge);
                }
            }
            edges.push(best_per_direction(candidates));
        }

        Self { edges }
    }

    /// Connected components as lists of corner indices.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.edges.len()];
        let mut components = Vec::new();

        for start in 0..self.edges.len() {
            if visited[start] {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![start];
            while let Some(node) = stack.pop() {
                if visited[node] {
                    continue;
                }
                visited[node] = true;
                component.push(node);
                for edge in &self.edges[node] {
                    if !visited[edge.index] {
                        stack.push(edge.index);
                    }
                }
            }
            components.push(component);
        }

        components
    }

    /// BFS integer `(col, row)` coordinates for every node of a component,
    /// starting from an arbitrary origin.
    pub fn integer_coords(&self, component: &[usize]) -> Vec<(usize, i32, i32)> {
        let mut coords = Vec::with_capacity(component.len());
        let mut visited = vec![false; self.edges.len()];
        let mut queue = std::collections::VecDeque::new();
        queue.push_back((component[0], 0i32, 0i32));

        while let Some((node, col, row)) = queue.pop_front() {
            if visited[node] {
                continue;
            }
            visited[node] = true;
            coords.push((node, col, row));

            for edge in &self.edges[node] {
                let (dc, dr) = edge.direction.step();
                queue.push_back((edge.index, col + dc, row + dr));
            }
        }

        coords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::f32::consts::FRAC_PI_4;

    fn checker_corner(x: f32, y: f32, i: usize, j: usize) -> RawCorner {
        let orientation = if (i + j) % 2 == 0 {
            FRAC_PI_4
        } else {
            3.0 * FRAC_PI_4
        };
        RawCorner::new(x, y, orientation, 1.0)
    }

    fn grid_cloud(cols: usize, rows: usize, spacing: f32) -> Vec<RawCorner> {
        let mut corners = Vec::new();
        for j in 0..rows {
            for i in 0..cols {
                corners.push(checker_corner(i as f32 * spacing, j as f32 * spacing, i, j));
            }
        }
        corners
    }

    fn edge_map(edges: &[GridEdge]) -> HashMap<GridDirection, &GridEdge> {
        edges.iter().map(|e| (e.direction, e)).collect()
    }

    #[test]
    fn regular_grid_yields_four_connected_center() {
        let spacing = 10.0;
        let corners = grid_cloud(3, 3, spacing);
        let params = GridGraphParams {
            min_spacing_pix: 5.0,
            max_spacing_pix: 15.0,
            ..Default::default()
        };
        let graph = GridGraph::build(&corners, &params);

        let idx = |i: usize, j: usize| j * 3 + i;
        let center = edge_map(&graph.edges[idx(1, 1)]);
        assert_eq!(center.len(), 4);
        assert_eq!(center[&GridDirection::Left].index, idx(0, 1));
        assert_eq!(center[&GridDirection::Right].index, idx(2, 1));
        assert_eq!(center[&GridDirection::Up].index, idx(1, 0));
        assert_eq!(center[&GridDirection::Down].index, idx(1, 2));

        let corner = edge_map(&graph.edges[idx(0, 0)]);
        assert_eq!(corner.len(), 2);
        assert!(corner.contains_key(&GridDirection::Right));
        assert!(corner.contains_key(&GridDirection::Down));
    }

    #[test]
    fn parallel_diagonals_are_not_neighbors() {
        let corners = vec![
            RawCorner::new(0.0, 0.0, FRAC_PI_4, 1.0),
            RawCorner::new(10.0, 0.0, FRAC_PI_4, 1.0),
        ];
        let params = GridGraphParams {
            min_spacing_pix: 5.0,
            max_spacing_pix: 15.0,
            ..Default::default()
        };
        let graph = GridGraph::build(&corners, &params);
        assert!(graph.edges[0].is_empty());
        assert!(graph.edges[1].is_empty());
    }

    #[test]
    fn spacing_window_is_enforced() {
        let corners = vec![
            RawCorner::new(0.0, 0.0, FRAC_PI_4, 1.0),
            RawCorner::new(30.0, 0.0, 3.0 * FRAC_PI_4, 1.0),
        ];
        let params = GridGraphParams {
            min_spacing_pix: 5.0,
            max_spacing_pix: 15.0,
            ..Default::default()
        };
        let graph = GridGraph::build(&corners, &params);
        assert!(graph.edges[0].is_empty());
    }

    #[test]
    fn components_separate_distant_clusters() {
        let mut corners = grid_cloud(2, 2, 10.0);
        // A second 2x2 cluster far away.
        for c in grid_cloud(2, 2, 10.0) {
            corners.push(RawCorner::new(
                c.position.x + 1000.0,
                c.position.y + 1000.0,
                c.orientation,
                c.strength,
            ));
        }
        let params = GridGraphParams {
            min_spacing_pix: 5.0,
            max_spacing_pix: 15.0,
            ..Default::default()
        };
        let graph = GridGraph::build(&corners, &params);
        let mut components = graph.components();
        components.sort_by_key(|c| c.len());
        assert_eq!(components.len(), 2);
        assert!(components.iter().all(|c| c.len() == 4));
    }

    #[test]
    fn bfs_coords_span_the_grid() {
        let corners = grid_cloud(3, 3, 10.0);
        let params = GridGraphParams {
            min_spacing_pix: 5.0,
            max_spacing_pix: 15.0,
            ..Default::default()
        };
        let graph = GridGraph::build(&corners, &params);
        let components = graph.components();
        assert_eq!(components.len(), 1);

        let coords = graph.integer_coords(&components[0]);
        assert_eq!(coords.len(), 9);
        let min_c = coords.iter().map(|&(_, c, _)| c).min().unwrap();
        let max_c = coords.iter().map(|&(_, c, _)| c).max().unwrap();
        let min_r = coords.iter().map(|&(_, _, r)| r).min().unwrap();
        let max_r = coords.iter().map(|&(_, _, r)| r).max().unwrap();
        assert_eq!(max_c - min_c, 2);
        assert_eq!(max_r - min_r, 2);
    }
}
