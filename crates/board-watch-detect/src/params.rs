use board_watch_core::PatternSize;
use serde::{Deserialize, Serialize};

/// Parameters for building the neighbor graph over the corner cloud.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridGraphParams {
    /// Minimal accepted spacing between neighboring corners, pixels.
    pub min_spacing_pix: f32,
    /// Maximal accepted spacing between neighboring corners, pixels.
    pub max_spacing_pix: f32,
    /// How many nearest neighbors to examine per corner.
    pub k_neighbors: usize,
    /// Tolerance on the diagonal/edge angle relation, degrees.
    pub orientation_tolerance_deg: f32,
}

impl Default for GridGraphParams {
    fn default() -> Self {
        Self {
            min_spacing_pix: 5.0,
            max_spacing_pix: 120.0,
            k_neighbors: 8,
            orientation_tolerance_deg: 22.5,
        }
    }
}

/// Parameters for iterative subpixel corner refinement.
///
/// Both bounds are enforced: refinement stops after `max_iters` iterations
/// or as soon as the positional change drops below `eps`, whichever comes
/// first.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RefineParams {
    /// Half-size of the refinement window (5 gives an 11x11 window).
    pub window_radius: usize,
    /// Iteration cap.
    pub max_iters: usize,
    /// Convergence threshold on the positional delta, pixels.
    pub eps: f32,
}

impl Default for RefineParams {
    fn default() -> Self {
        Self {
            window_radius: 5,
            max_iters: 30,
            eps: 0.001,
        }
    }
}

/// Configuration for the interior-corner lattice finder.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CornerFinderParams {
    /// Interior corner pattern to search for (7x7 for an 8x8 board).
    pub pattern: PatternSize,
    /// Relative response threshold for the ChESS detector.
    pub threshold_rel: f32,
    /// Non-maximum-suppression radius for the ChESS detector.
    pub nms_radius: u32,
    /// Minimal corner strength to keep a candidate.
    pub min_strength: f32,
    /// Neighbor-graph construction.
    pub graph: GridGraphParams,
    /// Subpixel refinement.
    pub refine: RefineParams,
}

impl Default for CornerFinderParams {
    fn default() -> Self {
        Self {
            pattern: PatternSize::default(),
            threshold_rel: 0.2,
            nms_radius: 2,
            min_strength: 0.0,
            graph: GridGraphParams::default(),
            refine: RefineParams::default(),
        }
    }
}
