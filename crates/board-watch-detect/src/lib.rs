//! Interior-corner lattice detection.
//!
//! Pipeline:
//! 1. Raw ChESS corners from the grayscale frame (`chess-corners`).
//! 2. Strength filter.
//! 3. Orientation-aware 4-connected grid graph over the corner cloud
//!    (k-NN via a kd-tree, at most one neighbor per direction).
//! 4. BFS integer coordinates per connected component; accept only a
//!    component that fills the expected pattern completely.
//! 5. Normalize orientation (row 0 topmost, columns left to right) and
//!    refine every corner to subpixel accuracy.
//!
//! Failure to find the lattice is the normal outcome on most frames (board
//! occluded, out of view, bad lighting) and is reported as `None`, never as
//! an error.

mod corner;
mod finder;
mod geom;
mod gridgraph;
mod lattice_fit;
mod params;
mod refine;

pub use corner::RawCorner;
pub use finder::CornerFinder;
pub use gridgraph::{GridDirection, GridEdge, GridGraph};
pub use lattice_fit::fit_complete_grid;
pub use params::{CornerFinderParams, GridGraphParams, RefineParams};
pub use refine::refine_subpixel;
