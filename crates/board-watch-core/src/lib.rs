//! Core types and geometry for observing a physical chessboard.
//!
//! This crate is intentionally small and purely geometric. It knows nothing
//! about how interior corners are detected or how squares are classified; it
//! only defines the image views, the lattice types, the interior-to-full
//! lattice extrapolation and the square/label mapping that the rest of the
//! workspace builds on.

mod image;
mod lattice;
mod logger;
mod squares;

pub use image::{sample_bilinear, FrameError, GrayImage, GrayImageView, RgbFrame, RgbFrameView};
pub use lattice::{FullLattice, InteriorLattice, LatticeError, PatternSize};
pub use logger::init_with_level;
pub use squares::{map_squares, PixelRect, Square, SquareId};
