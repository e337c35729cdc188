//! Square occupancy classification and board-state tracking.
//!
//! The classifier is deliberately texture-based: it answers only "is
//! something on this square", never which piece. Identities are carried
//! over from prior state or looked up in the standard starting position;
//! they are never inferred from appearance.

mod board;
mod occupancy;
mod tracker;

pub use board::{initial_board, starting_piece, BoardSnapshot, Occupant, Piece, PieceColor, PieceRole};
pub use occupancy::{OccupancyClassifier, OccupancyStat};
pub use tracker::{BoardTracker, MoveEvent, MoveKind, TrackerParams};
