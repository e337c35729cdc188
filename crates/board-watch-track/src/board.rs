//! Board snapshots and the static starting-position lookup.

use std::fmt;

use serde::{Deserialize, Serialize};

use board_watch_core::SquareId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceColor {
    White,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceRole {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: PieceColor,
    pub role: PieceRole,
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = match self.color {
            PieceColor::White => "white",
            PieceColor::Black => "black",
        };
        let role = match self.role {
            PieceRole::Pawn => "pawn",
            PieceRole::Rook => "rook",
            PieceRole::Knight => "knight",
            PieceRole::Bishop => "bishop",
            PieceRole::Queen => "queen",
            PieceRole::King => "king",
        };
        write!(f, "{color}_{role}")
    }
}

/// Identity carried on a move event. `Unknown` means the square is occupied
/// by something the tracker has no identity for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupant {
    Unknown,
    Piece(Piece),
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occupant::Unknown => write!(f, "unknown"),
            Occupant::Piece(p) => write!(f, "{p}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Cell {
    occupied: bool,
    piece: Option<Piece>,
}

/// Occupancy and identity of all 64 squares at one instant.
///
/// Created fresh per analyzed frame; the tracker owns the single retained
/// previous snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardSnapshot {
    cells: [Cell; 64],
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            cells: [Cell::default(); 64],
        }
    }
}

impl BoardSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_occupied(&self, id: SquareId) -> bool {
        self.cells[id.index()].occupied
    }

    pub fn piece(&self, id: SquareId) -> Option<Piece> {
        self.cells[id.index()].piece
    }

    pub fn set_occupied(&mut self, id: SquareId, occupied: bool) {
        self.cells[id.index()].occupied = occupied;
        if !occupied {
            self.cells[id.index()].piece = None;
        }
    }

    pub fn set_piece(&mut self, id: SquareId, piece: Option<Piece>) {
        self.cells[id.index()].piece = piece;
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.occupied).count()
    }

    /// Iterate all squares with their occupancy.
    pub fn iter(&self) -> impl Iterator<Item = (SquareId, bool)> + '_ {
        (0..64).map(|i| {
            let id = SquareId {
                rank: (i / 8) as u8,
                file: (i % 8) as u8,
            };
            (id, self.cells[i].occupied)
        })
    }
}

impl fmt::Display for BoardSnapshot {
    /// Ascii rendering, rank 8 on top: `#` occupied, `.` empty.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            for file in 0..8u8 {
                let id = SquareId { rank, file };
                write!(f, "{}", if self.is_occupied(id) { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Standard starting identity for a square, if any.
pub fn starting_piece(id: SquareId) -> Option<Piece> {
    use PieceRole::*;
    const BACK_RANK: [PieceRole; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

    let (color, role) = match id.rank {
        0 => (PieceColor::White, BACK_RANK[id.file as usize]),
        1 => (PieceColor::White, Pawn),
        6 => (PieceColor::Black, Pawn),
        7 => (PieceColor::Black, BACK_RANK[id.file as usize]),
        _ => return None,
    };
    Some(Piece { color, role })
}

/// Snapshot of the standard starting position, all 32 pieces placed.
pub fn initial_board() -> BoardSnapshot {
    let mut board = BoardSnapshot::empty();
    for rank in 0..8u8 {
        for file in 0..8u8 {
            let id = SquareId { rank, file };
            if let Some(piece) = starting_piece(id) {
                board.set_occupied(id, true);
                board.set_piece(id, Some(piece));
            }
        }
    }
    board
}
