//! Diffing successive occupancy snapshots into move events.

use std::time::{Duration, Instant};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use board_watch_core::SquareId;

use crate::board::{starting_piece, BoardSnapshot, Occupant};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TrackerParams {
    /// Minimal wall-clock interval between diff steps. Observations arriving
    /// faster than this are dropped without touching the retained snapshot,
    /// so classification may run at full frame rate while move detection
    /// runs at its own cadence.
    pub diff_interval: Duration,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            diff_interval: Duration::from_secs(1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// A square went occupied -> empty.
    From,
    /// A square went empty -> occupied.
    To,
}

/// One occupancy transition. Simultaneous transitions are emitted as
/// independent events; the tracker never pairs a `From` with a `To` into a
/// single logical move, so consumers can apply their own disambiguation
/// policy (an event list longer than two signals an ambiguous interval).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveEvent {
    pub kind: MoveKind,
    pub square: SquareId,
    pub occupant: Occupant,
}

/// Holds the single retained previous snapshot and produces move events.
#[derive(Debug)]
pub struct BoardTracker {
    params: TrackerParams,
    previous: Option<BoardSnapshot>,
    last_diff: Option<Instant>,
}

impl BoardTracker {
    pub fn new(params: TrackerParams) -> Self {
        Self {
            params,
            previous: None,
            last_diff: None,
        }
    }

    /// The retained snapshot, with identities merged in. `None` before the
    /// first observed frame.
    pub fn latest(&self) -> Option<&BoardSnapshot> {
        self.previous.as_ref()
    }

    /// Feed one freshly classified snapshot.
    ///
    /// The very first snapshot seeds the tracker and never produces events
    /// (a cold start cannot itself be a move). Observations inside the
    /// throttle window are dropped entirely and leave the retained snapshot
    /// untouched.
    pub fn observe(&mut self, mut current: BoardSnapshot, now: Instant) -> Vec<MoveEvent> {
        if let Some(last) = self.last_diff {
            if now.duration_since(last) < self.params.diff_interval {
                return Vec::new();
            }
        }

        let Some(previous) = self.previous.take() else {
            debug!("cold start: seeding tracker state, no events");
            self.seed_identities(&mut current);
            self.previous = Some(current);
            self.last_diff = Some(now);
            return Vec::new();
        };

        let mut events = Vec::new();
        for (id, was_occupied) in previous.iter() {
            let is_occupied = current.is_occupied(id);

            if was_occupied && !is_occupied {
                let occupant = previous.piece(id).map_or(Occupant::Unknown, Occupant::Piece);
                events.push(MoveEvent {
                    kind: MoveKind::From,
                    square: id,
                    occupant,
                });
            } else if !was_occupied && is_occupied {
                // No identity is tracked for a square that just became
                // occupied; fall back to the starting-position lookup.
                let piece = starting_piece(id);
                current.set_piece(id, piece);
                events.push(MoveEvent {
                    kind: MoveKind::To,
                    square: id,
                    occupant: piece.map_or(Occupant::Unknown, Occupant::Piece),
                });
            } else if is_occupied {
                // Still occupied: carry the last-known identity forward.
                current.set_piece(id, previous.piece(id));
            }
        }

        for event in &events {
            info!(
                "{} {} ({})",
                match event.kind {
                    MoveKind::From => "from",
                    MoveKind::To => "to",
                },
                event.square,
                event.occupant
            );
        }

        self.previous = Some(current);
        self.last_diff = Some(now);
        events
    }

    /// On the first frame, occupied squares get their identity from the
    /// starting position when one exists there.
    fn seed_identities(&self, snapshot: &mut BoardSnapshot) {
        let ids: Vec<SquareId> = snapshot
            .iter()
            .filter(|&(_, occupied)| occupied)
            .map(|(id, _)| id)
            .collect();
        for id in ids {
            snapshot.set_piece(id, starting_piece(id));
        }
    }
}
