//! The frame-synchronous analysis pipeline.
//!
//! One frame enters, flows through detection -> extrapolation -> square
//! mapping -> classification -> tracking, and the cycle completes before the
//! next frame is accepted. The only persistent state is the tracker's
//! retained snapshot and (optionally) the last good lattice.

use std::time::Instant;

use log::{debug, info};

use board_watch_core::{map_squares, FullLattice, RgbFrame, RgbFrameView, Square};
use board_watch_detect::CornerFinder;
use board_watch_track::{BoardSnapshot, BoardTracker, MoveEvent, OccupancyClassifier};

use crate::annotate::render_overlay;
use crate::params::WatcherParams;

/// Per-frame outcome of the geometry stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// The interior lattice was found in this frame.
    BoardDetected,
    /// Detection failed but the last good lattice was reused.
    LatticeHeld,
    /// No lattice available; downstream stages were skipped.
    BoardNotDetected,
}

/// Everything the UI collaborator consumes for one frame.
#[derive(Debug)]
pub struct FrameAnalysis {
    pub status: FrameStatus,
    /// The 64 mapped squares; empty when no lattice was available.
    pub squares: Vec<Square>,
    /// Fresh occupancy snapshot; `None` when no lattice was available.
    pub snapshot: Option<BoardSnapshot>,
    /// Move events since the last tracked interval (often empty).
    pub moves: Vec<MoveEvent>,
    /// Annotated copy of the input frame, when enabled.
    pub annotated: Option<RgbFrame>,
}

/// Owns the pipeline stages and the persistent state between frames.
pub struct BoardWatcher {
    params: WatcherParams,
    finder: CornerFinder,
    classifier: OccupancyClassifier,
    tracker: BoardTracker,
    held_lattice: Option<FullLattice>,
}

impl BoardWatcher {
    pub fn new(params: WatcherParams) -> Self {
        let finder = CornerFinder::new(params.finder.clone());
        let classifier = OccupancyClassifier::new(params.occupancy);
        let tracker = BoardTracker::new(params.tracker);
        Self {
            params,
            finder,
            classifier,
            tracker,
            held_lattice: None,
        }
    }

    /// The last successfully detected (or injected) lattice, if any.
    pub fn lattice(&self) -> Option<&FullLattice> {
        self.held_lattice.as_ref()
    }

    /// Inject a known lattice, e.g. from an explicit calibration capture on
    /// an empty board.
    pub fn set_lattice(&mut self, lattice: FullLattice) {
        self.held_lattice = Some(lattice);
    }

    /// Run detection only and cache the lattice on success.
    ///
    /// Mirrors an explicit "capture" action: detect once on an unobstructed
    /// board, then let `hold_lattice` carry the geometry through frames
    /// where pieces occlude the corner pattern.
    pub fn calibrate(&mut self, frame: &RgbFrameView<'_>) -> bool {
        let gray = frame.to_gray();
        match self.finder.find(&gray.view()) {
            Some(interior) => {
                info!("calibration: board detected");
                self.held_lattice = Some(FullLattice::extrapolate(&interior));
                true
            }
            None => {
                info!("calibration: board not detected");
                false
            }
        }
    }

    /// Analyze one frame. `now` drives the tracker's diff throttling.
    pub fn analyze(&mut self, frame: &RgbFrameView<'_>, now: Instant) -> FrameAnalysis {
        let gray = frame.to_gray();

        let status = match self.finder.find(&gray.view()) {
            Some(interior) => {
                self.held_lattice = Some(FullLattice::extrapolate(&interior));
                FrameStatus::BoardDetected
            }
            None if self.params.hold_lattice && self.held_lattice.is_some() => {
                debug!("lattice not found; holding previous geometry");
                FrameStatus::LatticeHeld
            }
            None => {
                debug!("board not detected");
                return FrameAnalysis {
                    status: FrameStatus::BoardNotDetected,
                    squares: Vec::new(),
                    snapshot: None,
                    moves: Vec::new(),
                    annotated: None,
                };
            }
        };

        // Set on both success paths of the match above.
        let Some(lattice) = self.held_lattice.clone() else {
            return FrameAnalysis {
                status: FrameStatus::BoardNotDetected,
                squares: Vec::new(),
                snapshot: None,
                moves: Vec::new(),
                annotated: None,
            };
        };

        let squares = map_squares(&lattice, frame.width, frame.height);

        // Each square's classification reads only the frame and writes only
        // its own slot; a zero-area square is never classified.
        let mut snapshot = BoardSnapshot::empty();
        for square in &squares {
            if square.bounds.is_empty() {
                continue;
            }
            if self.classifier.is_occupied(&gray.view(), square.bounds) {
                snapshot.set_occupied(square.id, true);
            }
        }

        let moves = self.tracker.observe(snapshot.clone(), now);

        let annotated = self
            .params
            .annotate
            .then(|| render_overlay(frame, &lattice, &squares, &snapshot));

        FrameAnalysis {
            status,
            squares,
            snapshot: Some(snapshot),
            moves,
            annotated,
        }
    }
}
