//! High-level facade for the `board-watch-*` workspace.
//!
//! Given one decoded camera frame per invocation, the pipeline locates the
//! board's interior corner lattice, extrapolates it to the full 9x9 grid,
//! maps the 64 labeled squares, classifies each as occupied or empty and
//! diffs successive snapshots into move events. The windowed UI, camera
//! lifecycle and frame cadence are external collaborators: they hand a frame
//! in and get a [`FrameAnalysis`] back.
//!
//! ## Quickstart
//!
//! ```no_run
//! use std::time::Instant;
//! use board_watch::{BoardWatcher, WatcherParams};
//! use board_watch::core::RgbFrameView;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut watcher = BoardWatcher::new(WatcherParams::default());
//!
//! let (width, height) = (640usize, 480usize);
//! let pixels = vec![0u8; width * height * 3];
//! let frame = RgbFrameView::new(width, height, &pixels)?;
//!
//! let analysis = watcher.analyze(&frame, Instant::now());
//! println!("status: {:?}, moves: {}", analysis.status, analysis.moves.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - [`core`]: image views, lattice types, extrapolation, square mapping.
//! - [`detect`]: interior-corner lattice detection.
//! - [`track`]: occupancy classification and move tracking.

pub use board_watch_core as core;
pub use board_watch_detect as detect;
pub use board_watch_track as track;

mod annotate;
mod params;
mod pipeline;

pub use annotate::render_overlay;
pub use params::WatcherParams;
pub use pipeline::{BoardWatcher, FrameAnalysis, FrameStatus};

pub use board_watch_core::{
    FullLattice, InteriorLattice, PatternSize, RgbFrame, RgbFrameView, Square, SquareId,
};
pub use board_watch_track::{BoardSnapshot, MoveEvent, MoveKind, Occupant, OccupancyStat};
