use serde::{Deserialize, Serialize};

use board_watch_detect::CornerFinderParams;
use board_watch_track::{OccupancyStat, TrackerParams};

/// Full configuration of the frame pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WatcherParams {
    /// Interior-lattice detection.
    pub finder: CornerFinderParams,
    /// Occupancy statistic and threshold.
    pub occupancy: OccupancyStat,
    /// Move-diff cadence.
    pub tracker: TrackerParams,
    /// Reuse the last successfully detected lattice on frames where
    /// detection fails (pieces standing on the board routinely occlude the
    /// corner pattern). Disable for a strict per-frame pipeline.
    pub hold_lattice: bool,
    /// Produce an annotated copy of the input frame.
    pub annotate: bool,
}

impl Default for WatcherParams {
    fn default() -> Self {
        Self {
            finder: CornerFinderParams::default(),
            occupancy: OccupancyStat::default(),
            tracker: TrackerParams::default(),
            hold_lattice: true,
            annotate: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_round_trip_through_json() {
        let params = WatcherParams::default();
        let json = serde_json::to_string(&params).unwrap();
        let back: WatcherParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back.hold_lattice, params.hold_lattice);
        assert_eq!(back.finder.pattern, params.finder.pattern);
    }
}
