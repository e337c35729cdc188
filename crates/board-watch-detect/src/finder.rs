//! End-to-end interior-corner lattice finder.

use chess_corners::{find_chess_corners_image, ChessConfig, CornerDescriptor, ThresholdMode};
use log::debug;

use board_watch_core::{GrayImageView, InteriorLattice};

use crate::corner::RawCorner;
use crate::gridgraph::GridGraph;
use crate::lattice_fit::fit_complete_grid;
use crate::params::CornerFinderParams;
use crate::refine::refine_subpixel;

fn adapt_corner(c: &CornerDescriptor) -> RawCorner {
    // The dark/light diagonal bisects the dark sector spanned by the two
    // reported axis angles (see the CornerDescriptor polarity convention).
    let orientation = 0.5 * (c.axes[0].angle + c.axes[1].angle);
    RawCorner::new(c.x, c.y, orientation, c.response)
}

/// Locates the interior corner lattice of the board in a grayscale frame.
pub struct CornerFinder {
    params: CornerFinderParams,
}

impl CornerFinder {
    pub fn new(params: CornerFinderParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &CornerFinderParams {
        &self.params
    }

    fn chess_config(&self) -> ChessConfig {
        let mut cfg = ChessConfig::single_scale();
        cfg.threshold_mode = ThresholdMode::Relative;
        cfg.threshold_value = self.params.threshold_rel;
        cfg.nms_radius = self.params.nms_radius;
        cfg
    }

    /// Run the full detection: ChESS corners, grid ordering, refinement.
    ///
    /// `None` is the normal not-found outcome, expected on most frames.
    pub fn find(&self, gray: &GrayImageView<'_>) -> Option<InteriorLattice> {
        let img = ::image::GrayImage::from_raw(
            gray.width as u32,
            gray.height as u32,
            gray.data.to_vec(),
        )?;
        let cfg = self.chess_config();
        let corners: Vec<RawCorner> = find_chess_corners_image(&img, &cfg)
            .ok()?
            .iter()
            .map(adapt_corner)
            .collect();
        self.find_in_corners(&corners, Some(gray))
    }

    /// Grid ordering and refinement on an already-detected corner cloud.
    ///
    /// Exposed separately so the ordering logic can be driven by synthetic
    /// corner clouds; refinement is skipped when no image is provided.
    pub fn find_in_corners(
        &self,
        corners: &[RawCorner],
        gray: Option<&GrayImageView<'_>>,
    ) -> Option<InteriorLattice> {
        let strong: Vec<RawCorner> = corners
            .iter()
            .copied()
            .filter(|c| c.strength >= self.params.min_strength)
            .collect();
        debug!(
            "{} of {} corners pass the strength filter",
            strong.len(),
            corners.len()
        );

        if strong.len() < self.params.pattern.point_count() {
            return None;
        }

        let graph = GridGraph::build(&strong, &self.params.graph);
        let points = fit_complete_grid(&strong, &graph, self.params.pattern)?;

        let points = match gray {
            Some(img) => points
                .iter()
                .map(|&p| refine_subpixel(img, p, &self.params.refine))
                .collect(),
            None => points,
        };

        match InteriorLattice::from_points(self.params.pattern, points) {
            Ok(lattice) => Some(lattice),
            Err(err) => {
                // Point count is rows*cols by construction; reaching this
                // arm means a bug in the fitting stage.
                log::error!("lattice construction failed: {err}");
                None
            }
        }
    }
}
