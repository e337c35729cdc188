use nalgebra::Point2;

/// A raw detected corner candidate, before any grid ordering.
#[derive(Clone, Copy, Debug)]
pub struct RawCorner {
    /// Subpixel position in image coordinates.
    pub position: Point2<f32>,
    /// Direction of the dark/light diagonal at the corner, radians, modulo pi.
    pub orientation: f32,
    /// Detector response; higher is stronger.
    pub strength: f32,
}

impl RawCorner {
    pub fn new(x: f32, y: f32, orientation: f32, strength: f32) -> Self {
        Self {
            position: Point2::new(x, y),
            orientation,
            strength,
        }
    }
}
