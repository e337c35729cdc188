//! Iterative subpixel corner refinement.
//!
//! Classic gradient-orthogonality scheme: at the true corner, the image
//! gradient at every window point is orthogonal to the vector from the
//! corner to that point, which turns the corner position into the solution
//! of a 2x2 normal system accumulated over the window. Iterated until the
//! positional delta drops below `eps` or the iteration cap is hit; both
//! bounds are always enforced so termination is guaranteed.

use nalgebra::{Matrix2, Point2, Vector2};

use board_watch_core::{sample_bilinear, GrayImageView};

use crate::params::RefineParams;

/// Refine a corner position on the grayscale image.
///
/// Returns the input position unchanged when the local structure is
/// degenerate (flat region) or when the solve drifts out of the window.
pub fn refine_subpixel(
    img: &GrayImageView<'_>,
    start: Point2<f32>,
    params: &RefineParams,
) -> Point2<f32> {
    let r = params.window_radius as i32;
    let sigma = (params.window_radius as f32 / 2.0).max(1.0);
    let inv_two_sigma_sq = 1.0 / (2.0 * sigma * sigma);

    let mut center = start;
    for _ in 0..params.max_iters {
        let mut a = Matrix2::<f32>::zeros();
        let mut b = Vector2::<f32>::zeros();

        for dy in -r..=r {
            for dx in -r..=r {
                let px = center.x + dx as f32;
                let py = center.y + dy as f32;

                let gx =
                    (sample_bilinear(img, px + 1.0, py) - sample_bilinear(img, px - 1.0, py)) * 0.5;
                let gy =
                    (sample_bilinear(img, px, py + 1.0) - sample_bilinear(img, px, py - 1.0)) * 0.5;

                let w = (-((dx * dx + dy * dy) as f32) * inv_two_sigma_sq).exp();
                let gxx = w * gx * gx;
                let gxy = w * gx * gy;
                let gyy = w * gy * gy;

                a[(0, 0)] += gxx;
                a[(0, 1)] += gxy;
                a[(1, 0)] += gxy;
                a[(1, 1)] += gyy;
                b.x += gxx * px + gxy * py;
                b.y += gxy * px + gyy * py;
            }
        }

        if a.determinant().abs() < 1e-6 {
            break;
        }
        let Some(inv) = a.try_inverse() else {
            break;
        };

        let solved = inv * b;
        let next = Point2::new(solved.x, solved.y);

        if (next - start).norm() > r as f32 {
            // Diverged out of the refinement window; keep the seed.
            return start;
        }

        let delta = (next - center).norm();
        center = next;
        if delta < params.eps {
            break;
        }
    }

    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_watch_core::GrayImage;

    /// Checkerboard corner at `(cx, cy)` with linear intensity ramps of
    /// half-width `ramp` pixels across both edges.
    fn corner_image(width: usize, height: usize, cx: f32, cy: f32, ramp: f32) -> GrayImage {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let u = ((x as f32 - cx) / ramp).clamp(-1.0, 1.0);
                let v = ((y as f32 - cy) / ramp).clamp(-1.0, 1.0);
                data.push((128.0 + 100.0 * u * v) as u8);
            }
        }
        GrayImage {
            width,
            height,
            data,
        }
    }

    #[test]
    fn stays_at_an_exact_corner() {
        let img = corner_image(41, 41, 20.0, 20.0, 2.0);
        let refined = refine_subpixel(&img.view(), Point2::new(20.0, 20.0), &RefineParams::default());
        assert!((refined - Point2::new(20.0, 20.0)).norm() < 0.1);
    }

    #[test]
    fn converges_from_an_offset_seed() {
        let img = corner_image(41, 41, 20.0, 20.0, 2.0);
        let seed = Point2::new(20.8, 19.4);
        let refined = refine_subpixel(&img.view(), seed, &RefineParams::default());
        let err = (refined - Point2::new(20.0, 20.0)).norm();
        assert!(err < 0.4, "refined corner off by {err}");
    }

    #[test]
    fn flat_region_returns_seed() {
        let img = GrayImage {
            width: 31,
            height: 31,
            data: vec![128; 31 * 31],
        };
        let seed = Point2::new(15.0, 15.0);
        let refined = refine_subpixel(&img.view(), seed, &RefineParams::default());
        assert_eq!(refined, seed);
    }

    #[test]
    fn iteration_cap_terminates() {
        let img = corner_image(41, 41, 20.0, 20.0, 2.0);
        let params = RefineParams {
            max_iters: 1,
            eps: 0.0,
            ..RefineParams::default()
        };
        // eps 0 never triggers the convergence exit; the cap must.
        let _ = refine_subpixel(&img.view(), Point2::new(20.5, 20.5), &params);
    }
}
