//! Occupied/empty decision for one square's pixel region.
//!
//! Two statistics are supported as an explicit, selectable strategy:
//!
//! - `ForegroundRatio`: Otsu-binarize the region (inverted, dark pixels are
//!   foreground), then compare the foreground fraction against a threshold.
//! - `StdDev`: compare the region's intensity standard deviation against a
//!   threshold, as a proxy for an edge-rich object versus a flat square.

use serde::{Deserialize, Serialize};

use board_watch_core::{GrayImageView, PixelRect};

/// Which statistic decides occupancy, with its calibration threshold.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum OccupancyStat {
    /// Foreground-pixel fraction after Otsu binarization.
    ForegroundRatio { threshold: f32 },
    /// Population standard deviation of region intensities.
    StdDev { threshold: f32 },
}

impl Default for OccupancyStat {
    fn default() -> Self {
        OccupancyStat::ForegroundRatio { threshold: 0.05 }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OccupancyClassifier {
    stat: OccupancyStat,
}

impl OccupancyClassifier {
    pub fn new(stat: OccupancyStat) -> Self {
        Self { stat }
    }

    pub fn stat(&self) -> OccupancyStat {
        self.stat
    }

    /// Decide occupancy for the given region of the frame.
    ///
    /// A zero-area region or one without any intensity variation is always
    /// unoccupied, regardless of the configured statistic or threshold; no
    /// statistic is computed in that case.
    pub fn is_occupied(&self, gray: &GrayImageView<'_>, bounds: PixelRect) -> bool {
        if bounds.is_empty() {
            return false;
        }

        let mut hist = [0u32; 256];
        let mut min = u8::MAX;
        let mut max = u8::MIN;
        let mut total = 0u32;
        for y in bounds.y..bounds.y + bounds.h {
            for x in bounds.x..bounds.x + bounds.w {
                let v = gray.get(x as i32, y as i32);
                hist[v as usize] += 1;
                min = min.min(v);
                max = max.max(v);
                total += 1;
            }
        }
        if total == 0 || min == max {
            return false;
        }

        match self.stat {
            OccupancyStat::ForegroundRatio { threshold } => {
                let t = otsu_threshold(&hist, total);
                // Inverted binarization: dark pixels count as foreground.
                let foreground: u32 = hist[..=t as usize].iter().sum();
                foreground as f32 / total as f32 > threshold
            }
            OccupancyStat::StdDev { threshold } => std_dev(&hist, total) > threshold,
        }
    }
}

/// Otsu's threshold: maximize between-class variance over the histogram.
fn otsu_threshold(hist: &[u32; 256], total: u32) -> u8 {
    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(v, &n)| v as f64 * n as f64)
        .sum();

    let mut weight_bg = 0f64;
    let mut sum_bg = 0f64;
    let mut best_t = 0u8;
    let mut best_var = f64::NEG_INFINITY;

    for t in 0..256usize {
        weight_bg += hist[t] as f64;
        if weight_bg == 0.0 {
            continue;
        }
        let weight_fg = total as f64 - weight_bg;
        if weight_fg == 0.0 {
            break;
        }
        sum_bg += t as f64 * hist[t] as f64;

        let mean_bg = sum_bg / weight_bg;
        let mean_fg = (sum_all - sum_bg) / weight_fg;
        let between = weight_bg * weight_fg * (mean_bg - mean_fg).powi(2);
        if between > best_var {
            best_var = between;
            best_t = t as u8;
        }
    }

    best_t
}

fn std_dev(hist: &[u32; 256], total: u32) -> f32 {
    let n = total as f64;
    let mean: f64 = hist
        .iter()
        .enumerate()
        .map(|(v, &c)| v as f64 * c as f64)
        .sum::<f64>()
        / n;
    let var: f64 = hist
        .iter()
        .enumerate()
        .map(|(v, &c)| (v as f64 - mean).powi(2) * c as f64)
        .sum::<f64>()
        / n;
    var.sqrt() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_watch_core::GrayImage;

    fn flat_image(w: usize, h: usize, value: u8) -> GrayImage {
        GrayImage {
            width: w,
            height: h,
            data: vec![value; w * h],
        }
    }

    fn full_rect(img: &GrayImage) -> PixelRect {
        PixelRect {
            x: 0,
            y: 0,
            w: img.width as u32,
            h: img.height as u32,
        }
    }

    /// Flat background with a dark square blob covering roughly a quarter
    /// of the region.
    fn blob_image(w: usize, h: usize) -> GrayImage {
        let mut img = flat_image(w, h, 200);
        for y in h / 4..h / 2 {
            for x in w / 4..w / 2 {
                img.data[y * w + x] = 20;
            }
        }
        img
    }

    #[test]
    fn flat_region_is_unoccupied_under_both_stats() {
        let img = flat_image(20, 20, 128);
        let rect = full_rect(&img);
        let ratio = OccupancyClassifier::new(OccupancyStat::ForegroundRatio { threshold: 0.0 });
        let stddev = OccupancyClassifier::new(OccupancyStat::StdDev { threshold: 0.0 });
        assert!(!ratio.is_occupied(&img.view(), rect));
        assert!(!stddev.is_occupied(&img.view(), rect));
    }

    #[test]
    fn zero_area_region_is_unoccupied() {
        let img = blob_image(20, 20);
        let classifier = OccupancyClassifier::default();
        let empty = PixelRect {
            x: 5,
            y: 5,
            w: 0,
            h: 3,
        };
        assert!(!classifier.is_occupied(&img.view(), empty));
    }

    #[test]
    fn dark_blob_trips_the_ratio_stat() {
        let img = blob_image(20, 20);
        let classifier = OccupancyClassifier::new(OccupancyStat::ForegroundRatio { threshold: 0.05 });
        assert!(classifier.is_occupied(&img.view(), full_rect(&img)));
    }

    #[test]
    fn dark_blob_trips_the_stddev_stat() {
        let img = blob_image(20, 20);
        let classifier = OccupancyClassifier::new(OccupancyStat::StdDev { threshold: 25.0 });
        assert!(classifier.is_occupied(&img.view(), full_rect(&img)));
    }

    #[test]
    fn blob_outside_the_region_is_not_seen() {
        let img = blob_image(40, 40);
        let classifier = OccupancyClassifier::default();
        // Region in the lower-right quadrant, away from the blob.
        let rect = PixelRect {
            x: 25,
            y: 25,
            w: 10,
            h: 10,
        };
        assert!(!classifier.is_occupied(&img.view(), rect));
    }

    #[test]
    fn otsu_separates_a_bimodal_histogram() {
        let mut hist = [0u32; 256];
        hist[20] = 100;
        hist[200] = 300;
        let t = otsu_threshold(&hist, 400);
        assert!((20..200).contains(&(t as usize)));
    }
}
