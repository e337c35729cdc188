//! Borrowed image views and the owned buffers the pipeline hands back.
//!
//! The camera collaborator supplies one decoded frame per invocation as an
//! interleaved 8-bit RGB buffer. Everything downstream works on a grayscale
//! view derived from it.

use thiserror::Error;

/// Errors raised when wrapping raw pixel buffers.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("invalid frame buffer length (expected {expected} bytes, got {got})")]
    InvalidBufferLength { expected: usize, got: usize },
}

/// Borrowed single-channel 8-bit image, row-major, `len = width * height`.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

/// Owned single-channel 8-bit image.
#[derive(Clone, Debug)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

impl<'a> GrayImageView<'a> {
    /// Pixel access with zero padding outside the image.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return 0;
        }
        self.data[y as usize * self.width + x as usize]
    }
}

/// Bilinear sample at a subpixel position.
#[inline]
pub fn sample_bilinear(src: &GrayImageView<'_>, x: f32, y: f32) -> f32 {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = src.get(x0, y0) as f32;
    let p10 = src.get(x0 + 1, y0) as f32;
    let p01 = src.get(x0, y0 + 1) as f32;
    let p11 = src.get(x0 + 1, y0 + 1) as f32;

    let a = p00 + fx * (p10 - p00);
    let b = p01 + fx * (p11 - p01);
    a + fy * (b - a)
}

/// Borrowed interleaved RGB frame, 8 bits per channel, `len = width * height * 3`.
#[derive(Clone, Copy, Debug)]
pub struct RgbFrameView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

impl<'a> RgbFrameView<'a> {
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, FrameError> {
        let expected = width * height * 3;
        if data.len() != expected {
            return Err(FrameError::InvalidBufferLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert to grayscale using Rec.601 luma weights (integer arithmetic).
    pub fn to_gray(&self) -> GrayImage {
        let mut data = Vec::with_capacity(self.width * self.height);
        for px in self.data.chunks_exact(3) {
            let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
            data.push(((77 * r + 150 * g + 29 * b) >> 8) as u8);
        }
        GrayImage {
            width: self.width,
            height: self.height,
            data,
        }
    }

    /// Owned copy, e.g. as the base for an annotated output frame.
    pub fn to_owned_frame(&self) -> RgbFrame {
        RgbFrame {
            width: self.width,
            height: self.height,
            data: self.data.to_vec(),
        }
    }
}

/// Owned interleaved RGB frame.
#[derive(Clone, Debug)]
pub struct RgbFrame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbFrame {
    /// Set one pixel; out-of-bounds coordinates are ignored.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 3;
        self.data[idx..idx + 3].copy_from_slice(&rgb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_buffer_length() {
        let buf = vec![0u8; 10];
        assert!(RgbFrameView::new(4, 4, &buf).is_err());
    }

    #[test]
    fn gray_conversion_matches_luma_weights() {
        let buf = vec![255u8, 255, 255, 0, 0, 0];
        let frame = RgbFrameView::new(2, 1, &buf).unwrap();
        let gray = frame.to_gray();
        assert_eq!(gray.data, vec![255, 0]);
    }

    #[test]
    fn bilinear_interpolates_between_pixels() {
        let img = GrayImage {
            width: 2,
            height: 1,
            data: vec![0, 100],
        };
        let v = sample_bilinear(&img.view(), 0.5, 0.0);
        assert!((v - 50.0).abs() < 1e-4);
    }

    #[test]
    fn put_ignores_out_of_bounds() {
        let mut frame = RgbFrame {
            width: 2,
            height: 2,
            data: vec![0; 12],
        };
        frame.put(-1, 0, [255, 0, 0]);
        frame.put(5, 5, [255, 0, 0]);
        assert!(frame.data.iter().all(|&b| b == 0));
        frame.put(1, 1, [1, 2, 3]);
        assert_eq!(&frame.data[9..12], &[1, 2, 3]);
    }
}
