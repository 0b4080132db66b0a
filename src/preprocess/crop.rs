//! Region cropping for the sign-language webcam flow.

use crate::camera::{resize_frame, Frame, Resolution};

/// Area of the frame the hand is expected in: a 200x200 square at (100, 100).
pub const SIGN_REGION: Region = Region {
    x: 100,
    y: 100,
    width: 200,
    height: 200,
};

/// Input size of the sign-language classifier.
pub const SIGN_INPUT_SIZE: Resolution = Resolution {
    width: 64,
    height: 64,
};

/// A rectangle in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Clamp the region to a frame of `bounds`. Returns `None` if nothing
    /// of the region lies inside the frame.
    pub fn clamp_to(&self, bounds: Resolution) -> Option<Region> {
        if self.x >= bounds.width || self.y >= bounds.height {
            return None;
        }
        let width = self.width.min(bounds.width - self.x);
        let height = self.height.min(bounds.height - self.y);
        if width == 0 || height == 0 {
            return None;
        }
        Some(Region {
            x: self.x,
            y: self.y,
            width,
            height,
        })
    }
}

/// Cut `region` out of `frame` and scale it to `size`.
///
/// Returns `None` if the region misses the frame entirely or the frame
/// buffer is inconsistent.
pub fn crop_and_resize(frame: &Frame, region: Region, size: Resolution) -> Option<Frame> {
    if !frame.is_consistent() {
        return None;
    }
    let region = region.clamp_to(frame.resolution())?;
    let bpp = frame.bytes_per_pixel();
    let stride = frame.width as usize * bpp;

    let mut data = Vec::with_capacity(region.width as usize * region.height as usize * bpp);
    for row in region.y..region.y + region.height {
        let start = row as usize * stride + region.x as usize * bpp;
        data.extend_from_slice(&frame.data[start..start + region.width as usize * bpp]);
    }

    let cropped = Frame {
        data,
        width: region.width,
        height: region.height,
        format: frame.format,
        captured_at: frame.captured_at,
    };
    resize_frame(&cropped, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FrameFormat;

    #[test]
    fn test_clamp_inside() {
        let r = SIGN_REGION.clamp_to(Resolution::VGA).unwrap();
        assert_eq!(r, SIGN_REGION);
    }

    #[test]
    fn test_clamp_partial() {
        let r = SIGN_REGION.clamp_to(Resolution::new(150, 400)).unwrap();
        assert_eq!((r.width, r.height), (50, 200));
    }

    #[test]
    fn test_clamp_outside() {
        assert!(SIGN_REGION.clamp_to(Resolution::new(100, 100)).is_none());
    }

    #[test]
    fn test_crop_picks_the_right_pixels() {
        // 3x2 frame, pixel value = index
        let frame = Frame::from_raw(
            vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4, 5, 5, 5],
            3,
            2,
            FrameFormat::Rgb,
        )
        .unwrap();
        let region = Region {
            x: 1,
            y: 1,
            width: 2,
            height: 1,
        };
        let out = crop_and_resize(&frame, region, Resolution::new(2, 1)).unwrap();
        assert_eq!(out.data, vec![4, 4, 4, 5, 5, 5]);
    }

    #[test]
    fn test_crop_sign_region_to_classifier_size() {
        let frame = Frame::filled(640, 480, FrameFormat::Rgb, &[50, 60, 70]);
        let out = crop_and_resize(&frame, SIGN_REGION, SIGN_INPUT_SIZE).unwrap();
        assert_eq!(out.resolution(), SIGN_INPUT_SIZE);
        assert_eq!(out.data.len(), 64 * 64 * 3);
    }
}
