//! Frame conversion and transformation utilities.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, Rgb, Rgba};
use std::time::Instant;

use super::types::{Frame, FrameFormat, Resolution};

/// Convert a frame into an `image` buffer.
///
/// Returns `None` if the buffer length does not match the frame dimensions.
pub fn to_dynamic(frame: &Frame) -> Option<DynamicImage> {
    match frame.format {
        FrameFormat::Rgb => {
            ImageBuffer::<Rgb<u8>, _>::from_raw(frame.width, frame.height, frame.data.clone())
                .map(DynamicImage::ImageRgb8)
        }
        FrameFormat::Rgba => {
            ImageBuffer::<Rgba<u8>, _>::from_raw(frame.width, frame.height, frame.data.clone())
                .map(DynamicImage::ImageRgba8)
        }
    }
}

/// Convert a decoded image into a frame, keeping alpha only if the source has it.
pub fn from_dynamic(image: DynamicImage) -> Frame {
    let (width, height) = (image.width(), image.height());
    let (data, format) = if image.color().has_alpha() {
        (image.into_rgba8().into_raw(), FrameFormat::Rgba)
    } else {
        (image.into_rgb8().into_raw(), FrameFormat::Rgb)
    };

    Frame {
        data,
        width,
        height,
        format,
        captured_at: Instant::now(),
    }
}

/// Resample a frame to `target` using bilinear filtering.
///
/// Returns a copy unchanged when the frame already has the target size,
/// and `None` if the frame buffer is inconsistent.
pub fn resize_frame(frame: &Frame, target: Resolution) -> Option<Frame> {
    if frame.resolution() == target {
        return frame.is_consistent().then(|| frame.clone());
    }

    let resized = match frame.format {
        FrameFormat::Rgb => {
            let buf = ImageBuffer::<Rgb<u8>, _>::from_raw(
                frame.width,
                frame.height,
                frame.data.as_slice(),
            )?;
            imageops::resize(&buf, target.width, target.height, FilterType::Triangle).into_raw()
        }
        FrameFormat::Rgba => {
            let buf = ImageBuffer::<Rgba<u8>, _>::from_raw(
                frame.width,
                frame.height,
                frame.data.as_slice(),
            )?;
            imageops::resize(&buf, target.width, target.height, FilterType::Triangle).into_raw()
        }
    };

    Some(Frame {
        data: resized,
        width: target.width,
        height: target.height,
        format: frame.format,
        captured_at: frame.captured_at,
    })
}

/// Mirror a frame horizontally (flip left-right) for selfie mode.
pub fn mirror_horizontal(frame: &mut Frame) {
    let width = frame.width as usize;
    let height = frame.height as usize;
    let bpp = frame.bytes_per_pixel();

    for y in 0..height {
        let row_start = y * width * bpp;
        let row = &mut frame.data[row_start..row_start + width * bpp];

        for x in 0..width / 2 {
            let left = x * bpp;
            let right = (width - 1 - x) * bpp;
            for i in 0..bpp {
                row.swap(left + i, right + i);
            }
        }
    }
}

/// Convert a nokhwa buffer to an RGB frame.
#[cfg(feature = "native-camera")]
pub fn convert_to_rgb(buffer: &nokhwa::Buffer) -> Option<Frame> {
    use nokhwa::pixel_format::RgbFormat;

    let decoded = buffer.decode_image::<RgbFormat>().ok()?;
    let resolution = buffer.resolution();

    Some(Frame {
        data: decoded.into_raw(),
        width: resolution.width(),
        height: resolution.height(),
        format: FrameFormat::Rgb,
        captured_at: Instant::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_frame(data: Vec<u8>, width: u32, height: u32) -> Frame {
        Frame::from_raw(data, width, height, FrameFormat::Rgb).unwrap()
    }

    #[test]
    fn test_mirror_horizontal_2x1() {
        let mut frame = rgb_frame(vec![1, 2, 3, 4, 5, 6], 2, 1);
        mirror_horizontal(&mut frame);
        assert_eq!(frame.data, vec![4, 5, 6, 1, 2, 3]);
    }

    #[test]
    fn test_mirror_horizontal_rgba_keeps_pixels_whole() {
        let mut frame =
            Frame::from_raw(vec![1, 2, 3, 10, 4, 5, 6, 20], 2, 1, FrameFormat::Rgba).unwrap();
        mirror_horizontal(&mut frame);
        assert_eq!(frame.data, vec![4, 5, 6, 20, 1, 2, 3, 10]);
    }

    #[test]
    fn test_resize_same_size_is_identity() {
        let frame = rgb_frame((0..12).collect(), 2, 2);
        let out = resize_frame(&frame, Resolution::new(2, 2)).unwrap();
        assert_eq!(out.data, frame.data);
    }

    #[test]
    fn test_resize_changes_dimensions() {
        let frame = Frame::filled(4, 2, FrameFormat::Rgb, &[200, 100, 50]);
        let out = resize_frame(&frame, Resolution::new(8, 4)).unwrap();
        assert_eq!((out.width, out.height), (8, 4));
        assert_eq!(out.data.len(), 8 * 4 * 3);
        // Uniform input stays uniform under bilinear filtering
        assert!(out.data.chunks_exact(3).all(|p| p == [200, 100, 50]));
    }

    #[test]
    fn test_resize_rejects_inconsistent_buffer() {
        let mut frame = Frame::filled(2, 2, FrameFormat::Rgb, &[0, 0, 0]);
        frame.data.pop();
        assert!(resize_frame(&frame, Resolution::new(4, 4)).is_none());
        assert!(resize_frame(&frame, Resolution::new(2, 2)).is_none());
    }

    #[test]
    fn test_dynamic_round_trip_keeps_alpha() {
        let frame = Frame::filled(3, 1, FrameFormat::Rgba, &[9, 8, 7, 6]);
        let back = from_dynamic(to_dynamic(&frame).unwrap());
        assert_eq!(back.format, FrameFormat::Rgba);
        assert_eq!(back.data, frame.data);
    }
}
