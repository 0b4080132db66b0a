//! Encoding frames into byte blobs for the network layer.

use image::codecs::jpeg::JpegEncoder;
use image::ImageFormat;
use std::io::Cursor;

use super::PreprocessError;
use crate::camera::{from_dynamic, to_dynamic, Frame};

/// JPEG quality used for camera snaps sent to classifiers.
pub const JPEG_QUALITY: u8 = 95;

/// Encode a frame as PNG. Lossless, so two-level frames survive exactly.
pub fn encode_png(frame: &Frame) -> Result<Vec<u8>, PreprocessError> {
    let image = to_dynamic(frame).ok_or(PreprocessError::MalformedFrame)?;
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Encode a frame as JPEG, dropping alpha.
pub fn encode_jpeg(frame: &Frame) -> Result<Vec<u8>, PreprocessError> {
    let rgb = to_dynamic(frame)
        .ok_or(PreprocessError::MalformedFrame)?
        .into_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).encode_image(&rgb)?;
    Ok(buf)
}

/// Decode a PNG produced by [`encode_png`].
pub fn decode_png(bytes: &[u8]) -> Result<Frame, PreprocessError> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
    Ok(from_dynamic(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FrameFormat;

    #[test]
    fn test_png_is_lossless() {
        let frame = Frame::from_raw(
            vec![0, 0, 0, 255, 255, 255, 255, 255, 255, 0, 0, 0],
            2,
            2,
            FrameFormat::Rgb,
        )
        .unwrap();
        let png = encode_png(&frame).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let back = decode_png(&png).unwrap();
        assert_eq!(back.resolution(), frame.resolution());
        assert_eq!(back.data, frame.data);
    }

    #[test]
    fn test_jpeg_has_magic_bytes() {
        let frame = Frame::filled(8, 8, FrameFormat::Rgba, &[10, 20, 30, 40]);
        let jpeg = encode_jpeg(&frame).unwrap();
        assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_malformed_frame_is_rejected() {
        let mut frame = Frame::filled(2, 2, FrameFormat::Rgb, &[1, 1, 1]);
        frame.data.truncate(5);
        assert!(matches!(
            encode_png(&frame),
            Err(PreprocessError::MalformedFrame)
        ));
    }
}
