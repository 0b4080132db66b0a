//! Frame preprocessing ahead of text and sign recognition.
//!
//! [`preprocess`] resamples a bitmap by a fixed factor and binarizes it on
//! the mean of its color channels. It is pure: the input is only read, and
//! the same input and options always give byte-identical output.

mod binarize;
mod crop;
mod encode;

pub use binarize::{binarize_in_place, is_two_level};
pub use crop::{crop_and_resize, Region, SIGN_INPUT_SIZE, SIGN_REGION};
pub use encode::{decode_png, encode_jpeg, encode_png, JPEG_QUALITY};

use crate::camera::{resize_frame, Frame, Resolution};
use crate::error::ErrorKind;

/// Default resampling factor.
pub const DEFAULT_SCALE: f64 = 1.3;

/// Default binarization threshold on the channel mean.
pub const DEFAULT_THRESHOLD: u8 = 140;

/// Largest output bitmap [`preprocess`] will allocate, in pixels.
pub const MAX_OUTPUT_PIXELS: u64 = 8192 * 8192;

/// Parameters for [`preprocess`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessOptions {
    /// Resampling factor applied to both dimensions
    pub scale: f64,
    /// Pixels with channel mean `<= threshold` become black
    pub threshold: u8,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl PreprocessOptions {
    pub fn validate(&self) -> Result<(), PreprocessError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(PreprocessError::InvalidOptions(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        Ok(())
    }

    /// Output size for an input of `input` size: each side scaled and
    /// truncated, never below one pixel.
    ///
    /// Fails when a side overflows `u32` or the area exceeds
    /// [`MAX_OUTPUT_PIXELS`].
    pub fn target_resolution(&self, input: Resolution) -> Result<Resolution, PreprocessError> {
        let too_large = || {
            PreprocessError::InvalidOptions(format!(
                "scale {} turns {} into more than {} pixels",
                self.scale, input, MAX_OUTPUT_PIXELS
            ))
        };
        let scale_side = |side: u32| {
            let scaled = (side as f64 * self.scale).floor();
            if scaled > u32::MAX as f64 {
                None
            } else {
                Some((scaled as u32).max(1))
            }
        };

        let width = scale_side(input.width).ok_or_else(too_large)?;
        let height = scale_side(input.height).ok_or_else(too_large)?;
        match (width as u64).checked_mul(height as u64) {
            Some(pixels) if pixels <= MAX_OUTPUT_PIXELS => Ok(Resolution::new(width, height)),
            _ => Err(too_large()),
        }
    }
}

/// A resampled, two-level frame ready for a recognizer.
#[derive(Debug, Clone)]
pub struct NormalizedFrame {
    frame: Frame,
    threshold: u8,
}

impl NormalizedFrame {
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn into_frame(self) -> Frame {
        self.frame
    }

    pub fn resolution(&self) -> Resolution {
        self.frame.resolution()
    }

    /// Threshold the frame was binarized with.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Encode as PNG for transport.
    pub fn to_png(&self) -> Result<Vec<u8>, PreprocessError> {
        encode_png(&self.frame)
    }
}

/// Errors from preprocessing and frame encoding.
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    #[error("Invalid preprocessing options: {0}")]
    InvalidOptions(String),

    #[error("Frame buffer does not match its dimensions")]
    MalformedFrame,

    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

impl PreprocessError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// Resample `frame` by `options.scale` and binarize it at `options.threshold`.
///
/// # Errors
/// * `PreprocessError::InvalidOptions` - non-positive or non-finite scale, or
///   a scale whose output would exceed [`MAX_OUTPUT_PIXELS`]
/// * `PreprocessError::MalformedFrame` - buffer length disagrees with dimensions
pub fn preprocess(
    frame: &Frame,
    options: &PreprocessOptions,
) -> Result<NormalizedFrame, PreprocessError> {
    options.validate()?;
    if !frame.is_consistent() {
        return Err(PreprocessError::MalformedFrame);
    }

    let target = options.target_resolution(frame.resolution())?;
    let mut out = resize_frame(frame, target).ok_or(PreprocessError::MalformedFrame)?;
    binarize_in_place(&mut out.data, out.format, options.threshold);

    log::debug!(
        "Preprocessed {} -> {} at threshold {}",
        frame.resolution(),
        target,
        options.threshold
    );

    Ok(NormalizedFrame {
        frame: out,
        threshold: options.threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FrameFormat;

    #[test]
    fn test_default_options() {
        let opts = PreprocessOptions::default();
        assert_eq!(opts.scale, 1.3);
        assert_eq!(opts.threshold, 140);
    }

    #[test]
    fn test_target_resolution_truncates() {
        let opts = PreprocessOptions::default();
        assert_eq!(
            opts.target_resolution(Resolution::new(640, 480)).unwrap(),
            Resolution::new(832, 624)
        );
        assert_eq!(
            opts.target_resolution(Resolution::new(3, 1)).unwrap(),
            Resolution::new(3, 1)
        );
    }

    #[test]
    fn test_target_resolution_never_zero() {
        let opts = PreprocessOptions {
            scale: 0.01,
            threshold: 140,
        };
        assert_eq!(
            opts.target_resolution(Resolution::new(10, 10)).unwrap(),
            Resolution::new(1, 1)
        );
    }

    #[test]
    fn test_target_resolution_bounded() {
        let opts = PreprocessOptions {
            scale: 1e12,
            threshold: 140,
        };
        assert!(matches!(
            opts.target_resolution(Resolution::new(10, 10)),
            Err(PreprocessError::InvalidOptions(_))
        ));

        let opts = PreprocessOptions {
            scale: 2.0,
            threshold: 140,
        };
        assert_eq!(
            opts.target_resolution(Resolution::new(4096, 4096)).unwrap(),
            Resolution::new(8192, 8192)
        );
        assert!(opts.target_resolution(Resolution::new(4097, 4096)).is_err());
    }

    #[test]
    fn test_invalid_scale_is_rejected() {
        let frame = Frame::filled(2, 2, FrameFormat::Rgb, &[0, 0, 0]);
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let opts = PreprocessOptions {
                scale,
                threshold: 140,
            };
            assert!(matches!(
                preprocess(&frame, &opts),
                Err(PreprocessError::InvalidOptions(_))
            ));
        }
    }

    #[test]
    fn test_mid_gray_becomes_black() {
        let frame = Frame::filled(100, 100, FrameFormat::Rgb, &[128, 128, 128]);
        let opts = PreprocessOptions {
            scale: 1.0,
            threshold: 140,
        };
        let out = preprocess(&frame, &opts).unwrap();
        assert_eq!(out.resolution(), Resolution::new(100, 100));
        assert!(out.frame().data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_output_is_scaled_and_two_level() {
        let mut frame = Frame::filled(10, 10, FrameFormat::Rgb, &[30, 30, 30]);
        for px in frame.data.chunks_exact_mut(3).take(50) {
            px.copy_from_slice(&[220, 220, 220]);
        }
        let out = preprocess(&frame, &PreprocessOptions::default()).unwrap();
        assert_eq!(out.resolution(), Resolution::new(13, 13));
        assert!(is_two_level(&out.frame().data, FrameFormat::Rgb));
    }

    #[test]
    fn test_source_is_untouched() {
        let frame = Frame::filled(4, 4, FrameFormat::Rgba, &[200, 200, 200, 99]);
        let before = frame.data.clone();
        let out = preprocess(&frame, &PreprocessOptions::default()).unwrap();
        assert_eq!(frame.data, before);
        assert!(out
            .frame()
            .data
            .chunks_exact(4)
            .all(|px| px == [255, 255, 255, 99]));
    }
}
