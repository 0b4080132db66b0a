//! Two-level thresholding on the mean of the color channels.

use crate::camera::FrameFormat;

/// Replace every pixel with black or white in place.
///
/// A pixel becomes black when `(r + g + b) / 3 <= threshold` and white
/// otherwise. The comparison is done on the channel sum so the fractional
/// mean never needs rounding. Alpha, if present, is not touched.
pub fn binarize_in_place(data: &mut [u8], format: FrameFormat, threshold: u8) {
    let bpp = format.bytes_per_pixel();
    let limit = 3 * threshold as u32;

    for px in data.chunks_exact_mut(bpp) {
        let sum = px[0] as u32 + px[1] as u32 + px[2] as u32;
        let level = if sum <= limit { 0 } else { 255 };
        px[0] = level;
        px[1] = level;
        px[2] = level;
    }
}

/// True when every pixel's color channels are all 0 or all 255.
pub fn is_two_level(data: &[u8], format: FrameFormat) -> bool {
    data.chunks_exact(format.bytes_per_pixel())
        .all(|px| px[..3] == [0, 0, 0] || px[..3] == [255, 255, 255])
}
