//! Tests for accepting uploaded, pasted and captured images.

use std::io::Write;

use signlens::camera::{Frame, FrameFormat, Resolution};
use signlens::input::{ImageEncoding, InputError, InputLimits, InputSource, UploadedImage};
use signlens::preprocess::{encode_jpeg, encode_png};
use signlens::ErrorKind;

fn small_png() -> Vec<u8> {
    encode_png(&Frame::filled(6, 4, FrameFormat::Rgb, &[10, 200, 30])).unwrap()
}

#[test]
fn test_twelve_megabytes_is_too_large() {
    let bytes = vec![0u8; 12 * 1024 * 1024];
    let err = UploadedImage::from_bytes(bytes, Some("image/jpeg"), &InputLimits::default())
        .unwrap_err();
    assert!(matches!(err, InputError::TooLarge { .. }));
    assert_eq!(err.kind(), ErrorKind::TooLarge);
}

#[test]
fn test_size_checked_before_type() {
    let bytes = vec![0u8; 64];
    let limits = InputLimits { max_bytes: 16 };
    let err = UploadedImage::from_bytes(bytes, Some("image/gif"), &limits).unwrap_err();
    assert!(matches!(err, InputError::TooLarge { size: 64, limit: 16 }));
}

#[test]
fn test_exactly_at_limit_is_accepted() {
    let png = small_png();
    let limits = InputLimits {
        max_bytes: png.len() as u64,
    };
    assert!(UploadedImage::from_bytes(png, None, &limits).is_ok());
}

#[test]
fn test_declared_gif_is_rejected() {
    let err = UploadedImage::from_bytes(small_png(), Some("image/gif"), &InputLimits::default())
        .unwrap_err();
    assert!(matches!(err, InputError::UnsupportedType(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_garbage_is_unrecognized() {
    let err = UploadedImage::from_bytes(
        b"definitely not an image".to_vec(),
        None,
        &InputLimits::default(),
    )
    .unwrap_err();
    assert!(matches!(err, InputError::Unrecognized));
}

#[test]
fn test_empty_is_rejected() {
    let err = UploadedImage::from_bytes(Vec::new(), None, &InputLimits::default()).unwrap_err();
    assert!(matches!(err, InputError::Empty));
}

#[test]
fn test_png_upload_decodes() {
    let image = UploadedImage::from_bytes(small_png(), Some("image/png"), &InputLimits::default())
        .unwrap();
    assert_eq!(image.encoding(), ImageEncoding::Png);
    assert_eq!(image.source(), InputSource::File);
    assert_eq!(image.frame().resolution(), Resolution::new(6, 4));
    assert_eq!(&image.frame().data[..3], &[10, 200, 30]);
}

#[test]
fn test_file_on_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("sign.png");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(&small_png())
        .unwrap();

    let image = UploadedImage::from_path(&path, &InputLimits::default()).unwrap();
    assert_eq!(image.file_name(), "sign.png");
    assert_eq!(image.encoding().mime(), "image/png");
}

#[test]
fn test_oversized_file_on_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("big.jpg");
    std::fs::write(&path, vec![0u8; 2048]).unwrap();

    let err = UploadedImage::from_path(&path, &InputLimits { max_bytes: 1024 }).unwrap_err();
    assert!(matches!(err, InputError::TooLarge { size: 2048, .. }));
}

#[test]
fn test_missing_file() {
    let err = UploadedImage::from_path(
        std::path::Path::new("/nonexistent/sign.png"),
        &InputLimits::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn test_clipboard_needs_image_item() {
    let err = UploadedImage::from_clipboard(small_png(), "text/plain", &InputLimits::default())
        .unwrap_err();
    assert!(matches!(err, InputError::UnsupportedType(_)));

    let image = UploadedImage::from_clipboard(small_png(), "image/png", &InputLimits::default())
        .unwrap();
    assert_eq!(image.source(), InputSource::Clipboard);
}

#[test]
fn test_jpeg_sniffed_without_declared_type() {
    let jpeg = encode_jpeg(&Frame::filled(8, 8, FrameFormat::Rgb, &[50, 50, 50])).unwrap();
    let image = UploadedImage::from_bytes(jpeg, None, &InputLimits::default()).unwrap();
    assert_eq!(image.encoding(), ImageEncoding::Jpeg);
    assert_eq!(image.frame().resolution(), Resolution::new(8, 8));
}

#[test]
fn test_camera_frame_becomes_jpeg_upload() {
    let frame = Frame::filled(32, 24, FrameFormat::Rgb, &[90, 90, 90]);
    let image = UploadedImage::from_frame(frame, &InputLimits::default()).unwrap();
    assert_eq!(image.encoding(), ImageEncoding::Jpeg);
    assert_eq!(image.source(), InputSource::Camera);
    assert_eq!(image.file_name(), "camera.jpg");
    assert!(image.bytes().starts_with(&[0xFF, 0xD8]));
}
