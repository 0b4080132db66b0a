//! Image input acquisition: uploaded files, clipboard pastes and camera snaps.
//!
//! Everything that reaches the preprocessor or a recognition service goes
//! through [`UploadedImage`], which enforces the size bound and the encoding
//! whitelist before any decoding happens.

use image::ImageFormat;
use std::fmt;
use std::path::Path;

use crate::camera::{from_dynamic, Frame};
use crate::error::ErrorKind;
use crate::preprocess::{encode_jpeg, PreprocessError};

/// Default upload bound: 10 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

/// MIME types accepted for uploads and pastes.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Whitelisted image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    Jpeg,
    Png,
    WebP,
}

impl ImageEncoding {
    pub fn mime(&self) -> &'static str {
        match self {
            ImageEncoding::Jpeg => "image/jpeg",
            ImageEncoding::Png => "image/png",
            ImageEncoding::WebP => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageEncoding::Jpeg => "jpg",
            ImageEncoding::Png => "png",
            ImageEncoding::WebP => "webp",
        }
    }

    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageEncoding::Jpeg),
            "image/png" => Some(ImageEncoding::Png),
            "image/webp" => Some(ImageEncoding::WebP),
            _ => None,
        }
    }

    fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(ImageEncoding::Jpeg),
            ImageFormat::Png => Some(ImageEncoding::Png),
            ImageFormat::WebP => Some(ImageEncoding::WebP),
            _ => None,
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ImageEncoding::Jpeg => ImageFormat::Jpeg,
            ImageEncoding::Png => ImageFormat::Png,
            ImageEncoding::WebP => ImageFormat::WebP,
        }
    }
}

impl fmt::Display for ImageEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// Where an image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    File,
    Clipboard,
    Camera,
}

/// Bounds applied to incoming blobs.
#[derive(Debug, Clone, Copy)]
pub struct InputLimits {
    pub max_bytes: u64,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl InputLimits {
    fn check_size(&self, size: u64) -> Result<(), InputError> {
        if size > self.max_bytes {
            return Err(InputError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Errors raised while accepting an image.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("File is too large ({size} bytes). Please choose an image of at most {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("Unsupported image type '{0}'. Please use a JPG, PNG, or WEBP image")]
    UnsupportedType(String),

    #[error("Data is not a JPG, PNG, or WEBP image")]
    Unrecognized,

    #[error("Image is empty")]
    Empty,

    #[error("Could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Could not encode captured frame: {0}")]
    Encode(#[from] PreprocessError),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl InputError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InputError::TooLarge { .. } => ErrorKind::TooLarge,
            InputError::Io { .. } => ErrorKind::Io,
            _ => ErrorKind::InvalidInput,
        }
    }
}

/// A validated, decoded image together with its original bytes.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    bytes: Vec<u8>,
    encoding: ImageEncoding,
    file_name: String,
    source: InputSource,
    frame: Frame,
}

impl UploadedImage {
    /// Validate and decode an uploaded blob.
    ///
    /// The size bound is checked first, then the declared MIME type (if
    /// any), then the sniffed encoding; decoding only happens after all
    /// three pass.
    pub fn from_bytes(
        bytes: Vec<u8>,
        declared_mime: Option<&str>,
        limits: &InputLimits,
    ) -> Result<Self, InputError> {
        Self::accept(bytes, declared_mime, limits, InputSource::File, None)
    }

    /// Read and validate an image file. The file length is checked against
    /// the bound before the contents are read.
    pub fn from_path(path: &Path, limits: &InputLimits) -> Result<Self, InputError> {
        let io_err = |source| InputError::Io {
            path: path.display().to_string(),
            source,
        };
        let size = std::fs::metadata(path).map_err(io_err)?.len();
        limits.check_size(size)?;

        let bytes = std::fs::read(path).map_err(io_err)?;
        let declared = mime_from_extension(path);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());

        Self::accept(bytes, declared.as_deref(), limits, InputSource::File, file_name)
    }

    /// Accept pasted clipboard data. Only `image/*` items are taken.
    pub fn from_clipboard(
        bytes: Vec<u8>,
        mime: &str,
        limits: &InputLimits,
    ) -> Result<Self, InputError> {
        if !mime.trim().to_lowercase().starts_with("image/") {
            return Err(InputError::UnsupportedType(mime.to_string()));
        }
        Self::accept(bytes, Some(mime), limits, InputSource::Clipboard, None)
    }

    /// Wrap a camera snap, encoding it as JPEG like an uploaded photo.
    pub fn from_frame(frame: Frame, limits: &InputLimits) -> Result<Self, InputError> {
        let bytes = encode_jpeg(&frame)?;
        limits.check_size(bytes.len() as u64)?;
        Ok(Self {
            bytes,
            encoding: ImageEncoding::Jpeg,
            file_name: "camera.jpg".to_string(),
            source: InputSource::Camera,
            frame,
        })
    }

    fn accept(
        bytes: Vec<u8>,
        declared_mime: Option<&str>,
        limits: &InputLimits,
        source: InputSource,
        file_name: Option<String>,
    ) -> Result<Self, InputError> {
        limits.check_size(bytes.len() as u64)?;
        if bytes.is_empty() {
            return Err(InputError::Empty);
        }

        if let Some(mime) = declared_mime {
            if ImageEncoding::from_mime(mime).is_none() {
                return Err(InputError::UnsupportedType(mime.to_string()));
            }
        }

        let encoding = image::guess_format(&bytes)
            .ok()
            .and_then(ImageEncoding::from_image_format)
            .ok_or(InputError::Unrecognized)?;

        let decoded = image::load_from_memory_with_format(&bytes, encoding.image_format())?;
        let frame = from_dynamic(decoded);

        let file_name = file_name.unwrap_or_else(|| match source {
            InputSource::Clipboard => format!("pasted.{}", encoding.extension()),
            _ => format!("upload.{}", encoding.extension()),
        });

        log::debug!(
            "Accepted {} image {} ({} bytes, {})",
            encoding,
            file_name,
            bytes.len(),
            frame.resolution()
        );

        Ok(Self {
            bytes,
            encoding,
            file_name,
            source,
            frame,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn encoding(&self) -> ImageEncoding {
        self.encoding
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source(&self) -> InputSource {
        self.source
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn into_frame(self) -> Frame {
        self.frame
    }
}

/// Guess the declared MIME type from a file extension, as a file picker would.
fn mime_from_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(mime.to_string())
}
