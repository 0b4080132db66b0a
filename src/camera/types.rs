//! Camera types and data structures.

use std::fmt;
use std::time::Instant;

use crate::error::ErrorKind;

/// Information about an available camera device.
#[derive(Debug, Clone)]
pub struct CameraInfo {
    /// Device index for selection
    pub index: u32,
    /// Human-readable device name
    pub name: String,
    /// Device description
    pub description: String,
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.index, self.name, self.description)
    }
}

/// Frame resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    /// 640x480, used when a stream does not report its own size.
    pub const VGA: Resolution = Resolution {
        width: 640,
        height: 480,
    };

    /// 1280x720
    pub const HD: Resolution = Resolution {
        width: 1280,
        height: 720,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered by this resolution.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::VGA
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Which way the requested camera should face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Front camera (selfie)
    User,
    /// Rear camera, preferred for photographing signs and documents
    #[default]
    Environment,
    /// No preference
    Any,
}

impl FacingMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" | "front" => Some(FacingMode::User),
            "environment" | "rear" | "back" => Some(FacingMode::Environment),
            "any" => Some(FacingMode::Any),
            _ => None,
        }
    }
}

/// Constraints passed along with an "open camera" request.
#[derive(Debug, Clone)]
pub struct CameraConstraints {
    /// Camera device index
    pub device_index: u32,
    /// Preferred facing direction (backends may ignore it)
    pub facing: FacingMode,
    /// Requested resolution, `None` lets the device pick
    pub resolution: Option<Resolution>,
    /// Mirror captured frames horizontally
    pub mirror: bool,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            device_index: 0,
            facing: FacingMode::Environment,
            resolution: None,
            mirror: false,
        }
    }
}

/// Pixel layout of a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// 3 bytes per pixel
    Rgb,
    /// 4 bytes per pixel, alpha last
    Rgba,
}

impl FrameFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            FrameFormat::Rgb => 3,
            FrameFormat::Rgba => 4,
        }
    }
}

/// An in-memory bitmap, produced by a camera snap, a file upload or a
/// clipboard paste.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data, row-major
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel format
    pub format: FrameFormat,
    /// When the frame was produced
    pub captured_at: Instant,
}

impl Frame {
    /// Build a frame, checking that the buffer length matches the dimensions.
    pub fn from_raw(data: Vec<u8>, width: u32, height: u32, format: FrameFormat) -> Option<Self> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
            format,
            captured_at: Instant::now(),
        })
    }

    /// A frame filled with a single color.
    ///
    /// Channels missing from `pixel` are set to 255 (opaque for alpha);
    /// extra channels are ignored.
    pub fn filled(width: u32, height: u32, format: FrameFormat, pixel: &[u8]) -> Self {
        let bpp = format.bytes_per_pixel();
        let color: Vec<u8> = (0..bpp)
            .map(|i| pixel.get(i).copied().unwrap_or(255))
            .collect();
        let mut data = Vec::with_capacity(width as usize * height as usize * bpp);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&color);
        }
        Self {
            data,
            width,
            height,
            format,
            captured_at: Instant::now(),
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    /// Whether the buffer length agrees with width, height and format.
    pub fn is_consistent(&self) -> bool {
        self.data.len() == self.resolution().pixel_count() * self.bytes_per_pixel()
    }
}

/// Lifecycle state of the capture controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// No stream held
    Idle,
    /// Waiting for the backend to grant a stream
    Requesting,
    /// Stream held and previewing
    Live,
    /// A still frame was captured; the stream has been released
    Frozen,
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaptureState::Idle => "idle",
            CaptureState::Requesting => "requesting",
            CaptureState::Live => "live",
            CaptureState::Frozen => "frozen",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during camera operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Camera not available: {0}")]
    DeviceUnavailable(String),

    #[error("Camera device {0} not found. Run 'list-cameras' to see available devices")]
    DeviceNotFound(u32),

    #[error("Failed to query cameras: {0}")]
    QueryFailed(String),

    #[error("Camera is not active")]
    NotActive,
}

impl CaptureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CaptureError::PermissionDenied => ErrorKind::PermissionDenied,
            CaptureError::DeviceUnavailable(_)
            | CaptureError::DeviceNotFound(_)
            | CaptureError::QueryFailed(_) => ErrorKind::DeviceUnavailable,
            CaptureError::NotActive => ErrorKind::NotActive,
        }
    }
}
