//! Webcam backend built on nokhwa.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;

use super::device::require_device;
use super::frame_utils::convert_to_rgb;
use super::stream::{CameraBackend, StreamHandle};
use super::types::{CameraConstraints, CaptureError, FacingMode, Frame, Resolution};

/// Opens local webcams through the platform's native API.
#[derive(Debug, Default)]
pub struct NativeBackend;

impl NativeBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for NativeBackend {
    fn open(
        &mut self,
        constraints: &CameraConstraints,
    ) -> Result<Box<dyn StreamHandle>, CaptureError> {
        let device = require_device(constraints.device_index)?;
        log::debug!("Opening {}", device);
        if constraints.facing != FacingMode::Any {
            log::debug!(
                "Facing mode {:?} is not selectable here, using device {}",
                constraints.facing,
                constraints.device_index
            );
        }

        let index = CameraIndex::Index(constraints.device_index);
        let mut camera = open_camera_with_fallback(&index, constraints)?;
        camera
            .open_stream()
            .map_err(|e| classify_open_error(&e.to_string()))?;

        let res = camera.resolution();
        let reported = (res.width() > 0 && res.height() > 0)
            .then(|| Resolution::new(res.width(), res.height()));

        Ok(Box::new(NativeStream { camera, reported }))
    }
}

struct NativeStream {
    camera: Camera,
    reported: Option<Resolution>,
}

impl StreamHandle for NativeStream {
    fn reported_resolution(&self) -> Option<Resolution> {
        self.reported
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let raw = self
            .camera
            .frame()
            .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;
        convert_to_rgb(&raw).ok_or_else(|| {
            CaptureError::DeviceUnavailable("unsupported camera pixel format".to_string())
        })
    }

    fn stop_tracks(&mut self) {
        if let Err(e) = self.camera.stop_stream() {
            log::warn!("Failed to stop camera stream cleanly: {}", e);
        }
    }
}

/// Try several format requests in order of preference.
fn open_camera_with_fallback(
    index: &CameraIndex,
    constraints: &CameraConstraints,
) -> Result<Camera, CaptureError> {
    let mut format_attempts: Vec<RequestedFormat> = Vec::new();

    if let Some(res) = constraints.resolution {
        let wanted = nokhwa::utils::Resolution::new(res.width, res.height);
        // NV12 is native on macOS, MJPEG is the widely supported one
        for format in [NokhwaFrameFormat::NV12, NokhwaFrameFormat::MJPEG] {
            format_attempts.push(RequestedFormat::new::<RgbFormat>(
                RequestedFormatType::Closest(CameraFormat::new(wanted, format, 30)),
            ));
        }
    }
    format_attempts.push(RequestedFormat::new::<RgbFormat>(
        RequestedFormatType::AbsoluteHighestResolution,
    ));

    let mut last_error = String::from("no format accepted");
    for requested in format_attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => last_error = e.to_string(),
        }
    }

    Err(classify_open_error(&last_error))
}

fn classify_open_error(message: &str) -> CaptureError {
    let msg = message.to_lowercase();
    if msg.contains("permission")
        || msg.contains("denied")
        || msg.contains("authorization")
        || msg.contains("access")
    {
        CaptureError::PermissionDenied
    } else {
        CaptureError::DeviceUnavailable(message.to_string())
    }
}
