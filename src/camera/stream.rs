//! Camera backend seam and the scoped stream guard.

use std::time::Instant;

use super::types::{CameraConstraints, CaptureError, Frame, Resolution};

/// A granted video stream owning one or more hardware tracks.
pub trait StreamHandle {
    /// Resolution the stream reports, if it reports one.
    fn reported_resolution(&self) -> Option<Resolution>;

    /// Grab the current video frame.
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Stop every track. Called exactly once, by [`LiveStream`]'s drop.
    fn stop_tracks(&mut self);
}

/// Source of camera streams.
pub trait CameraBackend {
    /// Request a stream matching `constraints`.
    ///
    /// # Errors
    /// * `CaptureError::PermissionDenied` - access was refused
    /// * `CaptureError::DeviceUnavailable` / `DeviceNotFound` - no usable device
    fn open(
        &mut self,
        constraints: &CameraConstraints,
    ) -> Result<Box<dyn StreamHandle>, CaptureError>;
}

/// Owns a granted stream; dropping it stops the tracks.
///
/// Every exit from the live state goes through dropping this guard, so the
/// camera is released on success, cancel and error paths alike.
pub struct LiveStream {
    handle: Box<dyn StreamHandle>,
    constraints: CameraConstraints,
    opened_at: Instant,
}

impl LiveStream {
    pub fn new(handle: Box<dyn StreamHandle>, constraints: CameraConstraints) -> Self {
        Self {
            handle,
            constraints,
            opened_at: Instant::now(),
        }
    }

    pub fn constraints(&self) -> &CameraConstraints {
        &self.constraints
    }

    pub fn reported_resolution(&self) -> Option<Resolution> {
        self.handle.reported_resolution()
    }

    pub fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        self.handle.read_frame()
    }
}

impl std::fmt::Debug for LiveStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveStream")
            .field("constraints", &self.constraints)
            .field("opened_at", &self.opened_at)
            .finish_non_exhaustive()
    }
}

impl Drop for LiveStream {
    fn drop(&mut self) {
        self.handle.stop_tracks();
        log::debug!(
            "Camera stream on device {} released after {:?}",
            self.constraints.device_index,
            self.opened_at.elapsed()
        );
    }
}
