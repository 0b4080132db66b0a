//! Camera capture: lifecycle state machine and frame types.
//!
//! - [`CaptureController`] owns at most one live stream and releases it on
//!   every exit from the live state
//! - [`CameraBackend`] / [`StreamHandle`] are the seam to real hardware
//! - [`NativeBackend`] and [`list_devices`] need the `native-camera` feature

mod controller;
mod frame_utils;
mod stream;
mod types;

#[cfg(feature = "native-camera")]
mod device;
#[cfg(feature = "native-camera")]
mod native;

pub use controller::CaptureController;
pub use frame_utils::{from_dynamic, mirror_horizontal, resize_frame, to_dynamic};
pub use stream::{CameraBackend, LiveStream, StreamHandle};
pub use types::{
    CameraConstraints, CameraInfo, CaptureError, CaptureState, FacingMode, Frame, FrameFormat,
    Resolution,
};

#[cfg(feature = "native-camera")]
pub use device::list_devices;
#[cfg(feature = "native-camera")]
pub use native::NativeBackend;
