//! Webcam discovery.

use nokhwa::query;
use nokhwa::utils::{ApiBackend, CameraInfo as NokhwaCameraInfo};

use super::types::{CameraInfo, CaptureError};

/// Enumerate cameras through the platform API, sorted by index.
///
/// An empty list is not an error here; [`require_device`] turns it into one.
/// Devices addressed by name or path instead of a number can't be selected
/// with `--device`, so they are left out.
pub fn list_devices() -> Result<Vec<CameraInfo>, CaptureError> {
    let found = query(ApiBackend::Auto).map_err(|e| CaptureError::QueryFailed(e.to_string()))?;

    let mut cameras: Vec<CameraInfo> = found.iter().filter_map(numbered).collect();
    cameras.sort_by_key(|c| c.index);
    log::debug!("Found {} camera(s)", cameras.len());
    Ok(cameras)
}

/// Look up camera `index`, distinguishing "no cameras at all" from "not that one".
pub fn require_device(index: u32) -> Result<CameraInfo, CaptureError> {
    let cameras = list_devices()?;
    if cameras.is_empty() {
        return Err(CaptureError::DeviceUnavailable(
            "no cameras found".to_string(),
        ));
    }
    cameras
        .into_iter()
        .find(|c| c.index == index)
        .ok_or(CaptureError::DeviceNotFound(index))
}

fn numbered(device: &NokhwaCameraInfo) -> Option<CameraInfo> {
    let index = device.index().as_index().ok()?;
    Some(CameraInfo {
        index,
        name: device.human_name(),
        description: device.description().to_string(),
    })
}
