use std::path::PathBuf;
use std::sync::Arc;

use crate::camera::still::StillImageCamera;
use crate::camera::CameraDevice;

/// Where the avatar flow gets its video from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraSource {
    /// Serve a fixed image file as the video stream.
    Still(PathBuf),
    /// `/dev/video{index}`.
    #[cfg(feature = "v4l")]
    Device(usize),
}

impl CameraSource {
    /// Load the camera source from environment variables.
    ///
    /// | Env Var              | Default                                    |
    /// |----------------------|--------------------------------------------|
    /// | `CAMERA_STILL_IMAGE` | unset; when set, wins over a device        |
    /// | `CAMERA_DEVICE`      | `0` (only with the `v4l` feature)          |
    ///
    /// Returns `None` when no source is available.
    pub fn from_env() -> Option<Self> {
        if let Some(path) = std::env::var_os("CAMERA_STILL_IMAGE").filter(|p| !p.is_empty()) {
            return Some(CameraSource::Still(PathBuf::from(path)));
        }

        #[cfg(feature = "v4l")]
        let device = {
            let index = std::env::var("CAMERA_DEVICE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            Some(CameraSource::Device(index))
        };
        #[cfg(not(feature = "v4l"))]
        let device = None;

        device
    }

    pub fn into_device(self) -> Arc<dyn CameraDevice> {
        match self {
            CameraSource::Still(path) => Arc::new(StillImageCamera::new(path)),
            #[cfg(feature = "v4l")]
            CameraSource::Device(index) => Arc::new(crate::camera::v4l2::V4l2Camera::new(index)),
        }
    }
}
