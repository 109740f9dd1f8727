//! Camera acquisition.
//!
//! A [`CameraDevice`] opens a video-only [`VideoStream`]. The flow wraps the
//! stream in a [`CameraSession`], which owns the device exclusively and
//! stops its tracks exactly once: on capture, on exit, or on drop.
//!
//! Host failures arrive as [`std::io::Error`] and are reduced to one of the
//! four [`CameraError`] reasons before anything reaches the user.

use std::fmt;
use std::io;

use async_trait::async_trait;
use serde::Serialize;

pub mod still;
#[cfg(feature = "v4l")]
pub mod v4l2;

/// Decoded RGB frame prior to compression.
pub type Raster = image::RgbImage;

/// User-facing reason a camera could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraError {
    DeviceNotFound,
    PermissionDenied,
    DeviceBusy,
    Unknown,
}

impl CameraError {
    /// Reduce a host error to a user-facing reason.
    pub fn classify(err: &io::Error) -> Self {
        match err.raw_os_error() {
            Some(libc::ENOENT) | Some(libc::ENODEV) | Some(libc::ENXIO) => {
                return CameraError::DeviceNotFound
            }
            Some(libc::EACCES) | Some(libc::EPERM) => return CameraError::PermissionDenied,
            Some(libc::EBUSY) => return CameraError::DeviceBusy,
            _ => {}
        }
        match err.kind() {
            io::ErrorKind::NotFound => CameraError::DeviceNotFound,
            io::ErrorKind::PermissionDenied => CameraError::PermissionDenied,
            io::ErrorKind::ResourceBusy => CameraError::DeviceBusy,
            _ => CameraError::Unknown,
        }
    }

    /// Fixed message shown in place of the preview.
    pub fn message(self) -> &'static str {
        match self {
            CameraError::DeviceNotFound => {
                "No camera found on this device. Please connect a camera and try again."
            }
            CameraError::PermissionDenied => {
                "Camera access denied. Please enable camera permissions in your system settings."
            }
            CameraError::DeviceBusy => "The camera is currently in use by another application.",
            CameraError::Unknown => "Could not access camera. Please check permissions and try again.",
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for CameraError {}

/// A source of video-only streams.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Negotiate access and start a stream. May suspend while the host
    /// resolves permissions or the device powers up.
    async fn open(&self) -> io::Result<Box<dyn VideoStream>>;
}

/// A live video stream held by a [`CameraSession`].
pub trait VideoStream: Send {
    /// Native `(width, height)` of the stream.
    fn resolution(&self) -> (u32, u32);

    /// The most recent frame.
    fn current_frame(&mut self) -> io::Result<Raster>;

    /// Stop every underlying track. [`CameraSession`] calls this at most once.
    fn stop(&mut self);
}

/// Exclusive handle to an open camera stream.
pub struct CameraSession {
    stream: Box<dyn VideoStream>,
    released: bool,
}

impl CameraSession {
    pub fn new(stream: Box<dyn VideoStream>) -> Self {
        Self {
            stream,
            released: false,
        }
    }

    pub fn resolution(&self) -> (u32, u32) {
        self.stream.resolution()
    }

    pub fn is_active(&self) -> bool {
        !self.released
    }

    /// Grab the current frame from a still-active stream.
    pub fn current_frame(&mut self) -> io::Result<Raster> {
        if self.released {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "camera session already released",
            ));
        }
        self.stream.current_frame()
    }

    /// Stop the stream's tracks. Repeated calls are no-ops.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.stream.stop();
        tracing::debug!("Camera session released");
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.release();
    }
}
