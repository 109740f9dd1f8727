//! Camera backed by a single image file.
//!
//! Used on hosts without capture hardware. The file is read when the stream
//! is opened, so a missing or unreadable file surfaces through the same
//! classification as a missing or locked device.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;

use super::{CameraDevice, Raster, VideoStream};

pub struct StillImageCamera {
    path: PathBuf,
}

impl StillImageCamera {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CameraDevice for StillImageCamera {
    async fn open(&self) -> io::Result<Box<dyn VideoStream>> {
        let bytes = tokio::fs::read(&self.path).await?;
        let raster = image::load_from_memory(&bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
            .to_rgb8();

        tracing::info!(
            path = %self.path.display(),
            width = raster.width(),
            height = raster.height(),
            "Opened still-image camera",
        );

        Ok(Box::new(StillStream {
            raster,
            stopped: false,
        }))
    }
}

struct StillStream {
    raster: Raster,
    stopped: bool,
}

impl VideoStream for StillStream {
    fn resolution(&self) -> (u32, u32) {
        self.raster.dimensions()
    }

    fn current_frame(&mut self) -> io::Result<Raster> {
        if self.stopped {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream stopped"));
        }
        Ok(self.raster.clone())
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
