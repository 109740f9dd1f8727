//! video4linux capture backend (feature `v4l`).
//!
//! Opens `/dev/video{index}`, negotiates MJPG at the device's current
//! resolution and decodes each frame to RGB on demand.

use std::io;

use async_trait::async_trait;
use image::ImageFormat;
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, FourCC};

use super::{CameraDevice, Raster, VideoStream};

/// Number of mmap buffers queued with the driver.
const BUFFER_COUNT: u32 = 4;

const MJPG: &[u8; 4] = b"MJPG";

pub struct V4l2Camera {
    index: usize,
}

impl V4l2Camera {
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

#[async_trait]
impl CameraDevice for V4l2Camera {
    async fn open(&self) -> io::Result<Box<dyn VideoStream>> {
        let index = self.index;
        tokio::task::spawn_blocking(move || open_device(index))
            .await
            .map_err(io::Error::other)?
    }
}

fn open_device(index: usize) -> io::Result<Box<dyn VideoStream>> {
    let device = Device::new(index)?;

    let mut format = device.format()?;
    format.fourcc = FourCC::new(MJPG);
    let format = device.set_format(&format)?;
    if format.fourcc != FourCC::new(MJPG) {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("device {index} cannot deliver MJPG frames (got {})", format.fourcc),
        ));
    }

    let stream = Stream::with_buffers(&device, Type::VideoCapture, BUFFER_COUNT)?;

    tracing::info!(
        index,
        width = format.width,
        height = format.height,
        "Opened video4linux camera",
    );

    Ok(Box::new(V4l2Stream {
        _device: device,
        stream: Some(stream),
        width: format.width,
        height: format.height,
    }))
}

struct V4l2Stream {
    // Keeps the file descriptor open for as long as the stream exists.
    _device: Device,
    stream: Option<Stream<'static>>,
    width: u32,
    height: u32,
}

impl VideoStream for V4l2Stream {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn current_frame(&mut self) -> io::Result<Raster> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "stream stopped"))?;
        let (data, _meta) = stream.next()?;
        let frame = image::load_from_memory_with_format(data, ImageFormat::Jpeg)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(frame.to_rgb8())
    }

    fn stop(&mut self) {
        // Dropping the mmap stream issues STREAMOFF and unmaps the buffers.
        self.stream.take();
    }
}
