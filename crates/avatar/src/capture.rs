//! Frame capture: one still from a live session, then release the camera.

use std::io;

use image::imageops::{self, FilterType};

use crate::camera::{CameraSession, Raster};

/// Snapshot the session's current frame at the stream's native resolution
/// and stop the session's tracks.
///
/// Frames that arrive at a different size are scaled to the native
/// resolution. The session is released whether or not the read succeeds.
pub fn snapshot(session: &mut CameraSession) -> io::Result<Raster> {
    let (width, height) = session.resolution();
    let frame = session.current_frame();
    session.release();

    let frame = frame?;
    if frame.dimensions() == (width, height) {
        return Ok(frame);
    }

    tracing::debug!(
        frame_width = frame.width(),
        frame_height = frame.height(),
        width,
        height,
        "Scaling frame to native resolution",
    );
    Ok(imageops::resize(&frame, width, height, FilterType::Triangle))
}
