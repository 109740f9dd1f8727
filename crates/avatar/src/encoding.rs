//! JPEG + base64 encoding of captured rasters.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use blockdag_gemini::InlineData;
use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;

use crate::camera::Raster;

/// JPEG quality used for every capture (matches the browser default for
/// `canvas.toDataURL("image/jpeg")`).
pub const JPEG_QUALITY: u8 = 92;

pub const JPEG_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Cannot encode an empty {width}x{height} raster")]
    EmptyRaster { width: u32, height: u32 },

    #[error("JPEG encoding failed: {0}")]
    Jpeg(#[from] image::ImageError),
}

/// An immutable encoded still.
#[derive(Debug, PartialEq, Eq)]
pub struct CapturedFrame {
    mime_type: &'static str,
    data: String,
    width: u32,
    height: u32,
    captured_at: DateTime<Utc>,
}

impl CapturedFrame {
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// Standard base64 of the JPEG bytes.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// `data:` URL for showing the capture as a thumbnail.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn to_inline_data(&self) -> InlineData {
        InlineData {
            mime_type: self.mime_type.to_string(),
            data: self.data.clone(),
        }
    }
}

/// Fixed-quality JPEG encoder.
#[derive(Debug, Clone, Copy)]
pub struct FrameEncoder {
    quality: u8,
}

impl Default for FrameEncoder {
    fn default() -> Self {
        Self {
            quality: JPEG_QUALITY,
        }
    }
}

impl FrameEncoder {
    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Compress `raster` to JPEG bytes.
    pub fn encode_jpeg(&self, raster: &Raster) -> Result<Vec<u8>, EncodeError> {
        let (width, height) = raster.dimensions();
        if width == 0 || height == 0 {
            return Err(EncodeError::EmptyRaster { width, height });
        }
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, self.quality).encode_image(raster)?;
        Ok(buf)
    }

    /// Compress `raster` and wrap it as a transport-ready frame.
    pub fn encode(&self, raster: &Raster) -> Result<CapturedFrame, EncodeError> {
        let jpeg = self.encode_jpeg(raster)?;
        let (width, height) = raster.dimensions();

        tracing::debug!(width, height, jpeg_bytes = jpeg.len(), "Encoded captured frame");

        Ok(CapturedFrame {
            mime_type: JPEG_MIME_TYPE,
            data: BASE64_STANDARD.encode(&jpeg),
            width,
            height,
            captured_at: Utc::now(),
        })
    }
}
