//! QR modal that lets a desktop visitor open the dashboard on a phone.
//!
//! The QR image itself is rendered by a public QR service; this module only
//! builds the image URL for the current page.

use serde::Serialize;
use url::Url;

use crate::error::CoreError;

const QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";

/// Rendered edge length of the QR image in pixels.
pub const QR_SIZE_PX: u32 = 256;

/// Slate-800 background and slate-200 foreground, matching the modal card.
const QR_BACKGROUND: &str = "1e293b";
const QR_FOREGROUND: &str = "e2e8f0";

pub const QR_TITLE: &str = "Scan to open on mobile";
pub const QR_HINT: &str = "Point your phone's camera at this QR code.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrModal {
    /// The page the QR code points to.
    pub page_url: String,
    /// Image URL of the rendered QR code.
    pub image_url: String,
}

impl QrModal {
    /// Build the modal for `page_url`, or `None` when it is empty.
    pub fn for_page(page_url: &str) -> Result<Option<Self>, CoreError> {
        if page_url.is_empty() {
            return Ok(None);
        }
        let image_url = qr_image_url(page_url)?;
        Ok(Some(Self {
            page_url: page_url.to_string(),
            image_url: image_url.into(),
        }))
    }
}

/// QR service URL encoding `data` at [`QR_SIZE_PX`] with a one-module quiet zone.
pub fn qr_image_url(data: &str) -> Result<Url, CoreError> {
    let size = format!("{QR_SIZE_PX}x{QR_SIZE_PX}");
    let url = Url::parse_with_params(
        QR_SERVICE_URL,
        &[
            ("size", size.as_str()),
            ("data", data),
            ("qzone", "1"),
            ("bgcolor", QR_BACKGROUND),
            ("color", QR_FOREGROUND),
        ],
    )?;
    Ok(url)
}
