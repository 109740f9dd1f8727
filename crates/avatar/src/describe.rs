//! Remote description request.
//!
//! A [`DescriptionRequest`] pairs a captured frame with the fixed avatar
//! instruction and is consumed by exactly one
//! [`DescriptionService::describe`] call.

use std::sync::Arc;

use async_trait::async_trait;
use blockdag_gemini::GeminiApi;

use crate::encoding::CapturedFrame;

/// Instruction sent alongside every captured face.
pub const AVATAR_INSTRUCTION: &str =
    "Analyze this face and create a detailed, lifelike avatar description from it.";

/// One captured frame plus the avatar instruction. Not `Clone`.
#[derive(Debug)]
pub struct DescriptionRequest {
    frame: Arc<CapturedFrame>,
}

impl DescriptionRequest {
    pub fn new(frame: Arc<CapturedFrame>) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &CapturedFrame {
        &self.frame
    }

    pub fn instruction(&self) -> &'static str {
        AVATAR_INSTRUCTION
    }
}

/// A service that turns a captured face into avatar text.
///
/// Errors are opaque: the flow logs them and shows a fixed message.
#[async_trait]
pub trait DescriptionService: Send + Sync {
    async fn describe(&self, request: DescriptionRequest) -> anyhow::Result<String>;
}

/// [`DescriptionService`] backed by the Gemini `generateContent` API.
pub struct GeminiDescriber {
    api: GeminiApi,
}

impl GeminiDescriber {
    pub fn new(api: GeminiApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DescriptionService for GeminiDescriber {
    async fn describe(&self, request: DescriptionRequest) -> anyhow::Result<String> {
        let image = request.frame().to_inline_data();
        let text = self
            .api
            .generate_content(self.api.model(), request.instruction(), &image)
            .await?;
        Ok(text)
    }
}
