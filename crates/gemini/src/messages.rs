//! Request and response payloads for `models/{model}:generateContent`.

use serde::{Deserialize, Serialize};

/// Request body for `generateContent`.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
}

/// A single turn of content. Only user turns are sent, so `role` is omitted.
#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

/// Outgoing content part: inline media or text.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: &'a InlineData,
    },
    Text {
        text: &'a str,
    },
}

/// Base64 inline media payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Standard-alphabet base64, no `data:` prefix.
    pub data: String,
}

impl<'a> GenerateContentRequest<'a> {
    /// One user turn holding the image first, then the instruction.
    pub fn image_with_instruction(image: &'a InlineData, instruction: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData { inline_data: image },
                    Part::Text { text: instruction },
                ],
            }],
        }
    }
}

/// Top-level `generateContent` response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<ResponseContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Response part. Non-text parts are kept as `None` text and skipped.
#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, or `None` if there
    /// is no candidate or it carries no text.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut texts = content.parts.iter().filter_map(|p| p.text.as_deref()).peekable();
        texts.peek()?;
        Some(texts.collect())
    }
}
