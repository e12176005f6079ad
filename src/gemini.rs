//! Client for the Gemini `generateContent` API.
//!
//! One call per request: prompt text plus the reference image as an inline
//! part. The response is a list of candidates whose content parts may carry
//! inline binary data or plain text; the first inline part wins, and a
//! text-only answer is surfaced to the caller as an error with the text
//! attached.

use base64::Engine;
use base64::engine::general_purpose;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::constants::{DEFAULT_IMAGE_MIME, GEMINI_MODEL};
use crate::error::TerraformerError;
use crate::reference::ReferenceImage;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

/// Sends the prompt and reference image to the model, returning the generated
/// image as a `data:` URL.
pub async fn generate(
    client: &Client,
    endpoint: &str,
    api_key: &str,
    prompt: &str,
    reference: &ReferenceImage,
) -> Result<String, TerraformerError> {
    let encoded = general_purpose::STANDARD.encode(&reference.bytes);
    let body = json!({
        "contents": [{
            "parts": [
                {"text": prompt},
                {"inlineData": {"mimeType": reference.mime_type, "data": encoded}}
            ]
        }],
        "generationConfig": {
            "responseModalities": ["TEXT", "IMAGE"]
        }
    });

    let url = format!(
        "{}/{}:generateContent",
        endpoint.trim_end_matches('/'),
        GEMINI_MODEL
    );
    debug!("Calling generation model with a {} byte prompt", prompt.len());

    let response = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        let details = serde_json::from_str(&text).unwrap_or(Value::String(text));
        return Err(TerraformerError::Upstream {
            status: status.as_u16(),
            details,
        });
    }

    let parsed: GenerateContentResponse = serde_json::from_str(&text).map_err(|err| {
        TerraformerError::InternalServerError(format!(
            "Failed to parse generation response: {err}"
        ))
    })?;
    extract_image(parsed)
}

/// Scans the first candidate's parts for inline image data; a text-only
/// answer becomes a `TextOnly` error carrying that text.
fn extract_image(response: GenerateContentResponse) -> Result<String, TerraformerError> {
    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        TerraformerError::InternalServerError(
            "Generation response contained no candidates".to_string(),
        )
    })?;
    let parts = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default();
    if parts.is_empty() {
        return Err(TerraformerError::InternalServerError(
            "Generation response candidate had no content parts".to_string(),
        ));
    }

    let mut texts = Vec::new();
    for part in parts {
        if let Some(inline) = part.inline_data {
            let mime_type = inline
                .mime_type
                .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());
            return Ok(format!("data:{};base64,{}", mime_type, inline.data));
        }
        if let Some(text) = part.text {
            texts.push(text);
        }
    }

    if texts.is_empty() {
        return Err(TerraformerError::InternalServerError(
            "Generation response carried neither image nor text parts".to_string(),
        ));
    }
    Err(TerraformerError::TextOnly(texts.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: Value) -> GenerateContentResponse {
        serde_json::from_value(value).expect("parse fixture")
    }

    #[test]
    fn inline_part_becomes_data_url() {
        let response = parse(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"inlineData": {"mimeType": "image/png", "data": "aGVsbG8="}}
                    ]
                }
            }]
        }));
        let data_url = extract_image(response).expect("image");
        assert_eq!(data_url, "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn missing_media_type_defaults_to_png() {
        let response = parse(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"inlineData": {"data": "aGVsbG8="}}
                    ]
                }
            }]
        }));
        let data_url = extract_image(response).expect("image");
        assert!(data_url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn inline_part_after_text_still_wins() {
        let response = parse(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here is your image."},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "aGVsbG8="}}
                    ]
                }
            }]
        }));
        let data_url = extract_image(response).expect("image");
        assert!(data_url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn text_only_parts_surface_as_error() {
        let response = parse(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "I cannot draw that."}
                    ]
                }
            }]
        }));
        match extract_image(response) {
            Err(TerraformerError::TextOnly(text)) => assert_eq!(text, "I cannot draw that."),
            other => panic!("expected TextOnly, got {other:?}"),
        }
    }

    #[test]
    fn content_free_candidate_is_an_internal_error() {
        let blocked = parse(json!({"candidates": [{}]}));
        assert!(matches!(
            extract_image(blocked),
            Err(TerraformerError::InternalServerError(_))
        ));

        let empty_parts = parse(json!({"candidates": [{"content": {"parts": []}}]}));
        assert!(matches!(
            extract_image(empty_parts),
            Err(TerraformerError::InternalServerError(_))
        ));
    }

    #[test]
    fn empty_candidates_is_an_internal_error() {
        let response = parse(json!({"candidates": []}));
        assert!(matches!(
            extract_image(response),
            Err(TerraformerError::InternalServerError(_))
        ));
    }
}
