//! Image API (`POST /images/generations`) request and response types.

use serde::{Deserialize, Serialize};

use crate::{OpenAi, OpenAiRequestError};

/// Request body for `/images/generations`.
///
/// `quality` and `background` are only understood by `gpt-image-1`; leave
/// them `None` for the `dall-e` models so they are omitted from the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub created: Option<i64>,
    pub data: Vec<ImageData>,
}

/// One generated image. `gpt-image-1` populates `b64_json`; the `dall-e`
/// models return `url` instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub b64_json: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

impl OpenAi {
    pub async fn generate_images(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImagesResponse, OpenAiRequestError> {
        if request.prompt.trim().is_empty() {
            return Err(OpenAiRequestError::InvalidRequest(
                "prompt must not be empty".to_string(),
            ));
        }
        if request.n == 0 {
            return Err(OpenAiRequestError::InvalidRequest(
                "image count must be at least 1".to_string(),
            ));
        }
        self.post_json("/images/generations", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(quality: Option<&str>) -> ImageGenerationRequest {
        ImageGenerationRequest {
            model: "gpt-image-1".to_string(),
            prompt: "a red circle".to_string(),
            n: 1,
            size: "1024x1024".to_string(),
            quality: quality.map(str::to_string),
            background: None,
        }
    }

    #[test]
    fn optional_fields_are_omitted_from_the_wire() {
        let body = serde_json::to_value(request(None)).expect("request serializes");
        let object = body.as_object().expect("request is a JSON object");
        assert!(!object.contains_key("quality"));
        assert!(!object.contains_key("background"));
    }

    #[test]
    fn optional_fields_are_sent_when_set() {
        let body = serde_json::to_value(request(Some("high"))).expect("request serializes");
        assert_eq!(body["quality"], "high");
    }

    #[test]
    fn response_parses_both_payload_shapes() {
        let inline: ImagesResponse =
            serde_json::from_str(r#"{"created":1700000000,"data":[{"b64_json":"aGVsbG8="}]}"#)
                .expect("inline response parses");
        assert_eq!(inline.data[0].b64_json.as_deref(), Some("aGVsbG8="));
        assert!(inline.data[0].url.is_none());

        let remote: ImagesResponse =
            serde_json::from_str(r#"{"data":[{"url":"https://example.com/img.png"}]}"#)
                .expect("remote response parses");
        assert_eq!(
            remote.data[0].url.as_deref(),
            Some("https://example.com/img.png")
        );
        assert!(remote.created.is_none());
    }
}
