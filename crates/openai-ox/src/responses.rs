//! Responses API (`POST /responses`) subset for image generation with
//! reference image inputs.

use serde::{Deserialize, Serialize};

use crate::{OpenAi, OpenAiRequestError};

#[derive(Debug, Clone, Serialize)]
pub struct ResponsesRequest {
    pub model: String,
    pub input: Vec<InputMessage>,
    pub tools: Vec<Tool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputMessage {
    pub role: String,
    pub content: Vec<InputContent>,
}

impl InputMessage {
    pub fn user(content: Vec<InputContent>) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputContent {
    InputText { text: String },
    /// Reference image embedded by value as a base64 data URL.
    InputImage { image_url: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    ImageGeneration {
        quality: String,
        input_fidelity: String,
        background: String,
        size: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesResult {
    pub output: Vec<OutputItem>,
}

/// Output items we care about; everything else collapses into `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputItem {
    ImageGenerationCall {
        status: String,
        #[serde(default)]
        result: Option<String>,
    },
    #[serde(other)]
    Other,
}

impl ResponsesResult {
    /// Base64 payload of the first completed image generation call, if any.
    pub fn completed_image(&self) -> Option<&str> {
        self.output.iter().find_map(|item| match item {
            OutputItem::ImageGenerationCall { status, result } if status == "completed" => {
                result.as_deref()
            }
            _ => None,
        })
    }
}

impl OpenAi {
    pub async fn create_response(
        &self,
        request: &ResponsesRequest,
    ) -> Result<ResponsesResult, OpenAiRequestError> {
        if request.input.is_empty() {
            return Err(OpenAiRequestError::InvalidRequest(
                "responses request must carry at least one input message".to_string(),
            ));
        }
        self.post_json("/responses", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_content_serializes_with_type_tags() {
        let content = vec![
            InputContent::InputText {
                text: "make it blue".to_string(),
            },
            InputContent::InputImage {
                image_url: "data:image/jpeg;base64,AAAA".to_string(),
            },
        ];
        let body = serde_json::to_value(content).expect("content serializes");
        assert_eq!(body[0]["type"], "input_text");
        assert_eq!(body[1]["type"], "input_image");
        assert_eq!(body[1]["image_url"], "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn completed_image_skips_unknown_and_incomplete_items() {
        let raw = r#"{
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "image_generation_call", "status": "in_progress"},
                {"type": "image_generation_call", "status": "completed", "result": "aGVsbG8="}
            ]
        }"#;
        let result: ResponsesResult = serde_json::from_str(raw).expect("output parses");
        assert_eq!(result.completed_image(), Some("aGVsbG8="));
    }

    #[test]
    fn completed_image_is_none_without_an_image_call() {
        let raw = r#"{"output": [{"type": "message", "content": []}]}"#;
        let result: ResponsesResult = serde_json::from_str(raw).expect("output parses");
        assert!(result.completed_image().is_none());
    }
}
