//! Production [`ImageClient`] backed by the OpenAI endpoints.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use openai_ox::{
    ImageGenerationRequest, InputContent, InputMessage, OpenAi, ResponsesRequest, Tool,
};

use crate::config::AppConfig;
use crate::services::context::{
    ApiFamily, GenerateError, GenerateResult, GenerationRequest, ImageClient, ImagePayload,
};

#[derive(Debug, Clone)]
pub struct OpenAiImageClient {
    client: OpenAi,
}

impl OpenAiImageClient {
    pub fn new(config: &AppConfig) -> Self {
        let mut client = OpenAi::new(config.api_key.expose());
        if let Some(base_url) = &config.base_url {
            client = client.with_base_url(base_url);
        }
        Self { client }
    }

    async fn generate_via_images(
        &self,
        request: &GenerationRequest,
    ) -> GenerateResult<ImagePayload> {
        let profile = &request.profile;
        let extras = profile.model.supports_quality_background();
        let wire = ImageGenerationRequest {
            model: profile.model.as_str().to_string(),
            prompt: request.prompt.clone(),
            n: 1,
            size: profile.size.as_str().to_string(),
            quality: extras.then(|| profile.quality.as_str().to_string()),
            background: extras.then(|| profile.background.as_str().to_string()),
        };

        let response = self.client.generate_images(&wire).await?;
        let Some(data) = response.data.into_iter().next() else {
            return Err(GenerateError::MissingPayload);
        };
        if let Some(encoded) = data.b64_json {
            return Ok(ImagePayload::Inline(
                BASE64_STANDARD.decode(encoded.as_bytes())?,
            ));
        }
        if let Some(url) = data.url {
            return Ok(ImagePayload::Remote(url));
        }
        Err(GenerateError::MissingPayload)
    }

    async fn generate_via_responses(
        &self,
        request: &GenerationRequest,
    ) -> GenerateResult<ImagePayload> {
        let profile = &request.profile;

        let mut content = Vec::with_capacity(profile.reference_images.len() + 1);
        content.push(InputContent::InputText {
            text: request.prompt.clone(),
        });
        for image in &profile.reference_images {
            content.push(InputContent::InputImage {
                image_url: format!(
                    "data:{};base64,{}",
                    image.mime_type,
                    BASE64_STANDARD.encode(&image.bytes)
                ),
            });
        }

        let wire = ResponsesRequest {
            model: profile.model.as_str().to_string(),
            input: vec![InputMessage::user(content)],
            tools: vec![Tool::ImageGeneration {
                quality: profile.quality.as_str().to_string(),
                input_fidelity: profile.input_fidelity.as_str().to_string(),
                background: profile.background.as_str().to_string(),
                size: profile.size.as_str().to_string(),
            }],
        };

        let response = self.client.create_response(&wire).await?;
        let Some(encoded) = response.completed_image() else {
            return Err(GenerateError::MissingPayload);
        };
        Ok(ImagePayload::Inline(
            BASE64_STANDARD.decode(encoded.as_bytes())?,
        ))
    }
}

#[async_trait]
impl ImageClient for OpenAiImageClient {
    async fn generate(&self, request: &GenerationRequest) -> GenerateResult<ImagePayload> {
        let profile = &request.profile;
        match profile.model.api_family() {
            ApiFamily::Images => {
                if !profile.reference_images.is_empty() {
                    return Err(GenerateError::ReferencesNotSupported(profile.model));
                }
                self.generate_via_images(request).await
            }
            ApiFamily::Responses => self.generate_via_responses(request).await,
        }
    }

    async fn fetch_remote(&self, url: &str) -> GenerateResult<Vec<u8>> {
        Ok(self.client.download(url).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiKey;
    use crate::services::context::{GenerationProfile, ImageModel, ReferenceImage};

    fn client() -> OpenAiImageClient {
        let config = AppConfig {
            api_key: ApiKey::new("sk-test"),
            base_url: None,
            output_dir: "out".into(),
        };
        OpenAiImageClient::new(&config)
    }

    #[tokio::test]
    async fn reference_images_are_rejected_for_image_api_models() {
        let profile = GenerationProfile::builder()
            .model(ImageModel::GptImage1)
            .reference_images(vec![ReferenceImage::new(vec![1, 2, 3], "image/png")])
            .build();
        let request = profile.request_for("a portrait");

        let err = client()
            .generate(&request)
            .await
            .expect_err("image-api model must reject references");
        assert!(matches!(
            err,
            GenerateError::ReferencesNotSupported(ImageModel::GptImage1)
        ));
    }
}
