use crate::{
    config::{credential, GeminiConfig},
    error::{Result, StudioError},
    models::{
        data_uri, GeminiContent, GeminiGenerationConfig, GeminiImageConfig, GeminiPart,
        GeminiRequest, GeminiResponse, ImageGenerationRequest, ImageGenerationResponse, ModelInfo,
    },
};
use async_trait::async_trait;
use reqwest::Client;

use super::ImageGenerator;

const DEFAULT_MIME_TYPE: &str = "image/png";

#[derive(Clone)]
pub struct GeminiImageClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiImageClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = credential(&config.api_key)
            .map(str::to_string)
            .ok_or_else(|| {
                log::error!("Gemini API key (API_KEY) not found in the environment");
                StudioError::ConfigError(
                    "Google API key is not configured; cannot generate images".into(),
                )
            })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.model,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn supported_models() -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "gemini-2.5-flash-image",
            name: "Gemini 2.5 Flash Image",
            provider: "Google",
            description: "Native image output from generateContent",
        }]
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn build_request(request: &ImageGenerationRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(request.prompt.clone()),
                    inline_data: None,
                }],
            }],
            generation_config: GeminiGenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                candidate_count: request.num_images,
                image_config: GeminiImageConfig {
                    aspect_ratio: request.aspect_ratio.as_str().to_string(),
                },
            },
        }
    }

    /// Finds the first inline image part of the first candidate and turns it
    /// into a `data:` URI.
    pub fn extract_image(response: &GeminiResponse) -> Option<String> {
        let content = response.candidates.first()?.content.as_ref()?;
        content
            .parts
            .iter()
            .filter_map(|part| part.inline_data.as_ref())
            .find(|inline| !inline.data.is_empty())
            .map(|inline| {
                data_uri(
                    inline.mime_type.as_deref().unwrap_or(DEFAULT_MIME_TYPE),
                    &inline.data,
                )
            })
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageClient {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        let model = request.model_id.as_deref().unwrap_or(&self.model).to_string();
        let payload = Self::build_request(&request);

        log::info!(
            "Generating image with model: {} ({})",
            model,
            request.aspect_ratio
        );
        log::debug!("Image prompt: {}", request.prompt);

        let response = self
            .client
            .post(self.endpoint(&model))
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            log::error!("Gemini returned {}: {}", status, message);
            return Err(StudioError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| StudioError::ResponseError(e.to_string()))?;

        let image_locator = Self::extract_image(&parsed)
            .ok_or_else(|| StudioError::NoImageData(request.prompt.clone()))?;

        Ok(ImageGenerationResponse {
            image_locator,
            model,
        })
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AspectRatio;

    fn parse(body: &str) -> GeminiResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_missing_api_key_is_config_error() {
        let err = GeminiImageClient::new(GeminiConfig::new()).err().unwrap();
        assert!(err.is_config());
    }

    #[test]
    fn test_blank_api_key_is_config_error() {
        for key in ["", "   ", "\n"] {
            let err = GeminiImageClient::new(GeminiConfig::new().with_api_key(key))
                .err()
                .unwrap();
            assert!(err.is_config(), "key {:?} should be rejected", key);
        }
    }

    #[test]
    fn test_supported_models_lists_default() {
        let models = GeminiImageClient::supported_models();
        assert!(models.iter().any(|m| m.id == crate::config::DEFAULT_GEMINI_MODEL));
    }

    #[test]
    fn test_request_payload_shape() {
        let mut request = ImageGenerationRequest::new("a fox logo", AspectRatio::Portrait);
        request.num_images = 1;
        let payload = serde_json::to_value(GeminiImageClient::build_request(&request)).unwrap();

        assert_eq!(payload["contents"][0]["parts"][0]["text"], "a fox logo");
        assert!(payload["contents"][0]["parts"][0].get("inlineData").is_none());
        assert_eq!(payload["generationConfig"]["imageConfig"]["aspectRatio"], "9:16");
        assert_eq!(payload["generationConfig"]["candidateCount"], 1);
        assert_eq!(payload["generationConfig"]["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn test_extract_image_skips_text_parts() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"Here is your logo"},
                {"inlineData":{"mimeType":"image/jpeg","data":"QUJD"}}
            ]}}]}"#,
        );
        assert_eq!(
            GeminiImageClient::extract_image(&response).as_deref(),
            Some("data:image/jpeg;base64,QUJD")
        );
    }

    #[test]
    fn test_extract_image_defaults_to_png() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"QUJD"}}]}}]}"#);
        assert_eq!(
            GeminiImageClient::extract_image(&response).as_deref(),
            Some("data:image/png;base64,QUJD")
        );
    }

    #[test]
    fn test_extract_image_without_payload() {
        let text_only = parse(r#"{"candidates":[{"content":{"parts":[{"text":"refused"}]}}]}"#);
        assert!(GeminiImageClient::extract_image(&text_only).is_none());

        let empty = parse(r#"{}"#);
        assert!(GeminiImageClient::extract_image(&empty).is_none());

        let no_content = parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#);
        assert!(GeminiImageClient::extract_image(&no_content).is_none());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiImageClient::new(
            GeminiConfig::new()
                .with_api_key("key")
                .with_base_url("http://localhost:9000/"),
        )
        .unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash-image"),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }
}
