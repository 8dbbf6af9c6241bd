use crate::{
    config::{credential, BedrockConfig},
    error::{Result, StudioError},
    models::{data_uri, ImageGenerationRequest, ImageGenerationResponse, ModelInfo, TitanImageResponse},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};
use serde_json::json;

use super::ImageGenerator;

#[derive(Clone)]
pub struct BedrockImageClient {
    client: Client,
    model_id: String,
}

impl BedrockImageClient {
    /// Requires explicit credentials; the default AWS chain is not consulted
    /// so that a missing key surfaces as a configuration error up front.
    pub async fn new(config: BedrockConfig) -> Result<Self> {
        let (access_key, secret_key) = match (
            credential(&config.access_key),
            credential(&config.secret_key),
        ) {
            (Some(access_key), Some(secret_key)) => (access_key, secret_key),
            _ => {
                return Err(StudioError::ConfigError(
                    "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY are required for Bedrock".into(),
                ))
            }
        };

        let aws_config = aws_config::from_env()
            .credentials_provider(aws_sdk_bedrockruntime::config::Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "brandkit",
            ))
            .region(aws_sdk_bedrockruntime::config::Region::new(
                config
                    .region
                    .clone()
                    .unwrap_or_else(|| "us-east-1".to_string()),
            ))
            .load()
            .await;

        Ok(Self {
            client: Client::new(&aws_config),
            model_id: config.model_id,
        })
    }

    pub fn supported_models() -> Vec<ModelInfo> {
        vec![
            ModelInfo {
                id: "amazon.titan-image-generator-v1",
                name: "Titan Image Generator G1",
                provider: "Amazon",
                description: "TEXT_IMAGE task on AWS Bedrock",
            },
            ModelInfo {
                id: "amazon.titan-image-generator-v2:0",
                name: "Titan Image Generator G1 v2",
                provider: "Amazon",
                description: "TEXT_IMAGE task on AWS Bedrock",
            },
        ]
    }

    fn build_payload(request: &ImageGenerationRequest, model_id: &str) -> Result<serde_json::Value> {
        let (width, height) = request.aspect_ratio.dimensions();
        match model_id {
            id if id.starts_with("amazon.titan-image-generator") => Ok(json!({
                "taskType": "TEXT_IMAGE",
                "textToImageParams": {
                    "text": request.prompt,
                },
                "imageGenerationConfig": {
                    "numberOfImages": request.num_images,
                    "width": width,
                    "height": height,
                    "quality": "standard",
                    "cfgScale": 8.0
                }
            })),
            _ => Err(StudioError::RequestError(format!(
                "Unsupported image model: {}",
                model_id
            ))),
        }
    }
}

#[async_trait]
impl ImageGenerator for BedrockImageClient {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        let model_id = request.model_id.as_deref().unwrap_or(&self.model_id).to_string();
        let request_payload = Self::build_payload(&request, &model_id)?;

        let request_json = serde_json::to_string(&request_payload)
            .map_err(|e| StudioError::SerializationError(e.to_string()))?;

        log::info!(
            "Generating image with model: {} ({})",
            model_id,
            request.aspect_ratio
        );

        let response = self
            .client
            .invoke_model()
            .model_id(&model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| {
                if let Some(service_error) = e.as_service_error() {
                    StudioError::AwsServiceError(format!(
                        "{} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    StudioError::AwsError(e.to_string())
                }
            })?;

        let response_bytes = response.body.into_inner();
        let response_str = String::from_utf8(response_bytes)
            .map_err(|e| StudioError::ResponseError(e.to_string()))?;

        let titan_response: TitanImageResponse = serde_json::from_str(&response_str)
            .map_err(|e| StudioError::ResponseError(e.to_string()))?;

        let image = titan_response
            .images
            .into_iter()
            .find(|image| !image.is_empty())
            .ok_or_else(|| StudioError::NoImageData(request.prompt.clone()))?;

        Ok(ImageGenerationResponse {
            image_locator: data_uri("image/png", &image),
            model: model_id,
        })
    }

    fn name(&self) -> &str {
        "bedrock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AspectRatio;

    #[test]
    fn test_titan_payload_uses_ratio_dimensions() {
        let request = ImageGenerationRequest::new("banner", AspectRatio::Landscape);
        let payload =
            BedrockImageClient::build_payload(&request, "amazon.titan-image-generator-v1").unwrap();

        assert_eq!(payload["taskType"], "TEXT_IMAGE");
        assert_eq!(payload["textToImageParams"]["text"], "banner");
        assert_eq!(payload["imageGenerationConfig"]["width"], 1408);
        assert_eq!(payload["imageGenerationConfig"]["height"], 768);
        assert_eq!(payload["imageGenerationConfig"]["numberOfImages"], 1);
    }

    #[test]
    fn test_unsupported_model_rejected() {
        let request = ImageGenerationRequest::new("banner", AspectRatio::Square);
        let err = BedrockImageClient::build_payload(&request, "stability.sd3-large-v1:0").unwrap_err();
        assert!(matches!(err, StudioError::RequestError(_)));
    }

    #[tokio::test]
    async fn test_missing_credentials_is_config_error() {
        let err = BedrockImageClient::new(BedrockConfig::new().with_region("us-west-2"))
            .await
            .err()
            .unwrap();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn test_blank_credentials_are_config_error() {
        for (access, secret) in [("", ""), ("AKIA", "  "), (" ", "secret")] {
            let err = BedrockImageClient::new(BedrockConfig::new().with_credentials(access, secret))
                .await
                .err()
                .unwrap();
            assert!(err.is_config());
        }
    }

    #[test]
    fn test_supported_models_lists_default() {
        let models = BedrockImageClient::supported_models();
        assert!(models.iter().any(|m| m.id == crate::config::DEFAULT_TITAN_MODEL));
    }
}
