use crate::{
    error::Result,
    models::{ImageGenerationRequest, ImageGenerationResponse},
};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use super::ImageGenerator;

/// Offline generator returning sized placeholder URIs.
///
/// The locator depends only on the prompt and aspect ratio.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderImageGenerator {
    latency: Option<Duration>,
}

impl PlaceholderImageGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep before answering, to mimic a remote call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn locator_for(request: &ImageGenerationRequest) -> String {
        let mut hasher = DefaultHasher::new();
        request.prompt.hash(&mut hasher);
        let (width, height) = request.aspect_ratio.dimensions();
        format!(
            "https://picsum.photos/seed/{:016x}/{}/{}",
            hasher.finish(),
            width,
            height
        )
    }
}

#[async_trait]
impl ImageGenerator for PlaceholderImageGenerator {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        Ok(ImageGenerationResponse {
            image_locator: Self::locator_for(&request),
            model: "placeholder".to_string(),
        })
    }

    fn name(&self) -> &str {
        "placeholder"
    }
}
