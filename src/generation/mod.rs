#[cfg(feature = "bedrock")]
pub mod bedrock_client;
pub mod gemini_client;
pub mod placeholder;

use crate::{
    config::{Provider, StudioConfig},
    error::{Result, StudioError},
    models::{ImageGenerationRequest, ImageGenerationResponse},
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::OnceCell;

#[cfg(feature = "bedrock")]
pub use bedrock_client::BedrockImageClient;
pub use gemini_client::GeminiImageClient;
pub use placeholder::PlaceholderImageGenerator;

/// A remote (or simulated) text-to-image capability.
///
/// Implementations return exactly one image per call or fail. They must not
/// retry on their own.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: ImageGenerationRequest) -> Result<ImageGenerationResponse>;

    fn name(&self) -> &str;
}

/// Builds a fresh generator for the configured provider.
///
/// Credentials are checked here, so a missing key fails before any request.
pub async fn build_generator(config: &StudioConfig) -> Result<Arc<dyn ImageGenerator>> {
    let generator: Arc<dyn ImageGenerator> = match config.provider {
        Provider::Gemini => Arc::new(GeminiImageClient::new(config.gemini.clone())?),
        Provider::Bedrock => {
            #[cfg(feature = "bedrock")]
            {
                Arc::new(BedrockImageClient::new(config.bedrock.clone()).await?)
            }
            #[cfg(not(feature = "bedrock"))]
            {
                return Err(StudioError::ConfigError(
                    "Bedrock feature not enabled".into(),
                ));
            }
        }
        Provider::Placeholder => Arc::new(PlaceholderImageGenerator::new()),
    };

    log::info!("Image generator ready: {}", generator.name());
    Ok(generator)
}

/// Where a lazy handle gets its configuration from.
enum ConfigSource {
    Fixed(StudioConfig),
    /// Called again on every construction attempt.
    Loader(fn() -> StudioConfig),
    None,
}

/// Lazily constructed, reusable generator.
///
/// Concurrent first callers share one construction. A failed construction
/// leaves the handle empty so the next call tries again.
pub struct GeneratorHandle {
    source: ConfigSource,
    cell: OnceCell<Arc<dyn ImageGenerator>>,
}

impl GeneratorHandle {
    pub fn lazy(config: StudioConfig) -> Self {
        Self {
            source: ConfigSource::Fixed(config),
            cell: OnceCell::new(),
        }
    }

    /// Reloads the configuration each time construction is attempted, so a
    /// retry after a failure sees corrected settings.
    pub fn with_loader(loader: fn() -> StudioConfig) -> Self {
        Self {
            source: ConfigSource::Loader(loader),
            cell: OnceCell::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::with_loader(StudioConfig::from_env)
    }

    pub fn ready(generator: Arc<dyn ImageGenerator>) -> Self {
        Self {
            source: ConfigSource::None,
            cell: OnceCell::new_with(Some(generator)),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn get(&self) -> Result<Arc<dyn ImageGenerator>> {
        let generator = self
            .cell
            .get_or_try_init(|| async {
                match &self.source {
                    ConfigSource::Fixed(config) => build_generator(config).await,
                    ConfigSource::Loader(load) => build_generator(&load()).await,
                    ConfigSource::None => Err(StudioError::ConfigError(
                        "Generator handle has no configuration".into(),
                    )),
                }
            })
            .await?;
        Ok(Arc::clone(generator))
    }
}

static SHARED_HANDLE: Lazy<Arc<GeneratorHandle>> =
    Lazy::new(|| Arc::new(GeneratorHandle::from_env()));

/// Process-wide handle. The environment is read on every construction
/// attempt until one succeeds.
pub fn shared_handle() -> Arc<GeneratorHandle> {
    Arc::clone(&SHARED_HANDLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeminiConfig;
    use crate::models::AspectRatio;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_lazy_handle_is_idempotent() {
        let handle = GeneratorHandle::lazy(StudioConfig::new().with_provider(Provider::Placeholder));
        assert!(!handle.is_initialized());

        let first = handle.get().await.unwrap();
        let second = handle.get().await.unwrap();
        assert!(handle.is_initialized());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_concurrent_init_builds_once() {
        let handle = Arc::new(GeneratorHandle::lazy(
            StudioConfig::new().with_provider(Provider::Placeholder),
        ));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let handle = Arc::clone(&handle);
                tokio::spawn(async move { handle.get().await.unwrap() })
            })
            .collect();

        let generators: Vec<_> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        for generator in &generators[1..] {
            assert!(Arc::ptr_eq(&generators[0], generator));
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let handle = GeneratorHandle::lazy(StudioConfig::new().with_gemini(GeminiConfig::new()));
        let err = handle.get().await.err().unwrap();
        assert!(err.is_config());
        assert!(!handle.is_initialized());
    }

    static LOADS: AtomicUsize = AtomicUsize::new(0);

    fn key_then_placeholder() -> StudioConfig {
        match LOADS.fetch_add(1, Ordering::SeqCst) {
            0 => StudioConfig::new().with_gemini(GeminiConfig::new().with_api_key(" ")),
            _ => StudioConfig::new().with_provider(Provider::Placeholder),
        }
    }

    #[tokio::test]
    async fn test_loader_is_consulted_again_after_failure() {
        let handle = GeneratorHandle::with_loader(key_then_placeholder);

        let err = handle.get().await.err().unwrap();
        assert!(err.is_config());
        assert!(!handle.is_initialized());

        let generator = handle.get().await.unwrap();
        assert_eq!(generator.name(), "placeholder");
        assert_eq!(LOADS.load(Ordering::SeqCst), 2);

        handle.get().await.unwrap();
        assert_eq!(LOADS.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_ready_handle_returns_given_generator() {
        let generator: Arc<dyn ImageGenerator> = Arc::new(PlaceholderImageGenerator::new());
        let handle = GeneratorHandle::ready(Arc::clone(&generator));
        let resolved = handle.get().await.unwrap();
        assert!(Arc::ptr_eq(&generator, &resolved));

        let response = resolved
            .generate(ImageGenerationRequest::new("a prompt", AspectRatio::Square))
            .await
            .unwrap();
        assert!(!response.image_locator.is_empty());
    }
}
