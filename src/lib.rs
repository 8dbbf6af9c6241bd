//! Brandkit generates a batch of ten brand assets (logos, covers, banners and
//! social posts) from one short description, by fanning out concurrent calls
//! to a remote image-generation model and keeping whatever succeeds.

pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod prompt;

pub use config::{BedrockConfig, GeminiConfig, Provider, StudioConfig};
pub use error::{DesignFailure, Result, StudioError};
pub use export::DesignExporter;
pub use generation::{
    build_generator, shared_handle, GeminiImageClient, GeneratorHandle, ImageGenerator,
    PlaceholderImageGenerator,
};
#[cfg(feature = "bedrock")]
pub use generation::BedrockImageClient;
pub use models::{
    AspectRatio, DesignCategory, GeneratedDesign, GenerationRequest, ImageGenerationRequest,
    ImageGenerationResponse,
};
pub use orchestrator::{
    generate_designs, BatchOrchestrator, RandomShuffle, SeededShuffle, ShuffleStrategy,
    TemplateOrder,
};
pub use prompt::{expand, BATCH_SIZE};
