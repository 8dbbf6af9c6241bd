//! Fans a brand prompt out into one generation call per template slot and
//! gathers whatever succeeds.

use crate::{
    error::{DesignFailure, Result, StudioError},
    generation::{shared_handle, GeneratorHandle, ImageGenerator},
    logger,
    models::{GeneratedDesign, GenerationRequest, ImageGenerationRequest},
    prompt,
};
use futures::future::join_all;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::sync::Arc;

/// Final arrangement of a batch before it is handed to the caller.
pub trait ShuffleStrategy: Send + Sync {
    fn arrange(&self, designs: &mut Vec<GeneratedDesign>);
}

/// Non-reproducible order, so the template grouping is not visible.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomShuffle;

impl ShuffleStrategy for RandomShuffle {
    fn arrange(&self, designs: &mut Vec<GeneratedDesign>) {
        designs.shuffle(&mut rand::thread_rng());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SeededShuffle(pub u64);

impl ShuffleStrategy for SeededShuffle {
    fn arrange(&self, designs: &mut Vec<GeneratedDesign>) {
        designs.shuffle(&mut StdRng::seed_from_u64(self.0));
    }
}

/// Leaves designs in template order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateOrder;

impl ShuffleStrategy for TemplateOrder {
    fn arrange(&self, _designs: &mut Vec<GeneratedDesign>) {}
}

pub struct BatchOrchestrator {
    handle: Arc<GeneratorHandle>,
    shuffle: Arc<dyn ShuffleStrategy>,
}

impl BatchOrchestrator {
    pub fn new(handle: Arc<GeneratorHandle>) -> Self {
        Self {
            handle,
            shuffle: Arc::new(RandomShuffle),
        }
    }

    pub fn with_generator(generator: Arc<dyn ImageGenerator>) -> Self {
        Self::new(Arc::new(GeneratorHandle::ready(generator)))
    }

    pub fn with_shuffle(mut self, shuffle: impl ShuffleStrategy + 'static) -> Self {
        self.shuffle = Arc::new(shuffle);
        self
    }

    /// Generates one design per template slot, concurrently.
    ///
    /// Waits for every call to settle. Individual failures are logged and
    /// dropped; only a batch where nothing succeeded is an error.
    pub async fn generate_batch(&self, base_prompt: &str) -> Result<Vec<GeneratedDesign>> {
        let generator = self.handle.get().await?;
        let requests = prompt::expand(base_prompt);
        let attempted = requests.len();
        let batch_stamp = chrono::Utc::now().timestamp_millis();

        log::info!(
            "Generating {} designs with {} for: {}",
            attempted,
            generator.name(),
            base_prompt
        );
        let timer = logger::timer("design batch");

        let tasks = requests.into_iter().map(|request| {
            let generator = Arc::clone(&generator);
            let sequence_index = request.sequence_index;
            let category = request.category;
            let task = tokio::spawn(async move {
                generate_single(generator.as_ref(), request, batch_stamp).await
            });
            async move {
                match task.await {
                    Ok(outcome) => outcome,
                    Err(join_error) => Err(DesignFailure {
                        sequence_index,
                        category,
                        error: StudioError::RequestError(format!(
                            "generation task aborted: {}",
                            join_error
                        )),
                    }),
                }
            }
        });

        let outcomes = join_all(tasks).await;

        let mut designs = Vec::with_capacity(attempted);
        let mut failed = 0usize;
        for outcome in outcomes {
            match outcome {
                Ok(design) => designs.push(design),
                Err(failure) => {
                    failed += 1;
                    log::warn!("A design for '{}' failed to generate: {}", base_prompt, failure);
                }
            }
        }
        drop(timer);

        if designs.is_empty() {
            log::error!("All {} designs failed for: {}", attempted, base_prompt);
            return Err(StudioError::BatchFailed { attempted });
        }

        log::info!(
            "Batch complete: {} generated, {} failed",
            designs.len(),
            failed
        );

        self.shuffle.arrange(&mut designs);
        Ok(designs)
    }
}

async fn generate_single(
    generator: &dyn ImageGenerator,
    request: GenerationRequest,
    batch_stamp: i64,
) -> std::result::Result<GeneratedDesign, DesignFailure> {
    let image_request = ImageGenerationRequest::new(request.prompt(), request.aspect_ratio);

    let locator = match generator.generate(image_request).await {
        Ok(response) if !response.image_locator.is_empty() => Ok(response.image_locator),
        Ok(_) => Err(StudioError::NoImageData(request.category.to_string())),
        Err(error) => Err(error),
    }
    .map_err(|error| DesignFailure {
        sequence_index: request.sequence_index,
        category: request.category,
        error,
    })?;

    log::debug!(
        "Design #{} ({}) generated",
        request.sequence_index,
        request.category
    );

    Ok(GeneratedDesign {
        id: format!("{}-{}", batch_stamp, request.sequence_index),
        category: request.category,
        aspect_ratio: request.aspect_ratio,
        image_locator: locator,
        resolved_prompt: request.prompt().to_string(),
    })
}

/// Generates a batch through the process-wide generator configured from the
/// environment.
pub async fn generate_designs(base_prompt: &str) -> Result<Vec<GeneratedDesign>> {
    BatchOrchestrator::new(shared_handle())
        .generate_batch(base_prompt)
        .await
}
