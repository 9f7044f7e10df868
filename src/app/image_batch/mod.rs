// Image batch interactor - Orchestrates the image conversion use case

use std::sync::Arc;

use tracing::{info, warn};

use crate::app::collision::decide_policy;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::ImageConverter;
use crate::output::{find_conflicts, OutputWriter};
use crate::ports::*;

/// Interactor for the image batch use case
pub struct ImageBatchInteractor {
    converter: ImageConverter,
    prompt_port: Arc<dyn ConflictPromptPort>,
    observer: Arc<dyn BatchObserver>,
}

impl ImageBatchInteractor {
    /// Create new image batch interactor with injected ports
    pub fn new(prompt_port: Arc<dyn ConflictPromptPort>, observer: Arc<dyn BatchObserver>) -> Self {
        Self {
            converter: ImageConverter::new(),
            prompt_port,
            observer,
        }
    }

    /// Convert every collected image.
    ///
    /// Batch-level problems (bad settings, empty collection, unusable output
    /// directory) are returned as errors before any file is touched and leave
    /// the collection intact. Per-file failures are recorded and the batch
    /// continues; the collection is emptied once the batch completes.
    pub async fn execute(
        &self,
        collection: &mut SourceCollection,
        settings: &ImageBatchSettings,
    ) -> Result<BatchResult, DomainError> {
        settings.validate()?;
        if collection.is_empty() {
            return Err(DomainError::EmptyBatch);
        }
        if let Some(dir) = &settings.output_dir {
            OutputWriter::ensure_output_directory(dir)?;
        }

        let sources = collection.paths();
        let conflicts = find_conflicts(
            sources.iter().map(|p| p.as_path()),
            settings.format.extension(),
            settings.output_dir.as_deref(),
        );
        let policy = decide_policy(settings.conflict, &conflicts, self.prompt_port.as_ref()).await?;

        info!(
            "Converting {} image(s) to {}",
            sources.len(),
            settings.format
        );

        let total = sources.len();
        let mut result = BatchResult::new();
        for (index, source) in sources.iter().enumerate() {
            self.observer.file_started(index, total, source);

            let request = settings.request_for(source, policy);
            let converter = self.converter;
            let worker = tokio::task::spawn_blocking(move || converter.convert(&request));
            let outcome = match worker.await {
                Ok(outcome) => outcome,
                Err(e) => Err(DomainError::InternalError(format!(
                    "Image worker failed: {}",
                    e
                ))),
            };

            match outcome {
                Ok(output) => {
                    self.observer.file_finished(source, Ok(&output));
                    result.record_success(output);
                }
                Err(e) => {
                    warn!("Failed to convert {}: {}", source.display(), e);
                    self.observer.file_finished(source, Err(&e));
                    result.record_failure(source, &e);
                }
            }
        }

        result.finish();
        collection.drain();
        info!(
            "Image batch finished: {}/{} succeeded",
            result.succeeded, result.attempted
        );
        self.observer.batch_finished(&result);
        Ok(result)
    }
}
