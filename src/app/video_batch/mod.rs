// Video batch interactor - Orchestrates the video conversion use case

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::app::collision::decide_policy;
use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::VideoConverter;
use crate::output::{find_conflicts, OutputWriter};
use crate::ports::*;

/// Interactor for the video batch use case
pub struct VideoBatchInteractor {
    converter: VideoConverter,
    prompt_port: Arc<dyn ConflictPromptPort>,
    observer: Arc<dyn BatchObserver>,
}

impl VideoBatchInteractor {
    /// Create new video batch interactor with injected ports
    pub fn new(
        execute_port: Arc<dyn ExecutePort>,
        probe_port: Arc<dyn ProbePort>,
        prompt_port: Arc<dyn ConflictPromptPort>,
        observer: Arc<dyn BatchObserver>,
    ) -> Self {
        Self {
            converter: VideoConverter::new(execute_port, probe_port),
            prompt_port,
            observer,
        }
    }

    /// Convert every collected video, one transcoder run at a time.
    ///
    /// An unusable transcoder aborts the batch before any file is processed.
    /// Dropping the returned future stops the running transcode.
    pub async fn execute(
        &self,
        collection: &mut SourceCollection,
        settings: &VideoBatchSettings,
    ) -> Result<BatchResult, DomainError> {
        settings.validate()?;
        if collection.is_empty() {
            return Err(DomainError::EmptyBatch);
        }

        let version = self.converter.check_available().await.map_err(|e| {
            error!("Transcoder unavailable: {}", e);
            e
        })?;
        info!("Using {}", version);

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
            "Converting {} video(s) to {} (crf {})",
            sources.len(),
            settings.format,
            settings.crf
        );

        let total = sources.len();
        let mut result = BatchResult::new();
        for (index, source) in sources.iter().enumerate() {
            self.observer.file_started(index, total, source);

            let request = settings.request_for(source, policy);
            match self.converter.convert(&request).await {
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
            "Video batch finished: {}/{} succeeded",
            result.succeeded, result.attempted
        );
        self.observer.batch_finished(&result);
        Ok(result)
    }
}
