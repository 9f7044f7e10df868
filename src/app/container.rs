use std::sync::Arc;

use crate::adapters::{FFmpegAdapter, FFprobeAdapter};
use crate::app::{image_batch::ImageBatchInteractor, video_batch::VideoBatchInteractor};
use crate::config_initialization::ToolPaths;
use crate::ports::{BatchObserver, ConflictPromptPort, ExecutePort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn image_batch(&self) -> Arc<ImageBatchInteractor>;
    fn video_batch(&self) -> Arc<VideoBatchInteractor>;
}

pub struct DefaultAppContainer {
    image_batch: Arc<ImageBatchInteractor>,
    video_batch: Arc<VideoBatchInteractor>,
}

impl DefaultAppContainer {
    /// Wire the process-spawning adapters
    pub fn new(
        tools: &ToolPaths,
        prompt_port: Arc<dyn ConflictPromptPort>,
        observer: Arc<dyn BatchObserver>,
    ) -> Self {
        let execute_port = Arc::new(FFmpegAdapter::new(&tools.ffmpeg));
        let probe_port = Arc::new(FFprobeAdapter::new(&tools.ffprobe));
        Self::with_ports(execute_port, probe_port, prompt_port, observer)
    }

    /// Wire arbitrary port implementations
    pub fn with_ports(
        execute_port: Arc<dyn ExecutePort>,
        probe_port: Arc<dyn ProbePort>,
        prompt_port: Arc<dyn ConflictPromptPort>,
        observer: Arc<dyn BatchObserver>,
    ) -> Self {
        let image_batch = Arc::new(ImageBatchInteractor::new(
            Arc::clone(&prompt_port),
            Arc::clone(&observer),
        ));

        let video_batch = Arc::new(VideoBatchInteractor::new(
            execute_port,
            probe_port,
            prompt_port,
            observer,
        ));

        Self {
            image_batch,
            video_batch,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn image_batch(&self) -> Arc<ImageBatchInteractor> {
        Arc::clone(&self.image_batch)
    }

    fn video_batch(&self) -> Arc<VideoBatchInteractor> {
        Arc::clone(&self.video_batch)
    }
}
