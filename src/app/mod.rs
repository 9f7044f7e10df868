// Application layer - Use case interactors

pub mod collision;
pub mod container;
pub mod image_batch;
pub mod video_batch;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use image_batch::ImageBatchInteractor;
pub use video_batch::VideoBatchInteractor;
