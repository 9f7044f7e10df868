//! Output path resolution and staged writing
//!
//! Destination paths are derived from the source name and target extension,
//! then either uniquified (`keep-both`) or replaced (`overwrite`). Every
//! engine writes into a staged temporary sibling of the destination and only
//! renames it into place once the conversion succeeded, so a failure never
//! leaves a truncated output behind.

pub mod resolver;
pub mod writer;

pub use resolver::{apply_policy, find_conflicts, resolve, uniquify};
pub use writer::{OutputWriter, StagedOutput};
