//! AudioClip projection and audio formats

pub mod formats;
pub mod types;

pub use formats::{AudioCompressionFormat, AudioLoadType};
pub use types::{AudioClip, StreamedResource};
