//! Texture2D projection and texture formats

pub mod formats;
pub mod types;

pub use formats::TextureFormat;
pub use types::{StreamingInfo, Texture2D};
