//! Mesh projection

pub mod parser;
pub mod types;

pub use types::{ChannelUsage, Mesh, VertexChannel, VertexFormat};
