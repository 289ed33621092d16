//! Shader projection

pub mod parser;
pub mod types;

pub use types::{Shader, ShaderApi, ShaderPass, ShaderProgram, ShaderStage, SubShader};
