//! Shader type definitions

use crate::macros::code_enum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

code_enum! {
    /// GPU program type of a compiled sub-program
    pub enum ShaderApi {
        Unknown = 0,
        GLLegacy = 1,
        GLES31AEP = 2,
        GLES31 = 3,
        GLES3 = 4,
        GLES = 5,
        GLCore32 = 6,
        GLCore41 = 7,
        GLCore43 = 8,
        DX9VertexSM20 = 9,
        DX9VertexSM30 = 10,
        DX9PixelSM20 = 11,
        DX9PixelSM30 = 12,
        DX10Level9Vertex = 13,
        DX10Level9Pixel = 14,
        DX11VertexSM40 = 15,
        DX11VertexSM50 = 16,
        DX11PixelSM40 = 17,
        DX11PixelSM50 = 18,
        DX11GeometrySM40 = 19,
        DX11GeometrySM50 = 20,
        DX11HullSM50 = 21,
        DX11DomainSM50 = 22,
        MetalVS = 23,
        MetalFS = 24,
        SPIRV = 25,
        ConsoleVS = 26,
        ConsoleFS = 27,
        ConsoleHS = 28,
        ConsoleDS = 29,
        ConsoleGS = 30,
        RayTracing = 31,
        PS5NGGC = 32,
    }
}

/// Pipeline stage a program belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    Hull,
    Domain,
    RayTracing,
}

impl ShaderStage {
    /// Stages with the pass field holding their programs
    pub const PASS_FIELDS: [(&'static str, ShaderStage); 6] = [
        ("progVertex", ShaderStage::Vertex),
        ("progFragment", ShaderStage::Fragment),
        ("progGeometry", ShaderStage::Geometry),
        ("progHull", ShaderStage::Hull),
        ("progDomain", ShaderStage::Domain),
        ("progRayTracing", ShaderStage::RayTracing),
    ];
}

/// One compiled variant of a pass program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderProgram {
    pub api: ShaderApi,
    pub stage: ShaderStage,
    pub blob_index: u32,
    pub hw_tier: i32,
    /// Keywords enabling this variant
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderPass {
    pub name: String,
    /// Programs grouped by API, keys in first-seen order
    pub programs: IndexMap<ShaderApi, Vec<ShaderProgram>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubShader {
    pub passes: Vec<ShaderPass>,
}

/// Shader summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shader {
    pub name: String,
    /// Total size of the decompressed program blobs over all platforms
    pub decompressed_size: u64,
    /// Keywords used by any program, in first-seen order
    pub keywords: Vec<String>,
    pub sub_shaders: Vec<SubShader>,
}

impl Shader {
    /// Number of programs over all sub-shaders and passes
    pub fn program_count(&self) -> usize {
        self.sub_shaders
            .iter()
            .flat_map(|sub| &sub.passes)
            .flat_map(|pass| pass.programs.values())
            .map(Vec::len)
            .sum()
    }
}
