//! Direct3D 9 shader bytecode (vs/ps 1.x-3.0) to GLSL 1.20 translator.
//!
//! Bytecode is treated as **untrusted** input: malformed or unsupported streams produce a
//! [`TranslateError`] rather than a panic or partial output.
//!
//! Translation runs in three passes over the decoded instruction list:
//!
//! - [`analysis`] records which registers, samplers, semantics and constants the shader uses.
//! - [`glsl`] emits declarations, the pixel input prologue, the body, and the vs_3_0 output
//!   epilogue from that analysis.
//! - [`translate`] ties the passes together per stage and caches results.

#![forbid(unsafe_code)]

pub mod analysis;
pub mod error;
pub mod glsl;
pub mod options;
pub mod shader_limits;
pub mod sm;
pub mod translate;

#[cfg(test)]
mod tests;

pub use crate::analysis::{analyze, Semantic, ShaderAnalysis};
pub use crate::error::TranslateError;
pub use crate::options::{ConstantLayout, TextureFormat, TranslateOptions};
pub use crate::sm::decode::{decode_tokens, words_from_le_bytes, DecodeError};
pub use crate::sm::types::{ShaderStage, ShaderVersion};
pub use crate::translate::{
    translate, translate_pixel_shader, translate_pixel_shader_bytes, translate_vertex_shader,
    translate_vertex_shader_bytes, ParameterMap, ShaderCache, ShaderCacheLookup,
    ShaderCacheLookupSource, TranslatedShader, VertexAttribute,
};
