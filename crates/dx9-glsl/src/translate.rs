//! Stage entry points, the translation result, and an in-memory translation cache.

use std::borrow::Cow;
use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::{debug, trace};

use crate::analysis::{analyze, Semantic, ShaderAnalysis};
use crate::error::TranslateError;
use crate::glsl::body::generate_body;
use crate::glsl::decl::{sampler_uniforms, uniform_arrays, write_declarations};
use crate::glsl::io::{write_input_assignments, write_output_assignments};
use crate::glsl::names::attribute_name;
use crate::glsl::{SamplerUniform, UniformArray};
use crate::options::{TextureFormat, TranslateOptions};
use crate::sm::decode::{decode_tokens, words_from_le_bytes};
use crate::sm::types::{ShaderStage, ShaderVersion};

/// A vertex attribute the program reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Input register (`v#`).
    pub register: u32,
    pub semantic: Semantic,
    /// GLSL attribute name, including the leading underscore of the `attribute` declaration.
    pub name: String,
}

/// Everything a caller needs to bind the generated program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMap {
    pub uniforms: Vec<UniformArray>,
    pub samplers: Vec<SamplerUniform>,
    pub attributes: Vec<VertexAttribute>,
    /// Smallest and largest base register used with relative constant addressing.
    pub relative_constant_range: Option<(u32, u32)>,
    pub writes_fog: bool,
    /// Distinct (sampler, format) pairs sampled by texture instructions. A change of bound format
    /// for one of these samplers needs a recompile.
    pub sampled_textures: Vec<(u32, TextureFormat)>,
}

impl ParameterMap {
    fn new(
        analysis: &ShaderAnalysis,
        options: &TranslateOptions,
        sampled_textures: Vec<(u32, TextureFormat)>,
    ) -> Self {
        let attributes = analysis
            .usage
            .attributes
            .iter()
            .enumerate()
            .filter_map(|(register, semantic)| {
                semantic.map(|semantic| VertexAttribute {
                    register: register as u32,
                    semantic,
                    name: format!(
                        "_{}",
                        attribute_name(semantic.usage.attribute_name(), semantic.index)
                    ),
                })
            })
            .collect();
        Self {
            uniforms: uniform_arrays(analysis, options),
            samplers: sampler_uniforms(analysis),
            attributes,
            relative_constant_range: analysis.usage.relative_offset_range,
            writes_fog: analysis.usage.uses_fog,
            sampled_textures,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedShader {
    pub version: ShaderVersion,
    pub glsl: String,
    pub parameters: ParameterMap,
}

impl TranslatedShader {
    pub fn stage(&self) -> ShaderStage {
        self.version.stage
    }
}

pub fn translate_vertex_shader(
    tokens: &[u32],
    options: &TranslateOptions,
) -> Result<TranslatedShader, TranslateError> {
    translate(ShaderStage::Vertex, tokens, options)
}

/// Pixel shaders never see skinning constants, so `has_bone_consts` is ignored.
pub fn translate_pixel_shader(
    tokens: &[u32],
    options: &TranslateOptions,
) -> Result<TranslatedShader, TranslateError> {
    translate(ShaderStage::Pixel, tokens, options)
}

pub fn translate_vertex_shader_bytes(
    bytes: &[u8],
    options: &TranslateOptions,
) -> Result<TranslatedShader, TranslateError> {
    translate_vertex_shader(&words_from_le_bytes(bytes)?, options)
}

pub fn translate_pixel_shader_bytes(
    bytes: &[u8],
    options: &TranslateOptions,
) -> Result<TranslatedShader, TranslateError> {
    translate_pixel_shader(&words_from_le_bytes(bytes)?, options)
}

pub fn translate(
    stage: ShaderStage,
    tokens: &[u32],
    options: &TranslateOptions,
) -> Result<TranslatedShader, TranslateError> {
    let shader = decode_tokens(tokens)?;
    let version = shader.version;
    if version.stage != stage {
        return Err(TranslateError::StageMismatch {
            expected: stage,
            found: version.stage,
        });
    }
    debug!(
        %stage,
        major = version.major,
        minor = version.minor,
        instructions = shader.instructions.len(),
        "translating shader"
    );

    let options = match stage {
        ShaderStage::Pixel if options.has_bone_consts => Cow::Owned(TranslateOptions {
            has_bone_consts: false,
            ..options.clone()
        }),
        _ => Cow::Borrowed(options),
    };

    let analysis = analyze(&shader)?;
    let body = generate_body(&shader, &analysis, &options)?;

    let mut glsl = String::with_capacity(body.main.len() + 2048);
    write_declarations(&mut glsl, &analysis, &options)?;
    write_input_assignments(&mut glsl, &analysis)?;
    glsl.push_str(&body.main);
    write_output_assignments(&mut glsl, &analysis)?;
    glsl.push_str("}\n");
    for subroutine in &body.subroutines {
        glsl.push_str(subroutine);
    }

    debug!(%stage, glsl_len = glsl.len(), "translated shader");
    Ok(TranslatedShader {
        version,
        glsl,
        parameters: ParameterMap::new(&analysis, &options, body.sampled_textures),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderCacheLookupSource {
    /// The shader was already present in the in-memory cache.
    Memory,
    /// The translator ran and the output was inserted into the in-memory cache.
    Translated,
}

#[derive(Debug)]
pub struct ShaderCacheLookup<'a> {
    pub source: ShaderCacheLookupSource,
    shader: &'a TranslatedShader,
}

impl std::ops::Deref for ShaderCacheLookup<'_> {
    type Target = TranslatedShader;

    fn deref(&self) -> &Self::Target {
        self.shader
    }
}

/// Bounded in-memory cache of translations keyed by a hash of stage, options and bytecode.
///
/// Failed translations are not cached.
pub struct ShaderCache {
    cache: LruCache<blake3::Hash, TranslatedShader>,
    options: TranslateOptions,
}

impl ShaderCache {
    pub fn new(options: TranslateOptions, capacity: NonZeroUsize) -> Self {
        Self {
            cache: LruCache::new(capacity),
            options,
        }
    }

    pub fn options(&self) -> &TranslateOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TranslateOptions) {
        if self.options != options {
            self.options = options;
            self.cache.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn key(&self, stage: ShaderStage, bytes: &[u8]) -> blake3::Hash {
        let options = &self.options;
        let layout = &options.constant_layout;
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[
            stage as u8,
            u8::from(options.has_global_consts),
            u8::from(options.has_bone_consts),
        ]);
        for value in [
            layout.vs_global_base,
            layout.ps_global_base,
            layout.bone_base,
            layout.vs_global_vectors,
            layout.ps_global_vectors,
            layout.bone_vectors,
        ] {
            hasher.update(&value.to_le_bytes());
        }
        hasher.update(&(options.sampler_formats.len() as u32).to_le_bytes());
        for (sampler, format) in &options.sampler_formats {
            hasher.update(&sampler.to_le_bytes());
            hasher.update(&format.to_d3d().to_le_bytes());
        }
        hasher.update(bytes);
        hasher.finalize()
    }

    pub fn get_or_translate(
        &mut self,
        stage: ShaderStage,
        bytes: &[u8],
    ) -> Result<ShaderCacheLookup<'_>, TranslateError> {
        let key = self.key(stage, bytes);
        let options = &self.options;
        let mut source = ShaderCacheLookupSource::Memory;
        let shader = self.cache.try_get_or_insert(key, || {
            source = ShaderCacheLookupSource::Translated;
            translate(stage, &words_from_le_bytes(bytes)?, options)
        })?;
        trace!(hash = %key, ?source, "shader cache lookup");
        Ok(ShaderCacheLookup { source, shader })
    }
}

impl Default for ShaderCache {
    fn default() -> Self {
        const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
            Some(capacity) => capacity,
            None => NonZeroUsize::MIN,
        };
        Self::new(TranslateOptions::default(), DEFAULT_CAPACITY)
    }
}
