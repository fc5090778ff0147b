//! GLSL preamble: version and extension pragmas, uniforms, samplers, register storage and local
//! constants, up to the opening of `main`.
//!
//! Uniform arrays are sized by the shader model's limits rather than by observed usage, so
//! relative addressing anywhere in the register file stays in bounds.

use std::fmt::Write as _;

use crate::analysis::{ShaderAnalysis, Varying};
use crate::error::TranslateError;
use crate::glsl::names::attribute_name;
use crate::options::TranslateOptions;
use crate::shader_limits::PIXEL_INPUT_ARRAY_LEN;
use crate::sm::token::TextureType;
use crate::sm::types::ShaderStage;

pub const GLSL_HEADER: &str = "#version 120\n\
#extension GL_EXT_bindable_uniform : require\n\
#extension GL_ARB_shader_texture_lod : require\n\n";

/// A uniform array the generated program expects the caller to bind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniformArray {
    pub name: String,
    /// GLSL element type (`vec4`, `ivec4`, `bool`).
    pub glsl_type: &'static str,
    pub len: u32,
    /// Declared with `bindable uniform` (EXT_bindable_uniform buffer-backed storage).
    pub bindable: bool,
}

/// A sampler uniform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SamplerUniform {
    pub sampler: u32,
    pub name: String,
    pub texture_type: TextureType,
}

/// Uniform arrays in declaration order.
pub fn uniform_arrays(analysis: &ShaderAnalysis, options: &TranslateOptions) -> Vec<UniformArray> {
    let prefix = analysis.version.stage.uniform_prefix();
    let limits = &analysis.limits;
    let layout = &options.constant_layout;
    let array = |name: &str, glsl_type: &'static str, len: u32, bindable: bool| UniformArray {
        name: format!("{prefix}{name}"),
        glsl_type,
        len,
        bindable,
    };

    let mut arrays = Vec::new();
    if limits.const_floats > 0 {
        arrays.push(array("ConstFloat", "vec4", limits.const_floats, true));
    }
    if options.has_global_consts {
        arrays.push(array("ConstGlobal", "vec4", layout.global_array_len(), true));
    }
    if options.has_bone_consts {
        // Skinning matrices only ever feed vertex shaders.
        arrays.push(UniformArray {
            name: "VConstBones".to_owned(),
            glsl_type: "vec4",
            len: layout.bone_vectors,
            bindable: true,
        });
    }
    if limits.const_ints > 0 {
        arrays.push(array("ConstInt", "ivec4", limits.const_ints, false));
    }
    if limits.const_bools > 0 {
        arrays.push(array("ConstBool", "bool", limits.const_bools, true));
    }
    arrays
}

pub fn sampler_uniforms(analysis: &ShaderAnalysis) -> Vec<SamplerUniform> {
    let prefix = analysis.version.stage.uniform_prefix();
    analysis
        .usage
        .samplers
        .iter()
        .enumerate()
        .filter_map(|(index, texture_type)| {
            texture_type.map(|texture_type| SamplerUniform {
                sampler: index as u32,
                name: format!("{prefix}Sampler{index}"),
                texture_type,
            })
        })
        .collect()
}

pub fn write_declarations(
    out: &mut String,
    analysis: &ShaderAnalysis,
    options: &TranslateOptions,
) -> Result<(), TranslateError> {
    let usage = &analysis.usage;
    let stage = analysis.version.stage;

    out.push_str(GLSL_HEADER);

    for (label, _) in usage.labels.iter().enumerate().filter(|(_, used)| **used) {
        writeln!(out, "void LabelFunction{label}();")?;
    }

    for array in uniform_arrays(analysis, options) {
        let storage = if array.bindable {
            "bindable uniform"
        } else {
            "uniform"
        };
        writeln!(
            out,
            "{storage} {} {}[{}];",
            array.glsl_type, array.name, array.len
        )?;
    }

    for sampler in sampler_uniforms(analysis) {
        writeln!(
            out,
            "uniform sampler{} {};",
            sampler.texture_type.glsl_suffix(),
            sampler.name
        )?;
    }

    if usage.address_register {
        out.push_str("\nivec4 Address0;\n");
    }

    for (index, _) in usage.texcoords.iter().enumerate().filter(|(_, used)| **used) {
        writeln!(out, "vec4 Texture{index} = gl_TexCoord[{index}];")?;
    }

    if stage == ShaderStage::Pixel {
        write!(out, "\nvec4 IN[{PIXEL_INPUT_ARRAY_LEN}];\n")?;
    }

    if usage.uses_varying(Varying::Texcoord8) {
        out.push_str("\nvarying vec4 Un_Texcoord8;\n");
    }
    if usage.uses_varying(Varying::Texcoord9) {
        out.push_str("\nvarying vec4 Un_Texcoord9;\n");
    }

    if analysis.limits.packed_outputs > 0 {
        write!(out, "\nvec4 OUT[{}];\n", analysis.limits.packed_outputs)?;
    }

    for (index, _) in usage.temporaries.iter().enumerate().filter(|(_, used)| **used) {
        writeln!(out, "vec4 Temporary{index};")?;
    }

    for semantic in usage.attributes.iter().flatten() {
        let name = attribute_name(semantic.usage.attribute_name(), semantic.index);
        writeln!(out, "attribute vec4 _{name};")?;
        writeln!(out, "vec4 {name} = _{name};")?;
    }

    for depth in 0..usage.max_loop_depth {
        writeln!(out, "int Loop{depth};")?;
        writeln!(out, "int LoopTemp{depth};")?;
    }

    out.push_str("\nvec4 InstrHelpTemp;\n");

    for constant in &analysis.constants.floats {
        let [x, y, z, w] = constant.value.map(f32::from_bits);
        writeln!(
            out,
            "const vec4 LocalConst{} = vec4({x:.6}, {y:.6}, {z:.6}, {w:.6});",
            constant.index
        )?;
    }

    out.push_str("\nvoid main()\n{\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{ConstantTables, DefinedConstant, RegisterUsage};
    use crate::shader_limits::ShaderLimits;
    use crate::sm::types::ShaderVersion;

    fn analysis(stage: ShaderStage, major: u8) -> ShaderAnalysis {
        let version = ShaderVersion {
            stage,
            major,
            minor: 0,
        };
        ShaderAnalysis {
            version,
            limits: ShaderLimits::for_version(version),
            usage: RegisterUsage::default(),
            constants: ConstantTables::default(),
        }
    }

    #[test]
    fn vs30_uniforms_are_sized_by_model_limits() {
        let analysis = analysis(ShaderStage::Vertex, 3);
        let options = TranslateOptions {
            has_global_consts: true,
            has_bone_consts: true,
            ..TranslateOptions::default()
        };
        let names: Vec<_> = uniform_arrays(&analysis, &options)
            .into_iter()
            .map(|array| format!("{}[{}]", array.name, array.len))
            .collect();
        assert_eq!(
            names,
            [
                "VConstFloat[256]",
                "VConstGlobal[15]",
                "VConstBones[225]",
                "VConstInt[32]",
                "VConstBool[32]"
            ]
        );
    }

    #[test]
    fn ps14_declares_only_float_constants() {
        let analysis = analysis(ShaderStage::Pixel, 1);
        let arrays = uniform_arrays(&analysis, &TranslateOptions::default());
        assert_eq!(arrays.len(), 1);
        assert_eq!(arrays[0].name, "PConstFloat");
        assert_eq!(arrays[0].len, 8);
    }

    #[test]
    fn local_constants_use_six_decimal_places() {
        let mut analysis = analysis(ShaderStage::Pixel, 2);
        analysis.constants.floats.push(DefinedConstant {
            index: 5,
            value: [0.5f32, -1.0, 0.0, 2.25].map(f32::to_bits),
        });
        let mut out = String::new();
        write_declarations(&mut out, &analysis, &TranslateOptions::default()).unwrap();
        assert!(
            out.contains("const vec4 LocalConst5 = vec4(0.500000, -1.000000, 0.000000, 2.250000);\n"),
            "{out}"
        );
        assert!(out.ends_with("\nvoid main()\n{\n"), "{out}");
    }
}
