//! Copies between the packed D3D register arrays and GLSL builtins.
//!
//! Pixel shaders fill `IN[]` from the interpolated builtins before the body runs; vs_3_0 shaders
//! write their `OUT[]` slots to the builtins after it. Every slot is routed by its declared
//! semantic.

use std::fmt::Write as _;

use tracing::warn;

use crate::analysis::{Semantic, ShaderAnalysis};
use crate::error::TranslateError;
use crate::sm::token::{DeclUsage, WriteMask};
use crate::sm::types::ShaderStage;

fn mask_suffix(mask: WriteMask, stage: ShaderStage) -> String {
    if mask.is_empty() || mask == WriteMask::XYZW {
        String::new()
    } else {
        format!(".{}", mask.letters(stage))
    }
}

fn unsupported(semantic: &Semantic, context: &'static str) -> TranslateError {
    TranslateError::UnsupportedSemantic {
        usage: semantic.usage.attribute_name(),
        index: semantic.index,
        context,
    }
}

/// Pixel shader prologue: `IN[n] = <builtin>;` for every packed input.
pub fn write_input_assignments(
    out: &mut String,
    analysis: &ShaderAnalysis,
) -> Result<(), TranslateError> {
    const CONTEXT: &str = "pixel input";
    let stage = analysis.version.stage;
    if stage != ShaderStage::Pixel {
        return Ok(());
    }

    for (slot, semantic) in analysis.usage.packed_inputs.iter().enumerate() {
        let Some(semantic) = semantic else {
            continue;
        };
        let m = mask_suffix(semantic.mask, stage);
        match semantic.usage {
            DeclUsage::TexCoord => match semantic.index {
                8 | 9 => writeln!(out, "IN[{slot}]{m} = Un_Texcoord{}{m};", semantic.index)?,
                index if index < 8 => {
                    writeln!(out, "IN[{slot}]{m} = gl_TexCoord[{index}]{m};")?
                }
                _ => return Err(unsupported(semantic, CONTEXT)),
            },
            DeclUsage::Color => match semantic.index {
                0 => writeln!(out, "IN[{slot}]{m} = vec4(gl_Color){m};")?,
                1 => writeln!(out, "IN[{slot}]{m} = vec4(gl_SecondaryColor){m};")?,
                index => {
                    warn!(slot, index, "pixel input declared as color > 1, feeding zero");
                    writeln!(out, "IN[{slot}]{m} = vec4( 0.0, 0.0, 0.0, 0.0 ){m};")?;
                }
            },
            DeclUsage::Normal
            | DeclUsage::BlendIndices
            | DeclUsage::BlendWeight
            | DeclUsage::Tangent
            | DeclUsage::Binormal
            | DeclUsage::TessFactor
            | DeclUsage::Fog => {
                writeln!(
                    out,
                    "IN[{slot}]{m} = vec4(gl_FogFragCoord, 0.0, 0.0, 0.0){m};"
                )?;
            }
            DeclUsage::Position
            | DeclUsage::PositionT
            | DeclUsage::PSize
            | DeclUsage::Depth
            | DeclUsage::Sample => return Err(unsupported(semantic, CONTEXT)),
        }
    }
    Ok(())
}

/// vs_3_0 epilogue: `<builtin> = OUT[n];` for every declared output.
///
/// Normal, blend, tangent, binormal, tessellation factor and fog outputs all land in
/// `gl_FogFragCoord`.
pub fn write_output_assignments(
    out: &mut String,
    analysis: &ShaderAnalysis,
) -> Result<(), TranslateError> {
    const CONTEXT: &str = "vertex output";
    let stage = analysis.version.stage;
    if stage != ShaderStage::Vertex {
        return Ok(());
    }

    for (slot, semantic) in analysis.usage.packed_outputs.iter().enumerate() {
        let Some(semantic) = semantic else {
            continue;
        };
        let m = mask_suffix(semantic.mask, stage);
        match semantic.usage {
            DeclUsage::Position | DeclUsage::PositionT => {
                if semantic.index > 0 {
                    return Err(unsupported(semantic, CONTEXT));
                }
                writeln!(out, "gl_Position{m} = OUT[{slot}]{m};")?;
            }
            DeclUsage::TexCoord => match semantic.index {
                8 | 9 => writeln!(out, "Un_Texcoord{}{m} = OUT[{slot}]{m};", semantic.index)?,
                index if index < 8 => {
                    writeln!(out, "gl_TexCoord[{index}]{m} = OUT[{slot}]{m};")?
                }
                _ => return Err(unsupported(semantic, CONTEXT)),
            },
            DeclUsage::Color => match semantic.index {
                0 => {
                    writeln!(out, "gl_FrontColor{m} = OUT[{slot}]{m};")?;
                    writeln!(out, "gl_BackColor{m} = OUT[{slot}]{m};")?;
                }
                1 => {
                    writeln!(out, "gl_FrontSecondaryColor{m} = OUT[{slot}]{m};")?;
                    writeln!(out, "gl_BackSecondaryColor{m} = OUT[{slot}]{m};")?;
                }
                _ => return Err(unsupported(semantic, CONTEXT)),
            },
            DeclUsage::Normal
            | DeclUsage::BlendIndices
            | DeclUsage::BlendWeight
            | DeclUsage::Tangent
            | DeclUsage::Binormal
            | DeclUsage::TessFactor
            | DeclUsage::Fog => writeln!(out, "gl_FogFragCoord = OUT[{slot}]{m};")?,
            DeclUsage::PSize | DeclUsage::Depth | DeclUsage::Sample => {
                return Err(unsupported(semantic, CONTEXT))
            }
        }
    }
    Ok(())
}
