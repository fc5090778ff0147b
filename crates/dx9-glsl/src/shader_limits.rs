//! Centralized limits for D3D9 shader decoding and GLSL generation.
//!
//! Shader bytecode handed to the translator is treated as untrusted input. The byte/token caps
//! bound memory usage during decoding and the slot counts size the analysis usage bitmaps.
//! [`ShaderLimits`] sizes the GLSL uniform arrays per shader model.

use tracing::warn;

use crate::sm::types::{ShaderStage, ShaderVersion};

/// Maximum accepted D3D9 shader bytecode length in bytes.
///
/// Real-world SM1-SM3 shaders are a few KiB at most; anything beyond this is rejected before a
/// token buffer is allocated for it.
pub(crate) const MAX_D3D9_SHADER_BYTECODE_BYTES: usize = 256 * 1024; // 256 KiB

/// Maximum accepted D3D9 shader token count (DWORDs / `u32`s).
pub(crate) const MAX_D3D9_SHADER_TOKEN_COUNT: usize = MAX_D3D9_SHADER_BYTECODE_BYTES / 4;

/// Slots tracked for pixel shader texture coordinate registers (`t#`).
pub(crate) const MAX_TEXCOORD_REGISTERS: usize = 8;
/// Slots tracked for temporaries (`r#`).
pub(crate) const MAX_TEMPORARY_REGISTERS: usize = 32;
/// Slots tracked for packed pixel shader inputs (`v#`).
pub(crate) const MAX_INPUT_REGISTERS: usize = 12;
/// Slots tracked for packed vertex shader outputs (`o#`).
pub(crate) const MAX_OUTPUT_REGISTERS: usize = 12;
/// Slots tracked for sampler registers (`s#`) in either stage.
pub(crate) const MAX_SAMPLERS: usize = 16;
/// Slots tracked for vertex attributes (vertex shader `v#`).
pub(crate) const MAX_ATTRIBUTE_REGISTERS: usize = 16;
/// Slots tracked for subroutine labels (`l#`).
pub(crate) const MAX_LABELS: usize = 16;

/// Element count of the generic pixel shader `IN[]` array.
pub(crate) const PIXEL_INPUT_ARRAY_LEN: u32 = 32;

/// Per-model register counts that size the emitted GLSL storage.
///
/// Uniform arrays are declared at these sizes rather than at the observed usage, so relative
/// addressing anywhere inside the model's register file stays in bounds. Usage tracking bounds
/// register indices with the `MAX_*` slot counts above instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderLimits {
    pub const_floats: u32,
    pub const_ints: u32,
    pub const_bools: u32,
    /// Length of the vs_3_0 `OUT[]` array; zero where outputs are fixed registers.
    pub packed_outputs: u32,
}

impl ShaderLimits {
    pub fn for_version(version: ShaderVersion) -> Self {
        match version.stage {
            ShaderStage::Pixel => pixel_limits(version),
            ShaderStage::Vertex => vertex_limits(version),
        }
    }
}

fn pixel_limits(version: ShaderVersion) -> ShaderLimits {
    let ps1 = ShaderLimits {
        const_floats: 8,
        const_ints: 0,
        const_bools: 0,
        packed_outputs: 0,
    };
    match (version.major, version.minor) {
        (1, 0..=4) => ps1,
        (2, _) => ShaderLimits {
            const_floats: 32,
            const_ints: 16,
            const_bools: 16,
            ..ps1
        },
        (major, minor) => {
            if major != 3 || minor != 0 {
                warn!(major, minor, "unrecognized pixel shader model, using ps_3_0 limits");
            }
            ShaderLimits {
                const_floats: 224,
                const_ints: 16,
                const_bools: 16,
                ..ps1
            }
        }
    }
}

fn vertex_limits(version: ShaderVersion) -> ShaderLimits {
    match version.major {
        1 => ShaderLimits {
            const_floats: 96,
            const_ints: 0,
            const_bools: 0,
            packed_outputs: 0,
        },
        2 => ShaderLimits {
            const_floats: 256,
            const_ints: 16,
            const_bools: 16,
            packed_outputs: 0,
        },
        major => {
            if major != 3 || version.minor != 0 {
                warn!(
                    major,
                    minor = version.minor,
                    "unrecognized vertex shader model, using vs_3_0 limits"
                );
            }
            ShaderLimits {
                const_floats: 256,
                const_ints: 32,
                const_bools: 32,
                packed_outputs: MAX_OUTPUT_REGISTERS as u32,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(stage: ShaderStage, major: u8, minor: u8) -> ShaderVersion {
        ShaderVersion {
            stage,
            major,
            minor,
        }
    }

    #[test]
    fn vs30_sizes_float_constants_to_256() {
        let limits = ShaderLimits::for_version(version(ShaderStage::Vertex, 3, 0));
        assert_eq!(limits.const_floats, 256);
        assert_eq!(limits.const_ints, 32);
        assert_eq!(limits.packed_outputs, 12);
    }

    #[test]
    fn only_vs30_packs_outputs() {
        for (major, minor) in [(1, 1), (2, 0), (2, 1)] {
            let limits = ShaderLimits::for_version(version(ShaderStage::Vertex, major, minor));
            assert_eq!(limits.packed_outputs, 0, "vs_{major}_{minor}");
        }
        let ps30 = ShaderLimits::for_version(version(ShaderStage::Pixel, 3, 0));
        assert_eq!(ps30.packed_outputs, 0);
        assert_eq!(ps30.const_floats, 224);
    }

    #[test]
    fn ps14_has_no_flow_control_constants() {
        let limits = ShaderLimits::for_version(version(ShaderStage::Pixel, 1, 4));
        assert_eq!(limits.const_floats, 8);
        assert_eq!(limits.const_ints, 0);
        assert_eq!(limits.const_bools, 0);
    }

    #[test]
    fn unknown_pixel_model_falls_back_to_ps30() {
        let fallback = ShaderLimits::for_version(version(ShaderStage::Pixel, 4, 0));
        assert_eq!(
            fallback,
            ShaderLimits::for_version(version(ShaderStage::Pixel, 3, 0))
        );
    }
}
