//! GLSL spelling of D3D9 registers, write masks, swizzles and source modifiers.

use crate::analysis::ShaderAnalysis;
use crate::error::TranslateError;
use crate::options::TranslateOptions;
use crate::sm::token::{component_letters, Param, RegisterFile, SrcModifier, WriteMask};
use crate::sm::types::ShaderStage;

/// Prefixes for the result shift codes (`_x2`, `_d4`, ...), indexed by the raw 4-bit shift.
const RESULT_SHIFT_PREFIXES: [&str; 16] = [
    "",
    "2.0 * ",
    "4.0 * ",
    "8.0 * ",
    "16.0 * ",
    "32.0 * ",
    "64.0 * ",
    "128.0 * ",
    "0.00390625 * ",
    "0.0078125 * ",
    "0.015625 * ",
    "0.03125 * ",
    "0.0625 * ",
    "0.125 * ",
    "0.25 * ",
    "0.5 * ",
];

const RASTOUT_NAMES: [&str; 3] = ["gl_Position", "gl_FogFragCoord", "gl_PointSize"];

pub(crate) fn result_shift_prefix(param: &Param) -> &'static str {
    RESULT_SHIFT_PREFIXES[usize::from(param.result_shift() & 0xF)]
}

/// A destination register split into its name and mask suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestName {
    pub register: String,
    /// `.xy`-style suffix; empty for full masks and scalar registers.
    pub mask_suffix: String,
    /// Components actually written. Scalar registers always write a single component.
    pub mask: WriteMask,
}

/// Resolves register names for one instruction.
#[derive(Clone, Copy)]
pub struct Namer<'a> {
    pub analysis: &'a ShaderAnalysis,
    pub options: &'a TranslateOptions,
    /// Register number of the innermost open `loop`, which `aL` refers to.
    pub loop_register: Option<u32>,
}

impl<'a> Namer<'a> {
    fn stage(&self) -> ShaderStage {
        self.analysis.version.stage
    }

    fn prefix(&self) -> char {
        self.stage().uniform_prefix()
    }

    /// Mask written by `param` and its suffix as it appears after the register name.
    pub fn write_mask(&self, param: &Param) -> (WriteMask, String) {
        let mask = param.write_mask();
        if param.is_scalar() {
            (WriteMask::X, String::new())
        } else if mask == WriteMask::XYZW {
            (mask, String::new())
        } else {
            (mask, format!(".{}", mask.letters(self.stage())))
        }
    }

    /// Swizzle suffix selecting, for each component in `mask`, the source component it reads.
    pub fn swizzle(&self, param: &Param, mask: WriteMask) -> String {
        if param.is_scalar() {
            return String::new();
        }
        let letters = component_letters(self.stage());
        let swizzle = param.swizzle();
        let mut out = String::with_capacity(5);
        out.push('.');
        for i in 0..4 {
            if mask.contains(WriteMask::component(i)) {
                out.push(letters[swizzle.component(i)]);
            }
        }
        out
    }

    pub fn dest(&self, param: &Param) -> Result<DestName, TranslateError> {
        let register = self.register(param)?;
        let (mask, mask_suffix) = self.write_mask(param);
        Ok(DestName {
            register,
            mask_suffix,
            mask,
        })
    }

    /// Full source expression: register, swizzle over `mask`, and source modifier.
    pub fn source(&self, param: &Param, mask: WriteMask) -> Result<String, TranslateError> {
        let reg = self.register(param)?;
        let swz = self.swizzle(param, mask);
        let modifier = SrcModifier::from_raw(param.raw_src_modifier()).ok_or(
            TranslateError::UnsupportedModifier {
                modifier: "unknown source modifier",
            },
        )?;
        Ok(match modifier {
            SrcModifier::None | SrcModifier::Dz | SrcModifier::Dw => format!("{reg}{swz}"),
            SrcModifier::Not => format!("!{reg}{swz}"),
            SrcModifier::Comp => format!("(1.0-{reg}{swz})"),
            SrcModifier::Negate => format!("-{reg}{swz}"),
            SrcModifier::Bias => format!("({reg}{swz}-vec4(0.5){swz})"),
            SrcModifier::BiasNegate => format!("-({reg}{swz}-vec4(0.5){swz})"),
            SrcModifier::Sign => format!("(2.0*({reg}{swz}-0.5))"),
            SrcModifier::SignNegate => format!("-(2.0*({reg}{swz}-0.5))"),
            SrcModifier::X2 => format!("(2.0*{reg}{swz})"),
            SrcModifier::X2Negate => format!("-(2.0*{reg}{swz})"),
            SrcModifier::Abs => format!("abs({reg}{swz})"),
            SrcModifier::AbsNegate => format!("-abs({reg}{swz})"),
        })
    }

    /// Picks the uniform array backing float constant `index` and the index within it.
    pub fn const_float_array(&self, index: u32) -> (&'static str, u32) {
        let layout = &self.options.constant_layout;
        let global_base = match self.stage() {
            ShaderStage::Pixel => layout.ps_global_base,
            ShaderStage::Vertex => layout.vs_global_base,
        };
        if self.options.has_global_consts && index >= global_base {
            ("ConstGlobal", index - global_base)
        } else if self.options.has_bone_consts && index >= layout.bone_base {
            ("ConstBones", index - layout.bone_base)
        } else {
            ("ConstFloat", index)
        }
    }

    fn address_expression(&self, param: &Param) -> Result<String, TranslateError> {
        match param.address {
            Some(address) if self.analysis.version.major >= 2 => {
                self.source(&Param::new(address), WriteMask::X)
            }
            _ => Ok("Address0.x".to_owned()),
        }
    }

    pub fn register(&self, param: &Param) -> Result<String, TranslateError> {
        let version = self.analysis.version;
        let number = param.number();
        let prefix = self.prefix();
        let unsupported = |file: RegisterFile| TranslateError::UnsupportedRegister {
            file: file.short_name(),
            index: number,
        };

        let file = param.file(version.stage, version.major);
        Ok(match file {
            RegisterFile::Const => {
                let (array, adjusted) = self.const_float_array(number);
                if param.is_relative() {
                    let address = self.address_expression(param)?;
                    if number != 0 {
                        format!("{prefix}{array}[ {address} + {adjusted} ]")
                    } else {
                        format!("{prefix}ConstFloat[ {address} ]")
                    }
                } else if self.analysis.constants.is_local_float(number) {
                    format!("LocalConst{number}")
                } else {
                    format!("{prefix}{array}[{adjusted}]")
                }
            }
            RegisterFile::ConstInt => format!("{prefix}ConstInt[{number}]"),
            RegisterFile::ConstBool => format!("{prefix}ConstBool[{number}]"),
            RegisterFile::Texture => format!("Texture{number}"),
            RegisterFile::Addr => format!("Address{number}"),
            RegisterFile::Temp => format!("Temporary{number}"),
            RegisterFile::Loop => match self.loop_register {
                Some(register) => format!("Loop{register}"),
                None => {
                    return Err(TranslateError::InvalidControlFlow(
                        "loop counter register used outside of a loop",
                    ))
                }
            },
            RegisterFile::Sampler => format!("{prefix}Sampler{number}"),
            RegisterFile::RastOut => RASTOUT_NAMES
                .get(number as usize)
                .ok_or_else(|| unsupported(file))?
                .to_string(),
            RegisterFile::DepthOut => "gl_FragDepth".to_owned(),
            RegisterFile::AttrOut => match number {
                0 => "gl_FrontColor".to_owned(),
                1 => "gl_FrontSecondaryColor".to_owned(),
                _ => return Err(unsupported(file)),
            },
            RegisterFile::TexCoordOut => format!("gl_TexCoord[{number}]"),
            RegisterFile::Output => format!("OUT[{number}]"),
            RegisterFile::MiscType => match number {
                0 => "gl_FragCoord".to_owned(),
                1 => "(gl_FrontFacing?vec4(-1.0):vec4(1.0))".to_owned(),
                _ => return Err(unsupported(file)),
            },
            RegisterFile::ColorOut => format!("gl_FragData[{number}]"),
            RegisterFile::Input => match version.stage {
                ShaderStage::Pixel => {
                    if param.is_relative() {
                        let address = match param.address {
                            Some(address) => self.source(&Param::new(address), WriteMask::X)?,
                            None => return Err(unsupported(file)),
                        };
                        if number != 0 {
                            format!("IN[{address} + {number}]")
                        } else {
                            format!("IN[{address}]")
                        }
                    } else {
                        format!("IN[{number}]")
                    }
                }
                ShaderStage::Vertex => self.attribute(number)?,
            },
            RegisterFile::Const2
            | RegisterFile::Const3
            | RegisterFile::Const4
            | RegisterFile::TempFloat16
            | RegisterFile::Label
            | RegisterFile::Predicate
            | RegisterFile::Unknown(_) => return Err(unsupported(file)),
        })
    }

    /// Name of the vertex attribute declared on input register `register`.
    pub fn attribute(&self, register: u32) -> Result<String, TranslateError> {
        let semantic = self
            .analysis
            .usage
            .attributes
            .get(register as usize)
            .copied()
            .flatten()
            .ok_or(TranslateError::UndeclaredInput { index: register })?;
        Ok(attribute_name(semantic.usage.attribute_name(), semantic.index))
    }
}

pub(crate) fn attribute_name(usage: &str, index: u32) -> String {
    format!("Un_Attr{usage}{index}")
}
