use thiserror::Error;

use crate::options::TextureFormat;
use crate::sm::decode::DecodeError;
use crate::sm::types::{ShaderStage, ShaderVersion};

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("opcode {opcode} is not supported by {version}")]
    UnsupportedInstruction { opcode: u16, version: ShaderVersion },
    #[error("conversion of `{mnemonic}` is not implemented")]
    UnimplementedConversion { mnemonic: &'static str },
    #[error("sampler {sampler} is bound to unsupported texture format {format:?}")]
    UnsupportedTextureFormat { sampler: u32, format: TextureFormat },
    #[error("unsupported parameter modifier {modifier}")]
    UnsupportedModifier { modifier: &'static str },
    #[error("expected {expected} shader bytecode, found {found}")]
    StageMismatch {
        expected: ShaderStage,
        found: ShaderStage,
    },
    #[error("register {file}{index} cannot be expressed in GLSL")]
    UnsupportedRegister { file: &'static str, index: u32 },
    #[error("{context} semantic {usage}{index} has no GLSL equivalent")]
    UnsupportedSemantic {
        usage: &'static str,
        index: u32,
        context: &'static str,
    },
    #[error("sampler s{sampler} has unsupported texture type {raw}")]
    UnsupportedSamplerType { sampler: u32, raw: u8 },
    #[error("unsupported comparison control {control}")]
    UnsupportedCompareOp { control: u8 },
    #[error("`{mnemonic}` cannot write mask 0x{mask:x}")]
    InvalidWriteMask { mnemonic: &'static str, mask: u8 },
    #[error("register index out of range for {file}: {index} (max {max})")]
    RegisterIndexOutOfRange {
        file: &'static str,
        index: u32,
        max: u32,
    },
    #[error("input register v{index} is used without a declaration")]
    UndeclaredInput { index: u32 },
    #[error("`{mnemonic}` is missing operand {index}")]
    MissingOperand { mnemonic: &'static str, index: usize },
    #[error("invalid control flow: {0}")]
    InvalidControlFlow(&'static str),
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
}
