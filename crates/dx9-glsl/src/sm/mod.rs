//! D3D9 shader model 1-3 token model: version, register/parameter tokens, opcodes, and the
//! per-stage instruction tables.

pub mod decode;
pub mod opcode;
pub mod table;
pub mod token;
pub mod types;

pub use decode::{
    decode_tokens, words_from_le_bytes, DecodeError, DecodedInstruction, DecodedShader, Operands,
};
pub use opcode::Opcode;
pub use table::InstructionDesc;
pub use types::{ShaderModel, ShaderStage, ShaderVersion};
