//! Token stream reader.
//!
//! Walks the raw DWORD stream once and produces one [`DecodedInstruction`] per instruction token.
//! Version tokens and comment blocks are consumed here and never reach later passes. `dcl`,
//! `def`, `defi` and `defb` have fixed operand layouts; every other instruction reads its operands
//! as described by the stage's instruction table (destination, optional predicate, sources), so
//! the instruction-length field is never trusted.

use thiserror::Error;

use crate::error::TranslateError;
use crate::shader_limits::{MAX_D3D9_SHADER_BYTECODE_BYTES, MAX_D3D9_SHADER_TOKEN_COUNT};
use crate::sm::opcode::Opcode;
use crate::sm::table::{self, InstructionDesc};
use crate::sm::token::{
    DeclToken, Param, COMMENT_SIZE_MASK, COMMENT_SIZE_SHIFT, END_TOKEN, OPCODE_MASK, PREDICATED,
};
use crate::sm::types::ShaderVersion;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("bytecode length {len} exceeds maximum {max} bytes")]
    BytecodeTooLarge { len: usize, max: usize },
    #[error("token count {count} exceeds maximum {max}")]
    TokenCountTooLarge { count: usize, max: usize },
    #[error("bytecode length {0} is not a multiple of 4")]
    MisalignedBytecode(usize),
    #[error("token stream does not start with a shader version token")]
    MissingVersionToken,
    #[error("unexpected version token 0x{token:08x} at token {token_index}")]
    UnexpectedVersionToken { token_index: usize, token: u32 },
    #[error("token stream ends inside an instruction or before END (token {token_index})")]
    UnexpectedEof { token_index: usize },
}

/// Converts little-endian bytecode into tokens.
pub fn words_from_le_bytes(bytes: &[u8]) -> Result<Vec<u32>, DecodeError> {
    if bytes.len() > MAX_D3D9_SHADER_BYTECODE_BYTES {
        return Err(DecodeError::BytecodeTooLarge {
            len: bytes.len(),
            max: MAX_D3D9_SHADER_BYTECODE_BYTES,
        });
    }
    if bytes.len() % 4 != 0 {
        return Err(DecodeError::MisalignedBytecode(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedShader {
    pub version: ShaderVersion,
    pub instructions: Vec<DecodedInstruction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedInstruction {
    /// Index of the instruction token within the stream.
    pub token_index: usize,
    /// The raw instruction token, including control bits.
    pub token: u32,
    pub desc: &'static InstructionDesc,
    pub operands: Operands,
}

impl DecodedInstruction {
    pub fn opcode(&self) -> Opcode {
        self.desc.opcode
    }

    pub fn mnemonic(&self) -> &'static str {
        self.desc.mnemonic
    }

    pub fn dest(&self) -> Option<&Param> {
        match &self.operands {
            Operands::Generic { dest, .. } => dest.as_ref(),
            Operands::Dcl { param, .. }
            | Operands::Def { param, .. }
            | Operands::DefI { param, .. }
            | Operands::DefB { param, .. } => Some(param),
        }
    }

    pub fn sources(&self) -> &[Param] {
        match &self.operands {
            Operands::Generic { sources, .. } => sources,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operands {
    Dcl { usage: DeclToken, param: Param },
    /// Float constant; values are kept as raw bits so NaN payloads survive.
    Def { param: Param, values: [u32; 4] },
    DefI { param: Param, values: [i32; 4] },
    DefB { param: Param, value: bool },
    Generic {
        dest: Option<Param>,
        predicate: Option<Param>,
        sources: Vec<Param>,
    },
}

struct TokenReader<'a> {
    tokens: &'a [u32],
    pos: usize,
}

impl<'a> TokenReader<'a> {
    fn next(&mut self) -> Result<u32, DecodeError> {
        let token = self
            .tokens
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::UnexpectedEof {
                token_index: self.pos,
            })?;
        self.pos += 1;
        Ok(token)
    }

    /// Reads a parameter token and, on SM2+, the relative-address token that follows it.
    fn param(&mut self, version: ShaderVersion) -> Result<Param, DecodeError> {
        let mut param = Param::new(self.next()?);
        if param.is_relative() && version.major >= 2 {
            param.address = Some(self.next()?);
        }
        Ok(param)
    }

    fn skip(&mut self, count: usize) -> Result<(), DecodeError> {
        let end = self.pos.checked_add(count).unwrap_or(usize::MAX);
        if end > self.tokens.len() {
            return Err(DecodeError::UnexpectedEof {
                token_index: self.pos,
            });
        }
        self.pos = end;
        Ok(())
    }
}

fn is_version_token(token: u32) -> bool {
    matches!(token >> 16, 0xFFFE | 0xFFFF)
}

fn is_comment_token(token: u32) -> bool {
    token & OPCODE_MASK == u32::from(Opcode::Comment.raw())
}

pub fn decode_tokens(tokens: &[u32]) -> Result<DecodedShader, TranslateError> {
    if tokens.len() > MAX_D3D9_SHADER_TOKEN_COUNT {
        return Err(DecodeError::TokenCountTooLarge {
            count: tokens.len(),
            max: MAX_D3D9_SHADER_TOKEN_COUNT,
        }
        .into());
    }

    let mut reader = TokenReader { tokens, pos: 0 };
    let mut version = None;
    let mut instructions = Vec::new();

    loop {
        let token_index = reader.pos;
        let token = reader.next()?;

        if token == END_TOKEN {
            break;
        }
        if is_version_token(token) {
            let decoded = ShaderVersion::from_token(token).ok_or(DecodeError::MissingVersionToken)?;
            match version {
                None => version = Some(decoded),
                Some(current) if current == decoded => {}
                Some(_) => {
                    return Err(DecodeError::UnexpectedVersionToken { token_index, token }.into())
                }
            }
            continue;
        }
        if is_comment_token(token) {
            reader.skip(((token & COMMENT_SIZE_MASK) >> COMMENT_SIZE_SHIFT) as usize)?;
            continue;
        }

        let version = version.ok_or(DecodeError::MissingVersionToken)?;
        let raw_opcode = (token & OPCODE_MASK) as u16;
        let desc = table::lookup(version, Opcode::from_raw(raw_opcode)).ok_or(
            TranslateError::UnsupportedInstruction {
                opcode: raw_opcode,
                version,
            },
        )?;

        let operands = match desc.opcode {
            Opcode::Dcl => {
                let usage = DeclToken(reader.next()?);
                let param = Param::new(reader.next()?);
                Operands::Dcl { usage, param }
            }
            Opcode::Def => {
                let param = Param::new(reader.next()?);
                let values = [reader.next()?, reader.next()?, reader.next()?, reader.next()?];
                Operands::Def { param, values }
            }
            Opcode::DefI => {
                let param = Param::new(reader.next()?);
                let mut values = [0i32; 4];
                for value in &mut values {
                    *value = reader.next()? as i32;
                }
                Operands::DefI { param, values }
            }
            Opcode::DefB => {
                let param = Param::new(reader.next()?);
                let value = reader.next()? != 0;
                Operands::DefB { param, value }
            }
            _ => {
                let dest = if desc.has_destination {
                    Some(reader.param(version)?)
                } else {
                    None
                };
                let predicate = if token & PREDICATED != 0 {
                    Some(reader.param(version)?)
                } else {
                    None
                };
                let sources = (0..desc.source_count)
                    .map(|_| reader.param(version))
                    .collect::<Result<Vec<_>, _>>()?;
                Operands::Generic {
                    dest,
                    predicate,
                    sources,
                }
            }
        };

        instructions.push(DecodedInstruction {
            token_index,
            token,
            desc,
            operands,
        });
    }

    let version = version.ok_or(DecodeError::MissingVersionToken)?;
    Ok(DecodedShader {
        version,
        instructions,
    })
}
