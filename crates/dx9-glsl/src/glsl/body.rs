//! Main body emission.
//!
//! Walks the decoded instructions in order, dispatching each to its conversion function, and
//! tracks the open flow-control blocks so unbalanced streams are rejected instead of producing
//! GLSL that fails to compile.

use std::fmt::Write as _;

use tracing::trace;

use crate::analysis::ShaderAnalysis;
use crate::error::TranslateError;
use crate::glsl::convert::{self, ConversionState};
use crate::glsl::names::Namer;
use crate::options::{TextureFormat, TranslateOptions};
use crate::sm::decode::{DecodedInstruction, DecodedShader, Operands};
use crate::sm::opcode::Opcode;
use crate::sm::token::{DstModifiers, RegisterFile};

/// An open flow-control construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    If,
    /// `loop`; `register` is the `Loop#` variable `aL` reads inside it.
    Loop { register: u32 },
    Rep,
}

impl Block {
    fn is_loop(self) -> bool {
        matches!(self, Block::Loop { .. } | Block::Rep)
    }

    fn same_kind(self, other: Block) -> bool {
        std::mem::discriminant(&self) == std::mem::discriminant(&other)
    }
}

/// Output buffers and flow-control state shared by the conversion functions.
#[derive(Debug, Default)]
pub struct Emitter {
    main: String,
    subroutines: Vec<String>,
    in_subroutine: bool,
    blocks: Vec<Block>,
    sampled: Vec<(u32, TextureFormat)>,
}

impl Emitter {
    /// The buffer instructions currently append to: the open subroutine, or `main`.
    pub fn out(&mut self) -> &mut String {
        match self.subroutines.last_mut() {
            Some(body) if self.in_subroutine => body,
            _ => &mut self.main,
        }
    }

    /// Number of open `loop`/`rep` blocks.
    pub fn loop_depth(&self) -> u32 {
        self.blocks.iter().filter(|block| block.is_loop()).count() as u32
    }

    pub fn innermost_loop(&self) -> Option<u32> {
        self.blocks.iter().rev().find_map(|block| match block {
            Block::Loop { register } => Some(*register),
            _ => None,
        })
    }

    pub fn innermost_block(&self) -> Option<Block> {
        self.blocks.last().copied()
    }

    pub fn open(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn close(&mut self, expected: Block, message: &'static str) -> Result<(), TranslateError> {
        match self.blocks.last() {
            Some(block) if block.same_kind(expected) => {
                self.blocks.pop();
                Ok(())
            }
            _ => Err(TranslateError::InvalidControlFlow(message)),
        }
    }

    pub fn begin_subroutine(&mut self, label: u32) -> Result<(), TranslateError> {
        if self.in_subroutine {
            return Err(TranslateError::InvalidControlFlow(
                "label inside another subroutine",
            ));
        }
        if !self.blocks.is_empty() {
            return Err(TranslateError::InvalidControlFlow(
                "label inside an open block",
            ));
        }
        self.subroutines
            .push(format!("void LabelFunction{label}()\n{{\n"));
        self.in_subroutine = true;
        Ok(())
    }

    pub fn end_subroutine(&mut self) -> Result<(), TranslateError> {
        if !self.blocks.is_empty() {
            return Err(TranslateError::InvalidControlFlow(
                "ret inside an open block",
            ));
        }
        self.out().push_str("}\n");
        self.in_subroutine = false;
        Ok(())
    }

    fn record_sample(&mut self, sampler: u32, format: TextureFormat) {
        if !self.sampled.contains(&(sampler, format)) {
            self.sampled.push((sampler, format));
        }
    }
}

/// Output of body generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    /// Statements for `main`, without the surrounding braces.
    pub main: String,
    /// Complete subroutine definitions, in label order of appearance.
    pub subroutines: Vec<String>,
    /// Distinct (sampler, format) pairs read by texture instructions.
    pub sampled_textures: Vec<(u32, TextureFormat)>,
}

/// Instructions with no body output: declarations are handled up front and `phase` only
/// separates ps_1_4 passes.
fn emits_nothing(opcode: Opcode) -> bool {
    matches!(
        opcode,
        Opcode::Dcl | Opcode::Nop | Opcode::Def | Opcode::DefI | Opcode::DefB | Opcode::Phase
    )
}

pub fn generate_body(
    shader: &DecodedShader,
    analysis: &ShaderAnalysis,
    options: &TranslateOptions,
) -> Result<Body, TranslateError> {
    let mut emitter = Emitter::default();
    for instruction in &shader.instructions {
        let opcode = instruction.opcode();
        if emits_nothing(opcode) || (opcode == Opcode::Ret && !emitter.in_subroutine) {
            continue;
        }
        trace!(
            token_index = instruction.token_index,
            mnemonic = instruction.mnemonic(),
            "converting instruction"
        );
        convert_instruction(instruction, analysis, options, &mut emitter)?;
    }

    if !emitter.blocks.is_empty() {
        return Err(TranslateError::InvalidControlFlow(
            "flow-control block left open at end of shader",
        ));
    }
    if emitter.in_subroutine {
        return Err(TranslateError::InvalidControlFlow(
            "subroutine without closing ret",
        ));
    }

    Ok(Body {
        main: emitter.main,
        subroutines: emitter.subroutines,
        sampled_textures: emitter.sampled,
    })
}

fn convert_instruction(
    instruction: &DecodedInstruction,
    analysis: &ShaderAnalysis,
    options: &TranslateOptions,
    emitter: &mut Emitter,
) -> Result<(), TranslateError> {
    if let Operands::Generic {
        predicate: Some(predicate),
        ..
    } = &instruction.operands
    {
        return Err(TranslateError::UnsupportedRegister {
            file: RegisterFile::Predicate.short_name(),
            index: predicate.number(),
        });
    }

    if let Some(dest) = instruction.dest() {
        if dest.dst_modifiers().contains(DstModifiers::CENTROID) {
            return Err(TranslateError::UnsupportedModifier {
                modifier: "_centroid",
            });
        }
    }

    let convert = instruction
        .desc
        .convert
        .ok_or(TranslateError::UnimplementedConversion {
            mnemonic: instruction.mnemonic(),
        })?;

    let mut state = ConversionState {
        analysis,
        options,
        instruction,
        emitter: &mut *emitter,
    };
    convert(&mut state)?;

    if let Some(dest) = instruction.dest() {
        if dest.dst_modifiers().contains(DstModifiers::SATURATE) {
            let namer = Namer {
                analysis,
                options,
                loop_register: emitter.innermost_loop(),
            };
            let name = namer.dest(dest)?;
            writeln!(
                emitter.out(),
                "{reg}{mask} = clamp({reg}{mask}, 0.0, 1.0);",
                reg = name.register,
                mask = name.mask_suffix,
            )?;
        }
    }

    if let Some(sampler) = convert::sampled_sampler(instruction) {
        let format = options.texture_format(sampler);
        if format.needs_color_correction() {
            return Err(TranslateError::UnsupportedTextureFormat { sampler, format });
        }
        emitter.record_sample(sampler, format);
    }
    Ok(())
}
