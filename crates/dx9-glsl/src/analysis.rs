//! Register usage analysis.
//!
//! A full pre-scan of the decoded instruction stream that records which register slots are
//! referenced, the semantics declared for inputs and outputs, sampler dimensionality, the literal
//! constants defined by `def`/`defi`/`defb`, and the deepest loop nesting. Declaration and body
//! emission only read the resulting [`ShaderAnalysis`]; nothing here produces text.

use crate::error::TranslateError;
use crate::shader_limits::{
    ShaderLimits, MAX_ATTRIBUTE_REGISTERS, MAX_INPUT_REGISTERS, MAX_LABELS, MAX_OUTPUT_REGISTERS,
    MAX_SAMPLERS, MAX_TEMPORARY_REGISTERS, MAX_TEXCOORD_REGISTERS,
};
use crate::sm::decode::{DecodedInstruction, DecodedShader, Operands};
use crate::sm::opcode::Opcode;
use crate::sm::token::{DeclToken, DeclUsage, Param, RegisterFile, TextureType, WriteMask};
use crate::sm::types::{ShaderStage, ShaderVersion};

/// A `dcl` semantic bound to an input or output register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Semantic {
    pub usage: DeclUsage,
    pub index: u32,
    /// Components declared on the register; drives the prologue/epilogue copy masks.
    pub mask: WriteMask,
}

/// Texcoord slots that travel through dedicated varyings rather than `gl_TexCoord[]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Varying {
    Texcoord8,
    Texcoord9,
}

impl Varying {
    pub fn for_texcoord(index: u32) -> Option<Self> {
        match index {
            8 => Some(Self::Texcoord8),
            9 => Some(Self::Texcoord9),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUsage {
    pub temporaries: [bool; MAX_TEMPORARY_REGISTERS],
    /// Pixel shader `t#` registers.
    pub texcoords: [bool; MAX_TEXCOORD_REGISTERS],
    /// Pixel shader `v#` registers read by the body.
    pub inputs: [bool; MAX_INPUT_REGISTERS],
    /// Pixel shader inputs that need a prologue copy into `IN[]`.
    pub packed_inputs: [Option<Semantic>; MAX_INPUT_REGISTERS],
    /// vs_3_0 `o#` registers that need an epilogue copy out of `OUT[]`.
    pub packed_outputs: [Option<Semantic>; MAX_OUTPUT_REGISTERS],
    /// Vertex shader inputs, by register.
    pub attributes: [Option<Semantic>; MAX_ATTRIBUTE_REGISTERS],
    pub samplers: [Option<TextureType>; MAX_SAMPLERS],
    pub labels: [bool; MAX_LABELS],
    pub address_register: bool,
    pub texcoord8_varying: bool,
    pub texcoord9_varying: bool,
    pub uses_fog: bool,
    pub uses_relative_constants: bool,
    /// Smallest and largest base register seen with relative constant addressing (vertex only).
    pub relative_offset_range: Option<(u32, u32)>,
    pub max_loop_depth: u32,
}

impl Default for RegisterUsage {
    fn default() -> Self {
        Self {
            temporaries: [false; MAX_TEMPORARY_REGISTERS],
            texcoords: [false; MAX_TEXCOORD_REGISTERS],
            inputs: [false; MAX_INPUT_REGISTERS],
            packed_inputs: [None; MAX_INPUT_REGISTERS],
            packed_outputs: [None; MAX_OUTPUT_REGISTERS],
            attributes: [None; MAX_ATTRIBUTE_REGISTERS],
            samplers: [None; MAX_SAMPLERS],
            labels: [false; MAX_LABELS],
            address_register: false,
            texcoord8_varying: false,
            texcoord9_varying: false,
            uses_fog: false,
            uses_relative_constants: false,
            relative_offset_range: None,
            max_loop_depth: 0,
        }
    }
}

impl RegisterUsage {
    pub fn uses_varying(&self, varying: Varying) -> bool {
        match varying {
            Varying::Texcoord8 => self.texcoord8_varying,
            Varying::Texcoord9 => self.texcoord9_varying,
        }
    }

    fn mark_varying(&mut self, index: u32, context: &'static str) -> Result<(), TranslateError> {
        match Varying::for_texcoord(index) {
            Some(Varying::Texcoord8) => self.texcoord8_varying = true,
            Some(Varying::Texcoord9) => self.texcoord9_varying = true,
            None if index > 9 => {
                return Err(TranslateError::UnsupportedSemantic {
                    usage: DeclUsage::TexCoord.attribute_name(),
                    index,
                    context,
                })
            }
            None => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinedConstant<T> {
    pub index: u32,
    pub value: T,
}

/// Literal constants from `def`/`defi`/`defb`, in definition order.
///
/// Redefining a register replaces the earlier value in place so each register is emitted once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantTables {
    /// Float values stored as raw bits.
    pub floats: Vec<DefinedConstant<[u32; 4]>>,
    pub ints: Vec<DefinedConstant<[i32; 4]>>,
    /// Recorded only; `if b#` and `callnz` always read the `ConstBool` uniform.
    pub bools: Vec<DefinedConstant<bool>>,
}

fn upsert<T>(table: &mut Vec<DefinedConstant<T>>, index: u32, value: T) {
    match table.iter_mut().find(|c| c.index == index) {
        Some(existing) => existing.value = value,
        None => table.push(DefinedConstant { index, value }),
    }
}

impl ConstantTables {
    pub fn is_local_float(&self, index: u32) -> bool {
        self.floats.iter().any(|c| c.index == index)
    }

    pub fn float(&self, index: u32) -> Option<[f32; 4]> {
        self.floats
            .iter()
            .find(|c| c.index == index)
            .map(|c| c.value.map(f32::from_bits))
    }

    pub fn int(&self, index: u32) -> Option<[i32; 4]> {
        self.ints.iter().find(|c| c.index == index).map(|c| c.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderAnalysis {
    pub version: ShaderVersion,
    pub limits: ShaderLimits,
    pub usage: RegisterUsage,
    pub constants: ConstantTables,
}

fn check_index(file: &'static str, index: u32, slots: usize) -> Result<usize, TranslateError> {
    let slot = index as usize;
    if slot >= slots {
        return Err(TranslateError::RegisterIndexOutOfRange {
            file,
            index,
            max: slots as u32 - 1,
        });
    }
    Ok(slot)
}

pub fn analyze(shader: &DecodedShader) -> Result<ShaderAnalysis, TranslateError> {
    let mut analyzer = Analyzer {
        version: shader.version,
        usage: RegisterUsage::default(),
        constants: ConstantTables::default(),
        loop_depth: 0,
    };
    for instruction in &shader.instructions {
        analyzer.instruction(instruction)?;
    }
    Ok(ShaderAnalysis {
        version: shader.version,
        limits: ShaderLimits::for_version(shader.version),
        usage: analyzer.usage,
        constants: analyzer.constants,
    })
}

struct Analyzer {
    version: ShaderVersion,
    usage: RegisterUsage,
    constants: ConstantTables,
    loop_depth: u32,
}

impl Analyzer {
    fn stage(&self) -> ShaderStage {
        self.version.stage
    }

    fn file(&self, param: &Param) -> RegisterFile {
        param.file(self.version.stage, self.version.major)
    }

    fn instruction(&mut self, instruction: &DecodedInstruction) -> Result<(), TranslateError> {
        match &instruction.operands {
            Operands::Dcl { usage, param } => self.declaration(*usage, param),
            Operands::Def { param, values } => {
                upsert(&mut self.constants.floats, param.number(), *values);
                Ok(())
            }
            Operands::DefI { param, values } => {
                upsert(&mut self.constants.ints, param.number(), *values);
                Ok(())
            }
            Operands::DefB { param, value } => {
                upsert(&mut self.constants.bools, param.number(), *value);
                Ok(())
            }
            Operands::Generic {
                dest,
                predicate,
                sources,
            } => {
                match instruction.opcode() {
                    Opcode::Loop | Opcode::Rep => {
                        self.loop_depth += 1;
                        self.usage.max_loop_depth = self.usage.max_loop_depth.max(self.loop_depth);
                    }
                    Opcode::EndLoop | Opcode::EndRep => {
                        self.loop_depth = self.loop_depth.saturating_sub(1);
                    }
                    Opcode::Label => {
                        if let Some(label) = sources.first() {
                            let slot = check_index("l", label.number(), MAX_LABELS)?;
                            self.usage.labels[slot] = true;
                        }
                        return Ok(());
                    }
                    Opcode::Tex | Opcode::TexReg2Ar | Opcode::TexReg2Gb
                        if self.version.major < 2 =>
                    {
                        // ps_1_x has no sampler declarations; the destination register picks the
                        // sampler and it is always sampled as 2D.
                        if let Some(dest) = dest {
                            let slot = check_index("s", dest.number(), MAX_SAMPLERS)?;
                            self.usage.samplers[slot].get_or_insert(TextureType::Texture2D);
                        }
                    }
                    _ => {}
                }

                for param in dest.iter().chain(predicate.iter()).chain(sources.iter()) {
                    self.param(param)?;
                }
                Ok(())
            }
        }
    }

    fn declaration(&mut self, decl: DeclToken, param: &Param) -> Result<(), TranslateError> {
        let number = param.number();
        match self.file(param) {
            RegisterFile::Input => match self.stage() {
                ShaderStage::Vertex => {
                    let slot = check_index("v", number, MAX_ATTRIBUTE_REGISTERS)?;
                    let usage = decl.usage().ok_or(TranslateError::UnsupportedSemantic {
                        usage: "unknown",
                        index: u32::from(decl.raw_usage()),
                        context: "vertex input",
                    })?;
                    self.usage.attributes[slot] = Some(Semantic {
                        usage,
                        index: decl.usage_index(),
                        mask: param.write_mask(),
                    });
                }
                ShaderStage::Pixel => {
                    let slot = check_index("v", number, MAX_INPUT_REGISTERS)?;
                    let semantic = if self.version.major >= 3 {
                        let usage = decl.usage().ok_or(TranslateError::UnsupportedSemantic {
                            usage: "unknown",
                            index: u32::from(decl.raw_usage()),
                            context: "pixel input",
                        })?;
                        if usage == DeclUsage::TexCoord {
                            self.usage.mark_varying(decl.usage_index(), "pixel input")?;
                        }
                        Semantic {
                            usage,
                            index: decl.usage_index(),
                            mask: param.write_mask(),
                        }
                    } else {
                        // Before ps_3_0, v0/v1 are the diffuse and specular colors.
                        Semantic {
                            usage: DeclUsage::Color,
                            index: number,
                            mask: param.write_mask(),
                        }
                    };
                    self.usage.packed_inputs[slot] = Some(semantic);
                }
            },
            RegisterFile::Output => {
                let slot = check_index("o", number, MAX_OUTPUT_REGISTERS)?;
                let usage = decl.usage().ok_or(TranslateError::UnsupportedSemantic {
                    usage: "unknown",
                    index: u32::from(decl.raw_usage()),
                    context: "vertex output",
                })?;
                match usage {
                    DeclUsage::TexCoord => {
                        self.usage.mark_varying(decl.usage_index(), "vertex output")?
                    }
                    DeclUsage::Fog => self.usage.uses_fog = true,
                    _ => {}
                }
                self.usage.packed_outputs[slot] = Some(Semantic {
                    usage,
                    index: decl.usage_index(),
                    mask: param.write_mask(),
                });
            }
            RegisterFile::Sampler => {
                let slot = check_index("s", number, MAX_SAMPLERS)?;
                let texture_type = decl
                    .texture_type()
                    .ok_or(TranslateError::UnsupportedSamplerType {
                        sampler: number,
                        raw: decl.raw_texture_type(),
                    })?;
                self.usage.samplers[slot] = Some(texture_type);
            }
            RegisterFile::Texture => {
                let slot = check_index("t", number, MAX_TEXCOORD_REGISTERS)?;
                self.usage.texcoords[slot] = true;
            }
            _ => {}
        }
        Ok(())
    }

    fn param(&mut self, param: &Param) -> Result<(), TranslateError> {
        let number = param.number();
        match self.file(param) {
            RegisterFile::Const => {
                if param.is_relative() {
                    self.usage.uses_relative_constants = true;
                    if self.stage() == ShaderStage::Vertex {
                        let range = self
                            .usage
                            .relative_offset_range
                            .get_or_insert((number, number));
                        range.0 = range.0.min(number);
                        range.1 = range.1.max(number);
                        if param.address.is_none() {
                            // vs_1_x reads the implicit a0.x
                            self.usage.address_register = true;
                        }
                    }
                }
            }
            RegisterFile::Input => match self.stage() {
                ShaderStage::Pixel => {
                    if param.is_relative() {
                        self.usage.inputs = [true; MAX_INPUT_REGISTERS];
                    } else {
                        let slot = check_index("v", number, MAX_INPUT_REGISTERS)?;
                        self.usage.inputs[slot] = true;
                        if self.version.major < 3 && self.usage.packed_inputs[slot].is_none() {
                            self.usage.packed_inputs[slot] = Some(Semantic {
                                usage: DeclUsage::Color,
                                index: number,
                                mask: WriteMask::XYZW,
                            });
                        }
                    }
                }
                ShaderStage::Vertex => {
                    let slot = check_index("v", number, MAX_ATTRIBUTE_REGISTERS)?;
                    if self.usage.attributes[slot].is_none() {
                        return Err(TranslateError::UndeclaredInput { index: number });
                    }
                }
            },
            RegisterFile::RastOut => {
                if number == 1 {
                    self.usage.uses_fog = true;
                }
            }
            RegisterFile::Temp => {
                let slot = check_index("r", number, MAX_TEMPORARY_REGISTERS)?;
                self.usage.temporaries[slot] = true;
            }
            RegisterFile::Texture => {
                let slot = check_index("t", number, MAX_TEXCOORD_REGISTERS)?;
                self.usage.texcoords[slot] = true;
            }
            RegisterFile::Addr => {
                if number > 0 {
                    return Err(TranslateError::UnsupportedRegister {
                        file: "a",
                        index: number,
                    });
                }
                self.usage.address_register = true;
            }
            _ => {}
        }

        if let Some(address) = param.address {
            let address = Param::new(address);
            if self.file(&address) == RegisterFile::Addr {
                self.usage.address_register = true;
            }
        }
        Ok(())
    }
}
