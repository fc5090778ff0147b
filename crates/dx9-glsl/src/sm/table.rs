//! Per-stage instruction descriptor tables.
//!
//! Each entry gives an opcode's arity and conversion function for a range of shader models. An
//! opcode may appear several times when its operand layout changes between models (`sincos`,
//! `texld`, `texcoord`).

use crate::glsl::convert::{self, ConvertFn};
use crate::sm::opcode::Opcode;
use crate::sm::types::{ShaderModel, ShaderStage, ShaderVersion};

#[derive(Clone, Copy)]
pub struct InstructionDesc {
    pub opcode: Opcode,
    pub mnemonic: &'static str,
    pub has_destination: bool,
    pub source_count: u8,
    pub convert: Option<ConvertFn>,
    pub min_version: ShaderModel,
    pub max_version: ShaderModel,
}

impl InstructionDesc {
    pub fn supports(&self, model: ShaderModel) -> bool {
        self.min_version <= model && model <= self.max_version
    }

    const fn since(self, major: u8, minor: u8) -> Self {
        Self {
            min_version: ShaderModel::new(major, minor),
            ..self
        }
    }

    const fn until(self, major: u8, minor: u8) -> Self {
        Self {
            max_version: ShaderModel::new(major, minor),
            ..self
        }
    }
}

impl std::fmt::Debug for InstructionDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstructionDesc")
            .field("opcode", &self.opcode)
            .field("mnemonic", &self.mnemonic)
            .field("has_destination", &self.has_destination)
            .field("source_count", &self.source_count)
            .field("min_version", &self.min_version)
            .field("max_version", &self.max_version)
            .finish_non_exhaustive()
    }
}

impl PartialEq for InstructionDesc {
    fn eq(&self, other: &Self) -> bool {
        self.opcode == other.opcode
            && self.mnemonic == other.mnemonic
            && self.min_version == other.min_version
    }
}

const fn op(
    opcode: Opcode,
    mnemonic: &'static str,
    has_destination: bool,
    source_count: u8,
    convert: Option<ConvertFn>,
) -> InstructionDesc {
    InstructionDesc {
        opcode,
        mnemonic,
        has_destination,
        source_count,
        convert,
        min_version: ShaderModel::MIN,
        max_version: ShaderModel::MAX,
    }
}

pub static VERTEX_SHADER_INSTRUCTIONS: &[InstructionDesc] = &[
    op(Opcode::Nop, "nop", false, 0, None),
    op(Opcode::Mov, "mov", true, 1, Some(convert::mov)),
    op(Opcode::Mova, "mova", true, 1, Some(convert::mov)).since(2, 0),
    op(Opcode::Add, "add", true, 2, Some(convert::math)),
    op(Opcode::Sub, "sub", true, 2, Some(convert::math)),
    op(Opcode::Mul, "mul", true, 2, Some(convert::math)),
    op(Opcode::Dp3, "dp3", true, 2, Some(convert::dot)),
    op(Opcode::Dp4, "dp4", true, 2, Some(convert::dot)),
    op(Opcode::M4x4, "m4x4", true, 2, Some(convert::matmul)),
    op(Opcode::M4x3, "m4x3", true, 2, Some(convert::matmul)),
    op(Opcode::M3x4, "m3x4", true, 2, Some(convert::matmul)),
    op(Opcode::M3x3, "m3x3", true, 2, Some(convert::matmul)),
    op(Opcode::M3x2, "m3x2", true, 2, Some(convert::matmul)),
    op(Opcode::Min, "min", true, 2, Some(convert::map_to_builtin)),
    op(Opcode::Max, "max", true, 2, Some(convert::map_to_builtin)),
    op(Opcode::Abs, "abs", true, 1, Some(convert::map_to_builtin)),
    op(Opcode::Exp, "exp", true, 1, Some(convert::map_to_builtin)),
    op(Opcode::Log, "log", true, 1, Some(convert::map_to_builtin)),
    op(Opcode::LogP, "logp", true, 1, Some(convert::map_to_builtin)),
    op(Opcode::Frc, "frc", true, 1, Some(convert::map_to_builtin)),
    op(Opcode::Sgn, "sgn", true, 1, Some(convert::map_to_builtin)),
    op(Opcode::Nrm, "nrm", true, 1, Some(convert::map_to_builtin)),
    op(Opcode::Slt, "slt", true, 2, Some(convert::compare)),
    op(Opcode::Sge, "sge", true, 2, Some(convert::compare)),
    op(Opcode::Mad, "mad", true, 3, Some(convert::mad)),
    op(Opcode::Rcp, "rcp", true, 1, Some(convert::rcp)),
    op(Opcode::Rsq, "rsq", true, 1, Some(convert::rsq)),
    op(Opcode::ExpP, "expp", true, 1, Some(convert::expp)),
    op(Opcode::Lit, "lit", true, 1, Some(convert::lit)),
    op(Opcode::Dst, "dst", true, 2, Some(convert::dst)),
    op(Opcode::Lrp, "lrp", true, 3, Some(convert::lrp)),
    op(Opcode::Pow, "pow", true, 2, Some(convert::pow)),
    op(Opcode::Crs, "crs", true, 2, Some(convert::cross)),
    op(Opcode::SinCos, "sincos", true, 3, Some(convert::sincos)).since(2, 0).until(2, 1),
    op(Opcode::SinCos, "sincos", true, 1, Some(convert::sincos)).since(3, 0),
    op(Opcode::Dcl, "dcl", false, 2, None),
    op(Opcode::Def, "def", true, 4, None),
    op(Opcode::DefB, "defb", true, 1, None),
    op(Opcode::DefI, "defi", true, 4, None),
    // Flow control
    op(Opcode::Rep, "rep", false, 1, Some(convert::rep)).since(2, 0),
    op(Opcode::EndRep, "endrep", false, 0, Some(convert::end)).since(2, 0),
    op(Opcode::EndLoop, "endloop", false, 0, Some(convert::end)).since(2, 0),
    op(Opcode::If, "if", false, 1, Some(convert::if_bool)).since(2, 0),
    op(Opcode::Else, "else", false, 0, Some(convert::else_block)).since(2, 0),
    op(Opcode::EndIf, "endif", false, 0, Some(convert::end)).since(2, 0),
    op(Opcode::Loop, "loop", false, 2, Some(convert::loop_block)).since(2, 0),
    op(Opcode::Call, "call", false, 1, Some(convert::call)).since(2, 0),
    op(Opcode::CallNz, "callnz", false, 2, Some(convert::call)).since(2, 0),
    op(Opcode::Label, "label", false, 1, Some(convert::label)).since(2, 0),
    op(Opcode::Ret, "ret", false, 0, Some(convert::ret)).since(2, 0),
    op(Opcode::Ifc, "ifc", false, 2, Some(convert::ifc)).since(2, 1),
    op(Opcode::Break, "break", false, 0, Some(convert::break_loop)).since(2, 1),
    op(Opcode::Breakc, "breakc", false, 2, Some(convert::breakc)).since(2, 1),
    op(Opcode::TexLdl, "texldl", true, 2, Some(convert::texldl)).since(3, 0),
];

pub static PIXEL_SHADER_INSTRUCTIONS: &[InstructionDesc] = &[
    op(Opcode::Nop, "nop", false, 0, None),
    op(Opcode::Mov, "mov", true, 1, Some(convert::mov)),
    op(Opcode::Add, "add", true, 2, Some(convert::math)),
    op(Opcode::Sub, "sub", true, 2, Some(convert::math)),
    op(Opcode::Mul, "mul", true, 2, Some(convert::math)),
    op(Opcode::Dp3, "dp3", true, 2, Some(convert::dot)),
    op(Opcode::Dp4, "dp4", true, 2, Some(convert::dot)),
    op(Opcode::M4x4, "m4x4", true, 2, Some(convert::matmul)),
    op(Opcode::M4x3, "m4x3", true, 2, Some(convert::matmul)),
    op(Opcode::M3x4, "m3x4", true, 2, Some(convert::matmul)),
    op(Opcode::M3x3, "m3x3", true, 2, Some(convert::matmul)),
    op(Opcode::M3x2, "m3x2", true, 2, Some(convert::matmul)),
    op(Opcode::Min, "min", true, 2, Some(convert::map_to_builtin)),
    op(Opcode::Max, "max", true, 2, Some(convert::map_to_builtin)),
    op(Opcode::Abs, "abs", true, 1, Some(convert::map_to_builtin)),
    op(Opcode::Exp, "exp", true, 1, Some(convert::map_to_builtin)),
    op(Opcode::LogP, "logp", true, 1, Some(convert::map_to_builtin)),
    op(Opcode::Frc, "frc", true, 1, Some(convert::map_to_builtin)),
    op(Opcode::Nrm, "nrm", true, 1, Some(convert::map_to_builtin)),
    op(Opcode::Slt, "slt", true, 2, Some(convert::compare)),
    op(Opcode::Sge, "sge", true, 2, Some(convert::compare)),
    op(Opcode::Mad, "mad", true, 3, Some(convert::mad)),
    op(Opcode::Rcp, "rcp", true, 1, Some(convert::rcp)),
    op(Opcode::Rsq, "rsq", true, 1, Some(convert::rsq)),
    op(Opcode::Log, "log", true, 1, Some(convert::log)),
    op(Opcode::ExpP, "expp", true, 1, Some(convert::expp)),
    op(Opcode::Dst, "dst", true, 2, Some(convert::dst)),
    op(Opcode::Lrp, "lrp", true, 3, Some(convert::lrp)),
    op(Opcode::Pow, "pow", true, 2, Some(convert::pow)),
    op(Opcode::Crs, "crs", true, 2, Some(convert::cross)),
    op(Opcode::SinCos, "sincos", true, 3, Some(convert::sincos)).since(2, 0).until(2, 1),
    op(Opcode::SinCos, "sincos", true, 1, Some(convert::sincos)).since(3, 0),
    op(Opcode::Dcl, "dcl", false, 2, None),
    op(Opcode::Def, "def", true, 4, None),
    op(Opcode::DefB, "defb", true, 1, None),
    op(Opcode::DefI, "defi", true, 4, None),
    op(Opcode::Cnd, "cnd", true, 3, Some(convert::unimplemented)).since(1, 0).until(1, 4),
    op(Opcode::Phase, "phase", false, 0, None),
    op(Opcode::Cmp, "cmp", true, 3, Some(convert::cmp)).since(1, 2).until(3, 0),
    op(Opcode::Dp2Add, "dp2add", true, 3, Some(convert::dp2add)).since(2, 0),
    // Texturing
    op(Opcode::TexCoord, "texcoord", true, 0, Some(convert::texcoord)).until(1, 3),
    op(Opcode::TexBem, "texbem", true, 1, Some(convert::unimplemented)).until(1, 3),
    op(Opcode::Tex, "tex", true, 0, Some(convert::tex)).until(1, 3),
    op(Opcode::TexBemL, "texbeml", true, 1, Some(convert::unimplemented)).since(1, 0).until(1, 3),
    op(Opcode::TexReg2Ar, "texreg2ar", true, 1, Some(convert::texreg2ar)).since(1, 0).until(1, 3),
    op(Opcode::TexReg2Gb, "texreg2gb", true, 1, Some(convert::texreg2gb)).since(1, 0).until(1, 3),
    op(Opcode::TexM3x2Pad, "texm3x2pad", true, 1, Some(convert::unimplemented)).since(1, 0).until(1, 3),
    op(Opcode::TexM3x2Tex, "texm3x2tex", true, 1, Some(convert::unimplemented)).since(1, 0).until(1, 3),
    op(Opcode::TexM3x3Pad, "texm3x3pad", true, 1, Some(convert::unimplemented)).since(1, 0).until(1, 3),
    op(Opcode::TexM3x3Spec, "texm3x3spec", true, 2, Some(convert::unimplemented)).since(1, 0).until(1, 3),
    op(Opcode::TexM3x3VSpec, "texm3x3vspec", true, 1, Some(convert::unimplemented)).since(1, 0).until(1, 3),
    op(Opcode::TexM3x3Tex, "texm3x3tex", true, 1, Some(convert::unimplemented)).since(1, 0).until(1, 3),
    op(Opcode::TexKill, "texkill", true, 0, Some(convert::texkill)).since(1, 0).until(3, 0),
    op(Opcode::Tex, "texld", true, 1, Some(convert::tex)).since(1, 4).until(1, 4),
    op(Opcode::Tex, "texld", true, 2, Some(convert::tex)).since(2, 0),
    op(Opcode::TexCoord, "texcrd", true, 1, Some(convert::texcoord)).since(1, 4).until(1, 4),
    op(Opcode::TexLdd, "texldd", true, 4, Some(convert::texldd)).since(3, 0).until(3, 0),
    // Flow control
    op(Opcode::Rep, "rep", false, 1, Some(convert::rep)).since(2, 1),
    op(Opcode::EndRep, "endrep", false, 0, Some(convert::end)).since(2, 1),
    op(Opcode::If, "if", false, 1, Some(convert::if_bool)).since(2, 1),
    op(Opcode::Else, "else", false, 0, Some(convert::else_block)).since(2, 1),
    op(Opcode::EndIf, "endif", false, 0, Some(convert::end)).since(2, 1),
    op(Opcode::EndLoop, "endloop", false, 0, Some(convert::end)).since(3, 0),
    op(Opcode::Loop, "loop", false, 2, Some(convert::loop_block)).since(3, 0),
    op(Opcode::Call, "call", false, 1, Some(convert::call)).since(2, 1),
    op(Opcode::CallNz, "callnz", false, 2, Some(convert::call)).since(2, 1),
    op(Opcode::Label, "label", false, 1, Some(convert::label)).since(2, 1),
    op(Opcode::Ret, "ret", false, 0, Some(convert::ret)).since(2, 1),
    op(Opcode::Dsx, "dsx", true, 1, Some(convert::map_to_builtin)).since(2, 1),
    op(Opcode::Dsy, "dsy", true, 1, Some(convert::map_to_builtin)).since(2, 1),
    op(Opcode::Ifc, "ifc", false, 2, Some(convert::ifc)).since(2, 1),
    op(Opcode::Break, "break", false, 0, Some(convert::break_loop)).since(2, 1),
    op(Opcode::TexLdl, "texldl", true, 2, Some(convert::texldl)).since(3, 0),
    op(Opcode::Breakc, "breakc", false, 2, Some(convert::breakc)).since(2, 1),
];

pub fn instructions_for(stage: ShaderStage) -> &'static [InstructionDesc] {
    match stage {
        ShaderStage::Vertex => VERTEX_SHADER_INSTRUCTIONS,
        ShaderStage::Pixel => PIXEL_SHADER_INSTRUCTIONS,
    }
}

/// Finds the descriptor for `opcode` valid at `version`, if the stage supports it there.
pub fn lookup(version: ShaderVersion, opcode: Opcode) -> Option<&'static InstructionDesc> {
    let model = version.model();
    instructions_for(version.stage)
        .iter()
        .find(|desc| desc.opcode == opcode && desc.supports(model))
}
