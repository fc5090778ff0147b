/// D3D9 `D3DSHADER_INSTRUCTION_OPCODE_TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Nop,
    Mov,
    Add,
    Sub,
    Mad,
    Mul,
    Rcp,
    Rsq,
    Dp3,
    Dp4,
    Min,
    Max,
    Slt,
    Sge,
    Exp,
    Log,
    Lit,
    Dst,
    Lrp,
    Frc,
    M4x4,
    M4x3,
    M3x4,
    M3x3,
    M3x2,
    Call,
    CallNz,
    Loop,
    Ret,
    EndLoop,
    Label,
    Dcl,
    Pow,
    Crs,
    Sgn,
    Abs,
    Nrm,
    SinCos,
    Rep,
    EndRep,
    If,
    Ifc,
    Else,
    EndIf,
    Break,
    Breakc,
    Mova,
    DefB,
    DefI,
    TexCoord,
    TexKill,
    /// `tex` on ps_1_0..1_3, `texld`/`texldp`/`texldb` from ps_1_4 on.
    Tex,
    TexBem,
    TexBemL,
    TexReg2Ar,
    TexReg2Gb,
    TexM3x2Pad,
    TexM3x2Tex,
    TexM3x3Pad,
    TexM3x3Tex,
    TexM3x3Spec,
    TexM3x3VSpec,
    ExpP,
    LogP,
    Cnd,
    Def,
    TexReg2Rgb,
    TexDp3Tex,
    TexM3x2Depth,
    TexDp3,
    TexM3x3,
    TexDepth,
    Cmp,
    Bem,
    Dp2Add,
    Dsx,
    Dsy,
    TexLdd,
    Setp,
    TexLdl,
    Breakp,
    Phase,
    Comment,
    End,
    Unknown(u16),
}

impl Opcode {
    pub fn from_raw(op: u16) -> Self {
        match op {
            0 => Self::Nop,
            1 => Self::Mov,
            2 => Self::Add,
            3 => Self::Sub,
            4 => Self::Mad,
            5 => Self::Mul,
            6 => Self::Rcp,
            7 => Self::Rsq,
            8 => Self::Dp3,
            9 => Self::Dp4,
            10 => Self::Min,
            11 => Self::Max,
            12 => Self::Slt,
            13 => Self::Sge,
            14 => Self::Exp,
            15 => Self::Log,
            16 => Self::Lit,
            17 => Self::Dst,
            18 => Self::Lrp,
            19 => Self::Frc,
            20 => Self::M4x4,
            21 => Self::M4x3,
            22 => Self::M3x4,
            23 => Self::M3x3,
            24 => Self::M3x2,
            25 => Self::Call,
            26 => Self::CallNz,
            27 => Self::Loop,
            28 => Self::Ret,
            29 => Self::EndLoop,
            30 => Self::Label,
            31 => Self::Dcl,
            32 => Self::Pow,
            33 => Self::Crs,
            34 => Self::Sgn,
            35 => Self::Abs,
            36 => Self::Nrm,
            37 => Self::SinCos,
            38 => Self::Rep,
            39 => Self::EndRep,
            40 => Self::If,
            41 => Self::Ifc,
            42 => Self::Else,
            43 => Self::EndIf,
            44 => Self::Break,
            45 => Self::Breakc,
            46 => Self::Mova,
            47 => Self::DefB,
            48 => Self::DefI,
            64 => Self::TexCoord,
            65 => Self::TexKill,
            66 => Self::Tex,
            67 => Self::TexBem,
            68 => Self::TexBemL,
            69 => Self::TexReg2Ar,
            70 => Self::TexReg2Gb,
            71 => Self::TexM3x2Pad,
            72 => Self::TexM3x2Tex,
            73 => Self::TexM3x3Pad,
            74 => Self::TexM3x3Tex,
            76 => Self::TexM3x3Spec,
            77 => Self::TexM3x3VSpec,
            78 => Self::ExpP,
            79 => Self::LogP,
            80 => Self::Cnd,
            81 => Self::Def,
            82 => Self::TexReg2Rgb,
            83 => Self::TexDp3Tex,
            84 => Self::TexM3x2Depth,
            85 => Self::TexDp3,
            86 => Self::TexM3x3,
            87 => Self::TexDepth,
            88 => Self::Cmp,
            89 => Self::Bem,
            90 => Self::Dp2Add,
            91 => Self::Dsx,
            92 => Self::Dsy,
            93 => Self::TexLdd,
            94 => Self::Setp,
            95 => Self::TexLdl,
            96 => Self::Breakp,
            0xFFFD => Self::Phase,
            0xFFFE => Self::Comment,
            0xFFFF => Self::End,
            other => Self::Unknown(other),
        }
    }

    /// Returns the raw `D3DSHADER_INSTRUCTION_OPCODE_TYPE` value.
    #[deny(unreachable_patterns)]
    pub fn raw(&self) -> u16 {
        match self {
            Self::Nop => 0,
            Self::Mov => 1,
            Self::Add => 2,
            Self::Sub => 3,
            Self::Mad => 4,
            Self::Mul => 5,
            Self::Rcp => 6,
            Self::Rsq => 7,
            Self::Dp3 => 8,
            Self::Dp4 => 9,
            Self::Min => 10,
            Self::Max => 11,
            Self::Slt => 12,
            Self::Sge => 13,
            Self::Exp => 14,
            Self::Log => 15,
            Self::Lit => 16,
            Self::Dst => 17,
            Self::Lrp => 18,
            Self::Frc => 19,
            Self::M4x4 => 20,
            Self::M4x3 => 21,
            Self::M3x4 => 22,
            Self::M3x3 => 23,
            Self::M3x2 => 24,
            Self::Call => 25,
            Self::CallNz => 26,
            Self::Loop => 27,
            Self::Ret => 28,
            Self::EndLoop => 29,
            Self::Label => 30,
            Self::Dcl => 31,
            Self::Pow => 32,
            Self::Crs => 33,
            Self::Sgn => 34,
            Self::Abs => 35,
            Self::Nrm => 36,
            Self::SinCos => 37,
            Self::Rep => 38,
            Self::EndRep => 39,
            Self::If => 40,
            Self::Ifc => 41,
            Self::Else => 42,
            Self::EndIf => 43,
            Self::Break => 44,
            Self::Breakc => 45,
            Self::Mova => 46,
            Self::DefB => 47,
            Self::DefI => 48,
            Self::TexCoord => 64,
            Self::TexKill => 65,
            Self::Tex => 66,
            Self::TexBem => 67,
            Self::TexBemL => 68,
            Self::TexReg2Ar => 69,
            Self::TexReg2Gb => 70,
            Self::TexM3x2Pad => 71,
            Self::TexM3x2Tex => 72,
            Self::TexM3x3Pad => 73,
            Self::TexM3x3Tex => 74,
            Self::TexM3x3Spec => 76,
            Self::TexM3x3VSpec => 77,
            Self::ExpP => 78,
            Self::LogP => 79,
            Self::Cnd => 80,
            Self::Def => 81,
            Self::TexReg2Rgb => 82,
            Self::TexDp3Tex => 83,
            Self::TexM3x2Depth => 84,
            Self::TexDp3 => 85,
            Self::TexM3x3 => 86,
            Self::TexDepth => 87,
            Self::Cmp => 88,
            Self::Bem => 89,
            Self::Dp2Add => 90,
            Self::Dsx => 91,
            Self::Dsy => 92,
            Self::TexLdd => 93,
            Self::Setp => 94,
            Self::TexLdl => 95,
            Self::Breakp => 96,
            Self::Phase => 0xFFFD,
            Self::Comment => 0xFFFE,
            Self::End => 0xFFFF,
            Self::Unknown(raw) => *raw,
        }
    }
}
