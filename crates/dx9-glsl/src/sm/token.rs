//! Bit-field decoding of D3D9 shader tokens.
//!
//! Field layouts follow `D3DSHADER_PARAM_*` / `D3DSI_*` from the Direct3D 9 SDK headers.

use bitflags::bitflags;

use crate::sm::types::ShaderStage;

pub(crate) const END_TOKEN: u32 = 0x0000_FFFF;

pub(crate) const OPCODE_MASK: u32 = 0x0000_FFFF;
pub(crate) const OPCODE_CONTROL_MASK: u32 = 0x00FF_0000;
pub(crate) const OPCODE_CONTROL_SHIFT: u32 = 16;
pub(crate) const PREDICATED: u32 = 0x1000_0000;
pub(crate) const COMMENT_SIZE_MASK: u32 = 0x7FFF_0000;
pub(crate) const COMMENT_SIZE_SHIFT: u32 = 16;

pub(crate) const TEXLD_PROJECT: u32 = 0x0001_0000;
pub(crate) const TEXLD_BIAS: u32 = 0x0002_0000;

const REGNUM_MASK: u32 = 0x0000_07FF;
const REGTYPE_MASK: u32 = 0x7000_0000;
const REGTYPE_SHIFT: u32 = 28;
const REGTYPE_MASK2: u32 = 0x0000_1800;
const REGTYPE_SHIFT2: u32 = 8;
const RELATIVE: u32 = 0x0000_2000;
const WRITEMASK_MASK: u32 = 0x000F_0000;
const WRITEMASK_SHIFT: u32 = 16;
const SWIZZLE_MASK: u32 = 0x00FF_0000;
const SWIZZLE_SHIFT: u32 = 16;
const SRCMOD_MASK: u32 = 0x0F00_0000;
const SRCMOD_SHIFT: u32 = 24;
const DSTMOD_MASK: u32 = 0x00F0_0000;
const DSTMOD_SHIFT: u32 = 20;
const DSTSHIFT_MASK: u32 = 0x0F00_0000;
const DSTSHIFT_SHIFT: u32 = 24;

const DCL_USAGE_MASK: u32 = 0x0000_001F;
const DCL_USAGE_INDEX_MASK: u32 = 0x000F_0000;
const DCL_USAGE_INDEX_SHIFT: u32 = 16;
const TEXTURE_TYPE_MASK: u32 = 0x7800_0000;
const TEXTURE_TYPE_SHIFT: u32 = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterFile {
    Temp,
    Input,
    Const,
    /// Vertex shader address register (`a0`).
    Addr,
    /// Pixel shader texture coordinate register (`t#`).
    Texture,
    RastOut,
    AttrOut,
    /// Pre-3.0 vertex shader texture coordinate output (`oT#`).
    TexCoordOut,
    /// vs_3_0 generic output (`o#`).
    Output,
    ConstInt,
    ColorOut,
    DepthOut,
    Sampler,
    Const2,
    Const3,
    Const4,
    ConstBool,
    Loop,
    TempFloat16,
    MiscType,
    Label,
    Predicate,
    Unknown(u8),
}

impl RegisterFile {
    /// Maps a raw `D3DSHADER_PARAM_REGISTER_TYPE` value.
    ///
    /// Types 3 and 6 are stage dependent: 3 is `a#` in vertex shaders and `t#` in pixel shaders;
    /// 6 is `oT#` before vs_3_0 and the generic `o#` file from vs_3_0 on.
    pub fn from_raw(raw: u8, stage: ShaderStage, major: u8) -> Self {
        match raw {
            0 => Self::Temp,
            1 => Self::Input,
            2 => Self::Const,
            3 => match stage {
                ShaderStage::Vertex => Self::Addr,
                ShaderStage::Pixel => Self::Texture,
            },
            4 => Self::RastOut,
            5 => Self::AttrOut,
            6 => {
                if stage == ShaderStage::Vertex && major >= 3 {
                    Self::Output
                } else {
                    Self::TexCoordOut
                }
            }
            7 => Self::ConstInt,
            8 => Self::ColorOut,
            9 => Self::DepthOut,
            10 => Self::Sampler,
            11 => Self::Const2,
            12 => Self::Const3,
            13 => Self::Const4,
            14 => Self::ConstBool,
            15 => Self::Loop,
            16 => Self::TempFloat16,
            17 => Self::MiscType,
            18 => Self::Label,
            19 => Self::Predicate,
            other => Self::Unknown(other),
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Temp => "r",
            Self::Input => "v",
            Self::Const => "c",
            Self::Addr => "a",
            Self::Texture => "t",
            Self::RastOut => "oPos",
            Self::AttrOut => "oD",
            Self::TexCoordOut => "oT",
            Self::Output => "o",
            Self::ConstInt => "i",
            Self::ColorOut => "oC",
            Self::DepthOut => "oDepth",
            Self::Sampler => "s",
            Self::Const2 => "c2_",
            Self::Const3 => "c3_",
            Self::Const4 => "c4_",
            Self::ConstBool => "b",
            Self::Loop => "aL",
            Self::TempFloat16 => "half",
            Self::MiscType => "misc",
            Self::Label => "l",
            Self::Predicate => "p",
            Self::Unknown(_) => "?",
        }
    }
}

bitflags! {
    /// Destination write mask (`D3DSP_WRITEMASK_*`), also used to select swizzle components.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WriteMask: u8 {
        const X = 0x1;
        const Y = 0x2;
        const Z = 0x4;
        const W = 0x8;
        const XY = Self::X.bits() | Self::Y.bits();
        const XYZ = Self::XY.bits() | Self::Z.bits();
        const XYZW = Self::XYZ.bits() | Self::W.bits();
    }
}

impl WriteMask {
    pub fn component_count(self) -> u32 {
        self.bits().count_ones()
    }

    /// Mask selecting the single component `index` (0..=3).
    pub fn component(index: usize) -> Self {
        Self::from_bits_truncate(1 << (index & 3))
    }

    /// Mask letters for the selected components, `rgba` in pixel shaders and `xyzw` otherwise.
    pub fn letters(self, stage: ShaderStage) -> String {
        let table = component_letters(stage);
        (0..4)
            .filter(|&i| self.contains(Self::component(i)))
            .map(|i| table[i])
            .collect()
    }
}

pub(crate) fn component_letters(stage: ShaderStage) -> [char; 4] {
    match stage {
        ShaderStage::Pixel => ['r', 'g', 'b', 'a'],
        ShaderStage::Vertex => ['x', 'y', 'z', 'w'],
    }
}

/// Source swizzle: four 2-bit component selectors, x in the lowest bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Swizzle(pub u8);

impl Swizzle {
    pub const IDENTITY: Swizzle = Swizzle(0xE4);

    pub fn component(self, index: usize) -> usize {
        usize::from((self.0 >> (2 * (index & 3))) & 0x3)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SrcModifier {
    None,
    Negate,
    Bias,
    BiasNegate,
    Sign,
    SignNegate,
    Comp,
    X2,
    X2Negate,
    Dz,
    Dw,
    Abs,
    AbsNegate,
    Not,
}

impl SrcModifier {
    pub fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => Self::None,
            1 => Self::Negate,
            2 => Self::Bias,
            3 => Self::BiasNegate,
            4 => Self::Sign,
            5 => Self::SignNegate,
            6 => Self::Comp,
            7 => Self::X2,
            8 => Self::X2Negate,
            9 => Self::Dz,
            10 => Self::Dw,
            11 => Self::Abs,
            12 => Self::AbsNegate,
            13 => Self::Not,
            _ => return None,
        })
    }
}

bitflags! {
    /// Destination modifiers (`D3DSPDM_*`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DstModifiers: u8 {
        const SATURATE = 0x1;
        /// `_pp`. GLSL 1.20 has no precision qualifiers, so the translator ignores it.
        const PARTIAL_PRECISION = 0x2;
        const CENTROID = 0x4;
    }
}

/// `D3DDECLUSAGE` values carried by `dcl` usage tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeclUsage {
    Position,
    BlendWeight,
    BlendIndices,
    Normal,
    PSize,
    TexCoord,
    Tangent,
    Binormal,
    TessFactor,
    PositionT,
    Color,
    Fog,
    Depth,
    Sample,
}

impl DeclUsage {
    pub fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => Self::Position,
            1 => Self::BlendWeight,
            2 => Self::BlendIndices,
            3 => Self::Normal,
            4 => Self::PSize,
            5 => Self::TexCoord,
            6 => Self::Tangent,
            7 => Self::Binormal,
            8 => Self::TessFactor,
            9 => Self::PositionT,
            10 => Self::Color,
            11 => Self::Fog,
            12 => Self::Depth,
            13 => Self::Sample,
            _ => return None,
        })
    }

    /// Name fragment used for vertex attribute identifiers (`Un_Attr<name><index>`).
    pub fn attribute_name(self) -> &'static str {
        match self {
            Self::Position => "Position",
            Self::BlendWeight => "BlendWeight",
            Self::BlendIndices => "BlendIndices",
            Self::Normal => "Normal",
            Self::PSize => "PSize",
            Self::TexCoord => "TexCoord",
            Self::Tangent => "Tangent",
            Self::Binormal => "Binormal",
            Self::TessFactor => "TessFactor",
            Self::PositionT => "PositionT",
            Self::Color => "Color",
            Self::Fog => "Fog",
            Self::Depth => "Depth",
            Self::Sample => "Sample",
        }
    }
}

/// Sampler dimensionality declared by `dcl_1d`/`dcl_2d`/`dcl_cube`/`dcl_volume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    Texture1D,
    Texture2D,
    Cube,
    Volume,
}

impl TextureType {
    pub fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            1 => Self::Texture1D,
            2 => Self::Texture2D,
            3 => Self::Cube,
            4 => Self::Volume,
            _ => return None,
        })
    }

    /// Suffix of the GLSL sampler type (`sampler2D`, `samplerCube`, ...).
    pub fn glsl_suffix(self) -> &'static str {
        match self {
            Self::Texture1D => "1D",
            Self::Texture2D => "2D",
            Self::Cube => "Cube",
            Self::Volume => "3D",
        }
    }
}

/// Comparison encoded in the opcode-specific control bits of `ifc`/`breakc`/`setp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Eq,
    Ge,
    Lt,
    Ne,
    Le,
}

impl CompareOp {
    pub fn from_control(control: u8) -> Option<Self> {
        Some(match control {
            1 => Self::Gt,
            2 => Self::Eq,
            3 => Self::Ge,
            4 => Self::Lt,
            5 => Self::Ne,
            6 => Self::Le,
            _ => return None,
        })
    }

    pub fn glsl_operator(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Eq => "==",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Ne => "!=",
            Self::Le => "<=",
        }
    }
}

/// Control bits (16..23) of an instruction token.
pub(crate) fn opcode_control(instruction_token: u32) -> u8 {
    ((instruction_token & OPCODE_CONTROL_MASK) >> OPCODE_CONTROL_SHIFT) as u8
}

/// A destination or source parameter token, plus the relative-address token that follows it
/// when relative addressing is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Param {
    pub token: u32,
    pub address: Option<u32>,
}

impl Param {
    pub fn new(token: u32) -> Self {
        Self {
            token,
            address: None,
        }
    }

    pub fn raw_register_type(&self) -> u8 {
        raw_register_type(self.token)
    }

    pub fn file(&self, stage: ShaderStage, major: u8) -> RegisterFile {
        RegisterFile::from_raw(self.raw_register_type(), stage, major)
    }

    pub fn number(&self) -> u32 {
        self.token & REGNUM_MASK
    }

    pub fn is_relative(&self) -> bool {
        self.token & RELATIVE != 0
    }

    pub fn write_mask(&self) -> WriteMask {
        WriteMask::from_bits_truncate(((self.token & WRITEMASK_MASK) >> WRITEMASK_SHIFT) as u8)
    }

    pub fn swizzle(&self) -> Swizzle {
        Swizzle(((self.token & SWIZZLE_MASK) >> SWIZZLE_SHIFT) as u8)
    }

    pub fn raw_src_modifier(&self) -> u8 {
        ((self.token & SRCMOD_MASK) >> SRCMOD_SHIFT) as u8
    }

    pub fn dst_modifiers(&self) -> DstModifiers {
        DstModifiers::from_bits_truncate(((self.token & DSTMOD_MASK) >> DSTMOD_SHIFT) as u8)
    }

    /// Result shift code (`_x2`, `_d4`, ...), a signed 4-bit value stored unsigned.
    pub fn result_shift(&self) -> u8 {
        ((self.token & DSTSHIFT_MASK) >> DSTSHIFT_SHIFT) as u8
    }

    /// True for register files that hold a single scalar per register.
    pub fn is_scalar(&self) -> bool {
        match self.raw_register_type() {
            // loop, bool constant, depth out, predicate
            15 | 14 | 9 | 19 => true,
            // oFog / oPts
            4 => self.number() != 0,
            _ => false,
        }
    }

    /// Same parameter with its write mask replaced.
    pub fn with_write_mask(&self, mask: WriteMask) -> Self {
        Self {
            token: (self.token & !WRITEMASK_MASK) | (u32::from(mask.bits()) << WRITEMASK_SHIFT),
            address: self.address,
        }
    }

    /// Same parameter addressing the register `offset` slots further along.
    pub fn with_register_offset(&self, offset: u32) -> Self {
        let number = (self.number() + offset) & REGNUM_MASK;
        Self {
            token: (self.token & !REGNUM_MASK) | number,
            address: self.address,
        }
    }

    /// Reads the same register as a plain source: identity swizzle, no modifier.
    pub fn as_source(&self) -> Self {
        let register_bits = 0x8000_0000 | REGTYPE_MASK | REGTYPE_MASK2 | RELATIVE | REGNUM_MASK;
        Self {
            token: (self.token & register_bits)
                | (u32::from(Swizzle::IDENTITY.0) << SWIZZLE_SHIFT),
            address: self.address,
        }
    }

    /// True when both parameters name the same register (file and index).
    pub fn aliases(&self, other: &Param) -> bool {
        self.raw_register_type() == other.raw_register_type() && self.number() == other.number()
    }
}

pub(crate) fn raw_register_type(token: u32) -> u8 {
    (((token & REGTYPE_MASK) >> REGTYPE_SHIFT) | ((token & REGTYPE_MASK2) >> REGTYPE_SHIFT2)) as u8
}

/// Decoded `dcl` usage token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclToken(pub u32);

impl DeclToken {
    pub fn raw_usage(self) -> u8 {
        (self.0 & DCL_USAGE_MASK) as u8
    }

    pub fn usage(self) -> Option<DeclUsage> {
        DeclUsage::from_raw(self.raw_usage())
    }

    pub fn usage_index(self) -> u32 {
        (self.0 & DCL_USAGE_INDEX_MASK) >> DCL_USAGE_INDEX_SHIFT
    }

    pub fn raw_texture_type(self) -> u8 {
        ((self.0 & TEXTURE_TYPE_MASK) >> TEXTURE_TYPE_SHIFT) as u8
    }

    pub fn texture_type(self) -> Option<TextureType> {
        TextureType::from_raw(self.raw_texture_type())
    }
}
