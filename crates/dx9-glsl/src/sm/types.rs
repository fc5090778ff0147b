use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    Vertex,
    Pixel,
}

impl ShaderStage {
    /// Single-letter prefix used for per-stage uniform names (`VConstFloat`, `PSampler0`, ...).
    pub fn uniform_prefix(self) -> char {
        match self {
            ShaderStage::Vertex => 'V',
            ShaderStage::Pixel => 'P',
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vs",
            ShaderStage::Pixel => "ps",
        })
    }
}

/// Shader model number without the stage, ordered so version ranges can be compared directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderModel {
    pub major: u8,
    pub minor: u8,
}

impl ShaderModel {
    pub const MIN: ShaderModel = ShaderModel::new(0, 0);
    pub const MAX: ShaderModel = ShaderModel::new(0xFF, 0xFF);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderVersion {
    pub stage: ShaderStage,
    pub major: u8,
    pub minor: u8,
}

impl ShaderVersion {
    /// Decodes a version token (`0xFFFEmmnn` for vertex, `0xFFFFmmnn` for pixel shaders).
    pub fn from_token(token: u32) -> Option<Self> {
        let stage = match token >> 16 {
            0xFFFE => ShaderStage::Vertex,
            0xFFFF => ShaderStage::Pixel,
            _ => return None,
        };
        Some(Self {
            stage,
            major: ((token >> 8) & 0xFF) as u8,
            minor: (token & 0xFF) as u8,
        })
    }

    pub fn model(&self) -> ShaderModel {
        ShaderModel::new(self.major, self.minor)
    }
}

impl fmt::Display for ShaderVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.stage, self.major, self.minor)
    }
}
