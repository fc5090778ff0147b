use std::collections::BTreeMap;

/// Where the engine carves global and skinning constants out of the float constant file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstantLayout {
    pub vs_global_base: u32,
    pub ps_global_base: u32,
    pub bone_base: u32,
    pub vs_global_vectors: u32,
    pub ps_global_vectors: u32,
    pub bone_vectors: u32,
}

impl Default for ConstantLayout {
    fn default() -> Self {
        Self {
            vs_global_base: 241,
            ps_global_base: 216,
            bone_base: 16,
            vs_global_vectors: 15,
            ps_global_vectors: 8,
            bone_vectors: 225,
        }
    }
}

impl ConstantLayout {
    /// Length of the shared `ConstGlobal` array, sized for either stage.
    pub fn global_array_len(&self) -> u32 {
        self.vs_global_vectors.max(self.ps_global_vectors)
    }
}

/// D3D texture formats the color-correction check cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureFormat {
    A8R8G8B8,
    L6V5U5,
    X8L8V8U8,
    Q8W8V8U8,
    Other(u32),
}

impl TextureFormat {
    pub fn from_d3d(raw: u32) -> Self {
        match raw {
            21 => Self::A8R8G8B8,
            61 => Self::L6V5U5,
            62 => Self::X8L8V8U8,
            63 => Self::Q8W8V8U8,
            other => Self::Other(other),
        }
    }

    pub fn to_d3d(self) -> u32 {
        match self {
            Self::A8R8G8B8 => 21,
            Self::L6V5U5 => 61,
            Self::X8L8V8U8 => 62,
            Self::Q8W8V8U8 => 63,
            Self::Other(raw) => raw,
        }
    }

    /// Bump-map formats whose signed channels would need a conversion pass GLSL 1.20 can't do.
    pub fn needs_color_correction(self) -> bool {
        matches!(self, Self::L6V5U5 | Self::X8L8V8U8 | Self::Q8W8V8U8)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TranslateOptions {
    pub has_global_consts: bool,
    pub has_bone_consts: bool,
    pub constant_layout: ConstantLayout,
    pub sampler_formats: BTreeMap<u32, TextureFormat>,
}

impl TranslateOptions {
    pub fn texture_format(&self, sampler: u32) -> TextureFormat {
        self.sampler_formats
            .get(&sampler)
            .copied()
            .unwrap_or(TextureFormat::A8R8G8B8)
    }
}
