//! Packed physically-based material description.
//!
//! Parameter set follows the Filament material model: base colour with
//! metallic/roughness, plus clearcoat, sheen, subsurface and transmission
//! controls. Texture slots are stored as 21-bit indices three per word.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::packed::{pack21x3, unpack21x3, PackError, PACKED_MAX, PACKED_PER_WORD};
use crate::Color;

/// Texture slots a material can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialTexture {
    Albedo,
    Alpha,
    MetallicRoughness,
    Normal,
    Specular,
    Emissive,
}

impl MaterialTexture {
    pub const COUNT: usize = 6;

    pub const ALL: [MaterialTexture; Self::COUNT] = [
        MaterialTexture::Albedo,
        MaterialTexture::Alpha,
        MaterialTexture::MetallicRoughness,
        MaterialTexture::Normal,
        MaterialTexture::Specular,
        MaterialTexture::Emissive,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

const TEXTURE_WORDS: usize = MaterialTexture::COUNT.div_ceil(PACKED_PER_WORD);

/// Stored in a slot that has no texture.
const TEXTURE_NONE: u32 = PACKED_MAX;

/// Largest texture id that can be assigned to a slot.
pub const MAX_TEXTURE_ID: u32 = PACKED_MAX - 1;

/// Number of boolean flags a material carries.
pub const FLAG_COUNT: u8 = 32;

/// Errors from checked material accessors.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialError {
    #[error("texture slot {0} is out of range")]
    TextureSlotOutOfRange(usize),

    #[error("texture id {0} does not fit in a texture slot")]
    TextureIdTooLarge(u32),

    #[error("flag {0} is out of range")]
    FlagOutOfRange(u8),

    #[error(transparent)]
    Pack(#[from] PackError),
}

pub type MaterialResult<T> = Result<T, MaterialError>;

fn no_textures() -> [u64; TEXTURE_WORDS] {
    [u64::MAX; TEXTURE_WORDS]
}

/// A physically-based surface material.
///
/// Scalar parameters are plain fields; texture slots and flags sit behind
/// bounds-checked accessors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    #[serde(skip, default = "no_textures")]
    textures: [u64; TEXTURE_WORDS],

    #[serde(skip)]
    flags: u32,

    /// Base colour (albedo for dielectrics, reflectance for metals)
    pub albedo: Color,

    /// Emission strength, scaled by albedo
    pub emissive: f32,

    /// 0 = smooth, 1 = rough
    pub roughness: f32,

    /// 0 = dielectric, 1 = metal
    pub metallic: f32,

    /// Dielectric reflectance at normal incidence, remapped as `0.08 * specular`
    pub specular: f32,

    pub anisotropy: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub sheen: f32,
    pub sheen_tint: f32,
    pub subsurface: f32,
    pub scatter_distance: f32,
    pub transparency: f32,
    pub translucency: f32,
    pub absorption_multiplier: f32,

    /// Index of refraction
    pub ior: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            textures: no_textures(),
            flags: 0,
            albedo: Color::new(0.8, 0.8, 0.8),
            emissive: 0.0,
            roughness: 0.5,
            metallic: 0.0,
            specular: 0.5,
            anisotropy: 0.0,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            sheen: 0.0,
            sheen_tint: 0.0,
            subsurface: 0.0,
            scatter_distance: 0.0,
            transparency: 0.0,
            translucency: 0.0,
            absorption_multiplier: 0.0,
            ior: 1.5,
        }
    }
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    /// A metal: fully metallic, no dielectric specular, sheen, subsurface or
    /// transmission terms.
    pub fn metal(albedo: Color, roughness: f32) -> Self {
        Self {
            albedo,
            roughness: roughness.clamp(0.0, 1.0),
            metallic: 1.0,
            specular: 0.0,
            ior: 0.0,
            ..Default::default()
        }
    }

    /// A dielectric: non-metallic and isotropic.
    pub fn dielectric(albedo: Color, specular: f32, roughness: f32, ior: f32) -> Self {
        Self {
            albedo,
            roughness: roughness.clamp(0.0, 1.0),
            metallic: 0.0,
            specular: specular.clamp(0.0, 1.0),
            anisotropy: 0.0,
            ior,
            ..Default::default()
        }
    }

    /// Builder method to set emission strength.
    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive.max(0.0);
        self
    }

    /// Builder method to set clearcoat and its roughness.
    pub fn with_clearcoat(mut self, clearcoat: f32, roughness: f32) -> Self {
        self.clearcoat = clearcoat.clamp(0.0, 1.0);
        self.clearcoat_roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Builder method to set sheen and sheen tint.
    pub fn with_sheen(mut self, sheen: f32, tint: f32) -> Self {
        self.sheen = sheen.clamp(0.0, 1.0);
        self.sheen_tint = tint.clamp(0.0, 1.0);
        self
    }

    /// Builder method to set subsurface amount and scatter distance.
    pub fn with_subsurface(mut self, subsurface: f32, scatter_distance: f32) -> Self {
        self.subsurface = subsurface.clamp(0.0, 1.0);
        self.scatter_distance = scatter_distance.max(0.0);
        self
    }

    /// Builder method to set transparency, translucency and absorption.
    pub fn with_transmission(
        mut self,
        transparency: f32,
        translucency: f32,
        absorption_multiplier: f32,
    ) -> Self {
        self.transparency = transparency.clamp(0.0, 1.0);
        self.translucency = translucency.clamp(0.0, 1.0);
        self.absorption_multiplier = absorption_multiplier.max(0.0);
        self
    }

    /// Texture assigned to `slot`, if any.
    pub fn texture(&self, slot: MaterialTexture) -> Option<u32> {
        let index = slot.index();
        let id = unpack21x3(self.textures[index / PACKED_PER_WORD], index % PACKED_PER_WORD);
        (id != TEXTURE_NONE).then_some(id)
    }

    /// Texture assigned to the slot at a raw index.
    pub fn texture_at(&self, index: usize) -> MaterialResult<Option<u32>> {
        MaterialTexture::from_index(index)
            .map(|slot| self.texture(slot))
            .ok_or(MaterialError::TextureSlotOutOfRange(index))
    }

    pub fn set_texture(&mut self, slot: MaterialTexture, id: u32) -> MaterialResult<()> {
        if id > MAX_TEXTURE_ID {
            return Err(MaterialError::TextureIdTooLarge(id));
        }
        self.write_texture(slot, id)
    }

    pub fn set_texture_at(&mut self, index: usize, id: u32) -> MaterialResult<()> {
        let slot =
            MaterialTexture::from_index(index).ok_or(MaterialError::TextureSlotOutOfRange(index))?;
        self.set_texture(slot, id)
    }

    pub fn clear_texture(&mut self, slot: MaterialTexture) -> MaterialResult<()> {
        self.write_texture(slot, TEXTURE_NONE)
    }

    fn write_texture(&mut self, slot: MaterialTexture, id: u32) -> MaterialResult<()> {
        let index = slot.index();
        pack21x3(
            &mut self.textures[index / PACKED_PER_WORD],
            index % PACKED_PER_WORD,
            id,
        )?;
        Ok(())
    }

    /// Whether any texture slot is in use.
    pub fn has_textures(&self) -> bool {
        MaterialTexture::ALL.iter().any(|&slot| self.texture(slot).is_some())
    }

    /// Flag `bit`; out-of-range bits read as false.
    pub fn flag(&self, bit: u8) -> bool {
        bit < FLAG_COUNT && (self.flags >> bit) & 1 == 1
    }

    pub fn set_flag(&mut self, bit: u8, on: bool) -> MaterialResult<()> {
        if bit >= FLAG_COUNT {
            return Err(MaterialError::FlagOutOfRange(bit));
        }
        if on {
            self.flags |= 1 << bit;
        } else {
            self.flags &= !(1 << bit);
        }
        Ok(())
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.emissive > 0.0 && self.albedo.length_squared() > 0.0
    }
}
