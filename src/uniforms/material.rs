//! Material parameters for physically-based shading

use std::collections::HashMap;
use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use static_assertions::const_assert_eq;

use super::{FieldLayout, UniformLayout, WgslType};
use crate::registry::{BufferIndex, FunctionConstant, QualityLevel, Slot};

/// Disney-style material channels.
///
/// Scalar channels are meant to lie in [0, 1]. Nothing here enforces that;
/// the evaluator clamps them itself.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    /// Linear RGB plus alpha.
    pub base_color: [f32; 4],
    pub emission_color: [f32; 3],
    pub roughness: f32,
    pub metalness: f32,
    pub ambient_occlusion: f32,
    pub opacity: f32,
    pub subsurface: f32,
    pub specular: f32,
    pub specular_tint: f32,
    pub anisotropic: f32,
    pub sheen: f32,
    pub sheen_tint: f32,
    pub clearcoat: f32,
    pub clearcoat_gloss: f32,
    _pad0: f32,
}

const_assert_eq!(std::mem::size_of::<MaterialUniform>(), 80);
const_assert_eq!(std::mem::align_of::<MaterialUniform>(), 16);

impl Default for MaterialUniform {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            emission_color: [0.0; 3],
            roughness: 0.5,
            metalness: 0.0,
            ambient_occlusion: 1.0,
            opacity: 1.0,
            subsurface: 0.0,
            specular: 0.5,
            specular_tint: 0.0,
            anisotropic: 0.0,
            sheen: 0.0,
            sheen_tint: 0.5,
            clearcoat: 0.0,
            clearcoat_gloss: 1.0,
            _pad0: 0.0,
        }
    }
}

impl MaterialUniform {
    /// A material with every channel zeroed except the given base color.
    pub fn from_base_color(color: Vec4) -> Self {
        Self {
            base_color: color.to_array(),
            ..Self::zeroed()
        }
    }

    pub fn with_base_color(mut self, color: Vec4) -> Self {
        self.base_color = color.to_array();
        self
    }

    pub fn with_emission(mut self, color: Vec3) -> Self {
        self.emission_color = color.to_array();
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    pub fn with_ambient_occlusion(mut self, ambient_occlusion: f32) -> Self {
        self.ambient_occlusion = ambient_occlusion;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_subsurface(mut self, subsurface: f32) -> Self {
        self.subsurface = subsurface;
        self
    }

    pub fn with_specular(mut self, specular: f32, tint: f32) -> Self {
        self.specular = specular;
        self.specular_tint = tint;
        self
    }

    pub fn with_anisotropic(mut self, anisotropic: f32) -> Self {
        self.anisotropic = anisotropic;
        self
    }

    pub fn with_sheen(mut self, sheen: f32, tint: f32) -> Self {
        self.sheen = sheen;
        self.sheen_tint = tint;
        self
    }

    pub fn with_clearcoat(mut self, clearcoat: f32, gloss: f32) -> Self {
        self.clearcoat = clearcoat;
        self.clearcoat_gloss = gloss;
        self
    }

    pub fn base_color(&self) -> Vec4 {
        Vec4::from_array(self.base_color)
    }

    pub fn emission(&self) -> Vec3 {
        Vec3::from_array(self.emission_color)
    }

    /// Copy with every scalar channel and the base color clamped to [0, 1].
    /// NaN channels become 0.
    pub fn clamped(&self) -> Self {
        fn unit(v: f32) -> f32 {
            if v.is_nan() {
                0.0
            } else {
                v.clamp(0.0, 1.0)
            }
        }

        Self {
            base_color: self.base_color.map(unit),
            emission_color: self.emission_color.map(|v| if v.is_nan() { 0.0 } else { v.max(0.0) }),
            roughness: unit(self.roughness),
            metalness: unit(self.metalness),
            ambient_occlusion: unit(self.ambient_occlusion),
            opacity: unit(self.opacity),
            subsurface: unit(self.subsurface),
            specular: unit(self.specular),
            specular_tint: unit(self.specular_tint),
            anisotropic: unit(self.anisotropic),
            sheen: unit(self.sheen),
            sheen_tint: unit(self.sheen_tint),
            clearcoat: unit(self.clearcoat),
            clearcoat_gloss: unit(self.clearcoat_gloss),
            _pad0: 0.0,
        }
    }

    // Preset materials

    pub fn plastic(color: Vec3) -> Self {
        Self::default()
            .with_base_color(color.extend(1.0))
            .with_roughness(0.4)
    }

    pub fn metal(color: Vec3, roughness: f32) -> Self {
        Self::default()
            .with_base_color(color.extend(1.0))
            .with_metalness(1.0)
            .with_roughness(roughness)
    }

    pub fn gold() -> Self {
        Self::metal(Vec3::new(1.0, 0.766, 0.336), 0.3)
    }

    pub fn brushed_aluminium() -> Self {
        Self::metal(Vec3::new(0.913, 0.922, 0.924), 0.35).with_anisotropic(0.8)
    }

    pub fn rubber(color: Vec3) -> Self {
        Self::default()
            .with_base_color(color.extend(1.0))
            .with_roughness(0.9)
            .with_specular(0.2, 0.0)
    }

    pub fn glass() -> Self {
        Self::default()
            .with_base_color(Vec4::new(1.0, 1.0, 1.0, 0.3))
            .with_roughness(0.05)
            .with_opacity(0.3)
    }

    pub fn car_paint(color: Vec3) -> Self {
        Self::default()
            .with_base_color(color.extend(1.0))
            .with_metalness(0.6)
            .with_roughness(0.4)
            .with_clearcoat(1.0, 0.9)
    }

    pub fn velvet(color: Vec3) -> Self {
        Self::default()
            .with_base_color(color.extend(1.0))
            .with_roughness(0.8)
            .with_sheen(1.0, 0.5)
    }

    pub fn skin(color: Vec3) -> Self {
        Self::default()
            .with_base_color(color.extend(1.0))
            .with_roughness(0.6)
            .with_subsurface(0.8)
    }

    pub fn emissive(color: Vec3) -> Self {
        Self::default().with_emission(color)
    }
}

impl UniformLayout for MaterialUniform {
    const NAME: &'static str = "MaterialUniform";
    const SLOT: BufferIndex = BufferIndex::MaterialUniforms;

    fn fields() -> &'static [FieldLayout] {
        const FIELDS: &[FieldLayout] = &[
            FieldLayout::new("base_color", WgslType::Vec4F32, offset_of!(MaterialUniform, base_color)),
            FieldLayout::new(
                "emission_color",
                WgslType::Vec3F32,
                offset_of!(MaterialUniform, emission_color),
            ),
            FieldLayout::new("roughness", WgslType::F32, offset_of!(MaterialUniform, roughness)),
            FieldLayout::new("metalness", WgslType::F32, offset_of!(MaterialUniform, metalness)),
            FieldLayout::new(
                "ambient_occlusion",
                WgslType::F32,
                offset_of!(MaterialUniform, ambient_occlusion),
            ),
            FieldLayout::new("opacity", WgslType::F32, offset_of!(MaterialUniform, opacity)),
            FieldLayout::new("subsurface", WgslType::F32, offset_of!(MaterialUniform, subsurface)),
            FieldLayout::new("specular", WgslType::F32, offset_of!(MaterialUniform, specular)),
            FieldLayout::new(
                "specular_tint",
                WgslType::F32,
                offset_of!(MaterialUniform, specular_tint),
            ),
            FieldLayout::new("anisotropic", WgslType::F32, offset_of!(MaterialUniform, anisotropic)),
            FieldLayout::new("sheen", WgslType::F32, offset_of!(MaterialUniform, sheen)),
            FieldLayout::new("sheen_tint", WgslType::F32, offset_of!(MaterialUniform, sheen_tint)),
            FieldLayout::new("clearcoat", WgslType::F32, offset_of!(MaterialUniform, clearcoat)),
            FieldLayout::new(
                "clearcoat_gloss",
                WgslType::F32,
                offset_of!(MaterialUniform, clearcoat_gloss),
            ),
        ];
        FIELDS
    }
}

bitflags::bitflags! {
    /// Material maps bound for a draw; one bit per map function constant.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MaterialFeatures: u32 {
        const BASE_COLOR_MAP = 1 << FunctionConstant::BaseColorMap.index();
        const NORMAL_MAP = 1 << FunctionConstant::NormalMap.index();
        const METALLIC_MAP = 1 << FunctionConstant::MetallicMap.index();
        const ROUGHNESS_MAP = 1 << FunctionConstant::RoughnessMap.index();
        const AMBIENT_OCCLUSION_MAP = 1 << FunctionConstant::AmbientOcclusionMap.index();
        const EMISSION_MAP = 1 << FunctionConstant::EmissionMap.index();
        const SUBSURFACE_MAP = 1 << FunctionConstant::SubsurfaceMap.index();
        const SPECULAR_MAP = 1 << FunctionConstant::SpecularMap.index();
        const SPECULAR_TINT_MAP = 1 << FunctionConstant::SpecularTintMap.index();
        const ANISOTROPIC_MAP = 1 << FunctionConstant::AnisotropicMap.index();
        const SHEEN_MAP = 1 << FunctionConstant::SheenMap.index();
        const SHEEN_TINT_MAP = 1 << FunctionConstant::SheenTintMap.index();
        const CLEARCOAT_MAP = 1 << FunctionConstant::ClearcoatMap.index();
        const CLEARCOAT_GLOSS_MAP = 1 << FunctionConstant::ClearcoatGlossMap.index();
    }
}

impl MaterialFeatures {
    /// The feature bit of a map constant.
    pub fn from_constant(constant: FunctionConstant) -> Self {
        Self::from_bits_truncate(1 << constant.index())
    }

    /// Override values for a pipeline specialized to these maps and `quality`,
    /// keyed by override id as wgpu expects. The tier sits at
    /// [`QualityLevel::OVERRIDE_ID`].
    pub fn specialization_constants(self, quality: QualityLevel) -> HashMap<String, f64> {
        let mut constants: HashMap<_, _> = FunctionConstant::ALL
            .iter()
            .map(|constant| {
                let enabled = self.contains(Self::from_constant(*constant));
                (constant.index().to_string(), f64::from(u8::from(enabled)))
            })
            .collect();
        constants.insert(
            QualityLevel::OVERRIDE_ID.to_string(),
            f64::from(quality.index()),
        );
        constants
    }
}
