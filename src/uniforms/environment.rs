//! Scene-wide lighting globals

use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use static_assertions::const_assert_eq;

use super::{FieldLayout, UniformLayout, WgslType};
use crate::lighting::PunctualLight;
use crate::registry::BufferIndex;

/// Ambient and directional lighting plus the environment map flag.
///
/// `directional_light_direction` points from the surface toward the light.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct EnvironmentUniform {
    pub ambient_light_color: [f32; 3],
    _pad0: f32,
    pub directional_light_direction: [f32; 3],
    _pad1: f32,
    pub directional_light_color: [f32; 3],
    /// Non-zero when an environment cube map is bound.
    pub has_environment_map: i32,
}

const_assert_eq!(std::mem::size_of::<EnvironmentUniform>(), 48);
const_assert_eq!(std::mem::align_of::<EnvironmentUniform>(), 16);

impl Default for EnvironmentUniform {
    fn default() -> Self {
        Self::new(
            Vec3::splat(0.03),
            Vec3::new(0.5, 1.0, 0.5).normalize(),
            Vec3::ONE,
        )
    }
}

impl EnvironmentUniform {
    pub fn new(ambient: Vec3, light_direction: Vec3, light_color: Vec3) -> Self {
        Self {
            ambient_light_color: ambient.to_array(),
            _pad0: 0.0,
            directional_light_direction: light_direction.normalize_or_zero().to_array(),
            _pad1: 0.0,
            directional_light_color: light_color.to_array(),
            has_environment_map: 0,
        }
    }

    pub fn with_environment_map(mut self, present: bool) -> Self {
        self.has_environment_map = i32::from(present);
        self
    }

    pub fn has_environment_map(&self) -> bool {
        self.has_environment_map != 0
    }

    pub fn ambient(&self) -> Vec3 {
        Vec3::from_array(self.ambient_light_color)
    }

    /// The directional light as an entry of a light list.
    pub fn directional_light(&self) -> PunctualLight {
        PunctualLight::new(
            Vec3::from_array(self.directional_light_direction),
            Vec3::from_array(self.directional_light_color),
        )
    }
}

impl UniformLayout for EnvironmentUniform {
    const NAME: &'static str = "EnvironmentUniform";
    const SLOT: BufferIndex = BufferIndex::EnvironmentUniforms;

    fn fields() -> &'static [FieldLayout] {
        const FIELDS: &[FieldLayout] = &[
            FieldLayout::new(
                "ambient_light_color",
                WgslType::Vec3F32,
                offset_of!(EnvironmentUniform, ambient_light_color),
            ),
            FieldLayout::new(
                "directional_light_direction",
                WgslType::Vec3F32,
                offset_of!(EnvironmentUniform, directional_light_direction),
            ),
            FieldLayout::new(
                "directional_light_color",
                WgslType::Vec3F32,
                offset_of!(EnvironmentUniform, directional_light_color),
            ),
            FieldLayout::new(
                "has_environment_map",
                WgslType::I32,
                offset_of!(EnvironmentUniform, has_environment_map),
            ),
        ];
        FIELDS
    }
}
