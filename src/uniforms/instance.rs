//! Per-instance transform and effect records

use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};
use static_assertions::const_assert_eq;

use super::{mat3_columns, mat3_from_columns, FieldLayout, UniformLayout, WgslType};
use crate::registry::BufferIndex;

/// Below this determinant the upper 3x3 of a model matrix is treated as singular.
const SINGULAR_DETERMINANT: f32 = 1e-12;

/// Model matrix of one anchored object and its normal matrix.
///
/// The fields are private so that the normal matrix can only be produced from
/// the model matrix it belongs to.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceTransformUniform {
    model_matrix: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 3],
}

const_assert_eq!(std::mem::size_of::<InstanceTransformUniform>(), 112);
const_assert_eq!(std::mem::align_of::<InstanceTransformUniform>(), 16);

impl Default for InstanceTransformUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY)
    }
}

impl InstanceTransformUniform {
    pub fn new(model: Mat4) -> Self {
        Self {
            model_matrix: model.to_cols_array_2d(),
            normal_matrix: mat3_columns(normal_matrix_for(model)),
        }
    }

    /// Replace the model matrix; the normal matrix is recomputed with it.
    pub fn set_model_matrix(&mut self, model: Mat4) {
        *self = Self::new(model);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model_matrix)
    }

    pub fn normal_matrix(&self) -> Mat3 {
        mat3_from_columns(&self.normal_matrix)
    }
}

/// Inverse-transpose of the upper-left 3x3 of `model`.
///
/// A singular upper 3x3 (for example a scale of zero on one axis) has no
/// inverse; the cofactor matrix is used instead. It equals the
/// inverse-transpose scaled by the determinant, so transformed normals keep
/// their direction once renormalized.
pub fn normal_matrix_for(model: Mat4) -> Mat3 {
    let upper = Mat3::from_mat4(model);
    if upper.determinant().abs() > SINGULAR_DETERMINANT {
        return upper.inverse().transpose();
    }

    log::warn!("singular model matrix, using cofactor matrix for normals");
    Mat3::from_cols(
        upper.y_axis.cross(upper.z_axis),
        upper.z_axis.cross(upper.x_axis),
        upper.x_axis.cross(upper.y_axis),
    )
}

impl UniformLayout for InstanceTransformUniform {
    const NAME: &'static str = "InstanceTransformUniform";
    const SLOT: BufferIndex = BufferIndex::AnchorInstanceUniforms;

    fn fields() -> &'static [FieldLayout] {
        const FIELDS: &[FieldLayout] = &[
            FieldLayout::new(
                "model_matrix",
                WgslType::Mat4x4F32,
                offset_of!(InstanceTransformUniform, model_matrix),
            ),
            FieldLayout::new(
                "normal_matrix",
                WgslType::Mat3x3F32,
                offset_of!(InstanceTransformUniform, normal_matrix),
            ),
        ];
        FIELDS
    }
}

/// Visual modifiers of one anchor instance. They never affect geometry.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceEffectsUniform {
    /// Opacity multiplier.
    pub alpha: f32,
    /// Emissive boost.
    pub glow: f32,
    _pad0: [f32; 2],
    /// Color multiplier.
    pub tint: [f32; 3],
    /// Uniform scale applied in shading, independent of the model matrix.
    pub scale: f32,
}

const_assert_eq!(std::mem::size_of::<InstanceEffectsUniform>(), 32);
const_assert_eq!(std::mem::align_of::<InstanceEffectsUniform>(), 16);

impl Default for InstanceEffectsUniform {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            glow: 0.0,
            _pad0: [0.0; 2],
            tint: [1.0; 3],
            scale: 1.0,
        }
    }
}

impl InstanceEffectsUniform {
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_glow(mut self, glow: f32) -> Self {
        self.glow = glow;
        self
    }

    pub fn with_tint(mut self, tint: Vec3) -> Self {
        self.tint = tint.to_array();
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn tint(&self) -> Vec3 {
        Vec3::from_array(self.tint)
    }
}

impl UniformLayout for InstanceEffectsUniform {
    const NAME: &'static str = "InstanceEffectsUniform";
    const SLOT: BufferIndex = BufferIndex::AnchorEffectsUniforms;

    fn fields() -> &'static [FieldLayout] {
        const FIELDS: &[FieldLayout] = &[
            FieldLayout::new("alpha", WgslType::F32, offset_of!(InstanceEffectsUniform, alpha)),
            FieldLayout::new("glow", WgslType::F32, offset_of!(InstanceEffectsUniform, glow)),
            FieldLayout::new("tint", WgslType::Vec3F32, offset_of!(InstanceEffectsUniform, tint)),
            FieldLayout::new("scale", WgslType::F32, offset_of!(InstanceEffectsUniform, scale)),
        ];
        FIELDS
    }
}

/// Packed per-instance arrays for one instanced draw.
///
/// Rebuilt every frame: `clear` and push every visible instance again.
#[derive(Debug, Clone, Default)]
pub struct InstanceBuffer {
    transforms: Vec<InstanceTransformUniform>,
    effects: Vec<InstanceEffectsUniform>,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transforms: Vec::with_capacity(capacity),
            effects: Vec::with_capacity(capacity),
        }
    }

    /// Append one instance and return the index the device program reads it at.
    pub fn push(&mut self, model: Mat4, effects: InstanceEffectsUniform) -> u32 {
        let index = self.transforms.len() as u32;
        self.transforms.push(InstanceTransformUniform::new(model));
        self.effects.push(effects);
        index
    }

    pub fn clear(&mut self) {
        self.transforms.clear();
        self.effects.clear();
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transform(&self, index: u32) -> Option<&InstanceTransformUniform> {
        self.transforms.get(index as usize)
    }

    pub fn effects(&self, index: u32) -> Option<&InstanceEffectsUniform> {
        self.effects.get(index as usize)
    }

    /// Bytes for the [`BufferIndex::AnchorInstanceUniforms`] array.
    pub fn transform_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.transforms)
    }

    /// Bytes for the [`BufferIndex::AnchorEffectsUniforms`] array.
    pub fn effects_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.effects)
    }
}
