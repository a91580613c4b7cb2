//! The concrete slot namespaces.

use static_assertions::const_assert_eq;

slot_enum! {
    /// Buffer bind points.
    pub enum BufferIndex: "BufferIndex", "BUFFER_INDEX" {
        MeshPositions => "mesh_positions",
        MeshGenerics => "mesh_generics",
        /// Packed array of [`InstanceTransformUniform`](crate::uniforms::InstanceTransformUniform).
        AnchorInstanceUniforms => "anchor_instance_uniforms",
        /// [`CameraUniform`](crate::uniforms::CameraUniform) of the viewport being drawn.
        SharedUniforms => "shared_uniforms",
        MaterialUniforms => "material_uniforms",
        TrackingPointData => "tracking_point_data",
        /// Joint matrices of every skinned mesh in the frame.
        MeshPalettes => "mesh_palettes",
        /// First palette entry used by the current draw.
        MeshPaletteIndex => "mesh_palette_index",
        /// Number of palette entries used by the current draw; zero when unskinned.
        MeshPaletteSize => "mesh_palette_size",
        /// Packed array of [`InstanceEffectsUniform`](crate::uniforms::InstanceEffectsUniform).
        AnchorEffectsUniforms => "anchor_effects_uniforms",
        EnvironmentUniforms => "environment_uniforms",
    }
}

/// How a buffer slot is consumed by the device program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    /// A vertex stream, bound with `set_vertex_buffer`.
    VertexStream,
    /// A single uniform record.
    Uniform,
    /// A read-only array indexed per instance or per joint.
    StorageArray,
}

impl BufferIndex {
    pub fn kind(self) -> BufferKind {
        match self {
            Self::MeshPositions | Self::MeshGenerics => BufferKind::VertexStream,
            Self::SharedUniforms
            | Self::MaterialUniforms
            | Self::MeshPaletteIndex
            | Self::MeshPaletteSize
            | Self::EnvironmentUniforms => BufferKind::Uniform,
            Self::AnchorInstanceUniforms
            | Self::AnchorEffectsUniforms
            | Self::TrackingPointData
            | Self::MeshPalettes => BufferKind::StorageArray,
        }
    }

    /// Non-vertex slots bound for an anchor draw, in index order.
    ///
    /// Tracking point data belongs to the point cloud pass and is not part of
    /// the anchor bind group.
    pub fn anchor_slots() -> impl Iterator<Item = BufferIndex> {
        <Self as super::Slot>::ALL.iter().copied().filter(|slot| {
            slot.kind() != BufferKind::VertexStream && *slot != Self::TrackingPointData
        })
    }
}

slot_enum! {
    /// Vertex attribute locations.
    pub enum VertexAttribute: "VertexAttribute", "VERTEX_ATTRIBUTE" {
        Position => "position",
        Texcoord => "texcoord",
        Normal => "normal",
        Tangent => "tangent",
        JointIndices => "joint_indices",
        JointWeights => "joint_weights",
        Color => "color",
    }
}

/// Component format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeFormat {
    Float32x2,
    Float32x3,
    Float32x4,
    Uint16x4,
}

impl AttributeFormat {
    /// Size of one element in bytes.
    pub const fn size(self) -> u64 {
        match self {
            Self::Float32x2 => 8,
            Self::Float32x3 => 12,
            Self::Float32x4 => 16,
            Self::Uint16x4 => 8,
        }
    }

    /// Type the device program declares for this attribute.
    pub const fn wgsl_type(self) -> &'static str {
        match self {
            Self::Float32x2 => "vec2<f32>",
            Self::Float32x3 => "vec3<f32>",
            Self::Float32x4 => "vec4<f32>",
            Self::Uint16x4 => "vec4<u32>",
        }
    }
}

impl VertexAttribute {
    pub fn format(self) -> AttributeFormat {
        match self {
            Self::Texcoord => AttributeFormat::Float32x2,
            Self::Position | Self::Normal | Self::Tangent => AttributeFormat::Float32x3,
            Self::JointWeights | Self::Color => AttributeFormat::Float32x4,
            Self::JointIndices => AttributeFormat::Uint16x4,
        }
    }
}

slot_enum! {
    /// Texture bind points.
    pub enum TextureIndex: "TextureIndex", "TEXTURE_INDEX" {
        Color => "color",
        /// Luma plane of the captured camera frame.
        Y => "y",
        /// Chroma plane of the captured camera frame.
        CbCr => "cb_cr",
        Metallic => "metallic",
        Roughness => "roughness",
        Normal => "normal",
        AmbientOcclusion => "ambient_occlusion",
        EmissionMap => "emission_map",
        SubsurfaceMap => "subsurface_map",
        SpecularMap => "specular_map",
        SpecularTintMap => "specular_tint_map",
        AnisotropicMap => "anisotropic_map",
        SheenMap => "sheen_map",
        SheenTintMap => "sheen_tint_map",
        ClearcoatMap => "clearcoat_map",
        ClearcoatGlossMap => "clearcoat_gloss_map",
        EnvironmentMap => "environment_map",
    }
}

/// What a texture slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    /// Camera capture plane; sampled by the video background pass only.
    Capture,
    /// 2D material map sampled by the anchor program.
    Material,
    /// Cube map sampled along the reflected vector.
    EnvironmentCube,
}

impl TextureIndex {
    pub fn kind(self) -> TextureKind {
        match self {
            Self::Y | Self::CbCr => TextureKind::Capture,
            Self::EnvironmentMap => TextureKind::EnvironmentCube,
            _ => TextureKind::Material,
        }
    }

    /// Slots bound for an anchor draw, in index order.
    pub fn anchor_slots() -> impl Iterator<Item = TextureIndex> {
        <Self as super::Slot>::ALL
            .iter()
            .copied()
            .filter(|slot| slot.kind() != TextureKind::Capture)
    }
}

slot_enum! {
    /// Specialization constants selecting which material maps are sampled.
    pub enum FunctionConstant: "FunctionConstant", "FUNCTION_CONSTANT" {
        BaseColorMap => "base_color_map",
        NormalMap => "normal_map",
        MetallicMap => "metallic_map",
        RoughnessMap => "roughness_map",
        AmbientOcclusionMap => "ambient_occlusion_map",
        EmissionMap => "emission_map",
        SubsurfaceMap => "subsurface_map",
        SpecularMap => "specular_map",
        SpecularTintMap => "specular_tint_map",
        AnisotropicMap => "anisotropic_map",
        SheenMap => "sheen_map",
        SheenTintMap => "sheen_tint_map",
        ClearcoatMap => "clearcoat_map",
        ClearcoatGlossMap => "clearcoat_gloss_map",
    }
}

impl FunctionConstant {
    /// The texture slot whose sampling this constant enables.
    pub fn texture(self) -> TextureIndex {
        match self {
            Self::BaseColorMap => TextureIndex::Color,
            Self::NormalMap => TextureIndex::Normal,
            Self::MetallicMap => TextureIndex::Metallic,
            Self::RoughnessMap => TextureIndex::Roughness,
            Self::AmbientOcclusionMap => TextureIndex::AmbientOcclusion,
            Self::EmissionMap => TextureIndex::EmissionMap,
            Self::SubsurfaceMap => TextureIndex::SubsurfaceMap,
            Self::SpecularMap => TextureIndex::SpecularMap,
            Self::SpecularTintMap => TextureIndex::SpecularTintMap,
            Self::AnisotropicMap => TextureIndex::AnisotropicMap,
            Self::SheenMap => TextureIndex::SheenMap,
            Self::SheenTintMap => TextureIndex::SheenTintMap,
            Self::ClearcoatMap => TextureIndex::ClearcoatMap,
            Self::ClearcoatGlossMap => TextureIndex::ClearcoatGlossMap,
        }
    }
}

slot_enum! {
    /// Eyes of a stereo (AR/VR goggle) render.
    pub enum Viewport: "Viewport", "VIEWPORT" {
        Left => "left",
        Right => "right",
    }
}

slot_enum! {
    /// Level-of-detail tiers.
    pub enum QualityLevel: "QualityLevel", "QUALITY_LEVEL" {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

impl QualityLevel {
    /// Pipeline override id carrying the tier. It is not a [`FunctionConstant`]:
    /// it takes the first id after that namespace, so the two never collide.
    pub const OVERRIDE_ID: u32 = FunctionConstant::COUNT;

    /// Name of the tier override in generated WGSL.
    pub const OVERRIDE_NAME: &'static str = "SHADING_QUALITY";
}

impl Default for QualityLevel {
    fn default() -> Self {
        Self::High
    }
}

// Pin the size and tail of every namespace so that inserting an entry in the
// middle breaks the build instead of shifting compiled indices.
const_assert_eq!(BufferIndex::COUNT, 11);
const_assert_eq!(BufferIndex::EnvironmentUniforms.index(), 10);
const_assert_eq!(VertexAttribute::COUNT, 7);
const_assert_eq!(VertexAttribute::Color.index(), 6);
const_assert_eq!(TextureIndex::COUNT, 17);
const_assert_eq!(TextureIndex::EnvironmentMap.index(), 16);
const_assert_eq!(FunctionConstant::COUNT, 14);
const_assert_eq!(FunctionConstant::ClearcoatGlossMap.index(), 13);
const_assert_eq!(Viewport::COUNT, 2);
const_assert_eq!(QualityLevel::COUNT, 3);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Slot;

    #[test]
    fn test_buffer_indices_match_bind_points() {
        assert_eq!(BufferIndex::MeshPositions.index(), 0);
        assert_eq!(BufferIndex::AnchorInstanceUniforms.index(), 2);
        assert_eq!(BufferIndex::SharedUniforms.index(), 3);
        assert_eq!(BufferIndex::MaterialUniforms.index(), 4);
        assert_eq!(BufferIndex::AnchorEffectsUniforms.index(), 9);
        assert_eq!(BufferIndex::EnvironmentUniforms.index(), 10);
    }

    #[test]
    fn test_counts_match_entries() {
        assert_eq!(BufferIndex::ALL.len() as u32, BufferIndex::COUNT);
        assert_eq!(VertexAttribute::ALL.len() as u32, VertexAttribute::COUNT);
        assert_eq!(TextureIndex::ALL.len() as u32, TextureIndex::COUNT);
        assert_eq!(FunctionConstant::ALL.len() as u32, FunctionConstant::COUNT);
        assert_eq!(Viewport::ALL.len() as u32, Viewport::COUNT);
        assert_eq!(QualityLevel::ALL.len() as u32, QualityLevel::COUNT);
    }

    #[test]
    fn test_map_constants_gate_material_maps() {
        for constant in FunctionConstant::ALL {
            assert_eq!(constant.texture().kind(), TextureKind::Material);
        }
        let gated: std::collections::HashSet<_> =
            FunctionConstant::ALL.iter().map(|c| c.texture()).collect();
        assert_eq!(gated.len(), FunctionConstant::ALL.len());
    }

    #[test]
    fn test_function_constants_are_map_switches_only() {
        assert_eq!(FunctionConstant::COUNT, 14);
        assert_eq!(FunctionConstant::ClearcoatGlossMap.index(), FunctionConstant::COUNT - 1);
        assert_eq!(QualityLevel::OVERRIDE_ID, 14);
        assert!(FunctionConstant::from_index(QualityLevel::OVERRIDE_ID).is_none());
    }

    #[test]
    fn test_anchor_slots_skip_capture_planes() {
        let slots: Vec<_> = TextureIndex::anchor_slots().collect();
        assert_eq!(slots.len(), 15);
        assert!(!slots.contains(&TextureIndex::Y));
        assert!(!slots.contains(&TextureIndex::CbCr));
        assert_eq!(slots.last(), Some(&TextureIndex::EnvironmentMap));
    }

    #[test]
    fn test_vertex_formats() {
        assert_eq!(VertexAttribute::Position.format().size(), 12);
        assert_eq!(VertexAttribute::Texcoord.format().wgsl_type(), "vec2<f32>");
        assert_eq!(VertexAttribute::JointIndices.format().wgsl_type(), "vec4<u32>");
    }

    #[test]
    fn test_buffer_kinds() {
        assert_eq!(BufferIndex::MeshGenerics.kind(), BufferKind::VertexStream);
        assert_eq!(BufferIndex::SharedUniforms.kind(), BufferKind::Uniform);
        assert_eq!(BufferIndex::AnchorInstanceUniforms.kind(), BufferKind::StorageArray);

        let anchor: Vec<_> = BufferIndex::anchor_slots().collect();
        assert_eq!(anchor.len(), 8);
        assert!(!anchor.contains(&BufferIndex::MeshPositions));
        assert!(!anchor.contains(&BufferIndex::TrackingPointData));
    }
}
