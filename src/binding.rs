//! wgpu layout descriptors derived from the slot registry.
//!
//! The anchor program uses two bind groups: one for buffers, where the binding
//! number is the [`BufferIndex`], and one for textures, where it is the
//! [`TextureIndex`]. The single filtering sampler sits after the last texture
//! slot.

use std::num::NonZeroU64;

use crate::registry::{AttributeFormat, BufferIndex, TextureIndex, TextureKind, VertexAttribute};
use crate::uniforms::anchor_buffers;

/// Bind group holding every buffer slot.
pub const BUFFER_GROUP: u32 = 0;

/// Bind group holding every texture slot and the sampler.
pub const TEXTURE_GROUP: u32 = 1;

/// Binding of the shared sampler within [`TEXTURE_GROUP`].
pub const SAMPLER_BINDING: u32 = TextureIndex::COUNT;

impl From<AttributeFormat> for wgpu::VertexFormat {
    fn from(format: AttributeFormat) -> Self {
        match format {
            AttributeFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
            AttributeFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
            AttributeFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
            AttributeFormat::Uint16x4 => wgpu::VertexFormat::Uint16x4,
        }
    }
}

/// Shader stages that read a buffer slot.
pub fn buffer_visibility(slot: BufferIndex) -> wgpu::ShaderStages {
    match slot {
        BufferIndex::SharedUniforms => wgpu::ShaderStages::VERTEX_FRAGMENT,
        BufferIndex::AnchorInstanceUniforms
        | BufferIndex::MeshPalettes
        | BufferIndex::MeshPaletteIndex
        | BufferIndex::MeshPaletteSize
        | BufferIndex::MeshPositions
        | BufferIndex::MeshGenerics
        | BufferIndex::TrackingPointData => wgpu::ShaderStages::VERTEX,
        BufferIndex::MaterialUniforms
        | BufferIndex::AnchorEffectsUniforms
        | BufferIndex::EnvironmentUniforms => wgpu::ShaderStages::FRAGMENT,
    }
}

/// Layout entries of [`BUFFER_GROUP`].
pub fn buffer_layout_entries() -> Vec<wgpu::BindGroupLayoutEntry> {
    anchor_buffers()
        .into_iter()
        .map(|record| {
            let ty = if record.is_array {
                wgpu::BufferBindingType::Storage { read_only: true }
            } else {
                wgpu::BufferBindingType::Uniform
            };

            wgpu::BindGroupLayoutEntry {
                binding: record.slot.index(),
                visibility: buffer_visibility(record.slot),
                ty: wgpu::BindingType::Buffer {
                    ty,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(record.element_size),
                },
                count: None,
            }
        })
        .collect()
}

/// Layout entries of [`TEXTURE_GROUP`]: every anchor texture slot, then the
/// sampler.
pub fn texture_layout_entries() -> Vec<wgpu::BindGroupLayoutEntry> {
    let mut entries: Vec<_> = TextureIndex::anchor_slots()
        .map(|slot| {
            let view_dimension = match slot.kind() {
                TextureKind::EnvironmentCube => wgpu::TextureViewDimension::Cube,
                _ => wgpu::TextureViewDimension::D2,
            };

            wgpu::BindGroupLayoutEntry {
                binding: slot.index(),
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension,
                    multisampled: false,
                },
                count: None,
            }
        })
        .collect();

    entries.push(wgpu::BindGroupLayoutEntry {
        binding: SAMPLER_BINDING,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    });
    entries
}

/// Create both bind group layouts of the anchor program, in group order.
pub fn create_bind_group_layouts(device: &wgpu::Device) -> [wgpu::BindGroupLayout; 2] {
    let buffers = buffer_layout_entries();
    let textures = texture_layout_entries();

    [
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Anchor Buffers"),
            entries: &buffers,
        }),
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Anchor Textures"),
            entries: &textures,
        }),
    ]
}

/// Attributes interleaved in one vertex buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexStreamLayout {
    pub attributes: Vec<wgpu::VertexAttribute>,
    pub array_stride: wgpu::BufferAddress,
}

impl VertexStreamLayout {
    pub fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// Pack `stream` tightly in the given order.
///
/// Each attribute's shader location is its [`VertexAttribute`] slot, whatever
/// stream it is assigned to.
pub fn vertex_attributes(stream: &[VertexAttribute]) -> VertexStreamLayout {
    let mut offset = 0;
    let attributes = stream
        .iter()
        .map(|attribute| {
            let format = attribute.format();
            let entry = wgpu::VertexAttribute {
                format: format.into(),
                offset,
                shader_location: attribute.index(),
            };
            offset += format.size();
            entry
        })
        .collect();

    VertexStreamLayout {
        attributes,
        array_stride: offset,
    }
}

/// Attributes carried by a vertex stream slot in the standard mesh layout:
/// positions alone, everything else interleaved in the generics stream.
pub fn default_stream(slot: BufferIndex) -> &'static [VertexAttribute] {
    match slot {
        BufferIndex::MeshPositions => &[VertexAttribute::Position],
        BufferIndex::MeshGenerics => &[
            VertexAttribute::Texcoord,
            VertexAttribute::Normal,
            VertexAttribute::Tangent,
            VertexAttribute::JointIndices,
            VertexAttribute::JointWeights,
            VertexAttribute::Color,
        ],
        _ => &[],
    }
}
