//! Uniform records shared by the host and the device program.
//!
//! Every record is `#[repr(C, align(16))]` with explicit padding so that the
//! Rust layout is byte-for-byte the WGSL layout of the same struct. The layout
//! is also reflected through [`UniformLayout::fields`], which the
//! [`shader`](crate::shader) module uses to emit the device-side declaration
//! and to compare it against what the shader compiler actually computed.
//!
//! Producers must write every field each time a record is bound; there are
//! no partial updates.

mod camera;
mod environment;
mod instance;
mod material;

pub use camera::*;
pub use environment::*;
pub use instance::*;
pub use material::*;

use crate::error::{Result, ShadingError};
use crate::registry::BufferIndex;
use bytemuck::Pod;

/// Device-side type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WgslType {
    F32,
    I32,
    U32,
    Vec3F32,
    Vec4F32,
    Mat3x3F32,
    Mat4x4F32,
}

impl WgslType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::Vec3F32 => "vec3<f32>",
            Self::Vec4F32 => "vec4<f32>",
            Self::Mat3x3F32 => "mat3x3<f32>",
            Self::Mat4x4F32 => "mat4x4<f32>",
        }
    }

    /// Size in bytes under WGSL layout rules.
    pub const fn size(self) -> u32 {
        match self {
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::Vec3F32 => 12,
            Self::Vec4F32 => 16,
            Self::Mat3x3F32 => 48,
            Self::Mat4x4F32 => 64,
        }
    }

    /// Alignment in bytes under WGSL layout rules.
    pub const fn align(self) -> u32 {
        match self {
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::Vec3F32 | Self::Vec4F32 | Self::Mat3x3F32 | Self::Mat4x4F32 => 16,
        }
    }
}

/// One named field of a record, as the host lays it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: &'static str,
    pub ty: WgslType,
    pub offset: u32,
}

impl FieldLayout {
    pub const fn new(name: &'static str, ty: WgslType, offset: usize) -> Self {
        Self {
            name,
            ty,
            offset: offset as u32,
        }
    }
}

/// A record that crosses the host/device boundary.
pub trait UniformLayout: Pod {
    /// Struct name in the device program.
    const NAME: &'static str;
    /// Buffer slot the record (or an array of it) is bound to.
    const SLOT: BufferIndex;

    /// Named fields in declaration order. Padding is not listed.
    fn fields() -> &'static [FieldLayout];

    /// Raw bytes to upload.
    fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// What the anchor program reads from one buffer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRecord {
    pub slot: BufferIndex,
    /// Element type in the device program.
    pub device_type: &'static str,
    /// Size of one element in bytes.
    pub element_size: u64,
    /// Bound as a runtime-sized array rather than a single value.
    pub is_array: bool,
}

impl BufferRecord {
    fn of<T: UniformLayout>(is_array: bool) -> Self {
        Self {
            slot: T::SLOT,
            device_type: T::NAME,
            element_size: std::mem::size_of::<T>() as u64,
            is_array,
        }
    }

    /// Device-side type of the whole binding.
    pub fn binding_type(&self) -> String {
        if self.is_array {
            format!("array<{}>", self.device_type)
        } else {
            self.device_type.to_string()
        }
    }
}

/// Records of every buffer slot the anchor program binds, in slot order.
pub fn anchor_buffers() -> Vec<BufferRecord> {
    let mut records: Vec<_> = BufferIndex::anchor_slots()
        .map(|slot| match slot {
            BufferIndex::AnchorInstanceUniforms => BufferRecord::of::<InstanceTransformUniform>(true),
            BufferIndex::SharedUniforms => BufferRecord::of::<CameraUniform>(false),
            BufferIndex::MaterialUniforms => BufferRecord::of::<MaterialUniform>(false),
            BufferIndex::AnchorEffectsUniforms => BufferRecord::of::<InstanceEffectsUniform>(true),
            BufferIndex::EnvironmentUniforms => BufferRecord::of::<EnvironmentUniform>(false),
            BufferIndex::MeshPalettes => BufferRecord {
                slot,
                device_type: WgslType::Mat4x4F32.name(),
                element_size: u64::from(WgslType::Mat4x4F32.size()),
                is_array: true,
            },
            _ => BufferRecord {
                slot,
                device_type: WgslType::U32.name(),
                element_size: u64::from(WgslType::U32.size()),
                is_array: false,
            },
        })
        .collect();
    records.sort_by_key(|record| record.slot);
    records
}

const fn round_up(align: u32, value: u32) -> u32 {
    value.div_ceil(align) * align
}

/// Byte size of a record under WGSL rules: the end of its last member rounded
/// up to its largest member alignment.
pub fn device_span(fields: &[FieldLayout]) -> u32 {
    let align = fields.iter().map(|f| f.ty.align()).max().unwrap_or(4);
    let end = fields.last().map(|f| f.offset + f.ty.size()).unwrap_or(0);
    round_up(align, end)
}

/// Check the host declaration of `T` against WGSL layout rules.
///
/// Each named field must sit exactly where WGSL would place it after the
/// previous one, and the Rust size and alignment must cover the WGSL span.
pub fn verify_host_layout<T: UniformLayout>() -> Result<()> {
    let mut cursor = 0;
    for field in T::fields() {
        let expected = round_up(field.ty.align(), cursor);
        if field.offset != expected {
            return Err(ShadingError::LayoutMismatch {
                record: T::NAME,
                field: field.name.to_string(),
                host: field.offset,
                device: expected,
            });
        }
        cursor = expected + field.ty.size();
    }

    let span = device_span(T::fields());
    let host_size = std::mem::size_of::<T>() as u32;
    if host_size != span {
        return Err(ShadingError::LayoutMismatch {
            record: T::NAME,
            field: "<size>".to_string(),
            host: host_size,
            device: span,
        });
    }

    let required_align = T::fields().iter().map(|f| f.ty.align()).max().unwrap_or(4);
    let host_align = std::mem::align_of::<T>() as u32;
    if host_align < required_align {
        return Err(ShadingError::LayoutMismatch {
            record: T::NAME,
            field: "<align>".to_string(),
            host: host_align,
            device: required_align,
        });
    }

    Ok(())
}

/// [`verify_host_layout`] for every record.
pub fn verify_host_layouts() -> Result<()> {
    verify_host_layout::<CameraUniform>()?;
    verify_host_layout::<EnvironmentUniform>()?;
    verify_host_layout::<InstanceTransformUniform>()?;
    verify_host_layout::<InstanceEffectsUniform>()?;
    verify_host_layout::<MaterialUniform>()?;
    Ok(())
}

/// Pack a 3x3 matrix as three 16-byte columns, the way `mat3x3<f32>` is stored.
pub(crate) fn mat3_columns(m: glam::Mat3) -> [[f32; 4]; 3] {
    [
        m.x_axis.extend(0.0).to_array(),
        m.y_axis.extend(0.0).to_array(),
        m.z_axis.extend(0.0).to_array(),
    ]
}

pub(crate) fn mat3_from_columns(columns: &[[f32; 4]; 3]) -> glam::Mat3 {
    glam::Mat3::from_cols(
        glam::Vec4::from_array(columns[0]).truncate(),
        glam::Vec4::from_array(columns[1]).truncate(),
        glam::Vec4::from_array(columns[2]).truncate(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_records_match_wgsl_rules() {
        assert_eq!(verify_host_layouts(), Ok(()));
    }

    #[test]
    fn test_anchor_buffers_agree_with_slot_kinds() {
        use crate::registry::BufferKind;

        let records = anchor_buffers();
        assert_eq!(records.len(), 8);
        for record in &records {
            let expected = record.slot.kind() == BufferKind::StorageArray;
            assert_eq!(record.is_array, expected, "{:?}", record.slot);
        }

        let material = records
            .iter()
            .find(|r| r.slot == BufferIndex::MaterialUniforms)
            .unwrap();
        assert_eq!(material.binding_type(), "MaterialUniform");
        assert_eq!(material.element_size, 80);

        let palettes = records.iter().find(|r| r.slot == BufferIndex::MeshPalettes).unwrap();
        assert_eq!(palettes.binding_type(), "array<mat4x4<f32>>");
    }

    #[test]
    fn test_device_span_rounds_to_alignment() {
        let fields = [
            FieldLayout::new("a", WgslType::Vec4F32, 0),
            FieldLayout::new("b", WgslType::F32, 16),
        ];
        assert_eq!(device_span(&fields), 32);
    }

    #[test]
    fn test_vec3_followed_by_scalar_packs() {
        // A scalar after a vec3 fills the vec3's trailing four bytes.
        let env = EnvironmentUniform::fields();
        let color = env.iter().find(|f| f.name == "directional_light_color").unwrap();
        let flag = env.iter().find(|f| f.name == "has_environment_map").unwrap();
        assert_eq!(flag.offset, color.offset + 12);
    }

    #[test]
    fn test_mat3_columns_round_trip() {
        let m = glam::Mat3::from_cols_array(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let packed = mat3_columns(m);
        assert_eq!(packed[1], [4.0, 5.0, 6.0, 0.0]);
        assert_eq!(mat3_from_columns(&packed), m);
    }
}
