//! Comparison of host record layouts with what naga computed.

use naga::{Module, TypeInner};

use crate::error::{Result, ShadingError};
use crate::uniforms::{
    CameraUniform, EnvironmentUniform, InstanceEffectsUniform, InstanceTransformUniform,
    MaterialUniform, UniformLayout,
};

/// Check one record against its struct in `module`.
///
/// Every host field must exist at the same offset, and the device struct span
/// must equal the host size so that arrays of the record share a stride.
pub fn verify_record<T: UniformLayout>(module: &Module) -> Result<()> {
    let (members, span) = module
        .types
        .iter()
        .find_map(|(_, ty)| match &ty.inner {
            TypeInner::Struct { members, span } if ty.name.as_deref() == Some(T::NAME) => {
                Some((members, *span))
            }
            _ => None,
        })
        .ok_or_else(|| ShadingError::MissingDeviceField {
            record: T::NAME,
            field: "<struct>".to_string(),
        })?;

    for field in T::fields() {
        let member = members
            .iter()
            .find(|m| m.name.as_deref() == Some(field.name))
            .ok_or_else(|| ShadingError::MissingDeviceField {
                record: T::NAME,
                field: field.name.to_string(),
            })?;

        if member.offset != field.offset {
            return Err(ShadingError::LayoutMismatch {
                record: T::NAME,
                field: field.name.to_string(),
                host: field.offset,
                device: member.offset,
            });
        }
    }

    let host_size = std::mem::size_of::<T>() as u32;
    if span != host_size {
        return Err(ShadingError::LayoutMismatch {
            record: T::NAME,
            field: "<size>".to_string(),
            host: host_size,
            device: span,
        });
    }

    log::debug!("{}: {} fields match the device layout", T::NAME, T::fields().len());
    Ok(())
}

/// Check every record crossing the host/device boundary.
pub fn verify_layouts(module: &Module) -> Result<()> {
    verify_record::<CameraUniform>(module)?;
    verify_record::<EnvironmentUniform>(module)?;
    verify_record::<InstanceTransformUniform>(module)?;
    verify_record::<InstanceEffectsUniform>(module)?;
    verify_record::<MaterialUniform>(module)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::validate_wgsl;

    #[test]
    fn test_reordered_field_is_reported() {
        let source = r#"
struct InstanceEffectsUniform {
    glow: f32,
    alpha: f32,
    tint: vec3<f32>,
    scale: f32,
}
@group(0) @binding(9) var<storage, read> effects: array<InstanceEffectsUniform>;
"#;
        let module = validate_wgsl(source).unwrap();
        let err = verify_record::<InstanceEffectsUniform>(&module).unwrap_err();
        assert_eq!(
            err,
            ShadingError::LayoutMismatch {
                record: "InstanceEffectsUniform",
                field: "alpha".to_string(),
                host: 0,
                device: 4,
            }
        );
    }

    #[test]
    fn test_missing_field_is_reported() {
        let source = r#"
struct CameraUniform {
    projection_matrix: mat4x4<f32>,
}
@group(0) @binding(3) var<uniform> camera: CameraUniform;
"#;
        let module = validate_wgsl(source).unwrap();
        let err = verify_record::<CameraUniform>(&module).unwrap_err();
        assert!(err.is_layout_error());
        assert_eq!(
            err,
            ShadingError::MissingDeviceField {
                record: "CameraUniform",
                field: "view_matrix".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_struct_is_reported() {
        let module = validate_wgsl("const X: u32 = 1u;").unwrap();
        assert!(matches!(
            verify_record::<MaterialUniform>(&module),
            Err(ShadingError::MissingDeviceField { record: "MaterialUniform", .. })
        ));
    }

    #[test]
    fn test_size_drift_is_reported() {
        // A trailing vec4 grows the device struct past the host size.
        let source = r#"
struct EnvironmentUniform {
    ambient_light_color: vec3<f32>,
    directional_light_direction: vec3<f32>,
    directional_light_color: vec3<f32>,
    has_environment_map: i32,
    extra: vec4<f32>,
}
@group(0) @binding(10) var<uniform> env: EnvironmentUniform;
"#;
        let module = validate_wgsl(source).unwrap();
        assert_eq!(
            verify_record::<EnvironmentUniform>(&module),
            Err(ShadingError::LayoutMismatch {
                record: "EnvironmentUniform",
                field: "<size>".to_string(),
                host: 48,
                device: 64,
            })
        );
    }
}
