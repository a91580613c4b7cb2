//! Anchor Shading - host/device binding contract for anchored AR content
//!
//! The host renderer and the GPU program that draws anchored 3D content are
//! compiled independently but must agree bit-for-bit on slot numbers and
//! record layouts. This crate is the single definition both sides use:
//!
//! - [`registry`]: slot namespaces for buffers, vertex attributes, textures,
//!   specialization constants, viewports and quality tiers
//! - [`uniforms`]: `#[repr(C)]` records (camera, environment, instance
//!   transform and effects, material) matching WGSL layout
//! - [`lighting`]: Disney-style BRDF evaluation on the host
//! - [`shader`]: WGSL generated from the two above, validated and
//!   layout-checked with naga
//! - [`binding`]: wgpu bind group and vertex layouts built from the registry
//!
//! # Example
//!
//! ```ignore
//! use anchor_shading::prelude::*;
//!
//! let material = MaterialUniform::car_paint(Vec3::new(0.8, 0.1, 0.1));
//! let environment = EnvironmentUniform::default();
//! let lights = [environment.directional_light()];
//! let surface = SurfaceSample::new(Vec3::ZERO, Vec3::Y, Vec3::new(0.0, 1.0, 1.0));
//!
//! let inputs = ShadingInputs::new(material, environment, surface).with_lights(&lights);
//! let color = LightingEvaluator::default().evaluate(&inputs);
//! ```

pub mod binding;
pub mod error;
pub mod lighting;
pub mod registry;
pub mod shader;
pub mod uniforms;

pub use error::{Result, ShadingError};

/// Commonly used types.
pub mod prelude {
    pub use crate::error::{Result, ShadingError};
    pub use crate::lighting::{
        EnvironmentSampler, LightingEvaluator, LightingPolicy, LobeContributions, NoEnvironment,
        PunctualLight, ShadingInputs, SurfaceSample,
    };
    pub use crate::registry::{
        BufferIndex, FunctionConstant, QualityLevel, Slot, TextureIndex, VertexAttribute, Viewport,
    };
    pub use crate::shader::ShaderBuilder;
    pub use crate::uniforms::{
        CameraUniform, EnvironmentUniform, InstanceBuffer, InstanceEffectsUniform,
        InstanceTransformUniform, MaterialFeatures, MaterialUniform, StereoCameras, UniformLayout,
    };
    pub use glam::{Mat4, Vec3, Vec4};
}

/// Check the registry and every record layout, host side and device side.
///
/// Meant to run once at startup or in CI; any error is a build defect.
pub fn verify_contract() -> Result<()> {
    registry::validate_registry()?;
    uniforms::verify_host_layouts()?;
    shader::ShaderBuilder::new().verify()?;
    log::info!("binding contract verified");
    Ok(())
}
