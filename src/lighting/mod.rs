//! Physically-based lighting
//!
//! A host-side reference of the lighting the anchor fragment program runs: a
//! Disney-style BRDF with metallic/roughness base and subsurface, anisotropic,
//! sheen and clearcoat extensions. It is used to test the shading model and
//! to shade on the CPU where a device program is not available. The WGSL
//! library emitted by [`shader`](crate::shader) implements the same steps.

pub mod brdf;
mod evaluator;
mod parameters;
mod policy;

pub use evaluator::{EnvironmentSampler, LightingEvaluator, LobeContributions, NoEnvironment, ShadingInputs};
pub use parameters::{LightingParameters, PunctualLight, SurfaceSample};
pub use policy::LightingPolicy;
