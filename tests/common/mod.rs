//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use anchor_shading::prelude::*;

/// Route `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A surface at the origin facing +Z, viewed head-on.
pub fn head_on_surface() -> SurfaceSample {
    SurfaceSample::new(Vec3::ZERO, Vec3::Z, Vec3::Z)
}

/// No ambient light, no environment map.
pub fn dark_environment() -> EnvironmentUniform {
    EnvironmentUniform::new(Vec3::ZERO, Vec3::Z, Vec3::ONE)
}

/// A single white light along the surface normal.
pub fn head_on_light() -> [PunctualLight; 1] {
    [PunctualLight::new(Vec3::Z, Vec3::ONE)]
}

/// Red base color, roughness 1, every other channel zero.
pub fn red_rough_material() -> MaterialUniform {
    MaterialUniform::from_base_color(Vec4::new(1.0, 0.0, 0.0, 1.0)).with_roughness(1.0)
}

/// Unit vector from spherical angles around +Z.
pub fn direction(polar: f32, azimuth: f32) -> Vec3 {
    Vec3::new(
        polar.sin() * azimuth.cos(),
        polar.sin() * azimuth.sin(),
        polar.cos(),
    )
}
