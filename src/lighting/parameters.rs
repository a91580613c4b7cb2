//! Per-fragment lighting inputs

use glam::Vec3;

use super::brdf::schlick_weight;
use super::EnvironmentSampler;
use crate::uniforms::{EnvironmentUniform, MaterialUniform};

/// A light arriving from one direction, such as the sun.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PunctualLight {
    /// Unit vector from the surface toward the light.
    pub direction: Vec3,
    /// Linear RGB radiance.
    pub color: Vec3,
}

impl PunctualLight {
    pub fn new(direction: Vec3, color: Vec3) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            color,
        }
    }
}

/// Geometry of the surface point being shaded, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub position: Vec3,
    pub normal: Vec3,
    /// From the surface toward the eye.
    pub view_direction: Vec3,
    /// Orients the anisotropic highlight. An arbitrary frame is used without one.
    pub tangent: Option<Vec3>,
}

impl SurfaceSample {
    pub fn new(position: Vec3, normal: Vec3, view_direction: Vec3) -> Self {
        Self {
            position,
            normal,
            view_direction,
            tangent: None,
        }
    }

    /// A sample seen from `eye`.
    pub fn seen_from(position: Vec3, normal: Vec3, eye: Vec3) -> Self {
        Self::new(position, normal, eye - position)
    }

    pub fn with_tangent(mut self, tangent: Vec3) -> Self {
        self.tangent = Some(tangent);
        self
    }
}

fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    let n = v.normalize_or_zero();
    if n == Vec3::ZERO {
        fallback
    } else {
        n
    }
}

fn unit_cosine(a: Vec3, b: Vec3, epsilon: f32) -> f32 {
    let c = a.dot(b);
    if c.is_nan() {
        epsilon
    } else {
        c.clamp(epsilon, 1.0)
    }
}

/// Everything one light evaluation needs, derived from the bound records.
///
/// Vectors are unit length, cosines lie in [epsilon, 1] and Fresnel weights
/// in [0, 1]. Material channels are copied after clamping to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingParameters {
    pub light_direction: Vec3,
    pub light_color: Vec3,
    pub ambient_color: Vec3,
    pub view_direction: Vec3,
    pub half_vector: Vec3,
    pub reflected_vector: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,

    pub base_color: Vec3,
    pub base_alpha: f32,
    pub luminance: f32,
    /// Base color normalized by its luminance: hue and saturation only.
    pub tint: Vec3,
    pub diffuse_color: Vec3,
    /// Environment radiance along the reflected vector; zero without a map.
    pub reflected_color: Vec3,
    pub emission_color: Vec3,
    pub ambient_occlusion: f32,

    pub n_dot_h: f32,
    pub n_dot_v: f32,
    pub n_dot_l: f32,
    pub l_dot_h: f32,
    /// Whether the light is above the surface before clamping.
    pub light_visible: bool,

    pub fresnel_l: f32,
    pub fresnel_v: f32,
    pub fresnel_h: f32,

    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub subsurface: f32,
    pub specular: f32,
    pub specular_tint: f32,
    pub anisotropic: f32,
    pub sheen: f32,
    pub sheen_tint: f32,
    pub clearcoat: f32,
    pub clearcoat_gloss: f32,
}

impl LightingParameters {
    /// Build the aggregate for one light. Without a light the light direction
    /// is the normal and its color is black.
    pub fn new(
        material: &MaterialUniform,
        environment: &EnvironmentUniform,
        surface: &SurfaceSample,
        light: Option<&PunctualLight>,
        sampler: &dyn EnvironmentSampler,
        epsilon: f32,
    ) -> Self {
        let unlit = Self::for_surface(material, environment, surface, sampler, epsilon);
        match light {
            Some(light) => unlit.with_light(light, epsilon),
            None => unlit,
        }
    }

    /// The light-independent part: clamped channels, tangent frame, tint and
    /// the environment sample. Light terms are those of a black light along
    /// the normal.
    pub fn for_surface(
        material: &MaterialUniform,
        environment: &EnvironmentUniform,
        surface: &SurfaceSample,
        sampler: &dyn EnvironmentSampler,
        epsilon: f32,
    ) -> Self {
        let m = material.clamped();

        let normal = normalize_or(surface.normal, Vec3::Z);
        let view_direction = normalize_or(surface.view_direction, normal);
        let reflected_vector =
            normalize_or(2.0 * normal.dot(view_direction) * normal - view_direction, normal);

        let (tangent, bitangent) = tangent_frame(normal, surface.tangent);

        let base = Vec3::new(m.base_color[0], m.base_color[1], m.base_color[2]);
        let luminance = 0.3 * base.x + 0.6 * base.y + 0.1 * base.z;
        let tint = if luminance > 0.0 {
            base / luminance
        } else {
            Vec3::ONE
        };

        let reflected_color = if environment.has_environment_map() {
            sampler.sample(reflected_vector, m.roughness)
        } else {
            Vec3::ZERO
        };

        let n_dot_v = unit_cosine(normal, view_direction, epsilon);

        let unlit = Self {
            light_direction: normal,
            light_color: Vec3::ZERO,
            ambient_color: environment.ambient(),
            view_direction,
            half_vector: normal,
            reflected_vector,
            normal,
            tangent,
            bitangent,

            base_color: base,
            base_alpha: m.base_color[3],
            luminance,
            tint,
            diffuse_color: base * (1.0 - m.metalness),
            reflected_color,
            emission_color: m.emission(),
            ambient_occlusion: m.ambient_occlusion,

            n_dot_h: 1.0,
            n_dot_v,
            n_dot_l: 1.0,
            l_dot_h: 1.0,
            light_visible: false,

            fresnel_l: 0.0,
            fresnel_v: schlick_weight(n_dot_v),
            fresnel_h: 0.0,

            roughness: m.roughness,
            metalness: m.metalness,
            opacity: m.opacity,
            subsurface: m.subsurface,
            specular: m.specular,
            specular_tint: m.specular_tint,
            anisotropic: m.anisotropic,
            sheen: m.sheen,
            sheen_tint: m.sheen_tint,
            clearcoat: m.clearcoat,
            clearcoat_gloss: m.clearcoat_gloss,
        };
        unlit.lit_from(Vec3::ZERO, Vec3::ZERO, epsilon)
    }

    /// The same surface lit by `light`. Only the light direction, half vector
    /// and the terms that depend on them are recomputed.
    pub fn with_light(&self, light: &PunctualLight, epsilon: f32) -> Self {
        self.lit_from(light.direction, light.color, epsilon)
    }

    fn lit_from(&self, direction: Vec3, color: Vec3, epsilon: f32) -> Self {
        let direction = direction.normalize_or_zero();
        // A light without a direction shines on nothing.
        let has_direction = direction != Vec3::ZERO;
        let light_direction = if has_direction { direction } else { self.normal };

        let half_vector = normalize_or(light_direction + self.view_direction, self.normal);
        let n_dot_h = unit_cosine(self.normal, half_vector, epsilon);
        let n_dot_l = unit_cosine(self.normal, light_direction, epsilon);
        let l_dot_h = unit_cosine(light_direction, half_vector, epsilon);

        Self {
            light_direction,
            light_color: color,
            half_vector,
            n_dot_h,
            n_dot_l,
            l_dot_h,
            light_visible: has_direction && self.normal.dot(light_direction) > 0.0,
            fresnel_l: schlick_weight(n_dot_l),
            fresnel_h: schlick_weight(l_dot_h),
            ..*self
        }
    }

    /// Specular reflectance at normal incidence.
    pub fn specular_f0(&self) -> Vec3 {
        let dielectric = self.specular * 0.08 * Vec3::ONE.lerp(self.tint, self.specular_tint);
        dielectric.lerp(self.base_color, self.metalness)
    }

    /// Sheen color before the Fresnel weight.
    pub fn sheen_color(&self) -> Vec3 {
        Vec3::ONE.lerp(self.tint, self.sheen_tint)
    }
}

/// Orthonormal tangent and bitangent around `normal`.
fn tangent_frame(normal: Vec3, tangent: Option<Vec3>) -> (Vec3, Vec3) {
    let projected = tangent
        .map(|t| (t - normal * normal.dot(t)).normalize_or_zero())
        .filter(|t| *t != Vec3::ZERO);
    match projected {
        Some(t) => (t, normal.cross(t)),
        None => normal.any_orthonormal_pair(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::NoEnvironment;

    fn parameters(surface: SurfaceSample, light: PunctualLight) -> LightingParameters {
        LightingParameters::new(
            &MaterialUniform::default(),
            &EnvironmentUniform::default(),
            &surface,
            Some(&light),
            &NoEnvironment,
            1e-4,
        )
    }

    #[test]
    fn test_head_on_cosines() {
        let surface = SurfaceSample::new(Vec3::ZERO, Vec3::Z, Vec3::Z);
        let p = parameters(surface, PunctualLight::new(Vec3::Z, Vec3::ONE));

        assert_eq!(p.half_vector, Vec3::Z);
        assert_eq!((p.n_dot_h, p.n_dot_v, p.n_dot_l, p.l_dot_h), (1.0, 1.0, 1.0, 1.0));
        assert_eq!((p.fresnel_l, p.fresnel_v, p.fresnel_h), (0.0, 0.0, 0.0));
        assert!(p.light_visible);
    }

    #[test]
    fn test_light_opposite_view_falls_back_to_normal() {
        let surface = SurfaceSample::new(Vec3::ZERO, Vec3::Y, Vec3::X);
        let p = parameters(surface, PunctualLight::new(-Vec3::X, Vec3::ONE));
        assert_eq!(p.half_vector, Vec3::Y);
        assert!(p.half_vector.is_finite());
    }

    #[test]
    fn test_light_below_horizon_is_not_visible() {
        let surface = SurfaceSample::new(Vec3::ZERO, Vec3::Z, Vec3::Z);
        let p = parameters(surface, PunctualLight::new(-Vec3::Z, Vec3::ONE));
        assert!(!p.light_visible);
        assert_eq!(p.n_dot_l, 1e-4);
    }

    #[test]
    fn test_directionless_light_is_not_visible() {
        let surface = SurfaceSample::new(Vec3::ZERO, Vec3::Z, Vec3::Z);
        let p = parameters(surface, PunctualLight::new(Vec3::ZERO, Vec3::ONE));
        assert!(!p.light_visible);
        assert_eq!(p.light_direction, Vec3::Z);
    }

    #[test]
    fn test_with_light_matches_full_construction() {
        let material = MaterialUniform::car_paint(Vec3::new(0.3, 0.5, 0.7));
        let environment = EnvironmentUniform::default().with_environment_map(true);
        let surface = SurfaceSample::new(Vec3::ZERO, Vec3::new(0.2, 0.1, 1.0), Vec3::new(0.0, 0.5, 1.0))
            .with_tangent(Vec3::X);
        let light = PunctualLight::new(Vec3::new(0.4, -0.3, 1.0), Vec3::splat(2.0));
        let sky = Vec3::new(0.1, 0.2, 0.3);

        let full = LightingParameters::new(&material, &environment, &surface, Some(&light), &sky, 1e-4);
        let unlit = LightingParameters::for_surface(&material, &environment, &surface, &sky, 1e-4);
        assert_eq!(unlit.with_light(&light, 1e-4), full);
        assert!(!unlit.light_visible);
        assert_eq!(unlit.light_color, Vec3::ZERO);
    }

    #[test]
    fn test_tangent_is_orthogonalized() {
        let surface = SurfaceSample::new(Vec3::ZERO, Vec3::Z, Vec3::Z)
            .with_tangent(Vec3::new(1.0, 0.0, 1.0));
        let p = parameters(surface, PunctualLight::new(Vec3::Z, Vec3::ONE));

        assert!(p.tangent.abs_diff_eq(Vec3::X, 1e-6));
        assert!(p.bitangent.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_reflected_vector_mirrors_view() {
        let view = Vec3::new(1.0, 1.0, 0.0);
        let surface = SurfaceSample::new(Vec3::ZERO, Vec3::Y, view);
        let p = parameters(surface, PunctualLight::new(Vec3::Y, Vec3::ONE));
        assert!(p
            .reflected_vector
            .abs_diff_eq(Vec3::new(-1.0, 1.0, 0.0).normalize(), 1e-6));
    }

    #[test]
    fn test_seen_from_eye() {
        let surface = SurfaceSample::seen_from(Vec3::new(0.0, 0.0, 1.0), Vec3::Z, Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(surface.view_direction, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn test_black_base_color_has_neutral_tint() {
        let material = MaterialUniform::default().with_base_color(glam::Vec4::new(0.0, 0.0, 0.0, 1.0));
        let p = LightingParameters::new(
            &material,
            &EnvironmentUniform::default(),
            &SurfaceSample::new(Vec3::ZERO, Vec3::Z, Vec3::Z),
            None,
            &NoEnvironment,
            1e-4,
        );
        assert_eq!(p.tint, Vec3::ONE);
        assert_eq!(p.light_color, Vec3::ZERO);
        assert!(!p.light_visible);
    }
}
