//! Host-side reference of the fragment lighting

use std::f32::consts::FRAC_1_PI;

use glam::{Vec3, Vec4};

use super::brdf::{anisotropic_alpha, gtr1, gtr2_aniso, smith_ggx, smith_ggx_aniso};
use super::{LightingParameters, LightingPolicy, PunctualLight, SurfaceSample};
use crate::uniforms::{EnvironmentUniform, InstanceEffectsUniform, MaterialUniform};

/// Source of environment radiance along a direction.
pub trait EnvironmentSampler {
    /// Radiance arriving from `direction`, pre-blurred for `roughness`.
    fn sample(&self, direction: Vec3, roughness: f32) -> Vec3;
}

/// The same color in every direction.
impl EnvironmentSampler for Vec3 {
    fn sample(&self, _direction: Vec3, _roughness: f32) -> Vec3 {
        *self
    }
}

/// An environment that is black in every direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnvironment;

impl EnvironmentSampler for NoEnvironment {
    fn sample(&self, _direction: Vec3, _roughness: f32) -> Vec3 {
        Vec3::ZERO
    }
}

/// Everything bound for one fragment.
#[derive(Clone, Copy)]
pub struct ShadingInputs<'a> {
    pub material: MaterialUniform,
    pub environment: EnvironmentUniform,
    pub effects: InstanceEffectsUniform,
    pub surface: SurfaceSample,
    pub lights: &'a [PunctualLight],
    pub environment_sampler: &'a dyn EnvironmentSampler,
}

impl<'a> ShadingInputs<'a> {
    /// Inputs with no lights, neutral effects and a black environment.
    pub fn new(material: MaterialUniform, environment: EnvironmentUniform, surface: SurfaceSample) -> Self {
        Self {
            material,
            environment,
            effects: InstanceEffectsUniform::default(),
            surface,
            lights: &[],
            environment_sampler: &NoEnvironment,
        }
    }

    pub fn with_lights(mut self, lights: &'a [PunctualLight]) -> Self {
        self.lights = lights;
        self
    }

    pub fn with_effects(mut self, effects: InstanceEffectsUniform) -> Self {
        self.effects = effects;
        self
    }

    pub fn with_environment_sampler(mut self, sampler: &'a dyn EnvironmentSampler) -> Self {
        self.environment_sampler = sampler;
        self
    }
}

/// Radiance of each term before the instance effects are applied.
///
/// The direct lobes are summed over every light and already scaled by the
/// light color, N·L and the punctual scale.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LobeContributions {
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub clearcoat: Vec3,
    pub sheen: Vec3,
    pub ambient: Vec3,
    pub reflection: Vec3,
    pub emission: Vec3,
}

impl LobeContributions {
    pub fn direct(&self) -> Vec3 {
        self.diffuse + self.specular + self.clearcoat + self.sheen
    }

    pub fn total(&self) -> Vec3 {
        self.direct() + self.ambient + self.reflection + self.emission
    }
}

/// BRDF value of each direct lobe for one light, before light color and N·L.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct DirectLobes {
    diffuse: Vec3,
    specular: Vec3,
    clearcoat: Vec3,
    sheen: Vec3,
}

/// Disney-style lighting evaluation.
///
/// Pure: the same inputs always produce bit-identical output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LightingEvaluator {
    policy: LightingPolicy,
}

impl LightingEvaluator {
    pub fn new(policy: LightingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LightingPolicy {
        &self.policy
    }

    /// Final linear RGBA of one fragment.
    ///
    /// Not premultiplied: opacity and the effects alpha only reach the alpha
    /// channel, RGB is scaled by the effects scale alone.
    pub fn evaluate(&self, inputs: &ShadingInputs<'_>) -> Vec4 {
        let lobes = self.evaluate_lobes(inputs);
        let effects = &inputs.effects;
        let material = inputs.material.clamped();

        let rgb = lobes.total();
        let rgb = (rgb * effects.tint() + rgb * effects.glow) * effects.scale;
        let alpha = material.base_color[3] * material.opacity * effects.alpha;

        rgb.extend(alpha)
    }

    /// Per-term breakdown of the radiance, before instance effects.
    ///
    /// The surface terms and the environment sample are computed once; each
    /// light only adds its direction-dependent terms.
    pub fn evaluate_lobes(&self, inputs: &ShadingInputs<'_>) -> LobeContributions {
        let epsilon = self.policy.epsilon;
        let surface = LightingParameters::for_surface(
            &inputs.material,
            &inputs.environment,
            &inputs.surface,
            inputs.environment_sampler,
            epsilon,
        );

        let mut out = LobeContributions {
            ambient: surface.ambient_color * surface.diffuse_color * surface.ambient_occlusion,
            reflection: self.reflection(&surface),
            emission: surface.emission_color,
            ..Default::default()
        };

        for light in inputs.lights {
            let p = surface.with_light(light, epsilon);
            if !p.light_visible {
                continue;
            }

            let lobes = self.direct_lobes(&p);
            let irradiance = p.light_color * p.n_dot_l * self.policy.punctual_scale;
            out.diffuse += lobes.diffuse * irradiance;
            out.specular += lobes.specular * irradiance;
            out.clearcoat += lobes.clearcoat * irradiance;
            out.sheen += lobes.sheen * irradiance;
        }

        out
    }

    /// Diffuse color the evaluator derives from a material.
    pub fn diffuse_color(&self, material: &MaterialUniform) -> Vec3 {
        let m = material.clamped();
        Vec3::new(m.base_color[0], m.base_color[1], m.base_color[2]) * (1.0 - m.metalness)
    }

    fn direct_lobes(&self, p: &LightingParameters) -> DirectLobes {
        let policy = &self.policy;
        let epsilon = policy.epsilon;

        // Diffuse with retro-reflection at grazing angles.
        let fd90 = 0.5 + 2.0 * p.l_dot_h * p.l_dot_h * p.roughness;
        let fd = (1.0 + (fd90 - 1.0) * p.fresnel_l) * (1.0 + (fd90 - 1.0) * p.fresnel_v);

        // Hanrahan-Krueger approximation of subsurface scattering.
        let subsurface = if policy.enable_subsurface {
            p.subsurface
        } else {
            0.0
        };
        let fss90 = p.l_dot_h * p.l_dot_h * p.roughness;
        let fss = (1.0 + (fss90 - 1.0) * p.fresnel_l) * (1.0 + (fss90 - 1.0) * p.fresnel_v);
        let ss = policy.subsurface_weight
            * (fss * (1.0 / (p.n_dot_l + p.n_dot_v).max(epsilon) - 0.5) + 0.5);

        let diffuse = FRAC_1_PI * (fd + (ss - fd) * subsurface) * p.diffuse_color;

        // Specular
        let anisotropic = if policy.enable_anisotropy {
            p.anisotropic
        } else {
            0.0
        };
        let (ax, ay) = anisotropic_alpha(p.roughness, anisotropic);
        let ds = gtr2_aniso(
            p.n_dot_h,
            p.half_vector.dot(p.tangent),
            p.half_vector.dot(p.bitangent),
            ax,
            ay,
        );
        let fs = p.specular_f0().lerp(Vec3::ONE, p.fresnel_h);
        let gs = smith_ggx_aniso(
            p.n_dot_l,
            p.light_direction.dot(p.tangent),
            p.light_direction.dot(p.bitangent),
            ax,
            ay,
        ) * smith_ggx_aniso(
            p.n_dot_v,
            p.view_direction.dot(p.tangent),
            p.view_direction.dot(p.bitangent),
            ax,
            ay,
        );
        let specular = gs * ds * fs;

        let sheen = if policy.enable_sheen {
            policy.sheen_weight * p.fresnel_h * p.sheen * p.sheen_color() * (1.0 - p.metalness)
        } else {
            Vec3::ZERO
        };

        let clearcoat = if policy.enable_clearcoat && p.clearcoat > 0.0 {
            let dr = gtr1(p.n_dot_h, 0.1 + (0.001 - 0.1) * p.clearcoat_gloss);
            let fr = 0.04 + (1.0 - 0.04) * p.fresnel_h;
            let gr = smith_ggx(p.n_dot_l, 0.25) * smith_ggx(p.n_dot_v, 0.25);
            Vec3::splat(policy.clearcoat_weight * p.clearcoat * dr * fr * gr)
        } else {
            Vec3::ZERO
        };

        DirectLobes {
            diffuse,
            specular,
            clearcoat,
            sheen,
        }
    }

    /// Mirror reflection of the environment, faded out as roughness grows.
    fn reflection(&self, p: &LightingParameters) -> Vec3 {
        let gloss = 1.0 - p.roughness;
        let fresnel = p.specular_f0().lerp(Vec3::ONE, p.fresnel_v * gloss);
        p.reflected_color * fresnel * gloss * gloss
    }
}
