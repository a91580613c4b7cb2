//! Microfacet building blocks of the Disney BRDF (Burley 2012)

use std::f32::consts::PI;

/// Schlick Fresnel weight `(1 - cos)^5`, with the cosine clamped to [0, 1].
#[inline]
pub fn schlick_weight(cos_theta: f32) -> f32 {
    let m = (1.0 - cos_theta).clamp(0.0, 1.0);
    m.powi(5)
}

/// Generalized Trowbridge-Reitz distribution with exponent 1, used by the
/// clearcoat lobe.
#[inline]
pub fn gtr1(n_dot_h: f32, alpha: f32) -> f32 {
    if alpha >= 1.0 {
        return 1.0 / PI;
    }
    let a2 = alpha * alpha;
    let t = 1.0 + (a2 - 1.0) * n_dot_h * n_dot_h;
    (a2 - 1.0) / (PI * a2.ln() * t)
}

/// Anisotropic GTR2 (GGX) distribution.
///
/// `h_dot_x` and `h_dot_y` are the half vector projected on the tangent and
/// bitangent.
#[inline]
pub fn gtr2_aniso(n_dot_h: f32, h_dot_x: f32, h_dot_y: f32, ax: f32, ay: f32) -> f32 {
    let x = h_dot_x / ax;
    let y = h_dot_y / ay;
    let k = x * x + y * y + n_dot_h * n_dot_h;
    1.0 / (PI * ax * ay * k * k).max(f32::MIN_POSITIVE)
}

/// Separable Smith shadowing term for GGX.
#[inline]
pub fn smith_ggx(n_dot_v: f32, alpha: f32) -> f32 {
    let a = alpha * alpha;
    let b = n_dot_v * n_dot_v;
    1.0 / (n_dot_v + (a + b - a * b).max(0.0).sqrt())
}

/// Anisotropic Smith shadowing term for GGX.
#[inline]
pub fn smith_ggx_aniso(n_dot_v: f32, v_dot_x: f32, v_dot_y: f32, ax: f32, ay: f32) -> f32 {
    let x = v_dot_x * ax;
    let y = v_dot_y * ay;
    1.0 / (n_dot_v + (x * x + y * y + n_dot_v * n_dot_v).sqrt())
}

/// Roughness of the specular lobe along the tangent and bitangent.
#[inline]
pub fn anisotropic_alpha(roughness: f32, anisotropic: f32) -> (f32, f32) {
    let aspect = (1.0 - 0.9 * anisotropic).max(0.0).sqrt();
    let r2 = roughness * roughness;
    ((r2 / aspect).max(0.001), (r2 * aspect).max(0.001))
}
