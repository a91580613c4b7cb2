//! Tunable weights of the lobe combination

use std::f32::consts::PI;

use crate::error::{Result, ShadingError};
use crate::registry::QualityLevel;

/// How the BRDF lobes are weighted and which of them are evaluated.
///
/// The defaults follow Burley's 2012 Disney BRDF. `punctual_scale` of π makes
/// a white light shining head-on at a white Lambertian surface produce 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingPolicy {
    /// Floor of every cosine and denominator.
    pub epsilon: f32,
    /// Multiplier of each punctual light's contribution.
    pub punctual_scale: f32,
    pub subsurface_weight: f32,
    pub clearcoat_weight: f32,
    pub sheen_weight: f32,
    pub enable_anisotropy: bool,
    pub enable_clearcoat: bool,
    pub enable_sheen: bool,
    pub enable_subsurface: bool,
}

impl Default for LightingPolicy {
    fn default() -> Self {
        Self {
            epsilon: 1e-4,
            punctual_scale: PI,
            subsurface_weight: 1.25,
            clearcoat_weight: 0.25,
            sheen_weight: 1.0,
            enable_anisotropy: true,
            enable_clearcoat: true,
            enable_sheen: true,
            enable_subsurface: true,
        }
    }
}

impl LightingPolicy {
    /// Lobes enabled for a quality tier.
    pub fn for_quality(quality: QualityLevel) -> Self {
        let policy = Self::default();
        match quality {
            QualityLevel::High => policy,
            QualityLevel::Medium => policy.with_anisotropy(false).with_subsurface(false),
            QualityLevel::Low => policy
                .with_anisotropy(false)
                .with_subsurface(false)
                .with_clearcoat(false)
                .with_sheen(false),
        }
    }

    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_punctual_scale(mut self, scale: f32) -> Self {
        self.punctual_scale = scale;
        self
    }

    pub fn with_subsurface_weight(mut self, weight: f32) -> Self {
        self.subsurface_weight = weight;
        self
    }

    pub fn with_clearcoat_weight(mut self, weight: f32) -> Self {
        self.clearcoat_weight = weight;
        self
    }

    pub fn with_sheen_weight(mut self, weight: f32) -> Self {
        self.sheen_weight = weight;
        self
    }

    pub fn with_anisotropy(mut self, enabled: bool) -> Self {
        self.enable_anisotropy = enabled;
        self
    }

    pub fn with_clearcoat(mut self, enabled: bool) -> Self {
        self.enable_clearcoat = enabled;
        self
    }

    pub fn with_sheen(mut self, enabled: bool) -> Self {
        self.enable_sheen = enabled;
        self
    }

    pub fn with_subsurface(mut self, enabled: bool) -> Self {
        self.enable_subsurface = enabled;
        self
    }

    /// Reject non-finite or negative weights and an epsilon outside (0, 0.1].
    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon > 0.0 && self.epsilon <= 0.1) {
            log::warn!("rejected lighting policy epsilon {}", self.epsilon);
            return Err(ShadingError::InvalidPolicy(format!(
                "epsilon must lie in (0, 0.1], got {}",
                self.epsilon
            )));
        }

        let weights = [
            ("punctual_scale", self.punctual_scale),
            ("subsurface_weight", self.subsurface_weight),
            ("clearcoat_weight", self.clearcoat_weight),
            ("sheen_weight", self.sheen_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                log::warn!("rejected lighting policy {name} = {value}");
                return Err(ShadingError::InvalidPolicy(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}
