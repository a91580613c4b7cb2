//! Device program generation and validation.
//!
//! The anchor program is assembled from three parts:
//! - a prelude generated from the registry and the record definitions
//!   (see [`prelude`]),
//! - the lighting library in `shaders/lighting.wgsl`,
//! - the entry points in `shaders/anchor.wgsl`.
//!
//! Because the prelude is generated, the device program never restates a slot
//! number or a struct field. [`ShaderBuilder::verify`] closes the loop: it
//! lets naga lay the structs out and compares the result with the host
//! offsets.
//!
//! # Example
//!
//! ```ignore
//! use anchor_shading::shader::ShaderBuilder;
//! use anchor_shading::registry::QualityLevel;
//!
//! let builder = ShaderBuilder::new().with_quality(QualityLevel::Medium);
//! builder.verify()?;
//! let source = builder.build()?;
//! ```

pub mod library;
pub mod prelude;
mod reflect;

pub use library::{ANCHOR_MODULE, FRAGMENT_ENTRY, LIGHTING_MODULE, VERTEX_ENTRY};
pub use reflect::{verify_layouts, verify_record};

use crate::error::{Result, ShadingError};
use crate::lighting::LightingPolicy;
use crate::registry::QualityLevel;
use crate::uniforms::MaterialFeatures;

/// Parse and validate WGSL source with naga.
pub fn validate_wgsl(source: &str) -> Result<naga::Module> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| ShadingError::ShaderParse(e.emit_to_string(source)))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| ShadingError::ShaderValidation(e.emit_to_string(source)))?;

    Ok(module)
}

/// Options of the generated anchor program.
///
/// `features` and `quality` only set the defaults of the override constants;
/// a pipeline may still override them with
/// [`MaterialFeatures::specialization_constants`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShaderBuilder {
    quality: QualityLevel,
    features: MaterialFeatures,
    policy: LightingPolicy,
    specialized: bool,
}

impl ShaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quality(mut self, quality: QualityLevel) -> Self {
        self.quality = quality;
        self
    }

    pub fn with_features(mut self, features: MaterialFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn with_policy(mut self, policy: LightingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Bake the feature set and tier into constants instead of declaring
    /// pipeline overrides. The program then serves only that one variant.
    pub fn with_specialized(mut self, specialized: bool) -> Self {
        self.specialized = specialized;
        self
    }

    pub fn quality(&self) -> QualityLevel {
        self.quality
    }

    pub fn features(&self) -> MaterialFeatures {
        self.features
    }

    pub fn policy(&self) -> &LightingPolicy {
        &self.policy
    }

    /// Generated declarations only.
    pub fn prelude(&self) -> String {
        prelude::generate_prelude(self.features, self.quality, &self.policy, self.specialized)
    }

    /// Complete WGSL source of the anchor program.
    pub fn build(&self) -> Result<String> {
        let mut source = self.build_library()?;
        source.push('\n');
        source.push_str(ANCHOR_MODULE);

        log::debug!(
            "generated anchor program: {} bytes, quality {:?}, features {:?}",
            source.len(),
            self.quality,
            self.features
        );
        Ok(source)
    }

    /// Prelude and lighting library without the anchor entry points, for
    /// programs that bring their own, such as a compute pass calling
    /// `evaluate_lighting`.
    pub fn build_library(&self) -> Result<String> {
        self.policy.validate()?;

        let prelude = self.prelude();
        let mut source =
            String::with_capacity(prelude.len() + LIGHTING_MODULE.len() + ANCHOR_MODULE.len() + 2);
        source.push_str(&prelude);
        source.push('\n');
        source.push_str(LIGHTING_MODULE);
        Ok(source)
    }

    /// Build and validate, returning the naga module.
    pub fn module(&self) -> Result<naga::Module> {
        let source = self.build()?;
        validate_wgsl(&source)
    }

    /// Build, validate and compare every record layout with the device one.
    pub fn verify(&self) -> Result<()> {
        let module = self.module()?;
        verify_layouts(&module)?;
        log::debug!("anchor program layouts verified");
        Ok(())
    }
}
