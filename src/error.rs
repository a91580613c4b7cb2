//! Error types for the binding contract.
//!
//! Almost every failure here is a contract violation that should be caught
//! before a frame is ever drawn: slot collisions, layout drift between the
//! host and device definitions, or a shader that does not validate. The
//! lighting evaluator itself has no error path.

use thiserror::Error;

/// Errors reported while validating the slot registry, the uniform layouts,
/// the generated device program, or a lighting policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShadingError {
    /// Two entries of one namespace share an index.
    #[error("slot collision in {namespace}: `{first}` and `{second}` both use index {index}")]
    SlotCollision {
        namespace: &'static str,
        index: u32,
        first: &'static str,
        second: &'static str,
    },

    /// A namespace is not contiguous from zero, or its count sentinel is wrong.
    #[error("slot gap in {namespace}: expected index {expected}, found {found}")]
    SlotGap {
        namespace: &'static str,
        expected: u32,
        found: u32,
    },

    /// Host and device disagree on where a record field lives.
    #[error("layout mismatch in {record}.{field}: host offset {host}, device offset {device}")]
    LayoutMismatch {
        record: &'static str,
        field: String,
        host: u32,
        device: u32,
    },

    /// The device program does not declare a record or one of its fields.
    #[error("device program is missing {record}.{field}")]
    MissingDeviceField {
        record: &'static str,
        field: String,
    },

    /// The WGSL source could not be parsed.
    #[error("shader parse failed: {0}")]
    ShaderParse(String),

    /// The WGSL module parsed but failed validation.
    #[error("shader validation failed: {0}")]
    ShaderValidation(String),

    /// A lighting policy carries an unusable value.
    #[error("invalid lighting policy: {0}")]
    InvalidPolicy(String),
}

impl ShadingError {
    /// Whether this error describes a host/device disagreement on a record.
    pub fn is_layout_error(&self) -> bool {
        matches!(
            self,
            Self::LayoutMismatch { .. } | Self::MissingDeviceField { .. }
        )
    }

    /// Whether this error comes from the slot registry.
    pub fn is_slot_error(&self) -> bool {
        matches!(self, Self::SlotCollision { .. } | Self::SlotGap { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ShadingError>;
