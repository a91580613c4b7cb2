//! Slot registry
//!
//! Stable integer identities shared by the host and the device program:
//! buffer bind points, vertex attribute locations, texture bind points and
//! specialization constants, plus the stereo viewport and quality tier sets.
//!
//! Each namespace is a `#[repr(u32)]` enum declared once through
//! [`slot_enum!`]. The device-side identifiers are generated from these
//! enums by the [`shader`](crate::shader) module and never written by hand.

use crate::error::{Result, ShadingError};

/// A member of one slot namespace.
pub trait Slot: Copy + Eq + std::fmt::Debug + 'static {
    /// Human-readable namespace name, used in diagnostics.
    const NAMESPACE: &'static str;
    /// Prefix of the generated device-side constant names.
    const DEVICE_PREFIX: &'static str;
    /// Every entry, in declaration order.
    const ALL: &'static [Self];
    /// Sentinel: number of entries in the namespace.
    const COUNT: u32;

    /// Numeric identity of this slot.
    fn index(self) -> u32;

    /// Snake-case name of this slot.
    fn name(self) -> &'static str;

    /// Look a slot up by its numeric identity.
    fn from_index(index: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|slot| slot.index() == index)
    }

    /// Name of the constant emitted for this slot in generated WGSL.
    fn device_constant_name(self) -> String {
        format!("{}_{}", Self::DEVICE_PREFIX, self.name().to_uppercase())
    }
}

/// Declares one slot namespace.
///
/// Entries must only ever be appended at the end: already-compiled programs
/// reference the existing indices, including the tail.
macro_rules! slot_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident: $namespace:literal, $prefix:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Number of entries in this namespace.
            pub const COUNT: u32 = [$( Self::$variant ),+].len() as u32;

            /// Numeric identity, usable in const contexts.
            pub const fn index(self) -> u32 {
                self as u32
            }
        }

        impl $crate::registry::Slot for $name {
            const NAMESPACE: &'static str = $namespace;
            const DEVICE_PREFIX: &'static str = $prefix;
            const ALL: &'static [Self] = &[$( Self::$variant ),+];
            const COUNT: u32 = $name::COUNT;

            fn index(self) -> u32 {
                self as u32
            }

            fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }
        }
    };
}

mod indices;

pub use indices::*;

/// Check that a namespace is unique, zero-based and contiguous, and that its
/// count sentinel equals the number of named entries.
pub fn validate_namespace<S: Slot>() -> Result<()> {
    let mut seen: Vec<(u32, S)> = S::ALL.iter().map(|slot| (slot.index(), *slot)).collect();
    seen.sort_by_key(|(index, _)| *index);

    for pair in seen.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(ShadingError::SlotCollision {
                namespace: S::NAMESPACE,
                index: pair[0].0,
                first: pair[0].1.name(),
                second: pair[1].1.name(),
            });
        }
    }

    for (expected, (found, _)) in seen.iter().enumerate() {
        if *found != expected as u32 {
            return Err(ShadingError::SlotGap {
                namespace: S::NAMESPACE,
                expected: expected as u32,
                found: *found,
            });
        }
    }

    if S::COUNT as usize != seen.len() {
        return Err(ShadingError::SlotGap {
            namespace: S::NAMESPACE,
            expected: seen.len() as u32,
            found: S::COUNT,
        });
    }

    log::debug!("{}: {} slots validated", S::NAMESPACE, S::COUNT);
    Ok(())
}

/// Validate every namespace of the registry.
pub fn validate_registry() -> Result<()> {
    validate_namespace::<BufferIndex>()?;
    validate_namespace::<VertexAttribute>()?;
    validate_namespace::<TextureIndex>()?;
    validate_namespace::<FunctionConstant>()?;
    validate_namespace::<Viewport>()?;
    validate_namespace::<QualityLevel>()?;
    Ok(())
}
