//! WGSL sources shipped with the crate.
//!
//! The files live in `shaders/` and are appended after the generated prelude:
//! - `lighting.wgsl` - Disney BRDF lighting library
//! - `anchor.wgsl` - `vs_anchor` / `fs_anchor` entry points

/// Lighting library: parameter derivation, BRDF lobes and `evaluate_lighting`.
pub const LIGHTING_MODULE: &str = include_str!("../../shaders/lighting.wgsl");

/// Vertex and fragment entry points of the anchor program.
pub const ANCHOR_MODULE: &str = include_str!("../../shaders/anchor.wgsl");

/// Vertex entry point name.
pub const VERTEX_ENTRY: &str = "vs_anchor";

/// Fragment entry point name.
pub const FRAGMENT_ENTRY: &str = "fs_anchor";
