//! Device-side declarations generated from the Rust definitions.
//!
//! Nothing in here is written by hand in WGSL: slot numbers come from the
//! registry enums and struct bodies from [`UniformLayout::fields`].

use crate::binding::{BUFFER_GROUP, SAMPLER_BINDING, TEXTURE_GROUP};
use crate::lighting::LightingPolicy;
use crate::registry::{
    BufferIndex, FunctionConstant, QualityLevel, Slot, TextureIndex, TextureKind,
    VertexAttribute, Viewport,
};
use crate::uniforms::{
    anchor_buffers, CameraUniform, EnvironmentUniform, InstanceEffectsUniform,
    InstanceTransformUniform, MaterialFeatures, MaterialUniform, UniformLayout,
};

/// Name of the shared sampler binding.
pub const SAMPLER_NAME: &str = "anchor_sampler";

/// Name of the texture variable bound at `slot`.
pub fn texture_variable(slot: TextureIndex) -> String {
    format!("texture_{}", slot.name())
}

/// `const` declarations for every entry of a namespace.
pub fn slot_constants<S: Slot>() -> String {
    let mut out = format!("// {}\n", S::NAMESPACE);
    for slot in S::ALL {
        out.push_str(&format!(
            "const {}: u32 = {}u;\n",
            slot.device_constant_name(),
            slot.index()
        ));
    }
    out
}

/// Pipeline-overridable constants: one per function constant slot, then the
/// quality tier.
pub fn override_declarations(features: MaterialFeatures, quality: QualityLevel) -> String {
    let mut out = String::from("// FunctionConstant\n");
    for constant in FunctionConstant::ALL {
        out.push_str(&format!(
            "@id({}) override {}: bool = {};\n",
            constant.index(),
            constant.device_constant_name(),
            features.contains(MaterialFeatures::from_constant(*constant))
        ));
    }
    out.push_str(&format!(
        "@id({}) override {}: u32 = {}u;\n",
        QualityLevel::OVERRIDE_ID,
        QualityLevel::OVERRIDE_NAME,
        quality.index()
    ));
    out
}

/// The same switches as [`override_declarations`], baked in as plain
/// constants for targets that cannot specialize a pipeline.
pub fn specialized_declarations(features: MaterialFeatures, quality: QualityLevel) -> String {
    let mut out = String::from("// FunctionConstant (specialized)\n");
    for constant in FunctionConstant::ALL {
        out.push_str(&format!(
            "const {}: bool = {};\n",
            constant.device_constant_name(),
            features.contains(MaterialFeatures::from_constant(*constant))
        ));
    }
    out.push_str(&format!(
        "const {}: u32 = {}u;\n",
        QualityLevel::OVERRIDE_NAME,
        quality.index()
    ));
    out
}

/// Lobe weights and switches of `policy` as WGSL constants.
pub fn policy_constants(policy: &LightingPolicy) -> String {
    let floats = [
        ("LIGHTING_EPSILON", policy.epsilon),
        ("LIGHTING_PUNCTUAL_SCALE", policy.punctual_scale),
        ("LIGHTING_SUBSURFACE_WEIGHT", policy.subsurface_weight),
        ("LIGHTING_CLEARCOAT_WEIGHT", policy.clearcoat_weight),
        ("LIGHTING_SHEEN_WEIGHT", policy.sheen_weight),
    ];
    let flags = [
        ("LIGHTING_ENABLE_ANISOTROPY", policy.enable_anisotropy),
        ("LIGHTING_ENABLE_CLEARCOAT", policy.enable_clearcoat),
        ("LIGHTING_ENABLE_SHEEN", policy.enable_sheen),
        ("LIGHTING_ENABLE_SUBSURFACE", policy.enable_subsurface),
    ];

    let mut out = String::from("// LightingPolicy\n");
    for (name, value) in floats {
        out.push_str(&format!("const {name}: f32 = {value:?};\n"));
    }
    for (name, value) in flags {
        out.push_str(&format!("const {name}: bool = {value};\n"));
    }
    out
}

/// Struct declaration of a record.
pub fn record_struct<T: UniformLayout>() -> String {
    let mut out = format!("struct {} {{\n", T::NAME);
    for field in T::fields() {
        out.push_str(&format!("    {}: {},\n", field.name, field.ty.name()));
    }
    out.push_str("}\n");
    out
}

/// Vertex input struct with one `@location` per vertex attribute slot.
pub fn vertex_input() -> String {
    let mut out = String::from("struct VertexIn {\n");
    for attribute in VertexAttribute::ALL {
        out.push_str(&format!(
            "    @location({}) {}: {},\n",
            attribute.index(),
            attribute.name(),
            attribute.format().wgsl_type()
        ));
    }
    out.push_str("    @builtin(instance_index) instance: u32,\n}\n");
    out
}

/// Buffer, texture and sampler bindings of the anchor program.
pub fn binding_declarations() -> String {
    let mut out = String::new();
    for record in anchor_buffers() {
        let space = if record.is_array {
            "storage, read"
        } else {
            "uniform"
        };
        out.push_str(&format!(
            "@group({BUFFER_GROUP}) @binding({}) var<{space}> {}: {};\n",
            record.slot.index(),
            record.slot.name(),
            record.binding_type()
        ));
    }

    for slot in TextureIndex::anchor_slots() {
        let ty = match slot.kind() {
            TextureKind::EnvironmentCube => "texture_cube<f32>",
            _ => "texture_2d<f32>",
        };
        out.push_str(&format!(
            "@group({TEXTURE_GROUP}) @binding({}) var {}: {ty};\n",
            slot.index(),
            texture_variable(slot)
        ));
    }

    out.push_str(&format!(
        "@group({TEXTURE_GROUP}) @binding({SAMPLER_BINDING}) var {SAMPLER_NAME}: sampler;\n"
    ));
    out
}

/// The full prelude, in declaration order.
///
/// With `specialized` the feature set and tier are constants rather than
/// pipeline overrides.
pub fn generate_prelude(
    features: MaterialFeatures,
    quality: QualityLevel,
    policy: &LightingPolicy,
    specialized: bool,
) -> String {
    let switches = if specialized {
        specialized_declarations(features, quality)
    } else {
        override_declarations(features, quality)
    };
    let sections = [
        String::from("// Generated by anchor-shading. Do not edit.\n"),
        slot_constants::<BufferIndex>(),
        slot_constants::<VertexAttribute>(),
        slot_constants::<TextureIndex>(),
        slot_constants::<Viewport>(),
        slot_constants::<QualityLevel>(),
        switches,
        policy_constants(policy),
        record_struct::<CameraUniform>(),
        record_struct::<EnvironmentUniform>(),
        record_struct::<InstanceTransformUniform>(),
        record_struct::<InstanceEffectsUniform>(),
        record_struct::<MaterialUniform>(),
        vertex_input(),
        binding_declarations(),
    ];
    sections.join("\n")
}
