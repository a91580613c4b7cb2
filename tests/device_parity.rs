//! Agreement of the device lighting model with the host evaluator.
//!
//! Each case is shaded twice: once by `LightingEvaluator` and once by
//! `evaluate_lighting` from `lighting.wgsl`, run in a compute pass. The tests
//! skip when no wgpu adapter is available.
//!
//! ```bash
//! cargo test --test device_parity
//! WGPU_BACKEND=vulkan cargo test --test device_parity -- --nocapture
//! ```

mod common;

use anchor_shading::prelude::*;
use bytemuck::{Pod, Zeroable};
use rstest::rstest;
use wgpu::util::DeviceExt;

use common::{direction, init_logging};

// ============================================================================
// Device harness
// ============================================================================

/// One fragment's inputs, laid out like `LightingCase` in [`CASE_PROGRAM`].
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct LightingCase {
    material: MaterialUniform,
    environment: EnvironmentUniform,
    effects: InstanceEffectsUniform,
    normal: [f32; 4],
    view_direction: [f32; 4],
    tangent: [f32; 4],
    reflected_color: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<LightingCase>() == 224);

const CASE_PROGRAM: &str = r#"
struct LightingCase {
    material: MaterialUniform,
    environment: EnvironmentUniform,
    effects: InstanceEffectsUniform,
    normal: vec4<f32>,
    view_direction: vec4<f32>,
    tangent: vec4<f32>,
    reflected_color: vec4<f32>,
}

@group(0) @binding(0) var<storage, read> lighting_cases: array<LightingCase>;
@group(0) @binding(1) var<storage, read_write> lighting_results: array<vec4<f32>>;

@compute @workgroup_size(1)
fn cs_lighting(@builtin(global_invocation_id) id: vec3<u32>) {
    let c = lighting_cases[id.x];
    lighting_results[id.x] = evaluate_lighting(
        c.material,
        c.environment,
        c.effects,
        c.normal.xyz,
        c.view_direction.xyz,
        c.tangent.xyz,
        c.reflected_color.xyz,
    );
}
"#;

struct DeviceContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl DeviceContext {
    /// Any compute-capable adapter, or `None` when the platform has none.
    fn new() -> Option<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let adapter = pollster::block_on(
            instance.request_adapter(&wgpu::RequestAdapterOptions::default()),
        )?;
        log::info!("device parity on {:?}", adapter.get_info());
        if !adapter
            .get_downlevel_capabilities()
            .flags
            .contains(wgpu::DownlevelFlags::COMPUTE_SHADERS)
        {
            return None;
        }

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("device_parity"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
            },
            None,
        ))
        .ok()?;
        Some(Self { device, queue })
    }

    /// Shade every case with the device program built for `quality`.
    fn evaluate(&self, quality: QualityLevel, cases: &[LightingCase]) -> Vec<Vec4> {
        let mut source = ShaderBuilder::new()
            .with_quality(quality)
            .with_policy(LightingPolicy::for_quality(quality))
            .with_specialized(true)
            .build_library()
            .expect("library source");
        source.push_str(CASE_PROGRAM);

        let device = &self.device;
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lighting cases"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("lighting cases"),
            layout: None,
            module: &module,
            entry_point: "cs_lighting",
            compilation_options: Default::default(),
        });

        let inputs = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lighting cases"),
            contents: bytemuck::cast_slice(cases),
            usage: wgpu::BufferUsages::STORAGE,
        });
        let size = (cases.len() * std::mem::size_of::<[f32; 4]>()) as u64;
        let results = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lighting results"),
            size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lighting staging"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("lighting cases"),
            layout: &pipeline.get_bind_group_layout(0),
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: inputs.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: results.as_entire_binding(),
                },
            ],
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("lighting cases"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("lighting cases"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(cases.len() as u32, 1, 1);
        }
        encoder.copy_buffer_to_buffer(&results, 0, &staging, 0, size);
        self.queue.submit(Some(encoder.finish()));

        let slice = staging.slice(..);
        slice.map_async(wgpu::MapMode::Read, |result| {
            result.expect("map lighting results");
        });
        device.poll(wgpu::Maintain::Wait);

        let colors = bytemuck::cast_slice::<u8, [f32; 4]>(&slice.get_mapped_range())
            .iter()
            .map(|c| Vec4::from_array(*c))
            .collect();
        staging.unmap();
        colors
    }
}

// ============================================================================
// Cases
// ============================================================================

struct Fragment {
    material: MaterialUniform,
    environment: EnvironmentUniform,
    effects: InstanceEffectsUniform,
    normal: Vec3,
    view_direction: Vec3,
    tangent: Vec3,
    reflected_color: Vec3,
}

impl Fragment {
    fn new(material: MaterialUniform, environment: EnvironmentUniform) -> Self {
        Self {
            material,
            environment,
            effects: InstanceEffectsUniform::default(),
            normal: Vec3::Z,
            view_direction: Vec3::Z,
            tangent: Vec3::X,
            reflected_color: Vec3::ZERO,
        }
    }

    fn viewed_from(mut self, view_direction: Vec3) -> Self {
        self.view_direction = view_direction;
        self
    }

    fn reflecting(mut self, color: Vec3) -> Self {
        self.reflected_color = color;
        self
    }

    fn with_effects(mut self, effects: InstanceEffectsUniform) -> Self {
        self.effects = effects;
        self
    }

    fn device_case(&self) -> LightingCase {
        LightingCase {
            material: self.material,
            environment: self.environment,
            effects: self.effects,
            normal: self.normal.extend(0.0).to_array(),
            view_direction: self.view_direction.extend(0.0).to_array(),
            tangent: self.tangent.extend(0.0).to_array(),
            reflected_color: self.reflected_color.extend(0.0).to_array(),
        }
    }

    fn host_color(&self, quality: QualityLevel) -> Vec4 {
        let lights = [self.environment.directional_light()];
        let surface = SurfaceSample::new(Vec3::ZERO, self.normal, self.view_direction)
            .with_tangent(self.tangent);
        let inputs = ShadingInputs::new(self.material, self.environment, surface)
            .with_lights(&lights)
            .with_effects(self.effects)
            .with_environment_sampler(&self.reflected_color);

        LightingEvaluator::new(LightingPolicy::for_quality(quality)).evaluate(&inputs)
    }
}

fn red_dielectric() -> Fragment {
    Fragment::new(
        MaterialUniform::from_base_color(Vec4::new(1.0, 0.0, 0.0, 1.0)).with_roughness(1.0),
        EnvironmentUniform::new(Vec3::ZERO, Vec3::Z, Vec3::ONE),
    )
}

fn red_metal() -> Fragment {
    Fragment::new(
        MaterialUniform::from_base_color(Vec4::new(1.0, 0.0, 0.0, 1.0))
            .with_roughness(1.0)
            .with_metalness(1.0)
            .with_specular(1.0, 0.0),
        EnvironmentUniform::new(Vec3::ZERO, Vec3::Z, Vec3::ONE),
    )
}

fn oblique_car_paint() -> Fragment {
    Fragment::new(
        MaterialUniform::car_paint(Vec3::new(0.2, 0.4, 0.9)),
        EnvironmentUniform::new(Vec3::splat(0.05), direction(0.6, 2.0), Vec3::new(1.0, 0.95, 0.9)),
    )
    .viewed_from(direction(0.9, 0.3))
}

fn reflective_chrome() -> Fragment {
    Fragment::new(
        MaterialUniform::metal(Vec3::splat(0.9), 0.2),
        EnvironmentUniform::default().with_environment_map(true),
    )
    .viewed_from(direction(0.4, 1.0))
    .reflecting(Vec3::new(0.3, 0.4, 0.5))
}

fn brushed_aluminium() -> Fragment {
    Fragment::new(
        MaterialUniform::brushed_aluminium(),
        EnvironmentUniform::new(Vec3::ZERO, direction(0.5, 0.0), Vec3::ONE),
    )
    .viewed_from(direction(0.7, 2.5))
}

fn tinted_velvet() -> Fragment {
    Fragment::new(
        MaterialUniform::velvet(Vec3::new(0.5, 0.0, 0.2))
            .with_subsurface(0.6)
            .with_opacity(0.7)
            .with_emission(Vec3::new(0.0, 0.1, 0.0)),
        EnvironmentUniform::default(),
    )
    .viewed_from(direction(1.1, -0.4))
    .with_effects(
        InstanceEffectsUniform::default()
            .with_alpha(0.5)
            .with_glow(0.25)
            .with_tint(Vec3::new(1.0, 0.5, 0.25))
            .with_scale(2.0),
    )
}

fn light_behind_surface() -> Fragment {
    Fragment::new(
        MaterialUniform::plastic(Vec3::ONE),
        EnvironmentUniform::new(Vec3::splat(0.1), -Vec3::Z, Vec3::ONE),
    )
}

fn directionless_light() -> Fragment {
    Fragment::new(
        MaterialUniform::plastic(Vec3::ONE),
        EnvironmentUniform::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE),
    )
}

fn all_fragments() -> Vec<(&'static str, Fragment)> {
    vec![
        ("red_dielectric", red_dielectric()),
        ("red_metal", red_metal()),
        ("oblique_car_paint", oblique_car_paint()),
        ("reflective_chrome", reflective_chrome()),
        ("brushed_aluminium", brushed_aluminium()),
        ("tinted_velvet", tinted_velvet()),
        ("light_behind_surface", light_behind_surface()),
        ("directionless_light", directionless_light()),
    ]
}

fn assert_close(name: &str, device: Vec4, host: Vec4) {
    let tolerance = 1e-3 * host.abs().max_element().max(1.0);
    assert!(
        device.abs_diff_eq(host, tolerance),
        "{name}: device {device} host {host}"
    );
}

// ============================================================================
// Parity
// ============================================================================

#[rstest]
#[case::high(QualityLevel::High)]
#[case::medium(QualityLevel::Medium)]
#[case::low(QualityLevel::Low)]
fn test_device_matches_host(#[case] quality: QualityLevel) {
    init_logging();

    let Some(ctx) = DeviceContext::new() else {
        eprintln!("no wgpu adapter available, skipping");
        return;
    };

    let fragments = all_fragments();
    let cases: Vec<_> = fragments.iter().map(|(_, f)| f.device_case()).collect();
    let device_colors = ctx.evaluate(quality, &cases);
    assert_eq!(device_colors.len(), fragments.len());

    for ((name, fragment), device) in fragments.iter().zip(device_colors) {
        let host = fragment.host_color(quality);
        assert!(device.is_finite(), "{name}: {device}");
        assert_close(name, device, host);
    }
}

#[test]
fn test_device_red_dielectric_is_its_base_color() {
    init_logging();

    let Some(ctx) = DeviceContext::new() else {
        eprintln!("no wgpu adapter available, skipping");
        return;
    };

    let colors = ctx.evaluate(QualityLevel::High, &[red_dielectric().device_case()]);
    let rgb = colors[0].truncate();
    assert!(rgb.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-3), "{rgb}");
}

#[test]
fn test_device_ignores_directionless_light() {
    init_logging();

    let Some(ctx) = DeviceContext::new() else {
        eprintln!("no wgpu adapter available, skipping");
        return;
    };

    let colors = ctx.evaluate(QualityLevel::High, &[directionless_light().device_case()]);
    assert_eq!(colors[0].truncate(), Vec3::ZERO);
}
