use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{UVec2, Vec3};
use postfx::camera::Camera;
use postfx::frame::{CloudNoise, FrameContext};
use postfx::gpu::device::{DrawCall, GraphicsDevice};
use postfx::gpu::reflection::ShaderReflection;
use postfx::gpu::resources::{
    Arena, ProgramId, RenderTargetHandle, TargetId, TextureId,
};
use postfx::gpu::shader_composer::{CompiledProgram, ShaderError};
use postfx::gpu::shader_library::ShaderLibrary;
use postfx::postprocess::{PostProcessPipeline, ProgramRegistry};
use postfx::settings::RenderSettings;

/// Device that keeps reflections and discards draws.
#[derive(Default)]
struct NullDevice {
    programs: Arena<ProgramId, ShaderReflection>,
    targets: u64,
}

impl GraphicsDevice for NullDevice {
    fn build_program(
        &mut self,
        program: CompiledProgram,
    ) -> Result<ProgramId, ShaderError> {
        Ok(self.programs.insert(program.reflection))
    }

    fn reflection(&self, program: ProgramId) -> Option<&ShaderReflection> {
        self.programs.get(program)
    }

    fn release_program(&mut self, program: ProgramId) {
        let _ = self.programs.remove(program);
    }

    fn create_render_target(
        &mut self,
        _label: &str,
        _width: u32,
        _height: u32,
    ) -> RenderTargetHandle {
        self.targets += 1;
        RenderTargetHandle {
            target: TargetId(self.targets),
            texture: TextureId(1000 + self.targets),
        }
    }

    fn resize_render_target(&mut self, _: RenderTargetHandle, _: u32, _: u32) {}

    fn release_render_target(&mut self, _: RenderTargetHandle) {}

    fn draw(&mut self, call: &DrawCall<'_>) {
        let _ = black_box(call.uniforms.as_bytes());
    }
}

fn frame_walk_benchmark(c: &mut Criterion) {
    let settings = RenderSettings::default();
    let mut device = NullDevice::default();
    let registry =
        ProgramRegistry::with_default_factories(ShaderLibrary::embedded())
            .unwrap();
    let mut pipeline =
        PostProcessPipeline::from_settings(registry, &settings.pipeline, &mut device);
    pipeline.configure(&mut device, 1920, 1080);

    let camera = Camera {
        eye: Vec3::new(0.0, 50.0, 0.0),
        target: Vec3::new(0.0, 52.0, -10.0),
        ..Camera::default()
    };
    let noise = CloudNoise {
        perlin_worley: TextureId(1),
        worley: TextureId(2),
        weather: TextureId(3),
    };
    let mut ctx = FrameContext::new(&camera, &settings, UVec2::new(1920, 1080))
        .with_depth(TextureId(4))
        .with_noise(noise);

    c.bench_function("three_stage_frame", |b| {
        b.iter(|| {
            ctx.frame += 1;
            ctx.time += 1.0 / 60.0;
            black_box(pipeline.render_frame(&mut device, &ctx, TextureId(0)))
        });
    });
}

fn registry_cache_benchmark(c: &mut Criterion) {
    let mut device = NullDevice::default();
    let mut registry =
        ProgramRegistry::with_default_factories(ShaderLibrary::embedded())
            .unwrap();
    let name = postfx::postprocess::volumetric_cloud::PROGRAM_NAME;
    let params = postfx::postprocess::ProgramParameters::NONE;
    let _ = registry.create_program(name, params, &mut device).unwrap();

    c.bench_function("registry_cache_hit", |b| {
        b.iter(|| {
            black_box(
                registry
                    .create_program(black_box(name), params, &mut device)
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, frame_walk_benchmark, registry_cache_benchmark);
criterion_main!(benches);
