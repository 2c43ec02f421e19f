//! Command-line driver for the postfx post-process pipeline.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use glam::{UVec2, Vec3};
use postfx::camera::Camera;
use postfx::frame::{CloudNoise, FrameClock, FrameContext};
use postfx::gpu::render_context::RenderContext;
use postfx::gpu::shader_composer::ShaderComposer;
use postfx::gpu::shader_library::{ShaderLibrary, FULLSCREEN_VERTEX_PATH};
use postfx::gpu::texture::ColorTarget;
use postfx::gpu::wgpu_device::WgpuDevice;
use postfx::light::{Light, LightBuffer, LightManager};
use postfx::postprocess::{
    EffectKind, PostProcessPipeline, ProgramParameters, ProgramRegistry,
};
use postfx::settings::RenderSettings;
use postfx::PostFxError;

const MAX_LIGHTS: u32 = 16;

#[derive(Parser)]
#[command(name = "postfx", version, about = "Post-process pipeline driver")]
struct Cli {
    /// Settings file (TOML). Defaults are used when omitted.
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile every program variant without touching a GPU.
    Check,
    /// Run the pipeline headless for a number of frames.
    Render {
        /// Frames to render.
        #[arg(short, long, default_value_t = 8)]
        frames: u32,
        /// Output width in pixels.
        #[arg(long, default_value_t = 1280)]
        width: u32,
        /// Output height in pixels.
        #[arg(long, default_value_t = 720)]
        height: u32,
    },
    /// Write the default settings to a TOML file.
    InitSettings {
        /// Destination path.
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let cli = Cli::parse();
    let result = load_settings(cli.settings.as_deref()).and_then(|settings| {
        match cli.command {
            Command::Check => check(&settings),
            Command::Render {
                frames,
                width,
                height,
            } => render(&settings, frames, width, height),
            Command::InitSettings { path } => settings.save(&path),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn load_settings(path: Option<&Path>) -> Result<RenderSettings, PostFxError> {
    path.map_or_else(|| Ok(RenderSettings::default()), RenderSettings::load)
}

fn shader_library(settings: &RenderSettings) -> ShaderLibrary {
    settings
        .pipeline
        .shader_dir
        .as_ref()
        .map_or_else(ShaderLibrary::embedded, ShaderLibrary::with_override_dir)
}

/// Compile and link every effect with every known parameter combination.
fn check(settings: &RenderSettings) -> Result<(), PostFxError> {
    let library = shader_library(settings);
    let mut composer = ShaderComposer::new()?;
    let vertex = library.load(FULLSCREEN_VERTEX_PATH)?;

    let variants = [
        ProgramParameters::NONE,
        ProgramParameters::DEBUG_VIEW,
        ProgramParameters::HIGH_QUALITY,
        ProgramParameters::DEBUG_VIEW | ProgramParameters::HIGH_QUALITY,
    ];
    let mut first_error = None;
    for kind in EffectKind::ALL {
        let fragment = library.load(kind.fragment_shader())?;
        for parameters in variants {
            let defines: Vec<&str> = parameters.shader_defines().collect();
            match composer.compile_program(
                kind.program_name(),
                &vertex,
                &fragment,
                &defines,
            ) {
                Ok(program) => log::info!(
                    "{} {defines:?}: ok ({} uniform bytes, {} textures)",
                    kind.program_name(),
                    program.reflection.uniform_block_size(),
                    program.reflection.textures().len()
                ),
                Err(e) => {
                    log::error!("{} {defines:?}: {e}", kind.program_name());
                    let _ = first_error.get_or_insert(e);
                }
            }
        }
    }
    first_error.map_or(Ok(()), |e| Err(e.into()))
}

/// Stand-ins for the G-buffer and noise inputs a host renderer provides.
struct HeadlessInputs {
    scene: ColorTarget,
    screen: ColorTarget,
    depth: wgpu::TextureView,
    perlin_worley: wgpu::TextureView,
    worley: wgpu::TextureView,
    weather: wgpu::TextureView,
}

impl HeadlessInputs {
    fn new(context: &RenderContext) -> Self {
        let device = &context.device;
        let (width, height) = (context.width, context.height);
        let volume = |label| {
            placeholder(
                device,
                label,
                wgpu::Extent3d {
                    width: 32,
                    height: 32,
                    depth_or_array_layers: 32,
                },
                wgpu::TextureDimension::D3,
                wgpu::TextureFormat::Rgba8Unorm,
            )
        };
        Self {
            scene: ColorTarget::new(device, "Scene Color", width, height, context.format),
            screen: ColorTarget::new(device, "Screen", width, height, context.format),
            depth: placeholder(
                device,
                "G-Buffer Depth",
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                wgpu::TextureDimension::D2,
                wgpu::TextureFormat::Depth32Float,
            ),
            perlin_worley: volume("Perlin-Worley Noise"),
            worley: volume("Worley Noise"),
            weather: placeholder(
                device,
                "Weather Map",
                wgpu::Extent3d {
                    width: 512,
                    height: 512,
                    depth_or_array_layers: 1,
                },
                wgpu::TextureDimension::D2,
                wgpu::TextureFormat::Rgba8Unorm,
            ),
        }
    }
}

fn placeholder(
    device: &wgpu::Device,
    label: &str,
    size: wgpu::Extent3d,
    dimension: wgpu::TextureDimension,
    format: wgpu::TextureFormat,
) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}

fn render(
    settings: &RenderSettings,
    frames: u32,
    width: u32,
    height: u32,
) -> Result<(), PostFxError> {
    let context = pollster::block_on(RenderContext::headless(
        wgpu::TextureFormat::Rgba8Unorm,
        width,
        height,
    ))?;
    let inputs = HeadlessInputs::new(&context);
    let light_buffer = LightBuffer::new(&context.device, MAX_LIGHTS);
    let mut lights = LightManager::with_capacity(MAX_LIGHTS);
    let sun = Light::directional(
        "sun",
        Vec3::from_array(settings.lighting.light_direction),
    );
    if lights.add(sun).is_none() {
        log::warn!("no light slot for the sun");
    }

    let mut device = WgpuDevice::new(context);
    let scene_color = device.register_texture(inputs.scene.view.clone());
    let depth = device.register_texture(inputs.depth.clone());
    let noise = CloudNoise {
        perlin_worley: device.register_texture(inputs.perlin_worley.clone()),
        worley: device.register_texture(inputs.worley.clone()),
        weather: device.register_texture(inputs.weather.clone()),
    };

    let registry = ProgramRegistry::with_default_factories(shader_library(settings))?;
    let mut pipeline =
        PostProcessPipeline::from_settings(registry, &settings.pipeline, &mut device);
    for (name, error) in pipeline.failed_stages() {
        log::warn!("stage '{name}' will be skipped: {error}");
    }
    pipeline.configure(&mut device, width, height);

    let mut camera = Camera::default();
    camera.set_viewport(width, height);
    let resolution = UVec2::new(width, height);
    let mut clock = FrameClock::new();

    for _ in 0..frames {
        let uploaded = light_buffer.sync(&device.context().queue, &mut lights);
        device.begin_frame(inputs.screen.view.clone());
        let ctx = FrameContext::new(&camera, settings, resolution)
            .with_clock(&clock)
            .with_depth(depth)
            .with_noise(noise);
        let report = pipeline.render_frame(&mut device, &ctx, scene_color);
        let _ = device.finish_frame();
        log::info!(
            "frame {}: {} stages, presented {}, {uploaded} lights uploaded, {:.1} fps",
            clock.frame(),
            report.stages_run,
            report.presented,
            clock.fps()
        );
        clock.tick();
    }

    pipeline.shutdown(&mut device);
    Ok(())
}
