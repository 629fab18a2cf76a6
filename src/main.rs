//! GC Orbits entry point
//!
//! Builds a scene from a JSON scene file, an orbital-element CSV or a random
//! demo population, then runs it headless: every frame is ticked and composed
//! into a vertex list (and optionally drawn offscreen with wgpu), and
//! drift/draw statistics are logged.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;

use gc_orbits::SceneConfig;
use gc_orbits::renderer::{Compositor, RenderState, VertexSurface};
use gc_orbits::settings::Settings;
use gc_orbits::sim::{Camera, FrameInput, Scene, tick};

/// Yaw advance per frame with --orbit-camera (radians)
const ORBIT_CAMERA_RATE: f64 = 0.01;

#[derive(Parser, Debug)]
#[command(version, about = "Stars orbiting the galactic-centre black hole")]
struct Args {
    /// JSON scene file
    #[arg(long, conflicts_with = "stars")]
    scene: Option<PathBuf>,

    /// Orbital-element CSV (x,y,z,vx,vy,vz in km and km/s)
    #[arg(long)]
    stars: Option<PathBuf>,

    /// Random bodies to generate when no scene or CSV is given
    #[arg(long, default_value_t = 20)]
    demo_bodies: usize,

    /// Seed for the demo population
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Frames to run
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Render settings JSON
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Slowly rotate the camera around the central mass
    #[arg(long)]
    orbit_camera: bool,

    /// Also draw every frame offscreen on the GPU
    #[arg(long)]
    gpu: bool,
}

fn build_config(args: &Args) -> Result<SceneConfig> {
    if args.width == 0 || args.height == 0 {
        bail!("viewport must be at least 1x1, got {}x{}", args.width, args.height);
    }
    match (&args.scene, &args.stars) {
        (Some(path), _) => SceneConfig::load_json(path),
        (None, Some(path)) => SceneConfig::load_orbital_csv(path, args.width, args.height),
        (None, None) => {
            log::info!("No scene given, generating {} demo bodies", args.demo_bodies);
            Ok(SceneConfig::demo(args.width, args.height, args.demo_bodies, args.seed))
        }
    }
}

fn run(args: Args) -> Result<()> {
    let settings = Settings::load_or_default(args.settings.as_ref())?;
    let mut cfg = build_config(&args)?;
    if let Some(draw_trails) = settings.draw_trails {
        cfg.draw_trails = draw_trails;
    }

    let mut scene = Scene::from_config(&cfg)?;
    let compositor = Compositor::from_settings(&settings);
    let mut surface = VertexSurface::new();
    let mut gpu = if args.gpu {
        Some(pollster::block_on(RenderState::new(args.width, args.height))?)
    } else {
        None
    };

    let initial_energy: Vec<f64> = scene
        .bodies
        .iter()
        .map(|b| b.specific_energy(&scene.central))
        .collect();

    let mut camera = scene.camera;
    let mut max_vertices = 0usize;
    for _ in 0..args.frames {
        let input = if args.orbit_camera {
            camera.yaw += ORBIT_CAMERA_RATE;
            FrameInput {
                camera: Some(camera),
                ..Default::default()
            }
        } else {
            FrameInput::default()
        };
        tick(&mut scene, &input);

        surface.clear();
        compositor.draw(&scene, &mut surface);
        max_vertices = max_vertices.max(surface.vertices().len());
        if let Some(gpu) = gpu.as_mut() {
            gpu.render(surface.vertices(), settings.background);
        }

        if scene.frame % 100 == 0 {
            log::debug!(
                "Frame {}: {} sprites, {} trail segments, {} vertices",
                scene.frame,
                surface.sprite_count(),
                surface.line_count(),
                surface.vertices().len()
            );
        }
    }

    if let Some(gpu) = &gpu {
        log::info!(
            "GPU rendered {} frames at {}x{}",
            gpu.frames_rendered(),
            gpu.size().0,
            gpu.size().1
        );
    }
    report(&scene, &initial_energy, max_vertices);
    Ok(())
}

fn report(scene: &Scene, initial_energy: &[f64], max_vertices: usize) {
    log::info!(
        "Ran {} frames ({:.1} simulated days), peak {} vertices per frame",
        scene.frame,
        scene.frame as f64 * scene.time_step * scene.substeps as f64 / 86_400.0,
        max_vertices
    );

    for (i, (body, e0)) in scene.bodies.iter().zip(initial_energy).enumerate() {
        if body.is_diverged() {
            log::warn!("Body {}: diverged", i);
            continue;
        }
        let e = body.specific_energy(&scene.central);
        log::info!(
            "Body {}: r = {:.2}, energy drift {:.3e}, trail {} samples",
            i,
            body.position.length(),
            (e - e0) / e0.abs(),
            body.trail.len()
        );
    }

    if scene.diverged_count() > 0 {
        log::warn!("{} of {} bodies diverged", scene.diverged_count(), scene.bodies.len());
    }
    let Camera { pitch, yaw, zoom } = scene.camera;
    log::info!("Final camera: pitch {:.3}, yaw {:.3}, zoom {:.2}", pitch, yaw, zoom);
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("GC Orbits starting...");
    run(Args::parse())
}
