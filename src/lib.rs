//! GC Orbits - stars orbiting the galactic-centre black hole
//!
//! Core modules:
//! - `sim`: Orbit integration, trails, flare textures, camera projection, frame tick
//! - `renderer`: Depth-ordered compositing and the WebGPU vertex pipeline
//! - `config`: Scene construction input (JSON scenes, orbital-element CSV)
//! - `settings`: Render preferences

pub mod config;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use config::{CentralMassConfig, OrbitalElements, SceneConfig};
pub use settings::Settings;

/// Scene configuration constants
pub mod consts {
    /// Maximum number of samples kept in a body's trail
    pub const TRAIL_CAPACITY: usize = 1000;
    /// A trail sample is recorded once every this many advance calls
    pub const TRAIL_DECIMATION: u32 = 6;
    /// Newest trail samples hidden under the body sprite
    pub const TRAIL_TAIL_SKIP: usize = 4;

    /// Sprite radius of a body, in texels
    pub const BODY_SPRITE_RADIUS: f32 = 10.0;
    /// Sprite radius of the central mass, in texels
    pub const CENTRAL_SPRITE_RADIUS: f32 = 10.0;
    /// Flares are only synthesized inside this fraction of the sprite radius
    pub const FLARE_RADIUS_FRACTION: f32 = 0.9;
    /// Flare noise seed advance per frame
    pub const FLARE_SEED_STEP: f32 = 0.1;
    /// Upper bound of a body's initial flare noise seed
    pub const FLARE_SEED_RANGE: f32 = 1000.0;
    /// Half-width of the flare smoothing window (5x5)
    pub const FLARE_BLUR_RADIUS: usize = 2;

    /// Default distance scaling applied to orbital elements
    pub const DEFAULT_SCALING: f64 = 6e-10;
    /// Default integration step (three hours, in seconds)
    pub const DEFAULT_TIME_STEP: f64 = 3.0 * 3600.0;
    /// Default integration sub-steps per frame
    pub const DEFAULT_SUBSTEPS: u32 = 50;
    /// Default separation floor used by the gravity kernel (scene units)
    pub const DEFAULT_MIN_SEPARATION: f64 = 1.0;

    /// Central black hole mass in solar masses
    pub const BLACK_HOLE_SOLAR_MASSES: f64 = 4.3e6;
    /// Solar mass in kg
    pub const SOLAR_MASS_KG: f64 = 1.989e30;
    /// Gravitational constant (m^3 kg^-1 s^-2)
    pub const GRAVITATIONAL_CONSTANT: f64 = 6.67384e-11;
    /// m^3 -> km^3, orbital elements are given in km and km/s
    pub const M3_TO_KM3: f64 = 1e-9;

    /// Trail colour (RGBA, 0-1)
    pub const TRAIL_COLOR: [f32; 4] = [100.0 / 255.0, 100.0 / 255.0, 1.0, 1.0];
}

/// Gravitational parameter (G·M) of the galactic-centre black hole in scaled scene units
///
/// Positions scale linearly with `scaling`, so G·M scales with its cube.
#[inline]
pub fn galactic_center_mass(scaling: f64) -> f64 {
    use consts::*;
    BLACK_HOLE_SOLAR_MASSES * SOLAR_MASS_KG * GRAVITATIONAL_CONSTANT * M3_TO_KM3 * scaling.powi(3)
}
