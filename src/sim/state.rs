//! Scene state: the central mass, the bodies orbiting it and the camera
//!
//! Bodies keep their insertion order for the whole run; their index is their
//! identity for trails and flare textures.

use anyhow::Result;
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::flare::FlareTexture;
use super::gravity::{self, CentralMass};
use super::noise::ValueNoise;
use super::sprite::{self, TexelGrid};
use super::trail::Trail;
use crate::config::SceneConfig;
use crate::consts::*;

/// A body orbiting the central mass
#[derive(Debug, Clone)]
pub struct OrbitingBody {
    /// Offset from the central mass
    pub position: DVec3,
    pub velocity: DVec3,
    /// Projected `(x, y, depth)`, refreshed every frame
    pub screen_position: DVec3,
    pub trail: Trail,
    pub flare: FlareTexture,
    diverged: bool,
}

impl OrbitingBody {
    pub fn new(position: DVec3, velocity: DVec3, flare_seed: f32) -> Self {
        Self {
            position,
            velocity,
            screen_position: DVec3::ZERO,
            trail: Trail::new(),
            flare: FlareTexture::new(BODY_SPRITE_RADIUS, flare_seed),
            diverged: false,
        }
    }

    /// Integrate one frame and offer the new position to the trail
    ///
    /// Returns false when the state has gone non-finite; such a body is
    /// frozen from then on.
    pub fn advance(&mut self, central: &CentralMass, dt: f64, substeps: u32) -> bool {
        if self.diverged {
            return false;
        }

        gravity::leapfrog(&mut self.position, &mut self.velocity, central, dt, substeps);

        if !(self.position.is_finite() && self.velocity.is_finite()) {
            self.diverged = true;
            return false;
        }

        self.trail.record(self.position);
        true
    }

    /// Refresh the cached screen position
    #[inline]
    pub fn project(&mut self, camera: &Camera, anchor: DVec3) {
        self.screen_position = camera.project(anchor, self.position);
    }

    /// Depth sort key (smaller is farther)
    #[inline]
    pub fn depth(&self) -> f64 {
        self.screen_position.z
    }

    #[inline]
    pub fn is_diverged(&self) -> bool {
        self.diverged
    }

    pub fn specific_energy(&self, central: &CentralMass) -> f64 {
        gravity::specific_energy(self.position, self.velocity, central)
    }

    pub fn specific_angular_momentum(&self) -> DVec3 {
        gravity::specific_angular_momentum(self.position, self.velocity)
    }
}

/// Complete per-run state
#[derive(Debug, Clone)]
pub struct Scene {
    pub central: CentralMass,
    /// Bodies in input order
    pub bodies: Vec<OrbitingBody>,
    pub camera: Camera,
    pub time_step: f64,
    pub substeps: u32,
    pub draw_trails: bool,
    /// Projected position of the central mass
    pub central_screen_position: DVec3,
    /// Frames ticked so far
    pub frame: u64,
    body_sprite: TexelGrid,
    central_sprite: TexelGrid,
    noise: ValueNoise,
}

impl Scene {
    /// Build a scene, rejecting invalid configuration before anything is created
    pub fn from_config(cfg: &SceneConfig) -> Result<Self> {
        cfg.validate()?;

        let central = CentralMass::new(
            cfg.central.position,
            cfg.central.mass,
            cfg.central.min_separation,
        );

        let mut rng = Pcg32::seed_from_u64(cfg.seed);
        let bodies = cfg
            .bodies
            .iter()
            .map(|el| {
                let flare_seed = rng.random_range(0.0..FLARE_SEED_RANGE);
                OrbitingBody::new(
                    el.position() * cfg.scaling,
                    el.velocity() * cfg.scaling,
                    flare_seed,
                )
            })
            .collect();

        let mut scene = Self {
            central,
            bodies,
            camera: cfg.camera,
            time_step: cfg.time_step,
            substeps: cfg.substeps,
            draw_trails: cfg.draw_trails,
            central_screen_position: central.position,
            frame: 0,
            body_sprite: sprite::body_sprite(BODY_SPRITE_RADIUS),
            central_sprite: sprite::central_sprite(CENTRAL_SPRITE_RADIUS),
            noise: ValueNoise::new(cfg.seed),
        };
        scene.project_all();

        log::info!(
            "Scene built: {} bodies, dt = {} s x {} substeps",
            scene.bodies.len(),
            scene.time_step,
            scene.substeps
        );
        Ok(scene)
    }

    /// Static disc drawn under every body's flares
    pub fn body_sprite(&self) -> &TexelGrid {
        &self.body_sprite
    }

    /// Static halo drawn for the central mass
    pub fn central_sprite(&self) -> &TexelGrid {
        &self.central_sprite
    }

    /// Project the central mass and every body with the current camera
    pub fn project_all(&mut self) {
        let anchor = self.central.position;
        self.central_screen_position = self.camera.project(anchor, DVec3::ZERO);
        for body in &mut self.bodies {
            body.project(&self.camera, anchor);
        }
    }

    /// Run one frame of the flare animation on every body
    pub fn evolve_flares(&mut self) {
        for body in &mut self.bodies {
            body.flare.evolve(&self.noise);
        }
    }

    /// Empty every trail
    pub fn clear_trails(&mut self) {
        for body in &mut self.bodies {
            body.trail.clear();
        }
    }

    /// Number of bodies whose state went non-finite
    pub fn diverged_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.is_diverged()).count()
    }
}
