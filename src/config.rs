//! Scene construction input
//!
//! A scene is described by a [`SceneConfig`] (JSON) or by the galactic-centre
//! preset plus a CSV table of orbital elements:
//!
//! ```text
//! x,y,z,vx,vy,vz
//! -1.2e10,3.4e9,0.0,120.5,-800.2,40.0
//! ```
//!
//! Elements are in km and km/s and are multiplied by `scaling` before use.
//! Every loader validates the whole input before a scene is built.

use std::path::Path;

use anyhow::{Context, Result, bail};
use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::galactic_center_mass;
use crate::sim::Camera;

/// CSV columns read for each body, in record order
const CSV_COLUMNS: [&str; 6] = ["x", "y", "z", "vx", "vy", "vz"];

/// Initial state of one orbiting body, unscaled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
}

impl OrbitalElements {
    pub fn new(position: DVec3, velocity: DVec3) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            vx: velocity.x,
            vy: velocity.y,
            vz: velocity.z,
        }
    }

    #[inline]
    pub fn position(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn velocity(&self) -> DVec3 {
        DVec3::new(self.vx, self.vy, self.vz)
    }

    fn is_finite(&self) -> bool {
        self.position().is_finite() && self.velocity().is_finite()
    }
}

impl From<[f64; 6]> for OrbitalElements {
    fn from(v: [f64; 6]) -> Self {
        Self {
            x: v[0],
            y: v[1],
            z: v[2],
            vx: v[3],
            vy: v[4],
            vz: v[5],
        }
    }
}

/// The central mass as supplied by the host (already in scene units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralMassConfig {
    /// Screen-space anchor
    pub position: DVec3,
    /// G·M in scene units
    pub mass: f64,
    /// Separation floor for the force kernel (0 disables)
    #[serde(default = "default_min_separation")]
    pub min_separation: f64,
}

/// Everything needed to build a [`crate::sim::Scene`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Factor applied to every body's position and velocity
    #[serde(default = "default_scaling")]
    pub scaling: f64,
    pub central: CentralMassConfig,
    /// Integration step (seconds)
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    /// Integration sub-steps per frame
    #[serde(default = "default_substeps")]
    pub substeps: u32,
    /// Seed for flare noise and initial flare phases
    #[serde(default)]
    pub seed: u64,
    /// Whether trails are drawn initially
    #[serde(default)]
    pub draw_trails: bool,
    /// Initial camera
    #[serde(default)]
    pub camera: Camera,
    pub bodies: Vec<OrbitalElements>,
}

fn default_scaling() -> f64 {
    DEFAULT_SCALING
}

fn default_time_step() -> f64 {
    DEFAULT_TIME_STEP
}

fn default_substeps() -> u32 {
    DEFAULT_SUBSTEPS
}

fn default_min_separation() -> f64 {
    DEFAULT_MIN_SEPARATION
}

impl SceneConfig {
    /// The galactic-centre preset for a `width` × `height` viewport, without bodies
    ///
    /// The black hole sits at the viewport centre with its mass expressed in
    /// scaled km units.
    pub fn galactic_center(width: u32, height: u32) -> Self {
        Self {
            scaling: DEFAULT_SCALING,
            central: CentralMassConfig {
                position: DVec3::new(width as f64 / 2.0, height as f64 / 2.0, 0.0),
                mass: galactic_center_mass(DEFAULT_SCALING),
                min_separation: DEFAULT_MIN_SEPARATION,
            },
            time_step: DEFAULT_TIME_STEP,
            substeps: DEFAULT_SUBSTEPS,
            seed: 0,
            draw_trails: false,
            camera: Camera::default(),
            bodies: Vec::new(),
        }
    }

    /// Galactic-centre preset populated with `count` random bound orbits
    ///
    /// Orbits have radii of 20-200 scene units, random inclinations and
    /// speeds between 0.8 and 1.1 of circular.
    pub fn demo(width: u32, height: u32, count: usize, seed: u64) -> Self {
        let mut cfg = Self::galactic_center(width, height);
        cfg.seed = seed;
        cfg.draw_trails = true;

        let mut rng = Pcg32::seed_from_u64(seed);
        let mass = cfg.central.mass;
        for _ in 0..count {
            let r: f64 = rng.random_range(20.0..200.0);
            let phase: f64 = rng.random_range(0.0..std::f64::consts::TAU);
            let tilt: f64 = rng.random_range(-1.2..1.2);

            let radial = DVec3::new(phase.cos(), phase.sin(), 0.0);
            let tangent = DVec3::new(-phase.sin(), phase.cos(), 0.0);
            // Tilt the orbital plane about the radial direction
            let tangent = tangent * tilt.cos() + DVec3::Z * tilt.sin();

            let speed = (mass / r).sqrt() * rng.random_range(0.8..1.1);
            // Stored unscaled, like catalogue data
            cfg.bodies.push(OrbitalElements::new(
                radial * (r / cfg.scaling),
                tangent * (speed / cfg.scaling),
            ));
        }
        cfg
    }

    /// Parse and validate a JSON scene
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: SceneConfig =
            serde_json::from_str(json).context("Failed to parse scene JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON scene file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("Invalid scene file {}", path.display()))
    }

    /// Galactic-centre preset with bodies read from an orbital-element CSV file
    pub fn load_orbital_csv<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read orbital elements {}", path.display()))?;
        let mut cfg = Self::galactic_center(width, height);
        cfg.bodies = parse_orbital_csv(&text)
            .with_context(|| format!("Invalid orbital elements {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every value a scene relies on
    pub fn validate(&self) -> Result<()> {
        if !(self.scaling.is_finite() && self.scaling > 0.0) {
            bail!("scaling must be finite and positive, got {}", self.scaling);
        }
        if !self.central.position.is_finite() {
            bail!("central mass position is not finite");
        }
        if !(self.central.mass.is_finite() && self.central.mass > 0.0) {
            bail!("central mass must be finite and positive, got {}", self.central.mass);
        }
        if !(self.central.min_separation.is_finite() && self.central.min_separation >= 0.0) {
            bail!(
                "min_separation must be finite and non-negative, got {}",
                self.central.min_separation
            );
        }
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            bail!("time_step must be finite and positive, got {}", self.time_step);
        }
        if self.substeps == 0 {
            bail!("substeps must be at least 1");
        }
        if !self.camera.is_valid() {
            bail!("camera needs finite angles and a positive zoom");
        }
        for (i, body) in self.bodies.iter().enumerate() {
            if !body.is_finite() {
                bail!("body {} has non-finite orbital elements", i);
            }
            let pos = body.position() * self.scaling;
            if !pos.is_finite() || pos.length() == 0.0 {
                bail!("body {} starts at the central mass", i);
            }
        }
        Ok(())
    }
}

/// Parse an orbital-element table with a header row naming `x,y,z,vx,vy,vz`
///
/// Columns may appear in any order and extra columns are ignored. Blank lines
/// are skipped; any malformed record rejects the whole table.
pub fn parse_orbital_csv(text: &str) -> Result<Vec<OrbitalElements>> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().context("Orbital element CSV is empty")?;
    let columns: Vec<&str> = header.split(',').map(clean_field).collect();

    let mut indices = [0usize; 6];
    for (slot, name) in indices.iter_mut().zip(CSV_COLUMNS) {
        *slot = columns
            .iter()
            .position(|c| *c == name)
            .with_context(|| format!("Orbital element CSV is missing column `{}`", name))?;
    }

    let mut records = Vec::new();
    for (line_index, line) in lines {
        let line_no = line_index + 1;
        let fields: Vec<&str> = line.split(',').map(clean_field).collect();
        if fields.len() != columns.len() {
            bail!(
                "line {}: expected {} fields, found {}",
                line_no,
                columns.len(),
                fields.len()
            );
        }

        let mut values = [0.0; 6];
        for (value, (&index, name)) in values.iter_mut().zip(indices.iter().zip(CSV_COLUMNS)) {
            *value = fields[index].parse::<f64>().with_context(|| {
                format!(
                    "line {}: invalid number `{}` in column `{}`",
                    line_no, fields[index], name
                )
            })?;
        }
        records.push(OrbitalElements::from(values));
    }

    if records.is_empty() {
        bail!("Orbital element CSV contains no records");
    }

    log::debug!("Parsed {} orbital element records", records.len());
    Ok(records)
}

fn clean_field(field: &str) -> &str {
    field.trim().trim_matches('"')
}
