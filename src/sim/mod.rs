//! Simulation module
//!
//! Everything here is pure and deterministic:
//! - Fixed time step and sub-step count
//! - Seeded RNG only
//! - Stable body order (input order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod flare;
pub mod gravity;
pub mod noise;
pub mod sprite;
pub mod state;
pub mod tick;
pub mod trail;

pub use camera::Camera;
pub use flare::FlareTexture;
pub use gravity::{CentralMass, leapfrog, specific_angular_momentum, specific_energy};
pub use noise::ValueNoise;
pub use sprite::{Texel, TexelGrid, body_sprite, central_sprite};
pub use state::{OrbitingBody, Scene};
pub use tick::{FrameInput, tick};
pub use trail::Trail;
