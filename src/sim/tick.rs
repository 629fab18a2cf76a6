//! Per-frame scene update
//!
//! One tick, in order: apply host input, integrate every body, project the
//! central mass and the bodies, then advance every flare texture.

use super::camera::Camera;
use super::state::Scene;

/// Host input for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// New camera orientation/zoom (None keeps the current one)
    pub camera: Option<Camera>,
    /// Flip whether trails are drawn
    pub toggle_trails: bool,
    /// Empty every trail before integrating
    pub clear_trails: bool,
}

/// Advance the scene by one frame
pub fn tick(scene: &mut Scene, input: &FrameInput) {
    if let Some(camera) = input.camera {
        if camera.is_valid() {
            scene.camera = camera;
        } else {
            log::warn!("Ignoring invalid camera {:?}", camera);
        }
    }

    if input.toggle_trails {
        scene.draw_trails = !scene.draw_trails;
        log::info!("Trails {}", if scene.draw_trails { "on" } else { "off" });
    }

    if input.clear_trails {
        scene.clear_trails();
        log::debug!("Trails cleared");
    }

    // Bodies only feel the central mass, so each advances independently
    let central = scene.central;
    let (dt, substeps) = (scene.time_step, scene.substeps);
    for (i, body) in scene.bodies.iter_mut().enumerate() {
        let was_diverged = body.is_diverged();
        if !body.advance(&central, dt, substeps) && !was_diverged {
            log::warn!(
                "Body {} diverged on frame {} and is no longer simulated",
                i,
                scene.frame
            );
        }
    }

    scene.project_all();
    scene.evolve_flares();
    scene.frame += 1;
}
