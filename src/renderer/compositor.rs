//! Depth-ordered compositing
//!
//! Sprites are alpha blended without a depth buffer, so they must reach the
//! surface farthest first. The central mass and every live body are tagged
//! with their projected depth and sorted once; trails are drawn afterwards so
//! sprites never hide them.

use std::cmp::Ordering;

use glam::DVec3;

use crate::consts::TRAIL_COLOR;
use crate::settings::Settings;
use crate::sim::{Scene, TexelGrid};

/// Drawing capability the compositor renders through
pub trait DrawSurface {
    /// Blend `sprite` over the surface, centred on screen `(x, y)`,
    /// one texel covering `scale` pixels
    fn draw_sprite(&mut self, sprite: &TexelGrid, center: DVec3, scale: f64);

    /// Draw a line segment between two screen points
    fn draw_line(&mut self, from: DVec3, to: DVec3, color: [f32; 4]);
}

/// One entry of the back-to-front draw list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawItem {
    CentralMass,
    /// Index into `Scene::bodies`
    Body(usize),
}

/// Back-to-front order for bodies at `body_depths` and a central mass at `central_depth`
///
/// Smaller depth is farther and drawn first. Equal depths keep input order,
/// and a body level with the central mass is drawn before it. Bodies with a
/// non-finite depth cannot be placed and are left out.
pub fn depth_order(body_depths: &[f64], central_depth: f64) -> Vec<DrawItem> {
    let mut items: Vec<(f64, DrawItem)> = body_depths
        .iter()
        .enumerate()
        .filter(|(_, d)| d.is_finite())
        .map(|(i, d)| (*d, DrawItem::Body(i)))
        .collect();
    items.push((central_depth, DrawItem::CentralMass));

    items.sort_by(|(da, a), (db, b)| {
        da.total_cmp(db).then_with(|| match (a, b) {
            (DrawItem::Body(i), DrawItem::Body(j)) => i.cmp(j),
            (DrawItem::Body(_), DrawItem::CentralMass) => Ordering::Less,
            (DrawItem::CentralMass, DrawItem::Body(_)) => Ordering::Greater,
            (DrawItem::CentralMass, DrawItem::CentralMass) => Ordering::Equal,
        })
    });

    items.into_iter().map(|(_, item)| item).collect()
}

/// Draw list for the scene's current projection; diverged bodies are skipped
pub fn draw_order(scene: &Scene) -> Vec<DrawItem> {
    let depths: Vec<f64> = scene
        .bodies
        .iter()
        .map(|b| if b.is_diverged() { f64::NAN } else { b.depth() })
        .collect();
    depth_order(&depths, scene.central_screen_position.z)
}

/// Issues a frame's draw calls for a scene
#[derive(Debug, Clone)]
pub struct Compositor {
    /// Overlay each body's flare texture on its sprite
    pub show_flares: bool,
    pub trail_color: [f32; 4],
}

impl Default for Compositor {
    fn default() -> Self {
        Self {
            show_flares: true,
            trail_color: TRAIL_COLOR,
        }
    }
}

impl Compositor {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            show_flares: settings.show_flares,
            trail_color: settings.trail_color,
        }
    }

    /// Draw every sprite back-to-front, then the trails if enabled
    pub fn draw(&self, scene: &Scene, surface: &mut impl DrawSurface) {
        let zoom = scene.camera.zoom;

        for item in draw_order(scene) {
            match item {
                DrawItem::CentralMass => {
                    surface.draw_sprite(scene.central_sprite(), scene.central_screen_position, zoom);
                }
                DrawItem::Body(i) => {
                    let body = &scene.bodies[i];
                    surface.draw_sprite(scene.body_sprite(), body.screen_position, zoom);
                    if self.show_flares {
                        surface.draw_sprite(body.flare.visible(), body.screen_position, zoom);
                    }
                }
            }
        }

        if scene.draw_trails {
            self.draw_trails(scene, surface);
        }
    }

    /// Trail samples go through the same camera chain as the bodies
    ///
    /// Diverged bodies are skipped along with their trails.
    fn draw_trails(&self, scene: &Scene, surface: &mut impl DrawSurface) {
        let transform = scene.camera.transform(scene.central.position);
        for body in scene.bodies.iter().filter(|b| !b.is_diverged()) {
            for (a, b) in body.trail.segments() {
                let from = transform.transform_point3(a);
                let to = transform.transform_point3(b);
                if from.is_finite() && to.is_finite() {
                    surface.draw_line(from, to, self.trail_color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CentralMassConfig, OrbitalElements, SceneConfig};
    use crate::sim::{Camera, FrameInput, tick};
    use proptest::prelude::*;

    /// Records draw calls in order
    #[derive(Default)]
    struct RecordingSurface {
        sprites: Vec<(usize, DVec3, f64)>,
        lines: Vec<(DVec3, DVec3)>,
        /// Sprites drawn after the first line
        sprites_after_lines: usize,
    }

    impl DrawSurface for RecordingSurface {
        fn draw_sprite(&mut self, sprite: &TexelGrid, center: DVec3, scale: f64) {
            if !self.lines.is_empty() {
                self.sprites_after_lines += 1;
            }
            self.sprites.push((sprite.side(), center, scale));
        }

        fn draw_line(&mut self, from: DVec3, to: DVec3, _color: [f32; 4]) {
            self.lines.push((from, to));
        }
    }

    fn depths_of(order: &[DrawItem], bodies: &[f64], central: f64) -> Vec<f64> {
        order
            .iter()
            .map(|item| match item {
                DrawItem::CentralMass => central,
                DrawItem::Body(i) => bodies[*i],
            })
            .collect()
    }

    fn scene_with(bodies: Vec<OrbitalElements>) -> Scene {
        let cfg = SceneConfig {
            scaling: 1.0,
            central: CentralMassConfig {
                position: DVec3::new(300.0, 200.0, 0.0),
                mass: 1.0,
                min_separation: 0.0,
            },
            time_step: 1e-3,
            substeps: 10,
            seed: 1,
            draw_trails: false,
            camera: Camera::default(),
            bodies,
        };
        Scene::from_config(&cfg).unwrap()
    }

    #[test]
    fn test_central_mass_interleaved_by_depth() {
        let bodies = [5.0, -3.0, 2.0];
        let order = depth_order(&bodies, 0.0);
        assert_eq!(
            order,
            vec![
                DrawItem::Body(1),
                DrawItem::CentralMass,
                DrawItem::Body(2),
                DrawItem::Body(0)
            ]
        );
        assert_eq!(depths_of(&order, &bodies, 0.0), vec![-3.0, 0.0, 2.0, 5.0]);
    }

    #[test]
    fn test_central_mass_nearest_is_still_drawn() {
        let order = depth_order(&[-1.0, -2.0], 10.0);
        assert_eq!(
            order,
            vec![DrawItem::Body(1), DrawItem::Body(0), DrawItem::CentralMass]
        );
    }

    #[test]
    fn test_ties_keep_input_order_and_bodies_first() {
        let order = depth_order(&[1.0, 0.0, 1.0, 0.0], 0.0);
        assert_eq!(
            order,
            vec![
                DrawItem::Body(1),
                DrawItem::Body(3),
                DrawItem::CentralMass,
                DrawItem::Body(0),
                DrawItem::Body(2)
            ]
        );
    }

    #[test]
    fn test_no_bodies_draws_central_mass() {
        assert_eq!(depth_order(&[], 0.0), vec![DrawItem::CentralMass]);
    }

    #[test]
    fn test_non_finite_depths_skipped() {
        let order = depth_order(&[f64::NAN, 1.0], 0.0);
        assert_eq!(order, vec![DrawItem::CentralMass, DrawItem::Body(1)]);
    }

    #[test]
    fn test_compositor_draws_bodies_with_flares() {
        let scene = scene_with(vec![
            OrbitalElements::from([0.0, 0.0, 5.0, 1.0, 0.0, 0.0]),
            OrbitalElements::from([0.0, 0.0, -5.0, 1.0, 0.0, 0.0]),
        ]);
        let mut surface = RecordingSurface::default();
        Compositor::default().draw(&scene, &mut surface);

        // Body 1 (z = -5), central mass, body 0 (z = 5); sprite + flare per body
        let sides: Vec<usize> = surface.sprites.iter().map(|s| s.0).collect();
        assert_eq!(sides, vec![60, 60, 40, 60, 60]);
        assert_eq!(surface.sprites[0].1, DVec3::new(300.0, 200.0, -5.0));
        assert_eq!(surface.sprites[2].1, DVec3::new(300.0, 200.0, 0.0));
        assert_eq!(surface.sprites[4].1, DVec3::new(300.0, 200.0, 5.0));
        assert!(surface.lines.is_empty());
    }

    #[test]
    fn test_compositor_without_flares() {
        let scene = scene_with(vec![OrbitalElements::from([3.0, 0.0, 0.0, 0.0, 0.5, 0.0])]);
        let compositor = Compositor {
            show_flares: false,
            ..Default::default()
        };
        let mut surface = RecordingSurface::default();
        compositor.draw(&scene, &mut surface);
        assert_eq!(surface.sprites.len(), 2);
    }

    #[test]
    fn test_sprites_scaled_by_zoom() {
        let mut scene = scene_with(vec![OrbitalElements::from([3.0, 0.0, 0.0, 0.0, 0.5, 0.0])]);
        let input = FrameInput {
            camera: Some(Camera::new(0.0, 0.0, 2.5)),
            ..Default::default()
        };
        tick(&mut scene, &input);
        let mut surface = RecordingSurface::default();
        Compositor::default().draw(&scene, &mut surface);
        assert!(surface.sprites.iter().all(|s| s.2 == 2.5));
    }

    #[test]
    fn test_trails_drawn_last_through_camera() {
        let mut scene = scene_with(vec![OrbitalElements::from([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])]);
        for _ in 0..60 {
            tick(&mut scene, &FrameInput::default());
        }
        let camera = Camera::new(0.4, 0.9, 3.0);
        let input = FrameInput {
            camera: Some(camera),
            toggle_trails: true,
            ..Default::default()
        };
        tick(&mut scene, &input);
        assert_eq!(scene.bodies[0].trail.len(), 10);

        let mut surface = RecordingSurface::default();
        Compositor::default().draw(&scene, &mut surface);

        assert_eq!(surface.lines.len(), 10 - crate::consts::TRAIL_TAIL_SKIP);
        assert_eq!(surface.sprites_after_lines, 0);

        let first = *scene.bodies[0].trail.iter().next().unwrap();
        let expected = camera.project(scene.central.position, first);
        assert!((surface.lines[0].0 - expected).length() < 1e-9);
    }

    #[test]
    fn test_diverged_body_not_drawn() {
        let mut scene = scene_with(vec![
            OrbitalElements::from([1.0, 0.0, 0.5, 0.0, 1.0, 0.0]),
            OrbitalElements::from([0.0, 0.0, -2.0, 0.0, 0.7, 0.0]),
        ]);
        scene.bodies[1].velocity = DVec3::splat(f64::NAN);
        tick(&mut scene, &FrameInput::default());
        assert!(scene.bodies[1].is_diverged());
        assert_eq!(scene.diverged_count(), 1);
        // Body 0 keeps z = 0.5, in front of the central mass
        assert_eq!(
            draw_order(&scene),
            vec![DrawItem::CentralMass, DrawItem::Body(0)]
        );

        let mut surface = RecordingSurface::default();
        Compositor::default().draw(&scene, &mut surface);
        assert_eq!(surface.sprites.len(), 3);
    }

    #[test]
    fn test_body_level_with_central_mass_drawn_first() {
        let mut scene = scene_with(vec![OrbitalElements::from([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])]);
        tick(&mut scene, &FrameInput::default());
        assert_eq!(scene.bodies[0].depth(), scene.central_screen_position.z);
        assert_eq!(
            draw_order(&scene),
            vec![DrawItem::Body(0), DrawItem::CentralMass]
        );
    }

    #[test]
    fn test_diverged_body_trail_not_drawn() {
        let mut scene = scene_with(vec![
            OrbitalElements::from([1.0, 0.0, 0.0, 0.0, 1.0, 0.0]),
            OrbitalElements::from([0.0, 2.0, 0.0, -0.7, 0.0, 0.0]),
        ]);
        scene.draw_trails = true;
        for _ in 0..60 {
            tick(&mut scene, &FrameInput::default());
        }
        let mut surface = RecordingSurface::default();
        Compositor::default().draw(&scene, &mut surface);
        assert_eq!(surface.lines.len(), 2 * (10 - crate::consts::TRAIL_TAIL_SKIP));

        scene.bodies[0].velocity = DVec3::splat(f64::NAN);
        tick(&mut scene, &FrameInput::default());
        assert!(scene.bodies[0].is_diverged());
        assert_eq!(scene.bodies[0].trail.len(), 10);

        let mut surface = RecordingSurface::default();
        Compositor::default().draw(&scene, &mut surface);
        // Only body 1: its sprite and flare, its trail
        assert_eq!(surface.sprites.len(), 3);
        assert_eq!(surface.lines.len(), 10 - crate::consts::TRAIL_TAIL_SKIP);
    }

    proptest! {
        #[test]
        fn prop_every_entity_drawn_once_in_depth_order(
            bodies in prop::collection::vec(-1000.0f64..1000.0, 0..40),
            central in -1000.0f64..1000.0,
        ) {
            let order = depth_order(&bodies, central);
            prop_assert_eq!(order.len(), bodies.len() + 1);
            prop_assert_eq!(order.iter().filter(|i| **i == DrawItem::CentralMass).count(), 1);

            let mut seen = vec![false; bodies.len()];
            for item in &order {
                if let DrawItem::Body(i) = item {
                    prop_assert!(!seen[*i]);
                    seen[*i] = true;
                }
            }

            let depths = depths_of(&order, &bodies, central);
            prop_assert!(depths.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
