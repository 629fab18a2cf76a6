//! Camera orientation and the scene-to-screen transform

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// Orientation (pitch about the horizontal axis, yaw about the vertical axis)
/// and zoom supplied by the host each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pitch: f64,
    pub yaw: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pitch: 0.0,
            yaw: 0.0,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn new(pitch: f64, yaw: f64, zoom: f64) -> Self {
        Self { pitch, yaw, zoom }
    }

    /// Angles must be finite and zoom finite and positive
    pub fn is_valid(&self) -> bool {
        self.pitch.is_finite() && self.yaw.is_finite() && self.zoom.is_finite() && self.zoom > 0.0
    }

    /// `translate(anchor) · rotate_x(pitch) · rotate_y(yaw) · scale(zoom)`
    ///
    /// Applied to an offset from the anchor it yields the screen-space point;
    /// the third component is the depth sort key.
    pub fn transform(&self, anchor: DVec3) -> DMat4 {
        DMat4::from_translation(anchor)
            * DMat4::from_rotation_x(self.pitch)
            * DMat4::from_rotation_y(self.yaw)
            * DMat4::from_scale(DVec3::splat(self.zoom))
    }

    /// Screen-space `(x, y, depth)` of a point at `offset` from `anchor`
    #[inline]
    pub fn project(&self, anchor: DVec3, offset: DVec3) -> DVec3 {
        self.transform(anchor).transform_point3(offset)
    }
}
