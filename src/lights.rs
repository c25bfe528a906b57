use glam::{Quat, Vec3};

use crate::types::GpuLight;

/// Per-frame spotlight steering step, radians
pub const SPOT_STEER_STEP: f32 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Point,
    Spot,
    Directional,
}

/// A single light; `direction` and the cutoff cosines only matter for the
/// spot and directional kinds
#[derive(Debug, Clone, Copy)]
pub struct LightSource {
    pub kind: LightKind,
    pub position: Vec3,
    pub color: Vec3,
    pub direction: Vec3,
    /// Cosine of the spot's inner cone angle
    pub cut_off: f32,
    /// Cosine of the spot's outer cone angle
    pub outer_cut_off: f32,
}

impl LightSource {
    pub fn new(kind: LightKind, position: Vec3, color: Vec3) -> Self {
        Self {
            kind,
            position,
            color,
            direction: Vec3::ONE,
            cut_off: 12.5f32.to_radians().cos(),
            outer_cut_off: 17.5f32.to_radians().cos(),
        }
    }

    /// Rotate the direction around the world vertical axis
    pub fn yaw(&mut self, angle: f32) {
        self.direction = (Quat::from_rotation_y(angle) * self.direction).normalize();
    }

    /// Rotate the direction around its own right axis
    pub fn pitch(&mut self, angle: f32) {
        let right = self.direction.cross(Vec3::Y).normalize();
        self.direction = (Quat::from_axis_angle(right, angle) * self.direction).normalize();
    }

    pub fn to_gpu(&self) -> GpuLight {
        GpuLight {
            position: self.position.to_array(),
            cut_off: self.cut_off,
            color: self.color.to_array(),
            outer_cut_off: self.outer_cut_off,
            direction: self.direction.normalize_or_zero().to_array(),
            _pad: 0.0,
        }
    }
}
