use glam::Vec3;

use crate::tool::error::{TransformError, TransformResult};

/// The world-space change the user dialled in: translation, XYZ Euler
/// rotation in radians, and per-axis scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformDelta {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl TransformDelta {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Builds a delta from a rotation given in degrees, as the UI presents it.
    pub fn from_degrees(translation: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation: degrees_to_radians(rotation_degrees),
            scale,
        }
    }

    pub fn rotation_degrees(&self) -> Vec3 {
        Vec3::new(
            self.rotation.x.to_degrees(),
            self.rotation.y.to_degrees(),
            self.rotation.z.to_degrees(),
        )
    }

    /// True when every field sits exactly at its default.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn reset(&mut self) {
        *self = Self::IDENTITY;
    }

    /// Rejects scale components below `floor` (including NaN).
    pub fn validate(&self, floor: f32) -> TransformResult<()> {
        for (axis, value) in ['x', 'y', 'z'].into_iter().zip(self.scale.to_array()) {
            if value.is_nan() || value < floor {
                return Err(TransformError::InvalidScale { axis, value, floor });
            }
        }

        Ok(())
    }
}

impl Default for TransformDelta {
    fn default() -> Self {
        Self::IDENTITY
    }
}

pub fn degrees_to_radians(degrees: Vec3) -> Vec3 {
    Vec3::new(
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Input constraint for scale properties: every component at least `floor`.
pub fn clamp_scale(scale: Vec3, floor: f32) -> Vec3 {
    scale.max(Vec3::splat(floor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn default_is_identity() {
        assert!(TransformDelta::default().is_identity());

        let moved = TransformDelta {
            translation: Vec3::X,
            ..Default::default()
        };
        assert!(!moved.is_identity());
    }

    #[test]
    fn from_degrees_converts_rotation_only() {
        let delta = TransformDelta::from_degrees(
            Vec3::new(90.0, 0.0, 0.0),
            Vec3::new(90.0, 180.0, 0.0),
            Vec3::splat(90.0),
        );

        assert_eq!(delta.translation, Vec3::new(90.0, 0.0, 0.0));
        assert!(delta.rotation.abs_diff_eq(Vec3::new(FRAC_PI_2, PI, 0.0), 1e-6));
        assert_eq!(delta.scale, Vec3::splat(90.0));
        assert!(delta
            .rotation_degrees()
            .abs_diff_eq(Vec3::new(90.0, 180.0, 0.0), 1e-4));
    }

    #[test]
    fn validate_rejects_scale_below_floor() {
        let mut delta = TransformDelta::IDENTITY;
        assert!(delta.validate(0.0001).is_ok());

        delta.scale.y = 0.0;
        assert_eq!(
            delta.validate(0.0001),
            Err(TransformError::InvalidScale {
                axis: 'y',
                value: 0.0,
                floor: 0.0001
            })
        );

        delta.scale = Vec3::new(1.0, 1.0, f32::NAN);
        assert!(delta.validate(0.0001).is_err());
    }

    #[test]
    fn clamp_scale_enforces_floor() {
        let clamped = clamp_scale(Vec3::new(-2.0, 0.0, 3.0), 0.0001);
        assert_eq!(clamped, Vec3::new(0.0001, 0.0001, 3.0));
        assert!(TransformDelta {
            scale: clamped,
            ..Default::default()
        }
        .validate(0.0001)
        .is_ok());
    }
}
