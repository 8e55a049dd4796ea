//! Builds the single affine matrix applied to a collection.
//!
//! ```text
//! M = T(translation) · T(pivot) · Rz · Ry · Rx · S · T(-pivot)
//! ```
//!
//! Rotation is XYZ Euler with Z outermost: X is applied to the object first.
//! The pivot only brackets rotation and scale, never the translation.

use glam::{Mat4, Vec3};

use crate::tool::delta::TransformDelta;

pub fn rotation_matrix(rotation: Vec3) -> Mat4 {
    Mat4::from_rotation_z(rotation.z)
        * Mat4::from_rotation_y(rotation.y)
        * Mat4::from_rotation_x(rotation.x)
}

/// `R · S`, no translation and no pivot.
pub fn rotation_scale_matrix(rotation: Vec3, scale: Vec3) -> Mat4 {
    rotation_matrix(rotation) * Mat4::from_scale(scale)
}

/// Wraps a precomputed `R · S` block around `pivot` and adds the translation.
pub fn pivoted_matrix(translation: Vec3, rotation_scale: Mat4, pivot: Vec3) -> Mat4 {
    Mat4::from_translation(translation)
        * Mat4::from_translation(pivot)
        * rotation_scale
        * Mat4::from_translation(-pivot)
}

pub fn compose_matrix(delta: &TransformDelta, pivot: Vec3) -> Mat4 {
    pivoted_matrix(
        delta.translation,
        rotation_scale_matrix(delta.rotation, delta.scale),
        pivot,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f32::consts::{FRAC_PI_2, PI};

    fn random_vec3(rng: &mut StdRng, range: std::ops::Range<f32>) -> Vec3 {
        Vec3::new(
            rng.gen_range(range.clone()),
            rng.gen_range(range.clone()),
            rng.gen_range(range),
        )
    }

    #[test]
    fn translation_only_ignores_pivot() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..100 {
            let delta = TransformDelta {
                translation: random_vec3(&mut rng, -50.0..50.0),
                ..Default::default()
            };
            let pivot = random_vec3(&mut rng, -50.0..50.0);

            let matrix = compose_matrix(&delta, pivot);
            assert!(matrix.abs_diff_eq(Mat4::from_translation(delta.translation), 1e-4));
        }
    }

    #[test]
    fn pivot_point_stays_fixed_under_rotation_and_scale() {
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..100 {
            let delta = TransformDelta {
                translation: Vec3::ZERO,
                rotation: random_vec3(&mut rng, -PI..PI),
                scale: random_vec3(&mut rng, 0.1..4.0),
            };
            let pivot = random_vec3(&mut rng, -20.0..20.0);

            let matrix = compose_matrix(&delta, pivot);
            assert!(matrix.transform_point3(pivot).abs_diff_eq(pivot, 1e-3));
        }
    }

    #[test]
    fn rotation_order_applies_x_first() {
        // X then Z: +Y goes to +Z under X, and +Z is unaffected by Z
        let delta = TransformDelta {
            rotation: Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2),
            ..Default::default()
        };
        let matrix = compose_matrix(&delta, Vec3::ZERO);
        assert!(matrix.transform_vector3(Vec3::Y).abs_diff_eq(Vec3::Z, 1e-6));

        // +X is unaffected by X, then Z takes it to +Y
        assert!(matrix.transform_vector3(Vec3::X).abs_diff_eq(Vec3::Y, 1e-6));

        let reversed = Mat4::from_rotation_x(FRAC_PI_2) * Mat4::from_rotation_z(FRAC_PI_2);
        assert!(!matrix.abs_diff_eq(reversed, 1e-3));
    }

    #[test]
    fn scale_is_applied_before_rotation() {
        let delta = TransformDelta {
            rotation: Vec3::new(0.0, 0.0, FRAC_PI_2),
            scale: Vec3::new(2.0, 1.0, 1.0),
            ..Default::default()
        };
        let matrix = compose_matrix(&delta, Vec3::ZERO);

        // Stretched along X, then turned onto Y
        assert!(matrix
            .transform_point3(Vec3::X)
            .abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));
    }

    #[test]
    fn translation_is_added_after_pivoted_block() {
        let delta = TransformDelta {
            translation: Vec3::new(0.0, 0.0, 3.0),
            rotation: Vec3::new(0.0, 0.0, PI),
            scale: Vec3::ONE,
        };
        let pivot = Vec3::new(1.0, 0.0, 0.0);
        let matrix = compose_matrix(&delta, pivot);

        assert!(matrix
            .transform_point3(Vec3::ZERO)
            .abs_diff_eq(Vec3::new(2.0, 0.0, 3.0), 1e-5));
    }
}
