use glam::{Mat4, Quat, Vec3};
use std::cell::{Cell, Ref, RefCell};

/// Local translation/rotation/scale of an object, with lazily cached local
/// and world matrices.
///
/// The world matrix is owned by the scene: it is only ever written by
/// [`crate::scene_graph::Scene::update_transforms`], which multiplies the parent's
/// world matrix with this transform's local matrix.
#[derive(Debug, Clone)]
pub struct Transform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,

    local_matrix: RefCell<Mat4>,
    world_matrix: RefCell<Mat4>,
    local_dirty: Cell<bool>,
    world_dirty: Cell<bool>,
}

impl Transform {
    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_trs(translation, Quat::IDENTITY, Vec3::ONE)
    }

    pub fn from_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
            local_matrix: RefCell::new(Mat4::IDENTITY),
            world_matrix: RefCell::new(Mat4::IDENTITY),
            local_dirty: Cell::new(true),
            world_dirty: Cell::new(true),
        }
    }

    pub fn get_local_matrix(&self) -> Ref<Mat4> {
        if self.local_dirty.get() {
            let matrix =
                Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation);

            self.local_matrix.replace(matrix);
            self.local_dirty.set(false);
            self.invalidate_world();
        }

        self.local_matrix.borrow()
    }

    pub fn get_world_matrix(&self) -> Ref<Mat4> {
        self.world_matrix.borrow()
    }

    pub(crate) fn store_world_matrix(&self, world_matrix: Mat4) {
        self.world_matrix.replace(world_matrix);
        self.world_dirty.set(false);
    }

    pub fn invalidate_local(&self) {
        self.local_dirty.set(true);
        self.world_dirty.set(true);
    }

    pub fn invalidate_world(&self) {
        self.world_dirty.set(true);
    }

    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty.get()
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.invalidate_local();
    }

    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
        self.invalidate_local();
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.invalidate_local();
    }

    pub fn set_transform(&mut self, translation: Vec3, rotation: Quat, scale: Vec3) {
        self.translation = translation;
        self.rotation = rotation;
        self.scale = scale;
        self.invalidate_local();
    }

    /// Decomposes an affine local matrix into translation, rotation and scale.
    /// Shear cannot be represented and is dropped.
    pub fn set_local_matrix(&mut self, local_matrix: Mat4) {
        let (scale, rotation, translation) = local_matrix.to_scale_rotation_translation();
        self.set_transform(translation, rotation.normalize(), scale);
    }

    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_translation(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn local_matrix_is_cached_until_invalidated() {
        let mut transform = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            transform.get_local_matrix().w_axis.truncate(),
            Vec3::new(1.0, 2.0, 3.0)
        );

        transform.set_translation(Vec3::new(4.0, 5.0, 6.0));
        assert!(transform.is_world_dirty());
        assert_eq!(
            transform.get_local_matrix().w_axis.truncate(),
            Vec3::new(4.0, 5.0, 6.0)
        );
    }

    #[test]
    fn set_local_matrix_round_trips_trs() {
        let rotation = Quat::from_rotation_z(FRAC_PI_2);
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 3.0, 4.0),
            rotation,
            Vec3::new(-1.0, 0.5, 7.0),
        );

        let mut transform = Transform::default();
        transform.set_local_matrix(matrix);

        assert!(transform.translation().abs_diff_eq(Vec3::new(-1.0, 0.5, 7.0), 1e-5));
        assert!(transform.scale().abs_diff_eq(Vec3::new(2.0, 3.0, 4.0), 1e-5));
        assert!(transform.rotation().abs_diff_eq(rotation, 1e-5));
    }
}
