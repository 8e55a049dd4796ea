use anyhow::Context;
use glam::{Mat4, Quat, Vec3};
use id_arena::Arena;
use std::collections::HashSet;
use std::path::Path;

use crate::scene_graph::collection::{Collection, CollectionId};
use crate::scene_graph::mesh::{Buffers, Mesh};
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::transform::Transform;

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub collections: Arena<Collection>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            collections: Arena::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut Object3D> {
        self.objects.get_mut(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn add_collection(&mut self, collection: Collection) -> CollectionId {
        self.collections.alloc(collection)
    }

    pub fn get_collection(&self, id: CollectionId) -> Option<&Collection> {
        self.collections.get(id)
    }

    pub fn get_collection_by_name(&self, name: &str) -> Option<CollectionId> {
        self.collections
            .iter()
            .find(|(_, collection)| collection.name == name)
            .map(|(id, _)| id)
    }

    pub fn link_object(&mut self, collection_id: CollectionId, object_id: ObjectId) {
        if let Some(collection) = self.collections.get_mut(collection_id) {
            if !collection.object_ids.contains(&object_id) {
                collection.object_ids.push(object_id);
            }
        }
    }

    pub fn link_collection(&mut self, parent_id: CollectionId, child_id: CollectionId) {
        if let Some(parent) = self.collections.get_mut(parent_id) {
            if !parent.child_ids.contains(&child_id) {
                parent.child_ids.push(child_id);
            }
        }
    }

    /// Every object linked into the collection or any of its nested child
    /// collections.
    pub fn collection_members(&self, collection_id: CollectionId) -> HashSet<ObjectId> {
        let mut members = HashSet::new();
        let mut visited = HashSet::new();
        self.collect_members_recursive(collection_id, &mut members, &mut visited);
        members
    }

    fn collect_members_recursive(
        &self,
        collection_id: CollectionId,
        members: &mut HashSet<ObjectId>,
        visited: &mut HashSet<CollectionId>,
    ) {
        if !visited.insert(collection_id) {
            return;
        }

        let Some(collection) = self.collections.get(collection_id) else {
            return;
        };

        members.extend(collection.object_ids.iter().copied());

        for &child_id in &collection.child_ids {
            self.collect_members_recursive(child_id, members, visited);
        }
    }

    /// Loads a glTF file. Every glTF scene becomes a collection holding all of
    /// its nodes.
    pub fn import_gltf(&mut self, path: impl AsRef<Path>) -> anyhow::Result<Vec<CollectionId>> {
        let path = path.as_ref();
        let (document, buffers, _images) = gltf::import(path)
            .with_context(|| format!("Failed to import glTF file {}", path.display()))?;

        let mut collection_ids = Vec::new();
        for scene in document.scenes() {
            collection_ids.push(self.spawn_gltf_scene(&buffers, &scene)?);
        }

        log::debug!(
            "Imported {} collection(s) from {}",
            collection_ids.len(),
            path.display()
        );

        Ok(collection_ids)
    }

    pub fn spawn_gltf_scene(
        &mut self,
        buffers: Buffers,
        scene: &gltf::Scene,
    ) -> anyhow::Result<CollectionId> {
        let name = scene
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("Scene {}", scene.index()));
        let collection_id = self.add_collection(Collection::new(name));

        for node in scene.nodes() {
            self.spawn_gltf_node(buffers, &node, None, collection_id)?;
        }

        self.update_transforms();

        Ok(collection_id)
    }

    fn spawn_gltf_node(
        &mut self,
        buffers: Buffers,
        node: &gltf::Node,
        parent: Option<ObjectId>,
        collection_id: CollectionId,
    ) -> anyhow::Result<ObjectId> {
        let node_name = node.name().unwrap_or("Unnamed").to_string();
        let mut object = Object3D::new(node_name.clone());
        let (translation, rotation, scale) = node.transform().decomposed();

        object.transform.set_transform(
            translation.into(),
            Quat::from_array(rotation),
            scale.into(),
        );

        // Each node owns its own copy so baking one object never touches another
        if let Some(mesh) = node.mesh() {
            let mesh_name = mesh
                .name()
                .map(String::from)
                .unwrap_or_else(|| format!("{} (Mesh)", node_name));
            let mesh = Mesh::from_gltf(mesh_name, mesh, buffers)
                .with_context(|| format!("Failed to read mesh of node {}", node_name))?;
            object.mesh = Some(mesh);
        }

        let object_id = self.add_object(object);

        if let Some(parent_id) = parent {
            self.set_object_parent(object_id, Some(parent_id));
        }

        self.link_object(collection_id, object_id);

        for child in node.children() {
            self.spawn_gltf_node(buffers, &child, Some(object_id), collection_id)?;
        }

        Ok(object_id)
    }

    /// Updates all object transforms in hierarchical order
    pub fn update_transforms(&self) {
        let root_objects = self.objects.iter().filter_map(|(id, object)| {
            if object.parent_id.is_none() {
                Some(id)
            } else {
                None
            }
        });

        for root_id in root_objects {
            self.update_object_transform_recursive(root_id, None);
        }
    }

    fn update_object_transform_recursive(
        &self,
        object_id: ObjectId,
        parent_world_matrix: Option<Mat4>,
    ) {
        if let Some(object) = self.objects.get(object_id) {
            if object.transform.is_world_dirty() {
                let local_matrix = *object.transform.get_local_matrix();
                let world_matrix = match parent_world_matrix {
                    Some(parent_world_matrix) => parent_world_matrix * local_matrix,
                    None => local_matrix,
                };
                object.transform.store_world_matrix(world_matrix);
            }

            let world_matrix = *object.transform.get_world_matrix();
            for &child_id in &object.child_ids {
                self.update_object_transform_recursive(child_id, Some(world_matrix));
            }
        }
    }

    /// Invalidates world transforms for an object and all its descendants
    pub fn invalidate_object_hierarchy(&self, object_id: ObjectId) {
        if let Some(object) = self.objects.get(object_id) {
            object.transform.invalidate_world();

            for &child_id in &object.child_ids {
                self.invalidate_object_hierarchy(child_id);
            }
        }
    }

    /// Sets the parent of an object and updates child relationships. The
    /// local transform is kept, so the object's world placement follows the
    /// new parent.
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if let Some(child) = self.objects.get(child_id) {
            if let Some(old_parent_id) = child.parent_id {
                if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                    old_parent.child_ids.retain(|&id| id != child_id);
                }
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;

            if let Some(new_parent_id) = new_parent_id {
                if let Some(new_parent) = self.objects.get_mut(new_parent_id) {
                    new_parent.child_ids.push(child_id);
                }
            }
        }

        self.invalidate_object_hierarchy(child_id);
    }

    pub fn set_object_transform(
        &mut self,
        object_id: ObjectId,
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_transform(translation, rotation, scale);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    /// Puts back a previously cloned transform verbatim.
    pub fn restore_object_transform(&mut self, object_id: ObjectId, transform: Transform) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform = transform;
        }
        self.invalidate_object_hierarchy(object_id);
    }

    pub fn get_object_transform(&self, object_id: ObjectId) -> Option<&Transform> {
        self.objects.get(object_id).map(|object| &object.transform)
    }

    /// Current world matrix, recomputing stale transforms first.
    pub fn world_matrix(&self, object_id: ObjectId) -> Option<Mat4> {
        let object = self.objects.get(object_id)?;
        if object.transform.is_world_dirty() {
            self.update_transforms();
        }

        let world_matrix = *object.transform.get_world_matrix();
        Some(world_matrix)
    }

    pub fn world_origin(&self, object_id: ObjectId) -> Option<Vec3> {
        self.world_matrix(object_id)
            .map(|world_matrix| world_matrix.w_axis.truncate())
    }

    /// Places an object in world space. The local transform is re-derived
    /// from the parent's current world matrix and descendants follow.
    pub fn set_object_world_matrix(&mut self, object_id: ObjectId, world_matrix: Mat4) {
        let parent_world_matrix = self
            .get_object(object_id)
            .and_then(|object| object.parent_id)
            .and_then(|parent_id| self.world_matrix(parent_id));

        let local_matrix = match parent_world_matrix {
            Some(parent_world_matrix) => parent_world_matrix.inverse() * world_matrix,
            None => world_matrix,
        };

        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_local_matrix(local_matrix);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    /// Number of ancestors above the object.
    pub fn object_depth(&self, object_id: ObjectId) -> usize {
        let mut depth = 0;
        let mut current = self.get_object(object_id).and_then(|object| object.parent_id);

        while let Some(parent_id) = current {
            depth += 1;
            current = self.get_object(parent_id).and_then(|object| object.parent_id);
        }

        depth
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
