use id_arena::Id;

use crate::scene_graph::object3d::ObjectId;

pub type CollectionId = Id<Collection>;

/// A named grouping of objects. Collections nest; an object may be linked
/// into any number of them independently of its parent in the hierarchy.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub name: String,
    pub object_ids: Vec<ObjectId>,
    pub child_ids: Vec<CollectionId>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}
