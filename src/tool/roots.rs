use std::collections::HashSet;
use std::hash::Hash;

use crate::scene_graph::{CollectionId, ObjectId, Scene};
use crate::tool::error::{TransformError, TransformResult};

/// Members whose parent is absent or outside the membership set. These are
/// the only objects transformed directly; every other member follows its
/// parent through the hierarchy.
///
/// The result is sorted so repeated runs visit roots in the same order.
pub fn select_roots<T, F>(members: &HashSet<T>, parent_of: F) -> Vec<T>
where
    T: Copy + Eq + Hash + Ord,
    F: Fn(T) -> Option<T>,
{
    let mut roots: Vec<T> = members
        .iter()
        .copied()
        .filter(|&member| match parent_of(member) {
            Some(parent) => !members.contains(&parent),
            None => true,
        })
        .collect();

    roots.sort();
    roots
}

pub fn scene_roots(scene: &Scene, members: &HashSet<ObjectId>) -> Vec<ObjectId> {
    select_roots(members, |id| {
        scene.get_object(id).and_then(|object| object.parent_id)
    })
}

/// A collection resolved against the scene at operation time.
#[derive(Debug, Clone)]
pub struct CollectionTarget {
    pub collection_id: CollectionId,
    pub name: String,
    pub members: HashSet<ObjectId>,
    pub roots: Vec<ObjectId>,
}

impl CollectionTarget {
    pub fn resolve(scene: &Scene, collection_id: CollectionId) -> TransformResult<Self> {
        let collection = scene
            .get_collection(collection_id)
            .ok_or(TransformError::UnknownCollection)?;
        let members = scene.collection_members(collection_id);
        let roots = scene_roots(scene, &members);

        Ok(Self {
            collection_id,
            name: collection.name.clone(),
            members,
            roots,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::{Collection, Object3D};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    #[test]
    fn parent_outside_membership_makes_root() {
        // 0 -> 1 -> 2, 3 standalone; members {1, 2, 3}
        let parents: HashMap<u32, u32> = HashMap::from([(1, 0), (2, 1)]);
        let members = HashSet::from([1, 2, 3]);

        let roots = select_roots(&members, |id| parents.get(&id).copied());
        assert_eq!(roots, vec![1, 3]);
    }

    #[test]
    fn empty_membership_has_no_roots() {
        let members: HashSet<u32> = HashSet::new();
        assert!(select_roots(&members, |_| None).is_empty());
    }

    #[test]
    fn random_forests_satisfy_root_invariants() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..200 {
            let count: u32 = rng.gen_range(1..40);
            let mut parents = HashMap::new();
            for id in 1..count {
                if rng.gen_bool(0.7) {
                    parents.insert(id, rng.gen_range(0..id));
                }
            }
            let members: HashSet<u32> = (0..count).filter(|_| rng.gen_bool(0.6)).collect();
            let parent_of = |id: u32| parents.get(&id).copied();

            let roots = select_roots(&members, parent_of);
            let root_set: HashSet<u32> = roots.iter().copied().collect();

            for &member in &members {
                let parent_in_members = parent_of(member).is_some_and(|p| members.contains(&p));
                assert_eq!(root_set.contains(&member), !parent_in_members);

                // Walking up through members always ends at a root
                let mut current = member;
                while !root_set.contains(&current) {
                    current = parent_of(current).expect("non-root member has a parent");
                    assert!(members.contains(&current));
                }
            }
        }
    }

    #[test]
    fn collection_target_resolves_roots_from_scene() {
        let mut scene = Scene::new();
        let outside = scene.add_object(Object3D::new("Outside"));
        let a = scene.add_object(Object3D::new("A"));
        let b = scene.add_object(Object3D::new("B"));
        scene.set_object_parent(a, Some(outside));
        scene.set_object_parent(b, Some(a));

        let collection = scene.add_collection(Collection::new("Props"));
        scene.link_object(collection, a);
        scene.link_object(collection, b);

        let target = CollectionTarget::resolve(&scene, collection).unwrap();
        assert_eq!(target.name, "Props");
        assert_eq!(target.roots, vec![a]);
        assert_eq!(target.members.len(), 2);
    }
}
