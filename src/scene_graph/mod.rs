pub mod collection;
pub mod mesh;
pub mod object3d;
pub mod scene;
pub mod transform;

pub use collection::{Collection, CollectionId};
pub use mesh::{Mesh, Vertex};
pub use object3d::{Object3D, ObjectId};
pub use scene::Scene;
pub use transform::Transform;
