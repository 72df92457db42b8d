pub mod assets;
pub mod scene_format;

pub use assets::{AssetError, AssetStore};
pub use scene_format::{deserialize_scene, serialize_scene, SceneFormatError};
