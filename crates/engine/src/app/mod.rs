pub mod collision;
pub mod grid;
pub mod input;
pub mod rendering;
pub mod scene;
pub mod sequence;
pub mod session;

pub use collision::{movement_delta, position_clear, resolve_movement};
pub use grid::{CollisionRule, Pos, SceneError, SpriteRef, Tile, TileCoord, TILE_SIZE_PX};
pub use input::{InputAction, InputSnapshot};
pub use rendering::{DrawCall, RecordingRenderer, SpriteRenderer};
pub use scene::{BehaviourFn, ObjectBehaviour, Scene, ScriptedObject};
pub use sequence::{Sequence, SequenceExecutor, SequenceStep, StepContext, StepStatus, TextAdvance};
pub use session::{
    CardinalFacing, GameWorld, Player, SceneLoadError, SceneScript, ScriptRegistry, Session,
};
