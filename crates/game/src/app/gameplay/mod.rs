use engine::{
    CollisionRule, GameWorld, ObjectBehaviour, Pos, Scene, SceneScript, ScriptRegistry,
    ScriptedObject, Sequence, SequenceStep, SpriteRef, TextAdvance, TileCoord, TILE_SIZE_PX,
};
use tracing::info;

pub(crate) const SCENE_VILLAGE: &str = "village";
const SCENE_DUNGEON: &str = "dungeon";
const SCENE_ICE_CAVERN: &str = "ice_cavern";
const DEFAULT_START_KEY: &str = "default";

const TERRAIN_SHEET: &str = "sheets/terrain";
const PROPS_SHEET: &str = "sheets/props";

const VILLAGE_DEFAULT_SPAWN: TileCoord = TileCoord::new(5, 4);
const VILLAGE_FROM_DUNGEON_SPAWN: TileCoord = TileCoord::new(8, 4);
const VILLAGE_SIGN_TILE: TileCoord = TileCoord::new(3, 4);
const VILLAGE_CHEST_TILE: TileCoord = TileCoord::new(2, 2);
const VILLAGE_DUNGEON_DOOR_TILE: TileCoord = TileCoord::new(9, 4);
const VILLAGE_SIGN_TEXT: &str = "Eastvale. Mind the cave to the east.";
const VILLAGE_CHEST_LOOT: &str = "a rusty key";
const VILLAGE_CHEST_FLAG: &str = "village_chest_opened";

const DUNGEON_DEFAULT_SPAWN: TileCoord = TileCoord::new(0, 1);
const DUNGEON_FROM_VILLAGE_SPAWN: TileCoord = TileCoord::new(-3, 3);
const DUNGEON_NPC_TILE: TileCoord = TileCoord::new(1, 3);
const DUNGEON_VILLAGE_DOOR_TILE: TileCoord = TileCoord::new(-5, 3);
const DUNGEON_ICE_DOOR_TILE: TileCoord = TileCoord::new(5, 3);
const DUNGEON_CONVEYOR_START: TileCoord = TileCoord::new(-2, 5);
const DUNGEON_CONVEYOR_COUNT: usize = 5;
const DUNGEON_NPC_LINES: &str =
    "Turn back, traveler.|The cavern ahead is sealed.|Ten stones hold the gate. Eight want pressing.";

const ICE_DEFAULT_SPAWN: TileCoord = TileCoord::new(5, 8);
const ICE_GATE_TILE: TileCoord = TileCoord::new(5, 1);
const ICE_EXIT_DOOR_TILE: TileCoord = TileCoord::new(5, 0);
const ICE_GATE_MARKER: &str = "ice_gate";
const ICE_BUTTON_ROW_Y: i32 = 7;
const ICE_BUTTON_COUNT: usize = 10;
const ICE_PUZZLE_SOLUTION: &str = "1111111100";
const ICE_PUZZLE_FLAG: &str = "has_solved_ice_puzzle";

include!("scripts.rs");
include!("util.rs");

pub(crate) fn build_script_registry() -> ScriptRegistry {
    let mut registry = ScriptRegistry::new();
    registry.register(SCENE_VILLAGE, || Box::new(VillageScript));
    registry.register(SCENE_DUNGEON, || Box::new(DungeonScript));
    registry.register(SCENE_ICE_CAVERN, || Box::new(IceCavernScript));
    registry
}
