use std::collections::HashMap;

use thiserror::Error;
use tracing::{info, warn};

use crate::content::{deserialize_scene, AssetError, AssetStore, SceneFormatError};

use super::collision::{movement_delta, resolve_movement};
use super::grid::{Pos, SpriteRef, TileCoord, TILE_SIZE_PX};
use super::input::InputSnapshot;
use super::rendering::SpriteRenderer;
use super::scene::{ObjectBehaviour, Scene};
use super::sequence::{SequenceExecutor, StepContext};

pub const PLAYER_HALF_WIDTH_PX: f32 = 6.0;
pub const PLAYER_MOVE_SPEED_PX_PER_SECOND: f32 = 96.0;
pub const CONVEYOR_SPEED_PX_PER_SECOND: f32 = 64.0;

const SCENE_ASSET_DIR: &str = "scenes";
const DEFAULT_START_KEY: &str = "default";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CardinalFacing {
    North,
    #[default]
    South,
    East,
    West,
}

impl CardinalFacing {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub pos: Pos,
    pub facing: CardinalFacing,
    pub half_width: f32,
    pub move_speed: f32,
    /// Set by cutscene code steps to suspend movement.
    pub frozen: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Pos::default(),
            facing: CardinalFacing::default(),
            half_width: PLAYER_HALF_WIDTH_PX,
            move_speed: PLAYER_MOVE_SPEED_PX_PER_SECOND,
            frozen: false,
        }
    }
}

/// The explicit game context threaded through behaviours and sequence steps:
/// the single sequence slot, named boolean flags, the player, the dialogue
/// line a host shows while a text step is active, the global interaction
/// lock, and the pending scene-change request.
#[derive(Default)]
pub struct GameWorld {
    pub executor: SequenceExecutor,
    pub player: Player,
    flags: HashMap<String, bool>,
    dialogue: Option<String>,
    interaction_locked: bool,
    pending_scene: Option<String>,
}

impl GameWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_flag(&mut self, name: &str, value: bool) {
        self.flags.insert(name.to_string(), value);
    }

    /// Unset flags read as false.
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn set_dialogue(&mut self, text: String) {
        self.dialogue = Some(text);
    }

    pub fn clear_dialogue(&mut self) {
        self.dialogue = None;
    }

    pub fn dialogue(&self) -> Option<&str> {
        self.dialogue.as_deref()
    }

    pub fn prevent_interaction(&mut self) {
        self.interaction_locked = true;
    }

    pub fn allow_interaction(&mut self) {
        self.interaction_locked = false;
    }

    pub fn interaction_allowed(&self) -> bool {
        !self.interaction_locked
    }

    /// Records a scene change for the session to perform at the end of the
    /// current frame.
    pub fn request_scene(&mut self, name: impl Into<String>) {
        self.pending_scene = Some(name.into());
    }

    fn take_pending_scene(&mut self) -> Option<String> {
        self.pending_scene.take()
    }
}

/// The contract a named scene script implements to plug into the session.
/// `on_frame` is called every frame while the scene is active, after input
/// and sequence processing for that frame (mutate-then-render ordering).
pub trait SceneScript {
    fn on_enter(&mut self, prev_scene: &str, world: &mut GameWorld, scene: &mut Scene);

    fn on_exit(&mut self, _world: &mut GameWorld, _scene: &mut Scene) {}

    fn on_frame(&mut self, _world: &mut GameWorld, _scene: &mut Scene) {}

    /// Observes every interaction dispatch, after the behaviour callback.
    fn on_interaction(&mut self, _world: &mut GameWorld, _scene: &mut Scene, _pos: Pos, _data: &str) {
    }

    /// Spawn tile when arriving from `prev_scene`. The session falls back to
    /// the `"default"` key, then to whatever `on_enter` sets.
    fn start_tile(&self, _prev_scene: &str) -> Option<TileCoord> {
        None
    }
}

type ScriptCtor = Box<dyn Fn() -> Box<dyn SceneScript>>;

/// Scene-script selection by name at load time.
#[derive(Default)]
pub struct ScriptRegistry {
    constructors: HashMap<String, ScriptCtor>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn() -> Box<dyn SceneScript> + 'static,
    ) {
        self.constructors.insert(name.into(), Box::new(constructor));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub fn instantiate(&self, name: &str) -> Option<Box<dyn SceneScript>> {
        self.constructors.get(name).map(|constructor| constructor())
    }
}

#[derive(Debug, Error)]
pub enum SceneLoadError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("failed to decode scene '{name}'")]
    Format {
        name: String,
        #[source]
        source: SceneFormatError,
    },
    #[error("no scene script registered under '{name}'")]
    UnknownScript { name: String },
}

/// Owns the active scene, its script, and the game world, and drives one
/// logical tick per rendered frame. Single-threaded by construction: every
/// mutator (behaviour callbacks, sequence steps, movement) runs inside the
/// frame tick.
pub struct Session {
    assets: AssetStore,
    registry: ScriptRegistry,
    world: GameWorld,
    scene: Scene,
    script: Option<Box<dyn SceneScript>>,
    scene_name: String,
    last_player_tile: TileCoord,
}

impl Session {
    pub fn new(assets: AssetStore, registry: ScriptRegistry) -> Self {
        Self {
            assets,
            registry,
            world: GameWorld::new(),
            scene: Scene::new(""),
            script: None,
            scene_name: String::new(),
            last_player_tile: TileCoord::default(),
        }
    }

    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut GameWorld {
        &mut self.world
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn scene_name(&self) -> &str {
        &self.scene_name
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn enter_scene(&mut self, name: &str) -> Result<(), SceneLoadError> {
        self.switch_scene(name)
    }

    /// One logical tick: sequence, movement, walk-over dispatch, interaction
    /// dispatch, the script's frame hook, then any pending scene change.
    pub fn update(&mut self, dt_seconds: f32, input: &InputSnapshot) -> Result<(), SceneLoadError> {
        self.run_active_sequence(dt_seconds, input);
        if !self.world.player.frozen {
            self.update_player(dt_seconds, input);
            self.apply_conveyors(dt_seconds);
            self.dispatch_walk_overs();
        }
        if input.interact_pressed() && self.world.interaction_allowed() {
            self.dispatch_interaction();
        }
        if let Some(mut script) = self.script.take() {
            script.on_frame(&mut self.world, &mut self.scene);
            self.script = Some(script);
        }
        if let Some(next) = self.world.take_pending_scene() {
            self.switch_scene(&next)?;
        }
        Ok(())
    }

    /// Draws tile sprite stacks in z order, then scripted objects in
    /// insertion order. Tiles are walked row-major for determinism.
    pub fn render(&self, renderer: &mut dyn SpriteRenderer) {
        let mut entries: Vec<(TileCoord, &super::grid::Tile)> = self.scene.tiles().collect();
        entries.sort_by_key(|(coord, _)| (coord.y, coord.x));
        for (coord, tile) in entries {
            let origin = coord.origin_pos();
            let mut stack: Vec<&SpriteRef> = tile.sprites.iter().collect();
            stack.sort_by_key(|sprite| sprite.z_index);
            for sprite in stack {
                renderer.draw_sprite(sprite, origin, TILE_SIZE_PX, TILE_SIZE_PX);
            }
        }
        for object in self.scene.objects() {
            renderer.draw_sprite(&object.sprite, object.world_pos, TILE_SIZE_PX, TILE_SIZE_PX);
        }
    }

    fn run_active_sequence(&mut self, dt_seconds: f32, input: &InputSnapshot) {
        let Some(mut sequence) = self.world.executor.take_active() else {
            return;
        };
        let mut ctx = StepContext {
            dt_seconds,
            input,
            world: &mut self.world,
            scene: &mut self.scene,
        };
        sequence.execute(&mut ctx);
        if !sequence.is_complete() {
            self.world.executor.restore(sequence);
        }
    }

    fn update_player(&mut self, dt_seconds: f32, input: &InputSnapshot) {
        let delta = movement_delta(input, dt_seconds, self.world.player.move_speed);
        if delta != Pos::default() {
            self.world.player.facing = facing_from_delta(delta, self.world.player.facing);
            self.world.player.pos = resolve_movement(
                &self.scene,
                self.world.player.pos,
                delta,
                self.world.player.half_width,
            );
        }
    }

    fn apply_conveyors(&mut self, dt_seconds: f32) {
        let player_tile = self.world.player.pos.to_tile();
        let Some(direction) = self
            .scene
            .objects()
            .iter()
            .find(|object| {
                object.behaviour == ObjectBehaviour::ConveyorBelt && object.tile() == player_tile
            })
            .map(|object| object.data.clone())
        else {
            return;
        };
        let Some((dx, dy)) = direction_delta(&direction) else {
            warn!(direction = %direction, "conveyor_direction_unknown");
            return;
        };
        let push = Pos::new(
            dx * CONVEYOR_SPEED_PX_PER_SECOND * dt_seconds,
            dy * CONVEYOR_SPEED_PX_PER_SECOND * dt_seconds,
        );
        self.world.player.pos = resolve_movement(
            &self.scene,
            self.world.player.pos,
            push,
            self.world.player.half_width,
        );
    }

    /// Fires `Walkable` behaviours once per tile entry.
    fn dispatch_walk_overs(&mut self) {
        let tile = self.world.player.pos.to_tile();
        if tile == self.last_player_tile {
            return;
        }
        self.last_player_tile = tile;
        let triggers: Vec<(Pos, String)> = self
            .scene
            .objects()
            .iter()
            .filter(|object| {
                object.behaviour == ObjectBehaviour::Walkable && object.tile() == tile
            })
            .map(|object| (object.world_pos, object.data.clone()))
            .collect();
        for (pos, data) in triggers {
            self.scene.invoke_behaviour(&data, &mut self.world, pos, &data);
        }
    }

    /// Resolves the tile the player faces, finds the first scripted object on
    /// it, and dispatches per behaviour kind. `Sign`/`Button`/`Chest`/`Npc`
    /// use fixed registry keys with the object's data as payload;
    /// `Interactable` uses its data as the key; `ChangeScene` bypasses the
    /// registry entirely.
    fn dispatch_interaction(&mut self) {
        let (dx, dy) = self.world.player.facing.delta();
        let target_tile = self.world.player.pos.to_tile().offset(dx, dy);
        let Some((pos, behaviour, data)) = self
            .scene
            .objects()
            .iter()
            .find(|object| object.tile() == target_tile)
            .map(|object| (object.world_pos, object.behaviour, object.data.clone()))
        else {
            return;
        };

        match behaviour {
            ObjectBehaviour::ChangeScene => {
                self.world.request_scene(data.clone());
            }
            ObjectBehaviour::Button => {
                // The pressed state flips before the callback so puzzle
                // logic polls a consistent post-press pattern.
                self.scene.toggle_button(target_tile);
                self.scene
                    .invoke_behaviour("button", &mut self.world, pos, &data);
            }
            ObjectBehaviour::Sign => {
                self.scene
                    .invoke_behaviour("sign", &mut self.world, pos, &data);
            }
            ObjectBehaviour::Chest => {
                self.scene
                    .invoke_behaviour("chest", &mut self.world, pos, &data);
            }
            ObjectBehaviour::Npc => {
                self.scene
                    .invoke_behaviour("npc", &mut self.world, pos, &data);
            }
            ObjectBehaviour::Interactable => {
                let key = data.clone();
                self.scene
                    .invoke_behaviour(&key, &mut self.world, pos, &data);
            }
            ObjectBehaviour::None
            | ObjectBehaviour::Walkable
            | ObjectBehaviour::ConveyorBelt => return,
        }

        if let Some(mut script) = self.script.take() {
            script.on_interaction(&mut self.world, &mut self.scene, pos, &data);
            self.script = Some(script);
        }
    }

    fn switch_scene(&mut self, name: &str) -> Result<(), SceneLoadError> {
        let path = format!("{SCENE_ASSET_DIR}/{name}.json");
        let raw = self.assets.text(&path)?;
        let mut next_scene =
            deserialize_scene(raw, name).map_err(|source| SceneLoadError::Format {
                name: name.to_string(),
                source,
            })?;
        let mut next_script =
            self.registry
                .instantiate(name)
                .ok_or_else(|| SceneLoadError::UnknownScript {
                    name: name.to_string(),
                })?;

        if let Some(mut script) = self.script.take() {
            script.on_exit(&mut self.world, &mut self.scene);
        }

        let prev_name = std::mem::replace(&mut self.scene_name, name.to_string());
        let spawn = next_script
            .start_tile(&prev_name)
            .or_else(|| next_script.start_tile(DEFAULT_START_KEY));
        if let Some(tile) = spawn {
            self.world.player.pos = tile.origin_pos();
        }
        next_script.on_enter(&prev_name, &mut self.world, &mut next_scene);

        self.scene = next_scene;
        self.script = Some(next_script);
        self.last_player_tile = self.world.player.pos.to_tile();
        info!(
            scene = name,
            prev = %prev_name,
            tiles = self.scene.tile_count(),
            objects = self.scene.objects().len(),
            "scene_entered"
        );
        Ok(())
    }
}

fn facing_from_delta(delta: Pos, current: CardinalFacing) -> CardinalFacing {
    if delta.x == 0.0 && delta.y == 0.0 {
        return current;
    }
    if delta.x.abs() >= delta.y.abs() {
        if delta.x > 0.0 {
            CardinalFacing::East
        } else {
            CardinalFacing::West
        }
    } else if delta.y > 0.0 {
        CardinalFacing::South
    } else {
        CardinalFacing::North
    }
}

fn direction_delta(code: &str) -> Option<(f32, f32)> {
    match code {
        "N" => Some((0.0, -1.0)),
        "S" => Some((0.0, 1.0)),
        "E" => Some((1.0, 0.0)),
        "W" => Some((-1.0, 0.0)),
        _ => None,
    }
}
