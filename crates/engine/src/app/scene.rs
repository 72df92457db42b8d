use std::collections::HashMap;
use std::rc::Rc;

use super::grid::{CollisionRule, Pos, SceneError, SpriteRef, Tile, TileCoord};
use super::session::GameWorld;

/// Behaviour tag carried by a scripted object. Trigger-like kinds dispatch a
/// named behaviour on interaction; `Walkable` and `ConveyorBelt` fire on
/// walk-over; `ChangeScene` is routed to the session's scene switcher rather
/// than the behaviour registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ObjectBehaviour {
    #[default]
    None,
    Interactable,
    ChangeScene,
    Sign,
    Button,
    Walkable,
    ConveyorBelt,
    Chest,
    Npc,
}

/// A world-placed entity independent of the tile grid. Several objects may
/// share a tile's footprint; `data` is a behaviour-specific payload (target
/// scene name, dialogue text, direction code, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedObject {
    pub world_pos: Pos,
    pub behaviour: ObjectBehaviour,
    pub data: String,
    pub sprite: SpriteRef,
}

impl ScriptedObject {
    pub fn new(
        world_pos: Pos,
        behaviour: ObjectBehaviour,
        data: impl Into<String>,
        sprite: SpriteRef,
    ) -> Self {
        Self {
            world_pos,
            behaviour,
            data: data.into(),
            sprite,
        }
    }

    /// Places the object on a tile's origin. Interaction matching is
    /// tile-snapped, so objects are conventionally placed at exact tile-size
    /// multiples.
    pub fn at_tile(
        tile: TileCoord,
        behaviour: ObjectBehaviour,
        data: impl Into<String>,
        sprite: SpriteRef,
    ) -> Self {
        Self::new(tile.origin_pos(), behaviour, data, sprite)
    }

    /// Batch placement along an offset pattern: `count` copies of `template`,
    /// the n-th shifted by `step * n`. A convenience for conveyor runs and
    /// decorative chains, not a distinct entity kind.
    pub fn family(template: &ScriptedObject, count: usize, step: Pos) -> Vec<ScriptedObject> {
        (0..count)
            .map(|n| {
                let mut object = template.clone();
                object.world_pos += step * n as f32;
                object
            })
            .collect()
    }

    pub fn tile(&self) -> TileCoord {
        self.world_pos.to_tile()
    }
}

pub type BehaviourFn = dyn Fn(&mut GameWorld, &mut Scene, Pos, &str);

/// The scene store: a sparse tile grid keyed by coordinate, the scripted
/// object list, the named behaviour registry, and per-tile button states.
///
/// A coordinate absent from the grid means "outside the playable map" and is
/// distinct from a present tile with `CollisionRule::None`.
pub struct Scene {
    script_name: String,
    tiles: HashMap<TileCoord, Tile>,
    objects: Vec<ScriptedObject>,
    behaviours: HashMap<String, Rc<BehaviourFn>>,
    button_states: HashMap<TileCoord, bool>,
}

impl Scene {
    pub fn new(script_name: impl Into<String>) -> Self {
        Self {
            script_name: script_name.into(),
            tiles: HashMap::new(),
            objects: Vec::new(),
            behaviours: HashMap::new(),
            button_states: HashMap::new(),
        }
    }

    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    /// Inserts or replaces the tile at `coord`. Always succeeds.
    pub fn set_tile(&mut self, coord: TileCoord, rule: CollisionRule, sprites: Vec<SpriteRef>) {
        self.tiles.insert(coord, Tile::new(rule, sprites));
    }

    /// Wire-index variant used by the editor/decoder path; an out-of-range
    /// rule is rejected before the grid is touched.
    pub fn set_tile_indexed(
        &mut self,
        coord: TileCoord,
        rule_index: u8,
        sprites: Vec<SpriteRef>,
    ) -> Result<(), SceneError> {
        let rule = CollisionRule::from_index(rule_index)?;
        self.set_tile(coord, rule, sprites);
        Ok(())
    }

    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    pub fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        self.tiles.get_mut(&coord)
    }

    /// Idempotent; removing an absent coordinate is a no-op.
    pub fn remove_tile(&mut self, coord: TileCoord) {
        self.tiles.remove(&coord);
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> impl Iterator<Item = (TileCoord, &Tile)> {
        self.tiles.iter().map(|(coord, tile)| (*coord, tile))
    }

    pub fn add_object(&mut self, object: ScriptedObject) {
        self.objects.push(object);
    }

    pub fn add_objects(&mut self, objects: Vec<ScriptedObject>) {
        self.objects.extend(objects);
    }

    /// Insertion order is preserved for deterministic render/interaction
    /// scans.
    pub fn objects(&self) -> &[ScriptedObject] {
        &self.objects
    }

    pub fn remove_object_at(&mut self, index: usize) -> Option<ScriptedObject> {
        if index < self.objects.len() {
            Some(self.objects.remove(index))
        } else {
            None
        }
    }

    pub fn remove_objects_where(&mut self, mut predicate: impl FnMut(&ScriptedObject) -> bool) {
        self.objects.retain(|object| !predicate(object));
    }

    /// First object (in insertion order) whose tile-snapped position matches.
    pub fn object_at_tile(&self, tile: TileCoord) -> Option<&ScriptedObject> {
        self.objects.iter().find(|object| object.tile() == tile)
    }

    /// Registers a named trigger. Re-registering the same name replaces the
    /// previous callback; scene scripts rely on this to scope behaviours to
    /// the current on_enter call.
    pub fn register_behaviour(
        &mut self,
        name: impl Into<String>,
        callback: impl Fn(&mut GameWorld, &mut Scene, Pos, &str) + 'static,
    ) {
        self.behaviours.insert(name.into(), Rc::new(callback));
    }

    pub fn has_behaviour(&self, name: &str) -> bool {
        self.behaviours.contains_key(name)
    }

    /// Invokes the named behaviour, or silently does nothing when the name is
    /// unregistered (behaviours are registered conditionally per on_enter).
    /// The callback may freely mutate the scene, including re-registering
    /// behaviours.
    pub fn invoke_behaviour(&mut self, name: &str, world: &mut GameWorld, pos: Pos, data: &str) {
        let Some(callback) = self.behaviours.get(name).cloned() else {
            return;
        };
        callback(world, self, pos, data);
    }

    pub fn set_button_pressed(&mut self, tile: TileCoord, pressed: bool) {
        self.button_states.insert(tile, pressed);
    }

    /// Flips the persisted pressed state at `tile` and returns the new state.
    pub fn toggle_button(&mut self, tile: TileCoord) -> bool {
        let state = self.button_states.entry(tile).or_insert(false);
        *state = !*state;
        *state
    }

    pub fn button_pressed(&self, tile: TileCoord) -> bool {
        self.button_states.get(&tile).copied().unwrap_or(false)
    }

    /// Pressed states rendered as a bit string in the declared order, for
    /// combination-puzzle checks.
    pub fn button_pattern(&self, order: &[TileCoord]) -> String {
        order
            .iter()
            .map(|tile| if self.button_pressed(*tile) { '1' } else { '0' })
            .collect()
    }
}
