/// The starting hamlet: a sign, a one-shot loot chest, and the cave door.
struct VillageScript;

impl SceneScript for VillageScript {
    fn on_enter(&mut self, _prev_scene: &str, _world: &mut GameWorld, scene: &mut Scene) {
        scene.register_behaviour("sign", |world, _scene, _pos, data| {
            world
                .executor
                .play(dialogue_sequence(vec![data.to_string()], TextAdvance::OnInteract));
        });
        scene.register_behaviour("chest", |world, _scene, _pos, data| {
            let line = if world.flag(VILLAGE_CHEST_FLAG) {
                "The chest is empty.".to_string()
            } else {
                world.set_flag(VILLAGE_CHEST_FLAG, true);
                format!("You found {data}.")
            };
            world
                .executor
                .play(dialogue_sequence(vec![line], TextAdvance::OnInteract));
        });

        scene.add_object(ScriptedObject::at_tile(
            VILLAGE_SIGN_TILE,
            ObjectBehaviour::Sign,
            VILLAGE_SIGN_TEXT,
            prop_sprite(0, 0, 1),
        ));
        scene.add_object(ScriptedObject::at_tile(
            VILLAGE_CHEST_TILE,
            ObjectBehaviour::Chest,
            VILLAGE_CHEST_LOOT,
            prop_sprite(1, 0, 1),
        ));
        scene.add_object(ScriptedObject::at_tile(
            VILLAGE_DUNGEON_DOOR_TILE,
            ObjectBehaviour::ChangeScene,
            SCENE_DUNGEON,
            prop_sprite(2, 0, 1),
        ));
    }

    fn start_tile(&self, prev_scene: &str) -> Option<TileCoord> {
        match prev_scene {
            SCENE_DUNGEON => Some(VILLAGE_FROM_DUNGEON_SPAWN),
            DEFAULT_START_KEY => Some(VILLAGE_DEFAULT_SPAWN),
            _ => None,
        }
    }
}

/// The cave between the village and the cavern: a warning NPC and a conveyor
/// run across the lower passage.
struct DungeonScript;

impl SceneScript for DungeonScript {
    fn on_enter(&mut self, _prev_scene: &str, _world: &mut GameWorld, scene: &mut Scene) {
        scene.register_behaviour("npc", |world, _scene, _pos, data| {
            let lines = data.split('|').map(str::to_string).collect();
            world
                .executor
                .play(dialogue_sequence(lines, TextAdvance::OnInteract));
        });

        scene.add_object(ScriptedObject::at_tile(
            DUNGEON_NPC_TILE,
            ObjectBehaviour::Npc,
            DUNGEON_NPC_LINES,
            prop_sprite(3, 0, 1),
        ));
        let belt = ScriptedObject::at_tile(
            DUNGEON_CONVEYOR_START,
            ObjectBehaviour::ConveyorBelt,
            "E",
            prop_sprite(4, 0, 0),
        );
        scene.add_objects(ScriptedObject::family(
            &belt,
            DUNGEON_CONVEYOR_COUNT,
            Pos::new(TILE_SIZE_PX, 0.0),
        ));
        scene.add_object(ScriptedObject::at_tile(
            DUNGEON_VILLAGE_DOOR_TILE,
            ObjectBehaviour::ChangeScene,
            SCENE_VILLAGE,
            prop_sprite(2, 0, 1),
        ));
        scene.add_object(ScriptedObject::at_tile(
            DUNGEON_ICE_DOOR_TILE,
            ObjectBehaviour::ChangeScene,
            SCENE_ICE_CAVERN,
            prop_sprite(2, 1, 1),
        ));
    }

    fn start_tile(&self, prev_scene: &str) -> Option<TileCoord> {
        match prev_scene {
            SCENE_VILLAGE => Some(DUNGEON_FROM_VILLAGE_SPAWN),
            DEFAULT_START_KEY => Some(DUNGEON_DEFAULT_SPAWN),
            _ => None,
        }
    }
}

/// The pressure-stone puzzle room. Ten stones sit along the south row; the
/// first eight pressed (and only those) open the north gate. The solved state
/// persists through the world flag, so re-entering keeps the gate open.
struct IceCavernScript;

impl SceneScript for IceCavernScript {
    fn on_enter(&mut self, _prev_scene: &str, world: &mut GameWorld, scene: &mut Scene) {
        scene.register_behaviour("button", |world, scene, _pos, _data| {
            if world.flag(ICE_PUZZLE_FLAG) {
                return;
            }
            if scene.button_pattern(&ice_button_tiles()) == ICE_PUZZLE_SOLUTION {
                world.set_flag(ICE_PUZZLE_FLAG, true);
                info!("ice_puzzle_solved");
                world.executor.play(ice_exit_sequence());
            }
        });

        for tile in ice_button_tiles() {
            scene.add_object(ScriptedObject::at_tile(
                tile,
                ObjectBehaviour::Button,
                "pressure_stone",
                prop_sprite(5, 0, 0),
            ));
        }
        scene.add_object(ScriptedObject::at_tile(
            ICE_EXIT_DOOR_TILE,
            ObjectBehaviour::ChangeScene,
            SCENE_DUNGEON,
            prop_sprite(2, 1, 1),
        ));

        if world.flag(ICE_PUZZLE_FLAG) {
            open_ice_gate(scene);
        } else {
            scene.add_object(ScriptedObject::at_tile(
                ICE_GATE_TILE,
                ObjectBehaviour::None,
                ICE_GATE_MARKER,
                prop_sprite(6, 0, 2),
            ));
        }
    }

    fn start_tile(&self, prev_scene: &str) -> Option<TileCoord> {
        match prev_scene {
            DEFAULT_START_KEY => Some(ICE_DEFAULT_SPAWN),
            _ => None,
        }
    }
}
