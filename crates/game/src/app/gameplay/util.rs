fn terrain_sprite(x_offset: i32, y_offset: i32) -> SpriteRef {
    SpriteRef::new(TERRAIN_SHEET, x_offset, y_offset, 0)
}

fn prop_sprite(x_offset: i32, y_offset: i32, z_index: i32) -> SpriteRef {
    SpriteRef::new(PROPS_SHEET, x_offset, y_offset, z_index)
}

fn ice_button_tiles() -> [TileCoord; ICE_BUTTON_COUNT] {
    std::array::from_fn(|n| TileCoord::new(n as i32 + 1, ICE_BUTTON_ROW_Y))
}

/// Standard dialogue box: freeze the player and lock interaction for the
/// duration, show each line, then release.
fn dialogue_sequence(lines: Vec<String>, advance: TextAdvance) -> Sequence {
    let mut steps = vec![SequenceStep::run(|ctx| {
        ctx.world.player.frozen = true;
        ctx.world.prevent_interaction();
    })];
    for line in lines {
        steps.push(SequenceStep::text(line, advance));
    }
    steps.push(SequenceStep::run(|ctx| {
        ctx.world.player.frozen = false;
        ctx.world.allow_interaction();
    }));
    Sequence::new(steps)
}

/// Gate-opening cutscene played when the pressure-stone pattern matches.
fn ice_exit_sequence() -> Sequence {
    Sequence::new(vec![
        SequenceStep::run(|ctx| {
            ctx.world.player.frozen = true;
            ctx.world.prevent_interaction();
        }),
        SequenceStep::wait_seconds(0.4),
        SequenceStep::text(
            "A deep rumble echoes through the cavern.",
            TextAdvance::AfterSeconds(2.0),
        ),
        SequenceStep::run(|ctx| open_ice_gate(ctx.scene)),
        SequenceStep::run(|ctx| {
            ctx.world.player.frozen = false;
            ctx.world.allow_interaction();
        }),
    ])
}

/// Clears the gate tile and removes its marker object. Idempotent, also used
/// on re-entry when the puzzle flag is already set.
fn open_ice_gate(scene: &mut Scene) {
    scene.set_tile(ICE_GATE_TILE, CollisionRule::None, vec![terrain_sprite(0, 0)]);
    scene.remove_objects_where(|object| object.data == ICE_GATE_MARKER);
}
