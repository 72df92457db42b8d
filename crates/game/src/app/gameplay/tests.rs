use std::path::Path;

use engine::{AssetStore, CardinalFacing, InputSnapshot, Session};

use super::*;

const FRAME_DT: f32 = 1.0 / 60.0;

fn game_session() -> Session {
    let assets_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("assets");
    let mut assets = AssetStore::new();
    assets.load_dir(&assets_dir).expect("assets load");
    Session::new(assets, build_script_registry())
}

fn interact() -> InputSnapshot {
    InputSnapshot::empty().with_interact_pressed(true)
}

fn drive_idle(session: &mut Session, frames: u32) {
    let idle = InputSnapshot::empty();
    for _ in 0..frames {
        session.update(FRAME_DT, &idle).expect("tick");
    }
}

/// Teleports the player next to `target` (one tile south, facing north) and
/// sends one interact edge.
fn interact_with(session: &mut Session, target: TileCoord) {
    let stand = target.offset(0, 1);
    session.world_mut().player.pos = stand.origin_pos() + Pos::new(16.0, 16.0);
    session.world_mut().player.facing = CardinalFacing::North;
    session.update(FRAME_DT, &interact()).expect("tick");
}

#[test]
fn every_scene_loads_from_the_shipped_assets() {
    for name in [SCENE_VILLAGE, SCENE_DUNGEON, SCENE_ICE_CAVERN] {
        let mut session = game_session();
        session.enter_scene(name).expect("scene loads");
        assert!(session.scene().tile_count() > 0, "{name} has tiles");
        assert!(!session.scene().objects().is_empty(), "{name} has objects");
    }
}

#[test]
fn village_sign_freezes_shows_text_and_releases() {
    let mut session = game_session();
    session.enter_scene(SCENE_VILLAGE).expect("scene loads");

    interact_with(&mut session, VILLAGE_SIGN_TILE);
    drive_idle(&mut session, 1);
    assert!(session.world().player.frozen);
    drive_idle(&mut session, 1);
    assert_eq!(session.world().dialogue(), Some(VILLAGE_SIGN_TEXT));

    // Advance past the line, then let the release step run.
    session.update(FRAME_DT, &interact()).expect("tick");
    drive_idle(&mut session, 1);
    assert_eq!(session.world().dialogue(), None);
    assert!(!session.world().player.frozen);
    assert!(session.world().interaction_allowed());
}

#[test]
fn village_chest_yields_loot_only_once() {
    let mut session = game_session();
    session.enter_scene(SCENE_VILLAGE).expect("scene loads");

    interact_with(&mut session, VILLAGE_CHEST_TILE);
    drive_idle(&mut session, 2);
    assert_eq!(
        session.world().dialogue(),
        Some(format!("You found {VILLAGE_CHEST_LOOT}.").as_str())
    );
    assert!(session.world().flag(VILLAGE_CHEST_FLAG));
    session.update(FRAME_DT, &interact()).expect("tick");
    drive_idle(&mut session, 2);

    interact_with(&mut session, VILLAGE_CHEST_TILE);
    drive_idle(&mut session, 2);
    assert_eq!(session.world().dialogue(), Some("The chest is empty."));
    session.update(FRAME_DT, &interact()).expect("tick");
    drive_idle(&mut session, 2);
}

#[test]
fn dungeon_npc_walks_through_each_line() {
    let mut session = game_session();
    session.enter_scene(SCENE_DUNGEON).expect("scene loads");

    interact_with(&mut session, DUNGEON_NPC_TILE);
    drive_idle(&mut session, 2);

    let expected: Vec<&str> = DUNGEON_NPC_LINES.split('|').collect();
    for (n, line) in expected.iter().enumerate() {
        assert_eq!(session.world().dialogue(), Some(*line), "line {n}");
        session.update(FRAME_DT, &interact()).expect("tick");
        drive_idle(&mut session, 1);
    }
    drive_idle(&mut session, 1);
    assert_eq!(session.world().dialogue(), None);
    assert!(!session.world().player.frozen);
}

#[test]
fn dungeon_conveyor_carries_the_player_off_the_belt() {
    let mut session = game_session();
    session.enter_scene(SCENE_DUNGEON).expect("scene loads");
    session.world_mut().player.pos =
        DUNGEON_CONVEYOR_START.origin_pos() + Pos::new(16.0, 16.0);

    drive_idle(&mut session, 240);
    let end_tile = session.world().player.pos.to_tile();
    assert_eq!(end_tile.y, DUNGEON_CONVEYOR_START.y);
    assert_eq!(
        end_tile.x,
        DUNGEON_CONVEYOR_START.x + DUNGEON_CONVEYOR_COUNT as i32
    );
}

#[test]
fn pressing_the_right_eight_stones_opens_the_gate() {
    let mut session = game_session();
    session.enter_scene(SCENE_ICE_CAVERN).expect("scene loads");

    let gate = session.scene().tile(ICE_GATE_TILE).expect("gate tile");
    assert_eq!(gate.rule, CollisionRule::Solid);

    let stones = ice_button_tiles();
    for tile in &stones[..7] {
        interact_with(&mut session, *tile);
        drive_idle(&mut session, 1);
        assert!(!session.world().flag(ICE_PUZZLE_FLAG));
    }
    interact_with(&mut session, stones[7]);
    // Rumble cutscene: wait, timed text, gate opening.
    drive_idle(&mut session, 300);

    assert!(session.world().flag(ICE_PUZZLE_FLAG));
    let gate = session.scene().tile(ICE_GATE_TILE).expect("gate tile");
    assert_eq!(gate.rule, CollisionRule::None);
    assert!(!session
        .scene()
        .objects()
        .iter()
        .any(|object| object.data == ICE_GATE_MARKER));

    // Further presses no longer matter; the solve is one-shot.
    interact_with(&mut session, stones[8]);
    drive_idle(&mut session, 10);
    assert!(session.world().flag(ICE_PUZZLE_FLAG));
    assert_eq!(
        session
            .scene()
            .tile(ICE_GATE_TILE)
            .expect("gate tile")
            .rule,
        CollisionRule::None
    );
}

#[test]
fn solved_gate_stays_open_after_leaving_and_returning() {
    let mut session = game_session();
    session.enter_scene(SCENE_ICE_CAVERN).expect("scene loads");
    session.world_mut().set_flag(ICE_PUZZLE_FLAG, true);

    session.enter_scene(SCENE_DUNGEON).expect("scene loads");
    session.enter_scene(SCENE_ICE_CAVERN).expect("scene loads");

    let gate = session.scene().tile(ICE_GATE_TILE).expect("gate tile");
    assert_eq!(gate.rule, CollisionRule::None);
    assert!(!session
        .scene()
        .objects()
        .iter()
        .any(|object| object.data == ICE_GATE_MARKER));
}

#[test]
fn wrong_pattern_leaves_the_gate_closed() {
    let mut session = game_session();
    session.enter_scene(SCENE_ICE_CAVERN).expect("scene loads");

    let stones = ice_button_tiles();
    // Press the last eight instead of the first eight.
    for tile in &stones[2..] {
        interact_with(&mut session, *tile);
        drive_idle(&mut session, 1);
    }
    assert!(!session.world().flag(ICE_PUZZLE_FLAG));
    assert_eq!(
        session
            .scene()
            .tile(ICE_GATE_TILE)
            .expect("gate tile")
            .rule,
        CollisionRule::Solid
    );
}
