use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::grid::{SceneError, SpriteRef, TileCoord};
use crate::app::scene::Scene;

#[derive(Debug, Error)]
pub enum SceneFormatError {
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
    #[error("coordinate key '{key}' is not an integer")]
    BadCoordinate { key: String },
    #[error(transparent)]
    InvalidRule(#[from] SceneError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SavedSprite {
    src: String,
    #[serde(rename = "xO")]
    x_offset: i32,
    #[serde(rename = "yO")]
    y_offset: i32,
    #[serde(rename = "zi")]
    z_index: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SavedTile {
    col: u8,
    spr: Vec<SavedSprite>,
}

/// Row-keyed then column-keyed, both as stringified integers. BTreeMap keeps
/// the emitted document stable across runs.
type SavedGrid = BTreeMap<String, BTreeMap<String, SavedTile>>;

/// Encodes a scene's tile grid as JSON. Objects, behaviours, and button
/// states are script-owned and never serialized.
pub fn serialize_scene(scene: &Scene) -> String {
    let mut grid = SavedGrid::new();
    for (coord, tile) in scene.tiles() {
        let row = grid.entry(coord.y.to_string()).or_default();
        row.insert(
            coord.x.to_string(),
            SavedTile {
                col: tile.rule.index(),
                spr: tile
                    .sprites
                    .iter()
                    .map(|sprite| SavedSprite {
                        src: sprite.sheet.clone(),
                        x_offset: sprite.x_offset,
                        y_offset: sprite.y_offset,
                        z_index: sprite.z_index,
                    })
                    .collect(),
            },
        );
    }
    // String-keyed maps of plain data cannot fail to serialize.
    serde_json::to_string_pretty(&grid).expect("grid serialization is infallible")
}

/// Decodes a scene document into a fresh `Scene` bound to `script_name`.
pub fn deserialize_scene(raw: &str, script_name: &str) -> Result<Scene, SceneFormatError> {
    let grid: SavedGrid = serde_json::from_str(raw)?;
    let mut scene = Scene::new(script_name);
    for (row_key, row) in &grid {
        let y = parse_coordinate(row_key)?;
        for (col_key, saved) in row {
            let x = parse_coordinate(col_key)?;
            let sprites: Vec<SpriteRef> = saved
                .spr
                .iter()
                .map(|sprite| {
                    SpriteRef::new(
                        sprite.src.clone(),
                        sprite.x_offset,
                        sprite.y_offset,
                        sprite.z_index,
                    )
                })
                .collect();
            scene.set_tile_indexed(TileCoord::new(x, y), saved.col, sprites)?;
        }
    }
    Ok(scene)
}

fn parse_coordinate(key: &str) -> Result<i32, SceneFormatError> {
    key.parse()
        .map_err(|_| SceneFormatError::BadCoordinate {
            key: key.to_string(),
        })
}
