use std::ops::{Add, AddAssign, Div, Mul, Sub};

use thiserror::Error;

/// World-space size of one tile edge, in pixels.
pub const TILE_SIZE_PX: f32 = 32.0;

const HALF_TILE_PX: f32 = TILE_SIZE_PX / 2.0;
const QUARTER_TILE_PX: f32 = TILE_SIZE_PX / 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("collision rule {value} is outside the supported range 0-10")]
    InvalidCollisionRule { value: u8 },
}

/// Integer tile-grid coordinate. The composite key for the sparse tile map;
/// compared and hashed by value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World position of this tile's top-left corner.
    pub fn origin_pos(self) -> Pos {
        Pos {
            x: self.x as f32 * TILE_SIZE_PX,
            y: self.y as f32 * TILE_SIZE_PX,
        }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// World-space position in pixels. Y grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pos {
    pub x: f32,
    pub y: f32,
}

impl Pos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Pos) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn round(self) -> Pos {
        Pos {
            x: self.x.round(),
            y: self.y.round(),
        }
    }

    /// Containing tile, by floor division. Correct for negative coordinates:
    /// (-0.5, -0.5) lands in tile (-1, -1).
    pub fn to_tile(self) -> TileCoord {
        TileCoord {
            x: (self.x / TILE_SIZE_PX).floor() as i32,
            y: (self.y / TILE_SIZE_PX).floor() as i32,
        }
    }

    /// Sub-tile offset within the containing tile, in `[0, TILE_SIZE_PX)`.
    pub fn tile_local(self) -> Pos {
        Pos {
            x: self.x.rem_euclid(TILE_SIZE_PX),
            y: self.y.rem_euclid(TILE_SIZE_PX),
        }
    }
}

impl Add for Pos {
    type Output = Pos;

    fn add(self, rhs: Pos) -> Pos {
        Pos {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign for Pos {
    fn add_assign(&mut self, rhs: Pos) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Pos {
    type Output = Pos;

    fn sub(self, rhs: Pos) -> Pos {
        Pos {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Pos {
    type Output = Pos;

    fn mul(self, rhs: f32) -> Pos {
        Pos {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Div<f32> for Pos {
    type Output = Pos;

    fn div(self, rhs: f32) -> Pos {
        Pos {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}

/// Per-tile collision rule. Wire indices 0-10 are a closed set; anything else
/// is a configuration error surfaced at tile-set/decode time.
///
/// Rules 2-10 block a sub-tile rectangle in tile-local pixels: a centered box,
/// one of the four half-tile boxes, or one of the four quarter-tile corner
/// boxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionRule {
    #[default]
    None,
    Solid,
    Center,
    NorthHalf,
    SouthHalf,
    WestHalf,
    EastHalf,
    NorthWestCorner,
    NorthEastCorner,
    SouthWestCorner,
    SouthEastCorner,
}

impl CollisionRule {
    pub fn from_index(value: u8) -> Result<Self, SceneError> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Solid),
            2 => Ok(Self::Center),
            3 => Ok(Self::NorthHalf),
            4 => Ok(Self::SouthHalf),
            5 => Ok(Self::WestHalf),
            6 => Ok(Self::EastHalf),
            7 => Ok(Self::NorthWestCorner),
            8 => Ok(Self::NorthEastCorner),
            9 => Ok(Self::SouthWestCorner),
            10 => Ok(Self::SouthEastCorner),
            _ => Err(SceneError::InvalidCollisionRule { value }),
        }
    }

    pub const fn index(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Solid => 1,
            Self::Center => 2,
            Self::NorthHalf => 3,
            Self::SouthHalf => 4,
            Self::WestHalf => 5,
            Self::EastHalf => 6,
            Self::NorthWestCorner => 7,
            Self::NorthEastCorner => 8,
            Self::SouthWestCorner => 9,
            Self::SouthEastCorner => 10,
        }
    }

    /// Blocked rectangle as (min_x, min_y, max_x, max_y) in tile-local pixels,
    /// or `None` when the rule has no partial region (None/Solid).
    fn blocked_rect(self) -> Option<(f32, f32, f32, f32)> {
        match self {
            Self::None | Self::Solid => None,
            Self::Center => Some((
                QUARTER_TILE_PX,
                QUARTER_TILE_PX,
                TILE_SIZE_PX - QUARTER_TILE_PX,
                TILE_SIZE_PX - QUARTER_TILE_PX,
            )),
            Self::NorthHalf => Some((0.0, 0.0, TILE_SIZE_PX, HALF_TILE_PX)),
            Self::SouthHalf => Some((0.0, HALF_TILE_PX, TILE_SIZE_PX, TILE_SIZE_PX)),
            Self::WestHalf => Some((0.0, 0.0, HALF_TILE_PX, TILE_SIZE_PX)),
            Self::EastHalf => Some((HALF_TILE_PX, 0.0, TILE_SIZE_PX, TILE_SIZE_PX)),
            Self::NorthWestCorner => Some((0.0, 0.0, HALF_TILE_PX, HALF_TILE_PX)),
            Self::NorthEastCorner => Some((HALF_TILE_PX, 0.0, TILE_SIZE_PX, HALF_TILE_PX)),
            Self::SouthWestCorner => Some((0.0, HALF_TILE_PX, HALF_TILE_PX, TILE_SIZE_PX)),
            Self::SouthEastCorner => {
                Some((HALF_TILE_PX, HALF_TILE_PX, TILE_SIZE_PX, TILE_SIZE_PX))
            }
        }
    }

    /// Whether a tile-local offset is inside this rule's blocking region.
    /// Rectangle bounds are half-open: `[min, max)`.
    pub fn blocks(self, local: Pos) -> bool {
        match self.blocked_rect() {
            Some((min_x, min_y, max_x, max_y)) => {
                local.x >= min_x && local.x < max_x && local.y >= min_y && local.y < max_y
            }
            None => self == Self::Solid,
        }
    }
}

/// Reference into a sprite sheet: which sheet, which cell, and the draw layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRef {
    pub sheet: String,
    pub x_offset: i32,
    pub y_offset: i32,
    pub z_index: i32,
}

impl SpriteRef {
    pub fn new(sheet: impl Into<String>, x_offset: i32, y_offset: i32, z_index: i32) -> Self {
        Self {
            sheet: sheet.into(),
            x_offset,
            y_offset,
            z_index,
        }
    }
}

/// One cell of the world grid: a collision rule plus an ordered sprite stack.
/// Mutated in place by scene scripts for the lifetime of the owning scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tile {
    pub rule: CollisionRule,
    pub sprites: Vec<SpriteRef>,
}

impl Tile {
    pub fn new(rule: CollisionRule, sprites: Vec<SpriteRef>) -> Self {
        Self { rule, sprites }
    }

    pub fn push_sprite(&mut self, sprite: SpriteRef) {
        self.sprites.push(sprite);
    }

    pub fn pop_sprite(&mut self) -> Option<SpriteRef> {
        self.sprites.pop()
    }
}
