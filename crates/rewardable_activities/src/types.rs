//! # Core Type Definitions
//!
//! Identity and coordinate types shared by the ownership tagger, the reward
//! limiter and the activity dispatcher.
//!
//! ## Key Types
//!
//! - [`PlayerId`] - Unique identifier for players
//! - [`EntityId`] - Unique identifier for a living entity instance
//! - [`BlockPos`] - Integer block coordinate in the world grid
//! - [`BlockFace`] - One of the six axis-aligned directions
//! - [`EntityOrigin`] - Why an entity is tagged (bred or spawner)
//! - [`ObjectKey`] - Key of a world object that can carry an ownership tag
//! - [`ActivityKind`] / [`ActivityKey`] - Lookup keys into the reward catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a player.
///
/// Wraps a UUID so that player ids cannot be confused with entity ids.
///
/// # Examples
///
/// ```rust
/// use rewardable_activities::PlayerId;
///
/// let player_id = PlayerId::from_str("550e8400-e29b-41d4-a716-446655440000")?;
/// println!("Player ID: {}", player_id);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Uuid);

impl PlayerId {
    /// Creates a new random player ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses a player ID from a string representation.
    pub fn from_str(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::str::FromStr for PlayerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s)
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a living entity (animals, monsters, fish).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Creates a new random entity ID using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the six axis-aligned directions a block can be moved in.
///
/// Follows the usual voxel-world convention: `East` is +X, `Up` is +Y and
/// `South` is +Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockFace {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl BlockFace {
    /// Unit offset `(dx, dy, dz)` of one step in this direction.
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            BlockFace::North => (0, 0, -1),
            BlockFace::South => (0, 0, 1),
            BlockFace::East => (1, 0, 0),
            BlockFace::West => (-1, 0, 0),
            BlockFace::Up => (0, 1, 0),
            BlockFace::Down => (0, -1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            BlockFace::North => BlockFace::South,
            BlockFace::South => BlockFace::North,
            BlockFace::East => BlockFace::West,
            BlockFace::West => BlockFace::East,
            BlockFace::Up => BlockFace::Down,
            BlockFace::Down => BlockFace::Up,
        }
    }
}

/// Integer coordinate of a block in the world grid.
///
/// # Examples
///
/// ```rust
/// use rewardable_activities::{BlockFace, BlockPos};
///
/// let origin = BlockPos::new(0, 64, 0);
/// assert_eq!(origin.relative(BlockFace::East), BlockPos::new(1, 64, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the neighbouring coordinate one step along `face`.
    pub fn relative(self, face: BlockFace) -> Self {
        let (dx, dy, dz) = face.offset();
        Self::new(
            self.x.wrapping_add(dx),
            self.y.wrapping_add(dy),
            self.z.wrapping_add(dz),
        )
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Why a living entity carries an ownership tag.
///
/// Each origin is tagged independently, so a check switched off by a reload
/// stops suppressing entities tagged under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityOrigin {
    /// Offspring of animals a player bred
    Bred,
    /// Spawned by a mob spawner
    Spawner,
}

impl EntityOrigin {
    pub const ALL: [EntityOrigin; 2] = [EntityOrigin::Bred, EntityOrigin::Spawner];
}

impl fmt::Display for EntityOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityOrigin::Bred => write!(f, "bred"),
            EntityOrigin::Spawner => write!(f, "spawner"),
        }
    }
}

/// Key of a world object that can carry an ownership tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectKey {
    Block { pos: BlockPos },
    Entity { id: EntityId, origin: EntityOrigin },
}

impl From<BlockPos> for ObjectKey {
    fn from(pos: BlockPos) -> Self {
        ObjectKey::Block { pos }
    }
}

impl From<(EntityId, EntityOrigin)> for ObjectKey {
    fn from((id, origin): (EntityId, EntityOrigin)) -> Self {
        ObjectKey::Entity { id, origin }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKey::Block { pos } => write!(f, "block{}", pos),
            ObjectKey::Entity { id, origin } => write!(f, "entity:{} ({})", id, origin),
        }
    }
}

/// Category of a rewardable player action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    BlockBreak,
    BlockPlace,
    EntityKill,
    EntityBreed,
    ItemFish,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 5] = [
        ActivityKind::BlockBreak,
        ActivityKind::BlockPlace,
        ActivityKind::EntityKill,
        ActivityKind::EntityBreed,
        ActivityKind::ItemFish,
    ];

    /// Dotted path of the configuration section holding this kind's rewards.
    pub fn section_path(self) -> &'static str {
        match self {
            ActivityKind::BlockBreak => "block.break",
            ActivityKind::BlockPlace => "block.place",
            ActivityKind::EntityKill => "entity.kill",
            ActivityKind::EntityBreed => "entity.breed",
            ActivityKind::ItemFish => "item.fish",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ActivityKind::BlockBreak => "Block break",
            ActivityKind::BlockPlace => "Block place",
            ActivityKind::EntityKill => "Entity kill",
            ActivityKind::EntityBreed => "Entity breed",
            ActivityKind::ItemFish => "Item fish",
        }
    }
}

/// Reward catalog lookup key: an activity kind plus the material, entity type
/// or item name it applies to.
///
/// Targets are normalised to upper case so `"stone"` and `"STONE"` resolve to
/// the same catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivityKey {
    pub kind: ActivityKind,
    pub target: String,
}

impl ActivityKey {
    pub fn new(kind: ActivityKind, target: impl AsRef<str>) -> Self {
        Self {
            kind,
            target: normalize_target(target.as_ref()),
        }
    }
}

impl fmt::Display for ActivityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind.section_path(), self.target)
    }
}

pub(crate) fn normalize_target(target: &str) -> String {
    target.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_face_offsets_are_unit_steps() {
        for face in [
            BlockFace::North,
            BlockFace::South,
            BlockFace::East,
            BlockFace::West,
            BlockFace::Up,
            BlockFace::Down,
        ] {
            let (dx, dy, dz) = face.offset();
            assert_eq!(dx.abs() + dy.abs() + dz.abs(), 1);
            let (ox, oy, oz) = face.opposite().offset();
            assert_eq!((dx + ox, dy + oy, dz + oz), (0, 0, 0));
        }
    }

    #[test]
    fn test_relative_moves_one_block() {
        let pos = BlockPos::new(3, 64, -7);
        assert_eq!(pos.relative(BlockFace::North), BlockPos::new(3, 64, -8));
        assert_eq!(pos.relative(BlockFace::Down), BlockPos::new(3, 63, -7));
        assert_eq!(pos.relative(BlockFace::West).relative(BlockFace::East), pos);
    }

    #[test]
    fn test_activity_key_normalizes_target() {
        let a = ActivityKey::new(ActivityKind::BlockBreak, " stone ");
        let b = ActivityKey::new(ActivityKind::BlockBreak, "STONE");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "block.break.STONE");
    }

    #[test]
    fn test_block_face_serde_names() {
        let json = serde_json::to_string(&BlockFace::Up).unwrap();
        assert_eq!(json, "\"UP\"");
        let face: BlockFace = serde_json::from_str("\"NORTH\"").unwrap();
        assert_eq!(face, BlockFace::North);
    }

    #[test]
    fn test_player_id_round_trips_through_string() {
        let id = PlayerId::new();
        let parsed: PlayerId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
