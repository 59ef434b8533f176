//! # World Event Data Structures
//!
//! Notifications delivered by the host game engine. Each variant of
//! [`WorldEvent`] carries the acting player (when there is one), the affected
//! block or entity, and whatever event-specific data the dispatcher needs.
//!
//! Events are serialized as internally tagged JSON objects:
//!
//! ```json
//! {
//!     "type": "block_break",
//!     "player": { "id": "550e8400-e29b-41d4-a716-446655440000", "name": "Steve" },
//!     "block": { "x": 10, "y": 64, "z": -3 },
//!     "material": "STONE"
//! }
//! ```
//!
//! ## Piston Direction
//!
//! Piston events carry the direction the piston faces. Extending pushes the
//! moved blocks one step along that direction; retracting pulls them one step
//! back towards the piston.

use crate::types::{BlockFace, BlockPos, EntityId, PlayerId};
use serde::{Deserialize, Serialize};

/// The player performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: PlayerId,
    pub name: String,
}

impl Actor {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// An inbound world notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorldEvent {
    /// A player broke a block
    BlockBreak {
        player: Actor,
        block: BlockPos,
        material: String,
    },
    /// A player placed a block
    BlockPlace {
        player: Actor,
        block: BlockPos,
        material: String,
    },
    /// A block exploded and destroyed `blocks`
    BlockExplode {
        source: BlockPos,
        blocks: Vec<BlockPos>,
    },
    /// A piston facing `direction` extended and pushed `blocks`
    PistonExtend {
        piston: BlockPos,
        direction: BlockFace,
        blocks: Vec<BlockPos>,
    },
    /// A sticky piston facing `direction` retracted and pulled `blocks`
    PistonRetract {
        piston: BlockPos,
        direction: BlockFace,
        blocks: Vec<BlockPos>,
    },
    /// Two parents produced `offspring`; `breeder` is set when a player fed them
    EntityBreed {
        #[serde(default)]
        breeder: Option<Actor>,
        mother: EntityId,
        father: EntityId,
        offspring: EntityId,
        entity_type: String,
    },
    /// A player dealt a lethal hit to an entity
    EntityKill {
        player: Actor,
        entity: EntityId,
        entity_type: String,
    },
    /// An entity exploded and destroyed `blocks`
    EntityExplode {
        entity: EntityId,
        blocks: Vec<BlockPos>,
    },
    /// A mob spawner produced an entity
    SpawnerSpawn {
        spawner: BlockPos,
        entity: EntityId,
        entity_type: String,
    },
    /// A player reeled in a catch
    ItemFish { player: Actor, item: String },
    /// A player joined the server
    PlayerJoin { player: Actor },
}

impl WorldEvent {
    /// Short snake_case name of the event, as used in the `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            WorldEvent::BlockBreak { .. } => "block_break",
            WorldEvent::BlockPlace { .. } => "block_place",
            WorldEvent::BlockExplode { .. } => "block_explode",
            WorldEvent::PistonExtend { .. } => "piston_extend",
            WorldEvent::PistonRetract { .. } => "piston_retract",
            WorldEvent::EntityBreed { .. } => "entity_breed",
            WorldEvent::EntityKill { .. } => "entity_kill",
            WorldEvent::EntityExplode { .. } => "entity_explode",
            WorldEvent::SpawnerSpawn { .. } => "spawner_spawn",
            WorldEvent::ItemFish { .. } => "item_fish",
            WorldEvent::PlayerJoin { .. } => "player_join",
        }
    }

    /// The player who caused the event, if any.
    pub fn actor(&self) -> Option<&Actor> {
        match self {
            WorldEvent::BlockBreak { player, .. }
            | WorldEvent::BlockPlace { player, .. }
            | WorldEvent::EntityKill { player, .. }
            | WorldEvent::ItemFish { player, .. }
            | WorldEvent::PlayerJoin { player } => Some(player),
            WorldEvent::EntityBreed { breeder, .. } => breeder.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_tagged_json() {
        let json = r#"{
            "type": "block_break",
            "player": { "id": "550e8400-e29b-41d4-a716-446655440000", "name": "Steve" },
            "block": { "x": 10, "y": 64, "z": -3 },
            "material": "STONE"
        }"#;

        let event: WorldEvent = serde_json::from_str(json).unwrap();
        match &event {
            WorldEvent::BlockBreak { player, block, material } => {
                assert_eq!(player.name, "Steve");
                assert_eq!(*block, BlockPos::new(10, 64, -3));
                assert_eq!(material, "STONE");
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(event.name(), "block_break");
    }

    #[test]
    fn test_piston_event_json() {
        let json = r#"{
            "type": "piston_extend",
            "piston": { "x": 0, "y": 64, "z": 0 },
            "direction": "EAST",
            "blocks": [{ "x": 1, "y": 64, "z": 0 }, { "x": 2, "y": 64, "z": 0 }]
        }"#;

        let event: WorldEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(
            event,
            WorldEvent::PistonExtend { direction: BlockFace::East, ref blocks, .. } if blocks.len() == 2
        ));
        assert!(event.actor().is_none());
    }

    #[test]
    fn test_breed_without_breeder() {
        let mother = EntityId::new();
        let father = EntityId::new();
        let offspring = EntityId::new();
        let json = serde_json::json!({
            "type": "entity_breed",
            "mother": mother,
            "father": father,
            "offspring": offspring,
            "entity_type": "COW"
        });

        let event: WorldEvent = serde_json::from_value(json).unwrap();
        assert!(event.actor().is_none());
        assert_eq!(event.name(), "entity_breed");
    }

    #[test]
    fn test_name_matches_serde_tag() {
        let event = WorldEvent::ItemFish {
            player: Actor::new(PlayerId::new(), "Alex"),
            item: "COD".to_string(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], event.name());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result = serde_json::from_str::<WorldEvent>(r#"{"type":"weather_change"}"#);
        assert!(result.is_err());
    }
}
