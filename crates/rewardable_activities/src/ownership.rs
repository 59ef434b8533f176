//! # Ownership Tagging
//!
//! Tracks which world objects are in a state caused by a player rather than
//! by world generation or natural spawning: blocks a player placed, animals a
//! player bred, mobs that came out of a spawner. The dispatcher consults these
//! tags so that farming one's own blocks or bred animals earns nothing.
//!
//! A tag is pure presence on an [`ObjectKey`]. It carries no owner, no count
//! and no timestamp, and it lives only in memory. Entity keys include an
//! [`EntityOrigin`], so a bred animal and a spawner mob are told apart when
//! the dispatcher decides whether the matching check is switched on.
//!
//! ## Propagation
//!
//! World mechanics can move or duplicate tagged objects:
//! - **Pistons** shift blocks one step, so tags move with them
//!   ([`OwnershipTagger::propagate_on_push`])
//! - **Breeding** creates a new entity whose origin is the breeding player
//!   ([`OwnershipTagger::propagate_on_breed`])
//!
//! ## Thread Safety
//!
//! The [`TagStore`] is a sharded `DashSet`, so concurrent callers only contend
//! on the shard of the key they touch.

use crate::types::{BlockFace, BlockPos, EntityId, EntityOrigin, ObjectKey};
use dashmap::DashSet;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::trace;

/// In-memory set of tagged world objects.
///
/// Owned by the plugin for the lifetime of one server run and handed to the
/// [`OwnershipTagger`] by `Arc`.
#[derive(Debug, Default)]
pub struct TagStore {
    tags: DashSet<ObjectKey>,
}

impl TagStore {
    pub fn new() -> Self {
        Self {
            tags: DashSet::new(),
        }
    }
}

/// Answers "was this object's current state caused by a player?" and keeps the
/// answer correct as world mechanics move objects around.
#[derive(Debug, Clone)]
pub struct OwnershipTagger {
    store: Arc<TagStore>,
}

impl OwnershipTagger {
    /// Creates a tagger operating on `store`.
    pub fn new(store: Arc<TagStore>) -> Self {
        Self { store }
    }

    /// Marks `object` as player-caused. No-op if already tagged.
    pub fn tag(&self, object: impl Into<ObjectKey>) {
        let object = object.into();
        if self.store.tags.insert(object) {
            trace!("🏷️ Tagged {}", object);
        }
    }

    /// Clears the mark on `object`. No-op if it was not tagged.
    pub fn untag(&self, object: impl Into<ObjectKey>) {
        let object = object.into();
        if self.store.tags.remove(&object).is_some() {
            trace!("🏷️ Untagged {}", object);
        }
    }

    pub fn is_tagged(&self, object: impl Into<ObjectKey>) -> bool {
        self.store.tags.contains(&object.into())
    }

    pub fn tag_block(&self, pos: BlockPos) {
        self.tag(pos);
    }

    pub fn untag_block(&self, pos: BlockPos) {
        self.untag(pos);
    }

    pub fn is_block_tagged(&self, pos: BlockPos) -> bool {
        self.is_tagged(pos)
    }

    pub fn tag_entity(&self, id: EntityId, origin: EntityOrigin) {
        self.tag((id, origin));
    }

    /// Clears every origin tag of the entity.
    pub fn untag_entity(&self, id: EntityId) {
        for origin in EntityOrigin::ALL {
            self.untag((id, origin));
        }
    }

    /// Whether the entity is tagged under any origin.
    pub fn is_entity_tagged(&self, id: EntityId) -> bool {
        EntityOrigin::ALL
            .into_iter()
            .any(|origin| self.is_tagged((id, origin)))
    }

    pub fn is_entity_tagged_as(&self, id: EntityId, origin: EntityOrigin) -> bool {
        self.is_tagged((id, origin))
    }

    /// Clears the tags of every object in `objects`, e.g. blocks destroyed by
    /// an explosion.
    pub fn untag_all<I, K>(&self, objects: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<ObjectKey>,
    {
        for object in objects {
            self.untag(object);
        }
    }

    /// Moves tags along with blocks pushed or pulled one step in `direction`.
    ///
    /// `blocks` is the ordered list of blocks the mechanism moves, given by
    /// their positions *before* the move. The tagged subset is captured before
    /// anything is mutated, so each tagged source is processed exactly once no
    /// matter how the tags change during the call.
    ///
    /// A source is not untagged when an earlier block of the same batch has
    /// already moved into its position: in a row of tagged blocks, every
    /// position that ends up occupied by a moved tagged block stays tagged and
    /// only the vacated rear position loses its tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rewardable_activities::{BlockFace, BlockPos, OwnershipTagger, TagStore};
    /// use std::sync::Arc;
    ///
    /// let tagger = OwnershipTagger::new(Arc::new(TagStore::new()));
    /// let a = BlockPos::new(0, 64, 0);
    /// tagger.tag_block(a);
    ///
    /// tagger.propagate_on_push(BlockFace::East, &[a]);
    ///
    /// assert!(!tagger.is_block_tagged(a));
    /// assert!(tagger.is_block_tagged(a.relative(BlockFace::East)));
    /// ```
    pub fn propagate_on_push(&self, direction: BlockFace, blocks: &[BlockPos]) {
        let mut seen = HashSet::with_capacity(blocks.len());
        let tagged_sources: Vec<BlockPos> = blocks
            .iter()
            .copied()
            .filter(|pos| seen.insert(*pos) && self.is_block_tagged(*pos))
            .collect();

        if tagged_sources.is_empty() {
            return;
        }

        let mut destinations = HashSet::with_capacity(tagged_sources.len());
        for source in tagged_sources {
            if !destinations.contains(&source) {
                self.untag_block(source);
            }
            let destination = source.relative(direction);
            destinations.insert(destination);
            self.tag_block(destination);
        }

        trace!(
            "🏷️ Propagated {} tag(s) {:?} across {} moved block(s)",
            destinations.len(),
            direction,
            blocks.len()
        );
    }

    /// Forwards player-caused status to an entity produced by breeding.
    ///
    /// The offspring is tagged only when `breed_check_enabled` is set, so that
    /// killing it later can be recognised as killing a player-bred animal.
    /// Parents are left untouched. Returns whether the offspring was tagged.
    pub fn propagate_on_breed(
        &self,
        parent_a: EntityId,
        parent_b: EntityId,
        offspring: EntityId,
        breed_check_enabled: bool,
    ) -> bool {
        if !breed_check_enabled {
            return false;
        }
        self.tag_entity(offspring, EntityOrigin::Bred);
        trace!(
            "🏷️ Offspring {} of {} and {} marked as player-bred",
            offspring,
            parent_a,
            parent_b
        );
        true
    }

    /// Number of currently tagged objects.
    pub fn len(&self) -> usize {
        self.store.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.tags.is_empty()
    }

    /// Drops every tag.
    pub fn clear(&self) {
        self.store.tags.clear();
    }
}
