//! The roster: every creature in the room, plus items lying on the ground.
//!
//! Tile occupancy is answered here as a pure function of creature positions
//! and footprints; the map oracle stays read-only.

use bounded_vector::BoundedVec;

use crate::config::GameConfig;
use crate::state::types::common::{CreatureId, Position};
use crate::state::types::creature::CreatureState;
use crate::state::types::item::Item;

/// An item lying on a tile (dropped weapons, loot).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroundItem {
    pub position: Position,
    pub item: Item,
}

/// Aggregate state for every creature in the room.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    creatures: BoundedVec<CreatureState, 0, { GameConfig::MAX_CREATURES }>,
    ground_items: BoundedVec<GroundItem, 0, { GameConfig::MAX_GROUND_ITEMS }>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a creature; returns false when the room is full.
    pub fn add(&mut self, creature: CreatureState) -> bool {
        self.creatures.push(creature).is_ok()
    }

    pub fn creature(&self, id: CreatureId) -> Option<&CreatureState> {
        self.creatures.iter().find(|creature| creature.id == id)
    }

    pub fn creature_mut(&mut self, id: CreatureId) -> Option<&mut CreatureState> {
        self.creatures.iter_mut().find(|creature| creature.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CreatureState> {
        self.creatures.iter()
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    pub fn ground_items(&self) -> impl Iterator<Item = &GroundItem> {
        self.ground_items.iter()
    }

    /// Leaves an item on a tile. Full rooms swallow the drop; ground loot
    /// is flavor, not rules state.
    pub fn drop_item(&mut self, position: Position, item: Item) {
        let _ = self.ground_items.push(GroundItem { position, item });
    }

    /// The living creature (other than `ignore`) whose footprint covers any
    /// of `tiles`.
    pub fn blocking_creature_at(
        &self,
        tiles: &[Position],
        ignore: CreatureId,
    ) -> Option<CreatureId> {
        self.creatures
            .iter()
            .filter(|creature| creature.id != ignore && !creature.is_dead())
            .find(|creature| {
                creature
                    .occupied_tiles()
                    .is_some_and(|occupied| occupied.iter().any(|tile| tiles.contains(tile)))
            })
            .map(|creature| creature.id)
    }

    /// True when no living creature other than `ignore` covers any of
    /// `tiles`.
    pub fn is_area_free(&self, tiles: &[Position], ignore: CreatureId) -> bool {
        self.blocking_creature_at(tiles, ignore).is_none()
    }

    /// Living enemies of `target` standing adjacent to it.
    pub fn adjacent_enemies_of(&self, target: CreatureId) -> Vec<CreatureId> {
        let Some(target_creature) = self.creature(target) else {
            return Vec::new();
        };
        self.creatures
            .iter()
            .filter(|other| other.id != target)
            .filter(|other| !other.is_dead())
            .filter(|other| other.is_hostile_to(target_creature))
            .filter(|other| target_creature.distance_to(other) == Some(1))
            .map(|other| other.id)
            .collect()
    }

    /// Begins `id`'s turn: refills per-turn resources, ticks status
    /// effects, and snapshots which creatures currently stand in its rear
    /// arc (consumed later by back-attack checks).
    pub fn begin_turn(&mut self, id: CreatureId) {
        let behind: Vec<CreatureId> = match self.creature(id) {
            Some(creature) => self
                .creatures
                .iter()
                .filter(|other| other.id != id && !other.is_dead())
                .filter(|other| {
                    other
                        .position
                        .is_some_and(|position| creature.is_behind(position))
                })
                .map(|other| other.id)
                .collect(),
            None => return,
        };

        if let Some(creature) = self.creature_mut(id) {
            creature.note_behind_at_turn_start(behind);
            creature.resources.start_turn();
            creature.status_effects.tick();
        }
    }

    /// Ends `id`'s turn, zeroing its per-turn pools.
    pub fn end_turn(&mut self, id: CreatureId) {
        if let Some(creature) = self.creature_mut(id) {
            creature.resources.end_turn();
        }
    }
}
