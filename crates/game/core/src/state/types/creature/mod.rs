//! Creature state and its capability surface.
//!
//! The combat pipeline never reaches into raw fields of other subsystems;
//! it talks to creatures through the methods here (resource spending,
//! damage, status effects, geometry queries) and through the [`Loadout`]
//! capability view for equipment questions.

pub mod equipment;
pub mod resources;
pub mod status;

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

pub use equipment::{EquipError, EquipSlot, Equipment, Loadout};
pub use resources::{DamageOutcome, TurnResources};
pub use status::{StatusEffect, StatusEffectKind, StatusEffects};

use crate::config::GameConfig;
use crate::env::DiceOracle;
use crate::state::types::common::{CreatureId, Facing, Faction, Footprint, Position};
use crate::state::types::item::{Item, WeaponData};
use crate::state::types::skill::Skill;

/// Base attributes of a creature.
///
/// `movement` doubles as the per-turn movement maximum; the rest are flat
/// modifiers added into rolls and damage pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    pub movement: u32,
    pub combat: i32,
    pub ranged: i32,
    pub strength: i32,
    pub agility: i32,
    pub courage: i32,
    pub intelligence: i32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            movement: 6,
            combat: 0,
            ranged: 0,
            strength: 0,
            agility: 0,
            courage: 0,
            intelligence: 0,
        }
    }
}

/// Complete creature state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureState {
    pub id: CreatureId,
    pub name: String,

    /// Position on the map. None means the creature is not on the map
    /// (carried off, summoning, staged for later entry).
    pub position: Option<Position>,
    pub facing: Facing,
    pub footprint: Footprint,

    pub attributes: Attributes,
    /// Size class; push/knockdown eligibility compares these.
    pub size: u8,
    pub faction: Faction,
    /// Heroes drop a fumbled weapon to the ground instead of keeping the
    /// broken pieces in hand.
    pub is_hero: bool,
    /// Armor threshold used when no armor is worn.
    pub natural_armor: i32,

    pub equipment: Equipment,
    pub inventory: ArrayVec<Item, { GameConfig::MAX_INVENTORY_SLOTS }>,
    pub skills: ArrayVec<Skill, { GameConfig::MAX_SKILLS }>,
    /// Always holds at least the bare-handed fallback.
    pub natural_weapons: ArrayVec<WeaponData, { GameConfig::MAX_NATURAL_WEAPONS }>,

    pub resources: TurnResources,
    pub status_effects: StatusEffects,

    /// Creatures that stood in this creature's rear arc when its current
    /// turn started. Recorded by `Roster::begin_turn`.
    behind_at_turn_start: BTreeSet<CreatureId>,
}

impl CreatureState {
    /// Quick check that this creature can still act at all.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.resources.is_dead()
    }

    pub fn is_hostile_to(&self, other: &CreatureState) -> bool {
        self.faction.is_hostile_to(other.faction)
    }

    /// Capability view over equipment plus the natural-weapon fallback.
    pub fn loadout(&self) -> Loadout<'_> {
        Loadout::new(&self.equipment, self.natural_weapon())
    }

    /// Primary natural weapon; construction guarantees at least one.
    pub fn natural_weapon(&self) -> &WeaponData {
        self.natural_weapons
            .first()
            .expect("creature constructed without a natural weapon")
    }

    /// Tiles covered by this creature's footprint, if it is on the map.
    pub fn occupied_tiles(&self) -> Option<Vec<Position>> {
        self.position
            .map(|origin| self.footprint.tiles_at(origin))
    }

    /// Minimum tile distance between the two creatures' footprints.
    /// None when either is off the map.
    pub fn distance_to(&self, other: &CreatureState) -> Option<u32> {
        let mine = self.occupied_tiles()?;
        let theirs = other.occupied_tiles()?;
        mine.iter()
            .flat_map(|a| theirs.iter().map(|b| a.distance(*b)))
            .min()
    }

    /// True if `observer_position` lies in this creature's rear arc (the
    /// direction opposite its facing, plus the two 45-degree neighbors).
    pub fn is_behind(&self, observer_position: Position) -> bool {
        let Some(position) = self.position else {
            return false;
        };
        let Some(direction) = Facing::towards(position, observer_position) else {
            return false;
        };
        let rear = self.facing.opposite();
        direction == rear || direction == rear.rotated(-1) || direction == rear.rotated(1)
    }

    // ========================================================================
    // Capability surface used by the combat pipeline
    // ========================================================================

    pub fn use_action(&mut self) -> bool {
        self.resources.use_action()
    }

    pub fn use_quick_action(&mut self) -> bool {
        self.resources.use_quick_action()
    }

    pub fn set_remaining_movement(&mut self, tiles: u32) {
        self.resources.movement = tiles.min(self.resources.max_movement);
    }

    pub fn take_damage(&mut self, wounds: u32, dice: &dyn DiceOracle) -> DamageOutcome {
        self.resources.take_damage(wounds, dice)
    }

    pub fn add_status_effect(&mut self, kind: StatusEffectKind, rounds: u8) {
        self.status_effects.add(kind, rounds);
    }

    /// Relocates the creature to a tile (pushback, forced movement).
    pub fn enter_tile(&mut self, position: Position) {
        self.position = Some(position);
    }

    pub fn record_pushed_creature(&mut self, target: CreatureId) {
        self.resources.record_pushed(target);
    }

    pub fn can_push_creature(&self, target: CreatureId) -> bool {
        self.resources.can_push(target)
    }

    /// Whether `attacker` already stood behind this creature when its last
    /// turn started. Used for the back-attack bonus.
    pub fn was_behind_at_turn_start(&self, attacker: CreatureId) -> bool {
        self.behind_at_turn_start.contains(&attacker)
    }

    pub(crate) fn note_behind_at_turn_start(
        &mut self,
        creatures: impl IntoIterator<Item = CreatureId>,
    ) {
        self.behind_at_turn_start = creatures.into_iter().collect();
    }
}

/// Builder for creature construction.
///
/// Equip methods go through the validating boundary and panic on illegal
/// combinations: feeding the builder broken data is a content bug, not a
/// game condition.
#[derive(Clone, Debug)]
pub struct CreatureBuilder {
    creature: CreatureState,
    vitality: u32,
    mana: u32,
    fortune: u32,
}

impl CreatureBuilder {
    pub fn named(id: u32, name: impl Into<String>) -> Self {
        Self {
            creature: CreatureState {
                id: CreatureId(id),
                name: name.into(),
                position: None,
                facing: Facing::default(),
                footprint: Footprint::SINGLE,
                attributes: Attributes::default(),
                size: 2,
                faction: Faction::default(),
                is_hero: false,
                natural_armor: 2,
                equipment: Equipment::empty(),
                inventory: ArrayVec::new(),
                skills: ArrayVec::new(),
                natural_weapons: ArrayVec::new(),
                resources: TurnResources::default(),
                status_effects: StatusEffects::empty(),
                behind_at_turn_start: BTreeSet::new(),
            },
            vitality: 10,
            mana: 0,
            fortune: 0,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.creature.position = Some(Position::new(x, y));
        self
    }

    pub fn facing(mut self, facing: Facing) -> Self {
        self.creature.facing = facing;
        self
    }

    pub fn footprint(mut self, width: u8, height: u8) -> Self {
        self.creature.footprint = Footprint::new(width, height);
        self
    }

    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.creature.attributes = attributes;
        self
    }

    pub fn size(mut self, size: u8) -> Self {
        self.creature.size = size;
        self
    }

    pub fn faction(mut self, faction: Faction) -> Self {
        self.creature.faction = faction;
        self
    }

    pub fn hero(mut self) -> Self {
        self.creature.is_hero = true;
        self
    }

    pub fn natural_armor(mut self, armor: i32) -> Self {
        self.creature.natural_armor = armor;
        self
    }

    pub fn vitality(mut self, vitality: u32) -> Self {
        self.vitality = vitality;
        self
    }

    pub fn mana(mut self, mana: u32) -> Self {
        self.mana = mana;
        self
    }

    pub fn fortune(mut self, fortune: u32) -> Self {
        self.fortune = fortune;
        self
    }

    pub fn main_hand(mut self, item: Item) -> Self {
        self.creature
            .equipment
            .try_equip(EquipSlot::MainHand, item)
            .expect("invalid main-hand item in creature data");
        self
    }

    pub fn off_hand(mut self, item: Item) -> Self {
        self.creature
            .equipment
            .try_equip(EquipSlot::OffHand, item)
            .expect("invalid off-hand item in creature data");
        self
    }

    pub fn armor(mut self, item: Item) -> Self {
        self.creature
            .equipment
            .try_equip(EquipSlot::Armor, item)
            .expect("invalid armor item in creature data");
        self
    }

    pub fn carry(mut self, item: Item) -> Self {
        if !self.creature.inventory.is_full() {
            self.creature.inventory.push(item);
        }
        self
    }

    pub fn skill(mut self, skill: Skill) -> Self {
        if !self.creature.skills.is_full() {
            self.creature.skills.push(skill);
        }
        self
    }

    pub fn natural_weapon(mut self, weapon: WeaponData) -> Self {
        if !self.creature.natural_weapons.is_full() {
            self.creature.natural_weapons.push(weapon);
        }
        self
    }

    pub fn build(mut self) -> CreatureState {
        if self.creature.natural_weapons.is_empty() {
            self.creature.natural_weapons.push(WeaponData::unarmed());
        }
        self.creature.resources = TurnResources::new(
            self.creature.attributes.movement,
            self.vitality,
            self.mana,
            self.fortune,
        );
        self.creature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_resources_and_unarmed_fallback() {
        let creature = CreatureBuilder::named(3, "Grash")
            .attributes(Attributes {
                movement: 5,
                ..Attributes::default()
            })
            .vitality(12)
            .fortune(1)
            .build();

        assert_eq!(creature.resources.max_movement, 5);
        assert_eq!(creature.resources.vitality, 12);
        assert_eq!(creature.resources.fortune, 1);
        assert_eq!(creature.natural_weapon().name, "bare hands");
        assert!(!creature.is_dead());
    }

    #[test]
    fn rear_arc_covers_three_directions() {
        let creature = CreatureBuilder::named(1, "Sentry")
            .at(5, 5)
            .facing(Facing::North)
            .build();

        // Facing north: the rear arc opens to the south.
        assert!(creature.is_behind(Position::new(5, 7)));
        assert!(creature.is_behind(Position::new(7, 7)));
        assert!(creature.is_behind(Position::new(3, 7)));
        assert!(!creature.is_behind(Position::new(5, 3)));
        assert!(!creature.is_behind(Position::new(7, 5)));
    }

    #[test]
    fn footprint_distance_uses_nearest_tiles() {
        let giant = CreatureBuilder::named(1, "Ogre")
            .at(0, 0)
            .footprint(2, 2)
            .build();
        let scout = CreatureBuilder::named(2, "Scout").at(3, 0).build();
        // Nearest ogre tile is (1, 0), two tiles from the scout.
        assert_eq!(giant.distance_to(&scout), Some(2));
        assert_eq!(scout.distance_to(&giant), Some(2));
    }

    #[test]
    fn off_map_creature_yields_neutral_geometry() {
        let ghost = CreatureBuilder::named(1, "Ghost").build();
        let other = CreatureBuilder::named(2, "Guard").at(1, 1).build();
        assert_eq!(ghost.distance_to(&other), None);
        assert!(ghost.occupied_tiles().is_none());
        assert!(!ghost.is_behind(Position::new(0, 1)));
    }

    #[test]
    fn behind_at_turn_start_is_recorded_set() {
        let mut creature = CreatureBuilder::named(1, "Guard").at(2, 2).build();
        creature.note_behind_at_turn_start([CreatureId(7)]);
        assert!(creature.was_behind_at_turn_start(CreatureId(7)));
        assert!(!creature.was_behind_at_turn_start(CreatureId(8)));
    }
}
