//! Creature preset loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use skirmish_core::{
    AttackKind, Attributes, CombatEventKind, CombatTrigger, Faction, RollCondition, Skill,
    TriggerEffect, TriggerEvents,
};

use crate::loaders::item::WeaponSpec;
use crate::loaders::{LoadResult, read_file};

fn default_size() -> u8 {
    2
}

fn default_vitality() -> u32 {
    10
}

fn default_natural_armor() -> i32 {
    2
}

fn default_footprint() -> (u8, u8) {
    (1, 1)
}

/// Attribute block in data form; omitted values fall back to the core
/// defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributesSpec {
    #[serde(default)]
    pub movement: Option<u32>,
    #[serde(default)]
    pub combat: i32,
    #[serde(default)]
    pub ranged: i32,
    #[serde(default)]
    pub strength: i32,
    #[serde(default)]
    pub agility: i32,
    #[serde(default)]
    pub courage: i32,
    #[serde(default)]
    pub intelligence: i32,
}

impl AttributesSpec {
    pub fn build(&self) -> Attributes {
        let defaults = Attributes::default();
        Attributes {
            movement: self.movement.unwrap_or(defaults.movement),
            combat: self.combat,
            ranged: self.ranged,
            strength: self.strength,
            agility: self.agility,
            courage: self.courage,
            intelligence: self.intelligence,
        }
    }
}

/// Combat trigger in data form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub name: String,
    pub events: Vec<CombatEventKind>,
    #[serde(default)]
    pub attack_filter: Option<AttackKind>,
    #[serde(default)]
    pub condition: Option<RollCondition>,
    pub effect: TriggerEffect,
}

impl TriggerSpec {
    pub fn build(&self) -> CombatTrigger {
        let events = self
            .events
            .iter()
            .fold(TriggerEvents::empty(), |set, event| set | event.as_flag());
        let mut trigger = CombatTrigger::new(self.name.clone(), events, self.effect);
        trigger.attack_filter = self.attack_filter;
        trigger.condition = self.condition;
        trigger
    }
}

/// Skill entry in data form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillSpec {
    pub name: String,
    #[serde(default)]
    pub triggers: Vec<TriggerSpec>,
}

impl SkillSpec {
    pub fn build(&self) -> Skill {
        self.triggers
            .iter()
            .fold(Skill::new(self.name.clone()), |skill, trigger| {
                skill.with_trigger(trigger.build())
            })
    }
}

/// A creature preset: everything needed to instantiate a creature, with
/// equipment referenced by catalog item name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreaturePreset {
    pub name: String,
    #[serde(default)]
    pub attributes: AttributesSpec,
    #[serde(default = "default_size")]
    pub size: u8,
    #[serde(default)]
    pub faction: Faction,
    #[serde(default)]
    pub is_hero: bool,
    #[serde(default = "default_vitality")]
    pub vitality: u32,
    #[serde(default)]
    pub mana: u32,
    #[serde(default)]
    pub fortune: u32,
    #[serde(default = "default_natural_armor")]
    pub natural_armor: i32,
    #[serde(default = "default_footprint")]
    pub footprint: (u8, u8),
    #[serde(default)]
    pub main_hand: Option<String>,
    #[serde(default)]
    pub off_hand: Option<String>,
    #[serde(default)]
    pub armor: Option<String>,
    #[serde(default)]
    pub natural_weapons: Vec<NamedWeaponSpec>,
    #[serde(default)]
    pub skills: Vec<SkillSpec>,
}

/// A natural weapon owned by the preset itself (claws, bite) rather than
/// referenced from the item catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedWeaponSpec {
    pub name: String,
    pub weapon: WeaponSpec,
}

/// Creature catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureCatalog {
    pub creatures: Vec<CreaturePreset>,
}

/// Loader for creature presets from RON files.
pub struct CreatureLoader;

impl CreatureLoader {
    /// Load creature presets from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<CreaturePreset>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse creature presets from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<CreaturePreset>> {
        let catalog: CreatureCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse creature catalog RON: {}", e))?;
        Ok(catalog.creatures)
    }
}
