//! Content factory: builds core creatures from loaded data.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use skirmish_core::{
    CreatureBuilder, CreatureState, Equipment, GameConfig, Item,
};

use crate::loaders::creatures::CreaturePreset;
use crate::loaders::item::ItemSpec;
use crate::loaders::{ConfigLoader, CreatureLoader, ItemLoader, LoadResult};

/// Loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// └── creatures.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemSpec>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load creature presets from `creatures.ron`.
    pub fn load_creatures(&self) -> LoadResult<Vec<CreaturePreset>> {
        CreatureLoader::load(&self.data_dir.join("creatures.ron"))
    }

    /// Build a creature factory from this directory's catalogs.
    pub fn creature_factory(&self) -> LoadResult<CreatureFactory> {
        Ok(CreatureFactory::new(
            self.load_items()?,
            self.load_creatures()?,
        ))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Instantiates creatures from presets.
///
/// Unknown preset or item names are content bugs and produce errors; they
/// are never papered over with defaults.
pub struct CreatureFactory {
    items: HashMap<String, Item>,
    presets: HashMap<String, CreaturePreset>,
}

impl CreatureFactory {
    pub fn new(
        items: impl IntoIterator<Item = ItemSpec>,
        presets: impl IntoIterator<Item = CreaturePreset>,
    ) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|spec| (spec.name.clone(), spec.build()))
                .collect(),
            presets: presets
                .into_iter()
                .map(|preset| (preset.name.clone(), preset))
                .collect(),
        }
    }

    fn item(&self, name: &str) -> LoadResult<Item> {
        self.items
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown item '{}' in creature preset", name))
    }

    /// Builds a creature from the named preset.
    ///
    /// Preset data may specify loadouts that violate the two-handed rule;
    /// unlike live equip actions (which the core rejects), construction
    /// auto-corrects them through [`resolve_loadout_conflicts`] and carries
    /// the displaced items in the inventory.
    pub fn spawn(&self, preset_name: &str, id: u32) -> LoadResult<CreatureState> {
        let preset = self
            .presets
            .get(preset_name)
            .ok_or_else(|| anyhow::anyhow!("unknown creature preset '{}'", preset_name))?;

        let main_hand = preset
            .main_hand
            .as_deref()
            .map(|name| self.item(name))
            .transpose()?;
        let off_hand = preset
            .off_hand
            .as_deref()
            .map(|name| self.item(name))
            .transpose()?;
        let armor = preset
            .armor
            .as_deref()
            .map(|name| self.item(name))
            .transpose()?;

        let (main_hand, off_hand, displaced) = resolve_loadout_conflicts(main_hand, off_hand);

        let mut builder = CreatureBuilder::named(id, preset.name.clone())
            .attributes(preset.attributes.build())
            .size(preset.size)
            .faction(preset.faction)
            .natural_armor(preset.natural_armor)
            .footprint(preset.footprint.0, preset.footprint.1)
            .vitality(preset.vitality)
            .mana(preset.mana)
            .fortune(preset.fortune);
        if preset.is_hero {
            builder = builder.hero();
        }
        if let Some(item) = main_hand {
            builder = builder.main_hand(item);
        }
        if let Some(item) = off_hand {
            builder = builder.off_hand(item);
        }
        if let Some(item) = armor {
            builder = builder.armor(item);
        }
        for item in displaced {
            builder = builder.carry(item);
        }
        for weapon in &preset.natural_weapons {
            builder = builder.natural_weapon(weapon.weapon.build(&weapon.name));
        }
        for skill in &preset.skills {
            builder = builder.skill(skill.build());
        }

        Ok(builder.build())
    }
}

/// Auto-correcting counterpart of the core's equip validation, used only
/// during construction from preset data: when a two-handed main-hand
/// weapon meets an off-hand item, the off-hand item is displaced to the
/// inventory instead of rejecting the preset.
pub fn resolve_loadout_conflicts(
    main_hand: Option<Item>,
    off_hand: Option<Item>,
) -> (Option<Item>, Option<Item>, Vec<Item>) {
    let two_handed = main_hand
        .as_ref()
        .and_then(Item::as_weapon)
        .is_some_and(|weapon| weapon.two_handed);
    if two_handed && off_hand.is_some() {
        let displaced = off_hand.into_iter().collect();
        (main_hand, None, displaced)
    } else {
        (main_hand, off_hand, Vec::new())
    }
}

/// Sanity check that a resolved loadout passes the core's own validation.
/// Used by tests and tooling to prove the auto-corrected loadout would
/// also have been accepted by the rejecting path.
pub fn loadout_is_valid(equipment: &Equipment) -> bool {
    let main_two_handed = equipment
        .main_hand
        .as_ref()
        .and_then(Item::as_weapon)
        .is_some_and(|weapon| weapon.two_handed);
    !(main_two_handed && equipment.off_hand.is_some())
}
