//! Item catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use skirmish_core::{
    Attack, AttackFlags, AttackKind, ArmorData, Item, ShieldData, WeaponData,
};

use crate::loaders::{LoadResult, read_file};

fn default_range() -> u32 {
    1
}

fn default_break_threshold() -> u8 {
    5
}

/// One attack definition in data form. Flags are spelled out as booleans
/// so catalogs stay readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackSpec {
    pub kind: AttackKind,
    #[serde(default)]
    pub min_range: u32,
    #[serde(default = "default_range")]
    pub range: u32,
    #[serde(default)]
    pub to_hit: i32,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub armor_mod: i32,
    #[serde(default)]
    pub add_strength: bool,
    #[serde(default)]
    pub shield_breaking: bool,
    #[serde(default)]
    pub breaks_shields_on_critical: bool,
}

impl AttackSpec {
    pub fn build(&self) -> Attack {
        let mut flags = AttackFlags::empty();
        if self.add_strength {
            flags |= AttackFlags::ADD_STRENGTH;
        }
        if self.shield_breaking {
            flags |= AttackFlags::SHIELD_BREAKING;
        }
        if self.breaks_shields_on_critical {
            flags |= AttackFlags::BREAKS_SHIELDS_ON_CRITICAL;
        }
        Attack {
            kind: self.kind,
            min_range: self.min_range,
            range: self.range,
            to_hit: self.to_hit,
            damage: self.damage,
            armor_mod: self.armor_mod,
            flags,
        }
    }
}

/// Weapon entry in data form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub attacks: Vec<AttackSpec>,
    #[serde(default)]
    pub two_handed: bool,
    #[serde(default)]
    pub long_range: Option<u32>,
    /// Natural weapons and magical arms set this to keep them whole on a
    /// fumble.
    #[serde(default)]
    pub unbreakable: bool,
}

impl WeaponSpec {
    pub fn build(&self, name: &str) -> WeaponData {
        let mut weapon = WeaponData::new(name, self.attacks.iter().map(AttackSpec::build));
        weapon.two_handed = self.two_handed;
        weapon.long_range = self.long_range;
        weapon.breakable = !self.unbreakable;
        weapon
    }
}

/// Item kind in data form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ItemKindSpec {
    Weapon(WeaponSpec),
    Shield {
        block: u8,
        #[serde(default = "default_break_threshold")]
        break_threshold: u8,
    },
    Armor {
        armor: i32,
    },
}

/// One named catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpec {
    pub name: String,
    pub kind: ItemKindSpec,
}

impl ItemSpec {
    pub fn build(&self) -> Item {
        match &self.kind {
            ItemKindSpec::Weapon(weapon) => Item::Weapon(weapon.build(&self.name)),
            ItemKindSpec::Shield {
                block,
                break_threshold,
            } => {
                let mut shield = ShieldData::new(*block);
                shield.break_threshold = *break_threshold;
                Item::Shield(shield)
            }
            ItemKindSpec::Armor { armor } => Item::Armor(ArmorData::new(*armor)),
        }
    }
}

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemSpec>,
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load an item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse an item catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<Vec<ItemSpec>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        Ok(catalog.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"(
        items: [
            (
                name: "longsword",
                kind: Weapon((
                    attacks: [(kind: Melee, damage: 2, add_strength: true)],
                )),
            ),
            (
                name: "shortbow",
                kind: Weapon((
                    attacks: [(kind: Ranged, min_range: 2, range: 8, damage: 1)],
                    two_handed: true,
                    long_range: Some(16),
                )),
            ),
            (
                name: "tower shield",
                kind: Shield(block: 4),
            ),
            (
                name: "chainmail",
                kind: Armor(armor: 4),
            ),
        ],
    )"#;

    #[test]
    fn parses_a_full_catalog() {
        let items = ItemLoader::parse(CATALOG).unwrap();
        assert_eq!(items.len(), 4);

        let sword = items[0].build();
        let weapon = sword.as_weapon().unwrap();
        assert_eq!(weapon.name, "longsword");
        assert!(weapon.attacks[0].flags.contains(AttackFlags::ADD_STRENGTH));
        assert_eq!(weapon.attacks[0].range, 1);

        let bow = items[1].build();
        let weapon = bow.as_weapon().unwrap();
        assert!(weapon.two_handed);
        assert_eq!(weapon.long_range, Some(16));

        let shield = items[2].build();
        assert_eq!(shield.as_shield().unwrap().block, 4);
        assert_eq!(shield.as_shield().unwrap().break_threshold, 5);

        let armor = items[3].build();
        assert_eq!(armor.as_armor().unwrap().armor, 4);
    }

    #[test]
    fn malformed_catalog_fails_loudly() {
        assert!(ItemLoader::parse("(items: [(name: \"x\")])").is_err());
    }
}
