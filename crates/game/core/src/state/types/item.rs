//! Item state types: the closed set of equippable things.
//!
//! Combat code matches exhaustively on [`Item`]; there is deliberately no
//! open hierarchy or downcasting. Weapons own their attack definitions,
//! shields their block/break state, armor its protection value.

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::config::GameConfig;
use crate::triggers::CombatTrigger;

bitflags! {
    /// Behavior flags on a single attack definition.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct AttackFlags: u8 {
        /// Adds the attacker's strength to the damage pool.
        const ADD_STRENGTH              = 1 << 0;
        /// May break the target's shield (subject to the shield's own
        /// break-chance roll).
        const SHIELD_BREAKING           = 1 << 1;
        /// Breaks the target's shield outright on a critical hit.
        const BREAKS_SHIELDS_ON_CRITICAL = 1 << 2;
    }
}

/// Whether an attack resolves with the melee or ranged pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttackKind {
    Melee,
    Ranged,
}

/// Range band selector for capability queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangeBand {
    Normal,
    Long,
}

/// A single attack definition owned by a weapon.
///
/// Exactly one attack applies per combat resolution, selected by the tile
/// distance falling inside `min_range..=range`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attack {
    pub kind: AttackKind,
    pub min_range: u32,
    pub range: u32,
    pub to_hit: i32,
    pub damage: i32,
    /// Added to the defender's armor before clamping; negative values
    /// pierce armor.
    pub armor_mod: i32,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub flags: AttackFlags,
}

impl Attack {
    /// Standard reach-1 melee attack.
    pub fn melee(to_hit: i32, damage: i32) -> Self {
        Self {
            kind: AttackKind::Melee,
            min_range: 0,
            range: 1,
            to_hit,
            damage,
            armor_mod: 0,
            flags: AttackFlags::empty(),
        }
    }

    /// Ranged attack covering `min_range..=range`.
    pub fn ranged(min_range: u32, range: u32, to_hit: i32, damage: i32) -> Self {
        Self {
            kind: AttackKind::Ranged,
            min_range,
            range,
            to_hit,
            damage,
            armor_mod: 0,
            flags: AttackFlags::empty(),
        }
    }

    pub fn with_reach(mut self, min_range: u32, range: u32) -> Self {
        self.min_range = min_range;
        self.range = range;
        self
    }

    pub fn with_armor_mod(mut self, armor_mod: i32) -> Self {
        self.armor_mod = armor_mod;
        self
    }

    pub fn with_flags(mut self, flags: AttackFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn band_contains(&self, distance: u32) -> bool {
        (self.min_range..=self.range).contains(&distance)
    }
}

/// Weapon-specific data, including natural weapons.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponData {
    pub name: String,
    pub attacks: ArrayVec<Attack, { GameConfig::MAX_ATTACKS_PER_WEAPON }>,
    pub two_handed: bool,
    /// Natural weapons are unbreakable; forged ones are not.
    pub breakable: bool,
    pub broken: bool,
    /// Extended range of a ranged weapon; `None` for melee weapons.
    pub long_range: Option<u32>,
    pub triggers: ArrayVec<CombatTrigger, { GameConfig::MAX_TRIGGERS_PER_SOURCE }>,
}

impl WeaponData {
    pub fn new(name: impl Into<String>, attacks: impl IntoIterator<Item = Attack>) -> Self {
        let mut list = ArrayVec::new();
        for attack in attacks {
            if !list.is_full() {
                list.push(attack);
            }
        }
        Self {
            name: name.into(),
            attacks: list,
            two_handed: false,
            breakable: true,
            broken: false,
            long_range: None,
            triggers: ArrayVec::new(),
        }
    }

    /// Bare-handed strike every creature falls back to.
    pub fn unarmed() -> Self {
        let mut weapon = Self::new("bare hands", [Attack::melee(0, 0)]);
        weapon.breakable = false;
        weapon
    }

    pub fn two_handed(mut self) -> Self {
        self.two_handed = true;
        self
    }

    pub fn with_long_range(mut self, long_range: u32) -> Self {
        self.long_range = Some(long_range);
        self
    }

    pub fn is_ranged(&self) -> bool {
        self.attacks
            .iter()
            .any(|attack| attack.kind == AttackKind::Ranged)
    }

    /// Longest band end among this weapon's attacks (melee reach or ranged
    /// normal range). Defaults to adjacent reach for weapons without bands.
    pub fn normal_range(&self) -> u32 {
        self.attacks
            .iter()
            .map(|attack| attack.range)
            .max()
            .unwrap_or(1)
    }

    /// To-hit modifier of this weapon's melee attack, used when defending.
    pub fn melee_to_hit(&self) -> i32 {
        self.attacks
            .iter()
            .find(|attack| attack.kind == AttackKind::Melee)
            .map(|attack| attack.to_hit)
            .unwrap_or(0)
    }

    /// The attack whose band contains `distance`, if any.
    pub fn attack_for_distance(&self, distance: u32) -> Option<&Attack> {
        self.attacks
            .iter()
            .find(|attack| attack.band_contains(distance))
    }
}

/// Shield-specific data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShieldData {
    /// A block succeeds when a d6 shows this value or higher.
    pub block: u8,
    pub breakable: bool,
    pub broken: bool,
    /// Non-automatic shield breaks roll a d6 against this threshold.
    pub break_threshold: u8,
}

impl ShieldData {
    pub fn new(block: u8) -> Self {
        Self {
            block,
            breakable: true,
            broken: false,
            break_threshold: 5,
        }
    }
}

/// Armor-specific data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArmorData {
    /// Base threshold damage dice must meet, before clamping.
    pub armor: i32,
}

impl ArmorData {
    pub fn new(armor: i32) -> Self {
        Self { armor }
    }
}

/// The closed set of item variants the rules engine knows.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Item {
    Weapon(WeaponData),
    Shield(ShieldData),
    Armor(ArmorData),
}

impl Item {
    pub fn as_weapon(&self) -> Option<&WeaponData> {
        match self {
            Item::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn as_weapon_mut(&mut self) -> Option<&mut WeaponData> {
        match self {
            Item::Weapon(weapon) => Some(weapon),
            _ => None,
        }
    }

    pub fn as_shield(&self) -> Option<&ShieldData> {
        match self {
            Item::Shield(shield) => Some(shield),
            _ => None,
        }
    }

    pub fn as_shield_mut(&mut self) -> Option<&mut ShieldData> {
        match self {
            Item::Shield(shield) => Some(shield),
            _ => None,
        }
    }

    pub fn as_armor(&self) -> Option<&ArmorData> {
        match self {
            Item::Armor(armor) => Some(armor),
            _ => None,
        }
    }

    /// Display label for narration.
    pub fn label(&self) -> &str {
        match self {
            Item::Weapon(weapon) => &weapon.name,
            Item::Shield(_) => "shield",
            Item::Armor(_) => "armor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_band_is_inclusive_on_both_ends() {
        let attack = Attack::ranged(2, 6, 0, 1);
        assert!(!attack.band_contains(1));
        assert!(attack.band_contains(2));
        assert!(attack.band_contains(6));
        assert!(!attack.band_contains(7));
    }

    #[test]
    fn weapon_selects_attack_by_distance() {
        let spear = WeaponData::new(
            "spear",
            [Attack::melee(0, 2), Attack::melee(1, 1).with_reach(2, 2)],
        );
        assert_eq!(spear.attack_for_distance(1).unwrap().damage, 2);
        assert_eq!(spear.attack_for_distance(2).unwrap().damage, 1);
        assert!(spear.attack_for_distance(3).is_none());
        assert_eq!(spear.normal_range(), 2);
    }

    #[test]
    fn unarmed_is_unbreakable_melee() {
        let fists = WeaponData::unarmed();
        assert!(!fists.breakable);
        assert!(!fists.is_ranged());
        assert!(fists.attack_for_distance(0).is_some());
        assert!(fists.attack_for_distance(1).is_some());
    }

    #[test]
    fn item_variant_accessors() {
        let bow = Item::Weapon(WeaponData::new("bow", [Attack::ranged(2, 8, 0, 1)]));
        assert!(bow.as_weapon().is_some());
        assert!(bow.as_shield().is_none());
        assert_eq!(bow.label(), "bow");
        assert_eq!(Item::Shield(ShieldData::new(5)).label(), "shield");
    }
}
