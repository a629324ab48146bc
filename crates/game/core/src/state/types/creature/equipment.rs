//! Equipment slots and the capability resolver over them.
//!
//! [`Equipment::try_equip`] is the validating boundary: illegal combinations
//! are rejected with a named reason, never silently corrected. (Content
//! loading may auto-correct preset data before it reaches this boundary;
//! that is a separate, explicitly named code path in the content crate.)

use crate::error::{ErrorSeverity, GameError};
use crate::state::types::item::{Item, RangeBand, ShieldData, WeaponData};

/// The three equipment slots a creature has.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum EquipSlot {
    MainHand,
    OffHand,
    Armor,
}

/// Reason an equip request was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipError {
    /// A two-handed weapon in the main hand forbids anything in the off
    /// hand, and vice versa.
    #[error("two-handed weapon conflicts with off-hand item")]
    TwoHandedConflict,

    #[error("shields can only be carried in the off hand")]
    ShieldInMainHand,

    #[error("item cannot be equipped in the {0} slot")]
    WrongSlot(EquipSlot),
}

impl GameError for EquipError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}

/// What a creature currently has equipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub main_hand: Option<Item>,
    pub off_hand: Option<Item>,
    pub armor: Option<Item>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Equips `item` into `slot` after validating slot and two-handed
    /// constraints. Returns the displaced item on success.
    pub fn try_equip(&mut self, slot: EquipSlot, item: Item) -> Result<Option<Item>, EquipError> {
        match slot {
            EquipSlot::MainHand => {
                let weapon = match &item {
                    Item::Weapon(weapon) => weapon,
                    Item::Shield(_) => return Err(EquipError::ShieldInMainHand),
                    Item::Armor(_) => return Err(EquipError::WrongSlot(slot)),
                };
                if weapon.two_handed && self.off_hand.is_some() {
                    return Err(EquipError::TwoHandedConflict);
                }
                Ok(self.main_hand.replace(item))
            }
            EquipSlot::OffHand => {
                match &item {
                    Item::Weapon(weapon) if weapon.two_handed => {
                        return Err(EquipError::WrongSlot(slot));
                    }
                    Item::Weapon(_) | Item::Shield(_) => {}
                    Item::Armor(_) => return Err(EquipError::WrongSlot(slot)),
                }
                let main_is_two_handed = self
                    .main_hand
                    .as_ref()
                    .and_then(Item::as_weapon)
                    .is_some_and(|weapon| weapon.two_handed);
                if main_is_two_handed {
                    return Err(EquipError::TwoHandedConflict);
                }
                Ok(self.off_hand.replace(item))
            }
            EquipSlot::Armor => match &item {
                Item::Armor(_) => Ok(self.armor.replace(item)),
                _ => Err(EquipError::WrongSlot(slot)),
            },
        }
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Option<Item> {
        match slot {
            EquipSlot::MainHand => self.main_hand.take(),
            EquipSlot::OffHand => self.off_hand.take(),
            EquipSlot::Armor => self.armor.take(),
        }
    }

    /// The equipped shield, if the off hand holds one.
    pub fn shield(&self) -> Option<&ShieldData> {
        self.off_hand.as_ref().and_then(Item::as_shield)
    }

    pub fn shield_mut(&mut self) -> Option<&mut ShieldData> {
        self.off_hand.as_mut().and_then(Item::as_shield_mut)
    }
}

/// Read-only capability view over a creature's equipment and its natural
/// weapon fallback. All combat capability queries go through this resolver.
#[derive(Clone, Copy, Debug)]
pub struct Loadout<'a> {
    equipment: &'a Equipment,
    natural: &'a WeaponData,
}

impl<'a> Loadout<'a> {
    pub fn new(equipment: &'a Equipment, natural: &'a WeaponData) -> Self {
        Self { equipment, natural }
    }

    /// Armor value granted by equipped armor, or the creature's natural
    /// armor when nothing is worn.
    pub fn effective_armor(&self, natural_default: i32) -> i32 {
        self.equipment
            .armor
            .as_ref()
            .and_then(Item::as_armor)
            .map(|armor| armor.armor)
            .unwrap_or(natural_default)
    }

    /// The weapon this creature fights with: main hand first, then an
    /// off-hand weapon, then the natural weapon. Broken weapons resolve
    /// like an empty hand.
    pub fn main_weapon(&self) -> &'a WeaponData {
        let usable = |item: &'a Item| {
            item.as_weapon()
                .filter(|weapon| !weapon.broken)
        };
        self.equipment
            .main_hand
            .as_ref()
            .and_then(usable)
            .or_else(|| self.equipment.off_hand.as_ref().and_then(usable))
            .unwrap_or(self.natural)
    }

    /// Reach of the resolved weapon: melee reach for melee weapons, the
    /// normal or long range field for ranged ones.
    pub fn attack_range(&self, band: RangeBand) -> u32 {
        let weapon = self.main_weapon();
        let normal = weapon.normal_range();
        match band {
            RangeBand::Normal => normal,
            RangeBand::Long if weapon.is_ranged() => weapon.long_range.unwrap_or(normal),
            RangeBand::Long => normal,
        }
    }

    /// Shields never help against attacks from behind.
    pub fn has_shield(&self, is_back_attack: bool) -> bool {
        !is_back_attack && self.equipment.shield().is_some()
    }

    pub fn shield_block_value(&self, is_back_attack: bool) -> u8 {
        if is_back_attack {
            return 0;
        }
        self.equipment
            .shield()
            .map(|shield| shield.block)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::types::item::{ArmorData, Attack};

    fn sword() -> Item {
        Item::Weapon(WeaponData::new("sword", [Attack::melee(0, 2)]))
    }

    fn greataxe() -> Item {
        Item::Weapon(WeaponData::new("greataxe", [Attack::melee(0, 4)]).two_handed())
    }

    fn bow() -> Item {
        Item::Weapon(
            WeaponData::new("bow", [Attack::ranged(2, 8, 0, 1)]).with_long_range(16),
        )
    }

    fn shield() -> Item {
        Item::Shield(ShieldData::new(5))
    }

    #[test]
    fn two_handed_rejects_occupied_off_hand() {
        let mut equipment = Equipment::empty();
        equipment.try_equip(EquipSlot::OffHand, shield()).unwrap();
        assert_eq!(
            equipment.try_equip(EquipSlot::MainHand, greataxe()),
            Err(EquipError::TwoHandedConflict)
        );
        // The off hand was not silently emptied.
        assert!(equipment.off_hand.is_some());
    }

    #[test]
    fn off_hand_rejects_while_wielding_two_handed() {
        let mut equipment = Equipment::empty();
        equipment.try_equip(EquipSlot::MainHand, greataxe()).unwrap();
        assert_eq!(
            equipment.try_equip(EquipSlot::OffHand, shield()),
            Err(EquipError::TwoHandedConflict)
        );
    }

    #[test]
    fn slot_constraints_are_enforced() {
        let mut equipment = Equipment::empty();
        assert_eq!(
            equipment.try_equip(EquipSlot::MainHand, shield()),
            Err(EquipError::ShieldInMainHand)
        );
        assert_eq!(
            equipment.try_equip(EquipSlot::Armor, sword()),
            Err(EquipError::WrongSlot(EquipSlot::Armor)),
        );
        assert_eq!(
            equipment.try_equip(EquipSlot::OffHand, greataxe()),
            Err(EquipError::WrongSlot(EquipSlot::OffHand)),
        );
        assert!(
            equipment
                .try_equip(EquipSlot::Armor, Item::Armor(ArmorData::new(3)))
                .is_ok()
        );
    }

    #[test]
    fn equip_returns_displaced_item() {
        let mut equipment = Equipment::empty();
        equipment.try_equip(EquipSlot::MainHand, sword()).unwrap();
        let displaced = equipment
            .try_equip(EquipSlot::MainHand, sword())
            .unwrap()
            .unwrap();
        assert_eq!(displaced.label(), "sword");
    }

    #[test]
    fn main_weapon_falls_back_through_off_hand_to_natural() {
        let fists = WeaponData::unarmed();
        let mut equipment = Equipment::empty();

        let loadout = Loadout::new(&equipment, &fists);
        assert_eq!(loadout.main_weapon().name, "bare hands");

        equipment.try_equip(EquipSlot::OffHand, sword()).unwrap();
        let loadout = Loadout::new(&equipment, &fists);
        assert_eq!(loadout.main_weapon().name, "sword");

        equipment.try_equip(EquipSlot::MainHand, bow()).unwrap();
        let loadout = Loadout::new(&equipment, &fists);
        assert_eq!(loadout.main_weapon().name, "bow");
    }

    #[test]
    fn broken_main_weapon_resolves_like_empty_hand() {
        let fists = WeaponData::unarmed();
        let mut equipment = Equipment::empty();
        let mut broken = WeaponData::new("sword", [Attack::melee(0, 2)]);
        broken.broken = true;
        equipment
            .try_equip(EquipSlot::MainHand, Item::Weapon(broken))
            .unwrap();

        let loadout = Loadout::new(&equipment, &fists);
        assert_eq!(loadout.main_weapon().name, "bare hands");
    }

    #[test]
    fn ranged_weapon_reports_both_range_bands() {
        let fists = WeaponData::unarmed();
        let mut equipment = Equipment::empty();
        equipment.try_equip(EquipSlot::MainHand, bow()).unwrap();

        let loadout = Loadout::new(&equipment, &fists);
        assert_eq!(loadout.attack_range(RangeBand::Normal), 8);
        assert_eq!(loadout.attack_range(RangeBand::Long), 16);
    }

    #[test]
    fn shields_never_help_against_back_attacks() {
        let fists = WeaponData::unarmed();
        let mut equipment = Equipment::empty();
        equipment.try_equip(EquipSlot::OffHand, shield()).unwrap();

        let loadout = Loadout::new(&equipment, &fists);
        assert!(loadout.has_shield(false));
        assert!(!loadout.has_shield(true));
        assert_eq!(loadout.shield_block_value(false), 5);
        assert_eq!(loadout.shield_block_value(true), 0);
    }

    #[test]
    fn armor_value_falls_back_to_natural() {
        let fists = WeaponData::unarmed();
        let mut equipment = Equipment::empty();
        let loadout = Loadout::new(&equipment, &fists);
        assert_eq!(loadout.effective_armor(2), 2);

        equipment
            .try_equip(EquipSlot::Armor, Item::Armor(ArmorData::new(4)))
            .unwrap();
        let loadout = Loadout::new(&equipment, &fists);
        assert_eq!(loadout.effective_armor(2), 4);
    }
}
