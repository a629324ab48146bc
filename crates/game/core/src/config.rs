/// Game configuration constants and tunable rule parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Flat to-hit bonus granted for attacking from within the target's rear
    /// arc, both now and at the start of the target's last turn.
    pub back_attack_bonus: i32,

    /// Ranged to-hit penalty applied when the target's tile is below `Lit`
    /// as seen by the attacker.
    pub darkness_penalty: i32,

    /// Total a ranged attribute test must reach to succeed
    /// (2d6 + attribute + modifiers >= target).
    pub attribute_test_target: i32,

    /// Highest die face that can participate in a fumble. Clamped to
    /// `1..=5` by the dice module so a fumble can never coincide with a
    /// double critical.
    pub fumble_threshold: u8,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of creatures tracked in one room.
    pub const MAX_CREATURES: usize = 64;
    pub const MAX_GROUND_ITEMS: usize = 128;
    pub const MAX_INVENTORY_SLOTS: usize = 8;
    pub const MAX_SKILLS: usize = 8;
    pub const MAX_NATURAL_WEAPONS: usize = 4;
    pub const MAX_ATTACKS_PER_WEAPON: usize = 4;
    pub const MAX_TRIGGERS_PER_SOURCE: usize = 2;
    pub const MAX_STATUS_EFFECTS: usize = 8;

    // ===== fixed rule constants =====
    /// A fortune save succeeds outright when the d6 shows this value or
    /// higher; otherwise a second fortune point must be spent.
    pub const FORTUNE_SAVE_TARGET: u8 = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BACK_ATTACK_BONUS: i32 = 2;
    pub const DEFAULT_DARKNESS_PENALTY: i32 = -1;
    pub const DEFAULT_ATTRIBUTE_TEST_TARGET: i32 = 9;
    pub const DEFAULT_FUMBLE_THRESHOLD: u8 = 1;

    pub fn new() -> Self {
        Self {
            back_attack_bonus: Self::DEFAULT_BACK_ATTACK_BONUS,
            darkness_penalty: Self::DEFAULT_DARKNESS_PENALTY,
            attribute_test_target: Self::DEFAULT_ATTRIBUTE_TEST_TARGET,
            fumble_threshold: Self::DEFAULT_FUMBLE_THRESHOLD,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
