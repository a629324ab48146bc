//! Dice mechanics: raw pools and the 2d6 attribute roll.
//!
//! The attribute roll computes its fumble/critical flags exactly once; every
//! downstream combat phase reads the flags from the returned value instead
//! of re-deriving them from the faces.

use crate::env::DiceOracle;

/// Roll `n` independent d6 and return the faces in roll order.
pub fn roll_xd6(dice: &dyn DiceOracle, n: u32) -> Vec<u8> {
    (0..n).map(|_| dice.roll_d6()).collect()
}

/// Roll a single d6.
pub fn roll_d6(dice: &dyn DiceOracle) -> u8 {
    dice.roll_d6()
}

/// Outcome of a 2d6 attribute roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeRoll {
    /// Sum of both dice plus the modifier. Trigger effects may adjust this
    /// after the fact; the flags always describe the raw faces.
    pub total: i32,
    pub dice: [u8; 2],
    pub modifier: i32,
    /// Both dice landed on the same face at or below the fumble threshold.
    pub fumble: bool,
    /// At least one die shows a 6.
    pub critical_hit: bool,
    /// Both dice show a 6.
    pub critical_success: bool,
}

impl AttributeRoll {
    /// True if any die shows exactly `face`.
    pub fn has_die(&self, face: u8) -> bool {
        self.dice.contains(&face)
    }

    /// Strips both critical flags, used for shots beyond half range which
    /// can never critical regardless of the faces rolled.
    pub fn clear_criticals(&mut self) {
        self.critical_hit = false;
        self.critical_success = false;
    }
}

/// Roll 2d6 + `modifier` and derive the outcome flags.
///
/// `fumble_threshold` is the highest face that can participate in a fumble;
/// it is clamped to `1..=5` so a fumble and a double critical can never be
/// reported for the same roll.
pub fn attribute_roll(dice: &dyn DiceOracle, modifier: i32, fumble_threshold: u8) -> AttributeRoll {
    let threshold = fumble_threshold.clamp(1, 5);
    let faces = [dice.roll_d6(), dice.roll_d6()];

    AttributeRoll {
        total: i32::from(faces[0]) + i32::from(faces[1]) + modifier,
        dice: faces,
        modifier,
        fumble: faces[0] == faces[1] && faces[0] <= threshold,
        critical_hit: faces.contains(&6),
        critical_success: faces[0] == 6 && faces[1] == 6,
    }
}
