//! Elemental advantage map.
//!
//! Attack elements form a cycle (Fire > Wind > Earth > Water > Fire) and
//! Light/Dark counter each other. The multiplier values are part of the
//! adjustable model, not confirmed game data.

use serde::{Deserialize, Serialize};

pub const ADVANTAGE_MULT: f64 = 1.30;
pub const DISADVANTAGE_MULT: f64 = 0.70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Neutral,
    Fire,
    Water,
    Wind,
    Earth,
    Light,
    Dark,
}

impl Default for Element {
    fn default() -> Self {
        Self::Neutral
    }
}

impl Element {
    /// The element this one has advantage against, if any.
    const fn beats(self) -> Option<Element> {
        match self {
            Self::Fire => Some(Self::Wind),
            Self::Wind => Some(Self::Earth),
            Self::Earth => Some(Self::Water),
            Self::Water => Some(Self::Fire),
            Self::Light => Some(Self::Dark),
            Self::Dark => Some(Self::Light),
            Self::Neutral => None,
        }
    }
}

/// Multiplier for an attacker element hitting a defender element.
/// Light and Dark beat each other; everything else follows the cycle.
pub fn advantage_multiplier(attacker: Element, defender: Element) -> f64 {
    if attacker.beats() == Some(defender) {
        return ADVANTAGE_MULT;
    }
    if defender.beats() == Some(attacker) && attacker.beats() != Some(defender) {
        return DISADVANTAGE_MULT;
    }
    1.0
}
