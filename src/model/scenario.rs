//! Enemy and scenario records.

use serde::{Deserialize, Serialize};

use crate::combat::element::Element;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    #[serde(default)]
    pub def: f64,
    /// Elemental resistance offset by the build's pierce.
    #[serde(default)]
    pub res_pct: f64,
    /// Subtracted from the attacker's crit rate.
    #[serde(default)]
    pub crit_resist_pct: f64,
    /// Subtracted from the attacker's crit damage.
    #[serde(default)]
    pub crit_def_pct: f64,
    /// Flat damage reduction applied as a final multiplier.
    #[serde(default)]
    pub dmg_reduction_pct: f64,
    /// Fraction of the burst bonus this enemy shrugs off, in [0, 1].
    #[serde(default)]
    pub burst_resist: f64,
    #[serde(default)]
    pub element: Element,
    /// Hit-point pool; only time-to-kill derivations outside this crate read
    /// it.
    #[serde(default)]
    pub hp: f64,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            def: 0.0,
            res_pct: 0.0,
            crit_resist_pct: 0.0,
            crit_def_pct: 0.0,
            dmg_reduction_pct: 0.0,
            burst_resist: 0.0,
            element: Element::Neutral,
            hp: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub enemy: Enemy,
}

impl Scenario {
    pub fn new(id: &str, enemy: Enemy) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            enemy,
        }
    }
}
