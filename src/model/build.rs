//! Build records: raw stats, buff entries, and equipped potentials.
//! Owned and mutated by the host's editors; read-only during a simulation or
//! calibration call.

use serde::{Deserialize, Serialize};

use crate::combat::element::Element;
use crate::model::effect::Effect;

/// Raw numeric stats of a build. Percentage fields carry percentage points
/// (`crit_rate_pct: 35.0` means 35%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    #[serde(default)]
    pub atk: f64,
    #[serde(default)]
    pub def: f64,
    #[serde(default)]
    pub crit_rate_pct: f64,
    #[serde(default)]
    pub crit_dmg_pct: f64,
    #[serde(default)]
    pub pierce_pct: f64,
    #[serde(default)]
    pub res_pen_pct: f64,
    #[serde(default)]
    pub def_pen_pct: f64,
    #[serde(default)]
    pub dmg_bonus_pct: f64,
    #[serde(default)]
    pub dmg_taken_pct: f64,
    /// Bonus bucket applied only when the current action is a skill.
    #[serde(default)]
    pub skill_dmg_pct: f64,
    /// Bonus bucket applied only when the current action is an ultimate.
    #[serde(default)]
    pub ult_dmg_pct: f64,
    #[serde(default)]
    pub element: Element,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            atk: 0.0,
            def: 0.0,
            crit_rate_pct: 0.0,
            crit_dmg_pct: 0.0,
            pierce_pct: 0.0,
            res_pen_pct: 0.0,
            def_pen_pct: 0.0,
            dmg_bonus_pct: 0.0,
            dmg_taken_pct: 0.0,
            skill_dmg_pct: 0.0,
            ult_dmg_pct: 0.0,
            element: Element::Neutral,
        }
    }
}

/// Stat a buff targets. Closed set; anything else belongs in [Effect].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Atk,
    Def,
    CritRatePct,
    CritDmgPct,
    PiercePct,
    ResPenPct,
    DefPenPct,
    DmgBonusPct,
    DmgTakenPct,
    SkillDmgPct,
    UltDmgPct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffApplication {
    /// Value is percentage points added to the stat (flat stats scale by it).
    AdditivePct,
    /// Value is a factor; attack buffs multiply attack, everything else
    /// multiplies the aggregated damage factor.
    Multiplicative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffScope {
    All,
    Skill,
    Ultimate,
}

impl Default for BuffScope {
    fn default() -> Self {
        Self::All
    }
}

/// One buff entry. Aggregated by the stat resolver, never reapplied
/// individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub stat: StatKey,
    pub value: f64,
    pub application: BuffApplication,
    #[serde(default)]
    pub scope: BuffScope,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// An equipped potential: a named bundle of parsed effects with an enable
/// toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Potential {
    pub id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<String>,
    pub stats: StatBlock,
    #[serde(default)]
    pub buffs: Vec<Buff>,
    #[serde(default)]
    pub potentials: Vec<Potential>,
}

impl Build {
    /// Bare build with just raw stats, no buffs or potentials.
    pub fn from_stats(id: &str, stats: StatBlock) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            character_id: None,
            stats,
            buffs: Vec::new(),
            potentials: Vec::new(),
        }
    }
}
