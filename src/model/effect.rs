//! Parsed skill/potential effects.
//!
//! Upstream tooling parses free-text skill descriptions into these tags; the
//! engine only ever sees the structured form. The set is closed: a tag the
//! parser emits that this enum does not know lands in [Effect::Unknown] and
//! evaluates to a no-op rather than an error.

use serde::{Deserialize, Serialize};

/// A conditional or unconditional stat modification. Evaluated against the
/// current computed stats and a read-only [crate::model::Context] by
/// [crate::combat::apply_effect].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Multiply attack by `1 + value/100`.
    AtkPct { value: f64 },
    /// Add percentage points to the general damage bonus.
    DmgBonusPct { value: f64 },
    /// Damage bonus points granted only while the enemy is debuffed.
    BonusIfDebuffed { value: f64 },
    /// Additional defense penetration points (capped at 100 total).
    IgnoreDefPct { value: f64 },
    /// Additional resistance penetration points.
    ResPenPct { value: f64 },
    /// Additional crit rate points.
    CritRatePct { value: f64 },
    /// Additional crit damage points.
    CritDmgPct { value: f64 },
    /// Crit damage points granted while enemy HP% is at or below the
    /// threshold.
    CritDmgIfHpBelow { value: f64, threshold_pct: f64 },
    /// Damage bonus points per accumulated stack.
    PerStackBonusPct { value: f64 },
    /// Damage bonus points per active debuff on the enemy.
    PerDebuffBonusPct { value: f64 },
    /// Attack percent per ally in the party.
    AtkPctPerAlly { value: f64 },
    /// Unrecognized parser tag; evaluates to a no-op.
    #[serde(other)]
    Unknown,
}
