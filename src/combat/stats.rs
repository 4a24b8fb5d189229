//! Stat resolution: merges a build's raw stats with its enabled buffs and
//! potential effects into the computed stat set the damage formula consumes.
//!
//! Buff folding accumulates additive-percent deltas per stat and, separately,
//! multiplicative factors (attack buffs multiply attack, any other
//! multiplicative buff lands in the global damage factor). Additive deltas
//! apply first, then the factors, then potential effects, then range clamps.
//! Pure function of its inputs.

use serde::{Deserialize, Serialize};

use crate::combat::element::Element;
use crate::model::{
    Build, BuffApplication, BuffScope, Context, Effect, StatKey,
};
use crate::model::rotation::ActionKind;

/// Pierce percentage valid range, in points.
pub const PIERCE_MIN_PCT: f64 = -100.0;
pub const PIERCE_CAP_PCT: f64 = 300.0;

/// Defense penetration valid range upper bound, in points.
pub const DEF_PEN_CAP_PCT: f64 = 100.0;

/// Context-specific computed stat set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedStats {
    pub atk: f64,
    pub def: f64,
    pub crit_rate_pct: f64,
    pub crit_dmg_pct: f64,
    pub pierce_pct: f64,
    pub res_pen_pct: f64,
    pub def_pen_pct: f64,
    pub dmg_bonus_pct: f64,
    pub dmg_taken_pct: f64,
    pub skill_dmg_pct: f64,
    pub ult_dmg_pct: f64,
    /// Aggregated multiplicative damage factor from buffs.
    pub damage_factor: f64,
    pub element: Element,
}

/// Per-stat additive-percent accumulator for one resolution pass.
#[derive(Debug, Default, Clone, Copy)]
struct AdditiveDeltas {
    atk: f64,
    def: f64,
    crit_rate: f64,
    crit_dmg: f64,
    pierce: f64,
    res_pen: f64,
    def_pen: f64,
    dmg_bonus: f64,
    dmg_taken: f64,
    skill_dmg: f64,
    ult_dmg: f64,
}

impl AdditiveDeltas {
    fn add(&mut self, stat: StatKey, value: f64) {
        match stat {
            StatKey::Atk => self.atk += value,
            StatKey::Def => self.def += value,
            StatKey::CritRatePct => self.crit_rate += value,
            StatKey::CritDmgPct => self.crit_dmg += value,
            StatKey::PiercePct => self.pierce += value,
            StatKey::ResPenPct => self.res_pen += value,
            StatKey::DefPenPct => self.def_pen += value,
            StatKey::DmgBonusPct => self.dmg_bonus += value,
            StatKey::DmgTakenPct => self.dmg_taken += value,
            StatKey::SkillDmgPct => self.skill_dmg += value,
            StatKey::UltDmgPct => self.ult_dmg += value,
        }
    }
}

fn scope_matches(scope: BuffScope, kind: ActionKind) -> bool {
    match scope {
        BuffScope::All => true,
        BuffScope::Skill => kind == ActionKind::Skill,
        BuffScope::Ultimate => kind == ActionKind::Ultimate,
    }
}

/// Merge a build's raw stats with its enabled buffs and potentials for the
/// given context.
pub fn resolve_stats(build: &Build, ctx: &Context) -> ComputedStats {
    let raw = &build.stats;
    let mut deltas = AdditiveDeltas::default();
    let mut atk_factor = 1.0;
    let mut damage_factor = 1.0;

    for buff in &build.buffs {
        if !buff.enabled || !scope_matches(buff.scope, ctx.kind) {
            continue;
        }
        match buff.application {
            BuffApplication::AdditivePct => deltas.add(buff.stat, buff.value),
            BuffApplication::Multiplicative => {
                if buff.stat == StatKey::Atk {
                    atk_factor *= buff.value;
                } else {
                    damage_factor *= buff.value;
                }
            }
        }
    }

    let mut stats = ComputedStats {
        // Flat stats scale by their additive-percent delta; percentage stats
        // gain points.
        atk: raw.atk * (1.0 + deltas.atk / 100.0) * atk_factor,
        def: raw.def * (1.0 + deltas.def / 100.0),
        crit_rate_pct: raw.crit_rate_pct + deltas.crit_rate,
        crit_dmg_pct: raw.crit_dmg_pct + deltas.crit_dmg,
        pierce_pct: raw.pierce_pct + deltas.pierce,
        res_pen_pct: raw.res_pen_pct + deltas.res_pen,
        def_pen_pct: raw.def_pen_pct + deltas.def_pen,
        dmg_bonus_pct: raw.dmg_bonus_pct + deltas.dmg_bonus,
        dmg_taken_pct: raw.dmg_taken_pct + deltas.dmg_taken,
        skill_dmg_pct: raw.skill_dmg_pct + deltas.skill_dmg,
        ult_dmg_pct: raw.ult_dmg_pct + deltas.ult_dmg,
        damage_factor,
        element: raw.element,
    };

    for potential in &build.potentials {
        if !potential.enabled {
            continue;
        }
        for effect in &potential.effects {
            apply_effect(&mut stats, effect, ctx);
        }
    }

    clamp_stats(&mut stats);
    stats
}

/// Evaluate one parsed effect against the context. Conditions that do not
/// hold, and unknown tags, are no-ops.
pub fn apply_effect(stats: &mut ComputedStats, effect: &Effect, ctx: &Context) {
    match effect {
        Effect::AtkPct { value } => stats.atk *= 1.0 + value / 100.0,
        Effect::DmgBonusPct { value } => stats.dmg_bonus_pct += value,
        Effect::BonusIfDebuffed { value } => {
            if ctx.enemy_debuffed {
                stats.dmg_bonus_pct += value;
            }
        }
        Effect::IgnoreDefPct { value } => stats.def_pen_pct += value,
        Effect::ResPenPct { value } => stats.res_pen_pct += value,
        Effect::CritRatePct { value } => stats.crit_rate_pct += value,
        Effect::CritDmgPct { value } => stats.crit_dmg_pct += value,
        Effect::CritDmgIfHpBelow {
            value,
            threshold_pct,
        } => {
            if ctx.enemy_hp_pct <= *threshold_pct {
                stats.crit_dmg_pct += value;
            }
        }
        Effect::PerStackBonusPct { value } => {
            stats.dmg_bonus_pct += value * ctx.stacks as f64;
        }
        Effect::PerDebuffBonusPct { value } => {
            stats.dmg_bonus_pct += value * ctx.debuff_count as f64;
        }
        Effect::AtkPctPerAlly { value } => {
            stats.atk *= 1.0 + (value * ctx.ally_count as f64) / 100.0;
        }
        Effect::Unknown => {}
    }
}

/// Clamp every stat to its model-defined valid range. The crit-rate cap is
/// settings-dependent and applied by the damage formula.
pub(crate) fn clamp_stats(stats: &mut ComputedStats) {
    stats.atk = stats.atk.max(0.0);
    stats.def = stats.def.max(0.0);
    stats.crit_rate_pct = stats.crit_rate_pct.max(0.0);
    stats.crit_dmg_pct = stats.crit_dmg_pct.max(0.0);
    stats.pierce_pct = stats.pierce_pct.clamp(PIERCE_MIN_PCT, PIERCE_CAP_PCT);
    stats.res_pen_pct = stats.res_pen_pct.max(0.0);
    stats.def_pen_pct = stats.def_pen_pct.clamp(0.0, DEF_PEN_CAP_PCT);
    stats.dmg_taken_pct = stats.dmg_taken_pct.max(-100.0);
    stats.damage_factor = stats.damage_factor.max(0.0);
}
