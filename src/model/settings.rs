//! Formula model settings.
//!
//! Every disputed ordering in the damage formula is a first-class field here:
//! the real game's formula is unconfirmed, so crit order, pierce mode, and
//! element stage stay configuration axes instead of hard-coded choices. The
//! two calibration coefficients (`global_mult`, `def_coeff`) and the
//! mitigation constant `K` are the free parameters the calibration engine
//! fits.

use serde::{Deserialize, Serialize};

use crate::model::rotation::ActionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MitigationModel {
    /// `reduction = eff_def / (eff_def + K)`.
    Ratio,
    /// `reduction = min(eff_def / K, 0.80)`.
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CritOrder {
    BeforeMitigation,
    AfterMitigation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PierceMode {
    /// `damage *= mitigation * (1 + pierce_delta)`.
    Multiplicative,
    /// `damage = damage * mitigation + damage * pierce_delta`.
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementStage {
    /// Elemental multiplier before mitigation.
    Early,
    /// Elemental multiplier after every other factor except `global_mult`.
    Late,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurstMode {
    /// Burst window of the rotation decides.
    Auto,
    /// Burst always active.
    On,
    /// Burst never active.
    Off,
}

/// Ephemeral evaluation inputs for conditional effects and bucket selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub enemy_debuffed: bool,
    pub enemy_hp_pct: f64,
    pub stacks: u32,
    pub debuff_count: u32,
    pub ally_count: u32,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_mitigation_model")]
    pub mitigation_model: MitigationModel,
    /// Mitigation constant; clamped to >= 1 before use.
    #[serde(default = "default_mitigation_k")]
    pub mitigation_k: f64,
    #[serde(default = "default_crit_cap")]
    pub crit_cap_pct: f64,
    #[serde(default = "default_burst_bonus")]
    pub burst_bonus_pct: f64,
    #[serde(default = "default_burst_mode")]
    pub burst_mode: BurstMode,
    #[serde(default = "default_orb_gain")]
    pub orb_gain_per_skill: u32,
    #[serde(default = "default_orb_capacity")]
    pub orb_capacity: u32,
    #[serde(default)]
    pub initial_orbs: u32,
    #[serde(default = "default_crit_order")]
    pub crit_order: CritOrder,
    #[serde(default = "default_pierce_mode")]
    pub pierce_mode: PierceMode,
    #[serde(default = "default_element_stage")]
    pub element_stage: ElementStage,
    /// Free calibration coefficient applied as the last multiplier.
    #[serde(default = "default_unit")]
    pub global_mult: f64,
    /// Free calibration coefficient scaling enemy defense.
    #[serde(default = "default_unit")]
    pub def_coeff: f64,
    #[serde(default = "default_mc_seed")]
    pub mc_seed: u64,
    #[serde(default = "default_hist_bins")]
    pub hist_bins: usize,
    /// Per-action trace lines instead of the summary header block.
    #[serde(default)]
    pub verbose_trace: bool,
    // Ambient context defaults, combined with the action kind at execution
    // time.
    #[serde(default)]
    pub enemy_debuffed: bool,
    #[serde(default = "default_enemy_hp_pct")]
    pub enemy_hp_pct: f64,
    #[serde(default)]
    pub stacks: u32,
    #[serde(default)]
    pub debuff_count: u32,
    #[serde(default)]
    pub ally_count: u32,
}

fn default_mitigation_model() -> MitigationModel {
    MitigationModel::Ratio
}
fn default_mitigation_k() -> f64 {
    1200.0
}
fn default_crit_cap() -> f64 {
    100.0
}
fn default_burst_bonus() -> f64 {
    25.0
}
fn default_burst_mode() -> BurstMode {
    BurstMode::Auto
}
fn default_orb_gain() -> u32 {
    2
}
fn default_orb_capacity() -> u32 {
    7
}
fn default_crit_order() -> CritOrder {
    CritOrder::AfterMitigation
}
fn default_pierce_mode() -> PierceMode {
    PierceMode::Multiplicative
}
fn default_element_stage() -> ElementStage {
    ElementStage::Late
}
fn default_unit() -> f64 {
    1.0
}
fn default_mc_seed() -> u64 {
    12345
}
fn default_hist_bins() -> usize {
    24
}
fn default_enemy_hp_pct() -> f64 {
    100.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mitigation_model: default_mitigation_model(),
            mitigation_k: default_mitigation_k(),
            crit_cap_pct: default_crit_cap(),
            burst_bonus_pct: default_burst_bonus(),
            burst_mode: default_burst_mode(),
            orb_gain_per_skill: default_orb_gain(),
            orb_capacity: default_orb_capacity(),
            initial_orbs: 0,
            crit_order: default_crit_order(),
            pierce_mode: default_pierce_mode(),
            element_stage: default_element_stage(),
            global_mult: 1.0,
            def_coeff: 1.0,
            mc_seed: default_mc_seed(),
            hist_bins: default_hist_bins(),
            verbose_trace: false,
            enemy_debuffed: false,
            enemy_hp_pct: default_enemy_hp_pct(),
            stacks: 0,
            debuff_count: 0,
            ally_count: 0,
        }
    }
}

impl Settings {
    /// Evaluation context for an action of the given kind, using the ambient
    /// defaults carried by these settings.
    pub fn context_for(&self, kind: ActionKind) -> Context {
        Context {
            enemy_debuffed: self.enemy_debuffed,
            enemy_hp_pct: self.enemy_hp_pct,
            stacks: self.stacks,
            debuff_count: self.debuff_count,
            ally_count: self.ally_count,
            kind,
        }
    }

    /// Mitigation constant with the K >= 1 invariant applied.
    pub fn safe_k(&self) -> f64 {
        self.mitigation_k.max(1.0)
    }
}
