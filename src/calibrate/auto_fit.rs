//! Structural Auto-Fit: a nested discrete + continuous search.
//!
//! The discrete layer enumerates the 16 formula-structure combinations (crit
//! order × mitigation model × pierce mode × element stage). Each structure is
//! scored cheaply with a coarse (global_mult, def_coeff) grid on a small
//! deterministic subset of cases; only the best few structures earn a refined
//! full-set grid centered on their coarse optimum. The search stops early as
//! soon as a refinement's RMSE, relative to the mean observed damage, drops
//! to the configured threshold.

use serde::{Deserialize, Serialize};

use crate::calibrate::{predict_case, CalibrationCase, CalibrationError};
use crate::model::{CritOrder, ElementStage, MitigationModel, PierceMode, Settings, SkillBook};

// Coarse grid over the coefficient plane.
const COARSE_GLOBAL_MIN: f64 = 0.5;
const COARSE_GLOBAL_STEPS: usize = 16;
const COARSE_DEF_MIN: f64 = 0.4;
const COARSE_DEF_STEPS: usize = 13;
const COARSE_STEP: f64 = 0.1;

// Refined grid: ± this radius around the coarse optimum.
const REFINE_RADIUS: f64 = 0.1;
const REFINE_STEP: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitSpeed {
    /// Keep 4 structures for refinement.
    Fast,
    /// Keep 6 structures for refinement.
    Thorough,
}

impl FitSpeed {
    fn retained_structures(self) -> usize {
        match self {
            Self::Fast => 4,
            Self::Thorough => 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutoFitOptions {
    pub speed: FitSpeed,
    /// Stop as soon as RMSE / mean(observed) reaches this value.
    pub early_stop_rel_rmse: f64,
    /// Cases used for the coarse prefilter pass.
    pub sample_size: usize,
}

impl Default for AutoFitOptions {
    fn default() -> Self {
        Self {
            speed: FitSpeed::Fast,
            early_stop_rel_rmse: 0.01,
            sample_size: 6,
        }
    }
}

/// One point of the discrete structure space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormulaStructure {
    pub crit_order: CritOrder,
    pub mitigation_model: MitigationModel,
    pub pierce_mode: PierceMode,
    pub element_stage: ElementStage,
}

impl FormulaStructure {
    /// All 16 combinations, in a stable order.
    pub fn all() -> Vec<FormulaStructure> {
        let mut out = Vec::with_capacity(16);
        for crit_order in [CritOrder::BeforeMitigation, CritOrder::AfterMitigation] {
            for mitigation_model in [MitigationModel::Linear, MitigationModel::Ratio] {
                for pierce_mode in [PierceMode::Multiplicative, PierceMode::Additive] {
                    for element_stage in [ElementStage::Early, ElementStage::Late] {
                        out.push(FormulaStructure {
                            crit_order,
                            mitigation_model,
                            pierce_mode,
                            element_stage,
                        });
                    }
                }
            }
        }
        out
    }

    /// Trial settings with this structure and the given coefficients. Builds
    /// a copy; never mutates the base.
    pub fn trial_settings(&self, base: &Settings, global_mult: f64, def_coeff: f64) -> Settings {
        Settings {
            crit_order: self.crit_order,
            mitigation_model: self.mitigation_model,
            pierce_mode: self.pierce_mode,
            element_stage: self.element_stage,
            global_mult,
            def_coeff,
            ..base.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoFitResult {
    pub structure: FormulaStructure,
    pub global_mult: f64,
    pub def_coeff: f64,
    /// Root-mean-square error over the full case set.
    pub rmse: f64,
    /// Mean absolute percentage error, for interpretability.
    pub mape: f64,
}

/// Fit the formula structure and the two calibration coefficients to the
/// recorded cases, minimizing RMSE. Requires at least three cases with
/// positive observed damage. The input settings are read-only; applying the
/// returned structure/coefficients is up to the caller.
pub fn auto_fit(
    cases: &[CalibrationCase],
    settings: &Settings,
    skills: &SkillBook,
    options: &AutoFitOptions,
) -> Result<AutoFitResult, CalibrationError> {
    if cases.len() < 3 {
        return Err(CalibrationError::TooFewCases { got: cases.len() });
    }
    if cases.iter().any(|c| !(c.observed > 0.0)) {
        return Err(CalibrationError::NonPositiveObserved);
    }

    let subset = prefilter_subset(cases, options.sample_size.max(1));
    let mean_observed =
        cases.iter().map(|c| c.observed).sum::<f64>() / cases.len() as f64;

    // Phase 1: coarse-score every structure on the subset.
    let mut scored: Vec<(FormulaStructure, f64, f64, f64)> = FormulaStructure::all()
        .into_iter()
        .map(|structure| {
            let (g, d, rmse) = coarse_search(&structure, &subset, settings, skills);
            (structure, g, d, rmse)
        })
        .collect();
    scored.sort_by(|a, b| a.3.total_cmp(&b.3));
    scored.truncate(options.speed.retained_structures());

    // Phase 2: refine the survivors on the full set.
    let mut best: Option<AutoFitResult> = None;
    for (structure, coarse_g, coarse_d, _) in scored {
        let candidate = refine_search(
            &structure, cases, settings, skills, coarse_g, coarse_d,
        );
        let better = match &best {
            Some(current) => candidate.rmse < current.rmse,
            None => true,
        };
        if better {
            best = Some(candidate);
        }
        let current = best.as_ref().unwrap();
        if mean_observed > 0.0
            && current.rmse / mean_observed <= options.early_stop_rel_rmse
        {
            break;
        }
    }

    // At least one structure is always refined, so best is present.
    Ok(best.expect("structure space is non-empty"))
}

/// Deterministic evenly-spaced subset of the cases for the coarse pass.
fn prefilter_subset(cases: &[CalibrationCase], sample_size: usize) -> Vec<CalibrationCase> {
    if cases.len() <= sample_size {
        return cases.to_vec();
    }
    let stride = cases.len() as f64 / sample_size as f64;
    (0..sample_size)
        .map(|i| cases[(i as f64 * stride) as usize].clone())
        .collect()
}

fn score(
    cases: &[CalibrationCase],
    settings: &Settings,
    skills: &SkillBook,
) -> (f64, f64) {
    let mut sq_sum = 0.0;
    let mut ape_sum = 0.0;
    for case in cases {
        let predicted = predict_case(case, settings, skills);
        let err = predicted - case.observed;
        sq_sum += err * err;
        ape_sum += err.abs() / case.observed;
    }
    let n = cases.len() as f64;
    ((sq_sum / n).sqrt(), 100.0 * ape_sum / n)
}

fn coarse_search(
    structure: &FormulaStructure,
    subset: &[CalibrationCase],
    settings: &Settings,
    skills: &SkillBook,
) -> (f64, f64, f64) {
    let mut best = (1.0, 1.0, f64::INFINITY);
    for gi in 0..COARSE_GLOBAL_STEPS {
        let g = COARSE_GLOBAL_MIN + gi as f64 * COARSE_STEP;
        for di in 0..COARSE_DEF_STEPS {
            let d = COARSE_DEF_MIN + di as f64 * COARSE_STEP;
            let trial = structure.trial_settings(settings, g, d);
            let (rmse, _) = score(subset, &trial, skills);
            if rmse < best.2 {
                best = (g, d, rmse);
            }
        }
    }
    best
}

fn refine_search(
    structure: &FormulaStructure,
    cases: &[CalibrationCase],
    settings: &Settings,
    skills: &SkillBook,
    center_global: f64,
    center_def: f64,
) -> AutoFitResult {
    let steps = (2.0 * REFINE_RADIUS / REFINE_STEP).round() as usize;
    let mut best = AutoFitResult {
        structure: *structure,
        global_mult: center_global,
        def_coeff: center_def,
        rmse: f64::INFINITY,
        mape: f64::INFINITY,
    };
    for gi in 0..=steps {
        let g = (center_global - REFINE_RADIUS + gi as f64 * REFINE_STEP).max(0.0);
        for di in 0..=steps {
            let d = (center_def - REFINE_RADIUS + di as f64 * REFINE_STEP).max(0.0);
            let trial = structure.trial_settings(settings, g, d);
            let (rmse, mape) = score(cases, &trial, skills);
            if rmse < best.rmse {
                best = AutoFitResult {
                    structure: *structure,
                    global_mult: g,
                    def_coeff: d,
                    rmse,
                    mape,
                };
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_space_has_sixteen_unique_points() {
        let all = FormulaStructure::all();
        assert_eq!(all.len(), 16);
        for (i, a) in all.iter().enumerate() {
            for b in all.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn trial_settings_do_not_touch_the_base() {
        let base = Settings::default();
        let structure = FormulaStructure {
            crit_order: CritOrder::BeforeMitigation,
            mitigation_model: MitigationModel::Linear,
            pierce_mode: PierceMode::Additive,
            element_stage: ElementStage::Early,
        };
        let trial = structure.trial_settings(&base, 1.7, 0.8);
        assert_eq!(base, Settings::default());
        assert_eq!(trial.global_mult, 1.7);
        assert_eq!(trial.def_coeff, 0.8);
        assert_eq!(trial.mitigation_model, MitigationModel::Linear);
        // Non-structural fields carried over from the base.
        assert_eq!(trial.mitigation_k, base.mitigation_k);
    }
}
