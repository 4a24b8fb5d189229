//! Calibration: fit the formula model's free parameters to observed damage.
//!
//! Two entry points: [fit_single_k] scans the mitigation constant against one
//! observed hit, [auto_fit] searches the discrete formula-structure space and
//! the continuous coefficient plane against a set of recorded cases. Both
//! work on trial copies of [Settings]; the caller's settings are never
//! touched, and applying a fit is an explicit caller decision.

pub mod auto_fit;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use auto_fit::{auto_fit, AutoFitOptions, AutoFitResult, FitSpeed, FormulaStructure};

use crate::combat::{resolve_stats, single_action_damage, ActionContext, EvalMode, Rng};
use crate::model::rotation::{ActionKind, SkillRef};
use crate::model::{Build, Scenario, Settings, SkillBook};

/// K scan bounds and resolution for the single-constant fit.
pub const K_SCAN_MIN: f64 = 200.0;
pub const K_SCAN_MAX: f64 = 20_000.0;
pub const K_SCAN_STEP: f64 = 25.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalibrationError {
    /// Auto-Fit needs at least three cases to be meaningful.
    TooFewCases { got: usize },
    /// Observed damage must be strictly positive.
    NonPositiveObserved,
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewCases { got } => {
                write!(f, "auto-fit needs at least 3 calibration cases, got {got}")
            }
            Self::NonPositiveObserved => write!(f, "observed damage must be positive"),
        }
    }
}

impl std::error::Error for CalibrationError {}

/// Action description of a calibration case: manual fields, or a skill
/// reference that overrides them when it resolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub kind: ActionKind,
    #[serde(default)]
    pub mult: f64,
    #[serde(default = "default_hits")]
    pub hits: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<SkillRef>,
}

fn default_hits() -> u32 {
    1
}

/// One recorded observation: a build hit a scenario with an action and dealt
/// this much damage. Created and deleted by the host's calibration UI;
/// consumed read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationCase {
    pub build: Build,
    pub scenario: Scenario,
    pub action: ActionSpec,
    pub observed: f64,
    /// Whether the observation was taken inside a burst window.
    #[serde(default)]
    pub burst: bool,
}

/// Expected damage for one case under the given trial settings.
pub(crate) fn predict_case(
    case: &CalibrationCase,
    settings: &Settings,
    skills: &SkillBook,
) -> f64 {
    let resolved = case
        .action
        .skill
        .as_ref()
        .and_then(|r| skills.resolve_ref(r));
    let (kind, mult, hits, effects) = match resolved {
        Some(spec) => (spec.kind, spec.mult, spec.hits, spec.effects.clone()),
        None => (case.action.kind, case.action.mult, case.action.hits, Vec::new()),
    };

    let ctx = settings.context_for(kind);
    let stats = resolve_stats(&case.build, &ctx);
    let action_ctx = ActionContext {
        kind,
        mult,
        hits,
        effects,
    };
    // Expected mode never consumes the RNG.
    let mut rng = Rng::new(0);
    let mut predicted = single_action_damage(
        &stats,
        &case.scenario.enemy,
        settings,
        &action_ctx,
        EvalMode::Expected,
        &mut rng,
    );
    if case.burst {
        predicted *= (1.0 + settings.burst_bonus_pct / 100.0)
            * (1.0 - case.scenario.enemy.burst_resist);
    }
    predicted
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleKFit {
    pub k: f64,
    /// Relative error `|predicted - observed| / observed` at the best K.
    pub rel_error: f64,
    pub predicted: f64,
}

/// Exhaustively scan K over `[K_SCAN_MIN, K_SCAN_MAX]` and keep the value
/// minimizing relative error against the observed damage. The range is small
/// enough that no early termination is needed.
pub fn fit_single_k(
    case: &CalibrationCase,
    settings: &Settings,
    skills: &SkillBook,
) -> Result<SingleKFit, CalibrationError> {
    if !(case.observed > 0.0) {
        return Err(CalibrationError::NonPositiveObserved);
    }

    let steps = ((K_SCAN_MAX - K_SCAN_MIN) / K_SCAN_STEP) as usize;
    let mut best = SingleKFit {
        k: settings.safe_k(),
        rel_error: f64::INFINITY,
        predicted: f64::NAN,
    };
    for i in 0..=steps {
        let k = K_SCAN_MIN + i as f64 * K_SCAN_STEP;
        let trial = Settings {
            mitigation_k: k,
            ..settings.clone()
        };
        let predicted = predict_case(case, &trial, skills);
        let rel_error = (predicted - case.observed).abs() / case.observed;
        if rel_error < best.rel_error {
            best = SingleKFit {
                k,
                rel_error,
                predicted,
            };
        }
    }
    Ok(best)
}
