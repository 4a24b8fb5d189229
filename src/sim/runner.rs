//! Simulation runner: one expected-value pass, or N reproducible Monte Carlo
//! passes aggregated into summary statistics.
//!
//! Each stochastic iteration gets its own generator seeded by
//! [sub_seed]`(settings.mc_seed, i)`, so a batch is reproducible bit-for-bit
//! from the base seed and N, and the rayon path produces identical results to
//! the sequential one.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{sub_seed, EvalMode, Rng};
use crate::model::{Build, Rotation, Scenario, Settings, SkillBook};
use crate::sim::scheduler::simulate_once;
use crate::sim::summary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// Duration must be strictly positive.
    InvalidDuration,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDuration => write!(f, "simulation duration must be positive"),
        }
    }
}

impl std::error::Error for SimulationError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p05: f64,
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    /// Raw per-run DPS samples, in run order.
    pub samples: Vec<f64>,
    pub trace: Vec<String>,
}

/// Run the rotation once (expected mode) or `iterations` times (stochastic
/// mode) and aggregate per-run DPS into summary statistics.
pub fn run_simulation(
    build: &Build,
    rotation: &Rotation,
    scenario: &Scenario,
    duration: f64,
    iterations: usize,
    mode: EvalMode,
    settings: &Settings,
    skills: &SkillBook,
) -> Result<SimulationResult, SimulationError> {
    run_with_parallelism(
        build, rotation, scenario, duration, iterations, mode, settings, skills, false,
    )
}

/// Like [run_simulation] but distributes stochastic iterations across all CPU
/// cores. Results are identical to the sequential path because every
/// iteration derives its own seed from the iteration index.
pub fn run_simulation_parallel(
    build: &Build,
    rotation: &Rotation,
    scenario: &Scenario,
    duration: f64,
    iterations: usize,
    mode: EvalMode,
    settings: &Settings,
    skills: &SkillBook,
) -> Result<SimulationResult, SimulationError> {
    run_with_parallelism(
        build, rotation, scenario, duration, iterations, mode, settings, skills, true,
    )
}

#[allow(clippy::too_many_arguments)]
fn run_with_parallelism(
    build: &Build,
    rotation: &Rotation,
    scenario: &Scenario,
    duration: f64,
    iterations: usize,
    mode: EvalMode,
    settings: &Settings,
    skills: &SkillBook,
    parallel: bool,
) -> Result<SimulationResult, SimulationError> {
    if !(duration > 0.0) {
        return Err(SimulationError::InvalidDuration);
    }

    let run_one = |seed: u64| {
        let mut rng = Rng::new(seed);
        simulate_once(
            build, rotation, scenario, duration, settings, skills, mode, &mut rng,
        )
    };

    let (samples, trace) = match mode {
        EvalMode::Expected => {
            // Single deterministic pass; the RNG is constructed but never
            // consumed.
            let outcome = run_one(settings.mc_seed);
            (vec![outcome.dps], outcome.trace)
        }
        EvalMode::Stochastic => {
            let n = iterations.max(1);
            let seeds: Vec<u64> = (0..n as u64).map(|i| sub_seed(settings.mc_seed, i)).collect();
            let outcomes: Vec<_> = if parallel {
                seeds.par_iter().map(|&s| run_one(s)).collect()
            } else {
                seeds.iter().map(|&s| run_one(s)).collect()
            };
            let trace = outcomes
                .first()
                .map(|o| o.trace.clone())
                .unwrap_or_default();
            (outcomes.into_iter().map(|o| o.dps).collect(), trace)
        }
    };

    Ok(summarize(samples, trace))
}

fn summarize(samples: Vec<f64>, trace: Vec<String>) -> SimulationResult {
    let mut sorted = samples.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));
    SimulationResult {
        mean: summary::mean(&samples),
        std_dev: summary::sample_std(&samples),
        min: sorted.first().copied().unwrap_or(0.0),
        max: sorted.last().copied().unwrap_or(0.0),
        p05: summary::quantile(&sorted, 0.05),
        p10: summary::quantile(&sorted, 0.10),
        p50: summary::quantile(&sorted, 0.50),
        p90: summary::quantile(&sorted, 0.90),
        p95: summary::quantile(&sorted, 0.95),
        samples,
        trace,
    }
}
