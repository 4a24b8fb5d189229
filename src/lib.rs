//! Damage resolution, rotation simulation, and calibration engine for
//! build-vs-scenario DPS estimation.
//!
//! The crate is a pure computation library: the host application owns
//! persistence, editing, and rendering, and hands in plain data records
//! ([model]). The pipeline runs one direction: [combat::resolve_stats] merges
//! a build's stats with buffs and potential effects, [combat::single_action_damage]
//! resolves one action's damage under a configurable formula model,
//! [sim::simulate_once] drives a rotation over simulated time, and
//! [sim::run_simulation] aggregates expected-value or Monte Carlo runs into
//! summary statistics. [calibrate] fits the model's free parameters to
//! observed damage.
//!
//! None of the formulas are confirmed against the real game; every disputed
//! ordering (crit before/after mitigation, multiplicative/additive pierce,
//! early/late element) is kept as explicit [model::Settings] configuration.

pub mod calibrate;
pub mod combat;
pub mod model;
pub mod sim;
