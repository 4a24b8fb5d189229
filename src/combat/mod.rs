pub mod element;
pub mod formula;
pub mod rng;
pub mod stats;

pub use element::{advantage_multiplier, Element, ADVANTAGE_MULT, DISADVANTAGE_MULT};
pub use formula::{
    crit_params, expected_crit_multiplier, mitigation_factor, pierce_delta,
    single_action_damage, ActionContext, EvalMode, CRIT_DMG_CAP_PCT, PIERCE_DELTA_MAX,
    PIERCE_DELTA_MIN,
};
pub use rng::{sub_seed, Rng};
pub use stats::{
    apply_effect, resolve_stats, ComputedStats, DEF_PEN_CAP_PCT, PIERCE_CAP_PCT, PIERCE_MIN_PCT,
};

pub const EPSILON: f64 = 1e-9;
