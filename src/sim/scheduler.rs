//! Rotation scheduler: advances simulated time through a priority list or a
//! fixed timeline, gating actions on cooldowns and the orb resource, and
//! accumulating damage plus a readable trace.

use std::collections::HashMap;

use crate::combat::{resolve_stats, single_action_damage, ActionContext, EvalMode, Rng};
use crate::model::rotation::{Action, ActionKind, Rotation, RotationKind};
use crate::model::{Build, BurstMode, Scenario, Settings, SkillBook};

/// Time advanced after an executed action before the next priority scan.
const ACTION_STEP: f64 = 0.01;
/// Time advanced when no priority action is ready.
const IDLE_STEP: f64 = 0.1;
/// Slack for floating-point time comparisons.
const TIME_EPS: f64 = 1e-9;

/// One scheduler pass over a rotation.
#[derive(Debug, Clone)]
pub struct RotationOutcome {
    pub total_damage: f64,
    pub dps: f64,
    pub trace: Vec<String>,
}

/// Whether the burst window is active at time `t`, subject to the settings
/// override: `On`/`Off` force the answer, `Auto` consults the rotation's
/// burst plan.
pub fn burst_active_at(t: f64, rotation: &Rotation, settings: &Settings) -> bool {
    match settings.burst_mode {
        BurstMode::On => true,
        BurstMode::Off => false,
        BurstMode::Auto => {
            let plan = &rotation.burst;
            plan.enabled && t >= plan.start && t <= plan.start + plan.duration
        }
    }
}

struct Executor<'a> {
    build: &'a Build,
    rotation: &'a Rotation,
    scenario: &'a Scenario,
    settings: &'a Settings,
    skills: &'a SkillBook,
    mode: EvalMode,
    orbs: u32,
    cooldowns: HashMap<String, f64>,
    total_damage: f64,
    trace: Vec<String>,
}

enum Step {
    /// Action executed (or wait consumed); advance time by this much.
    Advance(f64),
    /// Cooldown or orb gate not satisfied.
    NotReady,
}

impl<'a> Executor<'a> {
    fn try_action(&mut self, action: &Action, now: f64, rng: &mut Rng) -> Step {
        if action.kind == ActionKind::Wait {
            let dt = if action.cooldown > 0.0 {
                action.cooldown
            } else {
                1.0
            };
            return Step::Advance(dt.max(IDLE_STEP));
        }

        let key = action.key().to_string();
        let ready_at = self.cooldowns.get(&key).copied().unwrap_or(0.0);
        if now + TIME_EPS < ready_at {
            return Step::NotReady;
        }
        if action.orb_cost > 0 && self.orbs < action.orb_cost {
            return Step::NotReady;
        }

        // A skill reference overrides the manual kind/mult/hits and supplies
        // effects; a missing entry falls back to the manual fields.
        let resolved = action
            .skill
            .as_ref()
            .and_then(|r| self.skills.resolve_ref(r));
        let (kind, mult, hits, effects) = match resolved {
            Some(spec) => (spec.kind, spec.mult, spec.hits, spec.effects.clone()),
            None => (action.kind, action.mult, action.hits, Vec::new()),
        };

        let mut burst_mul = 1.0;
        if action.burst_eligible && burst_active_at(now, self.rotation, self.settings) {
            burst_mul = (1.0 + self.settings.burst_bonus_pct / 100.0)
                * (1.0 - self.scenario.enemy.burst_resist);
        }

        let ctx = self.settings.context_for(kind);
        let stats = resolve_stats(self.build, &ctx);
        let action_ctx = ActionContext {
            kind,
            mult,
            hits,
            effects,
        };
        let dealt = single_action_damage(
            &stats,
            &self.scenario.enemy,
            self.settings,
            &action_ctx,
            self.mode,
            rng,
        ) * burst_mul;
        self.total_damage += dealt;

        if self.settings.verbose_trace {
            self.trace
                .push(format!("{now:.1}s: {key} dealt={dealt:.0}"));
        }

        match kind {
            ActionKind::Skill => {
                self.orbs = (self.orbs + self.settings.orb_gain_per_skill)
                    .min(self.settings.orb_capacity);
            }
            ActionKind::Ultimate => {
                self.orbs = self.orbs.saturating_sub(action.orb_cost);
            }
            ActionKind::Wait => {}
        }

        self.cooldowns.insert(key, now + action.cooldown.max(0.0));
        Step::Advance(ACTION_STEP)
    }
}

/// Run one rotation pass over `[0, duration]` and report total damage, DPS,
/// and the trace.
#[allow(clippy::too_many_arguments)]
pub fn simulate_once(
    build: &Build,
    rotation: &Rotation,
    scenario: &Scenario,
    duration: f64,
    settings: &Settings,
    skills: &SkillBook,
    mode: EvalMode,
    rng: &mut Rng,
) -> RotationOutcome {
    let mut exec = Executor {
        build,
        rotation,
        scenario,
        settings,
        skills,
        mode,
        orbs: settings.initial_orbs.min(settings.orb_capacity),
        cooldowns: HashMap::new(),
        total_damage: 0.0,
        trace: Vec::new(),
    };

    match &rotation.kind {
        RotationKind::Timeline {
            events,
            looped,
            period,
        } => {
            // Pre-expand all loop periods that fit, then replay in order. A
            // gated event is skipped; it never blocks the timeline.
            let period = if *period > 0.0 { *period } else { duration };
            let loops = if *looped {
                (duration / period).ceil().max(1.0) as usize
            } else {
                1
            };
            let mut expanded: Vec<(f64, &Action)> = Vec::new();
            for k in 0..loops {
                for event in events {
                    let at = event.at + k as f64 * period;
                    if at <= duration + TIME_EPS {
                        expanded.push((at, &event.action));
                    }
                }
            }
            expanded.sort_by(|a, b| a.0.total_cmp(&b.0));
            for (at, action) in expanded {
                exec.try_action(action, at, rng);
            }
        }
        RotationKind::Priority { actions } => {
            let mut t = 0.0;
            while t <= duration + TIME_EPS {
                let mut advanced = None;
                for action in actions {
                    if let Step::Advance(dt) = exec.try_action(action, t, rng) {
                        advanced = Some(dt);
                        break;
                    }
                }
                t += advanced.unwrap_or(IDLE_STEP);
            }
        }
    }

    let total_damage = exec.total_damage;
    let mut trace = exec.trace;
    if !settings.verbose_trace {
        trace = summary_trace(rotation, scenario, duration, settings);
    }

    RotationOutcome {
        total_damage,
        dps: if duration > 0.0 {
            total_damage / duration
        } else {
            0.0
        },
        trace,
    }
}

fn summary_trace(
    rotation: &Rotation,
    scenario: &Scenario,
    duration: f64,
    settings: &Settings,
) -> Vec<String> {
    let burst_mode = match settings.burst_mode {
        BurstMode::Auto => "auto",
        BurstMode::On => "on",
        BurstMode::Off => "off",
    };
    let window = if rotation.burst.enabled {
        format!(
            "{}-{}s",
            rotation.burst.start,
            rotation.burst.start + rotation.burst.duration
        )
    } else {
        "off".to_string()
    };
    vec![
        format!("Rotation: {} ({})", rotation.name, rotation.kind_label()),
        format!("Scenario: {}", scenario.name),
        format!(
            "Duration: {duration}s, orbs start={} (+{} per skill, cap {})",
            settings.initial_orbs, settings.orb_gain_per_skill, settings.orb_capacity
        ),
        format!(
            "Burst: {burst_mode}, bonus={}%, window={window}",
            settings.burst_bonus_pct
        ),
        "Enable verbose_trace in settings for per-action lines.".to_string(),
    ]
}
