//! Rotation records: ordered action priorities or fixed timelines, plus the
//! burst window definition.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Skill,
    Ultimate,
    /// Advances time without dealing damage or touching cooldowns.
    Wait,
}

/// Reference to an externally defined skill. When present, the resolved
/// [crate::model::SkillSpec] overrides the action's manual kind, multiplier,
/// hit count, and effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRef {
    pub character_id: String,
    pub skill_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    /// Cooldown key and trace label; falls back to the kind name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub mult: f64,
    #[serde(default = "default_hits")]
    pub hits: u32,
    /// Seconds until this action is ready again after executing.
    #[serde(default)]
    pub cooldown: f64,
    /// Orbs required and consumed; only ultimates pay.
    #[serde(default)]
    pub orb_cost: u32,
    #[serde(default)]
    pub burst_eligible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<SkillRef>,
}

fn default_hits() -> u32 {
    1
}

impl Action {
    pub fn skill(mult: f64, hits: u32, cooldown: f64) -> Self {
        Self {
            kind: ActionKind::Skill,
            label: None,
            mult,
            hits,
            cooldown,
            orb_cost: 0,
            burst_eligible: false,
            skill: None,
        }
    }

    pub fn ultimate(mult: f64, hits: u32, cooldown: f64, orb_cost: u32) -> Self {
        Self {
            kind: ActionKind::Ultimate,
            label: None,
            mult,
            hits,
            cooldown,
            orb_cost,
            burst_eligible: true,
            skill: None,
        }
    }

    pub fn wait(seconds: f64) -> Self {
        Self {
            kind: ActionKind::Wait,
            label: None,
            mult: 0.0,
            hits: 0,
            cooldown: seconds,
            orb_cost: 0,
            burst_eligible: false,
            skill: None,
        }
    }

    /// Cooldown-ledger key: explicit label, or the kind name.
    pub fn key(&self) -> &str {
        match &self.label {
            Some(label) => label.as_str(),
            None => match self.kind {
                ActionKind::Skill => "skill",
                ActionKind::Ultimate => "ultimate",
                ActionKind::Wait => "wait",
            },
        }
    }
}

/// One timestamped entry of a timeline rotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedAction {
    /// Offset in seconds from the start of the (looped) period.
    pub at: f64,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RotationKind {
    /// Scanned in declared order; the first ready action executes.
    Priority { actions: Vec<Action> },
    /// Fixed timestamps, optionally repeated every `period` seconds.
    Timeline {
        events: Vec<TimedAction>,
        #[serde(default = "default_looped")]
        looped: bool,
        period: f64,
    },
}

fn default_looped() -> bool {
    true
}

/// Time interval during which burst-eligible actions get the burst bonus,
/// subject to the [crate::model::BurstMode] override.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurstPlan {
    pub enabled: bool,
    pub start: f64,
    pub duration: f64,
}

impl Default for BurstPlan {
    fn default() -> Self {
        Self {
            enabled: true,
            start: 10.0,
            duration: 7.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: RotationKind,
    #[serde(default)]
    pub burst: BurstPlan,
}

impl Rotation {
    pub fn priority(id: &str, actions: Vec<Action>) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            kind: RotationKind::Priority { actions },
            burst: BurstPlan::default(),
        }
    }

    pub fn timeline(id: &str, events: Vec<TimedAction>, looped: bool, period: f64) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            kind: RotationKind::Timeline {
                events,
                looped,
                period,
            },
            burst: BurstPlan::default(),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            RotationKind::Priority { .. } => "priority",
            RotationKind::Timeline { .. } => "timeline",
        }
    }
}
