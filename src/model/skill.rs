//! Skill lookup seam.
//!
//! The character/skill database is an external collaborator; the engine only
//! needs `(character_id, skill_index) -> SkillSpec`. [SkillBook] is the
//! in-crate table the host fills from its database. A missing entry is not an
//! error: the action's manual multiplier/hits/kind are used as-is.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::effect::Effect;
use crate::model::rotation::{ActionKind, SkillRef};

/// Resolved skill definition; overrides an action's manual fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSpec {
    pub kind: ActionKind,
    pub mult: f64,
    pub hits: u32,
    #[serde(default)]
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillBook {
    #[serde(default)]
    entries: HashMap<String, SkillSpec>,
}

impl SkillBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, character_id: &str, skill_index: usize, spec: SkillSpec) {
        self.entries
            .insert(Self::entry_key(character_id, skill_index), spec);
    }

    pub fn resolve(&self, character_id: &str, skill_index: usize) -> Option<&SkillSpec> {
        self.entries.get(&Self::entry_key(character_id, skill_index))
    }

    pub fn resolve_ref(&self, skill_ref: &SkillRef) -> Option<&SkillSpec> {
        self.resolve(&skill_ref.character_id, skill_ref.skill_index)
    }

    fn entry_key(character_id: &str, skill_index: usize) -> String {
        format!("{character_id}#{skill_index}")
    }
}
