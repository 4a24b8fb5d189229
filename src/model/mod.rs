pub mod build;
pub mod effect;
pub mod rotation;
pub mod scenario;
pub mod settings;
pub mod skill;

pub use build::{Build, Buff, BuffApplication, BuffScope, Potential, StatBlock, StatKey};
pub use effect::Effect;
pub use rotation::{Action, ActionKind, BurstPlan, Rotation, RotationKind, SkillRef, TimedAction};
pub use scenario::{Enemy, Scenario};
pub use settings::{
    BurstMode, Context, CritOrder, ElementStage, MitigationModel, PierceMode, Settings,
};
pub use skill::{SkillBook, SkillSpec};
