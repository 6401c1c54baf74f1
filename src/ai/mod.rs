//! Tactical and strategic planning logic

pub mod context;
pub mod phases;
pub mod pipeline;
pub mod role;
pub mod sequence;
pub mod tactical;
pub mod targeting;
pub mod weights;

// Re-export key types
pub use context::{Exclusions, PlanningContext};
pub use pipeline::{plan_turn, plan_turn_with_advisor, AttackAdvice, AttackAdvisor};
pub use role::{Role, RolePolicy};
pub use sequence::{SequenceRecommendation, TemplateId};
pub use tactical::{Strategy, TacticalOption};
pub use weights::ScoreWeights;
