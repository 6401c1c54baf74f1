//! Tactician - turn planning engine for tactical combat agents

pub mod core;
pub mod ai;

// Re-export commonly used items
pub use crate::ai::pipeline::plan_turn;
pub use crate::core::plan::TurnPlan;
