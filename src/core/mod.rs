//! Core battlefield representations and planning data model

pub mod ability;
pub mod convert;
pub mod display;
pub mod ledger;
pub mod loc;
pub mod plan;
pub mod queries;
pub mod session;
pub mod snapshot;
pub mod unit;

pub use ability::{Ability, AbilityId, AbilityTiming, DamagePrediction, KillSequence};
pub use convert::{FromIndex, ToIndex};
pub use ledger::{ResourceLedger, MP_COST_ALL_REMAINING};
pub use loc::Loc;
pub use plan::{ActionKind, FailurePolicy, PlanPriority, PlannedAction, Target, TurnPlan};
pub use queries::{CombatOracle, PatternHits, ReachableTile, UseCheck};
pub use session::SessionContext;
pub use snapshot::{AbilityBook, WorldSnapshot};
pub use unit::{UnitId, UnitView};
