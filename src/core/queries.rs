//! Query contract between the planner and its collaborators
//!
//! Cost lookup, damage prediction, reachability, line-of-sight pattern
//! counting and the kill-sequence solver all live outside the core. The
//! planner calls them through this trait; implementations are assumed
//! read-only and cheap enough to call repeatedly within one pass.

use super::{
    ability::{Ability, DamagePrediction, KillSequence},
    loc::Loc,
    unit::UnitId,
};

/// Answer to "can this ability be used on that target right now?"
#[derive(Debug, Clone)]
pub struct UseCheck {
    pub allowed: bool,
    pub reason: Option<String>,
}

impl UseCheck {
    pub fn ok() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}

/// A tile the unit could move to this turn, with precomputed score hints
#[derive(Debug, Clone)]
pub struct ReachableTile {
    pub loc: Loc,
    pub standable: bool,
    pub move_cost: f32,
    /// Enemies hittable with at least one attack from this tile
    pub hittable_enemies: usize,
    /// Positional quality in the pathfinder's own units
    pub position_score: f32,
    /// Control minus threat at this tile
    pub safety_score: f32,
    pub cover_score: f32,
    /// How much closer this tile gets to the nearest enemy
    pub distance_gain: f32,
}

/// Units struck by an area pattern aimed at a point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternHits {
    pub enemies: usize,
    pub allies: usize,
}

/// External query services the planner consumes. In-process calls only;
/// no wire format.
pub trait CombatOracle {
    fn ability_ap_cost(&self, ability: &Ability) -> f32;

    /// May return [`MP_COST_ALL_REMAINING`](super::ledger::MP_COST_ALL_REMAINING)
    /// or more, meaning "clears all remaining movement".
    fn ability_mp_cost(&self, ability: &Ability) -> f32;

    fn damage_prediction(&self, ability: &Ability, target: UnitId) -> DamagePrediction;

    fn can_use_on(&self, ability: &Ability, target: UnitId) -> UseCheck;

    fn can_use_at(&self, ability: &Ability, point: Loc) -> UseCheck;

    /// Chance in [0,1] that an attack from the current position hits
    fn hit_chance(&self, ability: &Ability, target: UnitId) -> f32;

    /// Expected damage multiplier a pre-attack buff grants to attacks
    /// made after it this turn. 1.0 means no damage effect.
    fn buff_damage_multiplier(&self, _ability: &Ability) -> f32 {
        1.0
    }

    fn ability_timing(&self, ability: &Ability) -> super::ability::AbilityTiming;

    fn reachable_tiles(&self, unit: UnitId, mp_budget: f32) -> Vec<ReachableTile>;

    fn units_in_pattern(&self, ability: &Ability, aim: Loc, caster: Loc) -> PatternHits;

    fn kill_sequence(&self, target: UnitId) -> Option<KillSequence>;
}
