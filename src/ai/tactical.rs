//! Tactical option evaluation
//!
//! Four competing movement/attack strategies are scored independently
//! every pass; exactly one is chosen. There are no transitions between
//! them, which keeps the evaluation terminal by construction.

use anyhow::{anyhow, Result};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

use crate::core::{
    ability::AbilityTiming,
    convert::{FromIndex, ToIndex},
    loc::Loc,
    queries::ReachableTile,
};

use super::{context::PlanningContext, weights::hit_quality_attenuation};

/// The four movement/attack strategies, in tie-break preference order
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum Strategy {
    AttackFromCurrent,
    MoveToAttack,
    AttackThenRetreat,
    MoveOnly,
}

impl FromIndex for Strategy {
    fn from_index(idx: usize) -> Result<Self> {
        FromPrimitive::from_usize(idx).ok_or_else(|| anyhow!("Invalid strategy index: {}", idx))
    }
}

impl ToIndex for Strategy {
    fn to_index(&self) -> Result<usize> {
        ToPrimitive::to_usize(self).ok_or_else(|| anyhow!("Invalid strategy value"))
    }
}

/// One evaluated strategy
#[derive(Debug, Clone)]
pub struct TacticalOption {
    pub strategy: Strategy,
    pub score: f32,
    pub viable: bool,
    pub destination: Option<Loc>,
    pub expected_hittable: usize,
    pub reason: String,
}

impl TacticalOption {
    fn not_viable(strategy: Strategy, reason: impl Into<String>) -> Self {
        Self {
            strategy,
            score: f32::MIN,
            viable: false,
            destination: None,
            expected_hittable: 0,
            reason: reason.into(),
        }
    }
}

/// Evaluate all four options. Always returns exactly four, in
/// preference order.
pub fn evaluate(ctx: &PlanningContext) -> [TacticalOption; 4] {
    let hittable = ctx.hittable_enemies().len();
    let current = ctx.current_tile();

    [
        attack_from_current(ctx, hittable, current.as_ref()),
        move_to_attack(ctx, hittable),
        attack_then_retreat(ctx, hittable, current.as_ref()),
        move_only(ctx),
    ]
}

/// Choose the strictly highest-scoring viable option. Ties keep the
/// earlier entry; when nothing is viable, move-only is the structural
/// default.
pub fn choose(options: &[TacticalOption; 4]) -> &TacticalOption {
    let mut chosen: Option<&TacticalOption> = None;
    for option in options.iter() {
        if !option.viable {
            continue;
        }
        let better = match chosen {
            Some(current) => option.score > current.score,
            None => true,
        };
        if better {
            chosen = Some(option);
        }
    }
    chosen.unwrap_or(&options[3])
}

fn attack_from_current(
    ctx: &PlanningContext,
    hittable: usize,
    current: Option<&ReachableTile>,
) -> TacticalOption {
    if hittable == 0 {
        return TacticalOption::not_viable(Strategy::AttackFromCurrent, "nothing hittable");
    }

    let weights = &ctx.policy.weights;
    let snapshot = ctx.snapshot;

    let attenuation = hit_quality_attenuation(ctx.average_hit_chance());
    let mut score = hittable as f32 * weights.w_hittable * attenuation + weights.attack_base;

    if snapshot.needs_reposition && snapshot.prefers_ranged {
        score -= weights.ranged_retreat_penalty;
    }
    if let Some(tile) = current {
        score += tile.safety_score * weights.w_safety;
        score += tile.cover_score;
    }

    TacticalOption {
        strategy: Strategy::AttackFromCurrent,
        score,
        viable: true,
        destination: None,
        expected_hittable: hittable,
        reason: format!("{} enemies hittable from current position", hittable),
    }
}

fn move_to_attack(ctx: &PlanningContext, current_hittable: usize) -> TacticalOption {
    if !ctx.snapshot.can_move() {
        return TacticalOption::not_viable(Strategy::MoveToAttack, "cannot move");
    }

    let weights = &ctx.policy.weights;
    let mut best: Option<(f32, ReachableTile)> = None;

    for tile in ctx.reachable_tiles() {
        if tile.hittable_enemies == 0 {
            continue;
        }
        let improvement = tile.hittable_enemies as f32 - current_hittable as f32;
        let score = tile.hittable_enemies as f32 * weights.w_hittable
            + improvement * weights.w_improvement
            + tile.position_score * weights.position_quality_factor
            - tile.move_cost;
        let better = match &best {
            Some((best_score, _)) => score > *best_score,
            None => true,
        };
        if better {
            best = Some((score, tile));
        }
    }

    match best {
        Some((score, tile)) => TacticalOption {
            strategy: Strategy::MoveToAttack,
            score,
            viable: true,
            destination: Some(tile.loc),
            expected_hittable: tile.hittable_enemies,
            reason: format!(
                "move to {} for {} hittable enemies",
                tile.loc, tile.hittable_enemies
            ),
        },
        None => TacticalOption::not_viable(Strategy::MoveToAttack, "no attacking position in reach"),
    }
}

fn attack_then_retreat(
    ctx: &PlanningContext,
    hittable: usize,
    current: Option<&ReachableTile>,
) -> TacticalOption {
    if hittable == 0 {
        return TacticalOption::not_viable(Strategy::AttackThenRetreat, "nothing hittable");
    }

    let snapshot = ctx.snapshot;
    let retreat_wanted = ctx.policy.retreat_allowed
        && (snapshot.needs_reposition || (snapshot.in_danger && snapshot.prefers_ranged));
    if !retreat_wanted {
        return TacticalOption::not_viable(Strategy::AttackThenRetreat, "retreat not wanted");
    }

    let mp_recovery = snapshot.abilities.recovery.iter().any(|ability| {
        ctx.oracle.ability_timing(ability) == AbilityTiming::PostFirstAction
    });
    if !snapshot.can_move() && !mp_recovery {
        return TacticalOption::not_viable(Strategy::AttackThenRetreat, "no way to retreat");
    }

    let weights = &ctx.policy.weights;
    let current_safety = current.map(|tile| tile.safety_score).unwrap_or(0.0);

    // Best safety improvement among tiles we could fall back to
    let mut retreat_to: Option<(f32, Loc)> = None;
    for tile in ctx.reachable_tiles() {
        let gain = tile.safety_score - current_safety;
        let better = match &retreat_to {
            Some((best_gain, _)) => gain > *best_gain,
            None => true,
        };
        if better {
            retreat_to = Some((gain, tile.loc));
        }
    }

    let attenuation = hit_quality_attenuation(ctx.average_hit_chance());
    let mut score = hittable as f32 * weights.w_hittable * attenuation + weights.attack_base;
    if let Some((gain, _)) = retreat_to {
        score += gain.max(0.0) * weights.w_safety;
    }
    if mp_recovery {
        score += weights.mp_recovery_bonus;
    }

    TacticalOption {
        strategy: Strategy::AttackThenRetreat,
        score,
        viable: true,
        destination: retreat_to.map(|(_, loc)| loc),
        expected_hittable: hittable,
        reason: "attack, then fall back to safety".to_string(),
    }
}

fn move_only(ctx: &PlanningContext) -> TacticalOption {
    if !ctx.snapshot.can_move() {
        return TacticalOption::not_viable(Strategy::MoveOnly, "cannot move");
    }
    if ctx.snapshot.enemies.is_empty() {
        return TacticalOption::not_viable(Strategy::MoveOnly, "no enemies");
    }

    let weights = &ctx.policy.weights;
    let mut best: Option<(f32, Loc)> = None;
    for tile in ctx.reachable_tiles() {
        let gain = tile.distance_gain;
        let better = match &best {
            Some((best_gain, _)) => gain > *best_gain,
            None => true,
        };
        if better {
            best = Some((gain, tile.loc));
        }
    }

    match best {
        Some((gain, loc)) => TacticalOption {
            strategy: Strategy::MoveOnly,
            score: weights.move_only_base + gain.max(0.0) * weights.closing_distance_bonus,
            viable: true,
            destination: Some(loc),
            expected_hittable: 0,
            reason: format!("close distance toward the enemy via {}", loc),
        },
        None => TacticalOption::not_viable(Strategy::MoveOnly, "nowhere to move"),
    }
}
