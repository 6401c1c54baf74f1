//! Short-circuit phases: emergency heal and the one-shot ultimate

use anyhow::Result;

use crate::core::{
    ability::AbilityTiming,
    plan::{ActionKind, PlanPriority, PlannedAction, Target},
};

use super::PhaseOutcome;
use crate::ai::context::PlanningContext;

/// Below the critical HP threshold, a legal heal preempts everything
/// else this turn.
pub fn emergency_heal(
    ctx: &mut PlanningContext,
    actions: &mut Vec<PlannedAction>,
) -> Result<PhaseOutcome> {
    if ctx.snapshot.hp_ratio() >= ctx.policy.weights.critical_hp_threshold {
        return Ok(PhaseOutcome::Continue);
    }

    for heal in &ctx.snapshot.abilities.heals {
        if !ctx.oracle.can_use_on(heal, ctx.snapshot.unit.id).allowed {
            continue;
        }
        let cost = ctx.oracle.ability_ap_cost(heal);
        if !ctx.ledger.try_spend_ap(cost) {
            continue;
        }
        actions.push(
            PlannedAction::new(ActionKind::Heal, cost, "critical HP, emergency heal")
                .with_ability(heal.clone())
                .with_target(Target::Unit(ctx.snapshot.unit.id)),
        );
        ctx.session.record_use(heal.id, ctx.snapshot.turn);
        return Ok(PhaseOutcome::ShortCircuit(PlanPriority::Emergency));
    }

    Ok(PhaseOutcome::Continue)
}

/// A usable ultimate ends planning immediately. The plan carries a
/// guaranteed end-turn so a failed precondition at execution time cannot
/// leave the unit stuck in the restricted state.
pub fn ultimate(ctx: &mut PlanningContext, actions: &mut Vec<PlannedAction>) -> Result<PhaseOutcome> {
    for special in &ctx.snapshot.abilities.specials {
        if ctx.oracle.ability_timing(special) != AbilityTiming::HeroicAct {
            continue;
        }
        let cost = ctx.oracle.ability_ap_cost(special);
        if !ctx.ledger.can_afford_ap(cost) {
            continue;
        }
        let target = ctx
            .snapshot
            .enemies
            .iter()
            .find(|enemy| ctx.oracle.can_use_on(special, enemy.id).allowed);
        let Some(target) = target else {
            continue;
        };

        ctx.ledger.try_spend_ap(cost);
        actions.push(
            PlannedAction::new(ActionKind::Attack, cost, "heroic act")
                .with_ability(special.clone())
                .with_target(Target::Unit(target.id)),
        );
        actions.push(PlannedAction::end_turn(
            "guard: end turn even if the heroic act cannot complete",
        ));
        ctx.session.record_use(special.id, ctx.snapshot.turn);
        return Ok(PhaseOutcome::ShortCircuit(PlanPriority::DirectAttack));
    }

    Ok(PhaseOutcome::Continue)
}
