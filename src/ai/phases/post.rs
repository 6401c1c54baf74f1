//! Post-action phases: deferred retreat, repositioning, end of turn

use anyhow::Result;

use crate::core::plan::{ActionKind, PlannedAction, Target};

use super::{PhaseOutcome, PipelineState};
use crate::ai::context::PlanningContext;

/// Executes the retreat deferred by attack-then-retreat, or an optional
/// post-attack reposition for roles that want one.
pub fn post_action(
    ctx: &mut PlanningContext,
    state: &mut PipelineState,
    actions: &mut Vec<PlannedAction>,
) -> Result<PhaseOutcome> {
    if let Some(destination) = state.retreat_destination.take() {
        // An ability may have cleared the movement pool since the retreat
        // was chosen, e.g. a weapon that costs all remaining movement
        if !ctx.ledger.can_move() {
            return Ok(PhaseOutcome::Continue);
        }
        let move_cost = ctx
            .reachable_tiles()
            .into_iter()
            .find(|tile| tile.loc == destination)
            .map(|tile| tile.move_cost)
            .unwrap_or(ctx.ledger.mp());
        ctx.ledger.spend_mp_clamped(move_cost);
        actions.push(
            PlannedAction::new(ActionKind::Move, 0.0, "fall back after attacking")
                .with_target(Target::Point(destination)),
        );
        state.retreated = true;
        return Ok(PhaseOutcome::Continue);
    }

    if !ctx.policy.post_attack_reposition {
        return Ok(PhaseOutcome::Continue);
    }
    if !actions.iter().any(|a| a.kind == ActionKind::Attack) || !ctx.ledger.can_move() {
        return Ok(PhaseOutcome::Continue);
    }

    // Step to a safer tile if one is clearly better than where we stand
    let current_safety = ctx
        .current_tile()
        .map(|tile| tile.safety_score)
        .unwrap_or(0.0);
    let mut best: Option<(f32, crate::core::loc::Loc, f32)> = None;
    for tile in ctx.reachable_tiles() {
        let gain = tile.safety_score - current_safety;
        if gain <= 0.0 {
            continue;
        }
        let better = match &best {
            Some((best_gain, _, _)) => gain > *best_gain,
            None => true,
        };
        if better {
            best = Some((gain, tile.loc, tile.move_cost));
        }
    }
    if let Some((_, destination, move_cost)) = best {
        ctx.ledger.spend_mp_clamped(move_cost);
        actions.push(
            PlannedAction::new(ActionKind::Move, 0.0, "reposition to safer ground")
                .with_target(Target::Point(destination)),
        );
    }

    Ok(PhaseOutcome::Continue)
}

/// The turn always closes with an explicit end-turn action.
pub fn end_turn(ctx: &mut PlanningContext, actions: &mut Vec<PlannedAction>) -> Result<PhaseOutcome> {
    ctx.ledger.clamp_to_zero();
    let reason = if actions.is_empty() {
        "nothing worth doing"
    } else {
        "turn complete"
    };
    actions.push(PlannedAction::end_turn(reason));
    Ok(PhaseOutcome::Continue)
}
