//! Movement phase, driven by the tactical option evaluator

use anyhow::Result;

use crate::core::plan::{ActionKind, PlannedAction, Target};

use super::{PhaseOutcome, PipelineState};
use crate::ai::{context::PlanningContext, tactical, tactical::Strategy};

/// Consults the tactical option evaluator and commits the movement half
/// of the chosen strategy. Attacking itself belongs to the attack loop;
/// attack-then-retreat defers its move to the post-action phase.
pub fn tactical_move(
    ctx: &mut PlanningContext,
    state: &mut PipelineState,
    actions: &mut Vec<PlannedAction>,
) -> Result<PhaseOutcome> {
    if ctx.snapshot.enemies.is_empty() {
        return Ok(PhaseOutcome::Continue);
    }

    let options = tactical::evaluate(ctx);
    let chosen = tactical::choose(&options);
    if !chosen.viable {
        return Ok(PhaseOutcome::Continue);
    }

    match chosen.strategy {
        Strategy::AttackFromCurrent => {
            // Stay put; earmark AP so later prep cannot starve the attack
            if let Some(cost) = ctx.min_attack_cost() {
                ctx.ledger.reserve_ap(cost);
                state.reserved_for_attack = cost;
            }
        }
        Strategy::MoveToAttack => {
            let Some(destination) = chosen.destination else {
                return Ok(PhaseOutcome::Continue);
            };
            let move_cost = ctx
                .reachable_tiles()
                .into_iter()
                .find(|tile| tile.loc == destination)
                .map(|tile| tile.move_cost)
                .unwrap_or(ctx.ledger.mp());
            ctx.ledger.spend_mp_clamped(move_cost);
            actions.push(
                PlannedAction::new(ActionKind::Move, 0.0, chosen.reason.clone())
                    .with_target(Target::Point(destination)),
            );
            state.moved_to = Some((destination, chosen.expected_hittable));
            if let Some(cost) = ctx.min_attack_cost() {
                ctx.ledger.reserve_ap(cost);
                state.reserved_for_attack = cost;
            }
        }
        Strategy::AttackThenRetreat => {
            // Hold position now; the retreat happens after the attack
            state.retreat_destination = chosen.destination;
            if let Some(cost) = ctx.min_attack_cost() {
                ctx.ledger.reserve_ap(cost);
                state.reserved_for_attack = cost;
            }
        }
        Strategy::MoveOnly => {
            let Some(destination) = chosen.destination else {
                return Ok(PhaseOutcome::Continue);
            };
            let move_cost = ctx
                .reachable_tiles()
                .into_iter()
                .find(|tile| tile.loc == destination)
                .map(|tile| tile.move_cost)
                .unwrap_or(ctx.ledger.mp());
            ctx.ledger.spend_mp_clamped(move_cost);
            actions.push(
                PlannedAction::new(ActionKind::Move, 0.0, chosen.reason.clone())
                    .with_target(Target::Point(destination)),
            );
        }
    }

    Ok(PhaseOutcome::Continue)
}
