//! The attack loop
//!
//! Bounded at a small per-turn cap. The loop first asks the attack
//! advisor for a whole-sequence recommendation; the advisor's answer is
//! a three-way contract:
//!   - `None`: no feasible recommendation, fall back to the greedy
//!     target picker;
//!   - `Some` with an empty step list: deliberate do-not-attack
//!     decision, terminate with no fallback;
//!   - `Some` with steps: plan those steps under the ledger.

use anyhow::Result;

use crate::core::{
    loc::Loc,
    plan::{ActionKind, FailurePolicy, GroupTag, PlannedAction, Target},
    unit::UnitId,
};

use super::{PhaseOutcome, PipelineState};
use crate::ai::{
    context::PlanningContext,
    pipeline::{AdvisedStep, AttackAdvisor},
    targeting,
};

pub fn attack_loop(
    ctx: &mut PlanningContext,
    state: &mut PipelineState,
    actions: &mut Vec<PlannedAction>,
    advisor: &dyn AttackAdvisor,
) -> Result<PhaseOutcome> {
    // The movement phase's earmark is ours to spend now
    if state.reserved_for_attack > 0.0 {
        ctx.ledger.release_ap(state.reserved_for_attack);
        state.reserved_for_attack = 0.0;
    }

    let cap = ctx.policy.weights.max_attacks_per_turn;

    let attacks_planned = match advisor.advise(ctx) {
        None => greedy_attacks(ctx, actions, cap),
        Some(advice) if advice.steps.is_empty() => {
            // Explicit skip: every option was judged unsafe. No fallback.
            return Ok(PhaseOutcome::Continue);
        }
        Some(advice) => advised_attacks(ctx, state, actions, advice.steps, cap),
    };

    // A move was committed on the promise of hittable enemies at the
    // destination, but nothing validated from the original tile. Plan
    // one attack anyway; execution re-checks range after the move.
    if attacks_planned == 0 {
        if let Some((destination, hittable)) = state.moved_to {
            if hittable > 0 {
                post_move_attack(ctx, actions, destination);
            }
        }
    }

    Ok(PhaseOutcome::Continue)
}

fn greedy_attacks(ctx: &mut PlanningContext, actions: &mut Vec<PlannedAction>, cap: u32) -> u32 {
    let mut attacks_planned = 0;
    for _ in 0..cap {
        let Some(choice) = targeting::pick_attack(ctx) else {
            break;
        };
        let cost = ctx.oracle.ability_ap_cost(&choice.ability);
        if !ctx.ledger.try_spend_ap(cost) {
            break;
        }
        ctx.ledger
            .spend_mp_clamped(ctx.oracle.ability_mp_cost(&choice.ability));
        actions.push(
            PlannedAction::new(ActionKind::Attack, cost, "attack best available target")
                .with_ability(choice.ability.clone())
                .with_target(Target::Unit(choice.target)),
        );
        ctx.exclusions.commit(choice.target, choice.ability.id);
        ctx.session.record_use(choice.ability.id, ctx.snapshot.turn);
        attacks_planned += 1;
    }
    attacks_planned
}

fn advised_attacks(
    ctx: &mut PlanningContext,
    state: &mut PipelineState,
    actions: &mut Vec<PlannedAction>,
    steps: Vec<AdvisedStep>,
    cap: u32,
) -> u32 {
    let mut attacks_planned = 0u32;
    // A buff leading the chain is atomic with its first attack
    let group = steps
        .first()
        .filter(|step| step.kind == ActionKind::Buff)
        .map(|_| GroupTag {
            id: state.fresh_group(),
            on_failure: FailurePolicy::SkipGroup,
        });

    for (i, step) in steps.into_iter().enumerate() {
        if step.kind == ActionKind::Attack && attacks_planned >= cap {
            break;
        }
        let allowed = match step.target {
            Target::Unit(target) => ctx.oracle.can_use_on(&step.ability, target).allowed,
            Target::Point(point) => ctx.oracle.can_use_at(&step.ability, point).allowed,
            Target::None => true,
        };
        // After a planned move the original-tile check no longer binds;
        // execution re-validates from the destination
        if !allowed && state.moved_to.is_none() {
            continue;
        }
        let cost = ctx.oracle.ability_ap_cost(&step.ability);
        if !ctx.ledger.try_spend_ap(cost) {
            break;
        }
        ctx.ledger
            .spend_mp_clamped(ctx.oracle.ability_mp_cost(&step.ability));

        let mut action = PlannedAction::new(step.kind, cost, step.reason)
            .with_ability(step.ability.clone())
            .with_target(step.target);
        if let Some(group) = group {
            // The buff and the attack it enables stand or fall together
            if i <= 1 {
                action = action.with_group(group);
            }
        }
        actions.push(action);

        if step.kind == ActionKind::Attack {
            attacks_planned += 1;
            if let Target::Unit(target) = step.target {
                ctx.exclusions.commit(target, step.ability.id);
            }
        }
        ctx.session.record_use(step.ability.id, ctx.snapshot.turn);
    }

    attacks_planned
}

fn post_move_attack(ctx: &mut PlanningContext, actions: &mut Vec<PlannedAction>, destination: Loc) {
    let Some(target) = nearest_enemy_to(ctx, destination) else {
        return;
    };
    let Some(ability) = ctx.snapshot.abilities.attacks.first().cloned() else {
        return;
    };
    let cost = ctx.oracle.ability_ap_cost(&ability);
    if !ctx.ledger.try_spend_ap(cost) {
        return;
    }
    ctx.ledger
        .spend_mp_clamped(ctx.oracle.ability_mp_cost(&ability));
    actions.push(
        PlannedAction::new(ActionKind::Attack, cost, "attack after moving")
            .with_ability(ability.clone())
            .with_target(Target::Unit(target)),
    );
    ctx.exclusions.commit(target, ability.id);
    ctx.session.record_use(ability.id, ctx.snapshot.turn);
}

fn nearest_enemy_to(ctx: &PlanningContext, point: Loc) -> Option<UnitId> {
    ctx.snapshot
        .enemies
        .iter()
        .min_by_key(|enemy| enemy.loc.dist(&point))
        .map(|enemy| enemy.id)
}
