//! Preparation phases: resource recovery, buffs, marking

use anyhow::Result;

use crate::core::{
    ability::AbilityTiming,
    plan::{ActionKind, PlannedAction, Target},
    unit::UnitId,
};

use super::{PhaseOutcome, PipelineState};
use crate::ai::{context::PlanningContext, role::TargetBias};

/// Reload/recovery abilities classified by the snapshot builder. One per
/// turn; pointless without anything to attack afterwards.
pub fn resource_recovery(
    ctx: &mut PlanningContext,
    actions: &mut Vec<PlannedAction>,
) -> Result<PhaseOutcome> {
    if ctx.snapshot.abilities.attacks.is_empty() {
        return Ok(PhaseOutcome::Continue);
    }

    for ability in &ctx.snapshot.abilities.recovery {
        if ctx.oracle.ability_timing(ability) != AbilityTiming::Normal {
            continue;
        }
        let cost = ctx.oracle.ability_ap_cost(ability);
        if !ctx.ledger.try_spend_ap(cost) {
            continue;
        }
        ctx.ledger.spend_mp_clamped(ctx.oracle.ability_mp_cost(ability));
        actions.push(
            PlannedAction::new(ActionKind::Reload, cost, "recover resources before attacking")
                .with_ability(ability.clone()),
        );
        ctx.session.record_use(ability.id, ctx.snapshot.turn);
        break;
    }

    Ok(PhaseOutcome::Continue)
}

/// Self/positional buffs, bounded per turn. Attack-chain buffs
/// (pre-attack timing) are left to the sequence scorer so they can be
/// grouped with the attack that justifies them.
pub fn self_buffs(
    ctx: &mut PlanningContext,
    state: &mut PipelineState,
    actions: &mut Vec<PlannedAction>,
) -> Result<PhaseOutcome> {
    if ctx.snapshot.enemies.is_empty() {
        return Ok(PhaseOutcome::Continue);
    }

    let buffs: Vec<_> = ctx.snapshot.abilities.buffs.to_vec();
    for _ in 0..ctx.policy.weights.max_positional_buffs {
        let mut applied = false;
        for ability in &buffs {
            if ctx.exclusions.has_ability(ability.id) {
                continue;
            }
            let timing = ctx.oracle.ability_timing(ability);
            if timing == AbilityTiming::PreAttackBuff {
                continue;
            }
            if !ctx.oracle.can_use_on(ability, ctx.snapshot.unit.id).allowed {
                continue;
            }
            if ctx.session.recently_used(
                ability.id,
                ctx.snapshot.turn,
                ctx.policy.weights.recent_use_window,
            ) {
                continue;
            }
            let cost = ctx.oracle.ability_ap_cost(ability);
            if !ctx.ledger.try_spend_ap(cost) {
                continue;
            }
            ctx.ledger.spend_mp_clamped(ctx.oracle.ability_mp_cost(ability));
            actions.push(
                PlannedAction::new(ActionKind::Buff, cost, "self buff")
                    .with_ability(ability.clone())
                    .with_target(Target::Unit(ctx.snapshot.unit.id)),
            );
            ctx.exclusions.exclude_ability(ability.id);
            ctx.session.record_use(ability.id, ctx.snapshot.turn);
            if timing == AbilityTiming::PreCombatBuff {
                state.buffed_for_attack = true;
            }
            applied = true;
            break;
        }
        // no action produced ends the loop early
        if !applied {
            break;
        }
    }

    Ok(PhaseOutcome::Continue)
}

/// Buff the most battered allies first, bounded per turn.
pub fn ally_buffs(ctx: &mut PlanningContext, actions: &mut Vec<PlannedAction>) -> Result<PhaseOutcome> {
    if ctx.snapshot.allies.is_empty() || ctx.snapshot.abilities.buffs.is_empty() {
        return Ok(PhaseOutcome::Continue);
    }

    let mut allies: Vec<_> = ctx.snapshot.allies.iter().cloned().collect();
    allies.sort_by(|a, b| {
        a.hp_ratio()
            .partial_cmp(&b.hp_ratio())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let buffs: Vec<_> = ctx.snapshot.abilities.buffs.to_vec();
    let mut buffed = 0;
    for ally in &allies {
        if buffed >= ctx.policy.weights.max_ally_buffs {
            break;
        }
        if ctx.exclusions.has_target(ally.id) {
            continue;
        }
        let mut applied = false;
        for ability in &buffs {
            if ctx.exclusions.has_ability(ability.id) {
                continue;
            }
            if !ctx.oracle.can_use_on(ability, ally.id).allowed {
                continue;
            }
            let cost = ctx.oracle.ability_ap_cost(ability);
            if !ctx.ledger.try_spend_ap(cost) {
                continue;
            }
            ctx.ledger.spend_mp_clamped(ctx.oracle.ability_mp_cost(ability));
            actions.push(
                PlannedAction::new(ActionKind::Buff, cost, format!("buff ally {}", ally.name))
                    .with_ability(ability.clone())
                    .with_target(Target::Unit(ally.id)),
            );
            ctx.exclusions.commit(ally.id, ability.id);
            ctx.session.record_use(ability.id, ctx.snapshot.turn);
            buffed += 1;
            applied = true;
            break;
        }
        if !applied {
            // nothing usable on the weakest remaining ally; stop early
            break;
        }
    }

    Ok(PhaseOutcome::Continue)
}

/// Marking/taunting. Tanks pull the enemy most dangerous to allies and
/// publish the reservation on the team blackboard so squadmates pick
/// other targets.
pub fn mark(ctx: &mut PlanningContext, actions: &mut Vec<PlannedAction>) -> Result<PhaseOutcome> {
    let Some(marker) = ctx.snapshot.abilities.markers.first().cloned() else {
        return Ok(PhaseOutcome::Continue);
    };

    let mut best: Option<(i32, UnitId)> = None;
    for enemy in &ctx.snapshot.enemies {
        if ctx.session.is_taunt_reserved(enemy.id) {
            continue;
        }
        if !ctx.oracle.can_use_on(&marker, enemy.id).allowed {
            continue;
        }
        let near_ally = ctx
            .snapshot
            .allies
            .iter()
            .map(|ally| enemy.loc.dist(&ally.loc))
            .min()
            .unwrap_or(i32::MAX);
        let relevant = match ctx.policy.target_bias {
            TargetBias::ThreatToAllies => near_ally <= 3,
            _ => near_ally <= 1,
        };
        if !relevant {
            continue;
        }
        let better = match best {
            Some((best_dist, _)) => near_ally < best_dist,
            None => true,
        };
        if better {
            best = Some((near_ally, enemy.id));
        }
    }

    let Some((_, target)) = best else {
        return Ok(PhaseOutcome::Continue);
    };
    let cost = ctx.oracle.ability_ap_cost(&marker);
    if !ctx.ledger.try_spend_ap(cost) {
        return Ok(PhaseOutcome::Continue);
    }
    ctx.ledger.spend_mp_clamped(ctx.oracle.ability_mp_cost(&marker));

    ctx.session.reserve_taunt(target);
    ctx.session.record_use(marker.id, ctx.snapshot.turn);
    actions.push(
        PlannedAction::new(ActionKind::Buff, cost, "mark target threatening allies")
            .with_ability(marker)
            .with_target(Target::Unit(target)),
    );

    Ok(PhaseOutcome::Continue)
}
