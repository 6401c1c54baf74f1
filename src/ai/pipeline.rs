//! The phase pipeline
//!
//! Runs the role policy's phase list top to bottom against a shared
//! resource ledger, consulting the tactical evaluator and the sequence
//! scorer along the way, and always hands back a non-empty plan. A
//! planning failure never reaches the turn-execution layer; it becomes
//! a single end-turn action carrying the error as its reason.

use anyhow::Result;

use crate::core::{
    ability::Ability,
    plan::{ActionKind, PlanMetrics, PlanPriority, PlannedAction, Target, TurnPlan},
    queries::CombatOracle,
    session::SessionContext,
    snapshot::WorldSnapshot,
};

use super::{
    context::PlanningContext,
    phases::{self, PhaseOutcome, PipelineState},
    role::RolePolicy,
    sequence::{self, TemplateId},
    targeting,
};

/// One step a sequence recommendation was lowered to
#[derive(Debug, Clone)]
pub struct AdvisedStep {
    pub ability: Ability,
    pub target: Target,
    pub kind: ActionKind,
    pub reason: String,
}

/// A concrete attack recommendation for the attack loop.
///
/// An empty step list is a deliberate "do not attack this turn" and is
/// distinct from no advice at all; see [`AttackAdvisor`].
#[derive(Debug, Clone, Default)]
pub struct AttackAdvice {
    pub steps: Vec<AdvisedStep>,
}

/// Supplies attack sequences to the attack loop.
///
/// `None` means "no recommendation" and callers fall back to their own
/// greedy heuristic. `Some` with empty steps means "deliberately do not
/// attack" and callers must NOT fall back. The distinction is
/// load-bearing.
pub trait AttackAdvisor {
    fn advise(&self, ctx: &PlanningContext) -> Option<AttackAdvice>;
}

/// Default advisor: lowers the sequence scorer's best template into
/// concrete steps.
pub struct SequenceAdvisor;

impl AttackAdvisor for SequenceAdvisor {
    fn advise(&self, ctx: &PlanningContext) -> Option<AttackAdvice> {
        let choice = targeting::pick_attack(ctx)?;
        let rec = sequence::recommend(ctx, choice.target)?;
        let enemy = ctx.snapshot.enemy(choice.target)?;

        let mut steps = Vec::new();
        let budget = ctx.ledger.available_ap();
        let mut remaining = budget;

        if let Some(sequence) = &rec.kill_sequence {
            for ability in &sequence.abilities {
                steps.push(AdvisedStep {
                    ability: ability.clone(),
                    target: Target::Unit(choice.target),
                    kind: ActionKind::Attack,
                    reason: "confirmed kill sequence".to_string(),
                });
            }
            return Some(AttackAdvice { steps });
        }

        if let Some(debuff) = &rec.debuff {
            let cost = ctx.oracle.ability_ap_cost(debuff);
            remaining -= cost;
            steps.push(AdvisedStep {
                ability: debuff.clone(),
                target: Target::Unit(choice.target),
                kind: ActionKind::Attack,
                reason: "soften the target first".to_string(),
            });
        }
        if let Some(buff) = &rec.buff {
            let cost = ctx.oracle.ability_ap_cost(buff);
            remaining -= cost;
            steps.push(AdvisedStep {
                ability: buff.clone(),
                target: Target::None,
                kind: ActionKind::Buff,
                reason: "buff before the attack chain".to_string(),
            });
        }
        if let Some(reset) = &rec.reserve_reset {
            remaining -= ctx.oracle.ability_ap_cost(reset);
        }

        let (attack, target, per_use) = match &rec.aoe {
            Some(aoe) => (
                aoe.clone(),
                Target::Point(enemy.loc),
                ctx.oracle.ability_ap_cost(aoe),
            ),
            None => (
                rec.primary.clone(),
                Target::Unit(choice.target),
                ctx.oracle.ability_ap_cost(&rec.primary),
            ),
        };
        if per_use <= 0.0 {
            return None;
        }

        let uses = (remaining / per_use).floor() as u32;
        let reason = match rec.template {
            TemplateId::AoeChain
            | TemplateId::BuffedAoeChain
            | TemplateId::AoeResetChain
            | TemplateId::BuffedAoeResetChain => "area attack on the cluster",
            TemplateId::DebuffChain => "attack the softened target",
            _ => "attack chain",
        };
        for i in 0..uses {
            steps.push(AdvisedStep {
                ability: attack.clone(),
                target,
                kind: ActionKind::Attack,
                reason: reason.to_string(),
            });
            // The reset slots in after the first attack and buys one
            // bonus use on top of the budgeted ones
            if i == 0 {
                if let Some(reset) = &rec.reserve_reset {
                    steps.push(AdvisedStep {
                        ability: reset.clone(),
                        target: Target::None,
                        kind: ActionKind::Reload,
                        reason: "reset for a bonus follow-up".to_string(),
                    });
                    steps.push(AdvisedStep {
                        ability: attack.clone(),
                        target,
                        kind: ActionKind::Attack,
                        reason: reason.to_string(),
                    });
                }
            }
        }

        Some(AttackAdvice { steps })
    }
}

/// Plan one unit's whole turn. Never fails: errors become an end-turn
/// plan with the error text as its reason.
pub fn plan_turn(
    snapshot: &WorldSnapshot,
    oracle: &dyn CombatOracle,
    session: &mut SessionContext,
    policy: &RolePolicy,
) -> TurnPlan {
    plan_turn_with_advisor(snapshot, oracle, session, policy, &SequenceAdvisor)
}

/// Like [`plan_turn`] but with an injected attack advisor, mainly for
/// exercising the null-vs-empty advice contract.
pub fn plan_turn_with_advisor(
    snapshot: &WorldSnapshot,
    oracle: &dyn CombatOracle,
    session: &mut SessionContext,
    policy: &RolePolicy,
    advisor: &dyn AttackAdvisor,
) -> TurnPlan {
    let metrics = snapshot_metrics(snapshot, oracle);
    match run_pipeline(snapshot, oracle, session, policy, advisor, metrics) {
        Ok(plan) => plan,
        Err(error) => TurnPlan::end_turn_only(format!("planning failed: {}", error), metrics),
    }
}

fn run_pipeline(
    snapshot: &WorldSnapshot,
    oracle: &dyn CombatOracle,
    session: &mut SessionContext,
    policy: &RolePolicy,
    advisor: &dyn AttackAdvisor,
    metrics: PlanMetrics,
) -> Result<TurnPlan> {
    let mut ctx = PlanningContext::new(snapshot, oracle, session, policy);
    let mut state = PipelineState::default();
    let mut actions: Vec<PlannedAction> = Vec::new();

    let mut short_circuit = None;
    for kind in &policy.phases {
        match phases::run_phase(*kind, &mut ctx, &mut state, &mut actions, advisor)? {
            PhaseOutcome::Continue => {}
            PhaseOutcome::ShortCircuit(priority) => {
                short_circuit = Some(priority);
                break;
            }
        }
    }

    revalidate(&ctx, &mut actions);

    // Short-circuited phases skip the end-turn phase. The ultimate pushes
    // its own guard; an emergency heal stays a bare single-action plan.
    if short_circuit != Some(PlanPriority::Emergency)
        && !actions.iter().any(|a| a.kind == ActionKind::EndTurn)
    {
        actions.push(PlannedAction::end_turn("turn complete"));
    }

    let priority = short_circuit.unwrap_or_else(|| classify(&state, &actions));
    let reasoning = summarize(priority, &actions);

    Ok(TurnPlan {
        actions,
        priority,
        reasoning,
        metrics,
    })
}

/// Cheap revalidation after assembly: drop attacks that are no longer
/// legal from the tile they will be made from. If that removed the only
/// attack and movement is still possible, substitute a recovery move.
fn revalidate(ctx: &PlanningContext, actions: &mut Vec<PlannedAction>) {
    let had_attack = actions.iter().any(|a| a.kind == ActionKind::Attack);

    let mut seen_move = false;
    actions.retain(|action| {
        if action.kind == ActionKind::Move {
            seen_move = true;
            return true;
        }
        if action.kind != ActionKind::Attack || seen_move {
            return true;
        }
        match (&action.ability, action.target) {
            (Some(ability), Target::Unit(target)) => ctx.oracle.can_use_on(ability, target).allowed,
            (Some(ability), Target::Point(point)) => ctx.oracle.can_use_at(ability, point).allowed,
            _ => true,
        }
    });

    let has_attack = actions.iter().any(|a| a.kind == ActionKind::Attack);
    if had_attack && !has_attack && ctx.ledger.can_move() {
        let destination = ctx
            .reachable_tiles()
            .into_iter()
            .filter(|tile| tile.hittable_enemies > 0)
            .max_by(|a, b| {
                a.position_score
                    .partial_cmp(&b.position_score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|tile| tile.loc);
        if let Some(destination) = destination {
            let end_index = actions
                .iter()
                .position(|a| a.kind == ActionKind::EndTurn)
                .unwrap_or(actions.len());
            actions.insert(
                end_index,
                PlannedAction::new(ActionKind::Move, 0.0, "recover position after dropped attack")
                    .with_target(Target::Point(destination)),
            );
        }
    }
}

fn classify(state: &PipelineState, actions: &[PlannedAction]) -> PlanPriority {
    let has_attack = actions.iter().any(|a| a.kind == ActionKind::Attack);
    let has_buff = actions.iter().any(|a| a.kind == ActionKind::Buff);

    if state.retreated && has_attack {
        PlanPriority::Retreat
    } else if has_attack && (has_buff || state.buffed_for_attack) {
        PlanPriority::BuffedAttack
    } else if has_attack {
        PlanPriority::DirectAttack
    } else {
        PlanPriority::EndTurn
    }
}

fn summarize(priority: PlanPriority, actions: &[PlannedAction]) -> String {
    let attacks = actions.iter().filter(|a| a.kind == ActionKind::Attack).count();
    let moves = actions.iter().filter(|a| a.kind == ActionKind::Move).count();
    match priority {
        PlanPriority::Emergency => "emergency response".to_string(),
        PlanPriority::Retreat => format!("{} attacks, then fall back", attacks),
        PlanPriority::BuffedAttack => format!("buffed attack chain ({} attacks)", attacks),
        PlanPriority::DirectAttack => format!("direct attack ({} attacks)", attacks),
        PlanPriority::EndTurn => {
            if moves > 0 {
                "reposition and end turn".to_string()
            } else {
                "end turn".to_string()
            }
        }
    }
}

fn snapshot_metrics(snapshot: &WorldSnapshot, oracle: &dyn CombatOracle) -> PlanMetrics {
    let hittable = snapshot
        .enemies
        .iter()
        .filter(|enemy| {
            snapshot
                .abilities
                .attacks
                .iter()
                .chain(snapshot.abilities.aoe_attacks.iter())
                .any(|attack| oracle.can_use_on(attack, enemy.id).allowed)
        })
        .count();
    PlanMetrics {
        hp_ratio: snapshot.hp_ratio(),
        nearest_enemy_distance: snapshot.nearest_enemy_distance(),
        hittable_enemies: hittable,
        start_ap: snapshot.ap,
        start_mp: snapshot.mp,
    }
}
