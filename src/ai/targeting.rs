//! Role-weighted target selection

use crate::core::{ability::Ability, unit::UnitId};

use super::{context::PlanningContext, role::TargetBias};

/// A scored attack candidate: who to hit and with what
#[derive(Debug, Clone)]
pub struct TargetChoice {
    pub target: UnitId,
    pub ability: Ability,
    pub score: f32,
}

/// Pick the best (target, ability) pair for a greedy attack.
///
/// Honors the exclusion sets unless only one legal target remains, in
/// which case the exclusions are bypassed so a single-enemy endgame can
/// still be attacked repeatedly.
pub fn pick_attack(ctx: &PlanningContext) -> Option<TargetChoice> {
    let hittable = ctx.hittable_enemies();
    if hittable.is_empty() {
        return None;
    }

    let bypass_exclusions = hittable.len() == 1;
    let mut best: Option<TargetChoice> = None;

    for target in &hittable {
        if !bypass_exclusions && ctx.exclusions.has_target(*target) {
            continue;
        }
        let Some(enemy) = ctx.snapshot.enemy(*target) else {
            continue;
        };

        for attack in &ctx.snapshot.abilities.attacks {
            if !bypass_exclusions && ctx.exclusions.has_ability(attack.id) {
                continue;
            }
            let check = ctx.oracle.can_use_on(attack, *target);
            if !check.allowed {
                continue;
            }
            let cost = ctx.oracle.ability_ap_cost(attack);
            if !ctx.ledger.can_afford_ap(cost) {
                continue;
            }

            let prediction = ctx.oracle.damage_prediction(attack, *target);
            let mut score = prediction.average();
            if prediction.can_kill {
                score += ctx.policy.weights.max_kill_bonus;
            }

            score += bias_bonus(ctx, *target, enemy.hp_ratio());

            // A taunt reservation on the team blackboard steers squadmates
            // toward other targets
            if ctx.session.is_taunt_reserved(*target) {
                score -= ctx.policy.weights.w_hittable;
            }

            let better = match &best {
                Some(current) => score > current.score,
                None => true,
            };
            if better {
                best = Some(TargetChoice {
                    target: *target,
                    ability: attack.clone(),
                    score,
                });
            }
        }
    }

    best
}

fn bias_bonus(ctx: &PlanningContext, target: UnitId, target_hp_ratio: f32) -> f32 {
    let weights = &ctx.policy.weights;
    let Some(enemy) = ctx.snapshot.enemy(target) else {
        return 0.0;
    };

    match ctx.policy.target_bias {
        TargetBias::Balanced => 0.0,
        TargetBias::LowestHp => (1.0 - target_hp_ratio) * weights.w_hittable,
        TargetBias::ThreatToAllies => {
            // An enemy breathing down an ally's neck outranks a distant one
            let near_ally = ctx
                .snapshot
                .allies
                .iter()
                .map(|ally| enemy.loc.dist(&ally.loc))
                .min()
                .unwrap_or(i32::MAX);
            if near_ally <= 1 {
                weights.w_hittable
            } else if near_ally <= 3 {
                weights.w_hittable * 0.5
            } else {
                0.0
            }
        }
        TargetBias::SafeRanged => {
            // Prefer targets that cannot immediately answer back
            let distance = ctx.snapshot.unit.loc.dist(&enemy.loc);
            if distance >= 4 {
                weights.w_hittable * 0.5
            } else if distance <= 1 {
                -weights.w_hittable * 0.5
            } else {
                0.0
            }
        }
    }
}
