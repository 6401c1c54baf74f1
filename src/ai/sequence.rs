//! Whole-turn sequence scoring
//!
//! Generates a bounded set of candidate multi-action templates for the
//! remaining AP budget and returns the best one as a non-binding
//! recommendation. "No recommendation" is a normal outcome, not an
//! error; callers fall back to their own greedy heuristics.

use crate::core::{
    ability::{Ability, AbilityTiming, KillSequence},
    unit::UnitId,
};

use super::context::PlanningContext;

/// Identifies which template won the scoring pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateId {
    PureChain,
    BuffedChain,
    ResetChain,
    BuffedResetChain,
    AoeChain,
    BuffedAoeChain,
    AoeResetChain,
    BuffedAoeResetChain,
    DebuffChain,
    GuaranteedKill,
}

/// The scorer's advice to the attack phase
#[derive(Debug, Clone)]
pub struct SequenceRecommendation {
    pub template: TemplateId,
    pub primary: Ability,
    pub buff: Option<Ability>,
    pub aoe: Option<Ability>,
    pub debuff: Option<Ability>,
    /// Reset ability to reserve AP for mid-sequence
    pub reserve_reset: Option<Ability>,
    pub kill_sequence: Option<KillSequence>,
    pub expected_damage: f32,
    pub score: f32,
}

/// A single-use attack profile: one ability, its cost, its damage
#[derive(Debug, Clone)]
struct AttackProfile {
    ability: Ability,
    ap_cost: f32,
    /// Expected damage summed over everything the use strikes
    damage_per_use: f32,
    /// Expected damage landing on the primary target per use
    damage_on_primary: f32,
}

#[derive(Debug, Clone)]
struct Candidate {
    template: TemplateId,
    total_damage: f32,
    kill_bonus: f32,
    utility_bonus: f32,
    primary: Ability,
    buff: Option<Ability>,
    aoe: Option<Ability>,
    debuff: Option<Ability>,
    reset: Option<Ability>,
    kill_sequence: Option<KillSequence>,
}

impl Candidate {
    fn score(&self) -> f32 {
        self.total_damage + self.kill_bonus + self.utility_bonus
    }
}

/// Score whole-turn templates against the target and return the best.
///
/// Returns `None` when the target is gone or nothing reaches it; the
/// caller must tolerate this and fall back to local heuristics.
pub fn recommend(ctx: &PlanningContext, target: UnitId) -> Option<SequenceRecommendation> {
    let enemy = ctx.snapshot.enemy(target)?;
    let target_hp = enemy.hp.max(1.0);
    let budget = ctx.ledger.ap();

    let single = single_target_profile(ctx, target)?;
    let aoe = superior_aoe_profile(ctx, target, &single);
    let buff = best_pre_attack_buff(ctx);
    let reset = reset_ability(ctx);

    let mut candidates = Vec::with_capacity(10);

    // {single, aoe} x {no buff, buff} x {no reset, reset}
    let profiles: [(&AttackProfile, bool); 2] = [(&single, false), (aoe.as_ref().unwrap_or(&single), true)];
    for (profile, is_aoe) in profiles {
        if is_aoe && aoe.is_none() {
            continue;
        }
        for use_buff in [false, true] {
            if use_buff && buff.is_none() {
                continue;
            }
            for use_reset in [false, true] {
                if use_reset && reset.is_none() {
                    continue;
                }
                if let Some(candidate) = chain_candidate(
                    ctx,
                    budget,
                    target_hp,
                    profile,
                    is_aoe,
                    use_buff.then(|| buff.clone().unwrap()),
                    use_reset.then(|| reset.clone().unwrap()),
                ) {
                    candidates.push(candidate);
                }
            }
        }
    }

    if let Some(candidate) = debuff_candidate(ctx, budget, target, target_hp, &single) {
        candidates.push(candidate);
    }
    if let Some(candidate) = kill_candidate(ctx, budget, target, target_hp, &single) {
        candidates.push(candidate);
    }

    // Strictly-greater comparison keeps the earliest template on ties,
    // so exact AoE/single-target damage ties favor single-target.
    let mut best: Option<Candidate> = None;
    for candidate in candidates {
        let better = match &best {
            Some(current) => candidate.score() > current.score(),
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }

    best.map(|c| {
        let score = c.score();
        SequenceRecommendation {
            template: c.template,
            primary: c.primary,
            buff: c.buff,
            aoe: c.aoe,
            debuff: c.debuff,
            reserve_reset: c.reset,
            kill_sequence: c.kill_sequence,
            expected_damage: c.total_damage,
            score,
        }
    })
}

fn single_target_profile(ctx: &PlanningContext, target: UnitId) -> Option<AttackProfile> {
    let ability = ctx.best_attack_on(target)?;
    let damage = ctx.oracle.damage_prediction(&ability, target).average();
    let ap_cost = ctx.oracle.ability_ap_cost(&ability);
    if ap_cost <= 0.0 {
        return None;
    }
    Some(AttackProfile {
        ability,
        ap_cost,
        damage_per_use: damage,
        damage_on_primary: damage,
    })
}

/// An AoE profile is admitted only when its damage-per-AP strictly beats
/// the single-target profile AND it strikes at least two enemies with no
/// friendly fire. Ties go to single-target; that asymmetry is intended.
fn superior_aoe_profile(
    ctx: &PlanningContext,
    target: UnitId,
    single: &AttackProfile,
) -> Option<AttackProfile> {
    let enemy = ctx.snapshot.enemy(target)?;
    let single_dpa = single.damage_per_use / single.ap_cost;

    let mut best: Option<(f32, AttackProfile)> = None;
    for ability in &ctx.snapshot.abilities.aoe_attacks {
        if !ctx.oracle.can_use_at(ability, enemy.loc).allowed {
            continue;
        }
        let ap_cost = ctx.oracle.ability_ap_cost(ability);
        if ap_cost <= 0.0 {
            continue;
        }
        let hits = ctx
            .oracle
            .units_in_pattern(ability, enemy.loc, ctx.snapshot.unit.loc);
        if hits.enemies < 2 || hits.allies > 0 {
            continue;
        }
        let per_target = ctx.oracle.damage_prediction(ability, target).average();
        let damage_per_use = per_target * hits.enemies as f32;
        let dpa = damage_per_use / ap_cost;
        if dpa <= single_dpa {
            continue;
        }
        let better = match &best {
            Some((best_dpa, _)) => dpa > *best_dpa,
            None => true,
        };
        if better {
            best = Some((
                dpa,
                AttackProfile {
                    ability: ability.clone(),
                    ap_cost,
                    damage_per_use,
                    damage_on_primary: per_target,
                },
            ));
        }
    }
    best.map(|(_, profile)| profile)
}

fn best_pre_attack_buff(ctx: &PlanningContext) -> Option<Ability> {
    let mut best: Option<(bool, f32, Ability)> = None;
    for ability in &ctx.snapshot.abilities.buffs {
        let timing = ctx.oracle.ability_timing(ability);
        if timing != AbilityTiming::PreAttackBuff && timing != AbilityTiming::PreCombatBuff {
            continue;
        }
        if ctx.exclusions.has_ability(ability.id) {
            continue;
        }
        if !ctx.ledger.can_afford_ap(ctx.oracle.ability_ap_cost(ability)) {
            continue;
        }
        let stale = ctx.session.recently_used(
            ability.id,
            ctx.snapshot.turn,
            ctx.policy.weights.recent_use_window,
        );
        let multiplier = ctx.oracle.buff_damage_multiplier(ability);
        // Fresh buffs beat stale ones; among equals, the bigger effect wins
        let better = match &best {
            Some((best_stale, best_mult, _)) => {
                (!stale && *best_stale) || (stale == *best_stale && multiplier > *best_mult)
            }
            None => true,
        };
        if better {
            best = Some((stale, multiplier, ability.clone()));
        }
    }
    best.map(|(_, _, ability)| ability)
}

fn reset_ability(ctx: &PlanningContext) -> Option<Ability> {
    ctx.snapshot
        .abilities
        .recovery
        .iter()
        .find(|ability| ctx.oracle.ability_timing(ability) == AbilityTiming::RighteousFury)
        .cloned()
}

#[allow(clippy::too_many_arguments)]
fn chain_candidate(
    ctx: &PlanningContext,
    budget: f32,
    target_hp: f32,
    profile: &AttackProfile,
    is_aoe: bool,
    buff: Option<Ability>,
    reset: Option<Ability>,
) -> Option<Candidate> {
    let weights = &ctx.policy.weights;

    let mut remaining = budget;
    let mut multiplier = 1.0;
    if let Some(buff) = &buff {
        let cost = ctx.oracle.ability_ap_cost(buff);
        if cost > remaining {
            return None;
        }
        remaining -= cost;
        multiplier = ctx.oracle.buff_damage_multiplier(buff).max(1.0);
    }

    let mut bonus_uses = 0;
    if let Some(reset) = &reset {
        let cost = ctx.oracle.ability_ap_cost(reset);
        if cost > remaining {
            return None;
        }
        remaining -= cost;
        // A reset grants one free follow-up once the chain is rolling
        bonus_uses = 1;
    }

    let uses = (remaining / profile.ap_cost).floor() as u32;
    if uses == 0 {
        // A reset with nothing to reset is meaningless
        return None;
    }
    let uses = uses + bonus_uses;

    let total_damage = profile.damage_per_use * multiplier * uses as f32;
    let on_primary = profile.damage_on_primary * multiplier * uses as f32;
    let kill_bonus = (on_primary / target_hp).min(1.0) * weights.max_kill_bonus;

    let template = match (is_aoe, buff.is_some(), reset.is_some()) {
        (false, false, false) => TemplateId::PureChain,
        (false, true, false) => TemplateId::BuffedChain,
        (false, false, true) => TemplateId::ResetChain,
        (false, true, true) => TemplateId::BuffedResetChain,
        (true, false, false) => TemplateId::AoeChain,
        (true, true, false) => TemplateId::BuffedAoeChain,
        (true, false, true) => TemplateId::AoeResetChain,
        (true, true, true) => TemplateId::BuffedAoeResetChain,
    };

    Some(Candidate {
        template,
        total_damage,
        kill_bonus,
        utility_bonus: 0.0,
        primary: profile.ability.clone(),
        buff,
        aoe: is_aoe.then(|| profile.ability.clone()),
        debuff: None,
        reset,
        kill_sequence: None,
    })
}

fn debuff_candidate(
    ctx: &PlanningContext,
    budget: f32,
    target: UnitId,
    target_hp: f32,
    single: &AttackProfile,
) -> Option<Candidate> {
    let weights = &ctx.policy.weights;

    let debuff = ctx
        .snapshot
        .abilities
        .debuffs
        .iter()
        .find(|ability| ctx.oracle.can_use_on(ability, target).allowed)?;
    let debuff_cost = ctx.oracle.ability_ap_cost(debuff);
    if debuff_cost > budget {
        return None;
    }

    let uses = ((budget - debuff_cost) / single.ap_cost).floor() as u32;
    let total_damage = single.damage_per_use * uses as f32;
    let on_primary = single.damage_on_primary * uses as f32;

    Some(Candidate {
        template: TemplateId::DebuffChain,
        total_damage,
        kill_bonus: (on_primary / target_hp).min(1.0) * weights.max_kill_bonus,
        utility_bonus: weights.debuff_utility,
        primary: single.ability.clone(),
        buff: None,
        aoe: None,
        debuff: Some(debuff.clone()),
        reset: None,
        kill_sequence: None,
    })
}

fn kill_candidate(
    ctx: &PlanningContext,
    budget: f32,
    target: UnitId,
    target_hp: f32,
    single: &AttackProfile,
) -> Option<Candidate> {
    let weights = &ctx.policy.weights;
    let sequence = ctx.oracle.kill_sequence(target)?;
    if sequence.ap_cost > budget || sequence.abilities.is_empty() {
        return None;
    }

    let mut kill_bonus = (sequence.total_damage / target_hp).min(1.0) * weights.max_kill_bonus;
    if sequence.confirmed {
        kill_bonus += weights.confirmed_kill_bonus;
    }

    Some(Candidate {
        template: TemplateId::GuaranteedKill,
        total_damage: sequence.total_damage,
        kill_bonus,
        utility_bonus: 0.0,
        primary: single.ability.clone(),
        buff: None,
        aoe: None,
        debuff: None,
        reset: None,
        kill_sequence: Some(sequence),
    })
}
