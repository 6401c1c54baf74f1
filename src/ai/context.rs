//! Planning context threaded through the phase chain

use std::collections::HashSet;

use crate::core::{
    ability::{Ability, AbilityId},
    ledger::ResourceLedger,
    queries::{CombatOracle, ReachableTile},
    session::SessionContext,
    snapshot::WorldSnapshot,
    unit::UnitId,
};

use super::role::RolePolicy;

/// Targets and abilities already committed within this planning pass.
///
/// Keeps repeated attack selection from resubmitting the same pair when
/// several attacks are planned in one turn. Deliberately bypassed by
/// target selection when only one legal target exists.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    targets: HashSet<UnitId>,
    abilities: HashSet<AbilityId>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&mut self, target: UnitId, ability: AbilityId) {
        self.targets.insert(target);
        self.abilities.insert(ability);
    }

    pub fn exclude_ability(&mut self, ability: AbilityId) {
        self.abilities.insert(ability);
    }

    pub fn has_target(&self, target: UnitId) -> bool {
        self.targets.contains(&target)
    }

    pub fn has_ability(&self, ability: AbilityId) -> bool {
        self.abilities.contains(&ability)
    }
}

/// Everything a phase needs: the snapshot, the query services, the
/// mutable ledger, the exclusion sets and the active role policy.
pub struct PlanningContext<'a> {
    pub snapshot: &'a WorldSnapshot,
    pub oracle: &'a dyn CombatOracle,
    pub session: &'a mut SessionContext,
    pub policy: &'a RolePolicy,
    pub ledger: ResourceLedger,
    pub exclusions: Exclusions,
}

impl<'a> PlanningContext<'a> {
    pub fn new(
        snapshot: &'a WorldSnapshot,
        oracle: &'a dyn CombatOracle,
        session: &'a mut SessionContext,
        policy: &'a RolePolicy,
    ) -> Self {
        Self {
            snapshot,
            oracle,
            session,
            policy,
            ledger: ResourceLedger::new(snapshot.ap, snapshot.mp),
            exclusions: Exclusions::new(),
        }
    }

    /// Enemies hittable right now with at least one available attack.
    pub fn hittable_enemies(&self) -> Vec<UnitId> {
        self.snapshot
            .enemies
            .iter()
            .filter(|enemy| {
                self.snapshot
                    .abilities
                    .attacks
                    .iter()
                    .chain(self.snapshot.abilities.aoe_attacks.iter())
                    .any(|attack| self.oracle.can_use_on(attack, enemy.id).allowed)
            })
            .map(|enemy| enemy.id)
            .collect()
    }

    /// Highest average-damage attack usable on the target right now.
    pub fn best_attack_on(&self, target: UnitId) -> Option<Ability> {
        let mut best: Option<(Ability, f32)> = None;
        for attack in &self.snapshot.abilities.attacks {
            if !self.oracle.can_use_on(attack, target).allowed {
                continue;
            }
            let damage = self.oracle.damage_prediction(attack, target).average();
            match &best {
                Some((_, best_damage)) if damage <= *best_damage => {}
                _ => best = Some((attack.clone(), damage)),
            }
        }
        best.map(|(ability, _)| ability)
    }

    /// Average hit chance of the best attack across hittable targets,
    /// normalized to [0,1]. Returns 1.0 when nothing is hittable so the
    /// attenuation term stays neutral.
    pub fn average_hit_chance(&self) -> f32 {
        let hittable = self.hittable_enemies();
        if hittable.is_empty() {
            return 1.0;
        }
        let mut total = 0.0;
        for target in &hittable {
            let chance = self
                .best_attack_on(*target)
                .map(|attack| self.oracle.hit_chance(&attack, *target))
                .unwrap_or(0.0);
            total += chance.clamp(0.0, 1.0);
        }
        total / hittable.len() as f32
    }

    /// Score hints for the tile the unit is standing on. The pathfinder
    /// includes the current tile in every reachability query.
    pub fn current_tile(&self) -> Option<ReachableTile> {
        self.oracle
            .reachable_tiles(self.snapshot.unit.id, 0.0)
            .into_iter()
            .find(|tile| tile.loc == self.snapshot.unit.loc)
    }

    /// Standable tiles reachable under the remaining movement budget.
    pub fn reachable_tiles(&self) -> Vec<ReachableTile> {
        self.oracle
            .reachable_tiles(self.snapshot.unit.id, self.ledger.mp())
            .into_iter()
            .filter(|tile| tile.standable && tile.loc != self.snapshot.unit.loc)
            .collect()
    }

    /// Cheapest AP cost among available attacks, for reservations.
    pub fn min_attack_cost(&self) -> Option<f32> {
        self.snapshot
            .abilities
            .attacks
            .iter()
            .map(|attack| self.oracle.ability_ap_cost(attack))
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}
