//! Shared scripted oracle and snapshot builders for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use tactician::core::{
    ability::{Ability, AbilityId, AbilityTiming, DamagePrediction, KillSequence},
    loc::Loc,
    queries::{CombatOracle, PatternHits, ReachableTile, UseCheck},
    snapshot::{AbilityBook, WorldSnapshot},
    unit::{UnitId, UnitView},
};

/// Oracle whose every answer is scripted by the test
#[derive(Default)]
pub struct MockOracle {
    pub ap_costs: HashMap<AbilityId, f32>,
    pub mp_costs: HashMap<AbilityId, f32>,
    pub damage: HashMap<AbilityId, DamagePrediction>,
    pub usable_on: HashSet<(AbilityId, UnitId)>,
    pub usable_at: HashSet<AbilityId>,
    pub hit_chances: HashMap<(AbilityId, UnitId), f32>,
    pub buff_multipliers: HashMap<AbilityId, f32>,
    pub timings: HashMap<AbilityId, AbilityTiming>,
    pub tiles: Vec<ReachableTile>,
    pub pattern_hits: HashMap<AbilityId, PatternHits>,
    pub kill_sequences: HashMap<UnitId, KillSequence>,
}

impl MockOracle {
    pub fn script_attack(
        &mut self,
        id: AbilityId,
        cost: f32,
        min: f32,
        max: f32,
        targets: &[UnitId],
    ) {
        self.ap_costs.insert(id, cost);
        self.damage.insert(id, DamagePrediction::new(min, max, false));
        for target in targets {
            self.usable_on.insert((id, *target));
        }
    }
}

impl CombatOracle for MockOracle {
    fn ability_ap_cost(&self, ability: &Ability) -> f32 {
        self.ap_costs.get(&ability.id).copied().unwrap_or(1.0)
    }

    fn ability_mp_cost(&self, ability: &Ability) -> f32 {
        self.mp_costs.get(&ability.id).copied().unwrap_or(0.0)
    }

    fn damage_prediction(&self, ability: &Ability, _target: UnitId) -> DamagePrediction {
        self.damage
            .get(&ability.id)
            .copied()
            .unwrap_or(DamagePrediction::new(0.0, 0.0, false))
    }

    fn can_use_on(&self, ability: &Ability, target: UnitId) -> UseCheck {
        if self.usable_on.contains(&(ability.id, target)) {
            UseCheck::ok()
        } else {
            UseCheck::denied("out of range")
        }
    }

    fn can_use_at(&self, ability: &Ability, _point: Loc) -> UseCheck {
        if self.usable_at.contains(&ability.id) {
            UseCheck::ok()
        } else {
            UseCheck::denied("not aimable there")
        }
    }

    fn hit_chance(&self, ability: &Ability, target: UnitId) -> f32 {
        self.hit_chances
            .get(&(ability.id, target))
            .copied()
            .unwrap_or(1.0)
    }

    fn buff_damage_multiplier(&self, ability: &Ability) -> f32 {
        self.buff_multipliers
            .get(&ability.id)
            .copied()
            .unwrap_or(1.0)
    }

    fn ability_timing(&self, ability: &Ability) -> AbilityTiming {
        self.timings
            .get(&ability.id)
            .copied()
            .unwrap_or(AbilityTiming::Normal)
    }

    fn reachable_tiles(&self, _unit: UnitId, _mp_budget: f32) -> Vec<ReachableTile> {
        self.tiles.clone()
    }

    fn units_in_pattern(&self, ability: &Ability, _aim: Loc, _caster: Loc) -> PatternHits {
        self.pattern_hits
            .get(&ability.id)
            .copied()
            .unwrap_or(PatternHits {
                enemies: 0,
                allies: 0,
            })
    }

    fn kill_sequence(&self, target: UnitId) -> Option<KillSequence> {
        self.kill_sequences.get(&target).cloned()
    }
}

pub fn unit(id: u32, x: i32, y: i32, hp: f32, max_hp: f32) -> UnitView {
    UnitView::new(UnitId(id), format!("unit-{}", id), Loc::new(x, y), hp, max_hp)
}

pub fn snapshot(abilities: AbilityBook, enemies: Vec<UnitView>) -> WorldSnapshot {
    WorldSnapshot {
        unit: unit(1, 0, 0, 100.0, 100.0),
        allies: vec![],
        enemies,
        abilities,
        ap: 6.0,
        mp: 4.0,
        turn: 1,
        in_danger: false,
        prefers_ranged: false,
        needs_reposition: false,
        can_move_flag: false,
    }
}

pub fn tile(x: i32, y: i32, hittable: usize) -> ReachableTile {
    ReachableTile {
        loc: Loc::new(x, y),
        standable: true,
        move_cost: 1.0,
        hittable_enemies: hittable,
        position_score: 0.0,
        safety_score: 0.0,
        cover_score: 0.0,
        distance_gain: 1.0,
    }
}
