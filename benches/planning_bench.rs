use criterion::{criterion_group, criterion_main, Criterion};

use tactician::ai::{plan_turn, Role, RolePolicy};
use tactician::core::{
    ability::{Ability, AbilityId, AbilityTiming, DamagePrediction, KillSequence},
    loc::Loc,
    queries::{CombatOracle, PatternHits, ReachableTile, UseCheck},
    session::SessionContext,
    snapshot::{AbilityBook, WorldSnapshot},
    unit::{UnitId, UnitView},
};

/// Fixed-answer oracle: every enemy hittable, flat costs, a ring of tiles
struct FlatOracle {
    tiles: Vec<ReachableTile>,
}

impl CombatOracle for FlatOracle {
    fn ability_ap_cost(&self, _ability: &Ability) -> f32 {
        2.0
    }

    fn ability_mp_cost(&self, _ability: &Ability) -> f32 {
        0.0
    }

    fn damage_prediction(&self, _ability: &Ability, _target: UnitId) -> DamagePrediction {
        DamagePrediction::new(10.0, 14.0, false)
    }

    fn can_use_on(&self, _ability: &Ability, _target: UnitId) -> UseCheck {
        UseCheck::ok()
    }

    fn can_use_at(&self, _ability: &Ability, _point: Loc) -> UseCheck {
        UseCheck::ok()
    }

    fn hit_chance(&self, _ability: &Ability, _target: UnitId) -> f32 {
        0.85
    }

    fn ability_timing(&self, _ability: &Ability) -> AbilityTiming {
        AbilityTiming::Normal
    }

    fn reachable_tiles(&self, _unit: UnitId, _mp_budget: f32) -> Vec<ReachableTile> {
        self.tiles.clone()
    }

    fn units_in_pattern(&self, _ability: &Ability, _aim: Loc, _caster: Loc) -> PatternHits {
        PatternHits {
            enemies: 2,
            allies: 0,
        }
    }

    fn kill_sequence(&self, _target: UnitId) -> Option<KillSequence> {
        None
    }
}

fn build_world(enemy_count: u32) -> WorldSnapshot {
    let enemies = (0..enemy_count)
        .map(|i| {
            UnitView::new(
                UnitId(10 + i),
                format!("enemy-{}", i),
                Loc::new(3 + i as i32, i as i32),
                80.0,
                80.0,
            )
        })
        .collect();
    WorldSnapshot {
        unit: UnitView::new(UnitId(1), "planner", Loc::new(0, 0), 100.0, 100.0),
        allies: vec![UnitView::new(UnitId(2), "ally", Loc::new(-1, 0), 70.0, 100.0)],
        enemies,
        abilities: AbilityBook {
            attacks: vec![Ability::new(AbilityId(100), "strike")],
            aoe_attacks: vec![Ability::new(AbilityId(101), "burst")],
            ..AbilityBook::default()
        },
        ap: 6.0,
        mp: 4.0,
        turn: 1,
        in_danger: false,
        prefers_ranged: false,
        needs_reposition: false,
        can_move_flag: false,
    }
}

fn bench_plan_turn(c: &mut Criterion) {
    let tiles = (0..30)
        .map(|i| ReachableTile {
            loc: Loc::new(i % 6, i / 6 + 1),
            standable: true,
            move_cost: 1.0,
            hittable_enemies: (i % 3) as usize,
            position_score: (i % 5) as f32,
            safety_score: (i % 4) as f32,
            cover_score: 0.0,
            distance_gain: 1.0,
        })
        .collect();
    let oracle = FlatOracle { tiles };
    let world = build_world(6);

    c.bench_function("plan_turn_bruiser", |b| {
        b.iter(|| {
            let mut session = SessionContext::new();
            plan_turn(
                &world,
                &oracle,
                &mut session,
                RolePolicy::for_role(Role::Bruiser),
            )
        })
    });

    c.bench_function("plan_turn_sniper", |b| {
        b.iter(|| {
            let mut session = SessionContext::new();
            plan_turn(
                &world,
                &oracle,
                &mut session,
                RolePolicy::for_role(Role::Sniper),
            )
        })
    });
}

criterion_group!(benches, bench_plan_turn);
criterion_main!(benches);
