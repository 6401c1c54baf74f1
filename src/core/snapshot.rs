//! Immutable per-turn view of the battlefield

use super::{
    ability::Ability,
    unit::{UnitId, UnitView},
};

/// The unit's available abilities, partitioned by category.
///
/// Classification is done by external collaborators; the planner only
/// reads the partitions.
#[derive(Debug, Clone, Default)]
pub struct AbilityBook {
    pub attacks: Vec<Ability>,
    pub heals: Vec<Ability>,
    pub buffs: Vec<Ability>,
    pub debuffs: Vec<Ability>,
    pub aoe_attacks: Vec<Ability>,
    pub markers: Vec<Ability>,
    pub specials: Vec<Ability>,
    pub recovery: Vec<Ability>,
}

impl AbilityBook {
    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
            && self.heals.is_empty()
            && self.buffs.is_empty()
            && self.debuffs.is_empty()
            && self.aoe_attacks.is_empty()
            && self.markers.is_empty()
            && self.specials.is_empty()
            && self.recovery.is_empty()
    }
}

/// Everything one planning call is allowed to see.
///
/// Built fresh per turn by external collaborators and never mutated by
/// the planner; two identical snapshots produce identical plans.
#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    pub unit: UnitView,
    pub allies: Vec<UnitView>,
    pub enemies: Vec<UnitView>,
    pub abilities: AbilityBook,
    pub ap: f32,
    pub mp: f32,
    pub turn: u32,
    /// Derived flags supplied by the snapshot builder
    pub in_danger: bool,
    pub prefers_ranged: bool,
    pub needs_reposition: bool,
    /// Movement allowed even with zero MP (e.g. a free reposition charge)
    pub can_move_flag: bool,
}

impl WorldSnapshot {
    pub fn hp_ratio(&self) -> f32 {
        self.unit.hp_ratio()
    }

    pub fn can_move(&self) -> bool {
        self.mp > 0.0 || self.can_move_flag
    }

    pub fn enemy(&self, id: UnitId) -> Option<&UnitView> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn ally(&self, id: UnitId) -> Option<&UnitView> {
        self.allies.iter().find(|a| a.id == id)
    }

    pub fn nearest_enemy_distance(&self) -> i32 {
        self.enemies
            .iter()
            .map(|e| self.unit.loc.dist(&e.loc))
            .min()
            .unwrap_or(i32::MAX)
    }
}
