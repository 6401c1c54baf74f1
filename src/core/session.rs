//! Per-combat session state shared across planning calls
//!
//! Constructed at combat start, torn down at combat end, and passed into
//! every planning call. Plain get/set semantics; the planner never
//! synchronizes it.

use std::collections::{HashMap, HashSet};

use hashbag::HashBag;

use super::{ability::AbilityId, unit::UnitId};
use crate::ai::role::Role;

/// Cross-turn memory: ability usage, detected roles, taunt reservations.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    usage: HashBag<AbilityId>,
    last_used: HashMap<AbilityId, u32>,
    roles: HashMap<UnitId, Role>,
    reserved_taunts: HashSet<UnitId>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_use(&mut self, ability: AbilityId, turn: u32) {
        self.usage.insert(ability);
        self.last_used.insert(ability, turn);
    }

    pub fn use_count(&self, ability: AbilityId) -> usize {
        self.usage.contains(&ability)
    }

    pub fn last_used_turn(&self, ability: AbilityId) -> Option<u32> {
        self.last_used.get(&ability).copied()
    }

    /// Whether the ability was used within the last `window` turns.
    pub fn recently_used(&self, ability: AbilityId, turn: u32, window: u32) -> bool {
        match self.last_used_turn(ability) {
            Some(last) => turn.saturating_sub(last) < window,
            None => false,
        }
    }

    pub fn detected_role(&self, unit: UnitId) -> Option<Role> {
        self.roles.get(&unit).copied()
    }

    pub fn set_detected_role(&mut self, unit: UnitId, role: Role) {
        self.roles.insert(unit, role);
    }

    /// Team blackboard: reserve a taunt target so squadmates pick others.
    pub fn reserve_taunt(&mut self, target: UnitId) -> bool {
        self.reserved_taunts.insert(target)
    }

    pub fn is_taunt_reserved(&self, target: UnitId) -> bool {
        self.reserved_taunts.contains(&target)
    }

    pub fn release_taunt(&mut self, target: UnitId) {
        self.reserved_taunts.remove(&target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_tracking() {
        let mut session = SessionContext::new();
        let ability = AbilityId(7);
        assert_eq!(session.use_count(ability), 0);
        session.record_use(ability, 3);
        session.record_use(ability, 5);
        assert_eq!(session.use_count(ability), 2);
        assert_eq!(session.last_used_turn(ability), Some(5));
        assert!(session.recently_used(ability, 6, 2));
        assert!(!session.recently_used(ability, 9, 2));
    }

    #[test]
    fn test_taunt_blackboard() {
        let mut session = SessionContext::new();
        let target = UnitId(4);
        assert!(session.reserve_taunt(target));
        assert!(!session.reserve_taunt(target));
        assert!(session.is_taunt_reserved(target));
        session.release_taunt(target);
        assert!(!session.is_taunt_reserved(target));
    }
}
