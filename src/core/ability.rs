//! Ability references and prediction data
//!
//! Abilities are lightweight handles; all metadata (costs, damage, timing)
//! is answered by the [`CombatOracle`](super::queries::CombatOracle).

use anyhow::{anyhow, Result};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

use super::convert::{FromIndex, ToIndex};

/// Stable identifier for an ability within one combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AbilityId(pub u32);

/// Reference to an ability the unit can use this turn
#[derive(Debug, Clone, PartialEq)]
pub struct Ability {
    pub id: AbilityId,
    pub name: String,
}

impl Ability {
    pub fn new(id: AbilityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// When an ability is meant to be used relative to the rest of the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum AbilityTiming {
    /// Buff that only pays off if combat follows at all
    PreCombatBuff,
    /// Buff that only pays off if an attack follows this turn
    PreAttackBuff,
    /// Only legal after the first action of the turn
    PostFirstAction,
    /// One-shot ultimate; locks the unit into a restricted state
    HeroicAct,
    /// Resource-reset; grants a bonus follow-up after a qualifying action
    RighteousFury,
    Normal,
}

impl FromIndex for AbilityTiming {
    fn from_index(idx: usize) -> Result<Self> {
        FromPrimitive::from_usize(idx).ok_or_else(|| anyhow!("Invalid timing index: {}", idx))
    }
}

impl ToIndex for AbilityTiming {
    fn to_index(&self) -> Result<usize> {
        ToPrimitive::to_usize(self).ok_or_else(|| anyhow!("Invalid timing value"))
    }
}

/// Predicted damage band for one ability against one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamagePrediction {
    pub min: f32,
    pub max: f32,
    pub can_kill: bool,
}

impl DamagePrediction {
    pub fn new(min: f32, max: f32, can_kill: bool) -> Self {
        Self { min, max, can_kill }
    }

    pub fn average(&self) -> f32 {
        (self.min + self.max) / 2.0
    }
}

/// Externally solved chain of abilities predicted to kill one target
#[derive(Debug, Clone)]
pub struct KillSequence {
    pub abilities: Vec<Ability>,
    pub ap_cost: f32,
    pub total_damage: f32,
    pub confirmed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_round_trip() {
        for idx in 0..6 {
            let timing = AbilityTiming::from_index(idx).unwrap();
            assert_eq!(timing.to_index().unwrap(), idx);
        }
        assert!(AbilityTiming::from_index(6).is_err());
    }

    #[test]
    fn test_prediction_average() {
        let pred = DamagePrediction::new(10.0, 14.0, false);
        assert_eq!(pred.average(), 12.0);
    }
}
