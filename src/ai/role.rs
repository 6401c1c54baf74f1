//! Role policies: data-level parameterization of the phase pipeline
//!
//! A policy changes phase ordering, target weighting and a few toggles.
//! It never introduces resource accounting of its own; all AP/MP
//! bookkeeping funnels through the shared ledger.

use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

use crate::core::convert::{FromIndex, ToIndex};

use super::weights::ScoreWeights;

/// Combat role of the planning unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Role {
    Tank,
    Bruiser,
    Skirmisher,
    Sniper,
    Support,
}

impl Role {
    pub fn all() -> [Role; 5] {
        [
            Role::Tank,
            Role::Bruiser,
            Role::Skirmisher,
            Role::Sniper,
            Role::Support,
        ]
    }
}

impl FromIndex for Role {
    fn from_index(idx: usize) -> Result<Self> {
        FromPrimitive::from_usize(idx).ok_or_else(|| anyhow!("Invalid role index: {}", idx))
    }
}

impl ToIndex for Role {
    fn to_index(&self) -> Result<usize> {
        ToPrimitive::to_usize(self).ok_or_else(|| anyhow!("Invalid role value"))
    }
}

/// One step of the pipeline, in policy order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    EmergencyHeal,
    Ultimate,
    ResourceRecovery,
    SelfBuff,
    AllyBuffs,
    Mark,
    TacticalMove,
    AttackLoop,
    PostAction,
    EndTurn,
}

/// How target selection weighs candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetBias {
    Balanced,
    /// Prioritize enemies currently threatening allies
    ThreatToAllies,
    /// Prioritize targets that can be hit without closing in
    SafeRanged,
    LowestHp,
}

/// Per-role configuration consumed by the pipeline
#[derive(Debug, Clone)]
pub struct RolePolicy {
    pub role: Role,
    pub phases: Vec<PhaseKind>,
    pub weights: ScoreWeights,
    pub target_bias: TargetBias,
    pub retreat_allowed: bool,
    pub post_attack_reposition: bool,
}

impl RolePolicy {
    pub fn for_role(role: Role) -> &'static RolePolicy {
        &ROLE_POLICIES[role.to_index().unwrap_or(0)]
    }
}

fn standard_phases() -> Vec<PhaseKind> {
    vec![
        PhaseKind::EmergencyHeal,
        PhaseKind::Ultimate,
        PhaseKind::ResourceRecovery,
        PhaseKind::SelfBuff,
        PhaseKind::AllyBuffs,
        PhaseKind::Mark,
        PhaseKind::TacticalMove,
        PhaseKind::AttackLoop,
        PhaseKind::PostAction,
        PhaseKind::EndTurn,
    ]
}

lazy_static! {
    static ref ROLE_POLICIES: [RolePolicy; 5] = {
        let tank = RolePolicy {
            role: Role::Tank,
            // Defensive stance and the taunt mark come before ally buffs
            phases: vec![
                PhaseKind::EmergencyHeal,
                PhaseKind::Ultimate,
                PhaseKind::ResourceRecovery,
                PhaseKind::SelfBuff,
                PhaseKind::Mark,
                PhaseKind::AllyBuffs,
                PhaseKind::TacticalMove,
                PhaseKind::AttackLoop,
                PhaseKind::PostAction,
                PhaseKind::EndTurn,
            ],
            weights: ScoreWeights {
                w_safety: 0.2,
                ..ScoreWeights::default()
            },
            target_bias: TargetBias::ThreatToAllies,
            retreat_allowed: false,
            post_attack_reposition: false,
        };

        let bruiser = RolePolicy {
            role: Role::Bruiser,
            phases: standard_phases(),
            weights: ScoreWeights::default(),
            target_bias: TargetBias::Balanced,
            retreat_allowed: false,
            post_attack_reposition: false,
        };

        let skirmisher = RolePolicy {
            role: Role::Skirmisher,
            phases: standard_phases(),
            weights: ScoreWeights {
                w_improvement: 20.0,
                ..ScoreWeights::default()
            },
            target_bias: TargetBias::LowestHp,
            retreat_allowed: true,
            post_attack_reposition: true,
        };

        let sniper = RolePolicy {
            role: Role::Sniper,
            phases: standard_phases(),
            weights: ScoreWeights {
                w_safety: 0.8,
                ..ScoreWeights::default()
            },
            target_bias: TargetBias::LowestHp,
            retreat_allowed: true,
            post_attack_reposition: true,
        };

        let support = RolePolicy {
            role: Role::Support,
            // Allies get buffed before the unit looks after itself
            phases: vec![
                PhaseKind::EmergencyHeal,
                PhaseKind::ResourceRecovery,
                PhaseKind::AllyBuffs,
                PhaseKind::SelfBuff,
                PhaseKind::TacticalMove,
                PhaseKind::AttackLoop,
                PhaseKind::PostAction,
                PhaseKind::EndTurn,
            ],
            weights: ScoreWeights {
                w_safety: 1.0,
                ..ScoreWeights::default()
            },
            target_bias: TargetBias::SafeRanged,
            retreat_allowed: true,
            post_attack_reposition: false,
        };

        [tank, bruiser, skirmisher, sniper, support]
    };
}
