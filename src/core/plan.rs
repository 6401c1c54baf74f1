//! Planned actions and turn plans

use super::{
    ability::Ability,
    loc::Loc,
    unit::UnitId,
};

/// What a planned action does when executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Attack,
    Heal,
    Buff,
    Move,
    Reload,
    EndTurn,
}

/// What a planned action is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Unit(UnitId),
    Point(Loc),
    None,
}

/// How the execution layer treats the rest of a group when one action fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Skip the remaining actions in this group
    SkipGroup,
    Continue,
}

/// Marks a run of actions as an atomic pair/chain at the execution layer,
/// e.g. a buff that is pointless without the attack that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupTag {
    pub id: u32,
    pub on_failure: FailurePolicy,
}

/// One step of a turn plan
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedAction {
    pub kind: ActionKind,
    pub ability: Option<Ability>,
    pub target: Target,
    pub ap_cost: f32,
    pub reason: String,
    pub group: Option<GroupTag>,
}

impl PlannedAction {
    pub fn new(kind: ActionKind, ap_cost: f32, reason: impl Into<String>) -> Self {
        Self {
            kind,
            ability: None,
            target: Target::None,
            ap_cost,
            reason: reason.into(),
            group: None,
        }
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_group(mut self, group: GroupTag) -> Self {
        self.group = Some(group);
        self
    }

    pub fn end_turn(reason: impl Into<String>) -> Self {
        Self::new(ActionKind::EndTurn, 0.0, reason)
    }
}

/// Coarse classification of what the plan is trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanPriority {
    Emergency,
    Retreat,
    BuffedAttack,
    DirectAttack,
    EndTurn,
}

/// Snapshot metrics recorded alongside a plan so an external replanning
/// trigger can detect whether the world drifted enough to replan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanMetrics {
    pub hp_ratio: f32,
    pub nearest_enemy_distance: i32,
    pub hittable_enemies: usize,
    pub start_ap: f32,
    pub start_mp: f32,
}

/// Ordered action sequence for one unit's turn
#[derive(Debug, Clone)]
pub struct TurnPlan {
    pub actions: Vec<PlannedAction>,
    pub priority: PlanPriority,
    pub reasoning: String,
    pub metrics: PlanMetrics,
}

impl TurnPlan {
    pub fn total_ap_cost(&self) -> f32 {
        self.actions.iter().map(|a| a.ap_cost).sum()
    }

    pub fn has_attack(&self) -> bool {
        self.actions.iter().any(|a| a.kind == ActionKind::Attack)
    }

    /// Plans are never empty; worst case a single end-turn action.
    pub fn end_turn_only(reason: impl Into<String>, metrics: PlanMetrics) -> Self {
        let reason = reason.into();
        Self {
            actions: vec![PlannedAction::end_turn(reason.clone())],
            priority: PlanPriority::EndTurn,
            reasoning: reason,
            metrics,
        }
    }
}
