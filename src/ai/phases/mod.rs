//! Pipeline phases
//!
//! Every phase has the same contract: given the planning context and the
//! action list built so far, append zero or more actions and leave the
//! ledger consistent. Producing nothing is normal and never aborts the
//! pipeline; only the short-circuit phases end it early.

pub mod attack;
pub mod emergency;
pub mod movement;
pub mod post;
pub mod prep;

use anyhow::Result;

use crate::core::{
    loc::Loc,
    plan::{PlanPriority, PlannedAction},
};

use super::{context::PlanningContext, pipeline::AttackAdvisor, role::PhaseKind};

/// What a phase tells the pipeline to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    Continue,
    /// Terminate the whole pipeline with the plan built so far
    ShortCircuit(PlanPriority),
}

/// Mutable scratch state shared by phases within one pipeline run
#[derive(Debug, Default)]
pub struct PipelineState {
    /// Set by the movement phase when attack-then-retreat was chosen
    pub retreat_destination: Option<Loc>,
    /// Destination and promised hittable count of a planned move
    pub moved_to: Option<(Loc, usize)>,
    /// AP earmarked by the movement phase for the follow-up attack
    pub reserved_for_attack: f32,
    pub next_group: u32,
    /// A buff was planned that only pays off if an attack follows
    pub buffed_for_attack: bool,
    /// A post-attack retreat move made it into the plan
    pub retreated: bool,
}

impl PipelineState {
    pub fn fresh_group(&mut self) -> u32 {
        self.next_group += 1;
        self.next_group
    }
}

pub fn run_phase(
    kind: PhaseKind,
    ctx: &mut PlanningContext,
    state: &mut PipelineState,
    actions: &mut Vec<PlannedAction>,
    advisor: &dyn AttackAdvisor,
) -> Result<PhaseOutcome> {
    match kind {
        PhaseKind::EmergencyHeal => emergency::emergency_heal(ctx, actions),
        PhaseKind::Ultimate => emergency::ultimate(ctx, actions),
        PhaseKind::ResourceRecovery => prep::resource_recovery(ctx, actions),
        PhaseKind::SelfBuff => prep::self_buffs(ctx, state, actions),
        PhaseKind::AllyBuffs => prep::ally_buffs(ctx, actions),
        PhaseKind::Mark => prep::mark(ctx, actions),
        PhaseKind::TacticalMove => movement::tactical_move(ctx, state, actions),
        PhaseKind::AttackLoop => attack::attack_loop(ctx, state, actions, advisor),
        PhaseKind::PostAction => post::post_action(ctx, state, actions),
        PhaseKind::EndTurn => post::end_turn(ctx, actions),
    }
}
