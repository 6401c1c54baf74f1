use std::fmt;

use colored::Colorize;

use super::plan::{ActionKind, PlanPriority, PlannedAction, Target, TurnPlan};

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ActionKind::Attack => "attack",
            ActionKind::Heal => "heal",
            ActionKind::Buff => "buff",
            ActionKind::Move => "move",
            ActionKind::Reload => "reload",
            ActionKind::EndTurn => "end_turn",
        };
        write!(f, "{}", kind)?;
        if let Some(ability) = &self.ability {
            write!(f, " {}", ability.name)?;
        }
        match self.target {
            Target::Unit(id) => write!(f, " -> unit {}", id.0)?,
            Target::Point(loc) => write!(f, " -> {}", loc)?,
            Target::None => {}
        }
        write!(f, " [{} AP] {}", self.ap_cost, self.reason)
    }
}

impl fmt::Display for TurnPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let priority = match self.priority {
            PlanPriority::Emergency => "EMERGENCY".bright_red(),
            PlanPriority::Retreat => "RETREAT".yellow(),
            PlanPriority::BuffedAttack => "BUFFED ATTACK".bright_green(),
            PlanPriority::DirectAttack => "ATTACK".green(),
            PlanPriority::EndTurn => "END TURN".dimmed(),
        };
        writeln!(f, "{}: {}", priority, self.reasoning)?;
        for (i, action) in self.actions.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, action)?;
        }
        write!(
            f,
            "  total {} AP of {} (hp {:.0}%, {} hittable)",
            self.total_ap_cost(),
            self.metrics.start_ap,
            self.metrics.hp_ratio * 100.0,
            self.metrics.hittable_enemies
        )
    }
}
