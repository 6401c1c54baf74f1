//! Named scoring constants
//!
//! All hand-tuned values live here so role policies and callers can
//! override them. The defaults carry relative-ordering rationale only;
//! do not read meaning into their exact ratios.

/// Scoring weights and iteration caps for one planning pass
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreWeights {
    /// Value per currently/expected hittable enemy
    pub w_hittable: f32,
    /// Multiplier on control-minus-threat safety scores
    pub w_safety: f32,
    /// Value per extra hittable enemy gained by moving
    pub w_improvement: f32,
    /// Flat value of attacking at all
    pub attack_base: f32,
    /// Penalty for a ranged unit attacking from a spot it wants to leave
    pub ranged_retreat_penalty: f32,
    /// Scales the pathfinder's position quality hint
    pub position_quality_factor: f32,
    /// Move-only is a last resort; starts below zero
    pub move_only_base: f32,
    /// Value per tile of distance closed when nothing is hittable
    pub closing_distance_bonus: f32,
    /// Flat value of having a movement-recovery follow-up available
    pub mp_recovery_bonus: f32,
    /// Cap for the kill-progress bonus in sequence scoring
    pub max_kill_bonus: f32,
    /// Extra for templates sourced from the confirmed-kill solver
    pub confirmed_kill_bonus: f32,
    /// Flat value of landing a debuff this turn
    pub debuff_utility: f32,
    /// HP ratio below which the emergency heal short-circuits
    pub critical_hp_threshold: f32,
    /// Turns during which a reused buff is deprioritized
    pub recent_use_window: u32,
    pub max_attacks_per_turn: u32,
    pub max_positional_buffs: u32,
    pub max_ally_buffs: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            w_hittable: 25.0,
            w_safety: 0.5,
            w_improvement: 15.0,
            attack_base: 10.0,
            ranged_retreat_penalty: 20.0,
            position_quality_factor: 0.8,
            move_only_base: -5.0,
            closing_distance_bonus: 2.0,
            mp_recovery_bonus: 8.0,
            max_kill_bonus: 50.0,
            confirmed_kill_bonus: 100.0,
            debuff_utility: 15.0,
            critical_hp_threshold: 0.3,
            recent_use_window: 2,
            max_attacks_per_turn: 3,
            max_positional_buffs: 3,
            max_ally_buffs: 3,
        }
    }
}

/// Concave-then-convex attenuation of attack value by hit quality.
///
/// `x * sqrt(x)` strongly punishes low-accuracy positions so that
/// repositioning beats spraying at bad odds.
pub fn hit_quality_attenuation(avg_hit_chance: f32) -> f32 {
    let x = avg_hit_chance.clamp(0.0, 1.0);
    x * x.sqrt()
}
