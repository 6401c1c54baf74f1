//! AP/MP bookkeeping for a single planning pass

/// MP costs at or above this sentinel mean "clears all remaining movement".
/// The ledger floors at zero instead of going negative.
pub const MP_COST_ALL_REMAINING: f32 = 9000.0;

/// Tracks remaining action and movement points through one planning pass.
///
/// Scoped to a single call; never shared across threads or turns. All
/// mutations clamp to zero so neither pool is ever observed negative.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceLedger {
    ap: f32,
    mp: f32,
    reserved_ap: f32,
}

impl ResourceLedger {
    pub fn new(ap: f32, mp: f32) -> Self {
        Self {
            ap: ap.max(0.0),
            mp: mp.max(0.0),
            reserved_ap: 0.0,
        }
    }

    pub fn ap(&self) -> f32 {
        self.ap
    }

    pub fn mp(&self) -> f32 {
        self.mp
    }

    pub fn reserved_ap(&self) -> f32 {
        self.reserved_ap
    }

    /// AP still spendable by the current phase, honoring reservations.
    pub fn available_ap(&self) -> f32 {
        (self.ap - self.reserved_ap).max(0.0)
    }

    /// Spend AP if the unreserved remainder covers it.
    pub fn try_spend_ap(&mut self, cost: f32) -> bool {
        if cost < 0.0 || cost > self.available_ap() {
            return false;
        }
        self.ap = (self.ap - cost).max(0.0);
        true
    }

    /// Spend MP if the remainder covers it.
    pub fn try_spend_mp(&mut self, cost: f32) -> bool {
        if cost < 0.0 || cost > self.mp {
            return false;
        }
        self.mp = (self.mp - cost).max(0.0);
        true
    }

    /// Spend MP, flooring at zero. Sentinel costs clear the whole pool.
    pub fn spend_mp_clamped(&mut self, cost: f32) {
        if cost >= MP_COST_ALL_REMAINING {
            self.mp = 0.0;
            return;
        }
        self.mp = (self.mp - cost.max(0.0)).max(0.0);
    }

    /// Earmark AP for a later phase. Advisory: a later phase may or may
    /// not honor it, but it never pushes the pool negative.
    pub fn reserve_ap(&mut self, amount: f32) {
        self.reserved_ap = (self.reserved_ap + amount.max(0.0)).min(self.ap);
    }

    pub fn release_ap(&mut self, amount: f32) {
        self.reserved_ap = (self.reserved_ap - amount.max(0.0)).max(0.0);
    }

    /// Defensive floor after any externally reported cost subtraction.
    pub fn clamp_to_zero(&mut self) {
        self.ap = self.ap.max(0.0);
        self.mp = self.mp.max(0.0);
        self.reserved_ap = self.reserved_ap.clamp(0.0, self.ap);
    }

    pub fn can_afford_ap(&self, cost: f32) -> bool {
        cost >= 0.0 && cost <= self.available_ap()
    }

    pub fn can_move(&self) -> bool {
        self.mp > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spend_rejects_overdraft() {
        let mut ledger = ResourceLedger::new(4.0, 3.0);
        assert!(ledger.try_spend_ap(3.0));
        assert!(!ledger.try_spend_ap(2.0));
        assert_eq!(ledger.ap(), 1.0);
        assert!(!ledger.try_spend_mp(3.5));
        assert!(ledger.try_spend_mp(3.0));
        assert_eq!(ledger.mp(), 0.0);
    }

    #[test]
    fn test_reservation_limits_available() {
        let mut ledger = ResourceLedger::new(6.0, 0.0);
        ledger.reserve_ap(2.0);
        assert_eq!(ledger.available_ap(), 4.0);
        assert!(!ledger.try_spend_ap(5.0));
        assert!(ledger.try_spend_ap(4.0));
        ledger.release_ap(2.0);
        assert_eq!(ledger.available_ap(), 2.0);
    }

    #[test]
    fn test_reservation_never_exceeds_pool() {
        let mut ledger = ResourceLedger::new(3.0, 0.0);
        ledger.reserve_ap(10.0);
        assert_eq!(ledger.reserved_ap(), 3.0);
        assert_eq!(ledger.available_ap(), 0.0);
    }

    #[test]
    fn test_sentinel_clears_movement() {
        let mut ledger = ResourceLedger::new(2.0, 5.0);
        ledger.spend_mp_clamped(MP_COST_ALL_REMAINING);
        assert_eq!(ledger.mp(), 0.0);
        ledger.spend_mp_clamped(1.0);
        assert_eq!(ledger.mp(), 0.0);
    }

    #[test]
    fn test_never_negative() {
        let mut ledger = ResourceLedger::new(-2.0, -1.0);
        assert_eq!(ledger.ap(), 0.0);
        assert_eq!(ledger.mp(), 0.0);
        ledger.spend_mp_clamped(100.0);
        ledger.clamp_to_zero();
        assert!(ledger.ap() >= 0.0 && ledger.mp() >= 0.0);
    }
}
