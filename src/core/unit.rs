use super::loc::Loc;

/// Stable identifier for a unit within one combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub u32);

/// Read-only view of a unit as seen in a snapshot
#[derive(Debug, Clone)]
pub struct UnitView {
    pub id: UnitId,
    pub name: String,
    pub loc: Loc,
    pub hp: f32,
    pub max_hp: f32,
}

impl UnitView {
    pub fn new(id: UnitId, name: impl Into<String>, loc: Loc, hp: f32, max_hp: f32) -> Self {
        Self {
            id,
            name: name.into(),
            loc,
            hp,
            max_hp,
        }
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }
}
