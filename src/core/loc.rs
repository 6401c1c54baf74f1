//! Grid locations and distances

/// A tile position on the battlefield grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Loc {
    pub x: i32,
    pub y: i32,
}

impl Loc {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: diagonals cost the same as straight steps
    pub fn dist(&self, other: &Loc) -> i32 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx.max(dy)
    }

    pub fn manhattan(&self, other: &Loc) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl std::fmt::Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dist() {
        let a = Loc::new(0, 0);
        let b = Loc::new(3, -2);
        assert_eq!(a.dist(&b), 3);
        assert_eq!(a.manhattan(&b), 5);
        assert_eq!(a.dist(&a), 0);
    }
}
