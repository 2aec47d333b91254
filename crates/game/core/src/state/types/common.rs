use std::fmt;

/// Unique identifier for any unit tracked in the battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by the given delta.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// |Δx| + |Δy|, used for every range check in combat and AI.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// True when `other` shares an edge with this position.
    pub fn is_orthogonally_adjacent(self, other: Position) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// True when `other` is one of the eight surrounding cells.
    pub fn is_adjacent(self, other: Position) -> bool {
        self != other && self.x.abs_diff(other.x) <= 1 && self.y.abs_diff(other.y) <= 1
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Integer resource meter (e.g. hit points) tracked per unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self { current, maximum }
    }

    /// A meter filled to its maximum.
    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Removes up to `amount`, returning how much was actually removed.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.current);
        self.current -= removed;
        removed
    }

    /// Adds up to `amount` without exceeding the maximum, returning the amount restored.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.maximum.saturating_sub(self.current));
        self.current += restored;
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_is_symmetric() {
        let a = Position::new(0, 0);
        let b = Position::new(-2, 3);
        assert_eq!(a.manhattan_distance(b), 5);
        assert_eq!(b.manhattan_distance(a), 5);
    }

    #[test]
    fn adjacency_checks() {
        let origin = Position::new(2, 2);
        assert!(origin.is_orthogonally_adjacent(Position::new(2, 3)));
        assert!(!origin.is_orthogonally_adjacent(Position::new(3, 3)));
        assert!(origin.is_adjacent(Position::new(3, 3)));
        assert!(!origin.is_adjacent(origin));
    }

    #[test]
    fn meter_drain_and_restore_clamp() {
        let mut hp = ResourceMeter::full(10);
        assert_eq!(hp.drain(14), 10);
        assert!(hp.is_depleted());
        assert_eq!(hp.restore(25), 10);
        assert_eq!(hp.current, 10);
    }
}
