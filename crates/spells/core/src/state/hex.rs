//! Battlefield hex coordinates.
//!
//! The battlefield is a 17×11 grid of hexes stored row-major. Odd rows are shifted
//! half a hex to the right ("odd-r" offset layout).

use crate::config::SpellConfig;

const WIDTH: i16 = SpellConfig::BATTLEFIELD_WIDTH;
const HEIGHT: i16 = SpellConfig::BATTLEFIELD_HEIGHT;

/// A single hex on the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleHex(pub i16);

impl BattleHex {
    /// Sentinel for "no hex".
    pub const INVALID: Self = Self(-1);

    /// Total number of hexes on the battlefield.
    pub const COUNT: i16 = WIDTH * HEIGHT;

    /// Creates a hex from column/row coordinates, or [`BattleHex::INVALID`] when out of bounds.
    pub fn from_xy(x: i16, y: i16) -> Self {
        if (0..WIDTH).contains(&x) && (0..HEIGHT).contains(&y) {
            Self(y * WIDTH + x)
        } else {
            Self::INVALID
        }
    }

    pub fn is_valid(self) -> bool {
        (0..Self::COUNT).contains(&self.0)
    }

    pub fn x(self) -> i16 {
        self.0 % WIDTH
    }

    pub fn y(self) -> i16 {
        self.0 / WIDTH
    }

    /// Hex directly to the right, or [`BattleHex::INVALID`] at the edge.
    pub fn right(self) -> Self {
        if !self.is_valid() {
            return Self::INVALID;
        }
        Self::from_xy(self.x() + 1, self.y())
    }

    /// The (up to six) valid hexes adjacent to this one.
    pub fn neighbours(self) -> Vec<BattleHex> {
        if !self.is_valid() {
            return Vec::new();
        }
        let (x, y) = (self.x(), self.y());
        let shift = y & 1;
        [
            (x - 1 + shift, y - 1),
            (x + shift, y - 1),
            (x + 1, y),
            (x + shift, y + 1),
            (x - 1 + shift, y + 1),
            (x - 1, y),
        ]
        .into_iter()
        .map(|(x, y)| Self::from_xy(x, y))
        .filter(|hex| hex.is_valid())
        .collect()
    }

    /// Hex-grid distance between two valid hexes.
    pub fn distance(self, other: BattleHex) -> u32 {
        let (q1, r1) = self.axial();
        let (q2, r2) = other.axial();
        let dq = q1 - q2;
        let dr = r1 - r2;
        ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
    }

    /// Iterates over every valid hex in row-major order.
    pub fn all() -> impl Iterator<Item = BattleHex> {
        (0..Self::COUNT).map(BattleHex)
    }

    fn axial(self) -> (i32, i32) {
        let (x, y) = (i32::from(self.x()), i32::from(self.y()));
        (x - (y - (y & 1)) / 2, y)
    }
}

impl core::fmt::Display for BattleHex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_valid() {
            write!(f, "{}({},{})", self.0, self.x(), self.y())
        } else {
            f.write_str("invalid")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbours_are_at_distance_one() {
        for hex in [BattleHex::from_xy(5, 4), BattleHex::from_xy(5, 5)] {
            let neighbours = hex.neighbours();
            assert_eq!(neighbours.len(), 6);
            for n in neighbours {
                assert_eq!(hex.distance(n), 1, "{hex} -> {n}");
            }
        }
    }

    #[test]
    fn corner_has_fewer_neighbours() {
        assert_eq!(BattleHex::from_xy(0, 0).neighbours().len(), 2);
    }

    #[test]
    fn out_of_bounds_is_invalid() {
        assert_eq!(BattleHex::from_xy(17, 0), BattleHex::INVALID);
        assert!(!BattleHex::INVALID.is_valid());
        assert_eq!(BattleHex::from_xy(16, 3).right(), BattleHex::INVALID);
    }

    #[test]
    fn distance_along_row() {
        assert_eq!(BattleHex::from_xy(2, 3).distance(BattleHex::from_xy(7, 3)), 5);
    }
}
