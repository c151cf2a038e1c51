use std::f32::consts::FRAC_1_SQRT_2;

use glam::Vec2;

/// One of the eight compass directions the pet can walk and face.
///
/// Numbered clockwise starting south-west, screen space (y grows down).
/// Even values are cardinal, odd values diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    SouthWest = 1,
    West = 2,
    NorthWest = 3,
    North = 4,
    NorthEast = 5,
    East = 6,
    SouthEast = 7,
    South = 8,
}

/// Unit vectors indexed by `Direction as usize - 1`.
const VECTORS: [Vec2; 8] = [
    Vec2::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    Vec2::new(-1.0, 0.0),
    Vec2::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    Vec2::new(0.0, -1.0),
    Vec2::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
    Vec2::new(1.0, 0.0),
    Vec2::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2),
    Vec2::new(0.0, 1.0),
];

impl Direction {
    pub const ALL: [Direction; 8] = [
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
    ];

    /// Direction for an index in 1..=8. Out-of-range indices wrap.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index.wrapping_sub(1) % 8) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Unit movement vector for this direction.
    pub fn vector(self) -> Vec2 {
        VECTORS[self as usize - 1]
    }

    /// Uniformly random direction.
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::from_index(rng.u8(1..=8))
    }

    /// Whether the sprite should be mirrored (facing left).
    pub fn faces_left(self) -> bool {
        self.vector().x < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_direction_is_unit_length() {
        for dir in Direction::ALL {
            let len = dir.vector().length();
            assert!((len - 1.0).abs() < 1e-6, "{dir:?} has length {len}");
        }
    }

    #[test]
    fn index_round_trips() {
        for i in 1..=8u8 {
            assert_eq!(Direction::from_index(i).index(), i);
        }
    }

    #[test]
    fn six_is_east() {
        assert_eq!(Direction::from_index(6), Direction::East);
        assert_eq!(Direction::East.vector(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn diagonals_use_exact_components() {
        let v = Direction::NorthEast.vector();
        assert_eq!(v.x, FRAC_1_SQRT_2);
        assert_eq!(v.y, -FRAC_1_SQRT_2);
    }

    #[test]
    fn random_stays_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let d = Direction::random(&mut rng);
            assert!((1..=8).contains(&d.index()));
        }
    }
}
