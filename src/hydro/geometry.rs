use crate::index_space::Axis;

/**
 * A 3D vector
 */
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3d(pub f64, pub f64, pub f64);

// ============================================================================
impl Vector3d {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3d(x, y, z)
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.0 * other.0 + self.1 * other.1 + self.2 * other.2
    }

    pub fn cross(&self, other: &Self) -> Self {
        Vector3d(
            self.1 * other.2 - self.2 * other.1,
            self.2 * other.0 - self.0 * other.2,
            self.0 * other.1 - self.1 * other.0,
        )
    }

    pub fn component(&self, direction: Direction) -> f64 {
        match direction {
            Direction::I => self.0,
            Direction::J => self.1,
            Direction::K => self.2,
        }
    }
}

/**
 * Enum to hold a unit vector in 3D space
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    I,
    J,
    K,
}

// ============================================================================
impl Direction {
    pub fn along(&self, other: Direction) -> f64 {
        if *self == other {
            1.0
        } else {
            0.0
        }
    }

    /**
     * Offset of this direction within a vector triple.
     */
    pub fn index(&self) -> usize {
        match self {
            Direction::I => 0,
            Direction::J => 1,
            Direction::K => 2,
        }
    }

    /**
     * The components of a vector, ordered (normal, first transverse, second
     * transverse) for a face normal to this direction. The ordering is a
     * cyclic permutation, so the rotated frame stays right-handed.
     */
    pub fn normal_frame(&self) -> [usize; 3] {
        match self {
            Direction::I => [0, 1, 2],
            Direction::J => [1, 2, 0],
            Direction::K => [2, 0, 1],
        }
    }
}

impl From<Axis> for Direction {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::I => Direction::I,
            Axis::J => Direction::J,
            Axis::K => Direction::K,
        }
    }
}
