use core::ops::Range;
use serde::{Deserialize, Serialize};




/**
 * A cell index in a three-dimensional index space. Two-dimensional grids use
 * a single layer on the third axis.
 */
pub type Index = (i64, i64, i64);




/**
 * Identifier for a Cartesian axis
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    I,
    J,
    K,
}




// ============================================================================
impl Axis {

    pub const ALL: [Axis; 3] = [Axis::I, Axis::J, Axis::K];

    /**
     * Return the position of this axis in an index tuple.
     */
    pub fn index(self) -> usize {
        match self {
            Axis::I => 0,
            Axis::J => 1,
            Axis::K => 2,
        }
    }

    /**
     * Return the two axes which, together with this one, form a right-handed
     * cyclic triple: I -> (J, K), J -> (K, I), K -> (I, J).
     */
    pub fn transverse(self) -> (Axis, Axis) {
        match self {
            Axis::I => (Axis::J, Axis::K),
            Axis::J => (Axis::K, Axis::I),
            Axis::K => (Axis::I, Axis::J),
        }
    }

    /**
     * Return the given index, moved by `delta` along this axis.
     */
    pub fn shift(self, index: Index, delta: i64) -> Index {
        match self {
            Axis::I => (index.0 + delta, index.1, index.2),
            Axis::J => (index.0, index.1 + delta, index.2),
            Axis::K => (index.0, index.1, index.2 + delta),
        }
    }

    /**
     * Return the component of an index along this axis.
     */
    pub fn component(self, index: Index) -> i64 {
        match self {
            Axis::I => index.0,
            Axis::J => index.1,
            Axis::K => index.2,
        }
    }
}




/**
 * Represents a rectangular region in a discrete index space
 */
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpace {
    di: Range<i64>,
    dj: Range<i64>,
    dk: Range<i64>,
}




/**
 * Describes a rectangular index space. The index type is signed 64-bit integer.
 */
impl IndexSpace {


    pub fn new(di: Range<i64>, dj: Range<i64>, dk: Range<i64>) -> Self {

        assert!(
            di.start <= di.end && dj.start <= dj.end && dk.start <= dk.end,
            "index space has negative volume");

        Self { di, dj, dk }
    }


    /**
     * Return the number of indexes on each axis.
     */
    pub fn dim(&self) -> (usize, usize, usize) {
        ((self.di.end - self.di.start) as usize,
         (self.dj.end - self.dj.start) as usize,
         (self.dk.end - self.dk.start) as usize)
    }


    /**
     * Return the number of elements in this index space.
     */
    pub fn len(&self) -> usize {
        let (l, m, n) = self.dim();
        l * m * n
    }


    /**
     * Return the minimum index (inclusive).
     */
    pub fn start(&self) -> Index {
        (self.di.start, self.dj.start, self.dk.start)
    }


    /**
     * Return the maximum index (exclusive).
     */
    pub fn end(&self) -> Index {
        (self.di.end, self.dj.end, self.dk.end)
    }


    /**
     * Return the range of indexes covered on the given axis.
     */
    pub fn range(&self, axis: Axis) -> &Range<i64> {
        match axis {
            Axis::I => &self.di,
            Axis::J => &self.dj,
            Axis::K => &self.dk,
        }
    }


    /**
     * Return a copy of this index space with the range on one axis replaced.
     */
    pub fn with_range(&self, axis: Axis, range: Range<i64>) -> Self {
        match axis {
            Axis::I => Self::new(range, self.dj.clone(), self.dk.clone()),
            Axis::J => Self::new(self.di.clone(), range, self.dk.clone()),
            Axis::K => Self::new(self.di.clone(), self.dj.clone(), range),
        }
    }


    /**
     * Determine whether this index space contains the given index.
     */
    pub fn contains(&self, index: Index) -> bool {
        self.di.contains(&index.0) && self.dj.contains(&index.1) && self.dk.contains(&index.2)
    }


    /**
     * Determine whether another index space is a subset of this one.
     */
    pub fn contains_space(&self, other: &Self) -> bool {
        Axis::ALL.iter().all(|&axis| {
            let (a, b) = (self.range(axis), other.range(axis));
            b.start >= a.start && b.end <= a.end
        })
    }


    /**
     * Expand this index space by the given number of elements on both sides
     * of the given axis.
     */
    pub fn extend(&self, delta: i64, axis: Axis) -> Self {
        let r = self.range(axis);
        self.with_range(axis, r.start - delta..r.end + delta)
    }


    /**
     * Expand just the upper end of this index space on the given axis.
     */
    pub fn extend_upper(&self, delta: i64, axis: Axis) -> Self {
        let r = self.range(axis);
        self.with_range(axis, r.start..r.end + delta)
    }


    /**
     * Trim just the lower elements of this index space by a certain amount on
     * the given axis.
     */
    pub fn trim_lower(&self, delta: i64, axis: Axis) -> Self {
        let r = self.range(axis);
        self.with_range(axis, r.start + delta..r.end)
    }


    /**
     * Shift this index space by the given amount along one axis.
     */
    pub fn translate(&self, delta: i64, axis: Axis) -> Self {
        let r = self.range(axis);
        self.with_range(axis, r.start + delta..r.end + delta)
    }


    /**
     * Return the linear offset for the given index, in a row-major memory
     * buffer aligned with the start of this index space.
     */
    pub fn row_major_offset(&self, index: Index) -> usize {
        let i = (index.0 - self.di.start) as usize;
        let j = (index.1 - self.dj.start) as usize;
        let k = (index.2 - self.dk.start) as usize;
        let (_, m, n) = self.dim();
        (i * m + j) * n + k
    }


    /**
     * Return the index at the given row-major offset. This is the inverse of
     * `row_major_offset`.
     */
    pub fn coordinate(&self, offset: usize) -> Index {
        let (_, m, n) = self.dim();
        let k = offset % n;
        let j = (offset / n) % m;
        let i = offset / (n * m);
        (self.di.start + i as i64,
         self.dj.start + j as i64,
         self.dk.start + k as i64)
    }


    /**
     * Return an iterator which traverses the index space in row-major order
     * (C-like; the final index increases fastest).
     */
    pub fn iter(&self) -> impl Iterator<Item = Index> + '_ {
        self.di.clone().flat_map(move |i| {
            self.dj.clone().flat_map(move |j| self.dk.clone().map(move |k| (i, j, k)))
        })
    }
}




/**
 * Construct an index space from three ranges.
 */
pub fn range3d(di: Range<i64>, dj: Range<i64>, dk: Range<i64>) -> IndexSpace {
    IndexSpace::new(di, dj, dk)
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{range3d, Axis};

    #[test]
    fn row_major_offset_is_inverted_by_coordinate() {
        let space = range3d(-2..5, 3..7, 0..3);
        for (n, index) in space.iter().enumerate() {
            assert_eq!(space.row_major_offset(index), n);
            assert_eq!(space.coordinate(n), index);
        }
        assert_eq!(space.len(), 7 * 4 * 3);
    }

    #[test]
    fn final_index_increases_fastest() {
        let space = range3d(0..2, 0..2, 0..2);
        let indexes: Vec<_> = space.iter().take(3).collect();
        assert_eq!(indexes, vec![(0, 0, 0), (0, 0, 1), (0, 1, 0)]);
    }

    #[test]
    fn extend_and_trim_work_per_axis() {
        let space = range3d(2..10, 2..10, 0..1);
        assert_eq!(space.extend(2, Axis::I), range3d(0..12, 2..10, 0..1));
        assert_eq!(space.extend_upper(1, Axis::J), range3d(2..10, 2..11, 0..1));
        assert_eq!(space.trim_lower(1, Axis::I), range3d(3..10, 2..10, 0..1));
        assert_eq!(space.translate(-1, Axis::J), range3d(2..10, 1..9, 0..1));
        assert!(space.extend(1, Axis::I).contains_space(&space));
        assert!(!space.contains_space(&space.extend(1, Axis::K)));
    }

    #[test]
    fn transverse_axes_are_cyclic() {
        assert_eq!(Axis::I.transverse(), (Axis::J, Axis::K));
        assert_eq!(Axis::J.transverse(), (Axis::K, Axis::I));
        assert_eq!(Axis::K.transverse(), (Axis::I, Axis::J));
        assert_eq!(Axis::J.shift((1, 1, 1), -1), (1, 0, 1));
    }
}
