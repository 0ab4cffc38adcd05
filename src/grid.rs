use crate::error::Error;
use crate::index_space::{range3d, Axis, Index, IndexSpace};
use serde::{Deserialize, Serialize};




/// Number of active spatial axes in a run. Two-dimensional runs use the I
/// and J axes and keep a single, ghost-free layer on the K axis.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Two,
    Three,
}

impl Dimension {
    pub fn rank(self) -> usize {
        match self {
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }

    /// The axes along which fluxes are computed.
    ///
    pub fn axes(self) -> &'static [Axis] {
        match self {
            Dimension::Two => &[Axis::I, Axis::J],
            Dimension::Three => &[Axis::I, Axis::J, Axis::K],
        }
    }

    pub fn is_active(self, axis: Axis) -> bool {
        axis.index() < self.rank()
    }
}




/// One of the six faces of the computational domain.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Face {
    IMin,
    IMax,
    JMin,
    JMax,
    KMin,
    KMax,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::IMin,
        Face::IMax,
        Face::JMin,
        Face::JMax,
        Face::KMin,
        Face::KMax,
    ];

    /// The lower and upper faces normal to the given axis.
    ///
    pub fn on_axis(axis: Axis) -> (Face, Face) {
        match axis {
            Axis::I => (Face::IMin, Face::IMax),
            Axis::J => (Face::JMin, Face::JMax),
            Axis::K => (Face::KMin, Face::KMax),
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Face::IMin | Face::IMax => Axis::I,
            Face::JMin | Face::JMax => Axis::J,
            Face::KMin | Face::KMax => Axis::K,
        }
    }

    pub fn is_lower(self) -> bool {
        matches!(self, Face::IMin | Face::JMin | Face::KMin)
    }
}




/// A uniform rectilinear mesh, padded with guard zones on every active axis.
/// Interior cells start at `ghost_width` on each active axis.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub dimension: Dimension,
    pub size: (i64, i64, i64),
    pub ghost_width: i64,
    pub lower: (f64, f64, f64),
    pub upper: (f64, f64, f64),
}

impl Grid {
    /// A unit square with `n x n` interior zones.
    ///
    pub fn unit_square(n: i64) -> Self {
        Self {
            dimension: Dimension::Two,
            size: (n, n, 1),
            ghost_width: 2,
            lower: (0.0, 0.0, 0.0),
            upper: (1.0, 1.0, 1.0),
        }
    }

    /// A unit cube with `n x n x n` interior zones.
    ///
    pub fn unit_cube(n: i64) -> Self {
        Self {
            dimension: Dimension::Three,
            size: (n, n, n),
            ghost_width: 2,
            lower: (0.0, 0.0, 0.0),
            upper: (1.0, 1.0, 1.0),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.ghost_width < 2 {
            return Err(Error::InvalidConfig(format!(
                "ghost width must be at least 2 for a second-order stencil, got {}",
                self.ghost_width
            )));
        }
        if self.dimension == Dimension::Two && self.size.2 != 1 {
            return Err(Error::InvalidConfig(format!(
                "a two-dimensional grid needs exactly one zone on the K axis, got {}",
                self.size.2
            )));
        }
        for &axis in self.dimension.axes() {
            let n = self.interior_count(axis);
            if n < self.ghost_width {
                return Err(Error::InvalidConfig(format!(
                    "axis {:?} has {} zones, fewer than the ghost width {}",
                    axis, n, self.ghost_width
                )));
            }
            let (a, b) = (component(self.lower, axis), component(self.upper, axis));
            if !(b > a) {
                return Err(Error::InvalidConfig(format!(
                    "axis {:?} has an empty extent {}..{}",
                    axis, a, b
                )));
            }
        }
        Ok(())
    }

    /// Number of interior zones on the given axis.
    ///
    pub fn interior_count(&self, axis: Axis) -> i64 {
        match axis {
            Axis::I => self.size.0,
            Axis::J => self.size.1,
            Axis::K => self.size.2,
        }
    }

    /// Number of guard zones on each side of the given axis.
    ///
    pub fn ghosts(&self, axis: Axis) -> i64 {
        if self.dimension.is_active(axis) {
            self.ghost_width
        } else {
            0
        }
    }

    pub fn cell_spacing(&self) -> (f64, f64, f64) {
        (
            self.spacing(Axis::I),
            self.spacing(Axis::J),
            self.spacing(Axis::K),
        )
    }

    pub fn spacing(&self, axis: Axis) -> f64 {
        let extent = component(self.upper, axis) - component(self.lower, axis);
        extent / self.interior_count(axis) as f64
    }

    /// The index space covering interior and guard zones, the allocation
    /// extent of every per-cell array.
    ///
    pub fn extended_space(&self) -> IndexSpace {
        let r = |axis| 0..self.interior_count(axis) + 2 * self.ghosts(axis);
        range3d(r(Axis::I), r(Axis::J), r(Axis::K))
    }

    pub fn interior_space(&self) -> IndexSpace {
        let r = |axis| {
            let g = self.ghosts(axis);
            g..g + self.interior_count(axis)
        };
        range3d(r(Axis::I), r(Axis::J), r(Axis::K))
    }

    /// Cells whose low face along `axis` carries a flux used by the interior
    /// update.
    ///
    pub fn face_space(&self, axis: Axis) -> IndexSpace {
        self.interior_space().extend_upper(1, axis)
    }

    /// Whether the grid has edges directed along `axis` that carry an EMF,
    /// which requires both transverse axes to be active.
    ///
    pub fn has_edge(&self, axis: Axis) -> bool {
        let (a, b) = axis.transverse();
        self.dimension.is_active(a) && self.dimension.is_active(b)
    }

    /// Cells whose low edge along `axis` carries an EMF used by the interior
    /// update.
    ///
    pub fn edge_space(&self, axis: Axis) -> IndexSpace {
        let (a, b) = axis.transverse();
        self.interior_space().extend_upper(1, a).extend_upper(1, b)
    }

    /// Cells for which reconstructed interface states are needed: the
    /// interior plus one layer on each side of every active axis.
    ///
    pub fn trace_space(&self) -> IndexSpace {
        self.dimension
            .axes()
            .iter()
            .fold(self.interior_space(), |space, &axis| space.extend(1, axis))
    }

    pub fn cell_center(&self, index: Index) -> (f64, f64, f64) {
        let x = |axis: Axis| {
            let i = axis.component(index) - self.ghosts(axis);
            component(self.lower, axis) + self.spacing(axis) * (i as f64 + 0.5)
        };
        (x(Axis::I), x(Axis::J), x(Axis::K))
    }

    pub fn total_zones(&self) -> i64 {
        self.size.0 * self.size.1 * self.size.2
    }
}

fn component(x: (f64, f64, f64), axis: Axis) -> f64 {
    match axis {
        Axis::I => x.0,
        Axis::J => x.1,
        Axis::K => x.2,
    }
}
