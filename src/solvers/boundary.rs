use crate::config::{Boundaries, BoundaryCondition, Physics};
use crate::field::Field;
use crate::grid::{Face, Grid};
use crate::hydro::geometry::Direction;
use crate::hydro::state::{magnetic_component, momentum_component, IE};
use crate::index_space::Index;
use super::primitive::cell_conserved;

/// Fill the guard zones of one face of the domain. The guard slab spans the
/// full extent of the other two axes, so corner zones take the value written
/// by the last face filled. Interior zones, and guard zones of other faces,
/// are not touched.
///
/// The magnetic field normal to the face is stored on low faces, so it is
/// mirrored about face positions rather than cell centers. The wall face
/// itself belongs to the interior and keeps its value; on the upper side it
/// is the low face of the first guard zone. For non-periodic faces the guard
/// energy is then corrected so that each guard zone has the gas pressure of
/// the zone it was copied from.
///
/// Every source zone lies outside the slab being written, so filling is
/// idempotent.
///
pub fn fill_face(u: &mut Field, grid: &Grid, face: Face, condition: BoundaryCondition) {
    let axis = face.axis();

    if !grid.dimension.is_active(axis) {
        return;
    }

    let g = grid.ghosts(axis);
    let n = grid.interior_count(axis);
    let (start, end) = (g, g + n);
    let lower = face.is_lower();
    let slab_range = if lower { 0..start } else { end..end + g };
    let slab = grid.extended_space().with_range(axis, slab_range);

    let direction = Direction::from(axis);
    let nq = u.num_fields();
    let normal_momentum = momentum_component(direction);
    let normal_field = magnetic_component(direction);
    let staggered = normal_field < nq && condition != BoundaryCondition::Periodic;

    let cell_source = |x: i64| match (condition, lower) {
        (BoundaryCondition::Periodic, true) => x + n,
        (BoundaryCondition::Periodic, false) => x - n,
        (BoundaryCondition::Reflective, true) => 2 * start - 1 - x,
        (BoundaryCondition::Reflective, false) => 2 * end - 1 - x,
        (BoundaryCondition::Absorbing, true) => start,
        (BoundaryCondition::Absorbing, false) => end - 1,
    };
    let source_of = |index: Index| {
        let x = axis.component(index);
        axis.shift(index, cell_source(x) - x)
    };

    for index in slab.iter() {
        let face_value = if staggered {
            let x = axis.component(index);
            let (face, sign) = match (condition, lower) {
                (_, false) if x == end => (end, 1.0),
                (BoundaryCondition::Reflective, true) => (2 * start - x, -1.0),
                (BoundaryCondition::Reflective, false) => (2 * end - x, -1.0),
                (_, true) => (start, 1.0),
                (_, false) => (end, 1.0),
            };
            Some(sign * u.get(axis.shift(index, face - x), normal_field))
        } else {
            None
        };

        u.copy_cell(source_of(index), index);
        let cell = u.get_slice_mut(index);

        if condition == BoundaryCondition::Reflective && normal_momentum < nq {
            cell[normal_momentum] = -cell[normal_momentum];
        }
        if let Some(b) = face_value {
            cell[normal_field] = b;
        }
    }

    if staggered {
        for index in slab.iter() {
            let image = cell_conserved(u, source_of(index), Physics::Mhd).magnetic_energy_density();
            let guard = cell_conserved(u, index, Physics::Mhd).magnetic_energy_density();
            u.get_slice_mut(index)[IE] += guard - image;
        }
    }
}

/// Fill the guard zones of all faces: I faces first, then J, then K.
///
pub fn fill_boundaries(u: &mut Field, grid: &Grid, boundaries: &Boundaries) {
    for &face in Face::ALL.iter() {
        fill_face(u, grid, face, boundaries.get(face));
    }
}
