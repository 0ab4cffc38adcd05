use crate::config::Physics;
use crate::field::Field;
use crate::hydro::state::{Conserved, IA};
use crate::index_space::{Axis, Index};

/// The cell-centered conserved state of a cell. For MHD the stored magnetic
/// field lives on the low faces; its cell-centered value is the average of
/// the low and high faces, or the stored value when the high face is
/// outside the field.
///
pub fn cell_conserved(u: &Field, index: Index, physics: Physics) -> Conserved {
    let mut cons = Conserved::from_slice(u.get_slice(index));

    if physics == Physics::Mhd {
        for &axis in Axis::ALL.iter() {
            let q = IA + axis.index();
            if let Some(upper) = u.try_get_slice(axis.shift(index, 1)) {
                cons.0[q] = 0.5 * (cons.0[q] + upper[q]);
            }
        }
    }
    cons
}

/// Convert every cell of `u`, guard zones included, to primitive variables.
/// Non-physical states are converted without complaint; admissibility is
/// checked after the update.
///
pub fn convert_to_primitives(u: &Field, q: &mut Field, physics: Physics, gamma_law_index: f64) {
    q.par_for_each_mut(|index, prim| {
        cell_conserved(u, index, physics)
            .to_primitive(gamma_law_index)
            .write_to_slice(prim)
    })
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::grid::Grid;
    use crate::hydro::state::{IB, ID, IP};

    #[test]
    fn magnetic_field_is_averaged_to_cell_centers() {
        let grid = Grid::unit_square(4);
        let u = Field::from_function(grid.extended_space(), 8, |(i, j, _), cons| {
            cons[ID] = 1.0;
            cons[IA] = i as f64;
            cons[IB] = 2.0 * j as f64;
        });
        let c = cell_conserved(&u, (3, 3, 0), Physics::Mhd);
        assert_eq!(c.0[IA], 3.5);
        assert_eq!(c.0[IB], 7.0);

        let edge = cell_conserved(&u, (7, 3, 0), Physics::Mhd);
        assert_eq!(edge.0[IA], 7.0);

        let hydro = cell_conserved(&u, (3, 3, 0), Physics::Hydro);
        assert_eq!(hydro.0[IA], 3.0);
    }

    #[test]
    fn non_physical_states_pass_through() {
        let grid = Grid::unit_square(4);
        let u = Field::from_function(grid.extended_space(), 4, |_, cons| {
            cons[ID] = 1.0;
            cons[1] = -1.0;
        });
        let mut q = Field::zeros(grid.extended_space(), 4);
        convert_to_primitives(&u, &mut q, Physics::Hydro, 1.5);
        assert_eq!(q.get((0, 0, 0), IP), -0.5);
        assert_eq!(q.get((5, 5, 0), ID), 1.0);
    }
}
