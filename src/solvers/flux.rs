use crate::field::Field;
use crate::grid::Grid;
use crate::hydro::emf::{emf_hll, EdgeStates};
use crate::hydro::riemann::RiemannSolver;
use crate::index_space::{Axis, Index};
use super::trace::{Corner, Reconstruction, Side};




/**
 * Godunov fluxes through the low face of each cell, along every active axis.
 * The flux at the face between cells `i - 1` and `i` is solved from the
 * high-side state of the left cell and the low-side state of the right one.
 * Only faces for which `select(index, axis)` holds are written.
 */
pub fn compute_fluxes<R, P>(
    rec: &R,
    fluxes: &mut [Field],
    grid: &Grid,
    solver: &dyn RiemannSolver,
    gamma_law_index: f64,
    select: P)
where
    R: Reconstruction + ?Sized,
    P: Fn(Index, Axis) -> bool + Sync + Send,
{
    for &axis in grid.dimension.axes() {
        let region = grid.face_space(axis);

        fluxes[axis.index()].par_for_each_in(&region, |index, f| {
            if select(index, axis) {
                let pl = rec.face_state(axis.shift(index, -1), axis, Side::High);
                let pr = rec.face_state(index, axis, Side::Low);
                solver.flux(&pl, &pr, axis.into(), gamma_law_index).write_to_slice(f);
            }
        });
    }
}




/**
 * Electric field at the low edges of each cell, along every direction which
 * has edges, from the four corner states meeting at the edge. Only edges for
 * which `select(index, edge)` holds are written.
 */
pub fn compute_emf<R, P>(rec: &R, emf: &mut Field, grid: &Grid, gamma_law_index: f64, select: P)
where
    R: Reconstruction + ?Sized,
    P: Fn(Index, Axis) -> bool + Sync + Send,
{
    for &edge in Axis::ALL.iter().filter(|&&e| grid.has_edge(e)) {
        let (a, b) = edge.transverse();
        let region = grid.edge_space(edge);

        emf.par_for_each_in(&region, |index, e| {
            if select(index, edge) {
                let ia = a.shift(index, -1);
                let ib = b.shift(index, -1);
                let states = EdgeStates {
                    lb: rec.corner_state(a.shift(ib, -1), edge, Corner::RT),
                    lt: rec.corner_state(ia, edge, Corner::RB),
                    rb: rec.corner_state(ib, edge, Corner::LT),
                    rt: rec.corner_state(index, edge, Corner::LB),
                };
                e[edge.index()] = emf_hll(&states, edge, gamma_law_index);
            }
        });
    }
}

/// The four cells sharing the low edge of a cell along `edge`.
///
pub fn edge_cells(index: Index, edge: Axis) -> [Index; 4] {
    let (a, b) = edge.transverse();
    let ib = b.shift(index, -1);
    [index, a.shift(index, -1), ib, a.shift(ib, -1)]
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::hydro::geometry::Vector3d;
    use crate::hydro::riemann::RiemannSolverKind;
    use crate::hydro::state::{Primitive, ID, IU};
    use crate::solvers::trace::FirstOrder;

    #[test]
    fn uniform_state_gives_the_physical_flux_everywhere() {
        let grid = Grid::unit_square(4);
        let p = Primitive::new(1.0, 1.0, Vector3d::new(0.5, 0.0, 0.0), Vector3d::default());
        let q = Field::from_function(grid.extended_space(), 4, |_, prim| p.write_to_slice(prim));
        let rec = FirstOrder::new(&q, None);
        let mut fluxes = vec![Field::zeros(grid.extended_space(), 4), Field::zeros(grid.extended_space(), 4)];
        compute_fluxes(&rec, &mut fluxes, &grid, RiemannSolverKind::Hll.solver(), 1.4, |_, _| true);

        let f = p.flux_vector(Axis::I.into(), 1.4);
        approx::assert_relative_eq!(fluxes[0].get((6, 3, 0), ID), f.0[ID], epsilon = 1e-12);
        approx::assert_relative_eq!(fluxes[0].get((2, 5, 0), IU), f.0[IU], epsilon = 1e-12);
        assert_eq!(fluxes[0].get((0, 0, 0), ID), 0.0);
    }

    #[test]
    fn unselected_faces_are_not_written() {
        let grid = Grid::unit_square(4);
        let p = Primitive::new(1.0, 1.0, Vector3d::new(0.5, 0.5, 0.0), Vector3d::default());
        let q = Field::from_function(grid.extended_space(), 4, |_, prim| p.write_to_slice(prim));
        let rec = FirstOrder::new(&q, None);
        let mut fluxes = vec![Field::zeros(grid.extended_space(), 4), Field::zeros(grid.extended_space(), 4)];
        compute_fluxes(&rec, &mut fluxes, &grid, RiemannSolverKind::Rusanov.solver(), 1.4, |index, axis| {
            index == (3, 3, 0) && axis == Axis::J
        });
        assert_eq!(fluxes[0].iter_data().filter(|f| f[ID] != 0.0).count(), 0);
        assert_eq!(fluxes[1].iter_data().filter(|f| f[ID] != 0.0).count(), 1);
    }

    #[test]
    fn edge_cells_surround_the_edge() {
        assert_eq!(
            edge_cells((3, 3, 0), Axis::K),
            [(3, 3, 0), (2, 3, 0), (3, 2, 0), (2, 2, 0)]
        );
    }
}
