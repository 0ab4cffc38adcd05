//! Face-centered magnetic field support for constrained transport: the
//! edge-centered electric field of the cell-centered flow, transverse slopes
//! of the face field, and its half-step prediction.

use crate::field::Field;
use crate::grid::Grid;
use crate::hydro::limiter::SlopeLimiter;
use crate::hydro::state::{IA, IU};
use crate::index_space::{Axis, Index};




/// Number of components of the magnetic slope array: the slope of each of
/// the three face fields along each of the three axes.
pub const NUM_SLOPE_COMPONENTS: usize = 9;

pub fn slope_slot(component: Axis, along: Axis) -> usize {
    component.index() * 3 + along.index()
}




/**
 * The curl of an edge-centered field, normal to the low `c` face of a cell.
 * With `(a, b)` the axes transverse to `c`,
 *
 * ```text
 * (curl E)_c = d(E_b)/da - d(E_a)/db
 * ```
 *
 * where only derivatives along active axes contribute. Returns `None` when
 * an edge needed for the difference is outside the field.
 */
pub fn face_curl(edges: &Field, grid: &Grid, index: Index, c: Axis) -> Option<f64> {
    let (a, b) = c.transverse();
    let mut curl = 0.0;

    if grid.dimension.is_active(a) {
        let hi = edges.try_get_slice(a.shift(index, 1))?[b.index()];
        let lo = edges.get(index, b.index());
        curl += (hi - lo) / grid.spacing(a);
    }
    if grid.dimension.is_active(b) {
        let hi = edges.try_get_slice(b.shift(index, 1))?[a.index()];
        let lo = edges.get(index, a.index());
        curl -= (hi - lo) / grid.spacing(b);
    }
    Some(curl)
}




/**
 * Electric field `E = -v x B` at the low edges of each cell. The velocity is
 * averaged over the four cells sharing the edge, and each transverse field
 * component over the two faces touching it. Edges missing a neighbor, or
 * along a direction without edges, are set to zero.
 */
pub fn compute_electric_field(q: &Field, u: &Field, elec: &mut Field, grid: &Grid) {
    let space = u.index_space().clone();

    elec.par_for_each_mut(|index, e| {
        for &edge in Axis::ALL.iter() {
            let (a, b) = edge.transverse();
            let ia = a.shift(index, -1);
            let ib = b.shift(index, -1);
            let iab = a.shift(ib, -1);

            if !grid.has_edge(edge) || !space.contains(iab) {
                e[edge.index()] = 0.0;
                continue;
            }
            let average = |n: usize| 0.25 * (q.get(index, n) + q.get(ia, n) + q.get(ib, n) + q.get(iab, n));
            let va = average(IU + a.index());
            let vb = average(IU + b.index());
            let ba = 0.5 * (u.get(index, IA + a.index()) + u.get(ib, IA + a.index()));
            let bb = 0.5 * (u.get(index, IA + b.index()) + u.get(ia, IA + b.index()));
            e[edge.index()] = vb * ba - va * bb;
        }
    })
}




/**
 * Limited slopes of each face field along the two active axes transverse to
 * it. Slopes where a neighbor is missing are zero.
 */
pub fn compute_magnetic_slopes(u: &Field, slopes: &mut Field, grid: &Grid, limiter: SlopeLimiter) {
    let space = u.index_space().clone();

    slopes.par_for_each_mut(|index, s| {
        for x in s.iter_mut() {
            *x = 0.0;
        }
        for &c in grid.dimension.axes() {
            let (a, b) = c.transverse();
            let n = IA + c.index();

            for &t in [a, b].iter().filter(|&&t| grid.dimension.is_active(t)) {
                let (l, r) = (t.shift(index, -1), t.shift(index, 1));

                if space.contains(l) && space.contains(r) {
                    s[slope_slot(c, t)] = limiter.slope(u.get(l, n), u.get(index, n), u.get(r, n));
                }
            }
        }
    })
}




/**
 * Face field advanced by half a time step with the electric field of the
 * time-n flow: `b_c - (dt / 2) (curl E)_c`. Components on inactive axes, and
 * faces whose curl reaches outside the field, keep their time-n value.
 */
pub fn predict_face_field(u: &Field, elec: &Field, face_b: &mut Field, grid: &Grid, dt: f64) {
    face_b.par_for_each_mut(|index, bf| {
        for &c in Axis::ALL.iter() {
            let b0 = u.get(index, IA + c.index());

            bf[c.index()] = if grid.dimension.is_active(c) {
                b0 - 0.5 * dt * face_curl(elec, grid, index, c).unwrap_or(0.0)
            } else {
                b0
            };
        }
    })
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::hydro::state::{IB, ID, IV};

    #[test]
    fn uniform_flow_in_uniform_field_has_uniform_electric_field() {
        let grid = Grid::unit_square(4);
        let u = Field::from_function(grid.extended_space(), 8, |_, cons| {
            cons[ID] = 1.0;
            cons[IA] = 0.5;
            cons[IB] = 0.25;
        });
        let q = Field::from_function(grid.extended_space(), 8, |_, prim| {
            prim[ID] = 1.0;
            prim[IU] = 2.0;
            prim[IV] = 2.0;
            prim[IA] = 0.5;
            prim[IB] = 0.25;
        });
        let mut elec = Field::zeros(grid.extended_space(), 3);
        compute_electric_field(&q, &u, &mut elec, &grid);

        assert_eq!(elec.get((3, 3, 0), 2), 0.5);
        assert_eq!(elec.get((0, 3, 0), 2), 0.0);
        assert_eq!(elec.get((3, 3, 0), 0), 0.0);

        let mut face_b = Field::zeros(grid.extended_space(), 3);
        predict_face_field(&u, &elec, &mut face_b, &grid, 0.1);
        assert_eq!(face_b.get((4, 4, 0), 0), 0.5);
        assert_eq!(face_b.get((4, 4, 0), 1), 0.25);
    }

    #[test]
    fn curl_of_a_single_edge_is_divergence_free() {
        let grid = Grid::unit_square(6);
        let mut edges = Field::zeros(grid.extended_space(), 3);
        edges.get_slice_mut((5, 5, 0))[2] = 1.0;

        let curl = |index, c| face_curl(&edges, &grid, index, c).unwrap_or(0.0);

        for (i, j, k) in grid.interior_space().iter() {
            let div = (curl((i + 1, j, k), Axis::I) - curl((i, j, k), Axis::I)) / grid.spacing(Axis::I)
                + (curl((i, j + 1, k), Axis::J) - curl((i, j, k), Axis::J)) / grid.spacing(Axis::J);
            assert!(div.abs() < 1e-9);
        }
        approx::assert_relative_eq!(curl((5, 4, 0), Axis::I), 6.0, epsilon = 1e-12);
        approx::assert_relative_eq!(curl((4, 5, 0), Axis::J), -6.0, epsilon = 1e-12);
    }

    #[test]
    fn slopes_are_taken_across_each_face() {
        let grid = Grid::unit_square(4);
        let u = Field::from_function(grid.extended_space(), 8, |(i, j, _), cons| {
            cons[IA] = j as f64;
            cons[IB] = i as f64;
        });
        let mut slopes = Field::zeros(grid.extended_space(), NUM_SLOPE_COMPONENTS);
        compute_magnetic_slopes(&u, &mut slopes, &grid, SlopeLimiter::MonotonizedCentral);

        assert_eq!(slopes.get((3, 3, 0), slope_slot(Axis::I, Axis::J)), 1.0);
        assert_eq!(slopes.get((3, 3, 0), slope_slot(Axis::J, Axis::I)), 1.0);
        assert_eq!(slopes.get((3, 3, 0), slope_slot(Axis::I, Axis::K)), 0.0);
        assert_eq!(slopes.get((3, 0, 0), slope_slot(Axis::I, Axis::J)), 0.0);
    }
}
