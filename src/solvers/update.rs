use crate::config::Physics;
use crate::field::Field;
use crate::grid::Grid;
use crate::hydro::state::{Conserved, IA, NUM_COMPONENTS};
use crate::index_space::{Axis, Index};
use super::magnetic::face_curl;




/**
 * The conservative update of one time step. Cell-centered components take
 * the flux difference across each active axis,
 *
 * ```text
 * u' = u + (dt / dx_a) (F_a(i) - F_a(i + e_a)),
 * ```
 *
 * and, for MHD, each face-centered field component on an active axis is
 * advanced by the curl of the edge EMFs, `b' = b - dt (curl E)`. Field
 * components on inactive axes are updated by their face fluxes like any
 * other cell-centered variable.
 */
#[derive(Clone, Copy)]
pub struct Update<'a> {
    u: &'a Field,
    fluxes: &'a [Field],
    emf: Option<&'a Field>,
    grid: &'a Grid,
    physics: Physics,
    dt: f64,
}




// ============================================================================
impl<'a> Update<'a> {

    pub fn new(u: &'a Field, fluxes: &'a [Field], emf: Option<&'a Field>, grid: &'a Grid, physics: Physics, dt: f64) -> Self {
        Self { u, fluxes, emf, grid, physics, dt }
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    /// The axis of the face-centered field stored in component `q`, if that
    /// component is updated by constrained transport.
    ///
    fn staggered_axis(&self, q: usize) -> Option<Axis> {
        if self.physics == Physics::Mhd && q >= IA {
            let axis = Axis::ALL[q - IA];
            if self.grid.dimension.is_active(axis) {
                return Some(axis);
            }
        }
        None
    }

    fn flux_difference(&self, index: Index, q: usize) -> f64 {
        let mut x = self.u.get(index, q);

        for &axis in self.grid.dimension.axes() {
            let f = &self.fluxes[axis.index()];
            let courant = self.dt / self.grid.spacing(axis);
            x += courant * (f.get(index, q) - f.get(axis.shift(index, 1), q));
        }
        x
    }

    fn face_field(&self, index: Index, c: Axis) -> f64 {
        let curl = self
            .emf
            .and_then(|emf| face_curl(emf, self.grid, index, c))
            .unwrap_or(0.0);
        self.u.get(index, IA + c.index()) - self.dt * curl
    }

    /// Write the updated stored components of one cell.
    ///
    pub fn cell(&self, index: Index, out: &mut [f64]) {
        for (q, x) in out.iter_mut().enumerate() {
            *x = match self.staggered_axis(q) {
                Some(c) => self.face_field(index, c),
                None => self.flux_difference(index, q),
            }
        }
    }

    /// The updated cell-centered conserved state of a cell, the quantity
    /// whose admissibility is checked before a step is committed.
    ///
    pub fn candidate(&self, index: Index) -> Conserved {
        let nq = self.u.num_fields();
        let mut cons = [0.0; NUM_COMPONENTS];
        self.cell(index, &mut cons[..nq]);

        for &c in self.grid.dimension.axes() {
            if self.staggered_axis(IA + c.index()).is_some() {
                let upper = self.face_field(c.shift(index, 1), c);
                cons[IA + c.index()] = 0.5 * (cons[IA + c.index()] + upper);
            }
        }
        Conserved(cons)
    }

    /// Write the update into the interior cells of `target`. For MHD the
    /// upper wall face of each active axis, stored in the first guard zone,
    /// is advanced by constrained transport as well. Other guard zone values
    /// are left for the next boundary fill.
    ///
    pub fn apply(&self, target: &mut Field) {
        let interior = self.grid.interior_space();
        target.par_for_each_in(&interior, |index, out| self.cell(index, out));

        for &c in self.grid.dimension.axes() {
            let q = IA + c.index();

            if self.staggered_axis(q).is_some() {
                let end = interior.range(c).end;
                let wall = interior.with_range(c, end..end + 1);
                target.par_for_each_in(&wall, |index, out| out[q] = self.face_field(index, c));
            }
        }
    }
}
