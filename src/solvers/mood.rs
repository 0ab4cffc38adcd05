//! A-posteriori correction of the multidimensional optimal order detection
//! (MOOD) kind. The tentative update is checked cell by cell; cells whose
//! state is not admissible are flagged, and the fluxes and EMFs touching them
//! are recomputed with a more dissipative scheme before the update is
//! re-evaluated.

use crate::field::Field;
use crate::grid::Grid;
use crate::hydro::riemann::{RiemannSolver, RiemannSolverKind};
use crate::index_space::Index;
use rayon::prelude::*;
use super::flux::{compute_emf, compute_fluxes, edge_cells};
use super::trace::Reconstruction;
use super::update::Update;




/// Flag the interior cells whose tentative state has negative density or
/// pressure, or any non-finite value, and return how many there are. All
/// other cells of `flags` are cleared.
///
pub fn detect(update: &Update, flags: &mut Field, gamma_law_index: f64) -> usize {
    let interior = update.grid().interior_space();

    flags.par_for_each_mut(|index, f| {
        let bad = interior.contains(index) && update.candidate(index).validate(gamma_law_index).is_err();
        f[0] = if bad { 1.0 } else { 0.0 };
    });
    flags.data().par_iter().filter(|&&f| f > 0.0).count()
}

pub fn is_flagged(flags: &Field, index: Index) -> bool {
    flags.try_get_slice(index).map_or(false, |f| f[0] > 0.0)
}

/// The Riemann solver of the given retry attempt, counted from one: the
/// configured solver on the first retry, then the more diffusive Rusanov
/// flux.
///
pub fn fallback_solver(configured: RiemannSolverKind, attempt: usize) -> RiemannSolverKind {
    if attempt <= 1 {
        configured
    } else {
        RiemannSolverKind::Rusanov
    }
}

/// Recompute, from the fallback reconstruction, the fluxes through every face
/// of a flagged cell and the EMFs on every edge of one.
///
pub fn recompute<R: Reconstruction + ?Sized>(
    flags: &Field,
    rec: &R,
    fluxes: &mut [Field],
    emf: Option<&mut Field>,
    solver: &dyn RiemannSolver,
    grid: &Grid,
    gamma_law_index: f64)
{
    compute_fluxes(rec, fluxes, grid, solver, gamma_law_index, |index, axis| {
        is_flagged(flags, index) || is_flagged(flags, axis.shift(index, -1))
    });

    if let Some(emf) = emf {
        compute_emf(rec, emf, grid, gamma_law_index, |index, edge| {
            edge_cells(index, edge).iter().any(|&c| is_flagged(flags, c))
        });
    }
}
