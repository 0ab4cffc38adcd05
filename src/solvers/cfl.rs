use crate::config::Physics;
use crate::error::Error;
use crate::field::Field;
use crate::grid::Grid;
use crate::hydro::geometry::Direction;
use rayon::prelude::*;
use super::primitive::cell_conserved;

/// Largest value of `sum_a (|v_a| + c_f,a) / dx_a` over the interior cells,
/// where `c_f,a` is the fast magnetosonic speed along each active axis (the
/// sound speed for hydrodynamics). A NaN in any cell propagates to the
/// result.
///
pub fn inverse_time_step(u: &Field, grid: &Grid, physics: Physics, gamma_law_index: f64) -> f64 {
    let interior = grid.interior_space();

    (0..interior.len())
        .into_par_iter()
        .map(|n| {
            let p = cell_conserved(u, interior.coordinate(n), physics).to_primitive(gamma_law_index);

            grid.dimension
                .axes()
                .iter()
                .map(|&axis| {
                    let direction = Direction::from(axis);
                    let speed = p.velocity(direction).abs() + p.fast_magnetosonic_speed(direction, gamma_law_index);
                    speed / grid.spacing(axis)
                })
                .sum::<f64>()
        })
        .reduce(|| 0.0, nan_max)
}

/// The stable time step `cfl / max(inverse step)`.
///
pub fn compute_dt(u: &Field, grid: &Grid, physics: Physics, gamma_law_index: f64, cfl: f64) -> Result<f64, Error> {
    let inverse = inverse_time_step(u, grid, physics, gamma_law_index);

    if inverse.is_finite() && inverse > 0.0 {
        Ok(cfl / inverse)
    } else {
        Err(Error::InvalidTimeStep(inverse))
    }
}

fn nan_max(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        f64::NAN
    } else {
        a.max(b)
    }
}




#[cfg(test)]
mod test {

    use super::*;
    use crate::hydro::geometry::Vector3d;
    use crate::hydro::state::Primitive;

    fn uniform(grid: &Grid, p: Primitive, nq: usize, gamma: f64) -> Field {
        let cons = p.to_conserved(gamma);
        Field::from_function(grid.extended_space(), nq, |_, u| cons.write_to_slice(u))
    }

    #[test]
    fn time_step_follows_the_signal_speed() {
        let grid = Grid::unit_square(10);
        let gamma = 5.0 / 3.0;
        let p = Primitive::new(1.0, 0.6, Vector3d::new(0.5, 0.0, 0.0), Vector3d::default());
        let u = uniform(&grid, p, 4, gamma);

        let dt = compute_dt(&u, &grid, Physics::Hydro, gamma, 0.5).unwrap_or(0.0);
        approx::assert_relative_eq!(dt, 0.5 / (1.5 * 10.0 + 1.0 * 10.0), epsilon = 1e-12);
    }

    #[test]
    fn magnetic_field_raises_the_signal_speed() {
        let grid = Grid::unit_square(10);
        let gamma = 5.0 / 3.0;
        let hydro = Primitive::new(1.0, 0.6, Vector3d::default(), Vector3d::default());
        let mhd = Primitive::new(1.0, 0.6, Vector3d::default(), Vector3d::new(1.0, 0.0, 0.0));
        let a = inverse_time_step(&uniform(&grid, hydro, 8, gamma), &grid, Physics::Mhd, gamma);
        let b = inverse_time_step(&uniform(&grid, mhd, 8, gamma), &grid, Physics::Mhd, gamma);
        assert!(b > a);
    }

    #[test]
    fn non_finite_state_gives_an_error() {
        let grid = Grid::unit_square(10);
        let p = Primitive::new(1.0, 1.0, Vector3d::default(), Vector3d::default());
        let mut u = uniform(&grid, p, 4, 1.4);
        u.get_slice_mut((5, 5, 0))[1] = f64::NAN;
        assert!(matches!(
            compute_dt(&u, &grid, Physics::Hydro, 1.4, 0.4),
            Err(Error::InvalidTimeStep(_))
        ));

        let still = Field::zeros(grid.extended_space(), 4);
        assert!(compute_dt(&still, &grid, Physics::Hydro, 1.4, 0.4).is_err());
    }
}
