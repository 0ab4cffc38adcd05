use crate::config::{Config, ImplementationVersion, Physics};
use crate::error::Error;
use crate::field::{Field, Generations};
use crate::grid::Grid;
use crate::hydro::riemann::RiemannSolver;
use crate::hydro::state::{COMPONENT_NAMES, IA};
use crate::index_space::Axis;
use crate::output::{OutputWriter, Snapshot};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use super::flux::{compute_emf, compute_fluxes};
use super::magnetic::{self, NUM_SLOPE_COMPONENTS};
use super::trace::{self, FaceField, FirstOrder, FusedTrace, Reconstruction, StoredTrace, TraceParams};
use super::update::Update;
use super::{boundary, cfl, mood, primitive};




/// Per-cell storage of the reconstruction, by implementation version.
///
enum TraceStorage {
    Stored(Field),
    Fused(Field),
}

/// Work arrays used only for magnetized runs.
///
struct MagneticStorage {
    electric_field: Field,
    slopes: Field,
    face_field: Field,
    emf: Field,
}

/// What happened during one step.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    pub iteration: u64,
    pub time: f64,
    pub dt: f64,
    pub flagged: usize,
    pub retries: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    pub iterations: u64,
    pub time: f64,
    pub corrected_steps: u64,
    pub interrupted: bool,
}




/**
 * Second-order Godunov solver for the Euler and ideal MHD equations, on a
 * single uniform grid. Each step reconstructs primitive states with limited
 * linear slopes and a MUSCL-Hancock half-step predictor, solves Riemann
 * problems at faces (and, for MHD, two-dimensional Riemann problems at
 * edges), checks the tentative update for admissibility, and commits it to
 * the other generation of the double buffer.
 */
pub struct MusclSolver {
    config: Config,
    generations: Generations,
    primitive: Field,
    trace: TraceStorage,
    fluxes: Vec<Field>,
    magnetic: Option<MagneticStorage>,
    flags: Field,
    time: f64,
}




// ============================================================================
impl MusclSolver {

    /// Validate the configuration, allocate all work arrays, and write the
    /// initial condition with its guard zones filled.
    ///
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;

        let grid = &config.grid;
        let space = grid.extended_space();
        let nq = config.num_fields();
        let mhd = config.physics == Physics::Mhd;

        let mut u = Field::zeros(space.clone(), nq);
        config.problem.initialize(&mut u, grid, config.gamma_law_index);
        boundary::fill_boundaries(&mut u, grid, &config.boundaries);

        let trace = match config.implementation_version {
            ImplementationVersion::StoredTrace => {
                TraceStorage::Stored(Field::zeros(space.clone(), trace::stored_trace_components(nq, mhd)))
            }
            ImplementationVersion::FusedTrace => {
                TraceStorage::Fused(Field::zeros(space.clone(), trace::fused_trace_components(nq)))
            }
        };
        let magnetic = if mhd {
            Some(MagneticStorage {
                electric_field: Field::zeros(space.clone(), 3),
                slopes: Field::zeros(space.clone(), NUM_SLOPE_COMPONENTS),
                face_field: Field::zeros(space.clone(), 3),
                emf: Field::zeros(space.clone(), 3),
            })
        } else {
            None
        };
        let fluxes = grid
            .dimension
            .axes()
            .iter()
            .map(|_| Field::zeros(space.clone(), nq))
            .collect();

        info!(
            "{} on {:?} grid {:?} with {:?}, {:?} solver, {:?} limiter, {:?}",
            config.problem.name(),
            grid.dimension,
            grid.size,
            config.physics,
            config.riemann_solver,
            config.slope_limiter,
            config.implementation_version
        );

        Ok(Self {
            primitive: Field::zeros(space.clone(), nq),
            flags: Field::zeros(space, 1),
            generations: Generations::new(u),
            trace,
            fluxes,
            magnetic,
            config,
            time: 0.0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.config.grid
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn iteration(&self) -> u64 {
        self.generations.step()
    }

    /// The conserved data of the current generation.
    ///
    pub fn current(&self) -> &Field {
        self.generations.current()
    }

    /// Write access to the current generation, for custom initial data.
    /// Guard zones are refilled at the start of the next step.
    ///
    pub fn current_mut(&mut self) -> &mut Field {
        self.generations.current_mut()
    }

    pub fn snapshot(&self) -> Snapshot {
        let nq = self.config.num_fields();
        Snapshot {
            iteration: self.iteration(),
            time: self.time,
            grid: self.config.grid.clone(),
            variable_names: COMPONENT_NAMES[..nq].iter().map(|s| s.to_string()).collect(),
            field: self.current().clone(),
        }
    }

    /// The largest stable time step for the current state.
    ///
    pub fn compute_dt(&self) -> Result<f64, Error> {
        cfl::compute_dt(
            self.current(),
            &self.config.grid,
            self.config.physics,
            self.config.gamma_law_index,
            self.config.cfl,
        )
    }

    /// Advance by one step of the stable size, shortened if needed to land
    /// on the final time.
    ///
    pub fn advance(&mut self) -> Result<StepReport, Error> {
        let t_end = self.config.run.t_end;
        let remaining = t_end - self.time;
        let dt = self.compute_dt()?;

        if remaining > 0.0 && dt >= remaining {
            let report = self.advance_by(remaining)?;
            self.time = t_end;
            Ok(StepReport { time: t_end, ..report })
        } else {
            self.advance_by(dt)
        }
    }

    /**
     * Advance by one step of the given size. On error nothing is committed:
     * the time, the iteration count, and the interior of the current
     * generation are unchanged.
     */
    pub fn advance_by(&mut self, dt: f64) -> Result<StepReport, Error> {
        let config = &self.config;
        let grid = &config.grid;
        let gamma = config.gamma_law_index;
        let physics = config.physics;
        let iteration = self.generations.step();
        let nq = config.num_fields();

        let mut courant = [0.0; 3];
        for &axis in grid.dimension.axes() {
            courant[axis.index()] = dt / grid.spacing(axis);
        }

        let (u, next) = self.generations.split_mut();
        boundary::fill_boundaries(u, grid, &config.boundaries);
        next.copy_from(u);
        let u = &*u;

        primitive::convert_to_primitives(u, &mut self.primitive, physics, gamma);
        debug!("[{:06}] primitive variables", iteration);

        let (half_step, mut emf) = match self.magnetic.as_mut() {
            Some(m) => {
                magnetic::compute_electric_field(&self.primitive, u, &mut m.electric_field, grid);
                magnetic::compute_magnetic_slopes(u, &mut m.slopes, grid, config.slope_limiter);
                magnetic::predict_face_field(u, &m.electric_field, &mut m.face_field, grid, dt);
                debug!("[{:06}] half-step face field", iteration);
                (Some(FaceField::half_step(&m.face_field, &m.slopes)), Some(&mut m.emf))
            }
            None => (None, None),
        };

        let params = TraceParams {
            grid,
            limiter: config.slope_limiter,
            courant,
            gamma_law_index: gamma,
            magnetic: half_step,
        };
        let solver = config.riemann_solver.solver();

        match &mut self.trace {
            TraceStorage::Stored(storage) => {
                trace::compute_stored_trace(&self.primitive, storage, &params);
                let rec = StoredTrace::new(storage, nq);
                godunov_pass(&rec, &mut self.fluxes, emf.as_deref_mut(), grid, solver, gamma);
            }
            TraceStorage::Fused(storage) => {
                trace::compute_fused_trace(&self.primitive, storage, &params);
                let rec = FusedTrace::new(&self.primitive, storage, params);
                godunov_pass(&rec, &mut self.fluxes, emf.as_deref_mut(), grid, solver, gamma);
            }
        }
        debug!("[{:06}] fluxes", iteration);

        let mut flagged = 0;
        let mut retries = 0;

        if config.mood.enabled {
            let time_n = if physics == Physics::Mhd { Some(FaceField::time_n(u)) } else { None };
            let fallback = FirstOrder::new(&self.primitive, time_n);

            loop {
                let update = Update::new(u, &self.fluxes, emf.as_deref(), grid, physics, dt);
                let count = mood::detect(&update, &mut self.flags, gamma);

                if retries == 0 {
                    flagged = count;
                }
                if count == 0 {
                    break;
                }
                if retries == config.mood.max_retries {
                    if config.mood.accept_best_effort {
                        warn!("[{:06}] accepting {} inadmissible cell(s)", iteration, count);
                        break;
                    }
                    return Err(Error::MoodRetryExhausted { iteration, flagged: count });
                }
                retries += 1;

                let kind = mood::fallback_solver(config.riemann_solver, retries);
                warn!("[{:06}] {} cell(s) flagged, retry {} with first-order {:?}", iteration, count, retries, kind);
                mood::recompute(&self.flags, &fallback, &mut self.fluxes, emf.as_deref_mut(), kind.solver(), grid, gamma);
            }
        }

        Update::new(u, &self.fluxes, emf.as_deref(), grid, physics, dt).apply(next);
        self.generations.advance();
        self.time += dt;

        if self.generations.step() % 10 == 0 {
            info!("[{:06}] t={:.6} dt={:.3e}", self.generations.step(), self.time, dt);
        }

        Ok(StepReport {
            iteration: self.generations.step(),
            time: self.time,
            dt,
            flagged,
            retries,
        })
    }

    /**
     * Step until the final time or the step limit is reached, or until `stop`
     * is raised. Snapshots go to `writer`, if given: the initial state, every
     * `every_steps` iterations, and the final state.
     */
    pub fn run(&mut self, stop: &AtomicBool, writer: Option<&OutputWriter>) -> Result<RunSummary, Error> {
        let t_end = self.config.run.t_end;
        let max_steps = self.config.run.max_steps;
        let every = self.config.output.every_steps;
        let mut writer = writer;
        let mut corrected_steps = 0;
        let mut interrupted = false;
        let mut last_written = None;

        self.submit(&mut writer, &mut last_written);

        while self.time < t_end && self.iteration() < max_steps {
            if stop.load(Ordering::Relaxed) {
                warn!("stop requested at iteration {}", self.iteration());
                interrupted = true;
                break;
            }
            let report = self.advance()?;

            if report.flagged > 0 {
                corrected_steps += 1;
            }
            if every > 0 && report.iteration % every == 0 {
                self.submit(&mut writer, &mut last_written);
            }
        }

        if last_written != Some(self.iteration()) {
            self.submit(&mut writer, &mut last_written);
        }
        info!("finished at iteration {} t={:.6}", self.iteration(), self.time);

        Ok(RunSummary {
            iterations: self.iteration(),
            time: self.time,
            corrected_steps,
            interrupted,
        })
    }

    /// Queue a snapshot of the current state. A writer whose thread has
    /// stopped is dropped, and no further snapshots are sent to it.
    ///
    fn submit(&self, writer: &mut Option<&OutputWriter>, last_written: &mut Option<u64>) {
        if let Some(w) = *writer {
            if w.submit(self.snapshot()) {
                *last_written = Some(self.iteration());
            } else {
                warn!("output writer has stopped; no further snapshots will be written");
                *writer = None;
            }
        }
    }
}

/// Fluxes on every face, and EMFs on every edge, from one reconstruction.
///
fn godunov_pass<R: Reconstruction>(
    rec: &R,
    fluxes: &mut [Field],
    emf: Option<&mut Field>,
    grid: &Grid,
    solver: &dyn RiemannSolver,
    gamma_law_index: f64)
{
    compute_fluxes(rec, fluxes, grid, solver, gamma_law_index, |_, _| true);

    if let Some(emf) = emf {
        compute_emf(rec, emf, grid, gamma_law_index, |_, _| true);
    }
}

/// Largest discrete divergence of the face-centered magnetic field over the
/// interior cells.
///
pub fn max_divergence(u: &Field, grid: &Grid) -> f64 {
    grid.interior_space()
        .iter()
        .map(|index| {
            grid.dimension
                .axes()
                .iter()
                .map(|&c: &Axis| {
                    let q = IA + c.index();
                    (u.get(c.shift(index, 1), q) - u.get(index, q)) / grid.spacing(c)
                })
                .sum::<f64>()
                .abs()
        })
        .fold(0.0, f64::max)
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::config::{BoundaryCondition, Boundaries, RiemannSolverKind};
    use crate::hydro::geometry::Vector3d;
    use crate::hydro::state::{Conserved, Primitive, IB, IC, ID};
    use crate::config::MoodConfig;
    use crate::problems::{BlastParams, Problem, UniformParams};
    use std::f64::consts::PI;

    fn periodic(config: Config) -> Config {
        Config {
            boundaries: Boundaries::uniform(BoundaryCondition::Periodic),
            ..config
        }
    }

    fn uniform_config(grid: Grid, physics: Physics, version: ImplementationVersion) -> Config {
        Config {
            grid,
            physics,
            gamma_law_index: 5.0 / 3.0,
            riemann_solver: if physics == Physics::Mhd { RiemannSolverKind::Hlld } else { RiemannSolverKind::Hllc },
            implementation_version: version,
            problem: Problem::Uniform(UniformParams {
                density: 1.0,
                pressure: 0.8,
                velocity: (0.3, -0.2, 0.1),
                magnetic_field: if physics == Physics::Mhd { (0.5, 0.25, -0.125) } else { (0.0, 0.0, 0.0) },
            }),
            ..Config::default()
        }
    }

    fn filled(solver: &MusclSolver) -> Field {
        let mut u = solver.current().clone();
        boundary::fill_boundaries(&mut u, solver.grid(), &solver.config().boundaries);
        u
    }

    #[test]
    fn uniform_state_is_unchanged() {
        let grids = [Grid::unit_square(8), Grid::unit_cube(6)];
        let versions = [ImplementationVersion::StoredTrace, ImplementationVersion::FusedTrace];

        for grid in grids.iter() {
            for &physics in [Physics::Hydro, Physics::Mhd].iter() {
                for &version in versions.iter() {
                    let config = uniform_config(grid.clone(), physics, version);

                    for config in vec![config.clone(), periodic(config)] {
                        let mut solver = MusclSolver::new(config).unwrap();
                        let initial = solver.current().clone();

                        for _ in 0..3 {
                            solver.advance().unwrap();
                        }
                        assert_eq!(solver.current().data(), initial.data());
                    }
                }
            }
        }
    }

    #[test]
    fn periodic_blast_conserves_mass_momentum_and_energy() {
        let config = periodic(Config {
            grid: Grid::unit_square(24),
            problem: Problem::Blast(BlastParams::default()),
            ..Config::default()
        });
        let mut solver = MusclSolver::new(config).unwrap();
        let interior = solver.grid().interior_space();
        let before = solver.current().sum_over(&interior);

        for _ in 0..8 {
            solver.advance().unwrap();
        }
        let after = solver.current().sum_over(&interior);

        for (a, b) in before.iter().zip(after.iter()) {
            approx::assert_abs_diff_eq!(a, b, epsilon = 1e-10 * before[1].abs());
        }
        for u in solver.current().iter_data() {
            assert!(Conserved::from_slice(u).validate(1.4).is_ok());
        }
    }

    #[test]
    fn implementation_versions_agree_bitwise() {
        let configs = vec![
            Config {
                grid: Grid::unit_square(16),
                ..Config::default()
            },
            periodic(Config {
                grid: Grid::unit_square(16),
                physics: Physics::Mhd,
                gamma_law_index: 5.0 / 3.0,
                riemann_solver: RiemannSolverKind::Hlld,
                problem: Problem::OrszagTang,
                ..Config::default()
            }),
        ];
        for config in configs {
            let mut stored = MusclSolver::new(Config {
                implementation_version: ImplementationVersion::StoredTrace,
                ..config.clone()
            })
            .unwrap();
            let mut fused = MusclSolver::new(Config {
                implementation_version: ImplementationVersion::FusedTrace,
                ..config
            })
            .unwrap();

            for _ in 0..4 {
                stored.advance().unwrap();
                fused.advance().unwrap();
            }
            assert_eq!(stored.current().data(), fused.current().data());
            assert_eq!(stored.time(), fused.time());
        }
    }

    #[test]
    fn orszag_tang_keeps_the_field_divergence_free() {
        let config = periodic(Config {
            grid: Grid::unit_square(32),
            physics: Physics::Mhd,
            gamma_law_index: 5.0 / 3.0,
            riemann_solver: RiemannSolverKind::Hlld,
            problem: Problem::OrszagTang,
            ..Config::default()
        });
        let mut solver = MusclSolver::new(config).unwrap();
        let interior = solver.grid().interior_space();
        let mass = solver.current().sum_over(&interior)[ID];

        for _ in 0..6 {
            solver.advance().unwrap();
            assert!(max_divergence(&filled(&solver), solver.grid()) < 1e-10);
        }
        approx::assert_relative_eq!(solver.current().sum_over(&interior)[ID], mass, epsilon = 1e-12);
    }

    #[test]
    fn three_dimensional_mhd_keeps_the_field_divergence_free() {
        let config = periodic(Config {
            grid: Grid::unit_cube(8),
            physics: Physics::Mhd,
            gamma_law_index: 5.0 / 3.0,
            riemann_solver: RiemannSolverKind::Hll,
            problem: Problem::Uniform(UniformParams::default()),
            ..Config::default()
        });
        let mut solver = MusclSolver::new(config).unwrap();
        let grid = solver.grid().clone();
        let s = |x: f64| (2.0 * PI * x).sin();
        let c = |x: f64| (2.0 * PI * x).cos();

        solver.current_mut().par_for_each_mut(|index, u| {
            let (x, y, z) = grid.cell_center(index);
            let bx = |y: f64, z: f64| 0.2 * s(y) + 0.1 * c(z);
            let by = |z: f64, x: f64| 0.2 * s(z) + 0.1 * c(x);
            let bz = |x: f64, y: f64| 0.2 * s(x) + 0.1 * c(y);
            let v = Vector3d::new(0.1 * s(z), 0.1 * s(x), 0.1 * s(y));
            let b = Vector3d::new(bx(y, z), by(z, x), bz(x, y));
            Primitive::new(1.0, 1.0, v, b).to_conserved(5.0 / 3.0).write_to_slice(u);
            u[IA] = bx(y, z);
            u[IB] = by(z, x);
            u[IC] = bz(x, y);
        });
        assert!(max_divergence(&filled(&solver), &grid) < 1e-12);

        for _ in 0..3 {
            solver.advance().unwrap();
            assert!(max_divergence(&filled(&solver), &grid) < 1e-10);
        }
    }

    #[test]
    fn time_step_respects_the_courant_condition() {
        let config = Config {
            grid: Grid::unit_square(16),
            cfl: 0.3,
            ..Config::default()
        };
        let solver = MusclSolver::new(config).unwrap();
        let dt = solver.compute_dt().unwrap();
        let inverse = cfl::inverse_time_step(solver.current(), solver.grid(), Physics::Hydro, 1.4);
        assert!(dt * inverse <= 0.3 * (1.0 + 1e-12));
    }

    #[test]
    fn run_stops_exactly_at_the_final_time() {
        let mut config = Config {
            grid: Grid::unit_square(16),
            problem: Problem::from_name("implode").unwrap(),
            ..Config::default()
        };
        config.boundaries = Boundaries::uniform(BoundaryCondition::Reflective);
        config.run.t_end = 0.01;

        let mut solver = MusclSolver::new(config).unwrap();
        let summary = solver.run(&AtomicBool::new(false), None).unwrap();
        assert_eq!(summary.time, 0.01);
        assert_eq!(solver.time(), 0.01);
        assert!(summary.iterations > 0);
        assert!(!summary.interrupted);
    }

    #[test]
    fn raised_stop_flag_halts_the_run() {
        let mut solver = MusclSolver::new(Config {
            grid: Grid::unit_square(8),
            ..Config::default()
        })
        .unwrap();
        let summary = solver.run(&AtomicBool::new(true), None).unwrap();
        assert!(summary.interrupted);
        assert_eq!(summary.iterations, 0);
    }

    #[test]
    fn failed_step_commits_nothing() {
        let mut solver = MusclSolver::new(Config {
            grid: Grid::unit_square(8),
            ..Config::default()
        })
        .unwrap();
        solver.current_mut().get_slice_mut((5, 5, 0))[ID] = f64::NAN;
        let before = solver.current().clone();

        assert!(matches!(solver.advance(), Err(Error::InvalidTimeStep(_))));
        assert_eq!(solver.iteration(), 0);
        assert_eq!(solver.time(), 0.0);
        let interior = solver.grid().interior_space();
        for index in interior.iter().filter(|&i| i != (5, 5, 0)) {
            assert_eq!(solver.current().get_slice(index), before.get_slice(index));
        }
    }

    #[test]
    fn unsupported_combinations_fail_fast() {
        let config = Config {
            physics: Physics::Mhd,
            riemann_solver: RiemannSolverKind::Hllc,
            ..Config::default()
        };
        assert!(matches!(MusclSolver::new(config), Err(Error::UnsupportedSolver { .. })));
    }

    #[test]
    fn smooth_vortex_needs_no_correction() {
        let mut grid = Grid::unit_square(24);
        grid.upper = (10.0, 10.0, 1.0);
        let mut solver = MusclSolver::new(periodic(Config {
            grid,
            problem: Problem::from_name("isentropic_vortex").unwrap(),
            ..Config::default()
        }))
        .unwrap();

        for _ in 0..5 {
            let report = solver.advance().unwrap();
            assert_eq!(report.flagged, 0);
            assert_eq!(report.retries, 0);
        }
    }

    fn blast_with_mood(mood: MoodConfig) -> MusclSolver {
        MusclSolver::new(Config {
            grid: Grid::unit_square(16),
            problem: Problem::Blast(BlastParams::default()),
            mood,
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn exhausted_retries_commit_nothing() {
        let mut solver = blast_with_mood(MoodConfig {
            max_retries: 1,
            ..MoodConfig::default()
        });
        let before = solver.current().clone();
        let dt = solver.compute_dt().unwrap();

        let result = solver.advance_by(20.0 * dt);
        assert!(matches!(result, Err(Error::MoodRetryExhausted { iteration: 0, flagged }) if flagged > 0));
        assert_eq!(solver.iteration(), 0);
        assert_eq!(solver.time(), 0.0);
        for index in solver.grid().interior_space().iter() {
            assert_eq!(solver.current().get_slice(index), before.get_slice(index));
        }
    }

    #[test]
    fn best_effort_commits_the_flagged_step() {
        let mut solver = blast_with_mood(MoodConfig {
            max_retries: 1,
            accept_best_effort: true,
            ..MoodConfig::default()
        });
        let before = solver.current().clone();
        let dt = solver.compute_dt().unwrap();

        let report = solver.advance_by(20.0 * dt).unwrap();
        assert!(report.flagged > 0);
        assert_eq!(report.retries, 1);
        assert_eq!(solver.iteration(), 1);
        assert_eq!(solver.time(), 20.0 * dt);
        assert_ne!(solver.current().data(), before.data());
    }

    #[test]
    fn one_first_order_retry_repairs_a_strong_expansion() {
        let mut solver = MusclSolver::new(Config {
            grid: Grid::unit_square(8),
            problem: Problem::Uniform(UniformParams {
                density: 1.0,
                pressure: 0.01,
                velocity: (0.0, 0.0, 0.0),
                magnetic_field: (0.0, 0.0, 0.0),
            }),
            ..Config::default()
        })
        .unwrap();

        solver.current_mut().par_for_each_mut(|(i, _, _), u| {
            let vx = if i < 6 { -1.0 } else if i > 6 { 1.0 } else { 0.0 };
            Primitive::new(1.0, 0.01, Vector3d::new(vx, 0.0, 0.0), Vector3d::new(0.0, 0.0, 0.0))
                .to_conserved(1.4)
                .write_to_slice(u);
        });

        let report = solver.advance().unwrap();
        assert_eq!(report.flagged, 8);
        assert_eq!(report.retries, 1);
        for index in solver.grid().interior_space().iter() {
            assert!(Conserved::from_slice(solver.current().get_slice(index)).validate(1.4).is_ok());
        }
    }

    #[test]
    fn reflective_walls_hold_a_magnetized_fluid_at_rest() {
        let config = Config {
            grid: Grid::unit_square(8),
            physics: Physics::Mhd,
            riemann_solver: RiemannSolverKind::Hll,
            boundaries: Boundaries::uniform(BoundaryCondition::Reflective),
            problem: Problem::Uniform(UniformParams {
                density: 1.0,
                pressure: 1.0,
                velocity: (0.0, 0.0, 0.0),
                magnetic_field: (0.5, 0.0, 0.0),
            }),
            ..Config::default()
        };
        let mut solver = MusclSolver::new(config).unwrap();
        let grid = solver.grid().clone();
        let initial = solver.current().clone();
        assert_eq!(max_divergence(&filled(&solver), &grid), 0.0);

        for _ in 0..3 {
            solver.advance().unwrap();
            assert_eq!(max_divergence(&filled(&solver), &grid), 0.0);
        }
        for index in grid.interior_space().iter() {
            for (a, b) in solver.current().get_slice(index).iter().zip(initial.get_slice(index)) {
                approx::assert_abs_diff_eq!(a, b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn reflective_walls_keep_a_tangled_field_divergence_free() {
        let config = Config {
            grid: Grid::unit_square(16),
            physics: Physics::Mhd,
            gamma_law_index: 5.0 / 3.0,
            riemann_solver: RiemannSolverKind::Hlld,
            boundaries: Boundaries::uniform(BoundaryCondition::Reflective),
            problem: Problem::OrszagTang,
            ..Config::default()
        };
        let mut solver = MusclSolver::new(config).unwrap();
        let grid = solver.grid().clone();

        for _ in 0..4 {
            solver.advance().unwrap();
            assert!(max_divergence(&filled(&solver), &grid) < 1e-10);
        }
    }

    #[test]
    fn run_continues_after_the_writer_fails() {
        let dir = std::env::temp_dir().join(format!("godunov-run-writer-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let writer = OutputWriter::new(dir.to_str().unwrap(), "missing/run").unwrap();

        let mut config = Config {
            grid: Grid::unit_square(8),
            ..Config::default()
        };
        config.run.max_steps = 3;
        config.output.every_steps = 1;
        let mut solver = MusclSolver::new(config).unwrap();

        for _ in 0..500 {
            if !writer.submit(solver.snapshot()) {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(!writer.submit(solver.snapshot()));

        let summary = solver.run(&AtomicBool::new(false), Some(&writer)).unwrap();
        assert_eq!(summary.iterations, 3);
        assert!(writer.finish().is_err());
    }
}
