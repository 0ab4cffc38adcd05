use crate::error::Error;
use crate::grid::{Dimension, Face, Grid};
use crate::problems::Problem;
use serde::{Deserialize, Serialize};

pub use crate::hydro::limiter::SlopeLimiter;
pub use crate::hydro::riemann::RiemannSolverKind;




/// The system of conservation laws being solved.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Physics {
    Hydro,
    Mhd,
}

/// How reconstructed interface states reach the flux pass: either stored in
/// per-cell face and corner arrays by a separate trace pass, or rebuilt from
/// per-cell slopes inside the flux pass. Both give bitwise identical results;
/// the second trades recomputation for memory.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImplementationVersion {
    StoredTrace,
    FusedTrace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryCondition {
    Periodic,
    Reflective,
    Absorbing,
}

/// Boundary condition on each face of the domain. Faces on an inactive axis
/// are ignored.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundaries {
    pub imin: BoundaryCondition,
    pub imax: BoundaryCondition,
    pub jmin: BoundaryCondition,
    pub jmax: BoundaryCondition,
    pub kmin: BoundaryCondition,
    pub kmax: BoundaryCondition,
}

/// A-posteriori limiting. A step whose tentative update leaves a cell with
/// negative density or pressure, or with non-finite values, has the fluxes
/// around those cells recomputed at first order, up to `max_retries` times.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodConfig {
    pub enabled: bool,
    pub max_retries: usize,
    pub accept_best_effort: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub t_end: f64,
    pub max_steps: u64,
}

/// Snapshot output. Zero `every_steps` disables the periodic snapshots; the
/// initial and final states are still written when `enabled` is set.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub enabled: bool,
    pub directory: String,
    pub prefix: String,
    pub every_steps: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub grid: Grid,
    pub physics: Physics,
    pub gamma_law_index: f64,
    pub cfl: f64,
    pub riemann_solver: RiemannSolverKind,
    pub slope_limiter: SlopeLimiter,
    pub implementation_version: ImplementationVersion,
    pub boundaries: Boundaries,
    pub mood: MoodConfig,
    pub problem: Problem,
    pub run: RunConfig,
    pub output: OutputConfig,
}




// ============================================================================
impl Boundaries {
    pub fn uniform(condition: BoundaryCondition) -> Self {
        Self {
            imin: condition,
            imax: condition,
            jmin: condition,
            jmax: condition,
            kmin: condition,
            kmax: condition,
        }
    }

    pub fn get(&self, face: Face) -> BoundaryCondition {
        match face {
            Face::IMin => self.imin,
            Face::IMax => self.imax,
            Face::JMin => self.jmin,
            Face::JMax => self.jmax,
            Face::KMin => self.kmin,
            Face::KMax => self.kmax,
        }
    }
}

impl Default for Boundaries {
    fn default() -> Self {
        Self::uniform(BoundaryCondition::Absorbing)
    }
}

impl Default for MoodConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_retries: 2,
            accept_best_effort: false,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            t_end: 0.2,
            max_steps: 1_000_000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: "output".to_string(),
            prefix: "snapshot".to_string(),
            every_steps: 100,
        }
    }
}

impl std::str::FromStr for BoundaryCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "periodic" => Ok(BoundaryCondition::Periodic),
            "reflective" | "reflecting" => Ok(BoundaryCondition::Reflective),
            "absorbing" | "outflow" => Ok(BoundaryCondition::Absorbing),
            _ => Err(format!("unknown boundary condition: {}", s)),
        }
    }
}




// ============================================================================
impl Default for Config {
    fn default() -> Self {
        Self {
            grid: Grid::unit_square(128),
            physics: Physics::Hydro,
            gamma_law_index: 1.4,
            cfl: 0.4,
            riemann_solver: RiemannSolverKind::Hll,
            slope_limiter: SlopeLimiter::MonotonizedCentral,
            implementation_version: ImplementationVersion::StoredTrace,
            boundaries: Boundaries::default(),
            mood: MoodConfig::default(),
            problem: Problem::default(),
            run: RunConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {

    /// Number of stored conserved components per cell.
    ///
    pub fn num_fields(&self) -> usize {
        match (self.physics, self.grid.dimension) {
            (Physics::Hydro, Dimension::Two) => 4,
            (Physics::Hydro, Dimension::Three) => 5,
            (Physics::Mhd, _) => 8,
        }
    }

    /// Reject configurations the solver cannot run. Called before anything is
    /// allocated, so that a bad run fails immediately.
    ///
    pub fn validate(&self) -> Result<(), Error> {
        self.grid.validate()?;

        if !(self.gamma_law_index > 1.0) {
            return Err(Error::InvalidConfig(format!(
                "gamma law index must exceed 1, got {}",
                self.gamma_law_index
            )));
        }
        if !(self.cfl > 0.0 && self.cfl <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "cfl number must lie in (0, 1], got {}",
                self.cfl
            )));
        }
        if self.physics == Physics::Mhd && !self.riemann_solver.supports_mhd() {
            return Err(Error::UnsupportedSolver {
                solver: self.riemann_solver,
                physics: self.physics,
            });
        }
        if self.problem.requires_mhd() && self.physics != Physics::Mhd {
            return Err(Error::InvalidConfig(format!(
                "problem {} requires mhd physics",
                self.problem.name()
            )));
        }
        for &axis in self.grid.dimension.axes() {
            let (lower, upper) = Face::on_axis(axis);
            let periodic = |face| self.boundaries.get(face) == BoundaryCondition::Periodic;

            if periodic(lower) != periodic(upper) {
                return Err(Error::InvalidConfig(format!(
                    "periodic boundaries on axis {:?} must be set on both faces",
                    axis
                )));
            }
        }
        if !(self.run.t_end >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "final time must be non-negative, got {}",
                self.run.t_end
            )));
        }
        Ok(())
    }
}




#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
        assert_eq!(Config::default().num_fields(), 4);
    }

    #[test]
    fn hllc_is_rejected_for_mhd() {
        let config = Config {
            physics: Physics::Mhd,
            riemann_solver: RiemannSolverKind::Hllc,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(Error::UnsupportedSolver { .. })));
    }

    #[test]
    fn one_sided_periodic_axis_is_rejected() {
        let mut config = Config::default();
        config.boundaries.imin = BoundaryCondition::Periodic;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        config.boundaries.imax = BoundaryCondition::Periodic;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn magnetized_problem_needs_mhd_physics() {
        let config = Config {
            problem: Problem::OrszagTang,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            physics: Physics::Mhd,
            problem: Problem::OrszagTang,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.num_fields(), 8);
    }

    #[test]
    fn bad_physical_parameters_are_rejected() {
        let config = Config {
            gamma_law_index: 1.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            cfl: 0.0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
