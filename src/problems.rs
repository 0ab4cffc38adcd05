use crate::config::BoundaryCondition;
use crate::error::Error;
use crate::field::Field;
use crate::grid::Grid;
use crate::hydro::geometry::Vector3d;
use crate::hydro::state::{Primitive, IA, IB, IC};
use crate::index_space::{Axis, Index};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;




/// Initial conditions. Each problem writes conserved data into every cell of
/// a field, guard zones included; magnetized problems write the magnetic
/// field on the low faces of each cell.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Problem {
    Uniform(UniformParams),
    Implode,
    Blast(BlastParams),
    IsentropicVortex(VortexParams),
    FourQuadrant(FourQuadrantParams),
    OrszagTang,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniformParams {
    pub density: f64,
    pub pressure: f64,
    pub velocity: (f64, f64, f64),
    pub magnetic_field: (f64, f64, f64),
}

/// A spherical (circular in 2D) over-pressured region.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlastParams {
    pub radius: f64,
    pub center: (f64, f64, f64),
    pub density_in: f64,
    pub density_out: f64,
    pub pressure_in: f64,
    pub pressure_out: f64,
}

/// An isentropic vortex advected by a uniform flow, with unit ambient
/// density and temperature.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VortexParams {
    pub center: (f64, f64),
    pub strength: f64,
    pub ambient_velocity: (f64, f64),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadrantState {
    pub density: f64,
    pub pressure: f64,
    pub velocity: (f64, f64),
}

/// Two-dimensional Riemann problem: four constant states meeting at `split`.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FourQuadrantParams {
    pub split: (f64, f64),
    pub upper_right: QuadrantState,
    pub upper_left: QuadrantState,
    pub lower_left: QuadrantState,
    pub lower_right: QuadrantState,
}




// ============================================================================
impl Default for UniformParams {
    fn default() -> Self {
        Self {
            density: 1.0,
            pressure: 1.0,
            velocity: (0.0, 0.0, 0.0),
            magnetic_field: (0.0, 0.0, 0.0),
        }
    }
}

impl Default for BlastParams {
    fn default() -> Self {
        Self {
            radius: 0.1,
            center: (0.5, 0.5, 0.5),
            density_in: 1.0,
            density_out: 1.2,
            pressure_in: 10.0,
            pressure_out: 0.1,
        }
    }
}

impl Default for VortexParams {
    fn default() -> Self {
        Self {
            center: (5.0, 5.0),
            strength: 5.0,
            ambient_velocity: (1.0, 1.0),
        }
    }
}

impl Default for FourQuadrantParams {
    fn default() -> Self {
        let state = |density, pressure, u, v| QuadrantState {
            density,
            pressure,
            velocity: (u, v),
        };
        Self {
            split: (0.8, 0.8),
            upper_right: state(1.5, 1.5, 0.0, 0.0),
            upper_left: state(0.5323, 0.3, 1.206, 0.0),
            lower_left: state(0.138, 0.029, 1.206, 1.206),
            lower_right: state(0.5323, 0.3, 0.0, 1.206),
        }
    }
}

impl Default for Problem {
    fn default() -> Self {
        Problem::Blast(BlastParams::default())
    }
}




// ============================================================================
impl Problem {

    /// Look up a problem by name, with default parameters.
    ///
    pub fn from_name(name: &str) -> Result<Self, Error> {
        match name {
            "uniform" => Ok(Problem::Uniform(UniformParams::default())),
            "implode" => Ok(Problem::Implode),
            "blast" => Ok(Problem::Blast(BlastParams::default())),
            "isentropic_vortex" => Ok(Problem::IsentropicVortex(VortexParams::default())),
            "four_quadrant" => Ok(Problem::FourQuadrant(FourQuadrantParams::default())),
            "orszag_tang" => Ok(Problem::OrszagTang),
            _ => Err(Error::UnknownProblem(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Problem::Uniform(_) => "uniform",
            Problem::Implode => "implode",
            Problem::Blast(_) => "blast",
            Problem::IsentropicVortex(_) => "isentropic_vortex",
            Problem::FourQuadrant(_) => "four_quadrant",
            Problem::OrszagTang => "orszag_tang",
        }
    }

    pub fn requires_mhd(&self) -> bool {
        matches!(self, Problem::OrszagTang)
    }

    /// The boundary condition this problem is normally run with.
    ///
    pub fn natural_boundary(&self) -> BoundaryCondition {
        match self {
            Problem::Uniform(_) | Problem::IsentropicVortex(_) | Problem::OrszagTang => BoundaryCondition::Periodic,
            Problem::Implode => BoundaryCondition::Reflective,
            Problem::Blast(_) | Problem::FourQuadrant(_) => BoundaryCondition::Absorbing,
        }
    }

    /// Upper corner of the domain this problem is set up on; the lower
    /// corner is the origin.
    ///
    pub fn natural_extent(&self) -> f64 {
        match self {
            Problem::IsentropicVortex(_) => 10.0,
            _ => 1.0,
        }
    }

    /// Write the initial conserved state into every cell of `u`.
    ///
    pub fn initialize(&self, u: &mut Field, grid: &Grid, gamma_law_index: f64) {
        u.par_for_each_mut(|index, cons| {
            self.primitive(grid, index, gamma_law_index)
                .to_conserved(gamma_law_index)
                .write_to_slice(cons);

            if cons.len() > IC {
                cons[IA] = self.face_magnetic_field(grid, index, Axis::I);
                cons[IB] = self.face_magnetic_field(grid, index, Axis::J);
                if grid.dimension.is_active(Axis::K) {
                    cons[IC] = self.face_magnetic_field(grid, index, Axis::K);
                }
            }
        })
    }

    /// The primitive state at a cell center. The magnetic field here is the
    /// cell-centered one, which sets the magnetic part of the total energy.
    /// The vortex profile is isentropic for the given adiabatic index.
    ///
    fn primitive(&self, grid: &Grid, index: Index, gamma_law_index: f64) -> Primitive {
        let (x, y, z) = grid.cell_center(index);
        let zero = Vector3d::default();

        match self {
            Problem::Uniform(p) => Primitive::new(
                p.density,
                p.pressure,
                Vector3d::new(p.velocity.0, p.velocity.1, p.velocity.2),
                Vector3d::new(p.magnetic_field.0, p.magnetic_field.1, p.magnetic_field.2),
            ),
            Problem::Implode => {
                let tmp = x + y * y;
                if tmp > 0.5 && tmp < 1.5 {
                    Primitive::new(1.0, 1.0, zero, zero)
                } else {
                    Primitive::new(0.125, 0.14, zero, zero)
                }
            }
            Problem::Blast(p) => {
                let dx = x - p.center.0;
                let dy = y - p.center.1;
                let dz = if grid.dimension.is_active(Axis::K) { z - p.center.2 } else { 0.0 };
                if dx * dx + dy * dy + dz * dz < p.radius * p.radius {
                    Primitive::new(p.density_in, p.pressure_in, zero, zero)
                } else {
                    Primitive::new(p.density_out, p.pressure_out, zero, zero)
                }
            }
            Problem::IsentropicVortex(p) => {
                let gamma = gamma_law_index;
                let (xc, yc) = (x - p.center.0, y - p.center.1);
                let r2 = xc * xc + yc * yc;
                let e = ((1.0 - r2) * 0.5).exp();
                let du = -p.strength / (2.0 * PI) * e * yc;
                let dv = p.strength / (2.0 * PI) * e * xc;
                let t = 1.0 - (gamma - 1.0) * p.strength * p.strength / (8.0 * gamma * PI * PI) * e * e;
                let d = t.powf(1.0 / (gamma - 1.0));
                let v = Vector3d::new(p.ambient_velocity.0 + du, p.ambient_velocity.1 + dv, 0.0);
                Primitive::new(d, d * t, v, zero)
            }
            Problem::FourQuadrant(p) => {
                let q = match (x >= p.split.0, y >= p.split.1) {
                    (true, true) => &p.upper_right,
                    (false, true) => &p.upper_left,
                    (false, false) => &p.lower_left,
                    (true, false) => &p.lower_right,
                };
                Primitive::new(q.density, q.pressure, Vector3d::new(q.velocity.0, q.velocity.1, 0.0), zero)
            }
            Problem::OrszagTang => {
                let b0 = 1.0 / (4.0 * PI).sqrt();
                Primitive::new(
                    25.0 / (36.0 * PI),
                    5.0 / (12.0 * PI),
                    Vector3d::new(-(2.0 * PI * y).sin(), (2.0 * PI * x).sin(), 0.0),
                    Vector3d::new(-b0 * (2.0 * PI * y).sin(), b0 * (4.0 * PI * x).sin(), 0.0),
                )
            }
        }
    }

    /// Magnetic field component normal to the low `axis` face of a cell.
    ///
    fn face_magnetic_field(&self, grid: &Grid, index: Index, axis: Axis) -> f64 {
        match self {
            Problem::Uniform(p) => match axis {
                Axis::I => p.magnetic_field.0,
                Axis::J => p.magnetic_field.1,
                Axis::K => p.magnetic_field.2,
            },
            Problem::OrszagTang => {
                let b0 = 1.0 / (4.0 * PI).sqrt();
                let (x, y, _) = grid.cell_center(index);
                match axis {
                    Axis::I => -b0 * (2.0 * PI * y).sin(),
                    Axis::J => b0 * (4.0 * PI * x).sin(),
                    Axis::K => 0.0,
                }
            }
            _ => 0.0,
        }
    }
}
