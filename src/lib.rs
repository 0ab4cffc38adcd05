//! Godunov is a second-order finite-volume solver for the Euler equations of
//! gas dynamics and the equations of ideal magnetohydrodynamics, on uniform
//! two- and three-dimensional grids. Interface states are reconstructed with
//! limited linear slopes and a MUSCL-Hancock predictor; the magnetic field is
//! stored on cell faces and advanced by constrained transport, so that its
//! discrete divergence is preserved to round-off. Steps whose tentative
//! update leaves cells with non-physical states are repaired a posteriori by
//! recomputing the offending fluxes at first order.

pub mod config;
pub mod error;
pub mod field;
pub mod grid;
pub mod hydro;
pub mod index_space;
pub mod output;
pub mod problems;
pub mod solvers;

pub use config::Config;
pub use error::Error;
pub use solvers::MusclSolver;
