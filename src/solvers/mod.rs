//! The stages of a finite-volume step on a ghost-padded grid, and the
//! [`muscl::MusclSolver`] which runs them in order.

pub mod boundary;
pub mod cfl;
pub mod flux;
pub mod magnetic;
pub mod mood;
pub mod muscl;
pub mod primitive;
pub mod trace;
pub mod update;

pub use muscl::{MusclSolver, RunSummary, StepReport};
