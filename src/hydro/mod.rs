//! Single-cell physics of the ideal gamma-law gas, with or without a
//! magnetic field: state conversions, physical fluxes, wave speeds, slope
//! limiters, and the Riemann solvers used at faces and edges.

pub mod emf;
pub mod error;
pub mod geometry;
pub mod limiter;
pub mod riemann;
pub mod state;
