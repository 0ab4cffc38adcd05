use crate::config::{Physics, RiemannSolverKind};
use std::error;
use std::fmt;
use std::io;




/**
 * Error to represent a failed run: a rejected configuration, a time step
 * that cannot be computed, a step that could not be repaired, or a failure to
 * write output.
 */
#[derive(Debug)]
pub enum Error {
    InvalidConfig(String),
    UnknownProblem(String),
    UnsupportedSolver {
        solver: RiemannSolverKind,
        physics: Physics,
    },
    InvalidTimeStep(f64),
    MoodRetryExhausted {
        iteration: u64,
        flagged: usize,
    },
    Io(io::Error),
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        use Error::*;

        match self {
            InvalidConfig(reason) => write!(fmt, "invalid configuration: {}", reason),
            UnknownProblem(name) => write!(fmt, "unknown problem: {}", name),
            UnsupportedSolver { solver, physics } => {
                write!(fmt, "riemann solver {:?} does not support {:?}", solver, physics)
            }
            InvalidTimeStep(inverse_dt) => {
                write!(fmt, "cannot form a time step from inverse dt {}", inverse_dt)
            }
            MoodRetryExhausted { iteration, flagged } => write!(
                fmt,
                "{} cell(s) still invalid after fallback on iteration {}",
                flagged, iteration
            ),
            Io(e) => write!(fmt, "i/o error: {}", e),
            Serialization(reason) => write!(fmt, "serialization error: {}", reason),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
