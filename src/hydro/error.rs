use std::error;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]

/**
 * Error to represent invalid hydrodynamics data or primitive variable recovery.
 */
pub enum Error {
    NegativeGasPressure(f64),
    NegativeMassDensity(f64),
    NonFinite(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        use Error::*;

        match self {
            NegativeGasPressure(p) => write!(fmt, "negative gas pressure: {}", p),
            NegativeMassDensity(d) => write!(fmt, "negative mass density: {}", d),
            NonFinite(q) => write!(fmt, "non-finite value in component {}", q),
        }
    }
}

impl error::Error for Error {}
