use serde::{Deserialize, Serialize};

/// Slope limiters for piecewise-linear reconstruction. Each takes the
/// backward and forward differences of a cell and returns a limited
/// (undivided) slope which is zero at extrema.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlopeLimiter {
    Minmod,
    MonotonizedCentral,
    VanLeer,
}

impl SlopeLimiter {
    pub fn slope(self, left: f64, center: f64, right: f64) -> f64 {
        let a = center - left;
        let b = right - center;

        match self {
            SlopeLimiter::Minmod => minmod(a, b),
            SlopeLimiter::MonotonizedCentral => {
                if a * b <= 0.0 {
                    0.0
                } else {
                    let s = a.signum();
                    s * (2.0 * a.abs()).min(2.0 * b.abs()).min(0.5 * (a + b).abs())
                }
            }
            SlopeLimiter::VanLeer => {
                if a * b <= 0.0 {
                    0.0
                } else {
                    2.0 * a * b / (a + b)
                }
            }
        }
    }
}

impl std::str::FromStr for SlopeLimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "minmod" => Ok(SlopeLimiter::Minmod),
            "mc" | "monotonized_central" => Ok(SlopeLimiter::MonotonizedCentral),
            "van_leer" | "vanleer" => Ok(SlopeLimiter::VanLeer),
            _ => Err(format!("unknown slope limiter: {}", s)),
        }
    }
}

fn minmod(a: f64, b: f64) -> f64 {
    if a * b <= 0.0 {
        0.0
    } else if a.abs() < b.abs() {
        a
    } else {
        b
    }
}
