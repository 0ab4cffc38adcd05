use serde::{Deserialize, Serialize};
use super::geometry::Direction;
use super::state::{Conserved, Primitive, IA, IE, ID, IU, IV, IW, IB, IC};




/**
 * An approximate Riemann solver: given the states on either side of a face
 * normal to `direction`, return the Godunov flux through the face.
 */
pub trait RiemannSolver: Send + Sync {
    fn flux(&self, pl: &Primitive, pr: &Primitive, direction: Direction, gamma_law_index: f64) -> Conserved;
}




/**
 * Names of the available Riemann solvers.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiemannSolverKind {
    Hll,
    Hllc,
    Hlld,
    Rusanov,
}

pub struct Hll;
pub struct Hllc;
pub struct Hlld;
pub struct Rusanov;

static HLL: Hll = Hll;
static HLLC: Hllc = Hllc;
static HLLD: Hlld = Hlld;
static RUSANOV: Rusanov = Rusanov;




// ============================================================================
impl RiemannSolverKind {

    pub fn solver(self) -> &'static dyn RiemannSolver {
        match self {
            RiemannSolverKind::Hll => &HLL,
            RiemannSolverKind::Hllc => &HLLC,
            RiemannSolverKind::Hlld => &HLLD,
            RiemannSolverKind::Rusanov => &RUSANOV,
        }
    }

    /**
     * Whether the solver is valid for a magnetized gas. HLLC ignores the
     * magnetic field and is restricted to hydrodynamics.
     */
    pub fn supports_mhd(self) -> bool {
        !matches!(self, RiemannSolverKind::Hllc)
    }
}

impl std::str::FromStr for RiemannSolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hll" | "hlle" => Ok(RiemannSolverKind::Hll),
            "hllc" => Ok(RiemannSolverKind::Hllc),
            "hlld" => Ok(RiemannSolverKind::Hlld),
            "rusanov" | "llf" => Ok(RiemannSolverKind::Rusanov),
            _ => Err(format!("unknown riemann solver: {}", s)),
        }
    }
}

impl RiemannSolver for Hll {
    fn flux(&self, pl: &Primitive, pr: &Primitive, direction: Direction, gamma_law_index: f64) -> Conserved {
        riemann_hll(pl, pr, direction, gamma_law_index)
    }
}

impl RiemannSolver for Hllc {
    fn flux(&self, pl: &Primitive, pr: &Primitive, direction: Direction, gamma_law_index: f64) -> Conserved {
        riemann_hllc(pl, pr, direction, gamma_law_index)
    }
}

impl RiemannSolver for Hlld {
    fn flux(&self, pl: &Primitive, pr: &Primitive, direction: Direction, gamma_law_index: f64) -> Conserved {
        riemann_hlld(pl, pr, direction, gamma_law_index)
    }
}

impl RiemannSolver for Rusanov {
    fn flux(&self, pl: &Primitive, pr: &Primitive, direction: Direction, gamma_law_index: f64) -> Conserved {
        riemann_rusanov(pl, pr, direction, gamma_law_index)
    }
}




// ============================================================================
pub fn riemann_hll(pl: &Primitive, pr: &Primitive, direction: Direction, gamma_law_index: f64) -> Conserved {
    let ul = pl.to_conserved(gamma_law_index);
    let ur = pr.to_conserved(gamma_law_index);
    let fl = pl.flux_vector(direction, gamma_law_index);
    let fr = pr.flux_vector(direction, gamma_law_index);

    let (alm, alp) = pl.outer_wavespeeds(direction, gamma_law_index);
    let (arm, arp) = pr.outer_wavespeeds(direction, gamma_law_index);
    let ap = alp.max(arp).max(0.0);
    let am = alm.min(arm).min(0.0);

    (fl * ap - fr * am - (ul - ur) * ap * am) / (ap - am)
}

pub fn riemann_rusanov(pl: &Primitive, pr: &Primitive, direction: Direction, gamma_law_index: f64) -> Conserved {
    let ul = pl.to_conserved(gamma_law_index);
    let ur = pr.to_conserved(gamma_law_index);
    let fl = pl.flux_vector(direction, gamma_law_index);
    let fr = pr.flux_vector(direction, gamma_law_index);

    let sl = pl.velocity(direction).abs() + pl.fast_magnetosonic_speed(direction, gamma_law_index);
    let sr = pr.velocity(direction).abs() + pr.fast_magnetosonic_speed(direction, gamma_law_index);
    let smax = sl.max(sr);

    (fl + fr) * 0.5 - (ur - ul) * (0.5 * smax)
}




// ============================================================================
fn to_normal_frame(p: &Primitive, direction: Direction) -> Primitive {
    let perm = direction.normal_frame();
    let mut q = p.0;
    for m in 0..3 {
        q[IU + m] = p.0[IU + perm[m]];
        q[IA + m] = p.0[IA + perm[m]];
    }
    Primitive(q)
}

fn from_normal_frame(f: Conserved, direction: Direction) -> Conserved {
    let perm = direction.normal_frame();
    let mut g = f.0;
    for m in 0..3 {
        g[IU + perm[m]] = f.0[IU + m];
        g[IA + perm[m]] = f.0[IA + m];
    }
    Conserved(g)
}

/**
 * HLLC solver for the Euler equations (Toro, Spruce & Speares 1994). The
 * magnetic field of the input states is ignored.
 */
pub fn riemann_hllc(pl: &Primitive, pr: &Primitive, direction: Direction, gamma_law_index: f64) -> Conserved {
    let l = to_normal_frame(pl, direction);
    let r = to_normal_frame(pr, direction);
    let n = Direction::I;

    let ul = l.to_conserved(gamma_law_index);
    let ur = r.to_conserved(gamma_law_index);
    let fl = l.flux_vector(n, gamma_law_index);
    let fr = r.flux_vector(n, gamma_law_index);

    let (alm, alp) = l.outer_wavespeeds(n, gamma_law_index);
    let (arm, arp) = r.outer_wavespeeds(n, gamma_law_index);
    let sl = alm.min(arm);
    let sr = alp.max(arp);

    let flux = if sl >= 0.0 {
        fl
    } else if sr <= 0.0 {
        fr
    } else {
        let (dl, vl, pgl) = (l.mass_density(), l.velocity_1(), l.gas_pressure());
        let (dr, vr, pgr) = (r.mass_density(), r.velocity_1(), r.gas_pressure());
        let ss = (pgr - pgl + dl * vl * (sl - vl) - dr * vr * (sr - vr))
            / (dl * (sl - vl) - dr * (sr - vr));

        let star = |p: &Primitive, u: &Conserved, s: f64| {
            let d = p.mass_density();
            let v = p.velocity_1();
            let c = d * ((s - v) / (s - ss));
            let mut q = [0.0; 8];
            q[ID] = c;
            q[IE] = c * (u.energy_density() / d + (ss - v) * (ss + p.gas_pressure() / (d * (s - v))));
            q[IU] = c * ss;
            q[IV] = c * p.velocity_2();
            q[IW] = c * p.velocity_3();
            Conserved(q)
        };

        if ss >= 0.0 {
            fl + (star(&l, &ul, sl) - ul) * sl
        } else {
            fr + (star(&r, &ur, sr) - ur) * sr
        }
    };

    let mut flux = flux;
    flux.0[IA] = 0.0;
    flux.0[IB] = 0.0;
    flux.0[IC] = 0.0;
    from_normal_frame(flux, direction)
}




// ============================================================================
/**
 * HLLD solver for ideal MHD (Miyoshi & Kusano 2005). With no magnetic field
 * the rotational discontinuities collapse onto the contact and the solver
 * resolves contacts exactly, like HLLC.
 */
pub fn riemann_hlld(pl: &Primitive, pr: &Primitive, direction: Direction, gamma_law_index: f64) -> Conserved {
    let n = Direction::I;
    let l0 = to_normal_frame(pl, direction);
    let r0 = to_normal_frame(pr, direction);
    let bx = 0.5 * (l0.magnetic_field(n) + r0.magnetic_field(n));
    let l = l0.with_magnetic_field(n, bx);
    let r = r0.with_magnetic_field(n, bx);

    let ul = l.to_conserved(gamma_law_index);
    let ur = r.to_conserved(gamma_law_index);
    let fl = l.flux_vector(n, gamma_law_index);
    let fr = r.flux_vector(n, gamma_law_index);

    let (alm, alp) = l.outer_wavespeeds(n, gamma_law_index);
    let (arm, arp) = r.outer_wavespeeds(n, gamma_law_index);
    let sl = alm.min(arm);
    let sr = alp.max(arp);

    if sl >= 0.0 {
        return from_normal_frame(fl, direction);
    }
    if sr <= 0.0 {
        return from_normal_frame(fr, direction);
    }

    let (dl, vl, ptl) = (l.mass_density(), l.velocity_1(), l.total_pressure());
    let (dr, vr, ptr) = (r.mass_density(), r.velocity_1(), r.total_pressure());
    let denom = (sr - vr) * dr - (sl - vl) * dl;
    let sm = ((sr - vr) * dr * vr - (sl - vl) * dl * vl - ptr + ptl) / denom;
    let pt_star = ((sr - vr) * dr * ptl - (sl - vl) * dl * ptr + dl * dr * (sr - vr) * (sl - vl) * (vr - vl)) / denom;

    let star_l = hlld_star_state(&l, &ul, sl, sm, pt_star, bx);
    let star_r = hlld_star_state(&r, &ur, sr, sm, pt_star, bx);
    let s_star_l = sm - bx.abs() / star_l.mass_density().sqrt();
    let s_star_r = sm + bx.abs() / star_r.mass_density().sqrt();

    let flux = if sm >= 0.0 {
        let f_star_l = fl + (star_l - ul) * sl;
        if s_star_l >= 0.0 {
            f_star_l
        } else {
            let (dstar_l, _) = hlld_double_star_states(&star_l, &star_r, sm, bx);
            f_star_l + (dstar_l - star_l) * s_star_l
        }
    } else {
        let f_star_r = fr + (star_r - ur) * sr;
        if s_star_r <= 0.0 {
            f_star_r
        } else {
            let (_, dstar_r) = hlld_double_star_states(&star_l, &star_r, sm, bx);
            f_star_r + (dstar_r - star_r) * s_star_r
        }
    };
    from_normal_frame(flux, direction)
}

fn dot_vb(u: &Conserved) -> f64 {
    let d = u.mass_density();
    (u.0[IU] * u.0[IA] + u.0[IV] * u.0[IB] + u.0[IW] * u.0[IC]) / d
}

fn hlld_star_state(p: &Primitive, u: &Conserved, s: f64, sm: f64, pt_star: f64, bx: f64) -> Conserved {
    let d = p.mass_density();
    let v = p.velocity_1();
    let d_star = d * ((s - v) / (s - sm));
    let denom = d * (s - v) * (s - sm) - bx * bx;

    let (vy, vz, by, bz) = if denom.abs() <= 1e-12 * (d * (s - v).abs() * (s - sm).abs() + bx * bx) {
        (p.velocity_2(), p.velocity_3(), p.0[IB], p.0[IC])
    } else {
        let f = bx * (sm - v) / denom;
        let g = (d * (s - v) * (s - v) - bx * bx) / denom;
        (
            p.velocity_2() - p.0[IB] * f,
            p.velocity_3() - p.0[IC] * f,
            p.0[IB] * g,
            p.0[IC] * g,
        )
    };
    let vb = v * bx + p.velocity_2() * p.0[IB] + p.velocity_3() * p.0[IC];
    let vb_star = sm * bx + vy * by + vz * bz;
    let e_star = ((s - v) * u.energy_density() - p.total_pressure() * v + pt_star * sm + bx * (vb - vb_star)) / (s - sm);

    Conserved([d_star, e_star, d_star * sm, d_star * vy, d_star * vz, bx, by, bz])
}

fn hlld_double_star_states(star_l: &Conserved, star_r: &Conserved, sm: f64, bx: f64) -> (Conserved, Conserved) {
    let dl = star_l.mass_density();
    let dr = star_r.mass_density();
    let sql = dl.sqrt();
    let sqr = dr.sqrt();
    let sgn = bx.signum();
    let sum = sql + sqr;

    let (vyl, vzl) = (star_l.0[IV] / dl, star_l.0[IW] / dl);
    let (vyr, vzr) = (star_r.0[IV] / dr, star_r.0[IW] / dr);
    let (byl, bzl) = (star_l.0[IB], star_l.0[IC]);
    let (byr, bzr) = (star_r.0[IB], star_r.0[IC]);

    let vy = (sql * vyl + sqr * vyr + (byr - byl) * sgn) / sum;
    let vz = (sql * vzl + sqr * vzr + (bzr - bzl) * sgn) / sum;
    let by = (sql * byr + sqr * byl + sql * sqr * (vyr - vyl) * sgn) / sum;
    let bz = (sql * bzr + sqr * bzl + sql * sqr * (vzr - vzl) * sgn) / sum;
    let vb = sm * bx + vy * by + vz * bz;

    let el = star_l.energy_density() - sql * (dot_vb(star_l) - vb) * sgn;
    let er = star_r.energy_density() + sqr * (dot_vb(star_r) - vb) * sgn;

    (
        Conserved([dl, el, dl * sm, dl * vy, dl * vz, bx, by, bz]),
        Conserved([dr, er, dr * sm, dr * vy, dr * vz, bx, by, bz]),
    )
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::hydro::geometry::Vector3d;
    use approx::assert_abs_diff_eq;

    const GAMMA: f64 = 5.0 / 3.0;
    const DIRECTIONS: [Direction; 3] = [Direction::I, Direction::J, Direction::K];

    fn gas(d: f64, p: f64, v: (f64, f64, f64)) -> Primitive {
        Primitive::new(d, p, Vector3d::new(v.0, v.1, v.2), Vector3d::default())
    }

    fn plasma() -> Primitive {
        Primitive::new(1.1, 0.7, Vector3d::new(0.2, -0.4, 0.3), Vector3d::new(0.6, 0.5, -0.8))
    }

    fn assert_close(a: &Conserved, b: &Conserved, tolerance: f64) {
        for (x, y) in a.0.iter().zip(b.0.iter()) {
            assert_abs_diff_eq!(*x, *y, epsilon = tolerance);
        }
    }

    #[test]
    fn identical_states_give_the_physical_flux() {
        let hydro = gas(1.3, 0.9, (0.4, -0.1, 0.25));
        for &kind in &[RiemannSolverKind::Hll, RiemannSolverKind::Hllc, RiemannSolverKind::Hlld, RiemannSolverKind::Rusanov] {
            for &direction in DIRECTIONS.iter() {
                let f = kind.solver().flux(&hydro, &hydro, direction, GAMMA);
                assert_close(&f, &hydro.flux_vector(direction, GAMMA), 1e-12);
            }
        }
        for &kind in &[RiemannSolverKind::Hll, RiemannSolverKind::Hlld, RiemannSolverKind::Rusanov] {
            for &direction in DIRECTIONS.iter() {
                let f = kind.solver().flux(&plasma(), &plasma(), direction, GAMMA);
                assert_close(&f, &plasma().flux_vector(direction, GAMMA), 1e-12);
            }
        }
    }

    #[test]
    fn sod_problem_pushes_mass_to_the_right() {
        let pl = gas(1.0, 1.0, (0.0, 0.0, 0.0));
        let pr = gas(0.125, 0.1, (0.0, 0.0, 0.0));
        for &kind in &[RiemannSolverKind::Hll, RiemannSolverKind::Hllc, RiemannSolverKind::Hlld, RiemannSolverKind::Rusanov] {
            let f = kind.solver().flux(&pl, &pr, Direction::I, GAMMA);
            assert!(f.mass_density() > 0.0, "{:?}", kind);
        }
    }

    #[test]
    fn mirrored_problem_gives_mirrored_flux() {
        let pl = gas(1.0, 1.0, (0.3, 0.1, 0.0));
        let pr = gas(0.2, 0.3, (-0.1, 0.2, 0.0));
        for &kind in &[RiemannSolverKind::Hll, RiemannSolverKind::Hllc, RiemannSolverKind::Hlld, RiemannSolverKind::Rusanov] {
            for &direction in DIRECTIONS.iter() {
                let f = kind.solver().flux(&pl, &pr, direction, GAMMA);
                let g = kind.solver().flux(&pr.reflect(direction), &pl.reflect(direction), direction, GAMMA);
                assert_abs_diff_eq!(f.mass_density(), -g.mass_density(), epsilon = 1e-12);
                assert_abs_diff_eq!(f.energy_density(), -g.energy_density(), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn stationary_contact_is_exact_for_hllc_and_hlld() {
        let pl = gas(1.0, 1.0, (0.0, 0.0, 0.0));
        let pr = gas(0.1, 1.0, (0.0, 0.0, 0.0));
        for &direction in DIRECTIONS.iter() {
            let hllc = riemann_hllc(&pl, &pr, direction, GAMMA);
            let hlld = riemann_hlld(&pl, &pr, direction, GAMMA);
            let hll = riemann_hll(&pl, &pr, direction, GAMMA);
            assert_abs_diff_eq!(hllc.mass_density(), 0.0, epsilon = 1e-14);
            assert_abs_diff_eq!(hlld.mass_density(), 0.0, epsilon = 1e-14);
            assert!(hll.mass_density() > 1e-3);
        }
    }

    #[test]
    fn hlld_matches_the_normal_field_invariant() {
        let pl = Primitive::new(1.0, 1.0, Vector3d::new(0.0, 0.0, 0.0), Vector3d::new(0.75, 1.0, 0.0));
        let pr = Primitive::new(0.125, 0.1, Vector3d::new(0.0, 0.0, 0.0), Vector3d::new(0.75, -1.0, 0.0));
        let f = riemann_hlld(&pl, &pr, Direction::I, 2.0);
        assert_eq!(f.magnetic_field(Direction::I), 0.0);
        assert!(f.is_finite());
        assert!(f.mass_density() > 0.0);
    }
}
