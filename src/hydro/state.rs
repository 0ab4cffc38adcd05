use std::ops::{Add, Div, Mul, Sub};
use super::error::Error;
use super::geometry::{Direction, Vector3d};




// ============================================================================
/// Number of slots in the in-register state. Stored fields hold a prefix of
/// these: 4 for 2D hydro, 5 for 3D hydro and 8 for MHD.
pub const NUM_COMPONENTS: usize = 8;

pub const ID: usize = 0;
pub const IE: usize = 1;
pub const IP: usize = 1;
pub const IU: usize = 2;
pub const IV: usize = 3;
pub const IW: usize = 4;
pub const IA: usize = 5;
pub const IB: usize = 6;
pub const IC: usize = 7;

pub const COMPONENT_NAMES: [&str; NUM_COMPONENTS] =
    ["rho", "energy", "mx", "my", "mz", "bx", "by", "bz"];

pub fn momentum_component(direction: Direction) -> usize {
    IU + direction.index()
}

pub fn magnetic_component(direction: Direction) -> usize {
    IA + direction.index()
}




/**
 * Conserved densities: mass, total energy, momentum and magnetic field.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Conserved(pub [f64; NUM_COMPONENTS]);

/**
 * Primitive variables: mass density, gas pressure, velocity and magnetic
 * field. Pressure occupies the energy slot.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Primitive(pub [f64; NUM_COMPONENTS]);




// ============================================================================
impl Conserved {

    /**
     * Load a state from a stored cell. Missing trailing components are zero.
     */
    pub fn from_slice(cons: &[f64]) -> Self {
        let mut u = [0.0; NUM_COMPONENTS];
        u[..cons.len()].copy_from_slice(cons);
        Self(u)
    }

    pub fn write_to_slice(&self, cons: &mut [f64]) {
        let n = cons.len();
        cons.copy_from_slice(&self.0[..n]);
    }

    pub fn mass_density(&self) -> f64 {
        self.0[ID]
    }

    pub fn energy_density(&self) -> f64 {
        self.0[IE]
    }

    pub fn momentum_1(&self) -> f64 {
        self.0[IU]
    }

    pub fn momentum_2(&self) -> f64 {
        self.0[IV]
    }

    pub fn momentum_3(&self) -> f64 {
        self.0[IW]
    }

    pub fn momentum(&self, direction: Direction) -> f64 {
        self.0[momentum_component(direction)]
    }

    pub fn momentum_vector(&self) -> Vector3d {
        Vector3d::new(self.momentum_1(), self.momentum_2(), self.momentum_3())
    }

    pub fn magnetic_field(&self, direction: Direction) -> f64 {
        self.0[magnetic_component(direction)]
    }

    pub fn magnetic_field_vector(&self) -> Vector3d {
        Vector3d::new(self.0[IA], self.0[IB], self.0[IC])
    }

    pub fn momentum_squared(&self) -> f64 {
        let m = self.momentum_vector();
        m.dot(&m)
    }

    pub fn magnetic_energy_density(&self) -> f64 {
        let b = self.magnetic_field_vector();
        0.5 * b.dot(&b)
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }

    /**
     * Recover primitive variables. Non-physical results (negative density or
     * pressure) are passed through unmodified.
     */
    pub fn to_primitive(&self, gamma_law_index: f64) -> Primitive {
        let d = self.mass_density();
        let ek = 0.5 * self.momentum_squared() / d;
        let et = self.energy_density() - ek - self.magnetic_energy_density();
        let pg = et * (gamma_law_index - 1.0);
        let v1 = self.momentum_1() / d;
        let v2 = self.momentum_2() / d;
        let v3 = self.momentum_3() / d;

        Primitive([d, pg, v1, v2, v3, self.0[IA], self.0[IB], self.0[IC]])
    }

    /**
     * Recover primitive variables, rejecting states with negative density or
     * pressure, or with any non-finite value.
     */
    pub fn validate(&self, gamma_law_index: f64) -> Result<Primitive, Error> {
        if let Some(q) = self.0.iter().position(|x| !x.is_finite()) {
            return Err(Error::NonFinite(q));
        }
        let p = self.to_primitive(gamma_law_index);

        if p.mass_density() < 0.0 {
            Err(Error::NegativeMassDensity(p.mass_density()))
        } else if p.gas_pressure() < 0.0 {
            Err(Error::NegativeGasPressure(p.gas_pressure()))
        } else if let Some(q) = p.0.iter().position(|x| !x.is_finite()) {
            Err(Error::NonFinite(q))
        } else {
            Ok(p)
        }
    }
}




// ============================================================================
impl Primitive {

    pub fn new(mass_density: f64, gas_pressure: f64, velocity: Vector3d, magnetic_field: Vector3d) -> Self {
        Self([
            mass_density,
            gas_pressure,
            velocity.0,
            velocity.1,
            velocity.2,
            magnetic_field.0,
            magnetic_field.1,
            magnetic_field.2,
        ])
    }

    pub fn from_slice(prim: &[f64]) -> Self {
        let mut p = [0.0; NUM_COMPONENTS];
        p[..prim.len()].copy_from_slice(prim);
        Self(p)
    }

    pub fn write_to_slice(&self, prim: &mut [f64]) {
        let n = prim.len();
        prim.copy_from_slice(&self.0[..n]);
    }

    pub fn mass_density(&self) -> f64 {
        self.0[ID]
    }

    pub fn gas_pressure(&self) -> f64 {
        self.0[IP]
    }

    pub fn velocity_1(&self) -> f64 {
        self.0[IU]
    }

    pub fn velocity_2(&self) -> f64 {
        self.0[IV]
    }

    pub fn velocity_3(&self) -> f64 {
        self.0[IW]
    }

    pub fn velocity(&self, direction: Direction) -> f64 {
        self.0[momentum_component(direction)]
    }

    pub fn velocity_vector(&self) -> Vector3d {
        Vector3d::new(self.velocity_1(), self.velocity_2(), self.velocity_3())
    }

    pub fn magnetic_field(&self, direction: Direction) -> f64 {
        self.0[magnetic_component(direction)]
    }

    pub fn magnetic_field_vector(&self) -> Vector3d {
        Vector3d::new(self.0[IA], self.0[IB], self.0[IC])
    }

    /**
     * Return this state with one magnetic field component replaced.
     */
    pub fn with_magnetic_field(mut self, direction: Direction, value: f64) -> Self {
        self.0[magnetic_component(direction)] = value;
        self
    }

    pub fn velocity_squared(&self) -> f64 {
        let v = self.velocity_vector();
        v.dot(&v)
    }

    pub fn magnetic_pressure(&self) -> f64 {
        let b = self.magnetic_field_vector();
        0.5 * b.dot(&b)
    }

    pub fn total_pressure(&self) -> f64 {
        self.gas_pressure() + self.magnetic_pressure()
    }

    pub fn sound_speed_squared(&self, gamma_law_index: f64) -> f64 {
        gamma_law_index * self.gas_pressure() / self.mass_density()
    }

    /**
     * Fast magnetosonic speed for propagation along the given direction. This
     * is the sound speed when the magnetic field vanishes.
     */
    pub fn fast_magnetosonic_speed(&self, direction: Direction, gamma_law_index: f64) -> f64 {
        let d = self.mass_density();
        let cs2 = self.sound_speed_squared(gamma_law_index);
        let b2 = 2.0 * self.magnetic_pressure() / d;
        let bn = self.magnetic_field(direction);
        let bn2 = bn * bn / d;
        let a = cs2 + b2;
        let disc = (a * a - 4.0 * cs2 * bn2).max(0.0);
        (0.5 * (a + disc.sqrt())).max(0.0).sqrt()
    }

    pub fn outer_wavespeeds(&self, direction: Direction, gamma_law_index: f64) -> (f64, f64) {
        let cf = self.fast_magnetosonic_speed(direction, gamma_law_index);
        let vn = self.velocity(direction);
        (vn - cf, vn + cf)
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|x| x.is_finite())
    }

    pub fn to_conserved(&self, gamma_law_index: f64) -> Conserved {
        let d = self.mass_density();
        let p = self.gas_pressure();
        let vsq = self.velocity_squared();

        Conserved([
            d,
            d * vsq * 0.5 + p / (gamma_law_index - 1.0) + self.magnetic_pressure(),
            d * self.velocity_1(),
            d * self.velocity_2(),
            d * self.velocity_3(),
            self.0[IA],
            self.0[IB],
            self.0[IC],
        ])
    }

    /**
     * Physical flux of the ideal MHD equations through a face normal to the
     * given direction. With a vanishing magnetic field this is the Euler flux.
     */
    pub fn flux_vector(&self, direction: Direction, gamma_law_index: f64) -> Conserved {
        let n = direction.index();
        let d = self.mass_density();
        let v = [self.velocity_1(), self.velocity_2(), self.velocity_3()];
        let b = [self.0[IA], self.0[IB], self.0[IC]];
        let vn = v[n];
        let bn = b[n];
        let pt = self.total_pressure();
        let vb = v[0] * b[0] + v[1] * b[1] + v[2] * b[2];
        let u = self.to_conserved(gamma_law_index);

        let mut f = [0.0; NUM_COMPONENTS];
        f[ID] = d * vn;
        f[IE] = (u.energy_density() + pt) * vn - bn * vb;

        for k in 0..3 {
            let delta = if k == n { 1.0 } else { 0.0 };
            f[IU + k] = d * v[k] * vn - b[k] * bn + pt * delta;
            f[IA + k] = b[k] * vn - bn * v[k];
        }
        Conserved(f)
    }

    /**
     * Mirror this state through a plane normal to the given direction.
     */
    pub fn reflect(&self, direction: Direction) -> Primitive {
        let mut p = self.0;
        p[momentum_component(direction)] *= -1.0;
        p[magnetic_component(direction)] *= -1.0;
        Primitive(p)
    }
}




// ============================================================================
macro_rules! impl_state_arithmetic {
    ($state:ident) => {
        impl Add<$state> for $state {
            type Output = Self;
            fn add(self, u: Self) -> Self {
                let mut a = self.0;
                for (x, y) in a.iter_mut().zip(u.0.iter()) {
                    *x += y;
                }
                Self(a)
            }
        }

        impl Sub<$state> for $state {
            type Output = Self;
            fn sub(self, u: Self) -> Self {
                let mut a = self.0;
                for (x, y) in a.iter_mut().zip(u.0.iter()) {
                    *x -= y;
                }
                Self(a)
            }
        }

        impl Mul<f64> for $state {
            type Output = Self;
            fn mul(self, s: f64) -> Self {
                let mut a = self.0;
                for x in a.iter_mut() {
                    *x *= s;
                }
                Self(a)
            }
        }

        impl Div<f64> for $state {
            type Output = Self;
            fn div(self, s: f64) -> Self {
                let mut a = self.0;
                for x in a.iter_mut() {
                    *x /= s;
                }
                Self(a)
            }
        }
    };
}

impl_state_arithmetic!(Conserved);
impl_state_arithmetic!(Primitive);
