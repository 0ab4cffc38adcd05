use crate::field::Field;
use crate::grid::Grid;
use crate::hydro::limiter::SlopeLimiter;
use crate::hydro::state::{Conserved, Primitive, IA};
use crate::index_space::{Axis, Index};
use super::magnetic::slope_slot;




/// Side of a cell along one axis.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Low,
    High,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Low, Side::High];

    pub fn sign(self) -> f64 {
        match self {
            Side::Low => -1.0,
            Side::High => 1.0,
        }
    }

    fn index(self) -> usize {
        match self {
            Side::Low => 0,
            Side::High => 1,
        }
    }
}

/// One of the four corners of a cell in the plane transverse to an edge
/// direction. With `(a, b)` the transverse axes, `a` is the side along the
/// first and `b` the side along the second.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Corner {
    pub a: Side,
    pub b: Side,
}

impl Corner {
    pub const LB: Corner = Corner { a: Side::Low, b: Side::Low };
    pub const LT: Corner = Corner { a: Side::Low, b: Side::High };
    pub const RB: Corner = Corner { a: Side::High, b: Side::Low };
    pub const RT: Corner = Corner { a: Side::High, b: Side::High };
    pub const ALL: [Corner; 4] = [Corner::LB, Corner::LT, Corner::RB, Corner::RT];

    fn index(self) -> usize {
        self.a.index() * 2 + self.b.index()
    }
}




/**
 * Source of the reconstructed primitive states at the faces and corners of a
 * cell. Face states feed the one-dimensional Riemann solver; corner states
 * feed the two-dimensional EMF solver.
 */
pub trait Reconstruction: Sync {
    fn face_state(&self, index: Index, axis: Axis, side: Side) -> Primitive;
    fn corner_state(&self, index: Index, edge: Axis, corner: Corner) -> Primitive;
}




/**
 * Face-centered magnetic data supplying the normal components of the
 * reconstructed states in MHD runs: either the half-step face field with its
 * transverse slopes, or the time-n stored field with none.
 */
#[derive(Clone, Copy)]
pub struct FaceField<'a> {
    values: &'a Field,
    first: usize,
    slopes: Option<&'a Field>,
}

impl<'a> FaceField<'a> {
    pub fn half_step(face_b: &'a Field, slopes: &'a Field) -> Self {
        Self { values: face_b, first: 0, slopes: Some(slopes) }
    }

    pub fn time_n(u: &'a Field) -> Self {
        Self { values: u, first: IA, slopes: None }
    }

    fn normal(&self, index: Index, c: Axis) -> f64 {
        self.values.get(index, self.first + c.index())
    }

    fn slope(&self, index: Index, c: Axis, along: Axis) -> f64 {
        self.slopes.map_or(0.0, |s| s.get(index, slope_slot(c, along)))
    }

    fn face_state(&self, p: Primitive, index: Index, axis: Axis, side: Side) -> Primitive {
        let face = match side {
            Side::Low => index,
            Side::High => axis.shift(index, 1),
        };
        p.with_magnetic_field(axis.into(), self.normal(face, axis))
    }

    fn corner_state(&self, p: Primitive, index: Index, edge: Axis, corner: Corner) -> Primitive {
        let (a, b) = edge.transverse();
        let face_a = if corner.a == Side::High { a.shift(index, 1) } else { index };
        let face_b = if corner.b == Side::High { b.shift(index, 1) } else { index };
        let ba = self.normal(face_a, a) + 0.5 * corner.b.sign() * self.slope(face_a, a, b);
        let bb = self.normal(face_b, b) + 0.5 * corner.a.sign() * self.slope(face_b, b, a);
        p.with_magnetic_field(a.into(), ba).with_magnetic_field(b.into(), bb)
    }
}




/**
 * Parameters shared by every cell of one MUSCL-Hancock trace.
 */
#[derive(Clone, Copy)]
pub struct TraceParams<'a> {
    pub grid: &'a Grid,
    pub limiter: SlopeLimiter,
    pub courant: [f64; 3],
    pub gamma_law_index: f64,
    pub magnetic: Option<FaceField<'a>>,
}




// ============================================================================
/// Limited slopes of the primitive state of a cell along each axis, zero on
/// inactive axes.
///
pub fn limited_slopes(q: &Field, index: Index, grid: &Grid, limiter: SlopeLimiter) -> [Primitive; 3] {
    let mut slopes = [Primitive::default(); 3];
    let q0 = q.get_slice(index);

    for &axis in grid.dimension.axes() {
        let ql = q.get_slice(axis.shift(index, -1));
        let qr = q.get_slice(axis.shift(index, 1));
        let s = &mut slopes[axis.index()];

        for n in 0..q0.len() {
            s.0[n] = limiter.slope(ql[n], q0[n], qr[n]);
        }
    }
    slopes
}

/// Conserved increment of the half-step predictor,
/// `-(dt / 2) sum_a (F_a(q + dq_a / 2) - F_a(q - dq_a / 2)) / dx_a`.
///
pub fn half_step_increment(q0: &Primitive, slopes: &[Primitive; 3], params: &TraceParams) -> Conserved {
    let mut du = Conserved::default();

    for &axis in params.grid.dimension.axes() {
        let dq = slopes[axis.index()] * 0.5;
        let fp = (*q0 + dq).flux_vector(axis.into(), params.gamma_law_index);
        let fm = (*q0 - dq).flux_vector(axis.into(), params.gamma_law_index);
        du = du - (fp - fm) * (0.5 * params.courant[axis.index()]);
    }
    du
}

/// The state at a point `offsets` (in cell widths) from the cell center,
/// advanced by the half-step increment.
///
pub fn extrapolate(q0: &Primitive, slopes: &[Primitive; 3], offsets: [f64; 3], du: &Conserved, gamma_law_index: f64) -> Primitive {
    let mut w = *q0;

    for (slope, &offset) in slopes.iter().zip(offsets.iter()) {
        if offset != 0.0 {
            w = w + *slope * offset;
        }
    }
    (w.to_conserved(gamma_law_index) + *du).to_primitive(gamma_law_index)
}

fn face_from_parts(q0: &Primitive, slopes: &[Primitive; 3], du: &Conserved, index: Index, axis: Axis, side: Side, params: &TraceParams) -> Primitive {
    let mut offsets = [0.0; 3];
    offsets[axis.index()] = 0.5 * side.sign();
    let p = extrapolate(q0, slopes, offsets, du, params.gamma_law_index);

    match params.magnetic {
        Some(m) => m.face_state(p, index, axis, side),
        None => p,
    }
}

fn corner_from_parts(q0: &Primitive, slopes: &[Primitive; 3], du: &Conserved, index: Index, edge: Axis, corner: Corner, params: &TraceParams) -> Primitive {
    let (a, b) = edge.transverse();
    let mut offsets = [0.0; 3];
    offsets[a.index()] = 0.5 * corner.a.sign();
    offsets[b.index()] = 0.5 * corner.b.sign();
    let p = extrapolate(q0, slopes, offsets, du, params.gamma_law_index);

    match params.magnetic {
        Some(m) => m.corner_state(p, index, edge, corner),
        None => p,
    }
}

/// Zero the components a field with `nq` stored components does not carry.
///
fn truncate(mut p: Primitive, nq: usize) -> Primitive {
    for x in p.0[nq..].iter_mut() {
        *x = 0.0;
    }
    p
}

fn face_slot(axis: Axis, side: Side) -> usize {
    axis.index() * 2 + side.index()
}

fn corner_slot(edge: Axis, corner: Corner) -> usize {
    6 + edge.index() * 4 + corner.index()
}




// ============================================================================
/// Number of components per cell of the stored trace: six face states, plus
/// twelve corner states when corners are needed.
///
pub fn stored_trace_components(nq: usize, with_corners: bool) -> usize {
    if with_corners {
        18 * nq
    } else {
        6 * nq
    }
}

/**
 * Run the MUSCL-Hancock trace over the cells which need interface states,
 * storing every face state (and, for MHD, every corner state) of each cell.
 */
pub fn compute_stored_trace(q: &Field, trace: &mut Field, params: &TraceParams) {
    let nq = q.num_fields();
    let region = params.grid.trace_space();

    trace.par_for_each_in(&region, |index, out| {
        let q0 = Primitive::from_slice(q.get_slice(index));
        let slopes = limited_slopes(q, index, params.grid, params.limiter);
        let du = half_step_increment(&q0, &slopes, params);

        for &axis in params.grid.dimension.axes() {
            for &side in Side::ALL.iter() {
                let s = face_slot(axis, side) * nq;
                face_from_parts(&q0, &slopes, &du, index, axis, side, params).write_to_slice(&mut out[s..s + nq]);
            }
        }
        if params.magnetic.is_some() {
            for &edge in Axis::ALL.iter().filter(|&&e| params.grid.has_edge(e)) {
                for &corner in Corner::ALL.iter() {
                    let s = corner_slot(edge, corner) * nq;
                    corner_from_parts(&q0, &slopes, &du, index, edge, corner, params).write_to_slice(&mut out[s..s + nq]);
                }
            }
        }
    })
}

/// Interface states read back from a stored trace.
///
pub struct StoredTrace<'a> {
    trace: &'a Field,
    nq: usize,
}

impl<'a> StoredTrace<'a> {
    pub fn new(trace: &'a Field, nq: usize) -> Self {
        Self { trace, nq }
    }

    fn load(&self, index: Index, slot: usize) -> Primitive {
        let s = slot * self.nq;
        Primitive::from_slice(&self.trace.get_slice(index)[s..s + self.nq])
    }
}

impl<'a> Reconstruction for StoredTrace<'a> {
    fn face_state(&self, index: Index, axis: Axis, side: Side) -> Primitive {
        self.load(index, face_slot(axis, side))
    }

    fn corner_state(&self, index: Index, edge: Axis, corner: Corner) -> Primitive {
        self.load(index, corner_slot(edge, corner))
    }
}




// ============================================================================
/// Number of components per cell of the fused trace: three slopes and the
/// half-step increment.
///
pub fn fused_trace_components(nq: usize) -> usize {
    4 * nq
}

/**
 * Store the limited slopes and half-step increment of each cell, from which
 * the interface states are rebuilt on demand during the flux pass.
 */
pub fn compute_fused_trace(q: &Field, store: &mut Field, params: &TraceParams) {
    let nq = q.num_fields();
    let region = params.grid.trace_space();

    store.par_for_each_in(&region, |index, out| {
        let q0 = Primitive::from_slice(q.get_slice(index));
        let slopes = limited_slopes(q, index, params.grid, params.limiter);
        let du = half_step_increment(&q0, &slopes, params);

        for (n, slope) in slopes.iter().enumerate() {
            slope.write_to_slice(&mut out[n * nq..(n + 1) * nq]);
        }
        du.write_to_slice(&mut out[3 * nq..4 * nq]);
    })
}

/// Interface states rebuilt from stored slopes. The states are identical, bit
/// for bit, to those of the stored trace.
///
pub struct FusedTrace<'a> {
    q: &'a Field,
    store: &'a Field,
    params: TraceParams<'a>,
}

impl<'a> FusedTrace<'a> {
    pub fn new(q: &'a Field, store: &'a Field, params: TraceParams<'a>) -> Self {
        Self { q, store, params }
    }

    fn load(&self, index: Index) -> (Primitive, [Primitive; 3], Conserved) {
        let nq = self.q.num_fields();
        let s = self.store.get_slice(index);
        let slopes = [
            Primitive::from_slice(&s[0..nq]),
            Primitive::from_slice(&s[nq..2 * nq]),
            Primitive::from_slice(&s[2 * nq..3 * nq]),
        ];
        let du = Conserved::from_slice(&s[3 * nq..4 * nq]);
        (Primitive::from_slice(self.q.get_slice(index)), slopes, du)
    }
}

impl<'a> Reconstruction for FusedTrace<'a> {
    fn face_state(&self, index: Index, axis: Axis, side: Side) -> Primitive {
        let (q0, slopes, du) = self.load(index);
        let p = face_from_parts(&q0, &slopes, &du, index, axis, side, &self.params);
        truncate(p, self.q.num_fields())
    }

    fn corner_state(&self, index: Index, edge: Axis, corner: Corner) -> Primitive {
        let (q0, slopes, du) = self.load(index);
        let p = corner_from_parts(&q0, &slopes, &du, index, edge, corner, &self.params);
        truncate(p, self.q.num_fields())
    }
}




// ============================================================================
/// Piecewise-constant states: the cell's own primitive state on every face
/// and corner, with the time-n face field for MHD. This is the fallback
/// scheme of the a-posteriori correction.
///
pub struct FirstOrder<'a> {
    q: &'a Field,
    magnetic: Option<FaceField<'a>>,
}

impl<'a> FirstOrder<'a> {
    pub fn new(q: &'a Field, magnetic: Option<FaceField<'a>>) -> Self {
        Self { q, magnetic }
    }
}

impl<'a> Reconstruction for FirstOrder<'a> {
    fn face_state(&self, index: Index, axis: Axis, side: Side) -> Primitive {
        let p = Primitive::from_slice(self.q.get_slice(index));
        match self.magnetic {
            Some(m) => m.face_state(p, index, axis, side),
            None => p,
        }
    }

    fn corner_state(&self, index: Index, edge: Axis, corner: Corner) -> Primitive {
        let p = Primitive::from_slice(self.q.get_slice(index));
        match self.magnetic {
            Some(m) => m.corner_state(p, index, edge, corner),
            None => p,
        }
    }
}
