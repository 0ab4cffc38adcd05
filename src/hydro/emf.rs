use crate::index_space::Axis;
use super::geometry::Direction;
use super::state::Primitive;

/// The four reconstructed states meeting at a cell edge. With `(a, b)` the
/// axes transverse to the edge, `l`/`r` are the states on the low/high side
/// in `a`, and `b`/`t` the states on the low/high side in `b`.
///
#[derive(Clone, Copy, Debug)]
pub struct EdgeStates {
    pub lb: Primitive,
    pub lt: Primitive,
    pub rb: Primitive,
    pub rt: Primitive,
}

/// Component of `E = -v x B` along the given edge direction.
///
pub fn electric_field(p: &Primitive, edge: Axis) -> f64 {
    let (a, b) = edge.transverse();
    let (a, b) = (Direction::from(a), Direction::from(b));
    p.velocity(b) * p.magnetic_field(a) - p.velocity(a) * p.magnetic_field(b)
}

/// Electric field at an edge from a two-dimensional HLL Riemann solver
/// (Londrillo & Del Zanna 2004). Reduces to the one-dimensional HLL flux of
/// the transverse field when the states do not vary across one of the
/// transverse axes.
///
pub fn emf_hll(states: &EdgeStates, edge: Axis, gamma_law_index: f64) -> f64 {
    let (a, b) = edge.transverse();
    let (da, db) = (Direction::from(a), Direction::from(b));
    let all = [&states.lb, &states.lt, &states.rb, &states.rt];

    let mut sl = 0.0f64;
    let mut sr = 0.0f64;
    let mut sb = 0.0f64;
    let mut st = 0.0f64;

    for p in all.iter() {
        let (am, ap) = p.outer_wavespeeds(da, gamma_law_index);
        let (bm, bp) = p.outer_wavespeeds(db, gamma_law_index);
        sl = sl.min(am);
        sr = sr.max(ap);
        sb = sb.min(bm);
        st = st.max(bp);
    }

    let e_lb = electric_field(&states.lb, edge);
    let e_lt = electric_field(&states.lt, edge);
    let e_rb = electric_field(&states.rb, edge);
    let e_rt = electric_field(&states.rt, edge);

    let bb_r = 0.5 * (states.rb.magnetic_field(db) + states.rt.magnetic_field(db));
    let bb_l = 0.5 * (states.lb.magnetic_field(db) + states.lt.magnetic_field(db));
    let ba_t = 0.5 * (states.lt.magnetic_field(da) + states.rt.magnetic_field(da));
    let ba_b = 0.5 * (states.lb.magnetic_field(da) + states.rb.magnetic_field(da));

    let upwind = (sr * st * e_lb - sr * sb * e_lt - sl * st * e_rb + sl * sb * e_rt) / ((sr - sl) * (st - sb));
    upwind - sr * sl / (sr - sl) * (bb_r - bb_l) + st * sb / (st - sb) * (ba_t - ba_b)
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::hydro::geometry::Vector3d;
    use crate::hydro::riemann::riemann_hll;
    use crate::hydro::state::magnetic_component;
    use approx::assert_abs_diff_eq;

    const GAMMA: f64 = 5.0 / 3.0;

    fn state(d: f64, v: Vector3d, b: Vector3d) -> Primitive {
        Primitive::new(d, 1.0, v, b)
    }

    #[test]
    fn electric_field_is_minus_v_cross_b() {
        let p = state(1.0, Vector3d::new(0.3, -0.5, 0.7), Vector3d::new(0.2, 0.4, -0.6));
        let e = p.magnetic_field_vector().cross(&p.velocity_vector());
        assert_abs_diff_eq!(electric_field(&p, Axis::I), e.0, epsilon = 1e-15);
        assert_abs_diff_eq!(electric_field(&p, Axis::J), e.1, epsilon = 1e-15);
        assert_abs_diff_eq!(electric_field(&p, Axis::K), e.2, epsilon = 1e-15);
    }

    #[test]
    fn uniform_states_give_the_local_field() {
        let p = state(1.0, Vector3d::new(0.3, -0.5, 0.7), Vector3d::new(0.2, 0.4, -0.6));
        let states = EdgeStates { lb: p, lt: p, rb: p, rt: p };
        for &edge in Axis::ALL.iter() {
            assert_abs_diff_eq!(emf_hll(&states, edge, GAMMA), electric_field(&p, edge), epsilon = 1e-14);
        }
    }

    #[test]
    fn one_dimensional_limit_matches_hll_flux() {
        let l = state(1.0, Vector3d::new(0.4, 0.1, 0.0), Vector3d::new(0.5, 1.0, 0.0));
        let r = state(0.5, Vector3d::new(-0.2, 0.3, 0.0), Vector3d::new(0.5, -0.4, 0.0));
        let states = EdgeStates { lb: l, lt: l, rb: r, rt: r };
        let flux = riemann_hll(&l, &r, Direction::I, GAMMA);
        let expected = -flux.0[magnetic_component(Direction::J)];
        assert_abs_diff_eq!(emf_hll(&states, Axis::K, GAMMA), expected, epsilon = 1e-12);
    }
}
