//! Conversion between quadratic and cubic beziers
//!
//! Lifting a quadratic to a cubic is exact. The reverse is not: a cubic is
//! approximated by one or more quadratics, subdividing until each piece is
//! within an error tolerance measured in font units.

use kurbo::{CubicBez, ParamCurve, ParamCurveNearest, QuadBez};

/// Default fitting tolerance, in font units.
///
/// At 1000 units per em this is well below a pixel at any practical
/// rendering size.
pub const DEFAULT_TOLERANCE: f64 = 1.0;

// enough for any real outline; a cubic halves its error bound by eight
// per subdivision
const MAX_SUBDIVISIONS: u32 = 10;

/// Lift a quadratic bezier to the cubic with the same curve.
///
/// The cubic control points sit two thirds of the way from each endpoint
/// to the quadratic control point.
pub fn quad_to_cubic(q: QuadBez) -> CubicBez {
    let p1 = q.p0 + (q.p1 - q.p0) * (2.0 / 3.0);
    let p2 = q.p2 + (q.p1 - q.p2) * (2.0 / 3.0);
    CubicBez::new(q.p0, p1, p2, q.p2)
}

/// The distance bound between a cubic and its single-quadratic
/// approximation.
///
/// This is sqrt(3)/36 times the norm of the third derivative term
/// `p3 - 3p2 + 3p1 - p0`.
pub fn single_quad_error(c: &CubicBez) -> f64 {
    let d = (c.p3 - c.p0) + (c.p1 - c.p2) * 3.0;
    3.0_f64.sqrt() / 36.0 * d.hypot()
}

/// The quadratic whose midpoint construction best matches this cubic.
fn approx_quad(c: &CubicBez) -> QuadBez {
    // intersect the cubic's end tangents: each cubic control point maps
    // back to a candidate quadratic control, and we average them
    let c1 = c.p0 + (c.p1 - c.p0) * 1.5;
    let c2 = c.p3 + (c.p2 - c.p3) * 1.5;
    QuadBez::new(c.p0, c1.midpoint(c2), c.p3)
}

/// Approximate a cubic with quadratics within `tolerance` font units.
///
/// Returns `None` when the subdivision limit is reached without meeting
/// the tolerance, which only happens for degenerate or extreme input.
pub fn cubic_to_quads(c: CubicBez, tolerance: f64) -> Option<Vec<QuadBez>> {
    let mut out = Vec::new();
    if fit(&c, tolerance, 0, &mut out) {
        Some(out)
    } else {
        None
    }
}

fn fit(c: &CubicBez, tolerance: f64, depth: u32, out: &mut Vec<QuadBez>) -> bool {
    if single_quad_error(c) <= tolerance {
        out.push(approx_quad(c));
        return true;
    }
    if depth >= MAX_SUBDIVISIONS {
        return false;
    }
    let (left, right) = subdivide(c);
    fit(&left, tolerance, depth + 1, out) && fit(&right, tolerance, depth + 1, out)
}

// de Casteljau split at t = 1/2
fn subdivide(c: &CubicBez) -> (CubicBez, CubicBez) {
    let p01 = c.p0.midpoint(c.p1);
    let p12 = c.p1.midpoint(c.p2);
    let p23 = c.p2.midpoint(c.p3);
    let p012 = p01.midpoint(p12);
    let p123 = p12.midpoint(p23);
    let mid = p012.midpoint(p123);
    (
        CubicBez::new(c.p0, p01, p012, mid),
        CubicBez::new(mid, p123, p23, c.p3),
    )
}

/// The largest sampled distance from the cubic to the nearest point on
/// the quad chain. Used by tests to verify the fitting bound.
///
/// Distance is measured against the nearest point on any quad, not at a
/// matching parameter value; subdivision does not split the parameter
/// range evenly across the chain.
pub fn sampled_error(c: &CubicBez, quads: &[QuadBez]) -> f64 {
    const SAMPLES: usize = 64;
    let mut worst = 0.0_f64;
    for i in 0..=SAMPLES {
        let t = i as f64 / SAMPLES as f64;
        let p = c.eval(t);
        let nearest_sq = quads
            .iter()
            .map(|q| q.nearest(p, 1e-9).distance_sq)
            .fold(f64::INFINITY, f64::min);
        worst = worst.max(nearest_sq.sqrt());
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_lift_is_exact() {
        let q = QuadBez::new((0.0, 0.0), (50.0, 100.0), (100.0, 0.0));
        let c = quad_to_cubic(q);
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let a = q.eval(t);
            let b = c.eval(t);
            assert!(a.distance(b) < 1e-9, "diverged at t={t}: {a:?} vs {b:?}");
        }
    }

    #[test]
    fn lift_then_fit_recovers_the_quad() {
        let q = QuadBez::new((0.0, 0.0), (250.0, 700.0), (500.0, 0.0));
        let c = quad_to_cubic(q);
        // a lifted quad has zero fitting error, so one quad comes back
        assert!(single_quad_error(&c) < 1e-9);
        let quads = cubic_to_quads(c, DEFAULT_TOLERANCE).unwrap();
        assert_eq!(quads.len(), 1);
        assert!(quads[0].p1.distance(q.p1) < 1e-6);
    }

    #[test]
    fn fit_respects_tolerance() {
        // an S curve no single quadratic can express
        let c = CubicBez::new((0.0, 0.0), (0.0, 400.0), (600.0, -400.0), (600.0, 0.0));
        let quads = cubic_to_quads(c, DEFAULT_TOLERANCE).unwrap();
        assert!(quads.len() > 1);
        assert!(sampled_error(&c, &quads) <= DEFAULT_TOLERANCE * 1.5);
        // endpoints are preserved exactly
        assert_eq!(quads.first().unwrap().p0, c.p0);
        assert_eq!(quads.last().unwrap().p2, c.p3);
        // the chain is continuous
        for pair in quads.windows(2) {
            assert_eq!(pair[0].p2, pair[1].p0);
        }
    }

    #[test]
    fn lopsided_curve_stays_within_tolerance() {
        // flat at one end and tightly bent at the other, so the two
        // halves subdivide to different depths
        let c = CubicBez::new((0.0, 0.0), (500.0, 0.0), (600.0, 300.0), (600.0, 0.0));
        let quads = cubic_to_quads(c, DEFAULT_TOLERANCE).unwrap();
        assert!(sampled_error(&c, &quads) <= DEFAULT_TOLERANCE * 1.5);
    }

    #[test]
    fn tighter_tolerance_needs_more_quads() {
        let c = CubicBez::new((0.0, 0.0), (100.0, 500.0), (500.0, 500.0), (600.0, 0.0));
        let loose = cubic_to_quads(c, 5.0).unwrap();
        let tight = cubic_to_quads(c, 0.01).unwrap();
        assert!(tight.len() > loose.len());
    }
}
