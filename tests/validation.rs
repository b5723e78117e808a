// tests/validation.rs
//
// Integration-style validation tests (closed-form checks on the textures,
// the deflection map and the assembled contrast pipeline).
// Run with: cargo test
// Or only these tests: cargo test --test validation

use std::f64::consts::{FRAC_PI_2, PI};

use approx::{assert_abs_diff_eq, assert_relative_eq};

use ltem_sim::deflection::{deflect, undeflect};
use ltem_sim::grid::Grid2D;
use ltem_sim::params::LtemParams;
use ltem_sim::pipeline::{self, FigureSink, LtemFigure};
use ltem_sim::textures::{
    antiskyrmion, bubble, envelope, envelope_peak, neel_bubble, ShapeParams, TextureKind,
};
use ltem_sim::vector_field::VectorField2D;

fn polar(d: f64, phi: f64) -> (f64, f64) {
    (d * phi.cos(), d * phi.sin())
}

#[test]
fn neel_skyrmion_reference_value() {
    let (sx, sy) = TextureKind::NeelSkyrmion.evaluate(1.0, 0.0, &ShapeParams::new(1.0, 1.0, 1.0));
    assert_eq!((sx, sy), ((-3.0f64).exp(), 0.0));
}

#[test]
fn bloch_skyrmion_reference_value() {
    let (sx, sy) = TextureKind::BlochSkyrmion.evaluate(0.0, 1.0, &ShapeParams::new(1.0, 1.0, 1.0));
    assert_eq!(sx, -(-3.0f64).exp());
    assert_abs_diff_eq!(sy, 0.0, epsilon = 1e-15);
}

#[test]
fn deflect_reference_value() {
    let (x2, y2) = deflect(1.0, 2.0, 3.0, 4.0, 0.1);
    assert_relative_eq!(x2, 1.0 - 0.1 * 4.0);
    assert_relative_eq!(y2, 2.0 + 0.1 * 3.0);
    assert_relative_eq!(x2, 0.6, epsilon = 1e-15);
    assert_relative_eq!(y2, 2.3, epsilon = 1e-15);
}

#[test]
fn bubble_reference_values_off_axis() {
    let p = ShapeParams::default();
    // each component is 1/sqrt(2) of the envelope sqrt(0.5) exp(-1.5)
    let e = 0.5 * (-1.5f64).exp();

    let (sx, sy) = bubble(0.5, 0.5, &p);
    assert_abs_diff_eq!(sx, -e, epsilon = 1e-12);
    assert_abs_diff_eq!(sy, e, epsilon = 1e-12);

    let (sx, sy) = bubble(0.5, -0.5, &p);
    assert_abs_diff_eq!(sx, e, epsilon = 1e-12);
    assert_abs_diff_eq!(sy, e, epsilon = 1e-12);

    // phi = 30 deg, d = 0.5: sin(2 phi) = sqrt(3)/2
    let (x, y) = polar(0.5, PI / 6.0);
    let env = 0.5 * (-0.75f64).exp();
    let (sx, sy) = bubble(x, y, &p);
    assert_abs_diff_eq!(sx, -(6.0f64).sqrt() / 4.0 * env, epsilon = 1e-12);
    assert_abs_diff_eq!(sy, (10.0f64).sqrt() / 4.0 * env, epsilon = 1e-12);
}

#[test]
fn neel_bubble_reference_values_off_axis() {
    let p = ShapeParams::default();
    let e = 0.5 * (-1.5f64).exp();

    let (sx, sy) = neel_bubble(0.5, 0.5, &p);
    assert_abs_diff_eq!(sx, -e, epsilon = 1e-12);
    assert_abs_diff_eq!(sy, -e, epsilon = 1e-12);

    let (sx, sy) = neel_bubble(-0.5, 0.5, &p);
    assert_abs_diff_eq!(sx, -e, epsilon = 1e-12);
    assert_abs_diff_eq!(sy, e, epsilon = 1e-12);
}

#[test]
fn neel_bubble_is_bubble_rotated_a_quarter_turn() {
    for &p in &[ShapeParams::default(), ShapeParams::new(0.7, 2.0, 1.0)] {
        for k in 0..24 {
            let (x, y) = polar(0.1 + 0.05 * k as f64, 0.3 + k as f64 * PI / 12.0);
            let (bx, by) = bubble(x, y, &p);
            assert_eq!(neel_bubble(x, y, &p), (-by, bx), "at ({x}, {y})");
        }
    }
}

#[test]
fn second_order_antiskyrmion_reference_values() {
    let p = ShapeParams::new(1.0, 2.0, 1.0);
    // envelope d^2 exp(-3 d^2)
    let diag = 0.5 * (-1.5f64).exp(); // d^2 = 0.5
    let axis = 0.25 * (-0.75f64).exp(); // d^2 = 0.25

    let cases = [
        ((0.5, 0.5), (0.0, -diag)),
        ((0.5, -0.5), (0.0, diag)),
        ((0.5, 0.0), (axis, 0.0)),
        ((0.0, 0.5), (-axis, 0.0)),
    ];
    for ((x, y), (ex, ey)) in cases {
        let (sx, sy) = antiskyrmion(x, y, &p);
        assert_abs_diff_eq!(sx, ex, epsilon = 1e-12);
        assert_abs_diff_eq!(sy, ey, epsilon = 1e-12);
    }
}

#[test]
fn families_without_division_are_finite_at_the_origin() {
    let p = ShapeParams::default();
    for kind in [
        TextureKind::Antiskyrmion,
        TextureKind::Bubble,
        TextureKind::NeelBubble,
        TextureKind::BlochSkyrmion,
    ] {
        let (sx, sy) = kind.evaluate(0.0, 0.0, &p);
        assert!(sx.is_finite() && sy.is_finite(), "{kind} not finite at origin");
        // deterministic: same answer twice
        assert_eq!(kind.evaluate(0.0, 0.0, &p), (sx, sy));
    }
}

#[test]
fn neel_skyrmion_is_nan_at_the_origin() {
    // 0/0 in the radial unit vector; intentionally left unguarded.
    let (sx, sy) = TextureKind::NeelSkyrmion.evaluate(0.0, 0.0, &ShapeParams::default());
    assert!(sx.is_nan() && sy.is_nan());
}

#[test]
fn envelope_has_single_peak_and_vanishes_at_both_ends() {
    for &(r, n) in &[(1.0, 1.0), (1.0, 2.0), (0.6, 3.0), (2.0, 0.5)] {
        let d_peak = envelope_peak(r, n);
        let e_peak = envelope(d_peak, r, n);

        // rising before the peak, falling after it
        let mut prev = envelope(1e-6, r, n);
        for k in 1..=50 {
            let d = d_peak * k as f64 / 50.0;
            let e = envelope(d, r, n);
            assert!(e >= prev, "not rising at d={d} (r={r}, n={n})");
            prev = e;
        }
        for k in 1..=50 {
            let d = d_peak * (1.0 + k as f64 / 10.0);
            let e = envelope(d, r, n);
            assert!(e <= prev, "not falling at d={d} (r={r}, n={n})");
            prev = e;
        }

        assert!(envelope(0.0, r, n) == 0.0);
        assert!(envelope(20.0 * r, r, n) < 1e-100);
        assert!(e_peak > 0.0);
    }
}

#[test]
fn deflection_inverts_given_the_field() {
    let grid = Grid2D::square(9, 1.8).unwrap();
    let m = VectorField2D::from_texture(grid, TextureKind::Bubble, &ShapeParams::default());
    for scale in [0.1, 1.0, -3.0] {
        for id in 0..grid.n_cells() {
            let (x, y) = grid.coord_flat(id);
            let [sx, sy] = m.data[id];
            let (x2, y2) = deflect(x, y, sx, sy, scale);
            let (xr, yr) = undeflect(x2, y2, sx, sy, scale);
            assert_abs_diff_eq!(xr, x, epsilon = 1e-12);
            assert_abs_diff_eq!(yr, y, epsilon = 1e-12);
        }
    }
}

#[test]
fn second_order_antiskyrmion_has_two_fold_symmetry() {
    let p = ShapeParams::new(1.0, 2.0, 1.0);
    for k in 0..16 {
        let phi = 0.1 + k as f64 * PI / 8.0;
        let (x, y) = polar(0.5, phi);
        let (sx, sy) = TextureKind::Antiskyrmion.evaluate(x, y, &p);

        // half turn: unchanged
        let (xh, yh) = polar(0.5, phi + PI);
        let (hx, hy) = TextureKind::Antiskyrmion.evaluate(xh, yh, &p);
        assert_abs_diff_eq!(hx, sx, epsilon = 1e-12);
        assert_abs_diff_eq!(hy, sy, epsilon = 1e-12);

        // quarter turn: reversed
        let (xq, yq) = polar(0.5, phi + FRAC_PI_2);
        let (qx, qy) = TextureKind::Antiskyrmion.evaluate(xq, yq, &p);
        assert_abs_diff_eq!(qx, -sx, epsilon = 1e-12);
        assert_abs_diff_eq!(qy, -sy, epsilon = 1e-12);
    }
}

#[test]
fn bloch_and_neel_are_orthogonal_everywhere() {
    let p = ShapeParams::new(1.2, 1.0, 1.0);
    for k in 0..12 {
        let (x, y) = polar(0.4 + 0.05 * k as f64, 0.3 * k as f64);
        let a = TextureKind::NeelSkyrmion.evaluate(x, y, &p);
        let b = TextureKind::BlochSkyrmion.evaluate(x, y, &p);
        assert_abs_diff_eq!(a.0 * b.0 + a.1 * b.1, 0.0, epsilon = 1e-14);
        assert_relative_eq!(a.0.hypot(a.1), b.0.hypot(b.1), epsilon = 1e-12);
    }
}

struct CountingSink {
    calls: usize,
    last_nodes: usize,
}

impl FigureSink for CountingSink {
    fn render(&mut self, figure: &LtemFigure) -> ltem_sim::Result<()> {
        self.calls += 1;
        self.last_nodes = figure.field.data.len();
        Ok(())
    }
}

#[test]
fn pipeline_runs_every_family_on_a_small_grid() {
    let mut sink = CountingSink {
        calls: 0,
        last_nodes: 0,
    };
    for kind in TextureKind::ALL {
        let mut params = LtemParams::for_texture(kind);
        params.sampling.n = 20;
        let fig = pipeline::run(&params, &mut sink).unwrap();

        // even grid: never samples the origin, so every family is finite
        assert_eq!(fig.field.non_finite_count(), 0);
        assert_eq!(fig.cloud.len(), 400);
        assert!(fig.density.values.iter().all(|v| v.is_finite()));
    }
    assert_eq!(sink.calls, 5);
    assert_eq!(sink.last_nodes, 400);
}

#[test]
fn pipeline_drops_the_nan_node_of_an_odd_neel_grid() {
    let mut params = LtemParams::for_texture(TextureKind::NeelSkyrmion);
    params.sampling.n = 21;
    let fig = pipeline::compute(&params).unwrap();
    assert_eq!(fig.field.non_finite_count(), 1);
    assert!(fig.density.values.iter().all(|v| v.is_finite()));
}

#[test]
fn array_evaluation_over_meshgrid_matches_field_fill() {
    let grid = Grid2D::square(8, 1.8).unwrap();
    let (x, y) = grid.meshgrid();
    let p = ShapeParams::new(0.8, 1.0, -1.0);
    for kind in TextureKind::ALL {
        let (sx, sy) = kind.evaluate_array(&x, &y, &p).unwrap();
        let m = VectorField2D::from_texture(grid, kind, &p);
        for j in 0..grid.ny {
            for i in 0..grid.nx {
                assert_eq!(m.data[grid.idx(i, j)], [sx[[j, i]], sy[[j, i]]]);
            }
        }
    }
}
