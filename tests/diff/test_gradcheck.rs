//! Derivatives checked against central finite differences.
use formula_graph::prelude::*;

use crate::formula::strategy::{v, x, y, DIM};

const H: f64 = 1e-5;

fn bindings(point: &[(Variable, Vec<f64>)]) -> Bindings<f64> {
    let mut b = Bindings::new();
    for (var, values) in point {
        b.bind(var, values.clone()).unwrap();
    }
    b
}

fn value(f: &Formula, point: &[(Variable, Vec<f64>)]) -> f64 {
    f.eval(&bindings(point)).unwrap()[0]
}

// Compare the gradient of the scalar `f` w.r.t. `var` with finite differences at `point`.
fn check(f: &Formula, point: &[(Variable, Vec<f64>)], var: Variable) {
    let analytic = f.grad(&var).unwrap().eval(&bindings(point)).unwrap();
    assert_eq!(analytic.len(), var.dim());

    for k in 0..var.dim() {
        let shifted = |delta: f64| {
            let mut p = point.to_vec();
            for (w, values) in p.iter_mut() {
                if *w == var {
                    values[k] += delta;
                }
            }
            value(f, &p)
        };
        let numeric = (shifted(H) - shifted(-H)) / (2.0 * H);
        assert!(
            (analytic[k] - numeric).abs() <= 1e-6 * (1.0 + numeric.abs()),
            "d{f}/dx{}[{k}]: {} != {numeric}",
            var.index(),
            analytic[k]
        );
    }
}

fn scalars(xs: f64, ys: f64) -> Vec<(Variable, Vec<f64>)> {
    vec![(x(), vec![xs]), (y(), vec![ys])]
}

#[test]
fn test_sqrt() {
    crate::setup_logger();
    let f = Formula::from(x()).sqrt().unwrap();
    for xs in [0.25, 1.0, 3.0] {
        check(&f, &scalars(xs, 1.0), x());
    }
}

#[test]
fn test_powf() {
    let f = Formula::from(x()).powf(&Formula::from(y())).unwrap();
    for (xs, ys) in [(1.5, 0.5), (0.7, 2.5), (2.0, -1.0)] {
        check(&f, &scalars(xs, ys), x());
        check(&f, &scalars(xs, ys), y());
    }
}

#[test]
fn test_divide() {
    let f = Formula::from(x()).divide(&Formula::from(y())).unwrap();
    for (xs, ys) in [(1.0, 2.0), (-3.0, 0.5)] {
        check(&f, &scalars(xs, ys), x());
        check(&f, &scalars(xs, ys), y());
    }
}

#[test]
fn test_log_times_identity() {
    let x_ = Formula::from(x());
    let f = x_.log().unwrap().scal(&x_).unwrap();
    check(&f, &scalars(0.3, 0.0), x());
    check(&f, &scalars(2.0, 0.0), x());
}

#[test]
fn test_exp_of_square_over_identity() {
    let x_ = Formula::from(x());
    let f = x_.square().unwrap().exp().unwrap().divide(&x_).unwrap();
    check(&f, &scalars(0.8, 0.0), x());
    check(&f, &scalars(-1.2, 0.0), x());
}

#[test]
fn test_norm2() {
    let f = Formula::from(v()).norm2().unwrap();
    let point = vec![(v(), vec![1.0, -2.0, 0.5])];
    check(&f, &point, v());

    // ∇|V| = V / |V|
    let grad = f.grad(&v()).unwrap().eval(&bindings(&point)).unwrap();
    let norm = (1.0f64 + 4.0 + 0.25).sqrt();
    for (g, vk) in grad.iter().zip(&point[0].1) {
        assert!((g - vk / norm).abs() < 1e-12);
    }
    assert_eq!(grad.len(), DIM);
}
