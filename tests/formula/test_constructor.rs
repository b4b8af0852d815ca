use formula_graph::prelude::*;

use super::strategy::{arb_formula, DIM};
use proptest::proptest;

proptest! {
    #[test]
    fn add_dimension_closure(a in arb_formula(), b in arb_formula()) {
        match a.add(&b) {
            Ok(f) => {
                assert_eq!(a.dim(), b.dim());
                assert_eq!(f.dim(), a.dim());
            }
            Err(e) => {
                assert_ne!(a.dim(), b.dim());
                assert_eq!(e, FormulaError::DimensionMismatch { op: "Add", left: a.dim(), right: b.dim() });
            }
        }
    }

    #[test]
    fn scal_dimension_closure(a in arb_formula(), b in arb_formula()) {
        match a.scal(&b) {
            Ok(f) => {
                assert_eq!(a.dim(), 1);
                assert_eq!(f.dim(), b.dim());
            }
            Err(e) => {
                assert_ne!(a.dim(), 1);
                assert_eq!(e, FormulaError::DimensionMismatch { op: "Scal", left: a.dim(), right: b.dim() });
            }
        }
    }

    #[test]
    fn scalprod_dimension_closure(a in arb_formula(), b in arb_formula()) {
        match a.scalprod(&b) {
            Ok(f) => {
                assert_eq!(a.dim(), b.dim());
                assert_eq!(f.dim(), 1);
            }
            Err(_) => assert_ne!(a.dim(), b.dim()),
        }
    }

    #[test]
    fn unary_dimension_closure(a in arb_formula(), m in -3..=3i32) {
        for f in [a.exp(), a.log(), a.pow(m)] {
            match f {
                Ok(f) => {
                    assert_eq!(a.dim(), 1);
                    assert_eq!(f.dim(), 1);
                }
                Err(e) => {
                    assert_eq!(a.dim(), DIM);
                    assert!(matches!(e, FormulaError::DimensionMismatch { left: 1, right: DIM, .. }));
                }
            }
        }
    }
}

#[test]
fn test_errors_report_both_dimensions() {
    let x = Formula::variable(0, 2).unwrap();
    let y = Formula::variable(1, 5).unwrap();
    let e = x.add(&y).unwrap_err();
    assert_eq!(e.to_string(), "dimension mismatch in Add: 2 vs 5");
}

#[test]
fn test_constant_folding_is_deterministic() {
    let five = Formula::int(5);
    for _ in 0..3 {
        let f = Formula::int(2).add(&Formula::int(3)).unwrap();
        assert_eq!(f, five);
        assert_eq!(f.kind(), &Kind::IntConstant(5));
    }
}

#[test]
fn test_derived_operators_on_vectors() {
    let v = Formula::variable(0, DIM).unwrap();
    let w = Formula::variable(1, DIM).unwrap();
    let x = Formula::variable(2, 1).unwrap();

    assert_eq!(v.subtract(&w).unwrap().dim(), DIM);
    assert_eq!(v.minus().unwrap().dim(), DIM);
    assert_eq!(v.norm2().unwrap().dim(), 1);

    // Divide scales its first operand, which must be scalar
    assert!(v.divide(&x).is_err());
    assert!(x.divide(&v).is_err());
    assert_eq!(x.divide(&x).unwrap().dim(), 1);
}

#[test]
fn test_adding_independently_built_shared_chains() {
    // n rounds of `e = exp(f); f = e * e`: 2n + 1 distinct nodes, 2^n paths
    let chain = |n: usize| {
        let mut f = Formula::variable(0, 1).unwrap();
        for _ in 0..n {
            let e = f.exp().unwrap();
            f = e.scal(&e).unwrap();
        }
        f
    };

    let (a, b) = (chain(40), chain(40));
    assert!(!a.ptr_eq(&b));
    assert_eq!(a, b);
    assert_eq!(a.add(&b).unwrap(), Formula::int(2).scal(&a).unwrap());
    assert_ne!(chain(39).exp().unwrap(), chain(40).exp().unwrap());
}
