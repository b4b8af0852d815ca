use formula_graph::formula::rules::{first_match, ADD_RULES, SCALPROD_RULES, SCAL_RULES};
use formula_graph::prelude::*;

use super::strategy::*;
use proptest::{prop_assert, proptest};

// Evaluate the rewritten construction and the generic node it replaces.
fn both(
    rewritten: &Formula,
    generic: &Formula,
    bindings: &Bindings<f64>,
) -> (Vec<f64>, Vec<f64>) {
    (
        rewritten.eval(bindings).unwrap(),
        generic.eval(bindings).unwrap(),
    )
}

proptest! {
    #[test]
    fn add_rewrites_are_sound(a in arb_scalar(), b in arb_scalar(), bindings in arb_bindings()) {
        let generic = Formula::generic(Kind::Add, vec![a.clone(), b.clone()]).unwrap();
        let (r, g) = both(&a.add(&b).unwrap(), &generic, &bindings);
        let scale = magnitude(&a.eval(&bindings).unwrap()) + magnitude(&b.eval(&bindings).unwrap());
        prop_assert!(close(&r, &g, scale), "{a} + {b}: {r:?} != {g:?}");
    }

    #[test]
    fn vector_add_rewrites_are_sound(a in arb_vector(), b in arb_vector(), bindings in arb_bindings()) {
        let generic = Formula::generic(Kind::Add, vec![a.clone(), b.clone()]).unwrap();
        let (r, g) = both(&a.add(&b).unwrap(), &generic, &bindings);
        let scale = magnitude(&a.eval(&bindings).unwrap()) + magnitude(&b.eval(&bindings).unwrap());
        prop_assert!(close(&r, &g, scale), "{a} + {b}: {r:?} != {g:?}");
    }

    #[test]
    fn scal_rewrites_are_sound(a in arb_scalar(), b in arb_formula(), bindings in arb_bindings()) {
        let generic = Formula::generic(Kind::Scal, vec![a.clone(), b.clone()]).unwrap();
        let (r, g) = both(&a.scal(&b).unwrap(), &generic, &bindings);
        let scale = magnitude(&g);
        prop_assert!(close(&r, &g, scale), "{a} * {b}: {r:?} != {g:?}");
    }

    #[test]
    fn scalprod_rewrites_are_sound(a in arb_formula(), b in arb_formula(), bindings in arb_bindings()) {
        if a.dim() == b.dim() {
            let generic = Formula::generic(Kind::Scalprod, vec![a.clone(), b.clone()]).unwrap();
            let (r, g) = both(&a.scalprod(&b).unwrap(), &generic, &bindings);
            let scale = magnitude(&a.eval(&bindings).unwrap()) * magnitude(&b.eval(&bindings).unwrap());
            prop_assert!(close(&r, &g, scale), "<{a}|{b}>: {r:?} != {g:?}");
        }
    }
}

#[test]
fn test_no_zero_survives_in_sums_and_products() {
    crate::setup_logger();
    let x = Formula::from(x());
    let v = Formula::from(v());
    let z1 = Formula::zero(1).unwrap();
    let z3 = Formula::zero(DIM).unwrap();

    for (a, b) in [(&x, &z1), (&z1, &x), (&z1, &z1)] {
        let (name, result) = first_match(ADD_RULES, a, b).unwrap();
        assert!(name.contains("zero"));
        let result = result.unwrap();
        assert!(result == x || result == z1);
    }

    for (a, b) in [(&x, &z3), (&z1, &v), (&z1, &z3)] {
        let (_, result) = first_match(SCAL_RULES, a, b).unwrap();
        assert_eq!(result.unwrap(), z3);
    }

    let (_, result) = first_match(SCALPROD_RULES, &v, &z3).unwrap();
    assert_eq!(result.unwrap(), z1);
}

#[test]
fn test_rule_tables_are_named_in_priority_order() {
    let names: Vec<_> = ADD_RULES.iter().map(|r| r.name).collect();
    assert_eq!(
        names,
        [
            "zero_plus_zero",
            "a_plus_zero",
            "zero_plus_b",
            "int_plus_int",
            "f_plus_f",
            "f_plus_scaled_f",
            "scaled_f_plus_f",
            "scaled_plus_scaled",
            "add_int_to_left",
        ]
    );

    let names: Vec<_> = SCAL_RULES.iter().map(|r| r.name).collect();
    assert_eq!(
        names,
        [
            "scal_by_zero",
            "zero_scal",
            "int_times_int",
            "scal_int_to_left",
            "reassociate",
        ]
    );
}

#[test]
fn test_structural_match_not_numeric() {
    // x * 1 and x are numerically equal, but `x + 2*(1*x)` does not absorb the scaled copy
    let x = Formula::from(x());
    let one_x = Formula::generic(Kind::Scal, vec![Formula::int(1), x.clone()]).unwrap();
    let scaled = Formula::generic(Kind::Scal, vec![Formula::int(2), one_x]).unwrap();
    assert_eq!(first_match(ADD_RULES, &x, &scaled).map(|(n, _)| n), None);

    // an independently built copy of the same structure does match
    let two_x = Formula::generic(Kind::Scal, vec![Formula::int(2), Formula::variable(0, 1).unwrap()])
        .unwrap();
    assert_eq!(
        x.add(&two_x).unwrap(),
        Formula::generic(Kind::Scal, vec![Formula::int(3), x]).unwrap()
    );
}
