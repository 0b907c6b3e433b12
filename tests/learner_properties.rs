use lrsgd::ml::fsum::fsum;
use lrsgd::ml::{SgdLogReg, SparseVector};
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

const N_FEATURE: usize = 16;

fn sparse_vector() -> impl Strategy<Value = SparseVector> {
    btree_map(0..N_FEATURE, -1.0f64..1.0, 1..6)
        .prop_map(|entries| SparseVector::new(entries).expect("btree keys are unique"))
}

/// Each step moves a weight by less than `eta`, so scores stay well below
/// the range where the sigmoid rounds to 0 or 1.
fn trained_model() -> impl Strategy<Value = SgdLogReg> {
    (
        0.01f64..0.3,
        0.0f64..0.5,
        vec((sparse_vector(), prop_oneof![Just(0.0), Just(1.0)]), 0..12),
    )
        .prop_map(|(eta, mu, examples)| {
            let mut model = SgdLogReg::new(eta, mu, N_FEATURE);
            for (x, y) in &examples {
                model.fit(x, *y).expect("indices are in range");
            }
            model
        })
}

proptest! {
    #[test]
    fn probability_stays_inside_unit_interval(model in trained_model(), x in sparse_vector()) {
        let p = model.predict_probability(&x).unwrap();
        prop_assert!(p > 0.0 && p < 1.0, "p={p}");
    }

    #[test]
    fn predict_thresholds_probability(model in trained_model(), x in sparse_vector()) {
        let p = model.predict_probability(&x).unwrap();
        let class = model.predict(&x).unwrap();
        prop_assert_eq!(class == 1, p > 0.5);
    }

    #[test]
    fn fit_leaves_absent_features_untouched(
        model in trained_model(),
        x in sparse_vector(),
        y in 0.0f64..=1.0,
    ) {
        let before = model.weights().to_vec();
        let mut model = model;
        model.fit(&x, y).unwrap();
        for (index, (&old, &new)) in before.iter().zip(model.weights()).enumerate() {
            if !x.iter().any(|(present, _)| present == index) {
                prop_assert_eq!(old.to_bits(), new.to_bits());
            }
        }
    }

    #[test]
    fn decay_subtracts_in_the_direction_of_each_weight(
        model in trained_model(),
        x in sparse_vector(),
        mu in 0.0f64..4.0,
        y in 0.0f64..=1.0,
    ) {
        let before = model.weights().to_vec();
        // eta = 0 isolates the decay term.
        let mut decay_only = SgdLogReg::with_weights(0.0, mu, before.clone());
        decay_only.fit(&x, y).unwrap();
        let decay = mu / x.len() as f64;
        for (old, new) in before.iter().zip(decay_only.weights()) {
            let removed = old - new;
            prop_assert!(removed == 0.0 || removed.signum() == old.signum(), "old={old} new={new}");
            if decay <= 1.0 {
                prop_assert!(new.abs() <= old.abs(), "old={old} new={new}");
                prop_assert!(*new == 0.0 || new.signum() == old.signum());
            }
        }
    }

    #[test]
    fn zero_rates_leave_weights_unchanged(
        model in trained_model(),
        x in sparse_vector(),
        y in 0.0f64..=1.0,
    ) {
        let before = model.weights().to_vec();
        let mut frozen = SgdLogReg::with_weights(0.0, 0.0, before.clone());
        frozen.fit(&x, y).unwrap();
        prop_assert_eq!(frozen.weights(), before.as_slice());
    }

    #[test]
    fn exact_sum_ignores_order(values in vec(-1e12f64..1e12, 0..40)) {
        let mut reversed = values.clone();
        reversed.reverse();
        prop_assert_eq!(fsum(values.iter().copied()), fsum(reversed));
    }
}
