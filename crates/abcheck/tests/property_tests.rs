//! Property-based tests for abcheck.
//!
//! These tests use proptest to generate random inputs and check that the
//! statistics and validators keep their invariants:
//! 1. **No panics** on any input
//! 2. **Bounded outputs**: p-values stay in [0, 1]
//! 3. **Symmetry**: swapping samples flips only the sign of t
//!
//! ```bash
//! PROPTEST_CASES=10000 cargo test -p abcheck --test property_tests
//! ```

use proptest::prelude::*;

use abcheck::{
    resolve_column, welch_t_test, DataTable, DatasetValidator, ValidatorConfig, VARIANT_A_ALIASES,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Order values in a realistic range.
fn order_values() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..500.0, 2..60)
}

/// Column names, sometimes colliding with known aliases.
fn column_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("order_value".to_string()),
        Just("OrderTotal".to_string()),
        Just("value".to_string()),
        "[a-zA-Z_]{1,12}",
    ]
}

/// Group labels, mostly valid.
fn group_label() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => Just("A".to_string()),
        4 => Just("B".to_string()),
        1 => "[A-Za-z0-9 ]{0,3}",
    ]
}

fn table_from(headers: &[&str], rows: Vec<Vec<String>>) -> DataTable {
    DataTable::new(headers.iter().map(|h| h.to_string()).collect(), rows)
}

// =============================================================================
// Statistics Properties
// =============================================================================

proptest! {
    #[test]
    fn welch_p_value_is_a_probability(x in order_values(), y in order_values()) {
        let result = welch_t_test(&x, &y).unwrap();
        prop_assert!((0.0..=1.0).contains(&result.p_value));
    }

    #[test]
    fn welch_is_antisymmetric(x in order_values(), y in order_values()) {
        let xy = welch_t_test(&x, &y).unwrap();
        let yx = welch_t_test(&y, &x).unwrap();
        if xy.statistic.is_finite() {
            prop_assert!((xy.statistic + yx.statistic).abs() < 1e-9);
        } else {
            prop_assert_eq!(xy.statistic, -yx.statistic);
        }
        prop_assert!((xy.p_value - yx.p_value).abs() < 1e-12);
    }

    #[test]
    fn welch_self_comparison_not_significant(x in order_values()) {
        let result = welch_t_test(&x, &x).unwrap();
        prop_assert!(result.p_value > 0.99);
    }
}

// =============================================================================
// Resolver Properties
// =============================================================================

proptest! {
    #[test]
    fn resolved_column_is_first_present_alias(headers in prop::collection::vec(column_name(), 0..8)) {
        let table = table_from(&headers.iter().map(String::as_str).collect::<Vec<_>>(), Vec::new());
        let expected = VARIANT_A_ALIASES
            .names()
            .iter()
            .find(|alias| headers.iter().any(|h| h.as_str() == **alias))
            .copied();
        prop_assert_eq!(VARIANT_A_ALIASES.resolve(&table), expected);
        prop_assert_eq!(resolve_column(&table, VARIANT_A_ALIASES.names()), expected);
    }
}

// =============================================================================
// Validator Properties
// =============================================================================

proptest! {
    #[test]
    fn validator_fails_exactly_on_invalid_groups(
        rows in prop::collection::vec((group_label(), 0.0f64..100.0), 0..40)
    ) {
        let has_invalid = rows.iter().any(|(g, _)| g != "A" && g != "B");
        let has_a = rows.iter().any(|(g, _)| g == "A");
        let has_b = rows.iter().any(|(g, _)| g == "B");

        let table = table_from(
            &["group", "order_value"],
            rows.iter().map(|(g, v)| vec![g.clone(), v.to_string()]).collect(),
        );
        let config = ValidatorConfig::default().with_required_columns(["group", "order_value"]);
        let report = DatasetValidator::with_config(config).validate_table(&table, "generated.csv");

        prop_assert_eq!(report.passed(), !has_invalid && has_a && has_b);
    }
}
