//! Alias-based column resolution.

use crate::input::DataTable;

/// Value column aliases for the Variant A dataset, in priority order.
pub const VARIANT_A_ALIASES: AliasSet = AliasSet::new(&["order_value", "order_value_a", "value", "OrderTotal"]);

/// Value column aliases for the Variant B dataset, in priority order.
pub const VARIANT_B_ALIASES: AliasSet = AliasSet::new(&["order_value", "order_value_b", "value", "OrderTotal"]);

/// An ordered list of acceptable names for one logical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasSet {
    names: &'static [&'static str],
}

impl AliasSet {
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    /// First alias present in the table, if any.
    pub fn resolve<'a>(&self, table: &'a DataTable) -> Option<&'a str> {
        resolve_column(table, self.names)
    }

    /// Human-readable list of every alias, e.g. `a, b, and c`.
    pub fn describe(&self) -> String {
        match self.names {
            [] => String::new(),
            [only] => only.to_string(),
            [first, second] => format!("{} and {}", first, second),
            [init @ .., last] => format!("{}, and {}", init.join(", "), last),
        }
    }
}

/// Return the first candidate that names a column in `table`.
///
/// Matching is exact and case-sensitive. The returned name borrows from the
/// table's headers.
pub fn resolve_column<'a, S: AsRef<str>>(table: &'a DataTable, candidates: &[S]) -> Option<&'a str> {
    let found = candidates.iter().find_map(|candidate| {
        table
            .headers
            .iter()
            .find(|h| h.as_str() == candidate.as_ref())
            .map(|h| h.as_str())
    });
    match found {
        Some(name) => log::debug!("resolved value column '{}'", name),
        None => log::debug!("no candidate column found among {:?}", table.headers),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_only(headers: &[&str]) -> DataTable {
        DataTable::new(headers.iter().map(|s| s.to_string()).collect(), Vec::new())
    }

    #[test]
    fn test_first_candidate_wins() {
        let table = headers_only(&["value", "order_value", "user_id"]);
        assert_eq!(VARIANT_A_ALIASES.resolve(&table), Some("order_value"));
    }

    #[test]
    fn test_variant_specific_alias() {
        let a = headers_only(&["order_value_a"]);
        let b = headers_only(&["order_value_b"]);
        assert_eq!(VARIANT_A_ALIASES.resolve(&a), Some("order_value_a"));
        assert_eq!(VARIANT_B_ALIASES.resolve(&b), Some("order_value_b"));
        assert_eq!(VARIANT_B_ALIASES.resolve(&a), None);
    }

    #[test]
    fn test_fallback_alias_is_reachable() {
        let table = headers_only(&["OrderTotal", "customer"]);
        assert_eq!(VARIANT_A_ALIASES.resolve(&table), Some("OrderTotal"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let table = headers_only(&["Order_Value", "ordertotal"]);
        assert_eq!(VARIANT_A_ALIASES.resolve(&table), None);
    }

    #[test]
    fn test_resolve_with_owned_candidates() {
        let table = headers_only(&["revenue"]);
        let candidates = vec!["amount".to_string(), "revenue".to_string()];
        assert_eq!(resolve_column(&table, &candidates), Some("revenue"));
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            VARIANT_A_ALIASES.describe(),
            "order_value, order_value_a, value, and OrderTotal"
        );
        assert_eq!(AliasSet::new(&["x", "y"]).describe(), "x and y");
        assert_eq!(AliasSet::new(&["x"]).describe(), "x");
    }
}
