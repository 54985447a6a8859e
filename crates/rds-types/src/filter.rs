//! Equality-subset query filters.
//!
//! A filter is a mapping from field name to required value. A record matches
//! when every filter field is present in the record with an equal value.
//! There are no range or comparison operators.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::record::{Record, Value};

/// Query filter (AND of field equalities).
///
/// The empty filter matches every record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryFilter {
    fields: Record,
}

impl QueryFilter {
    /// Create an empty filter (matches all).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Returns `true` if the filter has no conditions.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &Record {
        &self.fields
    }

    /// Check whether a record satisfies every condition.
    pub fn matches(&self, record: &Record) -> bool {
        self.fields.iter().all(|(key, expected)| {
            record
                .get(key)
                .is_some_and(|actual| values_equal(expected, actual))
        })
    }
}

impl From<Record> for QueryFilter {
    fn from(fields: Record) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for QueryFilter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Structural equality used by filter matching.
///
/// Same as JSON equality except that numbers compare by numeric value, so an
/// integer `3` equals a float `3.0`. Applies recursively to sequences and
/// nested mappings; mapping key order is irrelevant.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm
                    .iter()
                    .all(|(k, x)| ym.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    match (integer_value(x), integer_value(y)) {
        (Some(a), Some(b)) => a == b,
        (Some(i), None) => y.as_f64().is_some_and(|f| float_is_integer(f, i)),
        (None, Some(i)) => x.as_f64().is_some_and(|f| float_is_integer(f, i)),
        (None, None) => x.as_f64() == y.as_f64(),
    }
}

/// Every JSON integer widened losslessly, `None` for floats.
fn integer_value(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Exact comparison: the float must be whole and convert to exactly `i`.
fn float_is_integer(f: f64, i: i128) -> bool {
    // 2^64 bounds every i64 and u64; whole floats inside convert exactly.
    const BOUND: f64 = 18_446_744_073_709_551_616.0;
    f.fract() == 0.0 && f > -BOUND && f < BOUND && f as i128 == i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::into_record;
    use proptest::prelude::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        into_record(value).unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = QueryFilter::new();
        assert!(filter.is_empty());
        assert!(filter.matches(&Record::new()));
        assert!(filter.matches(&record(json!({"a": 1}))));
    }

    #[test]
    fn single_condition() {
        let filter = QueryFilter::new().eq("1", 1);
        assert!(filter.matches(&record(json!({"1": 1, "2": "Two"}))));
        assert!(!filter.matches(&record(json!({"1": 2}))));
    }

    #[test]
    fn missing_field_excludes() {
        let filter = QueryFilter::new().eq("k", Value::Null);
        assert!(!filter.matches(&record(json!({"other": null}))));
        assert!(filter.matches(&record(json!({"k": null}))));
    }

    #[test]
    fn all_conditions_must_hold() {
        let filter = QueryFilter::new().eq("1", 1).eq("2", 2);
        assert_eq!(filter.len(), 2);
        assert!(filter.matches(&record(json!({"1": 1, "2": 2, "3": 3}))));
        assert!(!filter.matches(&record(json!({"1": 1, "2": "Two"}))));
    }

    #[test]
    fn integer_equals_float_of_same_value() {
        assert!(values_equal(&json!(3), &json!(3.0)));
        assert!(!values_equal(&json!(3), &json!(3.5)));
        assert!(values_equal(&json!(-7), &json!(-7)));
        assert!(!values_equal(&json!(-1), &json!(u64::MAX)));
        assert!(values_equal(&json!(u64::MAX), &json!(u64::MAX)));
    }

    #[test]
    fn integer_float_comparison_is_exact() {
        // 2^53 + 1 has no f64 representation; the nearest float is 2^53
        assert!(!values_equal(&json!(9_007_199_254_740_993i64), &json!(9_007_199_254_740_992.0)));
        assert!(values_equal(&json!(9_007_199_254_740_992i64), &json!(9_007_199_254_740_992.0)));
        // u64::MAX rounds up to 2^64 as a float
        assert!(!values_equal(&json!(u64::MAX), &json!(18_446_744_073_709_551_615.0)));
        assert!(!values_equal(&json!(18_446_744_073_709_551_615.0), &json!(u64::MAX)));
        assert!(values_equal(&json!(i64::MIN), &json!(-9_223_372_036_854_775_808.0)));
        assert!(values_equal(&json!(0), &json!(-0.0)));
        assert!(!values_equal(&json!(1), &json!(1.0000000000000002)));
    }

    #[test]
    fn types_do_not_coerce() {
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(!values_equal(&json!(true), &json!(1)));
        assert!(!values_equal(&json!(null), &json!(false)));
    }

    #[test]
    fn nested_values_compare_structurally() {
        assert!(values_equal(
            &json!({"a": [1, 2.0, {"b": null}]}),
            &json!({"a": [1.0, 2, {"b": null}]})
        ));
        assert!(!values_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn filter_from_record_and_iterator() {
        let from_map = QueryFilter::from(record(json!({"x": "y"})));
        let from_iter: QueryFilter = [("x", "y")].into_iter().collect();
        assert_eq!(from_map, from_iter);
    }

    #[test]
    fn filter_serializes_as_plain_mapping() {
        let filter = QueryFilter::new().eq("a", 1);
        assert_eq!(serde_json::to_value(&filter).unwrap(), json!({"a": 1}));
        let parsed: QueryFilter = serde_json::from_value(json!({"a": 1})).unwrap();
        assert_eq!(parsed, filter);
    }

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            (-1.0e6f64..1.0e6).prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
        ]
    }

    fn record_strategy() -> impl Strategy<Value = Record> {
        prop::collection::btree_map("[a-e]", scalar(), 0..5)
            .prop_map(|m| m.into_iter().collect())
    }

    proptest! {
        #[test]
        fn subset_of_own_fields_always_matches(rec in record_strategy(), mask in any::<u8>()) {
            let filter: QueryFilter = rec
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, (k, v))| (k.clone(), v.clone()))
                .collect();
            prop_assert!(filter.matches(&rec));
        }

        #[test]
        fn absent_field_never_matches(rec in record_strategy(), value in scalar()) {
            let filter = QueryFilter::new().eq("absent-key", value);
            prop_assert!(!filter.matches(&rec));
        }

        #[test]
        fn matches_iff_every_condition_holds(rec in record_strategy(), other in record_strategy()) {
            let filter = QueryFilter::from(other.clone());
            let expected = other
                .iter()
                .all(|(k, v)| rec.get(k).is_some_and(|r| values_equal(r, v)));
            prop_assert_eq!(filter.matches(&rec), expected);
        }
    }
}
