//! Filter, sort and projection primitives for in-memory collection queries.
//!
//! Filters are `{field, operator, value}` triples combined with AND
//! semantics. The operator set is deliberately restricted to what the
//! backing store can also express, plus the in-memory-only `contains`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Comparison operator of a [`FieldFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "array_contains")]
    ArrayContains,
}

impl FilterOp {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            ">" => Some(Self::Gt),
            "<" => Some(Self::Lt),
            ">=" => Some(Self::Ge),
            "<=" => Some(Self::Le),
            "contains" => Some(Self::Contains),
            "in" => Some(Self::In),
            "array_contains" => Some(Self::ArrayContains),
            _ => None,
        }
    }
}

/// A single field predicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    #[serde(rename = "operator")]
    pub op: FilterOp,
    pub value: Value,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }
}

/// Single-key ordering clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    #[serde(default)]
    pub direction: Direction,
}

/// Loose cross-type comparison: numbers as f64, strings lexically,
/// booleans false < true. Mixed types are incomparable.
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Evaluate a single filter against a document.
///
/// A missing field fails every predicate except `!=`, where absence counts
/// as "not equal" — mirroring how the historical data was queried.
pub fn matches(doc: &Value, filter: &FieldFilter) -> bool {
    let field = doc.get(&filter.field);
    match filter.op {
        FilterOp::Ne => field.map_or(true, |v| v != &filter.value),
        FilterOp::Eq => field == Some(&filter.value),
        FilterOp::Gt => cmp_is(field, &filter.value, Ordering::is_gt),
        FilterOp::Lt => cmp_is(field, &filter.value, Ordering::is_lt),
        FilterOp::Ge => cmp_is(field, &filter.value, Ordering::is_ge),
        FilterOp::Le => cmp_is(field, &filter.value, Ordering::is_le),
        FilterOp::Contains => match (field.and_then(Value::as_str), filter.value.as_str()) {
            (Some(hay), Some(needle)) => {
                hay.to_lowercase().contains(&needle.to_lowercase())
            }
            _ => false,
        },
        FilterOp::In => match (field, filter.value.as_array()) {
            (Some(v), Some(set)) => set.contains(v),
            _ => false,
        },
        FilterOp::ArrayContains => match field.and_then(Value::as_array) {
            Some(arr) => arr.contains(&filter.value),
            None => false,
        },
    }
}

fn cmp_is(field: Option<&Value>, value: &Value, pred: fn(Ordering) -> bool) -> bool {
    field
        .and_then(|f| compare_values(f, value))
        .is_some_and(pred)
}

/// True when every filter matches (AND semantics).
pub fn matches_all(doc: &Value, filters: &[FieldFilter]) -> bool {
    filters.iter().all(|f| matches(doc, f))
}

/// Stable single-key sort. Documents missing the key keep their relative
/// order at the end of the result, for both directions.
pub fn sort_docs(docs: &mut [Value], order: &OrderBy) {
    docs.sort_by(|a, b| {
        match (a.get(&order.field), b.get(&order.field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                let ord = compare_values(x, y).unwrap_or(Ordering::Equal);
                match order.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            }
        }
    });
}

/// Project a document onto the selected fields. The id tag is always kept
/// so results stay addressable.
pub fn project(doc: &Value, select: &[String]) -> Value {
    let mut out = Map::new();
    if let Some(id) = doc.get("id") {
        out.insert("id".to_string(), id.clone());
    }
    for key in select {
        if key == "id" {
            continue;
        }
        if let Some(v) = doc.get(key) {
            out.insert(key.clone(), v.clone());
        }
    }
    Value::Object(out)
}
