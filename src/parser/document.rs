//! Decoded report document
//!
//! Agents emit YAML sprinkled with Ruby object tags
//! (`!ruby/object:Puppet::Transaction::Report`, `!ruby/sym notice`, ...).
//! The tags carry nothing we need, so they are dropped at decode time and
//! the rest of the parser sees plain mappings, sequences and scalars.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_norway::{Mapping, Number, Value};

use crate::utils::error::{ReportError, ReportResult};

/// String-to-string view of a mapping, as produced by [`flatten`]
pub type FlatMap = BTreeMap<String, String>;

/// A decoded, untagged report document
#[derive(Debug, Clone)]
pub struct Document {
    root: Value,
}

impl Document {
    /// Decode raw bytes into a document tree
    pub fn decode(content: &[u8]) -> ReportResult<Self> {
        let root: Value = serde_norway::from_slice(content)?;
        Ok(Self { root: untag(root) })
    }

    /// Look up a dotted path such as `metrics.time.values`
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.root, |current, segment| current.get(segment))
    }

    /// Fetch a required string scalar
    pub fn string(&self, path: &'static str) -> ReportResult<&str> {
        self.get(path)
            .and_then(Value::as_str)
            .ok_or(ReportError::MissingField(path))
    }

    /// Fetch a required sequence
    pub fn sequence(&self, path: &'static str) -> ReportResult<&[Value]> {
        self.get(path)
            .and_then(Value::as_sequence)
            .map(Vec::as_slice)
            .ok_or(ReportError::MissingField(path))
    }

    /// Fetch a required mapping
    pub fn mapping(&self, path: &'static str) -> ReportResult<&Mapping> {
        self.get(path)
            .and_then(Value::as_mapping)
            .ok_or(ReportError::MissingField(path))
    }
}

/// Strip YAML tags recursively, keeping the tagged values
fn untag(value: Value) -> Value {
    match value {
        Value::Tagged(tagged) => untag(tagged.value),
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(untag).collect()),
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(key, value)| (untag(key), untag(value)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// Render any value to its string form.
///
/// Scalars render as their text (null as the empty string), sequences as
/// `[a b c]` and mappings as `map[k:v ...]` with entries sorted. Metric
/// patterns are matched against this form.
pub fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => render_number(n),
        Value::String(s) => s.clone(),
        Value::Sequence(seq) => {
            let items: Vec<String> = seq.iter().map(render).collect();
            format!("[{}]", items.join(" "))
        }
        Value::Mapping(map) => {
            let mut entries: Vec<(&Value, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));

            let items: Vec<String> = entries
                .into_iter()
                .map(|(key, value)| format!("{}:{}", render(key), render(value)))
                .collect();
            format!("map[{}]", items.join(" "))
        }
        Value::Tagged(tagged) => render(&tagged.value),
    }
}

/// Mapping key order: null, bools, numbers, strings, then everything else.
/// Numbers compare by value, everything else by its rendered text.
fn compare_keys(a: &Value, b: &Value) -> Ordering {
    fn rank(key: &Value) -> u8 {
        match key {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            _ => 4,
        }
    }

    rank(a).cmp(&rank(b)).then_with(|| match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        _ => render(a).cmp(&render(b)),
    })
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn render_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else if let Some(f) = n.as_f64() {
        // Shortest decimal form: 10.0 -> "10", 8.4 -> "8.4"
        f.to_string()
    } else {
        n.to_string()
    }
}

/// Flatten a mapping into string keys and rendered values.
///
/// Anything that is not a mapping flattens to an empty map.
pub fn flatten(value: &Value) -> FlatMap {
    value
        .as_mapping()
        .map(|map| {
            map.iter()
                .map(|(key, value)| (render(key), render(value)))
                .collect()
        })
        .unwrap_or_default()
}
