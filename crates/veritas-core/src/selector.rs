//! Structured predicates for ledger queries
//!
//! A [`Selector`] is the portable form of a rich query: a conjunction of
//! field-equality and element-match clauses evaluated against the JSON form
//! of a stored value. Ledger handlers that have a native query engine may
//! translate it; the in-tree handlers evaluate it with [`Selector::matches`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One clause of a selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Clause {
    /// Value at `path` equals `value`
    Eq {
        /// Dotted path from the document root
        path: String,
        /// Expected value
        value: Value,
    },
    /// Array at `path` has at least one object whose `field` equals `value`
    ElemMatch {
        /// Dotted path to an array of objects
        path: String,
        /// Field inside each element
        field: String,
        /// Expected value
        value: Value,
    },
}

/// Conjunction of clauses; an empty selector matches everything
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selector {
    /// All clauses must hold
    pub clauses: Vec<Clause>,
}

impl Selector {
    /// Empty selector
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality clause
    pub fn eq(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::Eq {
            path: path.into(),
            value: value.into(),
        });
        self
    }

    /// Add an element-match clause
    pub fn elem_match(
        mut self,
        path: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.clauses.push(Clause::ElemMatch {
            path: path.into(),
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Evaluate against a decoded JSON document
    pub fn matches(&self, doc: &Value) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Eq { path, value } => lookup(doc, path) == Some(value),
            Clause::ElemMatch { path, field, value } => lookup(doc, path)
                .and_then(Value::as_array)
                .map(|items| items.iter().any(|item| item.get(field) == Some(value)))
                .unwrap_or(false),
        })
    }

    /// Evaluate against raw stored bytes; undecodable values never match
    pub fn matches_bytes(&self, bytes: &[u8]) -> bool {
        serde_json::from_slice::<Value>(bytes)
            .map(|doc| self.matches(&doc))
            .unwrap_or(false)
    }
}

fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(doc, |node, segment| node.get(segment))
}
