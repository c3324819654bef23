//! Key-value contract state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A value stored under a state key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Uint(u128),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uint(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
        }
    }
}

/// Deterministic key-value state.
///
/// Backed by a `BTreeMap` so iteration order — and therefore any derived
/// serialization or hash — is identical on every participant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractState {
    entries: BTreeMap<String, Value>,
}

impl ContractState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Read a key as an unsigned integer; missing keys read as zero.
    pub fn get_uint(&self, key: &str) -> Option<u128> {
        match self.entries.get(key) {
            Some(Value::Uint(n)) => Some(*n),
            Some(Value::Text(_)) => None,
            None => Some(0),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in deterministic (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_uint_reads_as_zero() {
        let state = ContractState::new();
        assert_eq!(state.get_uint("nobody"), Some(0));
    }

    #[test]
    fn text_value_is_not_a_uint() {
        let mut state = ContractState::new();
        state.insert("motd", Value::Text("hello".into()));
        assert_eq!(state.get_uint("motd"), None);
    }

    #[test]
    fn iteration_order_is_sorted() {
        let mut state = ContractState::new();
        state.insert("zeta", Value::Uint(1));
        state.insert("alpha", Value::Uint(2));

        let keys: Vec<&String> = state.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }
}
