//! Hashes: insertion-ordered mappings from `Value` to `Value`, keyed by
//! structural equality, with strings and symbols hashed by content.
//!
//! Grounded on `crates/monty/src/types/dict.rs`'s `Dict` (an `IndexMap`
//! wrapper preserving Python 3.7+ insertion order) — `indexmap` is reused
//! here for the same guarantee: reassigning an existing key does not
//! change its position.

use std::cell::RefCell;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use super::Value;

/// Wraps a `Value` so it can be used as an `IndexMap`/`HashMap` key,
/// implementing content-based equality and hashing for hashable values.
#[derive(Clone)]
pub struct HashKey(pub Value);

impl PartialEq for HashKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.value_eq(&other.0)
    }
}
impl Eq for HashKey {}

impl Hash for HashKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(&self.0, state);
    }
}

fn hash_value<H: Hasher>(v: &Value, state: &mut H) {
    match v {
        Value::Nil => 0u8.hash(state),
        Value::Boolean(b) => {
            1u8.hash(state);
            b.hash(state);
        }
        Value::Number(n) => {
            2u8.hash(state);
            // -0.0 and 0.0 compare equal; normalize so their hashes match.
            let bits = if **n == 0.0 { 0.0f64 } else { **n }.to_bits();
            bits.hash(state);
        }
        Value::String(s) => {
            3u8.hash(state);
            s.as_str().hash(state);
        }
        Value::Symbol(s) => {
            4u8.hash(state);
            s.hash(state);
        }
        Value::Array(a) => {
            5u8.hash(state);
            for item in a.items.borrow().iter() {
                hash_value(item, state);
            }
        }
        // Hash/Proc/Enumerator/Object hash (and compare, via value_eq) by identity.
        Value::Hash(h) => (std::rc::Rc::as_ptr(h) as usize).hash(state),
        Value::Proc(p) => (std::rc::Rc::as_ptr(p) as usize).hash(state),
        Value::Enumerator(e) => (std::rc::Rc::as_ptr(e) as usize).hash(state),
        Value::Object(o) => (std::rc::Rc::as_ptr(o) as *const () as usize).hash(state),
    }
}

#[derive(Debug, Default)]
pub struct HashValue {
    pub entries: RefCell<IndexMap<HashKeyDebug, Value>>,
}

/// `HashKey` wrapped again purely so `#[derive(Debug)]` works above without
/// requiring `Value` or `HashKey` to implement `Debug` in a way that could
/// recurse through cyclic view-model graphs; this just defers to
/// `Value::inspect`.
pub struct HashKeyDebug(pub HashKey);

impl std::fmt::Debug for HashKeyDebug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0 .0.inspect())
    }
}
impl PartialEq for HashKeyDebug {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for HashKeyDebug {}
impl Hash for HashKeyDebug {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl HashValue {
    pub fn from_pairs(pairs: Vec<(Value, Value)>) -> Self {
        let mut entries = IndexMap::new();
        for (k, v) in pairs {
            entries.insert(HashKeyDebug(HashKey(k)), v);
        }
        Self {
            entries: RefCell::new(entries),
        }
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        self.entries.borrow().get(&HashKeyDebug(HashKey(key.clone()))).cloned()
    }

    /// Sets `key` to `value`. If `key` already exists its position is
    /// unchanged (`IndexMap::insert` semantics).
    pub fn set(&self, key: Value, value: Value) {
        self.entries.borrow_mut().insert(HashKeyDebug(HashKey(key)), value);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.borrow().contains_key(&HashKeyDebug(HashKey(key.clone())))
    }

    pub fn keys(&self) -> Vec<Value> {
        self.entries.borrow().keys().map(|k| k.0 .0.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.entries.borrow().values().cloned().collect()
    }

    pub fn pairs(&self) -> Vec<(Value, Value)> {
        self.entries
            .borrow()
            .iter()
            .map(|(k, v)| (k.0 .0.clone(), v.clone()))
            .collect()
    }

    pub fn value_eq(&self, other: &HashValue) -> bool {
        let a = self.entries.borrow();
        let b = other.entries.borrow();
        if a.len() != b.len() {
            return false;
        }
        a.iter().all(|(k, v)| b.get(k).is_some_and(|ov| ov.value_eq(v)))
    }

    pub fn inspect(&self) -> String {
        let mut out = String::from("{");
        for (i, (k, v)) in self.entries.borrow().iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&k.0 .0.inspect());
            out.push_str(" => ");
            out.push_str(&v.inspect());
        }
        out.push('}');
        out
    }
}
