//! Enumerators: a deferred reference to an iteration method.
//!
//! Grounded on `original_source/source/types/Enumerator.cpp`'s
//! `MethodEnumerator`/`FunctionEnumerator` split, collapsed to one struct
//! since both variants only ever differ in how they forward `each` — here
//! that forwarding is just another method dispatch on `receiver`.

use super::Value;

#[derive(Debug, Clone)]
pub struct EnumeratorValue {
    pub receiver: Value,
    pub selector: String,
    pub prefix_args: Vec<Value>,
}

impl EnumeratorValue {
    pub fn new(receiver: Value, selector: impl Into<String>, prefix_args: Vec<Value>) -> Self {
        Self {
            receiver,
            selector: selector.into(),
            prefix_args,
        }
    }
}
