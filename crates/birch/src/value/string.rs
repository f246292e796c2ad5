//! Strings: immutable UTF-8 byte sequences.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringValue {
    text: String,
}

impl StringValue {
    pub fn new(text: String) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
