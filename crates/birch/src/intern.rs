//! Process-wide interning for symbols and small integers.
//!
//! The interned-symbol table and small-integer cache are process-wide,
//! built lazily on first use, and read-only afterwards. Unlike
//! `crates/monty/src/intern.rs`'s per-parse `InternerBuilder` (which hands
//! ownership of its strings to one `Executor`), these tables outlive any
//! single render, so they live behind a `OnceLock` rather than being
//! threaded through as owned state.

use std::sync::{Mutex, OnceLock};

use ahash::AHashMap;

/// An interned identifier. Two symbols with equal text compare equal by
/// comparing this index — no string comparison is needed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

struct SymbolTable {
    strings: Vec<Box<str>>,
    by_text: AHashMap<Box<str>, Symbol>,
}

impl SymbolTable {
    fn new() -> Self {
        Self {
            strings: Vec::new(),
            by_text: AHashMap::default(),
        }
    }

    fn intern(&mut self, text: &str) -> Symbol {
        if let Some(sym) = self.by_text.get(text) {
            return *sym;
        }
        let id = Symbol(self.strings.len().try_into().expect("symbol table overflow"));
        let boxed: Box<str> = text.into();
        self.strings.push(boxed.clone());
        self.by_text.insert(boxed, id);
        id
    }

    fn text(&self, sym: Symbol) -> &str {
        &self.strings[sym.0 as usize]
    }
}

static SYMBOLS: OnceLock<Mutex<SymbolTable>> = OnceLock::new();

fn table() -> &'static Mutex<SymbolTable> {
    SYMBOLS.get_or_init(|| Mutex::new(SymbolTable::new()))
}

impl Symbol {
    /// Interns `text`, returning a shared handle. Two calls with equal text
    /// return identical `Symbol`s.
    pub fn intern(text: &str) -> Self {
        table().lock().expect("symbol table poisoned").intern(text)
    }

    /// Looks up the original text for this symbol.
    ///
    /// Returns an owned `String` since the table is behind a lock; callers
    /// needing repeated access should cache the result rather than calling
    /// this in a hot loop.
    pub fn as_str(self) -> String {
        table().lock().expect("symbol table poisoned").text(self).to_owned()
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Highest integer value kept in the small-integer cache, inclusive.
///
/// Pinned from `original_source/source/types/Number.cpp`'s `CACHE_MAX`.
pub const SMALL_INT_CACHE_MAX: i64 = 100;
