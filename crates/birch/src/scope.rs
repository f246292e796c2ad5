//! The lexical evaluation environment.
//!
//! Grounded on `crates/monty/src/namespace.rs`'s `Namespace`/`Namespaces`
//! split, generalized from compile-time slot indices to runtime name
//! lookup: that design resolves locals to `NamespaceId` slots because it
//! compiles to bytecode ahead of time, a stage this evaluator doesn't have
//! (see `DESIGN.md`). `Scope` instead walks a chain of `AHashMap` frames by
//! name.

use std::cell::RefCell;
use std::rc::Rc;

use ahash::AHashMap;

use crate::intern::Symbol;
use crate::value::{Value, ViewModel};

struct Frame {
    bindings: RefCell<AHashMap<Symbol, Value>>,
    parent: Option<Scope>,
}

/// A lexically nested variable environment. Cheap to clone: it shares its
/// frame chain via `Rc`, so a pushed child scope shares ownership of its
/// parent rather than copying it.
#[derive(Clone)]
pub struct Scope {
    frame: Rc<Frame>,
    root: Rc<dyn ViewModel>,
}

impl Scope {
    /// Creates the root scope for a render/eval call, with `root` as the
    /// implicit receiver (`self`) for bare identifiers.
    pub fn new(root: Rc<dyn ViewModel>) -> Self {
        Scope {
            frame: Rc::new(Frame {
                bindings: RefCell::new(AHashMap::default()),
                parent: None,
            }),
            root,
        }
    }

    /// Pushes a new child frame sharing this scope as its parent.
    pub fn push(&self) -> Scope {
        Scope {
            frame: Rc::new(Frame {
                bindings: RefCell::new(AHashMap::default()),
                parent: Some(self.clone()),
            }),
            root: self.root.clone(),
        }
    }

    /// The implicit receiver for bare identifiers not bound as locals.
    pub fn root_view_model(&self) -> &Rc<dyn ViewModel> {
        &self.root
    }

    /// Searches inner-to-outer for `name`, returning the bound value if
    /// any frame in the chain has it.
    pub fn get(&self, name: Symbol) -> Option<Value> {
        let mut frame = &self.frame;
        loop {
            if let Some(v) = frame.bindings.borrow().get(&name) {
                return Some(v.clone());
            }
            match &frame.parent {
                Some(parent) => frame = &parent.frame,
                None => return None,
            }
        }
    }

    /// Writes `name` in the innermost frame where it is already bound, or
    /// creates it in the innermost (current) frame if it is new anywhere
    /// in the chain.
    pub fn set(&self, name: Symbol, value: Value) {
        let mut frame = &self.frame;
        loop {
            if frame.bindings.borrow().contains_key(&name) {
                frame.bindings.borrow_mut().insert(name, value);
                return;
            }
            match &frame.parent {
                Some(parent) => frame = &parent.frame,
                None => break,
            }
        }
        self.frame.bindings.borrow_mut().insert(name, value);
    }

    /// Returns every name currently bound anywhere in the chain. Used by
    /// the host template parser to pre-register locals before parsing
    /// expressions that reference them.
    pub fn bound_names(&self) -> Vec<Symbol> {
        let mut names = Vec::new();
        let mut frame = Some(&self.frame);
        while let Some(f) = frame {
            names.extend(f.bindings.borrow().keys().copied());
            frame = f.parent.as_ref().map(|p| &p.frame);
        }
        names
    }
}
