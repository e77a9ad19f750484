//! Decision variables.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u64);

impl ExprId {
    /// Generate a new unique ID.
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        ExprId(NEXT_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for ExprId {
    fn default() -> Self {
        Self::new()
    }
}

/// A vector-valued decision variable with no a-priori bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    id: ExprId,
    len: usize,
    name: Option<String>,
}

impl Variable {
    /// Create an anonymous variable of the given length.
    pub fn new(len: usize) -> Self {
        Variable {
            id: ExprId::new(),
            len,
            name: None,
        }
    }

    /// Create a named variable of the given length.
    pub fn named(name: impl Into<String>, len: usize) -> Self {
        Variable {
            id: ExprId::new(),
            len,
            name: Some(name.into()),
        }
    }

    pub fn id(&self) -> ExprId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Create an anonymous variable of length `n`.
pub fn variable(n: usize) -> Variable {
    Variable::new(n)
}
