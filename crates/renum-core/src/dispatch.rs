//! Method tables and two-level dispatch.
//!
//! A value may carry its own [`MethodTable`] of overrides. Calls consult that
//! table first and fall back to the table shared by every value of the type.

use crate::error::Result;
use crate::registry::Member;
use crate::value::Value;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// A method implementation: receives the receiver and positional arguments
pub type MethodFn = Arc<dyn Fn(Member<'_>, &[Value]) -> Result<Value> + Send + Sync>;

/// Methods keyed by name
#[derive(Clone, Default)]
pub struct MethodTable {
    methods: FxHashMap<String, MethodFn>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self {
            methods: FxHashMap::default(),
        }
    }

    /// Define `name`, returning the implementation it replaced
    pub fn define<F>(&mut self, name: impl Into<String>, method: F) -> Option<MethodFn>
    where
        F: Fn(Member<'_>, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(method))
    }

    pub fn get(&self, name: &str) -> Option<&MethodFn> {
        self.methods.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Method names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for MethodTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Where a dispatched method was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Override,
    Shared,
}

/// Resolve `method` against a value's overrides, then the type's shared table
pub fn resolve<'t>(
    overrides: Option<&'t MethodTable>,
    shared: &'t MethodTable,
    method: &str,
) -> Option<(&'t MethodFn, Resolution)> {
    if let Some(found) = overrides.and_then(|table| table.get(method)) {
        return Some((found, Resolution::Override));
    }
    shared.get(method).map(|found| (found, Resolution::Shared))
}
