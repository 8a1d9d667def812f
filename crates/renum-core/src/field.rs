//! Field schema: named per-value attributes with optional defaults.

use crate::error::Result;
use crate::registry::Member;
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Computes a field default from the value being initialized.
///
/// The receiver dispatches like any other member, so defaults may call the
/// type's shared methods or read fields resolved before this one.
pub type DefaultFn = Arc<dyn Fn(Member<'_>) -> Result<Value> + Send + Sync>;

/// A declared field
#[derive(Clone)]
pub struct FieldDef {
    name: String,
    default: Option<Value>,
    default_fn: Option<DefaultFn>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            default_fn: None,
        }
    }

    /// Set a static default
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Set a function computing the default from the owning value
    pub fn with_default_fn<F>(mut self, default_fn: F) -> Self
    where
        F: Fn(Member<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.default_fn = Some(Arc::new(default_fn));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub fn has_default_fn(&self) -> bool {
        self.default_fn.is_some()
    }

    /// Resolve this field for `owner`.
    ///
    /// Order: a non-nil explicit value, then the static default, then the
    /// default function. A field with none of these resolves to `Nil`.
    pub fn resolve(&self, owner: Member<'_>, explicit: Option<&Value>) -> Result<Value> {
        if let Some(value) = explicit.filter(|v| !v.is_nil()) {
            return Ok(value.clone());
        }
        if let Some(default) = &self.default {
            return Ok(default.clone());
        }
        match &self.default_fn {
            Some(default_fn) => default_fn(owner),
            None => Ok(Value::Nil),
        }
    }
}

impl From<&str> for FieldDef {
    fn from(name: &str) -> Self {
        FieldDef::new(name)
    }
}

impl fmt::Debug for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDef")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("default_fn", &self.default_fn.is_some())
            .finish()
    }
}

/// The ordered set of fields declared on an enum type.
///
/// Redeclaring a name replaces the earlier entry and moves it to the end.
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    fields: IndexMap<String, FieldDef>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field, returning the entry it replaced
    pub fn declare(&mut self, field: FieldDef) -> Option<FieldDef> {
        let replaced = self.fields.shift_remove(field.name());
        self.fields.insert(field.name.clone(), field);
        replaced
    }

    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.get_index_of(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
