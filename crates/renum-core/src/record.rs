//! Value records: the singleton members of an enum type.

use crate::dispatch::MethodTable;
use crate::error::{EnumError, Result};
use crate::registry::{Member, TypeData, TypeId};
use crate::value::Value;
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Arguments a value was declared with
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitArgs {
    pub positional: Vec<Value>,
    pub keyed: IndexMap<String, Value>,
}

impl InitArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyed.is_empty()
    }
}

/// One member of an enum type.
///
/// Identity is the pair (owning type, index); names are unique per type and
/// never change after creation.
#[derive(Clone)]
pub struct EnumValue {
    type_id: TypeId,
    type_name: Arc<str>,
    name: Arc<str>,
    index: usize,
    fields: IndexMap<String, Value>,
    overrides: Option<MethodTable>,
}

impl EnumValue {
    /// Create an unregistered value; its index is assigned on registration
    pub fn new(type_id: TypeId, type_name: Arc<str>, name: impl Into<Arc<str>>) -> Self {
        Self {
            type_id,
            type_name,
            name: name.into(),
            index: 0,
            fields: IndexMap::new(),
            overrides: None,
        }
    }

    /// Attach instance-specific methods
    pub fn with_overrides(mut self, overrides: MethodTable) -> Self {
        self.overrides = (!overrides.is_empty()).then_some(overrides);
        self
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Qualified name of the owning type
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Value of a declared field; `None` if the type has no such field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn overrides(&self) -> Option<&MethodTable> {
        self.overrides.as_ref()
    }

    /// Whether this value defines `method` itself
    pub fn overrides_method(&self, method: &str) -> bool {
        self.overrides
            .as_ref()
            .is_some_and(|table| table.contains(method))
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub(crate) fn set_field(&mut self, name: &str, value: Value) -> Result<()> {
        match self.fields.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(EnumError::UnknownField {
                receiver: self.to_string(),
                field: name.to_string(),
            }),
        }
    }

    /// Resolve every field declared by `owner` from the declaration arguments.
    ///
    /// Positional arguments bind to fields in schema order and keyed arguments
    /// bind by name, taking precedence over a positional value for the same
    /// field. `allow_extra_positional` lets an init hook consume arguments
    /// beyond the declared fields. Returns the keyed arguments that name no
    /// field when `strict_fields` is off.
    pub(crate) fn init(
        &mut self,
        owner: &TypeData,
        args: &InitArgs,
        strict_fields: bool,
        allow_extra_positional: bool,
    ) -> Result<Vec<String>> {
        let schema = owner.fields();
        if !allow_extra_positional && args.positional.len() > schema.len() {
            return Err(EnumError::TooManyArguments {
                receiver: self.to_string(),
                expected: schema.len(),
                given: args.positional.len(),
            });
        }

        let mut ignored = Vec::new();
        for key in args.keyed.keys() {
            if !schema.contains(key) {
                if strict_fields {
                    return Err(EnumError::UnknownField {
                        receiver: self.to_string(),
                        field: key.clone(),
                    });
                }
                ignored.push(key.clone());
            }
        }

        // slots exist up front so default functions see every field name
        self.fields = schema
            .names()
            .map(|name| (name.to_string(), Value::Nil))
            .collect();

        for (position, field) in schema.iter().enumerate() {
            let explicit = args
                .keyed
                .get(field.name())
                .or_else(|| args.positional.get(position));
            let resolved = field.resolve(Member::new(owner, self), explicit)?;
            self.set_field(field.name(), resolved)?;
        }

        Ok(ignored)
    }
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.type_name, self.name)
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumValue")
            .field("value", &format_args!("{}", self))
            .field("index", &self.index)
            .field("fields", &self.fields)
            .field("overrides", &self.overrides)
            .finish()
    }
}

impl PartialEq for EnumValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.index == other.index
    }
}

impl Eq for EnumValue {}

impl Hash for EnumValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.index.hash(state);
    }
}

impl PartialOrd for EnumValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Declaration order within a type; values of different types order by the
/// creation order of their types.
impl Ord for EnumValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_id
            .cmp(&other.type_id)
            .then(self.index.cmp(&other.index))
    }
}
