//! Per-type value registries.
//!
//! A [`TypeRegistry`] is built by the factory: values are registered in
//! declaration order, then the registry is finalized and published as an
//! immutable [`EnumType`] handle that can be shared freely.

use crate::dispatch::{self, MethodTable, Resolution};
use crate::error::{EnumError, Result};
use crate::field::FieldSchema;
use crate::naming::fuzzy_key;
use crate::record::EnumValue;
use crate::value::Value;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;
use std::ops::Deref;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

static NEXT_TYPE_ID: AtomicU32 = AtomicU32::new(0);

/// Process-unique identifier of an enum type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(u32);

impl TypeId {
    /// Allocate a fresh id; ids increase in creation order
    pub fn next() -> Self {
        Self(NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

pub(crate) struct TypeData {
    id: TypeId,
    name: String,
    qualified_name: Arc<str>,
    values: Vec<EnumValue>,
    fields: FieldSchema,
    name_index: FxHashMap<Arc<str>, usize>,
    shared: MethodTable,
    fuzzy_lookup: bool,
}

impl TypeData {
    pub(crate) fn fields(&self) -> &FieldSchema {
        &self.fields
    }
}

/// A registry under construction
pub struct TypeRegistry {
    data: TypeData,
    names: FxHashSet<Arc<str>>,
    finalized: bool,
}

impl TypeRegistry {
    /// Create an empty registry. `qualified_name` prefixes canonical value names.
    pub fn new(name: impl Into<String>, qualified_name: impl Into<Arc<str>>) -> Self {
        let name = name.into();
        let id = TypeId::next();
        debug!(type_name = %name, type_id = id.as_u32(), "Creating enum registry");
        Self {
            data: TypeData {
                id,
                name,
                qualified_name: qualified_name.into(),
                values: Vec::new(),
                fields: FieldSchema::new(),
                name_index: FxHashMap::default(),
                shared: MethodTable::new(),
                fuzzy_lookup: true,
            },
            names: FxHashSet::default(),
            finalized: false,
        }
    }

    pub fn id(&self) -> TypeId {
        self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn qualified_name(&self) -> &Arc<str> {
        &self.data.qualified_name
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Route string keys given to [`EnumType::get`] through fuzzy lookup
    pub fn set_fuzzy_lookup(&mut self, enabled: bool) {
        self.data.fuzzy_lookup = enabled;
    }

    /// Start a value owned by this registry
    pub fn new_value(&self, name: &str) -> EnumValue {
        EnumValue::new(self.data.id, self.data.qualified_name.clone(), name)
    }

    /// Append `value`, assigning it the next index
    pub fn register(&mut self, mut value: EnumValue) -> Result<usize> {
        self.ensure_building()?;
        if value.type_id() != self.data.id {
            return Err(EnumError::ForeignValue {
                value: value.to_string(),
                type_name: self.data.qualified_name.to_string(),
            });
        }
        let name: Arc<str> = Arc::from(value.name());
        if self.names.contains(&name) {
            return Err(EnumError::DuplicateName {
                type_name: self.data.qualified_name.to_string(),
                name: name.to_string(),
            });
        }

        let index = self.data.values.len();
        value.set_index(index);
        trace!(value = %value, index, "Registered enum value");
        self.names.insert(name);
        self.data.values.push(value);
        Ok(index)
    }

    pub fn fields(&self) -> &FieldSchema {
        &self.data.fields
    }

    pub fn fields_mut(&mut self) -> Result<&mut FieldSchema> {
        self.ensure_building()?;
        Ok(&mut self.data.fields)
    }

    pub fn shared_methods(&self) -> &MethodTable {
        &self.data.shared
    }

    pub fn shared_methods_mut(&mut self) -> Result<&mut MethodTable> {
        self.ensure_building()?;
        Ok(&mut self.data.shared)
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.data.values
    }

    /// Run `init` once per value, paired with its entry in `args`.
    ///
    /// Each value is handed over mutably next to a read-only view of the type,
    /// so `init` can dispatch shared methods on the value it is initializing.
    pub(crate) fn init_values<A, F>(&mut self, args: &[A], mut init: F) -> Result<()>
    where
        F: FnMut(&TypeData, &mut EnumValue, &A) -> Result<()>,
    {
        self.ensure_building()?;
        let mut values = std::mem::take(&mut self.data.values);
        let result = values
            .iter_mut()
            .zip(args)
            .try_for_each(|(value, args)| init(&self.data, value, args));
        self.data.values = values;
        result
    }

    pub fn len(&self) -> usize {
        self.data.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.values.is_empty()
    }

    /// Build the name index and freeze the registry. Calling it again is a no-op.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.data.name_index = self
            .data
            .values
            .iter()
            .map(|value| (Arc::from(value.name()), value.index()))
            .collect();
        self.finalized = true;
        debug!(
            type_name = %self.data.qualified_name,
            values = self.data.values.len(),
            fields = self.data.fields.len(),
            "Finalized enum"
        );
    }

    /// Finalize if needed and hand out the shareable type handle
    pub fn publish(mut self) -> EnumType {
        self.finalize();
        EnumType {
            data: Arc::new(self.data),
        }
    }

    fn ensure_building(&self) -> Result<()> {
        if self.finalized {
            return Err(EnumError::TypeFinalized {
                type_name: self.data.qualified_name.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("name", &self.data.qualified_name)
            .field("values", &self.data.values.len())
            .field("finalized", &self.finalized)
            .finish()
    }
}

/// Key accepted by [`EnumType::get`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key<'a> {
    Index(i64),
    Name(&'a str),
}

impl From<i64> for Key<'_> {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<i32> for Key<'_> {
    fn from(index: i32) -> Self {
        Key::Index(index as i64)
    }
}

impl From<usize> for Key<'_> {
    fn from(index: usize) -> Self {
        Key::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(name: &'a str) -> Self {
        Key::Name(name)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(name: &'a String) -> Self {
        Key::Name(name)
    }
}

/// A published, immutable enum type. Clones share the same registry.
#[derive(Clone)]
pub struct EnumType {
    data: Arc<TypeData>,
}

impl EnumType {
    pub fn id(&self) -> TypeId {
        self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// Name including the namespace path
    pub fn qualified_name(&self) -> &str {
        &self.data.qualified_name
    }

    pub fn len(&self) -> usize {
        self.data.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.values.is_empty()
    }

    /// All values in declaration order
    pub fn values(&self) -> &[EnumValue] {
        &self.data.values
    }

    pub fn all(&self) -> &[EnumValue] {
        self.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = Member<'_>> + '_ {
        self.data.values.iter().map(move |value| self.wrap(value))
    }

    pub fn first(&self) -> Option<Member<'_>> {
        self.data.values.first().map(|value| self.wrap(value))
    }

    pub fn last(&self) -> Option<Member<'_>> {
        self.data.values.last().map(|value| self.wrap(value))
    }

    /// Value at `index`; negative or past-the-end indices are errors
    pub fn by_index(&self, index: i64) -> Result<Member<'_>> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.data.values.get(i))
            .map(|value| self.wrap(value))
            .ok_or_else(|| EnumError::IndexOutOfRange {
                type_name: self.data.qualified_name.to_string(),
                index,
                len: self.data.values.len(),
            })
    }

    /// Case-sensitive lookup; `None` when no value has that name
    pub fn by_exact_name(&self, name: &str) -> Option<Member<'_>> {
        self.data
            .name_index
            .get(name)
            .map(|&index| self.wrap(&self.data.values[index]))
    }

    pub fn with_name(&self, name: &str) -> Option<Member<'_>> {
        self.by_exact_name(name)
    }

    /// Lookup that also accepts snake_case keys (`foo_bar` finds `FooBar`)
    pub fn by_fuzzy(&self, key: &str) -> Option<Member<'_>> {
        self.by_exact_name(&fuzzy_key(key))
    }

    /// Indexing entry point: integers go by position, strings by name
    pub fn get<'k>(&self, key: impl Into<Key<'k>>) -> Result<Option<Member<'_>>> {
        match key.into() {
            Key::Index(index) => self.by_index(index).map(Some),
            Key::Name(name) if self.data.fuzzy_lookup => Ok(self.by_fuzzy(name)),
            Key::Name(name) => Ok(self.by_exact_name(name)),
        }
    }

    /// Read-only view of the name index
    pub fn values_by_name(&self) -> impl Iterator<Item = (&str, Member<'_>)> + '_ {
        self.data
            .name_index
            .iter()
            .map(move |(name, &index)| (&**name, self.wrap(&self.data.values[index])))
    }

    pub fn fields(&self) -> &FieldSchema {
        &self.data.fields
    }

    pub fn shared_methods(&self) -> &MethodTable {
        &self.data.shared
    }

    /// Pair `value` with this type, if it belongs to it
    pub fn member<'a>(&'a self, value: &'a EnumValue) -> Option<Member<'a>> {
        (value.type_id() == self.data.id).then(|| self.wrap(value))
    }

    fn wrap<'a>(&'a self, value: &'a EnumValue) -> Member<'a> {
        Member::new(&self.data, value)
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.data.id == other.data.id
    }
}

impl Eq for EnumType {}

impl fmt::Display for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.data.qualified_name)
    }
}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumType")
            .field("name", &self.data.qualified_name)
            .field(
                "values",
                &self.data.values.iter().map(EnumValue::name).collect::<Vec<_>>(),
            )
            .field("fields", &self.data.fields.names().collect::<Vec<_>>())
            .field("shared_methods", &self.data.shared)
            .finish()
    }
}

/// A value paired with its type, which is what method dispatch needs.
///
/// Members are also handed to default functions and init hooks while the
/// type is still being built; the type's lookup indices are not available
/// then, but shared methods and the field schema are.
#[derive(Clone, Copy)]
pub struct Member<'a> {
    data: &'a TypeData,
    value: &'a EnumValue,
}

impl<'a> Member<'a> {
    pub(crate) fn new(data: &'a TypeData, value: &'a EnumValue) -> Self {
        Self { data, value }
    }

    pub fn value(&self) -> &'a EnumValue {
        self.value
    }

    /// Fields declared by the owning type
    pub fn type_fields(&self) -> &'a FieldSchema {
        &self.data.fields
    }

    /// Find where `method` would dispatch to, without calling it
    pub fn responds_to(&self, method: &str) -> Option<Resolution> {
        dispatch::resolve(self.value.overrides(), &self.data.shared, method)
            .map(|(_, resolution)| resolution)
    }

    /// Call `method`: the value's own override first, then the type's shared method
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        match dispatch::resolve(self.value.overrides(), &self.data.shared, method) {
            Some((implementation, resolution)) => {
                trace!(receiver = %self.value, method, ?resolution, "Dispatching");
                implementation(*self, args)
            }
            None => {
                debug!(receiver = %self.value, method, "Method not found");
                Err(EnumError::MethodNotFound {
                    receiver: self.value.to_string(),
                    method: method.to_string(),
                })
            }
        }
    }
}

impl Deref for Member<'_> {
    type Target = EnumValue;

    fn deref(&self) -> &EnumValue {
        self.value
    }
}

impl PartialEq for Member<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Member<'_> {}

impl PartialEq<EnumValue> for Member<'_> {
    fn eq(&self, other: &EnumValue) -> bool {
        self.value == other
    }
}

impl PartialOrd for Member<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Member<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(other.value)
    }
}

impl fmt::Display for Member<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.value, f)
    }
}

impl fmt::Debug for Member<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.value, f)
    }
}
