use crate::error::{EnumError, NameKind, Result};
use crate::naming;
use crate::registry::EnumType;
use indexmap::IndexMap;

/// A named container that published enum types live in.
///
/// The path of a non-root namespace prefixes the qualified names of its
/// types, so a value `Bar` of `FooValue` in `MyNamespace` displays as
/// `MyNamespace::FooValue::Bar`.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    path: String,
    types: IndexMap<String, EnumType>,
}

impl Namespace {
    pub fn root() -> Self {
        Self::default()
    }

    /// A namespace with a `::`-separated path such as `Outer::Inner`
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if !path.is_empty() {
            naming::validate(NameKind::Namespace, &path, true)?;
        }
        Ok(Self {
            path,
            types: IndexMap::new(),
        })
    }

    /// An empty namespace nested inside this one
    pub fn nested(&self, name: &str) -> Result<Self> {
        naming::validate(NameKind::Namespace, name, true)?;
        Self::new(self.qualify(name))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Qualified name of a type declared here
    pub fn qualify(&self, type_name: &str) -> String {
        if self.is_root() {
            type_name.to_string()
        } else {
            format!("{}::{}", self.path, type_name)
        }
    }

    pub fn get(&self, type_name: &str) -> Option<&EnumType> {
        self.types.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Types in publication order
    pub fn iter(&self) -> impl Iterator<Item = &EnumType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub(crate) fn ensure_available(&self, type_name: &str) -> Result<()> {
        if self.contains(type_name) {
            return Err(EnumError::DuplicateType {
                namespace: self.path.clone(),
                type_name: type_name.to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, enum_type: EnumType) -> Result<()> {
        self.ensure_available(enum_type.name())?;
        self.types.insert(enum_type.name().to_string(), enum_type);
        Ok(())
    }
}
