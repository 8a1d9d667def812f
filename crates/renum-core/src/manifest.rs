//! Plain-data declarations of enum types, loaded from YAML or JSON.
//!
//! A manifest can express names, fields with static defaults and per-value
//! arguments. Methods and computed defaults need the builder API.

use crate::config::is_yaml;
use crate::error::{EnumError, Result};
use crate::factory::{Declaration, EnumFactory, ValueDecl};
use crate::field::FieldDef;
use crate::namespace::Namespace;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Namespace path; types go to the root namespace when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default)]
    pub types: Vec<TypeManifest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeManifest {
    pub name: String,

    #[serde(default)]
    pub fields: Vec<FieldManifest>,

    #[serde(default)]
    pub values: Vec<ValueManifest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldManifest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// A value given either as a bare name or with arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueManifest {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        args: Vec<Value>,
        #[serde(default)]
        fields: IndexMap<String, Value>,
    },
}

impl ValueManifest {
    pub fn name(&self) -> &str {
        match self {
            ValueManifest::Name(name) => name,
            ValueManifest::Detailed { name, .. } => name,
        }
    }

    fn to_decl(&self) -> ValueDecl {
        match self {
            ValueManifest::Name(name) => ValueDecl::new(name.as_str()),
            ValueManifest::Detailed { name, args, fields } => fields.iter().fold(
                ValueDecl::new(name.as_str()).args(args.iter().cloned()),
                |decl, (field, value)| decl.field(field.as_str(), value.clone()),
            ),
        }
    }
}

impl Manifest {
    /// Load a manifest from a JSON or YAML file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let parsed = if is_yaml(path) {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        };
        parsed.map_err(|e| match e {
            EnumError::Config(message) => EnumError::Manifest {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| EnumError::Config(e.to_string()))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| EnumError::Config(e.to_string()))
    }

    /// Create every declared type with `factory`, in manifest order
    pub fn build(&self, factory: &EnumFactory) -> Result<Namespace> {
        let mut namespace = match &self.namespace {
            Some(path) => Namespace::new(path.as_str())?,
            None => Namespace::root(),
        };

        for declared in &self.types {
            debug!(type_name = %declared.name, "Building enum from manifest");
            factory.create(
                &mut namespace,
                &declared.name,
                Declaration::body(|builder| {
                    for field in &declared.fields {
                        let mut def = FieldDef::new(field.name.as_str());
                        if let Some(default) = &field.default {
                            def = def.with_default(default.clone());
                        }
                        builder.field(def)?;
                    }
                    for value in &declared.values {
                        builder.value(value.to_decl())?;
                    }
                    Ok(())
                }),
            )?;
        }

        Ok(namespace)
    }
}
