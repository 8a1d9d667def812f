//! Rich enumerated types for hosts without native ones.
//!
//! An enum type is a closed, ordered set of singleton values. Values are
//! compared by declaration order, looked up by position, exact name or
//! snake_case name, carry named fields with defaults, and may override the
//! methods shared by their type.

pub mod config;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod factory;
pub mod field;
pub mod manifest;
pub mod namespace;
pub mod naming;
pub mod record;
pub mod registry;
pub mod value;

pub use config::{FactoryConfig, NamingOptions};
pub use diagnostics::{
    CollectingDiagnosticHandler, ConsoleDiagnosticHandler, Diagnostic, DiagnosticHandler,
    DiagnosticLevel,
};
pub use dispatch::{MethodFn, MethodTable, Resolution};
pub use error::{EnumError, NameKind, Result};
pub use factory::{Declaration, EnumFactory, InitContext, TypeBuilder, ValueDecl};
pub use field::{FieldDef, FieldSchema};
pub use manifest::Manifest;
pub use namespace::Namespace;
pub use record::{EnumValue, InitArgs};
pub use registry::{EnumType, Key, Member, TypeId, TypeRegistry};
pub use value::Value;
