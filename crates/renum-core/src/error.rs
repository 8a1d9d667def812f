use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnumError {
    #[error("Duplicate value name '{name}' in enum {type_name}")]
    DuplicateName { type_name: String, name: String },

    #[error("Enum {type_name} is finalized and cannot be modified")]
    TypeFinalized { type_name: String },

    #[error("Undefined method '{method}' for {receiver}")]
    MethodNotFound { receiver: String, method: String },

    #[error("Index {index} out of range for enum {type_name} with {len} values")]
    IndexOutOfRange {
        type_name: String,
        index: i64,
        len: usize,
    },

    #[error("Invalid {kind} name '{name}'")]
    InvalidName { kind: NameKind, name: String },

    #[error("{value} belongs to another enum than {type_name}")]
    ForeignValue { value: String, type_name: String },

    #[error("Enum {type_name} is already defined in namespace '{namespace}'")]
    DuplicateType { namespace: String, type_name: String },

    #[error("Unknown field '{field}' given for {receiver}")]
    UnknownField { receiver: String, field: String },

    #[error("{receiver} takes at most {expected} positional arguments, {given} given")]
    TooManyArguments {
        receiver: String,
        expected: usize,
        given: usize,
    },

    #[error("Method '{method}' is not implemented for {receiver}")]
    NotImplemented { receiver: String, method: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Manifest error in {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What an invalid name was meant to identify
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Type,
    Value,
    Field,
    Method,
    Namespace,
}

impl std::fmt::Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            NameKind::Type => "type",
            NameKind::Value => "value",
            NameKind::Field => "field",
            NameKind::Method => "method",
            NameKind::Namespace => "namespace",
        };
        f.write_str(kind)
    }
}

pub type Result<T> = std::result::Result<T, EnumError>;
