//! Identifier rules and fuzzy name conversion.

use crate::error::{EnumError, NameKind, Result};
use std::borrow::Cow;

/// Check that `name` is an ASCII identifier: a letter or underscore followed
/// by letters, digits or underscores.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check that `name` is an identifier starting with an uppercase letter
pub fn is_constant_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase()) && is_identifier(name)
}

/// Validate a declared name.
///
/// Types and values must be constant names when `require_capitalized` is set;
/// fields and methods only need to be identifiers.
pub fn validate(kind: NameKind, name: &str, require_capitalized: bool) -> Result<()> {
    let valid = match kind {
        NameKind::Type | NameKind::Value if require_capitalized => is_constant_name(name),
        NameKind::Namespace => name.split("::").all(is_constant_name),
        _ => is_identifier(name),
    };
    if valid {
        Ok(())
    } else {
        Err(EnumError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}

/// Convert a lookup key into the PascalCase form used by value names.
///
/// Keys that do not start with a lowercase ASCII letter are returned as is.
/// Otherwise the first character and every character following an underscore
/// are uppercased, and those underscores are dropped: `foo_bar` becomes
/// `FooBar`. A trailing underscore has nothing to capitalize and is kept.
pub fn fuzzy_key(key: &str) -> Cow<'_, str> {
    if !key.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Cow::Borrowed(key);
    }

    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars().peekable();
    let mut capitalize = true;
    while let Some(c) = chars.next() {
        if capitalize {
            out.extend(c.to_uppercase());
            capitalize = false;
        } else if c == '_' && chars.peek().is_some() {
            if let Some(next) = chars.next() {
                out.extend(next.to_uppercase());
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("foo"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("NOT_STARTED"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier("has space"));
        assert!(!is_identifier("dash-name"));
    }

    #[test]
    fn test_constant_names() {
        assert!(is_constant_name("FooBar"));
        assert!(is_constant_name("RED"));
        assert!(!is_constant_name("fooBar"));
        assert!(!is_constant_name("_Foo"));
    }

    #[test]
    fn test_validate_kinds() {
        assert!(validate(NameKind::Value, "Small", true).is_ok());
        assert!(validate(NameKind::Value, "small", true).is_err());
        assert!(validate(NameKind::Value, "small", false).is_ok());
        assert!(validate(NameKind::Field, "description", true).is_ok());
        assert!(validate(NameKind::Method, "thumbs_up_only_method", true).is_ok());
        assert!(validate(NameKind::Namespace, "Outer::Inner", true).is_ok());
        assert!(validate(NameKind::Namespace, "Outer::", true).is_err());

        let err = validate(NameKind::Field, "not a field", true).unwrap_err();
        assert_eq!(err.to_string(), "Invalid field name 'not a field'");
    }

    #[test]
    fn test_fuzzy_key_snake_case() {
        assert_eq!(fuzzy_key("foo_bar"), "FooBar");
        assert_eq!(fuzzy_key("bar_foo"), "BarFoo");
        assert_eq!(fuzzy_key("small"), "Small");
    }

    #[test]
    fn test_fuzzy_key_passthrough() {
        assert!(matches!(fuzzy_key("FooBar"), Cow::Borrowed("FooBar")));
        assert!(matches!(fuzzy_key("NOT_STARTED"), Cow::Borrowed(_)));
        assert!(matches!(fuzzy_key("_foo"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_fuzzy_key_edge_underscores() {
        // a doubled underscore capitalizes the second underscore and keeps it
        assert_eq!(fuzzy_key("foo__bar"), "Foo_bar");
        assert_eq!(fuzzy_key("foo_"), "Foo_");
        assert_eq!(fuzzy_key("a_b_c"), "ABC");
    }
}
