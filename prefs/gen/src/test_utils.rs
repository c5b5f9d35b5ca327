//! Shared test utilities for prefs-gen tests.
//!
//! Fixtures for accessor specs and declaration sets, so module tests do not
//! each rebuild them by hand.

use crate::classifier::{AccessorSpec, Role, ValueType};
use crate::key_resolver::KeyResolver;
use crate::model::TypeRef;
use crate::parser::parse_type;
use crate::source::DeclarationSet;
use crate::type_mapper::TypeMapper;

/// Declaring interface used by the spec fixtures.
pub const SETTINGS: &str = "crate::Settings";

fn value_type(ty: &str) -> ValueType {
    let ty = parse_type(ty).unwrap_or_else(|e| panic!("invalid fixture type `{ty}`: {e}"));
    ValueType {
        kind: TypeMapper::classify(&ty),
        ty,
    }
}

/// Creates a getter spec named after its key, with the zero default.
///
/// ## Arguments
///
/// * `key` - Storage key and method name
/// * `ty` - Return type in Rust syntax, e.g. `HashSet<String>`
pub fn getter_spec(key: &str, ty: &str) -> AccessorSpec {
    let value_type = value_type(ty);
    AccessorSpec {
        key: key.to_string(),
        role: Role::Getter,
        default_value: Some(KeyResolver::zero_default(value_type.kind)),
        return_type: value_type.ty.clone(),
        value_type,
        has_explicit_default: false,
        declaring_interface: SETTINGS.to_string(),
        method_name: key.to_string(),
        parameter_name: None,
        fluent: false,
        location: None,
    }
}

/// Creates a `set_<key>` putter spec returning `()`.
pub fn putter_spec(key: &str, ty: &str) -> AccessorSpec {
    AccessorSpec {
        key: key.to_string(),
        role: Role::Putter,
        value_type: value_type(ty),
        has_explicit_default: false,
        default_value: None,
        declaring_interface: SETTINGS.to_string(),
        method_name: format!("set_{key}"),
        parameter_name: Some(key.to_string()),
        return_type: TypeRef::Unit,
        fluent: false,
        location: None,
    }
}

/// Parses `source` as the crate root.
pub fn declarations(source: &str) -> DeclarationSet {
    let mut set = DeclarationSet::new();
    set.add_source(&[], None, source)
        .unwrap_or_else(|e| panic!("invalid fixture source: {e}"));
    set
}
