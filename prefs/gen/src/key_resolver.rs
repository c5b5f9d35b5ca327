//! Derivation of storage keys and getter defaults.
//!
//! A key is the method name with its role prefix stripped (`get_`/`is_` for
//! getters, `set_`/`put_` for putters), so `username`, `get_username` and
//! `set_username` all share the key `username`. `#[pref(key = "...")]` takes
//! precedence over the derived key.

use syn::{Lit, parse_quote};

use crate::classifier::Role;
use crate::diagnostics::Attribution;
use crate::errors::GeneratorError;
use crate::model::{DefaultValue, MethodDecl};
use crate::type_mapper::{PrimitiveKind, ValueKind};

const GETTER_PREFIXES: &[&str] = &["get_", "is_"];
const PUTTER_PREFIXES: &[&str] = &["set_", "put_"];

/// The key and default of one accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyResolution {
    pub key: String,
    /// Always present for getters, never for putters.
    pub default: Option<DefaultValue>,
    pub has_explicit_default: bool,
}

pub struct KeyResolver;

impl KeyResolver {
    /// Strips the first matching role prefix from `name`.
    pub fn derive_key(name: &str, role: Role) -> &str {
        let prefixes = match role {
            Role::Getter => GETTER_PREFIXES,
            Role::Putter => PUTTER_PREFIXES,
        };
        prefixes
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix))
            .unwrap_or(name)
    }

    /// Resolves the key and default of `method` in the given role.
    ///
    /// ## Errors
    ///
    /// - [`GeneratorError::InvalidKey`] if the key is empty
    /// - [`GeneratorError::InvalidDefault`] if an explicit default literal does
    ///   not fit `kind`
    pub fn resolve(
        interface: &str,
        method: &MethodDecl,
        role: Role,
        kind: ValueKind,
    ) -> Result<KeyResolution, GeneratorError> {
        let at = || Attribution::method(interface, &method.name).at(method.location.clone());

        let key = match &method.meta.key {
            Some(key) => key.trim().to_string(),
            None => KeyResolver::derive_key(&method.name, role).to_string(),
        };
        if key.is_empty() {
            return Err(GeneratorError::InvalidKey {
                method: method.name.clone(),
                at: at(),
            });
        }

        if role == Role::Putter {
            return Ok(KeyResolution {
                key,
                default: None,
                has_explicit_default: false,
            });
        }

        let (default, has_explicit_default) = match &method.meta.default {
            Some(DefaultValue::Literal(lit)) => {
                check_literal(lit, kind).map_err(|reason| GeneratorError::InvalidDefault {
                    method: method.name.clone(),
                    reason,
                    at: at(),
                })?;
                (DefaultValue::Literal(lit.clone()), true)
            }
            Some(expr @ DefaultValue::Expr(_)) => (expr.clone(), true),
            None => (KeyResolver::zero_default(kind), false),
        };

        Ok(KeyResolution {
            key,
            default: Some(default),
            has_explicit_default,
        })
    }

    /// The default a getter reads when nothing is stored and no explicit
    /// default was given.
    pub fn zero_default(kind: ValueKind) -> DefaultValue {
        match kind {
            ValueKind::Primitive(PrimitiveKind::Boolean) => DefaultValue::Literal(parse_quote!(false)),
            ValueKind::Primitive(PrimitiveKind::Int | PrimitiveKind::Long) => {
                DefaultValue::Literal(parse_quote!(0))
            }
            ValueKind::Primitive(PrimitiveKind::Float) => DefaultValue::Literal(parse_quote!(0.0)),
            ValueKind::Primitive(PrimitiveKind::String) => DefaultValue::Literal(parse_quote!("")),
            ValueKind::Primitive(PrimitiveKind::StringSet) => {
                DefaultValue::Expr(parse_quote!(HashSet::new()))
            }
            ValueKind::Serialized => DefaultValue::Expr(parse_quote!(Default::default())),
        }
    }
}

fn check_literal(lit: &Lit, kind: ValueKind) -> Result<(), String> {
    let fits = match (kind, lit) {
        (ValueKind::Primitive(PrimitiveKind::Boolean), Lit::Bool(_)) => true,
        (ValueKind::Primitive(PrimitiveKind::Int), Lit::Int(int)) => {
            matches!(int.suffix(), "" | "i32") && int.base10_parse::<i32>().is_ok()
        }
        (ValueKind::Primitive(PrimitiveKind::Long), Lit::Int(int)) => {
            matches!(int.suffix(), "" | "i64") && int.base10_parse::<i64>().is_ok()
        }
        (ValueKind::Primitive(PrimitiveKind::Float), Lit::Float(float)) => {
            matches!(float.suffix(), "" | "f32")
        }
        (ValueKind::Primitive(PrimitiveKind::Float), Lit::Int(int)) => int.suffix().is_empty(),
        (ValueKind::Primitive(PrimitiveKind::String), Lit::Str(_)) => true,
        (ValueKind::Primitive(PrimitiveKind::StringSet), _) => {
            return Err("string sets take a `default_expr`, not a literal".to_string());
        }
        (ValueKind::Serialized, _) => {
            return Err("serialized values take a `default_expr`, not a literal".to_string());
        }
        _ => false,
    };

    if fits {
        Ok(())
    } else {
        Err(format!(
            "literal `{}` does not fit a {} value",
            quote::ToTokens::to_token_stream(lit),
            kind
        ))
    }
}
