//! Classification of trait methods into getters and putters.

use std::fmt;

use tracing::debug;

use crate::context::KeySpace;
use crate::diagnostics::{Attribution, SourceLocation};
use crate::errors::GeneratorError;
use crate::key_resolver::KeyResolver;
use crate::model::{DefaultValue, MethodDecl, Receiver, TypeRef};
use crate::type_mapper::{TypeMapper, ValueKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Getter,
    Putter,
}

impl Role {
    pub fn opposite(self) -> Role {
        match self {
            Role::Getter => Role::Putter,
            Role::Putter => Role::Getter,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Getter => f.write_str("getter"),
            Role::Putter => f.write_str("putter"),
        }
    }
}

/// A value type together with its storage kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueType {
    pub kind: ValueKind,
    /// The type as declared: the getter's return type or the putter's
    /// parameter type.
    pub ty: TypeRef,
}

/// Everything needed to generate one accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorSpec {
    pub key: String,
    pub role: Role,
    pub value_type: ValueType,
    pub has_explicit_default: bool,
    /// The getter's default. `None` for putters.
    pub default_value: Option<DefaultValue>,
    /// Qualified name of the trait declaring the method.
    pub declaring_interface: String,
    pub method_name: String,
    /// The putter's parameter name. `None` for getters.
    pub parameter_name: Option<String>,
    pub return_type: TypeRef,
    /// True for putters returning `&Self`.
    pub fluent: bool,
    pub location: Option<SourceLocation>,
}

impl AccessorSpec {
    pub fn attribution(&self) -> Attribution {
        Attribution::method(&self.declaring_interface, &self.method_name).at(self.location.clone())
    }
}

/// Decides the role of methods and builds their [`AccessorSpec`]s.
#[derive(Debug, Clone, Default)]
pub struct AccessorClassifier {
    mapper: TypeMapper,
}

impl AccessorClassifier {
    pub fn new(mapper: TypeMapper) -> Self {
        AccessorClassifier { mapper }
    }

    /// Decides the role of `method` from its shape alone.
    ///
    /// - `&self`, no parameters, an owned non-unit return: getter
    /// - `&self`, one owned parameter, returning `()` or `&Self`: putter
    ///
    /// ## Errors
    ///
    /// Returns the reason the method is neither.
    pub fn shape(method: &MethodDecl) -> Result<Role, String> {
        if method.receiver != Receiver::Shared {
            return Err("accessors must take `&self`".to_string());
        }

        match method.params.as_slice() {
            [] if method.returns.is_unit() => {
                Err("a method without parameters must return a value".to_string())
            }
            [] if method.returns.is_reference() => Err(format!(
                "getters must return an owned value, found `{}`",
                method.returns
            )),
            [] if method.returns.path().as_deref() == Some("Self") => {
                Err("getters cannot return `Self`".to_string())
            }
            [] => Ok(Role::Getter),
            [param] if method.returns.is_unit() || method.returns.is_self_ref() => {
                if param.ty.is_reference() {
                    Err(format!(
                        "putters must take an owned value, found `{}`",
                        param.ty
                    ))
                } else {
                    Ok(Role::Putter)
                }
            }
            [_] => Err(format!(
                "putters must return `()` or `&Self`, found `{}`",
                method.returns
            )),
            params => Err(format!(
                "expected zero or one parameter, found {}",
                params.len()
            )),
        }
    }

    /// Classifies `method` of `interface` and registers its key.
    ///
    /// ## Errors
    ///
    /// - [`GeneratorError::InvalidAccessor`] if the method is neither a getter
    ///   nor a putter
    /// - [`GeneratorError::UnresolvedSerialization`] if the value type needs a
    ///   serializer and none is configured
    /// - [`GeneratorError::InvalidKey`] / [`GeneratorError::InvalidDefault`]
    ///   from key resolution
    /// - [`GeneratorError::DuplicateKey`] if the key is already registered in
    ///   the same role
    pub fn classify(
        &self,
        interface: &str,
        method: &MethodDecl,
        keys: &mut KeySpace,
    ) -> Result<AccessorSpec, GeneratorError> {
        let spec = self.build_spec(interface, method)?;
        keys.register(&spec)?;
        debug!(
            interface,
            method = %spec.method_name,
            key = %spec.key,
            role = %spec.role,
            kind = %spec.value_type.kind,
            "classified accessor"
        );
        Ok(spec)
    }

    /// Builds the spec of `method` without registering it.
    ///
    /// ## Errors
    ///
    /// Same as [`classify`](Self::classify), except for duplicate keys.
    pub fn build_spec(
        &self,
        interface: &str,
        method: &MethodDecl,
    ) -> Result<AccessorSpec, GeneratorError> {
        let at = || Attribution::method(interface, &method.name).at(method.location.clone());

        let role = AccessorClassifier::shape(method).map_err(|reason| {
            GeneratorError::InvalidAccessor {
                interface: interface.to_string(),
                method: method.name.clone(),
                reason,
                at: at(),
            }
        })?;

        let (ty, parameter_name) = match role {
            Role::Getter => (method.returns.clone(), None),
            Role::Putter => (
                method.params[0].ty.clone(),
                Some(method.params[0].name.clone()),
            ),
        };

        let kind = self
            .mapper
            .resolve(&ty)
            .ok_or_else(|| GeneratorError::UnresolvedSerialization {
                ty: ty.to_string(),
                method: method.name.clone(),
                at: at(),
            })?;

        let resolution = KeyResolver::resolve(interface, method, role, kind)?;

        Ok(AccessorSpec {
            key: resolution.key,
            role,
            value_type: ValueType { kind, ty },
            has_explicit_default: resolution.has_explicit_default,
            default_value: resolution.default,
            declaring_interface: interface.to_string(),
            method_name: method.name.clone(),
            parameter_name,
            return_type: method.returns.clone(),
            fluent: role == Role::Putter && method.returns.is_self_ref(),
            location: method.location.clone(),
        })
    }
}
