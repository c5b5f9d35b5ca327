//! Mapping of value types onto store primitives.

use std::fmt;

use crate::model::TypeRef;

/// Platform level from which stores hold string sets natively.
pub const STRING_SET_API_LEVEL: u32 = 11;

const STRING_PATHS: &[&str] = &["String", "std::string::String", "alloc::string::String"];
const HASH_SET_PATHS: &[&str] = &["HashSet", "std::collections::HashSet", "collections::HashSet"];

/// Value kinds a store can hold directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Int,
    Long,
    Float,
    String,
    StringSet,
}

impl PrimitiveKind {
    /// Minimum platform level at which the store supports this kind, if any.
    pub fn min_api_level(&self) -> Option<u32> {
        match self {
            PrimitiveKind::StringSet => Some(STRING_SET_API_LEVEL),
            _ => None,
        }
    }
}

/// How a value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Primitive(PrimitiveKind),
    /// Stored as a string through the serializer access point.
    Serialized,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Primitive(PrimitiveKind::Boolean) => "boolean",
            ValueKind::Primitive(PrimitiveKind::Int) => "int",
            ValueKind::Primitive(PrimitiveKind::Long) => "long",
            ValueKind::Primitive(PrimitiveKind::Float) => "float",
            ValueKind::Primitive(PrimitiveKind::String) => "string",
            ValueKind::Primitive(PrimitiveKind::StringSet) => "string set",
            ValueKind::Serialized => "serialized",
        };
        f.write_str(name)
    }
}

/// Classifies value types. The table is fixed; the only configurable part is
/// whether a serializer access point exists for everything else.
#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    serializer: Option<String>,
}

impl TypeMapper {
    /// A mapper with the given serializer access point (a module path such
    /// as `prefs_api::serializer`), or none.
    pub fn new(serializer: Option<String>) -> Self {
        TypeMapper { serializer }
    }

    /// Classifies `ty` against the primitive table.
    ///
    /// ## Examples
    ///
    /// ```
    /// use prefs_gen::model::TypeRef;
    /// use prefs_gen::{PrimitiveKind, TypeMapper, ValueKind};
    ///
    /// assert_eq!(
    ///     TypeMapper::classify(&TypeRef::named("i64")),
    ///     ValueKind::Primitive(PrimitiveKind::Long)
    /// );
    /// assert_eq!(TypeMapper::classify(&TypeRef::named("Theme")), ValueKind::Serialized);
    /// ```
    pub fn classify(ty: &TypeRef) -> ValueKind {
        let (path, args) = match ty {
            TypeRef::Path { args, .. } => (ty.path().unwrap_or_default(), args.as_slice()),
            _ => return ValueKind::Serialized,
        };

        if args.is_empty() {
            let kind = match path.as_str() {
                "bool" => Some(PrimitiveKind::Boolean),
                "i32" => Some(PrimitiveKind::Int),
                "i64" => Some(PrimitiveKind::Long),
                "f32" => Some(PrimitiveKind::Float),
                p if STRING_PATHS.contains(&p) => Some(PrimitiveKind::String),
                _ => None,
            };
            if let Some(kind) = kind {
                return ValueKind::Primitive(kind);
            }
        }

        if HASH_SET_PATHS.contains(&path.as_str())
            && args.len() == 1
            && TypeMapper::classify(&args[0]) == ValueKind::Primitive(PrimitiveKind::String)
        {
            return ValueKind::Primitive(PrimitiveKind::StringSet);
        }

        ValueKind::Serialized
    }

    /// Classifies `ty`, returning `None` when it needs serialization but no
    /// serializer access point is configured.
    pub fn resolve(&self, ty: &TypeRef) -> Option<ValueKind> {
        match TypeMapper::classify(ty) {
            ValueKind::Serialized if self.serializer.is_none() => None,
            kind => Some(kind),
        }
    }
}
