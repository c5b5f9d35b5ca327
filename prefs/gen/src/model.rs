//! Declaration model.
//!
//! Both resolution strategies produce these types: the in-source
//! [`crate::source`] parser builds them from trait declarations, and the
//! external [`crate::registry`] builds them from manifest signatures (without
//! any `#[pref]` metadata).

use std::fmt;

use crate::diagnostics::SourceLocation;

/// How the generated constructor opens a named store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoreMode {
    #[default]
    Private,
    MultiProcessReadable,
    MultiProcessWritable,
}

impl StoreMode {
    /// Parses the `mode = "..."` argument of `#[preferences]`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "private" => Some(StoreMode::Private),
            "multi_process_readable" => Some(StoreMode::MultiProcessReadable),
            "multi_process_writable" => Some(StoreMode::MultiProcessWritable),
            _ => None,
        }
    }

    /// Variant name of the matching `prefs_api::StoreMode`.
    pub fn variant(&self) -> &'static str {
        match self {
            StoreMode::Private => "Private",
            StoreMode::MultiProcessReadable => "MultiProcessReadable",
            StoreMode::MultiProcessWritable => "MultiProcessWritable",
        }
    }
}

/// Store settings of a root interface, taken from `#[preferences(...)]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreConfig {
    /// Explicit store name. `None` selects the default-scoped store.
    pub name: Option<String>,
    pub mode: StoreMode,
}

/// A semantic type descriptor: a path with type arguments, a reference, or
/// the unit type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Unit,
    Path {
        segments: Vec<String>,
        args: Vec<TypeRef>,
    },
    Reference {
        mutable: bool,
        inner: Box<TypeRef>,
    },
    /// Any other type (tuples, arrays, trait objects), kept as written.
    Other(String),
}

impl TypeRef {
    /// A single-segment path type without arguments, e.g. `i32`.
    pub fn named(name: &str) -> Self {
        TypeRef::Path {
            segments: vec![name.to_string()],
            args: Vec::new(),
        }
    }

    /// A single-segment generic path type, e.g. `HashSet<String>`.
    pub fn generic(name: &str, args: Vec<TypeRef>) -> Self {
        TypeRef::Path {
            segments: vec![name.to_string()],
            args,
        }
    }

    /// `&Self`, the fluent putter return type.
    pub fn self_ref() -> Self {
        TypeRef::Reference {
            mutable: false,
            inner: Box::new(TypeRef::named("Self")),
        }
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, TypeRef::Unit)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, TypeRef::Reference { .. })
    }

    /// Returns true for `&Self`.
    pub fn is_self_ref(&self) -> bool {
        match self {
            TypeRef::Reference {
                mutable: false,
                inner,
            } => matches!(inner.as_ref(), TypeRef::Path { segments, args } if args.is_empty() && segments.len() == 1 && segments[0] == "Self"),
            _ => false,
        }
    }

    /// The full path as written, e.g. `std::collections::HashSet`.
    pub fn path(&self) -> Option<String> {
        match self {
            TypeRef::Path { segments, .. } => Some(segments.join("::")),
            _ => None,
        }
    }

    /// Type arguments of a path type.
    pub fn args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Path { args, .. } => args,
            _ => &[],
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Unit => f.write_str("()"),
            TypeRef::Path { segments, args } => {
                f.write_str(&segments.join("::"))?;
                if !args.is_empty() {
                    let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                    write!(f, "<{}>", rendered.join(", "))?;
                }
                Ok(())
            }
            TypeRef::Reference { mutable, inner } => {
                if *mutable {
                    write!(f, "&mut {inner}")
                } else {
                    write!(f, "&{inner}")
                }
            }
            TypeRef::Other(text) => f.write_str(text),
        }
    }
}

/// An explicit getter default from `#[pref(default = ...)]` or
/// `#[pref(default_expr = "...")]`, or a zero value chosen by the resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Literal(syn::Lit),
    Expr(syn::Expr),
}

/// Metadata from `#[pref(...)]`. Always empty for external interfaces.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrefMeta {
    pub key: Option<String>,
    pub default: Option<DefaultValue>,
}

impl PrefMeta {
    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.default.is_none()
    }
}

/// The receiver of a trait method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// `&self`
    Shared,
    /// `&mut self`
    Exclusive,
    /// `self`, `self: Box<Self>` and friends
    Owned,
    /// An associated function without receiver
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

/// A bodiless trait method, the input of classification.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub receiver: Receiver,
    pub params: Vec<Param>,
    pub returns: TypeRef,
    pub meta: PrefMeta,
    pub location: Option<SourceLocation>,
}

impl MethodDecl {
    /// A `&self` method without metadata.
    pub fn new(name: &str, params: Vec<Param>, returns: TypeRef) -> Self {
        MethodDecl {
            name: name.to_string(),
            receiver: Receiver::Shared,
            params,
            returns,
            meta: PrefMeta::default(),
            location: None,
        }
    }
}

/// A supertrait reference and the qualified names it may refer to, most
/// likely first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorRef {
    /// The path as written in the bound, e.g. `ThemePreferences`.
    pub written: String,
    pub candidates: Vec<String>,
}

impl AncestorRef {
    /// A reference already resolved to one qualified name.
    pub fn exact(name: &str) -> Self {
        AncestorRef {
            written: name.to_string(),
            candidates: vec![name.to_string()],
        }
    }

    /// Last path segment, e.g. `ThemePreferences`.
    pub fn simple_name(&self) -> &str {
        self.written.rsplit("::").next().unwrap_or(&self.written)
    }
}

/// A `#[preferences]` or `#[pref]` attribute that failed to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeIssue {
    /// The method carrying the attribute; `None` for the trait attribute.
    pub method: Option<String>,
    pub message: String,
    pub location: Option<SourceLocation>,
}

/// A trait declaration found in the current source set.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    /// `crate::<module path>::<Trait>`
    pub qualified_name: String,
    /// Present on roots annotated with `#[preferences]`.
    pub store: Option<StoreConfig>,
    /// Methods whose attributes failed to parse are left out and reported
    /// in `attribute_issues` instead.
    pub methods: Vec<MethodDecl>,
    pub ancestors: Vec<AncestorRef>,
    pub location: Option<SourceLocation>,
    pub attribute_issues: Vec<AttributeIssue>,
}

impl InterfaceDecl {
    pub fn new(qualified_name: &str) -> Self {
        InterfaceDecl {
            qualified_name: qualified_name.to_string(),
            store: None,
            methods: Vec::new(),
            ancestors: Vec::new(),
            location: None,
            attribute_issues: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.store.is_some()
    }

    /// The trait identifier, e.g. `Settings`.
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.qualified_name)
    }

    /// Module segments between `crate` and the trait name.
    pub fn module_path(&self) -> Vec<&str> {
        let segments: Vec<&str> = self.qualified_name.split("::").collect();
        match segments.split_last() {
            Some((_, modules)) => modules
                .iter()
                .copied()
                .filter(|s| *s != "crate")
                .collect(),
            None => Vec::new(),
        }
    }
}
