//! Translation of `syn` trait declarations into the declaration model.
//!
//! This module is purely syntactic. Module paths, `use` resolution and file
//! discovery live in [`crate::source`]; the parser receives a resolver
//! callback for supertrait paths.

use std::path::Path;

use proc_macro2::Span;
use quote::ToTokens;
use syn::{
    Attribute, Expr, FnArg, GenericArgument, ItemTrait, Lit, LitStr, Pat, PathArguments,
    TraitBoundModifier, TraitItem, TraitItemFn, Type, TypeParamBound,
};
use tracing::debug;

use crate::diagnostics::SourceLocation;
use crate::model::{
    AncestorRef, AttributeIssue, DefaultValue, InterfaceDecl, MethodDecl, Param, PrefMeta, Receiver, StoreConfig,
    StoreMode, TypeRef,
};

/// Auto and marker traits that never carry accessors.
const MARKER_TRAITS: &[&str] = &["Send", "Sync", "Unpin", "Sized"];

/// Returns the `#[preferences(...)]` attribute of a trait, if any.
///
/// Both the bare form and a path form such as `#[prefs_api::preferences]`
/// are recognized.
pub fn preferences_attr(attrs: &[Attribute]) -> Option<&Attribute> {
    attrs.iter().find(|attr| {
        attr.path()
            .segments
            .last()
            .is_some_and(|s| s.ident == "preferences")
    })
}

/// Parses the arguments of `#[preferences(...)]`.
///
/// An empty `name` is the same as no name: the default-scoped store.
///
/// ## Errors
///
/// Returns an error for unknown arguments, non-string values or an unknown
/// store mode.
pub fn parse_store_config(attr: &Attribute) -> syn::Result<StoreConfig> {
    let mut config = StoreConfig::default();
    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok(config);
    }

    attr.parse_nested_meta(|meta| {
        let value: LitStr = meta.value()?.parse()?;
        if meta.path.is_ident("name") {
            let name = value.value();
            config.name = (!name.is_empty()).then_some(name);
            Ok(())
        } else if meta.path.is_ident("mode") {
            config.mode = StoreMode::from_name(&value.value())
                .ok_or_else(|| meta.error(format!("unknown store mode `{}`", value.value())))?;
            Ok(())
        } else {
            Err(meta.error("unknown preferences argument. Expected `name` or `mode`"))
        }
    })?;

    Ok(config)
}

/// Collects `#[pref(...)]` metadata from a method's attributes.
///
/// ## Errors
///
/// Returns an error for unknown arguments or malformed values.
pub fn parse_pref_meta(attrs: &[Attribute]) -> syn::Result<PrefMeta> {
    let mut meta_out = PrefMeta::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("pref")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                let key: LitStr = meta.value()?.parse()?;
                meta_out.key = Some(key.value());
            } else if meta.path.is_ident("default") {
                let lit: Lit = meta.value()?.parse()?;
                meta_out.default = Some(DefaultValue::Literal(lit));
            } else if meta.path.is_ident("default_expr") {
                let source: LitStr = meta.value()?.parse()?;
                meta_out.default = Some(DefaultValue::Expr(source.parse::<Expr>()?));
            } else {
                return Err(meta.error("unknown pref argument. Expected key, default or default_expr"));
            }
            Ok(())
        })?;
    }

    Ok(meta_out)
}

/// Converts a `syn` type into a [`TypeRef`].
pub fn type_ref(ty: &Type) -> TypeRef {
    match ty {
        Type::Tuple(tuple) if tuple.elems.is_empty() => TypeRef::Unit,
        Type::Paren(inner) => type_ref(&inner.elem),
        Type::Group(inner) => type_ref(&inner.elem),
        Type::Reference(reference) => TypeRef::Reference {
            mutable: reference.mutability.is_some(),
            inner: Box::new(type_ref(&reference.elem)),
        },
        Type::Path(path) if path.qself.is_none() && only_type_arguments(&path.path) => {
            let segments: Vec<String> = path
                .path
                .segments
                .iter()
                .map(|s| s.ident.to_string())
                .collect();
            let args = match path.path.segments.last().map(|s| &s.arguments) {
                Some(PathArguments::AngleBracketed(generic)) => generic
                    .args
                    .iter()
                    .filter_map(|arg| match arg {
                        GenericArgument::Type(ty) => Some(type_ref(ty)),
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            TypeRef::Path { segments, args }
        }
        other => TypeRef::Other(other.to_token_stream().to_string()),
    }
}

/// True when only the last segment has generic arguments and all of them
/// are types. Anything else (lifetimes, const generics) is kept verbatim.
fn only_type_arguments(path: &syn::Path) -> bool {
    let segments: Vec<&syn::PathSegment> = path.segments.iter().collect();
    let Some((last, leading)) = segments.split_last() else {
        return false;
    };
    leading.iter().all(|s| s.arguments.is_none())
        && match &last.arguments {
            PathArguments::None => true,
            PathArguments::AngleBracketed(generic) => generic
                .args
                .iter()
                .all(|arg| matches!(arg, GenericArgument::Type(_))),
            PathArguments::Parenthesized(_) => false,
        }
}

/// Parses a type written in Rust syntax, as used by external manifests.
///
/// ## Errors
///
/// Returns an error if `source` is not a valid Rust type.
pub fn parse_type(source: &str) -> syn::Result<TypeRef> {
    syn::parse_str::<Type>(source).map(|ty| type_ref(&ty))
}

/// Builds a [`MethodDecl`] from a trait method.
///
/// Returns `Ok(None)` for methods with a provided body: those are not
/// accessors.
pub fn method_decl(method: &TraitItemFn, file: Option<&Path>) -> syn::Result<Option<MethodDecl>> {
    let name = method.sig.ident.to_string();
    if method.default.is_some() {
        debug!(method = %name, "skipping method with a provided body");
        return Ok(None);
    }

    let receiver = match method.sig.receiver() {
        Some(receiver) => match receiver.ty.as_ref() {
            Type::Reference(reference) if reference.mutability.is_some() => Receiver::Exclusive,
            Type::Reference(_) => Receiver::Shared,
            _ => Receiver::Owned,
        },
        None => Receiver::None,
    };

    let params = method
        .sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(typed) => Some(typed),
            FnArg::Receiver(_) => None,
        })
        .enumerate()
        .map(|(i, typed)| Param {
            name: match typed.pat.as_ref() {
                Pat::Ident(ident) => ident.ident.to_string(),
                _ => format!("arg{i}"),
            },
            ty: type_ref(&typed.ty),
        })
        .collect();

    let returns = match &method.sig.output {
        syn::ReturnType::Default => TypeRef::Unit,
        syn::ReturnType::Type(_, ty) => type_ref(ty),
    };

    Ok(Some(MethodDecl {
        name,
        receiver,
        params,
        returns,
        meta: parse_pref_meta(&method.attrs)?,
        location: location(method.sig.ident.span(), file),
    }))
}

/// Supertrait paths of a trait as written, without lifetimes, `?Sized` and
/// marker traits.
pub fn supertrait_paths(item: &ItemTrait) -> Vec<String> {
    item.supertraits
        .iter()
        .filter_map(|bound| match bound {
            TypeParamBound::Trait(bound) if matches!(bound.modifier, TraitBoundModifier::None) => {
                Some(
                    bound
                        .path
                        .segments
                        .iter()
                        .map(|s| s.ident.to_string())
                        .collect::<Vec<_>>()
                        .join("::"),
                )
            }
            _ => None,
        })
        .filter(|path| {
            let last = path.rsplit("::").next().unwrap_or(path);
            !MARKER_TRAITS.contains(&last)
        })
        .collect()
}

/// Builds an [`InterfaceDecl`] from a trait.
///
/// `resolve` maps each supertrait path as written to its candidate qualified
/// names.
///
/// Malformed `#[preferences]` or `#[pref]` arguments do not fail the trait.
/// They are recorded in [`InterfaceDecl::attribute_issues`]: a malformed
/// store attribute leaves the trait a root with the default store, and a
/// method with a malformed `#[pref]` is left out.
pub fn interface_decl(
    item: &ItemTrait,
    qualified_name: &str,
    file: Option<&Path>,
    resolve: &dyn Fn(&str) -> Vec<String>,
) -> InterfaceDecl {
    let mut decl = InterfaceDecl::new(qualified_name);
    decl.location = location(item.ident.span(), file);
    if let Some(attr) = preferences_attr(&item.attrs) {
        let store = match parse_store_config(attr) {
            Ok(store) => store,
            Err(err) => {
                decl.attribute_issues.push(attribute_issue(None, &err, file));
                StoreConfig::default()
            }
        };
        decl.store = Some(store);
    }

    for trait_item in &item.items {
        match trait_item {
            TraitItem::Fn(method) => match method_decl(method, file) {
                Ok(Some(method)) => decl.methods.push(method),
                Ok(None) => {}
                Err(err) => {
                    let name = method.sig.ident.to_string();
                    decl.attribute_issues
                        .push(attribute_issue(Some(name), &err, file));
                }
            },
            other => debug!(
                interface = qualified_name,
                item = %other.to_token_stream(),
                "ignoring non-method trait item"
            ),
        }
    }

    decl.ancestors = supertrait_paths(item)
        .into_iter()
        .map(|written| AncestorRef {
            candidates: resolve(&written),
            written,
        })
        .collect();

    decl
}

fn attribute_issue(method: Option<String>, err: &syn::Error, file: Option<&Path>) -> AttributeIssue {
    AttributeIssue {
        method,
        message: err.to_string(),
        location: location(err.span(), file),
    }
}

fn location(span: Span, file: Option<&Path>) -> Option<SourceLocation> {
    let start = span.start();
    Some(SourceLocation {
        file: file.map(Path::to_path_buf),
        line: start.line,
        column: start.column + 1,
    })
}
