//! Getter and putter method generation.
//!
//! Each [`AccessorSpec`] becomes one method performing the read or write for
//! its storage kind. Writes go through an editor published with `apply`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::Lit;

use crate::classifier::{AccessorSpec, Role};
use crate::codegen::unit::GeneratedMethod;
use crate::codegen::{
    GenerationTarget, editor_ident, open_editor, publish_editor, serializer_module, type_tokens,
};
use crate::context::GenerationContext;
use crate::errors::GeneratorError;
use crate::key_resolver::KeyResolver;
use crate::model::DefaultValue;
use crate::type_mapper::{PrimitiveKind, ValueKind};

/// Generates the method implementing `spec`.
///
/// ## Errors
///
/// Returns [`GeneratorError::CodeGenError`] if a type cannot be emitted or a
/// serialized accessor is generated without a serializer.
pub fn generate_accessor(
    spec: &AccessorSpec,
    target: &GenerationTarget,
    ctx: &mut GenerationContext,
) -> Result<GeneratedMethod, GeneratorError> {
    if spec.value_type.kind == ValueKind::Primitive(PrimitiveKind::StringSet) {
        ctx.require_import("std::collections::HashSet");
    }

    match spec.role {
        Role::Getter => generate_getter(spec, target, ctx),
        Role::Putter => generate_putter(spec, target, ctx),
    }
}

fn generate_getter(
    spec: &AccessorSpec,
    target: &GenerationTarget,
    ctx: &mut GenerationContext,
) -> Result<GeneratedMethod, GeneratorError> {
    let name = format_ident!("{}", spec.method_name);
    let ty = type_tokens(&spec.value_type.ty)?;
    let key = spec.key.as_str();
    let zero;
    let default = match &spec.default_value {
        Some(default) => default,
        None => {
            zero = KeyResolver::zero_default(spec.value_type.kind);
            &zero
        }
    };
    let default_tokens = default_tokens(default, spec.value_type.kind);

    let body = match spec.value_type.kind {
        ValueKind::Primitive(PrimitiveKind::Boolean) => {
            quote! { self.preferences.get_bool(#key, #default_tokens) }
        }
        ValueKind::Primitive(PrimitiveKind::Int) => {
            quote! { self.preferences.get_i32(#key, #default_tokens) }
        }
        ValueKind::Primitive(PrimitiveKind::Long) => {
            quote! { self.preferences.get_i64(#key, #default_tokens) }
        }
        ValueKind::Primitive(PrimitiveKind::Float) => {
            quote! { self.preferences.get_f32(#key, #default_tokens) }
        }
        ValueKind::Primitive(PrimitiveKind::String) => match default {
            DefaultValue::Literal(_) => quote! { self.preferences.get_string(#key, #default_tokens) },
            DefaultValue::Expr(_) => {
                quote! { self.preferences.get_string(#key, &(#default_tokens)) }
            }
        },
        ValueKind::Primitive(PrimitiveKind::StringSet) if target.needs_string_set_guard() => {
            ctx.require_import("prefs_api::build");
            ctx.require_import("prefs_api::compat");
            quote! {
                if build::sdk_int() >= build::HONEYCOMB {
                    self.preferences.get_string_set(#key, #default_tokens)
                } else {
                    compat::decode_string_set(&self.preferences.get_string(#key, ""))
                        .unwrap_or_else(|_| #default_tokens)
                }
            }
        }
        ValueKind::Primitive(PrimitiveKind::StringSet) => {
            quote! { self.preferences.get_string_set(#key, #default_tokens) }
        }
        ValueKind::Serialized => {
            let serializer = serializer_module(target, ctx)?;
            quote! {
                self.preferences
                    .contains(#key)
                    .then(|| self.preferences.get_string(#key, ""))
                    .and_then(|raw| #serializer::deserialize::<#ty>(&raw))
                    .unwrap_or_else(|| #default_tokens)
            }
        }
    };

    Ok(GeneratedMethod {
        name: spec.method_name.clone(),
        signature: quote! { fn #name(&self) -> #ty },
        body: vec![body],
    })
}

fn generate_putter(
    spec: &AccessorSpec,
    target: &GenerationTarget,
    ctx: &mut GenerationContext,
) -> Result<GeneratedMethod, GeneratorError> {
    let name = format_ident!("{}", spec.method_name);
    let ty = type_tokens(&spec.value_type.ty)?;
    let key = spec.key.as_str();
    let param = format_ident!("{}", spec.parameter_name.as_deref().unwrap_or("value"));
    let editor = editor_ident();

    let put = match spec.value_type.kind {
        ValueKind::Primitive(PrimitiveKind::Boolean) => quote! { #editor.put_bool(#key, #param); },
        ValueKind::Primitive(PrimitiveKind::Int) => quote! { #editor.put_i32(#key, #param); },
        ValueKind::Primitive(PrimitiveKind::Long) => quote! { #editor.put_i64(#key, #param); },
        ValueKind::Primitive(PrimitiveKind::Float) => quote! { #editor.put_f32(#key, #param); },
        ValueKind::Primitive(PrimitiveKind::String) => {
            quote! { #editor.put_string(#key, &#param); }
        }
        ValueKind::Primitive(PrimitiveKind::StringSet) if target.needs_string_set_guard() => {
            ctx.require_import("prefs_api::build");
            ctx.require_import("prefs_api::compat");
            quote! {
                if build::sdk_int() >= build::HONEYCOMB {
                    #editor.put_string_set(#key, #param);
                } else {
                    match compat::encode_string_set(&#param) {
                        Ok(raw) => #editor.put_string(#key, &raw),
                        Err(_) => #editor.remove(#key),
                    }
                }
            }
        }
        ValueKind::Primitive(PrimitiveKind::StringSet) => {
            quote! { #editor.put_string_set(#key, #param); }
        }
        ValueKind::Serialized => {
            let serializer = serializer_module(target, ctx)?;
            quote! {
                match #serializer::serialize(&#param) {
                    Some(raw) => #editor.put_string(#key, &raw),
                    None => #editor.remove(#key),
                }
            }
        }
    };

    let publish = publish_editor(target, ctx);
    let mut body = vec![open_editor(), put, publish];
    let signature = if spec.fluent {
        body.push(quote! { self });
        quote! { fn #name(&self, #param: #ty) -> &Self }
    } else {
        quote! { fn #name(&self, #param: #ty) }
    };

    Ok(GeneratedMethod {
        name: spec.method_name.clone(),
        signature,
        body,
    })
}

/// The default as an expression of the getter's store type.
fn default_tokens(default: &DefaultValue, kind: ValueKind) -> TokenStream {
    match default {
        // Integer literals for float values need an explicit conversion.
        DefaultValue::Literal(Lit::Int(int)) if kind == ValueKind::Primitive(PrimitiveKind::Float) => {
            quote! { (#int as f32) }
        }
        DefaultValue::Literal(lit) => quote! { #lit },
        DefaultValue::Expr(expr) => quote! { #expr },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{getter_spec, putter_spec};
    use syn::parse_quote;

    fn render(spec: &AccessorSpec, target: &GenerationTarget) -> (String, GenerationContext) {
        let mut ctx = GenerationContext::new("crate::Settings");
        let method = generate_accessor(spec, target, &mut ctx).unwrap();
        let item: syn::ImplItemFn = syn::parse2(method.to_tokens()).unwrap();
        (quote!(#item).to_string(), ctx)
    }

    fn serializer_target() -> GenerationTarget {
        GenerationTarget {
            min_api_level: None,
            serializer: Some("prefs_api::serializer".to_string()),
        }
    }

    #[test]
    fn string_getter_reads_with_zero_default() {
        let (code, _) = render(&getter_spec("username", "String"), &GenerationTarget::default());
        assert!(code.contains("fn username (& self) -> String"));
        assert!(code.contains("get_string (\"username\" , \"\")"));
    }

    #[test]
    fn primitive_getters_use_typed_reads() {
        for (ty, read) in [
            ("bool", "get_bool"),
            ("i32", "get_i32"),
            ("i64", "get_i64"),
            ("f32", "get_f32"),
        ] {
            let (code, _) = render(&getter_spec("value", ty), &GenerationTarget::default());
            assert!(code.contains(read), "{ty}: {code}");
        }
    }

    #[test]
    fn float_getter_converts_integer_defaults() {
        let mut spec = getter_spec("ratio", "f32");
        spec.default_value = Some(DefaultValue::Literal(parse_quote!(2)));
        let (code, _) = render(&spec, &GenerationTarget::default());
        assert!(code.contains("(2 as f32)"));
    }

    #[test]
    fn string_getter_borrows_expression_defaults() {
        let mut spec = getter_spec("username", "String");
        spec.default_value = Some(DefaultValue::Expr(parse_quote!(whoami())));
        let (code, _) = render(&spec, &GenerationTarget::default());
        assert!(code.contains("& (whoami ())"));
    }

    #[test]
    fn putter_publishes_with_apply() {
        let (code, ctx) = render(&putter_spec("username", "String"), &GenerationTarget::default());
        assert!(code.contains("fn set_username (& self , username : String)"));
        assert!(code.contains("let mut __prefs_editor = self . preferences . edit ()"));
        assert!(code.contains("__prefs_editor . put_string (\"username\" , & username)"));
        assert!(code.contains("__prefs_editor . apply ()"));
        assert!(ctx.imports.is_empty());
    }

    #[test]
    fn putter_parameter_named_editor_is_not_shadowed() {
        let (code, _) = render(&putter_spec("editor", "String"), &GenerationTarget::default());
        assert!(code.contains("fn set_editor (& self , editor : String)"));
        assert!(code.contains("__prefs_editor . put_string (\"editor\" , & editor)"));
        assert!(!code.contains("let mut editor"));
    }

    #[test]
    fn fluent_putter_returns_self() {
        let mut spec = putter_spec("volume", "i32");
        spec.fluent = true;
        spec.return_type = crate::model::TypeRef::self_ref();
        let (code, _) = render(&spec, &GenerationTarget::default());
        assert!(code.contains("-> & Self"));
        assert!(code.trim_end().ends_with("self }"));
    }

    #[test]
    fn string_sets_import_hash_set() {
        let (code, ctx) = render(
            &getter_spec("tags", "HashSet<String>"),
            &GenerationTarget::default(),
        );
        assert!(code.contains("get_string_set (\"tags\" , HashSet :: new ())"));
        assert!(!code.contains("HONEYCOMB"));
        assert!(ctx.imports.contains("std::collections::HashSet"));
    }

    #[test]
    fn old_targets_guard_string_sets() {
        let target = GenerationTarget {
            min_api_level: Some(9),
            serializer: None,
        };
        let (getter, ctx) = render(&getter_spec("tags", "HashSet<String>"), &target);
        assert!(getter.contains("build :: sdk_int () >= build :: HONEYCOMB"));
        assert!(getter.contains("compat :: decode_string_set"));
        assert!(ctx.imports.contains("prefs_api::compat"));
        assert!(ctx.imports.contains("prefs_api::build"));

        let (putter, _) = render(&putter_spec("tags", "HashSet<String>"), &target);
        assert!(putter.contains("compat :: encode_string_set (& tags)"));
        assert!(putter.contains("editor . put_string_set (\"tags\" , tags)"));
    }

    #[test]
    fn serialized_values_go_through_serializer() {
        let (getter, ctx) = render(&getter_spec("theme", "Theme"), &serializer_target());
        assert!(getter.contains("serializer :: deserialize :: < Theme >"));
        assert!(getter.contains("Default :: default ()"));
        assert!(ctx.imports.contains("prefs_api::serializer"));

        let (putter, _) = render(&putter_spec("theme", "Theme"), &serializer_target());
        assert!(putter.contains("serializer :: serialize (& theme)"));
        assert!(putter.contains("editor . remove (\"theme\")"));
    }

    #[test]
    fn serialized_without_serializer_fails() {
        let mut ctx = GenerationContext::new("crate::Settings");
        let result = generate_accessor(
            &getter_spec("theme", "Theme"),
            &GenerationTarget::default(),
            &mut ctx,
        );
        assert!(matches!(result, Err(GeneratorError::CodeGenError(_))));
    }
}
