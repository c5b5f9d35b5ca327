//! The fixed `PreferenceActions` methods.
//!
//! Most of these are identical for every root. `clear_defined` and
//! `init_defaults` depend on the root's key space.

use quote::{format_ident, quote};

use crate::codegen::unit::GeneratedMethod;
use crate::codegen::{GenerationTarget, editor_ident, open_editor, path_tokens, publish_editor};
use crate::context::GenerationContext;
use crate::errors::GeneratorError;

/// Generates all eight `PreferenceActions` methods.
///
/// ## Errors
///
/// Returns [`GeneratorError::CodeGenError`] if a declaring trait path cannot
/// be emitted.
pub fn generate_actions(
    target: &GenerationTarget,
    ctx: &mut GenerationContext,
) -> Result<Vec<GeneratedMethod>, GeneratorError> {
    let editor = editor_ident();
    let remove_publish = publish_editor(target, ctx);
    let clear_publish = publish_editor(target, ctx);

    let mut actions = vec![
        GeneratedMethod {
            name: "get".to_string(),
            signature: quote! { fn get(&self) -> &dyn SharedPreferences },
            body: vec![quote! { self.preferences.as_ref() }],
        },
        GeneratedMethod {
            name: "contains".to_string(),
            signature: quote! { fn contains(&self, key: &str) -> bool },
            body: vec![quote! { self.preferences.contains(key) }],
        },
        GeneratedMethod {
            name: "remove".to_string(),
            signature: quote! { fn remove(&self, key: &str) },
            body: vec![
                open_editor(),
                quote! { #editor.remove(key); },
                remove_publish,
            ],
        },
        GeneratedMethod {
            name: "register_on_change_listener".to_string(),
            signature: quote! {
                fn register_on_change_listener(&self, listener: Arc<dyn OnChangeListener>)
            },
            body: vec![quote! { self.preferences.register_on_change_listener(listener); }],
        },
        GeneratedMethod {
            name: "unregister_on_change_listener".to_string(),
            signature: quote! {
                fn unregister_on_change_listener(&self, listener: &Arc<dyn OnChangeListener>)
            },
            body: vec![quote! { self.preferences.unregister_on_change_listener(listener); }],
        },
        GeneratedMethod {
            name: "clear".to_string(),
            signature: quote! { fn clear(&self) },
            body: vec![
                open_editor(),
                quote! { #editor.clear(); },
                clear_publish,
            ],
        },
    ];

    actions.push(generate_clear_defined(target, ctx));
    actions.push(generate_init_defaults(ctx)?);
    Ok(actions)
}

/// Removes every key the hierarchy defines, in one batch.
fn generate_clear_defined(target: &GenerationTarget, ctx: &mut GenerationContext) -> GeneratedMethod {
    let keys: Vec<String> = ctx
        .keys
        .defined_keys()
        .into_iter()
        .map(String::from)
        .collect();

    let editor = editor_ident();
    let body = if keys.is_empty() {
        Vec::new()
    } else {
        vec![
            open_editor(),
            quote! { #(#editor.remove(#keys);)* },
            publish_editor(target, ctx),
        ]
    };

    GeneratedMethod {
        name: "clear_defined".to_string(),
        signature: quote! { fn clear_defined(&self) },
        body,
    }
}

/// Calls each putter with its getter's current value.
///
/// Only keys with both roles and the same value type take part. Calls are
/// qualified with the declaring trait, so accessors from different traits
/// never clash.
fn generate_init_defaults(ctx: &GenerationContext) -> Result<GeneratedMethod, GeneratorError> {
    let mut body = Vec::new();
    for (getter, putter) in ctx.keys.pairs() {
        if getter.value_type.ty != putter.value_type.ty {
            continue;
        }
        let getter_trait = path_tokens(&getter.declaring_interface)?;
        let putter_trait = path_tokens(&putter.declaring_interface)?;
        let getter_name = format_ident!("{}", getter.method_name);
        let putter_name = format_ident!("{}", putter.method_name);
        body.push(quote! {
            <Self as #putter_trait>::#putter_name(self, <Self as #getter_trait>::#getter_name(self));
        });
    }

    Ok(GeneratedMethod {
        name: "init_defaults".to_string(),
        signature: quote! { fn init_defaults(&self) },
        body,
    })
}
