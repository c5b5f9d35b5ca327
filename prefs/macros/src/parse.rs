//! Argument parsing for `#[preferences(...)]` and `#[pref(...)]`.

use syn::{
    Attribute, Expr, Lit, LitStr, Result, Token,
    meta::ParseNestedMeta,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
};

/// Store modes accepted by the `mode` argument.
pub const MODES: &[&str] = &["private", "multi_process_readable", "multi_process_writable"];

/// Parsed `#[preferences(...)]` arguments.
#[derive(Debug, Default)]
pub struct PreferencesArgs {
    pub name: Option<String>,
    pub mode: Option<String>,
}

impl Parse for PreferencesArgs {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut args = PreferencesArgs::default();
        let metas = Punctuated::<syn::MetaNameValue, Token![,]>::parse_terminated(input)?;

        for meta in metas {
            let value = match &meta.value {
                Expr::Lit(syn::ExprLit {
                    lit: Lit::Str(s), ..
                }) => s.clone(),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "expected a string literal, e.g. name = \"app\"",
                    ));
                }
            };

            if meta.path.is_ident("name") {
                args.name = Some(value.value());
            } else if meta.path.is_ident("mode") {
                let mode = value.value();
                if !MODES.contains(&mode.as_str()) {
                    return Err(syn::Error::new(
                        value.span(),
                        format!(
                            "unknown store mode: `{}`. Expected one of: {}",
                            mode,
                            MODES.join(", ")
                        ),
                    ));
                }
                args.mode = Some(mode);
            } else {
                return Err(syn::Error::new_spanned(
                    &meta.path,
                    "unknown preferences argument. Expected `name` or `mode`",
                ));
            }
        }

        Ok(args)
    }
}

/// Returns true for `#[pref(...)]` helper attributes.
pub fn is_pref_attr(attr: &Attribute) -> bool {
    attr.path().is_ident("pref")
}

/// Validates the arguments of one `#[pref(...)]` attribute.
pub fn validate_pref_attr(attr: &Attribute) -> Result<()> {
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("key") {
            let key: LitStr = meta.value()?.parse()?;
            if key.value().trim().is_empty() {
                return Err(meta.error("preference key cannot be empty"));
            }
            Ok(())
        } else if meta.path.is_ident("default") {
            let _: Lit = meta.value()?.parse()?;
            Ok(())
        } else if meta.path.is_ident("default_expr") {
            validate_expr(&meta)
        } else {
            Err(meta.error(format!(
                "unknown pref argument: `{}`. Expected one of: key, default, default_expr",
                meta.path
                    .get_ident()
                    .map(|i| i.to_string())
                    .unwrap_or_default()
            )))
        }
    })
}

fn validate_expr(meta: &ParseNestedMeta) -> Result<()> {
    let source: LitStr = meta.value()?.parse()?;
    source
        .parse::<Expr>()
        .map(|_| ())
        .map_err(|e| syn::Error::new(source.span(), format!("invalid default expression: {e}")))
}
