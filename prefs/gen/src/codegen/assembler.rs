//! Assembly of a complete generated unit.

use tracing::debug;

use crate::codegen::accessors::generate_accessor;
use crate::codegen::actions::generate_actions;
use crate::codegen::constructor::generate_definition;
use crate::codegen::unit::{GeneratedUnit, TraitImpl};
use crate::codegen::{GenerationTarget, path_tokens};
use crate::context::GenerationContext;
use crate::errors::GeneratorError;
use crate::model::InterfaceDecl;
use crate::naming::{impl_struct_name, unit_path};

/// Builds the [`GeneratedUnit`] of a root from its walked context.
#[derive(Debug, Clone, Default)]
pub struct ImplementationAssembler {
    target: GenerationTarget,
}

impl ImplementationAssembler {
    pub fn new(target: GenerationTarget) -> Self {
        ImplementationAssembler { target }
    }

    /// Assembles the unit for `root` from the specs collected in `ctx`.
    ///
    /// Every traversed interface gets an `impl` block, even when it declares
    /// no accessors, since the root trait requires all of its supertraits.
    /// Accessors appear in traversal order within their declaring trait's
    /// block.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::CodeGenError`] if a path or type cannot be
    /// emitted.
    pub fn assemble(
        &self,
        root: &InterfaceDecl,
        ctx: &mut GenerationContext,
    ) -> Result<GeneratedUnit, GeneratorError> {
        let struct_name = impl_struct_name(root.simple_name());
        let store = root.store.clone().unwrap_or_default();
        let definition = generate_definition(&struct_name, root.simple_name(), &store, ctx);

        let specs = ctx.specs.clone();
        let mut impls = Vec::with_capacity(ctx.interfaces.len());
        for interface in ctx.interfaces.clone() {
            let mut methods = Vec::new();
            for spec in specs.iter().filter(|s| s.declaring_interface == interface) {
                methods.push(generate_accessor(spec, &self.target, ctx)?);
            }
            impls.push(TraitImpl {
                trait_path: path_tokens(&interface)?,
                interface,
                methods,
            });
        }

        let actions = generate_actions(&self.target, ctx)?;

        let imports = ctx
            .imports
            .iter()
            .map(|path| path_tokens(path))
            .collect::<Result<Vec<_>, _>>()?;

        let unit = GeneratedUnit {
            root: root.qualified_name.clone(),
            struct_name,
            path: unit_path(root),
            imports,
            definition,
            actions,
            impls,
        };
        debug!(
            root = %unit.root,
            impls = unit.impls.len(),
            accessors = unit.accessor_count(),
            imports = unit.imports.len(),
            "assembled unit"
        );
        Ok(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::AccessorClassifier;
    use crate::hierarchy::HierarchyWalker;
    use crate::registry::ExternalRegistry;
    use crate::test_utils::declarations;
    use crate::type_mapper::TypeMapper;

    fn assemble(source: &str, root: &str, target: GenerationTarget) -> (GeneratedUnit, GenerationContext) {
        let set = declarations(source);
        let registry = ExternalRegistry::bundled().unwrap();
        let classifier = AccessorClassifier::new(TypeMapper::new(target.serializer.clone()));
        let walker = HierarchyWalker::new(&set, &registry, &classifier);
        let root = set.get(root).unwrap();

        let mut ctx = GenerationContext::new(root.qualified_name.as_str());
        walker.walk(root, &mut ctx);
        let unit = ImplementationAssembler::new(target)
            .assemble(root, &mut ctx)
            .unwrap();
        (unit, ctx)
    }

    #[test]
    fn one_impl_per_traversed_interface() {
        let (unit, _) = assemble(
            r#"
                use prefs_api::common::ThemePreferences;

                #[preferences(name = "app")]
                pub trait Settings: Marker + ThemePreferences + PreferenceActions {
                    fn volume(&self) -> i32;
                }

                pub trait Marker {}
            "#,
            "crate::Settings",
            GenerationTarget::default(),
        );
        let interfaces: Vec<&str> = unit.impls.iter().map(|i| i.interface.as_str()).collect();
        assert_eq!(
            interfaces,
            vec![
                "crate::Settings",
                "crate::Marker",
                "prefs_api::common::ThemePreferences"
            ]
        );
        assert_eq!(unit.impls[0].methods.len(), 1);
        assert!(unit.impls[1].methods.is_empty());
        assert_eq!(unit.impls[2].methods.len(), 2);
        assert_eq!(unit.struct_name, "SettingsImpl");
        assert_eq!(unit.path, std::path::PathBuf::from("settings_impl.rs"));
    }

    #[test]
    fn imports_only_what_is_used() {
        let (unit, _) = assemble(
            r#"
                #[preferences]
                pub trait Settings {
                    fn volume(&self) -> i32;
                }
            "#,
            "crate::Settings",
            GenerationTarget::default(),
        );
        assert!(unit.imports.is_empty());

        let (unit, _) = assemble(
            r#"
                #[preferences(name = "app")]
                pub trait Settings {
                    fn tags(&self) -> HashSet<String>;
                    fn theme(&self) -> Theme;
                }
            "#,
            "crate::Settings",
            GenerationTarget {
                min_api_level: Some(8),
                serializer: Some("prefs_api::serializer".to_string()),
            },
        );
        let imports: Vec<String> = unit
            .imports
            .iter()
            .map(|p| quote::quote!(#p).to_string().replace(' ', ""))
            .collect();
        assert_eq!(
            imports,
            vec![
                "prefs_api::StoreMode",
                "prefs_api::build",
                "prefs_api::compat",
                "prefs_api::serializer",
                "std::collections::HashSet",
            ]
        );
    }

    #[test]
    fn renders_parseable_file() {
        let (unit, ctx) = assemble(
            r#"
                #[preferences(name = "app", mode = "multi_process_readable")]
                pub trait Settings {
                    #[pref(default = "guest")]
                    fn get_username(&self) -> String;
                    fn set_username(&self, username: String) -> &Self;
                    fn is_ready(&self, ready: bool) -> i32;
                }
            "#,
            "crate::Settings",
            GenerationTarget::default(),
        );
        assert_eq!(ctx.errors.len(), 1);
        let file: syn::File = syn::parse2(unit.to_tokens()).unwrap();
        let code = quote::quote!(#file).to_string();
        assert!(code.contains("StoreMode :: MultiProcessReadable"));
        assert!(code.contains("get_string (\"username\" , \"guest\")"));
        assert!(!code.contains("is_ready"));
    }
}
