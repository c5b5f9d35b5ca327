//! Supertrait traversal.
//!
//! Starting at a root trait, the walker classifies the root's own methods,
//! then descends into each supertrait in declaration order, depth first.
//! Every supertrait is resolved with one of two strategies:
//!
//! - **in-source**: the trait was discovered in the scanned source tree, so
//!   its methods carry full `#[pref]` metadata;
//! - **external**: the trait is listed in the [`ExternalRegistry`]. Only
//!   signatures are known, so keys derive from method names and defaults
//!   from value types. This degradation is part of the contract.
//!
//! `PreferenceActions` is never traversed; the assembler emits its methods
//! directly.

use tracing::debug;

use crate::classifier::AccessorClassifier;
use crate::context::GenerationContext;
use crate::diagnostics::Attribution;
use crate::errors::GeneratorError;
use crate::model::{AncestorRef, AttributeIssue, InterfaceDecl, MethodDecl};
use crate::registry::{ExternalInterface, ExternalRegistry};
use crate::source::DeclarationSet;

/// Name of the fixed accessor contract.
pub const ACCESSOR_CONTRACT: &str = "PreferenceActions";

/// Paths under which the runtime exports the accessor contract.
pub const ACCESSOR_CONTRACT_PATHS: &[&str] = &[
    "prefs_api::PreferenceActions",
    "prefs_api::actions::PreferenceActions",
];

/// A trait whose accessor methods can be enumerated.
pub trait AccessorSource {
    fn qualified_name(&self) -> &str;

    /// Methods to classify, in declaration order.
    fn accessor_methods(&self) -> &[MethodDecl];

    /// Supertraits, in declaration order.
    fn ancestors(&self) -> Vec<AncestorRef>;

    /// True when only signatures are available.
    fn is_external(&self) -> bool;

    /// Attributes that failed to parse while reading the declaration.
    fn attribute_issues(&self) -> &[AttributeIssue] {
        &[]
    }
}

impl AccessorSource for InterfaceDecl {
    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    fn accessor_methods(&self) -> &[MethodDecl] {
        &self.methods
    }

    fn ancestors(&self) -> Vec<AncestorRef> {
        self.ancestors.clone()
    }

    fn is_external(&self) -> bool {
        false
    }

    fn attribute_issues(&self) -> &[AttributeIssue] {
        &self.attribute_issues
    }
}

impl AccessorSource for ExternalInterface {
    fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    fn accessor_methods(&self) -> &[MethodDecl] {
        &self.methods
    }

    fn ancestors(&self) -> Vec<AncestorRef> {
        self.extends.iter().map(|name| AncestorRef::exact(name)).collect()
    }

    fn is_external(&self) -> bool {
        true
    }
}

/// Walks a root's hierarchy, classifying every reachable accessor.
pub struct HierarchyWalker<'a> {
    declarations: &'a DeclarationSet,
    registry: &'a ExternalRegistry,
    classifier: &'a AccessorClassifier,
}

impl<'a> HierarchyWalker<'a> {
    pub fn new(
        declarations: &'a DeclarationSet,
        registry: &'a ExternalRegistry,
        classifier: &'a AccessorClassifier,
    ) -> Self {
        HierarchyWalker {
            declarations,
            registry,
            classifier,
        }
    }

    /// Resolves an ancestor: any in-source candidate first, then the
    /// external registry.
    pub fn resolve(&self, ancestor: &AncestorRef) -> Option<&'a dyn AccessorSource> {
        let declarations = self.declarations;
        let registry = self.registry;
        ancestor
            .candidates
            .iter()
            .find_map(|name| declarations.get(name).map(|d| d as &dyn AccessorSource))
            .or_else(|| {
                ancestor
                    .candidates
                    .iter()
                    .find_map(|name| registry.get(name).map(|e| e as &dyn AccessorSource))
            })
    }

    /// True when `ancestor` names the runtime's `PreferenceActions`.
    ///
    /// Candidates are checked in resolution order: a runtime path matches,
    /// while an in-source or registered trait shadows the contract. A bare
    /// `PreferenceActions` that resolves to nothing else, such as a glob or
    /// re-export of the runtime, is the contract.
    pub fn is_accessor_contract(&self, ancestor: &AncestorRef) -> bool {
        for name in &ancestor.candidates {
            if ACCESSOR_CONTRACT_PATHS.contains(&name.as_str()) {
                return true;
            }
            if self.declarations.contains(name) || self.registry.contains(name) {
                return false;
            }
        }
        ancestor.simple_name() == ACCESSOR_CONTRACT
    }

    /// Walks `root` and its ancestors, collecting specs and errors in `ctx`.
    ///
    /// Errors never stop the walk: an invalid method is skipped and an
    /// unresolvable ancestor is reported against the root, while everything
    /// else is still classified.
    pub fn walk(&self, root: &InterfaceDecl, ctx: &mut GenerationContext) {
        let root_at = Attribution::interface(&root.qualified_name).at(root.location.clone());
        self.visit(root, &root_at, ctx);
    }

    fn visit(&self, interface: &dyn AccessorSource, root_at: &Attribution, ctx: &mut GenerationContext) {
        let name = interface.qualified_name();
        if !ctx.visit(name) {
            debug!(interface = name, "already visited");
            return;
        }

        for issue in interface.attribute_issues() {
            let at = match &issue.method {
                Some(method) => Attribution::method(name, method),
                None => Attribution::interface(name),
            };
            ctx.errors.push(GeneratorError::InvalidAttribute {
                interface: name.to_string(),
                message: issue.message.clone(),
                at: at.at(issue.location.clone()),
            });
        }

        for method in interface.accessor_methods() {
            match self.classifier.classify(name, method, &mut ctx.keys) {
                Ok(spec) => ctx.specs.push(spec),
                Err(err) => ctx.errors.push(err),
            }
        }

        for ancestor in interface.ancestors() {
            if self.is_accessor_contract(&ancestor) {
                continue;
            }
            match self.resolve(&ancestor) {
                Some(resolved) => {
                    debug!(
                        ancestor = %ancestor.written,
                        resolved = resolved.qualified_name(),
                        external = resolved.is_external(),
                        "resolved ancestor"
                    );
                    self.visit(resolved, root_at, ctx);
                }
                None => ctx.errors.push(GeneratorError::UnresolvableAncestor {
                    ancestor: ancestor.written.clone(),
                    root: ctx.root.clone(),
                    at: root_at.clone(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Role;
    use crate::model::{DefaultValue, Param, TypeRef};

    fn getter(name: &str, ty: &str) -> MethodDecl {
        MethodDecl::new(name, vec![], TypeRef::named(ty))
    }

    fn putter(name: &str, ty: &str) -> MethodDecl {
        MethodDecl::new(
            name,
            vec![Param {
                name: "value".to_string(),
                ty: TypeRef::named(ty),
            }],
            TypeRef::Unit,
        )
    }

    fn interface(name: &str, methods: Vec<MethodDecl>, ancestors: &[&str]) -> InterfaceDecl {
        let mut decl = InterfaceDecl::new(name);
        decl.methods = methods;
        decl.ancestors = ancestors.iter().map(|a| AncestorRef::exact(a)).collect();
        decl
    }

    fn walk(
        root: &str,
        declarations: &DeclarationSet,
        registry: &ExternalRegistry,
    ) -> GenerationContext {
        let classifier = AccessorClassifier::default();
        let walker = HierarchyWalker::new(declarations, registry, &classifier);
        let mut ctx = GenerationContext::new(root);
        walker.walk(declarations.get(root).unwrap(), &mut ctx);
        ctx
    }

    #[test]
    fn root_methods_come_before_ancestors() {
        let mut set = DeclarationSet::new();
        set.insert(interface(
            "crate::Settings",
            vec![getter("volume", "i32")],
            &["crate::A", "crate::B"],
        ));
        set.insert(interface("crate::A", vec![getter("a", "bool")], &["crate::C"]));
        set.insert(interface("crate::B", vec![getter("b", "bool")], &[]));
        set.insert(interface("crate::C", vec![getter("c", "bool")], &[]));

        let ctx = walk("crate::Settings", &set, &ExternalRegistry::new());
        let order: Vec<&str> = ctx.specs.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(order, vec!["volume", "a", "c", "b"]);
        assert_eq!(
            ctx.interfaces,
            vec!["crate::Settings", "crate::A", "crate::C", "crate::B"]
        );
        assert!(!ctx.has_errors());
    }

    #[test]
    fn diamonds_are_walked_once() {
        let mut set = DeclarationSet::new();
        set.insert(interface("crate::Settings", vec![], &["crate::A", "crate::B"]));
        set.insert(interface("crate::A", vec![], &["crate::Base"]));
        set.insert(interface("crate::B", vec![], &["crate::Base"]));
        set.insert(interface("crate::Base", vec![getter("volume", "i32")], &[]));

        let ctx = walk("crate::Settings", &set, &ExternalRegistry::new());
        assert!(!ctx.has_errors());
        assert_eq!(ctx.specs.len(), 1);
    }

    #[test]
    fn accessor_contract_is_not_traversed() {
        let mut set = DeclarationSet::new();
        set.insert(interface(
            "crate::Settings",
            vec![],
            &["prefs_api::PreferenceActions"],
        ));
        let ctx = walk("crate::Settings", &set, &ExternalRegistry::new());
        assert!(!ctx.has_errors());
        assert_eq!(ctx.interfaces, vec!["crate::Settings"]);
    }

    #[test]
    fn user_trait_named_like_the_contract_is_walked() {
        let mut set = DeclarationSet::new();
        let mut root = InterfaceDecl::new("crate::Settings");
        root.ancestors.push(AncestorRef {
            written: "PreferenceActions".to_string(),
            candidates: vec!["crate::PreferenceActions".to_string()],
        });
        set.insert(root);
        set.insert(interface(
            "crate::PreferenceActions",
            vec![getter("volume", "i32")],
            &[],
        ));

        let ctx = walk("crate::Settings", &set, &ExternalRegistry::new());
        assert!(!ctx.has_errors());
        assert_eq!(ctx.interfaces, vec!["crate::Settings", "crate::PreferenceActions"]);
        assert_eq!(ctx.specs[0].key, "volume");
    }

    #[test]
    fn contract_is_recognized_through_imports_and_globs() {
        let set = DeclarationSet::new();
        let registry = ExternalRegistry::new();
        let classifier = AccessorClassifier::default();
        let walker = HierarchyWalker::new(&set, &registry, &classifier);

        let imported = AncestorRef {
            written: "PreferenceActions".to_string(),
            candidates: vec![
                "crate::prefs_api::PreferenceActions".to_string(),
                "prefs_api::PreferenceActions".to_string(),
            ],
        };
        assert!(walker.is_accessor_contract(&imported));

        let bare = AncestorRef {
            written: "PreferenceActions".to_string(),
            candidates: vec!["crate::PreferenceActions".to_string()],
        };
        assert!(walker.is_accessor_contract(&bare));

        assert!(!walker.is_accessor_contract(&AncestorRef::exact("vendor::Actions")));
    }

    #[test]
    fn unresolvable_ancestor_is_attributed_to_root() {
        let mut set = DeclarationSet::new();
        set.insert(interface(
            "crate::Settings",
            vec![getter("volume", "i32")],
            &["crate::Missing"],
        ));
        set.insert(interface("crate::Other", vec![], &[]));
        let ctx = walk("crate::Settings", &set, &ExternalRegistry::new());

        assert_eq!(ctx.errors.len(), 1);
        match &ctx.errors[0] {
            GeneratorError::UnresolvableAncestor { ancestor, root, at } => {
                assert_eq!(ancestor, "crate::Missing");
                assert_eq!(root, "crate::Settings");
                assert_eq!(at.interface, "crate::Settings");
                assert!(at.method.is_none());
            }
            other => panic!("unexpected error: {other}"),
        }
        // The root's own accessors are still classified.
        assert_eq!(ctx.specs.len(), 1);
    }

    #[test]
    fn in_source_wins_over_external() {
        let mut set = DeclarationSet::new();
        set.insert(interface(
            "crate::Settings",
            vec![],
            &["prefs_api::common::ThemePreferences"],
        ));
        let mut local = interface("prefs_api::common::ThemePreferences", vec![], &[]);
        let mut theme = getter("theme", "String");
        theme.meta.key = Some("ui.theme".to_string());
        local.methods.push(theme);
        set.insert(local);

        let ctx = walk("crate::Settings", &set, &ExternalRegistry::bundled().unwrap());
        assert_eq!(ctx.specs.len(), 1);
        assert_eq!(ctx.specs[0].key, "ui.theme");
    }

    #[test]
    fn external_ancestors_derive_keys_from_names() {
        let mut set = DeclarationSet::new();
        let mut root = InterfaceDecl::new("crate::Settings");
        root.ancestors.push(AncestorRef {
            written: "ThemePreferences".to_string(),
            candidates: vec![
                "crate::ThemePreferences".to_string(),
                "prefs_api::common::ThemePreferences".to_string(),
            ],
        });
        set.insert(root);

        let ctx = walk("crate::Settings", &set, &ExternalRegistry::bundled().unwrap());
        assert!(!ctx.has_errors());
        let keys: Vec<(&str, Role)> = ctx.specs.iter().map(|s| (s.key.as_str(), s.role)).collect();
        assert_eq!(keys, vec![("theme", Role::Getter), ("theme", Role::Putter)]);
        assert!(!ctx.specs[0].has_explicit_default);
        assert_eq!(
            ctx.specs[0].default_value,
            Some(DefaultValue::Literal(syn::parse_quote!("")))
        );
        assert_eq!(
            ctx.interfaces,
            vec!["crate::Settings", "prefs_api::common::ThemePreferences"]
        );
    }

    #[test]
    fn external_extends_are_followed() {
        let mut registry = ExternalRegistry::new();
        registry.insert(ExternalInterface {
            qualified_name: "vendor::Child".to_string(),
            extends: vec!["vendor::Parent".to_string()],
            methods: vec![putter("set_child", "i32")],
        });
        registry.insert(ExternalInterface {
            qualified_name: "vendor::Parent".to_string(),
            extends: vec![],
            methods: vec![getter("parent", "i64")],
        });
        let mut set = DeclarationSet::new();
        set.insert(interface("crate::Settings", vec![], &["vendor::Child"]));

        let ctx = walk("crate::Settings", &set, &registry);
        let keys: Vec<&str> = ctx.specs.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["child", "parent"]);
    }

    #[test]
    fn attribute_issues_become_attributed_errors() {
        let mut set = DeclarationSet::new();
        let mut root = interface("crate::Settings", vec![getter("volume", "i32")], &[]);
        root.attribute_issues.push(AttributeIssue {
            method: Some("theme".to_string()),
            message: "unknown pref argument".to_string(),
            location: None,
        });
        set.insert(root);

        let ctx = walk("crate::Settings", &set, &ExternalRegistry::new());
        assert_eq!(ctx.errors.len(), 1);
        match &ctx.errors[0] {
            GeneratorError::InvalidAttribute { interface, at, .. } => {
                assert_eq!(interface, "crate::Settings");
                assert_eq!(at.method.as_deref(), Some("theme"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(ctx.specs.len(), 1);
    }

    #[test]
    fn invalid_methods_do_not_stop_the_walk() {
        let mut set = DeclarationSet::new();
        let invalid = MethodDecl::new(
            "is_ready",
            vec![Param {
                name: "ready".to_string(),
                ty: TypeRef::named("bool"),
            }],
            TypeRef::named("i32"),
        );
        set.insert(interface(
            "crate::Settings",
            vec![invalid, getter("volume", "i32")],
            &[],
        ));
        let ctx = walk("crate::Settings", &set, &ExternalRegistry::new());
        assert_eq!(ctx.errors.len(), 1);
        assert_eq!(ctx.specs.len(), 1);
    }
}
