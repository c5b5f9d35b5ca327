//! Batch orchestration.
//!
//! Each root trait is processed on its own: a fresh [`GenerationContext`] is
//! built, the hierarchy is walked, the unit is assembled and rendered, and
//! the key space is checked for consistency. Nothing collected for one root
//! is visible while processing the next, and a failure in one root never
//! stops the others.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::classifier::AccessorClassifier;
use crate::codegen::ImplementationAssembler;
use crate::config::GeneratorConfig;
use crate::consistency::ConsistencyChecker;
use crate::context::GenerationContext;
use crate::diagnostics::{Diagnostic, Severity};
use crate::errors::GeneratorError;
use crate::hierarchy::HierarchyWalker;
use crate::model::InterfaceDecl;
use crate::naming::unit_path;
use crate::output::{render_unit, write_atomic};
use crate::registry::ExternalRegistry;
use crate::source::DeclarationSet;
use crate::type_mapper::TypeMapper;

/// Outcome of generating one root trait.
#[derive(Debug, Clone)]
pub struct UnitReport {
    /// Qualified name of the root trait.
    pub root: String,
    /// Location of the unit relative to the output directory.
    pub relative_path: PathBuf,
    /// The rendered unit. Present whenever rendering succeeded, even if
    /// accessors were dropped because of errors.
    pub source: Option<String>,
    /// Errors first, then warnings.
    pub diagnostics: Vec<Diagnostic>,
    /// Where the unit was written, if it was.
    pub written: Option<PathBuf>,
}

impl UnitReport {
    /// True when every accessor was generated and nothing failed.
    pub fn is_complete(&self) -> bool {
        self.source.is_some() && !self.has_errors()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

/// Outcome of a whole run, one [`UnitReport`] per root in discovery order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub units: Vec<UnitReport>,
}

impl BatchReport {
    pub fn has_errors(&self) -> bool {
        self.units.iter().any(UnitReport::has_errors)
    }

    pub fn error_count(&self) -> usize {
        self.units.iter().map(|u| u.errors().count()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.units.iter().map(|u| u.warnings().count()).sum()
    }

    pub fn unit(&self, root: &str) -> Option<&UnitReport> {
        self.units.iter().find(|u| u.root == root)
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Drives generation for every root trait of a declaration set.
pub struct Generator {
    config: GeneratorConfig,
    declarations: DeclarationSet,
    registry: ExternalRegistry,
    classifier: AccessorClassifier,
    assembler: ImplementationAssembler,
}

impl Generator {
    pub fn new(
        config: GeneratorConfig,
        declarations: DeclarationSet,
        registry: ExternalRegistry,
    ) -> Self {
        let target = config.target();
        Generator {
            classifier: AccessorClassifier::new(TypeMapper::new(target.serializer.clone())),
            assembler: ImplementationAssembler::new(target),
            config,
            declarations,
            registry,
        }
    }

    /// Scans the configured source root and loads the external manifests.
    ///
    /// ## Errors
    ///
    /// Returns an error if the configuration is invalid, a source file cannot
    /// be read or is not valid Rust, or a manifest cannot be loaded. Malformed
    /// preference attributes are reported on their root instead.
    pub fn from_config(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        config.validate()?;
        let declarations = DeclarationSet::from_dir(&config.source)?;

        let mut registry = if config.bundled_manifest {
            ExternalRegistry::bundled()?
        } else {
            ExternalRegistry::new()
        };
        for manifest in &config.manifests {
            let loaded = registry.load_file(manifest)?;
            debug!(manifest = %manifest.display(), loaded, "loaded external manifest");
        }

        info!(
            source = %config.source.display(),
            interfaces = declarations.len(),
            external = registry.len(),
            "loaded declarations"
        );
        Ok(Self::new(config, declarations, registry))
    }

    pub fn declarations(&self) -> &DeclarationSet {
        &self.declarations
    }

    pub fn registry(&self) -> &ExternalRegistry {
        &self.registry
    }

    /// Generates every root. Units are written below the configured output
    /// directory unless `dry_run` is set.
    ///
    /// Only complete units are written. An incomplete unit still carries its
    /// rendered source in the report.
    pub fn generate_all(&self, dry_run: bool) -> BatchReport {
        let mut report = BatchReport::default();
        for root in self.declarations.roots() {
            let mut unit = self.generate(root);
            if !dry_run && unit.is_complete() {
                self.write(&mut unit, &self.config.output);
            }
            report.units.push(unit);
        }

        if report.is_empty() {
            warn!("no #[preferences] traits found");
        }
        report
    }

    /// Generates the unit for one root without writing it.
    #[instrument(skip(self, root), fields(root = %root.qualified_name))]
    pub fn generate(&self, root: &InterfaceDecl) -> UnitReport {
        let mut ctx = GenerationContext::new(&root.qualified_name);
        HierarchyWalker::new(&self.declarations, &self.registry, &self.classifier)
            .walk(root, &mut ctx);

        let rendered = self
            .assembler
            .assemble(root, &mut ctx)
            .and_then(|unit| render_unit(&unit));
        ctx.warnings = ConsistencyChecker::check(&ctx.keys);

        let mut diagnostics = ctx.diagnostics();
        let source = match rendered {
            Ok(source) => Some(source),
            Err(err) => {
                diagnostics.insert(ctx.errors.len(), Diagnostic::from(err));
                None
            }
        };

        info!(
            accessors = ctx.specs.len(),
            interfaces = ctx.interfaces.len(),
            errors = diagnostics.iter().filter(|d| d.is_error()).count(),
            warnings = ctx.warnings.len(),
            "generated unit"
        );

        UnitReport {
            root: root.qualified_name.clone(),
            relative_path: unit_path(root),
            source,
            diagnostics,
            written: None,
        }
    }

    /// Writes a rendered unit. A failure is recorded on that unit only.
    fn write(&self, unit: &mut UnitReport, output_dir: &Path) {
        let Some(source) = &unit.source else {
            return;
        };
        let path = output_dir.join(&unit.relative_path);
        match write_atomic(&path, source) {
            Ok(()) => {
                debug!(path = %path.display(), "wrote unit");
                unit.written = Some(path);
            }
            Err(err) => unit.diagnostics.insert(0, Diagnostic::from(err)),
        }
    }
}
