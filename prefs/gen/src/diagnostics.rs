//! Attributed diagnostics.
//!
//! Generation problems are collected rather than raised: each one records
//! its severity, message and the declaration it belongs to, so the CLI can
//! report everything for a batch in one pass.

use std::fmt;
use std::path::PathBuf;

use colored::Colorize;

use crate::classifier::Role;
use crate::errors::GeneratorError;

/// A position in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: Option<PathBuf>,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file.display(), self.line, self.column),
            None => write!(f, "{}:{}", self.line, self.column),
        }
    }
}

/// The declaration a diagnostic belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    /// Qualified name of the interface.
    pub interface: String,
    /// Method name, when the diagnostic concerns a single method.
    pub method: Option<String>,
    pub location: Option<SourceLocation>,
}

impl Attribution {
    pub fn interface(interface: &str) -> Self {
        Attribution {
            interface: interface.to_string(),
            method: None,
            location: None,
        }
    }

    pub fn method(interface: &str, method: &str) -> Self {
        Attribution {
            interface: interface.to_string(),
            method: Some(method.to_string()),
            location: None,
        }
    }

    pub fn at(mut self, location: Option<SourceLocation>) -> Self {
        self.location = location;
        self
    }
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            Some(method) => write!(f, "{}::{}", self.interface, method)?,
            None => f.write_str(&self.interface)?,
        }
        if let Some(location) = &self.location {
            write!(f, " ({location})")?;
        }
        Ok(())
    }
}

/// Advisory findings that never fail generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A key has an accessor in one role but not the other.
    KeyAsymmetry {
        key: String,
        /// The role with no accessor.
        missing: Role,
        at: Attribution,
    },
    /// A getter and putter share a key but disagree on the value type, so
    /// `init_defaults` cannot pair them.
    ValueTypeMismatch {
        key: String,
        getter_type: String,
        putter_type: String,
        at: Attribution,
    },
}

impl Warning {
    pub fn attribution(&self) -> &Attribution {
        match self {
            Warning::KeyAsymmetry { at, .. } | Warning::ValueTypeMismatch { at, .. } => at,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::KeyAsymmetry { key, missing, .. } => {
                write!(f, "missing {missing} for key '{key}'")
            }
            Warning::ValueTypeMismatch {
                key,
                getter_type,
                putter_type,
                ..
            } => write!(
                f,
                "getter and putter for key '{key}' disagree on the value type (`{getter_type}` vs `{putter_type}`)"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub attribution: Option<Attribution>,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Renders the diagnostic for a terminal, e.g.
    /// `error: <message>\n  --> crate::Settings::volume (src/lib.rs:4:5)`.
    pub fn render(&self) -> String {
        let label = match self.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        match &self.attribution {
            Some(at) => format!("{}: {}\n  {} {}", label, self.message, "-->".blue(), at),
            None => format!("{}: {}", label, self.message),
        }
    }
}

impl From<&GeneratorError> for Diagnostic {
    fn from(err: &GeneratorError) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: err.to_string(),
            attribution: err.attribution().cloned(),
        }
    }
}

impl From<GeneratorError> for Diagnostic {
    fn from(err: GeneratorError) -> Self {
        Diagnostic::from(&err)
    }
}

impl From<&Warning> for Diagnostic {
    fn from(warning: &Warning) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            message: warning.to_string(),
            attribution: Some(warning.attribution().clone()),
        }
    }
}
