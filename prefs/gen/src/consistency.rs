//! Cross-check of getter and putter keys.

use tracing::warn;

use crate::classifier::Role;
use crate::context::KeySpace;
use crate::diagnostics::Warning;

pub struct ConsistencyChecker;

impl ConsistencyChecker {
    /// Reports keys with an accessor in only one role, and pairs whose value
    /// types differ. Never fails: a value may be written or read by another
    /// component.
    pub fn check(keys: &KeySpace) -> Vec<Warning> {
        let mut warnings = Vec::new();

        for role in [Role::Getter, Role::Putter] {
            let opposite = keys.keys(role.opposite());
            for spec in keys.keys(role).iter() {
                if !opposite.contains(&spec.key) {
                    warnings.push(Warning::KeyAsymmetry {
                        key: spec.key.clone(),
                        missing: role.opposite(),
                        at: spec.attribution(),
                    });
                }
            }
        }

        for (getter, putter) in keys.pairs() {
            if getter.value_type.ty != putter.value_type.ty {
                warnings.push(Warning::ValueTypeMismatch {
                    key: getter.key.clone(),
                    getter_type: getter.value_type.ty.to_string(),
                    putter_type: putter.value_type.ty.to_string(),
                    at: putter.attribution(),
                });
            }
        }

        for warning in &warnings {
            warn!(at = %warning.attribution(), "{warning}");
        }
        warnings
    }
}
