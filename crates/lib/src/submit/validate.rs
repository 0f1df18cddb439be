//! Per-type checks of an object about to be persisted.
//!
//! Validation never modifies the object and never fails: every problem found
//! becomes a [`Violation`] in the returned [`ValidationReport`].

use std::fmt;

use serde::Serialize;

use super::{is_empty_argument, is_unset, persistent_value};
use crate::{
    constants::*,
    model::{Node, Path, PathBuf, ZObject},
};

/// What is wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationKind {
    MissingFunctionOutput,
    MissingFunctionInputType,
    MissingTargetFunction,
    MissingImplementationComposition,
    MissingImplementationCode,
    MissingImplementationCodeLanguage,
    MissingTesterCall,
    MissingTesterValidation,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MissingFunctionOutput => "MISSING_FUNCTION_OUTPUT",
            ViolationKind::MissingFunctionInputType => "MISSING_FUNCTION_INPUT_TYPE",
            ViolationKind::MissingTargetFunction => "MISSING_TARGET_FUNCTION",
            ViolationKind::MissingImplementationComposition => {
                "MISSING_IMPLEMENTATION_COMPOSITION"
            }
            ViolationKind::MissingImplementationCode => "MISSING_IMPLEMENTATION_CODE",
            ViolationKind::MissingImplementationCodeLanguage => {
                "MISSING_IMPLEMENTATION_CODE_LANGUAGE"
            }
            ViolationKind::MissingTesterCall => "MISSING_TESTER_CALL",
            ViolationKind::MissingTesterValidation => "MISSING_TESTER_VALIDATION",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem found by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Key path of the offending field
    pub location: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.location)
    }
}

/// The violations found in one object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` when no violation was found.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether a violation of `kind` was reported.
    pub fn contains(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|violation| violation.kind == kind)
    }

    /// Prefixes every location with `base`, typically a namespace.
    pub fn under(mut self, base: impl AsRef<Path>) -> Self {
        for violation in &mut self.violations {
            violation.location = base
                .as_ref()
                .to_path_buf()
                .join(PathBuf::from(violation.location.as_str()))
                .to_string();
        }
        self
    }

    fn report(&mut self, location: PathBuf, kind: ViolationKind) {
        self.violations.push(Violation {
            location: location.to_string(),
            kind,
        });
    }
}

/// Checks the object rooted at `root`.
///
/// `root` is a persistent object or a bare function, implementation or tester.
/// Locations in the report are relative to `root`.
pub fn validate(root: &Node) -> ValidationReport {
    let mut report = ValidationReport::default();
    let Some((value, base)) = persistent_value(root) else {
        return report;
    };
    match value.type_id() {
        Some(Z_FUNCTION) => validate_function(value, base, &mut report),
        Some(Z_IMPLEMENTATION) => validate_implementation(value, base, &mut report),
        Some(Z_TESTER) => validate_tester(value, base, &mut report),
        _ => {}
    }
    report
}

fn validate_function(function: &ZObject, base: PathBuf, report: &mut ValidationReport) {
    if is_unset(function.get(Z_FUNCTION_RETURN_TYPE)) {
        report.report(
            base.clone().push(Z_FUNCTION_RETURN_TYPE),
            ViolationKind::MissingFunctionOutput,
        );
    }

    let Some(arguments) = function.get(Z_FUNCTION_ARGUMENTS).and_then(Node::as_list) else {
        return;
    };
    for (index, argument) in arguments.items() {
        let untyped = argument
            .as_object()
            .is_some_and(|argument| is_unset(argument.get(Z_ARGUMENT_TYPE)));
        if untyped && !is_empty_argument(argument) {
            report.report(
                base.clone().push(Z_FUNCTION_ARGUMENTS).push_index(index),
                ViolationKind::MissingFunctionInputType,
            );
        }
    }
}

fn validate_implementation(implementation: &ZObject, base: PathBuf, report: &mut ValidationReport) {
    if is_unset(implementation.get(Z_IMPLEMENTATION_FUNCTION)) {
        report.report(
            base.clone().push(Z_IMPLEMENTATION_FUNCTION),
            ViolationKind::MissingTargetFunction,
        );
    }

    match (
        implementation.get(Z_IMPLEMENTATION_COMPOSITION),
        implementation.get(Z_IMPLEMENTATION_CODE),
    ) {
        (Some(composition), _) => {
            if is_empty_call(composition) {
                report.report(
                    base.push(Z_IMPLEMENTATION_COMPOSITION),
                    ViolationKind::MissingImplementationComposition,
                );
            }
        }
        (None, Some(code)) => {
            let code_path = base.push(Z_IMPLEMENTATION_CODE);
            let Some(code) = code.as_object() else {
                report.report(code_path, ViolationKind::MissingImplementationCode);
                return;
            };
            if is_unset(code.get(Z_CODE_CODE)) {
                report.report(
                    code_path.clone().push(Z_CODE_CODE),
                    ViolationKind::MissingImplementationCode,
                );
            }
            if is_unset(code.get(Z_CODE_LANGUAGE)) {
                report.report(
                    code_path.push(Z_CODE_LANGUAGE),
                    ViolationKind::MissingImplementationCodeLanguage,
                );
            }
        }
        (None, None) => report.report(
            base.push(Z_IMPLEMENTATION_COMPOSITION),
            ViolationKind::MissingImplementationComposition,
        ),
    }
}

fn validate_tester(tester: &ZObject, base: PathBuf, report: &mut ValidationReport) {
    if is_unset(tester.get(Z_TESTER_FUNCTION)) {
        report.report(
            base.clone().push(Z_TESTER_FUNCTION),
            ViolationKind::MissingTargetFunction,
        );
    }
    if tester.get(Z_TESTER_CALL).is_none_or(is_empty_call) {
        report.report(
            base.clone().push(Z_TESTER_CALL),
            ViolationKind::MissingTesterCall,
        );
    }
    if tester.get(Z_TESTER_VALIDATION).is_none_or(is_empty_call) {
        report.report(
            base.push(Z_TESTER_VALIDATION),
            ViolationKind::MissingTesterValidation,
        );
    }
}

/// A blank value, or a function call that names no function.
fn is_empty_call(node: &Node) -> bool {
    node.is_blank_terminal()
        || node.as_object().is_some_and(|call| {
            call.is_type(Z_FUNCTION_CALL) && is_unset(call.get(Z_FUNCTION_CALL_FUNCTION))
        })
}
