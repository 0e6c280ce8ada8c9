//! The standard rubric as data
//!
//! Each checklist line of the style guide is one `RuleSpec`. Weights within
//! a category sum to 1.0. The table is read once at startup and tailored by
//! the project configuration (disabled rules, threshold overrides) before
//! it is registered.

use super::check::Check;
use crate::config::RuleOverride;
use crate::error::ConfigError;
use crate::facts::FactKind;
use crate::models::Category;
use std::collections::BTreeMap;
use tracing::debug;

/// Declarative catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSpec {
    pub id: &'static str,
    pub category: Category,
    pub weight: f64,
    pub description: &'static str,
    /// Prefix of each finding message
    pub violation: &'static str,
    pub recommendation: &'static str,
    pub check: Check,
}

const SNAKE_CASE: &str = r"^_{0,2}[a-z][a-z0-9_]*$";
const PASCAL_CASE: &str = r"^_?[A-Z][a-zA-Z0-9]*$";
const UPPER_SNAKE: &str = r"^_?[A-Z][A-Z0-9_]*$";
const DESCRIPTIVE_VARIABLE: &str = r"^(_?[a-z][a-z0-9_]+|[ijk_])$";
const TEST_FUNCTION: &str = r"^test_[a-z0-9_]+$";
const LOG_LEVELS: &[&str] = &[
    "debug",
    "info",
    "warning",
    "error",
    "critical",
    "exception",
    "print",
];

/// The standard rubric, in declaration order
pub fn standard() -> Vec<RuleSpec> {
    use Category::*;
    use FactKind::*;

    vec![
        // Layout & formatting
        RuleSpec {
            id: "line-length",
            category: Layout,
            weight: 0.4,
            description: "Lines stay within 88 characters",
            violation: "line too long",
            recommendation: "Wrap lines longer than 88 characters (let the formatter do it).",
            check: Check::AtMost { kind: LineLength, limit: 88.0 },
        },
        RuleSpec {
            id: "import-grouping",
            category: Layout,
            weight: 0.4,
            description: "Imports grouped as standard library, third party, local",
            violation: "imports are not grouped stdlib / third-party / local",
            recommendation: "Group imports into standard library, third-party and local blocks separated by blank lines.",
            check: Check::Expect { kind: ImportGroupOrder, value: true },
        },
        RuleSpec {
            id: "indent-width",
            category: Layout,
            weight: 0.2,
            description: "Four-space indentation",
            violation: "unexpected indentation width",
            recommendation: "Indent with four spaces.",
            check: Check::Equals { kind: IndentWidth, value: 4.0 },
        },
        // Naming
        RuleSpec {
            id: "function-snake-case",
            category: Naming,
            weight: 0.35,
            description: "Function names are snake_case",
            violation: "function name is not snake_case",
            recommendation: "Rename functions to snake_case.",
            check: Check::Matches { kind: FunctionName, pattern: SNAKE_CASE },
        },
        RuleSpec {
            id: "class-pascal-case",
            category: Naming,
            weight: 0.25,
            description: "Class names are PascalCase",
            violation: "class name is not PascalCase",
            recommendation: "Rename classes to PascalCase.",
            check: Check::Matches { kind: ClassName, pattern: PASCAL_CASE },
        },
        RuleSpec {
            id: "constant-upper-case",
            category: Naming,
            weight: 0.2,
            description: "Module constants are UPPER_SNAKE_CASE",
            violation: "constant is not UPPER_SNAKE_CASE",
            recommendation: "Spell module-level constants in UPPER_SNAKE_CASE.",
            check: Check::Matches { kind: ConstantName, pattern: UPPER_SNAKE },
        },
        RuleSpec {
            id: "descriptive-variable",
            category: Naming,
            weight: 0.2,
            description: "Variables are descriptive snake_case names",
            violation: "variable name is not descriptive snake_case",
            recommendation: "Use descriptive snake_case variable names (single letters only for loop counters).",
            check: Check::Matches { kind: VariableName, pattern: DESCRIPTIVE_VARIABLE },
        },
        // Function design
        RuleSpec {
            id: "function-max-length",
            category: FunctionDesign,
            weight: 0.35,
            description: "Functions are at most 40 lines",
            violation: "function too long",
            recommendation: "Split long functions into smaller single-purpose helpers.",
            check: Check::AtMost { kind: FunctionLength, limit: 40.0 },
        },
        RuleSpec {
            id: "function-docstring",
            category: FunctionDesign,
            weight: 0.3,
            description: "Functions have docstrings",
            violation: "function has no docstring",
            recommendation: "Add docstrings describing purpose, arguments and return values.",
            check: Check::Expect { kind: DocstringPresent, value: true },
        },
        RuleSpec {
            id: "parameter-count",
            category: FunctionDesign,
            weight: 0.2,
            description: "Functions take at most 5 parameters",
            violation: "too many parameters",
            recommendation: "Reduce parameter lists by grouping related arguments into a dataclass.",
            check: Check::AtMost { kind: ParameterCount, limit: 5.0 },
        },
        RuleSpec {
            id: "type-hints",
            category: FunctionDesign,
            weight: 0.15,
            description: "Function signatures carry type hints",
            violation: "function signature lacks type hints",
            recommendation: "Annotate parameters and return types.",
            check: Check::Expect { kind: TypeHintsPresent, value: true },
        },
        // Class design
        RuleSpec {
            id: "class-method-count",
            category: ClassDesign,
            weight: 0.4,
            description: "Classes define at most 20 methods",
            violation: "class has too many methods",
            recommendation: "Break up large classes so each has a single responsibility.",
            check: Check::AtMost { kind: ClassMethodCount, limit: 20.0 },
        },
        RuleSpec {
            id: "class-docstring",
            category: ClassDesign,
            weight: 0.3,
            description: "Classes have docstrings",
            violation: "class has no docstring",
            recommendation: "Document each class's responsibility in a class docstring.",
            check: Check::Expect { kind: ClassDocstringPresent, value: true },
        },
        RuleSpec {
            id: "inheritance-depth",
            category: ClassDesign,
            weight: 0.3,
            description: "Inheritance hierarchies are at most 3 levels deep",
            violation: "inheritance hierarchy too deep",
            recommendation: "Prefer composition over deep inheritance hierarchies.",
            check: Check::AtMost { kind: InheritanceDepth, limit: 3.0 },
        },
        // Error handling
        RuleSpec {
            id: "no-bare-except",
            category: ErrorHandling,
            weight: 0.5,
            description: "No bare `except:` clauses",
            violation: "bare except clause",
            recommendation: "Catch specific exception types instead of using a bare `except:`.",
            check: Check::Expect { kind: BareExcept, value: false },
        },
        RuleSpec {
            id: "no-broad-except",
            category: ErrorHandling,
            weight: 0.25,
            description: "No `except Exception` catch-alls",
            violation: "overly broad exception handler",
            recommendation: "Narrow `except Exception` handlers to the errors you can actually handle.",
            check: Check::Expect { kind: BroadExcept, value: false },
        },
        RuleSpec {
            id: "no-silent-except",
            category: ErrorHandling,
            weight: 0.25,
            description: "Exception handlers do not silently pass",
            violation: "exception swallowed silently",
            recommendation: "Log or re-raise exceptions instead of silently passing.",
            check: Check::Expect { kind: SilentExcept, value: false },
        },
        // Configuration & modularity
        RuleSpec {
            id: "no-hardcoded-config",
            category: Configuration,
            weight: 0.4,
            description: "No hard-coded paths, URLs or credentials",
            violation: "hard-coded configuration value",
            recommendation: "Move hard-coded paths, URLs and credentials into configuration or environment variables.",
            check: Check::Expect { kind: HardcodedConfig, value: false },
        },
        RuleSpec {
            id: "module-max-length",
            category: Configuration,
            weight: 0.3,
            description: "Modules are at most 500 lines",
            violation: "module too long",
            recommendation: "Split oversized modules along their responsibilities.",
            check: Check::AtMost { kind: ModuleLength, limit: 500.0 },
        },
        RuleSpec {
            id: "no-wildcard-import",
            category: Configuration,
            weight: 0.3,
            description: "No wildcard imports",
            violation: "wildcard import",
            recommendation: "Replace `from x import *` with explicit imports.",
            check: Check::Expect { kind: WildcardImport, value: false },
        },
        // Testing
        RuleSpec {
            id: "test-naming",
            category: Testing,
            weight: 0.4,
            description: "Test functions are named test_<behaviour>",
            violation: "test name does not follow test_<behaviour>",
            recommendation: "Name tests `test_<behaviour>` so the runner discovers them and failures read clearly.",
            check: Check::Matches { kind: TestName, pattern: TEST_FUNCTION },
        },
        RuleSpec {
            id: "module-tested",
            category: Testing,
            weight: 0.4,
            description: "Every source module has a test module",
            violation: "module has no tests",
            recommendation: "Add a test module for each untested source module.",
            check: Check::Expect { kind: ModuleTested, value: true },
        },
        RuleSpec {
            id: "test-has-assertions",
            category: Testing,
            weight: 0.2,
            description: "Tests assert something",
            violation: "test has no assertions",
            recommendation: "Give every test at least one assertion.",
            check: Check::AtLeast { kind: TestAssertionCount, limit: 1.0 },
        },
        // Logging
        RuleSpec {
            id: "no-print-logging",
            category: Logging,
            weight: 0.5,
            description: "Diagnostics go through `logging`, not `print`",
            violation: "print used for logging",
            recommendation: "Replace `print` diagnostics with the `logging` module.",
            check: Check::NotLabel { kind: LogCall, label: "print" },
        },
        RuleSpec {
            id: "module-logger",
            category: Logging,
            weight: 0.3,
            description: "Modules use `logging.getLogger(__name__)`",
            violation: "module does not define a module-level logger",
            recommendation: "Create a module-level logger with `logging.getLogger(__name__)`.",
            check: Check::Expect { kind: ModuleLogger, value: true },
        },
        RuleSpec {
            id: "log-level-known",
            category: Logging,
            weight: 0.2,
            description: "Log calls use standard levels",
            violation: "unknown log level",
            recommendation: "Use the standard logging levels (debug, info, warning, error, critical).",
            check: Check::OneOf { kind: LogCall, labels: LOG_LEVELS },
        },
        // Performance
        RuleSpec {
            id: "nested-loop-depth",
            category: Performance,
            weight: 0.5,
            description: "Loops nest at most 2 deep",
            violation: "deeply nested loop",
            recommendation: "Flatten deeply nested loops with early exits, helpers or better data structures.",
            check: Check::AtMost { kind: NestedLoopDepth, limit: 2.0 },
        },
        RuleSpec {
            id: "no-string-concat-in-loop",
            category: Performance,
            weight: 0.5,
            description: "No string concatenation inside loops",
            violation: "string concatenation inside a loop",
            recommendation: "Collect parts in a list and `''.join()` them instead of concatenating in loops.",
            check: Check::Expect { kind: StringConcatInLoop, value: false },
        },
        // Version control
        RuleSpec {
            id: "commit-subject-length",
            category: VersionControl,
            weight: 0.4,
            description: "Commit subjects are at most 72 characters",
            violation: "commit subject too long",
            recommendation: "Keep commit subjects under 72 characters and put details in the body.",
            check: Check::AtMost { kind: CommitSubjectLength, limit: 72.0 },
        },
        RuleSpec {
            id: "no-committed-artifacts",
            category: VersionControl,
            weight: 0.3,
            description: "No build artifacts or caches under version control",
            violation: "generated artifact committed",
            recommendation: "Remove committed caches and build artifacts and ignore them.",
            check: Check::Expect { kind: CommittedArtifact, value: false },
        },
        RuleSpec {
            id: "gitignore-present",
            category: VersionControl,
            weight: 0.3,
            description: "Repository has a .gitignore",
            violation: "missing .gitignore",
            recommendation: "Add a .gitignore covering virtualenvs, caches and build output.",
            check: Check::Expect { kind: GitignorePresent, value: true },
        },
    ]
}

/// Apply per-rule overrides to a catalog
///
/// Disabled rules are dropped and the remaining weights of their category
/// are rescaled to sum to 1.0. A category whose rules are all disabled
/// disappears from the catalog.
pub fn tailor(
    specs: Vec<RuleSpec>,
    overrides: &BTreeMap<String, RuleOverride>,
) -> Result<Vec<RuleSpec>, ConfigError> {
    if let Some(unknown) = overrides
        .keys()
        .find(|id| !specs.iter().any(|s| s.id == id.as_str()))
    {
        return Err(ConfigError::UnknownRule(unknown.clone()));
    }

    let mut tailored = Vec::with_capacity(specs.len());
    let mut rescale = false;
    for mut spec in specs {
        let Some(over) = overrides.get(spec.id) else {
            tailored.push(spec);
            continue;
        };
        if over.enabled == Some(false) {
            debug!("Rule {} disabled by configuration", spec.id);
            rescale = true;
            continue;
        }
        if let Some(limit) = over.limit {
            if !limit.is_finite() {
                return Err(ConfigError::InvalidLimit {
                    rule: spec.id.to_string(),
                    limit,
                });
            }
            spec.check = spec
                .check
                .with_limit(limit)
                .ok_or_else(|| ConfigError::NoLimit(spec.id.to_string()))?;
        }
        tailored.push(spec);
    }

    if rescale {
        for category in Category::ALL {
            let total: f64 = tailored
                .iter()
                .filter(|s| s.category == category)
                .map(|s| s.weight)
                .sum();
            if total <= 0.0 {
                continue;
            }
            for spec in tailored.iter_mut().filter(|s| s.category == category) {
                spec.weight /= total;
            }
        }
    }
    Ok(tailored)
}
