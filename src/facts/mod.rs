//! Source fact model
//!
//! A `FactModel` is the immutable, per-run snapshot of everything the
//! external extractor observed about a Python codebase. Rules only ever
//! read from it; re-running an evaluation builds a new model.
//!
//! # Fact kinds
//!
//! Every fact has a kind, a location and a typed value. The kind decides
//! which value type is expected:
//!
//! ```text
//! Bool   import_group_order, bare_except, docstring_present, ...
//! Number function_length, line_length, parameter_count, ...
//! Label  function_name, class_name, log_call, test_name, ...
//! ```
//!
//! A value of the wrong type is kept as-is and reported by the rule that
//! reads it.

mod loader;

pub use loader::{load_fact_model, parse_fact_document, FactDocument, RawFact};

use crate::error::FactError;
use crate::models::{Location, SnapshotSummary};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Value type a fact kind is expected to carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Bool,
    Number,
    Label,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Bool => "boolean",
            ValueType::Number => "numeric",
            ValueType::Label => "label",
        }
    }
}

/// Stable fact kinds produced by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactKind {
    // Layout
    LineLength,
    ImportGroupOrder,
    IndentWidth,
    // Naming
    FunctionName,
    ClassName,
    ConstantName,
    VariableName,
    // Functions
    FunctionLength,
    DocstringPresent,
    ParameterCount,
    TypeHintsPresent,
    // Classes
    ClassMethodCount,
    ClassDocstringPresent,
    InheritanceDepth,
    // Error handling
    BareExcept,
    BroadExcept,
    SilentExcept,
    // Configuration & modularity
    HardcodedConfig,
    ModuleLength,
    WildcardImport,
    // Testing
    TestName,
    ModuleTested,
    TestAssertionCount,
    // Logging
    LogCall,
    ModuleLogger,
    // Performance
    NestedLoopDepth,
    StringConcatInLoop,
    // Version control
    CommitSubjectLength,
    CommittedArtifact,
    GitignorePresent,
}

impl FactKind {
    /// Value type the extractor is expected to emit for this kind
    pub fn value_type(self) -> ValueType {
        use FactKind::*;
        match self {
            ImportGroupOrder | DocstringPresent | TypeHintsPresent | ClassDocstringPresent
            | BareExcept | BroadExcept | SilentExcept | HardcodedConfig | WildcardImport
            | ModuleTested | ModuleLogger | StringConcatInLoop | CommittedArtifact
            | GitignorePresent => ValueType::Bool,
            LineLength | IndentWidth | FunctionLength | ParameterCount | ClassMethodCount
            | InheritanceDepth | ModuleLength | TestAssertionCount | NestedLoopDepth
            | CommitSubjectLength => ValueType::Number,
            FunctionName | ClassName | ConstantName | VariableName | TestName | LogCall => {
                ValueType::Label
            }
        }
    }

    /// Wire name (`function_length`, `bare_except`, ...)
    pub fn as_str(self) -> &'static str {
        use FactKind::*;
        match self {
            LineLength => "line_length",
            ImportGroupOrder => "import_group_order",
            IndentWidth => "indent_width",
            FunctionName => "function_name",
            ClassName => "class_name",
            ConstantName => "constant_name",
            VariableName => "variable_name",
            FunctionLength => "function_length",
            DocstringPresent => "docstring_present",
            ParameterCount => "parameter_count",
            TypeHintsPresent => "type_hints_present",
            ClassMethodCount => "class_method_count",
            ClassDocstringPresent => "class_docstring_present",
            InheritanceDepth => "inheritance_depth",
            BareExcept => "bare_except",
            BroadExcept => "broad_except",
            SilentExcept => "silent_except",
            HardcodedConfig => "hardcoded_config",
            ModuleLength => "module_length",
            WildcardImport => "wildcard_import",
            TestName => "test_name",
            ModuleTested => "module_tested",
            TestAssertionCount => "test_assertion_count",
            LogCall => "log_call",
            ModuleLogger => "module_logger",
            NestedLoopDepth => "nested_loop_depth",
            StringConcatInLoop => "string_concat_in_loop",
            CommitSubjectLength => "commit_subject_length",
            CommittedArtifact => "committed_artifact",
            GitignorePresent => "gitignore_present",
        }
    }
}

impl std::fmt::Display for FactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed value of a fact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Bool(bool),
    Number(f64),
    Label(String),
}

impl FactValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FactValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FactValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            FactValue::Label(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            FactValue::Bool(_) => ValueType::Bool,
            FactValue::Number(_) => ValueType::Number,
            FactValue::Label(_) => ValueType::Label,
        }
    }
}

impl std::fmt::Display for FactValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactValue::Bool(v) => write!(f, "{v}"),
            FactValue::Number(v) => write!(f, "{v}"),
            FactValue::Label(v) => write!(f, "'{v}'"),
        }
    }
}

/// An atomic observation about the codebase
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFact {
    pub kind: FactKind,
    pub location: Location,
    pub value: FactValue,
}

impl SourceFact {
    pub fn new(kind: FactKind, location: Location, value: FactValue) -> Self {
        Self {
            kind,
            location,
            value,
        }
    }
}

/// Aggregate counters computed once at construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactCounters {
    pub files: usize,
    pub functions: usize,
    pub documented_functions: usize,
    pub classes: usize,
    pub tests: usize,
    pub except_handlers: usize,
    pub log_calls: usize,
}

/// Immutable, indexed collection of facts for one codebase snapshot
#[derive(Debug, Clone)]
pub struct FactModel {
    root: PathBuf,
    extracted_at: Option<DateTime<Utc>>,
    facts: Vec<SourceFact>,
    by_kind: FxHashMap<FactKind, Vec<usize>>,
    by_file: BTreeMap<PathBuf, Vec<usize>>,
    counters: FactCounters,
}

impl FactModel {
    /// An empty model for a snapshot root
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        FactModelBuilder::new(root).build_unchecked()
    }

    pub fn builder(root: impl Into<PathBuf>) -> FactModelBuilder {
        FactModelBuilder::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extracted_at(&self) -> Option<DateTime<Utc>> {
        self.extracted_at
    }

    /// All facts in extraction order
    pub fn facts(&self) -> &[SourceFact] {
        &self.facts
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Facts of one kind, in extraction order
    pub fn of_kind(&self, kind: FactKind) -> impl Iterator<Item = &SourceFact> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .map(move |&i| &self.facts[i])
    }

    pub fn count(&self, kind: FactKind) -> usize {
        self.by_kind.get(&kind).map_or(0, Vec::len)
    }

    /// Number of facts per kind, sorted by kind
    pub fn kind_counts(&self) -> BTreeMap<FactKind, usize> {
        self.by_kind.iter().map(|(kind, idx)| (*kind, idx.len())).collect()
    }

    /// Facts recorded for one file, in extraction order
    pub fn in_file(&self, file: &Path) -> impl Iterator<Item = &SourceFact> {
        self.by_file
            .get(file)
            .into_iter()
            .flatten()
            .map(move |&i| &self.facts[i])
    }

    /// Files with at least one fact, sorted
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.by_file.keys().map(PathBuf::as_path)
    }

    pub fn counters(&self) -> FactCounters {
        self.counters
    }
}

impl From<&FactModel> for SnapshotSummary {
    fn from(model: &FactModel) -> Self {
        let counters = model.counters();
        SnapshotSummary {
            root: model.root.clone(),
            extracted_at: model.extracted_at,
            total_facts: model.len(),
            total_files: counters.files,
            total_functions: counters.functions,
            documented_functions: counters.documented_functions,
            total_classes: counters.classes,
            total_tests: counters.tests,
        }
    }
}

/// Builder that validates fact locations and computes indexes
#[derive(Debug, Clone)]
pub struct FactModelBuilder {
    root: PathBuf,
    extracted_at: Option<DateTime<Utc>>,
    facts: Vec<SourceFact>,
}

impl FactModelBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extracted_at: None,
            facts: Vec::new(),
        }
    }

    pub fn extracted_at(mut self, at: DateTime<Utc>) -> Self {
        self.extracted_at = Some(at);
        self
    }

    pub fn fact(mut self, fact: SourceFact) -> Self {
        self.facts.push(fact);
        self
    }

    /// Convenience for a fact spanning `line_start..=line_end` of `file`
    pub fn add(
        self,
        kind: FactKind,
        file: impl Into<PathBuf>,
        lines: Option<(u32, u32)>,
        value: FactValue,
    ) -> Self {
        let (start, end) = match lines {
            Some((s, e)) => (Some(s), Some(e)),
            None => (None, None),
        };
        self.fact(SourceFact::new(kind, Location::new(file, start, end), value))
    }

    pub fn boolean(self, kind: FactKind, file: impl Into<PathBuf>, line: u32, value: bool) -> Self {
        self.add(kind, file, Some((line, line)), FactValue::Bool(value))
    }

    pub fn number(self, kind: FactKind, file: impl Into<PathBuf>, line: u32, value: f64) -> Self {
        self.add(kind, file, Some((line, line)), FactValue::Number(value))
    }

    pub fn label(
        self,
        kind: FactKind,
        file: impl Into<PathBuf>,
        line: u32,
        value: impl Into<String>,
    ) -> Self {
        self.add(kind, file, Some((line, line)), FactValue::Label(value.into()))
    }

    /// Validate every location and build the indexed model
    pub fn build(self) -> Result<FactModel, FactError> {
        for fact in &self.facts {
            validate_location(fact)?;
        }
        Ok(self.build_unchecked())
    }

    fn build_unchecked(self) -> FactModel {
        let mut by_kind: FxHashMap<FactKind, Vec<usize>> = FxHashMap::default();
        let mut by_file: BTreeMap<PathBuf, Vec<usize>> = BTreeMap::new();
        let mut counters = FactCounters::default();

        for (i, fact) in self.facts.iter().enumerate() {
            by_kind.entry(fact.kind).or_default().push(i);
            by_file.entry(fact.location.file.clone()).or_default().push(i);

            match fact.kind {
                FactKind::FunctionLength => counters.functions += 1,
                FactKind::DocstringPresent if fact.value.as_bool() == Some(true) => {
                    counters.documented_functions += 1
                }
                FactKind::ClassName => counters.classes += 1,
                FactKind::TestName => counters.tests += 1,
                FactKind::BareExcept => counters.except_handlers += 1,
                FactKind::LogCall => counters.log_calls += 1,
                _ => {}
            }
        }
        counters.files = by_file.len();

        debug!(
            "Built fact model for {}: {} facts across {} files",
            self.root.display(),
            self.facts.len(),
            counters.files
        );

        FactModel {
            root: self.root,
            extracted_at: self.extracted_at,
            facts: self.facts,
            by_kind,
            by_file,
            counters,
        }
    }
}

fn validate_location(fact: &SourceFact) -> Result<(), FactError> {
    let invalid = |reason: &str| FactError::InvalidLocation {
        kind: fact.kind,
        file: fact.location.file.display().to_string(),
        reason: reason.to_string(),
    };

    let file = &fact.location.file;
    if file.as_os_str().is_empty() {
        return Err(invalid("empty file path"));
    }
    for component in file.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(invalid("file path leaves the snapshot root")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("file path must be relative to the snapshot root"))
            }
        }
    }
    match (fact.location.line_start, fact.location.line_end) {
        (Some(0), _) | (_, Some(0)) => Err(invalid("line numbers are 1-based")),
        (Some(start), Some(end)) if end < start => Err(invalid("line_end precedes line_start")),
        (None, Some(_)) => Err(invalid("line_end without line_start")),
        _ => Ok(()),
    }
}
