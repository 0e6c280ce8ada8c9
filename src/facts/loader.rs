//! Fact document loading
//!
//! The extractor writes one JSON document per snapshot:
//!
//! ```json
//! {
//!   "root": "myproject",
//!   "extracted_at": "2026-10-01T12:00:00Z",
//!   "facts": [
//!     { "kind": "function_length", "file": "app/core.py", "line_start": 10, "line_end": 59, "value": 50 },
//!     { "kind": "bare_except", "file": "app/core.py", "line_start": 31, "value": true }
//!   ]
//! }
//! ```

use super::{FactKind, FactModel, FactValue, SourceFact};
use crate::error::FactError;
use crate::models::Location;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// On-disk representation of a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactDocument {
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub facts: Vec<RawFact>,
}

/// One fact as written by the extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFact {
    pub kind: FactKind,
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_end: Option<u32>,
    pub value: FactValue,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

impl FactDocument {
    /// Validate and index the document
    pub fn into_model(self) -> Result<FactModel, FactError> {
        let mut builder = FactModel::builder(self.root);
        if let Some(at) = self.extracted_at {
            builder = builder.extracted_at(at);
        }
        for raw in self.facts {
            // A single-line fact may omit line_end
            let line_end = raw.line_end.or(raw.line_start);
            builder = builder.fact(SourceFact::new(
                raw.kind,
                Location::new(raw.file, raw.line_start, line_end),
                raw.value,
            ));
        }
        builder.build()
    }
}

/// Parse a fact document from a JSON string
pub fn parse_fact_document(content: &str, source: &Path) -> Result<FactModel, FactError> {
    let document: FactDocument =
        serde_json::from_str(content).map_err(|source_err| FactError::Parse {
            path: source.to_path_buf(),
            source: source_err,
        })?;
    document.into_model()
}

/// Load the fact model for one evaluation run
pub fn load_fact_model(path: &Path) -> Result<FactModel, FactError> {
    let content = std::fs::read_to_string(path).map_err(|source| FactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let model = parse_fact_document(&content, path)?;
    info!(
        "Loaded {} facts for {} from {}",
        model.len(),
        model.root().display(),
        path.display()
    );
    Ok(model)
}
