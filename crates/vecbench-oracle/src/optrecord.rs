// SPDX-License-Identifier: MIT OR Apache-2.0
//! Optimization-record evidence backend.
//!
//! Auto-vectorizing compilers can emit a YAML log of optimization remarks,
//! one tagged document per remark site:
//!
//! ```yaml
//! --- !Passed
//! Pass: loop-vectorize
//! Name: Vectorized
//! Function: s000
//! ...
//! ```
//!
//! The document tag carries the remark kind. The four kinds the compiler is
//! known to emit form the default allow-list; exotic tags are still accepted
//! as generic key-value mappings, they are just not classified. Only YAML
//! that fails to parse, or a document that is not a mapping, is fatal: the
//! run cannot produce a trustworthy verdict from a log it cannot read in
//! full.

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use vecbench_core::{Result, VecbenchError, VerdictMap};

use crate::EvidenceSource;

/// Remark tags the compiler is known to emit.
pub const RECOGNIZED_REMARK_TAGS: [&str; 4] = ["Passed", "Missed", "Analysis", "AnalysisFPCommute"];

/// Pass identifiers that constitute vectorization: loop-level and
/// statement-level.
pub const VECTORIZATION_PASSES: [&str; 2] = ["loop-vectorize", "slp-vectorize"];

/// Remark name reported when a vectorization site succeeded.
const VECTORIZED_REMARK_NAME: &str = "Vectorized";

/// One remark document from the optimization record.
#[derive(Debug, Clone)]
pub struct OptRemark {
    kind: Option<String>,
    recognized: bool,
    fields: Mapping,
}

impl OptRemark {
    /// Remark kind taken from the document tag, without the leading `!`.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Whether the remark kind is on the parser's allow-list.
    #[must_use]
    pub const fn is_recognized_kind(&self) -> bool {
        self.recognized
    }

    /// The function this remark is about, if any.
    #[must_use]
    pub fn function(&self) -> Option<&str> {
        self.field_str("Function")
    }

    /// The optimization pass that produced this remark, if any.
    #[must_use]
    pub fn pass_name(&self) -> Option<&str> {
        self.field_str("Pass")
    }

    /// The remark's own name (e.g. `Vectorized`), if any.
    #[must_use]
    pub fn remark_name(&self) -> Option<&str> {
        self.field_str("Name")
    }

    fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Parser for multi-document optimization-record logs.
///
/// The set of recognized remark tags is explicit parser input rather than
/// global registration state, so two parsers with different allow-lists can
/// coexist.
#[derive(Debug, Clone)]
pub struct OptRecordParser {
    recognized_tags: Vec<String>,
}

impl Default for OptRecordParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OptRecordParser {
    /// Creates a parser with the default remark-tag allow-list.
    #[must_use]
    pub fn new() -> Self {
        Self::with_recognized_tags(RECOGNIZED_REMARK_TAGS)
    }

    /// Creates a parser recognizing exactly the given remark tags.
    pub fn with_recognized_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            recognized_tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a whole optimization record into its remark sequence, in file
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`VecbenchError::MalformedRecord`] on YAML that fails to
    /// parse or a document that is not a (possibly tagged) mapping.
    pub fn parse(&self, text: &str) -> Result<Vec<OptRemark>> {
        let mut remarks = Vec::new();
        for document in serde_yaml::Deserializer::from_str(text) {
            let value = Value::deserialize(document)
                .map_err(|e| VecbenchError::MalformedRecord(e.to_string()))?;
            remarks.push(self.remark_from_value(value)?);
        }
        Ok(remarks)
    }

    /// Reads and parses an optimization record file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or a parse error as
    /// per [`OptRecordParser::parse`].
    pub fn parse_file(&self, path: &Path) -> Result<Vec<OptRemark>> {
        let text = std::fs::read_to_string(path)?;
        self.parse(&text)
    }

    fn remark_from_value(&self, value: Value) -> Result<OptRemark> {
        match value {
            Value::Mapping(fields) => Ok(OptRemark {
                kind: None,
                recognized: false,
                fields,
            }),
            Value::Tagged(tagged) => {
                let kind = tagged.tag.to_string().trim_start_matches('!').to_owned();
                let Value::Mapping(fields) = tagged.value else {
                    return Err(VecbenchError::MalformedRecord(format!(
                        "tagged document !{kind} is not a mapping"
                    )));
                };
                let recognized = self.recognized_tags.iter().any(|t| t == &kind);
                if !recognized {
                    debug!(tag = %kind, "unlisted remark tag kept as generic mapping");
                }
                Ok(OptRemark {
                    kind: Some(kind),
                    recognized,
                    fields,
                })
            }
            other => Err(VecbenchError::MalformedRecord(format!(
                "expected a mapping document, found {}",
                value_kind(&other)
            ))),
        }
    }
}

/// Derives the verdict map from a remark sequence.
///
/// For every remark that names a function and came from a vectorization
/// pass, the function's verdict is OR-ed with "this remark reports a
/// vectorized site". Remarks without a function, or from other passes, are
/// ignored.
#[must_use]
pub fn verdicts_from_remarks(remarks: &[OptRemark]) -> VerdictMap {
    let mut verdicts = VerdictMap::new();
    for remark in remarks {
        let Some(function) = remark.function() else {
            continue;
        };
        let from_vectorizer = remark
            .pass_name()
            .is_some_and(|pass| VECTORIZATION_PASSES.contains(&pass));
        if !from_vectorizer {
            continue;
        }
        verdicts.record(function, remark.remark_name() == Some(VECTORIZED_REMARK_NAME));
    }
    verdicts
}

/// Evidence source backed by an optimization-record log file.
#[derive(Debug, Clone)]
pub struct OptRecordSource {
    path: PathBuf,
    parser: OptRecordParser,
}

impl OptRecordSource {
    /// Creates a source reading the record at `path` with the default
    /// parser.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            parser: OptRecordParser::new(),
        }
    }

    /// Creates a source with a caller-configured parser.
    pub fn with_parser(path: impl Into<PathBuf>, parser: OptRecordParser) -> Self {
        Self {
            path: path.into(),
            parser,
        }
    }
}

impl EvidenceSource for OptRecordSource {
    fn verdicts(&self) -> Result<VerdictMap> {
        let remarks = self.parser.parse_file(&self.path)?;
        let verdicts = verdicts_from_remarks(&remarks);
        info!(
            record = %self.path.display(),
            functions = verdicts.len(),
            vectorized = verdicts.vectorized_count(),
            "derived verdicts from optimization record"
        );
        Ok(verdicts)
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<OptRemark> {
        OptRecordParser::new().parse(text).unwrap()
    }

    #[test]
    fn test_passed_site_marks_function_vectorized() {
        let remarks = parse(
            "--- !Passed\nPass: loop-vectorize\nName: Vectorized\nFunction: foo\n",
        );
        let verdicts = verdicts_from_remarks(&remarks);
        assert!(verdicts.is_vectorized("foo"));
    }

    #[test]
    fn test_missed_site_after_success_does_not_unset() {
        let remarks = parse(
            "--- !Passed\nPass: loop-vectorize\nName: Vectorized\nFunction: foo\n\
             --- !Missed\nPass: loop-vectorize\nName: MissedDetails\nFunction: foo\n",
        );
        let verdicts = verdicts_from_remarks(&remarks);
        assert!(verdicts.is_vectorized("foo"));
    }

    #[test]
    fn test_only_missed_sites_stay_false() {
        let remarks = parse(
            "--- !Missed\nPass: loop-vectorize\nName: MissedDetails\nFunction: bar\n",
        );
        let verdicts = verdicts_from_remarks(&remarks);
        assert!(!verdicts.is_vectorized("bar"));
        assert_eq!(verdicts.len(), 1);
    }

    #[test]
    fn test_remark_without_function_is_ignored() {
        let remarks = parse("--- !Analysis\nPass: loop-vectorize\nName: Vectorized\n");
        assert!(verdicts_from_remarks(&remarks).is_empty());
    }

    #[test]
    fn test_non_vectorization_pass_is_ignored() {
        let remarks = parse(
            "--- !Passed\nPass: licm\nName: Vectorized\nFunction: baz\n",
        );
        assert!(verdicts_from_remarks(&remarks).is_empty());
    }

    #[test]
    fn test_slp_pass_counts_as_vectorization() {
        let remarks = parse(
            "--- !Passed\nPass: slp-vectorize\nName: Vectorized\nFunction: s42\n",
        );
        assert!(verdicts_from_remarks(&remarks).is_vectorized("s42"));
    }

    #[test]
    fn test_exotic_tag_is_kept_as_generic_mapping() {
        let remarks = parse(
            "--- !FutureRemarkKind\nPass: loop-vectorize\nName: Vectorized\nFunction: qux\n",
        );
        assert_eq!(remarks.len(), 1);
        assert_eq!(remarks[0].kind(), Some("FutureRemarkKind"));
        assert!(!remarks[0].is_recognized_kind());
        assert!(verdicts_from_remarks(&remarks).is_vectorized("qux"));
    }

    #[test]
    fn test_untagged_mapping_is_accepted() {
        let remarks = parse("Pass: loop-vectorize\nName: Vectorized\nFunction: plain\n");
        assert_eq!(remarks[0].kind(), None);
        assert!(verdicts_from_remarks(&remarks).is_vectorized("plain"));
    }

    #[test]
    fn test_recognized_kinds_are_classified() {
        let remarks = parse("--- !Missed\nPass: loop-vectorize\nFunction: foo\n");
        assert_eq!(remarks[0].kind(), Some("Missed"));
        assert!(remarks[0].is_recognized_kind());
    }

    #[test]
    fn test_unparsable_yaml_is_fatal() {
        let err = OptRecordParser::new().parse("{unclosed").unwrap_err();
        assert!(matches!(err, VecbenchError::MalformedRecord(_)));
    }

    #[test]
    fn test_non_mapping_document_is_fatal() {
        let err = OptRecordParser::new().parse("- just\n- a\n- list\n").unwrap_err();
        assert!(matches!(err, VecbenchError::MalformedRecord(_)));
    }
}
