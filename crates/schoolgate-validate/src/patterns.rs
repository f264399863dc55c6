//! Injection pattern matching.
//!
//! A coarse, best-effort gate that flags text shaped like SQL injection or
//! XSS payloads. False positives are expected. It does not replace
//! parameterized queries at the data-access layer.

use crate::sanitize::collapse_whitespace;
use regex::{RegexSet, RegexSetBuilder};
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

/// The detectors, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Quote, `--` or `#`, literal or URL-encoded.
    SqlMetaCharacters,
    /// `=` followed later by a quote, comment or statement terminator.
    Tautology,
    /// Quote followed by `or`.
    QuoteOr,
    /// Quote followed by `union`.
    QuoteUnion,
    /// `exec sp_...` / `exec xp_...`.
    StoredProcedure,
    /// `union [all] select`.
    UnionSelect,
    /// `insert into`.
    InsertInto,
    /// `delete from`.
    DeleteFrom,
    /// `update <ident> set`.
    UpdateSet,
    /// `drop table|database`.
    Drop,
    /// `create table|database`.
    Create,
    /// `alter table`.
    AlterTable,
    /// `truncate table`.
    TruncateTable,
    /// Script tokens and inline event handlers.
    Xss,
}

impl PatternKind {
    /// Stable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::SqlMetaCharacters => "sql_meta_characters",
            PatternKind::Tautology => "tautology",
            PatternKind::QuoteOr => "quote_or",
            PatternKind::QuoteUnion => "quote_union",
            PatternKind::StoredProcedure => "stored_procedure",
            PatternKind::UnionSelect => "union_select",
            PatternKind::InsertInto => "insert_into",
            PatternKind::DeleteFrom => "delete_from",
            PatternKind::UpdateSet => "update_set",
            PatternKind::Drop => "drop",
            PatternKind::Create => "create",
            PatternKind::AlterTable => "alter_table",
            PatternKind::TruncateTable => "truncate_table",
            PatternKind::Xss => "xss",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const PATTERNS: &[(PatternKind, &str)] = &[
    (PatternKind::SqlMetaCharacters, r"(%27)|(')|(--)|(%23)|(#)"),
    (
        PatternKind::Tautology,
        r"((%3d)|(=))[^\n]*((%27)|(')|(--)|(%3b)|(;))",
    ),
    (
        PatternKind::QuoteOr,
        r"\w*((%27)|('))((%6f)|o|(%4f))((%72)|r|(%52))",
    ),
    (PatternKind::QuoteUnion, r"((%27)|('))union"),
    (PatternKind::StoredProcedure, r"exec(\s|\+)+(s|x)p\w+"),
    (PatternKind::UnionSelect, r"union(?:\s+all)?\s+select"),
    (PatternKind::InsertInto, r"insert\s+into"),
    (PatternKind::DeleteFrom, r"delete\s+from"),
    (PatternKind::UpdateSet, r"update\s+\w+\s+set"),
    (PatternKind::Drop, r"drop\s+(table|database)"),
    (PatternKind::Create, r"create\s+(table|database)"),
    (PatternKind::AlterTable, r"alter\s+table"),
    (PatternKind::TruncateTable, r"truncate\s+table"),
    (
        PatternKind::Xss,
        r"(script|javascript|vbscript|onload|onerror|onclick)",
    ),
];

static PATTERN_SET: OnceLock<RegexSet> = OnceLock::new();

fn pattern_set() -> &'static RegexSet {
    PATTERN_SET.get_or_init(|| {
        RegexSetBuilder::new(PATTERNS.iter().map(|(_, p)| *p))
            .case_insensitive(true)
            .build()
            .unwrap()
    })
}

fn normalize(text: &str) -> String {
    collapse_whitespace(&text.to_lowercase())
}

/// Returns true if any injection detector matches `text`.
///
/// The text is lower-cased and its whitespace runs collapsed before matching.
pub fn detect_suspicious(text: &str) -> bool {
    let hit = pattern_set().is_match(&normalize(text));
    if hit {
        tracing::debug!(len = text.chars().count(), "suspicious input pattern matched");
    }
    hit
}

/// Every detector that matches `text`, in evaluation order.
pub fn matching_patterns(text: &str) -> Vec<PatternKind> {
    pattern_set()
        .matches(&normalize(text))
        .into_iter()
        .map(|idx| PATTERNS[idx].0)
        .collect()
}
