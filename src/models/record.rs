//! Record and target types for topic-updater.
//!
//! K_i: These types represent the data flowing from the CSV to the remote table.

use std::fmt;

/// One input row.
///
/// K_i: Every record has an identifier and a raw list literal. The literal is
/// only validated when the row is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Primary key of the remote row (trimmed)
    pub id: String,

    /// Raw list literal, e.g. `['a', 'b']`
    pub list_literal: String,

    /// 1-based line in the CSV file (header is line 1)
    pub line: u64,
}

impl Record {
    pub fn new(id: impl Into<String>, list_literal: impl Into<String>, line: u64) -> Self {
        Self {
            id: id.into(),
            list_literal: list_literal.into(),
            line,
        }
    }
}

/// Tables that may be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Table {
    #[value(name = "categories")]
    Categories,
    #[value(name = "books_metadata")]
    BooksMetadata,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::BooksMetadata => "books_metadata",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Columns that may be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Column {
    #[value(name = "topics")]
    Topics,
    #[value(name = "ai_topics")]
    AiTopics,
    #[value(name = "ai_categories")]
    AiCategories,
}

impl Column {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Topics => "topics",
            Self::AiTopics => "ai_topics",
            Self::AiCategories => "ai_categories",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where parsed lists are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub table: Table,
    pub column: Column,
}

impl Target {
    pub fn new(table: Table, column: Column) -> Self {
        Self { table, column }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Statistics for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Rows loaded from the CSV
    pub total_rows: usize,

    /// Rows at or before the checkpoint
    pub resumed_past: usize,

    /// Rows confirmed updated remotely
    pub updated: usize,

    /// Rows skipped for a missing id or an invalid list literal
    pub skipped: usize,

    /// Rows whose update failed (API error or transport)
    pub failed: usize,

    /// Rows with a success status but no updated row returned
    pub unexpected: usize,

    /// Identifier the checkpoint points at after the run
    pub last_checkpoint: Option<String>,

    /// Total runtime in seconds
    pub runtime_secs: f64,
}

impl RunStats {
    /// Rows the updater looked at in this run.
    pub fn processed(&self) -> usize {
        self.updated + self.skipped + self.failed + self.unexpected
    }
}
