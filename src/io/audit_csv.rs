use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{AuditRecord, Metadata};

/// Column name that identifies the header row of the violation table.
pub const RULE_ID_HEADER: &str = "Rule ID";

const COMMENT_MARKER: char = '#';

/// How a row is recognised as the violation table header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMatch {
    /// A cell equals `Rule ID` exactly.
    Exact,
    /// A cell contains `rule id`, ignoring case.
    Contains,
}

impl HeaderMatch {
    fn is_header(self, row: &[String]) -> bool {
        match self {
            HeaderMatch::Exact => row.iter().any(|cell| cell == RULE_ID_HEADER),
            HeaderMatch::Contains => {
                let needle = RULE_ID_HEADER.to_lowercase();
                row.iter().any(|cell| cell.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Named section of an audit report that governs how key/value rows are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    None,
    TestInfo,
    EnvInfo,
    Results,
}

impl Section {
    /// Maps a section marker cell to the section it opens.
    pub fn from_marker(cell: &str) -> Option<Self> {
        match cell {
            "Test Information" => Some(Section::TestInfo),
            "Environment Information" => Some(Section::EnvInfo),
            "Test Results" => Some(Section::Results),
            _ => None,
        }
    }
}

/// Incremental parser state. Rows are fed one at a time through
/// [`ReportParser::push_row`]; the parser never fails, unknown content is
/// simply ignored.
#[derive(Debug)]
pub struct ReportParser {
    strategy: HeaderMatch,
    section: Section,
    header_found: bool,
    record: AuditRecord,
}

impl ReportParser {
    pub fn new(strategy: HeaderMatch) -> Self {
        Self {
            strategy,
            section: Section::None,
            header_found: false,
            record: AuditRecord::default(),
        }
    }

    /// Section the parser is currently in.
    pub fn section(&self) -> Section {
        self.section
    }

    /// Whether the violation header has been seen.
    pub fn header_found(&self) -> bool {
        self.header_found
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            return;
        }

        let first_cell = row[0].trim();
        if first_cell.starts_with(COMMENT_MARKER) {
            return;
        }

        if let Some(section) = Section::from_marker(first_cell) {
            self.section = section;
            return;
        }

        if row.len() >= 2 {
            self.capture_metadata(first_cell, row[1].trim());
        }

        if self.header_found {
            self.record.rows.push(row);
        } else if self.strategy.is_header(&row) {
            self.header_found = true;
            self.record.rows.push(row);
        }
    }

    fn capture_metadata(&mut self, key: &str, value: &str) {
        let metadata = &mut self.record.metadata;
        let slot = match (self.section, key) {
            (Section::TestInfo, "Test URL") => &mut metadata.url,
            (Section::TestInfo, "Timestamp") => &mut metadata.timestamp,
            (Section::TestInfo, "Test Engine") => &mut metadata.test_engine,
            (Section::TestInfo, "Test Runner") => &mut metadata.test_runner,
            (Section::EnvInfo, "User Agent") => &mut metadata.user_agent,
            (Section::EnvInfo, "Window Size") => &mut metadata.window_size,
            (Section::EnvInfo, "Orientation") => &mut metadata.orientation,
            _ => return,
        };
        *slot = Some(value.to_string());
    }

    pub fn finish(self) -> AuditRecord {
        self.record
    }
}

/// Reads an audit report, recovering its metadata block and violation table.
///
/// Unreadable or malformed files are logged and yield an empty record so a
/// single bad report never aborts a run.
pub fn read_audit_file(path: &Path, strategy: HeaderMatch) -> AuditRecord {
    match try_read_audit_file(path, strategy) {
        Ok(record) => {
            debug!(
                path = %path.display(),
                rows = record.rows.len(),
                "parsed audit report"
            );
            record
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "error reading file");
            AuditRecord::default()
        }
    }
}

/// Reads an audit report and returns only its violation rows (header first),
/// locating the header with the tolerant [`HeaderMatch::Contains`] strategy.
pub fn read_violation_rows(path: &Path) -> Vec<Vec<String>> {
    read_audit_file(path, HeaderMatch::Contains).rows
}

/// Fallible variant of [`read_audit_file`].
pub fn try_read_audit_file(path: &Path, strategy: HeaderMatch) -> Result<AuditRecord> {
    let file = File::open(path)?;
    parse_report(file, strategy)
}

/// Parses an audit report from any reader.
pub fn parse_report<R: std::io::Read>(source: R, strategy: HeaderMatch) -> Result<AuditRecord> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut parser = ReportParser::new(strategy);
    let mut record = StringRecord::new();
    while reader.read_record(&mut record)? {
        parser.push_row(record.iter().map(str::to_string).collect());
    }

    Ok(parser.finish())
}
