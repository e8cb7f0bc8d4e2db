/// Descriptive fields recovered from the "Test Information" and
/// "Environment Information" sections of an audit report. Every field is
/// optional and stays `None` when the report does not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub url: Option<String>,
    pub timestamp: Option<String>,
    pub test_engine: Option<String>,
    pub test_runner: Option<String>,
    pub user_agent: Option<String>,
    pub window_size: Option<String>,
    pub orientation: Option<String>,
}

impl Metadata {
    /// Returns `true` when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// Iterates over the non-empty fields as `(label, value)` pairs in the order
    /// they are rendered above a violation table.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Test URL", &self.url),
            ("Timestamp", &self.timestamp),
            ("Test Engine", &self.test_engine),
            ("Test Runner", &self.test_runner),
            ("User Agent", &self.user_agent),
            ("Window Size", &self.window_size),
            ("Orientation", &self.orientation),
        ]
        .into_iter()
        .filter_map(|(label, value)| match value.as_deref() {
            Some(value) if !value.is_empty() => Some((label, value)),
            _ => None,
        })
    }
}

/// Parse result for a single audit report.
///
/// `rows` is either empty or starts with the header row naming the violation
/// columns (the row that carried "Rule ID"); every following entry is a data
/// row kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditRecord {
    pub metadata: Metadata,
    pub rows: Vec<Vec<String>>,
}

impl AuditRecord {
    /// Header row of the violation table, if one was found.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Data rows following the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// A record is usable when it has a header and at least one data row.
    pub fn has_violations(&self) -> bool {
        self.rows.len() >= 2
    }
}
