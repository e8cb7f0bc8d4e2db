use tracing::warn;

use crate::io::audit_csv::RULE_ID_HEADER;
use crate::model::{AuditRecord, Metadata};
use crate::naming::{SheetNameRegistry, page_label};

/// Widest worksheet Excel accepts.
pub const MAX_SHEET_COLUMNS: usize = 16_384;

/// Leading column of the flat violation list.
pub const SOURCE_FILE_HEADER: &str = "Source File";

/// One page report laid out as a worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSheet {
    pub sheet_name: String,
    pub metadata: Metadata,
    /// Header row, clipped to [`MAX_SHEET_COLUMNS`].
    pub columns: Vec<String>,
    /// Data rows, clipped to the header width. Short rows are kept as-is.
    pub rows: Vec<Vec<String>>,
}

/// All sheets of the merged workbook, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkbookData {
    pub sheets: Vec<PageSheet>,
}

impl WorkbookData {
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.rows.len()).sum()
    }
}

/// Builds the sheet for one report, assigning it a unique title derived from
/// the report file name. Returns `None` when the record holds no violations.
pub fn build_page_sheet(
    file_name: &str,
    record: AuditRecord,
    sheet_names: &mut SheetNameRegistry,
) -> Option<PageSheet> {
    if !record.has_violations() {
        return None;
    }

    let mut rows = record.rows.into_iter();
    let mut columns = rows.next()?;
    if columns.len() > MAX_SHEET_COLUMNS {
        warn!(
            file = file_name,
            columns = columns.len(),
            "dropping columns beyond the worksheet limit"
        );
        columns.truncate(MAX_SHEET_COLUMNS);
    }
    let width = columns.len();
    let rows = rows
        .map(|mut row| {
            row.truncate(width);
            row
        })
        .collect();

    Some(PageSheet {
        sheet_name: sheet_names.assign(&page_label(file_name)),
        metadata: record.metadata,
        columns,
        rows,
    })
}

/// Locates the Rule ID column: an exact `Rule ID` cell first, otherwise the
/// first cell mentioning both "rule" and "id" in any case.
pub fn rule_id_column(header: &[String]) -> Option<usize> {
    header
        .iter()
        .position(|cell| cell == RULE_ID_HEADER)
        .or_else(|| {
            header.iter().position(|cell| {
                let cell = cell.to_lowercase();
                cell.contains("rule") && cell.contains("id")
            })
        })
}

/// Nested interactive violations are left out of the flat list.
pub fn is_nested_interactive(rule_id: &str) -> bool {
    let rule_id = rule_id.trim().to_lowercase();
    rule_id.contains("nested") && rule_id.contains("interactive")
}

/// Flat list of violations across reports, tagged with their source file.
///
/// The header is fixed by the first report added; later reports are appended
/// under it even when their own columns differ.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViolationTable {
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

/// Why a report contributed nothing to a [`ViolationTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Fewer than a header and one data row.
    NoData,
    /// No Rule ID column; carries the first few header cells.
    MissingRuleId(Vec<String>),
}

impl ViolationTable {
    /// Appends the qualifying rows of one report. Returns the number of rows
    /// added, or why the report was skipped.
    pub fn add_report(
        &mut self,
        file_name: &str,
        rows: &[Vec<String>],
    ) -> Result<usize, SkipReason> {
        let (header, data) = match rows.split_first() {
            Some((header, data)) if !data.is_empty() => (header, data),
            _ => return Err(SkipReason::NoData),
        };

        let rule_idx = rule_id_column(header)
            .ok_or_else(|| SkipReason::MissingRuleId(header.iter().take(5).cloned().collect()))?;

        if self.header.is_none() {
            let mut tagged = Vec::with_capacity(header.len() + 1);
            tagged.push(SOURCE_FILE_HEADER.to_string());
            tagged.extend(header.iter().cloned());
            self.header = Some(tagged);
        }

        let before = self.rows.len();
        for row in data {
            let Some(rule_id) = row.get(rule_idx) else {
                continue;
            };
            if is_nested_interactive(rule_id) {
                continue;
            }
            let mut tagged = Vec::with_capacity(row.len() + 1);
            tagged.push(file_name.to_string());
            tagged.extend(row.iter().cloned());
            self.rows.push(tagged);
        }
        Ok(self.rows.len() - before)
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
