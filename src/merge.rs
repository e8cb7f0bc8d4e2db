use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::flatten::{SkipReason, ViolationTable, WorkbookData, build_page_sheet};
use crate::io::audit_csv::{HeaderMatch, read_audit_file, read_violation_rows};
use crate::io::discover::{file_name, find_report_files};
use crate::io::{csv_write, excel_write};
use crate::naming::SheetNameRegistry;

/// Summary of a workbook that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineReport {
    pub output: PathBuf,
    pub files_found: usize,
    pub sheets_created: usize,
    pub total_rows: usize,
}

/// Result of [`combine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombineOutcome {
    /// The results directory holds no report files.
    NoInput,
    /// Reports were found but none carried violation data; nothing written.
    NoData { files_found: usize },
    Written(CombineReport),
}

/// Summary of a flat violation list that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    pub output: PathBuf,
    pub files_found: usize,
    pub files_used: usize,
    pub violations: usize,
}

/// Result of [`extract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// The results directory holds no report files.
    NoInput,
    /// No violation survived filtering; nothing written.
    NoViolations { files_found: usize },
    Written(ExtractReport),
}

/// Merges every report in `results_dir` into one workbook with a sheet per
/// page, written to `results_dir/output_name`.
#[instrument(level = "info", skip_all, fields(dir = %results_dir.display()))]
pub fn combine(results_dir: &Path, output_name: &str) -> Result<CombineOutcome> {
    let files = find_report_files(results_dir)?;
    if files.is_empty() {
        info!("No CSV files found in {}", results_dir.display());
        return Ok(CombineOutcome::NoInput);
    }
    info!("Found {} CSV file(s) to combine", files.len());

    let mut sheet_names = SheetNameRegistry::default();
    let mut workbook = WorkbookData::default();

    for path in &files {
        let name = file_name(path);
        info!("Processing {name}...");

        let record = read_audit_file(path, HeaderMatch::Exact);
        match build_page_sheet(&name, record, &mut sheet_names) {
            Some(sheet) => {
                info!(
                    "  Created sheet '{}' with {} violation(s)",
                    sheet.sheet_name,
                    sheet.rows.len()
                );
                workbook.sheets.push(sheet);
            }
            None => warn!("  Skipping {name} - no violation data found"),
        }
    }

    if workbook.sheets.is_empty() {
        info!("No sheets created - no violation data found in any CSV files");
        return Ok(CombineOutcome::NoData {
            files_found: files.len(),
        });
    }

    let output = results_dir.join(output_name);
    excel_write::write_workbook(&output, &workbook)?;

    let report = CombineReport {
        output,
        files_found: files.len(),
        sheets_created: workbook.sheets.len(),
        total_rows: workbook.total_rows(),
    };
    info!("Combined results saved to: {}", report.output.display());
    info!("Total sheets: {}", report.sheets_created);
    info!("Total violation rows: {}", report.total_rows);
    Ok(CombineOutcome::Written(report))
}

/// Collects the violations of every report in `results_dir`, minus nested
/// interactive ones, into `results_dir/output_name`.
#[instrument(level = "info", skip_all, fields(dir = %results_dir.display()))]
pub fn extract(results_dir: &Path, output_name: &str) -> Result<ExtractOutcome> {
    let files = find_report_files(results_dir)?;
    if files.is_empty() {
        info!("No CSV files found in {}", results_dir.display());
        return Ok(ExtractOutcome::NoInput);
    }
    info!("Found {} CSV file(s) to process", files.len());

    let mut table = ViolationTable::default();
    let mut files_used = 0;

    for path in &files {
        let name = file_name(path);
        info!("Processing {name}...");

        let rows = read_violation_rows(path);
        match table.add_report(&name, &rows) {
            Ok(_) => files_used += 1,
            Err(SkipReason::NoData) => {
                warn!("  Skipping {name} - no violation data found");
            }
            Err(SkipReason::MissingRuleId(sample)) => {
                warn!(
                    "  Skipping {name} - missing 'Rule ID' column (header columns: {}...)",
                    sample.join(", ")
                );
            }
        }
    }

    if table.is_empty() {
        info!("No violations found to extract");
        return Ok(ExtractOutcome::NoViolations {
            files_found: files.len(),
        });
    }

    let output = results_dir.join(output_name);
    csv_write::write_violations(&output, &table)?;

    let report = ExtractReport {
        output,
        files_found: files.len(),
        files_used,
        violations: table.rows().len(),
    };
    info!(
        "Extracted {} violations (excluding nested interactive)",
        report.violations
    );
    info!("Results saved to: {}", report.output.display());
    Ok(ExtractOutcome::Written(report))
}
