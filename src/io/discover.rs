use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern, glob_with};
use tracing::debug;

use crate::error::Result;

/// File name of the merged workbook written by `combine`.
pub const COMBINED_WORKBOOK_NAME: &str = "combined_accessibility_results.xlsx";
/// File name of the flat violation list written by `extract`.
pub const FLAT_VIOLATIONS_NAME: &str = "all_violations_except_nested_interactive.csv";

/// Generated outputs that are never treated as audit input.
pub const EXCLUDED_FILES: [&str; 2] = [FLAT_VIOLATIONS_NAME, COMBINED_WORKBOOK_NAME];

/// Lists the audit reports (`*.csv`) directly inside `results_dir`, sorted by
/// path. Hidden files and previously generated outputs are skipped.
pub fn find_report_files(results_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.csv",
        Pattern::escape(&results_dir.to_string_lossy())
    );

    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut files: Vec<PathBuf> = glob_with(&pattern, options)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .filter(|path| !is_excluded(path))
        .collect();
    files.sort();

    debug!(
        dir = %results_dir.display(),
        count = files.len(),
        "discovered report files"
    );
    Ok(files)
}

/// Whether the path names one of the generated output files.
pub fn is_excluded(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| EXCLUDED_FILES.contains(&name))
}

/// Display name for a report: its file name, or the full path when it has none.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
