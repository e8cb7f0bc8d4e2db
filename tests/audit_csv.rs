use a11y_merge::io::audit_csv::{
    HeaderMatch, ReportParser, Section, parse_report, read_audit_file, read_violation_rows,
};
use a11y_merge::model::Metadata;
use std::fs;
use tempfile::tempdir;

const FULL_REPORT: &str = "\
# Accessibility report generated by the audit runner
# Do not edit

Test Information
Test URL,https://example.com/about
Timestamp,2024-05-01T10:00:00Z
Test Engine,axe-core 4.9
Test Runner,playwright
Unknown Key,ignored

Environment Information
User Agent,Mozilla/5.0
Window Size,1280x720
Orientation,landscape

Test Results
Rule ID,Description,Impact
color-contrast,Low contrast text,serious
image-alt,\"Missing alt, on hero\",critical
";

fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn sections_populate_metadata_and_header_starts_rows() {
    let record = parse_report(FULL_REPORT.as_bytes(), HeaderMatch::Exact).expect("report parsed");

    assert_eq!(
        record.metadata,
        Metadata {
            url: Some("https://example.com/about".into()),
            timestamp: Some("2024-05-01T10:00:00Z".into()),
            test_engine: Some("axe-core 4.9".into()),
            test_runner: Some("playwright".into()),
            user_agent: Some("Mozilla/5.0".into()),
            window_size: Some("1280x720".into()),
            orientation: Some("landscape".into()),
        }
    );
    assert_eq!(
        record.rows,
        vec![
            cells(&["Rule ID", "Description", "Impact"]),
            cells(&["color-contrast", "Low contrast text", "serious"]),
            cells(&["image-alt", "Missing alt, on hero", "critical"]),
        ]
    );
}

#[test]
fn metadata_keys_only_count_inside_their_section() {
    let source = "\
Environment Information
Test URL,https://example.com/wrong-section
Window Size,800x600
Rule ID,Description
a,b
";
    let record = parse_report(source.as_bytes(), HeaderMatch::Exact).expect("report parsed");

    assert_eq!(record.metadata.url, None);
    assert_eq!(record.metadata.window_size.as_deref(), Some("800x600"));
    assert!(record.metadata.test_engine.is_none());
}

#[test]
fn report_without_header_has_no_rows() {
    let source = "\
Test Information
Test URL,https://example.com
color-contrast,Low contrast
";
    let record = parse_report(source.as_bytes(), HeaderMatch::Exact).expect("report parsed");

    assert!(record.rows.is_empty());
    assert!(!record.has_violations());
    assert_eq!(record.metadata.url.as_deref(), Some("https://example.com"));
}

#[test]
fn exact_match_ignores_header_variants_that_contains_accepts() {
    let source = "\
rule id (axe),Description
region,Content outside landmarks
";
    let exact = parse_report(source.as_bytes(), HeaderMatch::Exact).expect("report parsed");
    let tolerant = parse_report(source.as_bytes(), HeaderMatch::Contains).expect("report parsed");

    assert!(exact.rows.is_empty());
    assert_eq!(tolerant.rows.len(), 2);
    assert_eq!(tolerant.rows[0][0], "rule id (axe)");
}

#[test]
fn rows_after_header_are_kept_verbatim_with_ragged_widths() {
    let source = "\
Rule ID,Description
label,  Form field without label  ,extra,columns
Test Results
short
";
    let record = parse_report(source.as_bytes(), HeaderMatch::Exact).expect("report parsed");

    assert_eq!(
        record.data_rows(),
        &[
            cells(&["label", "  Form field without label  ", "extra", "columns"]),
            cells(&["short"]),
        ]
    );
}

#[test]
fn comment_and_blank_rows_are_skipped_after_header() {
    let source = "\
Rule ID,Description
  # trailing note
 , 
landmark-one-main,Missing main landmark
";
    let record = parse_report(source.as_bytes(), HeaderMatch::Exact).expect("report parsed");

    assert_eq!(record.rows.len(), 2);
    assert_eq!(record.rows[1][0], "landmark-one-main");
}

#[test]
fn parser_tracks_section_and_header_state() {
    let mut parser = ReportParser::new(HeaderMatch::Exact);
    assert_eq!(parser.section(), Section::None);

    parser.push_row(cells(&["Test Information"]));
    assert_eq!(parser.section(), Section::TestInfo);

    parser.push_row(cells(&["Environment Information", ""]));
    assert_eq!(parser.section(), Section::EnvInfo);

    parser.push_row(cells(&["Test Results"]));
    assert_eq!(parser.section(), Section::Results);
    assert!(!parser.header_found());

    parser.push_row(cells(&["Impact", "Rule ID"]));
    assert!(parser.header_found());

    let record = parser.finish();
    assert_eq!(record.rows, vec![cells(&["Impact", "Rule ID"])]);
}

#[test]
fn unreadable_files_degrade_to_empty_results() {
    let temp_dir = tempdir().expect("temporary directory");
    let missing = temp_dir.path().join("missing.csv");

    let record = read_audit_file(&missing, HeaderMatch::Exact);
    assert!(record.rows.is_empty());
    assert!(record.metadata.is_empty());

    let invalid_utf8 = temp_dir.path().join("binary.csv");
    fs::write(&invalid_utf8, b"Rule ID,Description\n\xff\xfe,broken\n").expect("fixture written");
    assert!(read_violation_rows(&invalid_utf8).is_empty());
}

#[test]
fn violation_rows_use_tolerant_header_match() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("report.csv");
    fs::write(&path, "preamble,text\nAxe Rule ID,Description\nregion,Outside landmark\n")
        .expect("fixture written");

    let rows = read_violation_rows(&path);
    assert_eq!(
        rows,
        vec![
            cells(&["Axe Rule ID", "Description"]),
            cells(&["region", "Outside landmark"]),
        ]
    );
}
