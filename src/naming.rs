//! Sheet naming for the merged workbook.
//!
//! Report file names look like `accessibility-results-example-com-about-team.csv`.
//! [`page_label`] recovers a short page label from such a name. It is a
//! best-effort display heuristic, resolved through a fixed fallback ladder:
//!
//! 1. a domain token (`com`, `net`, `org`, `io`, `co`) is followed by path
//!    segments: the segments joined with `-`;
//! 2. that joined path is longer than 28 characters: the last three
//!    segments, or the last 28 characters of a single segment;
//! 3. no usable path: `root` for names with at most two parts, otherwise the
//!    last part cut to 31 characters;
//! 4. an empty name: `page`.
//!
//! Labels are not guaranteed to be unique or Excel-legal; [`SheetNameRegistry`]
//! takes care of both.

use std::collections::HashSet;

/// Prefix stripped from report file names.
pub const REPORT_PREFIX: &str = "accessibility-results-";
/// Maximum length of an Excel sheet name.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const DOMAIN_TOKENS: [&str; 5] = ["com", "net", "org", "io", "co"];
const MAX_PATH_LEN: usize = 28;
/// Excel also refuses titles that start or end with an apostrophe.
const INVALID_SHEET_CHARS: [char; 9] = ['\\', '/', '?', '*', '[', ']', ':', '\'', '"'];
/// Names Excel refuses as worksheet titles.
const RESERVED_SHEET_NAMES: [&str; 1] = ["History"];

/// Derives a short page label from a report file name.
pub fn page_label(file_name: &str) -> String {
    let stem = file_name.strip_prefix(REPORT_PREFIX).unwrap_or(file_name);
    let stem = stem.strip_suffix(".csv").unwrap_or(stem);

    if stem.is_empty() {
        return "page".to_string();
    }

    let parts: Vec<&str> = stem.split('-').collect();

    let domain_end = parts
        .iter()
        .position(|part| DOMAIN_TOKENS.contains(part))
        .map(|idx| idx + 1);

    if let Some(end) = domain_end.filter(|end| *end < parts.len()) {
        let path_parts = &parts[end..];
        let mut path = path_parts.join("-");
        if path.chars().count() > MAX_PATH_LEN {
            path = if path_parts.len() > 1 {
                path_parts[path_parts.len().saturating_sub(3)..].join("-")
            } else {
                last_chars(&path, MAX_PATH_LEN)
            };
        }
        return if path.is_empty() {
            "root".to_string()
        } else {
            path
        };
    }

    if parts.len() <= 2 {
        return "root".to_string();
    }

    parts
        .last()
        .map(|part| part.chars().take(MAX_SHEET_NAME_LEN).collect())
        .unwrap_or_else(|| "page".to_string())
}

fn last_chars(value: &str, count: usize) -> String {
    let skip = value.chars().count().saturating_sub(count);
    value.chars().skip(skip).collect()
}

/// Makes a label usable as a worksheet title: reserved characters become `_`,
/// surrounding whitespace is dropped and the result is cut to 31 characters.
pub fn sanitize_sheet_name(raw: &str) -> String {
    let sanitized: String = raw
        .chars()
        .map(|ch| {
            if INVALID_SHEET_CHARS.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    let trimmed = sanitized.trim();
    if trimmed.is_empty() {
        return "Sheet".to_string();
    }

    trimmed.chars().take(MAX_SHEET_NAME_LEN).collect()
}

/// Hands out unique worksheet titles. Excel compares titles without regard
/// to case, so the registry does too.
#[derive(Debug)]
pub struct SheetNameRegistry {
    used: HashSet<String>,
}

impl Default for SheetNameRegistry {
    fn default() -> Self {
        let mut registry = Self {
            used: HashSet::new(),
        };
        for name in RESERVED_SHEET_NAMES {
            registry.claim(name);
        }
        registry
    }
}

impl SheetNameRegistry {
    pub fn claim(&mut self, name: &str) {
        self.used.insert(name.to_lowercase());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(&name.to_lowercase())
    }

    /// Sanitizes `raw` and returns it, or the first free `<prefix>_N` variant.
    pub fn assign(&mut self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        if !self.contains(&base) {
            self.claim(&base);
            return base;
        }

        let mut counter = 1;
        loop {
            let suffix = format!("_{counter}");
            let max_len = MAX_SHEET_NAME_LEN - suffix.len();
            let prefix: String = base.chars().take(max_len).collect();
            let candidate = sanitize_sheet_name(&format!("{prefix}{suffix}"));
            if !self.contains(&candidate) {
                self.claim(&candidate);
                return candidate;
            }
            counter += 1;
        }
    }
}
