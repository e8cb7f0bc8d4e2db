use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet};
use tracing::debug;

use crate::error::Result;
use crate::flatten::{MAX_SHEET_COLUMNS, PageSheet, WorkbookData};

const HEADER_FILL: u32 = 0x366092;
const METADATA_FILL: u32 = 0xE7E6E6;
const METADATA_TITLE: &str = "Test Information";
const LABEL_COLUMN_WIDTH: f64 = 15.0;
const VALUE_COLUMN_WIDTH: f64 = 60.0;
const MIN_COLUMN_WIDTH: usize = 10;
const MAX_COLUMN_WIDTH: usize = 50;
/// Longest string Excel stores in a single cell.
const MAX_CELL_CHARS: usize = 32_767;

struct SheetFormats {
    header: Format,
    cell: Format,
    metadata_title: Format,
    metadata_label: Format,
    metadata_value: Format,
}

impl SheetFormats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(HEADER_FILL))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            cell: Format::new().set_align(FormatAlign::Top).set_text_wrap(),
            metadata_title: Format::new()
                .set_bold()
                .set_font_size(12)
                .set_background_color(Color::RGB(METADATA_FILL)),
            metadata_label: Format::new().set_bold().set_font_size(11),
            metadata_value: Format::new().set_font_size(10),
        }
    }
}

/// Writes one worksheet per page report to the given path.
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let formats = SheetFormats::new();
    let mut workbook_writer = Workbook::new();

    for sheet in &workbook.sheets {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&sheet.sheet_name)?;
        write_sheet(worksheet, sheet, &formats)?;
        debug!(sheet = %sheet.sheet_name, rows = sheet.rows.len(), "sheet written");
    }

    workbook_writer.save(path)?;
    Ok(())
}

fn write_sheet(
    worksheet: &mut Worksheet,
    sheet: &PageSheet,
    formats: &SheetFormats,
) -> Result<()> {
    let mut row_idx: u32 = 0;

    if !sheet.metadata.is_empty() {
        worksheet.merge_range(
            row_idx,
            0,
            row_idx,
            1,
            METADATA_TITLE,
            &formats.metadata_title,
        )?;
        row_idx += 1;

        for (label, value) in sheet.metadata.entries() {
            worksheet.write_string_with_format(
                row_idx,
                0,
                &format!("{label}:"),
                &formats.metadata_label,
            )?;
            worksheet.write_string_with_format(
                row_idx,
                1,
                clamp_cell(value),
                &formats.metadata_value,
            )?;
            row_idx += 1;
        }

        // Spacer between the metadata block and the violation table.
        row_idx += 1;
    }

    for (col_idx, header) in column_indices().zip(&sheet.columns) {
        write_cell(worksheet, row_idx, col_idx, header, &formats.header)?;
    }
    row_idx += 1;

    for row in &sheet.rows {
        for (col_idx, cell) in column_indices().zip(row) {
            write_cell(worksheet, row_idx, col_idx, cell, &formats.cell)?;
        }
        row_idx += 1;
    }

    worksheet.set_column_width(0, LABEL_COLUMN_WIDTH)?;
    worksheet.set_column_width(1, VALUE_COLUMN_WIDTH)?;
    for (col_idx, width) in column_indices().zip(column_widths(sheet)) {
        worksheet.set_column_width(col_idx, width as f64)?;
    }

    Ok(())
}

/// Width of each violation column: the longest value from the header down,
/// plus padding, kept between 10 and 50 characters.
pub fn column_widths(sheet: &PageSheet) -> Vec<usize> {
    (0..sheet.columns.len())
        .map(|col_idx| {
            let longest = std::iter::once(&sheet.columns)
                .chain(sheet.rows.iter())
                .filter_map(|row| row.get(col_idx))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0);
            (longest + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
        })
        .collect()
}

// Column numbers Excel can address; zipping against this drops anything wider.
fn column_indices() -> impl Iterator<Item = u16> {
    (0..MAX_SHEET_COLUMNS).filter_map(|col_idx| u16::try_from(col_idx).ok())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &str,
    format: &Format,
) -> Result<()> {
    if value.is_empty() {
        worksheet.write_blank(row, col, format)?;
    } else {
        worksheet.write_string_with_format(row, col, clamp_cell(value), format)?;
    }
    Ok(())
}

fn clamp_cell(value: &str) -> &str {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((byte_idx, _)) => &value[..byte_idx],
        None => value,
    }
}
