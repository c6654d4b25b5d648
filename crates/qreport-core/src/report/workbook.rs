//! Multi-sheet summary workbook (`.xlsx`), one sheet per CSV table.

use super::ReportInputs;
use crate::error::{QualityError, Result};
use crate::numeric::parse_number;
use crate::table::{Table, TableKind};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

pub const NO_DATA: &str = "(no data)";
pub const MAX_COLUMN_WIDTH: usize = 60;

/// Cells as they appear on a sheet: header plus rows, or a single placeholder.
pub fn sheet_rows(table: &Table) -> Vec<Vec<String>> {
    if table.is_empty() {
        return vec![vec![NO_DATA.to_string()]];
    }
    std::iter::once(table.headers.clone())
        .chain(table.rows.iter().cloned())
        .collect()
}

/// Longest cell per column plus padding, capped at [`MAX_COLUMN_WIDTH`].
pub fn column_widths(rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = Vec::new();
    for row in rows {
        if widths.len() < row.len() {
            widths.resize(row.len(), 0);
        }
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    widths
        .into_iter()
        .map(|w| (w + 2).min(MAX_COLUMN_WIDTH))
        .collect()
}

/// Render all five sheets and return the file image.
pub fn render(inputs: &ReportInputs) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for kind in TableKind::ALL {
        let table = inputs.table(kind);
        write_sheet(&mut workbook, kind, table, &header).map_err(xlsx_error)?;
    }
    workbook.save_to_buffer().map_err(xlsx_error)
}

fn write_sheet(
    workbook: &mut Workbook,
    kind: TableKind,
    table: &Table,
    header: &Format,
) -> std::result::Result<(), XlsxError> {
    let rows = sheet_rows(table);
    let sheet = workbook.add_worksheet();
    sheet.set_name(kind.sheet_name())?;

    for (r, row) in rows.iter().enumerate() {
        let r = r as u32;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            if r == 0 && !table.is_empty() {
                sheet.write_string_with_format(r, c, cell.as_str(), header)?;
            } else if let Some(n) = parse_number(cell) {
                sheet.write_number(r, c, n)?;
            } else if !cell.is_empty() {
                sheet.write_string(r, c, cell.as_str())?;
            }
        }
    }
    for (c, width) in column_widths(&rows).into_iter().enumerate() {
        sheet.set_column_width(c as u16, width as f64)?;
    }
    tracing::debug!(sheet = kind.sheet_name(), rows = table.len(), "wrote sheet");
    Ok(())
}

fn xlsx_error(e: XlsxError) -> QualityError {
    QualityError::render("workbook", e)
}
