//! Spreadsheet codec: xlsx bytes in, xlsx bytes out
//!
//! Reading uses `calamine` (first sheet only, first non-empty row as header),
//! writing uses `rust_xlsxwriter` (single `Annotations` sheet).

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_xlsxwriter::Workbook;
use tracing::{debug, warn};

use crate::export::OutputRow;
use crate::model::{
    Bucket, IdCell, Row, BOT_MESSAGE_COLUMN, FEEDBACK_COLUMN, ID_COLUMN,
    USER_MESSAGE_COLUMN,
};
use crate::{Error, Result};

/// Required suffix of accepted input files
pub const WORKBOOK_EXTENSION: &str = ".xlsx";

/// Name of the single sheet in the exported workbook
pub const EXPORT_SHEET_NAME: &str = "Annotations";

/// Reject file names that are not `.xlsx`
///
/// The check is on the name only (case-sensitive), before any bytes are read.
pub fn validate_file_name(file_name: &str) -> Result<()> {
    if file_name.ends_with(WORKBOOK_EXTENSION) {
        Ok(())
    } else {
        Err(Error::InvalidFileType(file_name.to_string()))
    }
}

/// Parse the first sheet of an xlsx workbook into rows
///
/// Blank rows are skipped, as are rows with no `Id` cell. Unknown columns are
/// ignored. An empty result is returned as-is; the ingestor decides whether
/// that is an error.
pub fn read_rows(bytes: &[u8]) -> Result<Vec<Row>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::FileRead("Workbook has no sheets".to_string()))??;

    let mut sheet_rows = range.rows();
    let header = match sheet_rows.next() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };

    let columns: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .filter_map(|(i, cell)| cell_text(cell).map(|name| (name, i)))
        .collect();

    let column = |name: &str| columns.get(name).copied();
    let id_col = match column(ID_COLUMN) {
        Some(col) => col,
        None => {
            warn!("Workbook header has no {} column", ID_COLUMN);
            return Ok(Vec::new());
        }
    };
    let user_col = column(USER_MESSAGE_COLUMN);
    let bot_col = column(BOT_MESSAGE_COLUMN);
    let feedback_col = column(FEEDBACK_COLUMN);

    let field = |cells: &[Data], col: Option<usize>| -> Option<String> {
        col.and_then(|c| cells.get(c)).and_then(cell_text)
    };

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (offset, cells) in sheet_rows.enumerate() {
        if cells.iter().all(|cell| cell_text(cell).is_none()) {
            continue;
        }

        let id_cell = match cells.get(id_col) {
            Some(Data::Float(n)) => Some(IdCell::Number(*n)),
            Some(Data::Int(n)) => Some(IdCell::Number(*n as f64)),
            Some(cell) => cell_text(cell).map(IdCell::Text),
            None => None,
        };
        let id_cell = match id_cell {
            Some(id_cell) => id_cell,
            None => {
                // +2: 1-based, and the header occupies the first row
                warn!(row = offset + 2, "Skipping row without {}", ID_COLUMN);
                skipped += 1;
                continue;
            }
        };

        rows.push(Row {
            user_message: field(cells, user_col),
            bot_message: field(cells, bot_col),
            customer_feedback: field(cells, feedback_col),
            ..Row::from_id_cell(id_cell)
        });
    }

    debug!(rows = rows.len(), skipped, "Parsed workbook rows");
    Ok(rows)
}

/// Text of a cell, `None` for empty cells and empty strings
fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty => return None,
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // f64 Display already renders whole numbers without a fraction
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Header row of the exported sheet
pub fn export_headers() -> Vec<&'static str> {
    let mut headers = vec![
        ID_COLUMN,
        USER_MESSAGE_COLUMN,
        BOT_MESSAGE_COLUMN,
        FEEDBACK_COLUMN,
    ];
    headers.extend(Bucket::ALL.iter().map(|bucket| bucket.label()));
    headers
}

/// Serialize output rows into an xlsx workbook
pub fn write_rows(rows: &[OutputRow]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(EXPORT_SHEET_NAME)?;

    for (col, header) in export_headers().into_iter().enumerate() {
        sheet.write_string(0, col as u16, header)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;

        match &row.id_cell {
            IdCell::Number(n) => sheet.write_number(r, 0, *n)?,
            IdCell::Text(text) => sheet.write_string(r, 0, text)?,
        };

        let text_cells = [
            row.user_message.as_str(),
            row.bot_message.as_str(),
            row.customer_feedback.as_str(),
        ]
        .into_iter()
        .chain(row.buckets.iter().map(String::as_str));

        for (offset, text) in text_cells.enumerate() {
            if !text.is_empty() {
                sheet.write_string(r, (offset + 1) as u16, text)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// File name for an export generated at `now`
///
/// `annotated_conversations_<timestamp>.xlsx`, where the timestamp is
/// ISO-8601 UTC with millisecond precision and every `:` and `.` replaced by
/// `-`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    let timestamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("annotated_conversations_{}{}", timestamp, WORKBOOK_EXTENSION)
}
