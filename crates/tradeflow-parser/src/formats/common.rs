use std::collections::HashMap;

use crate::errors::ParserError;
use crate::model::{CellValue, RawTable};

/// Trims header cells, names blank ones by position and suffixes repeats with `.1`, `.2`, ...
/// the way spreadsheet exports disambiguate duplicate headers.
pub fn normalize_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut headers = Vec::new();

    for (idx, cell) in raw.into_iter().enumerate() {
        let trimmed = cell.as_ref().trim_start_matches('\u{feff}').trim();
        let base = if trimmed.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            trimmed.to_string()
        };

        let mut candidate = base.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{}.{}", base, count);
        }
        seen.insert(candidate.clone(), 0);
        headers.push(candidate);
    }

    headers
}

/// Empty cells are missing. Whitespace-only text is kept as it was read.
pub fn text_cell(value: &str) -> Option<CellValue> {
    if value.is_empty() {
        None
    } else {
        Some(CellValue::Text(value.to_string()))
    }
}

/// Pads short rows with nulls and rejects rows wider than the header.
/// Trailing blank or whitespace-only cells past the header are tolerated.
pub fn finish_table(
    parser: &'static str,
    headers: Vec<String>,
    rows: Vec<Vec<Option<CellValue>>>,
) -> Result<RawTable, ParserError> {
    if headers.is_empty() {
        return Err(ParserError::EmptyData { parser });
    }

    let width = headers.len();
    let mut finished = Vec::with_capacity(rows.len());

    for (idx, mut row) in rows.into_iter().enumerate() {
        if row.len() > width {
            if row[width..].iter().flatten().any(|cell| !cell.is_blank()) {
                return Err(ParserError::RaggedRow {
                    parser,
                    // header is line 1
                    line_index: idx + 2,
                    expected: width,
                    found: row.len(),
                });
            }
            row.truncate(width);
        }
        row.resize(width, None);
        finished.push(row);
    }

    Ok(RawTable {
        headers,
        rows: finished,
    })
}
