use crate::api::model::GridRange;
use crate::errors::RangeError;

// Longest column run Sheets can represent is three letters; anything past
// seven cannot be a real reference and would overflow the index math.
const MAX_COLUMN_LETTERS: usize = 7;

/// A single cell reference, zero-based in both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAddress {
    pub col: i64,
    pub row: i64,
}

/// Decode a cell reference like `B2`: an uppercase base-26 column code
/// (A=1 .. Z=26, AA=27, ...) followed by a 1-based decimal row number.
pub fn parse_cell(cell: &str) -> Result<CellAddress, RangeError> {
    let invalid = || RangeError::InvalidCellNotation(cell.to_string());

    let split = cell
        .find(|c: char| !c.is_ascii_uppercase())
        .unwrap_or(cell.len());
    let (letters, digits) = cell.split_at(split);

    if letters.is_empty() || letters.len() > MAX_COLUMN_LETTERS || digits.is_empty() {
        return Err(invalid());
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let mut col: i64 = 0;
    for b in letters.bytes() {
        col = col * 26 + i64::from(b - b'A') + 1;
    }

    let row: i64 = digits.parse().map_err(|_| invalid())?;
    if row == 0 {
        // Row numbers are 1-based on the wire.
        return Err(invalid());
    }

    Ok(CellAddress {
        col: col - 1,
        row: row - 1,
    })
}

/// Parse a `start:end` range string into a zero-based, end-exclusive grid
/// rectangle on the given sheet. A bare cell reference is rejected; callers
/// pass `A1:A1` for a single cell.
pub fn parse_range(sheet_id: i64, range: &str) -> Result<GridRange, RangeError> {
    let (start, end) = range
        .split_once(':')
        .ok_or_else(|| RangeError::InvalidRangeFormat(range.to_string()))?;
    if end.contains(':') {
        return Err(RangeError::InvalidRangeFormat(range.to_string()));
    }

    let start = parse_cell(start)?;
    let end = parse_cell(end)?;

    Ok(GridRange {
        sheet_id,
        start_row_index: start.row,
        end_row_index: end.row + 1,
        start_column_index: start.col,
        end_column_index: end.col + 1,
    })
}
