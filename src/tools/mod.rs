//! Tool handlers, grouped by concern. Each handler takes the shared state
//! plus the untyped argument bag and returns the JSON value that becomes the
//! tool's success payload.

pub mod batch;
pub mod data;
pub mod drive;
pub mod format;
pub mod structure;

use anyhow::{Result, bail};

/// Reject the call when any of the named string arguments came through
/// empty. The message lists every missing name so the caller can fix the
/// invocation in one pass.
pub fn ensure_required(fields: &[(&str, &str)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

    match missing.as_slice() {
        [] => Ok(()),
        [one] => bail!("{one} is required"),
        many => {
            let (last, rest) = many.split_last().unwrap_or((&"", &[]));
            bail!("{} and {last} are required", rest.join(", "))
        }
    }
}

/// Build a `Sheet!A1:B2`-style qualified range, or just the sheet title when
/// no range was given (the service then means "the whole sheet").
pub fn qualified_range(sheet: &str, range: &str) -> String {
    if range.is_empty() {
        sheet.to_string()
    } else {
        format!("{sheet}!{range}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_present_passes() {
        assert!(ensure_required(&[("spreadsheet_id", "abc"), ("sheet", "Data")]).is_ok());
    }

    #[test]
    fn single_missing_field_is_named() {
        let err = ensure_required(&[("spreadsheet_id", ""), ("sheet", "Data")]).unwrap_err();
        assert_eq!(err.to_string(), "spreadsheet_id is required");
    }

    #[test]
    fn multiple_missing_fields_are_listed() {
        let err =
            ensure_required(&[("spreadsheet_id", ""), ("sheet", ""), ("range", "")]).unwrap_err();
        assert_eq!(err.to_string(), "spreadsheet_id, sheet and range are required");
    }

    #[test]
    fn range_qualification() {
        assert_eq!(qualified_range("Data", "A1:B2"), "Data!A1:B2");
        assert_eq!(qualified_range("Data", ""), "Data");
    }
}
