//! The `spreadsheet://{id}/info` resource.

use crate::errors::UriError;
use crate::state::AppState;
use anyhow::{Context, Result};
use serde_json::{Value, json};

/// Extract the spreadsheet id from a `scheme://<id>/...` URI.
pub fn parse_info_uri(uri: &str) -> Result<String, UriError> {
    let (_, path) = uri.split_once("://").ok_or(UriError::MissingScheme)?;
    let id = path.split('/').next().unwrap_or_default();
    if id.is_empty() {
        return Err(UriError::MissingSpreadsheetId);
    }
    Ok(id.to_string())
}

/// Fetch the spreadsheet's title and per-sheet grid properties.
pub async fn spreadsheet_info(state: &AppState, spreadsheet_id: &str) -> Result<Value> {
    let spreadsheet = state
        .sheets()
        .get_spreadsheet(spreadsheet_id, None, &[], false)
        .await
        .context("failed to get spreadsheet")?;

    let sheets: Vec<Value> = spreadsheet
        .get("sheets")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|s| s.get("properties"))
        .map(|p| {
            json!({
                "title": p.get("title"),
                "sheetId": p.get("sheetId"),
                "gridProperties": p.get("gridProperties"),
            })
        })
        .collect();

    Ok(json!({
        "title": spreadsheet.pointer("/properties/title"),
        "sheets": sheets,
    }))
}
