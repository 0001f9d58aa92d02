//! Structural operations: dimension inserts and sheet lifecycle.

use crate::api::model::{
    AddSheetRequest, DeleteSheetRequest, Dimension, DimensionRange, DuplicateSheetRequest,
    InsertDimensionRequest, Request, SheetProperties, UpdateSheetPropertiesRequest,
};
use crate::args::ArgumentBag;
use crate::state::AppState;
use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::sync::Arc;

use super::ensure_required;

async fn insert_dimension(
    state: &AppState,
    args: &ArgumentBag,
    dimension: Dimension,
    start_key: &str,
    op: &'static str,
) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    let count = args.get("count", 0.0) as i64;

    if spreadsheet_id.is_empty() || sheet.is_empty() || count <= 0 {
        bail!("spreadsheet_id, sheet and count are required");
    }

    let sheet_id = state
        .resolve_sheet_id(&spreadsheet_id, &sheet)
        .await
        .context("failed to get sheet ID")?;

    let start = args.get(start_key, 0.0) as i64;
    let request = Request::insert_dimension(InsertDimensionRequest {
        range: DimensionRange {
            sheet_id,
            dimension,
            start_index: start,
            end_index: start + count,
        },
        // Inserting at the very top/left has no preceding row/column to
        // inherit formatting from.
        inherit_from_before: start > 0,
    });

    state
        .sheets()
        .batch_update(&spreadsheet_id, vec![request])
        .await
        .with_context(|| format!("failed to {op}"))
}

pub async fn add_rows(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    insert_dimension(&state, &args, Dimension::Rows, "start_row", "add rows").await
}

pub async fn add_columns(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    insert_dimension(&state, &args, Dimension::Columns, "start_column", "add columns").await
}

pub async fn list_sheets(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    ensure_required(&[("spreadsheet_id", &spreadsheet_id)])?;

    let spreadsheet = state
        .sheets()
        .get_spreadsheet(&spreadsheet_id, None, &[], false)
        .await
        .context("failed to get spreadsheet")?;

    let titles: Vec<Value> = spreadsheet
        .get("sheets")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|s| s.pointer("/properties/title"))
        .cloned()
        .collect();

    Ok(Value::Array(titles))
}

pub async fn create_sheet(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let title = args.get("title", String::new());
    ensure_required(&[("spreadsheet_id", &spreadsheet_id), ("title", &title)])?;

    let request = Request::add_sheet(AddSheetRequest {
        properties: SheetProperties {
            title: Some(title),
            ..SheetProperties::default()
        },
    });
    let result = state
        .sheets()
        .batch_update(&spreadsheet_id, vec![request])
        .await
        .context("failed to create sheet")?;

    // Narrow to the new sheet's identifying properties when the reply carries
    // them; otherwise hand back the raw response.
    if let Some(props) = result.pointer("/replies/0/addSheet/properties") {
        return Ok(json!({
            "sheetId": props.get("sheetId"),
            "title": props.get("title"),
            "index": props.get("index"),
            "spreadsheetId": spreadsheet_id,
        }));
    }
    Ok(result)
}

pub async fn copy_sheet(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let src_spreadsheet = args.get("src_spreadsheet", String::new());
    let src_sheet = args.get("src_sheet", String::new());
    let dst_spreadsheet = args.get("dst_spreadsheet", String::new());
    let dst_sheet = args.get("dst_sheet", String::new());
    ensure_required(&[
        ("src_spreadsheet", &src_spreadsheet),
        ("src_sheet", &src_sheet),
        ("dst_spreadsheet", &dst_spreadsheet),
        ("dst_sheet", &dst_sheet),
    ])?;

    let src_sheet_id = state
        .resolve_sheet_id(&src_spreadsheet, &src_sheet)
        .await
        .context("failed to get source sheet ID")?;

    let copied = state
        .sheets()
        .copy_sheet_to(&src_spreadsheet, src_sheet_id, &dst_spreadsheet)
        .await
        .context("failed to copy sheet")?;

    let mut result = json!({ "copy": copied });

    // The copy lands under a generated "Copy of ..." title; rename it unless
    // it already matches the requested name.
    let copied_title = result
        .pointer("/copy/title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if copied_title != dst_sheet {
        let copied_id = result
            .pointer("/copy/sheetId")
            .and_then(Value::as_i64)
            .unwrap_or_default();
        let rename = Request::update_sheet_properties(UpdateSheetPropertiesRequest {
            properties: SheetProperties {
                sheet_id: Some(copied_id),
                title: Some(dst_sheet),
                ..SheetProperties::default()
            },
            fields: "title".to_string(),
        });
        let renamed = state
            .sheets()
            .batch_update(&dst_spreadsheet, vec![rename])
            .await
            .context("failed to rename copied sheet")?;
        result["rename"] = renamed;
    }

    Ok(result)
}

pub async fn rename_sheet(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet = args.get("spreadsheet", String::new());
    let sheet = args.get("sheet", String::new());
    let new_name = args.get("new_name", String::new());
    ensure_required(&[
        ("spreadsheet", &spreadsheet),
        ("sheet", &sheet),
        ("new_name", &new_name),
    ])?;

    let sheet_id = state
        .resolve_sheet_id(&spreadsheet, &sheet)
        .await
        .context("failed to get sheet ID")?;

    let request = Request::update_sheet_properties(UpdateSheetPropertiesRequest {
        properties: SheetProperties {
            sheet_id: Some(sheet_id),
            title: Some(new_name),
            ..SheetProperties::default()
        },
        fields: "title".to_string(),
    });
    state
        .sheets()
        .batch_update(&spreadsheet, vec![request])
        .await
        .context("failed to rename sheet")
}

pub async fn delete_sheet(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    ensure_required(&[("spreadsheet_id", &spreadsheet_id), ("sheet", &sheet)])?;

    let sheet_id = state
        .resolve_sheet_id(&spreadsheet_id, &sheet)
        .await
        .context("failed to get sheet ID")?;

    let request = Request::delete_sheet(DeleteSheetRequest { sheet_id });
    state
        .sheets()
        .batch_update(&spreadsheet_id, vec![request])
        .await
        .context("failed to delete sheet")
}

pub async fn duplicate_sheet(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    let new_title = args.get("new_title", String::new());
    ensure_required(&[("spreadsheet_id", &spreadsheet_id), ("sheet", &sheet)])?;

    let sheet_id = state
        .resolve_sheet_id(&spreadsheet_id, &sheet)
        .await
        .context("failed to get sheet ID")?;

    let request = Request::duplicate_sheet(DuplicateSheetRequest {
        source_sheet_id: sheet_id,
        new_sheet_name: (!new_title.is_empty()).then_some(new_title),
    });
    state
        .sheets()
        .batch_update(&spreadsheet_id, vec![request])
        .await
        .context("failed to duplicate sheet")
}

async fn set_hidden(
    state: &AppState,
    args: &ArgumentBag,
    hidden: bool,
    op: &'static str,
) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    ensure_required(&[("spreadsheet_id", &spreadsheet_id), ("sheet", &sheet)])?;

    let sheet_id = state
        .resolve_sheet_id(&spreadsheet_id, &sheet)
        .await
        .context("failed to get sheet ID")?;

    let request = Request::update_sheet_properties(UpdateSheetPropertiesRequest {
        properties: SheetProperties {
            sheet_id: Some(sheet_id),
            hidden: Some(hidden),
            ..SheetProperties::default()
        },
        fields: "hidden".to_string(),
    });
    state
        .sheets()
        .batch_update(&spreadsheet_id, vec![request])
        .await
        .with_context(|| format!("failed to {op}"))
}

pub async fn hide_sheet(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    set_hidden(&state, &args, true, "hide sheet").await
}

pub async fn unhide_sheet(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    set_hidden(&state, &args, false, "unhide sheet").await
}
