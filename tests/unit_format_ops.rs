use anyhow::Result;
use gsheets_mcp::tools::{drive, format};
use serde_json::json;
use std::sync::Arc;

mod support;

use support::{StubApi, bag, state_with};

#[tokio::test(flavor = "current_thread")]
async fn sort_range_builds_descending_spec_on_resolved_sheet() -> Result<()> {
    let api = Arc::new(StubApi::new().with_spreadsheet("ss1", "Budget", &[("Data", 42)]));
    let state = state_with(api.clone());

    format::sort_range(
        state,
        bag(json!({
            "spreadsheet_id": "ss1",
            "sheet": "Data",
            "range": "A2:C10",
            "sort_column": 1,
            "ascending": false,
        })),
    )
    .await?;

    let updates = api.batch_updates.lock();
    let request = &updates[0].1[0]["sortRange"];
    assert_eq!(
        request["range"],
        json!({
            "sheetId": 42,
            "startRowIndex": 1,
            "endRowIndex": 10,
            "startColumnIndex": 0,
            "endColumnIndex": 3,
        })
    );
    assert_eq!(request["sortSpecs"][0]["dimensionIndex"], 1);
    assert_eq!(request["sortSpecs"][0]["sortOrder"], "DESCENDING");
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn sort_range_defaults_to_first_column_ascending() -> Result<()> {
    let api = Arc::new(StubApi::new().with_spreadsheet("ss1", "Budget", &[("Data", 42)]));
    let state = state_with(api.clone());

    format::sort_range(
        state,
        bag(json!({"spreadsheet_id": "ss1", "sheet": "Data", "range": "A1:B5"})),
    )
    .await?;

    let updates = api.batch_updates.lock();
    let spec = &updates[0].1[0]["sortRange"]["sortSpecs"][0];
    assert_eq!(spec["dimensionIndex"], 0);
    assert_eq!(spec["sortOrder"], "ASCENDING");
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn format_cells_combines_colors_and_text_styles() -> Result<()> {
    let api = Arc::new(StubApi::new().with_spreadsheet("ss1", "Budget", &[("Data", 7)]));
    let state = state_with(api.clone());

    format::format_cells(
        state,
        bag(json!({
            "spreadsheet_id": "ss1",
            "sheet": "Data",
            "range": "A1:B2",
            "background_color": {"red": 0.9},
            "text_color": {"blue": 1.0},
            "bold": true,
            "font_size": 12,
        })),
    )
    .await?;

    let updates = api.batch_updates.lock();
    let request = &updates[0].1[0]["repeatCell"];
    let cell_format = &request["cell"]["userEnteredFormat"];
    assert_eq!(cell_format["backgroundColor"]["red"], 0.9);
    assert_eq!(cell_format["backgroundColor"]["alpha"], 1.0);
    assert_eq!(cell_format["textFormat"]["foregroundColor"]["blue"], 1.0);
    assert_eq!(cell_format["textFormat"]["bold"], true);
    assert_eq!(cell_format["textFormat"]["fontSize"], 12);
    assert_eq!(
        request["fields"],
        "userEnteredFormat.backgroundColor,userEnteredFormat.textFormat"
    );
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn format_cells_requires_at_least_one_option() {
    let api = Arc::new(StubApi::new().with_spreadsheet("ss1", "Budget", &[("Data", 7)]));
    let state = state_with(api);

    let err = format::format_cells(
        state,
        bag(json!({"spreadsheet_id": "ss1", "sheet": "Data", "range": "A1:B2"})),
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "at least one formatting option is required");
}

#[tokio::test(flavor = "current_thread")]
async fn format_cells_rejects_malformed_range() {
    let api = Arc::new(StubApi::new().with_spreadsheet("ss1", "Budget", &[("Data", 7)]));
    let state = state_with(api.clone());

    let err = format::format_cells(
        state,
        bag(json!({
            "spreadsheet_id": "ss1",
            "sheet": "Data",
            "range": "A1",
            "bold": true,
        })),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("invalid range format"));
    assert!(api.batch_updates.lock().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn merge_cells_validates_the_merge_type() {
    let api = Arc::new(StubApi::new().with_spreadsheet("ss1", "Budget", &[("Data", 7)]));
    let state = state_with(api.clone());

    let err = format::merge_cells(
        state.clone(),
        bag(json!({
            "spreadsheet_id": "ss1",
            "sheet": "Data",
            "range": "A1:B2",
            "merge_type": "DIAGONAL",
        })),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("invalid merge_type"));

    format::merge_cells(
        state,
        bag(json!({"spreadsheet_id": "ss1", "sheet": "Data", "range": "A1:B2"})),
    )
    .await
    .unwrap();
    let updates = api.batch_updates.lock();
    assert_eq!(updates[0].1[0]["mergeCells"]["mergeType"], "MERGE_ALL");
}

#[tokio::test(flavor = "current_thread")]
async fn find_replace_scoped_to_one_sheet_resolves_its_id() -> Result<()> {
    let api = Arc::new(StubApi::new().with_spreadsheet("ss1", "Budget", &[("Data", 7)]));
    let state = state_with(api.clone());

    format::find_replace(
        state,
        bag(json!({
            "spreadsheet_id": "ss1",
            "find": "old",
            "replacement": "new",
            "sheet": "Data",
            "match_case": true,
        })),
    )
    .await?;

    let updates = api.batch_updates.lock();
    let request = &updates[0].1[0]["findReplace"];
    assert_eq!(request["find"], "old");
    assert_eq!(request["replacement"], "new");
    assert_eq!(request["sheetId"], 7);
    assert!(request.get("allSheets").is_none());
    assert_eq!(request["matchCase"], true);
    assert_eq!(request["matchEntireCell"], false);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn find_replace_all_sheets_skips_resolution() -> Result<()> {
    // No metadata registered: resolution would fail, proving it is skipped.
    let api = Arc::new(StubApi::new());
    let state = state_with(api.clone());

    format::find_replace(
        state,
        bag(json!({"spreadsheet_id": "ss1", "find": "old", "all_sheets": true})),
    )
    .await?;

    let updates = api.batch_updates.lock();
    let request = &updates[0].1[0]["findReplace"];
    assert_eq!(request["allSheets"], true);
    assert!(request.get("sheetId").is_none());
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn export_resolves_the_ooxml_mime_type() -> Result<()> {
    let state = state_with(Arc::new(StubApi::new()));

    let result = drive::export_spreadsheet(
        state,
        bag(json!({"spreadsheet_id": "ss1", "format": "XLSX"})),
    )
    .await?;

    assert_eq!(
        result["mimeType"],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        result["exportUrl"],
        "https://docs.google.com/spreadsheets/d/ss1/export?format=xlsx"
    );
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn export_defaults_to_csv() -> Result<()> {
    let state = state_with(Arc::new(StubApi::new()));
    let result = drive::export_spreadsheet(state, bag(json!({"spreadsheet_id": "ss1"}))).await?;
    assert_eq!(result["format"], "csv");
    assert_eq!(result["mimeType"], "text/csv");
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn export_rejects_unknown_formats() {
    let state = state_with(Arc::new(StubApi::new()));
    let err = drive::export_spreadsheet(
        state,
        bag(json!({"spreadsheet_id": "ss1", "format": "bogus"})),
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported export format 'bogus': must be one of csv, pdf, xlsx, ods, tsv"
    );
}
