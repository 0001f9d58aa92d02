use anyhow::Result;
use gsheets_mcp::tools::{batch, drive};
use serde_json::{Value, json};
use std::sync::Arc;

mod support;

use support::{StubApi, bag, state_with};

#[tokio::test(flavor = "current_thread")]
async fn multi_read_isolates_the_failing_item() -> Result<()> {
    let api = Arc::new(
        StubApi::new()
            .with_values("ss1", "Data!A1:B2", json!([["a"]]))
            .with_values("ss2", "Other!A1:A1", json!([["z"]])),
    );
    let state = state_with(api);

    let result = batch::get_multiple_sheet_data(
        state,
        bag(json!({
            "queries": [
                {"spreadsheet_id": "ss1", "sheet": "Data", "range": "A1:B2"},
                {"spreadsheet_id": "ss1", "sheet": "", "range": "A1:B2"},
                {"spreadsheet_id": "ss2", "sheet": "Other", "range": "A1:A1"},
            ],
        })),
    )
    .await?;

    let items = result.as_array().unwrap();
    assert_eq!(items.len(), 3);

    assert_eq!(items[0]["data"], json!([["a"]]));
    assert!(items[0].get("error").is_none());

    assert_eq!(
        items[1]["error"],
        "Missing required keys (spreadsheet_id, sheet, range)"
    );
    assert!(items[1].get("data").is_none());

    assert_eq!(items[2]["data"], json!([["z"]]));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn multi_read_records_remote_errors_per_item() -> Result<()> {
    let api = Arc::new(StubApi::new().with_values("ss1", "Data!A1:B2", json!([["a"]])));
    let state = state_with(api);

    let result = batch::get_multiple_sheet_data(
        state,
        bag(json!({
            "queries": [
                {"spreadsheet_id": "missing", "sheet": "Data", "range": "A1:B2"},
                {"spreadsheet_id": "ss1", "sheet": "Data", "range": "A1:B2"},
            ],
        })),
    )
    .await?;

    let items = result.as_array().unwrap();
    assert_eq!(items[0]["error"], "range not found (HTTP 404)");
    assert_eq!(items[0]["spreadsheet_id"], "missing");
    assert_eq!(items[1]["data"], json!([["a"]]));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn multi_read_rejects_a_non_list_payload() {
    let state = state_with(Arc::new(StubApi::new()));
    let err = batch::get_multiple_sheet_data(state, bag(json!({"queries": "nope"})))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid queries format");
}

#[tokio::test(flavor = "current_thread")]
async fn summary_fetches_headers_and_first_rows() -> Result<()> {
    let api = Arc::new(
        StubApi::new()
            .with_spreadsheet("ss1", "Budget", &[("Data", 7)])
            .with_values(
                "ss1",
                "Data!A1:3",
                json!([["name", "amount"], ["rent", "900"], ["food", "250"]]),
            ),
    );
    let state = state_with(api);

    let result = batch::get_multiple_spreadsheet_summary(
        state,
        bag(json!({"spreadsheet_ids": ["ss1"], "rows_to_fetch": 3})),
    )
    .await?;

    let summary = &result[0];
    assert_eq!(summary["spreadsheet_id"], "ss1");
    assert_eq!(summary["title"], "Budget");
    assert_eq!(summary["error"], Value::Null);

    let sheet = &summary["sheets"][0];
    assert_eq!(sheet["title"], "Data");
    assert_eq!(sheet["sheet_id"], 7);
    assert_eq!(sheet["headers"], json!(["name", "amount"]));
    assert_eq!(sheet["first_rows"], json!([["rent", "900"], ["food", "250"]]));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn summary_isolates_a_failing_spreadsheet() -> Result<()> {
    let api = Arc::new(
        StubApi::new()
            .with_spreadsheet("ss2", "Ok", &[("Data", 1)])
            .with_values("ss2", "Data!A1:5", json!([["h"]])),
    );
    let state = state_with(api);

    let result = batch::get_multiple_spreadsheet_summary(
        state,
        bag(json!({"spreadsheet_ids": ["gone", "ss2"]})),
    )
    .await?;

    assert_eq!(
        result[0]["error"],
        "Error fetching spreadsheet gone: spreadsheet not found (HTTP 404)"
    );
    assert_eq!(result[0]["title"], Value::Null);
    assert_eq!(result[0]["sheets"], json!([]));

    assert_eq!(result[1]["title"], "Ok");
    assert_eq!(result[1]["error"], Value::Null);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn summary_flags_untitled_sheets_without_a_remote_read() -> Result<()> {
    let api = Arc::new(StubApi::new().with_spreadsheet("ss1", "Budget", &[("", 3)]));
    let state = state_with(api.clone());

    let result = batch::get_multiple_spreadsheet_summary(
        state,
        bag(json!({"spreadsheet_ids": ["ss1"]})),
    )
    .await?;

    let sheet = &result[0]["sheets"][0];
    assert_eq!(sheet["error"], "Sheet title not found");
    assert_eq!(sheet["headers"], json!([]));
    assert!(api.value_reads.lock().is_empty());
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn summary_clamps_rows_to_fetch_to_at_least_one() -> Result<()> {
    let api = Arc::new(
        StubApi::new()
            .with_spreadsheet("ss1", "Budget", &[("Data", 7)])
            .with_values("ss1", "Data!A1:1", json!([["only headers"]])),
    );
    let state = state_with(api.clone());

    batch::get_multiple_spreadsheet_summary(
        state,
        bag(json!({"spreadsheet_ids": ["ss1"], "rows_to_fetch": -4})),
    )
    .await?;

    assert_eq!(api.value_reads.lock()[0].1, "Data!A1:1");
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn share_splits_successes_and_failures() -> Result<()> {
    let mut api = StubApi::new();
    api.fail_permission_for = vec!["blocked@example.com".to_string()];
    let api = Arc::new(api);
    let state = state_with(api.clone());

    let result = drive::share_spreadsheet(
        state,
        bag(json!({
            "spreadsheet_id": "ss1",
            "recipients": [
                {"email_address": "ok@example.com", "role": "reader"},
                {"email_address": "", "role": "writer"},
                {"email_address": "someone@example.com", "role": "owner"},
                {"email_address": "blocked@example.com"},
                {"email_address": "last@example.com"},
            ],
        })),
    )
    .await?;

    let successes = result["successes"].as_array().unwrap();
    let failures = result["failures"].as_array().unwrap();
    assert_eq!(successes.len(), 2);
    assert_eq!(failures.len(), 3);

    assert_eq!(successes[0]["email_address"], "ok@example.com");
    assert_eq!(successes[0]["role"], "reader");
    assert_eq!(successes[0]["permissionId"], "perm-1");
    // Omitted role falls back to writer.
    assert_eq!(successes[1]["role"], "writer");

    assert_eq!(failures[0]["email_address"], Value::Null);
    assert_eq!(failures[0]["error"], "Missing email_address in recipient entry.");
    assert_eq!(
        failures[1]["error"],
        "Invalid role 'owner'. Must be 'reader', 'commenter', or 'writer'."
    );
    assert_eq!(
        failures[2]["error"],
        "Failed to share: cannot share with this user (HTTP 403)"
    );

    // Only the two valid recipients reached the remote call.
    assert_eq!(api.created_permissions.lock().len(), 2);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn share_passes_the_notification_flag_through() -> Result<()> {
    let api = Arc::new(StubApi::new());
    let state = state_with(api.clone());

    drive::share_spreadsheet(
        state,
        bag(json!({
            "spreadsheet_id": "ss1",
            "recipients": [{"email_address": "a@example.com"}],
            "send_notification": false,
        })),
    )
    .await?;

    let created = api.created_permissions.lock();
    assert_eq!(created[0].2, false);
    assert_eq!(created[0].1["type"], "user");
    assert_eq!(created[0].1["emailAddress"], "a@example.com");
    Ok(())
}
