//! Multi-item operations with per-item failure isolation.

use crate::api::model::ValueRender;
use crate::args::ArgumentBag;
use crate::state::AppState;
use anyhow::{Result, bail};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// Run each item through `run` in order, collecting one envelope per item.
/// `run` owns per-item error handling; nothing here short-circuits, so one
/// bad item never aborts the rest.
pub async fn fan_out<T, F>(items: Vec<T>, mut run: F) -> Vec<Value>
where
    F: AsyncFnMut(T) -> Value,
{
    let mut results = Vec::with_capacity(items.len());
    for item in items {
        results.push(run(item).await);
    }
    results
}

pub async fn get_multiple_sheet_data(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let Some(queries) = args.raw("queries") else {
        bail!("queries is required");
    };
    let Ok(queries) = serde_json::from_value::<Vec<HashMap<String, String>>>(queries.clone())
    else {
        bail!("invalid queries format");
    };

    let results = fan_out(queries, async move |query| {
        let spreadsheet_id = query.get("spreadsheet_id").cloned().unwrap_or_default();
        let sheet = query.get("sheet").cloned().unwrap_or_default();
        let range = query.get("range").cloned().unwrap_or_default();

        let mut envelope = json!({
            "spreadsheet_id": spreadsheet_id,
            "sheet": sheet,
            "range": range,
        });

        if spreadsheet_id.is_empty() || sheet.is_empty() || range.is_empty() {
            envelope["error"] = json!("Missing required keys (spreadsheet_id, sheet, range)");
            return envelope;
        }

        let full_range = format!("{sheet}!{range}");
        match state
            .sheets()
            .get_values(&spreadsheet_id, &full_range, ValueRender::Formatted)
            .await
        {
            Ok(values) => envelope["data"] = json!(values.values),
            Err(e) => envelope["error"] = json!(e.to_string()),
        }
        envelope
    })
    .await;

    Ok(Value::Array(results))
}

pub async fn get_multiple_spreadsheet_summary(
    state: Arc<AppState>,
    args: ArgumentBag,
) -> Result<Value> {
    let Some(ids) = args.raw("spreadsheet_ids") else {
        bail!("spreadsheet_ids is required");
    };
    let Ok(spreadsheet_ids) = serde_json::from_value::<Vec<String>>(ids.clone()) else {
        bail!("invalid spreadsheet_ids format");
    };

    let rows_to_fetch = (args.get("rows_to_fetch", 5.0) as i64).max(1);

    let summaries = fan_out(spreadsheet_ids, async move |spreadsheet_id| {
        let mut summary = json!({
            "spreadsheet_id": spreadsheet_id,
            "title": null,
            "sheets": [],
            "error": null,
        });

        let spreadsheet = match state
            .sheets()
            .get_spreadsheet(
                &spreadsheet_id,
                Some("properties.title,sheets(properties(title,sheetId))"),
                &[],
                false,
            )
            .await
        {
            Ok(spreadsheet) => spreadsheet,
            Err(e) => {
                summary["error"] = json!(format!("Error fetching spreadsheet {spreadsheet_id}: {e}"));
                return summary;
            }
        };

        summary["title"] = spreadsheet
            .pointer("/properties/title")
            .cloned()
            .unwrap_or(Value::Null);

        let sheets: Vec<Value> = spreadsheet
            .get("sheets")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        // Second fan-out level: each sheet's headers and sample rows are
        // fetched independently with the same isolation policy.
        let state = state.clone();
        let sheet_summaries = fan_out(sheets, async move |sheet| {
            let title = sheet
                .pointer("/properties/title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let sheet_id = sheet.pointer("/properties/sheetId").cloned();

            let mut entry = json!({
                "title": title,
                "sheet_id": sheet_id,
                "headers": [],
                "first_rows": [],
                "error": null,
            });

            if title.is_empty() {
                entry["error"] = json!("Sheet title not found");
                return entry;
            }

            let range = format!("{title}!A1:{rows_to_fetch}");
            match state
                .sheets()
                .get_values(&spreadsheet_id, &range, ValueRender::Formatted)
                .await
            {
                Ok(values) => {
                    if let Some((headers, rest)) = values.values.split_first() {
                        entry["headers"] = json!(headers);
                        if !rest.is_empty() {
                            entry["first_rows"] = json!(rest);
                        }
                    }
                }
                Err(e) => {
                    entry["error"] = json!(format!("Error fetching data for sheet {title}: {e}"));
                }
            }
            entry
        })
        .await;

        summary["sheets"] = Value::Array(sheet_summaries);
        summary
    })
    .await;

    Ok(Value::Array(summaries))
}
