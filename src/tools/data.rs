//! Cell-value read and write operations.

use crate::api::model::{BatchUpdateValuesRequest, USER_ENTERED, ValueRange, ValueRender};
use crate::args::ArgumentBag;
use crate::state::AppState;
use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::sync::Arc;

use super::{ensure_required, qualified_range};

fn rectangular_values(raw: &Value) -> Result<Vec<Vec<Value>>> {
    serde_json::from_value(raw.clone()).context("invalid data format")
}

pub async fn get_sheet_data(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    let range = args.get("range", String::new());
    let include_grid_data = args.get("include_grid_data", false);
    ensure_required(&[("spreadsheet_id", &spreadsheet_id), ("sheet", &sheet)])?;

    let full_range = qualified_range(&sheet, &range);

    if include_grid_data {
        let result = state
            .sheets()
            .get_spreadsheet(&spreadsheet_id, None, &[full_range], true)
            .await
            .context("failed to get sheet data")?;
        return Ok(result);
    }

    let values = state
        .sheets()
        .get_values(&spreadsheet_id, &full_range, ValueRender::Formatted)
        .await
        .context("failed to get sheet values")?;

    Ok(json!({
        "spreadsheetId": spreadsheet_id,
        "valueRanges": [
            {"range": full_range, "values": values.values}
        ],
    }))
}

pub async fn get_sheet_formulas(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    let range = args.get("range", String::new());
    ensure_required(&[("spreadsheet_id", &spreadsheet_id), ("sheet", &sheet)])?;

    let full_range = qualified_range(&sheet, &range);
    let result = state
        .sheets()
        .get_values(&spreadsheet_id, &full_range, ValueRender::Formula)
        .await
        .context("failed to get formulas")?;

    Ok(Value::Array(
        result.values.into_iter().map(Value::Array).collect(),
    ))
}

pub async fn update_cells(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    let range = args.get("range", String::new());
    ensure_required(&[
        ("spreadsheet_id", &spreadsheet_id),
        ("sheet", &sheet),
        ("range", &range),
    ])?;

    let Some(data) = args.raw("data") else {
        bail!("data is required");
    };
    let values = rectangular_values(data)?;

    let full_range = format!("{sheet}!{range}");
    let body = ValueRange {
        range: None,
        values,
    };
    state
        .sheets()
        .update_values(&spreadsheet_id, &full_range, &body)
        .await
        .context("failed to update cells")
}

pub async fn batch_update_cells(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    ensure_required(&[("spreadsheet_id", &spreadsheet_id), ("sheet", &sheet)])?;

    let Some(ranges) = args.raw("ranges") else {
        bail!("ranges is required");
    };
    let Value::Object(ranges) = ranges else {
        bail!("ranges must be an object/map");
    };

    let mut data = Vec::with_capacity(ranges.len());
    for (range, values) in ranges {
        let values = rectangular_values(values)
            .with_context(|| format!("invalid data format for range {range}"))?;
        data.push(ValueRange {
            range: Some(format!("{sheet}!{range}")),
            values,
        });
    }

    let request = BatchUpdateValuesRequest {
        value_input_option: USER_ENTERED.to_string(),
        data,
    };
    state
        .sheets()
        .batch_update_values(&spreadsheet_id, &request)
        .await
        .context("failed to batch update cells")
}

pub async fn append_data(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    ensure_required(&[("spreadsheet_id", &spreadsheet_id), ("sheet", &sheet)])?;

    let Some(data) = args.raw("data") else {
        bail!("data is required");
    };
    let values = rectangular_values(data)?;

    // Appending targets the whole sheet; the service finds the first free row.
    let body = ValueRange {
        range: None,
        values,
    };
    state
        .sheets()
        .append_values(&spreadsheet_id, &sheet, &body)
        .await
        .context("failed to append data")
}

pub async fn clear_range(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    let range = args.get("range", String::new());
    ensure_required(&[("spreadsheet_id", &spreadsheet_id), ("sheet", &sheet)])?;

    let full_range = qualified_range(&sheet, &range);
    state
        .sheets()
        .clear_values(&spreadsheet_id, &full_range)
        .await
        .context("failed to clear range")
}
