//! Formatting operations: cell styling, merges, sorting, find & replace.

use crate::a1::parse_range;
use crate::api::model::{
    CellData, CellFormat, FindReplaceRequest, MergeCellsRequest, MergeType, RepeatCellRequest,
    Request, SortOrder, SortRangeRequest, SortSpec, TextFormat, UnmergeCellsRequest,
};
use crate::args::ArgumentBag;
use crate::color::parse_color;
use crate::state::AppState;
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::sync::Arc;

use super::ensure_required;

pub async fn format_cells(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    let range = args.get("range", String::new());
    ensure_required(&[
        ("spreadsheet_id", &spreadsheet_id),
        ("sheet", &sheet),
        ("range", &range),
    ])?;

    let sheet_id = state
        .resolve_sheet_id(&spreadsheet_id, &sheet)
        .await
        .context("failed to get sheet ID")?;
    let grid_range = parse_range(sheet_id, &range)?;

    let mut format = CellFormat::default();
    let mut text = TextFormat::default();
    let mut has_text = false;
    let mut fields: Vec<&str> = Vec::new();

    if let Some(raw) = args.raw("background_color") {
        format.background_color = Some(parse_color(raw).context("invalid background_color")?);
        fields.push("userEnteredFormat.backgroundColor");
    }
    if let Some(raw) = args.raw("text_color") {
        text.foreground_color = Some(parse_color(raw).context("invalid text_color")?);
        has_text = true;
    }
    if args.raw("bold").is_some() {
        text.bold = Some(args.get("bold", false));
        has_text = true;
    }
    if args.raw("italic").is_some() {
        text.italic = Some(args.get("italic", false));
        has_text = true;
    }
    if args.raw("font_size").is_some() {
        text.font_size = Some(args.get("font_size", 0.0) as i64);
        has_text = true;
    }
    if has_text {
        format.text_format = Some(text);
        fields.push("userEnteredFormat.textFormat");
    }

    if fields.is_empty() {
        bail!("at least one formatting option is required");
    }

    let request = Request::repeat_cell(RepeatCellRequest {
        range: grid_range,
        cell: CellData {
            user_entered_format: format,
        },
        fields: fields.join(","),
    });
    state
        .sheets()
        .batch_update(&spreadsheet_id, vec![request])
        .await
        .context("failed to format cells")
}

pub async fn merge_cells(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    let range = args.get("range", String::new());
    ensure_required(&[
        ("spreadsheet_id", &spreadsheet_id),
        ("sheet", &sheet),
        ("range", &range),
    ])?;

    let merge_type = args.get("merge_type", "MERGE_ALL".to_string());
    let Some(merge_type) = MergeType::parse(&merge_type) else {
        bail!("invalid merge_type '{merge_type}': must be MERGE_ALL, MERGE_COLUMNS or MERGE_ROWS");
    };

    let sheet_id = state
        .resolve_sheet_id(&spreadsheet_id, &sheet)
        .await
        .context("failed to get sheet ID")?;
    let grid_range = parse_range(sheet_id, &range)?;

    let request = Request::merge_cells(MergeCellsRequest {
        range: grid_range,
        merge_type,
    });
    state
        .sheets()
        .batch_update(&spreadsheet_id, vec![request])
        .await
        .context("failed to merge cells")
}

pub async fn unmerge_cells(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    let range = args.get("range", String::new());
    ensure_required(&[
        ("spreadsheet_id", &spreadsheet_id),
        ("sheet", &sheet),
        ("range", &range),
    ])?;

    let sheet_id = state
        .resolve_sheet_id(&spreadsheet_id, &sheet)
        .await
        .context("failed to get sheet ID")?;
    let grid_range = parse_range(sheet_id, &range)?;

    let request = Request::unmerge_cells(UnmergeCellsRequest { range: grid_range });
    state
        .sheets()
        .batch_update(&spreadsheet_id, vec![request])
        .await
        .context("failed to unmerge cells")
}

pub async fn sort_range(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let sheet = args.get("sheet", String::new());
    let range = args.get("range", String::new());
    ensure_required(&[
        ("spreadsheet_id", &spreadsheet_id),
        ("sheet", &sheet),
        ("range", &range),
    ])?;

    let sort_column = args.get("sort_column", 0.0) as i64;
    let ascending = args.get("ascending", true);

    let sheet_id = state
        .resolve_sheet_id(&spreadsheet_id, &sheet)
        .await
        .context("failed to get sheet ID")?;
    let grid_range = parse_range(sheet_id, &range)?;

    let request = Request::sort_range(SortRangeRequest {
        range: grid_range,
        sort_specs: vec![SortSpec {
            dimension_index: sort_column,
            sort_order: if ascending {
                SortOrder::Ascending
            } else {
                SortOrder::Descending
            },
        }],
    });
    state
        .sheets()
        .batch_update(&spreadsheet_id, vec![request])
        .await
        .context("failed to sort range")
}

pub async fn find_replace(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let find = args.get("find", String::new());
    let replacement = args.get("replacement", String::new());
    ensure_required(&[("spreadsheet_id", &spreadsheet_id), ("find", &find)])?;

    let all_sheets = args.get("all_sheets", false);
    let match_case = args.get("match_case", false);
    let match_entire_cell = args.get("match_entire_cell", false);

    // Scoping to one sheet needs the numeric id; the all-sheets mode skips
    // resolution and sets the scope flag instead.
    let sheet_id = if all_sheets {
        None
    } else {
        let sheet = args.get("sheet", String::new());
        ensure_required(&[("sheet", &sheet)])?;
        Some(
            state
                .resolve_sheet_id(&spreadsheet_id, &sheet)
                .await
                .context("failed to get sheet ID")?,
        )
    };

    let request = Request::find_replace(FindReplaceRequest {
        find,
        replacement,
        sheet_id,
        all_sheets: all_sheets.then_some(true),
        match_case,
        match_entire_cell,
    });
    state
        .sheets()
        .batch_update(&spreadsheet_id, vec![request])
        .await
        .context("failed to find and replace")
}
