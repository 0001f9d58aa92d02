//! Typed request objects for the Sheets v4 and Drive v3 wire formats.
//!
//! Only the slice of the remote surface the tools actually build is modelled;
//! responses stay as raw [`serde_json::Value`] and pass through to the caller
//! verbatim unless an operation documents a narrower projection.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// How cell values are rendered by a values read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRender {
    Formatted,
    Formula,
}

impl ValueRender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Formatted => "FORMATTED_VALUE",
            Self::Formula => "FORMULA",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateValuesRequest {
    pub value_input_option: String,
    pub data: Vec<ValueRange>,
}

pub const USER_ENTERED: &str = "USER_ENTERED";

/// A rectangular region of one sheet: zero-based indices, exclusive ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRange {
    pub sheet_id: i64,
    pub start_row_index: i64,
    pub end_row_index: i64,
    pub start_column_index: i64,
    pub end_column_index: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    Rows,
    Columns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MergeType {
    #[serde(rename = "MERGE_ALL")]
    MergeAll,
    #[serde(rename = "MERGE_COLUMNS")]
    MergeColumns,
    #[serde(rename = "MERGE_ROWS")]
    MergeRows,
}

impl MergeType {
    /// Accepts the wire literals case-insensitively; anything else is the
    /// caller's input error.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "MERGE_ALL" => Some(Self::MergeAll),
            "MERGE_COLUMNS" => Some(Self::MergeColumns),
            "MERGE_ROWS" => Some(Self::MergeRows),
            _ => None,
        }
    }
}

/// One entry of a `batchUpdate` request. Exactly one field is set; the rest
/// are skipped during serialization, matching the remote union encoding.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_dimension: Option<InsertDimensionRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_sheet: Option<AddSheetRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_sheet: Option<DeleteSheetRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_sheet: Option<DuplicateSheetRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_sheet_properties: Option<UpdateSheetPropertiesRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_cell: Option<RepeatCellRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_cells: Option<MergeCellsRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmerge_cells: Option<UnmergeCellsRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_range: Option<SortRangeRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub find_replace: Option<FindReplaceRequest>,
}

impl Request {
    pub fn insert_dimension(request: InsertDimensionRequest) -> Self {
        Self {
            insert_dimension: Some(request),
            ..Self::default()
        }
    }

    pub fn add_sheet(request: AddSheetRequest) -> Self {
        Self {
            add_sheet: Some(request),
            ..Self::default()
        }
    }

    pub fn delete_sheet(request: DeleteSheetRequest) -> Self {
        Self {
            delete_sheet: Some(request),
            ..Self::default()
        }
    }

    pub fn duplicate_sheet(request: DuplicateSheetRequest) -> Self {
        Self {
            duplicate_sheet: Some(request),
            ..Self::default()
        }
    }

    pub fn update_sheet_properties(request: UpdateSheetPropertiesRequest) -> Self {
        Self {
            update_sheet_properties: Some(request),
            ..Self::default()
        }
    }

    pub fn repeat_cell(request: RepeatCellRequest) -> Self {
        Self {
            repeat_cell: Some(request),
            ..Self::default()
        }
    }

    pub fn merge_cells(request: MergeCellsRequest) -> Self {
        Self {
            merge_cells: Some(request),
            ..Self::default()
        }
    }

    pub fn unmerge_cells(request: UnmergeCellsRequest) -> Self {
        Self {
            unmerge_cells: Some(request),
            ..Self::default()
        }
    }

    pub fn sort_range(request: SortRangeRequest) -> Self {
        Self {
            sort_range: Some(request),
            ..Self::default()
        }
    }

    pub fn find_replace(request: FindReplaceRequest) -> Self {
        Self {
            find_replace: Some(request),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionRange {
    pub sheet_id: i64,
    pub dimension: Dimension,
    pub start_index: i64,
    pub end_index: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertDimensionRequest {
    pub range: DimensionRange,
    pub inherit_from_before: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSheetRequest {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSheetRequest {
    pub sheet_id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateSheetRequest {
    pub source_sheet_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_sheet_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSheetPropertiesRequest {
    pub properties: SheetProperties,
    /// Field mask naming exactly the properties being written.
    pub fields: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatCellRequest {
    pub range: GridRange,
    pub cell: CellData,
    pub fields: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub user_entered_format: CellFormat,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_format: Option<TextFormat>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub foreground_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeCellsRequest {
    pub range: GridRange,
    pub merge_type: MergeType,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmergeCellsRequest {
    pub range: GridRange,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub dimension_index: i64,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SortRangeRequest {
    pub range: GridRange,
    pub sort_specs: Vec<SortSpec>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindReplaceRequest {
    pub find: String,
    pub replacement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_sheets: Option<bool>,
    pub match_case: bool,
    pub match_entire_cell: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(rename = "type")]
    pub kind: String,
    pub role: Role,
    pub email_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reader,
    Commenter,
    Writer,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "reader" => Some(Self::Reader),
            "commenter" => Some(Self::Commenter),
            "writer" => Some(Self::Writer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reader => "reader",
            Self::Commenter => "commenter",
            Self::Writer => "writer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
    Xlsx,
    Ods,
    Tsv,
}

impl ExportFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "pdf" => Some(Self::Pdf),
            "xlsx" => Some(Self::Xlsx),
            "ods" => Some(Self::Ods),
            "tsv" => Some(Self::Tsv),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
            Self::Xlsx => "xlsx",
            Self::Ods => "ods",
            Self::Tsv => "tsv",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Pdf => "application/pdf",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Ods => "application/vnd.oasis.opendocument.spreadsheet",
            Self::Tsv => "text/tab-separated-values",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_union_serializes_one_field() {
        let request = Request::sort_range(SortRangeRequest {
            range: GridRange {
                sheet_id: 42,
                start_row_index: 1,
                end_row_index: 10,
                start_column_index: 0,
                end_column_index: 3,
            },
            sort_specs: vec![SortSpec {
                dimension_index: 1,
                sort_order: SortOrder::Descending,
            }],
        });

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded,
            json!({
                "sortRange": {
                    "range": {
                        "sheetId": 42,
                        "startRowIndex": 1,
                        "endRowIndex": 10,
                        "startColumnIndex": 0,
                        "endColumnIndex": 3
                    },
                    "sortSpecs": [
                        {"dimensionIndex": 1, "sortOrder": "DESCENDING"}
                    ]
                }
            })
        );
    }

    #[test]
    fn merge_type_parses_case_insensitively() {
        assert_eq!(MergeType::parse("merge_all"), Some(MergeType::MergeAll));
        assert_eq!(MergeType::parse("MERGE_ROWS"), Some(MergeType::MergeRows));
        assert_eq!(MergeType::parse("diagonal"), None);
    }

    #[test]
    fn export_mime_types_are_exact() {
        assert_eq!(
            ExportFormat::parse("xlsx").unwrap().mime_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
        assert_eq!(ExportFormat::parse("tsv").unwrap().mime_type(), "text/tab-separated-values");
        assert_eq!(ExportFormat::parse("bogus"), None);
    }
}
