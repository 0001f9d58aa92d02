use crate::api::{DriveApi, SheetsApi};
use crate::config::ServerConfig;
use crate::errors::SheetNotFound;
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;

/// Shared handler context: configuration plus the two remote seams.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    sheets: Arc<dyn SheetsApi>,
    drive: Arc<dyn DriveApi>,
}

impl AppState {
    pub fn new(
        config: Arc<ServerConfig>,
        sheets: Arc<dyn SheetsApi>,
        drive: Arc<dyn DriveApi>,
    ) -> Self {
        Self {
            config,
            sheets,
            drive,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn sheets(&self) -> &dyn SheetsApi {
        self.sheets.as_ref()
    }

    pub fn drive(&self) -> &dyn DriveApi {
        self.drive.as_ref()
    }

    /// Resolve a sheet title to its numeric ID with a narrow metadata fetch.
    /// Titles match exactly; there is no fuzzy or case-insensitive fallback.
    pub async fn resolve_sheet_id(&self, spreadsheet_id: &str, sheet: &str) -> Result<i64> {
        let spreadsheet = self
            .sheets
            .get_spreadsheet(
                spreadsheet_id,
                Some("sheets(properties(sheetId,title))"),
                &[],
                false,
            )
            .await
            .context("failed to get spreadsheet metadata")?;

        let found = spreadsheet
            .get("sheets")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|s| s.get("properties"))
            .find(|p| p.get("title").and_then(Value::as_str) == Some(sheet))
            .and_then(|p| p.get("sheetId"))
            .and_then(Value::as_i64);

        found.ok_or_else(|| SheetNotFound(sheet.to_string()).into())
    }
}
