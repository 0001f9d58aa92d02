#![allow(dead_code)]

use async_trait::async_trait;
use gsheets_mcp::api::model::{BatchUpdateValuesRequest, Permission, Request, ValueRange, ValueRender};
use gsheets_mcp::api::{DriveApi, SheetsApi};
use gsheets_mcp::args::ArgumentBag;
use gsheets_mcp::config::ServerConfig;
use gsheets_mcp::errors::ApiError;
use gsheets_mcp::state::AppState;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

pub fn bag(value: Value) -> ArgumentBag {
    serde_json::from_value(value).unwrap()
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        drive_folder_id: None,
        access_token: Some("test-token".to_string()),
        credentials_config: None,
        credentials_path: PathBuf::from("credentials.json"),
        tool_timeout_ms: 0,
    }
}

/// Scripted double for both remote seams. Canned responses are keyed by
/// spreadsheet id (metadata) or id + range (values); every mutating call is
/// recorded for assertions.
#[derive(Default)]
pub struct StubApi {
    pub metadata: HashMap<String, Value>,
    pub values: HashMap<(String, String), Vec<Vec<Value>>>,
    pub batch_reply: Option<Value>,
    pub copy_reply: Option<Value>,
    pub files: Vec<Value>,
    pub created_file: Option<Value>,
    pub fail_permission_for: Vec<String>,

    pub batch_updates: Mutex<Vec<(String, Value)>>,
    pub value_reads: Mutex<Vec<(String, String)>>,
    pub value_writes: Mutex<Vec<(String, String, Value)>>,
    pub copies: Mutex<Vec<(String, i64, String)>>,
    pub created_permissions: Mutex<Vec<(String, Value, bool)>>,
    pub deleted_permissions: Mutex<Vec<(String, String)>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register spreadsheet metadata with the given title and (sheet title,
    /// sheet id) pairs, mirroring the narrowed get-spreadsheet response.
    pub fn with_spreadsheet(mut self, id: &str, title: &str, sheets: &[(&str, i64)]) -> Self {
        let sheets: Vec<Value> = sheets
            .iter()
            .map(|(name, sheet_id)| {
                json!({"properties": {"title": name, "sheetId": sheet_id}})
            })
            .collect();
        self.metadata.insert(
            id.to_string(),
            json!({"properties": {"title": title}, "sheets": sheets}),
        );
        self
    }

    pub fn with_values(mut self, id: &str, range: &str, values: Value) -> Self {
        let values: Vec<Vec<Value>> = serde_json::from_value(values).unwrap();
        self.values
            .insert((id.to_string(), range.to_string()), values);
        self
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::Status {
            status: 404,
            message: format!("{what} not found"),
        }
    }
}

#[async_trait]
impl SheetsApi for StubApi {
    async fn get_spreadsheet(
        &self,
        spreadsheet_id: &str,
        _fields: Option<&str>,
        _ranges: &[String],
        _include_grid_data: bool,
    ) -> Result<Value, ApiError> {
        self.metadata
            .get(spreadsheet_id)
            .cloned()
            .ok_or_else(|| Self::not_found("spreadsheet"))
    }

    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        _render: ValueRender,
    ) -> Result<ValueRange, ApiError> {
        self.value_reads
            .lock()
            .push((spreadsheet_id.to_string(), range.to_string()));
        let key = (spreadsheet_id.to_string(), range.to_string());
        let values = self
            .values
            .get(&key)
            .cloned()
            .ok_or_else(|| Self::not_found("range"))?;
        Ok(ValueRange {
            range: Some(range.to_string()),
            values,
        })
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &ValueRange,
    ) -> Result<Value, ApiError> {
        self.value_writes.lock().push((
            spreadsheet_id.to_string(),
            range.to_string(),
            serde_json::to_value(values).unwrap(),
        ));
        Ok(json!({
            "spreadsheetId": spreadsheet_id,
            "updatedRange": range,
            "updatedRows": values.values.len(),
        }))
    }

    async fn batch_update_values(
        &self,
        spreadsheet_id: &str,
        request: &BatchUpdateValuesRequest,
    ) -> Result<Value, ApiError> {
        self.value_writes.lock().push((
            spreadsheet_id.to_string(),
            "batch".to_string(),
            serde_json::to_value(request).unwrap(),
        ));
        Ok(json!({
            "spreadsheetId": spreadsheet_id,
            "totalUpdatedRanges": request.data.len(),
        }))
    }

    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &ValueRange,
    ) -> Result<Value, ApiError> {
        self.value_writes.lock().push((
            spreadsheet_id.to_string(),
            format!("{range}:append"),
            serde_json::to_value(values).unwrap(),
        ));
        Ok(json!({"spreadsheetId": spreadsheet_id, "tableRange": range}))
    }

    async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<Value, ApiError> {
        self.value_writes.lock().push((
            spreadsheet_id.to_string(),
            format!("{range}:clear"),
            Value::Null,
        ));
        Ok(json!({"spreadsheetId": spreadsheet_id, "clearedRange": range}))
    }

    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Request>,
    ) -> Result<Value, ApiError> {
        self.batch_updates.lock().push((
            spreadsheet_id.to_string(),
            serde_json::to_value(&requests).unwrap(),
        ));
        Ok(self
            .batch_reply
            .clone()
            .unwrap_or_else(|| json!({"spreadsheetId": spreadsheet_id, "replies": [{}]})))
    }

    async fn copy_sheet_to(
        &self,
        src_spreadsheet_id: &str,
        sheet_id: i64,
        dst_spreadsheet_id: &str,
    ) -> Result<Value, ApiError> {
        self.copies.lock().push((
            src_spreadsheet_id.to_string(),
            sheet_id,
            dst_spreadsheet_id.to_string(),
        ));
        Ok(self
            .copy_reply
            .clone()
            .unwrap_or_else(|| json!({"sheetId": 999, "title": "Copy of Sheet"})))
    }
}

#[async_trait]
impl DriveApi for StubApi {
    async fn list_spreadsheet_files(
        &self,
        _folder_id: Option<&str>,
    ) -> Result<Vec<Value>, ApiError> {
        Ok(self.files.clone())
    }

    async fn create_spreadsheet_file(
        &self,
        title: &str,
        folder_id: Option<&str>,
    ) -> Result<Value, ApiError> {
        Ok(self.created_file.clone().unwrap_or_else(|| {
            json!({
                "id": "new-spreadsheet",
                "name": title,
                "parents": folder_id.map(|f| vec![f]),
            })
        }))
    }

    async fn create_permission(
        &self,
        file_id: &str,
        permission: &Permission,
        send_notification: bool,
    ) -> Result<Value, ApiError> {
        let encoded = serde_json::to_value(permission).unwrap();
        if self
            .fail_permission_for
            .iter()
            .any(|email| encoded["emailAddress"] == json!(email))
        {
            return Err(ApiError::Status {
                status: 403,
                message: "cannot share with this user".to_string(),
            });
        }
        self.created_permissions.lock().push((
            file_id.to_string(),
            encoded,
            send_notification,
        ));
        Ok(json!({"id": "perm-1"}))
    }

    async fn list_permissions(&self, file_id: &str) -> Result<Value, ApiError> {
        Ok(json!({
            "permissions": [
                {"id": "perm-1", "type": "user", "role": "writer", "emailAddress": "a@example.com"}
            ],
            "fileId": file_id,
        }))
    }

    async fn delete_permission(
        &self,
        file_id: &str,
        permission_id: &str,
    ) -> Result<Value, ApiError> {
        self.deleted_permissions
            .lock()
            .push((file_id.to_string(), permission_id.to_string()));
        Ok(Value::Null)
    }
}

pub fn state_with(api: Arc<StubApi>) -> Arc<AppState> {
    Arc::new(AppState::new(Arc::new(test_config()), api.clone(), api))
}
