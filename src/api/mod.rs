//! Remote collaborator seams for the Sheets and Drive services.
//!
//! Handlers speak to these traits, never to HTTP directly; the live
//! implementation lives in [`http`], tests inject scripted doubles.

pub mod http;
pub mod model;

use crate::errors::ApiError;
use async_trait::async_trait;
use serde_json::Value;

use model::{BatchUpdateValuesRequest, Permission, Request, ValueRange, ValueRender};

#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Fetch spreadsheet metadata, optionally narrowed by a field mask and
    /// range list.
    async fn get_spreadsheet(
        &self,
        spreadsheet_id: &str,
        fields: Option<&str>,
        ranges: &[String],
        include_grid_data: bool,
    ) -> Result<Value, ApiError>;

    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        render: ValueRender,
    ) -> Result<ValueRange, ApiError>;

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &ValueRange,
    ) -> Result<Value, ApiError>;

    async fn batch_update_values(
        &self,
        spreadsheet_id: &str,
        request: &BatchUpdateValuesRequest,
    ) -> Result<Value, ApiError>;

    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &ValueRange,
    ) -> Result<Value, ApiError>;

    async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<Value, ApiError>;

    /// Apply a list of structural requests in one `batchUpdate` call.
    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Request>,
    ) -> Result<Value, ApiError>;

    /// Copy one sheet into another spreadsheet; returns the new sheet's
    /// properties.
    async fn copy_sheet_to(
        &self,
        src_spreadsheet_id: &str,
        sheet_id: i64,
        dst_spreadsheet_id: &str,
    ) -> Result<Value, ApiError>;
}

#[async_trait]
pub trait DriveApi: Send + Sync {
    /// List spreadsheet files, scoped to a folder when one is given.
    async fn list_spreadsheet_files(&self, folder_id: Option<&str>)
        -> Result<Vec<Value>, ApiError>;

    async fn create_spreadsheet_file(
        &self,
        title: &str,
        folder_id: Option<&str>,
    ) -> Result<Value, ApiError>;

    async fn create_permission(
        &self,
        file_id: &str,
        permission: &Permission,
        send_notification: bool,
    ) -> Result<Value, ApiError>;

    async fn list_permissions(&self, file_id: &str) -> Result<Value, ApiError>;

    async fn delete_permission(&self, file_id: &str, permission_id: &str)
        -> Result<Value, ApiError>;
}
