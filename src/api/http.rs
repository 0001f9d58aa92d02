//! Live HTTP implementation of the [`SheetsApi`] and [`DriveApi`] seams,
//! backed by the Sheets v4 and Drive v3 REST endpoints.

use crate::auth::TokenProvider;
use crate::errors::ApiError;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;

use super::model::{BatchUpdateValuesRequest, Permission, Request, ValueRange, ValueRender};
use super::{DriveApi, SheetsApi};

const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4";
const DRIVE_BASE: &str = "https://www.googleapis.com/drive/v3";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

pub struct GoogleApiClient {
    http: reqwest::Client,
    token_provider: Arc<dyn TokenProvider>,
    sheets_base: String,
    drive_base: String,
}

impl GoogleApiClient {
    pub fn new(http: reqwest::Client, token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            http,
            token_provider,
            sheets_base: SHEETS_BASE.to_string(),
            drive_base: DRIVE_BASE.to_string(),
        }
    }

    /// Point the client at alternate endpoints (local emulators, proxies).
    pub fn with_base_urls(mut self, sheets_base: String, drive_base: String) -> Self {
        self.sheets_base = sheets_base;
        self.drive_base = drive_base;
        self
    }

    async fn send(
        &self,
        method: Method,
        url: String,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let token = self
            .token_provider
            .access_token()
            .await
            .map_err(|e| ApiError::Auth(format!("{e:#}")))?;

        let mut request = self.http.request(method, &url).bearer_auth(token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Surface the service's own message when the error body carries one.
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(Value::as_str)
                        .map(str::to_owned)
                })
                .unwrap_or(text);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT || text.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str, suffix: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}{}",
            self.sheets_base,
            spreadsheet_id,
            urlencoding::encode(range),
            suffix,
        )
    }
}

#[async_trait]
impl SheetsApi for GoogleApiClient {
    async fn get_spreadsheet(
        &self,
        spreadsheet_id: &str,
        fields: Option<&str>,
        ranges: &[String],
        include_grid_data: bool,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/spreadsheets/{}", self.sheets_base, spreadsheet_id);
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(fields) = fields {
            query.push(("fields", fields));
        }
        for range in ranges {
            query.push(("ranges", range.as_str()));
        }
        if include_grid_data {
            query.push(("includeGridData", "true"));
        }
        self.send(Method::GET, url, &query, None).await
    }

    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        render: ValueRender,
    ) -> Result<ValueRange, ApiError> {
        let url = self.values_url(spreadsheet_id, range, "");
        let value = self
            .send(
                Method::GET,
                url,
                &[("valueRenderOption", render.as_str())],
                None,
            )
            .await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &ValueRange,
    ) -> Result<Value, ApiError> {
        let url = self.values_url(spreadsheet_id, range, "");
        let body = serde_json::to_value(values).unwrap_or(Value::Null);
        self.send(
            Method::PUT,
            url,
            &[("valueInputOption", super::model::USER_ENTERED)],
            Some(&body),
        )
        .await
    }

    async fn batch_update_values(
        &self,
        spreadsheet_id: &str,
        request: &BatchUpdateValuesRequest,
    ) -> Result<Value, ApiError> {
        let url = format!(
            "{}/spreadsheets/{}/values:batchUpdate",
            self.sheets_base, spreadsheet_id
        );
        let body = serde_json::to_value(request).unwrap_or(Value::Null);
        self.send(Method::POST, url, &[], Some(&body)).await
    }

    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: &ValueRange,
    ) -> Result<Value, ApiError> {
        let url = self.values_url(spreadsheet_id, range, ":append");
        let body = serde_json::to_value(values).unwrap_or(Value::Null);
        self.send(
            Method::POST,
            url,
            &[("valueInputOption", super::model::USER_ENTERED)],
            Some(&body),
        )
        .await
    }

    async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<Value, ApiError> {
        let url = self.values_url(spreadsheet_id, range, ":clear");
        self.send(Method::POST, url, &[], Some(&json!({}))).await
    }

    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Request>,
    ) -> Result<Value, ApiError> {
        let url = format!(
            "{}/spreadsheets/{}:batchUpdate",
            self.sheets_base, spreadsheet_id
        );
        let body = json!({ "requests": requests });
        self.send(Method::POST, url, &[], Some(&body)).await
    }

    async fn copy_sheet_to(
        &self,
        src_spreadsheet_id: &str,
        sheet_id: i64,
        dst_spreadsheet_id: &str,
    ) -> Result<Value, ApiError> {
        let url = format!(
            "{}/spreadsheets/{}/sheets/{}:copyTo",
            self.sheets_base, src_spreadsheet_id, sheet_id
        );
        let body = json!({ "destinationSpreadsheetId": dst_spreadsheet_id });
        self.send(Method::POST, url, &[], Some(&body)).await
    }
}

#[async_trait]
impl DriveApi for GoogleApiClient {
    async fn list_spreadsheet_files(
        &self,
        folder_id: Option<&str>,
    ) -> Result<Vec<Value>, ApiError> {
        let mut q = format!("mimeType='{SPREADSHEET_MIME}'");
        if let Some(folder) = folder_id {
            q.push_str(&format!(" and '{folder}' in parents"));
        }
        let url = format!("{}/files", self.drive_base);
        let query = [
            ("q", q.as_str()),
            ("spaces", "drive"),
            ("includeItemsFromAllDrives", "true"),
            ("supportsAllDrives", "true"),
            ("fields", "files(id, name)"),
            ("orderBy", "modifiedTime desc"),
        ];
        let response = self.send(Method::GET, url, &query, None).await?;
        Ok(response
            .get("files")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_spreadsheet_file(
        &self,
        title: &str,
        folder_id: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut body = json!({
            "name": title,
            "mimeType": SPREADSHEET_MIME,
        });
        if let Some(folder) = folder_id {
            body["parents"] = json!([folder]);
        }
        let url = format!("{}/files", self.drive_base);
        let query = [
            ("supportsAllDrives", "true"),
            ("fields", "id, name, parents"),
        ];
        self.send(Method::POST, url, &query, Some(&body)).await
    }

    async fn create_permission(
        &self,
        file_id: &str,
        permission: &Permission,
        send_notification: bool,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/files/{}/permissions", self.drive_base, file_id);
        let notify = if send_notification { "true" } else { "false" };
        let query = [
            ("sendNotificationEmail", notify),
            ("supportsAllDrives", "true"),
            ("fields", "id"),
        ];
        let body = serde_json::to_value(permission).unwrap_or(Value::Null);
        self.send(Method::POST, url, &query, Some(&body)).await
    }

    async fn list_permissions(&self, file_id: &str) -> Result<Value, ApiError> {
        let url = format!("{}/files/{}/permissions", self.drive_base, file_id);
        let query = [
            ("supportsAllDrives", "true"),
            ("fields", "permissions(id, type, role, emailAddress)"),
        ];
        self.send(Method::GET, url, &query, None).await
    }

    async fn delete_permission(
        &self,
        file_id: &str,
        permission_id: &str,
    ) -> Result<Value, ApiError> {
        let url = format!(
            "{}/files/{}/permissions/{}",
            self.drive_base, file_id, permission_id
        );
        self.send(
            Method::DELETE,
            url,
            &[("supportsAllDrives", "true")],
            None,
        )
        .await
    }
}
