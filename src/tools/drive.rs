//! Drive-side operations: file listing/creation, sharing, export.

use crate::api::model::{ExportFormat, Permission, Role};
use crate::args::ArgumentBag;
use crate::errors::UnsupportedFormat;
use crate::state::AppState;
use anyhow::{Context, Result, bail};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use super::ensure_required;

pub async fn list_spreadsheets(state: Arc<AppState>, _args: ArgumentBag) -> Result<Value> {
    let folder = state.config().drive_folder_id.clone();
    match &folder {
        Some(folder) => tracing::info!(%folder, "searching for spreadsheets in folder"),
        None => tracing::info!("searching for spreadsheets in 'My Drive'"),
    }

    let files = state
        .drive()
        .list_spreadsheet_files(folder.as_deref())
        .await
        .context("failed to list spreadsheets")?;

    let spreadsheets: Vec<Value> = files
        .iter()
        .map(|file| {
            json!({
                "id": file.get("id"),
                "title": file.get("name"),
            })
        })
        .collect();

    Ok(Value::Array(spreadsheets))
}

pub async fn create_spreadsheet(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let title = args.get("title", String::new());
    ensure_required(&[("title", &title)])?;

    let folder = state.config().drive_folder_id.clone();
    let file = state
        .drive()
        .create_spreadsheet_file(&title, folder.as_deref())
        .await
        .context("failed to create spreadsheet")?;

    let spreadsheet_id = file.get("id").cloned().unwrap_or(Value::Null);
    tracing::info!(id = %spreadsheet_id, "spreadsheet created");

    let folder = file
        .pointer("/parents/0")
        .and_then(Value::as_str)
        .unwrap_or("root");

    Ok(json!({
        "spreadsheetId": spreadsheet_id,
        "title": file.get("name"),
        "folder": folder,
    }))
}

pub async fn share_spreadsheet(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let send_notification = args.get("send_notification", true);
    ensure_required(&[("spreadsheet_id", &spreadsheet_id)])?;

    let Some(recipients) = args.raw("recipients") else {
        bail!("recipients is required");
    };
    let Ok(recipients) = serde_json::from_value::<Vec<HashMap<String, String>>>(recipients.clone())
    else {
        bail!("invalid recipients format");
    };

    let mut successes = Vec::new();
    let mut failures = Vec::new();

    for recipient in recipients {
        let email = recipient.get("email_address").cloned().unwrap_or_default();
        let role = match recipient.get("role").map(String::as_str) {
            None | Some("") => "writer".to_string(),
            Some(role) => role.to_string(),
        };

        if email.is_empty() {
            failures.push(json!({
                "email_address": null,
                "error": "Missing email_address in recipient entry.",
            }));
            continue;
        }

        let Some(parsed_role) = Role::parse(&role) else {
            failures.push(json!({
                "email_address": email,
                "error": format!(
                    "Invalid role '{role}'. Must be 'reader', 'commenter', or 'writer'."
                ),
            }));
            continue;
        };

        let permission = Permission {
            kind: "user".to_string(),
            role: parsed_role,
            email_address: email.clone(),
        };
        match state
            .drive()
            .create_permission(&spreadsheet_id, &permission, send_notification)
            .await
        {
            Ok(created) => successes.push(json!({
                "email_address": email,
                "role": parsed_role.as_str(),
                "permissionId": created.get("id"),
            })),
            Err(e) => failures.push(json!({
                "email_address": email,
                "error": format!("Failed to share: {e}"),
            })),
        }
    }

    Ok(json!({
        "successes": successes,
        "failures": failures,
    }))
}

pub async fn list_permissions(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    ensure_required(&[("spreadsheet_id", &spreadsheet_id)])?;

    state
        .drive()
        .list_permissions(&spreadsheet_id)
        .await
        .context("failed to list permissions")
}

pub async fn remove_permission(state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    let permission_id = args.get("permission_id", String::new());
    ensure_required(&[
        ("spreadsheet_id", &spreadsheet_id),
        ("permission_id", &permission_id),
    ])?;

    state
        .drive()
        .delete_permission(&spreadsheet_id, &permission_id)
        .await
        .context("failed to remove permission")?;

    Ok(json!({
        "spreadsheetId": spreadsheet_id,
        "permissionId": permission_id,
        "removed": true,
    }))
}

/// Resolves the export mime type and builds a download link. No remote call
/// is made; the caller follows the URL with their own credentials.
pub async fn export_spreadsheet(_state: Arc<AppState>, args: ArgumentBag) -> Result<Value> {
    let spreadsheet_id = args.get("spreadsheet_id", String::new());
    ensure_required(&[("spreadsheet_id", &spreadsheet_id)])?;

    let format = args.get("format", "csv".to_string()).to_lowercase();
    let Some(format) = ExportFormat::parse(&format) else {
        return Err(UnsupportedFormat(format).into());
    };

    Ok(json!({
        "spreadsheetId": spreadsheet_id,
        "format": format.as_str(),
        "mimeType": format.mime_type(),
        "exportUrl": format!(
            "https://docs.google.com/spreadsheets/d/{spreadsheet_id}/export?format={format}"
        ),
    }))
}
