use crate::api::http::GoogleApiClient;
use crate::args::ArgumentBag;
use crate::auth::build_token_provider;
use crate::config::ServerConfig;
use crate::resources;
use crate::state::AppState;
use crate::tools;
use anyhow::{Result, anyhow};
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        AnnotateAble, CallToolResult, Content, Implementation, ListResourcesResult,
        PaginatedRequestParam, RawResource, ReadResourceRequestParam, ReadResourceResult,
        ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_handler, tool_router,
    transport::stdio,
};
use serde_json::{Value, json};
use std::future::Future;
use std::sync::Arc;

const INSTRUCTIONS: &str = "\
Google Sheets MCP: read, write and manage spreadsheets and their Drive files.

WORKFLOW:
1) list_spreadsheets to find a spreadsheet, or create_spreadsheet for a new one
2) list_sheets for the tab names, then get_sheet_data / get_sheet_formulas to read
3) update_cells / batch_update_cells / append_data to write, clear_range to erase
4) Structural changes: add_rows, add_columns, create/copy/rename/delete/duplicate/hide/unhide sheet
5) format_cells, merge_cells, unmerge_cells, sort_range, find_replace for presentation
6) share_spreadsheet, list_permissions, remove_permission for access control

RANGES: A1 notation (e.g. A2:C10). Sheet names are passed separately and must
match exactly. Formatting and sorting require an explicit cell:cell range.

BATCH READS: get_multiple_sheet_data and get_multiple_spreadsheet_summary take
lists and report per-item errors inline instead of failing the whole call.

The spreadsheet://{spreadsheet_id}/info resource returns title and sheet
properties as JSON.";

#[derive(Clone)]
pub struct SheetsServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<SheetsServer>,
}

impl SheetsServer {
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let config = Arc::new(config);
        let http = reqwest::Client::new();
        let token_provider = build_token_provider(&config, http.clone()).await?;
        let client = Arc::new(GoogleApiClient::new(http, token_provider));
        let state = Arc::new(AppState::new(config, client.clone(), client));
        Ok(Self::from_state(state))
    }

    pub fn from_state(state: Arc<AppState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn run_stdio(self) -> Result<()> {
        let service = self
            .serve(stdio())
            .await
            .inspect_err(|error| tracing::error!("serving error: {:?}", error))?;
        service.waiting().await?;
        Ok(())
    }

    pub async fn run(self) -> Result<()> {
        self.run_stdio().await
    }

    /// Run a handler under the configured deadline and fold its outcome into
    /// the uniform response envelope. Handler failures become an `{"error"}`
    /// payload on a successful protocol result, never a protocol error.
    async fn dispatch<F>(&self, tool: &str, fut: F) -> CallToolResult
    where
        F: Future<Output = Result<Value>>,
    {
        tracing::info!(tool, "tool invocation requested");
        let result = if let Some(deadline) = self.state.config().tool_timeout() {
            match tokio::time::timeout(deadline, fut).await {
                Ok(result) => result,
                Err(_) => Err(anyhow!(
                    "tool '{tool}' timed out after {}ms",
                    deadline.as_millis()
                )),
            }
        } else {
            fut.await
        };
        into_envelope(result)
    }
}

fn into_envelope(result: Result<Value>) -> CallToolResult {
    let payload = match result {
        Ok(value) => value,
        // Alternate formatting keeps the full context chain in one line.
        Err(error) => json!({"error": format!("{error:#}")}),
    };
    let text = serde_json::to_string(&payload)
        .unwrap_or_else(|e| json!({"error": format!("failed to marshal result: {e}")}).to_string());
    CallToolResult {
        content: vec![Content::text(text)],
        structured_content: None,
        is_error: Some(false),
        meta: None,
    }
}

#[tool_router]
impl SheetsServer {
    #[tool(
        name = "get_sheet_data",
        description = "Get data from a specific sheet in a Google Spreadsheet. Args: spreadsheet_id, sheet, range? (A1 notation), include_grid_data? (bool)"
    )]
    pub async fn get_sheet_data(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "get_sheet_data",
                tools::data::get_sheet_data(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "get_sheet_formulas",
        description = "Get formulas from a specific sheet in a Google Spreadsheet. Args: spreadsheet_id, sheet, range?"
    )]
    pub async fn get_sheet_formulas(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "get_sheet_formulas",
                tools::data::get_sheet_formulas(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "update_cells",
        description = "Update cells in a Google Spreadsheet. Args: spreadsheet_id, sheet, range (A1 notation), data (2D array of values)"
    )]
    pub async fn update_cells(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "update_cells",
                tools::data::update_cells(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "batch_update_cells",
        description = "Batch update multiple ranges in a Google Spreadsheet. Args: spreadsheet_id, sheet, ranges (object mapping range strings to 2D arrays)"
    )]
    pub async fn batch_update_cells(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "batch_update_cells",
                tools::data::batch_update_cells(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "append_data",
        description = "Append data to the end of a sheet without specifying exact range. Args: spreadsheet_id, sheet, data (2D array of values)"
    )]
    pub async fn append_data(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "append_data",
                tools::data::append_data(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "clear_range",
        description = "Clear content from a specific range in a sheet. Args: spreadsheet_id, sheet, range?"
    )]
    pub async fn clear_range(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "clear_range",
                tools::data::clear_range(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "add_rows",
        description = "Add rows to a sheet in a Google Spreadsheet. Args: spreadsheet_id, sheet, count, start_row? (0-based, default 0)"
    )]
    pub async fn add_rows(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "add_rows",
                tools::structure::add_rows(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "add_columns",
        description = "Add columns to a sheet in a Google Spreadsheet. Args: spreadsheet_id, sheet, count, start_column? (0-based, default 0)"
    )]
    pub async fn add_columns(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "add_columns",
                tools::structure::add_columns(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "list_sheets",
        description = "List all sheets in a Google Spreadsheet. Args: spreadsheet_id"
    )]
    pub async fn list_sheets(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "list_sheets",
                tools::structure::list_sheets(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "create_sheet",
        description = "Create a new sheet tab in an existing Google Spreadsheet. Args: spreadsheet_id, title"
    )]
    pub async fn create_sheet(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "create_sheet",
                tools::structure::create_sheet(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "copy_sheet",
        description = "Copy a sheet from one spreadsheet to another. Args: src_spreadsheet, src_sheet, dst_spreadsheet, dst_sheet"
    )]
    pub async fn copy_sheet(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "copy_sheet",
                tools::structure::copy_sheet(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "rename_sheet",
        description = "Rename a sheet in a Google Spreadsheet. Args: spreadsheet, sheet, new_name"
    )]
    pub async fn rename_sheet(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "rename_sheet",
                tools::structure::rename_sheet(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "delete_sheet",
        description = "Delete a sheet tab from a spreadsheet. Args: spreadsheet_id, sheet"
    )]
    pub async fn delete_sheet(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "delete_sheet",
                tools::structure::delete_sheet(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "duplicate_sheet",
        description = "Duplicate a sheet within the same spreadsheet. Args: spreadsheet_id, sheet, new_title?"
    )]
    pub async fn duplicate_sheet(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "duplicate_sheet",
                tools::structure::duplicate_sheet(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "hide_sheet",
        description = "Hide a sheet in a spreadsheet. Args: spreadsheet_id, sheet"
    )]
    pub async fn hide_sheet(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "hide_sheet",
                tools::structure::hide_sheet(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "unhide_sheet",
        description = "Unhide a sheet in a spreadsheet. Args: spreadsheet_id, sheet"
    )]
    pub async fn unhide_sheet(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "unhide_sheet",
                tools::structure::unhide_sheet(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "format_cells",
        description = "Apply formatting to cells (colors, fonts, text styles). Args: spreadsheet_id, sheet, range (A1:B2 notation), background_color? ({red,green,blue,alpha}), text_color?, bold?, italic?, font_size?"
    )]
    pub async fn format_cells(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "format_cells",
                tools::format::format_cells(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "merge_cells",
        description = "Merge cells in a range. Args: spreadsheet_id, sheet, range, merge_type? (MERGE_ALL, MERGE_COLUMNS or MERGE_ROWS)"
    )]
    pub async fn merge_cells(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "merge_cells",
                tools::format::merge_cells(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "unmerge_cells",
        description = "Unmerge cells in a range. Args: spreadsheet_id, sheet, range"
    )]
    pub async fn unmerge_cells(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "unmerge_cells",
                tools::format::unmerge_cells(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "sort_range",
        description = "Sort a range of data in a sheet. Args: spreadsheet_id, sheet, range, sort_column? (0-based, default 0), ascending? (default true)"
    )]
    pub async fn sort_range(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "sort_range",
                tools::format::sort_range(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "find_replace",
        description = "Find and replace text in a sheet or entire spreadsheet. Args: spreadsheet_id, find, replacement?, sheet? (required unless all_sheets), all_sheets?, match_case?, match_entire_cell?"
    )]
    pub async fn find_replace(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "find_replace",
                tools::format::find_replace(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "list_spreadsheets",
        description = "List all spreadsheets in the configured Google Drive folder"
    )]
    pub async fn list_spreadsheets(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "list_spreadsheets",
                tools::drive::list_spreadsheets(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "create_spreadsheet",
        description = "Create a new Google Spreadsheet. Args: title"
    )]
    pub async fn create_spreadsheet(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "create_spreadsheet",
                tools::drive::create_spreadsheet(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "share_spreadsheet",
        description = "Share a Google Spreadsheet with multiple users. Args: spreadsheet_id, recipients (list of {email_address, role}), send_notification? (default true)"
    )]
    pub async fn share_spreadsheet(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "share_spreadsheet",
                tools::drive::share_spreadsheet(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "list_permissions",
        description = "List all permissions for a spreadsheet. Args: spreadsheet_id"
    )]
    pub async fn list_permissions(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "list_permissions",
                tools::drive::list_permissions(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "remove_permission",
        description = "Remove a permission from a spreadsheet. Args: spreadsheet_id, permission_id"
    )]
    pub async fn remove_permission(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "remove_permission",
                tools::drive::remove_permission(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "export_spreadsheet",
        description = "Export a spreadsheet to different formats (csv, pdf, xlsx, ods, tsv). Args: spreadsheet_id, format? (default csv)"
    )]
    pub async fn export_spreadsheet(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "export_spreadsheet",
                tools::drive::export_spreadsheet(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "get_multiple_sheet_data",
        description = "Get data from multiple specific ranges in Google Spreadsheets. Args: queries (list of {spreadsheet_id, sheet, range})"
    )]
    pub async fn get_multiple_sheet_data(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "get_multiple_sheet_data",
                tools::batch::get_multiple_sheet_data(self.state.clone(), args),
            )
            .await)
    }

    #[tool(
        name = "get_multiple_spreadsheet_summary",
        description = "Get a summary of multiple Google Spreadsheets. Args: spreadsheet_ids (list), rows_to_fetch? (default 5)"
    )]
    pub async fn get_multiple_spreadsheet_summary(
        &self,
        Parameters(args): Parameters<ArgumentBag>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self
            .dispatch(
                "get_multiple_spreadsheet_summary",
                tools::batch::get_multiple_spreadsheet_summary(self.state.clone(), args),
            )
            .await)
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for SheetsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..ServerInfo::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let mut resource = RawResource::new("spreadsheet://{spreadsheet_id}/info", "Spreadsheet Info");
        resource.description = Some("Get basic information about a Google Spreadsheet".to_string());
        resource.mime_type = Some("application/json".to_string());
        Ok(ListResourcesResult {
            meta: None,
            resources: vec![resource.no_annotation()],
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let spreadsheet_id = resources::parse_info_uri(&request.uri)
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

        let info = resources::spreadsheet_info(&self.state, &spreadsheet_id)
            .await
            .map_err(|e| McpError::internal_error(format!("{e:#}"), None))?;

        let text = serde_json::to_string_pretty(&info)
            .map_err(|e| McpError::internal_error(format!("failed to marshal info: {e}"), None))?;

        let mut contents = ResourceContents::text(text, request.uri);
        if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
            *mime_type = Some("application/json".to_string());
        }
        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }
}
