/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads line-delimited JSON-RPC requests from stdin
/// 2. Dispatches tool calls to the habit tools with the server's "today"
/// 3. Writes JSON-RPC responses to stdout

use chrono::NaiveDate;
use schemars::{schema_for, JsonSchema};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::storage::StorageError;
use crate::tools;
use crate::{GrowMateServer, ServerError};

/// MCP server that handles communication with the client
pub struct McpServer {
    /// The underlying habit server
    growmate: GrowMateServer,
    /// Whether the client has confirmed initialization
    initialized: bool,
}

/// A tools/call failure that is reported as a JSON-RPC error rather than a
/// tool result
#[derive(Debug)]
struct CallError {
    code: i32,
    message: String,
}

fn parse_arguments<T: DeserializeOwned>(arguments: Option<Value>) -> Result<T, CallError> {
    serde_json::from_value(arguments.unwrap_or_else(|| json!({}))).map_err(|e| CallError {
        code: error_codes::INVALID_PARAMS,
        message: format!("Invalid arguments: {}", e),
    })
}

fn tool_definition<T: JsonSchema>(
    name: &str,
    description: &str,
) -> Result<ToolDefinition, serde_json::Error> {
    Ok(ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schema_for!(T))?,
    })
}

/// Every tool this server exposes, with schemas derived from the parameter
/// structs
pub fn tool_definitions() -> Result<Vec<ToolDefinition>, serde_json::Error> {
    Ok(vec![
        tool_definition::<tools::CreateHabitParams>(
            "habit_create",
            "Create a new habit to track",
        )?,
        tool_definition::<tools::ToggleHabitParams>(
            "habit_toggle",
            "Mark a habit done for a day (today by default), or undo it if already done. Returns the updated streak",
        )?,
        tool_definition::<tools::UpdateHabitParams>(
            "habit_update",
            "Change a habit's title, description, category, color, frequency, reminder or target days",
        )?,
        tool_definition::<tools::DeleteHabitParams>(
            "habit_delete",
            "Permanently delete a habit and its completion history",
        )?,
        tool_definition::<tools::ListHabitsParams>(
            "habit_list",
            "List habits with streaks, completion counts and success rates",
        )?,
        tool_definition::<tools::StatusParams>(
            "habit_status",
            "Refresh and report current and longest streaks for one or all habits",
        )?,
        tool_definition::<tools::InsightsParams>(
            "habit_insights",
            "Weekly analytics (Monday to Sunday) across habits, with a 7-day completion chart",
        )?,
        tool_definition::<tools::HistoryParams>(
            "habit_history",
            "Day-by-day completion history for one habit over the last N days or one calendar month",
        )?,
        tool_definition::<tools::ResetAllParams>(
            "habit_reset_all",
            "Permanently delete every habit and all completion history. Requires confirm: true",
        )?,
    ])
}

/// Turn a tool's outcome into an MCP tool result
fn tool_result<R: Serialize>(
    tool: &str,
    outcome: Result<R, StorageError>,
    message: impl FnOnce(&R) -> String,
) -> Result<ToolCallResult, CallError> {
    match outcome {
        Ok(response) => {
            let text = message(&response);
            let data = serde_json::to_value(&response).map_err(|e| CallError {
                code: error_codes::INTERNAL_ERROR,
                message: format!("Failed to serialize {} response: {}", tool, e),
            })?;
            Ok(ToolCallResult::success_with_data(text, &data))
        }
        Err(e) => {
            warn!(
                "Tool {} failed (code {}): {}",
                tool,
                storage_error_to_json_rpc_code(&e),
                e
            );
            Ok(ToolCallResult::error(e.to_string()))
        }
    }
}

fn format_habit_list(response: &tools::ListHabitsResponse) -> String {
    if response.habits.is_empty() {
        return "No habits found. Create your first habit to get started!".to_string();
    }

    let header = format!(
        "📋 Habit Summary ({} habits)\n\n",
        response.summary.total_habits
    );
    let detailed_list = response
        .habits
        .iter()
        .map(|h| {
            format!(
                "🎯 {} ({}) [{}]\n   📅 {} | 🔥 Streak: {} days (best {}) | 📊 Rate: {}% | ✅ Total: {}{}",
                h.title,
                h.category,
                h.habit_id,
                h.frequency,
                h.current_streak,
                h.longest_streak,
                h.success_rate,
                h.total_completions,
                if h.completed_today { " | done today" } else { "" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    let overall = format!(
        "\n\n📊 Overall\n- Completed today: {} of {}\n- Average success rate: {:.1}%",
        response.summary.completed_today,
        response.summary.total_habits,
        response.summary.avg_success_rate
    );

    format!("{}{}{}", header, detailed_list, overall)
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(growmate: GrowMateServer) -> Self {
        Self {
            growmate,
            initialized: false,
        }
    }

    /// Whether the client has sent its `initialized` notification
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.handle_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let raw: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        let raw_id = raw.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    raw_id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                    None,
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                raw_id,
                error_codes::INVALID_REQUEST,
                format!("Unsupported JSON-RPC version '{}'", request.jsonrpc),
                None,
            ));
        }

        self.handle_request(request).await
    }

    /// Handle a JSON-RPC request
    async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            match request.method.as_str() {
                "initialized" | "notifications/initialized" => {
                    self.initialized = true;
                    info!("MCP client finished initialization");
                }
                other => debug!("Ignoring notification '{}'", other),
            }
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, json!({}))
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        };

        Some(response)
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();
        info!(
            "MCP client connected: {} (protocol {})",
            params
                .client_info
                .as_ref()
                .map_or("unknown", |c| c.name.as_str()),
            params.protocol_version.as_deref().unwrap_or("unspecified")
        );

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "GrowMate MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None),
        }
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        match tool_definitions() {
            Ok(tools) => JsonRpcResponse::success(id, json!({ "tools": tools })),
            Err(e) => JsonRpcResponse::error(
                id,
                error_codes::INTERNAL_ERROR,
                format!("Failed to build tool schemas: {}", e),
                None,
            ),
        }
    }

    /// Handle tools/call request
    async fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let call: ToolCallParams = match params.map(serde_json::from_value::<ToolCallParams>) {
            Some(Ok(call)) => call,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                    None,
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let today = self.growmate.today();
        debug!("Calling tool {} with today = {}", call.name, today);

        match self.call_tool(&call.name, call.arguments, today) {
            Ok(result) => match serde_json::to_value(result) {
                Ok(value) => JsonRpcResponse::success(id, value),
                Err(e) => {
                    JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string(), None)
                }
            },
            Err(e) => JsonRpcResponse::error(id, e.code, e.message, None),
        }
    }

    /// Dispatch a tool by name
    fn call_tool(
        &self,
        name: &str,
        arguments: Option<Value>,
        today: NaiveDate,
    ) -> Result<ToolCallResult, CallError> {
        let storage = self.growmate.storage();

        match name {
            "habit_create" => {
                let params = parse_arguments(arguments)?;
                tool_result(name, tools::create_habit(storage, params, today), |r| {
                    format!("{}\nHabit ID: {}", r.message, r.habit_id)
                })
            }
            "habit_toggle" => {
                let params = parse_arguments(arguments)?;
                tool_result(name, tools::toggle_habit(storage, params, today), |r| {
                    r.message.clone()
                })
            }
            "habit_update" => {
                let params = parse_arguments(arguments)?;
                tool_result(name, tools::update_habit(storage, params), |r| {
                    r.message.clone()
                })
            }
            "habit_delete" => {
                let params = parse_arguments(arguments)?;
                tool_result(name, tools::delete_habit(storage, params), |r| {
                    r.message.clone()
                })
            }
            "habit_list" => {
                let params = parse_arguments(arguments)?;
                tool_result(
                    name,
                    tools::list_habits(storage, params, today),
                    format_habit_list,
                )
            }
            "habit_status" => {
                let params = parse_arguments(arguments)?;
                tool_result(name, tools::get_habit_status(storage, params, today), |r| {
                    r.message.clone()
                })
            }
            "habit_insights" => {
                let params = parse_arguments(arguments)?;
                tool_result(
                    name,
                    tools::get_weekly_insights(storage, params, today),
                    |r| r.message.clone(),
                )
            }
            "habit_history" => {
                let params = parse_arguments(arguments)?;
                tool_result(name, tools::get_habit_history(storage, params, today), |r| {
                    r.message.clone()
                })
            }
            "habit_reset_all" => {
                let params = parse_arguments(arguments)?;
                tool_result(name, tools::reset_all(storage, params), |r| {
                    r.message.clone()
                })
            }
            _ => Ok(ToolCallResult::error(format!("Unknown tool: {}", name))),
        }
    }
}
