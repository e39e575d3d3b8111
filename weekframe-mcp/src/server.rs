//! JSON-RPC request handling
//!
//! Every registry function is exposed as an MCP tool whose input schema is
//! generated from its `ArgMeta` list, plus a `help` tool.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use tracing::{debug, info, warn};
use weekframe_core::{Value, WeekframeError};
use weekframe_plugin::{ArgMeta, CallContext, FunctionMeta, PluginRegistry};

pub const PROTOCOL_VERSION: &str = "2025-06-18";
pub const SERVER_NAME: &str = "weekframe";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

const HELP_TOOL: &str = "help";

#[derive(Debug, Deserialize)]
pub struct McpRequest {
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct McpResponse {
    jsonrpc: &'static str,
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
pub struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }
}

impl McpResponse {
    fn success(id: Option<JsonValue>, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Option<JsonValue>, error: McpError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

pub struct Server {
    registry: PluginRegistry,
    ctx: CallContext,
}

impl Server {
    pub fn new(registry: PluginRegistry, ctx: CallContext) -> Self {
        Self { registry, ctx }
    }

    /// Handle one protocol line; `None` when no reply is due (notifications)
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let response = match serde_json::from_str::<JsonValue>(line) {
            Ok(message) => {
                // Only a missing `id` marks a notification; `"id": null` is answered
                let id = message.get("id").cloned();
                let is_notification = id.is_none();
                match serde_json::from_value::<McpRequest>(message) {
                    Ok(request) => {
                        let response = self.handle_request(&request);
                        if is_notification {
                            debug!(method = %request.method, "notification processed");
                            return None;
                        }
                        response
                    }
                    Err(e) => {
                        warn!(error = %e, "malformed request");
                        McpResponse::failure(id, McpError::new(INVALID_REQUEST, format!("Invalid request: {}", e)))
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "unparseable request");
                McpResponse::failure(None, McpError::new(PARSE_ERROR, format!("Parse error: {}", e)))
            }
        };

        match serde_json::to_string(&response) {
            Ok(s) => Some(s),
            Err(e) => {
                warn!(error = %e, "failed to serialize response");
                None
            }
        }
    }

    pub fn handle_request(&self, request: &McpRequest) -> McpResponse {
        debug!(method = %request.method, "handling request");
        if request.jsonrpc != "2.0" {
            return McpResponse::failure(
                request.id.clone(),
                McpError::new(INVALID_REQUEST, format!("Unsupported jsonrpc version: {}", request.jsonrpc)),
            );
        }

        let result = match request.method.as_str() {
            "initialize" => Ok(self.initialize(&request.params)),
            "initialized" | "notifications/initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.tools_list()),
            "tools/call" => self.tool_call(&request.params),
            _ => Err(McpError::new(
                METHOD_NOT_FOUND,
                format!("Method not found: {}", request.method),
            )),
        };

        match result {
            Ok(r) => McpResponse::success(request.id.clone(), r),
            Err(e) => McpResponse::failure(request.id.clone(), e),
        }
    }

    fn initialize(&self, params: &Option<JsonValue>) -> JsonValue {
        let client = params
            .as_ref()
            .and_then(|p| p.get("clientInfo"))
            .and_then(|c| c.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or("unknown");

        // Echo the client's protocol version for compatibility
        let protocol = params
            .as_ref()
            .and_then(|p| p.get("protocolVersion"))
            .and_then(|v| v.as_str())
            .unwrap_or(PROTOCOL_VERSION);

        info!(client, protocol, "client connected");

        json!({
            "protocolVersion": protocol,
            "serverInfo": {
                "name": SERVER_NAME,
                "version": SERVER_VERSION,
            },
            "capabilities": {
                "tools": { "listChanged": false }
            },
            "instructions": format!(
                "Sunday-start (IKEA) week numbering, September financial years and SQL range \
                 predicates over denormalized date columns. Default column scheme: {}. \
                 Accepted timeframes: {}. Use 'help' for function details.",
                self.ctx.scheme, self.ctx.valid_timeframes
            ),
        })
    }

    fn tools_list(&self) -> JsonValue {
        let mut tools: Vec<JsonValue> = self.registry.function_metas().iter().map(tool_schema).collect();
        tools.push(json!({
            "name": HELP_TOOL,
            "description": "Documentation for a function, or the list of functions by category.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Function name. Omit for general help." }
                }
            }
        }));
        json!({ "tools": tools })
    }

    fn tool_call(&self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let params = params
            .as_ref()
            .ok_or_else(|| McpError::invalid_params("Missing params"))?;
        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        if name == HELP_TOOL {
            let topic = arguments.get("name").and_then(|v| v.as_str());
            return Ok(tool_result(&self.registry.help(topic)));
        }

        let meta = match self.registry.get_function(name) {
            Some(f) => f.meta(),
            None => {
                warn!(tool = name, "unknown tool");
                return Err(McpError::invalid_params(format!("Unknown tool: {}", name)));
            }
        };

        let args = positional_args(&meta, &arguments)?;
        let value = self.registry.call_function(name, &args, &self.ctx);
        Ok(tool_result(&value))
    }
}

/// MCP tool definition generated from function metadata
fn tool_schema(meta: &FunctionMeta) -> JsonValue {
    let mut properties = Map::new();
    for arg in meta.args {
        let mut prop = json!({
            "type": json_schema_type(arg),
            "description": arg.description,
        });
        if arg.typ == "Date" {
            prop["format"] = json!("date");
        }
        properties.insert(arg.name.to_string(), prop);
    }
    let required: Vec<&str> = meta.args.iter().filter(|a| !a.optional).map(|a| a.name).collect();

    json!({
        "name": meta.name,
        "description": format!("{} Usage: {}. Returns {}.", meta.description, meta.usage, meta.returns),
        "inputSchema": {
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        }
    })
}

fn json_schema_type(arg: &ArgMeta) -> JsonValue {
    let types: Vec<&str> = arg
        .typ
        .split('|')
        .map(|t| match t {
            "Int" => "integer",
            "Bool" => "boolean",
            "List" => "array",
            _ => "string",
        })
        .collect();
    match types.as_slice() {
        [single] => json!(single),
        _ => json!(types),
    }
}

/// Map tool arguments onto the function's positional order
///
/// Accepts a JSON array (already positional) or an object keyed by argument
/// name. Absent optional arguments become `Null`; trailing ones are dropped.
fn positional_args(meta: &FunctionMeta, arguments: &JsonValue) -> Result<Vec<Value>, McpError> {
    let obj = match arguments {
        JsonValue::Array(items) => return Ok(items.iter().map(json_to_value).collect()),
        JsonValue::Object(obj) => obj,
        JsonValue::Null => return positional_args(meta, &json!({})),
        _ => return Err(McpError::invalid_params("Tool arguments must be an object")),
    };

    if let Some(unknown) = obj.keys().find(|k| !meta.args.iter().any(|a| a.name == k.as_str())) {
        return Err(McpError::invalid_params(format!(
            "Unknown argument '{}' for {}",
            unknown, meta.name
        )));
    }

    let mut args = Vec::with_capacity(meta.args.len());
    for arg in meta.args {
        match obj.get(arg.name).filter(|v| !v.is_null()) {
            Some(v) => args.push(json_to_value(v)),
            None if arg.optional => args.push(Value::Null),
            None => {
                return Err(McpError::invalid_params(format!(
                    "Missing required argument '{}' for {}",
                    arg.name, meta.name
                )))
            }
        }
    }
    while args.last().is_some_and(Value::is_null) {
        args.pop();
    }
    Ok(args)
}

/// Tool result envelope; function errors are results with `isError`
fn tool_result(value: &Value) -> JsonValue {
    match value {
        Value::Error(e) => json!({
            "content": [{ "type": "text", "text": e.to_string() }],
            "structuredContent": { "error": error_to_json(e) },
            "isError": true,
        }),
        other => {
            let data = value_to_json(other);
            let text = match &data {
                JsonValue::String(s) => s.clone(),
                _ => data.to_string(),
            };
            json!({
                "content": [{ "type": "text", "text": text }],
                "structuredContent": { "result": data },
                "isError": false,
            })
        }
    }
}

fn error_to_json(e: &WeekframeError) -> JsonValue {
    serde_json::to_value(e).unwrap_or_else(|_| json!({ "code": e.code, "message": e.message }))
}

fn json_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Text(n.to_string()),
        },
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Array(arr) => Value::List(arr.iter().map(json_to_value).collect()),
        JsonValue::Object(obj) => {
            Value::Object(obj.iter().map(|(k, v)| (k.clone(), json_to_value(v))).collect())
        }
    }
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(n) => json!(n),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Date(d) => JsonValue::String(d.to_string()),
        Value::List(l) => JsonValue::Array(l.iter().map(value_to_json).collect()),
        Value::Object(o) => {
            JsonValue::Object(o.iter().map(|(k, v)| (k.clone(), value_to_json(v))).collect())
        }
        Value::Error(e) => json!({ "error": error_to_json(e) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekframe_core::CalendarDate;
    use weekframe_range::{ColumnScheme, ValidTimeframes};

    fn server() -> Server {
        Server::new(weekframe_std::standard_registry(), CallContext::new())
    }

    fn call(server: &Server, request: JsonValue) -> JsonValue {
        let line = server.handle_line(&request.to_string()).expect("response expected");
        serde_json::from_str(&line).unwrap()
    }

    fn tool(server: &Server, name: &str, arguments: JsonValue) -> JsonValue {
        call(
            server,
            json!({
                "jsonrpc": "2.0", "id": 7, "method": "tools/call",
                "params": { "name": name, "arguments": arguments }
            }),
        )
    }

    #[test]
    fn test_initialize_echoes_protocol() {
        let resp = call(
            &server(),
            json!({
                "jsonrpc": "2.0", "id": 1, "method": "initialize",
                "params": { "protocolVersion": "2024-11-05", "clientInfo": { "name": "test" } }
            }),
        );
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(resp["result"]["serverInfo"]["name"], SERVER_NAME);
    }

    #[test]
    fn test_notifications_get_no_reply() {
        let s = server();
        let line = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }).to_string();
        assert!(s.handle_line(&line).is_none());
    }

    #[test]
    fn test_protocol_errors() {
        let s = server();
        let resp: JsonValue = serde_json::from_str(&s.handle_line("{not json").unwrap()).unwrap();
        assert_eq!(resp["error"]["code"], PARSE_ERROR);
        assert!(resp["id"].is_null());

        let resp = call(&s, json!({ "jsonrpc": "2.0", "id": 2, "method": "resources/list" }));
        assert_eq!(resp["error"]["code"], METHOD_NOT_FOUND);

        let resp = call(&s, json!({ "jsonrpc": "1.0", "id": 3, "method": "ping" }));
        assert_eq!(resp["error"]["code"], INVALID_REQUEST);

        let resp = tool(&s, "no_such_tool", json!({}));
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
    }

    #[test]
    fn test_malformed_requests_are_invalid_not_unparseable() {
        let s = server();
        let resp = call(&s, json!({ "jsonrpc": "2.0", "id": 5 }));
        assert_eq!(resp["error"]["code"], INVALID_REQUEST);
        assert_eq!(resp["id"], 5);

        let resp = call(&s, json!({ "jsonrpc": "2.0", "id": 6, "method": 42 }));
        assert_eq!(resp["error"]["code"], INVALID_REQUEST);
        assert_eq!(resp["id"], 6);

        let resp: JsonValue = serde_json::from_str(&s.handle_line("[1, 2]").unwrap()).unwrap();
        assert_eq!(resp["error"]["code"], INVALID_REQUEST);
        assert!(resp["id"].is_null());

        // Still answered when it lacks an id, since it is not a valid notification either
        let resp: JsonValue = serde_json::from_str(&s.handle_line(r#"{"jsonrpc":"2.0"}"#).unwrap()).unwrap();
        assert_eq!(resp["error"]["code"], INVALID_REQUEST);
    }

    #[test]
    fn test_null_id_gets_a_reply() {
        let s = server();
        let line = s
            .handle_line(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
            .expect("null id is a request, not a notification");
        let resp: JsonValue = serde_json::from_str(&line).unwrap();
        assert!(resp.get("id").is_some_and(JsonValue::is_null));
        assert_eq!(resp["result"], json!({}));
    }

    #[test]
    fn test_tools_list_from_registry() {
        let resp = call(&server(), json!({ "jsonrpc": "2.0", "id": 4, "method": "tools/list" }));
        let tools = resp["result"]["tools"].as_array().unwrap();
        let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
        assert!(names.contains(&"ikea_week"));
        assert!(names.contains(&"where_clause"));
        assert!(names.contains(&HELP_TOOL));

        let where_tool = tools.iter().find(|t| t["name"] == "where_clause").unwrap();
        let schema = &where_tool["inputSchema"];
        assert_eq!(schema["required"], json!(["from", "to", "timeframe"]));
        assert_eq!(schema["properties"]["from"]["format"], "date");
        assert_eq!(schema["properties"]["valid"]["type"], json!(["string", "array"]));

        let fy_tool = tools.iter().find(|t| t["name"] == "financial_year").unwrap();
        assert_eq!(fy_tool["inputSchema"]["properties"]["month"]["type"], "integer");
    }

    #[test]
    fn test_call_ikea_week() {
        let resp = tool(&server(), "ikea_week", json!({ "date": "2024-01-14" }));
        let result = &resp["result"];
        assert_eq!(result["isError"], false);
        assert_eq!(result["structuredContent"]["result"]["key"], "2024-W03");
        assert_eq!(result["structuredContent"]["result"]["week"], 3);
    }

    #[test]
    fn test_call_where_clause_with_named_optionals() {
        let resp = tool(
            &server(),
            "where_clause",
            json!({ "from": "2024-07-01", "to": "2025-12-10", "timeframe": "year", "valid": ["year"] }),
        );
        let result = &resp["result"]["structuredContent"]["result"];
        assert_eq!(result["sql"], "financial_year BETWEEN 2024 AND 2026");
        assert_eq!(result["params"], json!([2024, 2026]));
    }

    #[test]
    fn test_call_positional_arguments() {
        let resp = tool(&server(), "week_first_day", json!([2014, 53]));
        assert_eq!(resp["result"]["content"][0]["text"], "2014-12-28");
    }

    #[test]
    fn test_function_errors_are_tool_results() {
        let resp = tool(&server(), "week_first_day", json!({ "year": 2024, "week": 60 }));
        let result = &resp["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["error"]["code"], "INVALID_WEEK");
        assert!(resp.get("error").is_none());
    }

    #[test]
    fn test_argument_mapping_errors() {
        let s = server();
        let resp = tool(&s, "ikea_week", json!({}));
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);

        let resp = tool(&s, "ikea_week", json!({ "date": "2024-01-14", "when": "now" }));
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
        assert!(resp["error"]["message"].as_str().unwrap().contains("when"));
    }

    #[test]
    fn test_context_defaults_apply() {
        let ctx = CallContext::new()
            .with_scheme(ColumnScheme::Iso)
            .with_valid_timeframes("week".parse::<ValidTimeframes>().unwrap());
        let s = Server::new(weekframe_std::standard_registry(), ctx);

        let resp = tool(&s, "time_columns", json!({ "timeframe": "week", "alias": true }));
        assert_eq!(resp["result"]["structuredContent"]["result"], json!(["year", "week"]));

        let resp = tool(&s, "where_clause", json!({ "from": "2024-12-01", "to": "2024-12-10", "timeframe": "day" }));
        assert_eq!(resp["result"]["isError"], true);
        assert_eq!(resp["result"]["structuredContent"]["error"]["code"], "INVALID_TIMEFRAME");
    }

    #[test]
    fn test_help_tool() {
        let resp = tool(&server(), HELP_TOOL, json!({ "name": "time_bucket" }));
        assert_eq!(
            resp["result"]["structuredContent"]["result"]["usage"],
            "time_bucket(date, timeframe, [scheme])"
        );
    }

    #[test]
    fn test_value_json_conversion() {
        assert_eq!(json_to_value(&json!(5)), Value::Int(5));
        assert_eq!(json_to_value(&json!("2024-12-01")), Value::from("2024-12-01"));
        let d = CalendarDate::from_ymd(2024, 12, 1).unwrap();
        assert_eq!(value_to_json(&Value::Date(d)), json!("2024-12-01"));
        assert_eq!(value_to_json(&Value::from(vec![1i64, 2])), json!([1, 2]));
    }
}
