/// End-to-end JSON-RPC conversations with the MCP server
use growmate_mcp::mcp::McpServer;
use growmate_mcp::*;
use serde_json::{json, Value};

fn server(today: &str) -> McpServer {
    let storage = SqliteStorage::open_in_memory().expect("in-memory storage");
    let today = parse_date(today).expect("valid test date");
    McpServer::new(GrowMateServer::with_storage(storage, Some(today)))
}

fn send(server: &mut McpServer, request: Value) -> Option<Value> {
    tokio_test::block_on(server.handle_line(&request.to_string()))
        .map(|response| serde_json::to_value(response).expect("serializable response"))
}

fn call(server: &mut McpServer, id: u64, tool: &str, arguments: Value) -> Value {
    send(
        server,
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": {"name": tool, "arguments": arguments}
        }),
    )
    .expect("tools/call always answers")
}

/// Structured payload of a successful tool result
fn payload(response: &Value) -> Value {
    assert_eq!(response["result"]["isError"], json!(false), "{}", response);
    let text = response["result"]["content"][1]["text"]
        .as_str()
        .expect("structured content");
    serde_json::from_str(text).expect("structured content is JSON")
}

#[test]
fn test_handshake() {
    let mut server = server("2024-06-12");

    let response = send(
        &mut server,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "test-client", "version": "1.0"}
            }
        }),
    )
    .unwrap();
    assert_eq!(response["id"], json!(1));
    assert_eq!(response["result"]["protocolVersion"], json!("2024-11-05"));
    assert_eq!(response["result"]["serverInfo"]["name"], json!("GrowMate MCP"));

    let notification = send(
        &mut server,
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    );
    assert!(notification.is_none());
    assert!(server.is_initialized());

    let pong = send(&mut server, json!({"jsonrpc": "2.0", "id": 2, "method": "ping"})).unwrap();
    assert_eq!(pong["result"], json!({}));

    // A null id is still a request, not a notification
    let null_id = send(&mut server, json!({"jsonrpc": "2.0", "id": null, "method": "ping"}))
        .expect("null-id request is answered");
    assert_eq!(null_id["id"], Value::Null);
    assert_eq!(null_id["result"], json!({}));
}

#[test]
fn test_tools_list_publishes_schemas() {
    let mut server = server("2024-06-12");
    let response = send(
        &mut server,
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
    )
    .unwrap();

    let tools = response["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    assert_eq!(
        names,
        vec![
            "habit_create",
            "habit_toggle",
            "habit_update",
            "habit_delete",
            "habit_list",
            "habit_status",
            "habit_insights",
            "habit_history",
            "habit_reset_all"
        ]
    );
    assert!(tools[0]["inputSchema"]["properties"]["title"].is_object());
}

#[test]
fn test_habit_workflow() {
    let mut server = server("2024-06-12");

    let created = call(
        &mut server,
        1,
        "habit_create",
        json!({"title": "Morning run", "category": "fitness"}),
    );
    let habit_id = payload(&created)["habit_id"].as_str().unwrap().to_string();

    for (id, date) in [(2, "2024-06-10"), (3, "2024-06-11")] {
        call(
            &mut server,
            id,
            "habit_toggle",
            json!({"habit_id": habit_id, "date": date}),
        );
    }
    let toggled = payload(&call(&mut server, 4, "habit_toggle", json!({"habit_id": habit_id})));
    assert_eq!(toggled["date"], json!("2024-06-12"));
    assert_eq!(toggled["current_streak"], json!(3));
    assert_eq!(toggled["longest_streak"], json!(3));

    let insights = payload(&call(&mut server, 5, "habit_insights", json!({})));
    assert_eq!(insights["analytics"]["week_start_date"], json!("2024-06-10"));
    assert_eq!(insights["analytics"]["total_completed"], json!(3));
    assert_eq!(insights["analytics"]["best_habit"], json!("Morning run"));
    assert_eq!(insights["analytics"]["category_breakdown"]["fitness"], json!(3));
    assert_eq!(insights["chart"][2]["completed"], json!(true));
    assert_eq!(insights["chart"][3]["completed"], json!(false));

    let history = payload(&call(
        &mut server,
        6,
        "habit_history",
        json!({"habit_id": habit_id, "days": 5}),
    ));
    assert_eq!(history["completed_in_range"], json!(3));

    let status = payload(&call(&mut server, 7, "habit_status", json!({})));
    assert_eq!(status["habits"][0]["badge"], json!("🔥 3 Days"));
    assert_eq!(status["habits"][0]["status"], json!("completed_today"));

    let deleted = call(&mut server, 8, "habit_delete", json!({"habit_id": habit_id}));
    assert_eq!(deleted["result"]["isError"], json!(false));
    let listed = payload(&call(&mut server, 9, "habit_list", json!({})));
    assert_eq!(listed["summary"]["total_habits"], json!(0));
}

#[test]
fn test_reset_all_wipes_every_habit() {
    let mut server = server("2024-06-12");
    for (id, title) in [(1, "Morning run"), (2, "Read a chapter")] {
        let created = call(
            &mut server,
            id,
            "habit_create",
            json!({"title": title, "category": "fitness"}),
        );
        let habit_id = payload(&created)["habit_id"].as_str().unwrap().to_string();
        call(&mut server, id + 10, "habit_toggle", json!({"habit_id": habit_id}));
    }

    let refused = call(&mut server, 20, "habit_reset_all", json!({"confirm": false}));
    assert_eq!(refused["result"]["isError"], json!(true));

    let reset = payload(&call(&mut server, 21, "habit_reset_all", json!({"confirm": true})));
    assert_eq!(reset["habits_deleted"], json!(2));
    assert_eq!(reset["completions_deleted"], json!(2));

    let listed = payload(&call(&mut server, 22, "habit_list", json!({})));
    assert_eq!(listed["summary"]["total_habits"], json!(0));
}

#[test]
fn test_tool_failures_are_error_results() {
    let mut server = server("2024-06-12");

    let created = call(
        &mut server,
        1,
        "habit_create",
        json!({"title": "Read", "category": "learning"}),
    );
    let habit_id = payload(&created)["habit_id"].as_str().unwrap().to_string();

    let bad_date = call(
        &mut server,
        2,
        "habit_toggle",
        json!({"habit_id": habit_id, "date": "12/06/2024"}),
    );
    assert_eq!(bad_date["result"]["isError"], json!(true));
    let text = bad_date["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.contains("Invalid date format"), "{}", text);

    let missing = call(&mut server, 3, "habit_delete", json!({"habit_id": "nope"}));
    assert_eq!(missing["result"]["isError"], json!(true));

    let unknown = call(&mut server, 4, "habit_archive", json!({}));
    assert_eq!(unknown["result"]["isError"], json!(true));
}

#[test]
fn test_malformed_requests_are_json_rpc_errors() {
    let mut server = server("2024-06-12");

    let parse_error = tokio_test::block_on(server.handle_line("{not json"))
        .map(|r| serde_json::to_value(r).unwrap())
        .unwrap();
    assert_eq!(parse_error["error"]["code"], json!(-32700));

    let unknown = send(
        &mut server,
        json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}),
    )
    .unwrap();
    assert_eq!(unknown["error"]["code"], json!(-32601));

    let no_args = call(&mut server, 2, "habit_toggle", json!({}));
    assert_eq!(no_args["error"]["code"], json!(-32602));

    assert!(tokio_test::block_on(server.handle_line("   \n")).is_none());
}
