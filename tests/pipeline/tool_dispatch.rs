use salience::pipeline::{Tool, dispatch_named, mock_call};
use serde_json::json;

#[test]
fn unknown_tool_is_a_value_level_failure() {
    let result = dispatch_named("send_email", json!({}));
    assert_eq!(result, json!({ "ok": false, "error": "Unknown tool" }));
}

#[test]
fn prefill_reports_filled_fields_and_url() {
    let result = dispatch_named(
        "prefill_form",
        json!({ "formId": "medicare-B", "fields": { "name": "Sample User" } }),
    );
    assert_eq!(result["ok"], true);
    assert_eq!(result["fields_filled"], json!(["name"]));
    assert_eq!(result["form_url"], "/forms/medicare-B");
}

#[test]
fn typed_and_named_dispatch_agree() {
    let tool = Tool::GenerateOutline {
        topic: "Company Pitch".into(),
        audience: "Angel investors".into(),
    };
    assert_eq!(dispatch_named(tool.name(), tool.args()), mock_call(&tool));
}
