//! Shared fixtures for app integration tests.

use label_check_core::{RawResponse, parse_raw_response};
use serde_json::{Value, json};

/// Decodes a workflow response whose outputs are `outputs`.
#[allow(dead_code)]
pub fn workflow_response(outputs: Value) -> RawResponse {
    let raw = json!({ "dify_result": { "outputs": outputs } }).to_string();
    parse_raw_response(&raw).expect("workflow fixture should decode")
}

/// Decodes a workflow response carrying `text` in the `text` output field.
#[allow(dead_code)]
pub fn workflow_text(text: &str) -> RawResponse {
    workflow_response(json!({ "text": text }))
}

/// Report object with two of the six sections.
#[allow(dead_code)]
pub fn two_section_report() -> Value {
    json!({
        "基本信息": {"产品名称": "Test Product"},
        "合规性评估": {"总体评级": "合格"}
    })
}

/// Complete workflow response with metadata, file info, and parameters.
#[allow(dead_code)]
pub fn full_workflow_response() -> RawResponse {
    let raw = json!({
        "dify_result": {
            "outputs": { "text": two_section_report().to_string() },
            "metadata": { "total_tokens": 12345, "total_price": "0.0123", "elapsed_time": 8.25 },
            "read_error_occurred": true
        },
        "file_info": { "filename": "mooncake.jpg" },
        "input_params": {
            "Foodtype": "直接提供给消费者的预包装食品",
            "PackageFoodType": "",
            "SingleOrMulti": "单件"
        }
    })
    .to_string();
    parse_raw_response(&raw).expect("full fixture should decode")
}
