//! Shared helpers for integration tests.
//!
//! Each integration test file compiles common/ as its own module, so not
//! every helper is used in every file.
#![allow(dead_code)]

use std::path::Path;

use serde_json::{json, Value};

use harcap_recorder::NetworkEvent;

/// Build a `Network.requestWillBeSent` event through the raw-CDP parser,
/// the same path production events take.
pub fn request_event(id: &str, method: &str, url: &str) -> NetworkEvent {
    NetworkEvent::from_cdp(
        "Network.requestWillBeSent",
        &json!({
            "requestId": id,
            "request": {"method": method, "url": url, "headers": {}},
        }),
    )
    .expect("should parse requestWillBeSent")
}

/// A request event carrying a redirect response for the prior hop.
pub fn redirect_hop_event(id: &str, next_url: &str, status: i64) -> NetworkEvent {
    NetworkEvent::from_cdp(
        "Network.requestWillBeSent",
        &json!({
            "requestId": id,
            "request": {"method": "GET", "url": next_url, "headers": {}},
            "redirectResponse": {
                "status": status,
                "statusText": "Found",
                "headers": {"location": next_url},
            },
        }),
    )
    .expect("should parse redirect hop")
}

pub fn response_event(id: &str, status: i64) -> NetworkEvent {
    NetworkEvent::from_cdp(
        "Network.responseReceived",
        &json!({
            "requestId": id,
            "response": {"status": status, "statusText": "OK", "headers": {}},
        }),
    )
    .expect("should parse responseReceived")
}

pub fn finished_event(id: &str, encoded_length: i64) -> NetworkEvent {
    NetworkEvent::from_cdp(
        "Network.loadingFinished",
        &json!({"requestId": id, "encodedDataLength": encoded_length}),
    )
    .expect("should parse loadingFinished")
}

pub fn failed_event(id: &str, error_text: &str) -> NetworkEvent {
    NetworkEvent::from_cdp(
        "Network.loadingFailed",
        &json!({"requestId": id, "errorText": error_text}),
    )
    .expect("should parse loadingFailed")
}

pub fn extra_info_event(id: &str, headers: Value) -> NetworkEvent {
    NetworkEvent::from_cdp(
        "Network.requestWillBeSentExtraInfo",
        &json!({"requestId": id, "headers": headers}),
    )
    .expect("should parse requestWillBeSentExtraInfo")
}

pub fn target_attached_event(session_id: &str, target_type: &str) -> NetworkEvent {
    NetworkEvent::from_cdp(
        "Target.attachedToTarget",
        &json!({"sessionId": session_id, "targetInfo": {"type": target_type}}),
    )
    .expect("should parse attachedToTarget")
}

/// Read the written archive back and return its entry array.
pub fn read_entries(path: &Path) -> Vec<Value> {
    let text = std::fs::read_to_string(path).expect("archive file should exist");
    let doc: Value = serde_json::from_str(&text).expect("archive should be valid JSON");
    doc["log"]["entries"]
        .as_array()
        .expect("log.entries should be an array")
        .clone()
}
