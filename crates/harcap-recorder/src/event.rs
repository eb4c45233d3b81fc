//! The closed set of instrumentation events the recorder consumes.
//!
//! CDP delivers these as `(method, params)` pairs over the DevTools
//! WebSocket. [`NetworkEvent::from_cdp`] maps the raw pair into a typed
//! variant; every optional field defaults to empty/zero so a sparse
//! payload never fails to parse. Events for methods the recorder does
//! not care about map to `None`.

use serde::Deserialize;
use serde_json::Value;

/// Request description embedded in `Network.requestWillBeSent`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestPayload {
    pub method: String,
    pub url: String,
    /// Header object as delivered by the protocol (name -> value).
    pub headers: Value,
    pub post_data: Option<String>,
}

impl Default for RequestPayload {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            url: String::new(),
            headers: Value::Null,
            post_data: None,
        }
    }
}

/// Coarse protocol timing; only the fields the correlator derives
/// `wait` from are modeled.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingPayload {
    pub send_end: Option<f64>,
    pub receive_headers_end: Option<f64>,
}

impl TimingPayload {
    /// `receiveHeadersEnd - sendEnd` when both are reported, else zero.
    pub fn wait_ms(&self) -> f64 {
        match (self.receive_headers_end, self.send_end) {
            (Some(end), Some(start)) => end - start,
            _ => 0.0,
        }
    }
}

/// Response description from `Network.responseReceived`, also reused as
/// the `redirectResponse` payload inside `requestWillBeSent`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponsePayload {
    pub status: i64,
    pub status_text: String,
    pub headers: Value,
    pub mime_type: String,
    pub timing: Option<TimingPayload>,
}

/// One instrumentation event, routed by the recorder.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    /// `Network.requestWillBeSent` -- a request is leaving the browser.
    /// Carries `redirect_response` when this event supersedes a prior
    /// hop under the same request id.
    RequestWillBeSent {
        request_id: String,
        request: RequestPayload,
        /// Wall-clock seconds since the Unix epoch, when reported.
        wall_time: Option<f64>,
        redirect_response: Option<ResponsePayload>,
    },
    /// `Network.requestWillBeSentExtraInfo` -- out-of-band header set,
    /// delivered before or after its owning request with no ordering
    /// guarantee.
    RequestExtraInfo { request_id: String, headers: Value },
    /// `Network.responseReceived` -- headers arrived; body still pending.
    ResponseReceived {
        request_id: String,
        response: ResponsePayload,
    },
    /// `Network.loadingFinished` -- success terminal.
    LoadingFinished {
        request_id: String,
        encoded_data_length: i64,
    },
    /// `Network.loadingFailed` -- failure terminal.
    LoadingFailed {
        request_id: String,
        error_text: String,
    },
    /// `Target.attachedToTarget` -- a new browsing context appeared.
    TargetAttached {
        session_id: String,
        target_type: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestWillBeSentParams {
    request_id: String,
    #[serde(default)]
    request: RequestPayload,
    #[serde(default)]
    wall_time: Option<f64>,
    #[serde(default)]
    redirect_response: Option<ResponsePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtraInfoParams {
    request_id: String,
    #[serde(default)]
    headers: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseReceivedParams {
    request_id: String,
    #[serde(default)]
    response: ResponsePayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadingFinishedParams {
    request_id: String,
    #[serde(default)]
    encoded_data_length: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoadingFailedParams {
    request_id: String,
    #[serde(default)]
    error_text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TargetInfo {
    #[serde(rename = "type")]
    target_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetAttachedParams {
    session_id: String,
    #[serde(default)]
    target_info: TargetInfo,
}

impl NetworkEvent {
    /// Parse a raw CDP `(method, params)` pair into a typed event.
    ///
    /// Returns `None` for methods outside the recorder's event set, and
    /// for payloads missing their request/session identifier (there is
    /// nothing to correlate such an event against).
    pub fn from_cdp(method: &str, params: &Value) -> Option<NetworkEvent> {
        match method {
            "Network.requestWillBeSent" => {
                let p: RequestWillBeSentParams = parse(params)?;
                Some(NetworkEvent::RequestWillBeSent {
                    request_id: p.request_id,
                    request: p.request,
                    wall_time: p.wall_time,
                    redirect_response: p.redirect_response,
                })
            }
            "Network.requestWillBeSentExtraInfo" => {
                let p: ExtraInfoParams = parse(params)?;
                Some(NetworkEvent::RequestExtraInfo {
                    request_id: p.request_id,
                    headers: p.headers,
                })
            }
            "Network.responseReceived" => {
                let p: ResponseReceivedParams = parse(params)?;
                Some(NetworkEvent::ResponseReceived {
                    request_id: p.request_id,
                    response: p.response,
                })
            }
            "Network.loadingFinished" => {
                let p: LoadingFinishedParams = parse(params)?;
                Some(NetworkEvent::LoadingFinished {
                    request_id: p.request_id,
                    encoded_data_length: p.encoded_data_length as i64,
                })
            }
            "Network.loadingFailed" => {
                let p: LoadingFailedParams = parse(params)?;
                Some(NetworkEvent::LoadingFailed {
                    request_id: p.request_id,
                    error_text: p.error_text,
                })
            }
            "Target.attachedToTarget" => {
                let p: TargetAttachedParams = parse(params)?;
                Some(NetworkEvent::TargetAttached {
                    session_id: p.session_id,
                    target_type: p.target_info.target_type,
                })
            }
            _ => None,
        }
    }
}

fn parse<T: serde::de::DeserializeOwned>(params: &Value) -> Option<T> {
    match serde_json::from_value(params.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(error = %e, "discarding unparseable instrumentation event");
            None
        }
    }
}
