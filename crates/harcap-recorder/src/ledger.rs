//! The request ledger: the asynchronous join between id-keyed streams.
//!
//! CDP reports one network exchange as several independently-timed
//! events sharing a request id. The ledger tracks each id from its
//! `requestWillBeSent` until a terminal event (`loadingFinished`,
//! `loadingFailed`, or supersession by a redirect hop) moves the entry
//! into the finalized collection. Finalized entries are never mutated
//! again, and output order is terminal-event order.
//!
//! Orphan events -- a response, finish, or failure with no pending entry
//! -- are dropped with debug-level logging only. Chrome legitimately
//! delivers late events for requests already superseded by a redirect.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use harcap_har::{find_header, merge_missing, normalize_headers, Entry, Header, PostData};

use crate::event::{RequestPayload, ResponsePayload};

const DEFAULT_POST_MIME: &str = "application/x-www-form-urlencoded";

/// A pending entry plus its creation sequence number, so a shutdown
/// drain can emit still-pending entries in arrival order.
#[derive(Debug)]
struct Pending {
    seq: u64,
    entry: Entry,
}

/// Correlates per-request event streams into finalized HAR entries.
///
/// One ledger per capture. Not internally synchronized: the owner must
/// serialize access (the recorder task owns its ledger exclusively).
#[derive(Debug, Default)]
pub struct RequestLedger {
    pending: HashMap<String, Pending>,
    finalized: Vec<Entry>,
    next_seq: u64,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle `Network.requestWillBeSent`.
    ///
    /// If a redirect response rides along and the id has a pending entry,
    /// that prior hop is finalized first: its response fields are stamped
    /// from the redirect payload and its `redirectURL` points at the new
    /// request's URL. A pending entry for a reused id with no redirect
    /// payload is preserved as-is rather than silently replaced.
    pub fn on_request_will_be_sent(
        &mut self,
        request_id: &str,
        request: RequestPayload,
        wall_time: Option<f64>,
        redirect_response: Option<ResponsePayload>,
    ) {
        if let Some(redirect) = redirect_response {
            if let Some(prior) = self.pending.remove(request_id) {
                self.finalize_redirect_hop(request_id, prior.entry, redirect, &request.url);
            }
        } else if let Some(prior) = self.pending.remove(request_id) {
            // Id reuse without a terminal event for the prior request.
            // Keep whatever partial data it had instead of dropping it.
            tracing::debug!(
                request_id,
                url = %prior.entry.request.url,
                "request id reused while pending, preserving prior entry"
            );
            self.finalized.push(prior.entry);
        }

        let mut entry = Entry::started(request_id, started_at(wall_time));
        entry.request.method = if request.method.is_empty() {
            "GET".to_string()
        } else {
            request.method
        };
        entry.request.url = request.url;
        entry.request.headers = normalize_headers(&request.headers);
        if let Some(text) = request.post_data {
            let mime_type = find_header(&entry.request.headers, "content-type")
                .unwrap_or(DEFAULT_POST_MIME)
                .to_string();
            entry.request.post_data = Some(PostData { mime_type, text });
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending
            .insert(request_id.to_string(), Pending { seq, entry });
    }

    fn finalize_redirect_hop(
        &mut self,
        request_id: &str,
        mut entry: Entry,
        redirect: ResponsePayload,
        next_url: &str,
    ) {
        entry.response.status = redirect.status;
        entry.response.status_text = redirect.status_text;
        entry.response.headers = normalize_headers(&redirect.headers);
        entry.response.content.mime_type = redirect.mime_type;
        entry.response.redirect_url = next_url.to_string();
        if let Some(timing) = redirect.timing {
            entry.timings.wait = timing.wait_ms();
        }

        // Non-GET redirects (e.g. a POST answered with 302) are the ones
        // that tend to matter when debugging agent-driven form flows.
        if entry.request.method != "GET" {
            tracing::info!(
                request_id,
                method = %entry.request.method,
                from = %entry.request.url,
                to = next_url,
                "redirect hop finalized"
            );
        } else {
            tracing::debug!(
                request_id,
                from = %entry.request.url,
                to = next_url,
                "redirect hop finalized"
            );
        }
        self.finalized.push(entry);
    }

    /// Merge an extra-info header set into the pending entry for
    /// `request_id`. Header names already present win (first-seen), so
    /// browser-synthesized headers never override explicit ones.
    ///
    /// Returns the header set back when no pending entry exists, so the
    /// caller can park it until the request arrives.
    pub fn merge_extra_headers(
        &mut self,
        request_id: &str,
        headers: Vec<Header>,
    ) -> Option<Vec<Header>> {
        match self.pending.get_mut(request_id) {
            Some(pending) => {
                merge_missing(&mut pending.entry.request.headers, headers);
                None
            }
            None => Some(headers),
        }
    }

    /// Handle `Network.responseReceived`: fill in status, headers, mime
    /// type, and derived wait timing. The entry stays pending -- body
    /// size arrives with the terminal event.
    pub fn on_response_received(&mut self, request_id: &str, response: ResponsePayload) {
        let Some(pending) = self.pending.get_mut(request_id) else {
            tracing::debug!(request_id, "responseReceived for unknown request, dropping");
            return;
        };
        let entry = &mut pending.entry;
        entry.response.status = response.status;
        entry.response.status_text = response.status_text;
        entry.response.headers = normalize_headers(&response.headers);
        entry.response.content.mime_type = response.mime_type;
        if let Some(timing) = response.timing {
            entry.timings.wait = timing.wait_ms();
        }
    }

    /// Handle `Network.loadingFinished`: the success terminal.
    pub fn on_loading_finished(&mut self, request_id: &str, encoded_data_length: i64) {
        let Some(pending) = self.pending.remove(request_id) else {
            tracing::debug!(request_id, "loadingFinished for unknown request, dropping");
            return;
        };
        let mut entry = pending.entry;
        entry.response.content.size = encoded_data_length;
        entry.response.body_size = encoded_data_length;
        self.finalized.push(entry);
    }

    /// Handle `Network.loadingFailed`: the failure terminal. The entry
    /// gets status 0 and the protocol's error text as its status text.
    pub fn on_loading_failed(&mut self, request_id: &str, error_text: String) {
        let Some(pending) = self.pending.remove(request_id) else {
            tracing::debug!(request_id, "loadingFailed for unknown request, dropping");
            return;
        };
        let mut entry = pending.entry;
        entry.response.status = 0;
        entry.response.status_text = if error_text.is_empty() {
            "Failed".to_string()
        } else {
            error_text
        };
        self.finalized.push(entry);
    }

    /// Move every still-pending entry into the finalized collection,
    /// unchanged, in arrival order. An incomplete record is strictly more
    /// useful for debugging than a missing one.
    pub fn drain(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        tracing::info!(
            pending = self.pending.len(),
            "moving still-pending requests into the archive"
        );
        let mut remaining: Vec<Pending> = self.pending.drain().map(|(_, p)| p).collect();
        remaining.sort_by_key(|p| p.seq);
        self.finalized.extend(remaining.into_iter().map(|p| p.entry));
    }

    /// Take ownership of the finalized entries, leaving the ledger empty.
    pub fn take_finalized(&mut self) -> Vec<Entry> {
        std::mem::take(&mut self.finalized)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn finalized_len(&self) -> usize {
        self.finalized.len()
    }

    /// Total entries recorded so far, pending included.
    pub fn entry_count(&self) -> usize {
        self.pending.len() + self.finalized.len()
    }

    #[cfg(test)]
    pub(crate) fn finalized(&self) -> &[Entry] {
        &self.finalized
    }
}

/// Wall-clock timestamp from the protocol when provided, else capture
/// time.
fn started_at(wall_time: Option<f64>) -> DateTime<Utc> {
    wall_time
        .and_then(|wt| {
            let secs = wt.trunc() as i64;
            let nanos = (wt.fract() * 1_000_000_000.0) as u32;
            DateTime::from_timestamp(secs, nanos)
        })
        .unwrap_or_else(Utc::now)
}
