//! The recorder facade: one capture instance, start to finalize.
//!
//! Owns the request ledger, the extra-info cache, and the session
//! tracker as plain fields -- no shared module state, so independent
//! captures can coexist. Access is not internally synchronized; wrap a
//! recorder in a [`RecorderHandle`](crate::handle::RecorderHandle) to
//! drive it from concurrent event-delivery contexts.

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use harcap_har::{normalize_headers, write_archive, Creator};

use crate::command::CaptureCommand;
use crate::event::NetworkEvent;
use crate::extra_info::ExtraInfoCache;
use crate::ledger::RequestLedger;
use crate::sessions::SessionTracker;

/// Correlates instrumentation events into a HAR archive at `har_path`.
pub struct HarRecorder {
    har_path: PathBuf,
    started: bool,
    root_session: Option<String>,
    ledger: RequestLedger,
    cache: ExtraInfoCache,
    sessions: SessionTracker,
}

impl HarRecorder {
    /// Create a recorder that will write to `har_path` on finalize.
    /// Outbound enable/disable commands go out on `commands`.
    pub fn new(
        har_path: impl Into<PathBuf>,
        commands: mpsc::UnboundedSender<CaptureCommand>,
    ) -> Self {
        Self {
            har_path: har_path.into(),
            started: false,
            root_session: None,
            ledger: RequestLedger::new(),
            cache: ExtraInfoCache::new(),
            sessions: SessionTracker::new(commands),
        }
    }

    /// Begin recording. Idempotent: a second call while started is a
    /// no-op.
    ///
    /// Eagerly queues capture activation for every session already known
    /// to the owning browser connection, plus a best-effort root-level
    /// activation. `root_session` is remembered for the disable command
    /// at finalization.
    pub fn start(&mut self, known_sessions: &[String], root_session: Option<&str>) {
        if self.started {
            tracing::debug!("recorder already started, ignoring start");
            return;
        }
        self.root_session = root_session.map(str::to_string);
        self.sessions.activate_known(known_sessions);
        self.started = true;
        tracing::info!(path = %self.har_path.display(), "traffic recording started");
    }

    /// Route one instrumentation event. Never panics and never returns
    /// an error: malformed or unmatched events are defaulted or dropped
    /// so the stream keeps flowing. Events outside the started window
    /// are ignored.
    pub fn handle_event(&mut self, event: NetworkEvent) {
        if !self.started {
            tracing::debug!("event received while not recording, dropping");
            return;
        }
        match event {
            NetworkEvent::RequestWillBeSent {
                request_id,
                request,
                wall_time,
                redirect_response,
            } => {
                self.ledger.on_request_will_be_sent(
                    &request_id,
                    request,
                    wall_time,
                    redirect_response,
                );
                // Headers that arrived ahead of the request merge now.
                if let Some(headers) = self.cache.take(&request_id) {
                    self.ledger.merge_extra_headers(&request_id, headers);
                }
            }
            NetworkEvent::RequestExtraInfo {
                request_id,
                headers,
            } => {
                let headers = normalize_headers(&headers);
                if let Some(unmerged) = self.ledger.merge_extra_headers(&request_id, headers) {
                    self.cache.store(&request_id, unmerged);
                }
            }
            NetworkEvent::ResponseReceived {
                request_id,
                response,
            } => self.ledger.on_response_received(&request_id, response),
            NetworkEvent::LoadingFinished {
                request_id,
                encoded_data_length,
            } => self.ledger.on_loading_finished(&request_id, encoded_data_length),
            NetworkEvent::LoadingFailed {
                request_id,
                error_text,
            } => self.ledger.on_loading_failed(&request_id, error_text),
            NetworkEvent::TargetAttached {
                session_id,
                target_type,
            } => self.sessions.on_target_attached(&session_id, &target_type),
        }
    }

    /// Stop recording and write the archive.
    ///
    /// Queues a best-effort capture disable, drains still-pending entries
    /// into the output, and writes the HAR file (creating the destination
    /// directory). Returns the configured path unconditionally -- a write
    /// failure is logged, not raised, so callers that need certainty must
    /// check the file themselves. A recorder that was never started
    /// returns its path without touching the filesystem.
    pub fn finalize(&mut self) -> PathBuf {
        if !self.started {
            tracing::debug!("finalize on a recorder that never started");
            return self.har_path.clone();
        }
        self.started = false;
        self.sessions.deactivate_root(self.root_session.as_deref());
        self.cache.clear();
        self.ledger.drain();

        let entries = self.ledger.take_finalized();
        if let Err(e) = write_archive(&self.har_path, Creator::default(), entries) {
            tracing::error!(
                path = %self.har_path.display(),
                error = %e,
                "failed to write traffic archive"
            );
        }
        self.har_path.clone()
    }

    /// Whether a capture is currently in progress.
    pub fn is_recording(&self) -> bool {
        self.started
    }

    /// Entries recorded so far, still-pending requests included.
    pub fn entry_count(&self) -> usize {
        self.ledger.entry_count()
    }

    /// The path the archive will be (or was) written to.
    pub fn path(&self) -> &Path {
        &self.har_path
    }
}
