//! Per-session capture activation.
//!
//! Traffic only flows for a target once `Network.enable` has been issued
//! on its session. Pages open tabs, frames, and popups as the agent
//! browses, so the tracker watches `Target.attachedToTarget` and
//! activates capture for every new page session. The set is append-only:
//! a session is never deactivated mid-capture.

use std::collections::HashSet;

use tokio::sync::mpsc;

use crate::command::CaptureCommand;

/// Tracks which sessions have had capture activated and enqueues
/// activation commands for new ones.
#[derive(Debug)]
pub struct SessionTracker {
    enabled: HashSet<String>,
    commands: mpsc::UnboundedSender<CaptureCommand>,
}

impl SessionTracker {
    pub fn new(commands: mpsc::UnboundedSender<CaptureCommand>) -> Self {
        Self {
            enabled: HashSet::new(),
            commands,
        }
    }

    /// Eagerly activate capture for every session already known to the
    /// owning browser connection, plus a best-effort root-level
    /// activation (which may fail downstream when no root session
    /// exists -- that is fine).
    pub fn activate_known(&mut self, session_ids: &[String]) {
        for session_id in session_ids {
            if self.enabled.insert(session_id.clone()) {
                self.send(CaptureCommand::Enable {
                    session_id: Some(session_id.clone()),
                });
                tracing::info!(session_id = %session_id, "capture enabled for existing session");
            }
        }
        self.send(CaptureCommand::Enable { session_id: None });
    }

    /// React to a target attachment. Only page targets carry user-visible
    /// traffic worth archiving; workers and other background targets are
    /// skipped.
    pub fn on_target_attached(&mut self, session_id: &str, target_type: &str) {
        if target_type != "page" {
            tracing::debug!(
                session_id,
                target_type,
                "ignoring non-page target attachment"
            );
            return;
        }
        if session_id.is_empty() || !self.enabled.insert(session_id.to_string()) {
            return;
        }
        self.send(CaptureCommand::Enable {
            session_id: Some(session_id.to_string()),
        });
        tracing::debug!(session_id, "capture activation queued for new page session");
    }

    /// Queue a best-effort deactivation for the root session, used once
    /// at finalization.
    pub fn deactivate_root(&mut self, root_session: Option<&str>) {
        self.send(CaptureCommand::Disable {
            session_id: root_session.map(str::to_string),
        });
    }

    pub fn is_enabled(&self, session_id: &str) -> bool {
        self.enabled.contains(session_id)
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Fire-and-forget send. A dropped receiver means the transport is
    /// gone; that must not disturb the event-delivery path.
    fn send(&self, command: CaptureCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!("capture command receiver dropped, command discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::capture_command_channel;

    #[test]
    fn page_target_is_activated_once() {
        let (tx, mut rx) = capture_command_channel();
        let mut tracker = SessionTracker::new(tx);

        tracker.on_target_attached("sess-1", "page");
        tracker.on_target_attached("sess-1", "page");

        assert_eq!(tracker.len(), 1);
        assert_eq!(
            rx.try_recv().unwrap(),
            CaptureCommand::Enable {
                session_id: Some("sess-1".to_string())
            }
        );
        assert!(rx.try_recv().is_err(), "duplicate attach must not re-enable");
    }

    #[test]
    fn non_page_targets_are_ignored() {
        let (tx, mut rx) = capture_command_channel();
        let mut tracker = SessionTracker::new(tx);

        tracker.on_target_attached("sess-w", "service_worker");
        tracker.on_target_attached("sess-b", "background_page");

        assert!(tracker.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn empty_session_id_is_ignored() {
        let (tx, mut rx) = capture_command_channel();
        let mut tracker = SessionTracker::new(tx);
        tracker.on_target_attached("", "page");
        assert!(tracker.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn activate_known_enables_each_session_and_root() {
        let (tx, mut rx) = capture_command_channel();
        let mut tracker = SessionTracker::new(tx);

        tracker.activate_known(&["a".to_string(), "b".to_string()]);

        assert!(tracker.is_enabled("a"));
        assert!(tracker.is_enabled("b"));
        let mut commands = Vec::new();
        while let Ok(cmd) = rx.try_recv() {
            commands.push(cmd);
        }
        assert_eq!(commands.len(), 3);
        assert_eq!(
            commands[2],
            CaptureCommand::Enable { session_id: None },
            "root activation comes last"
        );
    }

    #[test]
    fn known_sessions_not_reactivated_on_attach() {
        let (tx, mut rx) = capture_command_channel();
        let mut tracker = SessionTracker::new(tx);

        tracker.activate_known(&["sess-1".to_string()]);
        while rx.try_recv().is_ok() {}

        tracker.on_target_attached("sess-1", "page");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dropped_receiver_does_not_panic() {
        let (tx, rx) = capture_command_channel();
        drop(rx);
        let mut tracker = SessionTracker::new(tx);
        tracker.on_target_attached("sess-1", "page");
        assert!(tracker.is_enabled("sess-1"));
    }

    #[test]
    fn deactivate_root_sends_disable() {
        let (tx, mut rx) = capture_command_channel();
        let mut tracker = SessionTracker::new(tx);
        tracker.deactivate_root(Some("root-1"));
        assert_eq!(
            rx.try_recv().unwrap(),
            CaptureCommand::Disable {
                session_id: Some("root-1".to_string())
            }
        );
    }
}
