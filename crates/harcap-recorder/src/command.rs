//! Outbound instrumentation commands.
//!
//! The recorder never talks to the browser directly. It emits
//! [`CaptureCommand`]s on a channel; the CDP client integration owns the
//! receiving end and issues the corresponding `Network.enable` /
//! `Network.disable` calls, logging failures rather than retrying. A
//! session that fails to activate simply yields no traffic.

use tokio::sync::mpsc;

/// A fire-and-forget command for the instrumentation transport.
///
/// `session_id: None` addresses the root (browser-level) connection; a
/// root-level enable may legitimately fail when no root session exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureCommand {
    /// Activate network capture for a session.
    Enable { session_id: Option<String> },
    /// Deactivate network capture for a session. Best-effort, issued
    /// once at finalization.
    Disable { session_id: Option<String> },
}

/// Channel pair for capture commands. Unbounded: the sending side sits
/// on the event-delivery path and must never block.
pub fn capture_command_channel() -> (
    mpsc::UnboundedSender<CaptureCommand>,
    mpsc::UnboundedReceiver<CaptureCommand>,
) {
    mpsc::unbounded_channel()
}
