//! Single-writer recorder task.
//!
//! [`RecorderHandle`] spawns a tokio task that owns a [`HarRecorder`]
//! exclusively -- no mutex on the event path. Event-delivery contexts
//! (one per browser session) each hold a clone of the handle and send
//! messages through an unbounded channel, which serializes all state
//! transitions: finalization cannot race an in-flight event handler
//! because both are processed by the same task, in order.
//!
//! # Design
//!
//! - `Event` is fire-and-forget (no reply).
//! - `Start` is fire-and-forget; start is idempotent anyway.
//! - `Finalize` uses a oneshot reply so the caller learns the archive
//!   path once the write has actually happened.
//! - Dropping every handle without finalizing stops the task without
//!   writing; the explicit finalize is the only write path.

use std::path::PathBuf;

use tokio::sync::{mpsc, oneshot};

use crate::error::RecorderError;
use crate::event::NetworkEvent;
use crate::recorder::HarRecorder;

/// Messages the recorder task can receive.
enum RecorderMsg {
    /// Begin recording, with the sessions already known at start time
    /// and the optional root session id.
    Start {
        known_sessions: Vec<String>,
        root_session: Option<String>,
    },
    /// One instrumentation event. Fire-and-forget.
    Event(NetworkEvent),
    /// Stop, drain, and write the archive. Replies with the path.
    Finalize { reply: oneshot::Sender<PathBuf> },
}

/// Cloneable handle to a dedicated recorder task.
#[derive(Clone)]
pub struct RecorderHandle {
    tx: mpsc::UnboundedSender<RecorderMsg>,
}

impl RecorderHandle {
    /// Spawn a task that owns `recorder`.
    ///
    /// Returns the handle and the task's `JoinHandle`; the task exits
    /// when every handle clone has been dropped.
    pub fn spawn(recorder: HarRecorder) -> (Self, tokio::task::JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let join = tokio::spawn(Self::run(recorder, rx));
        (Self { tx }, join)
    }

    async fn run(mut recorder: HarRecorder, mut rx: mpsc::UnboundedReceiver<RecorderMsg>) {
        while let Some(msg) = rx.recv().await {
            match msg {
                RecorderMsg::Start {
                    known_sessions,
                    root_session,
                } => recorder.start(&known_sessions, root_session.as_deref()),
                RecorderMsg::Event(event) => recorder.handle_event(event),
                RecorderMsg::Finalize { reply } => {
                    let path = recorder.finalize();
                    let _ = reply.send(path);
                }
            }
        }
    }

    /// Begin recording. Fire-and-forget.
    pub fn start(&self, known_sessions: Vec<String>, root_session: Option<String>) {
        let _ = self.tx.send(RecorderMsg::Start {
            known_sessions,
            root_session,
        });
    }

    /// Deliver one instrumentation event. Fire-and-forget; if the task
    /// is gone the event is silently discarded, matching the rule that
    /// nothing on the event path may fail outward.
    pub fn event(&self, event: NetworkEvent) {
        let _ = self.tx.send(RecorderMsg::Event(event));
    }

    /// Stop recording and write the archive, returning its path.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::TaskShutDown`] if the recorder task has
    /// already exited.
    pub async fn finalize(&self) -> Result<PathBuf, RecorderError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(RecorderMsg::Finalize { reply: reply_tx })
            .map_err(|_| RecorderError::TaskShutDown)?;
        reply_rx.await.map_err(|_| RecorderError::TaskShutDown)
    }
}
