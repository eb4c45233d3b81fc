//! Error types for the harcap-recorder crate.
//!
//! Event handling itself never fails outward -- malformed events are
//! defaulted or dropped with logging. Errors here cover the control
//! surface only.

use thiserror::Error;

/// Errors from the recorder handle's control operations.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The recorder task exited, so the command could not be delivered.
    #[error("recorder task has shut down")]
    TaskShutDown,
}
