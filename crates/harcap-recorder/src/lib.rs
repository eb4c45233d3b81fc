//! Event-driven network traffic correlator for agent-driven browsing.
//!
//! Chrome's DevTools protocol reports one network exchange as several
//! independently-timed events sharing an opaque request id, interleaved
//! across every tab and frame the agent touches. This crate joins those
//! streams back into complete per-request records and writes them out
//! as a HAR 1.2 archive on stop.
//!
//! # Architecture
//!
//! - **`event`**: the closed set of instrumentation events, parsed from
//!   raw CDP `(method, params)` pairs with every optional field
//!   defaulted.
//! - **`ledger`**: the correlator proper -- pending entries keyed by
//!   request id, finalized on terminal events, with per-hop redirect
//!   handling.
//! - **`extra_info`**: holding pen for header metadata that arrives
//!   before its request.
//! - **`sessions`**: per-target capture activation, so multi-tab and
//!   multi-frame traffic is not missed.
//! - **`recorder`**: the facade tying the above together, start to
//!   finalize.
//! - **`handle`**: a dedicated tokio task owning one recorder, so
//!   concurrent event-delivery contexts never share mutable state.
//!
//! The CDP transport itself is an external collaborator: events come in
//! via [`NetworkEvent::from_cdp`] or pre-built variants, and outbound
//! enable/disable commands leave on a [`command`] channel.

pub mod command;
pub mod error;
pub mod event;
pub mod extra_info;
pub mod handle;
pub mod ledger;
pub mod recorder;
pub mod sessions;

pub use command::{capture_command_channel, CaptureCommand};
pub use error::RecorderError;
pub use event::NetworkEvent;
pub use handle::RecorderHandle;
pub use ledger::RequestLedger;
pub use recorder::HarRecorder;
pub use sessions::SessionTracker;
