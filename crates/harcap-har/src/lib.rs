//! HAR 1.2 document model and archive writer.
//!
//! This crate owns the output side of harcap: the HTTP Archive data
//! model, the header normalization rules, and the one-shot serializer
//! that turns a finalized entry collection into a `.har` file. The
//! correlation logic that produces those entries lives in
//! `harcap-recorder`.

pub mod error;
pub mod headers;
pub mod model;
pub mod writer;

pub use error::ArchiveError;
pub use headers::{find_header, merge_missing, normalize_headers};
pub use model::{Content, Creator, Entry, Har, Header, PostData, Request, Response, Timings};
pub use writer::write_archive;
