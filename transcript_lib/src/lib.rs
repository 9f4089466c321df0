//! Library layer for transcript retrieval: configuration, the guarded
//! retrieval run, grouping of raw records, and dataset persistence.
//!
//! Wraps the `transcript_api` protocol crate; the CLI only talks to this
//! crate.

pub mod config;
pub mod error;
pub mod grouping;
pub mod retrieval;
pub mod store;

pub use transcript_api;
pub use transcript_api::types;
pub use transcript_api::{Credentials, Endpoints, PeriodId, PeriodPayload, SkippedPeriod};

pub use config::{Config, OutputPaths};
pub use error::TranscriptError;
pub use grouping::{group_by_display_name, CompressedCourse, NormalizedDataset};
pub use retrieval::{retrieve_transcript, RetrievalOutcome};
