//! collector-admin - admin client for the market collector.
//!
//! Core library exposing the batch task submitter, the typed REST client for
//! the collector admin API, and the configuration/catalog layer used by the
//! `collector-admin` binary.

pub mod client;
pub mod config;
pub mod models;
pub mod paginate;
pub mod submit;
pub mod ticker;

pub use client::{AdminClient, AdminClientBuilder, ClientError};
pub use config::{Catalog, Config, Settings};
pub use submit::{
    partition, BatchOutcome, BatchSubmitter, FailureKind, ProgressState, Selection,
    SubmissionResult, TaskSink, ValidationError, BATCH_SIZE,
};
