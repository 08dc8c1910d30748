//! Batched task submission.
//!
//! A selection of product ids is split into batches of at most [`BATCH_SIZE`]
//! and each batch is handed to a [`TaskSink`] as one request. Batches run
//! strictly one after another: the next batch is not started until the
//! previous one has resolved. A failed batch is recorded and the run moves on.

mod selection;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Catalog;
use crate::models::TaskRequest;

pub use selection::{Context, Selection, SelectionBuilder, ValidationError};

/// Maximum number of tasks sent in one request.
pub const BATCH_SIZE: usize = 10;

/// Why a batch did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The backend answered and refused the batch.
    Rejected,
    /// The backend answered with something that is not a batch response.
    Malformed,
    /// The request never got an answer.
    Transport,
    /// The session is not logged in.
    Unauthorized,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rejected => "rejected",
            Self::Malformed => "malformed",
            Self::Transport => "transport",
            Self::Unauthorized => "unauthorized",
        }
    }
}

/// Failure reported by a [`TaskSink`] for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchError {
    pub kind: FailureKind,
    pub message: String,
}

impl BatchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Acknowledgement of an accepted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReceipt {
    /// Tasks the backend actually inserted. Existing tasks are skipped
    /// server-side, so this can be lower than the batch size.
    pub created: usize,
}

/// Destination for task batches.
#[async_trait]
pub trait TaskSink: Send + Sync {
    /// Submit one batch as a single request.
    async fn submit_batch(&self, tasks: &[TaskRequest]) -> Result<BatchReceipt, BatchError>;
}

/// Cumulative progress of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressState {
    pub completed: usize,
    pub total: usize,
}

impl ProgressState {
    /// Rounded percentage, as shown on a progress bar.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u8
    }
}

/// Result of one batch, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
    Success {
        index: usize,
        accepted: usize,
        created: usize,
    },
    Failure {
        index: usize,
        size: usize,
        kind: FailureKind,
        message: String,
    },
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Success { index, .. } | Self::Failure { index, .. } => *index,
        }
    }
}

/// How a finished run should be reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunSummary {
    AllSucceeded,
    /// Some, but not all, batches failed.
    PartialFailure,
    AllFailed,
}

/// Aggregate of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub has_error: bool,
    pub outcomes: Vec<BatchOutcome>,
    pub progress: ProgressState,
}

impl SubmissionResult {
    pub fn completed(&self) -> usize {
        self.progress.completed
    }

    pub fn total(&self) -> usize {
        self.progress.total
    }

    /// Tasks the backend reports as newly created across all batches.
    pub fn created(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                BatchOutcome::Success { created, .. } => *created,
                BatchOutcome::Failure { .. } => 0,
            })
            .sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &BatchOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn summary(&self) -> RunSummary {
        let failed = self.failures().count();
        if failed == 0 {
            RunSummary::AllSucceeded
        } else if failed == self.outcomes.len() {
            RunSummary::AllFailed
        } else {
            RunSummary::PartialFailure
        }
    }
}

/// Split a selection into contiguous batches of at most [`BATCH_SIZE`].
pub fn partition(ids: &[i64]) -> Vec<&[i64]> {
    ids.chunks(BATCH_SIZE).collect()
}

/// Drives a submission run against a sink.
pub struct BatchSubmitter<'a, S: TaskSink + ?Sized> {
    sink: &'a S,
    catalog: &'a Catalog,
}

impl<'a, S: TaskSink + ?Sized> BatchSubmitter<'a, S> {
    pub fn new(sink: &'a S, catalog: &'a Catalog) -> Self {
        Self { sink, catalog }
    }

    /// Validate raw input, then run.
    ///
    /// Returns a [`ValidationError`] without touching the sink when the
    /// selection is empty or the context does not resolve.
    pub async fn submit<F>(
        &self,
        selection: &[i64],
        context: Option<i64>,
        on_progress: F,
    ) -> Result<SubmissionResult, ValidationError>
    where
        F: FnMut(ProgressState),
    {
        let selection = Selection::new(selection.iter().copied())?;
        let context = Context::resolve(context, self.catalog)?;
        Ok(self.run(&selection, context, on_progress).await)
    }

    /// Submit an already validated selection.
    ///
    /// `on_progress` is called after every successful batch, in batch order.
    pub async fn run<F>(
        &self,
        selection: &Selection,
        context: Context,
        mut on_progress: F,
    ) -> SubmissionResult
    where
        F: FnMut(ProgressState),
    {
        let batches = partition(selection.ids());
        let mut progress = ProgressState {
            completed: 0,
            total: selection.len(),
        };
        let mut outcomes = Vec::with_capacity(batches.len());
        let mut has_error = false;

        info!(
            "Submitting {} tasks for server {} in {} batch(es)",
            progress.total,
            context.id(),
            batches.len()
        );

        for (index, batch) in batches.into_iter().enumerate() {
            let tasks: Vec<TaskRequest> = batch
                .iter()
                .map(|&product| TaskRequest::new(context.id(), product))
                .collect();

            debug!("Batch {}: {} task(s)", index + 1, tasks.len());

            match self.sink.submit_batch(&tasks).await {
                Ok(receipt) => {
                    progress.completed += tasks.len();
                    on_progress(progress);
                    outcomes.push(BatchOutcome::Success {
                        index,
                        accepted: tasks.len(),
                        created: receipt.created,
                    });
                }
                Err(err) => {
                    has_error = true;
                    warn!(
                        "Batch {} failed ({}): {}",
                        index + 1,
                        err.kind.as_str(),
                        err.message
                    );
                    outcomes.push(BatchOutcome::Failure {
                        index,
                        size: tasks.len(),
                        kind: err.kind,
                        message: err.message,
                    });
                }
            }
        }

        info!(
            "Submission finished: {}/{} tasks accepted",
            progress.completed, progress.total
        );

        SubmissionResult {
            has_error,
            outcomes,
            progress,
        }
    }
}
