#![forbid(unsafe_code)]

//! Offline resilience for response submissions.
//!
//! A failed submission is never lost: [`ResponseQueue::submit_or_queue`]
//! delivers through the responses service when it can and otherwise appends
//! the submission to a durable per-form queue. When connectivity returns,
//! [`ResponseQueue::replay`] resends queued entries in order, dropping each
//! from the queue only after the service accepts it.

use std::collections::HashMap;

use crate::api::{ApiError, FormId, FormResponsesApi, ResponseSubmission};
use crate::storage::{QueueMap, QueueStorage, StorageResult};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Queue tuning knobs.
#[derive(Debug, Clone, Default)]
pub struct QueueConfig {
    /// Upper bound on queued submissions per form; the oldest entry is
    /// dropped when a new one would exceed it. `None` keeps everything.
    pub max_pending_per_form: Option<usize>,
}

impl QueueConfig {
    /// Bound the per-form queue length.
    #[must_use]
    pub fn with_max_pending(mut self, max: usize) -> Self {
        self.max_pending_per_form = Some(max);
        self
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What happened to one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The service accepted it.
    Delivered,
    /// The service was unreachable; the submission is queued.
    Queued {
        /// Pending entries for this form, including the new one.
        pending: usize,
    },
}

/// Result of one replay pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayReport {
    /// Entries the service accepted and that left the queue.
    pub delivered: usize,
    /// Entries still queued after the pass.
    pub kept: usize,
}

// ---------------------------------------------------------------------------
// ResponseQueue
// ---------------------------------------------------------------------------

/// Durable per-form queue of not-yet-submitted responses.
pub struct ResponseQueue<S: QueueStorage> {
    storage: S,
    pending: QueueMap,
    config: QueueConfig,
}

impl<S: QueueStorage> ResponseQueue<S> {
    /// Open a queue over the given backend, loading whatever it holds.
    ///
    /// A corrupt or unreadable store degrades to an empty queue rather than
    /// failing: resilience plumbing must not take the submission path down
    /// with it.
    pub fn open(storage: S, config: QueueConfig) -> Self {
        let pending = match storage.load_all() {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(backend = storage.name(), error = %e, "failed to load queue, starting empty");
                QueueMap::new()
            }
        };
        Self {
            storage,
            pending,
            config,
        }
    }

    /// Queued submissions for one form.
    #[must_use]
    pub fn pending_for(&self, form: FormId) -> usize {
        self.pending.get(&form).map_or(0, Vec::len)
    }

    /// Total queued submissions.
    #[must_use]
    pub fn pending_total(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    /// True if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.values().all(Vec::is_empty)
    }

    /// Submit now if possible, queue otherwise.
    ///
    /// Queueing persists through the backend before returning, so a closed
    /// session cannot lose the submission.
    pub fn submit_or_queue(
        &mut self,
        api: &dyn FormResponsesApi,
        submission: ResponseSubmission,
    ) -> StorageResult<SubmitOutcome> {
        match api.submit(&submission) {
            Ok(()) => {
                tracing::debug!(form = %submission.form_id, "response delivered");
                Ok(SubmitOutcome::Delivered)
            }
            Err(e) => {
                tracing::warn!(form = %submission.form_id, error = %e, "submission failed, queueing");
                let form = submission.form_id;
                let queue = self.pending.entry(form).or_default();
                queue.push(submission);
                if let Some(max) = self.config.max_pending_per_form {
                    while queue.len() > max {
                        queue.remove(0);
                    }
                }
                let pending = queue.len();
                self.persist()?;
                Ok(SubmitOutcome::Queued { pending })
            }
        }
    }

    /// Resend queued submissions.
    ///
    /// Entries replay oldest-first per form. The first failure for a form
    /// stops that form's pass (order is preserved); other forms still get
    /// their turn. Delivered entries leave the queue; the rest stay for the
    /// next pass.
    pub fn replay(&mut self, api: &dyn FormResponsesApi) -> StorageResult<ReplayReport> {
        let mut report = ReplayReport::default();
        let mut kept: QueueMap = HashMap::new();

        for (form, queue) in std::mem::take(&mut self.pending) {
            let mut remaining = Vec::new();
            let mut stalled = false;
            for submission in queue {
                if stalled {
                    remaining.push(submission);
                    continue;
                }
                match api.submit(&submission) {
                    Ok(()) => {
                        report.delivered += 1;
                    }
                    Err(e) => {
                        log_replay_failure(form, &e);
                        stalled = true;
                        remaining.push(submission);
                    }
                }
            }
            report.kept += remaining.len();
            if !remaining.is_empty() {
                kept.insert(form, remaining);
            }
        }

        self.pending = kept;
        self.persist()?;
        tracing::info!(
            delivered = report.delivered,
            kept = report.kept,
            "replay pass finished"
        );
        Ok(report)
    }

    /// Drop every queued submission.
    pub fn clear(&mut self) -> StorageResult<()> {
        self.pending.clear();
        self.storage.clear()
    }

    fn persist(&self) -> StorageResult<()> {
        self.storage.save_all(&self.pending)
    }
}

fn log_replay_failure(form: FormId, error: &ApiError) {
    tracing::warn!(form = %form, error = %error, "replay submission failed, keeping entry");
}
