#![forbid(unsafe_code)]

//! External collaborators of the formgrid builder.
//!
//! Everything the builder talks to beyond its own state lives here, as
//! seams rather than transports:
//!
//! - [`api`] - forms and form-responses service traits plus wire types
//! - [`memory`] - an in-memory implementation of both services
//! - [`storage`] - pluggable persistence for the offline queue
//! - [`offline`] - submit-or-queue and replay over any [`api::FormResponsesApi`]
//! - [`session`] - session-scoped dashboard state as an explicit service
//! - [`chart`] - chart kinds, data contract, and response aggregation
//!
//! All remote calls resolve on the embedding application's event loop; two
//! in-flight reads may complete in either order and callers keep whichever
//! arrived last. No call here panics on failure: errors are values, and the
//! offline queue is the fallback for failed submissions.

pub mod api;
pub mod chart;
pub mod memory;
pub mod offline;
pub mod session;
pub mod storage;

pub use api::{
    ApiError, ApiResult, FormId, FormRecord, FormResponsesApi, FormSummary, FormsApi, NewForm,
    ResponseRecord, ResponseSubmission, ResponseValue, SessionId,
};
pub use chart::{ChartDatum, ChartKind, ChartRenderer, tally_field};
pub use memory::InMemoryForms;
pub use offline::{QueueConfig, ReplayReport, ResponseQueue, SubmitOutcome};
pub use session::{
    DASHBOARD_STATE_KEY, DashboardConfig, DashboardConfigStore, DashboardPage, MemorySessionStore,
    SessionStore,
};
pub use storage::{FileStorage, MemoryStorage, QueueMap, QueueStorage, StorageError, StorageResult};
