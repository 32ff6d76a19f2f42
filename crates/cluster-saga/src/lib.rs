//! Saga coordination of group operations across a fixed set of hosts.
//!
//! Creating a group is a saga: the group is created on every host, then
//! verified on every host, and if either pass fails the hosts that already
//! accepted it are compensated by deleting it again. Every host call goes
//! through a bounded retry with exponential backoff. Deleting a group is a
//! plain per-host bulk operation that reports the hosts it could not clean.
//!
//! The network is behind the [`GroupClient`] trait; the coordinators take
//! their host list explicitly.

mod audit;
mod client;
mod compensation;
mod coordinator;
mod delete;
mod error;
mod host;
#[cfg(any(test, feature = "testing"))]
pub mod mocks;
mod operations;
mod outcome;
mod retry;

pub use audit::{OperationRecord, OperationStatus, SagaAuditLog};
pub use client::GroupClient;
pub use compensation::{CompensationRunner, ResidualSet};
pub use coordinator::{PhaseFailure, SagaCoordinator, SagaReport, SagaState};
pub use delete::{ClusterDelete, DeleteErrorPolicy};
pub use error::{BoxError, HostError, OperationError, RetryError, SagaError};
pub use host::{GroupId, Host, HostList};
pub use operations::HostOperations;
pub use outcome::{HostOperation, HostOutcome, Phase};
pub use retry::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY, RetryPolicy, retry,
};
