use tracing::{error, info, warn};

use crate::audit::{OperationStatus, SagaAuditLog};
use crate::client::GroupClient;
use crate::error::{HostError, OperationError};
use crate::host::{GroupId, Host};
use crate::outcome::{HostOperation, HostOutcome, Phase};
use crate::retry::{RetryPolicy, retry};

/// Create, delete and verify against a single host, each call wrapped in
/// the retry policy.
///
/// A `false` result is a host-level answer. Transport failures that outlive
/// the policy become [`OperationError::RetriesExhausted`].
pub struct HostOperations<C> {
    client: C,
    policy: RetryPolicy,
}

impl<C: GroupClient> HostOperations<C> {
    #[must_use]
    pub fn new(client: C, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// # Errors
    ///
    /// Returns an error if retries are exhausted or the exchange fails unexpectedly.
    pub async fn create_on_host(
        &self,
        host: &Host,
        group: &GroupId,
    ) -> Result<bool, OperationError> {
        self.run(HostOperation::Create, host, group).await
    }

    /// # Errors
    ///
    /// Returns an error if retries are exhausted or the exchange fails unexpectedly.
    pub async fn delete_on_host(
        &self,
        host: &Host,
        group: &GroupId,
    ) -> Result<bool, OperationError> {
        self.run(HostOperation::Delete, host, group).await
    }

    /// `true` only when the host confirms the group exists.
    ///
    /// # Errors
    ///
    /// Returns an error if retries are exhausted or the exchange fails unexpectedly.
    pub async fn verify_exists_on_host(
        &self,
        host: &Host,
        group: &GroupId,
    ) -> Result<bool, OperationError> {
        self.run(HostOperation::Verify, host, group).await
    }

    pub(crate) async fn run_audited(
        &self,
        operation: HostOperation,
        phase: Phase,
        host: &Host,
        group: &GroupId,
        audit: &mut SagaAuditLog,
    ) -> Result<bool, OperationError> {
        audit.record_start(host, operation, phase);
        let result = self.run(operation, host, group).await;
        audit.record_finish(OperationStatus::from_result(&result));
        result
    }

    async fn run(
        &self,
        operation: HostOperation,
        host: &Host,
        group: &GroupId,
    ) -> Result<bool, OperationError> {
        let result = retry(&self.policy, HostError::is_transport, || {
            self.exchange(operation, host, group)
        })
        .await;

        match result {
            Ok(outcome) => {
                match outcome {
                    HostOutcome::Success => {
                        info!(%host, %group, %operation, %outcome, "host operation finished");
                    }
                    HostOutcome::Rejected { .. } => {
                        warn!(%host, %group, %operation, %outcome, "host operation finished");
                    }
                }
                Ok(outcome.is_success())
            }
            Err(err) => {
                let err = OperationError::from_retry(host, operation, err);
                error!(%host, %group, %operation, error = %err, "host operation failed");
                Err(err)
            }
        }
    }

    async fn exchange(
        &self,
        operation: HostOperation,
        host: &Host,
        group: &GroupId,
    ) -> Result<HostOutcome, HostError> {
        match operation {
            HostOperation::Create => self.client.create(host, group).await,
            HostOperation::Delete => self.client.delete(host, group).await,
            HostOperation::Verify => self.client.exists(host, group).await,
        }
    }
}
