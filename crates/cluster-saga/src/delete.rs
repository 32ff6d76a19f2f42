use tracing::{error, info, warn};

use crate::audit::SagaAuditLog;
use crate::client::GroupClient;
use crate::compensation::ResidualSet;
use crate::error::SagaError;
use crate::host::{GroupId, HostList};
use crate::operations::HostOperations;
use crate::outcome::{HostOperation, Phase};

/// How [`ClusterDelete`] treats errors outside the rejection/transport
/// taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteErrorPolicy {
    /// Keep the host in the residual set and move on.
    #[default]
    Contain,
    /// Stop and return [`SagaError::Unexpected`].
    Propagate,
}

/// Deletes a group from every host independently. No compensation.
pub struct ClusterDelete<C> {
    hosts: HostList,
    operations: HostOperations<C>,
    error_policy: DeleteErrorPolicy,
}

impl<C: GroupClient> ClusterDelete<C> {
    #[must_use]
    pub fn new(hosts: HostList, operations: HostOperations<C>) -> Self {
        Self {
            hosts,
            operations,
            error_policy: DeleteErrorPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_error_policy(mut self, error_policy: DeleteErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    #[must_use]
    pub fn operations(&self) -> &HostOperations<C> {
        &self.operations
    }

    /// Delete `group` from every host and return the hosts where deletion
    /// was not confirmed, in host order.
    ///
    /// # Errors
    ///
    /// Only with [`DeleteErrorPolicy::Propagate`]: returns
    /// [`SagaError::Unexpected`] on the first unexpected host error.
    pub async fn delete_group(&self, group: &GroupId) -> Result<ResidualSet, SagaError> {
        let (residual, _audit) = self.delete_group_with_audit(group).await?;
        Ok(residual)
    }

    /// Like [`delete_group`](Self::delete_group), also returning the audit log.
    ///
    /// # Errors
    ///
    /// Only with [`DeleteErrorPolicy::Propagate`]: returns
    /// [`SagaError::Unexpected`] on the first unexpected host error.
    pub async fn delete_group_with_audit(
        &self,
        group: &GroupId,
    ) -> Result<(ResidualSet, SagaAuditLog), SagaError> {
        let mut audit = SagaAuditLog::new();
        let mut residual = ResidualSet::from(self.hosts.as_slice().to_vec());

        for host in &self.hosts {
            let deleted = self
                .operations
                .run_audited(HostOperation::Delete, Phase::Deleting, host, group, &mut audit)
                .await;
            match deleted {
                Ok(true) => residual.remove(host),
                Ok(false) => warn!(%host, %group, "deletion failed on host"),
                Err(err) if err.is_retries_exhausted() => {
                    error!(%host, %group, error = %err, "error during deletion on host");
                }
                Err(err) => match self.error_policy {
                    DeleteErrorPolicy::Contain => {
                        error!(
                            %host,
                            %group,
                            error = %err,
                            "unexpected error during deletion on host"
                        );
                    }
                    DeleteErrorPolicy::Propagate => {
                        return Err(SagaError::Unexpected {
                            phase: Phase::Deleting,
                            source: err,
                        });
                    }
                },
            }
        }

        if residual.is_empty() {
            info!(%group, "group deleted from all hosts");
        }
        Ok((residual, audit))
    }
}
