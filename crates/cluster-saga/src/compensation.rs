use std::fmt;

use tracing::{error, info};

use crate::audit::SagaAuditLog;
use crate::client::GroupClient;
use crate::error::{OperationError, SagaError};
use crate::host::{GroupId, Host};
use crate::operations::HostOperations;
use crate::outcome::{HostOperation, Phase};

/// Hosts whose intended end state could not be confirmed, in host order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidualSet(Vec<Host>);

impl ResidualSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, host: &Host) {
        if !self.0.contains(host) {
            self.0.push(host.clone());
        }
    }

    pub(crate) fn remove(&mut self, host: &Host) {
        self.0.retain(|h| h != host);
    }

    #[must_use]
    pub fn hosts(&self) -> &[Host] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Host> {
        self.0
    }
}

impl From<Vec<Host>> for ResidualSet {
    fn from(hosts: Vec<Host>) -> Self {
        Self(hosts)
    }
}

impl fmt::Display for ResidualSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hosts: Vec<&str> = self.0.iter().map(Host::as_str).collect();
        f.write_str(&hosts.join(", "))
    }
}

/// Undoes a partially applied creation: delete, then confirm absence.
pub struct CompensationRunner<'a, C> {
    operations: &'a HostOperations<C>,
}

impl<'a, C: GroupClient> CompensationRunner<'a, C> {
    #[must_use]
    pub fn new(operations: &'a HostOperations<C>) -> Self {
        Self { operations }
    }

    /// Delete `group` from every host in `success_hosts`, in order, and
    /// return the hosts where removal could not be confirmed.
    ///
    /// A host lands in the residual set when its delete is rejected, when
    /// the group is still visible afterwards, or when its calls fail.
    /// Every host is visited regardless of failures on earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`SagaError::RollbackIncomplete`] after the last host if any
    /// host call failed outside the transport/rejection taxonomy. The error
    /// carries the full residual set; the first such failure is its source.
    pub async fn compensate(
        &self,
        group: &GroupId,
        success_hosts: &[Host],
        audit: &mut SagaAuditLog,
    ) -> Result<ResidualSet, SagaError> {
        info!(%group, hosts = success_hosts.len(), "rolling back creation on successful hosts");
        let mut residual = ResidualSet::new();
        let mut first_unexpected = None;

        for host in success_hosts {
            match self.compensate_host(group, host, audit).await {
                Ok(true) => {}
                Ok(false) => residual.push(host),
                Err(err) => {
                    error!(%host, %group, error = %err, "error during rollback");
                    residual.push(host);
                    if !err.is_retries_exhausted() && first_unexpected.is_none() {
                        first_unexpected = Some(err);
                    }
                }
            }
        }

        if let Some(source) = first_unexpected {
            return Err(SagaError::RollbackIncomplete { residual, source });
        }
        if residual.is_empty() {
            info!(%group, "rollback performed successfully");
        }
        Ok(residual)
    }

    /// `Ok(true)` when the host confirmed the group is gone.
    async fn compensate_host(
        &self,
        group: &GroupId,
        host: &Host,
        audit: &mut SagaAuditLog,
    ) -> Result<bool, OperationError> {
        let deleted = self
            .operations
            .run_audited(HostOperation::Delete, Phase::Compensating, host, group, audit)
            .await?;
        if !deleted {
            error!(%host, %group, "failed to roll back creation");
            return Ok(false);
        }

        let still_exists = self
            .operations
            .run_audited(HostOperation::Verify, Phase::Compensating, host, group, audit)
            .await?;
        if still_exists {
            error!(%host, %group, "group still exists after rollback attempt");
            return Ok(false);
        }
        Ok(true)
    }
}
