use std::fmt;

use tracing::{error, info};

use crate::audit::SagaAuditLog;
use crate::client::GroupClient;
use crate::compensation::{CompensationRunner, ResidualSet};
use crate::error::{OperationError, SagaError};
use crate::host::{GroupId, Host, HostList};
use crate::operations::HostOperations;
use crate::outcome::{HostOperation, Phase};

/// Lifecycle of one saga run.
///
/// `Creating -> Verifying -> Committed` on success,
/// `Creating | Verifying -> Compensating -> Aborted` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaState {
    Creating,
    Verifying,
    Compensating,
    Committed,
    Aborted,
}

impl fmt::Display for SagaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Creating => "creating",
            Self::Verifying => "verifying",
            Self::Compensating => "compensating",
            Self::Committed => "committed",
            Self::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// Why the forward or verify phase stopped.
#[derive(Debug)]
pub enum PhaseFailure {
    /// The host answered negatively.
    Rejected { phase: Phase, host: Host },
    /// The host could not be reached within the retry policy.
    Exhausted { phase: Phase, source: OperationError },
}

impl PhaseFailure {
    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Self::Rejected { phase, .. } | Self::Exhausted { phase, .. } => *phase,
        }
    }

    #[must_use]
    pub fn host(&self) -> &Host {
        match self {
            Self::Rejected { host, .. } => host,
            Self::Exhausted { source, .. } => source.host(),
        }
    }
}

impl fmt::Display for PhaseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { phase, host } => write!(f, "'{host}' refused while {phase}"),
            Self::Exhausted { phase, source } => write!(f, "{source} while {phase}"),
        }
    }
}

/// Result of the forward or verify phase.
#[derive(Debug)]
enum PhaseOutcome {
    Completed,
    Failed(PhaseFailure),
}

/// Everything a saga run decided and did.
#[derive(Debug)]
pub struct SagaReport {
    /// The group the run tried to create.
    pub group: GroupId,
    /// Either [`SagaState::Committed`] or [`SagaState::Aborted`].
    pub state: SagaState,
    /// Hosts the forward phase created the group on, in host order.
    pub success_hosts: Vec<Host>,
    /// Why the run aborted. `None` when committed.
    pub failure: Option<PhaseFailure>,
    /// Hosts compensation could not clean up. Empty when committed.
    pub residual: ResidualSet,
    /// Every host call made during the run, in order.
    pub audit: SagaAuditLog,
}

impl SagaReport {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.state == SagaState::Committed
    }
}

/// Creates a group on every host or on none of them, as far as the hosts
/// allow.
///
/// Creation runs on all hosts first, then a separate pass verifies each
/// one. Any rejection or unreachable host aborts the run and deletes the
/// group again from hosts that already accepted it.
pub struct SagaCoordinator<C> {
    hosts: HostList,
    operations: HostOperations<C>,
}

impl<C: GroupClient> SagaCoordinator<C> {
    #[must_use]
    pub fn new(hosts: HostList, operations: HostOperations<C>) -> Self {
        Self { hosts, operations }
    }

    #[must_use]
    pub fn operations(&self) -> &HostOperations<C> {
        &self.operations
    }

    /// Run the saga, returning `true` only if the group was created and
    /// verified on every host.
    ///
    /// # Errors
    ///
    /// Returns [`SagaError::Unexpected`] for failures outside the
    /// rejection/transport taxonomy while creating or verifying, and
    /// [`SagaError::RollbackIncomplete`] when such a failure hits during
    /// rollback. Expected failures return `Ok(false)`.
    pub async fn execute(&self, group: &GroupId) -> Result<bool, SagaError> {
        let report = self.execute_with_report(group).await?;
        Ok(report.is_committed())
    }

    /// Run the saga and return the full report, including the residual set
    /// and the audit log.
    ///
    /// # Errors
    ///
    /// Same as [`SagaCoordinator::execute`].
    pub async fn execute_with_report(&self, group: &GroupId) -> Result<SagaReport, SagaError> {
        let mut audit = SagaAuditLog::new();
        let mut success_hosts = Vec::new();

        transition(group, SagaState::Creating);
        let mut outcome = self.create_all(group, &mut success_hosts, &mut audit).await?;

        if matches!(outcome, PhaseOutcome::Completed) {
            transition(group, SagaState::Verifying);
            outcome = self.verify_all(group, &success_hosts, &mut audit).await?;
        }

        let failure = match outcome {
            PhaseOutcome::Completed => {
                transition(group, SagaState::Committed);
                return Ok(SagaReport {
                    group: group.clone(),
                    state: SagaState::Committed,
                    success_hosts,
                    failure: None,
                    residual: ResidualSet::new(),
                    audit,
                });
            }
            PhaseOutcome::Failed(failure) => failure,
        };

        error!(%group, %failure, "error during group creation, initiating rollback");
        transition(group, SagaState::Compensating);

        let residual = if success_hosts.is_empty() {
            ResidualSet::new()
        } else {
            CompensationRunner::new(&self.operations)
                .compensate(group, &success_hosts, &mut audit)
                .await?
        };
        if !residual.is_empty() {
            error!(
                %group,
                hosts = %residual,
                "rollback failed, group left behind on hosts"
            );
        }

        transition(group, SagaState::Aborted);
        Ok(SagaReport {
            group: group.clone(),
            state: SagaState::Aborted,
            success_hosts,
            failure: Some(failure),
            residual,
            audit,
        })
    }

    async fn create_all(
        &self,
        group: &GroupId,
        success_hosts: &mut Vec<Host>,
        audit: &mut SagaAuditLog,
    ) -> Result<PhaseOutcome, SagaError> {
        for host in &self.hosts {
            let created = self
                .operations
                .run_audited(HostOperation::Create, Phase::Creating, host, group, audit)
                .await;
            match created {
                Ok(true) => success_hosts.push(host.clone()),
                Ok(false) => {
                    return Ok(PhaseOutcome::Failed(PhaseFailure::Rejected {
                        phase: Phase::Creating,
                        host: host.clone(),
                    }));
                }
                Err(err) => return phase_error(Phase::Creating, err),
            }
        }
        Ok(PhaseOutcome::Completed)
    }

    async fn verify_all(
        &self,
        group: &GroupId,
        success_hosts: &[Host],
        audit: &mut SagaAuditLog,
    ) -> Result<PhaseOutcome, SagaError> {
        for host in success_hosts {
            let exists = self
                .operations
                .run_audited(HostOperation::Verify, Phase::Verifying, host, group, audit)
                .await;
            match exists {
                Ok(true) => {}
                Ok(false) => {
                    return Ok(PhaseOutcome::Failed(PhaseFailure::Rejected {
                        phase: Phase::Verifying,
                        host: host.clone(),
                    }));
                }
                Err(err) => return phase_error(Phase::Verifying, err),
            }
        }
        Ok(PhaseOutcome::Completed)
    }
}

fn phase_error(phase: Phase, err: OperationError) -> Result<PhaseOutcome, SagaError> {
    if err.is_retries_exhausted() {
        Ok(PhaseOutcome::Failed(PhaseFailure::Exhausted {
            phase,
            source: err,
        }))
    } else {
        Err(SagaError::Unexpected { phase, source: err })
    }
}

fn transition(group: &GroupId, state: SagaState) {
    info!(%group, %state, "saga state");
}
