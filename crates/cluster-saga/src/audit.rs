use std::time::Instant;

use crate::error::OperationError;
use crate::host::Host;
use crate::outcome::{HostOperation, Phase};

/// Status of a host call in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationStatus {
    /// Call is in flight.
    Started,
    /// The host confirmed the operation (or, for verify, that the group exists).
    Succeeded,
    /// The host answered negatively.
    Rejected,
    /// Every attempt failed at the transport level.
    Exhausted,
    /// Failed outside the expected taxonomy.
    Failed,
}

impl OperationStatus {
    #[must_use]
    pub fn from_result(result: &Result<bool, OperationError>) -> Self {
        match result {
            Ok(true) => Self::Succeeded,
            Ok(false) => Self::Rejected,
            Err(err) if err.is_retries_exhausted() => Self::Exhausted,
            Err(_) => Self::Failed,
        }
    }
}

/// Record of one host call made by a coordinator.
#[derive(Debug)]
pub struct OperationRecord {
    /// Host the call went to.
    pub host: Host,
    /// Which group operation was attempted.
    pub operation: HostOperation,
    /// Saga phase (or delete run) the call belonged to.
    pub phase: Phase,
    /// Current status; `Started` until the call returns.
    pub status: OperationStatus,
    /// When the call, including its retries, began.
    pub started_at: Instant,
    /// When the call finished. `None` while in flight.
    pub completed_at: Option<Instant>,
}

/// Audit log of every host call in one coordinator run, in call order.
#[derive(Debug, Default)]
pub struct SagaAuditLog {
    records: Vec<OperationRecord>,
}

impl SagaAuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_start(&mut self, host: &Host, operation: HostOperation, phase: Phase) {
        self.records.push(OperationRecord {
            host: host.clone(),
            operation,
            phase,
            status: OperationStatus::Started,
            started_at: Instant::now(),
            completed_at: None,
        });
    }

    /// Complete the last started record.
    pub(crate) fn record_finish(&mut self, status: OperationStatus) {
        if let Some(record) = self.records.last_mut() {
            record.status = status;
            record.completed_at = Some(Instant::now());
        }
    }

    #[must_use]
    pub fn records(&self) -> &[OperationRecord] {
        &self.records
    }

    /// Hosts called with `operation` during `phase`, in call order.
    #[must_use]
    pub fn hosts_for(&self, phase: Phase, operation: HostOperation) -> Vec<&Host> {
        self.records
            .iter()
            .filter(|r| r.phase == phase && r.operation == operation)
            .map(|r| &r.host)
            .collect()
    }

    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        for record in &self.records {
            let status = match record.status {
                OperationStatus::Started => "…",
                OperationStatus::Succeeded => "✓",
                OperationStatus::Rejected => "✗",
                OperationStatus::Exhausted => "⟳",
                OperationStatus::Failed => "⚠",
            };
            lines.push(format!(
                "{status} {} {} {}",
                record.phase, record.operation, record.host
            ));
        }
        lines.join("\n")
    }
}
