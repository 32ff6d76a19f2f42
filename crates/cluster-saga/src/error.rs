use thiserror::Error;

use crate::compensation::ResidualSet;
use crate::host::Host;
use crate::outcome::{HostOperation, Phase};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error from a single exchange with one host.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HostError {
    /// No usable response: connection refused, timeout, broken body.
    #[error("transport failure on '{host}'")]
    Transport {
        host: Host,
        #[source]
        source: BoxError,
    },

    /// Anything outside the transport/rejection taxonomy.
    #[error("unexpected error on '{host}'")]
    Unexpected {
        host: Host,
        #[source]
        source: BoxError,
    },
}

impl HostError {
    pub fn transport(host: &Host, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            host: host.clone(),
            source: source.into(),
        }
    }

    pub fn unexpected(host: &Host, source: impl Into<BoxError>) -> Self {
        Self::Unexpected {
            host: host.clone(),
            source: source.into(),
        }
    }

    #[must_use]
    pub fn host(&self) -> &Host {
        match self {
            Self::Transport { host, .. } | Self::Unexpected { host, .. } => host,
        }
    }

    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Error from the generic retry wrapper.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Every attempt failed with a retryable error.
    #[error("gave up after {attempts} attempt(s)")]
    Exhausted {
        attempts: u32,
        #[source]
        last: E,
    },

    /// A non-retryable error, returned from the attempt that raised it.
    #[error(transparent)]
    Fatal(E),
}

/// Error from one host operation after retrying.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OperationError {
    #[error("{operation} on '{host}' gave up after {attempts} attempt(s)")]
    RetriesExhausted {
        host: Host,
        operation: HostOperation,
        attempts: u32,
        #[source]
        source: HostError,
    },

    #[error("{operation} on '{host}' failed unexpectedly")]
    Unexpected {
        host: Host,
        operation: HostOperation,
        #[source]
        source: HostError,
    },
}

impl OperationError {
    pub(crate) fn from_retry(
        host: &Host,
        operation: HostOperation,
        err: RetryError<HostError>,
    ) -> Self {
        match err {
            RetryError::Exhausted { attempts, last } => Self::RetriesExhausted {
                host: host.clone(),
                operation,
                attempts,
                source: last,
            },
            RetryError::Fatal(source) => Self::Unexpected {
                host: host.clone(),
                operation,
                source,
            },
        }
    }

    #[must_use]
    pub fn host(&self) -> &Host {
        match self {
            Self::RetriesExhausted { host, .. } | Self::Unexpected { host, .. } => host,
        }
    }

    #[must_use]
    pub fn is_retries_exhausted(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }
}

/// Error from a coordinator run.
///
/// Rejections and exhausted retries are business outcomes reported through
/// return values; only errors outside that taxonomy end up here.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SagaError {
    #[error("unexpected failure while {phase}")]
    Unexpected {
        phase: Phase,
        #[source]
        source: OperationError,
    },

    /// Rollback visited every host, but at least one failed unexpectedly.
    /// `residual` lists every host that may still hold the group.
    #[error("rollback failed unexpectedly, group left on: {residual}")]
    RollbackIncomplete {
        residual: ResidualSet,
        #[source]
        source: OperationError,
    },
}

impl SagaError {
    /// Hosts known to still need cleanup, if the error carries them.
    #[must_use]
    pub fn residual(&self) -> Option<&ResidualSet> {
        match self {
            Self::Unexpected { .. } => None,
            Self::RollbackIncomplete { residual, .. } => Some(residual),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    fn io_error() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused")
    }

    #[test]
    fn transport_error_is_transport() {
        let host = Host::new("http://a");
        let err = HostError::transport(&host, io_error());

        assert!(err.is_transport());
        assert_eq!(err.host(), &host);
    }

    #[test]
    fn unexpected_error_is_not_transport() {
        let err = HostError::unexpected(&Host::new("http://a"), "malformed");

        assert!(!err.is_transport());
    }

    #[test]
    fn exhausted_retry_becomes_retries_exhausted() {
        let host = Host::new("http://a");
        let retry = RetryError::Exhausted {
            attempts: 3,
            last: HostError::transport(&host, io_error()),
        };

        let err = OperationError::from_retry(&host, HostOperation::Create, retry);

        assert!(err.is_retries_exhausted());
        assert_eq!(
            err.to_string(),
            "create on 'http://a' gave up after 3 attempt(s)"
        );
    }

    #[test]
    fn fatal_retry_becomes_unexpected() {
        let host = Host::new("http://a");
        let retry = RetryError::Fatal(HostError::unexpected(&host, "boom"));

        let err = OperationError::from_retry(&host, HostOperation::Delete, retry);

        assert!(!err.is_retries_exhausted());
        assert_eq!(err.host(), &host);
    }

    #[test]
    fn saga_error_has_source_chain() {
        let host = Host::new("http://a");
        let err = SagaError::Unexpected {
            phase: Phase::Creating,
            source: OperationError::Unexpected {
                host: host.clone(),
                operation: HostOperation::Create,
                source: HostError::unexpected(&host, "boom"),
            },
        };

        assert_eq!(err.to_string(), "unexpected failure while creating");
        let source = err.source().expect("saga error should have a source");
        assert!(source.to_string().contains("create on 'http://a'"));
        assert!(err.residual().is_none());
    }

    #[test]
    fn incomplete_rollback_names_residual_hosts() {
        let host = Host::new("http://a");
        let err = SagaError::RollbackIncomplete {
            residual: ResidualSet::from(vec![host.clone(), Host::new("http://c")]),
            source: OperationError::Unexpected {
                host: host.clone(),
                operation: HostOperation::Delete,
                source: HostError::unexpected(&host, "boom"),
            },
        };

        assert_eq!(
            err.to_string(),
            "rollback failed unexpectedly, group left on: http://a, http://c"
        );
        assert_eq!(err.residual().map(ResidualSet::len), Some(2));
    }
}
