use async_trait::async_trait;

use crate::error::HostError;
use crate::host::{GroupId, Host};
use crate::outcome::HostOutcome;

/// One request/response exchange per call against a single host.
///
/// Implementations do not retry; [`HostOperations`](crate::HostOperations)
/// wraps every call in the retry policy.
#[async_trait]
pub trait GroupClient: Send + Sync {
    /// # Errors
    ///
    /// Returns [`HostError::Transport`] when no usable response was received.
    async fn create(&self, host: &Host, group: &GroupId) -> Result<HostOutcome, HostError>;

    /// # Errors
    ///
    /// Returns [`HostError::Transport`] when no usable response was received.
    async fn delete(&self, host: &Host, group: &GroupId) -> Result<HostOutcome, HostError>;

    /// `Success` means the group exists on the host.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Transport`] when no usable response was received.
    async fn exists(&self, host: &Host, group: &GroupId) -> Result<HostOutcome, HostError>;
}
