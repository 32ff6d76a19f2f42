//! Scripted [`GroupClient`] for exercising coordinators without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::client::GroupClient;
use crate::error::HostError;
use crate::host::{GroupId, Host};
use crate::outcome::{HostOperation, HostOutcome};

/// What a scripted host answers to one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Success,
    Rejected(u16),
    Transport,
    Unexpected,
}

/// Answers each `(host, operation)` pair from a queue of replies.
///
/// The last reply in a queue repeats forever; pairs without a script
/// answer [`Reply::Success`]. Every call is recorded in order.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    scripts: Mutex<HashMap<(Host, HostOperation), VecDeque<Reply>>>,
    calls: Mutex<Vec<(Host, HostOperation)>>,
}

impl ScriptedClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if the script mutex is poisoned.
    #[must_use]
    pub fn on(
        self,
        host: &Host,
        operation: HostOperation,
        replies: impl IntoIterator<Item = Reply>,
    ) -> Self {
        self.scripts
            .lock()
            .expect("mutex poisoned")
            .insert((host.clone(), operation), replies.into_iter().collect());
        self
    }

    /// # Panics
    ///
    /// Panics if the call log mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<(Host, HostOperation)> {
        self.calls.lock().expect("mutex poisoned").clone()
    }

    #[must_use]
    pub fn calls_to(&self, host: &Host, operation: HostOperation) -> usize {
        self.calls()
            .iter()
            .filter(|(h, op)| h == host && *op == operation)
            .count()
    }

    /// Hosts that received `operation`, in call order with repeats.
    #[must_use]
    pub fn hosts_called(&self, operation: HostOperation) -> Vec<Host> {
        self.calls()
            .into_iter()
            .filter(|(_, op)| *op == operation)
            .map(|(host, _)| host)
            .collect()
    }

    fn answer(&self, host: &Host, operation: HostOperation) -> Result<HostOutcome, HostError> {
        self.calls
            .lock()
            .expect("mutex poisoned")
            .push((host.clone(), operation));

        let reply = {
            let mut scripts = self.scripts.lock().expect("mutex poisoned");
            match scripts.get_mut(&(host.clone(), operation)) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Reply::Success),
                Some(queue) => queue.front().copied().unwrap_or(Reply::Success),
                None => Reply::Success,
            }
        };

        match reply {
            Reply::Success => Ok(HostOutcome::Success),
            Reply::Rejected(status) => Ok(HostOutcome::Rejected { status }),
            Reply::Transport => Err(HostError::transport(host, "scripted transport failure")),
            Reply::Unexpected => Err(HostError::unexpected(host, "scripted unexpected failure")),
        }
    }
}

#[async_trait]
impl GroupClient for ScriptedClient {
    async fn create(&self, host: &Host, _group: &GroupId) -> Result<HostOutcome, HostError> {
        self.answer(host, HostOperation::Create)
    }

    async fn delete(&self, host: &Host, _group: &GroupId) -> Result<HostOutcome, HostError> {
        self.answer(host, HostOperation::Delete)
    }

    async fn exists(&self, host: &Host, _group: &GroupId) -> Result<HostOutcome, HostError> {
        self.answer(host, HostOperation::Verify)
    }
}
