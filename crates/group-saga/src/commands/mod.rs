mod create;
mod delete;
mod run;

use std::time::Duration;

use clap::Subcommand;
use cluster_http::HttpGroupClient;
use cluster_saga::{GroupId, HostList, HostOperations, RetryPolicy};

use crate::error::{CliError, Result};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create a group on every host, rolling back if any host fails
    Create {
        /// Group identifier
        group: String,
    },
    /// Delete a group from every host
    Delete {
        /// Group identifier
        group: String,
    },
    /// Create a group, then delete it again
    Run {
        /// Group identifier
        group: String,
    },
}

/// Everything a command needs to talk to the cluster.
pub(crate) struct CommandContext {
    pub(crate) hosts: HostList,
    pub(crate) timeout: Duration,
    pub(crate) policy: RetryPolicy,
    pub(crate) show_audit: bool,
}

impl CommandContext {
    pub(crate) fn operations(&self) -> Result<HostOperations<HttpGroupClient>> {
        let client = HttpGroupClient::new(self.timeout)?;
        Ok(HostOperations::new(client, self.policy))
    }
}

impl Commands {
    /// Returns whether the requested operation fully succeeded.
    pub(crate) async fn execute(self, ctx: &CommandContext) -> Result<bool> {
        match self {
            Self::Create { group } => create::run(ctx, &parse_group(&group)?).await,
            Self::Delete { group } => delete::run(ctx, &parse_group(&group)?).await,
            Self::Run { group } => run::run(ctx, &parse_group(&group)?).await,
        }
    }
}

fn parse_group(raw: &str) -> Result<GroupId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyGroupId);
    }
    Ok(GroupId::new(trimmed))
}
