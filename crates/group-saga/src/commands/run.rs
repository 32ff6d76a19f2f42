use cluster_saga::GroupId;

use super::{CommandContext, create, delete};
use crate::error::Result;

/// Create then delete, the way an operator smoke-tests a cluster.
///
/// Deletion runs even when creation was rolled back.
pub(crate) async fn run(ctx: &CommandContext, group: &GroupId) -> Result<bool> {
    let created = create::run(ctx, group).await?;
    let deleted = delete::run(ctx, group).await?;
    Ok(created && deleted)
}
