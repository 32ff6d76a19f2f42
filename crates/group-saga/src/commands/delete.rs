use cluster_saga::{ClusterDelete, GroupId};
use tracing::info;

use super::CommandContext;
use crate::error::Result;
use crate::output;

pub(crate) async fn run(ctx: &CommandContext, group: &GroupId) -> Result<bool> {
    info!(%group, hosts = ctx.hosts.len(), "starting group deletion");
    let delete = ClusterDelete::new(ctx.hosts.clone(), ctx.operations()?);

    let (residual, audit) = delete.delete_group_with_audit(group).await?;

    print!("{}", output::format_delete_result(group, &residual));
    if ctx.show_audit {
        println!("{}", audit.summary());
    }
    Ok(residual.is_empty())
}
