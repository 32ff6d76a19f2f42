use cluster_saga::{GroupId, SagaCoordinator};
use tracing::info;

use super::CommandContext;
use crate::error::Result;
use crate::output;

pub(crate) async fn run(ctx: &CommandContext, group: &GroupId) -> Result<bool> {
    info!(%group, hosts = ctx.hosts.len(), "starting group creation");
    let saga = SagaCoordinator::new(ctx.hosts.clone(), ctx.operations()?);

    let report = saga.execute_with_report(group).await?;

    print!("{}", output::format_create_report(&report));
    if ctx.show_audit {
        println!("{}", report.audit.summary());
    }
    Ok(report.is_committed())
}
