use std::fmt::Write as _;

use cluster_saga::{GroupId, ResidualSet, SagaReport};

pub(crate) fn format_create_report(report: &SagaReport) -> String {
    let mut output = String::new();
    let group = &report.group;

    if report.is_committed() {
        let _ = writeln!(
            output,
            "Group {group} created on all {} host(s).",
            report.success_hosts.len()
        );
        return output;
    }

    let _ = writeln!(output, "Failed to create group {group} on all hosts.");
    if let Some(failure) = &report.failure {
        let _ = writeln!(output, "  cause: {failure}");
    }

    if report.success_hosts.is_empty() {
        output.push_str("  nothing to roll back\n");
    } else if report.residual.is_empty() {
        let _ = writeln!(
            output,
            "  rolled back on {} host(s)",
            report.success_hosts.len()
        );
    } else {
        let _ = writeln!(
            output,
            "  rollback failed on: {} (manual cleanup required)",
            report.residual
        );
    }
    output
}

pub(crate) fn format_delete_result(group: &GroupId, residual: &ResidualSet) -> String {
    if residual.is_empty() {
        format!("Group {group} deleted from all hosts.\n")
    } else {
        format!("Failed to delete group {group} from the following hosts: {residual}\n")
    }
}
