use console::style;
use kube::ResourceExt;

use pgfleet_status::collect::PostgresConfiguration;
use pgfleet_status::crd::cluster::{
    PHASE_CREATING_REPLICA, PHASE_FIRST_PRIMARY, PHASE_HEALTHY,
    PHASE_UPGRADE, PHASE_WAITING_FOR_USER,
};
use pgfleet_status::model::sample::NodeSample;
use pgfleet_status::status::aggregate::{ArchivingHealth, current_position};
use pgfleet_status::status::certificates::CertificateTier;
use pgfleet_status::status::report::{ClusterReport, ReplicationSection};

use super::table::Table;

fn primary_sample(report: &ClusterReport) -> Option<&NodeSample> {
    report.primary.as_ref()
}

pub fn print_summary(report: &ClusterReport) {
    println!("{}", style("Cluster Summary").green());

    let cluster = &report.cluster;
    let status = cluster.status.clone().unwrap_or_default();

    let primary_instance = if cluster.switching_over() {
        format!(
            "{} (switching to {})",
            status.current_primary, status.target_primary
        )
    } else {
        status.current_primary.clone()
    };

    let phase = status.phase.clone().unwrap_or_default();
    let reason = status.phase_reason.clone().unwrap_or_default();
    let phase_cell = match phase.as_str() {
        PHASE_HEALTHY | PHASE_FIRST_PRIMARY | PHASE_CREATING_REPLICA => {
            format!("{} {}", style(&phase).green(), reason)
        }
        PHASE_UPGRADE | PHASE_WAITING_FOR_USER => {
            format!("{} {}", style(&phase).yellow(), reason)
        }
        _ => format!("{} {}", style(&phase).red(), reason),
    };

    let primary = primary_sample(report).and_then(NodeSample::payload);

    let mut summary = Table::new();
    summary.add_line(vec!["Name:".to_string(), cluster.name_any()]);
    summary.add_line(vec![
        "Namespace:".to_string(),
        cluster.namespace().unwrap_or_default(),
    ]);
    if let Some(payload) = primary {
        summary.add_line(vec![
            "System ID:".to_string(),
            payload.system_id.clone(),
        ]);
    }
    summary.add_line(vec![
        "PostgreSQL Image:".to_string(),
        cluster.spec.image_name.clone().unwrap_or_default(),
    ]);
    summary
        .add_line(vec!["Primary instance:".to_string(), primary_instance]);
    summary.add_line(vec!["Status:".to_string(), phase_cell]);

    let declared = cluster.spec.instances;
    let instances_cell = if declared == status.instances {
        style(declared).green()
    } else {
        style(declared).red()
    };
    summary.add_line(vec![
        "Instances:".to_string(),
        instances_cell.to_string(),
    ]);
    let ready_cell = if declared == status.ready_instances {
        style(status.ready_instances).green()
    } else {
        style(status.ready_instances).red()
    };
    summary.add_line(vec![
        "Ready instances:".to_string(),
        ready_cell.to_string(),
    ]);

    if cluster.switching_over() {
        if status.current_primary.is_empty() {
            println!("{}", style("Primary server is initializing").red());
        } else {
            println!("{}", style("Switchover in progress").red());
        }
    }

    if !cluster.is_replica() {
        if let Some(payload) = primary {
            summary.add_line(vec![
                "Current Write LSN:".to_string(),
                format!(
                    "{} (Timeline: {} - WAL File: {})",
                    payload.current_lsn,
                    payload.timeline_id,
                    payload.current_wal
                ),
            ]);
        }
    }

    summary.print();
    println!();
}

pub fn print_configuration(config: &PostgresConfiguration) {
    println!("{}", style("PostgreSQL Configuration").green());
    println!("{}", config.postgresql_conf);
    println!();

    println!("{}", style("PostgreSQL HBA Rules").green());
    println!("{}", config.hba_rules);
    println!();
}

pub fn print_certificates(report: &ClusterReport) {
    let header = match report.certificates.badge {
        CertificateTier::Healthy => style("Certificates Status").green(),
        CertificateTier::ExpiringSoon => {
            style("Certificates Status").yellow()
        }
        CertificateTier::Expired => style("Certificates Status").red(),
    };
    println!("{header}");

    let mut table = Table::new();
    table.add_header(&[
        "Certificate Name",
        "Expiration Date",
        "Days Left Until Expiration",
    ]);
    for entry in &report.certificates.entries {
        table.add_line(vec![
            entry.name.clone(),
            entry.expiration.clone(),
            entry.days_left.clone(),
        ]);
    }
    table.print();
    println!();
}

pub fn print_backup(report: &ClusterReport) {
    println!("{}", style("Continuous Backup status").green());
    if report.cluster.spec.backup.is_none() {
        println!("{}", style("Not configured").yellow());
        println!();
        return;
    }

    let status = report.cluster.status.clone().unwrap_or_default();
    let mut table = Table::new();
    table.add_line(vec![
        "First Point of Recoverability:".to_string(),
        status
            .first_recoverability_point
            .unwrap_or_else(|| "Not Available".to_string()),
    ]);

    let Some(payload) =
        primary_sample(report).and_then(NodeSample::payload)
    else {
        table.add_line(vec!["No Primary instance found".to_string()]);
        table.print();
        println!();
        return;
    };

    let archiving = match report.archiving {
        Some(ArchivingHealth::Ok) => style("OK").green(),
        Some(ArchivingHealth::Failing) => style("Failing").red(),
        Some(ArchivingHealth::StartingUp) | None => {
            style("Starting Up").yellow()
        }
    };
    table.add_line(vec![
        "Working WAL archiving:".to_string(),
        archiving.to_string(),
    ]);
    table.add_line(vec![
        "WALs waiting to be archived:".to_string(),
        payload.ready_wal_files.to_string(),
    ]);
    table.add_line(vec![
        "Last Archived WAL:".to_string(),
        wal_with_time(
            payload.last_archived_wal.as_deref(),
            payload.last_archived_wal_time.as_deref(),
        ),
    ]);
    table.add_line(vec![
        "Last Failed WAL:".to_string(),
        wal_with_time(
            payload.last_failed_wal.as_deref(),
            payload.last_failed_wal_time.as_deref(),
        ),
    ]);

    table.print();
    println!();
}

fn wal_with_time(wal: Option<&str>, time: Option<&str>) -> String {
    match (wal, time) {
        (Some(wal), Some(time)) => format!("{wal} @ {time}"),
        (Some(wal), None) => wal.to_string(),
        (None, _) => "-".to_string(),
    }
}

pub fn print_replication(report: &ClusterReport) {
    println!("{}", style("Streaming Replication status").green());

    let rows = match &report.replication {
        ReplicationSection::NotConfigured => {
            println!("{}", style("Not configured").yellow());
            println!();
            return;
        }
        ReplicationSection::PrimaryNotFound => {
            println!("{}", style("Primary instance not found").yellow());
            println!();
            return;
        }
        ReplicationSection::NotAvailableYet => {
            println!("{}", style("Not available yet").yellow());
            println!();
            return;
        }
        ReplicationSection::Streaming(rows) => rows,
    };

    let mut table = Table::new();
    table.add_header(&[
        "Name",
        "Sent LSN",
        "Write LSN",
        "Flush LSN",
        "Replay LSN",
        "Write Lag",
        "Flush Lag",
        "Replay Lag",
        "State",
        "Sync State",
        "Sync Priority",
    ]);
    for row in rows {
        table.add_line(vec![
            row.application_name.clone(),
            row.sent_lsn.to_string(),
            row.write_lsn.to_string(),
            row.flush_lsn.to_string(),
            row.replay_lsn.to_string(),
            row.write_lag.clone().unwrap_or_else(|| "-".to_string()),
            row.flush_lag.clone().unwrap_or_else(|| "-".to_string()),
            row.replay_lag.clone().unwrap_or_else(|| "-".to_string()),
            row.state.clone(),
            row.sync_state.clone(),
            row.sync_priority.to_string(),
        ]);
    }
    table.print();
    println!();
}

pub fn print_instances(report: &ClusterReport) {
    println!("{}", style("Instances status").green());

    let mut table = Table::new();
    table.add_header(&[
        "Name",
        "Database Size",
        "Current LSN",
        "Replication role",
        "Status",
        "QoS",
        "Manager Version",
        "Node",
    ]);

    for node in &report.nodes {
        let sample = &node.sample;
        match sample.payload() {
            Some(payload) => {
                let status = if payload.pending_restart {
                    "OK (pending restart)".to_string()
                } else {
                    "OK".to_string()
                };
                let role = node
                    .role
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string());
                table.add_line(vec![
                    sample.pod_name.clone(),
                    payload.total_instance_size.clone(),
                    current_position(payload).to_string(),
                    role,
                    status,
                    sample.qos_class.clone(),
                    payload.instance_manager_version.clone(),
                    sample.node_name.clone(),
                ]);
            }
            None => {
                // Failed nodes keep their row; metrics become
                // placeholders and the error text is the status.
                let error = sample
                    .failure()
                    .map(|f| f.to_string())
                    .unwrap_or_default();
                table.add_line(vec![
                    sample.pod_name.clone(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    error,
                    sample.qos_class.clone(),
                    "-".to_string(),
                    sample.node_name.clone(),
                ]);
            }
        }
    }
    table.print();
}
