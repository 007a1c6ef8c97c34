use serde::Serialize;

use crate::crd::cluster::PgCluster;
use crate::model::lsn::Lsn;
use crate::model::replication::{
    STATE_STREAMING, SYNC_STATE_ASYNC, SYNC_STATE_QUORUM, SYNC_STATE_SYNC,
};
use crate::model::sample::{NodePayload, NodeSample};

/// Human-facing replication role of one instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RoleLabel {
    Primary,
    /// Locally a replication source while the whole cluster replicates
    /// an external primary.
    DesignatedPrimary,
    StandbyFileBased,
    StandbyPgRewind,
    StandbyStartingUp,
    StandbyPaused,
    StandbySync,
    StandbyAsync,
    Unknown,
}

impl std::fmt::Display for RoleLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            RoleLabel::Primary => "Primary",
            RoleLabel::DesignatedPrimary => "Designated primary",
            RoleLabel::StandbyFileBased => "Standby (file based)",
            RoleLabel::StandbyPgRewind => "Standby (pg_rewind)",
            RoleLabel::StandbyStartingUp => "Standby (starting up)",
            RoleLabel::StandbyPaused => "Standby (paused)",
            RoleLabel::StandbySync => "Standby (sync)",
            RoleLabel::StandbyAsync => "Standby (async)",
            RoleLabel::Unknown => "Unknown",
        };
        write!(f, "{text}")
    }
}

/// Overall health of continuous archiving on the primary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ArchivingHealth {
    Ok,
    Failing,
    StartingUp,
}

impl std::fmt::Display for ArchivingHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchivingHealth::Ok => write!(f, "OK"),
            ArchivingHealth::Failing => write!(f, "Failing"),
            ArchivingHealth::StartingUp => write!(f, "Starting Up"),
        }
    }
}

/// First successfully sampled node that either reports itself primary
/// or carries replication rows, in collection order.
///
/// The second arm covers relay topologies: the node feeding this
/// cluster's own followers may itself be a standby of an external
/// primary, yet it is "the primary" for local reporting (archiving
/// status, write position, replication table).
pub fn find_primary(samples: &[NodeSample]) -> Option<&NodeSample> {
    samples.iter().find(|sample| {
        sample
            .payload()
            .is_some_and(|p| p.is_primary || !p.replication_info.is_empty())
    })
}

/// Role of one instance. `None` for samples with a failure marker:
/// an unreachable node has no role, only an error row.
///
/// The rules form an ordered first-match-wins cascade; local state
/// (readiness, rewind, pause) deliberately wins over the primary's
/// view of replication, which may be stale by one polling interval.
pub fn classify_role(
    sample: &NodeSample,
    cluster: &PgCluster,
    primary: Option<&NodeSample>,
) -> Option<RoleLabel> {
    let payload = sample.payload()?;
    Some(classify_payload(sample, payload, cluster, primary))
}

fn classify_payload(
    sample: &NodeSample,
    payload: &NodePayload,
    cluster: &PgCluster,
    primary: Option<&NodeSample>,
) -> RoleLabel {
    if payload.is_primary {
        return RoleLabel::Primary;
    }
    if cluster.is_replica() && !payload.replication_info.is_empty() {
        return RoleLabel::DesignatedPrimary;
    }

    if !payload.is_wal_receiver_active {
        // Readiness comes before the rewind flag: a node accepting
        // connections is file based even if a resync is still flagged.
        if sample.is_ready {
            return RoleLabel::StandbyFileBased;
        }
        if payload.is_pg_rewind_running {
            return RoleLabel::StandbyPgRewind;
        }
        return RoleLabel::StandbyStartingUp;
    }

    if payload.replay_paused {
        return RoleLabel::StandbyPaused;
    }

    let Some(primary_payload) = primary.and_then(NodeSample::payload) else {
        return RoleLabel::Unknown;
    };
    for row in &primary_payload.replication_info {
        if row.application_name != sample.pod_name
            || row.state != STATE_STREAMING
        {
            continue;
        }
        match row.sync_state.as_str() {
            SYNC_STATE_SYNC | SYNC_STATE_QUORUM => {
                return RoleLabel::StandbySync;
            }
            SYNC_STATE_ASYNC => return RoleLabel::StandbyAsync,
            _ => continue,
        }
    }
    RoleLabel::Unknown
}

/// Position the node's data currently reflects: the write LSN on a
/// primary, the replay LSN on a standby.
pub fn current_position(payload: &NodePayload) -> &Lsn {
    if payload.is_primary {
        &payload.current_lsn
    } else {
        &payload.replay_lsn
    }
}

/// "Currently archiving" dominates any recorded past failure; a stale
/// `last_failed_wal` must not keep the badge red once archiving works
/// again.
pub fn archiving_health(payload: &NodePayload) -> ArchivingHealth {
    if payload.is_archiving_wal {
        ArchivingHealth::Ok
    } else if payload.last_failed_wal.is_some() {
        ArchivingHealth::Failing
    } else {
        ArchivingHealth::StartingUp
    }
}
