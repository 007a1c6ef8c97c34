use serde::{Deserialize, Serialize};

use super::lsn::Lsn;
use super::replication::ReplicationRow;

/// Database-level status decoded from the instance manager's output.
///
/// Field applicability depends on the role: `current_lsn`,
/// `current_wal` and `timeline_id` are meaningful on a primary,
/// `replay_lsn` and `replay_paused` on a standby.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodePayload {
    /// The node's own claim of being primary. A relay node feeding
    /// followers of a replica cluster reports `false` here while still
    /// carrying `replication_info` rows.
    pub is_primary: bool,
    pub system_id: String,
    pub timeline_id: i32,
    pub current_lsn: Lsn,
    pub current_wal: String,
    pub replay_lsn: Lsn,
    pub replay_paused: bool,
    pub is_wal_receiver_active: bool,
    pub is_pg_rewind_running: bool,
    pub is_archiving_wal: bool,
    pub last_archived_wal: Option<String>,
    pub last_archived_wal_time: Option<String>,
    pub last_failed_wal: Option<String>,
    pub last_failed_wal_time: Option<String>,
    /// WAL segments still waiting to be archived.
    pub ready_wal_files: i32,
    pub pending_restart: bool,
    pub total_instance_size: String,
    pub instance_manager_version: String,
    pub replication_info: Vec<ReplicationRow>,
}

/// Why a node could not be sampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SampleFailure {
    /// The exec transport failed or timed out.
    PodNotAvailable,
    /// The pod answered but the payload did not decode.
    UnparsableOutput,
}

impl std::fmt::Display for SampleFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleFailure::PodNotAvailable => write!(f, "pod not available"),
            SampleFailure::UnparsableOutput => {
                write!(f, "can't parse pod output")
            }
        }
    }
}

/// Result of sampling one node: payload or failure, never both.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SampleOutcome {
    Ok(Box<NodePayload>),
    Failed(SampleFailure),
}

/// Snapshot of one cluster member: what its instance manager reported
/// plus what the API server observes about the pod. Built once per
/// report and never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSample {
    pub pod_name: String,
    /// Externally observed readiness (kubelet Ready condition).
    pub is_ready: bool,
    pub qos_class: String,
    /// Kubernetes node hosting the pod.
    pub node_name: String,
    pub outcome: SampleOutcome,
}

impl NodeSample {
    pub fn payload(&self) -> Option<&NodePayload> {
        match &self.outcome {
            SampleOutcome::Ok(payload) => Some(payload),
            SampleOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<SampleFailure> {
        match &self.outcome {
            SampleOutcome::Ok(_) => None,
            SampleOutcome::Failed(failure) => Some(*failure),
        }
    }

    pub fn is_primary(&self) -> bool {
        self.payload().map(|p| p.is_primary).unwrap_or(false)
    }
}

/// Display order for instance rows: the primary first, everything else
/// by pod name. Stable for identical input by construction.
pub fn sort_for_display(samples: &mut [NodeSample]) {
    samples.sort_by(|a, b| {
        b.is_primary()
            .cmp(&a.is_primary())
            .then_with(|| a.pod_name.cmp(&b.pod_name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, primary: bool) -> NodeSample {
        NodeSample {
            pod_name: name.to_string(),
            is_ready: true,
            qos_class: "Guaranteed".to_string(),
            node_name: "node-1".to_string(),
            outcome: SampleOutcome::Ok(Box::new(NodePayload {
                is_primary: primary,
                ..Default::default()
            })),
        }
    }

    #[test]
    fn primary_sorts_first_then_names() {
        let mut samples = vec![
            sample("db-3", false),
            sample("db-2", true),
            sample("db-1", false),
        ];
        sort_for_display(&mut samples);
        let names: Vec<&str> =
            samples.iter().map(|s| s.pod_name.as_str()).collect();
        assert_eq!(names, vec!["db-2", "db-1", "db-3"]);
    }

    #[test]
    fn failed_samples_sort_by_name_with_the_rest() {
        let mut samples = vec![
            sample("db-2", false),
            NodeSample {
                pod_name: "db-1".to_string(),
                is_ready: false,
                qos_class: "Burstable".to_string(),
                node_name: "node-2".to_string(),
                outcome: SampleOutcome::Failed(
                    SampleFailure::PodNotAvailable,
                ),
            },
        ];
        sort_for_display(&mut samples);
        assert_eq!(samples[0].pod_name, "db-1");
        assert_eq!(samples[0].failure(), Some(SampleFailure::PodNotAvailable));
    }

    #[test]
    fn payload_and_failure_are_mutually_exclusive() {
        let ok = sample("db-1", true);
        assert!(ok.payload().is_some());
        assert!(ok.failure().is_none());

        let failed = NodeSample {
            outcome: SampleOutcome::Failed(SampleFailure::UnparsableOutput),
            ..sample("db-2", false)
        };
        assert!(failed.payload().is_none());
        assert_eq!(
            failed.failure().unwrap().to_string(),
            "can't parse pod output"
        );
    }
}
