use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CLUSTER_KIND: &str = "PgCluster";

/// Pod label the operator keeps pointed at the current primary. Used
/// only to pick a reference pod for primary-only reads, never for the
/// role shown to the user.
pub const ROLE_LABEL: &str = "pgfleet.io/role";
pub const ROLE_PRIMARY: &str = "primary";

pub const PHASE_HEALTHY: &str = "Cluster in healthy state";
pub const PHASE_FIRST_PRIMARY: &str = "Setting up primary";
pub const PHASE_CREATING_REPLICA: &str = "Creating a new replica";
pub const PHASE_UPGRADE: &str = "Upgrading cluster";
pub const PHASE_WAITING_FOR_USER: &str = "Waiting for user action";

#[derive(
    CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema, Default,
)]
#[kube(
    group = "pgfleet.io",
    version = "v1",
    kind = "PgCluster",
    plural = "pgclusters",
    namespaced,
    status = "PgClusterStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct PgClusterSpec {
    /// Number of declared instances.
    pub instances: i32,
    /// Container image running the database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
    /// Continuous backup configuration; WAL archiving is off when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<BackupSpec>,
    /// Marks this cluster as a replica of an external source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replica: Option<ReplicaSpec>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct BackupSpec {
    /// Object-store path receiving archived WAL segments and base backups.
    pub destination_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_policy: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReplicaSpec {
    pub enabled: bool,
    /// Name of the external source this cluster replicates from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct PgClusterStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_reason: Option<String>,
    /// Instances the operator currently counts, ready or not.
    #[serde(default)]
    pub instances: i32,
    #[serde(default)]
    pub ready_instances: i32,
    /// Empty until the first primary has been elected.
    #[serde(default)]
    pub current_primary: String,
    /// Differs from `current_primary` while a switchover is in flight.
    #[serde(default)]
    pub target_primary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_recoverability_point: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificates: Option<CertificatesStatus>,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CertificatesStatus {
    /// Certificate name to expiration timestamp, as stamped by the
    /// operator when it rotates the secrets.
    #[serde(default)]
    pub expirations: BTreeMap<String, String>,
}

impl PgCluster {
    pub fn is_replica(&self) -> bool {
        self.spec
            .replica
            .as_ref()
            .map(|r| r.enabled)
            .unwrap_or(false)
    }

    pub fn switching_over(&self) -> bool {
        self.status
            .as_ref()
            .map(|s| s.current_primary != s.target_primary)
            .unwrap_or(false)
    }

    pub fn certificate_expirations(&self) -> BTreeMap<String, String> {
        self.status
            .as_ref()
            .and_then(|s| s.certificates.as_ref())
            .map(|c| c.expirations.clone())
            .unwrap_or_default()
    }
}
