use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::crd::cluster::PgCluster;
use crate::model::replication::ReplicationRow;
use crate::model::sample::{NodeSample, sort_for_display};

use super::aggregate::{self, ArchivingHealth, RoleLabel};
use super::certificates::{CertificateSection, classify_certificates};

/// One instance row: the sample plus its classified role. Failed
/// samples carry no role; their failure marker is the display state.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeReport {
    #[serde(flatten)]
    pub sample: NodeSample,
    pub role: Option<RoleLabel>,
}

/// What the streaming replication section shows. The degraded states
/// are explicit values, not errors: a report without a primary is
/// still a complete report.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplicationSection {
    /// Single-instance cluster; replication was never requested.
    NotConfigured,
    PrimaryNotFound,
    /// Primary found but no standby has connected yet.
    NotAvailableYet,
    Streaming(Vec<ReplicationRow>),
}

/// Aggregated view of one cluster, ready for rendering or structured
/// output. Built once from an immutable snapshot; all ordering is
/// frozen here so repeated runs over identical input are identical.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterReport {
    pub cluster: PgCluster,
    pub nodes: Vec<NodeReport>,
    /// The sample selected as primary, when one was found.
    pub primary: Option<NodeSample>,
    /// Archiving health of the primary; `None` when no primary was
    /// found and the section degrades to "not available".
    pub archiving: Option<ArchivingHealth>,
    pub replication: ReplicationSection,
    pub certificates: CertificateSection,
}

impl ClusterReport {
    /// Classify every sample against the declared state and freeze
    /// the display order. `samples` must still be in collection order
    /// when this runs: primary selection ties are broken by it.
    pub fn build(
        cluster: PgCluster,
        mut samples: Vec<NodeSample>,
        now: DateTime<Utc>,
    ) -> Self {
        let primary = aggregate::find_primary(&samples).cloned();

        sort_for_display(&mut samples);
        let nodes = samples
            .into_iter()
            .map(|sample| {
                let role =
                    aggregate::classify_role(&sample, &cluster, primary.as_ref());
                NodeReport { sample, role }
            })
            .collect();

        let archiving = primary
            .as_ref()
            .and_then(NodeSample::payload)
            .map(aggregate::archiving_health);
        let replication = replication_section(&cluster, primary.as_ref());
        let certificates =
            classify_certificates(&cluster.certificate_expirations(), now);

        Self {
            cluster,
            nodes,
            primary,
            archiving,
            replication,
            certificates,
        }
    }
}

fn replication_section(
    cluster: &PgCluster,
    primary: Option<&NodeSample>,
) -> ReplicationSection {
    if cluster.spec.instances == 1 {
        return ReplicationSection::NotConfigured;
    }
    let Some(payload) = primary.and_then(NodeSample::payload) else {
        return ReplicationSection::PrimaryNotFound;
    };
    if payload.replication_info.is_empty() {
        return ReplicationSection::NotAvailableYet;
    }
    let mut rows = payload.replication_info.clone();
    rows.sort();
    ReplicationSection::Streaming(rows)
}
