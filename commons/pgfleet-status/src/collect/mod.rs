pub mod exec;

use futures_util::future::join_all;
use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use kube::api::{Api, ListParams};
use tracing::warn;

use crate::crd::cluster::{CLUSTER_KIND, ROLE_LABEL, ROLE_PRIMARY};
use crate::error::{ExecError, StatusError};
use crate::model::sample::{
    NodePayload, NodeSample, SampleFailure, SampleOutcome,
};
use exec::PodExec;

pub const POSTGRES_CONTAINER: &str = "postgres";

const STATUS_COMMAND: &[&str] = &["/controller/manager", "instance", "status"];
const CAT_POSTGRES_CONF: &[&str] =
    &["cat", "/var/lib/postgresql/data/pgdata/custom.conf"];
const CAT_HBA_RULES: &[&str] =
    &["cat", "/var/lib/postgresql/data/pgdata/pg_hba.conf"];

/// Pods managed by the named cluster, plus the pod the operator
/// currently labels as primary (if any). The primary pod is only a
/// reference object for primary-side reads; role text never comes
/// from the label.
pub async fn cluster_pods(
    pods: &Api<Pod>,
    cluster_name: &str,
) -> Result<(Vec<Pod>, Option<Pod>), StatusError> {
    let list = pods.list(&ListParams::default()).await?;

    let mut managed = Vec::new();
    let mut primary = None;
    for pod in list {
        let owned = pod
            .owner_references()
            .iter()
            .any(|o| o.kind == CLUSTER_KIND && o.name == cluster_name);
        if !owned {
            continue;
        }
        if pod
            .labels()
            .get(ROLE_LABEL)
            .is_some_and(|v| v == ROLE_PRIMARY)
        {
            primary = Some(pod.clone());
        }
        managed.push(pod);
    }
    Ok((managed, primary))
}

/// Kubelet Ready condition, as the external readiness signal.
pub fn is_pod_ready(pod: &Pod) -> bool {
    pod.status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .map(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == "Ready" && c.status == "True")
        })
        .unwrap_or(false)
}

/// One sample per managed pod. Queries run concurrently and fail
/// independently: a pod that cannot be sampled yields a failure marker
/// without affecting the others. Result order is not significant;
/// display order is established later.
pub async fn collect_samples(
    executor: &dyn PodExec,
    pods: &[Pod],
) -> Vec<NodeSample> {
    join_all(pods.iter().map(|pod| sample_pod(executor, pod))).await
}

async fn sample_pod(executor: &dyn PodExec, pod: &Pod) -> NodeSample {
    let pod_name = pod.name_any();
    let outcome = match executor.exec(&pod_name, STATUS_COMMAND).await {
        Ok(stdout) => match serde_json::from_str::<NodePayload>(&stdout) {
            Ok(payload) => SampleOutcome::Ok(Box::new(payload)),
            Err(err) => {
                warn!(pod = %pod_name, %err, "undecodable instance status");
                SampleOutcome::Failed(SampleFailure::UnparsableOutput)
            }
        },
        Err(err) => {
            warn!(pod = %pod_name, %err, "instance status query failed");
            SampleOutcome::Failed(SampleFailure::PodNotAvailable)
        }
    };

    NodeSample {
        pod_name,
        is_ready: is_pod_ready(pod),
        qos_class: pod
            .status
            .as_ref()
            .and_then(|s| s.qos_class.clone())
            .unwrap_or_else(|| "-".to_string()),
        node_name: pod
            .spec
            .as_ref()
            .and_then(|s| s.node_name.clone())
            .unwrap_or_default(),
        outcome,
    }
}

/// Server configuration as read from the primary pod's data directory.
#[derive(Clone, Debug)]
pub struct PostgresConfiguration {
    pub postgresql_conf: String,
    pub hba_rules: String,
}

/// Best-effort read of the server configuration from the primary pod.
/// Failure here must not stop the rest of the report; callers defer it.
pub async fn read_postgres_configuration(
    executor: &dyn PodExec,
    primary_pod: &str,
) -> Result<PostgresConfiguration, ExecError> {
    let postgresql_conf =
        executor.exec(primary_pod, CAT_POSTGRES_CONF).await?;
    let hba_rules = executor.exec(primary_pod, CAT_HBA_RULES).await?;
    Ok(PostgresConfiguration {
        postgresql_conf,
        hba_rules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use k8s_openapi::api::core::v1::{PodCondition, PodSpec, PodStatus};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
    use kube::api::ObjectMeta;

    struct FakeExec;

    #[async_trait]
    impl PodExec for FakeExec {
        async fn exec(
            &self,
            pod_name: &str,
            _command: &[&str],
        ) -> Result<String, ExecError> {
            match pod_name {
                "db-1" => Ok(serde_json::json!({
                    "isPrimary": true,
                    "currentLsn": "0/6000060",
                    "currentWal": "000000010000000000000006",
                    "timelineId": 1,
                })
                .to_string()),
                "db-2" => Ok("not json at all".to_string()),
                _ => Err(ExecError::Timeout(
                    std::time::Duration::from_secs(2),
                )),
            }
        }
    }

    fn pod(name: &str, ready: bool) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                owner_references: Some(vec![OwnerReference {
                    kind: CLUSTER_KIND.to_string(),
                    name: "db".to_string(),
                    ..Default::default()
                }]),
                ..Default::default()
            },
            spec: Some(PodSpec {
                node_name: Some("worker-1".to_string()),
                ..Default::default()
            }),
            status: Some(PodStatus {
                qos_class: Some("Guaranteed".to_string()),
                conditions: Some(vec![PodCondition {
                    type_: "Ready".to_string(),
                    status: (if ready { "True" } else { "False" }).to_string(),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn failures_map_per_pod_without_aborting_the_rest() {
        let pods =
            vec![pod("db-1", true), pod("db-2", true), pod("db-3", false)];
        let samples = collect_samples(&FakeExec, &pods).await;
        assert_eq!(samples.len(), 3);

        assert!(samples[0].is_primary());
        assert_eq!(samples[0].payload().unwrap().timeline_id, 1);

        assert_eq!(
            samples[1].failure(),
            Some(SampleFailure::UnparsableOutput)
        );
        assert_eq!(
            samples[2].failure(),
            Some(SampleFailure::PodNotAvailable)
        );
        // Pod metadata still present on failed samples.
        assert_eq!(samples[2].node_name, "worker-1");
        assert!(!samples[2].is_ready);
    }

    #[test]
    fn readiness_follows_the_ready_condition() {
        assert!(is_pod_ready(&pod("db-1", true)));
        assert!(!is_pod_ready(&pod("db-1", false)));
        assert!(!is_pod_ready(&Pod::default()));
    }
}
