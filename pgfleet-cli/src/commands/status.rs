use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use k8s_openapi::api::core::v1::Pod;
use kube::api::Api;
use kube::{Client, ResourceExt};
use tokio_util::sync::CancellationToken;

use pgfleet_status::collect::{self, exec::KubePodExec};
use pgfleet_status::crd::cluster::PgCluster;
use pgfleet_status::status::report::ClusterReport;

use crate::render;
use crate::{OutputFormat, StatusArgs};

/// Build and print the cluster report.
///
/// Failing to fetch the cluster or its pod list aborts the report.
/// Per-pod failures surface as error rows. A failure of the verbose
/// configuration section is deferred: every other section prints
/// first, then the error is returned.
pub async fn run_status(
    client: Client,
    cluster_name: &str,
    opt: &StatusArgs,
) -> Result<()> {
    let clusters: Api<PgCluster> =
        Api::namespaced(client.clone(), &opt.namespace);
    let cluster = clusters.get(cluster_name).await?;

    let pods: Api<Pod> = Api::namespaced(client.clone(), &opt.namespace);
    let (managed, primary_pod) =
        collect::cluster_pods(&pods, cluster_name).await?;

    let executor = KubePodExec::new(
        client,
        &opt.namespace,
        collect::POSTGRES_CONTAINER,
        Duration::from_secs(opt.timeout_secs),
        CancellationToken::new(),
    );
    let samples = collect::collect_samples(&executor, &managed).await;
    let report = ClusterReport::build(cluster, samples, Utc::now());

    match opt.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&report)?);
            return Ok(());
        }
        OutputFormat::Text => {}
    }

    render::print_summary(&report);

    let mut deferred: Option<anyhow::Error> = None;
    if opt.verbose {
        match &primary_pod {
            Some(pod) => {
                match collect::read_postgres_configuration(
                    &executor,
                    &pod.name_any(),
                )
                .await
                {
                    Ok(config) => render::print_configuration(&config),
                    Err(err) => deferred = Some(err.into()),
                }
            }
            None => {
                deferred = Some(anyhow::anyhow!(
                    "no primary pod to read the configuration from"
                ));
            }
        }
    }

    render::print_certificates(&report);
    render::print_backup(&report);
    render::print_replication(&report);
    render::print_instances(&report);

    match deferred {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
