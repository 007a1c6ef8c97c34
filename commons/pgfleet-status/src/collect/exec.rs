use std::time::Duration;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::Client;
use kube::api::{Api, AttachParams};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

use crate::error::ExecError;

/// Remote execution seam. The collector only needs "run this command
/// in the database container and hand me stdout", so collaborators are
/// mocked behind this trait in tests.
#[async_trait]
pub trait PodExec: Send + Sync {
    async fn exec(
        &self,
        pod_name: &str,
        command: &[&str],
    ) -> Result<String, ExecError>;
}

/// Pod exec subresource implementation. Each invocation is bounded by
/// `timeout` and aborted by `cancel`, so one unreachable pod cannot
/// stall the report past a fixed bound.
pub struct KubePodExec {
    pods: Api<Pod>,
    container: String,
    timeout: Duration,
    cancel: CancellationToken,
}

impl KubePodExec {
    pub fn new(
        client: Client,
        namespace: &str,
        container: &str,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            pods: Api::namespaced(client, namespace),
            container: container.to_string(),
            timeout,
            cancel,
        }
    }

    async fn run(
        &self,
        pod_name: &str,
        command: &[&str],
    ) -> Result<String, ExecError> {
        let params = AttachParams::default()
            .container(self.container.clone())
            .stderr(false);
        let mut attached = self
            .pods
            .exec(pod_name, command.iter().copied(), &params)
            .await?;

        let mut stdout = String::new();
        if let Some(mut out) = attached.stdout() {
            out.read_to_string(&mut stdout).await?;
        }
        attached.join().await.map_err(std::io::Error::other)?;
        Ok(stdout)
    }
}

#[async_trait]
impl PodExec for KubePodExec {
    #[tracing::instrument(level = "debug", skip(self, command), fields(pod = %pod_name))]
    async fn exec(
        &self,
        pod_name: &str,
        command: &[&str],
    ) -> Result<String, ExecError> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(ExecError::Cancelled),
            out = tokio::time::timeout(self.timeout, self.run(pod_name, command)) => {
                match out {
                    Ok(result) => result,
                    Err(_) => Err(ExecError::Timeout(self.timeout)),
                }
            }
        }
    }
}
