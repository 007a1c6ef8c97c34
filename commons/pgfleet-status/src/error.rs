use std::time::Duration;
use thiserror::Error;

/// Report-aborting failures. A problem limited to a single node never
/// surfaces here; it is recorded inside that node's sample instead.
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Transport-level failure of one remote command.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("exec request failed: {0}")]
    Transport(#[from] kube::Error),

    #[error("reading command output: {0}")]
    Output(#[from] std::io::Error),

    #[error("command timed out after {0:?}")]
    Timeout(Duration),

    #[error("report cancelled")]
    Cancelled,
}
