pub mod cluster;

pub use cluster::{PgCluster, PgClusterSpec, PgClusterStatus};
