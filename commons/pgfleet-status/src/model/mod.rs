pub mod lsn;
pub mod replication;
pub mod sample;

pub use lsn::Lsn;
pub use replication::ReplicationRow;
pub use sample::{
    NodePayload, NodeSample, SampleFailure, SampleOutcome, sort_for_display,
};
