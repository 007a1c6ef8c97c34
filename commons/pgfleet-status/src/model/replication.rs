use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::lsn::Lsn;

/// Replication state the role classifier treats specially; anything
/// else (`catchup`, `backup`, ...) is ignored when matching a standby
/// against the primary's catalog.
pub const STATE_STREAMING: &str = "streaming";

pub const SYNC_STATE_SYNC: &str = "sync";
pub const SYNC_STATE_QUORUM: &str = "quorum";
pub const SYNC_STATE_ASYNC: &str = "async";

/// One `pg_stat_replication` row, as observed by the node currently
/// feeding followers. Rows are only ever attached to the sample of a
/// node acting as a replication source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplicationRow {
    pub application_name: String,
    pub sent_lsn: Lsn,
    pub write_lsn: Lsn,
    pub flush_lsn: Lsn,
    pub replay_lsn: Lsn,
    /// Lag intervals are undefined until the first measurement.
    pub write_lag: Option<String>,
    pub flush_lag: Option<String>,
    pub replay_lag: Option<String>,
    pub state: String,
    pub sync_state: String,
    /// Display ordering only; role decisions never look at this.
    pub sync_priority: i32,
}

impl Ord for ReplicationRow {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sync_priority
            .cmp(&other.sync_priority)
            .then_with(|| self.application_name.cmp(&other.application_name))
    }
}

impl PartialOrd for ReplicationRow {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, priority: i32) -> ReplicationRow {
        ReplicationRow {
            application_name: name.to_string(),
            sync_priority: priority,
            ..Default::default()
        }
    }

    #[test]
    fn orders_by_priority_then_name() {
        let mut rows =
            vec![row("c", 2), row("b", 1), row("a", 2), row("d", 1)];
        rows.sort();
        let names: Vec<&str> = rows
            .iter()
            .map(|r| r.application_name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }
}
