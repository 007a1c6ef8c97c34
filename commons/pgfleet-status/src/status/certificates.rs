use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Serialize;
use tracing::warn;

/// Certificate health tiers in increasing severity. The aggregate
/// badge of a set is the maximum tier present.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize,
)]
pub enum CertificateTier {
    #[default]
    Healthy,
    ExpiringSoon,
    Expired,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateStatus {
    pub name: String,
    /// Expiration timestamp exactly as recorded on the cluster.
    pub expiration: String,
    /// Days-left display label; `-` when the timestamp did not parse.
    pub days_left: String,
    /// `None` when the timestamp did not parse; such entries are
    /// listed but contribute nothing to the badge.
    pub tier: Option<CertificateTier>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSection {
    pub entries: Vec<CertificateStatus>,
    pub badge: CertificateTier,
}

const EXPIRING_WINDOW_DAYS: i64 = 7;

/// Expiration timestamps are stamped in the Go `time.Time` string
/// form, e.g. `2026-11-04 08:43:00.123456789 +0000 UTC`. The trailing
/// zone name duplicates the numeric offset and is dropped before
/// parsing.
fn parse_expiration(value: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = match value.rsplit_once(' ') {
        Some((head, zone))
            if !zone.is_empty()
                && zone.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            head
        }
        _ => value,
    };
    DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f %z").ok()
}

/// Classify every certificate of the cluster, ordered by name.
///
/// The sort is an output contract (diff-friendly reports), kept as an
/// explicit step rather than an accident of map iteration. A
/// timestamp that fails to parse is logged and still produces a row;
/// it never aborts the report.
pub fn classify_certificates(
    expirations: &BTreeMap<String, String>,
    now: DateTime<Utc>,
) -> CertificateSection {
    let mut names: Vec<&String> = expirations.keys().collect();
    names.sort();

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let expiration = &expirations[name];
        let entry = match parse_expiration(expiration) {
            Some(when) => {
                classify_one(name, expiration, when.with_timezone(&Utc) - now)
            }
            None => {
                warn!(
                    certificate = %name,
                    value = %expiration,
                    "unparsable certificate expiration"
                );
                CertificateStatus {
                    name: name.clone(),
                    expiration: expiration.clone(),
                    days_left: "-".to_string(),
                    tier: None,
                }
            }
        };
        entries.push(entry);
    }

    let badge = entries
        .iter()
        .filter_map(|e| e.tier)
        .max()
        .unwrap_or_default();
    CertificateSection { entries, badge }
}

fn classify_one(
    name: &str,
    expiration: &str,
    left: Duration,
) -> CertificateStatus {
    let days = left.num_milliseconds() as f64 / (24.0 * 3600.0 * 1000.0);
    let (tier, days_left) = if left <= Duration::zero() {
        (CertificateTier::Expired, "Expired".to_string())
    } else if left < Duration::days(EXPIRING_WINDOW_DAYS) {
        (
            CertificateTier::ExpiringSoon,
            format!("{days:.2} - Expires Soon"),
        )
    } else {
        (CertificateTier::Healthy, format!("{days:.2}"))
    };
    CertificateStatus {
        name: name.to_string(),
        expiration: expiration.to_string(),
        days_left,
        tier: Some(tier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
    }

    fn stamp(when: DateTime<Utc>) -> String {
        when.format("%Y-%m-%d %H:%M:%S%.9f %z UTC").to_string()
    }

    fn classify_single(when: DateTime<Utc>) -> CertificateStatus {
        let mut map = BTreeMap::new();
        map.insert("server-ca".to_string(), stamp(when));
        classify_certificates(&map, now()).entries.remove(0)
    }

    #[test]
    fn exactly_now_is_expired() {
        let entry = classify_single(now());
        assert_eq!(entry.tier, Some(CertificateTier::Expired));
        assert_eq!(entry.days_left, "Expired");
    }

    #[test]
    fn six_days_twenty_three_hours_expires_soon() {
        let entry = classify_single(
            now() + Duration::days(6) + Duration::hours(23),
        );
        assert_eq!(entry.tier, Some(CertificateTier::ExpiringSoon));
        assert!(entry.days_left.ends_with(" - Expires Soon"));
        assert!(entry.days_left.starts_with("6.96"));
    }

    #[test]
    fn seven_days_exactly_is_healthy() {
        let entry = classify_single(now() + Duration::days(7));
        assert_eq!(entry.tier, Some(CertificateTier::Healthy));
        assert_eq!(entry.days_left, "7.00");
    }

    #[test]
    fn entries_sorted_by_name_regardless_of_insertion() {
        let mut map = BTreeMap::new();
        for name in ["server-cert", "ca", "replication-cert"] {
            map.insert(name.to_string(), stamp(now() + Duration::days(30)));
        }
        let section = classify_certificates(&map, now());
        let names: Vec<&str> =
            section.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ca", "replication-cert", "server-cert"]);
        // Re-running yields the identical ordering.
        let again = classify_certificates(&map, now());
        assert_eq!(section, again);
    }

    #[test]
    fn badge_is_most_severe_tier() {
        let mut map = BTreeMap::new();
        map.insert(
            "healthy".to_string(),
            stamp(now() + Duration::days(90)),
        );
        map.insert("soon".to_string(), stamp(now() + Duration::days(3)));
        assert_eq!(
            classify_certificates(&map, now()).badge,
            CertificateTier::ExpiringSoon
        );

        map.insert("gone".to_string(), stamp(now() - Duration::days(1)));
        assert_eq!(
            classify_certificates(&map, now()).badge,
            CertificateTier::Expired
        );
    }

    #[test]
    fn parse_failure_keeps_the_row_out_of_the_badge() {
        let mut map = BTreeMap::new();
        map.insert("broken".to_string(), "not a timestamp".to_string());
        map.insert(
            "healthy".to_string(),
            stamp(now() + Duration::days(90)),
        );
        let section = classify_certificates(&map, now());
        assert_eq!(section.entries[0].name, "broken");
        assert_eq!(section.entries[0].days_left, "-");
        assert_eq!(section.entries[0].tier, None);
        assert_eq!(section.badge, CertificateTier::Healthy);
    }

    #[test]
    fn parses_timestamps_without_fraction() {
        assert!(parse_expiration("2026-11-04 08:43:00 +0000 UTC").is_some());
        assert!(
            parse_expiration("2026-11-04 08:43:00.123456789 +0200 CEST")
                .is_some()
        );
        assert!(parse_expiration("tomorrow-ish").is_none());
    }
}
