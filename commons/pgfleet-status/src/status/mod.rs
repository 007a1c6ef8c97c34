pub mod aggregate;
pub mod certificates;
pub mod report;

pub use aggregate::{
    ArchivingHealth, RoleLabel, archiving_health, classify_role,
    current_position, find_primary,
};
pub use certificates::{
    CertificateSection, CertificateStatus, CertificateTier,
    classify_certificates,
};
pub use report::{ClusterReport, NodeReport, ReplicationSection};
