//! # Demo Data
//!
//! The collections a fresh dashboard shows: eight datasets (five passed,
//! two failed, one pending), five access-log entries by four distinct
//! users, three HIPAA policies, and four historical check results.
//! Timestamps are offsets back from the supplied `now`.

use chrono::Duration;

use cv_core::{
    AccessAction, AccessLogEntry, AccessLogId, CheckCategory, CheckOutcome, CompliancePolicy,
    DatasetId, DatasetRecord, PolicyId, Timestamp, UserId, ValidationCheckResult,
    ValidationRecord, ValidationRecordId, ValidationStatus,
};

struct DatasetSeed {
    id: u64,
    name: &'static str,
    owner_id: u64,
    owner_name: &'static str,
    age: Duration,
    status: ValidationStatus,
    pii_masked: bool,
    file_size_kb: u64,
    record_count: u64,
    error_message: Option<&'static str>,
}

/// The eight demo datasets.
pub fn datasets(now: Timestamp) -> Vec<DatasetRecord> {
    use ValidationStatus::{Failed, Passed, Pending};

    let seeds = [
        DatasetSeed {
            id: 1,
            name: "Patient Demographics Q1 2025",
            owner_id: 101,
            owner_name: "Dr. Sarah Chen",
            age: Duration::days(2),
            status: Passed,
            pii_masked: true,
            file_size_kb: 2048,
            record_count: 15420,
            error_message: None,
        },
        DatasetSeed {
            id: 2,
            name: "Clinical Trial Results - Study A",
            owner_id: 102,
            owner_name: "Dr. Michael Rodriguez",
            age: Duration::days(5),
            status: Passed,
            pii_masked: true,
            file_size_kb: 5120,
            record_count: 8934,
            error_message: None,
        },
        DatasetSeed {
            id: 3,
            name: "Lab Results Dataset",
            owner_id: 103,
            owner_name: "Dr. Emily Watson",
            age: Duration::days(1),
            status: Failed,
            pii_masked: false,
            file_size_kb: 1024,
            record_count: 3200,
            error_message: Some("PHI identifiers not properly masked"),
        },
        DatasetSeed {
            id: 4,
            name: "Medication Records 2024",
            owner_id: 101,
            owner_name: "Dr. Sarah Chen",
            age: Duration::days(7),
            status: Passed,
            pii_masked: true,
            file_size_kb: 3072,
            record_count: 22100,
            error_message: None,
        },
        DatasetSeed {
            id: 5,
            name: "Imaging Study Metadata",
            owner_id: 104,
            owner_name: "Dr. James Park",
            age: Duration::hours(3),
            status: Pending,
            pii_masked: true,
            file_size_kb: 896,
            record_count: 1850,
            error_message: None,
        },
        DatasetSeed {
            id: 6,
            name: "Genomic Research Data",
            owner_id: 105,
            owner_name: "Dr. Lisa Anderson",
            age: Duration::days(10),
            status: Passed,
            pii_masked: true,
            file_size_kb: 8192,
            record_count: 5600,
            error_message: None,
        },
        DatasetSeed {
            id: 7,
            name: "Patient Survey Responses",
            owner_id: 102,
            owner_name: "Dr. Michael Rodriguez",
            age: Duration::hours(6),
            status: Failed,
            pii_masked: false,
            file_size_kb: 512,
            record_count: 4200,
            error_message: Some("Email addresses not anonymized"),
        },
        DatasetSeed {
            id: 8,
            name: "Electronic Health Records",
            owner_id: 103,
            owner_name: "Dr. Emily Watson",
            age: Duration::days(14),
            status: Passed,
            pii_masked: true,
            file_size_kb: 15360,
            record_count: 45000,
            error_message: None,
        },
    ];

    seeds
        .into_iter()
        .map(|s| DatasetRecord {
            id: DatasetId(s.id),
            name: s.name.to_string(),
            owner_id: UserId(s.owner_id),
            owner_name: s.owner_name.to_string(),
            created_at: now.minus(s.age),
            validation_status: s.status,
            pii_masked: s.pii_masked,
            file_size_kb: s.file_size_kb,
            record_count: s.record_count,
            error_message: s.error_message.map(str::to_string),
        })
        .collect()
}

/// The five demo access-log entries, oldest insertion first.
///
/// Dr. Sarah Chen (user 101) appears twice, so there are four distinct actors.
pub fn access_logs(now: Timestamp) -> Vec<AccessLogEntry> {
    let rows: [(u64, u64, &str, &str, AccessAction, u64, &str, Duration, &str); 5] = [
        (
            1,
            101,
            "Dr. Sarah Chen",
            "Researcher",
            AccessAction::View,
            1,
            "Patient Demographics Q1 2025",
            Duration::hours(1),
            "192.168.1.45",
        ),
        (
            2,
            102,
            "Dr. Michael Rodriguez",
            "Researcher",
            AccessAction::Upload,
            2,
            "Clinical Trial Results - Study A",
            Duration::days(5),
            "192.168.1.67",
        ),
        (
            3,
            201,
            "Jane Smith",
            "Data Manager",
            AccessAction::Validate,
            3,
            "Lab Results Dataset",
            Duration::days(1),
            "192.168.1.89",
        ),
        (
            4,
            101,
            "Dr. Sarah Chen",
            "Researcher",
            AccessAction::Download,
            4,
            "Medication Records 2024",
            Duration::hours(2),
            "192.168.1.45",
        ),
        (
            5,
            301,
            "Robert Johnson",
            "Security Officer",
            AccessAction::Audit,
            1,
            "Patient Demographics Q1 2025",
            Duration::minutes(30),
            "192.168.1.12",
        ),
    ];

    rows.into_iter()
        .map(
            |(id, user_id, user_name, user_role, action, dataset_id, dataset_name, age, ip)| {
                AccessLogEntry {
                    id: AccessLogId(id),
                    user_id: UserId(user_id),
                    user_name: user_name.to_string(),
                    user_role: user_role.to_string(),
                    action,
                    dataset_id: DatasetId(dataset_id),
                    dataset_name: dataset_name.to_string(),
                    timestamp: now.minus(age),
                    ip_address: ip.to_string(),
                    success: true,
                }
            },
        )
        .collect()
}

/// The three active HIPAA policies.
pub fn policies() -> Vec<CompliancePolicy> {
    [
        (
            1,
            "HIPAA PHI Masking",
            "Ensures all Protected Health Information (PHI) identifiers are masked or encrypted",
        ),
        (
            2,
            "Data Encryption at Rest",
            "Validates that sensitive data fields are encrypted using AES-256",
        ),
        (
            3,
            "Access Control Validation",
            "Ensures proper role-based access control is enforced",
        ),
    ]
    .into_iter()
    .map(|(id, name, description)| CompliancePolicy {
        id: PolicyId(id),
        name: name.to_string(),
        policy_type: "HIPAA".to_string(),
        description: description.to_string(),
        is_active: true,
    })
    .collect()
}

/// Check results from earlier runs against datasets 1 and 3.
pub fn validation_history(now: Timestamp) -> Vec<ValidationRecord> {
    let rows = [
        (
            1,
            1,
            1,
            "PHI Identifier Check",
            CheckCategory::Phi,
            CheckOutcome::Pass,
            "All 18 HIPAA identifiers properly masked",
            Duration::days(2),
        ),
        (
            2,
            1,
            2,
            "Encryption Validation",
            CheckCategory::Encryption,
            CheckOutcome::Pass,
            "AES-256 encryption confirmed on sensitive fields",
            Duration::days(2),
        ),
        (
            3,
            3,
            1,
            "PHI Identifier Check",
            CheckCategory::Phi,
            CheckOutcome::Fail,
            "Found 12 unmasked SSN values in column patient_ssn",
            Duration::days(1),
        ),
        (
            4,
            3,
            7,
            "Null Value Check",
            CheckCategory::DataQuality,
            CheckOutcome::Warning,
            "45 null values found in date_of_birth field",
            Duration::days(1),
        ),
    ];

    rows.into_iter()
        .map(
            |(id, dataset_id, policy_id, name, category, outcome, details, age)| ValidationRecord {
                id: ValidationRecordId(id),
                dataset_id: DatasetId(dataset_id),
                policy_id: Some(PolicyId(policy_id)),
                result: ValidationCheckResult::new(name, category, outcome, details),
                checked_at: now.minus(age),
            },
        )
        .collect()
}
