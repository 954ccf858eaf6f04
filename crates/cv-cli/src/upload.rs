//! # Upload Subcommand
//!
//! Runs a simulated upload and validation against the seeded repository and
//! reports the resulting dataset, check results and session transitions.
//! Progress events are logged as they arrive. Ctrl-C cancels the run.

use clap::{Args, ValueEnum};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use cv_core::{DatasetRecord, UserId, ValidationOutcome, ValidationRecord};
use cv_store::Repository;
use cv_validation::{
    CheckRegistry, CheckSuite, DatasetIntake, IntakeRequest, SessionEvent, SessionTransition,
    SimulatedTransport, UploadFile, Uploader, ValidationRunner,
};

use crate::context::AppContext;

/// Which checks to run.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuiteChoice {
    /// The four fixed upload-form checks.
    #[default]
    Simulated,
    /// One check per active policy.
    Policies,
}

/// Arguments for the upload subcommand.
#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Selected file name, e.g. `lab_results.csv`.
    #[arg(long)]
    pub file: String,

    /// Dataset name. Defaults to the file name without `.csv`.
    #[arg(long)]
    pub name: Option<String>,

    /// File size in KiB.
    #[arg(long, default_value_t = 0)]
    pub size_kb: u64,

    /// Number of rows.
    #[arg(long, default_value_t = 0)]
    pub records: u64,

    /// Uploader display name.
    #[arg(long, default_value = "Jane Smith")]
    pub owner: String,

    /// Uploader user id.
    #[arg(long, default_value_t = 201)]
    pub owner_id: u64,

    /// Uploader role.
    #[arg(long, default_value = "Data Manager")]
    pub role: String,

    /// Client address written to the access log.
    #[arg(long, default_value = "127.0.0.1")]
    pub ip: String,

    /// Check suite to run.
    #[arg(long, value_enum, default_value_t = SuiteChoice::Simulated)]
    pub checks: SuiteChoice,
}

impl UploadArgs {
    fn request(&self) -> IntakeRequest {
        let file = UploadFile::new(self.file.clone(), self.size_kb.saturating_mul(1024));
        let dataset_name = self
            .name
            .clone()
            .unwrap_or_else(|| file.suggested_dataset_name().to_string());
        IntakeRequest {
            dataset_name,
            file: Some(file),
            record_count: self.records,
            uploader: Uploader {
                user_id: UserId(self.owner_id),
                user_name: self.owner.clone(),
                user_role: self.role.clone(),
                ip_address: self.ip.clone(),
            },
        }
    }
}

/// What `upload` prints.
#[derive(Debug, Serialize)]
pub struct UploadReport {
    pub dataset: DatasetRecord,
    pub outcome: ValidationOutcome,
    pub records: Vec<ValidationRecord>,
    pub transitions: Vec<SessionTransition>,
}

fn suite(ctx: &AppContext, choice: SuiteChoice) -> CheckSuite {
    match choice {
        SuiteChoice::Simulated => CheckSuite::simulated(),
        SuiteChoice::Policies => {
            CheckSuite::for_policies(&ctx.repository.list_policies(), &CheckRegistry::simulated())
        }
    }
}

/// Run one upload. Cancelled when `cancel` fires.
pub async fn upload(
    ctx: &AppContext,
    args: &UploadArgs,
    cancel: CancellationToken,
) -> anyhow::Result<UploadReport> {
    let runner = ValidationRunner::new(
        SimulatedTransport::new(ctx.config.runner.upload_latency),
        ctx.config.runner,
    );
    let intake = DatasetIntake::new(ctx.repository.clone(), runner, suite(ctx, args.checks));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            log_event(&event);
        }
    });

    let result = intake.upload(args.request(), &tx, &cancel).await;
    drop(tx);
    progress.await?;

    let receipt = result?;
    Ok(UploadReport {
        dataset: receipt.dataset,
        outcome: receipt.outcome,
        records: receipt.records,
        transitions: receipt.session.transitions().to_vec(),
    })
}

fn log_event(event: &SessionEvent) {
    match event {
        SessionEvent::StateChanged(state) => tracing::info!(%state, "session state"),
        SessionEvent::TransferRetry { attempt, error } => {
            tracing::warn!(attempt, %error, "upload attempt failed, retrying")
        }
        SessionEvent::CheckCompleted {
            index,
            total,
            result,
        } => tracing::info!(
            check = %result.check_name,
            result = %result.result,
            "check {}/{}",
            index + 1,
            total
        ),
        SessionEvent::Completed(verdict) => tracing::info!(%verdict, "validation complete"),
        SessionEvent::Abandoned { reason } => tracing::warn!(%reason, "session abandoned"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::{DatasetId, ValidationStatus};

    fn args(file: &str) -> UploadArgs {
        UploadArgs {
            file: file.into(),
            name: None,
            size_kb: 640,
            records: 1200,
            owner: "Jane Smith".into(),
            owner_id: 201,
            role: "Data Manager".into(),
            ip: "127.0.0.1".into(),
            checks: SuiteChoice::Simulated,
        }
    }

    #[test]
    fn name_defaults_to_file_stem() {
        let req = args("discharge_summaries.csv").request();
        assert_eq!(req.dataset_name, "discharge_summaries");
        assert_eq!(req.file.unwrap().size_kb(), 640);
    }

    #[tokio::test(start_paused = true)]
    async fn upload_adds_a_passed_dataset() {
        let ctx = AppContext::seeded();
        let report = upload(&ctx, &args("discharge_summaries.csv"), CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(report.dataset.id, DatasetId(9));
        assert_eq!(report.dataset.validation_status, ValidationStatus::Passed);
        assert_eq!(report.records.len(), 4);
        assert_eq!(report.transitions.len(), 4);
        assert_eq!(ctx.repository.list_datasets().len(), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn policy_suite_runs_one_check_per_policy() {
        let ctx = AppContext::seeded();
        let mut a = args("x.csv");
        a.checks = SuiteChoice::Policies;
        let report = upload(&ctx, &a, CancellationToken::new()).await.unwrap();
        assert_eq!(report.outcome.results.len(), 3);
    }
}
