//! # Upload Transport
//!
//! The network/storage round trip between UPLOADING and UPLOADED.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::TransferError;
use crate::session::UploadFile;

/// Moves an uploaded file into storage.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Transfer `file` under `dataset_name`. One call is one attempt.
    async fn transfer(&self, dataset_name: &str, file: &UploadFile) -> Result<(), TransferError>;
}

/// Sleeps for a fixed latency, then succeeds unless a scripted failure is queued.
///
/// Scripted failures are consumed one per attempt, in order.
pub struct SimulatedTransport {
    latency: Duration,
    scripted: Mutex<VecDeque<TransferError>>,
}

impl SimulatedTransport {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            scripted: Mutex::new(VecDeque::new()),
        }
    }

    /// Fail the next attempts with `failures`, in order.
    pub fn with_failures(self, failures: impl IntoIterator<Item = TransferError>) -> Self {
        self.scripted.lock().extend(failures);
        self
    }

    /// Scripted failures not yet consumed.
    pub fn pending_failures(&self) -> usize {
        self.scripted.lock().len()
    }
}

impl std::fmt::Debug for SimulatedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedTransport")
            .field("latency", &self.latency)
            .field("pending_failures", &self.pending_failures())
            .finish()
    }
}

#[async_trait]
impl UploadTransport for SimulatedTransport {
    async fn transfer(&self, dataset_name: &str, file: &UploadFile) -> Result<(), TransferError> {
        tokio::time::sleep(self.latency).await;
        let next = self.scripted.lock().pop_front();
        match next {
            Some(err) => {
                tracing::debug!(dataset = dataset_name, file = %file.name, error = %err, "simulated transfer failure");
                Err(err)
            }
            None => Ok(()),
        }
    }
}
