//! Admission gate bounding in-flight probes.
//!
//! A counting semaphore shared by every probe of a scan. A probe holds its
//! permit for its whole lifetime, so the number of concurrent connection
//! attempts never exceeds the configured capacity.

use crate::error::{ScanError, ScanResult};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Shared, cloneable concurrency cap.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl AdmissionGate {
    /// Create a gate admitting at most `capacity` probes at once.
    ///
    /// A capacity of zero is raised to one so a scan can always progress.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a slot. The slot is released when the permit drops.
    pub async fn admit(&self) -> ScanResult<OwnedSemaphorePermit> {
        Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| ScanError::GateClosed)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of probes currently admitted.
    pub fn in_flight(&self) -> usize {
        self.capacity - self.permits.available_permits()
    }
}
