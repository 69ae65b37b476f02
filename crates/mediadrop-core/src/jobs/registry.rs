//! In-memory job registry.
//!
//! Owned by the tracker for the lifetime of the service. Each job only
//! ever touches its own key, so a single `RwLock` over the whole map is
//! enough; no cross-job coordination happens here.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::{Job, JobId};

/// Default cap on finished jobs kept for status polling.
pub const DEFAULT_MAX_COMPLETED_JOBS: usize = 1000;

/// Concurrency-safe store of job records, keyed by id.
///
/// Finished jobs (completed, or failed under the retain policy) are capped
/// at `max_completed`; past the cap those that finished earliest are
/// evicted. Jobs still downloading are never evicted, and neither is the
/// job whose completion triggered the eviction.
#[derive(Debug, Clone)]
pub struct JobRegistry {
    jobs: Arc<RwLock<BTreeMap<JobId, Job>>>,
    /// Maximum finished jobs retained (0 = unlimited).
    max_completed: usize,
}

impl JobRegistry {
    pub fn new(max_completed: usize) -> Self {
        Self {
            jobs: Arc::new(RwLock::new(BTreeMap::new())),
            max_completed,
        }
    }

    /// Registry that never evicts.
    pub fn unbounded() -> Self {
        Self::new(0)
    }

    /// Register a job. A record already stored under the same id is replaced.
    pub async fn insert(&self, job: Job) {
        let id = job.id;
        if self.jobs.write().await.insert(id, job).is_some() {
            warn!(target: "mediadrop.jobs", job_id = %id, "Replaced existing job record");
        }
    }

    pub async fn get(&self, id: JobId) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    /// Mark a job completed and return the updated record.
    ///
    /// Returns `None` if the job is unknown or has already finished.
    pub async fn complete(
        &self,
        id: JobId,
        output_path: PathBuf,
        file_name: String,
    ) -> Option<Job> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id)?;
        if !job.mark_completed(output_path, file_name) {
            return None;
        }
        let updated = job.clone();
        self.evict_finished(&mut jobs, id);
        Some(updated)
    }

    /// Mark a job failed and return the updated record.
    ///
    /// Returns `None` if the job is unknown or has already finished.
    pub async fn fail(&self, id: JobId, message: impl Into<String>) -> Option<Job> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id)?;
        if !job.mark_failed(message.into()) {
            return None;
        }
        let updated = job.clone();
        self.evict_finished(&mut jobs, id);
        Some(updated)
    }

    pub async fn remove(&self, id: JobId) -> Option<Job> {
        self.jobs.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    /// Drop the earliest-finished jobs until the cap holds, sparing `keep`.
    fn evict_finished(&self, jobs: &mut BTreeMap<JobId, Job>, keep: JobId) {
        if self.max_completed == 0 {
            return;
        }
        let mut finished: Vec<(Option<DateTime<Utc>>, JobId)> = jobs
            .values()
            .filter(|j| j.status.is_terminal() && j.id != keep)
            .map(|j| (j.finished_at, j.id))
            .collect();
        // `keep` is finished too and counts toward the cap.
        let excess = (finished.len() + 1).saturating_sub(self.max_completed);
        if excess == 0 {
            return;
        }

        finished.sort_unstable();
        for (_, id) in finished.iter().take(excess) {
            jobs.remove(id);
        }
        debug!(
            target: "mediadrop.jobs",
            evicted = excess.min(finished.len()),
            max_completed = self.max_completed,
            "Evicted finished jobs"
        );
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMPLETED_JOBS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FormatSelector, JobStatus};

    fn job(id: u64) -> Job {
        Job::downloading(JobId::new(id), "http://example.com/v", FormatSelector::default())
    }

    #[tokio::test]
    async fn insert_then_get_returns_downloading_record() {
        let registry = JobRegistry::unbounded();
        registry.insert(job(1)).await;

        let stored = registry.get(JobId::new(1)).await.unwrap();
        assert_eq!(stored.status, JobStatus::Downloading);
        assert!(registry.get(JobId::new(2)).await.is_none());
    }

    #[tokio::test]
    async fn complete_sets_artifact_fields_once() {
        let registry = JobRegistry::unbounded();
        registry.insert(job(7)).await;

        let done = registry
            .complete(JobId::new(7), "/d/7_a.mp4".into(), "7_a.mp4".into())
            .await
            .unwrap();
        assert_eq!(done.status, JobStatus::Completed);
        assert_eq!(done.file_name.as_deref(), Some("7_a.mp4"));

        assert!(registry.fail(JobId::new(7), "too late").await.is_none());
        assert!(
            registry
                .complete(JobId::new(7), "/d/7_b.mp4".into(), "7_b.mp4".into())
                .await
                .is_none()
        );
        let stored = registry.get(JobId::new(7)).await.unwrap();
        assert_eq!(stored.file_name.as_deref(), Some("7_a.mp4"));
    }

    #[tokio::test]
    async fn complete_unknown_job_is_none() {
        let registry = JobRegistry::unbounded();
        assert!(
            registry
                .complete(JobId::new(3), "/d/3_a".into(), "3_a".into())
                .await
                .is_none()
        );
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn remove_makes_job_unobservable() {
        let registry = JobRegistry::unbounded();
        registry.insert(job(5)).await;

        assert!(registry.remove(JobId::new(5)).await.is_some());
        assert!(registry.get(JobId::new(5)).await.is_none());
        assert!(registry.remove(JobId::new(5)).await.is_none());
    }

    #[tokio::test]
    async fn oldest_finished_jobs_are_evicted_past_cap() {
        let registry = JobRegistry::new(2);
        for id in 1..=4 {
            registry.insert(job(id)).await;
        }

        for id in 1..=3 {
            registry
                .complete(JobId::new(id), format!("/d/{id}_x").into(), format!("{id}_x"))
                .await
                .unwrap();
        }

        // Job 1 was the oldest finished one; job 4 is still in flight.
        assert!(registry.get(JobId::new(1)).await.is_none());
        assert!(registry.get(JobId::new(2)).await.is_some());
        assert!(registry.get(JobId::new(3)).await.is_some());
        assert_eq!(
            registry.get(JobId::new(4)).await.unwrap().status,
            JobStatus::Downloading
        );
        assert_eq!(registry.len().await, 3);
    }

    #[tokio::test]
    async fn long_running_job_survives_its_own_completion() {
        let registry = JobRegistry::new(2);
        for id in 1..=3 {
            registry.insert(job(id)).await;
        }

        // Job 1 started first but finishes last.
        for id in [2, 3, 1] {
            registry
                .complete(JobId::new(id), format!("/d/{id}_x").into(), format!("{id}_x"))
                .await
                .unwrap();
        }

        assert_eq!(
            registry.get(JobId::new(1)).await.unwrap().status,
            JobStatus::Completed
        );
        // Job 2 finished earliest, so it made room.
        assert!(registry.get(JobId::new(2)).await.is_none());
        assert!(registry.get(JobId::new(3)).await.is_some());
    }

    #[tokio::test]
    async fn retained_failure_survives_its_own_recording() {
        let registry = JobRegistry::new(1);
        registry.insert(job(1)).await;
        registry.insert(job(2)).await;

        registry
            .complete(JobId::new(2), "/d/2_x".into(), "2_x".into())
            .await
            .unwrap();
        registry.fail(JobId::new(1), "boom").await.unwrap();

        let failed = registry.get(JobId::new(1)).await.unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert_eq!(failed.error.as_deref(), Some("boom"));
        assert!(registry.get(JobId::new(2)).await.is_none());
    }

    #[tokio::test]
    async fn in_flight_jobs_are_never_evicted() {
        let registry = JobRegistry::new(1);
        for id in 1..=5 {
            registry.insert(job(id)).await;
        }
        registry.fail(JobId::new(5), "boom").await.unwrap();

        assert_eq!(registry.len().await, 5);
    }
}
