//! Progress tracking service.

use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use okr_core::{
    latest, CheckIn, InputError, KeyResult, KeyResultId, Objective, ObjectiveId, ObjectiveRollup,
    ProgressResult, Time,
};
use okr_storage::{Storage, StorageError};
use tracing::{debug, info, warn};

use crate::cache::ProgressCache;
use crate::config::CacheConfig;
use crate::engine::ProgressEngine;
use crate::rollup::roll_up;

/// Errors from the tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Storage failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Stored data broke the engine's input contract
    #[error(transparent)]
    Input(#[from] InputError),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Progress tracking service.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Get key result progress.
    async fn key_result_progress(&self, id: KeyResultId, as_of: Time) -> Result<ProgressResult>;

    /// Get objective progress with its key results.
    async fn objective_progress(&self, id: ObjectiveId, as_of: Time) -> Result<ObjectiveProgress>;

    /// Record a check-in and drop stale results for its key result.
    async fn record_check_in(&self, check_in: CheckIn) -> Result<()>;

    /// Take a progress snapshot of every objective.
    async fn snapshot(&self, as_of: Time) -> Result<ProgressSnapshot>;
}

/// An objective with its rolled-up and per-key-result progress.
#[derive(Debug, Clone)]
pub struct ObjectiveProgress {
    /// The objective
    pub objective: Objective,

    /// Weighted roll-up
    pub rollup: ObjectiveRollup,

    /// Key results with their progress, ordered by id
    pub key_results: Vec<(KeyResult, ProgressResult)>,
}

/// A snapshot of progress at a point in time.
#[derive(Debug, Clone)]
pub struct ProgressSnapshot {
    /// When snapshot was taken
    pub timestamp: Time,

    /// The `as_of` every result was computed for
    pub as_of: Time,

    /// Objective progress, ordered by objective id
    pub objectives: Vec<ObjectiveProgress>,
}

/// Basic progress tracker implementation.
pub struct BasicProgressTracker<S: Storage> {
    storage: Arc<S>,
    engine: ProgressEngine,
    cache: ProgressCache,
}

impl<S: Storage> BasicProgressTracker<S> {
    /// Create a new progress tracker.
    pub fn new(storage: S) -> Self {
        Self::with_shared(Arc::new(storage))
    }

    /// Create a tracker over storage shared with other components.
    pub fn with_shared(storage: Arc<S>) -> Self {
        Self {
            storage,
            engine: ProgressEngine::default(),
            cache: ProgressCache::default(),
        }
    }

    /// Use a configured engine.
    pub fn with_engine(mut self, engine: ProgressEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Replace the cache configuration, dropping anything memoized.
    pub fn with_cache_config(mut self, config: CacheConfig) -> Self {
        self.cache = ProgressCache::new(config);
        self
    }

    /// The underlying storage.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Compute (or reuse) progress for a loaded key result.
    async fn compute(&self, key_result: &KeyResult, as_of: Time) -> Result<ProgressResult> {
        let (check_ins, tasks) = tokio::try_join!(
            self.storage.list_check_ins(key_result.id),
            self.storage.list_tasks(key_result.id),
        )?;

        let latest_at = latest(&check_ins).map(CheckIn::effective_at);
        if let Some(hit) = self.cache.get(key_result.id, latest_at, as_of).await {
            return Ok(hit);
        }

        let result = self
            .engine
            .compute(key_result, &check_ins, &tasks, key_result.year, as_of)
            .inspect_err(|e| warn!(key_result_id = %key_result.id, error = %e, "Rejected key result"))?;
        self.cache.insert(latest_at, result.clone()).await;
        Ok(result)
    }

    async fn progress_of(&self, objective: Objective, as_of: Time) -> Result<ObjectiveProgress> {
        let mut key_results = Vec::new();
        for key_result in self.storage.list_key_results(objective.id).await? {
            let result = self.compute(&key_result, as_of).await?;
            key_results.push((key_result, result));
        }
        let rollup = roll_up(key_results.iter().map(|(kr, result)| (kr, result)))?;

        debug!(
            objective_id = %objective.id,
            progress = rollup.progress,
            key_results = rollup.key_result_count,
            "Rolled up objective"
        );

        Ok(ObjectiveProgress {
            objective,
            rollup,
            key_results,
        })
    }
}

#[async_trait]
impl<S: Storage + 'static> ProgressTracker for BasicProgressTracker<S> {
    async fn key_result_progress(&self, id: KeyResultId, as_of: Time) -> Result<ProgressResult> {
        let key_result = self
            .storage
            .load_key_result(id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("key result {id}")))?;
        self.compute(&key_result, as_of).await
    }

    async fn objective_progress(&self, id: ObjectiveId, as_of: Time) -> Result<ObjectiveProgress> {
        let objective = self
            .storage
            .load_objective(id)
            .await?
            .ok_or_else(|| TrackerError::NotFound(format!("objective {id}")))?;
        self.progress_of(objective, as_of).await
    }

    async fn record_check_in(&self, check_in: CheckIn) -> Result<()> {
        self.storage.save_check_in(&check_in).await?;
        self.cache.invalidate(check_in.key_result_id).await;
        info!(
            key_result_id = %check_in.key_result_id,
            value = check_in.value,
            "Recorded check-in"
        );
        Ok(())
    }

    async fn snapshot(&self, as_of: Time) -> Result<ProgressSnapshot> {
        let mut objectives = Vec::new();
        for objective in self.storage.list_objectives().await? {
            objectives.push(self.progress_of(objective, as_of).await?);
        }

        Ok(ProgressSnapshot {
            timestamp: Utc::now(),
            as_of,
            objectives,
        })
    }
}
