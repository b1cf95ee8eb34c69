//! Storage trait abstraction.

use async_trait::async_trait;
use okr_core::{CheckIn, KeyResult, KeyResultId, Objective, ObjectiveId, Task};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Read/write access to OKR records.
///
/// Implementations hand back fully formed, typed records. Filtering is by
/// owner id only; anything richer belongs to the backend.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Objective operations ===

    /// Save an objective (create or update).
    async fn save_objective(&self, objective: &Objective) -> Result<()>;

    /// Load an objective by ID.
    async fn load_objective(&self, id: ObjectiveId) -> Result<Option<Objective>>;

    /// List all objectives.
    async fn list_objectives(&self) -> Result<Vec<Objective>>;

    // === Key result operations ===

    /// Save a key result (create or update), including its quarter targets.
    async fn save_key_result(&self, key_result: &KeyResult) -> Result<()>;

    /// Load a key result by ID.
    async fn load_key_result(&self, id: KeyResultId) -> Result<Option<KeyResult>>;

    /// List key results under an objective.
    async fn list_key_results(&self, objective_id: ObjectiveId) -> Result<Vec<KeyResult>>;

    /// Delete a key result and its check-ins.
    async fn delete_key_result(&self, id: KeyResultId) -> Result<()>;

    // === Check-in operations ===

    /// Append a check-in.
    async fn save_check_in(&self, check_in: &CheckIn) -> Result<()>;

    /// List check-ins for a key result, in no particular order.
    async fn list_check_ins(&self, key_result_id: KeyResultId) -> Result<Vec<CheckIn>>;

    // === Task operations ===

    /// Save a task (create or update).
    async fn save_task(&self, task: &Task) -> Result<()>;

    /// List tasks linked to a key result.
    async fn list_tasks(&self, key_result_id: KeyResultId) -> Result<Vec<Task>>;
}
