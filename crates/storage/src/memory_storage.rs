//! In-memory storage implementation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use async_trait::async_trait;
use okr_core::{CheckIn, KeyResult, KeyResultId, Objective, ObjectiveId, Task, TaskId};
use tokio::sync::RwLock;
use super::{Result, Snapshot, Storage, StorageError};

#[derive(Debug, Default)]
struct Tables {
    objectives: HashMap<ObjectiveId, Objective>,
    key_results: HashMap<KeyResultId, KeyResult>,
    check_ins: HashMap<KeyResultId, Vec<CheckIn>>,
    tasks: HashMap<TaskId, Task>,
}

/// Storage backed by in-process hash maps.
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build storage holding every record of a snapshot.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        snapshot.check_references()?;

        let mut tables = Tables::default();
        for objective in snapshot.objectives {
            tables.objectives.insert(objective.id, objective);
        }
        for kr in snapshot.key_results {
            tables.key_results.insert(kr.id, kr);
        }
        for check_in in snapshot.check_ins {
            tables
                .check_ins
                .entry(check_in.key_result_id)
                .or_default()
                .push(check_in);
        }
        for task in snapshot.tasks {
            tables.tasks.insert(task.id, task);
        }

        Ok(Self {
            tables: Arc::new(RwLock::new(tables)),
        })
    }

    /// Read a snapshot file into new storage.
    pub async fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_snapshot(Snapshot::load(path).await?)
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn save_objective(&self, objective: &Objective) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.objectives.insert(objective.id, objective.clone());
        Ok(())
    }

    async fn load_objective(&self, id: ObjectiveId) -> Result<Option<Objective>> {
        Ok(self.tables.read().await.objectives.get(&id).cloned())
    }

    async fn list_objectives(&self) -> Result<Vec<Objective>> {
        let tables = self.tables.read().await;
        let mut objectives: Vec<_> = tables.objectives.values().cloned().collect();
        objectives.sort_by_key(|o| o.id);
        Ok(objectives)
    }

    async fn save_key_result(&self, key_result: &KeyResult) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.objectives.contains_key(&key_result.objective_id) {
            return Err(StorageError::NotFound(format!(
                "objective {}",
                key_result.objective_id
            )));
        }
        tables.key_results.insert(key_result.id, key_result.clone());
        Ok(())
    }

    async fn load_key_result(&self, id: KeyResultId) -> Result<Option<KeyResult>> {
        Ok(self.tables.read().await.key_results.get(&id).cloned())
    }

    async fn list_key_results(&self, objective_id: ObjectiveId) -> Result<Vec<KeyResult>> {
        let tables = self.tables.read().await;
        let mut key_results: Vec<_> = tables
            .key_results
            .values()
            .filter(|kr| kr.objective_id == objective_id)
            .cloned()
            .collect();
        key_results.sort_by_key(|kr| kr.id);
        Ok(key_results)
    }

    async fn delete_key_result(&self, id: KeyResultId) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.key_results.remove(&id).is_none() {
            return Err(StorageError::NotFound(format!("key result {}", id)));
        }
        tables.check_ins.remove(&id);
        for task in tables.tasks.values_mut() {
            if task.key_result_id == Some(id) {
                task.key_result_id = None;
            }
        }
        Ok(())
    }

    async fn save_check_in(&self, check_in: &CheckIn) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.key_results.contains_key(&check_in.key_result_id) {
            return Err(StorageError::NotFound(format!(
                "key result {}",
                check_in.key_result_id
            )));
        }
        tables
            .check_ins
            .entry(check_in.key_result_id)
            .or_default()
            .push(check_in.clone());
        Ok(())
    }

    async fn list_check_ins(&self, key_result_id: KeyResultId) -> Result<Vec<CheckIn>> {
        let tables = self.tables.read().await;
        Ok(tables.check_ins.get(&key_result_id).cloned().unwrap_or_default())
    }

    async fn save_task(&self, task: &Task) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn list_tasks(&self, key_result_id: KeyResultId) -> Result<Vec<Task>> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<_> = tables
            .tasks
            .values()
            .filter(|t| t.key_result_id == Some(key_result_id))
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }
}
