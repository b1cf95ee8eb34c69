//! JSON snapshot of OKR records.
//!
//! A snapshot is a single JSON document holding every record the storage
//! layer serves. It exists to seed [`MemoryStorage`](crate::MemoryStorage)
//! from a file; it is not an export format.

use std::collections::HashSet;
use std::path::Path;
use okr_core::{CheckIn, KeyResult, Objective, Task};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;
use super::{Result, StorageError};

/// All records of one workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Objectives
    #[serde(default)]
    pub objectives: Vec<Objective>,

    /// Key results, with their quarter targets inline
    #[serde(default)]
    pub key_results: Vec<KeyResult>,

    /// Check-ins for any key result
    #[serde(default)]
    pub check_ins: Vec<CheckIn>,

    /// Tasks
    #[serde(default)]
    pub tasks: Vec<Task>,

    /// Free-form configuration section, interpreted by the caller
    #[serde(default)]
    pub config: serde_json::Value,
}

impl Snapshot {
    /// Read and parse a snapshot file.
    ///
    /// References between records are checked when storage is built from
    /// the snapshot, see [`MemoryStorage::from_snapshot`](crate::MemoryStorage::from_snapshot).
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).await?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        debug!(
            path = %path.display(),
            objectives = snapshot.objectives.len(),
            key_results = snapshot.key_results.len(),
            check_ins = snapshot.check_ins.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Ensure every record points at an owner that exists.
    pub fn check_references(&self) -> Result<()> {
        let objectives: HashSet<_> = self.objectives.iter().map(|o| o.id).collect();
        for kr in &self.key_results {
            if !objectives.contains(&kr.objective_id) {
                return Err(StorageError::Other(format!(
                    "key result {} references unknown objective {}",
                    kr.id, kr.objective_id
                )));
            }
        }

        let key_results: HashSet<_> = self.key_results.iter().map(|k| k.id).collect();
        for check_in in &self.check_ins {
            if !key_results.contains(&check_in.key_result_id) {
                return Err(StorageError::Other(format!(
                    "check-in {} references unknown key result {}",
                    check_in.id, check_in.key_result_id
                )));
            }
        }
        for task in &self.tasks {
            if let Some(kr_id) = task.key_result_id {
                if !key_results.contains(&kr_id) {
                    return Err(StorageError::Other(format!(
                        "task {} references unknown key result {}",
                        task.id, kr_id
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use okr_core::{KeyResultId, ObjectiveId};

    #[tokio::test]
    async fn test_load_snapshot_from_file() {
        let objective = Objective::new("Grow", 2025);
        let kr = KeyResult::new(objective.id, "Signups", 0.0, 100.0, 2025);
        let snapshot = Snapshot {
            check_ins: vec![CheckIn::new(kr.id, 40.0, Utc::now())],
            objectives: vec![objective],
            key_results: vec![kr],
            ..Default::default()
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("okr.json");
        std::fs::write(&path, serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();

        let loaded = Snapshot::load(&path).await.unwrap();
        assert_eq!(loaded.objectives.len(), 1);
        assert_eq!(loaded.key_results.len(), 1);
        assert_eq!(loaded.check_ins[0].value, 40.0);
        assert!(loaded.config.is_null());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Snapshot::load(dir.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[tokio::test]
    async fn test_load_malformed_json_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ \"key_results\": [ { \"direction\": \"sideways\" } ] }").unwrap();
        let err = Snapshot::load(&path).await.unwrap_err();
        assert!(matches!(err, StorageError::Json(_)));
    }

    #[test]
    fn test_dangling_check_in_is_rejected() {
        let objective = Objective::new("Grow", 2025);
        let snapshot = Snapshot {
            objectives: vec![objective],
            check_ins: vec![CheckIn::new(KeyResultId::new(), 1.0, Utc::now())],
            ..Default::default()
        };
        assert!(matches!(snapshot.check_references(), Err(StorageError::Other(_))));
    }

    #[test]
    fn test_dangling_key_result_is_rejected() {
        let snapshot = Snapshot {
            key_results: vec![KeyResult::new(ObjectiveId::new(), "x", 0.0, 1.0, 2025)],
            ..Default::default()
        };
        assert!(snapshot.check_references().is_err());
    }
}
