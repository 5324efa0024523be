//! Agent persistence.
//!
//! An [`AgentSnapshot`] captures everything needed to reconstruct an agent:
//! identity, the last mirrored world state, the active mode and anchor, the
//! tree descriptor with its in-flight running flags, and the blackboard.
//! Repositories store snapshots keyed by agent id; the file-backed
//! implementation writes one JSON document per agent.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use agent_core::{AgentId, Blackboard, Position};

use crate::agent::Mode;
use crate::behavior::TreeSpec;
use crate::error::{Result, RuntimeError};

/// Serializable capture of one agent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub position: Position,
    pub health: f64,
    pub mode: Mode,
    pub anchor: Position,
    pub tree: TreeSpec,
    /// Pre-order running flags of the instantiated tree, so an in-flight
    /// sequence resumes at the same cursor after a restore.
    pub running: Vec<bool>,
    pub blackboard: Blackboard,
}

/// Storage boundary for agent snapshots.
pub trait SnapshotRepository: Send + Sync {
    fn save(&self, snapshot: &AgentSnapshot) -> Result<()>;
    fn load(&self, id: AgentId) -> Result<AgentSnapshot>;
    fn list(&self) -> Result<Vec<AgentId>>;
    fn delete(&self, id: AgentId) -> Result<()>;
}

/// One JSON file per agent under a base directory.
pub struct FileSnapshotRepository {
    dir: PathBuf,
}

impl FileSnapshotRepository {
    /// Creates the repository, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: AgentId) -> PathBuf {
        self.dir.join(format!("agent-{}.json", id.0))
    }
}

impl SnapshotRepository for FileSnapshotRepository {
    fn save(&self, snapshot: &AgentSnapshot) -> Result<()> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        std::fs::write(self.path_for(snapshot.id), json)?;
        Ok(())
    }

    fn load(&self, id: AgentId) -> Result<AgentSnapshot> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(RuntimeError::AgentNotFound(id));
        }
        let json = std::fs::read(path)?;
        Ok(serde_json::from_slice(&json)?)
    }

    fn list(&self) -> Result<Vec<AgentId>> {
        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(raw) = name
                .strip_prefix("agent-")
                .and_then(|rest| rest.strip_suffix(".json"))
                && let Ok(id) = raw.parse::<u64>()
            {
                ids.push(AgentId(id));
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn delete(&self, id: AgentId) -> Result<()> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(RuntimeError::AgentNotFound(id));
        }
        std::fs::remove_file(path)?;
        Ok(())
    }
}

/// Map-backed repository for tests and ephemeral simulations.
#[derive(Default)]
pub struct InMemorySnapshotRepo {
    snapshots: RwLock<HashMap<AgentId, AgentSnapshot>>,
}

impl InMemorySnapshotRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotRepository for InMemorySnapshotRepo {
    fn save(&self, snapshot: &AgentSnapshot) -> Result<()> {
        self.snapshots
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(snapshot.id, snapshot.clone());
        Ok(())
    }

    fn load(&self, id: AgentId) -> Result<AgentSnapshot> {
        self.snapshots
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
            .ok_or(RuntimeError::AgentNotFound(id))
    }

    fn list(&self) -> Result<Vec<AgentId>> {
        let mut ids: Vec<AgentId> = self
            .snapshots
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .copied()
            .collect();
        ids.sort();
        Ok(ids)
    }

    fn delete(&self, id: AgentId) -> Result<()> {
        self.snapshots
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .map(|_| ())
            .ok_or(RuntimeError::AgentNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::presets;

    fn sample(id: u64) -> AgentSnapshot {
        AgentSnapshot {
            id: AgentId(id),
            position: Position::new(3.0, 0.0, -2.0),
            health: 64.0,
            mode: Mode::Patrol,
            anchor: Position::new(3.0, 0.0, -2.0),
            tree: presets::skirmisher(),
            running: vec![false; 8],
            blackboard: Blackboard::new(),
        }
    }

    #[test]
    fn file_repository_round_trips_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSnapshotRepository::new(dir.path()).unwrap();

        repo.save(&sample(7)).unwrap();
        let loaded = repo.load(AgentId(7)).unwrap();
        assert_eq!(loaded.id, AgentId(7));
        assert_eq!(loaded.health, 64.0);
        assert_eq!(loaded.mode, Mode::Patrol);
        assert_eq!(loaded.tree, presets::skirmisher());
    }

    #[test]
    fn file_repository_lists_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSnapshotRepository::new(dir.path()).unwrap();

        repo.save(&sample(2)).unwrap();
        repo.save(&sample(1)).unwrap();
        assert_eq!(repo.list().unwrap(), vec![AgentId(1), AgentId(2)]);

        repo.delete(AgentId(1)).unwrap();
        assert_eq!(repo.list().unwrap(), vec![AgentId(2)]);
        assert!(matches!(
            repo.load(AgentId(1)),
            Err(RuntimeError::AgentNotFound(_))
        ));
    }

    #[test]
    fn in_memory_repository_behaves_like_the_file_one() {
        let repo = InMemorySnapshotRepo::new();
        repo.save(&sample(5)).unwrap();

        assert_eq!(repo.list().unwrap(), vec![AgentId(5)]);
        assert_eq!(repo.load(AgentId(5)).unwrap().health, 64.0);
        repo.delete(AgentId(5)).unwrap();
        assert!(repo.list().unwrap().is_empty());
    }
}
