use crate::{Group, GroupId, Job};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A JSON array of groups with their jobs nested inside.
///
/// Used to seed the in-memory job service and as CLI input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub groups: Vec<Group>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// The group's jobs, each stamped with the group id when the file
    /// left it out.
    pub fn jobs_of(&self, id: GroupId) -> Vec<Job> {
        self.group(id)
            .map(|group| {
                group
                    .jobs
                    .iter()
                    .cloned()
                    .map(|mut job| {
                        job.group_id.get_or_insert(group.id);
                        job
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JobId;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {
            "id": 1,
            "name": "backend",
            "jobs_base_path": "backend/",
            "jobs": [
                {"id": 1, "name": "root"},
                {"id": 2, "name": "build", "jenkins_job_perent_id": 1}
            ]
        },
        {"id": 2, "name": "empty"}
    ]"#;

    #[test]
    fn test_parse_nested_groups() {
        let snapshot = Snapshot::from_json(SAMPLE).unwrap();
        assert_eq!(snapshot.groups.len(), 2);
        assert!(snapshot.group(GroupId(2)).unwrap().jobs.is_empty());

        let jobs = snapshot.jobs_of(GroupId(1));
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|j| j.group_id == Some(GroupId(1))));
        assert_eq!(jobs[1].parent_id, Some(JobId(1)));
    }

    #[test]
    fn test_unknown_group_has_no_jobs() {
        let snapshot = Snapshot::from_json(SAMPLE).unwrap();
        assert!(snapshot.jobs_of(GroupId(99)).is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let snapshot = Snapshot::load(file.path()).unwrap();
        assert_eq!(snapshot.groups[0].name, "backend");
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = Snapshot::load(&path).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }
}
