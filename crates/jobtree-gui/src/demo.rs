use jobtree_core::{Snapshot, SnapshotError};

/// Built-in data used when no snapshot file is configured.
const DEMO_SNAPSHOT: &str = r#"[
  {
    "id": 1,
    "name": "backend",
    "jobs_base_path": "backend/",
    "jobs": [
      {"id": 1, "name": "checkout"},
      {"id": 2, "name": "compile", "jenkins_job_perent_id": 1},
      {"id": 3, "name": "unit-tests", "jenkins_job_perent_id": 2},
      {"id": 4, "name": "integration-tests", "jenkins_job_perent_id": 2},
      {"id": 5, "name": "package", "jenkins_job_perent_id": 3},
      {"id": 6, "name": "deploy-staging", "jenkins_job_perent_id": 5},
      {"id": 7, "name": "lint", "jenkins_job_perent_id": 1}
    ]
  },
  {
    "id": 2,
    "name": "frontend",
    "jobs_base_path": "frontend/",
    "jobs": [
      {"id": 20, "name": "install"},
      {"id": 21, "name": "build", "jenkins_job_perent_id": 20},
      {"id": 22, "name": "e2e", "jenkins_job_perent_id": 21}
    ]
  }
]"#;

pub fn demo_snapshot() -> Result<Snapshot, SnapshotError> {
    Snapshot::from_json(DEMO_SNAPSHOT)
}
