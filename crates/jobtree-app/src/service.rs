use jobtree_core::{ApiError, Group, GroupId, Job, JobId, Snapshot, Stat};
use parking_lot::Mutex;
use std::collections::BTreeSet;

/// The remote job-management API as seen by the panel.
///
/// Calls block until the remote side answers; callers run them off the UI
/// thread (see [`crate::AppController`]).
pub trait JobService: Send + Sync {
    fn jobs_for_group(&self, group: GroupId) -> Result<Vec<Job>, ApiError>;
    fn create_job(&self, job: &Job) -> Result<Job, ApiError>;
    fn update_job(&self, job: &Job) -> Result<Job, ApiError>;
    fn delete_job(&self, job: &Job) -> Result<(), ApiError>;
    fn update_job_webhook(&self, job: &Job) -> Result<(), ApiError>;
    fn delete_job_webhook(&self, job: &Job) -> Result<(), ApiError>;
    fn update_group_webhooks(&self, group: GroupId) -> Result<(), ApiError>;
    fn stats(&self) -> Result<Stat, ApiError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    groups: Vec<Group>,
    jobs: Vec<Job>,
    next_job_id: i64,
    webhooks: BTreeSet<JobId>,
}

impl MemoryState {
    fn group(&self, id: Option<GroupId>) -> Result<&Group, ApiError> {
        let id = id.ok_or_else(|| ApiError::bad_request("job has no group"))?;
        self.groups
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| ApiError::not_found(format!("group {id} not found")))
    }

    fn position(&self, job: &Job) -> Result<usize, ApiError> {
        let id = job
            .id
            .ok_or_else(|| ApiError::bad_request(format!("job '{}' has no id", job.name)))?;
        self.jobs
            .iter()
            .position(|j| j.id == Some(id))
            .ok_or_else(|| ApiError::not_found(format!("job {id} not found")))
    }

    fn parent_of(&self, id: JobId) -> Option<JobId> {
        self.jobs
            .iter()
            .find(|j| j.id == Some(id))
            .and_then(|j| j.parent_id)
    }

    fn validate(&self, job: &Job) -> Result<(), ApiError> {
        if job.name.trim().is_empty() {
            return Err(ApiError::bad_request("job name must not be empty"));
        }
        let group = self.group(job.group_id)?;

        let Some(parent_id) = job.parent_id else {
            return Ok(());
        };
        if job.id == Some(parent_id) {
            return Err(ApiError::bad_request("job cannot be its own parent"));
        }
        let parent = self
            .jobs
            .iter()
            .find(|j| j.id == Some(parent_id))
            .ok_or_else(|| ApiError::bad_request(format!("parent job {parent_id} not found")))?;
        if parent.group_id != Some(group.id) {
            return Err(ApiError::bad_request(format!(
                "parent job {parent_id} belongs to another group"
            )));
        }

        // Walking up from the new parent must not come back to this job.
        if let Some(id) = job.id {
            let mut cursor = Some(parent_id);
            let mut steps = 0;
            while let Some(current) = cursor {
                if current == id || steps > self.jobs.len() {
                    return Err(ApiError::bad_request(format!(
                        "parent job {parent_id} would create a cycle"
                    )));
                }
                cursor = self.parent_of(current);
                steps += 1;
            }
        }
        Ok(())
    }
}

/// In-process stand-in for the remote API, seeded from a [`Snapshot`].
///
/// Nothing is written back to disk.
#[derive(Debug, Default)]
pub struct MemoryJobService {
    state: Mutex<MemoryState>,
}

impl MemoryJobService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut state = MemoryState::default();
        for mut group in snapshot.groups {
            for mut job in group.jobs.drain(..) {
                job.group_id = Some(group.id);
                state.jobs.push(job);
            }
            state.groups.push(group);
        }

        let max_id = state
            .jobs
            .iter()
            .filter_map(|j| j.id.map(|id| id.0))
            .max()
            .unwrap_or(0);
        state.next_job_id = max_id + 1;
        for job in state.jobs.iter_mut().filter(|j| j.id.is_none()) {
            job.id = Some(JobId(state.next_job_id));
            state.next_job_id += 1;
        }

        tracing::info!(
            "Memory job service seeded with {} groups and {} jobs",
            state.groups.len(),
            state.jobs.len()
        );
        Self {
            state: Mutex::new(state),
        }
    }

    pub fn groups(&self) -> Vec<Group> {
        self.state.lock().groups.clone()
    }

    pub fn has_webhook(&self, job: JobId) -> bool {
        self.state.lock().webhooks.contains(&job)
    }
}

impl JobService for MemoryJobService {
    fn jobs_for_group(&self, group: GroupId) -> Result<Vec<Job>, ApiError> {
        let state = self.state.lock();
        state.group(Some(group))?;
        Ok(state
            .jobs
            .iter()
            .filter(|j| j.group_id == Some(group))
            .cloned()
            .collect())
    }

    fn create_job(&self, job: &Job) -> Result<Job, ApiError> {
        let mut state = self.state.lock();
        if let Some(id) = job.id {
            return Err(ApiError::bad_request(format!("job {id} already exists")));
        }
        state.validate(job)?;

        let mut created = job.clone();
        created.id = Some(JobId(state.next_job_id));
        state.next_job_id += 1;
        state.jobs.push(created.clone());
        tracing::debug!("Created job {:?} '{}'", created.id, created.name);
        Ok(created)
    }

    fn update_job(&self, job: &Job) -> Result<Job, ApiError> {
        let mut state = self.state.lock();
        let pos = state.position(job)?;
        state.validate(job)?;
        state.jobs[pos] = job.clone();
        Ok(job.clone())
    }

    fn delete_job(&self, job: &Job) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        let pos = state.position(job)?;
        let id = state.jobs[pos].id;
        if state.jobs.iter().any(|j| id.is_some() && j.parent_id == id) {
            return Err(ApiError::conflict(format!(
                "job '{}' still has child jobs",
                job.name
            )));
        }
        let removed = state.jobs.remove(pos);
        if let Some(id) = removed.id {
            state.webhooks.remove(&id);
        }
        Ok(())
    }

    fn update_job_webhook(&self, job: &Job) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        let pos = state.position(job)?;
        let id = state.jobs[pos].id;
        if let Some(id) = id {
            state.webhooks.insert(id);
        }
        Ok(())
    }

    fn delete_job_webhook(&self, job: &Job) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        let pos = state.position(job)?;
        let id = state.jobs[pos].id;
        let removed = id.is_some_and(|id| state.webhooks.remove(&id));
        if removed {
            Ok(())
        } else {
            Err(ApiError::not_found(format!(
                "job '{}' has no webhook",
                job.name
            )))
        }
    }

    fn update_group_webhooks(&self, group: GroupId) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        state.group(Some(group))?;
        let ids: Vec<JobId> = state
            .jobs
            .iter()
            .filter(|j| j.group_id == Some(group))
            .filter_map(|j| j.id)
            .collect();
        state.webhooks.extend(ids);
        Ok(())
    }

    fn stats(&self) -> Result<Stat, ApiError> {
        let state = self.state.lock();
        let mut stat = Stat::default();
        stat.insert("groups", state.groups.len());
        stat.insert("jobs", state.jobs.len());
        stat.insert("webhooks", state.webhooks.len());
        Ok(stat)
    }
}
