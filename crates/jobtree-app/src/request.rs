use crate::service::JobService;
use jobtree_core::{GroupId, Job, RowId};
use jobtree_events::Outcome;

/// A call the panel wants made against the job API.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    LoadJobs { group: GroupId },
    LoadStats,
    CreateJob { job: Job },
    UpdateJob { row: Option<RowId>, job: Job },
    DeleteJob { row: RowId, job: Job },
    UpdateJobWebhook { job: Job },
    DeleteJobWebhook { job: Job },
    UpdateGroupWebhooks { group: GroupId },
}

impl Request {
    /// Short label for logs.
    pub fn describe(&self) -> String {
        match self {
            Request::LoadJobs { group } => format!("load jobs of group {group}"),
            Request::LoadStats => "load stats".to_string(),
            Request::CreateJob { job } => format!("create job '{}'", job.name),
            Request::UpdateJob { job, .. } => format!("update job '{}'", job.name),
            Request::DeleteJob { job, .. } => format!("delete job '{}'", job.name),
            Request::UpdateJobWebhook { job } => format!("update webhook of '{}'", job.name),
            Request::DeleteJobWebhook { job } => format!("delete webhook of '{}'", job.name),
            Request::UpdateGroupWebhooks { group } => {
                format!("update webhooks of group {group}")
            }
        }
    }

    /// Runs the call and packages the answer for the panel.
    pub fn execute(self, service: &dyn JobService) -> Outcome {
        match self {
            Request::LoadJobs { group } => Outcome::JobsLoaded {
                group,
                result: service.jobs_for_group(group),
            },
            Request::LoadStats => Outcome::StatsLoaded {
                result: service.stats(),
            },
            Request::CreateJob { job } => Outcome::JobCreated {
                result: service.create_job(&job),
            },
            Request::UpdateJob { row, job } => Outcome::JobUpdated {
                row,
                result: service.update_job(&job),
            },
            Request::DeleteJob { row, job } => {
                let result = service.delete_job(&job);
                Outcome::JobDeleted { row, job, result }
            }
            Request::UpdateJobWebhook { job } => {
                let result = service.update_job_webhook(&job);
                Outcome::JobWebhookUpdated { job, result }
            }
            Request::DeleteJobWebhook { job } => {
                let result = service.delete_job_webhook(&job);
                Outcome::JobWebhookDeleted { job, result }
            }
            Request::UpdateGroupWebhooks { group } => Outcome::GroupWebhooksUpdated {
                group,
                result: service.update_group_webhooks(group),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::MemoryJobService;
    use jobtree_core::Snapshot;

    fn service() -> MemoryJobService {
        MemoryJobService::from_snapshot(
            Snapshot::from_json(r#"[{"id": 1, "name": "g", "jobs": [{"id": 1, "name": "root"}]}]"#)
                .unwrap(),
        )
    }

    #[test]
    fn test_delete_outcome_carries_row_and_job() {
        let job = Job::new("root").with_id(1).with_group(1);
        let outcome = Request::DeleteJob {
            row: RowId(7),
            job: job.clone(),
        }
        .execute(&service());
        assert_eq!(
            outcome,
            Outcome::JobDeleted {
                row: RowId(7),
                job,
                result: Ok(())
            }
        );
    }

    #[test]
    fn test_failed_call_is_reported_not_raised() {
        let outcome = Request::LoadJobs { group: GroupId(5) }.execute(&service());
        match outcome {
            Outcome::JobsLoaded { group, result } => {
                assert_eq!(group, GroupId(5));
                assert_eq!(result.unwrap_err().status, 404);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn test_stats_request() {
        let outcome = Request::LoadStats.execute(&service());
        let Outcome::StatsLoaded { result: Ok(stat) } = outcome else {
            panic!("expected stats");
        };
        assert_eq!(stat.0["jobs"], 1);
        assert_eq!(stat.0["groups"], 1);
    }

    #[test]
    fn test_describe() {
        let request = Request::CreateJob {
            job: Job::new("deploy"),
        };
        assert_eq!(request.describe(), "create job 'deploy'");
    }
}
