//! Job list/detail panel: the state behind the jobs, graph and stats tabs.
//!
//! The panel never talks to the service itself. User actions return the
//! [`Request`] to run, and finished calls come back through [`JobPanel::apply`].

use crate::request::Request;
use jobtree_core::{GroupId, Job, RowId, Stat};
use jobtree_events::{Event, Outcome, PanelTab};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Where user-facing toasts go.
pub trait NotificationSink {
    fn success(&mut self, message: String);
    fn error(&mut self, message: String);
}

impl NotificationSink for Vec<Notice> {
    fn success(&mut self, message: String) {
        self.push(Notice {
            level: NoticeLevel::Success,
            message,
        });
    }

    fn error(&mut self, message: String) {
        self.push(Notice {
            level: NoticeLevel::Error,
            message,
        });
    }
}

/// One entry of the job list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub row: RowId,
    pub job: Job,
}

/// A destructive action waiting for the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    DeleteJob { row: RowId, job: Job },
    DeleteWebhook { row: RowId, job: Job },
}

impl Confirmation {
    pub fn prompt(&self) -> String {
        match self {
            Confirmation::DeleteJob { job, .. } => {
                format!("Are you sure to delete job {}", job.name)
            }
            Confirmation::DeleteWebhook { job, .. } => {
                format!("Are you sure to delete webhook for job: {}", job.name)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobPanel {
    group: GroupId,
    rows: Vec<JobRow>,
    next_row: u64,
    draft: Job,
    /// Row the draft was copied from, if any.
    draft_row: Option<RowId>,
    stat: Option<Stat>,
    tab: PanelTab,
    refresh_trigger: u64,
    list_version: u64,
    pending_confirmation: Option<Confirmation>,
    jobs_loaded: bool,
}

impl JobPanel {
    pub fn new(group: GroupId) -> Self {
        Self {
            group,
            rows: Vec::new(),
            next_row: 0,
            draft: Job::default(),
            draft_row: None,
            stat: None,
            tab: PanelTab::default(),
            refresh_trigger: 0,
            list_version: 0,
            pending_confirmation: None,
            jobs_loaded: false,
        }
    }

    /// Initial loads. The two requests are independent of each other.
    pub fn init(&self) -> Vec<Request> {
        tracing::info!("Initializing job panel for group {}", self.group);
        vec![
            Request::LoadJobs { group: self.group },
            Request::LoadStats,
        ]
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn rows(&self) -> &[JobRow] {
        &self.rows
    }

    /// Jobs in list order, as handed to the graph widget.
    pub fn job_list(&self) -> Vec<Job> {
        self.rows.iter().map(|r| r.job.clone()).collect()
    }

    pub fn jobs_loaded(&self) -> bool {
        self.jobs_loaded
    }

    pub fn draft(&self) -> &Job {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut Job {
        &mut self.draft
    }

    pub fn draft_row(&self) -> Option<RowId> {
        self.draft_row
    }

    pub fn stat(&self) -> Option<&Stat> {
        self.stat.as_ref()
    }

    pub fn tab(&self) -> PanelTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: PanelTab) {
        self.tab = tab;
    }

    /// Bumped once per successful create, update or delete.
    pub fn refresh_trigger(&self) -> u64 {
        self.refresh_trigger
    }

    /// Bumped on every change of the job list, including reloads.
    pub fn list_version(&self) -> u64 {
        self.list_version
    }

    pub fn pending_confirmation(&self) -> Option<&Confirmation> {
        self.pending_confirmation.as_ref()
    }

    fn find(&self, row: RowId) -> Option<&JobRow> {
        self.rows.iter().find(|r| r.row == row)
    }

    /// Jobs of another group come from requests issued before a group switch.
    fn owns(&self, job: &Job) -> bool {
        match job.group_id {
            Some(group) if group != self.group => {
                tracing::debug!(
                    "Ignoring job '{}' of group {} in panel {}",
                    job.name,
                    group,
                    self.group
                );
                false
            }
            _ => true,
        }
    }

    fn allocate_row(&mut self) -> RowId {
        let row = RowId(self.next_row);
        self.next_row += 1;
        row
    }

    fn reset_draft(&mut self) {
        self.draft = Job::default();
        self.draft_row = None;
    }

    fn bump_refresh(&mut self) -> Event {
        self.refresh_trigger += 1;
        self.list_version += 1;
        Event::GraphRefresh {
            trigger: self.refresh_trigger,
        }
    }

    /// Copies the job of `row` into the editor. Returns false for unknown rows.
    pub fn edit_job(&mut self, row: RowId) -> bool {
        let Some(job) = self.find(row).map(|r| r.job.clone()) else {
            return false;
        };
        self.draft = job;
        self.draft_row = Some(row);
        true
    }

    pub fn new_job(&mut self) {
        self.reset_draft();
    }

    /// Creates the draft if it has never been saved, updates it otherwise.
    pub fn save_job(&mut self) -> Request {
        if self.draft.is_persisted() {
            Request::UpdateJob {
                row: self.draft_row,
                job: self.draft.clone(),
            }
        } else {
            self.draft.group_id = Some(self.group);
            Request::CreateJob {
                job: self.draft.clone(),
            }
        }
    }

    pub fn ask_delete_job(&mut self, row: RowId) -> Option<&Confirmation> {
        let job = self.find(row)?.job.clone();
        self.pending_confirmation = Some(Confirmation::DeleteJob { row, job });
        self.pending_confirmation.as_ref()
    }

    pub fn ask_delete_webhook(&mut self, row: RowId) -> Option<&Confirmation> {
        let job = self.find(row)?.job.clone();
        self.pending_confirmation = Some(Confirmation::DeleteWebhook { row, job });
        self.pending_confirmation.as_ref()
    }

    /// Closes the pending dialog; an accepted one yields its request.
    pub fn resolve_confirmation(&mut self, accepted: bool) -> Option<Request> {
        let confirmation = self.pending_confirmation.take()?;
        if !accepted {
            return None;
        }
        Some(match confirmation {
            Confirmation::DeleteJob { row, job } => Request::DeleteJob { row, job },
            Confirmation::DeleteWebhook { job, .. } => Request::DeleteJobWebhook { job },
        })
    }

    pub fn update_webhook(&self, row: RowId) -> Option<Request> {
        let job = self.find(row)?.job.clone();
        Some(Request::UpdateJobWebhook { job })
    }

    pub fn update_all_webhooks(&self) -> Request {
        Request::UpdateGroupWebhooks { group: self.group }
    }

    /// Applies a finished call. Failures only produce an error notice.
    ///
    /// Returns a [`Event::GraphRefresh`] when the refresh counter moved.
    pub fn apply(&mut self, outcome: Outcome, sink: &mut dyn NotificationSink) -> Option<Event> {
        match outcome {
            Outcome::JobsLoaded { group, result } => {
                if group != self.group {
                    tracing::debug!("Ignoring jobs of group {} in panel {}", group, self.group);
                    return None;
                }
                match result {
                    Ok(jobs) => {
                        self.rows = jobs
                            .into_iter()
                            .map(|job| JobRow {
                                row: self.allocate_row(),
                                job,
                            })
                            .collect();
                        self.jobs_loaded = true;
                        self.list_version += 1;
                        tracing::debug!("Loaded {} jobs", self.rows.len());
                    }
                    Err(err) => sink.error(err.to_string()),
                }
                None
            }
            Outcome::StatsLoaded { result } => {
                match result {
                    Ok(stat) => self.stat = Some(stat),
                    Err(err) => sink.error(err.to_string()),
                }
                None
            }
            Outcome::JobCreated { result } => match result {
                Ok(job) => {
                    sink.success(format!("Job {} is created", job.name));
                    if !self.owns(&job) {
                        return None;
                    }
                    let row = self.allocate_row();
                    self.rows.push(JobRow { row, job });
                    self.reset_draft();
                    Some(self.bump_refresh())
                }
                Err(err) => {
                    sink.error(err.to_string());
                    None
                }
            },
            Outcome::JobUpdated { row, result } => match result {
                Ok(job) => {
                    sink.success(format!("Job {} is updated", job.name));
                    if !self.owns(&job) {
                        return None;
                    }
                    let slot = row
                        .and_then(|row| self.rows.iter().position(|r| r.row == row))
                        .or_else(|| {
                            job.id
                                .and_then(|id| self.rows.iter().position(|r| r.job.id == Some(id)))
                        });
                    match slot {
                        Some(index) => self.rows[index].job = job,
                        None => tracing::warn!("Updated job '{}' is not in the list", job.name),
                    }
                    self.reset_draft();
                    Some(self.bump_refresh())
                }
                Err(err) => {
                    sink.error(err.to_string());
                    None
                }
            },
            Outcome::JobDeleted { row, job, result } => match result {
                Ok(()) => {
                    sink.success(format!("Job {} is deleted", job.name));
                    if let Some(index) = self.rows.iter().position(|r| r.row == row) {
                        self.rows.remove(index);
                    }
                    if self.draft_row == Some(row) {
                        self.reset_draft();
                    }
                    Some(self.bump_refresh())
                }
                Err(err) => {
                    sink.error(err.to_string());
                    None
                }
            },
            Outcome::JobWebhookUpdated { job, result } => {
                match result {
                    Ok(()) => sink.success(format!("webhook (job: {}) is updated", job.name)),
                    Err(err) => sink.error(err.to_string()),
                }
                None
            }
            Outcome::JobWebhookDeleted { job, result } => {
                match result {
                    Ok(()) => sink.success(format!("webhook (job: {}) is deleted", job.name)),
                    Err(err) => sink.error(err.to_string()),
                }
                None
            }
            Outcome::GroupWebhooksUpdated { result, .. } => {
                match result {
                    Ok(()) => sink.success("all webhooks updated".to_string()),
                    Err(err) => sink.error(err.to_string()),
                }
                None
            }
        }
    }
}
