use jobtree_app::{AppController, JobPanel, MemoryJobService, Notice, NoticeLevel, Request};
use jobtree_core::{GroupId, Job, Snapshot};
use jobtree_events::{Event, EventBus};
use jobtree_graph::{DiagramConfig, GraphWidget};
use std::sync::Arc;

const SNAPSHOT: &str = r#"[
    {"id": 1, "name": "backend", "jobs_base_path": "backend/", "jobs": [
        {"id": 1, "name": "root"},
        {"id": 2, "name": "build", "jenkins_job_perent_id": 1},
        {"id": 3, "name": "deploy", "jenkins_job_perent_id": 1}
    ]}
]"#;

struct Harness {
    bus: EventBus,
    controller: AppController,
    panel: JobPanel,
    widget: GraphWidget,
    notices: Vec<Notice>,
}

impl Harness {
    fn new() -> Self {
        let bus = EventBus::new();
        let service = MemoryJobService::from_snapshot(Snapshot::from_json(SNAPSHOT).unwrap());
        Self {
            controller: AppController::new(Arc::new(service), bus.clone()),
            bus,
            panel: JobPanel::new(GroupId(1)),
            widget: GraphWidget::new(DiagramConfig::default()),
            notices: Vec::new(),
        }
    }

    /// Runs the requests to completion and applies what comes back, the way
    /// the UI loop does.
    fn run(&mut self, requests: Vec<Request>) {
        for handle in self.controller.submit_all(requests) {
            handle.join().unwrap();
        }
        while let Ok(event) = self.bus.receiver().try_recv() {
            let Event::RequestCompleted(outcome) = event else {
                continue;
            };
            if let Some(Event::GraphRefresh { .. }) = self.panel.apply(outcome, &mut self.notices) {
                self.redraw();
            }
        }
    }

    fn redraw(&mut self) {
        let jobs = self.panel.job_list();
        self.widget
            .on_changes(&jobs, self.panel.refresh_trigger(), Some(800.0));
    }
}

#[test]
fn init_loads_jobs_and_stats_and_draws_the_tree() {
    let mut h = Harness::new();
    let init = h.panel.init();
    h.run(init);
    h.redraw();

    assert_eq!(h.panel.rows().len(), 3);
    assert_eq!(h.panel.stat().unwrap().0["jobs"], 3);
    assert!(h.notices.is_empty());

    let diagram = h.widget.state().diagram().unwrap();
    assert_eq!(diagram.scene.nodes.len(), 3);
    assert_eq!(
        serde_json::to_string(&diagram.tree).unwrap(),
        r#"{"name":"root","children":[{"name":"build","children":[]},{"name":"deploy","children":[]}]}"#
    );
}

#[test]
fn create_update_delete_round_trip_through_the_service() {
    let mut h = Harness::new();
    let init = h.panel.init();
    h.run(init);

    h.panel.new_job();
    *h.panel.draft_mut() = Job::new("publish").with_parent(3);
    let create = h.panel.save_job();
    h.run(vec![create]);
    assert_eq!(h.panel.rows().len(), 4);
    assert_eq!(h.panel.refresh_trigger(), 1);
    assert_eq!(h.widget.state().node_count(), 4);

    let row = h.panel.rows()[3].row;
    h.panel.edit_job(row);
    h.panel.draft_mut().name = "release".to_string();
    let update = h.panel.save_job();
    h.run(vec![update]);
    assert_eq!(h.panel.rows().len(), 4);
    assert_eq!(h.panel.rows()[3].job.name, "release");
    assert_eq!(h.panel.refresh_trigger(), 2);

    h.panel.ask_delete_job(row);
    let delete = h.panel.resolve_confirmation(true).unwrap();
    h.run(vec![delete]);
    assert_eq!(h.panel.rows().len(), 3);
    assert_eq!(h.panel.refresh_trigger(), 3);
    assert_eq!(h.widget.state().node_count(), 3);

    let messages: Vec<_> = h.notices.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Job publish is created",
            "Job release is updated",
            "Job release is deleted"
        ]
    );
}

#[test]
fn rejected_delete_surfaces_api_error_and_keeps_rows() {
    let mut h = Harness::new();
    let init = h.panel.init();
    h.run(init);

    let root = h.panel.rows()[0].row;
    h.panel.ask_delete_job(root);
    let delete = h.panel.resolve_confirmation(true).unwrap();
    h.run(vec![delete]);

    assert_eq!(h.panel.rows().len(), 3);
    assert_eq!(h.panel.refresh_trigger(), 0);
    let notice = h.notices.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.ends_with("http_status: 409"), "{}", notice.message);
}

#[test]
fn webhooks_flow() {
    let mut h = Harness::new();
    let init = h.panel.init();
    h.run(init);

    let build = h.panel.rows()[1].row;
    let update = h.panel.update_webhook(build).unwrap();
    h.run(vec![update]);
    h.panel.ask_delete_webhook(build);
    let delete = h.panel.resolve_confirmation(true).unwrap();
    h.run(vec![delete]);
    let all = h.panel.update_all_webhooks();
    h.run(vec![all]);
    h.run(vec![Request::LoadStats]);

    let messages: Vec<_> = h.notices.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "webhook (job: build) is updated",
            "webhook (job: build) is deleted",
            "all webhooks updated"
        ]
    );
    assert_eq!(h.panel.stat().unwrap().0["webhooks"], 3);
}
