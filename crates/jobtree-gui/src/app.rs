use std::sync::Arc;
use std::time::Duration;

use crate::components::{
    confirm_dialog,
    graph_canvas::GraphCanvas,
    job_editor::{self, EditorAction},
    job_list::{self, JobListAction},
    notifications::NotificationManager,
    stats_panel,
};
use crate::demo::demo_snapshot;
use crate::settings::AppSettings;
use jobtree_app::{AppController, JobPanel, MemoryJobService, NotificationSink, Request};
use jobtree_core::{Group, GroupId, Snapshot};
use jobtree_events::{Event, EventBus, EventListener, PanelTab};

pub struct JobTreeApp {
    settings: AppSettings,
    event_bus: EventBus,
    controller: AppController,
    groups: Vec<Group>,
    panel: JobPanel,
    canvas: GraphCanvas,
    notification_manager: NotificationManager,
    status_message: String,
    in_flight: usize,
}

fn initial_snapshot(settings: &AppSettings, notifications: &mut NotificationManager) -> Snapshot {
    if let Some(path) = &settings.snapshot_path {
        match Snapshot::load(path) {
            Ok(snapshot) => {
                tracing::info!("Loaded snapshot from {:?}", path);
                return snapshot;
            }
            Err(e) => {
                tracing::error!("Failed to load snapshot: {}", e);
                notifications.error(e.to_string());
            }
        }
    }
    demo_snapshot().unwrap_or_else(|e| {
        tracing::error!("Demo snapshot is invalid: {}", e);
        Snapshot::default()
    })
}

impl JobTreeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: AppSettings) -> Self {
        let mut notification_manager = NotificationManager::new(&settings.notifications);
        let snapshot = initial_snapshot(&settings, &mut notification_manager);

        let service = Arc::new(MemoryJobService::from_snapshot(snapshot));
        let groups = service.groups();
        let group = groups
            .iter()
            .map(|g| g.id)
            .find(|id| id.0 == settings.group_id)
            .or_else(|| groups.first().map(|g| g.id))
            .unwrap_or(GroupId(settings.group_id));

        let event_bus = EventBus::new();
        let controller = AppController::new(service, event_bus.clone());

        let mut app = Self {
            canvas: GraphCanvas::new(settings.diagram.clone()),
            settings,
            event_bus,
            controller,
            groups,
            panel: JobPanel::new(group),
            notification_manager,
            status_message: "Loading jobs...".to_string(),
            in_flight: 0,
        };
        app.submit_all(app.panel.init());
        app
    }

    fn submit(&mut self, request: Request) {
        self.in_flight += 1;
        // Workers publish on the bus; nothing waits on the handle.
        let _ = self.controller.submit(request);
    }

    fn submit_all(&mut self, requests: Vec<Request>) {
        for request in requests {
            self.submit(request);
        }
    }

    fn switch_group(&mut self, group: GroupId) {
        if group == self.panel.group() {
            return;
        }
        tracing::info!("Switching to group {}", group);
        let tab = self.panel.tab();
        self.panel = JobPanel::new(group);
        self.panel.select_tab(tab);
        self.settings.group_id = group.0;
        self.submit_all(self.panel.init());
    }

    fn group_label(&self, id: GroupId) -> String {
        self.groups
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.clone())
            .unwrap_or_else(|| format!("group {id}"))
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let current = self.panel.group();
            let mut selected = current;
            egui::ComboBox::from_id_salt("group_selector")
                .selected_text(self.group_label(current))
                .show_ui(ui, |ui| {
                    for group in &self.groups {
                        ui.selectable_value(&mut selected, group.id, group.name.as_str());
                    }
                });
            if selected != current {
                self.switch_group(selected);
            }

            ui.separator();
            for (tab, label) in [
                (PanelTab::Jobs, "Jobs"),
                (PanelTab::Graph, "Graph"),
                (PanelTab::Stats, "Stats"),
            ] {
                if ui.selectable_label(self.panel.tab() == tab, label).clicked() {
                    self.event_bus.publish(Event::TabSelected { tab });
                }
            }
        });
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.in_flight > 0 {
                ui.add(egui::Spinner::new());
            }
            ui.label(self.status_message.as_str());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{} jobs", self.panel.rows().len()));
                ui.separator();
                ui.label(format!("{} notifications", self.notification_manager.shown()));
            });
        });
    }

    fn handle_list_action(&mut self, action: JobListAction) {
        match action {
            JobListAction::Edit(row) => {
                self.panel.edit_job(row);
            }
            JobListAction::UpdateWebhook(row) => {
                if let Some(request) = self.panel.update_webhook(row) {
                    self.submit(request);
                }
            }
            JobListAction::DeleteWebhook(row) => {
                self.panel.ask_delete_webhook(row);
            }
            JobListAction::Delete(row) => {
                self.panel.ask_delete_job(row);
            }
            JobListAction::UpdateAllWebhooks => {
                let request = self.panel.update_all_webhooks();
                self.submit(request);
            }
        }
    }

    fn handle_editor_action(&mut self, action: EditorAction) {
        match action {
            EditorAction::Save => {
                let request = self.panel.save_job();
                self.submit(request);
            }
            EditorAction::New => self.panel.new_job(),
        }
    }
}

impl EventListener for JobTreeApp {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::RequestCompleted(outcome) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                if let Some(refresh) = self
                    .panel
                    .apply(outcome.clone(), &mut self.notification_manager)
                {
                    self.event_bus.publish(refresh);
                }
                if self.in_flight == 0 {
                    self.status_message = "Ready".to_string();
                }
            }
            Event::GraphRefresh { trigger } => {
                tracing::debug!("Job list changed, diagram refresh #{}", trigger);
            }
            Event::TabSelected { tab } => self.panel.select_tab(*tab),
            Event::StatusUpdate { message } => self.status_message = message.clone(),
        }
    }
}

impl eframe::App for JobTreeApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.settings.save();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let bus = self.event_bus.clone();
        bus.dispatch_to(self);

        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.settings.window_size = [rect.width(), rect.height()];
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| self.top_bar(ui));
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| self.status_bar(ui));

        match self.panel.tab() {
            PanelTab::Jobs => {
                let rows = self.panel.rows().to_vec();
                let editor_action = egui::SidePanel::right("job_editor")
                    .resizable(true)
                    .default_width(280.0)
                    .show(ctx, |ui| job_editor::show(ui, self.panel.draft_mut(), &rows))
                    .inner;
                let list_action = egui::CentralPanel::default()
                    .show(ctx, |ui| {
                        job_list::show(
                            ui,
                            &rows,
                            self.panel.draft_row(),
                            self.panel.jobs_loaded(),
                        )
                    })
                    .inner;
                if let Some(action) = editor_action {
                    self.handle_editor_action(action);
                }
                if let Some(action) = list_action {
                    self.handle_list_action(action);
                }
            }
            PanelTab::Graph => {
                let jobs = self.panel.job_list();
                let (version, refresh) = (self.panel.list_version(), self.panel.refresh_trigger());
                egui::CentralPanel::default().show(ctx, |ui| {
                    self.canvas.show(ui, &jobs, version, refresh);
                });
            }
            PanelTab::Stats => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    stats_panel::show(ui, self.panel.stat());
                });
            }
        }

        if let Some(confirmation) = self.panel.pending_confirmation().cloned()
            && let Some(accepted) = confirm_dialog::show(ctx, &confirmation)
            && let Some(request) = self.panel.resolve_confirmation(accepted)
        {
            self.submit(request);
        }

        // Notifications last
        self.notification_manager.render(ctx);

        if self.in_flight > 0 {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
