use eframe::egui;
use egui_extras::{Column, TableBuilder};
use jobtree_app::JobRow;
use jobtree_core::RowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobListAction {
    Edit(RowId),
    UpdateWebhook(RowId),
    DeleteWebhook(RowId),
    Delete(RowId),
    UpdateAllWebhooks,
}

fn parent_label(rows: &[JobRow], row: &JobRow) -> String {
    match row.job.parent_id {
        None => "-".to_string(),
        Some(parent) => rows
            .iter()
            .find(|r| r.job.id == Some(parent))
            .map(|r| r.job.name.clone())
            .unwrap_or_else(|| format!("#{parent}")),
    }
}

/// Table of the group's jobs. At most one action is reported per frame.
pub fn show(
    ui: &mut egui::Ui,
    rows: &[JobRow],
    selected: Option<RowId>,
    loaded: bool,
) -> Option<JobListAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("Jobs");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(!rows.is_empty(), egui::Button::new("Update all webhooks"))
                .clicked()
            {
                action = Some(JobListAction::UpdateAllWebhooks);
            }
        });
    });
    ui.separator();

    if !loaded {
        ui.horizontal(|ui| {
            ui.add(egui::Spinner::new());
            ui.label("Loading jobs...");
        });
        return action;
    }
    if rows.is_empty() {
        let weak = ui.visuals().weak_text_color();
        ui.label(egui::RichText::new("No jobs in this group.").color(weak));
        return action;
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(32.0))
        .column(Column::remainder().at_least(120.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::auto())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Id");
            });
            header.col(|ui| {
                ui.strong("Name");
            });
            header.col(|ui| {
                ui.strong("Parent");
            });
            header.col(|ui| {
                ui.strong("Actions");
            });
        })
        .body(|mut body| {
            for row in rows {
                body.row(22.0, |mut table_row| {
                    table_row.col(|ui| {
                        let id = row.job.id.map(|id| id.to_string()).unwrap_or_default();
                        ui.label(id);
                    });
                    table_row.col(|ui| {
                        if ui
                            .selectable_label(selected == Some(row.row), row.job.name.as_str())
                            .clicked()
                        {
                            action = Some(JobListAction::Edit(row.row));
                        }
                    });
                    table_row.col(|ui| {
                        ui.label(parent_label(rows, row));
                    });
                    table_row.col(|ui| {
                        ui.horizontal(|ui| {
                            if ui.small_button("Edit").clicked() {
                                action = Some(JobListAction::Edit(row.row));
                            }
                            if ui
                                .small_button("Webhook")
                                .on_hover_text("Create or refresh the job's webhook")
                                .clicked()
                            {
                                action = Some(JobListAction::UpdateWebhook(row.row));
                            }
                            if ui.small_button("Remove webhook").clicked() {
                                action = Some(JobListAction::DeleteWebhook(row.row));
                            }
                            if ui
                                .small_button(
                                    egui::RichText::new("Delete")
                                        .color(ui.visuals().error_fg_color),
                                )
                                .clicked()
                            {
                                action = Some(JobListAction::Delete(row.row));
                            }
                        });
                    });
                });
            }
        });

    action
}
