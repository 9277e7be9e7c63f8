use eframe::egui;
use jobtree_app::JobRow;
use jobtree_core::{Job, JobId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Save,
    New,
}

/// Jobs the draft may hang under: every saved job except the draft itself.
fn parent_candidates<'a>(rows: &'a [JobRow], draft: &Job) -> Vec<&'a Job> {
    rows.iter()
        .map(|r| &r.job)
        .filter(|job| job.id.is_some() && job.id != draft.id)
        .collect()
}

fn parent_text(rows: &[JobRow], parent: Option<JobId>) -> String {
    match parent {
        None => "(no parent)".to_string(),
        Some(id) => rows
            .iter()
            .find(|r| r.job.id == Some(id))
            .map(|r| format!("{} (#{id})", r.job.name))
            .unwrap_or_else(|| format!("#{id}")),
    }
}

/// Detail form bound to the panel's draft.
pub fn show(ui: &mut egui::Ui, draft: &mut Job, rows: &[JobRow]) -> Option<EditorAction> {
    let mut action = None;

    let title = match draft.id {
        Some(id) => format!("Edit job #{id}"),
        None => "New job".to_string(),
    };
    ui.heading(title);
    ui.separator();

    egui::Grid::new("job_editor_grid")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut draft.name);
            ui.end_row();

            ui.label("Parent");
            let candidates = parent_candidates(rows, draft);
            egui::ComboBox::from_id_salt("job_editor_parent")
                .selected_text(parent_text(rows, draft.parent_id))
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut draft.parent_id, None, "(no parent)");
                    for job in candidates {
                        let label = format!("{} (#{})", job.name, job.id.unwrap_or_default());
                        ui.selectable_value(&mut draft.parent_id, job.id, label);
                    }
                });
            ui.end_row();
        });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let can_save = !draft.name.trim().is_empty();
        if ui.add_enabled(can_save, egui::Button::new("Save")).clicked() {
            action = Some(EditorAction::Save);
        }
        if ui.button("New").clicked() {
            action = Some(EditorAction::New);
        }
    });

    action
}
