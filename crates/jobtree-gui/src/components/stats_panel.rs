use eframe::egui;
use jobtree_core::Stat;

pub fn show(ui: &mut egui::Ui, stat: Option<&Stat>) {
    ui.heading("Stats");
    ui.separator();

    let Some(stat) = stat else {
        ui.horizontal(|ui| {
            ui.add(egui::Spinner::new());
            ui.label("Waiting for stats...");
        });
        return;
    };
    if stat.is_empty() {
        ui.label("No stats reported.");
        return;
    }

    egui::Grid::new("stats_grid")
        .num_columns(2)
        .striped(true)
        .spacing([24.0, 4.0])
        .show(ui, |ui| {
            for (key, value) in stat.entries() {
                ui.strong(key);
                ui.label(value);
                ui.end_row();
            }
        });
}
