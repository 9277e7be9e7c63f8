use eframe::egui;
use jobtree_app::Confirmation;

/// Modal yes/no window. Returns the answer once the user picks one.
pub fn show(ctx: &egui::Context, confirmation: &Confirmation) -> Option<bool> {
    let mut answer = None;

    egui::Window::new("Confirm")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.label(confirmation.prompt());
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    answer = Some(true);
                }
                if ui.button("No").clicked() {
                    answer = Some(false);
                }
            });
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        answer = Some(false);
    }
    answer
}
