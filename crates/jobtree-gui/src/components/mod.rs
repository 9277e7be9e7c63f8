pub mod confirm_dialog;
pub mod graph_canvas;
pub mod job_editor;
pub mod job_list;
pub mod notifications;
pub mod stats_panel;
