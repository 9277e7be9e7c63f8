use eframe::egui;
use egui::epaint::{CubicBezierShape, TextShape};
use egui::{Color32, FontId, Pos2, Stroke};
use jobtree_core::Job;
use jobtree_graph::{
    DiagramConfig, DiagramState, GraphWidget, LabelAnchor, NodeClass, Point, SvgWriter,
    ZoomBehavior, ZoomTransform,
};

const LINK_COLOR: Color32 = Color32::from_rgba_premultiplied(34, 34, 34, 102);
const INTERNAL_FILL: Color32 = Color32::from_rgb(0x55, 0x55, 0x55);
const LEAF_FILL: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);
const LABEL_FONT_SIZE: f32 = 10.0;
const LINK_WIDTH: f32 = 1.5;

/// What the current diagram was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Inputs {
    list_version: u64,
    refresh: u64,
    width: u32,
}

/// Hosts a [`GraphWidget`] inside an egui panel: measures the available
/// width, rebuilds on input changes and maps pointer gestures to the zoom.
pub struct GraphCanvas {
    widget: GraphWidget,
    inputs: Option<Inputs>,
    svg: SvgWriter,
}

/// Top-left corner of a rotated label galley so that its baseline starts
/// (anchor start) or ends (anchor end) at `anchor_point`.
fn label_origin(anchor_point: Pos2, angle: f32, size: egui::Vec2, anchor: LabelAnchor) -> Pos2 {
    let (sin, cos) = angle.sin_cos();
    let along = match anchor {
        LabelAnchor::Start => 0.0,
        LabelAnchor::End => -size.x,
    };
    let down = -size.y * 0.8;
    anchor_point + egui::vec2(along * cos - down * sin, along * sin + down * cos)
}

fn to_pos(transform: &ZoomTransform, origin: Pos2, p: Point) -> Pos2 {
    let p = transform.apply(p);
    origin + egui::vec2(p.x as f32, p.y as f32)
}

impl GraphCanvas {
    pub fn new(config: DiagramConfig) -> Self {
        Self {
            widget: GraphWidget::new(config),
            inputs: None,
            svg: SvgWriter::new(),
        }
    }

    /// Rebuilds the diagram when the job list, the refresh counter or the
    /// measured width moved since the last build.
    pub fn sync(&mut self, jobs: &[Job], list_version: u64, refresh: u64, width: Option<f64>) {
        let resolved = self.widget.config().resolve_width(width);
        let inputs = Inputs {
            list_version,
            refresh,
            width: resolved.round() as u32,
        };
        if self.inputs == Some(inputs) {
            return;
        }
        self.inputs = Some(inputs);
        self.widget.on_changes(jobs, refresh, Some(resolved));

        let report = self.widget.last_report();
        if !report.is_complete() {
            tracing::warn!(
                "Job diagram is partial: {} extra roots, {} unattached jobs",
                report.ignored_roots.len(),
                report.unattached.len()
            );
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, jobs: &[Job], list_version: u64, refresh: u64) {
        ui.horizontal(|ui| {
            ui.heading("Graph");
            ui.label(format!("{} nodes", self.widget.state().node_count()));
            let report = self.widget.last_report();
            if !report.is_complete() {
                let skipped = report.ignored_roots.len() + report.unattached.len();
                ui.label(
                    egui::RichText::new(format!("{skipped} jobs not shown"))
                        .color(ui.visuals().warn_fg_color),
                );
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Copy SVG").clicked() {
                    ui.ctx().copy_text(self.widget.to_svg(&self.svg));
                }
                if ui.button("Reset view").clicked() {
                    let initial = ZoomBehavior::from_config(self.widget.config()).transform();
                    if let Some(zoom) = self.widget.zoom_mut() {
                        zoom.reset(initial);
                    }
                }
            });
        });
        ui.separator();

        let width = ui.available_width();
        let height = self.widget.config().height as f32;
        self.sync(jobs, list_version, refresh, Some(width as f64));

        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::click_and_drag());
        self.handle_input(ui, rect, &response);
        self.paint(ui, rect);
    }

    fn handle_input(&mut self, ui: &egui::Ui, rect: egui::Rect, response: &egui::Response) {
        let Some(zoom) = self.widget.zoom_mut() else {
            return;
        };

        if response.dragged() {
            let delta = response.drag_delta();
            zoom.translate_by(delta.x as f64, delta.y as f64);
        }

        let Some(pointer) = response.hover_pos() else {
            return;
        };
        let anchor = Point::new((pointer.x - rect.min.x) as f64, (pointer.y - rect.min.y) as f64);

        if response.double_clicked() {
            zoom.scale_by(2.0, anchor);
        }
        let (zoom_delta, scroll) = ui.input(|i| (i.zoom_delta(), i.smooth_scroll_delta.y));
        if (zoom_delta - 1.0).abs() > f32::EPSILON {
            zoom.scale_by(zoom_delta as f64, anchor);
        } else if scroll.abs() > f32::EPSILON {
            zoom.scale_by(2f64.powf(scroll as f64 * 0.002), anchor);
        }
    }

    fn paint(&self, ui: &egui::Ui, rect: egui::Rect) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, ui.visuals().extreme_bg_color);

        let DiagramState::Rendered(diagram) = self.widget.state() else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "No root job to draw",
                FontId::proportional(14.0),
                ui.visuals().weak_text_color(),
            );
            return;
        };

        let transform = diagram.zoom.transform();
        let k = transform.k as f32;
        let origin = rect.min;

        for link in &diagram.scene.links {
            let points = link
                .control_points()
                .map(|p| to_pos(&transform, origin, p));
            painter.add(CubicBezierShape::from_points_stroke(
                points,
                false,
                Color32::TRANSPARENT,
                Stroke::new(LINK_WIDTH * k, LINK_COLOR),
            ));
        }

        let text_color = ui.visuals().text_color();
        for node in &diagram.scene.nodes {
            let center = to_pos(&transform, origin, node.position);
            let fill = match node.class {
                NodeClass::Internal => INTERNAL_FILL,
                NodeClass::Leaf => LEAF_FILL,
            };
            painter.circle_filled(center, node.radius as f32 * k, fill);

            let label = &node.label;
            let angle = (label.rotation_deg as f32).to_radians();
            let (sin, cos) = angle.sin_cos();
            let (dx, dy) = (label.dx as f32 * k, label.dy as f32 * k);
            let anchor_point = center + egui::vec2(dx * cos - dy * sin, dx * sin + dy * cos);

            let galley = painter.layout_no_wrap(
                label.text.clone(),
                FontId::proportional(LABEL_FONT_SIZE * k),
                text_color,
            );
            let pos = label_origin(anchor_point, angle, galley.size(), label.anchor);
            painter.add(TextShape::new(pos, galley, text_color).with_angle(angle));
        }
    }
}
