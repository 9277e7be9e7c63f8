//! Graph widget state: rebuilds the whole diagram whenever its inputs
//! change and owns the pan/zoom state of the current diagram.

use crate::config::DiagramConfig;
use crate::converter::{JobTreeConverter, TreeReport};
use crate::scene::DiagramScene;
use crate::svg::SvgWriter;
use crate::zoom::ZoomBehavior;
use jobtree_core::{Job, TreeNode};

/// A rendered diagram together with its interactive transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub tree: TreeNode,
    pub scene: DiagramScene,
    pub zoom: ZoomBehavior,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DiagramState {
    #[default]
    NoDiagram,
    Rendered(Diagram),
}

impl DiagramState {
    pub fn diagram(&self) -> Option<&Diagram> {
        match self {
            DiagramState::NoDiagram => None,
            DiagramState::Rendered(diagram) => Some(diagram),
        }
    }

    pub fn node_count(&self) -> usize {
        self.diagram().map(|d| d.scene.nodes.len()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct GraphWidget {
    config: DiagramConfig,
    converter: JobTreeConverter,
    state: DiagramState,
    last_report: TreeReport,
    last_refresh: Option<u64>,
    last_width: Option<f64>,
    rebuilds: u64,
}

impl GraphWidget {
    pub fn new(config: DiagramConfig) -> Self {
        Self {
            config: config.validated(),
            ..Default::default()
        }
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DiagramConfig) {
        self.config = config.validated();
    }

    pub fn state(&self) -> &DiagramState {
        &self.state
    }

    pub fn zoom_mut(&mut self) -> Option<&mut ZoomBehavior> {
        match &mut self.state {
            DiagramState::NoDiagram => None,
            DiagramState::Rendered(diagram) => Some(&mut diagram.zoom),
        }
    }

    /// What the last rebuild had to leave out.
    pub fn last_report(&self) -> &TreeReport {
        &self.last_report
    }

    pub fn last_refresh(&self) -> Option<u64> {
        self.last_refresh
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }

    /// Whether `refresh` differs from the counter seen by the last rebuild.
    pub fn is_stale(&self, refresh: u64) -> bool {
        self.last_refresh != Some(refresh)
    }

    /// Tears down the current diagram and builds a new one from `jobs`.
    ///
    /// `container_width` is the measured width of the hosting element; the
    /// configured fallback is used when it is missing or unusable.
    pub fn on_changes(
        &mut self,
        jobs: &[Job],
        refresh: u64,
        container_width: Option<f64>,
    ) -> &DiagramState {
        self.destroy();
        self.rebuilds += 1;
        self.last_refresh = Some(refresh);

        let width = self.config.resolve_width(container_width);
        self.last_width = Some(width);
        let report = self.converter.convert(jobs);

        if let Some(tree) = report.root.clone() {
            let scene = DiagramScene::build(&tree, width, &self.config);
            tracing::debug!(
                "Rendered job diagram with {} nodes (refresh {}, width {})",
                scene.nodes.len(),
                refresh,
                width
            );
            self.state = DiagramState::Rendered(Diagram {
                tree,
                scene,
                zoom: ZoomBehavior::from_config(&self.config),
            });
        } else {
            tracing::debug!("No root job, diagram left empty (refresh {})", refresh);
        }

        self.last_report = report;
        &self.state
    }

    /// Drops the diagram; the widget goes back to showing nothing.
    pub fn destroy(&mut self) {
        self.state = DiagramState::NoDiagram;
    }

    /// Current diagram as SVG, with the live zoom transform applied once the
    /// view has moved from its initial position.
    pub fn to_svg(&self, writer: &SvgWriter) -> String {
        match &self.state {
            DiagramState::Rendered(diagram) => {
                let initial = ZoomBehavior::from_config(&self.config).transform();
                if diagram.zoom.transform() == initial {
                    writer.render(&diagram.scene)
                } else {
                    writer.render_zoomed(&diagram.scene, diagram.zoom.transform())
                }
            }
            DiagramState::NoDiagram => writer.render_empty(
                self.last_width.unwrap_or_else(|| self.config.resolve_width(None)),
                self.config.height,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn jobs() -> Vec<Job> {
        vec![
            Job::new("root").with_id(1),
            Job::new("build").with_id(2).with_parent(1),
            Job::new("deploy").with_id(3).with_parent(1),
        ]
    }

    #[test]
    fn test_starts_without_diagram() {
        let widget = GraphWidget::new(DiagramConfig::default());
        assert_eq!(widget.state(), &DiagramState::NoDiagram);
        assert_eq!(widget.state().node_count(), 0);
    }

    #[test]
    fn test_valid_jobs_render() {
        let mut widget = GraphWidget::new(DiagramConfig::default());
        let state = widget.on_changes(&jobs(), 0, Some(1000.0));
        let diagram = state.diagram().unwrap();
        assert_eq!(diagram.scene.nodes.len(), 3);
        assert_eq!(diagram.scene.links.len(), 2);
        assert_eq!(diagram.scene.width, 1000.0);
    }

    #[test]
    fn test_empty_and_rootless_inputs_render_nothing() {
        let mut widget = GraphWidget::new(DiagramConfig::default());
        assert_eq!(widget.on_changes(&[], 0, Some(800.0)).node_count(), 0);

        let rootless = vec![Job::new("a").with_id(1).with_parent(2)];
        assert_eq!(widget.on_changes(&rootless, 1, Some(800.0)).node_count(), 0);
        assert_eq!(widget.last_report().unattached.len(), 1);
    }

    #[test]
    fn test_rebuild_replaces_diagram_and_resets_zoom() {
        let mut widget = GraphWidget::new(DiagramConfig::default());
        widget.on_changes(&jobs(), 0, Some(800.0));
        widget.zoom_mut().unwrap().scale_to(3.0, Point::ORIGIN);

        let mut fewer = jobs();
        fewer.pop();
        widget.on_changes(&fewer, 1, Some(800.0));
        let diagram = widget.state().diagram().unwrap();
        assert_eq!(diagram.scene.nodes.len(), 2);
        assert_eq!(diagram.zoom.transform().k, 0.8);
        assert_eq!(widget.rebuild_count(), 2);
        assert!(!widget.is_stale(1));
        assert!(widget.is_stale(2));
    }

    #[test]
    fn test_missing_width_uses_fallback() {
        let mut widget = GraphWidget::new(DiagramConfig::default());
        let state = widget.on_changes(&jobs(), 0, None);
        assert_eq!(state.diagram().unwrap().scene.width, 800.0);
    }

    #[test]
    fn test_destroy_clears_state() {
        let mut widget = GraphWidget::new(DiagramConfig::default());
        widget.on_changes(&jobs(), 0, Some(800.0));
        widget.destroy();
        assert!(widget.zoom_mut().is_none());
    }

    #[test]
    fn test_empty_svg_keeps_measured_width() {
        let mut widget = GraphWidget::new(DiagramConfig::default());
        assert!(widget.to_svg(&SvgWriter::new()).contains(r#"width="800""#));

        widget.on_changes(&[], 0, Some(640.0));
        let svg = widget.to_svg(&SvgWriter::new());
        assert!(svg.contains(r#"width="640""#));
        assert!(!svg.contains(r#"width="800""#));
    }

    #[test]
    fn test_inverted_scale_extent_falls_back() {
        let config: DiagramConfig = serde_json::from_str(r#"{"min_scale": 5}"#).unwrap();
        let mut widget = GraphWidget::new(config);
        let diagram = widget.on_changes(&jobs(), 0, Some(800.0)).diagram().unwrap();
        assert_eq!(diagram.zoom.min_scale, 0.5);
        assert_eq!(diagram.zoom.transform().k, 0.8);
    }

    #[test]
    fn test_svg_tracks_zoom() {
        let mut widget = GraphWidget::new(DiagramConfig::default());
        widget.on_changes(&jobs(), 0, Some(800.0));
        assert!(widget.to_svg(&SvgWriter::new()).contains("scale(0.8,0.8)"));

        widget.zoom_mut().unwrap().scale_to(10.0, Point::ORIGIN);
        let svg = widget.to_svg(&SvgWriter::new());
        assert!(svg.contains("scale(4)"));
    }
}
