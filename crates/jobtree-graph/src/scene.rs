use crate::config::DiagramConfig;
use crate::geometry::{Point, fmt_num};
use crate::layout::{ClusterLayouter, TreeLayout};
use jobtree_core::{JobId, TreeNode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeClass {
    Internal,
    Leaf,
}

impl NodeClass {
    pub fn css_class(self) -> &'static str {
        match self {
            NodeClass::Internal => "node node--internal",
            NodeClass::Leaf => "node node--leaf",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelAnchor {
    Start,
    End,
}

impl LabelAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelAnchor::Start => "start",
            LabelAnchor::End => "end",
        }
    }
}

/// Label placement relative to its node, before the rotation is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneLabel {
    pub text: String,
    pub dx: f64,
    pub dy: f64,
    pub anchor: LabelAnchor,
    pub rotation_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub job_id: Option<JobId>,
    /// Canvas position: depth runs along x, siblings along y.
    pub position: Point,
    pub class: NodeClass,
    pub radius: f64,
    pub label: SceneLabel,
}

impl SceneNode {
    pub fn transform(&self) -> String {
        format!(
            "translate({},{})",
            fmt_num(self.position.x),
            fmt_num(self.position.y)
        )
    }
}

/// Curve from a child back to its parent. Both control points sit a fixed
/// distance to the right of the parent, one at the child's row and one at
/// the parent's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPath {
    pub child: Point,
    pub parent: Point,
    pub control_offset: f64,
}

impl LinkPath {
    /// Start, two control points, end.
    pub fn control_points(&self) -> [Point; 4] {
        let cx = self.parent.x + self.control_offset;
        [
            self.child,
            Point::new(cx, self.child.y),
            Point::new(cx, self.parent.y),
            self.parent,
        ]
    }

    /// SVG path data, e.g. `M800,100C100,100 100,200 0,200`.
    pub fn path_data(&self) -> String {
        let [start, c1, c2, end] = self.control_points();
        format!(
            "M{},{}C{},{} {},{} {},{}",
            fmt_num(start.x),
            fmt_num(start.y),
            fmt_num(c1.x),
            fmt_num(c1.y),
            fmt_num(c2.x),
            fmt_num(c2.y),
            fmt_num(end.x),
            fmt_num(end.y)
        )
    }
}

/// Everything needed to draw one diagram. Rebuilt from scratch on every
/// input change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramScene {
    pub width: f64,
    pub height: f64,
    /// Static transform of the wrapping group before any zoom gesture.
    pub group_transform: String,
    pub links: Vec<LinkPath>,
    pub nodes: Vec<SceneNode>,
}

impl DiagramScene {
    pub fn build(tree: &TreeNode, width: f64, config: &DiagramConfig) -> Self {
        let layout = ClusterLayouter::new(config.height, width).execute(tree);
        Self::from_layout(&layout, width, config)
    }

    pub fn from_layout(layout: &TreeLayout, width: f64, config: &DiagramConfig) -> Self {
        let canvas = |x: f64, y: f64| Point::new(y, x);

        let links = layout
            .links()
            .map(|(child, parent)| LinkPath {
                child: canvas(child.x, child.y),
                parent: canvas(parent.x, parent.y),
                control_offset: config.link_control_offset,
            })
            .collect();

        let nodes = layout
            .nodes
            .iter()
            .map(|node| {
                let internal = !node.is_leaf();
                SceneNode {
                    job_id: node.job_id,
                    position: canvas(node.x, node.y),
                    class: if internal {
                        NodeClass::Internal
                    } else {
                        NodeClass::Leaf
                    },
                    radius: config.node_radius,
                    label: SceneLabel {
                        text: node.name.clone(),
                        dx: if internal {
                            -config.label_offset
                        } else {
                            config.label_offset
                        },
                        dy: config.label_dy,
                        anchor: if internal {
                            LabelAnchor::End
                        } else {
                            LabelAnchor::Start
                        },
                        rotation_deg: config.label_rotation_deg,
                    },
                }
            })
            .collect();

        let (tx, ty) = config.initial_translate;
        let k = fmt_num(config.initial_scale);
        Self {
            width,
            height: config.height,
            group_transform: format!("translate({},{})scale({k},{k})", fmt_num(tx), fmt_num(ty)),
            links,
            nodes,
        }
    }
}
