pub mod config;
pub mod converter;
pub mod geometry;
pub mod layout;
pub mod scene;
pub mod svg;
pub mod widget;
pub mod zoom;

pub use config::DiagramConfig;
pub use converter::{JobTreeConverter, TreeReport};
pub use geometry::Point;
pub use layout::{ClusterLayouter, LaidOutNode, TreeLayout};
pub use scene::{DiagramScene, LabelAnchor, LinkPath, NodeClass, SceneLabel, SceneNode};
pub use svg::SvgWriter;
pub use widget::{Diagram, DiagramState, GraphWidget};
pub use zoom::{ZoomBehavior, ZoomTransform};
