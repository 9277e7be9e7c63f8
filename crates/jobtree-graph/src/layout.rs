use jobtree_core::{JobId, TreeNode};
use serde::{Deserialize, Serialize};

/// A tree node with its cluster-layout coordinates.
///
/// `x` runs along the sibling axis (`0..=height`), `y` along the depth axis
/// (root at 0, leaves at `width`). Rendering swaps them so the tree grows
/// left to right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaidOutNode {
    pub name: String,
    pub job_id: Option<JobId>,
    pub x: f64,
    pub y: f64,
    pub depth: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

impl LaidOutNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Flattened, positioned tree. Index 0 is the root; nodes are stored in
/// breadth-first order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeLayout {
    pub nodes: Vec<LaidOutNode>,
}

impl TreeLayout {
    pub fn root(&self) -> Option<&LaidOutNode> {
        self.nodes.first()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `(child, parent)` pairs for every node except the root.
    pub fn links(&self) -> impl Iterator<Item = (&LaidOutNode, &LaidOutNode)> {
        self.nodes
            .iter()
            .filter_map(|node| node.parent.map(|parent| (node, &self.nodes[parent])))
    }
}

/// Dendrogram layout: leaves evenly spaced along one axis and all at the same
/// depth, internal nodes centered over their children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterLayouter {
    /// Extent of the sibling axis.
    pub breadth: f64,
    /// Extent of the depth axis.
    pub depth: f64,
}

impl ClusterLayouter {
    pub fn new(breadth: f64, depth: f64) -> Self {
        Self { breadth, depth }
    }

    /// Siblings sit one unit apart, cousins two.
    fn separation(nodes: &[LaidOutNode], a: usize, b: usize) -> f64 {
        if nodes[a].parent == nodes[b].parent {
            1.0
        } else {
            2.0
        }
    }

    fn flatten(root: &TreeNode) -> Vec<LaidOutNode> {
        let mut nodes = vec![LaidOutNode {
            name: root.name.clone(),
            job_id: root.job_id,
            x: 0.0,
            y: 0.0,
            depth: 0,
            parent: None,
            children: Vec::new(),
        }];
        let mut sources = vec![root];
        let mut cursor = 0;

        while cursor < sources.len() {
            let source = sources[cursor];
            let depth = nodes[cursor].depth;
            for child in &source.children {
                let idx = nodes.len();
                nodes.push(LaidOutNode {
                    name: child.name.clone(),
                    job_id: child.job_id,
                    x: 0.0,
                    y: 0.0,
                    depth: depth + 1,
                    parent: Some(cursor),
                    children: Vec::new(),
                });
                nodes[cursor].children.push(idx);
                sources.push(child);
            }
            cursor += 1;
        }

        nodes
    }

    /// Children before parents, siblings left to right.
    fn post_order(nodes: &[LaidOutNode]) -> Vec<usize> {
        let mut order = Vec::with_capacity(nodes.len());
        let mut stack = vec![(0usize, false)];
        while let Some((idx, expanded)) = stack.pop() {
            if expanded {
                order.push(idx);
                continue;
            }
            stack.push((idx, true));
            for &child in nodes[idx].children.iter().rev() {
                stack.push((child, false));
            }
        }
        order
    }

    fn extreme_leaf(nodes: &[LaidOutNode], rightmost: bool) -> usize {
        let mut idx = 0;
        loop {
            let children = &nodes[idx].children;
            let next = if rightmost {
                children.last()
            } else {
                children.first()
            };
            match next {
                Some(&child) => idx = child,
                None => return idx,
            }
        }
    }

    pub fn execute(&self, root: &TreeNode) -> TreeLayout {
        let mut nodes = Self::flatten(root);
        let order = Self::post_order(&nodes);

        // Relative coordinates: x in separation units, y as height above the
        // deepest leaf below.
        let mut previous_leaf: Option<usize> = None;
        let mut leaf_x = 0.0;
        for &idx in &order {
            if nodes[idx].children.is_empty() {
                if let Some(prev) = previous_leaf {
                    leaf_x += Self::separation(&nodes, idx, prev);
                }
                nodes[idx].x = leaf_x;
                nodes[idx].y = 0.0;
                previous_leaf = Some(idx);
            } else {
                let children = &nodes[idx].children;
                let mean_x =
                    children.iter().map(|&c| nodes[c].x).sum::<f64>() / children.len() as f64;
                let max_y = children
                    .iter()
                    .map(|&c| nodes[c].y)
                    .fold(f64::NEG_INFINITY, f64::max);
                nodes[idx].x = mean_x;
                nodes[idx].y = max_y + 1.0;
            }
        }

        let left = Self::extreme_leaf(&nodes, false);
        let right = Self::extreme_leaf(&nodes, true);
        let x0 = nodes[left].x - Self::separation(&nodes, left, right) / 2.0;
        let x1 = nodes[right].x + Self::separation(&nodes, right, left) / 2.0;
        let root_height = nodes[0].y;

        for node in &mut nodes {
            node.x = (node.x - x0) / (x1 - x0) * self.breadth;
            node.y = if root_height > 0.0 {
                (1.0 - node.y / root_height) * self.depth
            } else {
                0.0
            };
        }

        tracing::debug!(
            "Cluster layout placed {} nodes in {}x{}",
            nodes.len(),
            self.depth,
            self.breadth
        );

        TreeLayout { nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, children: Vec<TreeNode>) -> TreeNode {
        TreeNode {
            job_id: None,
            name: name.to_string(),
            children,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_single_node_sits_mid_breadth_at_depth_zero() {
        let layout = ClusterLayouter::new(400.0, 800.0).execute(&node("solo", vec![]));
        assert_eq!(layout.len(), 1);
        let root = layout.root().unwrap();
        assert!(approx(root.x, 200.0));
        assert!(approx(root.y, 0.0));
        assert!(root.is_leaf());
        assert_eq!(layout.links().count(), 0);
    }

    #[test]
    fn test_root_with_two_leaves() {
        let tree = node("root", vec![node("build", vec![]), node("deploy", vec![])]);
        let layout = ClusterLayouter::new(400.0, 800.0).execute(&tree);

        // Leaves at 0 and 1, padded by half a unit: x0 = -0.5, x1 = 1.5.
        let xs: Vec<f64> = layout.nodes.iter().map(|n| n.x).collect();
        assert!(approx(xs[0], 200.0));
        assert!(approx(xs[1], 100.0));
        assert!(approx(xs[2], 300.0));

        assert!(approx(layout.nodes[0].y, 0.0));
        assert!(approx(layout.nodes[1].y, 800.0));
        assert!(approx(layout.nodes[2].y, 800.0));
    }

    #[test]
    fn test_cousins_are_spaced_wider_than_siblings() {
        // root -> a -> (a1, a2), root -> b
        let tree = node(
            "root",
            vec![
                node("a", vec![node("a1", vec![]), node("a2", vec![])]),
                node("b", vec![]),
            ],
        );
        let layout = ClusterLayouter::new(100.0, 200.0).execute(&tree);
        let by_name = |name: &str| layout.nodes.iter().find(|n| n.name == name).unwrap();

        // Relative leaf positions 0, 1, 3 (a2 -> b crosses parents); the outer
        // leaves are cousins too, so the span is -1..4.
        assert!(approx(by_name("a1").x, 20.0));
        assert!(approx(by_name("a2").x, 40.0));
        assert!(approx(by_name("b").x, 80.0));
        assert!(approx(by_name("a").x, 30.0));
        assert!(approx(by_name("root").x, 55.0));

        // All leaves share the outer depth, even the shallow one.
        assert!(approx(by_name("b").y, 200.0));
        assert!(approx(by_name("a1").y, 200.0));
        assert!(approx(by_name("a").y, 100.0));
        assert!(approx(by_name("root").y, 0.0));
    }

    #[test]
    fn test_nodes_are_breadth_first_with_parent_links() {
        let tree = node(
            "root",
            vec![node("a", vec![node("a1", vec![])]), node("b", vec![])],
        );
        let layout = ClusterLayouter::new(100.0, 100.0).execute(&tree);
        let names: Vec<_> = layout.nodes.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["root", "a", "b", "a1"]);
        assert_eq!(layout.nodes[3].parent, Some(1));
        assert_eq!(layout.nodes[3].depth, 2);

        let links: Vec<_> = layout
            .links()
            .map(|(c, p)| (c.name.as_str(), p.name.as_str()))
            .collect();
        assert_eq!(links, vec![("a", "root"), ("b", "root"), ("a1", "a")]);
    }

    #[test]
    fn test_coordinates_stay_inside_canvas() {
        let chain = (0..6).fold(node("leaf", vec![]), |acc, i| {
            node(&format!("n{i}"), vec![acc, node(&format!("s{i}"), vec![])])
        });
        let layout = ClusterLayouter::new(400.0, 640.0).execute(&chain);
        for n in &layout.nodes {
            assert!(n.x > 0.0 && n.x < 400.0, "{} x={}", n.name, n.x);
            assert!(n.y >= 0.0 && n.y <= 640.0, "{} y={}", n.name, n.y);
        }
    }
}
