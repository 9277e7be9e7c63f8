use jobtree_core::{Job, TreeNode};

/// Result of turning a flat job list into a tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeReport {
    /// Tree hanging off the first parentless job, if there is one.
    pub root: Option<TreeNode>,
    /// Parentless jobs other than the one that became the root.
    pub ignored_roots: Vec<Job>,
    /// Jobs with a parent reference that never led back to the root.
    pub unattached: Vec<Job>,
}

impl TreeReport {
    pub fn is_complete(&self) -> bool {
        self.ignored_roots.is_empty() && self.unattached.is_empty()
    }
}

/// Builds the job tree from parent references.
///
/// The first job without a parent becomes the root. Children are found by
/// partitioning the jobs not yet placed, so every job lands in the tree at
/// most once even when the input is cyclic or has duplicate ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct JobTreeConverter;

impl JobTreeConverter {
    pub fn new() -> Self {
        Self
    }

    pub fn build_tree(&self, jobs: &[Job]) -> Option<TreeNode> {
        self.convert(jobs).root
    }

    pub fn convert(&self, jobs: &[Job]) -> TreeReport {
        let Some(root_pos) = jobs.iter().position(Job::is_root) else {
            if !jobs.is_empty() {
                tracing::warn!(
                    "No parentless job among {} jobs, nothing to draw",
                    jobs.len()
                );
            }
            return TreeReport {
                root: None,
                ignored_roots: Vec::new(),
                unattached: jobs.to_vec(),
            };
        };

        let remaining: Vec<&Job> = jobs
            .iter()
            .enumerate()
            .filter(|&(pos, _)| pos != root_pos)
            .map(|(_, job)| job)
            .collect();

        let (root, rest) = Self::attach_children(&jobs[root_pos], remaining);
        let (ignored_roots, unattached): (Vec<&Job>, Vec<&Job>) =
            rest.into_iter().partition(|job| job.is_root());

        if !ignored_roots.is_empty() {
            tracing::warn!(
                "Group has {} parentless jobs; using '{}' as root and dropping {:?}",
                ignored_roots.len() + 1,
                root.name,
                ignored_roots.iter().map(|j| j.name.as_str()).collect::<Vec<_>>()
            );
        }
        if !unattached.is_empty() {
            tracing::warn!(
                "{} jobs are not reachable from root '{}'",
                unattached.len(),
                root.name
            );
        }

        TreeReport {
            root: Some(root),
            ignored_roots: ignored_roots.into_iter().cloned().collect(),
            unattached: unattached.into_iter().cloned().collect(),
        }
    }

    /// Splits `remaining` into the children of `job` and the rest, recurses
    /// into each child with the rest, and hands back what is still unplaced.
    fn attach_children<'a>(job: &'a Job, remaining: Vec<&'a Job>) -> (TreeNode, Vec<&'a Job>) {
        let mut node = TreeNode::new(job.name.clone(), job.id);
        let Some(id) = job.id else {
            return (node, remaining);
        };

        let (children, mut rest): (Vec<&Job>, Vec<&Job>) = remaining
            .into_iter()
            .partition(|candidate| candidate.parent_id == Some(id));

        for child in children {
            let (child_node, unplaced) = Self::attach_children(child, rest);
            rest = unplaced;
            node.children.push(child_node);
        }

        (node, rest)
    }
}
