use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

pub mod error;
pub mod snapshot;

pub use error::ApiError;
pub use snapshot::{Snapshot, SnapshotError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub i64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local handle of one row in a panel's job list. Rows are told apart by
/// handle, never by comparing job values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(pub u64);

/// A CI job. Jobs form a tree per group through `parent_id`.
///
/// Field names on the wire follow the remote admin API, including its
/// spelling of the parent column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Absent until the job has been created remotely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JobId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "jenkins_job_perent_id", alias = "parent_id")]
    pub parent_id: Option<JobId>,
    #[serde(default, rename = "jenkins_group_id", alias = "group_id")]
    pub group_id: Option<GroupId>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(JobId(id));
        self
    }

    pub fn with_parent(mut self, parent: i64) -> Self {
        self.parent_id = Some(JobId(parent));
        self
    }

    pub fn with_group(mut self, group: i64) -> Self {
        self.group_id = Some(GroupId(group));
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// True once the remote side has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    #[serde(default)]
    pub name: String,
    /// Folder of the group's jobs on the CI server.
    #[serde(default)]
    pub jobs_base_path: String,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

/// Aggregate numbers shown by the stats tab. The panel never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stat(pub BTreeMap<String, serde_json::Value>);

impl Stat {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key/value pairs rendered for display; strings lose their JSON quotes.
    pub fn entries(&self) -> impl Iterator<Item = (&str, String)> {
        self.0.iter().map(|(key, value)| {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.as_str(), text)
        })
    }
}

/// Node of the derived job tree.
///
/// Serializes as `{"name": .., "children": [..]}`; the job id is kept for
/// callers but never written out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(skip)]
    pub job_id: Option<JobId>,
    pub name: String,
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(name: impl Into<String>, job_id: Option<JobId>) -> Self {
        Self {
            job_id,
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Longest path (in edges) from this node down to a leaf.
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Breadth-first walk starting at `self`.
    pub fn descendants(&self) -> Vec<&TreeNode> {
        let mut out = Vec::with_capacity(self.node_count());
        let mut queue = VecDeque::from([self]);
        while let Some(node) = queue.pop_front() {
            out.push(node);
            queue.extend(node.children.iter());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_wire_names() {
        let job = Job::new("build").with_id(2).with_parent(1).with_group(7);
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["id"], 2);
        assert_eq!(json["jenkins_job_perent_id"], 1);
        assert_eq!(json["jenkins_group_id"], 7);

        let parsed: Job =
            serde_json::from_str(r#"{"id": 3, "name": "deploy", "parent_id": 1}"#).unwrap();
        assert_eq!(parsed.parent_id, Some(JobId(1)));
        assert_eq!(parsed.group_id, None);
    }

    #[test]
    fn test_unsaved_job_omits_id() {
        let json = serde_json::to_string(&Job::new("draft")).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(!Job::new("draft").is_persisted());
    }

    #[test]
    fn test_tree_node_serializes_without_id() {
        let mut root = TreeNode::new("root", Some(JobId(1)));
        root.children.push(TreeNode::new("build", Some(JobId(2))));
        let json = serde_json::to_string(&root).unwrap();
        assert_eq!(
            json,
            r#"{"name":"root","children":[{"name":"build","children":[]}]}"#
        );
    }

    #[test]
    fn test_tree_node_metrics() {
        let mut root = TreeNode::new("a", None);
        let mut b = TreeNode::new("b", None);
        b.children.push(TreeNode::new("d", None));
        root.children.push(b);
        root.children.push(TreeNode::new("c", None));

        assert_eq!(root.node_count(), 4);
        assert_eq!(root.height(), 2);
        let names: Vec<_> = root.descendants().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_stat_entries_strip_string_quotes() {
        let mut stat = Stat::default();
        stat.insert("jobs", 4);
        stat.insert("status", "ok");
        let entries: Vec<_> = stat.entries().collect();
        assert_eq!(
            entries,
            vec![("jobs", "4".to_string()), ("status", "ok".to_string())]
        );
    }
}
