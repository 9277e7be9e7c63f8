use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use jobtree_core::{GroupId, Job, Snapshot};
use jobtree_graph::{ClusterLayouter, DiagramConfig, GraphWidget, JobTreeConverter, SvgWriter};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and draw CI job trees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the job tree of one group as JSON
    Tree(TreeArgs),
    /// Render the job tree of one group as SVG
    Render(DrawArgs),
    /// Print the laid-out node positions of one group as JSON
    Layout(DrawArgs),
    /// Report extra roots and unattached jobs in every group
    Check(CheckArgs),
}

#[derive(Args, Debug)]
struct Source {
    /// Snapshot file: a JSON array of groups with nested jobs
    #[arg(short, long)]
    input: PathBuf,

    /// Group whose jobs are used
    #[arg(short, long, default_value_t = 1)]
    group: i64,
}

#[derive(Args, Debug)]
struct TreeArgs {
    #[command(flatten)]
    source: Source,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DrawArgs {
    #[command(flatten)]
    source: Source,

    /// Canvas width; the configured fallback is used when absent
    #[arg(short, long)]
    width: Option<f64>,

    /// Canvas height
    #[arg(long)]
    height: Option<f64>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl DrawArgs {
    fn config(&self) -> DiagramConfig {
        let mut config = DiagramConfig::default();
        if let Some(height) = self.height {
            config.height = height;
        }
        config
    }
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Snapshot file to validate
    #[arg(short, long)]
    input: PathBuf,
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    Snapshot::load(path).with_context(|| format!("Failed to load snapshot {}", path.display()))
}

fn load_jobs(source: &Source) -> Result<Vec<Job>> {
    let snapshot = load_snapshot(&source.input)?;
    let group = GroupId(source.group);
    snapshot
        .group(group)
        .with_context(|| format!("Group {} not found in {}", group, source.input.display()))?;
    let jobs = snapshot.jobs_of(group);
    tracing::debug!("Loaded {} jobs of group {}", jobs.len(), group);
    Ok(jobs)
}

fn tree_json(jobs: &[Job]) -> Result<String> {
    let tree = match JobTreeConverter::new().build_tree(jobs) {
        Some(root) => serde_json::to_value(&root).context("Failed to serialize tree")?,
        None => serde_json::json!({}),
    };
    serde_json::to_string_pretty(&tree).context("Failed to serialize tree")
}

fn render_svg(jobs: &[Job], config: DiagramConfig, width: Option<f64>) -> String {
    let mut widget = GraphWidget::new(config);
    widget.on_changes(jobs, 0, width);
    widget.to_svg(&SvgWriter::new())
}

fn layout_json(jobs: &[Job], config: &DiagramConfig, width: Option<f64>) -> Result<String> {
    let width = config.resolve_width(width);
    let layout = JobTreeConverter::new()
        .build_tree(jobs)
        .map(|tree| ClusterLayouter::new(config.height, width).execute(&tree))
        .unwrap_or_default();
    serde_json::to_string_pretty(&layout).context("Failed to serialize layout")
}

/// One line per problem found in the snapshot.
fn check_snapshot(snapshot: &Snapshot) -> Vec<String> {
    let converter = JobTreeConverter::new();
    let mut issues = Vec::new();
    for group in &snapshot.groups {
        let jobs = snapshot.jobs_of(group.id);
        let report = converter.convert(&jobs);
        if report.root.is_none() && !jobs.is_empty() {
            issues.push(format!("group {} ({}): no root job", group.id, group.name));
        }
        for job in &report.ignored_roots {
            issues.push(format!(
                "group {} ({}): extra root job '{}'",
                group.id, group.name, job.name
            ));
        }
        for job in &report.unattached {
            issues.push(format!(
                "group {} ({}): job '{}' is not reachable from the root",
                group.id, group.name, job.name
            ));
        }
    }
    issues
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Tree(args) => {
            let jobs = load_jobs(&args.source)?;
            write_output(args.output.as_deref(), &tree_json(&jobs)?)
        }
        Command::Render(args) => {
            let jobs = load_jobs(&args.source)?;
            let svg = render_svg(&jobs, args.config(), args.width);
            write_output(args.output.as_deref(), &svg)
        }
        Command::Layout(args) => {
            let jobs = load_jobs(&args.source)?;
            let json = layout_json(&jobs, &args.config(), args.width)?;
            write_output(args.output.as_deref(), &json)
        }
        Command::Check(args) => {
            let snapshot = load_snapshot(&args.input)?;
            let issues = check_snapshot(&snapshot);
            if issues.is_empty() {
                println!("{} groups ok", snapshot.groups.len());
                return Ok(());
            }
            for issue in &issues {
                println!("{issue}");
            }
            bail!("{} problems found", issues.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const SNAPSHOT: &str = r#"[
        {"id": 1, "name": "backend", "jobs": [
            {"id": 1, "name": "root"},
            {"id": 2, "name": "build", "jenkins_job_perent_id": 1},
            {"id": 3, "name": "deploy", "jenkins_job_perent_id": 1}
        ]},
        {"id": 2, "name": "broken", "jobs": [
            {"id": 10, "name": "a"},
            {"id": 11, "name": "b"},
            {"id": 12, "name": "c", "jenkins_job_perent_id": 99}
        ]}
    ]"#;

    fn source(group: i64) -> (tempfile::TempDir, Source) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("snapshot.json");
        std::fs::write(&input, SNAPSHOT).unwrap();
        (dir, Source { input, group })
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_tree_json_matches_nested_shape() {
        let (_dir, source) = source(1);
        let jobs = load_jobs(&source).unwrap();
        let value: serde_json::Value = serde_json::from_str(&tree_json(&jobs).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"name": "root", "children": [
                {"name": "build", "children": []},
                {"name": "deploy", "children": []}
            ]})
        );
    }

    #[test]
    fn test_tree_without_root_is_empty_object() {
        assert_eq!(tree_json(&[]).unwrap(), "{}");

        let rootless = vec![Job::new("a").with_id(1).with_parent(2)];
        assert_eq!(tree_json(&rootless).unwrap(), "{}");
    }

    #[test]
    fn test_unknown_group_is_an_error() {
        let (_dir, source) = source(7);
        let err = load_jobs(&source).unwrap_err();
        assert!(err.to_string().contains("Group 7 not found"));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_snapshot(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/snapshot.json"));
    }

    #[test]
    fn test_render_uses_width_and_height() {
        let (_dir, source) = source(1);
        let jobs = load_jobs(&source).unwrap();
        let args = DrawArgs {
            source,
            width: Some(600.0),
            height: Some(300.0),
            output: None,
        };
        let svg = render_svg(&jobs, args.config(), args.width);
        assert!(svg.contains(r#"width="600" height="300""#));
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn test_layout_json_lists_every_node() {
        let (_dir, source) = source(1);
        let jobs = load_jobs(&source).unwrap();
        let json = layout_json(&jobs, &DiagramConfig::default(), None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let nodes = value["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0]["name"], "root");
        assert_eq!(nodes[0]["y"], 0.0);
        assert_eq!(nodes[1]["y"], 800.0);
    }

    #[test]
    fn test_check_reports_extra_roots_and_orphans() {
        let snapshot = Snapshot::from_json(SNAPSHOT).unwrap();
        let issues = check_snapshot(&snapshot);
        assert_eq!(
            issues,
            vec![
                "group 2 (broken): extra root job 'b'".to_string(),
                "group 2 (broken): job 'c' is not reachable from the root".to_string(),
            ]
        );
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        write_output(Some(&path), "<svg/>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<svg/>");
    }
}
