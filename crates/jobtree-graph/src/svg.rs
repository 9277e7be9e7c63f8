use crate::geometry::fmt_num;
use crate::scene::DiagramScene;
use crate::zoom::ZoomTransform;
use std::fmt::Write;

const DEFAULT_STYLE: &str = ".link { fill: none; stroke: #555; stroke-opacity: 0.4; stroke-width: 1.5px; } \
.node circle { fill: #999; } \
.node--internal circle { fill: #555; } \
.node text { font: 10px sans-serif; }";

/// Serializes a [`DiagramScene`] into a standalone SVG document.
#[derive(Debug, Clone)]
pub struct SvgWriter {
    /// Embed a `<style>` block so the file renders without external CSS.
    pub embed_style: bool,
}

impl Default for SvgWriter {
    fn default() -> Self {
        Self { embed_style: true }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

impl SvgWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders the scene with its static initial group transform.
    pub fn render(&self, scene: &DiagramScene) -> String {
        self.render_with(scene, &scene.group_transform)
    }

    /// Renders the scene with the group transform of a zoom state.
    pub fn render_zoomed(&self, scene: &DiagramScene, zoom: ZoomTransform) -> String {
        self.render_with(scene, &zoom.to_svg())
    }

    fn render_with(&self, scene: &DiagramScene, group_transform: &str) -> String {
        let width = fmt_num(scene.width);
        let height = fmt_num(scene.height);
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">"#
        );
        if self.embed_style {
            let _ = writeln!(out, "<style>{DEFAULT_STYLE}</style>");
        }
        let _ = writeln!(out, r#"<g transform="{}">"#, escape(group_transform));

        for link in &scene.links {
            let _ = writeln!(out, r#"<path class="link" d="{}"/>"#, link.path_data());
        }

        for node in &scene.nodes {
            let label = &node.label;
            let _ = writeln!(
                out,
                r#"<g class="{}" transform="{}"><circle r="{}"/><text dy="{}" x="{}" transform="rotate({})" style="text-anchor: {};">{}</text></g>"#,
                node.class.css_class(),
                node.transform(),
                fmt_num(node.radius),
                fmt_num(label.dy),
                fmt_num(label.dx),
                fmt_num(label.rotation_deg),
                label.anchor.as_str(),
                escape(&label.text)
            );
        }

        let _ = writeln!(out, "</g>");
        let _ = writeln!(
            out,
            r#"<rect width="{width}" height="{height}" style="fill: none; pointer-events: all;"/>"#
        );
        out.push_str("</svg>\n");
        out
    }

    /// An SVG with only the capture rectangle, used when there is no tree.
    pub fn render_empty(&self, width: f64, height: f64) -> String {
        let width = fmt_num(width);
        let height = fmt_num(height);
        format!(
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">"#,
                "\n",
                r#"<rect width="{width}" height="{height}" style="fill: none; pointer-events: all;"/>"#,
                "\n</svg>\n"
            ),
            width = width,
            height = height
        )
    }
}
