//! OpenSCAD script writer.
//!
//! Serialises a list of [`Node`] trees into OpenSCAD source:
//!
//! ```text
//! $fn = 50;
//!
//! translate(v=[0, 0, -11.025]) {
//!     cube(size=[83.25, 57, 3], center=true);
//! }
//! ```

use std::fmt::Write;
use std::path::Path;

use tracing::debug;

use super::{Node, ScadError};

const INDENT: &str = "    ";

/// An OpenSCAD program: global settings plus top-level nodes.
#[derive(Debug, Clone, Default)]
pub struct ScadProgram {
    /// Circle segment count emitted as `$fn`.
    pub segments: Option<u32>,

    /// Top-level nodes, emitted in order.
    pub nodes: Vec<Node>,
}

impl ScadProgram {
    /// Creates an empty program.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            segments: None,
            nodes: Vec::new(),
        }
    }

    /// Sets the `$fn` segment count.
    #[must_use]
    pub const fn with_segments(mut self, segments: u32) -> Self {
        self.segments = Some(segments);
        self
    }

    /// Appends one node.
    #[must_use]
    pub fn with_node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Appends all `nodes`.
    pub fn add(&mut self, nodes: impl IntoIterator<Item = Node>) {
        self.nodes.extend(nodes);
    }

    /// Renders the program as OpenSCAD source text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        if let Some(segments) = self.segments {
            let _ = writeln!(out, "$fn = {segments};");
            out.push('\n');
        }

        for node in &self.nodes {
            write_node(&mut out, node, 0);
        }

        out
    }

    /// Renders the program and writes it to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScadError::FileWrite`] if the file cannot be written.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), ScadError> {
        let path = path.as_ref();
        let source = self.render();

        std::fs::write(path, &source).map_err(|e| ScadError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!(path = %path.display(), bytes = source.len(), "Wrote OpenSCAD program");
        Ok(())
    }
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let indent = INDENT.repeat(depth);

    match node {
        Node::Cube { size, center } => {
            let _ = writeln!(
                out,
                "{indent}cube(size={}, center={center});",
                fmt_vec(size)
            );
        }
        Node::Cylinder {
            height,
            r1,
            r2,
            center,
        } => {
            let _ = writeln!(
                out,
                "{indent}cylinder(h={}, r1={}, r2={}, center={center});",
                fmt_num(*height),
                fmt_num(*r1),
                fmt_num(*r2)
            );
        }
        Node::Translate { v, children } => {
            write_block(out, &format!("translate(v={})", fmt_vec(v)), children, depth);
        }
        Node::Rotate {
            angle,
            axis,
            children,
        } => {
            let header = format!("rotate(a={}, v={})", fmt_num(*angle), fmt_vec(axis));
            write_block(out, &header, children, depth);
        }
        Node::Color { rgba, children } => {
            write_block(out, &format!("color({})", fmt_vec(rgba)), children, depth);
        }
        Node::Union(children) => write_block(out, "union()", children, depth),
        Node::Difference(children) => write_block(out, "difference()", children, depth),
        Node::Hull(children) => write_block(out, "hull()", children, depth),
        Node::Projection { cut, children } => {
            write_block(out, &format!("projection(cut={cut})"), children, depth);
        }
    }
}

fn write_block(out: &mut String, header: &str, children: &[Node], depth: usize) {
    let indent = INDENT.repeat(depth);
    let _ = writeln!(out, "{indent}{header} {{");
    for child in children {
        write_node(out, child, depth + 1);
    }
    let _ = writeln!(out, "{indent}}}");
}

/// Formats a number in shortest round-trip form, folding `-0` into `0`.
fn fmt_num(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

fn fmt_vec(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| fmt_num(*v)).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_segments_header() {
        let program = ScadProgram::new().with_segments(50);
        assert_eq!(program.render(), "$fn = 50;\n\n");
    }

    #[test]
    fn render_without_segments() {
        let program = ScadProgram::new().with_node(Node::cube(1.0, 2.0, 3.0));
        assert_eq!(program.render(), "cube(size=[1, 2, 3], center=true);\n");
    }

    #[test]
    fn render_nested_blocks() {
        let node = Node::difference(vec![
            Node::cube(10.0, 5.0, 3.0),
            Node::cylinder(6.0, 0.5).translate([2.5, -1.0, 0.0]),
        ]);
        let program = ScadProgram::new().with_node(node);

        let expected = "\
difference() {
    cube(size=[10, 5, 3], center=true);
    translate(v=[2.5, -1, 0]) {
        cylinder(h=6, r1=0.5, r2=0.5, center=true);
    }
}
";
        assert_eq!(program.render(), expected);
    }

    #[test]
    fn render_rotate_color_projection() {
        let node = Node::cube(1.0, 1.0, 1.0)
            .rotate(90.0, [0.0, 1.0, 0.0])
            .color(0.5, 0.5, 0.5)
            .projection();
        let text = ScadProgram::new().with_node(node).render();

        assert!(text.starts_with("projection(cut=false) {\n"));
        assert!(text.contains("    color([0.5, 0.5, 0.5, 1]) {\n"));
        assert!(text.contains("        rotate(a=90, v=[0, 1, 0]) {\n"));
    }

    #[test]
    fn negative_zero_is_folded() {
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(-1.5), "-1.5");
        assert_eq!(fmt_vec(&[0.0, -0.0, 0.25]), "[0, 0, 0.25]");
    }

    #[test]
    fn add_appends_in_order() {
        let mut program = ScadProgram::new();
        program.add(vec![Node::cube(1.0, 1.0, 1.0), Node::cylinder(1.0, 1.0)]);
        let text = program.render();

        let cube_at = text.find("cube(").unwrap();
        let cyl_at = text.find("cylinder(").unwrap();
        assert!(cube_at < cyl_at);
    }

    #[test]
    fn write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part.scad");

        let program = ScadProgram::new()
            .with_segments(20)
            .with_node(Node::cube(1.0, 1.0, 1.0));
        program.write(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, program.render());
    }

    #[test]
    fn write_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("part.scad");

        let err = ScadProgram::new().write(&path).unwrap_err();
        assert!(err.to_string().contains("part.scad"));
    }
}
