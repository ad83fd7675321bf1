//! CSG scene graph and OpenSCAD script output.
//!
//! This module provides the small subset of OpenSCAD needed to describe
//! enclosure parts: centred primitives, rigid transforms, colour, boolean
//! operations and 2D projection.
//!
//! # Example
//!
//! ```
//! use capillary_enclosure::scad::{Node, ScadProgram};
//!
//! let plate = Node::cube(20.0, 10.0, 3.0);
//! let hole = Node::cylinder(6.0, 1.5).translate([5.0, 0.0, 0.0]);
//! let part = Node::difference(vec![plate, hole]);
//!
//! let program = ScadProgram::new().with_segments(50).with_node(part);
//! assert!(program.render().starts_with("$fn = 50;"));
//! ```

pub mod shapes;
pub mod writer;

pub use shapes::{plate_with_holes, reference_cube, rounded_box, INCH_TO_MM};
pub use writer::ScadProgram;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while emitting OpenSCAD output.
#[derive(Debug, Error)]
pub enum ScadError {
    /// Failed to write the script file.
    #[error("Failed to write file: {path}")]
    FileWrite {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// A node in the CSG scene graph.
///
/// Leaves are solid primitives; every other variant wraps its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Rectangular box.
    Cube {
        /// Size along x, y and z (mm).
        size: [f64; 3],
        /// Whether the box is centred on the origin.
        center: bool,
    },

    /// Cylinder (or truncated cone) along the z axis.
    Cylinder {
        /// Height (mm).
        height: f64,
        /// Bottom radius (mm).
        r1: f64,
        /// Top radius (mm).
        r2: f64,
        /// Whether the cylinder is centred on the origin.
        center: bool,
    },

    /// Translation of the children by `v`.
    Translate {
        /// Offset vector (mm).
        v: [f64; 3],
        /// Transformed nodes.
        children: Vec<Node>,
    },

    /// Rotation of the children by `angle` degrees about `axis`.
    Rotate {
        /// Angle in degrees.
        angle: f64,
        /// Rotation axis.
        axis: [f64; 3],
        /// Transformed nodes.
        children: Vec<Node>,
    },

    /// Display colour, ignored by the exporters.
    Color {
        /// Red, green, blue and alpha in `0.0..=1.0`.
        rgba: [f64; 4],
        /// Coloured nodes.
        children: Vec<Node>,
    },

    /// Boolean union.
    Union(Vec<Node>),

    /// Boolean difference: the first child minus all the others.
    Difference(Vec<Node>),

    /// Convex hull.
    Hull(Vec<Node>),

    /// Projection onto the xy plane.
    Projection {
        /// Slice at z = 0 instead of projecting the whole solid.
        cut: bool,
        /// Projected nodes.
        children: Vec<Node>,
    },
}

impl Node {
    /// Creates a box centred on the origin.
    #[must_use]
    pub const fn cube(x: f64, y: f64, z: f64) -> Self {
        Self::Cube {
            size: [x, y, z],
            center: true,
        }
    }

    /// Creates a straight cylinder centred on the origin.
    #[must_use]
    pub fn cylinder(height: f64, radius: f64) -> Self {
        Self::Cylinder {
            height,
            r1: radius,
            r2: radius,
            center: true,
        }
    }

    /// Creates a union of `children`.
    #[must_use]
    pub const fn union(children: Vec<Self>) -> Self {
        Self::Union(children)
    }

    /// Creates a difference: `children[0]` minus the rest.
    #[must_use]
    pub const fn difference(children: Vec<Self>) -> Self {
        Self::Difference(children)
    }

    /// Creates the convex hull of `children`.
    #[must_use]
    pub const fn hull(children: Vec<Self>) -> Self {
        Self::Hull(children)
    }

    /// Translates this node by `v`.
    #[must_use]
    pub fn translate(self, v: [f64; 3]) -> Self {
        Self::Translate {
            v,
            children: vec![self],
        }
    }

    /// Translates a group of nodes together.
    #[must_use]
    pub const fn translate_all(children: Vec<Self>, v: [f64; 3]) -> Self {
        Self::Translate { v, children }
    }

    /// Rotates this node by `angle` degrees about `axis`.
    #[must_use]
    pub fn rotate(self, angle: f64, axis: [f64; 3]) -> Self {
        Self::Rotate {
            angle,
            axis,
            children: vec![self],
        }
    }

    /// Colours this node. Alpha is fully opaque.
    #[must_use]
    pub fn color(self, r: f64, g: f64, b: f64) -> Self {
        Self::Color {
            rgba: [r, g, b, 1.0],
            children: vec![self],
        }
    }

    /// Projects this node onto the xy plane.
    #[must_use]
    pub fn projection(self) -> Self {
        Self::Projection {
            cut: false,
            children: vec![self],
        }
    }

    /// Returns the child nodes (empty for primitives).
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Cube { .. } | Self::Cylinder { .. } => &[],
            Self::Translate { children, .. }
            | Self::Rotate { children, .. }
            | Self::Color { children, .. }
            | Self::Projection { children, .. }
            | Self::Union(children)
            | Self::Difference(children)
            | Self::Hull(children) => children,
        }
    }

    /// Counts the primitives (cubes and cylinders) in this subtree.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        match self {
            Self::Cube { .. } | Self::Cylinder { .. } => 1,
            _ => self.children().iter().map(Self::primitive_count).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_is_centred() {
        assert_eq!(
            Node::cube(1.0, 2.0, 3.0),
            Node::Cube {
                size: [1.0, 2.0, 3.0],
                center: true
            }
        );
    }

    #[test]
    fn transforms_wrap_receiver() {
        let node = Node::cube(1.0, 1.0, 1.0)
            .rotate(90.0, [1.0, 0.0, 0.0])
            .translate([0.0, 5.0, 0.0]);

        let Node::Translate { v, children } = &node else {
            panic!("expected translate, got {node:?}");
        };
        assert_eq!(*v, [0.0, 5.0, 0.0]);
        assert!(matches!(children[0], Node::Rotate { angle, .. } if (angle - 90.0).abs() < f64::EPSILON));
    }

    #[test]
    fn primitive_count_walks_tree() {
        let part = Node::difference(vec![
            Node::cube(10.0, 10.0, 1.0),
            Node::cylinder(2.0, 1.0).translate([1.0, 1.0, 0.0]),
            Node::cylinder(2.0, 1.0).translate([-1.0, 1.0, 0.0]),
        ]);
        assert_eq!(part.primitive_count(), 3);
        assert_eq!(part.children().len(), 3);
    }

    #[test]
    fn error_display() {
        let err = ScadError::FileWrite {
            path: PathBuf::from("out.scad"),
            source: io::Error::other("disk full"),
        };
        assert_eq!(err.to_string(), "Failed to write file: out.scad");
    }
}
