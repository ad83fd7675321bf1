//! Derived shapes built from the scene graph primitives.

use super::Node;

/// Millimetres per inch.
pub const INCH_TO_MM: f64 = 25.4;

/// Creates a box with rounded vertical edges, centred on the origin.
///
/// The corners are the hull of four cylinders of `radius`. A radius of zero
/// or less degrades to a plain cube. A radius larger than half the shorter
/// side is clamped to it, which gives a fully rounded slot.
#[must_use]
pub fn rounded_box(x: f64, y: f64, z: f64, radius: f64) -> Node {
    if radius <= 0.0 {
        return Node::cube(x, y, z);
    }

    let radius = radius.min(0.5 * x.min(y));
    let cx = 0.5 * x - radius;
    let cy = 0.5 * y - radius;
    let corners = [(-cx, -cy), (cx, -cy), (cx, cy), (-cx, cy)]
        .into_iter()
        .map(|(px, py)| Node::cylinder(z, radius).translate([px, py, 0.0]))
        .collect();

    Node::hull(corners)
}

/// Creates a plate with round through holes.
///
/// Each hole is `(x, y, diameter)` relative to the plate centre. With a
/// `radius` the plate corners are rounded.
#[must_use]
pub fn plate_with_holes(x: f64, y: f64, z: f64, holes: &[(f64, f64, f64)], radius: Option<f64>) -> Node {
    let plate = match radius {
        Some(r) => rounded_box(x, y, z, r),
        None => Node::cube(x, y, z),
    };

    if holes.is_empty() {
        return plate;
    }

    let mut parts = Vec::with_capacity(holes.len() + 1);
    parts.push(plate);
    parts.extend(
        holes
            .iter()
            .map(|&(hx, hy, diam)| Node::cylinder(2.0 * z, 0.5 * diam).translate([hx, hy, 0.0])),
    );

    Node::difference(parts)
}

/// Creates the one inch scale reference cube placed on cutting layouts.
#[must_use]
pub const fn reference_cube() -> Node {
    Node::cube(INCH_TO_MM, INCH_TO_MM, INCH_TO_MM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_box_is_hull_of_corners() {
        let node = rounded_box(10.0, 6.0, 3.0, 1.0);
        let Node::Hull(corners) = &node else {
            panic!("expected hull, got {node:?}");
        };
        assert_eq!(corners.len(), 4);

        let Node::Translate { v, .. } = &corners[2] else {
            panic!("expected translated corner");
        };
        assert!((v[0] - 4.0).abs() < 1e-9);
        assert!((v[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn rounded_box_without_radius_is_cube() {
        assert_eq!(rounded_box(10.0, 6.0, 3.0, 0.0), Node::cube(10.0, 6.0, 3.0));
        assert_eq!(rounded_box(10.0, 6.0, 3.0, -1.0), Node::cube(10.0, 6.0, 3.0));
    }

    #[test]
    fn rounded_box_fully_rounded_slot() {
        let node = rounded_box(1.0, 3.0, 6.0, 0.5);
        let Node::Hull(corners) = &node else {
            panic!("expected hull, got {node:?}");
        };
        assert_eq!(corners[2], Node::cylinder(6.0, 0.5).translate([0.0, 1.0, 0.0]));
    }

    #[test]
    fn rounded_box_clamps_oversized_radius() {
        assert_eq!(rounded_box(1.0, 3.0, 6.0, 2.0), rounded_box(1.0, 3.0, 6.0, 0.5));
    }

    #[test]
    fn plate_with_holes_cuts_each_hole() {
        let holes = [(1.0, 2.0, 3.0), (-1.0, 2.0, 3.0)];
        let node = plate_with_holes(20.0, 10.0, 1.5, &holes, None);

        let Node::Difference(parts) = &node else {
            panic!("expected difference, got {node:?}");
        };
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], Node::cube(20.0, 10.0, 1.5));
        assert_eq!(
            parts[1],
            Node::cylinder(3.0, 1.5).translate([1.0, 2.0, 0.0])
        );
    }

    #[test]
    fn plate_without_holes_is_plain() {
        let node = plate_with_holes(20.0, 10.0, 1.5, &[], Some(1.0));
        assert!(matches!(node, Node::Hull(_)));
    }

    #[test]
    fn reference_cube_is_one_inch() {
        assert_eq!(reference_cube(), Node::cube(25.4, 25.4, 25.4));
    }
}
