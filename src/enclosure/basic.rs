//! Base enclosure: six tabbed panels and corner standoffs.
//!
//! # Geometry
//!
//! With inner dimensions `(x, y, z)` and wall thickness `t`:
//!
//! ```text
//! top      x + 2(t + top_x_overhang)    × y + 2(t + top_y_overhang)    × t
//! bottom   x + 2(t + bottom_x_overhang) × y + 2(t + bottom_y_overhang) × t
//! front    x + 2t                       × z                            × t
//! side     y                            × z                            × t
//! ```
//!
//! The front and back walls span the full width and overlap the side walls.
//! Front, back and side walls carry tabs along their top and bottom edges
//! that key into slots in the lids. The side walls also carry tabs on their
//! vertical edges that key into slots in the front and back. Tab positions
//! are fractions of the edge length.
//!
//! Panels are built flat in their own local frame and only rotated into
//! place by [`BasicEnclosure::assembly`].

use tracing::debug;

use crate::enclosure::error::EnclosureResult;
use crate::enclosure::holes::{cut_holes, HoleKind, HoleSpec, Panel};
use crate::enclosure::params::BoxParams;
use crate::enclosure::{AssemblyOptions, Enclosure, PartSet};
use crate::scad::{reference_cube, rounded_box, Node, INCH_TO_MM};

/// Derived panel dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    /// Inner x.
    pub inner_x: f64,
    /// Inner y.
    pub inner_y: f64,
    /// Inner z.
    pub inner_z: f64,
    /// Wall thickness.
    pub thickness: f64,
    /// Top plate x.
    pub top_x: f64,
    /// Top plate y.
    pub top_y: f64,
    /// Bottom plate x.
    pub bottom_x: f64,
    /// Bottom plate y.
    pub bottom_y: f64,
    /// Front and back wall width.
    pub front_x: f64,
    /// Front and back wall height.
    pub front_y: f64,
    /// Side wall width.
    pub side_x: f64,
    /// Side wall height.
    pub side_y: f64,
}

impl Dimensions {
    /// Computes the panel dimensions from box parameters.
    #[must_use]
    pub fn from_params(params: &BoxParams) -> Self {
        let (x, y, z) = params.inner_dimensions;
        let t = params.wall_thickness;
        Self {
            inner_x: x,
            inner_y: y,
            inner_z: z,
            thickness: t,
            top_x: x + 2.0 * (t + params.top_x_overhang),
            top_y: y + 2.0 * (t + params.top_y_overhang),
            bottom_x: x + 2.0 * (t + params.bottom_x_overhang),
            bottom_y: y + 2.0 * (t + params.bottom_y_overhang),
            front_x: x + 2.0 * t,
            front_y: z,
            side_x: y,
            side_y: z,
        }
    }

    /// Distance from the enclosure centre to the mid-plane of a lid.
    #[must_use]
    pub fn lid_offset(&self) -> f64 {
        0.5 * (self.inner_z + self.thickness)
    }
}

/// Position of a tab centre along an edge of `length`, given as a fraction.
fn edge_position(fraction: f64, length: f64) -> f64 {
    (fraction - 0.5) * length
}

/// Wraps `stock` in a difference with `cutters`, if there are any.
fn carve(stock: Node, cutters: Vec<Node>) -> Node {
    if cutters.is_empty() {
        return stock;
    }
    let mut parts = Vec::with_capacity(cutters.len() + 1);
    parts.push(stock);
    parts.extend(cutters);
    Node::difference(parts)
}

/// Wraps `stock` in a union with `additions`, if there are any.
fn join(stock: Node, additions: Vec<Node>) -> Node {
    if additions.is_empty() {
        return stock;
    }
    let mut parts = Vec::with_capacity(additions.len() + 1);
    parts.push(stock);
    parts.extend(additions);
    Node::union(parts)
}

/// Six-panel tabbed box with corner standoffs.
#[derive(Debug, Clone)]
pub struct BasicEnclosure {
    params: BoxParams,
    dims: Dimensions,
    holes: Vec<HoleSpec>,
    top: Node,
    bottom: Node,
    front: Node,
    back: Node,
    left: Node,
    right: Node,
    standoff: Node,
}

impl BasicEnclosure {
    /// Builds the enclosure.
    ///
    /// `layer_holes` are extra holes contributed by a specialised enclosure.
    /// They are cut after the standoff holes and the holes listed in
    /// `params.holes`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters or any hole are invalid.
    pub fn new(params: &BoxParams, layer_holes: Vec<HoleSpec>) -> EnclosureResult<Self> {
        params.validate()?;
        layer_holes.iter().try_for_each(HoleSpec::validate)?;

        let dims = Dimensions::from_params(params);

        let mut holes = standoff_holes(params, &dims);
        holes.extend(params.holes.iter().copied());
        holes.extend(layer_holes);

        let t = dims.thickness;
        let top = cut_holes(
            lid_stock(params, &dims, dims.top_x, dims.top_y),
            Panel::Top,
            &holes,
            t,
        );
        let bottom = cut_holes(
            lid_stock(params, &dims, dims.bottom_x, dims.bottom_y),
            Panel::Bottom,
            &holes,
            t,
        );
        let front = cut_holes(front_stock(params, &dims), Panel::Front, &holes, t);
        let back = cut_holes(front_stock(params, &dims), Panel::Back, &holes, t);
        let left = cut_holes(side_stock(params, &dims), Panel::Left, &holes, t);
        let right = cut_holes(side_stock(params, &dims), Panel::Right, &holes, t);
        let standoff = Node::cylinder(dims.inner_z, 0.5 * params.standoff_diameter);

        debug!(
            holes = holes.len(),
            bottom_x = dims.bottom_x,
            bottom_y = dims.bottom_y,
            "Built basic enclosure"
        );

        Ok(Self {
            params: params.clone(),
            dims,
            holes,
            top,
            bottom,
            front,
            back,
            left,
            right,
            standoff,
        })
    }

    /// Returns the box parameters.
    #[must_use]
    pub const fn params(&self) -> &BoxParams {
        &self.params
    }

    /// Returns the derived panel dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> &Dimensions {
        &self.dims
    }

    /// Returns every hole cut from the panels, in cutting order.
    #[must_use]
    pub fn holes(&self) -> &[HoleSpec] {
        &self.holes
    }

    /// Returns a panel in its local (flat) frame.
    #[must_use]
    pub const fn panel(&self, panel: Panel) -> &Node {
        match panel {
            Panel::Top => &self.top,
            Panel::Bottom => &self.bottom,
            Panel::Front => &self.front,
            Panel::Back => &self.back,
            Panel::Left => &self.left,
            Panel::Right => &self.right,
        }
    }

    /// Returns the standoff centres `(x, y)`.
    #[must_use]
    pub fn standoff_positions(&self) -> Vec<(f64, f64)> {
        standoff_positions(&self.params, &self.dims)
    }

    /// Places `panel` in world space, applying the explode offsets.
    #[must_use]
    pub fn place_panel(&self, panel: Panel, explode: [f64; 3]) -> Node {
        let [ex, ey, ez] = explode;
        let d = &self.dims;
        let t = d.thickness;
        let node = self.panel(panel).clone();

        match panel {
            Panel::Top => node.translate([0.0, 0.0, d.lid_offset() + ez]),
            Panel::Bottom => node.translate([0.0, 0.0, -d.lid_offset() - ez]),
            Panel::Front => node
                .rotate(90.0, [1.0, 0.0, 0.0])
                .translate([0.0, -0.5 * (d.inner_y + t) - ey, 0.0]),
            Panel::Back => node
                .rotate(90.0, [1.0, 0.0, 0.0])
                .translate([0.0, 0.5 * (d.inner_y + t) + ey, 0.0]),
            Panel::Left => node
                .rotate(90.0, [1.0, 0.0, 0.0])
                .rotate(90.0, [0.0, 0.0, 1.0])
                .translate([-0.5 * (d.inner_x + t) - ex, 0.0, 0.0]),
            Panel::Right => node
                .rotate(90.0, [1.0, 0.0, 0.0])
                .rotate(90.0, [0.0, 0.0, 1.0])
                .translate([0.5 * (d.inner_x + t) + ex, 0.0, 0.0]),
        }
    }

    /// Returns the flat laser-cutting layout of the six panels.
    ///
    /// The bottom sits at the origin with the top above it, front and back
    /// below it, and the side walls to its left. Parts are separated by
    /// `spacing_factor` wall thicknesses.
    #[must_use]
    pub fn projection(&self, show_ref_cube: bool, spacing_factor: f64) -> Vec<Node> {
        let d = &self.dims;
        let t = d.thickness;
        let gap = spacing_factor * t;
        // Wall height including the lid tabs.
        let wall_h = d.inner_z + 2.0 * t;

        let top_y = 0.5 * d.bottom_y + gap + 0.5 * d.top_y;
        let front_y = -(0.5 * d.bottom_y + gap + 0.5 * wall_h);
        let back_y = front_y - (wall_h + gap);
        let left_x = -(0.5 * d.bottom_x + gap + 0.5 * wall_h);
        let right_x = left_x - (wall_h + gap);

        let mut parts = vec![
            self.top.clone().translate([0.0, top_y, 0.0]).projection(),
            self.bottom.clone().projection(),
            self.front.clone().translate([0.0, front_y, 0.0]).projection(),
            self.back.clone().translate([0.0, back_y, 0.0]).projection(),
            self.left
                .clone()
                .rotate(90.0, [0.0, 0.0, 1.0])
                .translate([left_x, 0.0, 0.0])
                .projection(),
            self.right
                .clone()
                .rotate(90.0, [0.0, 0.0, 1.0])
                .translate([right_x, 0.0, 0.0])
                .projection(),
        ];

        if show_ref_cube {
            let x = 0.5 * d.bottom_x + gap + 0.5 * INCH_TO_MM;
            parts.push(reference_cube().translate([x, 0.0, 0.0]).projection());
        }

        parts
    }
}

impl Enclosure for BasicEnclosure {
    fn assembly(&self, options: &AssemblyOptions) -> Vec<Node> {
        const PANEL_FLAGS: [(Panel, PartSet); 6] = [
            (Panel::Top, PartSet::TOP),
            (Panel::Bottom, PartSet::BOTTOM),
            (Panel::Front, PartSet::FRONT),
            (Panel::Back, PartSet::BACK),
            (Panel::Left, PartSet::LEFT),
            (Panel::Right, PartSet::RIGHT),
        ];

        let mut parts: Vec<Node> = PANEL_FLAGS
            .iter()
            .filter(|(_, flag)| options.shows(*flag))
            .map(|(panel, _)| self.place_panel(*panel, options.explode))
            .collect();

        if options.shows(PartSet::STANDOFFS) {
            parts.extend(
                self.standoff_positions()
                    .into_iter()
                    .map(|(x, y)| self.standoff.clone().translate([x, y, 0.0])),
            );
        }

        parts
    }

    fn box_projection(&self, show_ref_cube: bool, spacing_factor: f64) -> Vec<Node> {
        self.projection(show_ref_cube, spacing_factor)
    }
}

fn standoff_positions(params: &BoxParams, dims: &Dimensions) -> Vec<(f64, f64)> {
    let inset = 0.5 * params.standoff_diameter + params.standoff_offset;
    let sx = 0.5 * dims.inner_x - inset;
    let sy = 0.5 * dims.inner_y - inset;

    let mut positions = Vec::with_capacity(4);
    for i in [-1.0, 1.0] {
        for j in [-1.0, 1.0] {
            positions.push((i * sx, j * sy));
        }
    }
    positions
}

fn standoff_holes(params: &BoxParams, dims: &Dimensions) -> Vec<HoleSpec> {
    let kind = HoleKind::round(params.standoff_hole_diameter);
    let positions = standoff_positions(params, dims);

    [Panel::Top, Panel::Bottom]
        .into_iter()
        .flat_map(|panel| {
            positions
                .iter()
                .map(move |&location| HoleSpec::new(panel, kind, location))
        })
        .collect()
}

/// Lid plate with slots for the wall tabs.
fn lid_stock(params: &BoxParams, dims: &Dimensions, width: f64, length: f64) -> Node {
    let t = dims.thickness;
    let plate = rounded_box(width, length, t, params.lid_radius);

    let mut slots = Vec::new();
    for sign in [-1.0, 1.0] {
        let y = sign * 0.5 * (dims.inner_y + t);
        for &f in &params.lid2front_tabs {
            let x = edge_position(f, dims.front_x);
            slots.push(Node::cube(params.lid2front_tab_width, t, 2.0 * t).translate([x, y, 0.0]));
        }

        let x = sign * 0.5 * (dims.inner_x + t);
        for &f in &params.lid2side_tabs {
            let y = edge_position(f, dims.side_x);
            slots.push(Node::cube(t, params.lid2side_tab_width, 2.0 * t).translate([x, y, 0.0]));
        }
    }

    carve(plate, slots)
}

/// Front or back wall with lid tabs and slots for the side wall tabs.
fn front_stock(params: &BoxParams, dims: &Dimensions) -> Node {
    let t = dims.thickness;

    let mut tabs = Vec::new();
    let mut slots = Vec::new();
    for sign in [-1.0, 1.0] {
        let y = sign * 0.5 * (dims.front_y + t);
        for &f in &params.lid2front_tabs {
            let x = edge_position(f, dims.front_x);
            tabs.push(Node::cube(params.lid2front_tab_width, t, t).translate([x, y, 0.0]));
        }

        let x = sign * 0.5 * (dims.front_x - t);
        for &f in &params.side2side_tabs {
            let y = edge_position(f, dims.front_y);
            slots.push(Node::cube(t, params.side2side_tab_width, 2.0 * t).translate([x, y, 0.0]));
        }
    }

    carve(join(Node::cube(dims.front_x, dims.front_y, t), tabs), slots)
}

/// Side wall with lid tabs and tabs for the front and back walls.
fn side_stock(params: &BoxParams, dims: &Dimensions) -> Node {
    let t = dims.thickness;

    let mut tabs = Vec::new();
    for sign in [-1.0, 1.0] {
        let y = sign * 0.5 * (dims.side_y + t);
        for &f in &params.lid2side_tabs {
            let x = edge_position(f, dims.side_x);
            tabs.push(Node::cube(params.lid2side_tab_width, t, t).translate([x, y, 0.0]));
        }

        let x = sign * 0.5 * (dims.side_x + t);
        for &f in &params.side2side_tabs {
            let y = edge_position(f, dims.side_y);
            tabs.push(Node::cube(t, params.side2side_tab_width, t).translate([x, y, 0.0]));
        }
    }

    join(Node::cube(dims.side_x, dims.side_y, t), tabs)
}
