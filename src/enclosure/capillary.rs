//! Capillary sensor enclosure.
//!
//! Extends the basic enclosure with everything needed to hold a capillary
//! tube over a linear sensor:
//!
//! - a cutout in the bottom plate that exposes the sensor
//! - notches at the bottom of the side walls that the capillary passes through
//! - side and top guide plates that keep the capillary on the sensor
//! - an LED board and diffuser hung from the lid on standoffs
//! - a clamp on the bottom plate overhang that pinches the capillary
//!
//! The holes each feature needs are collected first and handed to the basic
//! enclosure, which cuts them all from the panels in one pass.

use tracing::debug;

use crate::enclosure::basic::{BasicEnclosure, Dimensions};
use crate::enclosure::error::EnclosureResult;
use crate::enclosure::holes::{HoleFit, HoleKind, HoleSpec, Panel};
use crate::enclosure::params::EnclosureParams;
use crate::enclosure::{AssemblyOptions, Enclosure, PartSet};
use crate::scad::{plate_with_holes, reference_cube, Node, INCH_TO_MM};

/// A round hole centre and diameter, `(x, y, diameter)`.
pub type RoundHole = (f64, f64, f64);

/// Capillary sensor enclosure built on a [`BasicEnclosure`].
#[derive(Debug, Clone)]
pub struct CapillaryEnclosure {
    params: EnclosureParams,
    base: BasicEnclosure,
    sensor: Node,
    capillary: Node,
    guide_plate_pos: Node,
    guide_plate_neg: Node,
    guide_plate_top: Node,
    led_pcb: Node,
    diffuser: Node,
    diffuser_standoff: Node,
    clamp: Node,
    clamp_size: (f64, f64, f64),
}

impl CapillaryEnclosure {
    /// Builds the enclosure and all of its internal parts.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is invalid.
    pub fn new(params: &EnclosureParams) -> EnclosureResult<Self> {
        params.validate()?;

        let dims = Dimensions::from_params(&params.enclosure);
        let holes = layer_holes(params, &dims);
        debug!(layer_holes = holes.len(), "Collected capillary enclosure holes");

        let base = BasicEnclosure::new(&params.enclosure, holes)?;

        let sensor = make_sensor(params);
        let capillary = Node::cylinder(params.capillary.length, 0.5 * params.capillary.diam)
            .rotate(90.0, [0.0, 1.0, 0.0]);
        let (guide_plate_pos, guide_plate_neg) = make_side_guide_plates(params);

        let (top_x, top_y, top_z) = guide_plate_top_dimensions(params);
        let guide_plate_top = plate_with_holes(
            top_x,
            top_y,
            top_z,
            &guide_plate_holes(params, HoleFit::Through),
            None,
        );

        let led_through = led_holes(params, HoleFit::Through);
        let (px, py, pz) = params.led.pcb_dimensions;
        let led_pcb = plate_with_holes(px, py, pz, &led_through, None);
        let (dx, dy, dz) = params.led.diffuser_dimensions;
        let diffuser = plate_with_holes(dx, dy, dz, &led_through, None);
        let diffuser_standoff = Node::cylinder(
            params.led.diffuser_standoff_height,
            0.5 * params.led.diffuser_standoff_diam,
        );

        let clamp_size = clamp_size(params);
        let (cx, cy, cz) = clamp_size;
        let clamp = plate_with_holes(
            cx,
            cy,
            cz,
            &[(0.0, params.clamp.hole_offset, params.clamp.tap_hole_diam)],
            Some(params.clamp.radius),
        );

        Ok(Self {
            params: params.clone(),
            base,
            sensor,
            capillary,
            guide_plate_pos,
            guide_plate_neg,
            guide_plate_top,
            led_pcb,
            diffuser,
            diffuser_standoff,
            clamp,
            clamp_size,
        })
    }

    /// Returns the parameters the enclosure was built from.
    #[must_use]
    pub const fn params(&self) -> &EnclosureParams {
        &self.params
    }

    /// Returns the underlying box.
    #[must_use]
    pub const fn base(&self) -> &BasicEnclosure {
        &self.base
    }

    /// Returns the clamp size `(x, y, z)`.
    #[must_use]
    pub const fn clamp_size(&self) -> (f64, f64, f64) {
        self.clamp_size
    }

    /// Returns the guide plate hole pattern.
    ///
    /// `Through` gives the clearance holes in the top guide plate, `Tap` the
    /// matching tapped holes in the bottom panel.
    #[must_use]
    pub fn guide_plate_holes(&self, fit: HoleFit) -> Vec<RoundHole> {
        guide_plate_holes(&self.params, fit)
    }

    /// Returns the top guide plate dimensions `(x, y, z)`.
    #[must_use]
    pub fn guide_plate_top_dimensions(&self) -> (f64, f64, f64) {
        guide_plate_top_dimensions(&self.params)
    }

    /// Returns the LED board hole pattern.
    #[must_use]
    pub fn led_holes(&self, fit: HoleFit) -> Vec<RoundHole> {
        led_holes(&self.params, fit)
    }

    /// Returns the flat cutting layout of the two side guide plates.
    #[must_use]
    pub fn guide_side_projection(&self, show_ref_cube: bool, spacing_factor: f64) -> Vec<Node> {
        let (gx, gy, _) = self.params.guide.plate_dimensions;
        let t = self.params.enclosure.wall_thickness;
        let y_shift = 0.5 * gy + 0.5 * spacing_factor * t;

        let mut parts = vec![
            self.guide_plate_pos
                .clone()
                .translate([0.0, y_shift, 0.0])
                .projection(),
            self.guide_plate_neg
                .clone()
                .translate([0.0, -y_shift, 0.0])
                .projection(),
        ];
        if show_ref_cube {
            parts.push(ref_cube_beside(gx, spacing_factor * t));
        }
        parts
    }

    /// Returns the flat cutting layout of the top guide plate.
    #[must_use]
    pub fn guide_top_projection(&self, show_ref_cube: bool, spacing_factor: f64) -> Vec<Node> {
        let (top_x, _, _) = self.guide_plate_top_dimensions();
        let t = self.params.enclosure.wall_thickness;

        let mut parts = vec![self.guide_plate_top.clone().projection()];
        if show_ref_cube {
            parts.push(ref_cube_beside(top_x, spacing_factor * t));
        }
        parts
    }

    /// Returns the flat cutting layout of the diffuser.
    #[must_use]
    pub fn diffuser_projection(&self, show_ref_cube: bool, spacing_factor: f64) -> Vec<Node> {
        let (dx, _, _) = self.params.led.diffuser_dimensions;
        let t = self.params.enclosure.wall_thickness;

        let mut parts = vec![self.diffuser.clone().projection()];
        if show_ref_cube {
            parts.push(ref_cube_beside(dx, spacing_factor * t));
        }
        parts
    }
}

impl Enclosure for CapillaryEnclosure {
    fn assembly(&self, options: &AssemblyOptions) -> Vec<Node> {
        let mut parts = self.base.assembly(options);

        let p = &self.params;
        let (_, _, z) = p.enclosure.inner_dimensions;
        let t = p.enclosure.wall_thickness;
        let ez = options.explode[2];
        let cap_offset = p.capillary.hole_offset;
        let cap_diam = p.capillary.diam;

        if options.shows(PartSet::SENSOR) {
            let (_, _, sz) = p.sensor.dimensions;
            let z_shift = -0.5 * z - 0.5 * sz - ez;
            parts.push(
                self.sensor
                    .clone()
                    .translate([0.0, 0.0, z_shift])
                    .color(0.5, 0.5, 0.5),
            );
        }

        if options.shows(PartSet::CAPILLARY) {
            let z_shift = -0.5 * z + 0.5 * cap_diam - ez;
            parts.push(self.capillary.clone().translate([0.0, cap_offset, z_shift]));
        }

        let (_, gy, gz) = p.guide.plate_dimensions;
        if options.shows(PartSet::GUIDE_PLATES) {
            let z_shift = -0.5 * z + 0.5 * gz;
            let y_pos = 0.5 * gy + 0.5 * cap_diam + cap_offset;
            let y_neg = -0.5 * gy - 0.5 * cap_diam + cap_offset;
            parts.push(self.guide_plate_pos.clone().translate([0.0, y_pos, z_shift]));
            parts.push(self.guide_plate_neg.clone().translate([0.0, y_neg, z_shift]));
        }
        if options.shows(PartSet::GUIDE_TOP) {
            let z_shift = -0.5 * z + 1.5 * gz;
            parts.push(
                self.guide_plate_top
                    .clone()
                    .translate([0.0, cap_offset, z_shift]),
            );
        }

        let (_, _, pz) = p.led.pcb_dimensions;
        if options.shows(PartSet::LED_PCB) {
            parts.push(self.led_pcb.clone().translate([0.0, 0.0, 0.5 * z - 0.5 * pz]));
        }

        let standoff_h = p.led.diffuser_standoff_height;
        if options.shows(PartSet::DIFFUSER) {
            let (_, _, dz) = p.led.diffuser_dimensions;
            let z_shift = 0.5 * z - pz - 0.5 * dz - standoff_h;
            parts.push(self.diffuser.clone().translate([0.0, 0.0, z_shift]));
        }

        if options.shows(PartSet::DIFFUSER_STANDOFFS) {
            let z_shift = 0.5 * z - pz - 0.5 * standoff_h;
            parts.extend(
                self.led_holes(HoleFit::Through)
                    .into_iter()
                    .map(|(x, y, _)| self.diffuser_standoff.clone().translate([x, y, z_shift])),
            );
        }

        if options.shows(PartSet::CLAMP) {
            let bottom_x = self.base.dimensions().bottom_x;
            let x_shift = 0.5 * bottom_x - 0.5 * p.enclosure.bottom_x_overhang;
            let z_shift = -0.5 * z + 0.5 * t + cap_diam;
            parts.push(self.clamp.clone().translate([x_shift, 0.0, z_shift]));
        }

        parts
    }

    fn box_projection(&self, show_ref_cube: bool, spacing_factor: f64) -> Vec<Node> {
        let mut parts = self.base.projection(show_ref_cube, spacing_factor);

        let dims = self.base.dimensions();
        let gap = spacing_factor * dims.thickness;
        let (cx, cy, _) = self.clamp_size;
        let x_shift = 0.5 * dims.bottom_x + 0.5 * cx + gap;
        let y_shift = 0.5 * dims.bottom_y + 0.5 * cy + gap;
        parts.push(
            self.clamp
                .clone()
                .translate([x_shift, y_shift, 0.0])
                .projection(),
        );

        parts
    }
}

/// Reference cube placed to the right of a part `width` wide.
fn ref_cube_beside(width: f64, gap: f64) -> Node {
    let x_shift = 0.5 * width + 0.5 * INCH_TO_MM + gap;
    reference_cube().translate([x_shift, 0.0, 0.0]).projection()
}

/// Collects every hole the capillary features cut from the box panels.
fn layer_holes(params: &EnclosureParams, dims: &Dimensions) -> Vec<HoleSpec> {
    let mut holes = vec![sensor_cutout(params)];
    holes.extend(capillary_holes(params, dims));
    holes.extend(
        guide_plate_holes(params, HoleFit::Tap)
            .into_iter()
            .map(|(x, y, d)| HoleSpec::new(Panel::Bottom, HoleKind::round(d), (x, y))),
    );
    holes.extend(
        led_holes(params, HoleFit::Tap)
            .into_iter()
            .map(|(x, y, d)| HoleSpec::new(Panel::Top, HoleKind::round(d), (x, y))),
    );
    holes.push(led_cable_hole(params));
    holes.extend(sensor_cable_holes(params, dims));
    holes.extend(clamp_thru_holes(params, dims));
    holes
}

fn sensor_cutout(params: &EnclosureParams) -> HoleSpec {
    let sensor = &params.sensor;
    HoleSpec::new(
        Panel::Bottom,
        HoleKind::square(sensor.length, sensor.width),
        (0.0, -sensor.hole_offset),
    )
}

/// Notches centred on the bottom edge of each side wall.
fn capillary_holes(params: &EnclosureParams, dims: &Dimensions) -> Vec<HoleSpec> {
    let (hole_x, hole_y, hole_r) = params.capillary.hole_size;
    let kind = HoleKind::rounded_square(hole_x, 2.0 * hole_y, hole_r);
    let location = (params.capillary.hole_offset, -0.5 * dims.inner_z);

    [Panel::Left, Panel::Right]
        .into_iter()
        .map(|panel| HoleSpec::new(panel, kind, location))
        .collect()
}

fn led_cable_hole(params: &EnclosureParams) -> HoleSpec {
    let (size_x, size_y) = params.led.cable_hole_size;
    HoleSpec::new(
        Panel::Bottom,
        HoleKind::square(size_x, size_y),
        params.led.cable_hole_pos,
    )
}

/// Keyhole at the bottom of the front wall: a round hole over a square
/// notch of the same width.
fn sensor_cable_holes(params: &EnclosureParams, dims: &Dimensions) -> Vec<HoleSpec> {
    let Some(width) = params.sensor.cable_hole_width else {
        return Vec::new();
    };
    let z = dims.inner_z;
    vec![
        HoleSpec::new(Panel::Front, HoleKind::round(width), (0.0, -0.5 * z + 0.5 * width)),
        HoleSpec::new(Panel::Front, HoleKind::square(width, width), (0.0, -0.5 * z)),
    ]
}

/// Clamp screw holes, centred in the bottom plate overhang on both sides.
fn clamp_thru_holes(params: &EnclosureParams, dims: &Dimensions) -> Vec<HoleSpec> {
    let overhang = params.enclosure.bottom_x_overhang;
    let kind = HoleKind::round(params.clamp.thru_hole_diam);

    [-1.0, 1.0]
        .into_iter()
        .map(|i| {
            let x = i * (0.5 * dims.bottom_x - 0.5 * overhang);
            HoleSpec::new(Panel::Bottom, kind, (x, params.clamp.hole_offset))
        })
        .collect()
}

fn guide_plate_top_dimensions(params: &EnclosureParams) -> (f64, f64, f64) {
    let (gx, gy, gz) = params.guide.plate_dimensions;
    (gx, 2.0 * gy + params.capillary.diam, gz)
}

fn guide_plate_holes(params: &EnclosureParams, fit: HoleFit) -> Vec<RoundHole> {
    let diam = match fit {
        HoleFit::Through => params.guide.thru_hole_diam,
        HoleFit::Tap => params.guide.tap_hole_diam,
    };
    let offset = params.guide.hole_offset;
    let (top_x, top_y, _) = guide_plate_top_dimensions(params);

    let mut holes = Vec::with_capacity(4);
    for i in [-1.0, 1.0] {
        for j in [-1.0, 1.0] {
            holes.push((i * (0.5 * top_x - offset), j * (0.5 * top_y - offset), diam));
        }
    }
    holes
}

fn led_holes(params: &EnclosureParams, fit: HoleFit) -> Vec<RoundHole> {
    let led = &params.led;
    let diam = match fit {
        HoleFit::Through => led.pcb_thru_hole_diam,
        HoleFit::Tap => led.pcb_tap_hole_diam,
    };
    let (px, py, _) = led.pcb_dimensions;
    let offset = led.pcb_hole_offset;

    [-1.0, 1.0]
        .into_iter()
        .map(|i| (i * (0.5 * px - offset), 0.5 * py - offset, diam))
        .collect()
}

/// Sensor board with its two mounting holes, shifted so the sensing element
/// sits on the enclosure centre line.
fn make_sensor(params: &EnclosureParams) -> Node {
    let sensor = &params.sensor;
    let (sx, sy, sz) = sensor.dimensions;
    let holes: Vec<RoundHole> = [-1.0, 1.0]
        .into_iter()
        .map(|i| (i * 0.5 * sensor.mount_hole_space, sensor.hole_offset, sensor.mount_hole_diam))
        .collect();

    plate_with_holes(sx, sy, sz, &holes, None).translate([0.0, -sensor.hole_offset, 0.0])
}

/// Side guide plates; each has two holes along its outer edge.
fn make_side_guide_plates(params: &EnclosureParams) -> (Node, Node) {
    let (gx, gy, gz) = params.guide.plate_dimensions;
    let diam = params.guide.thru_hole_diam;
    let offset = params.guide.hole_offset;

    let mut holes_pos = Vec::with_capacity(2);
    let mut holes_neg = Vec::with_capacity(2);
    for i in [-1.0, 1.0] {
        let x = i * (0.5 * gx - offset);
        let y = 0.5 * gy - offset;
        holes_pos.push((x, y, diam));
        holes_neg.push((x, -y, diam));
    }

    (
        plate_with_holes(gx, gy, gz, &holes_pos, None),
        plate_with_holes(gx, gy, gz, &holes_neg, None),
    )
}

fn clamp_size(params: &EnclosureParams) -> (f64, f64, f64) {
    let clamp_x = params.enclosure.bottom_x_overhang - 2.0 * params.clamp.tolerance;
    (clamp_x, params.clamp.length, params.enclosure.wall_thickness)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOL
    }

    fn reference() -> CapillaryEnclosure {
        CapillaryEnclosure::new(&EnclosureParams::default()).unwrap()
    }

    fn holes_on(enclosure: &CapillaryEnclosure, panel: Panel) -> Vec<HoleSpec> {
        enclosure
            .base()
            .holes()
            .iter()
            .filter(|h| h.panel == panel)
            .copied()
            .collect()
    }

    #[test]
    fn hole_counts_per_panel() {
        let enclosure = reference();
        assert_eq!(enclosure.base().holes().len(), 20);
        // Standoffs, sensor cutout, guide taps, LED cable and clamp.
        assert_eq!(holes_on(&enclosure, Panel::Bottom).len(), 4 + 1 + 4 + 1 + 2);
        // Standoffs and LED taps.
        assert_eq!(holes_on(&enclosure, Panel::Top).len(), 4 + 2);
        assert_eq!(holes_on(&enclosure, Panel::Left).len(), 1);
        assert_eq!(holes_on(&enclosure, Panel::Right).len(), 1);
        assert!(holes_on(&enclosure, Panel::Front).is_empty());
    }

    #[test]
    fn capillary_notch_straddles_bottom_edge() {
        let enclosure = reference();
        let notch = holes_on(&enclosure, Panel::Left)[0];

        assert_eq!(notch.kind, HoleKind::rounded_square(1.5, 2.5, 0.5));
        assert!(approx_eq(notch.location.0, 0.25));
        assert!(approx_eq(notch.location.1, -0.5 * 0.75 * 25.4));
    }

    #[test]
    fn sensor_cutout_offset() {
        let hole = sensor_cutout(&EnclosureParams::default());
        assert_eq!(hole.panel, Panel::Bottom);
        assert_eq!(hole.kind, HoleKind::square(61.33, 12.95));
        assert!(approx_eq(hole.location.1, -0.685));
    }

    #[test]
    fn clamp_holes_centred_in_overhang() {
        let params = EnclosureParams::default();
        let dims = Dimensions::from_params(&params.enclosure);
        let holes = clamp_thru_holes(&params, &dims);

        assert_eq!(holes.len(), 2);
        // bottom_x = 83.25, overhang = 8
        assert!(approx_eq(holes[0].location.0, -(41.625 - 4.0)));
        assert!(approx_eq(holes[1].location.0, 41.625 - 4.0));
        assert!(approx_eq(holes[1].location.1, 8.0));
    }

    #[test]
    fn guide_holes_by_fit() {
        let enclosure = reference();
        let through = enclosure.guide_plate_holes(HoleFit::Through);
        let tap = enclosure.guide_plate_holes(HoleFit::Tap);
        assert_eq!(through.len(), 4);
        assert_eq!(tap.len(), 4);

        let (top_x, top_y, _) = enclosure.guide_plate_top_dimensions();
        assert!(approx_eq(top_y, 2.0 * 12.7 + 1.0));
        let (x, y, d) = through[3];
        assert!(approx_eq(x, 0.5 * top_x - 3.0));
        assert!(approx_eq(y, 0.5 * top_y - 3.0));
        assert!(approx_eq(d, 0.089 * 25.4));
        assert!(approx_eq(tap[0].2, 0.07 * 25.4));
    }

    #[test]
    fn led_holes_on_back_edge() {
        let enclosure = reference();
        let holes = enclosure.led_holes(HoleFit::Through);
        assert_eq!(holes.len(), 2);
        let (px, py, _) = EnclosureParams::default().led.pcb_dimensions;
        assert!(approx_eq(holes[0].0, -(0.5 * px - 2.5)));
        assert!(approx_eq(holes[1].1, 0.5 * py - 2.5));
    }

    #[test]
    fn sensor_cable_holes_optional() {
        let mut params = EnclosureParams::default();
        let dims = Dimensions::from_params(&params.enclosure);
        assert!(sensor_cable_holes(&params, &dims).is_empty());

        params.sensor.cable_hole_width = Some(5.0);
        let holes = sensor_cable_holes(&params, &dims);
        assert_eq!(holes.len(), 2);
        assert!(holes.iter().all(|h| h.panel == Panel::Front));
        assert!(approx_eq(holes[0].location.1, -0.5 * dims.inner_z + 2.5));

        let enclosure = CapillaryEnclosure::new(&params).unwrap();
        assert_eq!(holes_on(&enclosure, Panel::Front).len(), 2);
    }

    #[test]
    fn clamp_dimensions() {
        let (x, y, z) = reference().clamp_size();
        assert!(approx_eq(x, 8.0 - 0.5));
        assert!(approx_eq(y, 28.35));
        assert!(approx_eq(z, 3.0));
    }

    #[test]
    fn full_assembly_part_count() {
        let parts = reference().assembly(&AssemblyOptions::default());
        // 6 panels, 4 standoffs, sensor, capillary, 2 side guides, guide top,
        // LED board, diffuser, 2 diffuser standoffs, clamp.
        assert_eq!(parts.len(), 6 + 4 + 1 + 1 + 2 + 1 + 1 + 1 + 2 + 1);
    }

    #[test]
    fn assembly_respects_part_set() {
        let enclosure = reference();
        let options = AssemblyOptions::with_parts(PartSet::SENSOR | PartSet::CAPILLARY);
        let parts = enclosure.assembly(&options);
        assert_eq!(parts.len(), 2);

        let Node::Color { children, .. } = &parts[0] else {
            panic!("expected coloured sensor");
        };
        let Node::Translate { v, .. } = &children[0] else {
            panic!("expected translated sensor");
        };
        assert!(approx_eq(v[2], -0.5 * 19.05 - 0.5 * 3.3));

        let Node::Translate { v, .. } = &parts[1] else {
            panic!("expected translated capillary");
        };
        assert!(approx_eq(v[1], 0.25));
        assert!(approx_eq(v[2], -0.5 * 19.05 + 0.5));
    }

    /// Translation of each part drawn for `parts`, in assembly order.
    fn offsets(enclosure: &CapillaryEnclosure, parts: PartSet) -> Vec<[f64; 3]> {
        enclosure
            .assembly(&AssemblyOptions::with_parts(parts))
            .iter()
            .map(|part| match part {
                Node::Translate { v, .. } => *v,
                other => panic!("expected translated part, got {other:?}"),
            })
            .collect()
    }

    fn assert_offset(actual: [f64; 3], expected: [f64; 3]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!(approx_eq(*a, e), "expected {expected:?}, got {actual:?}");
        }
    }

    #[test]
    fn guide_plates_flank_capillary() {
        let enclosure = reference();
        let half_z = 0.5 * 19.05;
        let (_, gy, gz) = EnclosureParams::default().guide.plate_dimensions;

        let sides = offsets(&enclosure, PartSet::GUIDE_PLATES);
        assert_eq!(sides.len(), 2);
        assert_offset(sides[0], [0.0, 0.5 * gy + 0.5 + 0.25, -half_z + 0.5 * gz]);
        assert_offset(sides[1], [0.0, -0.5 * gy - 0.5 + 0.25, -half_z + 0.5 * gz]);

        let top = offsets(&enclosure, PartSet::GUIDE_TOP);
        assert_offset(top[0], [0.0, 0.25, -half_z + 1.5 * gz]);
    }

    #[test]
    fn led_stack_hangs_from_lid() {
        let enclosure = reference();
        let half_z = 0.5 * 19.05;
        let led = EnclosureParams::default().led;
        let pz = led.pcb_dimensions.2;
        let dz = led.diffuser_dimensions.2;
        let standoff_h = led.diffuser_standoff_height;

        let pcb = offsets(&enclosure, PartSet::LED_PCB);
        assert_offset(pcb[0], [0.0, 0.0, half_z - 0.5 * pz]);

        let diffuser = offsets(&enclosure, PartSet::DIFFUSER);
        assert_offset(diffuser[0], [0.0, 0.0, half_z - pz - 0.5 * dz - standoff_h]);

        let standoffs = offsets(&enclosure, PartSet::DIFFUSER_STANDOFFS);
        assert_eq!(standoffs.len(), 2);
        for (offset, (x, y, _)) in standoffs.iter().zip(enclosure.led_holes(HoleFit::Through)) {
            assert_offset(*offset, [x, y, half_z - pz - 0.5 * standoff_h]);
        }
    }

    #[test]
    fn clamp_sits_on_overhang() {
        let enclosure = reference();
        let clamp = offsets(&enclosure, PartSet::CLAMP);
        // bottom_x = 83.25, overhang = 8, t = 3, capillary diameter = 1
        assert_offset(clamp[0], [0.5 * 83.25 - 4.0, 0.0, -0.5 * 19.05 + 1.5 + 1.0]);
    }

    #[test]
    fn explode_lowers_sensor_and_capillary() {
        let enclosure = reference();
        let options = AssemblyOptions {
            parts: PartSet::CAPILLARY,
            explode: [0.0, 0.0, 10.0],
        };
        let parts = enclosure.assembly(&options);
        let Node::Translate { v, .. } = &parts[0] else {
            panic!("expected translated capillary");
        };
        assert!(approx_eq(v[2], -0.5 * 19.05 + 0.5 - 10.0));
    }

    #[test]
    fn box_projection_adds_clamp() {
        let enclosure = reference();
        let base = enclosure.base().projection(true, 4.0);
        let parts = enclosure.box_projection(true, 4.0);
        assert_eq!(parts.len(), base.len() + 1);
    }

    #[test]
    fn part_projections() {
        let enclosure = reference();
        assert_eq!(enclosure.guide_side_projection(true, 2.0).len(), 3);
        assert_eq!(enclosure.guide_side_projection(false, 2.0).len(), 2);
        assert_eq!(enclosure.guide_top_projection(true, 2.0).len(), 2);
        assert_eq!(enclosure.diffuser_projection(false, 2.0).len(), 1);
    }

    #[test]
    fn invalid_params_rejected() {
        let mut params = EnclosureParams::default();
        params.capillary.diam = 0.0;
        assert!(CapillaryEnclosure::new(&params).is_err());
    }
}
