//! Sensor arrays: capillary enclosures on a shared bottom plate.
//!
//! Each unit keeps its own top, walls and internal parts. The individual
//! bottom plates are merged into one long plate. That plate is cut away
//! under each unit and the unit's own bottom (with all its holes) is unioned
//! back in, so every unit keeps its hole pattern.

use tracing::debug;

use crate::enclosure::capillary::CapillaryEnclosure;
use crate::enclosure::error::EnclosureResult;
use crate::enclosure::holes::Panel;
use crate::enclosure::params::EnclosureParams;
use crate::enclosure::{AssemblyOptions, Enclosure, PartSet};
use crate::scad::{reference_cube, rounded_box, Node, INCH_TO_MM};

/// Returns `num` evenly spaced values from `start` to `stop` inclusive.
///
/// A single value is `start`; zero values is an empty list. The last value
/// is exactly `stop`.
#[must_use]
#[allow(clippy::cast_precision_loss)] // sample counts are small
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num - 1).map(|i| start + step * i as f64).collect();
            values.push(stop);
            values
        }
    }
}

/// A row of capillary enclosures along y sharing one bottom plate.
#[derive(Debug, Clone)]
pub struct ArrayedEnclosure {
    unit: CapillaryEnclosure,
    positions: Vec<f64>,
    array_bottom: Node,
    array_bottom_size: (f64, f64),
}

impl ArrayedEnclosure {
    /// Builds one unit and the shared bottom plate.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is invalid.
    pub fn new(params: &EnclosureParams) -> EnclosureResult<Self> {
        let unit = CapillaryEnclosure::new(params)?;
        let positions = array_positions(params);

        let dims = unit.base().dimensions();
        let box_params = &params.enclosure;
        let array = &params.array;
        let t = dims.thickness;

        #[allow(clippy::cast_precision_loss)]
        let array_length = array.sensor_spacing * array.number_of_sensors as f64;
        let plate_x = dims.bottom_x;
        let plate_y = dims.bottom_y + array_length + 2.0 * array.array_bottom_overhang;
        let plate = rounded_box(plate_x, plate_y, t, box_params.lid_radius);

        // Openings are smaller than the unit bottoms so each unit bottom
        // overlaps the plate around its edge.
        let mut cut = Vec::with_capacity(positions.len() + 1);
        cut.push(plate);
        cut.extend(positions.iter().map(|&pos| {
            rounded_box(
                dims.bottom_x - box_params.bottom_x_overhang,
                dims.bottom_y - box_params.bottom_y_overhang,
                2.0 * t,
                box_params.lid_radius,
            )
            .translate([0.0, pos, 0.0])
        }));

        let bottom = unit.base().panel(Panel::Bottom);
        let mut merged = Vec::with_capacity(positions.len() + 1);
        merged.push(Node::difference(cut));
        merged.extend(
            positions
                .iter()
                .map(|&pos| bottom.clone().translate([0.0, pos, 0.0])),
        );

        debug!(
            units = positions.len(),
            plate_x,
            plate_y,
            "Built arrayed enclosure bottom"
        );

        Ok(Self {
            unit,
            positions,
            array_bottom: Node::union(merged),
            array_bottom_size: (plate_x, plate_y),
        })
    }

    /// Returns the repeated unit.
    #[must_use]
    pub const fn unit(&self) -> &CapillaryEnclosure {
        &self.unit
    }

    /// Returns the y position of each unit centre.
    #[must_use]
    pub fn array_positions(&self) -> &[f64] {
        &self.positions
    }

    /// Returns the shared bottom plate in its local frame.
    #[must_use]
    pub const fn array_bottom(&self) -> &Node {
        &self.array_bottom
    }

    /// Returns the shared bottom plate footprint `(x, y)`.
    #[must_use]
    pub const fn array_bottom_size(&self) -> (f64, f64) {
        self.array_bottom_size
    }

    /// Returns the flat cutting layout of the shared bottom plate.
    #[must_use]
    pub fn array_bottom_projection(&self, show_ref_cube: bool, spacing_factor: f64) -> Vec<Node> {
        let mut parts = vec![self.array_bottom.clone().projection()];
        if show_ref_cube {
            let gap = spacing_factor * self.unit.base().dimensions().thickness;
            let x_shift = 0.5 * self.array_bottom_size.0 + 0.5 * INCH_TO_MM + gap;
            parts.push(reference_cube().translate([x_shift, 0.0, 0.0]).projection());
        }
        parts
    }
}

impl Enclosure for ArrayedEnclosure {
    fn assembly(&self, options: &AssemblyOptions) -> Vec<Node> {
        let unit_options = AssemblyOptions {
            parts: options.parts - PartSet::BOTTOM,
            explode: options.explode,
        };
        let unit_parts = self.unit.assembly(&unit_options);

        let mut parts: Vec<Node> = self
            .positions
            .iter()
            .map(|&pos| Node::translate_all(unit_parts.clone(), [0.0, pos, 0.0]))
            .collect();

        if options.shows(PartSet::BOTTOM) {
            let dims = self.unit.base().dimensions();
            parts.push(
                self.array_bottom
                    .clone()
                    .translate([0.0, 0.0, -dims.lid_offset()]),
            );
        }

        parts
    }

    fn box_projection(&self, show_ref_cube: bool, spacing_factor: f64) -> Vec<Node> {
        self.unit.box_projection(show_ref_cube, spacing_factor)
    }
}

/// Unit centres spread over `sensor_spacing * number_of_sensors`.
fn array_positions(params: &EnclosureParams) -> Vec<f64> {
    let array = &params.array;
    #[allow(clippy::cast_precision_loss)]
    let array_length = array.sensor_spacing * array.number_of_sensors as f64;
    let positions = linspace(-0.5 * array_length, 0.5 * array_length, array.number_of_sensors);
    debug!(?positions, "Computed array positions");
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOL
    }

    #[test]
    fn linspace_edges() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(-3.0, 3.0, 1), vec![-3.0]);
        assert_eq!(linspace(-3.0, 3.0, 2), vec![-3.0, 3.0]);
    }

    #[test]
    fn linspace_even_steps() {
        let values = linspace(-1.0, 1.0, 5);
        let expected = [-1.0, -0.5, 0.0, 0.5, 1.0];
        assert_eq!(values.len(), expected.len());
        for (v, e) in values.iter().zip(expected) {
            assert!(approx_eq(*v, e));
        }
    }

    #[test]
    fn positions_span_array_length() {
        let enclosure = ArrayedEnclosure::new(&EnclosureParams::default()).unwrap();
        let positions = enclosure.array_positions();
        assert_eq!(positions.len(), 4);

        // 4 sensors × 2 in spacing, spread end to end.
        let half = 0.5 * 4.0 * 2.0 * 25.4;
        assert!(approx_eq(positions[0], -half));
        assert!(approx_eq(positions[3], half));
    }

    #[test]
    fn single_sensor_is_centred() {
        let mut params = EnclosureParams::default();
        params.array.number_of_sensors = 1;
        let enclosure = ArrayedEnclosure::new(&params).unwrap();
        let positions = enclosure.array_positions();
        assert_eq!(positions.len(), 1);
        assert!(approx_eq(positions[0], -0.5 * 2.0 * 25.4));
    }

    #[test]
    fn plate_size() {
        let enclosure = ArrayedEnclosure::new(&EnclosureParams::default()).unwrap();
        let (x, y) = enclosure.array_bottom_size();
        assert!(approx_eq(x, 83.25));
        assert!(approx_eq(y, 57.0 + 4.0 * 2.0 * 25.4 + 2.0 * 25.4));
    }

    #[test]
    fn array_bottom_structure() {
        let enclosure = ArrayedEnclosure::new(&EnclosureParams::default()).unwrap();
        let Node::Union(parts) = enclosure.array_bottom() else {
            panic!("expected union");
        };
        // Cut plate plus one bottom per unit.
        assert_eq!(parts.len(), 5);

        let Node::Difference(cut) = &parts[0] else {
            panic!("expected cut plate");
        };
        assert_eq!(cut.len(), 5);
    }

    #[test]
    fn assembly_repeats_unit_without_bottom() {
        let enclosure = ArrayedEnclosure::new(&EnclosureParams::default()).unwrap();
        let parts = enclosure.assembly(&AssemblyOptions::default());
        assert_eq!(parts.len(), 4 + 1);

        let unit_parts = enclosure
            .unit()
            .assembly(&AssemblyOptions::with_parts(PartSet::all() - PartSet::BOTTOM));
        let Node::Translate { children, .. } = &parts[0] else {
            panic!("expected translated unit");
        };
        assert_eq!(children, &unit_parts);

        let Node::Translate { v, .. } = &parts[4] else {
            panic!("expected translated array bottom");
        };
        assert!(approx_eq(v[2], -0.5 * (19.05 + 3.0)));
    }

    #[test]
    fn assembly_without_bottom() {
        let enclosure = ArrayedEnclosure::new(&EnclosureParams::default()).unwrap();
        let options = AssemblyOptions::with_parts(PartSet::TOP | PartSet::CAPILLARY);
        let parts = enclosure.assembly(&options);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0].children().len(), 2);
    }

    #[test]
    fn array_bottom_projection_with_cube() {
        let enclosure = ArrayedEnclosure::new(&EnclosureParams::default()).unwrap();
        assert_eq!(enclosure.array_bottom_projection(true, 2.0).len(), 2);
        assert_eq!(enclosure.array_bottom_projection(false, 2.0).len(), 1);
    }
}
