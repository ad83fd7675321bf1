//! Enclosure parameter tables.
//!
//! Parameters are grouped by the part they describe. Every group defaults to
//! the reference capillary sensor enclosure, so a parameter file only needs
//! to list the values that differ:
//!
//! ```json
//! {
//!     "enclosure": { "wall_thickness": 4.5 },
//!     "array": { "number_of_sensors": 6 }
//! }
//! ```
//!
//! All lengths are millimetres.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enclosure::error::{EnclosureError, EnclosureResult};
use crate::enclosure::holes::HoleSpec;
use crate::scad::INCH_TO_MM;

/// Inner dimensions of the reference enclosure.
const REF_INNER: (f64, f64, f64) = (61.25, 45.0, 0.75 * INCH_TO_MM);

/// Complete parameter set for every enclosure variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnclosureParams {
    /// Box panels, tabs and standoffs.
    pub enclosure: BoxParams,

    /// Sensor board and its cutout.
    pub sensor: SensorParams,

    /// Capillary tube.
    pub capillary: CapillaryParams,

    /// Capillary guide plates.
    pub guide: GuideParams,

    /// LED board and diffuser stack.
    pub led: LedParams,

    /// Capillary clamp.
    pub clamp: ClampParams,

    /// Sensor array layout.
    pub array: ArrayParams,
}

/// Base enclosure parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoxParams {
    /// Inside dimensions `(x, y, z)`.
    pub inner_dimensions: (f64, f64, f64),
    /// Panel stock thickness.
    pub wall_thickness: f64,
    /// Corner radius of the top and bottom plates.
    pub lid_radius: f64,
    /// Top plate overhang past the side walls.
    pub top_x_overhang: f64,
    /// Top plate overhang past the front and back walls.
    pub top_y_overhang: f64,
    /// Bottom plate overhang past the side walls.
    pub bottom_x_overhang: f64,
    /// Bottom plate overhang past the front and back walls.
    pub bottom_y_overhang: f64,
    /// Tab positions joining the lids to the front and back, as fractions of the edge.
    pub lid2front_tabs: Vec<f64>,
    /// Tab positions joining the lids to the sides, as fractions of the edge.
    pub lid2side_tabs: Vec<f64>,
    /// Tab positions joining the sides to the front and back, as fractions of the edge.
    pub side2side_tabs: Vec<f64>,
    /// Width of the lid to front tabs.
    pub lid2front_tab_width: f64,
    /// Width of the lid to side tabs.
    pub lid2side_tab_width: f64,
    /// Width of the side to side tabs.
    pub side2side_tab_width: f64,
    /// Corner standoff diameter.
    pub standoff_diameter: f64,
    /// Gap between a standoff and the inner walls.
    pub standoff_offset: f64,
    /// Screw hole diameter for the standoffs.
    pub standoff_hole_diameter: f64,
    /// Extra holes cut in addition to the generated ones.
    pub holes: Vec<HoleSpec>,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            inner_dimensions: REF_INNER,
            wall_thickness: 3.0,
            lid_radius: 1.5,
            top_x_overhang: 1.0,
            top_y_overhang: 1.0,
            bottom_x_overhang: 8.0,
            bottom_y_overhang: 3.0,
            lid2front_tabs: vec![0.25, 0.75],
            lid2side_tabs: vec![0.25, 0.75],
            side2side_tabs: vec![0.5],
            lid2front_tab_width: 7.0,
            lid2side_tab_width: 7.0,
            side2side_tab_width: 7.0,
            standoff_diameter: 0.1895 * INCH_TO_MM,
            standoff_offset: 0.05 * INCH_TO_MM,
            standoff_hole_diameter: 0.089 * INCH_TO_MM,
            holes: Vec::new(),
        }
    }
}

/// Sensor board parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SensorParams {
    /// Board dimensions `(x, y, z)`.
    pub dimensions: (f64, f64, f64),
    /// Width of the bottom cutout (y).
    pub width: f64,
    /// Length of the bottom cutout (x).
    pub length: f64,
    /// Offset of the sensing element from the board centre line.
    pub hole_offset: f64,
    /// Mounting hole diameter.
    pub mount_hole_diam: f64,
    /// Centre distance between the two mounting holes.
    pub mount_hole_space: f64,
    /// Cable hole width in the front panel; no hole when unset.
    pub cable_hole_width: Option<f64>,
}

impl Default for SensorParams {
    fn default() -> Self {
        Self {
            dimensions: (61.33, 12.95, 3.3),
            width: 12.95,
            length: 61.33,
            hole_offset: 0.685,
            mount_hole_diam: 0.11 * INCH_TO_MM,
            mount_hole_space: 57.40,
            cable_hole_width: None,
        }
    }
}

/// Capillary tube parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapillaryParams {
    /// Outer diameter.
    pub diam: f64,
    /// Tube length.
    pub length: f64,
    /// Side panel notch `(width, half height, corner radius)`.
    pub hole_size: (f64, f64, f64),
    /// Offset of the tube from the enclosure centre line (y).
    pub hole_offset: f64,
}

impl Default for CapillaryParams {
    fn default() -> Self {
        Self {
            diam: 1.0,
            length: 5.0 * INCH_TO_MM,
            hole_size: (1.5, 1.25, 0.5),
            hole_offset: 0.25,
        }
    }
}

/// Capillary guide plate parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuideParams {
    /// Side guide plate dimensions `(x, y, z)`.
    pub plate_dimensions: (f64, f64, f64),
    /// Clearance hole diameter.
    pub thru_hole_diam: f64,
    /// Tapped hole diameter.
    pub tap_hole_diam: f64,
    /// Hole inset from the plate edges.
    pub hole_offset: f64,
}

impl Default for GuideParams {
    fn default() -> Self {
        Self {
            plate_dimensions: (REF_INNER.0 - 0.2, 0.5 * INCH_TO_MM, 0.0625 * INCH_TO_MM),
            thru_hole_diam: 0.089 * INCH_TO_MM,
            tap_hole_diam: 0.07 * INCH_TO_MM,
            hole_offset: 3.0,
        }
    }
}

/// LED board and diffuser parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedParams {
    /// LED board dimensions `(x, y, z)`.
    pub pcb_dimensions: (f64, f64, f64),
    /// Hole inset from the board edges.
    pub pcb_hole_offset: f64,
    /// Clearance hole diameter.
    pub pcb_thru_hole_diam: f64,
    /// Tapped hole diameter.
    pub pcb_tap_hole_diam: f64,
    /// Cable cutout size `(x, y)`.
    pub cable_hole_size: (f64, f64),
    /// Cable cutout position `(x, y)` on the bottom plate.
    pub cable_hole_pos: (f64, f64),
    /// Diffuser dimensions `(x, y, z)`.
    pub diffuser_dimensions: (f64, f64, f64),
    /// Height of the standoffs between board and diffuser.
    pub diffuser_standoff_height: f64,
    /// Diffuser standoff diameter.
    pub diffuser_standoff_diam: f64,
}

impl Default for LedParams {
    fn default() -> Self {
        Self {
            pcb_dimensions: (REF_INNER.0 - 3.0, REF_INNER.1 - 17.0, 1.6),
            pcb_hole_offset: 2.5,
            pcb_thru_hole_diam: 0.089 * INCH_TO_MM,
            pcb_tap_hole_diam: 0.07 * INCH_TO_MM,
            cable_hole_size: (4.0, 3.0),
            cable_hole_pos: (-20.0, 15.0),
            diffuser_dimensions: (REF_INNER.0 - 3.0, REF_INNER.1 - 17.0, 0.0625 * INCH_TO_MM),
            diffuser_standoff_height: 0.25 * INCH_TO_MM,
            diffuser_standoff_diam: 0.1895 * INCH_TO_MM,
        }
    }
}

/// Capillary clamp parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClampParams {
    /// Clamp length along the capillary axis (y).
    pub length: f64,
    /// Clearance between the clamp and the bottom plate edge.
    pub tolerance: f64,
    /// Clamp corner radius.
    pub radius: f64,
    /// Screw hole position along y.
    pub hole_offset: f64,
    /// Clearance hole diameter in the bottom plate.
    pub thru_hole_diam: f64,
    /// Tapped hole diameter in the clamp.
    pub tap_hole_diam: f64,
}

impl Default for ClampParams {
    fn default() -> Self {
        Self {
            length: 28.35,
            tolerance: 0.25,
            radius: 1.0,
            hole_offset: 8.0,
            thru_hole_diam: 0.089 * INCH_TO_MM,
            tap_hole_diam: 0.07 * INCH_TO_MM,
        }
    }
}

/// Sensor array parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrayParams {
    /// Number of enclosure units in the array.
    pub number_of_sensors: usize,
    /// Nominal spacing between units (y).
    pub sensor_spacing: f64,
    /// Shared bottom plate overhang past the outer units (y).
    pub array_bottom_overhang: f64,
}

impl Default for ArrayParams {
    fn default() -> Self {
        Self {
            number_of_sensors: 4,
            sensor_spacing: 2.0 * INCH_TO_MM,
            array_bottom_overhang: INCH_TO_MM,
        }
    }
}

fn require_positive(name: &str, value: f64) -> EnclosureResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(EnclosureError::invalid_parameter(
            name,
            format!("must be positive, got {value}"),
        ))
    }
}

fn require_fractions(name: &str, values: &[f64]) -> EnclosureResult<()> {
    match values.iter().find(|f| !(0.0..=1.0).contains(*f)) {
        Some(f) => Err(EnclosureError::invalid_parameter(
            name,
            format!("tab position {f} is outside 0..=1"),
        )),
        None => Ok(()),
    }
}

impl BoxParams {
    /// Validates the box parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if a size is not positive, a tab fraction is outside
    /// `0..=1`, or an extra hole is invalid.
    pub fn validate(&self) -> EnclosureResult<()> {
        let (x, y, z) = self.inner_dimensions;
        require_positive("enclosure.inner_dimensions.x", x)?;
        require_positive("enclosure.inner_dimensions.y", y)?;
        require_positive("enclosure.inner_dimensions.z", z)?;
        require_positive("enclosure.wall_thickness", self.wall_thickness)?;
        require_positive("enclosure.lid2front_tab_width", self.lid2front_tab_width)?;
        require_positive("enclosure.lid2side_tab_width", self.lid2side_tab_width)?;
        require_positive("enclosure.side2side_tab_width", self.side2side_tab_width)?;
        require_positive("enclosure.standoff_diameter", self.standoff_diameter)?;
        require_positive("enclosure.standoff_hole_diameter", self.standoff_hole_diameter)?;
        require_fractions("enclosure.lid2front_tabs", &self.lid2front_tabs)?;
        require_fractions("enclosure.lid2side_tabs", &self.lid2side_tabs)?;
        require_fractions("enclosure.side2side_tabs", &self.side2side_tabs)?;
        self.holes.iter().try_for_each(HoleSpec::validate)
    }
}

impl EnclosureParams {
    /// Validates every parameter group.
    ///
    /// # Errors
    ///
    /// Returns [`EnclosureError::InvalidParameter`] for the first invalid value.
    pub fn validate(&self) -> EnclosureResult<()> {
        self.enclosure.validate()?;

        let (sx, sy, sz) = self.sensor.dimensions;
        require_positive("sensor.dimensions.x", sx)?;
        require_positive("sensor.dimensions.y", sy)?;
        require_positive("sensor.dimensions.z", sz)?;
        require_positive("sensor.width", self.sensor.width)?;
        require_positive("sensor.length", self.sensor.length)?;
        require_positive("sensor.mount_hole_diam", self.sensor.mount_hole_diam)?;
        if let Some(width) = self.sensor.cable_hole_width {
            require_positive("sensor.cable_hole_width", width)?;
        }

        require_positive("capillary.diam", self.capillary.diam)?;
        require_positive("capillary.length", self.capillary.length)?;
        require_positive("capillary.hole_size.x", self.capillary.hole_size.0)?;
        require_positive("capillary.hole_size.y", self.capillary.hole_size.1)?;

        let (gx, gy, gz) = self.guide.plate_dimensions;
        require_positive("guide.plate_dimensions.x", gx)?;
        require_positive("guide.plate_dimensions.y", gy)?;
        require_positive("guide.plate_dimensions.z", gz)?;
        require_positive("guide.thru_hole_diam", self.guide.thru_hole_diam)?;
        require_positive("guide.tap_hole_diam", self.guide.tap_hole_diam)?;

        let (px, py, pz) = self.led.pcb_dimensions;
        require_positive("led.pcb_dimensions.x", px)?;
        require_positive("led.pcb_dimensions.y", py)?;
        require_positive("led.pcb_dimensions.z", pz)?;
        require_positive("led.pcb_thru_hole_diam", self.led.pcb_thru_hole_diam)?;
        require_positive("led.pcb_tap_hole_diam", self.led.pcb_tap_hole_diam)?;
        require_positive("led.cable_hole_size.x", self.led.cable_hole_size.0)?;
        require_positive("led.cable_hole_size.y", self.led.cable_hole_size.1)?;
        let (dx, dy, dz) = self.led.diffuser_dimensions;
        require_positive("led.diffuser_dimensions.x", dx)?;
        require_positive("led.diffuser_dimensions.y", dy)?;
        require_positive("led.diffuser_dimensions.z", dz)?;
        require_positive("led.diffuser_standoff_height", self.led.diffuser_standoff_height)?;
        require_positive("led.diffuser_standoff_diam", self.led.diffuser_standoff_diam)?;

        require_positive("clamp.length", self.clamp.length)?;
        require_positive("clamp.thru_hole_diam", self.clamp.thru_hole_diam)?;
        require_positive("clamp.tap_hole_diam", self.clamp.tap_hole_diam)?;
        require_positive(
            "clamp.width",
            2.0f64.mul_add(-self.clamp.tolerance, self.enclosure.bottom_x_overhang),
        )?;

        if self.array.number_of_sensors == 0 {
            return Err(EnclosureError::invalid_parameter(
                "array.number_of_sensors",
                "an array needs at least one sensor",
            ));
        }
        require_positive("array.sensor_spacing", self.array.sensor_spacing)
    }
}

/// Loads and validates a JSON parameter file.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable, malformed, or
/// contains invalid values.
pub fn load_params(path: &Path) -> EnclosureResult<EnclosureParams> {
    if !path.exists() {
        return Err(EnclosureError::ParamsNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents =
        std::fs::read_to_string(path).map_err(|e| EnclosureError::params_read(path, e))?;
    let params: EnclosureParams =
        serde_json::from_str(&contents).map_err(|e| EnclosureError::params_parse(path, e))?;

    params.validate()?;
    debug!(path = %path.display(), "Loaded enclosure parameters");

    Ok(params)
}
