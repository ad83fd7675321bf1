//! Parametric capillary sensor enclosures.
//!
//! The enclosures are built in layers:
//!
//! - [`basic::BasicEnclosure`] — six tabbed panels, corner standoffs and the
//!   hole-cutting convention shared by every variant
//! - [`capillary::CapillaryEnclosure`] — adds the sensor cutout, capillary
//!   notches, guide plates, LED board, diffuser stack and capillary clamp
//! - [`arrayed::ArrayedEnclosure`] — replicates a capillary enclosure along y
//!   on a shared bottom plate
//!
//! Every layer implements [`Enclosure`], so callers can render any variant
//! the same way.
//!
//! # Example
//!
//! ```
//! use capillary_enclosure::enclosure::{AssemblyOptions, CapillaryEnclosure, Enclosure, EnclosureParams};
//! use capillary_enclosure::scad::ScadProgram;
//!
//! let enclosure = CapillaryEnclosure::new(&EnclosureParams::default()).unwrap();
//! let mut program = ScadProgram::new().with_segments(50);
//! program.add(enclosure.assembly(&AssemblyOptions::default()));
//! assert!(program.render().contains("difference()"));
//! ```

pub mod arrayed;
pub mod basic;
pub mod capillary;
pub mod error;
pub mod holes;
pub mod params;

pub use arrayed::{linspace, ArrayedEnclosure};
pub use basic::{BasicEnclosure, Dimensions};
pub use capillary::CapillaryEnclosure;
pub use error::{EnclosureError, EnclosureResult};
pub use holes::{HoleFit, HoleKind, HoleSpec, Panel};
pub use params::{load_params, EnclosureParams};

use bitflags::bitflags;

use crate::scad::Node;

bitflags! {
    /// Parts included in an assembly view.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PartSet: u32 {
        /// Top panel.
        const TOP = 1 << 0;
        /// Bottom panel (or shared array bottom).
        const BOTTOM = 1 << 1;
        /// Front panel.
        const FRONT = 1 << 2;
        /// Back panel.
        const BACK = 1 << 3;
        /// Left panel.
        const LEFT = 1 << 4;
        /// Right panel.
        const RIGHT = 1 << 5;
        /// Corner standoffs.
        const STANDOFFS = 1 << 6;
        /// Sensor board.
        const SENSOR = 1 << 7;
        /// Capillary tube.
        const CAPILLARY = 1 << 8;
        /// Side guide plates.
        const GUIDE_PLATES = 1 << 9;
        /// Top guide plate.
        const GUIDE_TOP = 1 << 10;
        /// LED board.
        const LED_PCB = 1 << 11;
        /// Diffuser.
        const DIFFUSER = 1 << 12;
        /// Diffuser standoffs.
        const DIFFUSER_STANDOFFS = 1 << 13;
        /// Capillary clamp.
        const CLAMP = 1 << 14;

        /// The six box panels.
        const PANELS = Self::TOP.bits()
            | Self::BOTTOM.bits()
            | Self::FRONT.bits()
            | Self::BACK.bits()
            | Self::LEFT.bits()
            | Self::RIGHT.bits();
    }
}

impl Default for PartSet {
    fn default() -> Self {
        Self::all()
    }
}

/// Options controlling an assembly view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyOptions {
    /// Parts to include.
    pub parts: PartSet,

    /// Exploded-view offsets `(x, y, z)`; each panel moves outwards by the
    /// component along its normal.
    pub explode: [f64; 3],
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            parts: PartSet::all(),
            explode: [0.0; 3],
        }
    }
}

impl AssemblyOptions {
    /// Creates options with the given parts and no explode.
    #[must_use]
    pub const fn with_parts(parts: PartSet) -> Self {
        Self {
            parts,
            explode: [0.0; 3],
        }
    }

    /// Returns `true` if `part` is included.
    #[must_use]
    pub const fn shows(&self, part: PartSet) -> bool {
        self.parts.contains(part)
    }
}

/// Operations shared by every enclosure variant.
pub trait Enclosure {
    /// Returns the assembled 3D view as a list of positioned parts.
    fn assembly(&self, options: &AssemblyOptions) -> Vec<Node>;

    /// Returns the 2D laser-cutting layout of the box parts.
    fn box_projection(&self, show_ref_cube: bool, spacing_factor: f64) -> Vec<Node>;
}
