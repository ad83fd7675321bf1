//! Semantic hole specifications and the hole-cutting convention.
//!
//! A hole is described by the panel it belongs to, its shape and size, and
//! its location in the panel's local frame. The local frame has its origin
//! at the panel centre; `x` runs along the panel width and `y` along its
//! height. For the front, back and side panels `y` is the vertical axis of
//! the assembled enclosure.
//!
//! # Example
//!
//! ```
//! use capillary_enclosure::enclosure::holes::{cut_holes, HoleKind, HoleSpec, Panel};
//! use capillary_enclosure::scad::Node;
//!
//! let holes = vec![HoleSpec::new(Panel::Top, HoleKind::round(3.0), (10.0, 0.0))];
//! let top = cut_holes(Node::cube(80.0, 50.0, 3.0), Panel::Top, &holes, 3.0);
//! assert_eq!(top.primitive_count(), 2);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enclosure::error::{EnclosureError, EnclosureResult};
use crate::scad::{rounded_box, Node};

/// One of the six enclosure panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    /// Lid.
    Top,
    /// Base plate.
    Bottom,
    /// Front wall (negative y).
    Front,
    /// Back wall (positive y).
    Back,
    /// Left wall (negative x).
    Left,
    /// Right wall (positive x).
    Right,
}

impl Panel {
    /// All panels in construction order.
    pub const ALL: [Self; 6] = [
        Self::Top,
        Self::Bottom,
        Self::Front,
        Self::Back,
        Self::Left,
        Self::Right,
    ];

    /// Returns the lowercase panel name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Front => "front",
            Self::Back => "back",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hole shape and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoleKind {
    /// Circular hole.
    Round {
        /// Diameter (mm).
        diameter: f64,
    },

    /// Rectangular cutout.
    Square {
        /// Size along the panel x axis (mm).
        width: f64,
        /// Size along the panel y axis (mm).
        height: f64,
    },

    /// Rectangular cutout with rounded corners.
    RoundedSquare {
        /// Size along the panel x axis (mm).
        width: f64,
        /// Size along the panel y axis (mm).
        height: f64,
        /// Corner radius (mm).
        radius: f64,
    },
}

impl HoleKind {
    /// Creates a round hole.
    #[must_use]
    pub const fn round(diameter: f64) -> Self {
        Self::Round { diameter }
    }

    /// Creates a rectangular cutout.
    #[must_use]
    pub const fn square(width: f64, height: f64) -> Self {
        Self::Square { width, height }
    }

    /// Creates a rectangular cutout with rounded corners.
    #[must_use]
    pub const fn rounded_square(width: f64, height: f64, radius: f64) -> Self {
        Self::RoundedSquare {
            width,
            height,
            radius,
        }
    }

    /// Creates the cutting solid, centred on the origin.
    #[must_use]
    pub fn cutter(&self, thickness: f64) -> Node {
        let depth = 2.0 * thickness;
        match *self {
            Self::Round { diameter } => Node::cylinder(depth, 0.5 * diameter),
            Self::Square { width, height } => Node::cube(width, height, depth),
            Self::RoundedSquare {
                width,
                height,
                radius,
            } => rounded_box(width, height, depth, radius),
        }
    }
}

/// Diameter selection for fastener holes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoleFit {
    /// Clearance hole; the screw passes through.
    #[default]
    Through,
    /// Tapped hole; the screw threads into it.
    Tap,
}

/// A hole on a named panel.
///
/// In parameter files a hole is a flat object tagged by `type`:
///
/// ```json
/// { "panel": "back", "type": "round", "diameter": 6.0, "location": [0.0, 2.0] }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "HoleRecord", into = "HoleRecord")]
pub struct HoleSpec {
    /// Panel the hole is cut from.
    pub panel: Panel,

    /// Shape and size.
    pub kind: HoleKind,

    /// Hole centre in the panel's local frame (mm).
    pub location: (f64, f64),
}

impl HoleSpec {
    /// Creates a new hole specification.
    #[must_use]
    pub const fn new(panel: Panel, kind: HoleKind, location: (f64, f64)) -> Self {
        Self {
            panel,
            kind,
            location,
        }
    }

    /// Creates the positioned cutting solid for a panel of `thickness`.
    #[must_use]
    pub fn cutter(&self, thickness: f64) -> Node {
        let (x, y) = self.location;
        self.kind.cutter(thickness).translate([x, y, 0.0])
    }

    /// Checks that every size is positive.
    ///
    /// # Errors
    ///
    /// Returns [`EnclosureError::InvalidParameter`] naming the offending size.
    pub fn validate(&self) -> EnclosureResult<()> {
        let sizes = match self.kind {
            HoleKind::Round { diameter } => vec![("diameter", diameter)],
            HoleKind::Square { width, height } | HoleKind::RoundedSquare { width, height, .. } => {
                vec![("width", width), ("height", height)]
            }
        };

        for (name, value) in sizes {
            if value <= 0.0 {
                return Err(EnclosureError::invalid_parameter(
                    format!("{} hole {name}", self.panel),
                    format!("must be positive, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

/// File form of a [`HoleSpec`]. Each shape lists exactly the keys it
/// accepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
enum HoleRecord {
    Round {
        panel: Panel,
        diameter: f64,
        location: (f64, f64),
    },
    Square {
        panel: Panel,
        width: f64,
        height: f64,
        location: (f64, f64),
    },
    RoundedSquare {
        panel: Panel,
        width: f64,
        height: f64,
        radius: f64,
        location: (f64, f64),
    },
}

impl From<HoleRecord> for HoleSpec {
    fn from(record: HoleRecord) -> Self {
        match record {
            HoleRecord::Round {
                panel,
                diameter,
                location,
            } => Self::new(panel, HoleKind::round(diameter), location),
            HoleRecord::Square {
                panel,
                width,
                height,
                location,
            } => Self::new(panel, HoleKind::square(width, height), location),
            HoleRecord::RoundedSquare {
                panel,
                width,
                height,
                radius,
                location,
            } => Self::new(panel, HoleKind::rounded_square(width, height, radius), location),
        }
    }
}

impl From<HoleSpec> for HoleRecord {
    fn from(hole: HoleSpec) -> Self {
        let HoleSpec {
            panel,
            kind,
            location,
        } = hole;
        match kind {
            HoleKind::Round { diameter } => Self::Round {
                panel,
                diameter,
                location,
            },
            HoleKind::Square { width, height } => Self::Square {
                panel,
                width,
                height,
                location,
            },
            HoleKind::RoundedSquare {
                width,
                height,
                radius,
            } => Self::RoundedSquare {
                panel,
                width,
                height,
                radius,
                location,
            },
        }
    }
}

/// Cuts every hole that targets `panel` out of `stock`.
///
/// Holes for other panels are ignored. If nothing targets `panel` the stock
/// is returned unchanged.
#[must_use]
pub fn cut_holes(stock: Node, panel: Panel, holes: &[HoleSpec], thickness: f64) -> Node {
    let cutters: Vec<Node> = holes
        .iter()
        .filter(|hole| hole.panel == panel)
        .map(|hole| hole.cutter(thickness))
        .collect();

    if cutters.is_empty() {
        return stock;
    }

    let mut parts = Vec::with_capacity(cutters.len() + 1);
    parts.push(stock);
    parts.extend(cutters);
    Node::difference(parts)
}
