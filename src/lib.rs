//! capillary-enclosure: parametric OpenSCAD models for capillary sensor enclosures
//!
//! This library turns a table of physical parameters into CSG scene graphs
//! describing laser-cut enclosures for capillary sensors, and writes them as
//! OpenSCAD scripts for rendering and export.
//!
//! # Architecture
//!
//! - **Scene graph**: centred primitives, transforms and boolean operations
//!   with a deterministic OpenSCAD writer
//! - **Hole convention**: holes are described by panel, shape, size and
//!   location, and cut from the panel stock in one pass
//! - **Enclosure layers**: a tabbed six-panel box, a capillary sensor layer
//!   on top of it, and an array layer sharing one bottom plate
//!
//! The library computes positions only. It does not check parts for overlap
//! or manufacturability; the renderer is trusted with the result.
//!
//! # Modules
//!
//! - [`config`] — Configuration loading and validation
//! - [`enclosure`] — Enclosure parameters, holes and variants
//! - [`error`] — Error types
//! - [`scad`] — CSG scene graph and OpenSCAD output

pub mod config;
pub mod enclosure;
pub mod error;
pub mod scad;
