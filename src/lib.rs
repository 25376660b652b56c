//! Modweave: module type resolution and schema composition.
//!
//! Independently authored modules contribute object, interface, and enum
//! definitions. Modweave validates them against their dependencies, renames
//! module-local types so they cannot collide, and installs everything into
//! one schema.

pub mod cli;
pub mod core;
