//! Whole-frame simulations built from the particle rules

mod constellation;
mod flow_field;
mod proximity;

pub use constellation::Constellation;
pub use flow_field::{FlowField, FlowStyle, TRAIL_COLOR};
pub use proximity::{scan_links, Link, ProximityStats};
