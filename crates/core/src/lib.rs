#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Shared models and logic for the VSDC clearance simulator.

pub mod api;
pub mod model;
pub mod tax;
pub mod topology;

mod util;

pub use util::{now_ms, short_id};
