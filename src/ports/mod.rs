//! Port traits at the boundaries of the simulation engine.

pub mod chart_port;
pub mod config_port;
pub mod price_port;
pub mod trade_port;
