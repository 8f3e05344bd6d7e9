//! tradesim: single-account trading simulator.
//!
//! Hexagonal architecture: the accounting engine lives in [`domain`], the
//! price/trade/chart/config boundaries in [`ports`], concrete
//! implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
