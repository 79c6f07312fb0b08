//! # vsgraph
//!
//! Host tick driver for the vsgraph execution engine.
//!
//! - `host`: the TOML graph file format and its loader
//! - `cli`: clap command definitions and their implementations

pub mod cli;
pub mod host;
