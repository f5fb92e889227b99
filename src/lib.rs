//! Voltage — the expression compiler front end for a node-based audio patcher.

pub mod codegen;
pub mod config;
pub mod dsl;
