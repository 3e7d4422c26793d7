//! # Integration Scenarios

pub mod attestation_flow;
pub mod handler_plugins;
pub mod runtime;
