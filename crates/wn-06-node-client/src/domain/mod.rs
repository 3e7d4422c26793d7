//! Client settings and error taxonomy.

pub mod config;
pub mod errors;
