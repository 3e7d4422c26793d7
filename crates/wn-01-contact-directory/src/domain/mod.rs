//! Directory domain: the lookup table and its errors.

pub mod directory;
pub mod errors;
