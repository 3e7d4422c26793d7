pub mod errors;
pub mod identity;
