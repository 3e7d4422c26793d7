//! TCP adapter: listener, per-connection tasks and shutdown.

mod connection;
pub mod server;


pub use server::RunningNode;
